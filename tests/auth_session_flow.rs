use serde_json::json;
use std::io::{BufRead, BufReader, Write};
use std::process::{Child, ChildStdin, ChildStdout, Command, Stdio};

fn spawn_sidecar() -> (Child, ChildStdin, BufReader<ChildStdout>) {
    let exe = env!("CARGO_BIN_EXE_qrpassd");
    let mut child = Command::new(exe)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .expect("spawn qrpassd");
    let stdin = child.stdin.take().expect("child stdin");
    let stdout = child.stdout.take().expect("child stdout");
    (child, stdin, BufReader::new(stdout))
}

fn request(
    stdin: &mut ChildStdin,
    reader: &mut BufReader<ChildStdout>,
    id: &str,
    method: &str,
    params: serde_json::Value,
) -> serde_json::Value {
    let payload = json!({ "id": id, "method": method, "params": params });
    writeln!(stdin, "{}", payload).expect("write request");
    stdin.flush().expect("flush request");
    let mut line = String::new();
    reader.read_line(&mut line).expect("read response line");
    let value: serde_json::Value = serde_json::from_str(line.trim()).expect("parse response json");
    assert_eq!(value.get("id").and_then(|v| v.as_str()), Some(id));
    value
}

fn error_code(resp: &serde_json::Value) -> &str {
    resp.get("error")
        .and_then(|e| e.get("code"))
        .and_then(|v| v.as_str())
        .unwrap_or("")
}

#[test]
fn login_installs_the_mock_teacher_identity() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let health = request(&mut stdin, &mut reader, "1", "health", json!({}));
    assert_eq!(
        health["result"]["sessionActive"].as_bool(),
        Some(false),
        "fresh daemon must not have a session"
    );

    let login = request(
        &mut stdin,
        &mut reader,
        "2",
        "auth.login",
        json!({ "role": "teacher", "password": "hunter2" }),
    );
    assert_eq!(login["ok"].as_bool(), Some(true));
    let user = &login["result"]["user"];
    assert_eq!(user["id"].as_str(), Some("T-902"));
    assert_eq!(user["name"].as_str(), Some("Prof. Sarah Jenkins"));
    assert_eq!(user["role"].as_str(), Some("teacher"));
    assert_eq!(user["email"].as_str(), Some("s.jenkins@school.edu"));

    let session = request(&mut stdin, &mut reader, "3", "auth.session", json!({}));
    assert_eq!(session["result"]["user"]["id"].as_str(), Some("T-902"));

    let _ = request(&mut stdin, &mut reader, "4", "auth.logout", json!({}));
    let after = request(&mut stdin, &mut reader, "5", "auth.session", json!({}));
    assert!(after["result"]["user"].is_null());

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn student_login_uses_student_defaults() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let login = request(
        &mut stdin,
        &mut reader,
        "1",
        "auth.login",
        json!({ "role": "student", "password": "pw" }),
    );
    let user = &login["result"]["user"];
    assert_eq!(user["id"].as_str(), Some("S-441"));
    assert_eq!(user["name"].as_str(), Some("Jordan Rivera"));
    assert_eq!(user["email"].as_str(), Some("j.rivera@student.edu"));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn typed_email_id_becomes_the_account_email() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let login = request(
        &mut stdin,
        &mut reader,
        "1",
        "auth.login",
        json!({ "role": "teacher", "id": "m.reyes@school.edu", "password": "pw" }),
    );
    let user = &login["result"]["user"];
    assert_eq!(user["id"].as_str(), Some("m.reyes@school.edu"));
    assert_eq!(user["email"].as_str(), Some("m.reyes@school.edu"));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn login_validates_role_and_password() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let no_pw = request(
        &mut stdin,
        &mut reader,
        "1",
        "auth.login",
        json!({ "role": "teacher" }),
    );
    assert_eq!(error_code(&no_pw), "bad_params");

    let bad_role = request(
        &mut stdin,
        &mut reader,
        "2",
        "auth.login",
        json!({ "role": "principal", "password": "pw" }),
    );
    assert_eq!(error_code(&bad_role), "bad_params");

    let session = request(&mut stdin, &mut reader, "3", "auth.session", json!({}));
    assert!(session["result"]["user"].is_null());

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn signup_validates_name_and_password_match() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    let no_name = request(
        &mut stdin,
        &mut reader,
        "1",
        "auth.signup",
        json!({ "role": "teacher", "password": "pw", "confirmPassword": "pw" }),
    );
    assert_eq!(error_code(&no_name), "bad_params");

    let mismatch = request(
        &mut stdin,
        &mut reader,
        "2",
        "auth.signup",
        json!({
            "role": "teacher",
            "name": "Dana Cruz",
            "password": "pw",
            "confirmPassword": "other"
        }),
    );
    assert_eq!(error_code(&mismatch), "bad_params");

    // Failed signups must not install a session.
    let session = request(&mut stdin, &mut reader, "3", "auth.session", json!({}));
    assert!(session["result"]["user"].is_null());

    let signup = request(
        &mut stdin,
        &mut reader,
        "4",
        "auth.signup",
        json!({
            "role": "teacher",
            "name": "Dana Cruz",
            "password": "pw",
            "confirmPassword": "pw"
        }),
    );
    assert_eq!(signup["result"]["user"]["name"].as_str(), Some("Dana Cruz"));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn everything_but_health_requires_a_session() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();

    for (i, method) in [
        "dashboard.summary",
        "scan.identify",
        "directory.open",
        "notes.list",
        "assist.analyzeTrend",
        "settings.get",
    ]
    .iter()
    .enumerate()
    {
        let resp = request(
            &mut stdin,
            &mut reader,
            &format!("{}", i + 1),
            method,
            json!({}),
        );
        assert_eq!(error_code(&resp), "no_session", "method {}", method);
    }

    drop(stdin);
    let _ = child.wait();
}
