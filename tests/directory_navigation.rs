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

fn login_teacher(stdin: &mut ChildStdin, reader: &mut BufReader<ChildStdout>) {
    let resp = request(
        stdin,
        reader,
        "login",
        "auth.login",
        json!({ "role": "teacher", "password": "pw" }),
    );
    assert_eq!(resp["ok"].as_bool(), Some(true));
}

fn names(listing: &serde_json::Value) -> Vec<String> {
    listing
        .as_array()
        .expect("listing array")
        .iter()
        .map(|c| c["name"].as_str().unwrap_or("").to_string())
        .collect()
}

#[test]
fn drill_down_and_back_one_level_at_a_time() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    login_teacher(&mut stdin, &mut reader);

    let open = request(&mut stdin, &mut reader, "1", "directory.open", json!({}));
    let state = &open["result"]["state"];
    assert_eq!(state["view"].as_str(), Some("grades"));
    assert_eq!(names(&state["listing"]), vec!["Grade 7", "Grade 11"]);
    assert_eq!(state["listing"][0]["count"].as_u64(), Some(2));
    assert_eq!(state["listing"][0]["countLabel"].as_str(), Some("Sections"));
    assert_eq!(state["breadcrumb"].as_array().map(Vec::len), Some(0));

    let sel = request(
        &mut stdin,
        &mut reader,
        "2",
        "directory.selectGrade",
        json!({ "gradeId": "g7" }),
    );
    let state = &sel["result"]["state"];
    assert_eq!(sel["result"]["applied"].as_bool(), Some(true));
    assert_eq!(state["view"].as_str(), Some("sections"));
    assert_eq!(names(&state["listing"]), vec!["Section Alpha", "Section Beta"]);
    assert_eq!(state["listing"][0]["count"].as_u64(), Some(12));
    assert_eq!(state["listing"][0]["countLabel"].as_str(), Some("Logs"));
    assert_eq!(state["breadcrumb"][0].as_str(), Some("Grade 7"));

    let sel = request(
        &mut stdin,
        &mut reader,
        "3",
        "directory.selectSection",
        json!({ "sectionId": "g7a" }),
    );
    let state = &sel["result"]["state"];
    assert_eq!(state["view"].as_str(), Some("records"));
    assert_eq!(state["breadcrumb"][1].as_str(), Some("Section Alpha"));

    let back = request(&mut stdin, &mut reader, "4", "directory.back", json!({}));
    assert_eq!(back["result"]["state"]["view"].as_str(), Some("sections"));
    let back = request(&mut stdin, &mut reader, "5", "directory.back", json!({}));
    assert_eq!(back["result"]["state"]["view"].as_str(), Some("grades"));

    // Floor at the root: a third back changes nothing.
    let back = request(&mut stdin, &mut reader, "6", "directory.back", json!({}));
    assert_eq!(back["result"]["applied"].as_bool(), Some(false));
    assert_eq!(back["result"]["reason"].as_str(), Some("invalid_transition"));
    assert_eq!(back["result"]["state"]["view"].as_str(), Some("grades"));

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn invalid_selections_are_reported_but_harmless() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    login_teacher(&mut stdin, &mut reader);

    let resp = request(
        &mut stdin,
        &mut reader,
        "1",
        "directory.selectGrade",
        json!({ "gradeId": "g99" }),
    );
    assert_eq!(resp["result"]["applied"].as_bool(), Some(false));
    assert_eq!(resp["result"]["reason"].as_str(), Some("not_found"));
    assert_eq!(resp["result"]["state"]["view"].as_str(), Some("grades"));

    let resp = request(
        &mut stdin,
        &mut reader,
        "2",
        "directory.selectSection",
        json!({ "sectionId": "g7a" }),
    );
    assert_eq!(resp["result"]["reason"].as_str(), Some("invalid_transition"));

    let _ = request(
        &mut stdin,
        &mut reader,
        "3",
        "directory.selectGrade",
        json!({ "gradeId": "g7" }),
    );
    // g11a exists, but under the other grade.
    let resp = request(
        &mut stdin,
        &mut reader,
        "4",
        "directory.selectSection",
        json!({ "sectionId": "g11a" }),
    );
    assert_eq!(resp["result"]["applied"].as_bool(), Some(false));
    assert_eq!(resp["result"]["reason"].as_str(), Some("not_found"));
    assert_eq!(resp["result"]["state"]["view"].as_str(), Some("sections"));

    let missing = request(
        &mut stdin,
        &mut reader,
        "5",
        "directory.selectGrade",
        json!({}),
    );
    assert_eq!(
        missing["error"]["code"].as_str(),
        Some("bad_params"),
        "missing gradeId should be rejected before touching the navigator"
    );

    drop(stdin);
    let _ = child.wait();
}

#[test]
fn section_records_join_the_roster() {
    let (mut child, mut stdin, mut reader) = spawn_sidecar();
    login_teacher(&mut stdin, &mut reader);

    // Records are only served from the section view.
    let early = request(&mut stdin, &mut reader, "1", "directory.records", json!({}));
    assert_eq!(early["error"]["code"].as_str(), Some("invalid_transition"));

    let _ = request(
        &mut stdin,
        &mut reader,
        "2",
        "directory.selectGrade",
        json!({ "gradeId": "g11" }),
    );
    let _ = request(
        &mut stdin,
        &mut reader,
        "3",
        "directory.selectSection",
        json!({ "sectionId": "g11a" }),
    );

    let recs = request(&mut stdin, &mut reader, "4", "directory.records", json!({}));
    assert_eq!(recs["result"]["section"].as_str(), Some("STEM-A"));
    let records = recs["result"]["records"].as_array().expect("records");
    let students: Vec<&str> = records
        .iter()
        .map(|r| r["studentName"].as_str().unwrap_or(""))
        .collect();
    // Both seeded STEM-A students, newest first.
    assert_eq!(students, vec!["Michael Chen", "Jordan Rivera"]);

    drop(stdin);
    let _ = child.wait();
}
