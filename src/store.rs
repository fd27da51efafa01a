use crate::catalog::{Catalog, Grade, Section};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Teacher,
    Student,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub role: Role,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: String,
    pub name: String,
    pub grade: String,
    pub section: String,
    pub photo_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    pub id: String,
    pub student_id: String,
    pub student_name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: Severity,
    pub date: String,
    pub description: String,
    pub location: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub content: String,
    pub date: String,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    pub biometric: bool,
    pub haptic: bool,
    pub notifications: bool,
    pub dark_mode: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            biometric: true,
            haptic: true,
            notifications: true,
            dark_mode: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityPoint {
    pub name: String,
    pub count: u32,
}

fn default_scan_target() -> String {
    "ST-9942".to_string()
}

/// Everything the daemon serves. Memory-only: seeded once at startup, either
/// from the built-in mock dataset or from a JSON file named by `QRPASS_SEED`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Store {
    pub roster: Vec<Student>,
    /// Oldest first; new records are appended.
    pub violations: Vec<Violation>,
    /// Oldest first.
    pub notes: Vec<Note>,
    pub activity: Vec<ActivityPoint>,
    pub catalog: Catalog,
    #[serde(default)]
    pub settings: Settings,
    /// Roster id the simulated QR read resolves to when none is supplied.
    #[serde(default = "default_scan_target")]
    pub scan_target: String,
}

impl Store {
    pub fn bootstrap() -> anyhow::Result<Store> {
        match std::env::var("QRPASS_SEED") {
            Ok(path) if !path.is_empty() => Store::from_seed_file(Path::new(&path)),
            _ => Ok(Store::seed()),
        }
    }

    pub fn from_seed_file(path: &Path) -> anyhow::Result<Store> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("read seed file {}", path.display()))?;
        let store: Store = serde_json::from_str(&raw)
            .with_context(|| format!("parse seed file {}", path.display()))?;
        Ok(store)
    }

    pub fn student(&self, id: &str) -> Option<&Student> {
        self.roster.iter().find(|s| s.id == id)
    }

    /// Violations of students sitting in the given grade/section, newest first.
    pub fn section_records(&self, grade_name: &str, section_name: &str) -> Vec<&Violation> {
        self.violations
            .iter()
            .rev()
            .filter(|v| {
                self.student(&v.student_id)
                    .map(|s| s.grade == grade_name && s.section == section_name)
                    .unwrap_or(false)
            })
            .collect()
    }

    /// The section cards display their log count; a freshly recorded scan
    /// bumps the matching one. Sections are matched by name, so a renamed
    /// section stops accumulating until the roster catches up.
    pub fn bump_section_count(&mut self, grade_name: &str, section_name: &str) -> bool {
        for g in &mut self.catalog.grades {
            if g.name != grade_name {
                continue;
            }
            if let Some(s) = g.sections.iter_mut().find(|s| s.name == section_name) {
                s.item_count += 1;
                return true;
            }
        }
        false
    }

    pub fn seed() -> Store {
        Store {
            roster: vec![
                student("ST-9942", "Jordan Rivera", "Grade 11", "STEM-A", "jordan"),
                student("ST-1022", "Alex Smith", "Grade 7", "Section Alpha", "alex"),
                student("ST-1029", "Alex Johnson", "Grade 11", "HUMSS-B", "johnson"),
                student("ST-2931", "Sarah Miller", "Grade 7", "Section Beta", "sarah"),
                student("ST-9902", "Michael Chen", "Grade 11", "STEM-A", "michael"),
            ],
            violations: vec![
                violation(
                    "v1",
                    "ST-1022",
                    "Alex Smith",
                    "Behavior",
                    Severity::Medium,
                    "2024-05-14T10:00:00Z",
                    "Disruptive in class",
                    "Room 102",
                ),
                violation(
                    "v2",
                    "ST-9942",
                    "Jordan Rivera",
                    "Tardiness",
                    Severity::Low,
                    "2024-05-15T08:10:00Z",
                    "Late for 1st period",
                    "Gate A",
                ),
                violation(
                    "v3",
                    "ST-9902",
                    "Michael Chen",
                    "Bullying",
                    Severity::Critical,
                    "2024-05-16T13:15:00Z",
                    "Verbal altercation in the hallway.",
                    "Corridor B",
                ),
                violation(
                    "v4",
                    "ST-2931",
                    "Sarah Miller",
                    "Tardiness",
                    Severity::Low,
                    "2024-05-17T08:45:00Z",
                    "Arrived 20 minutes late to first period.",
                    "Main Gate",
                ),
                violation(
                    "v5",
                    "ST-1029",
                    "Alex Johnson",
                    "Academic Dishonesty",
                    Severity::High,
                    "2024-05-17T10:30:00Z",
                    "Caught using phone during Math midterm.",
                    "Room 304",
                ),
            ],
            notes: vec![
                note(
                    "n1",
                    "Follow-up: Sarah Miller",
                    "Sarah has shown improvement in arrival times after the counseling session last week.",
                    "2024-05-10T09:00:00Z",
                    &["positive", "follow-up"],
                ),
                note(
                    "n2",
                    "Incident Report #204",
                    "Student was found smoking behind the gym. Intervention scheduled with parents for Friday.",
                    "2024-05-12T14:30:00Z",
                    &["urgent", "smoking"],
                ),
                note(
                    "n3",
                    "Discipline Committee Meeting",
                    "Discussed behavioral patterns for Grade 10 section B. Noticed a spike in absenteeism.",
                    "2024-05-14T16:00:00Z",
                    &["meeting", "behavior"],
                ),
            ],
            activity: ["Mon", "Tue", "Wed", "Thu", "Fri"]
                .iter()
                .zip([4u32, 7, 5, 12, 8])
                .map(|(name, count)| ActivityPoint {
                    name: (*name).to_string(),
                    count,
                })
                .collect(),
            catalog: Catalog {
                grades: vec![
                    Grade {
                        id: "g7".to_string(),
                        name: "Grade 7".to_string(),
                        sections: vec![
                            section("g7a", "Section Alpha", 12),
                            section("g7b", "Section Beta", 8),
                        ],
                    },
                    Grade {
                        id: "g11".to_string(),
                        name: "Grade 11".to_string(),
                        sections: vec![
                            section("g11a", "STEM-A", 30),
                            section("g11b", "HUMSS-B", 25),
                        ],
                    },
                ],
            },
            settings: Settings::default(),
            scan_target: default_scan_target(),
        }
    }
}

fn student(id: &str, name: &str, grade: &str, sec: &str, photo_seed: &str) -> Student {
    Student {
        id: id.to_string(),
        name: name.to_string(),
        grade: grade.to_string(),
        section: sec.to_string(),
        photo_url: format!("https://picsum.photos/seed/{photo_seed}/200/200"),
    }
}

#[allow(clippy::too_many_arguments)]
fn violation(
    id: &str,
    student_id: &str,
    student_name: &str,
    kind: &str,
    severity: Severity,
    date: &str,
    description: &str,
    location: &str,
) -> Violation {
    Violation {
        id: id.to_string(),
        student_id: student_id.to_string(),
        student_name: student_name.to_string(),
        kind: kind.to_string(),
        severity,
        date: date.to_string(),
        description: description.to_string(),
        location: location.to_string(),
    }
}

fn note(id: &str, title: &str, content: &str, date: &str, tags: &[&str]) -> Note {
    Note {
        id: id.to_string(),
        title: title.to_string(),
        content: content.to_string(),
        date: date.to_string(),
        tags: tags.iter().map(|t| (*t).to_string()).collect(),
    }
}

fn section(id: &str, name: &str, item_count: u32) -> Section {
    Section {
        id: id.to_string(),
        name: name.to_string(),
        item_count,
    }
}
