use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const PLACEHOLDER_GRADE: &str = "New Grade";
pub const PLACEHOLDER_SECTION: &str = "New Section";

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub name: String,
    pub item_count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Grade {
    pub id: String,
    pub name: String,
    pub sections: Vec<Section>,
}

/// Two-level tree of grade levels and their sections. Sibling order is
/// insertion order and stays stable across renames; ids are never reused.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Catalog {
    pub grades: Vec<Grade>,
}

impl Catalog {
    pub fn grade(&self, id: &str) -> Option<&Grade> {
        self.grades.iter().find(|g| g.id == id)
    }

    fn grade_mut(&mut self, id: &str) -> Option<&mut Grade> {
        self.grades.iter_mut().find(|g| g.id == id)
    }

    pub fn node_name(&self, id: &str) -> Option<&str> {
        if let Some(g) = self.grade(id) {
            return Some(&g.name);
        }
        self.grades
            .iter()
            .flat_map(|g| g.sections.iter())
            .find(|s| s.id == id)
            .map(|s| s.name.as_str())
    }

    /// Sections are searched across all grades: a rename can be committed
    /// from a listing context other than the currently selected grade.
    fn section_mut(&mut self, id: &str) -> Option<&mut Section> {
        self.grades
            .iter_mut()
            .flat_map(|g| g.sections.iter_mut())
            .find(|s| s.id == id)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    Grades,
    Sections,
    Records,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Selection {
    Root,
    Grade(String),
    Section { grade: String, section: String },
}

/// Outcome of a navigator operation. Every operation is total: the failure
/// classes degrade to a no-op on the state instead of raising.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    Applied,
    Forbidden,
    NotFound,
    InvalidTransition,
}

impl NavOutcome {
    pub fn applied(self) -> bool {
        self == NavOutcome::Applied
    }

    pub fn reason(self) -> Option<&'static str> {
        match self {
            NavOutcome::Applied => None,
            NavOutcome::Forbidden => Some("forbidden"),
            NavOutcome::NotFound => Some("not_found"),
            NavOutcome::InvalidTransition => Some("invalid_transition"),
        }
    }
}

/// Drill-down navigator over a [`Catalog`]. Selection is held by id, so a
/// committed rename never desyncs the breadcrumb. The editor capability is
/// fixed at construction; without it every mutating operation is a no-op.
#[derive(Debug, Clone)]
pub struct Navigator {
    editor: bool,
    selection: Selection,
    editing_id: Option<String>,
    edit_buffer: String,
}

impl Navigator {
    pub fn new(editor: bool) -> Self {
        Self {
            editor,
            selection: Selection::Root,
            editing_id: None,
            edit_buffer: String::new(),
        }
    }

    pub fn view(&self) -> View {
        match self.selection {
            Selection::Root => View::Grades,
            Selection::Grade(_) => View::Sections,
            Selection::Section { .. } => View::Records,
        }
    }

    pub fn selected_grade<'a>(&self, catalog: &'a Catalog) -> Option<&'a Grade> {
        let id = match &self.selection {
            Selection::Root => return None,
            Selection::Grade(g) => g,
            Selection::Section { grade, .. } => grade,
        };
        catalog.grade(id)
    }

    pub fn selected_section<'a>(&self, catalog: &'a Catalog) -> Option<&'a Section> {
        let Selection::Section { grade, section } = &self.selection else {
            return None;
        };
        catalog
            .grade(grade)
            .and_then(|g| g.sections.iter().find(|s| s.id == *section))
    }

    pub fn breadcrumb(&self, catalog: &Catalog) -> Vec<String> {
        let mut path = Vec::new();
        if let Some(g) = self.selected_grade(catalog) {
            path.push(g.name.clone());
        }
        if let Some(s) = self.selected_section(catalog) {
            path.push(s.name.clone());
        }
        path
    }

    pub fn editing_id(&self) -> Option<&str> {
        self.editing_id.as_deref()
    }

    pub fn edit_buffer(&self) -> &str {
        &self.edit_buffer
    }

    pub fn select_grade(&mut self, catalog: &Catalog, grade_id: &str) -> NavOutcome {
        if self.selection != Selection::Root {
            return NavOutcome::InvalidTransition;
        }
        if catalog.grade(grade_id).is_none() {
            return NavOutcome::NotFound;
        }
        self.selection = Selection::Grade(grade_id.to_string());
        NavOutcome::Applied
    }

    pub fn select_section(&mut self, catalog: &Catalog, section_id: &str) -> NavOutcome {
        let Selection::Grade(grade_id) = &self.selection else {
            return NavOutcome::InvalidTransition;
        };
        let belongs = catalog
            .grade(grade_id)
            .map(|g| g.sections.iter().any(|s| s.id == section_id))
            .unwrap_or(false);
        if !belongs {
            return NavOutcome::NotFound;
        }
        self.selection = Selection::Section {
            grade: grade_id.clone(),
            section: section_id.to_string(),
        };
        NavOutcome::Applied
    }

    /// One level at a time; there is no section-view-to-root shortcut.
    pub fn go_back(&mut self) -> NavOutcome {
        match &self.selection {
            Selection::Root => NavOutcome::InvalidTransition,
            Selection::Grade(_) => {
                self.selection = Selection::Root;
                NavOutcome::Applied
            }
            Selection::Section { grade, .. } => {
                self.selection = Selection::Grade(grade.clone());
                NavOutcome::Applied
            }
        }
    }

    /// Starts a rename. A second begin abandons any uncommitted edit. The
    /// target must be a grade, or a section of the currently selected grade.
    pub fn begin_edit(&mut self, catalog: &Catalog, node_id: &str, current_name: &str) -> NavOutcome {
        if !self.editor {
            return NavOutcome::Forbidden;
        }
        let is_grade = catalog.grade(node_id).is_some();
        let is_visible_section = self
            .selected_grade(catalog)
            .map(|g| g.sections.iter().any(|s| s.id == node_id))
            .unwrap_or(false);
        if !is_grade && !is_visible_section {
            return NavOutcome::NotFound;
        }
        self.editing_id = Some(node_id.to_string());
        self.edit_buffer = current_name.to_string();
        NavOutcome::Applied
    }

    /// Free-form; empty names are accepted on commit.
    pub fn update_edit_buffer(&mut self, text: &str) -> NavOutcome {
        self.edit_buffer = text.to_string();
        NavOutcome::Applied
    }

    pub fn commit_edit(&mut self, catalog: &mut Catalog) -> NavOutcome {
        if !self.editor {
            return NavOutcome::Forbidden;
        }
        let Some(node_id) = self.editing_id.clone() else {
            return NavOutcome::InvalidTransition;
        };
        let name = self.edit_buffer.clone();
        let renamed = if let Some(g) = catalog.grade_mut(&node_id) {
            g.name = name;
            true
        } else if let Some(s) = catalog.section_mut(&node_id) {
            s.name = name;
            true
        } else {
            false
        };
        if !renamed {
            return NavOutcome::NotFound;
        }
        self.editing_id = None;
        self.edit_buffer.clear();
        NavOutcome::Applied
    }

    pub fn cancel_edit(&mut self) -> NavOutcome {
        self.editing_id = None;
        self.edit_buffer.clear();
        NavOutcome::Applied
    }

    /// Appends a node at the current depth and immediately enters edit mode
    /// on it so the caller can rename in place. There is no third tier, so
    /// this is rejected from the records view.
    pub fn add_node(&mut self, catalog: &mut Catalog) -> NavOutcome {
        if !self.editor {
            return NavOutcome::Forbidden;
        }
        let new_id = Uuid::new_v4().to_string();
        let placeholder = match &self.selection {
            Selection::Root => {
                catalog.grades.push(Grade {
                    id: new_id.clone(),
                    name: PLACEHOLDER_GRADE.to_string(),
                    sections: Vec::new(),
                });
                PLACEHOLDER_GRADE
            }
            Selection::Grade(grade_id) => {
                let Some(g) = catalog.grade_mut(grade_id) else {
                    return NavOutcome::NotFound;
                };
                g.sections.push(Section {
                    id: new_id.clone(),
                    name: PLACEHOLDER_SECTION.to_string(),
                    item_count: 0,
                });
                PLACEHOLDER_SECTION
            }
            Selection::Section { .. } => return NavOutcome::InvalidTransition,
        };
        self.editing_id = Some(new_id);
        self.edit_buffer = placeholder.to_string();
        NavOutcome::Applied
    }
}
