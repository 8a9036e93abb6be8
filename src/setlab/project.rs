//! Project files
//!
//! A project is a JSON document holding the set count, the sets as sorted element lists
//! and the operation selection:
//!
//! ```json
//! {"num_sets": 2, "sets": {"A": ["1", "2"], "B": ["2"]},
//!  "operation": "difference", "first_label": "A", "second_label": "B"}
//! ```
//!
//! Missing keys fall back to two sets, `union`, `A` and `B`. Saving goes through a
//! temporary file in the target directory so a failed write never leaves a partial file.

use crate::setlab::elements::parse_set_input;
use crate::setlab::error::SetlabError;
use crate::setlab::operation::{OperationChoice, OperationKind};
use crate::setlab::sets::{Label, SetCount};
use crate::setlab::workspace::Workspace;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectFile {
    #[serde(default = "default_num_sets")]
    pub num_sets: usize,
    #[serde(default)]
    pub sets: BTreeMap<String, Vec<String>>,
    #[serde(default = "default_operation")]
    pub operation: String,
    #[serde(default = "default_first_label")]
    pub first_label: String,
    #[serde(default = "default_second_label")]
    pub second_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expression: Option<String>,
}

fn default_num_sets() -> usize {
    2
}

fn default_operation() -> String {
    OperationKind::Union.as_str().to_string()
}

fn default_first_label() -> String {
    Label::A.as_str().to_string()
}

fn default_second_label() -> String {
    Label::B.as_str().to_string()
}

impl ProjectFile {
    /// Snapshot of the workspace inputs; sets are stored parsed and sorted
    pub fn from_workspace(workspace: &Workspace) -> Self {
        let sets = workspace
            .labels()
            .iter()
            .map(|label| {
                let elements = parse_set_input(workspace.input(*label));
                (label.to_string(), elements.into_iter().collect())
            })
            .collect();
        let choice = workspace.choice();
        let expression = Some(choice.expression.trim())
            .filter(|source| !source.is_empty())
            .map(str::to_string);

        ProjectFile {
            num_sets: workspace.count().get(),
            sets,
            operation: choice.kind.as_str().to_string(),
            first_label: choice.first.to_string(),
            second_label: choice.second.to_string(),
            expression,
        }
    }

    /// Rebuild a workspace, validating count, operation and labels
    pub fn into_workspace(self) -> Result<Workspace, SetlabError> {
        let count = SetCount::new(self.num_sets)?;
        let kind: OperationKind = self.operation.parse()?;
        let first: Label = self.first_label.parse()?;
        let second: Label = self.second_label.parse()?;

        let mut workspace = Workspace::new(count);
        for (key, elements) in self.sets {
            let label: Label = key.parse()?;
            if !count.labels().contains(&label) {
                log::debug!("ignoring set {label} beyond the {count} active sets");
                continue;
            }
            workspace.set_input(label, elements.join(", "))?;
        }

        workspace.choose(OperationChoice {
            kind,
            first,
            second,
            expression: self.expression.unwrap_or_default(),
        });
        Ok(workspace)
    }
}

pub fn save_project(workspace: &Workspace, path: &Path) -> Result<(), SetlabError> {
    let project = ProjectFile::from_workspace(workspace);
    let mut json = serde_json::to_string_pretty(&project)
        .map_err(|err| SetlabError::Project(err.to_string()))?;
    json.push('\n');
    write_atomic(path, json.as_bytes())
}

pub fn load_project(path: &Path) -> Result<Workspace, SetlabError> {
    let text = fs::read_to_string(path)?;
    let project: ProjectFile = serde_json::from_str(&text)
        .map_err(|err| SetlabError::Project(format!("{}: {err}", path.display())))?;
    log::debug!("loaded project {}", path.display());
    project.into_workspace()
}

/// Write `bytes` to `path` through a temporary file in the same directory
pub fn write_atomic(path: &Path, bytes: &[u8]) -> Result<(), SetlabError> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = NamedTempFile::new_in(parent)?;
    file.write_all(bytes)?;
    file.flush()?;
    file.persist(path).map_err(|err| SetlabError::from(err.error))?;
    log::info!("wrote {} ({} bytes)", path.display(), bytes.len());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn workspace() -> Workspace {
        let mut workspace = Workspace::new(SetCount::new(3).unwrap());
        workspace.set_input(Label::A, "3, 1, 2").unwrap();
        workspace.set_input(Label::B, "{x y}").unwrap();
        workspace.choose(
            OperationChoice::new(OperationKind::Symdiff).with_operands(Label::C, Label::A),
        );
        workspace
    }

    #[test]
    fn test_project_from_workspace() {
        let project = ProjectFile::from_workspace(&workspace());
        assert_eq!(project.num_sets, 3);
        assert_eq!(project.sets["A"], vec!["1", "2", "3"]);
        assert_eq!(project.sets["B"], vec!["x", "y"]);
        assert!(project.sets["C"].is_empty());
        assert_eq!(project.operation, "symdiff");
        assert_eq!(project.first_label, "C");
        assert_eq!(project.second_label, "A");
        assert_eq!(project.expression, None);

        let json = serde_json::to_string(&project).unwrap();
        assert!(!json.contains("expression"));
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let project: ProjectFile = serde_json::from_str("{}").unwrap();
        let workspace = project.into_workspace().unwrap();
        assert_eq!(workspace.count().get(), 2);
        assert_eq!(workspace.choice(), &OperationChoice::default());
        assert_eq!(workspace.input(Label::A), "");
    }

    #[test]
    fn test_expression_is_restored() {
        let project: ProjectFile = serde_json::from_str(
            r#"{"num_sets": 2, "sets": {"A": ["1"], "B": ["1", "2"]},
                "operation": "expression", "expression": "B \\ A"}"#,
        )
        .unwrap();
        let mut workspace = project.into_workspace().unwrap();
        let result = workspace.compute().unwrap().result().clone();
        assert_eq!(result, parse_set_input("2"));
    }

    #[test]
    fn test_invalid_projects_are_rejected() {
        let cases = [
            (r#"{"num_sets": 5}"#, "set count"),
            (r#"{"operation": "power"}"#, "operation"),
            (r#"{"first_label": "Z"}"#, "label"),
            (r#"{"sets": {"E": ["1"]}}"#, "set key"),
        ];
        for (json, what) in cases {
            let project: ProjectFile = serde_json::from_str(json).unwrap();
            assert!(project.into_workspace().is_err(), "bad {what} accepted");
        }
    }

    #[test]
    fn test_sets_beyond_count_are_ignored() {
        let project: ProjectFile =
            serde_json::from_str(r#"{"num_sets": 2, "sets": {"C": ["1"]}}"#).unwrap();
        let workspace = project.into_workspace().unwrap();
        assert_eq!(workspace.labels(), &[Label::A, Label::B]);
    }

    #[test]
    fn test_write_atomic_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "old contents that are longer").unwrap();
        write_atomic(&path, b"new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_load_reports_bad_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_project(&path), Err(SetlabError::Project(_))));
    }
}
