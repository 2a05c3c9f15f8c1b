//! Artifact materializer: applies pending steps to the virtual file tree.
//!
//! [`materialize`] takes the current step list and tree by reference and
//! returns new values. A failing batch leaves the caller's state exactly as it
//! was, so committing the result is all-or-nothing.
//!
//! Conflicts between a file and a folder at the same path are resolved in
//! favour of the incoming step: the existing node is replaced, logged at
//! `warn` and listed in [`MaterializeReport::replaced`].

use std::fmt;

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{BuildError, Result};
use crate::models::{FileItem, Step, StepAction, StepKind, StepStatus};
use crate::tree::FileTree;

/// Output of one materialization batch.
#[derive(Debug, Clone, PartialEq)]
pub struct Materialized {
    /// Step list with applied steps marked completed
    pub steps: Vec<Step>,
    /// Tree with every applied step's effect
    pub files: FileTree,
    /// What the batch did
    pub report: MaterializeReport,
}

/// Summary of the tree changes made by one batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct MaterializeReport {
    /// Ids of steps moved to completed, in application order
    pub completed: Vec<u64>,
    pub created_folders: Vec<String>,
    pub created_files: Vec<String>,
    /// Files whose content was overwritten
    pub updated_files: Vec<String>,
    /// Nodes replaced because of a file/folder conflict
    pub replaced: Vec<String>,
    /// Pending RunScript steps left for the execution environment
    pub deferred_scripts: Vec<u64>,
}

impl MaterializeReport {
    /// True when the batch neither changed the tree nor any status.
    pub fn is_empty(&self) -> bool {
        self.completed.is_empty()
            && self.created_folders.is_empty()
            && self.created_files.is_empty()
            && self.updated_files.is_empty()
            && self.replaced.is_empty()
    }
}

impl fmt::Display for MaterializeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() && self.deferred_scripts.is_empty() {
            return writeln!(f, "Nothing to materialize.");
        }

        writeln!(f, "Materialized {} step(s).", self.completed.len())?;
        write_paths(f, "Created folders", &self.created_folders)?;
        write_paths(f, "Created files", &self.created_files)?;
        write_paths(f, "Updated files", &self.updated_files)?;
        write_paths(f, "Replaced", &self.replaced)?;

        if !self.deferred_scripts.is_empty() {
            let ids: Vec<String> = self.deferred_scripts.iter().map(u64::to_string).collect();
            writeln!(f, "\n**Scripts awaiting execution:** {}", ids.join(", "))?;
        }

        Ok(())
    }
}

fn write_paths(f: &mut fmt::Formatter<'_>, heading: &str, paths: &[String]) -> fmt::Result {
    if paths.is_empty() {
        return Ok(());
    }
    writeln!(f, "\n**{heading}:**")?;
    for path in paths {
        writeln!(f, "- `{path}`")?;
    }
    Ok(())
}

/// Whether any pending step would change the tree.
pub fn needs_materialize(steps: &[Step]) -> bool {
    steps
        .iter()
        .any(|s| s.is_pending() && s.kind() != StepKind::RunScript)
}

/// Apply every pending step to the tree, in list order.
///
/// CreateFile and EditFile write the file (creating missing folders on the
/// way), CreateFolder creates every folder along its path. Those steps are
/// marked completed. RunScript steps have no tree effect and keep their
/// status. Completed and in-progress steps are skipped.
///
/// # Errors
///
/// Returns [`BuildError::InvalidPath`] for the first step whose path is empty
/// or contains empty, `.` or `..` segments. Nothing is applied in that case.
///
/// # Examples
///
/// ```rust
/// use blueprint_core::materializer::materialize;
/// use blueprint_core::models::{StepAction, StepDraft, StepStatus};
/// use blueprint_core::tree::FileTree;
///
/// let step = StepDraft {
///     title: "Create /src/App.tsx".to_string(),
///     description: None,
///     action: StepAction::CreateFile {
///         path: "/src/App.tsx".to_string(),
///         code: "X".to_string(),
///     },
/// }
/// .into_step(1);
///
/// let out = materialize(&[step], &FileTree::new()).unwrap();
/// assert_eq!(out.steps[0].status, StepStatus::Completed);
/// assert_eq!(out.files.find("/src/App.tsx").and_then(|n| n.content()), Some("X"));
/// ```
pub fn materialize(steps: &[Step], files: &FileTree) -> Result<Materialized> {
    let mut steps = steps.to_vec();
    let mut files = files.clone();
    let mut report = MaterializeReport::default();

    for step in steps.iter_mut().filter(|s| s.is_pending()) {
        match &step.action {
            StepAction::CreateFile { path, code } | StepAction::EditFile { path, code } => {
                let segments = split_path(path, false)?;
                debug!("step {}: writing file {path}", step.id);
                place_file(&mut files.0, "", &segments, code, &mut report);
            }
            StepAction::CreateFolder { path } => {
                let segments = split_path(path, true)?;
                debug!("step {}: ensuring folder {path}", step.id);
                ensure_folders(&mut files.0, "", &segments, &mut report);
            }
            StepAction::RunScript { .. } => {
                report.deferred_scripts.push(step.id);
                continue;
            }
        }

        step.status = StepStatus::Completed;
        report.completed.push(step.id);
    }

    Ok(Materialized {
        steps,
        files,
        report,
    })
}

/// Check that a step path can be placed in the tree: at least one segment,
/// and no empty, `.` or `..` segments.
///
/// The parser and the session apply the same check before steps are stored,
/// so a stored pending step always materializes.
///
/// ```rust
/// use blueprint_core::materializer::validate_path;
///
/// assert!(validate_path("src/App.tsx", false).is_ok());
/// assert!(validate_path("/public/", true).is_ok());
/// assert!(validate_path("src//App.tsx", false).is_err());
/// assert!(validate_path("a/../b", false).is_err());
/// ```
pub fn validate_path(path: &str, is_folder: bool) -> Result<()> {
    split_path(path, is_folder).map(|_| ())
}

/// Split a step path into tree segments.
fn split_path(path: &str, is_folder: bool) -> Result<Vec<&str>> {
    let mut trimmed = path.strip_prefix('/').unwrap_or(path);
    if is_folder {
        trimmed = trimmed.strip_suffix('/').unwrap_or(trimmed);
    }

    if trimmed.is_empty() {
        return Err(BuildError::invalid_path(path, "path has no segments"));
    }

    let segments: Vec<&str> = trimmed.split('/').collect();
    for segment in &segments {
        match *segment {
            "" => return Err(BuildError::invalid_path(path, "empty path segment")),
            "." | ".." => {
                return Err(BuildError::invalid_path(
                    path,
                    format!("relative segment '{segment}' is not allowed"),
                ));
            }
            _ => {}
        }
    }

    Ok(segments)
}

fn place_file(
    level: &mut Vec<FileItem>,
    parent: &str,
    segments: &[&str],
    content: &str,
    report: &mut MaterializeReport,
) {
    let Some((name, rest)) = segments.split_first() else {
        return;
    };
    let path = format!("{parent}/{name}");

    if !rest.is_empty() {
        let index = folder_index(level, name, &path, report);
        if let FileItem::Folder { children, .. } = &mut level[index] {
            place_file(children, &path, rest, content, report);
        }
        return;
    }

    match level.iter().position(|n| n.name() == *name) {
        Some(index) if level[index].is_folder() => {
            warn!("replacing folder {path} with a file");
            level[index] = FileItem::file(*name, path.clone(), content);
            report.replaced.push(path.clone());
            report.created_files.push(path);
        }
        Some(index) => {
            if let FileItem::File {
                content: existing, ..
            } = &mut level[index]
            {
                *existing = content.to_string();
            }
            report.updated_files.push(path);
        }
        None => {
            level.push(FileItem::file(*name, path.clone(), content));
            report.created_files.push(path);
        }
    }
}

fn ensure_folders(
    level: &mut Vec<FileItem>,
    parent: &str,
    segments: &[&str],
    report: &mut MaterializeReport,
) {
    let Some((name, rest)) = segments.split_first() else {
        return;
    };
    let path = format!("{parent}/{name}");
    let index = folder_index(level, name, &path, report);

    if let FileItem::Folder { children, .. } = &mut level[index] {
        ensure_folders(children, &path, rest, report);
    }
}

/// Index of the folder `name` in `level`, creating it (or replacing a file of
/// the same name) when needed.
fn folder_index(
    level: &mut Vec<FileItem>,
    name: &str,
    path: &str,
    report: &mut MaterializeReport,
) -> usize {
    match level.iter().position(|n| n.name() == name) {
        Some(index) if level[index].is_folder() => index,
        Some(index) => {
            warn!("replacing file {path} with a folder");
            level[index] = FileItem::folder(name, path);
            report.replaced.push(path.to_string());
            report.created_folders.push(path.to_string());
            index
        }
        None => {
            level.push(FileItem::folder(name, path));
            report.created_folders.push(path.to_string());
            level.len() - 1
        }
    }
}
