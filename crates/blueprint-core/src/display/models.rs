//! Display implementations for domain models.
//!
//! Everything renders as markdown so the terminal renderer and MCP clients
//! can share one format.

use std::fmt;

use super::datetime::LocalDateTime;
use crate::{
    models::{FileItem, Session, SessionSummary, Step, StepAction, StepKind, StepStatus},
    tree::FileTree,
};

impl fmt::Display for StepStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for StepKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "### {}. {} ({})",
            self.id,
            self.title,
            self.status.with_icon()
        )?;
        writeln!(f)?;

        if let Some(desc) = &self.description {
            writeln!(f, "{desc}")?;
            writeln!(f)?;
        }

        match &self.action {
            StepAction::CreateFile { path, .. } | StepAction::EditFile { path, .. } => {
                writeln!(f, "- {}: `{path}`", self.kind().label())?;
                writeln!(f)?;
            }
            StepAction::CreateFolder { path } => {
                writeln!(f, "- folder: `{path}`")?;
                writeln!(f)?;
            }
            StepAction::RunScript { code } => {
                writeln!(f, "```sh")?;
                writeln!(f, "{code}")?;
                writeln!(f, "```")?;
                writeln!(f)?;
            }
        }

        Ok(())
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = if self.title.is_empty() {
            "Untitled session"
        } else {
            &self.title
        };
        writeln!(f, "# {}. {title}", self.id)?;
        writeln!(f)?;

        writeln!(f, "- Prompt: {}", self.prompt)?;
        writeln!(
            f,
            "- Progress: {}/{} steps completed",
            self.completed_steps(),
            self.steps.len()
        )?;
        writeln!(f, "- Files: {}", self.files.file_count())?;
        writeln!(f, "- Created: {}", LocalDateTime(&self.created_at))?;
        writeln!(f, "- Updated: {}", LocalDateTime(&self.updated_at))?;

        if self.steps.is_empty() {
            writeln!(f, "\nNo steps in this session.")?;
        } else {
            writeln!(f, "\n## Steps")?;
            writeln!(f)?;
            for step in &self.steps {
                write!(f, "{step}")?;
            }
        }

        if !self.files.is_empty() {
            writeln!(f, "## Files")?;
            writeln!(f)?;
            write!(f, "{}", self.files)?;
        }

        Ok(())
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let progress = if self.total_steps > 0 {
            format!(" ({}/{})", self.completed_steps, self.total_steps)
        } else {
            String::new()
        };
        let title = if self.title.is_empty() {
            "Untitled session"
        } else {
            &self.title
        };

        writeln!(f, "## {title} (ID: {}){progress}", self.id)?;
        writeln!(f)?;
        writeln!(f, "- **Prompt**: {}", self.prompt)?;
        writeln!(f, "- **Created**: {}", LocalDateTime(&self.created_at))?;
        writeln!(f)?;

        Ok(())
    }
}

/// Nested markdown list; folders carry a trailing `/`.
impl fmt::Display for FileTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return writeln!(f, "No files yet.");
        }
        for node in self.items() {
            write_node(f, node, 0)?;
        }
        Ok(())
    }
}

fn write_node(f: &mut fmt::Formatter<'_>, node: &FileItem, depth: usize) -> fmt::Result {
    let indent = "  ".repeat(depth);
    match node {
        FileItem::Folder { name, children, .. } => {
            writeln!(f, "{indent}- {name}/")?;
            for child in children {
                write_node(f, child, depth + 1)?;
            }
            Ok(())
        }
        FileItem::File { name, .. } => writeln!(f, "{indent}- {name}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_tree_renders_nested_list() {
        let tree = FileTree(vec![
            FileItem::Folder {
                name: "src".to_string(),
                path: "/src".to_string(),
                children: vec![FileItem::file("main.rs", "/src/main.rs", "")],
            },
            FileItem::file("Cargo.toml", "/Cargo.toml", ""),
        ]);

        assert_eq!(tree.to_string(), "- src/\n  - main.rs\n- Cargo.toml\n");
        assert_eq!(FileTree::new().to_string(), "No files yet.\n");
    }

    #[test]
    fn script_step_shows_command_block() {
        let step = Step {
            id: 4,
            title: "Run command".to_string(),
            description: None,
            status: StepStatus::InProgress,
            action: StepAction::RunScript {
                code: "npm install".to_string(),
            },
        };

        let output = step.to_string();
        assert!(output.starts_with("### 4. Run command (➤ In Progress)"));
        assert!(output.contains("```sh\nnpm install\n```"));
    }

    #[test]
    fn session_lists_steps_and_files() {
        let mut session = Session::new(7, "", "a blog");
        session.steps.push(Step {
            id: 1,
            title: "Create index.html".to_string(),
            description: None,
            status: StepStatus::Completed,
            action: StepAction::CreateFile {
                path: "index.html".to_string(),
                code: "<html></html>".to_string(),
            },
        });
        session.files = FileTree(vec![FileItem::file("index.html", "/index.html", "<html></html>")]);

        let output = session.to_string();
        assert!(output.contains("# 7. Untitled session"));
        assert!(output.contains("- Progress: 1/1 steps completed"));
        assert!(output.contains("- file: `index.html`"));
        assert!(output.contains("## Files\n\n- index.html"));
    }
}
