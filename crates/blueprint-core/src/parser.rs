//! Instruction parser: model response text to ordered step drafts.
//!
//! The backend answers in a small, fixed instruction vocabulary:
//!
//! ```text
//! <boltArtifact id="todo-app" title="Todo App">
//!   <boltAction type="file" filePath="src/App.tsx">
//!   ...file contents...
//!   </boltAction>
//!   <boltAction type="shell">
//!   npm install
//!   </boltAction>
//! </boltArtifact>
//! ```
//!
//! Each `boltAction` block becomes one [`StepDraft`]: `type="file"` yields a
//! CreateFile draft, `type="shell"` a RunScript draft. Folders are never
//! emitted here; the materializer derives them from file paths.
//!
//! Model output is untrusted. Blocks with a missing or unusable `filePath`
//! (empty, `.` or `..` segments), an empty shell command or an unknown `type`
//! are dropped with a debug log line instead of failing the whole response.
//! A leading `./` is accepted and removed.

use std::sync::LazyLock;

use log::debug;
use regex::Regex;

use crate::{
    materializer::validate_path,
    models::{StepAction, StepDraft},
};

static ACTION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<boltAction\b([^>]*)>(.*?)</boltAction>").expect("valid action regex")
});

static ARTIFACT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<boltArtifact\b([^>]*)>").expect("valid artifact regex"));

static ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([A-Za-z_][\w-]*)\s*=\s*"([^"]*)""#).expect("valid attribute regex")
});

/// Parse one model response into step drafts, in block order.
///
/// Returns an empty vector when the text holds no recognized blocks.
///
/// # Examples
///
/// ```rust
/// use blueprint_core::{parser::parse_instructions, models::StepKind};
///
/// let blob = r#"<boltArtifact id="demo" title="Demo">
/// <boltAction type="file" filePath="index.js">
/// console.log("hi");
/// </boltAction>
/// <boltAction type="shell">
/// node index.js
/// </boltAction>
/// </boltArtifact>"#;
///
/// let drafts = parse_instructions(blob);
/// assert_eq!(drafts.len(), 2);
/// assert_eq!(drafts[0].action.kind(), StepKind::CreateFile);
/// assert_eq!(drafts[0].action.code(), Some("console.log(\"hi\");"));
/// assert_eq!(drafts[1].action.code(), Some("node index.js"));
/// ```
pub fn parse_instructions(blob: &str) -> Vec<StepDraft> {
    ACTION_RE
        .captures_iter(blob)
        .enumerate()
        .filter_map(|(index, caps)| {
            let attrs = caps.get(1).map_or("", |m| m.as_str());
            let body = caps.get(2).map_or("", |m| m.as_str());
            parse_action(index, attrs, body)
        })
        .collect()
}

/// Title attribute of the first artifact in the response, if any.
pub fn artifact_title(blob: &str) -> Option<String> {
    let caps = ARTIFACT_RE.captures(blob)?;
    attribute(caps.get(1)?.as_str(), "title")
        .map(str::trim)
        .filter(|title| !title.is_empty())
        .map(String::from)
}

fn parse_action(index: usize, attrs: &str, body: &str) -> Option<StepDraft> {
    let Some(kind) = attribute(attrs, "type") else {
        debug!("dropping action block {index}: no type attribute");
        return None;
    };

    match kind {
        "file" => {
            let path = attribute(attrs, "filePath")
                .map(|p| p.trim().trim_start_matches("./"))
                .filter(|p| !p.is_empty());
            let Some(path) = path else {
                debug!("dropping file action block {index}: missing filePath");
                return None;
            };
            if let Err(e) = validate_path(path, false) {
                debug!("dropping file action block {index}: {e}");
                return None;
            }
            Some(StepDraft {
                title: format!("Create {path}"),
                description: None,
                action: StepAction::CreateFile {
                    path: path.to_string(),
                    code: strip_block_newlines(body).to_string(),
                },
            })
        }
        "shell" => {
            let command = strip_block_newlines(body);
            if command.trim().is_empty() {
                debug!("dropping shell action block {index}: empty command");
                return None;
            }
            Some(StepDraft {
                title: "Run command".to_string(),
                description: None,
                action: StepAction::RunScript {
                    code: command.to_string(),
                },
            })
        }
        other => {
            debug!("ignoring action block {index}: unknown type '{other}'");
            None
        }
    }
}

/// Value of the first attribute named `name` in a tag's attribute text.
fn attribute<'a>(attrs: &'a str, name: &str) -> Option<&'a str> {
    ATTR_RE
        .captures_iter(attrs)
        .find(|caps| &caps[1] == name)
        .and_then(|caps| caps.get(2))
        .map(|m| m.as_str())
}

/// Remove exactly one leading and one trailing newline, leaving every other
/// byte of the body untouched.
fn strip_block_newlines(body: &str) -> &str {
    let body = body
        .strip_prefix("\r\n")
        .or_else(|| body.strip_prefix('\n'))
        .unwrap_or(body);
    body.strip_suffix("\r\n")
        .or_else(|| body.strip_suffix('\n'))
        .unwrap_or(body)
}
