//! Prompt templates served over MCP.

use std::sync::LazyLock;

/// Argument definition for a prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplateArg {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

/// Definition of a prompt template
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub description: &'static str,
    pub template: &'static str,
    pub arguments: Vec<PromptTemplateArg>,
}

impl PromptTemplate {
    /// Substitute `{name}` placeholders with the given argument values.
    pub fn apply<'a>(&self, mut lookup: impl FnMut(&str) -> Option<&'a str>) -> String {
        let mut text = self.template.to_string();
        for arg in &self.arguments {
            if let Some(value) = lookup(arg.name) {
                text = text.replace(&format!("{{{}}}", arg.name), value);
            }
        }
        text
    }
}

pub static PROMPT_TEMPLATES: LazyLock<Vec<PromptTemplate>> = LazyLock::new(|| {
    vec![PromptTemplate {
        name: "build",
        description: "Answer a build request with Blueprint instruction blocks",
        template: r#"You are **Blueprint Builder**, an engineer who answers build requests with executable instructions.

# Request
{request}

# Answer Format
Explain your plan in a few sentences, then wrap every change in one artifact:

```
<boltArtifact id="kebab-case-id" title="Short Project Title">
<boltAction type="file" filePath="src/App.tsx">
...complete file contents...
</boltAction>
<boltAction type="shell">
npm install
</boltAction>
</boltArtifact>
```

## Rules
- `type="file"` needs a `filePath` relative to the project root. Always write the COMPLETE file; a later block for the same path replaces it.
- `type="shell"` holds one command line to run in the sandbox, e.g. installing dependencies or starting the dev server.
- Folders are created implicitly from file paths; never emit empty folders.
- Never use `..` or `.` segments in paths.
- Blocks are applied in the order you write them, so create files before running commands that need them.

# After Answering
Pass your full answer to the `ingest_response` tool for session {session_id}. Use `show_tree` and `read_file` to check the result, and `start_script` when a shell step begins running."#,
        arguments: vec![
            PromptTemplateArg {
                name: "request",
                description: "What the user wants built",
                required: true,
            },
            PromptTemplateArg {
                name: "session_id",
                description: "ID of the session the answer belongs to",
                required: false,
            },
        ],
    }]
});
