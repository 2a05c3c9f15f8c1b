//! Command-line argument wrappers and the command handlers behind them.
//!
//! Each subcommand has a clap `Args` struct that converts into the matching
//! core parameter type, so core params stay free of clap derives:
//!
//! ```text
//! User Input → CLI Args (clap) → Core Params → Workspace → markdown
//! ```
//!
//! Commands that take a response body (`template`, `ingest`, `parse`) read it
//! from FILE when given and from stdin otherwise, which is why their
//! conversions are fallible `into_params` methods instead of `From` impls.

use std::{
    fs,
    io::{self, Read},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result, anyhow};
use blueprint_core::{
    Workspace,
    display::{BuildResult, CreateResult, DeleteResult, Steps, UpdateResult},
    params::*,
};
use clap::{Args, Subcommand};
use log::debug;

use crate::renderer::TerminalRenderer;

// ============================================================================
// CLI Argument Wrappers
// ============================================================================

/// Session management commands
#[derive(Subcommand)]
pub enum SessionCommands {
    /// Create a new build session
    #[command(alias = "new")]
    Create(CreateSessionArgs),
    /// List all sessions, newest first
    #[command(alias = "ls")]
    List,
    /// Show a session with its steps and files
    Show(IdArgs),
    /// Permanently delete a session
    #[command(alias = "rm")]
    Delete(IdArgs),
}

/// Script step commands
#[derive(Subcommand)]
pub enum ScriptCommands {
    /// Mark a pending script step as running
    Start(StartScriptArgs),
}

/// Create a new build session
#[derive(Args)]
pub struct CreateSessionArgs {
    /// What should be built
    pub prompt: String,
    /// Optional title; taken from the template artifact when omitted
    #[arg(short, long)]
    pub title: Option<String>,
}

impl From<CreateSessionArgs> for CreateSession {
    fn from(val: CreateSessionArgs) -> Self {
        CreateSession {
            prompt: val.prompt,
            title: val.title,
        }
    }
}

/// Arguments for commands that act on one session
#[derive(Args)]
pub struct IdArgs {
    /// Session ID
    pub id: u64,
}

impl From<IdArgs> for Id {
    fn from(val: IdArgs) -> Self {
        Id { id: val.id }
    }
}

/// Load the starter template response into a session
#[derive(Args)]
pub struct TemplateArgs {
    /// Session ID
    pub session_id: u64,
    /// File holding the template response; stdin when omitted
    pub file: Option<PathBuf>,
    /// Hidden prompt sent along with the template (repeatable)
    #[arg(short, long = "prompt")]
    pub prompts: Vec<String>,
}

impl TemplateArgs {
    pub fn into_params(self) -> Result<LoadTemplate> {
        Ok(LoadTemplate {
            session_id: self.session_id,
            template: read_input(self.file.as_deref())?,
            prompts: self.prompts,
        })
    }
}

/// Ingest a model response
#[derive(Args)]
pub struct IngestArgs {
    /// Session ID
    pub session_id: u64,
    /// File holding the response; stdin when omitted
    pub file: Option<PathBuf>,
    /// Append the parsed steps without materializing them
    #[arg(long)]
    pub defer: bool,
}

impl IngestArgs {
    pub fn into_params(self) -> Result<IngestResponse> {
        Ok(IngestResponse {
            session_id: self.session_id,
            response: read_input(self.file.as_deref())?,
            defer: self.defer,
        })
    }
}

/// Record a follow-up user message
#[derive(Args)]
pub struct SayArgs {
    /// Session ID
    pub session_id: u64,
    /// Message text
    pub message: String,
}

impl From<SayArgs> for SendMessage {
    fn from(val: SayArgs) -> Self {
        SendMessage {
            session_id: val.session_id,
            content: val.message,
        }
    }
}

/// Print one file from a session's tree
#[derive(Args)]
pub struct CatArgs {
    /// Session ID
    pub session_id: u64,
    /// Full file path, e.g. /src/App.tsx
    pub path: String,
}

impl From<CatArgs> for ReadFile {
    fn from(val: CatArgs) -> Self {
        ReadFile {
            session_id: val.session_id,
            path: val.path,
        }
    }
}

/// Print the sandbox mount structure
#[derive(Args)]
pub struct MountArgs {
    /// Session ID
    pub id: u64,
    /// Print a flat map of relative path to contents instead
    #[arg(long)]
    pub flat: bool,
}

/// Mark a pending script step as running
#[derive(Args)]
pub struct StartScriptArgs {
    /// Session ID
    pub session_id: u64,
    /// Step ID of a pending script step
    pub step_id: u64,
}

impl From<StartScriptArgs> for StartScript {
    fn from(val: StartScriptArgs) -> Self {
        StartScript {
            session_id: val.session_id,
            step_id: val.step_id,
        }
    }
}

/// Parse a response without storing anything
#[derive(Args)]
pub struct ParseArgs {
    /// File holding the response; stdin when omitted
    pub file: Option<PathBuf>,
    /// Print the parsed steps as JSON
    #[arg(long)]
    pub json: bool,
}

impl ParseArgs {
    pub fn into_params(self) -> Result<ParseResponse> {
        Ok(ParseResponse {
            response: read_input(self.file.as_deref())?,
        })
    }
}

/// Read a response body from a file, or from stdin when no file is given.
fn read_input(file: Option<&Path>) -> Result<String> {
    match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            io::stdin()
                .read_to_string(&mut input)
                .context("Failed to read stdin")?;
            Ok(input)
        }
    }
}

// ============================================================================
// Command Handlers
// ============================================================================

/// Runs CLI commands against a workspace and renders the results.
pub struct Cli {
    workspace: Arc<Workspace>,
    renderer: TerminalRenderer,
}

impl Cli {
    pub fn new(workspace: Arc<Workspace>, renderer: TerminalRenderer) -> Self {
        Self {
            workspace,
            renderer,
        }
    }

    pub async fn handle_session_command(&self, command: SessionCommands) -> Result<()> {
        match command {
            SessionCommands::Create(args) => {
                let session = self
                    .workspace
                    .create_session(&args.into())
                    .await
                    .context("Failed to create session")?;
                self.renderer
                    .render(&CreateResult::new(session).to_string())
            }
            SessionCommands::List => self.list_sessions().await,
            SessionCommands::Show(args) => {
                let id: Id = args.into();
                let session = self
                    .workspace
                    .get_session(&id)
                    .await
                    .context("Failed to load session")?
                    .ok_or_else(|| anyhow!("Session {} not found", id.id))?;
                self.renderer.render(&session.to_string())
            }
            SessionCommands::Delete(args) => {
                let session = self
                    .workspace
                    .delete_session(&args.into())
                    .await
                    .context("Failed to delete session")?;
                self.renderer
                    .render(&DeleteResult::new(session).to_string())
            }
        }
    }

    pub async fn list_sessions(&self) -> Result<()> {
        let sessions = self
            .workspace
            .list_sessions()
            .await
            .context("Failed to list sessions")?;
        self.renderer.render(&sessions.to_string())
    }

    pub async fn load_template(&self, args: TemplateArgs) -> Result<()> {
        let params = args.into_params()?;
        let result = self
            .workspace
            .load_template(&params)
            .await
            .context("Failed to load template")?;
        self.render_build(&result)
    }

    pub async fn ingest(&self, args: IngestArgs) -> Result<()> {
        let params = args.into_params()?;
        debug!(
            "ingesting {} bytes into session {}",
            params.response.len(),
            params.session_id
        );
        let result = self
            .workspace
            .ingest_response(&params)
            .await
            .context("Failed to ingest response")?;
        self.render_build(&result)
    }

    pub async fn say(&self, args: SayArgs) -> Result<()> {
        let result = self
            .workspace
            .send_message(&args.into())
            .await
            .context("Failed to record message")?;
        self.render_build(&result)
    }

    pub async fn materialize(&self, args: IdArgs) -> Result<()> {
        let result = self
            .workspace
            .materialize(&args.into())
            .await
            .context("Failed to materialize session")?;
        self.render_build(&result)
    }

    pub async fn steps(&self, args: IdArgs) -> Result<()> {
        let steps = self
            .workspace
            .get_steps(&args.into())
            .await
            .context("Failed to load steps")?;
        self.renderer.render(&steps.to_string())
    }

    pub async fn tree(&self, args: IdArgs) -> Result<()> {
        let tree = self
            .workspace
            .file_tree(&args.into())
            .await
            .context("Failed to load file tree")?;
        self.renderer.render(&tree.to_string())
    }

    /// Prints file contents verbatim; markdown rendering would mangle code.
    pub async fn cat(&self, args: CatArgs) -> Result<()> {
        let content = self
            .workspace
            .read_file(&args.into())
            .await
            .context("Failed to read file")?;
        println!("{content}");
        Ok(())
    }

    pub async fn mount(&self, args: MountArgs) -> Result<()> {
        let id = Id { id: args.id };
        let json = if args.flat {
            let files = self
                .workspace
                .project_files(&id)
                .await
                .context("Failed to collect project files")?;
            serde_json::to_string_pretty(&files)?
        } else {
            let mount = self
                .workspace
                .mount_structure(&id)
                .await
                .context("Failed to build mount structure")?;
            serde_json::to_string_pretty(&mount)?
        };
        println!("{json}");
        Ok(())
    }

    pub async fn handle_script_command(&self, command: ScriptCommands) -> Result<()> {
        match command {
            ScriptCommands::Start(args) => {
                let step = self
                    .workspace
                    .start_script(&args.into())
                    .await
                    .context("Failed to start script")?;
                let note = format!("Started script step {}", step.id);
                self.renderer
                    .render(&UpdateResult::new(step, note).to_string())
            }
        }
    }

    pub fn parse(&self, args: ParseArgs) -> Result<()> {
        let json = args.json;
        let drafts = self.workspace.parse_response(&args.into_params()?);

        if json {
            println!("{}", serde_json::to_string_pretty(&drafts)?);
            return Ok(());
        }

        // Number the drafts the way a fresh session would.
        let steps = drafts
            .into_iter()
            .zip(1..)
            .map(|(draft, id)| draft.into_step(id))
            .collect();
        self.renderer.render(&Steps(steps).to_string())
    }

    fn render_build(&self, result: &BuildResult) -> Result<()> {
        self.renderer.render(&result.to_string())
    }
}
