use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::cli::{
    CatArgs, IdArgs, IngestArgs, MountArgs, ParseArgs, SayArgs, ScriptCommands, SessionCommands,
    TemplateArgs,
};

/// Turn language-model build instructions into a mountable file tree
///
/// Blueprint parses `<boltAction>` instruction blocks out of model responses,
/// records them as steps of a build session, and materializes file steps into
/// a virtual project tree that can be mounted into a sandbox. Sessions are
/// stored in SQLite; the same operations are available to AI assistants
/// through an MCP server.
#[derive(Parser)]
#[command(version, about, name = "bp")]
pub struct Args {
    /// Path to the SQLite database file. Defaults to
    /// $XDG_DATA_HOME/blueprint/blueprint.db
    #[arg(long, global = true)]
    pub database_file: Option<PathBuf>,

    /// Disable colored output and use plain text
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands for the Blueprint CLI
#[derive(Subcommand)]
pub enum Commands {
    /// Manage build sessions
    #[command(alias = "s")]
    Session {
        #[command(subcommand)]
        command: SessionCommands,
    },
    /// Load the starter template response into a session
    Template(TemplateArgs),
    /// Ingest a model response (from FILE or stdin)
    #[command(alias = "i")]
    Ingest(IngestArgs),
    /// Record a follow-up user message
    Say(SayArgs),
    /// Apply pending steps to the session's file tree
    #[command(alias = "m")]
    Materialize(IdArgs),
    /// List a session's steps with their status
    Steps(IdArgs),
    /// Show a session's file tree
    Tree(IdArgs),
    /// Print one file from a session's tree
    Cat(CatArgs),
    /// Print the sandbox mount structure as JSON
    Mount(MountArgs),
    /// Track script steps
    Script {
        #[command(subcommand)]
        command: ScriptCommands,
    },
    /// Parse a response without storing anything
    Parse(ParseArgs),
    /// Start the MCP server
    Serve,
}
