//! Blueprint CLI application.
//!
//! Command-line front end and MCP server for build sessions.

mod args;
mod cli;
mod mcp;
mod renderer;

use std::sync::Arc;

use Commands::*;
use anyhow::{Context, Result};
use args::{Args, Commands};
use blueprint_core::WorkspaceBuilder;
use clap::Parser;
use cli::Cli;
use log::info;
use mcp::{BlueprintMcpServer, run_stdio_server};
use renderer::TerminalRenderer;

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let Args {
        database_file,
        no_color,
        command,
    } = Args::parse();

    let workspace = WorkspaceBuilder::new()
        .with_database_path(database_file)
        .build()
        .await
        .map(Arc::new)
        .context("Failed to initialize workspace")?;

    info!(
        "Blueprint started with database {}",
        workspace.database_path().display()
    );

    let cli = Cli::new(Arc::clone(&workspace), TerminalRenderer::new(!no_color));

    match command {
        Some(Session { command }) => cli.handle_session_command(command).await,
        Some(Template(args)) => cli.load_template(args).await,
        Some(Ingest(args)) => cli.ingest(args).await,
        Some(Say(args)) => cli.say(args).await,
        Some(Materialize(args)) => cli.materialize(args).await,
        Some(Steps(args)) => cli.steps(args).await,
        Some(Tree(args)) => cli.tree(args).await,
        Some(Cat(args)) => cli.cat(args).await,
        Some(Mount(args)) => cli.mount(args).await,
        Some(Script { command }) => cli.handle_script_command(command).await,
        Some(Parse(args)) => cli.parse(args),
        Some(Serve) => {
            info!("Starting Blueprint MCP server");
            run_stdio_server(BlueprintMcpServer::new(workspace))
                .await
                .context("MCP server failed")
        }
        None => cli.list_sessions().await,
    }
}
