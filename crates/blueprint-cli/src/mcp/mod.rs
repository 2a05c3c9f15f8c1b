//! MCP server implementation for Blueprint
//!
//! Exposes build sessions to AI assistants over the Model Context Protocol:
//! the assistant answers a build request, hands its response to
//! `ingest_response`, and inspects the resulting tree with the read tools.

use std::{future::Future, sync::Arc};

use anyhow::Result;
use blueprint_core::{
    Workspace,
    params::{CreateSession, Id, IngestResponse, ParseResponse, ReadFile, StartScript},
};
use log::{debug, error, info};
use rmcp::{
    ErrorData as McpError, RoleServer, ServerHandler,
    handler::server::{router::tool::ToolRouter, tool::Parameters},
    model::{
        GetPromptRequestParam, GetPromptResult, Implementation, ListPromptsResult,
        PaginatedRequestParam, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router,
};
use tokio::signal::unix::{SignalKind, signal};

pub mod errors;
pub mod handlers;
pub mod prompts;

pub use handlers::McpResult;

const INSTRUCTIONS: &str = r#"Blueprint turns build instructions written by a language model into a virtual project tree that can be mounted into a sandbox.

## Core Concepts
- **Sessions**: One build conversation with its prompt, steps, and file tree
- **Steps**: Instructions parsed from responses: create file, create folder, edit file, or run script. Status is pending, in-progress, or completed
- **File tree**: Folders and files produced by materializing file steps. Writing an existing path replaces it

## Workflow
1. `create_session` with the user's request
2. Write the answer using `<boltArtifact>`/`<boltAction>` blocks (see the `build` prompt)
3. `ingest_response` parses the answer, appends steps, and materializes them unless `defer` is set
4. Check the result with `show_session`, `show_tree`, and `read_file`
5. `mount_structure` returns the JSON tree a sandbox mounts
6. `start_script` marks a shell step as running

## Tool Categories
- **Sessions**: create_session, list_sessions, show_session
- **Building**: ingest_response, materialize, start_script, parse_response
- **Files**: show_tree, read_file, mount_structure

## Concurrency
Writes to the same session are applied one at a time in arrival order; a failed batch leaves the session unchanged."#;

/// MCP server for Blueprint
#[derive(Clone)]
pub struct BlueprintMcpServer {
    workspace: Arc<Workspace>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl BlueprintMcpServer {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self {
            workspace,
            tool_router: Self::tool_router(),
        }
    }

    fn handlers(&self) -> handlers::McpHandlers {
        handlers::McpHandlers::new(Arc::clone(&self.workspace))
    }

    #[tool(
        name = "create_session",
        description = "Start a new build session. Provide the user's request as `prompt` (required) and an optional `title`; without one the title is taken from the first template artifact. Returns the session ID used by every other tool."
    )]
    async fn create_session(&self, params: Parameters<CreateSession>) -> McpResult {
        self.handlers().create_session(params).await
    }

    #[tool(
        name = "list_sessions",
        description = "List all build sessions, newest first, with their prompts and step progress."
    )]
    async fn list_sessions(&self) -> McpResult {
        self.handlers().list_sessions().await
    }

    #[tool(
        name = "show_session",
        description = "Show one session in full: prompt, every step with its status, and the file tree."
    )]
    async fn show_session(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().show_session(params).await
    }

    #[tool(
        name = "ingest_response",
        description = "Parse a model response containing <boltAction> blocks, append the steps to the session, and apply file steps to the tree. Set `defer` to true to only append; call `materialize` later. Blocks with an unknown type, or a file path that is missing or contains empty, `.` or `..` segments, are skipped; a leading `./` is accepted."
    )]
    async fn ingest_response(&self, params: Parameters<IngestResponse>) -> McpResult {
        self.handlers().ingest_response(params).await
    }

    #[tool(
        name = "materialize",
        description = "Apply every pending file and folder step of a session to its tree. Steps already completed are skipped. Script steps stay pending until `start_script`."
    )]
    async fn materialize(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().materialize(params).await
    }

    #[tool(
        name = "show_tree",
        description = "Show a session's file tree as a nested list. Folders end with `/`."
    )]
    async fn show_tree(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().show_tree(params).await
    }

    #[tool(
        name = "read_file",
        description = "Return the contents of one file in a session's tree. `path` is the full path, e.g. `/src/App.tsx`."
    )]
    async fn read_file(&self, params: Parameters<ReadFile>) -> McpResult {
        self.handlers().read_file(params).await
    }

    #[tool(
        name = "mount_structure",
        description = "Return the session's tree as the JSON mount structure a sandbox filesystem accepts: names map to {\"directory\": {...}} or {\"file\": {\"contents\": \"...\"}}."
    )]
    async fn mount_structure(&self, params: Parameters<Id>) -> McpResult {
        self.handlers().mount_structure(params).await
    }

    #[tool(
        name = "start_script",
        description = "Mark a pending script step as in progress once its command begins running in the sandbox. Only pending run-script steps can be started."
    )]
    async fn start_script(&self, params: Parameters<StartScript>) -> McpResult {
        self.handlers().start_script(params).await
    }

    #[tool(
        name = "parse_response",
        description = "Parse a model response and list the steps it would produce without touching any session. Useful to check an answer before ingesting it."
    )]
    async fn parse_response(&self, params: Parameters<ParseResponse>) -> McpResult {
        self.handlers().parse_response(params).await
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for BlueprintMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: "blueprint".to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
                ..Implementation::from_build_env()
            },
            instructions: Some(INSTRUCTIONS.to_string()),
        }
    }

    async fn list_prompts(
        &self,
        request: Option<PaginatedRequestParam>,
        context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        self.handlers().list_prompts(request, context).await
    }

    async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        self.handlers().get_prompt(request, context).await
    }
}

/// Run the MCP server with stdio transport
pub async fn run_stdio_server(server: BlueprintMcpServer) -> Result<()> {
    use rmcp::{ServiceExt, transport::stdio};

    info!("Starting Blueprint MCP server on stdio");
    debug!(
        "Server created with {} tools",
        server.tool_router.list_all().len()
    );

    let service = server.serve(stdio()).await.inspect_err(|e| {
        error!("serving error: {e:?}");
    })?;

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        result = service.waiting() => {
            match result {
                Ok(_) => info!("MCP server stopped normally"),
                Err(e) => error!("MCP server error: {e:?}"),
            }
        }
        _ = sigint.recv() => {
            info!("Received SIGINT, shutting down");
        }
        _ = sigterm.recv() => {
            info!("Received SIGTERM, shutting down");
        }
    }

    info!("MCP server shutdown complete");
    Ok(())
}
