//! MCP tool handlers implementation
//!
//! Tool parameters are the core `params` types directly; the core crate's
//! `schema` feature derives the JSON schemas the tool router publishes.

use std::sync::Arc;

use blueprint_core::{
    BuildError, Workspace,
    display::{BuildResult, CreateResult, Steps, UpdateResult},
    params::{CreateSession, Id, IngestResponse, ParseResponse, ReadFile, StartScript},
};
use log::debug;
use rmcp::{
    ErrorData as McpError, RoleServer,
    handler::server::tool::Parameters,
    model::{
        CallToolResult, Content, GetPromptRequestParam, GetPromptResult, ListPromptsResult,
        PaginatedRequestParam, Prompt, PromptArgument, PromptMessage, PromptMessageContent,
        PromptMessageRole,
    },
    service::RequestContext,
};

use super::{errors::to_mcp_error, prompts::PROMPT_TEMPLATES};

pub type McpResult = Result<CallToolResult, McpError>;

fn text_result(text: impl Into<String>) -> McpResult {
    Ok(CallToolResult::success(vec![Content::text(text.into())]))
}

fn json_result<T: serde::Serialize>(value: &T) -> McpResult {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| McpError::internal_error(format!("Failed to encode result: {e}"), None))?;
    text_result(json)
}

/// Handler implementations for the MCP server
pub struct McpHandlers {
    workspace: Arc<Workspace>,
}

impl McpHandlers {
    pub fn new(workspace: Arc<Workspace>) -> Self {
        Self { workspace }
    }

    pub async fn create_session(
        &self,
        Parameters(params): Parameters<CreateSession>,
    ) -> McpResult {
        debug!("create_session: {params:?}");

        let session = self
            .workspace
            .create_session(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to create session", &e))?;

        text_result(CreateResult::new(session).to_string())
    }

    pub async fn list_sessions(&self) -> McpResult {
        debug!("list_sessions");

        let sessions = self
            .workspace
            .list_sessions()
            .await
            .map_err(|e| to_mcp_error("Failed to list sessions", &e))?;

        text_result(sessions.to_string())
    }

    pub async fn show_session(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_session: {params:?}");

        let session = self
            .workspace
            .get_session(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to show session", &e))?
            .ok_or_else(|| {
                to_mcp_error(
                    "Failed to show session",
                    &BuildError::SessionNotFound { id: params.id },
                )
            })?;

        text_result(session.to_string())
    }

    pub async fn ingest_response(
        &self,
        Parameters(params): Parameters<IngestResponse>,
    ) -> McpResult {
        debug!(
            "ingest_response: session {} ({} bytes, defer={})",
            params.session_id,
            params.response.len(),
            params.defer
        );

        let result = self
            .workspace
            .ingest_response(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to ingest response", &e))?;

        text_result(result.to_string())
    }

    pub async fn materialize(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("materialize: {params:?}");

        let result: BuildResult = self
            .workspace
            .materialize(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to materialize session", &e))?;

        text_result(result.to_string())
    }

    pub async fn show_tree(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("show_tree: {params:?}");

        let tree = self
            .workspace
            .file_tree(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to load file tree", &e))?;

        text_result(tree.to_string())
    }

    pub async fn read_file(&self, Parameters(params): Parameters<ReadFile>) -> McpResult {
        debug!("read_file: {params:?}");

        let content = self
            .workspace
            .read_file(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to read file", &e))?;

        text_result(content)
    }

    pub async fn mount_structure(&self, Parameters(params): Parameters<Id>) -> McpResult {
        debug!("mount_structure: {params:?}");

        let mount = self
            .workspace
            .mount_structure(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to build mount structure", &e))?;

        json_result(&mount)
    }

    pub async fn start_script(&self, Parameters(params): Parameters<StartScript>) -> McpResult {
        debug!("start_script: {params:?}");

        let step = self
            .workspace
            .start_script(&params)
            .await
            .map_err(|e| to_mcp_error("Failed to start script", &e))?;

        let note = format!("Started script step {}", step.id);
        text_result(UpdateResult::new(step, note).to_string())
    }

    pub async fn parse_response(&self, Parameters(params): Parameters<ParseResponse>) -> McpResult {
        debug!("parse_response: {} bytes", params.response.len());

        let steps = self
            .workspace
            .parse_response(&params)
            .into_iter()
            .zip(1..)
            .map(|(draft, id)| draft.into_step(id))
            .collect();

        text_result(Steps(steps).to_string())
    }

    /// List all available prompts
    pub async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        debug!("list_prompts");

        let prompts = PROMPT_TEMPLATES
            .iter()
            .map(|template| {
                Prompt::new(
                    template.name,
                    Some(template.description),
                    Some(
                        template
                            .arguments
                            .iter()
                            .map(|arg| PromptArgument {
                                name: arg.name.to_string(),
                                description: Some(arg.description.to_string()),
                                required: Some(arg.required),
                            })
                            .collect(),
                    ),
                )
            })
            .collect();

        Ok(ListPromptsResult {
            next_cursor: None,
            prompts,
        })
    }

    /// Get a specific prompt by name and apply arguments
    pub async fn get_prompt(
        &self,
        request: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        debug!("get_prompt: {}", request.name);

        let template = PROMPT_TEMPLATES
            .iter()
            .find(|t| t.name == request.name)
            .ok_or_else(|| McpError::invalid_params("Prompt not found", None))?;

        let args = request.arguments.unwrap_or_default();
        for arg in template.arguments.iter().filter(|a| a.required) {
            match args.get(arg.name) {
                Some(value) if value.is_string() => {}
                Some(_) => {
                    return Err(McpError::invalid_params(
                        format!("Argument '{}' must be a string", arg.name),
                        None,
                    ));
                }
                None => {
                    return Err(McpError::invalid_params(
                        format!("Required argument '{}' is missing", arg.name),
                        None,
                    ));
                }
            }
        }

        let prompt_text = template.apply(|name| args.get(name).and_then(|v| v.as_str()));

        Ok(GetPromptResult {
            description: Some(template.description.to_string()),
            messages: vec![PromptMessage {
                role: PromptMessageRole::User,
                content: PromptMessageContent::text(prompt_text),
            }],
        })
    }
}
