//! Core MCP server implementation.

use rmcp::handler::server::router::tool::ToolRouter;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::model::*;
use rmcp::{tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler, ServiceExt};
use schemars::JsonSchema;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info};

use crate::handler::{DialogLauncher, FeedbackResponse};

/// Input parameters for the interactive_feedback tool.
#[derive(Debug, Deserialize, JsonSchema)]
pub struct InteractiveFeedbackInput {
    /// The specific question for the user.
    #[schemars(description = "The specific question for the user")]
    pub message: String,

    /// Predefined options for the user to choose from (optional).
    #[schemars(description = "Predefined options for the user to choose from (optional)")]
    #[serde(default)]
    pub predefined_options: Option<Vec<String>>,
}

/// The interactive feedback MCP server
#[derive(Debug, Clone)]
pub struct FeedbackMcpServer {
    launcher: Arc<DialogLauncher>,
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl FeedbackMcpServer {
    pub fn new(launcher: DialogLauncher) -> Self {
        Self {
            launcher: Arc::new(launcher),
            tool_router: Self::tool_router(),
        }
    }

    #[tool(description = "Request interactive feedback from the user, supporting text and images")]
    async fn interactive_feedback(
        &self,
        Parameters(input): Parameters<InteractiveFeedbackInput>,
    ) -> Result<CallToolResult, McpError> {
        info!("interactive_feedback requested");
        let launcher = Arc::clone(&self.launcher);

        // The dialog blocks until the human answers; keep it off the runtime
        let response = tokio::task::spawn_blocking(move || {
            launcher.interactive_feedback(&input.message, input.predefined_options)
        })
        .await
        .map_err(|e| McpError::internal_error(format!("Feedback task failed: {}", e), None))?
        .map_err(|e| {
            error!("interactive_feedback failed: {}", e);
            McpError::internal_error(e.to_string(), None)
        })?;

        Ok(CallToolResult::success(response_contents(&response)?))
    }
}

/// JSON response first, then one image block per returned image
fn response_contents(response: &FeedbackResponse) -> Result<Vec<Content>, McpError> {
    let mut contents = vec![Content::json(response)?];
    for image in response.images.iter().flatten() {
        contents.push(Content::image(image.content.clone(), image.mime_type()));
    }
    Ok(contents)
}

#[tool_handler]
impl ServerHandler for FeedbackMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "interactive-feedback-mcp".into(),
                version: env!("CARGO_PKG_VERSION").into(),
                title: Some("Interactive Feedback MCP".into()),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Call interactive_feedback whenever you need the user's confirmation, \
                 a decision, or feedback on finished work. The call blocks until the \
                 user answers in a desktop dialog and may return pasted screenshots."
                    .into(),
            ),
        }
    }
}

/// Run the MCP server on stdin/stdout
pub async fn run_server(launcher: DialogLauncher) -> anyhow::Result<()> {
    info!("Dialog program: {}", launcher.program().display());
    let server = FeedbackMcpServer::new(launcher);
    let service = server.serve(rmcp::transport::stdio()).await?;
    service.waiting().await?;
    Ok(())
}
