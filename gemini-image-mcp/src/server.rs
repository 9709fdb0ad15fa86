//! MCP Server implementation for the Gemini image server.
//!
//! This module provides the MCP server handler that exposes:
//! - `generate_image` tool for text-to-image generation
//! - `edit_image` tool for instruction-based editing of one or more images
//! - `describe_image` tool for image understanding
//! - Resources for models and argument options

use crate::handler::{ImageHandler, ToolOutput};
use crate::request::{
    DescribeImageToolParams, EditImageToolParams, GenerateImageToolParams, ToolKind, ToolRequest,
};
use crate::resources;
use gemini_image_mcp_common::config::Config;
use gemini_image_mcp_common::error::Error;
use rmcp::{
    ErrorData as McpError, ServerHandler,
    model::{
        CallToolResult, Content, JsonObject, ListResourcesResult, ListToolsResult,
        ReadResourceResult, ResourceContents, ServerCapabilities, ServerInfo, Tool,
    },
};
use schemars::JsonSchema;
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// MCP Server for Gemini image generation, editing and description.
#[derive(Clone)]
pub struct ImageServer {
    handler: Arc<ImageHandler>,
}

impl ImageServer {
    /// Create a server that talks to the Gemini API.
    pub fn new(config: Config) -> Self {
        Self::with_handler(ImageHandler::new(config))
    }

    /// Create a server around an existing handler.
    pub fn with_handler(handler: ImageHandler) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    /// Tool definitions advertised to the host.
    pub fn tools() -> Vec<Tool> {
        ToolKind::ALL.into_iter().map(tool_definition).collect()
    }

    /// Run one tool call.
    ///
    /// Never fails: every error, including an unknown tool name, comes back
    /// as an error-shaped tool result with a single text part.
    pub async fn dispatch(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        match self.run_tool(name, arguments).await {
            Ok(output) => CallToolResult::success(output.into_content()),
            Err(e) => {
                if e.is_client_error() {
                    info!(tool = name, error = %e, "Rejected tool call");
                } else {
                    warn!(tool = name, error = %e, "Tool call failed");
                }
                CallToolResult::error(vec![Content::text(e.to_string())])
            }
        }
    }

    async fn run_tool(&self, name: &str, arguments: Option<JsonObject>) -> Result<ToolOutput, Error> {
        let kind = ToolKind::from_name(name).ok_or_else(|| Error::dispatch(name))?;
        let request = ToolRequest::from_arguments(kind, arguments)?;
        self.handler.execute(request).await
    }
}

fn tool_definition(kind: ToolKind) -> Tool {
    let (description, input_schema) = match kind {
        ToolKind::GenerateImage => (
            "Generate an image from a text prompt using Gemini image models. \
             Optionally takes up to 14 reference images as style or content anchors. \
             Returns the image and a status line; set outputPath to also save it locally.",
            input_schema::<GenerateImageToolParams>(),
        ),
        ToolKind::EditImage => (
            "Edit one or more images (up to 14) according to a text instruction using \
             Gemini image models. Returns the edited image and a status line; set \
             outputPath to also save it locally.",
            input_schema::<EditImageToolParams>(),
        ),
        ToolKind::DescribeImage => (
            "Describe or answer questions about one or more images using Gemini. \
             Returns text only.",
            input_schema::<DescribeImageToolParams>(),
        ),
    };

    Tool {
        name: Cow::Borrowed(kind.name()),
        title: None,
        description: Some(Cow::Borrowed(description)),
        input_schema,
        output_schema: None,
        annotations: None,
        icons: None,
        meta: None,
    }
}

fn input_schema<T: JsonSchema>() -> Arc<JsonObject> {
    let schema = schemars::schema_for!(T);
    match serde_json::to_value(&schema).unwrap_or_default() {
        serde_json::Value::Object(map) => Arc::new(map),
        _ => Arc::new(serde_json::Map::new()),
    }
}

impl ServerHandler for ImageServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Image generation server using Google Gemini image models. \
                 Use generate_image to create images from text prompts, \
                 edit_image to modify existing images, \
                 and describe_image to get a text description of images. \
                 Read image://models and image://options for valid argument values."
                    .to_string(),
            ),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_resources()
                .build(),
            ..Default::default()
        }
    }

    fn list_tools(
        &self,
        _params: Option<rmcp::model::PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListToolsResult, McpError>> + Send + '_ {
        async move {
            Ok(ListToolsResult {
                tools: Self::tools(),
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn call_tool(
        &self,
        params: rmcp::model::CallToolRequestParams,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<CallToolResult, McpError>> + Send + '_ {
        async move {
            debug!(tool = %params.name, "Tool call");
            Ok(self.dispatch(&params.name, params.arguments).await)
        }
    }

    fn list_resources(
        &self,
        _params: Option<rmcp::model::PaginatedRequestParams>,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ListResourcesResult, McpError>> + Send + '_ {
        async move {
            debug!("Listing resources");

            let models_resource = rmcp::model::Resource {
                raw: rmcp::model::RawResource {
                    uri: resources::MODELS_URI.to_string(),
                    name: "Available Models".to_string(),
                    title: None,
                    description: Some(
                        "Gemini image models, their aliases and supported image options".to_string(),
                    ),
                    mime_type: Some("application/json".to_string()),
                    size: None,
                    icons: None,
                    meta: None,
                },
                annotations: None,
            };

            let options_resource = rmcp::model::Resource {
                raw: rmcp::model::RawResource {
                    uri: resources::OPTIONS_URI.to_string(),
                    name: "Image Options".to_string(),
                    title: None,
                    description: Some(
                        "Valid aspect ratios, image sizes and image count limits".to_string(),
                    ),
                    mime_type: Some("application/json".to_string()),
                    size: None,
                    icons: None,
                    meta: None,
                },
                annotations: None,
            };

            Ok(ListResourcesResult {
                resources: vec![models_resource, options_resource],
                next_cursor: None,
                meta: None,
            })
        }
    }

    fn read_resource(
        &self,
        params: rmcp::model::ReadResourceRequestParams,
        _context: rmcp::service::RequestContext<rmcp::service::RoleServer>,
    ) -> impl std::future::Future<Output = Result<ReadResourceResult, McpError>> + Send + '_ {
        async move {
            let uri = &params.uri;
            debug!(uri = %uri, "Reading resource");

            let content = resources::read(uri).ok_or_else(|| {
                McpError::resource_not_found(format!("Unknown resource: {}", uri), None)
            })?;

            Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(content, uri.clone())],
            })
        }
    }
}
