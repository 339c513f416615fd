use crate::errors::ToolError;
use crate::mcp::catalog::tool_catalog;
use crate::services::credentials::CredentialSources;
use crate::services::logger::Logger;
use crate::services::tool_executor::ToolExecutor;
use crate::services::validation::Validation;
use crate::tools::{ToolName, Toolset};
use crate::upstream::{UpstreamClient, UpstreamConfig};
use std::sync::Arc;

pub struct App {
    pub logger: Logger,
    pub tool_executor: Arc<ToolExecutor>,
}

impl App {
    /// The catalog is data and the dispatch is code; this guards the seam so
    /// a catalog edit without a matching `ToolName` arm fails at startup
    /// instead of at the first unlucky tools/call.
    fn validate_tool_wiring() -> Result<(), ToolError> {
        let mut missing: Vec<String> = tool_catalog()
            .iter()
            .filter(|tool| ToolName::parse(&tool.name).is_none())
            .map(|tool| tool.name.clone())
            .collect();
        if missing.is_empty() {
            return Ok(());
        }
        missing.sort();
        Err(ToolError::internal("Tool wiring is incomplete")
            .with_hint("Every tool in tool_catalog.json must have a ToolName variant.")
            .with_details(serde_json::json!({ "missing_tools": missing })))
    }

    pub fn initialize() -> Result<Self, ToolError> {
        Self::validate_tool_wiring()?;

        let logger = Logger::new("bankgate");
        let validation = Validation::new();
        let sources = CredentialSources::from_env_defaults();
        let config = UpstreamConfig::from_env();
        let client = Arc::new(UpstreamClient::new(logger.clone(), sources, config)?);
        let toolset = Toolset::new(logger.clone(), validation, client);
        let tool_executor = Arc::new(ToolExecutor::new(logger.clone(), toolset));

        Ok(Self {
            logger,
            tool_executor,
        })
    }
}
