use crate::errors::ToolError;
use crate::services::logger::Logger;
use crate::tools::{ToolName, Toolset};
use crate::utils::suggest::suggest;
use serde_json::Value;
use std::time::Instant;

/// Resolves a tool name to its handler and wraps the outcome in the result
/// envelope. Stateless across calls; the only per-call state is the timing
/// and trace metadata attached to the response.
pub struct ToolExecutor {
    logger: Logger,
    toolset: Toolset,
}

impl ToolExecutor {
    pub fn new(logger: Logger, toolset: Toolset) -> Self {
        Self {
            logger: logger.child("executor"),
            toolset,
        }
    }

    pub async fn execute(&self, name: &str, args: Value) -> Result<Value, ToolError> {
        let Some(tool) = ToolName::parse(name) else {
            return Err(unknown_tool_error(name));
        };
        let trace_id = args
            .get("trace_id")
            .and_then(|v| v.as_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| uuid::Uuid::new_v4().to_string());

        let started = Instant::now();
        self.logger.info(
            "Tool call",
            Some(&serde_json::json!({ "tool": tool.as_str(), "trace_id": trace_id })),
        );
        match self.toolset.dispatch(tool, &args).await {
            Ok(result) => Ok(serde_json::json!({
                "success": true,
                "result": result,
                "meta": {
                    "tool": tool.as_str(),
                    "trace_id": trace_id,
                    "duration_ms": started.elapsed().as_millis() as u64,
                },
            })),
            Err(err) => {
                self.logger.warn(
                    "Tool call failed",
                    Some(&serde_json::json!({
                        "tool": tool.as_str(),
                        "trace_id": trace_id,
                        "code": err.code,
                        "retryable": err.retryable,
                    })),
                );
                Err(err)
            }
        }
    }
}

fn unknown_tool_error(name: &str) -> ToolError {
    let known: Vec<String> = ToolName::ALL
        .iter()
        .map(|tool| tool.as_str().to_string())
        .collect();
    let suggestions = suggest(name, &known, 3);
    let mut hint = format!("Use one of: {}.", known.join(", "));
    if !suggestions.is_empty() {
        hint = format!("Did you mean: {}? {}", suggestions.join(", "), hint);
    }
    ToolError::invalid_params(format!("Unknown tool: {}", name))
        .with_hint(hint)
        .with_details(serde_json::json!({
            "known_tools": known,
            "did_you_mean": suggestions,
        }))
}
