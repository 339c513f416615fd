use crate::errors::{ErrorCode, McpError};
use crate::utils::suggest::suggest;
use jsonschema::JSONSchema;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDef {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

static TOOL_CATALOG: Lazy<Vec<ToolDef>> = Lazy::new(|| {
    let raw = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/tool_catalog.json"));
    serde_json::from_str(raw).expect("tool_catalog.json must be valid JSON")
});

static TOOL_VALIDATORS: Lazy<HashMap<String, JSONSchema>> = Lazy::new(|| {
    TOOL_CATALOG
        .iter()
        .map(|tool| {
            let schema = JSONSchema::compile(&tool.input_schema)
                .expect("tool_catalog.json schemas must compile");
            (tool.name.clone(), schema)
        })
        .collect()
});

pub fn tool_catalog() -> &'static [ToolDef] {
    &TOOL_CATALOG
}

pub fn tool_by_name(name: &str) -> Option<&'static ToolDef> {
    TOOL_CATALOG.iter().find(|tool| tool.name == name)
}

/// Schema-checks the raw arguments before the executor ever sees them.
/// Unknown tools pass through here; the executor owns that rejection.
pub fn validate_tool_args(tool_name: &str, args: &Value) -> Result<(), McpError> {
    let Some(tool) = tool_by_name(tool_name) else {
        return Ok(());
    };
    let Some(schema) = TOOL_VALIDATORS.get(tool_name) else {
        return Ok(());
    };
    if let Err(errors) = schema.validate(args) {
        let message = format_schema_errors(tool, errors);
        return Err(McpError::new(ErrorCode::InvalidParams, message));
    }
    Ok(())
}

fn schema_properties(tool: &ToolDef) -> Vec<String> {
    tool.input_schema
        .get("properties")
        .and_then(|v| v.as_object())
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default()
}

fn format_schema_errors(tool: &ToolDef, errors: jsonschema::ErrorIterator) -> String {
    let mut lines = vec![format!("Invalid arguments for {}", tool.name)];
    let mut did_you_means = Vec::new();

    for err in errors.take(10) {
        let instance_path = if err.instance_path.to_string().is_empty() {
            "(root)".to_string()
        } else {
            err.instance_path.to_string()
        };
        match &err.kind {
            jsonschema::error::ValidationErrorKind::AdditionalProperties { unexpected } => {
                for unknown in unexpected {
                    lines.push(format!("- {}: unknown field '{}'", instance_path, unknown));
                    let suggestions = suggest(unknown, &schema_properties(tool), 3);
                    if !suggestions.is_empty() {
                        did_you_means
                            .push(format!("field '{}': {}", unknown, suggestions.join(", ")));
                    }
                }
            }
            jsonschema::error::ValidationErrorKind::Required { property } => {
                let prop = property
                    .as_str()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| property.to_string());
                lines.push(format!(
                    "- {}: missing required field '{}'",
                    instance_path, prop
                ));
            }
            jsonschema::error::ValidationErrorKind::Type { kind } => {
                lines.push(format!(
                    "- {}: expected {}",
                    instance_path,
                    format_type_kind(kind)
                ));
            }
            jsonschema::error::ValidationErrorKind::Minimum { limit } => {
                lines.push(format!("- {}: must be at least {}", instance_path, limit));
            }
            jsonschema::error::ValidationErrorKind::Maximum { limit } => {
                lines.push(format!("- {}: must be at most {}", instance_path, limit));
            }
            _ => {
                lines.push(format!("- {}: {}", instance_path, err));
            }
        }
    }

    if !did_you_means.is_empty() {
        lines.push(format!("Did you mean: {}", did_you_means.join(" | ")));
    }
    lines.join("\n")
}

fn format_type_kind(kind: &jsonschema::error::TypeKind) -> String {
    match kind {
        jsonschema::error::TypeKind::Single(primitive) => primitive.to_string(),
        jsonschema::error::TypeKind::Multiple(types) => {
            let list: Vec<String> = (*types).into_iter().map(|t| t.to_string()).collect();
            if list.is_empty() {
                "unknown".to_string()
            } else {
                list.join(" | ")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::ToolName;
    use serde_json::json;

    #[test]
    fn catalog_and_tool_enum_agree() {
        for tool in tool_catalog() {
            assert!(
                ToolName::parse(&tool.name).is_some(),
                "catalog tool '{}' has no handler",
                tool.name
            );
        }
        for tool in ToolName::ALL {
            assert!(
                tool_by_name(tool.as_str()).is_some(),
                "handler '{}' is missing from the catalog",
                tool.as_str()
            );
        }
    }

    #[test]
    fn schemas_compile_for_every_tool() {
        for tool in tool_catalog() {
            assert!(TOOL_VALIDATORS.contains_key(&tool.name));
        }
    }

    #[test]
    fn valid_args_pass_schema_validation() {
        let args = json!({"account_id": "acct_1", "limit": 10, "offset": 0});
        assert!(validate_tool_args("get_transactions", &args).is_ok());
    }

    #[test]
    fn out_of_range_limit_fails_at_the_schema() {
        let args = json!({"account_id": "acct_1", "limit": 0});
        let err = validate_tool_args("get_transactions", &args).unwrap_err();
        assert!(err.message.contains("limit"));
    }

    #[test]
    fn unknown_field_gets_a_suggestion() {
        let args = json!({"account_id": "acct_1", "limt": 10});
        let err = validate_tool_args("get_transactions", &args).unwrap_err();
        assert!(err.message.contains("unknown field 'limt'"));
        assert!(err.message.contains("Did you mean"));
    }

    #[test]
    fn missing_required_payment_fields_are_reported() {
        let args = json!({"account_id": "acct_1"});
        let err = validate_tool_args("create_payment_entry_template", &args).unwrap_err();
        assert!(err.message.contains("counterparty_id") || err.message.contains("amount_minor"));
    }
}
