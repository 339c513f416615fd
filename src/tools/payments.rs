use crate::errors::ToolError;
use crate::model::{format_minor, PaymentEntryTemplate};
use crate::services::logger::Logger;
use crate::services::validation::Validation;
use crate::upstream::UpstreamClient;
use reqwest::Method;
use serde_json::Value;
use std::str::FromStr;
use std::sync::Arc;

pub struct PaymentsHandler {
    logger: Logger,
    validation: Validation,
    client: Arc<UpstreamClient>,
}

impl PaymentsHandler {
    pub fn new(logger: Logger, validation: Validation, client: Arc<UpstreamClient>) -> Self {
        Self {
            logger: logger.child("payments"),
            validation,
            client,
        }
    }

    /// Creates a pending-approval payment entry template. This is the only
    /// write path, and two invariants hold unconditionally: the request
    /// always demands approval, and the response is only a success when the
    /// upstream confirms the artifact is still awaiting approval. Identical
    /// concurrent submissions are not deduplicated here; serializing them is
    /// the caller's responsibility.
    pub async fn create_entry_template(&self, args: &Value) -> Result<Value, ToolError> {
        let account_id = self
            .validation
            .ensure_string(args.get("account_id"), "account_id")?;
        let counterparty_id = self
            .validation
            .ensure_string(args.get("counterparty_id"), "counterparty_id")?;
        let amount_minor = self.validation.ensure_amount_minor(args.get("amount_minor"))?;
        let memo = self.validation.ensure_memo(args.get("memo"))?;
        let currency = self
            .validation
            .ensure_optional_string(args.get("currency"), "currency")?;
        let external_id = self
            .validation
            .ensure_optional_string(args.get("external_id"), "external_id")?;

        // The upstream takes decimal amounts; render the minor units exactly
        // via their textual decimal form so no float ever enters the body.
        let amount = serde_json::Number::from_str(&format_minor(amount_minor))
            .map_err(|_| ToolError::internal("Amount rendering produced an invalid number"))?;

        let mut fields = serde_json::Map::new();
        fields.insert("account_id".to_string(), Value::String(account_id));
        fields.insert("counterparty_id".to_string(), Value::String(counterparty_id));
        fields.insert("amount".to_string(), Value::Number(amount));
        fields.insert("requires_approval".to_string(), Value::Bool(true));
        if let Some(memo) = memo {
            fields.insert("memo".to_string(), Value::String(memo));
        }
        if let Some(currency) = currency {
            fields.insert("currency".to_string(), Value::String(currency));
        }
        if let Some(external_id) = external_id {
            fields.insert("external_id".to_string(), Value::String(external_id));
        }
        let body = Value::Object(fields);

        let raw = self
            .client
            .request(Method::POST, "transactions", &[], Some(&body))
            .await?;
        let entry = PaymentEntryTemplate::from_upstream(&raw)?;
        if !entry.is_pending_approval() {
            return Err(ToolError::unexpected_payment_state(format!(
                "Upstream reported payment status '{}' instead of pending approval",
                entry.status
            ))
            .with_details(serde_json::json!({ "entry_id": entry.id, "status": entry.status })));
        }
        self.logger.info(
            "Created payment entry template",
            Some(&serde_json::json!({ "entry_id": entry.id })),
        );
        Ok(serde_json::json!({
            "entry": entry,
            "message": "Payment entry template created; it will not execute until approved",
        }))
    }
}
