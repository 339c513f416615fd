use crate::errors::ToolError;
use crate::model::{map_list, Account};
use crate::services::logger::Logger;
use crate::services::validation::Validation;
use crate::upstream::UpstreamClient;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;

pub struct AccountsHandler {
    logger: Logger,
    validation: Validation,
    client: Arc<UpstreamClient>,
}

impl AccountsHandler {
    pub fn new(logger: Logger, validation: Validation, client: Arc<UpstreamClient>) -> Self {
        Self {
            logger: logger.child("accounts"),
            validation,
            client,
        }
    }

    pub async fn list(&self) -> Result<Value, ToolError> {
        let raw = self.client.request(Method::GET, "accounts", &[], None).await?;
        let accounts = map_list(&raw, "accounts", Account::from_upstream)?;
        self.logger.debug(
            "Listed accounts",
            Some(&serde_json::json!({ "count": accounts.len() })),
        );
        Ok(serde_json::json!({
            "accounts": accounts,
            "count": accounts.len(),
        }))
    }

    /// A 404 here surfaces as `NotFound` so callers can tell "no such
    /// account" apart from every other upstream failure.
    pub async fn get(&self, args: &Value) -> Result<Value, ToolError> {
        let account_id = self
            .validation
            .ensure_string(args.get("account_id"), "account_id")?;
        let raw = self
            .client
            .request(Method::GET, &format!("accounts/{}", account_id), &[], None)
            .await?;
        let account = Account::from_upstream(&raw)?;
        Ok(serde_json::json!({ "account": account }))
    }
}
