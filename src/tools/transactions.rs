use crate::errors::ToolError;
use crate::model::{map_list, Transaction};
use crate::services::logger::Logger;
use crate::services::validation::Validation;
use crate::upstream::UpstreamClient;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;

pub struct TransactionsHandler {
    logger: Logger,
    validation: Validation,
    client: Arc<UpstreamClient>,
}

impl TransactionsHandler {
    pub fn new(logger: Logger, validation: Validation, client: Arc<UpstreamClient>) -> Self {
        Self {
            logger: logger.child("transactions"),
            validation,
            client,
        }
    }

    /// One upstream call with the exact validated limit/offset. The upstream
    /// exposes no authoritative total, so `has_more` is inferred from a full
    /// page and is a hint, not a guarantee.
    pub async fn page(&self, args: &Value) -> Result<Value, ToolError> {
        let account_id = self
            .validation
            .ensure_string(args.get("account_id"), "account_id")?;
        let limit = self.validation.ensure_limit(args.get("limit"))?;
        let offset = self.validation.ensure_offset(args.get("offset"))?;

        let query = [
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];
        let raw = self
            .client
            .request(
                Method::GET,
                &format!("accounts/{}/transactions", account_id),
                &query,
                None,
            )
            .await?;
        let transactions = map_list(&raw, "transactions", Transaction::from_upstream)?;
        let has_more = transactions.len() as i64 == limit;
        self.logger.debug(
            "Fetched transaction page",
            Some(&serde_json::json!({
                "count": transactions.len(),
                "limit": limit,
                "offset": offset,
            })),
        );
        Ok(serde_json::json!({
            "transactions": transactions,
            "count": transactions.len(),
            "limit": limit,
            "offset": offset,
            "has_more": has_more,
        }))
    }
}
