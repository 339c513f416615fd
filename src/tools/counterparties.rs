use crate::errors::ToolError;
use crate::model::{map_list, Counterparty};
use crate::services::logger::Logger;
use crate::upstream::UpstreamClient;
use reqwest::Method;
use serde_json::Value;
use std::sync::Arc;

pub struct CounterpartiesHandler {
    logger: Logger,
    client: Arc<UpstreamClient>,
}

impl CounterpartiesHandler {
    pub fn new(logger: Logger, client: Arc<UpstreamClient>) -> Self {
        Self {
            logger: logger.child("counterparties"),
            client,
        }
    }

    pub async fn list(&self) -> Result<Value, ToolError> {
        let raw = self
            .client
            .request(Method::GET, "counterparties", &[], None)
            .await?;
        let counterparties = map_list(&raw, "counterparties", Counterparty::from_upstream)?;
        self.logger.debug(
            "Listed counterparties",
            Some(&serde_json::json!({ "count": counterparties.len() })),
        );
        Ok(serde_json::json!({
            "counterparties": counterparties,
            "count": counterparties.len(),
        }))
    }
}
