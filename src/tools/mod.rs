pub mod accounts;
pub mod counterparties;
pub mod payments;
pub mod transactions;

use crate::errors::ToolError;
use crate::services::logger::Logger;
use crate::services::validation::Validation;
use crate::upstream::UpstreamClient;
use serde_json::Value;
use std::sync::Arc;

/// The closed set of exposed tools. Dispatch is a compile-time-checked match,
/// so adding or removing a capability cannot silently miss a wiring site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    GetAccounts,
    GetAccount,
    GetTransactions,
    CreatePaymentEntryTemplate,
    GetCounterparties,
}

impl ToolName {
    pub const ALL: [ToolName; 5] = [
        ToolName::GetAccounts,
        ToolName::GetAccount,
        ToolName::GetTransactions,
        ToolName::CreatePaymentEntryTemplate,
        ToolName::GetCounterparties,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ToolName::GetAccounts => "get_accounts",
            ToolName::GetAccount => "get_account",
            ToolName::GetTransactions => "get_transactions",
            ToolName::CreatePaymentEntryTemplate => "create_payment_entry_template",
            ToolName::GetCounterparties => "get_counterparties",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|tool| tool.as_str() == name)
    }
}

/// All tool handlers behind one dispatch point. Handlers are stateless
/// between invocations and never call each other.
pub struct Toolset {
    accounts: accounts::AccountsHandler,
    transactions: transactions::TransactionsHandler,
    payments: payments::PaymentsHandler,
    counterparties: counterparties::CounterpartiesHandler,
}

impl Toolset {
    pub fn new(logger: Logger, validation: Validation, client: Arc<UpstreamClient>) -> Self {
        Self {
            accounts: accounts::AccountsHandler::new(
                logger.clone(),
                validation.clone(),
                client.clone(),
            ),
            transactions: transactions::TransactionsHandler::new(
                logger.clone(),
                validation.clone(),
                client.clone(),
            ),
            payments: payments::PaymentsHandler::new(
                logger.clone(),
                validation.clone(),
                client.clone(),
            ),
            counterparties: counterparties::CounterpartiesHandler::new(logger, client),
        }
    }

    pub async fn dispatch(&self, tool: ToolName, args: &Value) -> Result<Value, ToolError> {
        match tool {
            ToolName::GetAccounts => self.accounts.list().await,
            ToolName::GetAccount => self.accounts.get(args).await,
            ToolName::GetTransactions => self.transactions.page(args).await,
            ToolName::CreatePaymentEntryTemplate => {
                self.payments.create_entry_template(args).await
            }
            ToolName::GetCounterparties => self.counterparties.list().await,
        }
    }
}
