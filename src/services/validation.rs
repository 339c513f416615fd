use crate::constants::limits::MAX_MEMO_LENGTH;
use crate::constants::pagination::{DEFAULT_LIMIT, MAX_LIMIT};
use crate::errors::ToolError;
use serde_json::Value;

/// Pure, deterministic argument checks. Every method fails on the first
/// violated constraint with the offending field named in the message, and
/// none of them touches the network. Out-of-range values are rejected, never
/// clamped: clamping would silently change caller intent.
#[derive(Clone)]
pub struct Validation;

impl Validation {
    pub fn new() -> Self {
        Self
    }

    /// Identifiers are opaque strings owned by the upstream; the only local
    /// constraint is non-emptiness. Content is passed through verbatim,
    /// whitespace included, since the upstream owns the format.
    pub fn ensure_string(&self, value: Option<&Value>, label: &str) -> Result<String, ToolError> {
        let text = value.and_then(|v| v.as_str()).ok_or_else(|| {
            ToolError::invalid_params(format!("{}: must be a non-empty string", label))
        })?;
        if text.trim().is_empty() {
            return Err(ToolError::invalid_params(format!(
                "{}: must be a non-empty string",
                label
            )));
        }
        Ok(text.to_string())
    }

    pub fn ensure_optional_string(
        &self,
        value: Option<&Value>,
        label: &str,
    ) -> Result<Option<String>, ToolError> {
        match value {
            None => Ok(None),
            Some(val) if val.is_null() => Ok(None),
            Some(_) => self.ensure_string(value, label).map(Some),
        }
    }

    pub fn ensure_limit(&self, value: Option<&Value>) -> Result<i64, ToolError> {
        let Some(value) = value else {
            return Ok(DEFAULT_LIMIT);
        };
        if value.is_null() {
            return Ok(DEFAULT_LIMIT);
        }
        let limit = value.as_i64().ok_or_else(|| {
            ToolError::invalid_params(format!(
                "limit: must be an integer between 1 and {}",
                MAX_LIMIT
            ))
        })?;
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(ToolError::invalid_params(format!(
                "limit: must be between 1 and {}, got {}",
                MAX_LIMIT, limit
            )));
        }
        Ok(limit)
    }

    pub fn ensure_offset(&self, value: Option<&Value>) -> Result<i64, ToolError> {
        let Some(value) = value else {
            return Ok(0);
        };
        if value.is_null() {
            return Ok(0);
        }
        let offset = value
            .as_i64()
            .ok_or_else(|| ToolError::invalid_params("offset: must be a non-negative integer"))?;
        if offset < 0 {
            return Err(ToolError::invalid_params(format!(
                "offset: must be non-negative, got {}",
                offset
            )));
        }
        Ok(offset)
    }

    /// Payment amounts arrive as minor-unit (cent) integers. Floats are
    /// rejected outright rather than rounded.
    pub fn ensure_amount_minor(&self, value: Option<&Value>) -> Result<i64, ToolError> {
        let value = value
            .ok_or_else(|| ToolError::invalid_params("amount_minor: field is required"))?;
        let amount = value.as_i64().ok_or_else(|| {
            ToolError::invalid_params(
                "amount_minor: must be an integer number of minor units (no floating point)",
            )
        })?;
        if amount <= 0 {
            return Err(ToolError::invalid_params(format!(
                "amount_minor: must be positive, got {}",
                amount
            )));
        }
        Ok(amount)
    }

    pub fn ensure_memo(&self, value: Option<&Value>) -> Result<Option<String>, ToolError> {
        let Some(memo) = self.ensure_optional_string(value, "memo")? else {
            return Ok(None);
        };
        if memo.chars().count() > MAX_MEMO_LENGTH {
            return Err(ToolError::invalid_params(format!(
                "memo: must be at most {} characters",
                MAX_MEMO_LENGTH
            )));
        }
        Ok(Some(memo))
    }
}

impl Default for Validation {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn v() -> Validation {
        Validation::new()
    }

    #[test]
    fn identifiers_pass_through_verbatim() {
        let id = v()
            .ensure_string(Some(&json!("acct_9Xz-77")), "account_id")
            .unwrap();
        assert_eq!(id, "acct_9Xz-77");
    }

    #[test]
    fn padded_identifier_is_not_normalized() {
        let id = v()
            .ensure_string(Some(&json!("  acct_1  ")), "account_id")
            .unwrap();
        assert_eq!(id, "  acct_1  ");
    }

    #[test]
    fn empty_identifier_is_rejected() {
        let err = v().ensure_string(Some(&json!("   ")), "account_id");
        assert!(err.is_err());
        assert!(err.unwrap_err().message.contains("account_id"));
    }

    #[test]
    fn limit_bounds_are_rejected_not_clamped() {
        assert!(v().ensure_limit(Some(&json!(0))).is_err());
        assert!(v().ensure_limit(Some(&json!(MAX_LIMIT + 1))).is_err());
        assert_eq!(v().ensure_limit(Some(&json!(1))).unwrap(), 1);
        assert_eq!(v().ensure_limit(Some(&json!(MAX_LIMIT))).unwrap(), MAX_LIMIT);
    }

    #[test]
    fn limit_defaults_when_omitted() {
        assert_eq!(v().ensure_limit(None).unwrap(), DEFAULT_LIMIT);
        assert_eq!(v().ensure_limit(Some(&Value::Null)).unwrap(), DEFAULT_LIMIT);
    }

    #[test]
    fn fractional_limit_is_not_an_integer() {
        assert!(v().ensure_limit(Some(&json!(2.5))).is_err());
    }

    #[test]
    fn offset_may_exceed_any_page_but_not_be_negative() {
        assert_eq!(v().ensure_offset(Some(&json!(1_000_000))).unwrap(), 1_000_000);
        assert!(v().ensure_offset(Some(&json!(-1))).is_err());
        assert_eq!(v().ensure_offset(None).unwrap(), 0);
    }

    #[test]
    fn amount_must_be_a_positive_integer() {
        assert_eq!(v().ensure_amount_minor(Some(&json!(12_34))).unwrap(), 1234);
        assert!(v().ensure_amount_minor(Some(&json!(0))).is_err());
        assert!(v().ensure_amount_minor(Some(&json!(-500))).is_err());
        assert!(v().ensure_amount_minor(Some(&json!(19.99))).is_err());
        assert!(v().ensure_amount_minor(None).is_err());
    }

    #[test]
    fn memo_is_optional_but_bounded() {
        assert_eq!(v().ensure_memo(None).unwrap(), None);
        let long = "x".repeat(MAX_MEMO_LENGTH + 1);
        assert!(v().ensure_memo(Some(&json!(long))).is_err());
        let ok = v().ensure_memo(Some(&json!("rent, march"))).unwrap();
        assert_eq!(ok.as_deref(), Some("rent, march"));
    }
}
