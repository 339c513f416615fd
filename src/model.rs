//! Typed entities and the mapping from upstream JSON into them.
//!
//! Mapping is strict: a missing or malformed required field fails the whole
//! entity. A partially populated balance or amount is more dangerous than an
//! explicit error. Money is represented as signed minor-unit (cent) integers
//! end to end; the mapper parses the upstream's decimal text exactly and
//! refuses precision it cannot represent. Timestamps are normalized to one
//! canonical RFC 3339 UTC form.
//!
//! Each `from_upstream` also accepts its own canonical output (minor-unit
//! fields, normalized timestamps), so mapping is idempotent: remapping a
//! mapped entity yields the same entity.

use crate::errors::ToolError;
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Fraction digits in one upstream currency unit. The upstream reports
/// two-decimal amounts; anything finer is rejected, not rounded.
const CURRENCY_SCALE: u32 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub routing_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available_balance_minor: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_balance_minor: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: String,
    pub account_id: String,
    pub amount_minor: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterparty_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterparty_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub posted_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counterparty {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Routing details sufficient to target a payment; shape owned upstream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_details: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentEntryTemplate {
    pub id: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub account_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub counterparty_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount_minor: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memo: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

impl Account {
    pub fn from_upstream(raw: &Value) -> Result<Self, ToolError> {
        let obj = require_object(raw, "account")?;
        Ok(Self {
            id: require_str(obj, "id", "account")?,
            name: require_str(obj, "name", "account")?,
            kind: optional_str(obj, "kind"),
            status: optional_str(obj, "status"),
            currency: optional_str(obj, "currency"),
            account_number: optional_str(obj, "account_number"),
            routing_number: optional_str(obj, "routing_number"),
            available_balance_minor: optional_minor(
                obj,
                "available_balance_minor",
                "available_balance",
                "account",
            )?,
            current_balance_minor: optional_minor(
                obj,
                "current_balance_minor",
                "current_balance",
                "account",
            )?,
        })
    }
}

impl Transaction {
    pub fn from_upstream(raw: &Value) -> Result<Self, ToolError> {
        let obj = require_object(raw, "transaction")?;
        let amount_minor = match obj.get("amount_minor") {
            Some(value) => require_i64(value, "transaction.amount_minor")?,
            None => to_minor_units(
                obj.get("amount")
                    .ok_or_else(|| missing_field("transaction", "amount"))?,
                "transaction.amount",
            )?,
        };
        let posted_at = match obj.get("posted_at").or_else(|| obj.get("date")) {
            Some(value) if !value.is_null() => {
                Some(normalize_timestamp(value, "transaction.date")?)
            }
            _ => None,
        };
        Ok(Self {
            id: require_str(obj, "id", "transaction")?,
            account_id: require_str(obj, "account_id", "transaction")?,
            amount_minor,
            counterparty_id: optional_str(obj, "counterparty_id"),
            counterparty_name: optional_str(obj, "counterparty_name"),
            memo: optional_str(obj, "memo").or_else(|| optional_str(obj, "description")),
            posted_at,
            status: optional_str(obj, "status"),
            kind: optional_str(obj, "kind"),
        })
    }
}

impl Counterparty {
    pub fn from_upstream(raw: &Value) -> Result<Self, ToolError> {
        let obj = require_object(raw, "counterparty")?;
        Ok(Self {
            id: require_str(obj, "id", "counterparty")?,
            name: require_str(obj, "name", "counterparty")?,
            status: optional_str(obj, "status"),
            payment_details: obj
                .get("payment_details")
                .filter(|v| !v.is_null())
                .cloned(),
        })
    }
}

impl PaymentEntryTemplate {
    pub fn from_upstream(raw: &Value) -> Result<Self, ToolError> {
        let obj = require_object(raw, "payment_entry_template")?;
        let amount_minor = match obj.get("amount_minor") {
            Some(value) => Some(require_i64(value, "payment_entry_template.amount_minor")?),
            None => match obj.get("amount") {
                Some(value) if !value.is_null() => {
                    Some(to_minor_units(value, "payment_entry_template.amount")?)
                }
                _ => None,
            },
        };
        Ok(Self {
            id: require_str(obj, "id", "payment_entry_template")?,
            status: require_str(obj, "status", "payment_entry_template")?,
            account_id: optional_str(obj, "account_id"),
            counterparty_id: optional_str(obj, "counterparty_id"),
            amount_minor,
            memo: optional_str(obj, "memo"),
            external_id: optional_str(obj, "external_id"),
        })
    }

    /// The write-path safety gate: the artifact is only acceptable while the
    /// upstream reports it as awaiting approval.
    pub fn is_pending_approval(&self) -> bool {
        matches!(
            self.status.trim().to_lowercase().replace('-', "_").as_str(),
            "pending" | "pending_approval"
        )
    }
}

pub fn map_list<T>(
    raw: &Value,
    key: &str,
    map_one: impl Fn(&Value) -> Result<T, ToolError>,
) -> Result<Vec<T>, ToolError> {
    let items = raw
        .get(key)
        .and_then(|v| v.as_array())
        .ok_or_else(|| ToolError::mapping(format!("{}: expected an array", key)))?;
    // Upstream order is canonical; preserved as received.
    items
        .iter()
        .enumerate()
        .map(|(idx, item)| {
            map_one(item).map_err(|err| {
                ToolError::mapping(format!("{}[{}]: {}", key, idx, err.message))
            })
        })
        .collect()
}

/// Parses a JSON number or decimal string into minor units exactly, using the
/// textual representation so no float arithmetic is involved. More than
/// `CURRENCY_SCALE` meaningful fraction digits is an error.
pub fn to_minor_units(value: &Value, field: &str) -> Result<i64, ToolError> {
    let text = match value {
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.trim().to_string(),
        _ => {
            return Err(ToolError::mapping(format!(
                "{}: expected a decimal amount",
                field
            )))
        }
    };
    parse_decimal_minor(&text)
        .ok_or_else(|| ToolError::mapping(format!("{}: invalid decimal amount '{}'", field, text)))
}

fn parse_decimal_minor(text: &str) -> Option<i64> {
    if text.is_empty() || text.contains(['e', 'E']) {
        return None;
    }
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text),
    };
    let (int_part, frac_part) = match digits.split_once('.') {
        Some((i, f)) => (i, f),
        None => (digits, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    if !int_part.chars().all(|c| c.is_ascii_digit())
        || !frac_part.chars().all(|c| c.is_ascii_digit())
    {
        return None;
    }
    let scale = CURRENCY_SCALE as usize;
    if frac_part.len() > scale && frac_part[scale..].chars().any(|c| c != '0') {
        return None;
    }
    let mut frac = frac_part.chars().take(scale).collect::<String>();
    while frac.len() < scale {
        frac.push('0');
    }
    let whole: i64 = if int_part.is_empty() {
        0
    } else {
        int_part.parse().ok()?
    };
    let cents: i64 = if frac.is_empty() { 0 } else { frac.parse().ok()? };
    let magnitude = whole
        .checked_mul(10_i64.pow(CURRENCY_SCALE))?
        .checked_add(cents)?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Renders minor units back to the upstream's decimal wire form, e.g.
/// `-1234` → `"-12.34"`.
pub fn format_minor(minor: i64) -> String {
    let magnitude = minor.unsigned_abs();
    let unit = 10_u64.pow(CURRENCY_SCALE);
    let sign = if minor < 0 { "-" } else { "" };
    format!(
        "{}{}.{:0width$}",
        sign,
        magnitude / unit,
        magnitude % unit,
        width = CURRENCY_SCALE as usize
    )
}

/// Normalizes upstream timestamps (RFC 3339 with any offset, or a bare date)
/// to RFC 3339 UTC with second precision.
pub fn normalize_timestamp(value: &Value, field: &str) -> Result<String, ToolError> {
    let text = value
        .as_str()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ToolError::mapping(format!("{}: expected a timestamp string", field)))?;
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Ok(parsed
            .with_timezone(&Utc)
            .to_rfc3339_opts(SecondsFormat::Secs, true));
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        let midnight = date.and_hms_opt(0, 0, 0).ok_or_else(|| {
            ToolError::mapping(format!("{}: invalid date '{}'", field, text))
        })?;
        return Ok(midnight
            .and_utc()
            .to_rfc3339_opts(SecondsFormat::Secs, true));
    }
    Err(ToolError::mapping(format!(
        "{}: unrecognized timestamp '{}'",
        field, text
    )))
}

fn require_object<'a>(
    raw: &'a Value,
    entity: &str,
) -> Result<&'a serde_json::Map<String, Value>, ToolError> {
    raw.as_object()
        .ok_or_else(|| ToolError::mapping(format!("{}: expected an object", entity)))
}

fn require_str(
    obj: &serde_json::Map<String, Value>,
    key: &str,
    entity: &str,
) -> Result<String, ToolError> {
    obj.get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| missing_field(entity, key))
}

fn require_i64(value: &Value, field: &str) -> Result<i64, ToolError> {
    value
        .as_i64()
        .ok_or_else(|| ToolError::mapping(format!("{}: expected an integer", field)))
}

/// Optional monetary field: the canonical minor-unit key wins when present,
/// otherwise the upstream decimal key is converted exactly. Absent or null on
/// both keys is `None`; a malformed value on either is an error, never a
/// partially populated balance.
fn optional_minor(
    obj: &serde_json::Map<String, Value>,
    minor_key: &str,
    decimal_key: &str,
    entity: &str,
) -> Result<Option<i64>, ToolError> {
    if let Some(value) = obj.get(minor_key) {
        if !value.is_null() {
            return require_i64(value, &format!("{}.{}", entity, minor_key)).map(Some);
        }
    }
    match obj.get(decimal_key) {
        Some(value) if !value.is_null() => {
            to_minor_units(value, &format!("{}.{}", entity, decimal_key)).map(Some)
        }
        _ => Ok(None),
    }
}

fn optional_str(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn missing_field(entity: &str, key: &str) -> ToolError {
    ToolError::mapping(format!("{}.{}: missing or invalid required field", entity, key))
}
