//! Persisted stock snapshot.

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;

/// Outcome of the most recent run, persisted between invocations.
///
/// `in_stock == None` means no run has been recorded yet. New fields must
/// stay additive so that older files still load.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StockState {
    pub in_stock: Option<bool>,

    pub availability: Option<String>,

    /// When the snapshot was taken
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checked_at: Option<DateTime<Utc>>,
}

impl StockState {
    /// Snapshot of a completed check, stamped with the current time.
    pub fn observed(in_stock: bool, availability: impl Into<String>) -> Self {
        Self {
            in_stock: Some(in_stock),
            availability: Some(availability.into()),
            checked_at: Some(Utc::now()),
        }
    }

    /// Read a snapshot from a decoded JSON document.
    ///
    /// Each field is read on its own: a missing or wrongly typed field is
    /// `None` without affecting the others. Returns `None` only when the
    /// document is not an object.
    pub fn from_json(value: &Value) -> Option<Self> {
        let fields = value.as_object()?;
        Some(Self {
            in_stock: fields.get("in_stock").and_then(Value::as_bool),
            availability: fields
                .get("availability")
                .and_then(Value::as_str)
                .map(str::to_string),
            checked_at: fields
                .get("checked_at")
                .and_then(Value::as_str)
                .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
                .map(|t| t.with_timezone(&Utc)),
        })
    }
}
