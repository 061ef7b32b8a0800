//! Raw Lighthouse audit records as returned by the PageSpeed Insights API
//!
//! Audits are loosely typed upstream: any field may be missing, and
//! `details.items` rows are free-form JSON objects whose keys vary per
//! audit. The typed wrapper below keeps the envelope strongly typed while
//! leaving item rows as `serde_json::Value` for the extraction layer to
//! probe defensively.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;

/// Named-audit map keyed by fixed audit-id strings
/// (e.g. `"unused-javascript"`, `"third-party-summary"`).
pub type AuditMap = HashMap<String, Audit>;

/// A single Lighthouse audit record
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Audit {
    /// Normalized 0-1 score, absent for informational audits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,

    /// How Lighthouse intends the score to be displayed
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_display_mode: Option<String>,

    /// Raw measured value, unit depends on the audit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_value: Option<f64>,

    /// Pre-formatted human string supplied upstream
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_value: Option<String>,

    /// Tabular details, present only for audits that report items
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<AuditDetails>,
}

/// Detail table attached to an audit
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuditDetails {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub detail_type: Option<String>,

    /// Free-form item rows; keys vary per audit id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<Value>>,
}

impl Audit {
    /// Item rows of this audit, or an empty slice when the audit carries no
    /// detail table. Extractors rely on this never failing.
    pub fn items(&self) -> &[Value] {
        self.details
            .as_ref()
            .and_then(|d| d.items.as_deref())
            .unwrap_or(&[])
    }
}

/// Item rows for the named audit, or an empty slice when the audit is
/// absent entirely.
pub fn audit_items<'a>(audits: &'a AuditMap, id: &str) -> &'a [Value] {
    audits.get(id).map(Audit::items).unwrap_or(&[])
}

/// Numeric value of the named audit, if both exist.
pub fn audit_numeric(audits: &AuditMap, id: &str) -> Option<f64> {
    audits.get(id).and_then(|a| a.numeric_value)
}

/// String field of an item row.
pub fn item_str<'a>(item: &'a Value, key: &str) -> Option<&'a str> {
    item.get(key).and_then(Value::as_str)
}

/// Numeric field of an item row. Lighthouse emits both integers and
/// floats for byte/ms columns; both coerce here.
pub fn item_f64(item: &Value, key: &str) -> Option<f64> {
    item.get(key).and_then(Value::as_f64)
}

/// Numeric field of an item row, clamped to a non-negative whole number.
/// Size-based magnitudes in issue records are contractually >= 0.
pub fn item_bytes(item: &Value, key: &str) -> u64 {
    item_f64(item, key).map(|v| v.max(0.0).round() as u64).unwrap_or(0)
}

/// Millisecond field of an item row, defaulting to 0 and clamped to >= 0.
pub fn item_ms(item: &Value, key: &str) -> f64 {
    item_f64(item, key).map(|v| v.max(0.0)).unwrap_or(0.0)
}

/// Rows of an item's nested `subItems.items` table, or empty.
pub fn sub_items(item: &Value) -> &[Value] {
    item.get("subItems")
        .and_then(|s| s.get("items"))
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_audit_deserializes_from_camel_case() {
        let audit: Audit = serde_json::from_value(json!({
            "score": 0.45,
            "scoreDisplayMode": "numeric",
            "numericValue": 3200.0,
            "displayValue": "3.2 s",
            "details": {
                "type": "table",
                "items": [{"url": "https://example.com/app.js", "wastedBytes": 1024}]
            }
        }))
        .unwrap();

        assert_eq!(audit.score, Some(0.45));
        assert_eq!(audit.numeric_value, Some(3200.0));
        assert_eq!(audit.items().len(), 1);
    }

    #[test]
    fn test_items_empty_when_details_absent() {
        let audit: Audit = serde_json::from_value(json!({"score": 1.0})).unwrap();
        assert!(audit.items().is_empty());
    }

    #[test]
    fn test_audit_items_missing_audit() {
        let audits = AuditMap::new();
        assert!(audit_items(&audits, "unused-javascript").is_empty());
        assert!(audit_numeric(&audits, "largest-contentful-paint").is_none());
    }

    #[test]
    fn test_item_bytes_clamps_negative() {
        let item = json!({"wastedBytes": -500});
        assert_eq!(item_bytes(&item, "wastedBytes"), 0);
    }

    #[test]
    fn test_item_bytes_handles_float() {
        let item = json!({"wastedBytes": 1023.6});
        assert_eq!(item_bytes(&item, "wastedBytes"), 1024);
    }

    #[test]
    fn test_sub_items_absent() {
        let item = json!({"url": "https://example.com"});
        assert!(sub_items(&item).is_empty());
    }

    #[test]
    fn test_sub_items_present() {
        let item = json!({
            "subItems": {"items": [{"signal": "Array.prototype.includes"}]}
        });
        assert_eq!(sub_items(&item).len(), 1);
    }
}
