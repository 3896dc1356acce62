//! Search delegate envelope

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Uniform result of `GET /search`
///
/// Upstream failures never escape as HTTP errors; they land in `error`
/// with empty `hits` and a zero `total`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub hits: Vec<Value>,
    pub total: u64,
    pub error: Option<String>,
    pub warning: Option<Value>,
}

impl SearchResult {
    pub fn found(hits: Vec<Value>, total: u64, warning: Option<Value>) -> Self {
        Self {
            hits,
            total,
            error: None,
            warning,
        }
    }

    pub fn failed(error: impl Into<String>) -> Self {
        Self {
            hits: Vec::new(),
            total: 0,
            error: Some(error.into()),
            warning: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_envelope_keeps_every_key() {
        let json = serde_json::to_value(SearchResult::failed("Network error: refused")).unwrap();
        assert_eq!(json["hits"], serde_json::json!([]));
        assert_eq!(json["total"], 0);
        assert_eq!(json["error"], "Network error: refused");
        assert!(json["warning"].is_null());
        assert!(json.as_object().unwrap().contains_key("warning"));
    }
}
