use serde::{Deserialize, Serialize};
use validator::Validate;

/// Natural-language search request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SearchRequest {
    #[validate(length(min = 1))]
    pub query: String,
    #[validate(length(min = 1))]
    #[serde(default, alias = "userId")]
    pub user_id: Option<String>,
    /// Falls back to `matching.default_top_k` when absent
    #[validate(range(min = 1, max = 20))]
    #[serde(default, alias = "topK")]
    pub top_k: Option<i64>,
}

/// Query string for the match-for-user endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct MatchQuery {
    #[validate(range(min = 1, max = 20))]
    #[serde(default, alias = "topK")]
    pub top_k: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_request_defaults() {
        let req: SearchRequest = serde_json::from_str(r#"{"query": "hikers in Denver"}"#).unwrap();
        assert!(req.top_k.is_none());
        assert!(req.user_id.is_none());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_search_request_rejects_out_of_range_top_k() {
        let req: SearchRequest =
            serde_json::from_str(r#"{"query": "hikers", "top_k": 0}"#).unwrap();
        assert!(req.validate().is_err());

        let req: SearchRequest =
            serde_json::from_str(r#"{"query": "hikers", "top_k": 21}"#).unwrap();
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_match_query_accepts_camel_case() {
        let query: MatchQuery = serde_json::from_str(r#"{"topK": 7}"#).unwrap();
        assert_eq!(query.top_k, Some(7));
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_search_request_rejects_empty_query() {
        let req: SearchRequest = serde_json::from_str(r#"{"query": ""}"#).unwrap();
        assert!(req.validate().is_err());
    }
}
