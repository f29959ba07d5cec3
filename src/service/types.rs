use serde::{Deserialize, Serialize};

/// Body of `POST /analyze`. Both fields are required; empty strings are allowed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchRequest {
    pub original: String,
    pub user: String,
}

/// Score plus untouched echoes of both inputs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    /// `round(cosine_similarity * 100, 2)`; may be negative.
    pub matching_rate: f64,
    pub original: String,
    pub user: String,
}
