use serde::{Deserialize, Serialize};

/// Feedback issue filed against the project's tracker.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CreateIssueRequest {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CreateIssueResponse {
    pub issue_url: String,
    pub issue_number: u64,
}
