//! Request/query types (Deserialize)

use inner_map_service::DashboardTab;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct SessionsQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Deserialize)]
pub struct DraftRequest {
    #[serde(default)]
    pub draft: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct PreviousRequest {
    /// Draft to keep for the question being left; the saved draft stays when absent.
    pub draft: Option<String>,
}

/// An empty or missing answer is a skip.
#[derive(Debug, Deserialize)]
pub struct AnswerRequest {
    #[serde(default)]
    pub answer: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct FinishRequest {
    /// Final draft for the current question; the saved draft is used when absent.
    pub answer: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DashboardRequest {
    #[serde(default)]
    pub tab: DashboardTab,
}
