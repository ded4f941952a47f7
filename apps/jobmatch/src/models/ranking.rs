use serde::{Deserialize, Serialize};

/// One parsed ranking entry. `score` is always within 1..=10.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredJob {
    /// Combined "<title> at <company>" label as echoed by the model.
    pub title_company: String,
    pub score: u8,
    pub explanation: String,
}
