use std::fmt;

use serde::{Deserialize, Serialize};

/// Placeholder for card fields the page did not provide.
pub const NOT_AVAILABLE: &str = "N/A";

/// One bound of a salary range. Cards often omit the salary entirely.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SalaryBound {
    Known(u64),
    Unknown,
}

impl fmt::Display for SalaryBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SalaryBound::Known(v) => write!(f, "{v}"),
            SalaryBound::Unknown => f.write_str("unknown"),
        }
    }
}

/// Long-form description state of a listing after enrichment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DescriptionOutcome {
    Found(String),
    /// The detail page loaded but had no description container.
    NotFound,
    /// Navigation or extraction failed for this URL only.
    Failed(String),
}

impl fmt::Display for DescriptionOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DescriptionOutcome::Found(text) => f.write_str(text),
            DescriptionOutcome::NotFound => f.write_str("Description not found"),
            DescriptionOutcome::Failed(msg) => write!(f, "Error: {msg}"),
        }
    }
}

/// One scraped listing. `detail_url` is unique within a collection run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub detail_url: String,
    pub location: String,
    pub work_arrangement: String,
    pub posted_date: String,
    pub min_salary: SalaryBound,
    pub max_salary: SalaryBound,
    /// `None` until the description fetcher has run.
    pub description: Option<DescriptionOutcome>,
}

impl JobRecord {
    /// floor((min + max) / 2) when both bounds are known.
    pub fn average_salary(&self) -> SalaryBound {
        match (self.min_salary, self.max_salary) {
            (SalaryBound::Known(min), SalaryBound::Known(max)) => {
                SalaryBound::Known(min / 2 + max / 2 + (min % 2 + max % 2) / 2)
            }
            _ => SalaryBound::Unknown,
        }
    }

    /// Description text as written to the corpus file.
    pub fn description_text(&self) -> String {
        self.description
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    }
}
