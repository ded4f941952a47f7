use thiserror::Error;

use crate::llm_client::LlmError;
use crate::scraping::ScrapeError;

/// Application-level error type.
/// Every variant is fatal for the current run; per-item failures never reach here.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Failed to extract resume text from {0}")]
    EmptyResume(String),

    #[error("Could not parse any job role suggestions")]
    NoRoles,

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Scrape error: {0}")]
    Scrape(#[from] ScrapeError),

    #[error("Export error: {0}")]
    Export(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Short, stable code used in log lines.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::EmptyResume(_) => "EMPTY_RESUME",
            AppError::NoRoles => "NO_ROLES",
            AppError::Llm(_) => "LLM_ERROR",
            AppError::Scrape(_) => "SCRAPE_ERROR",
            AppError::Export(_) => "EXPORT_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(e: std::io::Error) -> Self {
        AppError::Export(e.to_string())
    }
}

impl From<csv::Error> for AppError {
    fn from(e: csv::Error) -> Self {
        AppError::Export(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_distinct_per_variant() {
        assert_eq!(AppError::NoRoles.code(), "NO_ROLES");
        assert_eq!(AppError::Validation("x".into()).code(), "VALIDATION_ERROR");
        assert_eq!(AppError::EmptyResume("cv.pdf".into()).code(), "EMPTY_RESUME");
    }

    #[test]
    fn test_io_error_maps_to_export() {
        let err: AppError = std::io::Error::new(std::io::ErrorKind::Other, "disk full").into();
        assert!(matches!(err, AppError::Export(ref m) if m.contains("disk full")));
    }
}
