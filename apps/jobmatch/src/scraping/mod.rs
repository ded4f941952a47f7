//! Job board scraping — search-result pagination, detail-page enrichment and export.
//!
//! The scraper is bound to one site layout (JobStreet Philippines). All page
//! access goes through `browser::PageLoader` so the collection logic can be
//! driven from fixtures in tests.

use thiserror::Error;

pub mod browser;
pub mod collector;
pub mod descriptions;
pub mod exporter;
pub mod extractor;

/// Origin every relative listing link is resolved against.
pub const SITE_ORIGIN: &str = "https://ph.jobstreet.com";

/// Search results are restricted to this location.
const SEARCH_LOCATION: &str = "in-Metro-Manila";

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Browser error: {0}")]
    Browser(String),

    #[error("Navigation to {url} failed: {message}")]
    Navigation { url: String, message: String },

    #[error("HTTP {status} for {url}")]
    Status { status: u16, url: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Page task failed: {0}")]
    Task(String),
}

/// Lowercases a role and replaces spaces with hyphens: "Data Analyst" → "data-analyst".
pub fn slugify(role: &str) -> String {
    role.trim().to_lowercase().replace(' ', "-")
}

/// Slug safe to embed in a file name. Path separators and other characters
/// outside letters, digits, `-` and `_` become single hyphens.
pub fn file_slug(role: &str) -> String {
    let mut slug = String::new();
    for c in slugify(role).chars() {
        if c.is_alphanumeric() || c == '_' {
            slug.push(c);
        } else if !slug.ends_with('-') {
            slug.push('-');
        }
    }
    slug.trim_matches('-').to_string()
}

/// First results page for a role.
pub fn search_url(role: &str) -> String {
    format!("{SITE_ORIGIN}/{}-jobs/{SEARCH_LOCATION}", slugify(role))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify_lowercases_and_hyphenates() {
        assert_eq!(slugify("  Data Analyst "), "data-analyst");
        assert_eq!(slugify("Senior Backend Engineer"), "senior-backend-engineer");
    }

    #[test]
    fn test_file_slug_strips_path_characters() {
        assert_eq!(file_slug("UI/UX Designer"), "ui-ux-designer");
        assert_eq!(file_slug("C++ / .NET Developer"), "c-net-developer");
        assert_eq!(file_slug("..\\Data Analyst"), "data-analyst");
        assert_eq!(file_slug("Data Analyst"), slugify("Data Analyst"));
    }

    #[test]
    fn test_search_url_template() {
        assert_eq!(
            search_url("Data Analyst"),
            "https://ph.jobstreet.com/data-analyst-jobs/in-Metro-Manila"
        );
    }
}
