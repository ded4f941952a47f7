//! End-to-end run: resume → roles → scrape → export → rank → report.
//!
//! Each stage is a separate function so the CLI can run the scrape and rank
//! halves on their own.

use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::{Config, ScraperBackend};
use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::models::job::{DescriptionOutcome, JobRecord};
use crate::ranking::ranker::{BatchRanker, RankingOutcome};
use crate::resume::extract::extract_text;
use crate::scraping::browser::{ChromeLoader, HttpLoader, PageLoader};
use crate::scraping::collector::{CollectorSettings, ListingCollector};
use crate::scraping::descriptions::{attach_descriptions, DescriptionFetcher, FetcherSettings};
use crate::scraping::exporter::{export_jobs, ExportPaths};
use crate::scraping::{file_slug, ScrapeError};

/// Tuning knobs for one scrape, derived from `Config`.
#[derive(Debug, Clone, Default)]
pub struct ScrapeSettings {
    pub collector: CollectorSettings,
    pub fetcher: FetcherSettings,
}

impl ScrapeSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            collector: CollectorSettings {
                max_pages: config.max_pages,
                ..CollectorSettings::default()
            },
            fetcher: FetcherSettings {
                batch_size: config.batch_size,
                ..FetcherSettings::default()
            },
        }
    }

    /// No waits at all; for fixtures.
    #[cfg(test)]
    pub fn immediate() -> Self {
        use std::time::Duration;

        Self {
            collector: CollectorSettings {
                settle: Duration::ZERO,
                ..CollectorSettings::default()
            },
            fetcher: FetcherSettings {
                batch_size: 5,
                pause: Duration::ZERO,
                settle: Duration::ZERO,
            },
        }
    }
}

#[derive(Debug, Clone)]
pub struct ScrapeSummary {
    pub records: Vec<JobRecord>,
    pub exports: ExportPaths,
    pub page_errors: Vec<String>,
    pub failed_descriptions: usize,
}

pub fn build_loader(config: &Config) -> Result<Box<dyn PageLoader>, ScrapeError> {
    match config.scraper_backend {
        ScraperBackend::Chrome => Ok(Box::new(ChromeLoader::launch(config.headless)?)),
        ScraperBackend::Http => Ok(Box::new(HttpLoader::new()?)),
    }
}

/// Reads the resume; a missing file or empty text aborts the run.
pub async fn load_resume(path: &Path) -> Result<String, AppError> {
    if !path.exists() {
        return Err(AppError::NotFound(format!(
            "{}. Please check the path and try again.",
            path.display()
        )));
    }
    let text = extract_text(path).await;
    if text.is_empty() {
        return Err(AppError::EmptyResume(path.display().to_string()));
    }
    Ok(text)
}

/// Collects listings, attaches descriptions and writes both exports.
pub async fn scrape_role(
    loader: &dyn PageLoader,
    settings: &ScrapeSettings,
    data_dir: &Path,
    role: &str,
    count: usize,
) -> Result<ScrapeSummary, AppError> {
    info!("Step 1: Collecting job links from search results...");
    let collected = ListingCollector::new(loader, settings.collector.clone())
        .collect(role, count)
        .await;
    if !collected.is_clean() {
        warn!(
            "Collection stopped early after {} listings: {}",
            collected.items.len(),
            collected.errors.join("; ")
        );
    }
    let mut records = collected.items;

    info!("Step 2: Scraping {} job descriptions...", records.len());
    let urls: Vec<String> = records.iter().map(|r| r.detail_url.clone()).collect();
    let descriptions = DescriptionFetcher::new(loader, settings.fetcher.clone())
        .fetch_all(&urls)
        .await;
    let failed_descriptions = descriptions
        .values()
        .filter(|d| matches!(d, DescriptionOutcome::Failed(_)))
        .count();
    attach_descriptions(&mut records, descriptions);

    let exports = export_jobs(&records, data_dir, &file_slug(role))?;

    Ok(ScrapeSummary {
        records,
        exports,
        page_errors: collected.errors,
        failed_descriptions,
    })
}

/// Re-reads the exported corpus and ranks it against the resume.
pub async fn rank_file(
    generator: &dyn TextGenerator,
    resume_text: &str,
    jobs_path: &Path,
    chunk_budget: usize,
) -> Result<RankingOutcome, AppError> {
    if !jobs_path.exists() {
        return Err(AppError::NotFound(format!(
            "Scraped job data file {}",
            jobs_path.display()
        )));
    }
    info!("Reading job listings from: {}", jobs_path.display());
    let corpus = std::fs::read_to_string(jobs_path)?;

    let outcome = BatchRanker::new(generator)
        .with_budget(chunk_budget)
        .rank(resume_text, &corpus)
        .await;
    info!(
        "Scored {} chunk(s), skipped {} short chunk(s)",
        outcome.chunks_scored, outcome.chunks_skipped
    );
    if !outcome.errors.is_empty() {
        warn!("{} batch(es) failed during ranking", outcome.errors.len());
    }
    Ok(outcome)
}

pub fn report_path(role: &str) -> PathBuf {
    PathBuf::from(format!("ranked_jobs_{}_output.txt", file_slug(role)))
}

/// Overwrites any previous report at `path`.
pub fn save_report(path: &Path, report: &str) -> Result<(), AppError> {
    std::fs::write(path, report)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::llm_client::LlmError;
    use crate::ranking::chunking::CHUNK_BUDGET;
    use crate::scraping::browser::fakes::FixtureLoader;
    use crate::scraping::exporter::jobs_text_path;

    const SEARCH: &str = "https://ph.jobstreet.com/rust-developer-jobs/in-Metro-Manila";

    fn search_page() -> String {
        r#"<html><body>
            <article data-automation="normalJob">
              <a data-automation="jobTitle" href="/job/1">Rust Developer</a>
              <a data-automation="jobCompany">Acme</a>
              <span data-automation="jobSalary">₱80,000 - ₱120,000</span>
            </article>
            <article data-automation="normalJob">
              <a data-automation="jobTitle" href="/job/2">Backend Developer</a>
              <a data-automation="jobCompany">Beta</a>
            </article>
        </body></html>"#
            .to_string()
    }

    const DETAIL: &str = r#"<div data-automation="jobAdDetails">
        <p>Write async Rust services backed by Postgres and Kafka for a payments platform.</p>
        <ul><li>3+ years Rust</li><li>Tokio experience</li></ul>
    </div>"#;

    struct EchoScores;

    #[async_trait]
    impl TextGenerator for EchoScores {
        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            assert!(prompt.contains("Title: Rust Developer"));
            Ok("1. Backend Developer at Beta - 4/10\nPartial.\n\
                2. Rust Developer at Acme - 9/10\nStrong match."
                .to_string())
        }
    }

    #[tokio::test]
    async fn test_scrape_then_rank_round() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FixtureLoader::default()
            .with_page(SEARCH, &search_page())
            .with_page("https://ph.jobstreet.com/job/1", DETAIL);

        let summary = scrape_role(
            &loader,
            &ScrapeSettings::immediate(),
            dir.path(),
            "Rust Developer",
            5,
        )
        .await
        .unwrap();

        assert_eq!(summary.records.len(), 2);
        assert_eq!(summary.failed_descriptions, 1);
        assert!(summary.page_errors.is_empty());
        assert_eq!(summary.exports.text, jobs_text_path(dir.path(), "rust-developer"));

        let corpus = std::fs::read_to_string(&summary.exports.text).unwrap();
        assert!(corpus.contains("Description: Write async Rust services"));
        assert!(corpus.contains("Description: Error: "));

        let outcome = rank_file(
            &EchoScores,
            "Rust, Tokio",
            &summary.exports.text,
            CHUNK_BUDGET,
        )
        .await
        .unwrap();
        assert_eq!(outcome.entries[0].title_company, "Rust Developer at Acme");
        assert!(outcome.report().starts_with("Job Matches Based on Your Resume:"));
    }

    #[tokio::test]
    async fn test_rank_file_missing_is_fatal() {
        let result = rank_file(
            &EchoScores,
            "resume",
            Path::new("/nonexistent/jobs.txt"),
            CHUNK_BUDGET,
        )
        .await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    struct CountingScores(std::sync::atomic::AtomicUsize);

    #[async_trait]
    impl TextGenerator for CountingScores {
        async fn generate(&self, _prompt: &str) -> Result<String, LlmError> {
            self.0.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
            Ok(String::new())
        }
    }

    #[tokio::test]
    async fn test_rank_file_honours_chunk_budget() {
        let dir = tempfile::tempdir().unwrap();
        let jobs = dir.path().join("jobs.txt");
        let body = "x".repeat(150);
        let corpus: String = (1..=2)
            .map(|n| format!("Job {n}:\nTitle: Engineer {n}\nDescription: {body}\n\n"))
            .collect();
        std::fs::write(&jobs, &corpus).unwrap();

        let generator = CountingScores(Default::default());
        let outcome = rank_file(&generator, "resume", &jobs, 300).await.unwrap();
        assert_eq!(outcome.chunks_scored, 2);
        assert_eq!(generator.0.load(std::sync::atomic::Ordering::SeqCst), 2);

        let generator = CountingScores(Default::default());
        let outcome = rank_file(&generator, "resume", &jobs, CHUNK_BUDGET).await.unwrap();
        assert_eq!(outcome.chunks_scored, 1);
    }

    #[tokio::test]
    async fn test_load_resume_missing_file() {
        let result = load_resume(Path::new("/nonexistent/resume.pdf")).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[test]
    fn test_report_path_uses_slug() {
        assert_eq!(
            report_path("Data Analyst"),
            PathBuf::from("ranked_jobs_data-analyst_output.txt")
        );
        let path = report_path("UI/UX Designer");
        assert_eq!(path, PathBuf::from("ranked_jobs_ui-ux-designer_output.txt"));
        assert_eq!(path.components().count(), 1);
    }

    #[tokio::test]
    async fn test_scrape_role_with_slash_in_role_writes_flat_files() {
        let dir = tempfile::tempdir().unwrap();
        let loader = FixtureLoader::default().with_page(
            "https://ph.jobstreet.com/ui/ux-designer-jobs/in-Metro-Manila",
            &search_page(),
        );

        let summary = scrape_role(
            &loader,
            &ScrapeSettings::immediate(),
            dir.path(),
            "UI/UX Designer",
            2,
        )
        .await
        .unwrap();

        assert_eq!(summary.exports.text, jobs_text_path(dir.path(), "ui-ux-designer"));
        assert_eq!(summary.exports.text.parent(), Some(dir.path()));
        assert!(summary.exports.csv.exists());
    }
}
