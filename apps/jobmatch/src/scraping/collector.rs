//! Listing Collector — walks search-result pages until the target is met.

use std::collections::HashSet;
use std::time::Duration;

use scraper::Html;
use tracing::{info, warn};

use super::browser::PageLoader;
use super::extractor::{extract_records, next_page_url};
use super::search_url;
use crate::models::job::JobRecord;
use crate::models::Collected;

/// Bounds on pagination so a site that keeps offering "Next" cannot loop forever.
#[derive(Debug, Clone)]
pub struct CollectorSettings {
    pub max_pages: usize,
    /// Consecutive pages that add no unseen listing before giving up.
    pub max_stale_pages: usize,
    pub settle: Duration,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            max_pages: 50,
            max_stale_pages: 2,
            settle: Duration::from_secs(3),
        }
    }
}

struct PageScan {
    records: Vec<JobRecord>,
    next_url: Option<String>,
}

fn scan_page(html: &str) -> PageScan {
    let document = Html::parse_document(html);
    PageScan {
        records: extract_records(&document).collect(),
        next_url: next_page_url(&document),
    }
}

pub struct ListingCollector<'a> {
    loader: &'a dyn PageLoader,
    settings: CollectorSettings,
}

impl<'a> ListingCollector<'a> {
    pub fn new(loader: &'a dyn PageLoader, settings: CollectorSettings) -> Self {
        Self { loader, settings }
    }

    /// Collects up to `target` listings for `role`.
    ///
    /// A page error ends the walk but keeps what was already collected; the
    /// error is returned alongside the records.
    pub async fn collect(&self, role: &str, target: usize) -> Collected<JobRecord> {
        let mut collected = Collected::default();
        let mut seen_urls: HashSet<String> = HashSet::new();
        let mut current_url = search_url(role);
        let mut stale_pages = 0;

        for page in 1..=self.settings.max_pages {
            if collected.items.len() >= target {
                break;
            }

            let html = match self.loader.load(&current_url, self.settings.settle).await {
                Ok(html) => html,
                Err(e) => {
                    warn!("Error on page {page}: {e}");
                    collected.errors.push(format!("page {page}: {e}"));
                    break;
                }
            };

            let scan = scan_page(&html);
            if scan.records.is_empty() {
                info!("Page {page} has no listings; end of results");
                break;
            }

            let before = collected.items.len();
            for record in scan.records {
                if collected.items.len() >= target {
                    break;
                }
                if seen_urls.insert(record.detail_url.clone()) {
                    collected.items.push(record);
                }
            }
            info!("Page {page}: {} jobs collected", collected.items.len());

            if collected.items.len() >= target {
                break;
            }

            if collected.items.len() == before {
                stale_pages += 1;
                if stale_pages >= self.settings.max_stale_pages {
                    warn!("No new listings on {stale_pages} consecutive pages; stopping");
                    break;
                }
            } else {
                stale_pages = 0;
            }

            match scan.next_url {
                Some(next) if next != current_url => current_url = next,
                _ => {
                    info!("No next page after page {page}");
                    break;
                }
            }

            if page == self.settings.max_pages {
                warn!("Reached page limit ({page}); stopping");
            }
        }

        collected
    }
}
