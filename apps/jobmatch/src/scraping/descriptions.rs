//! Description Fetcher — concurrent detail-page enrichment in fixed-size batches.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;
use std::time::{Duration, Instant};

use futures::future::join_all;
use scraper::{Html, Selector};
use tracing::{info, warn};

use super::browser::PageLoader;
use crate::models::job::{DescriptionOutcome, JobRecord};

static DESCRIPTION_CONTAINER: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("div[data-automation='jobAdDetails']").expect("static selector must parse")
});
static DESCRIPTION_PARTS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2, p, ul, hr, li").expect("static selector must parse"));

#[derive(Debug, Clone)]
pub struct FetcherSettings {
    pub batch_size: usize,
    /// Pause between batches.
    pub pause: Duration,
    pub settle: Duration,
}

impl Default for FetcherSettings {
    fn default() -> Self {
        Self {
            batch_size: 5,
            pause: Duration::from_secs(1),
            settle: Duration::from_secs(2),
        }
    }
}

pub struct DescriptionFetcher<'a> {
    loader: &'a dyn PageLoader,
    settings: FetcherSettings,
}

impl<'a> DescriptionFetcher<'a> {
    pub fn new(loader: &'a dyn PageLoader, settings: FetcherSettings) -> Self {
        Self { loader, settings }
    }

    /// Fetches every URL, batch by batch. Each URL gets exactly one outcome;
    /// a failed fetch never affects the others.
    pub async fn fetch_all(&self, urls: &[String]) -> HashMap<String, DescriptionOutcome> {
        let started = Instant::now();
        let mut results = HashMap::with_capacity(urls.len());
        let batch_size = self.settings.batch_size.max(1);
        let batch_count = urls.len().div_ceil(batch_size);

        for (index, batch) in urls.chunks(batch_size).enumerate() {
            let outcomes = join_all(
                batch
                    .iter()
                    .map(|url| async move { (url.clone(), self.fetch_one(url).await) }),
            )
            .await;

            let failed = outcomes
                .iter()
                .filter(|(_, o)| matches!(o, DescriptionOutcome::Failed(_)))
                .count();
            if failed > 0 {
                warn!(
                    "Batch {}/{}: {failed} of {} descriptions failed",
                    index + 1,
                    batch_count,
                    batch.len()
                );
            }
            results.extend(outcomes);

            if index + 1 < batch_count {
                tokio::time::sleep(self.settings.pause).await;
            }
        }

        info!(
            "Scraped {} descriptions in {:.2}s",
            results.len(),
            started.elapsed().as_secs_f64()
        );
        results
    }

    async fn fetch_one(&self, url: &str) -> DescriptionOutcome {
        match self.loader.load(url, self.settings.settle).await {
            Ok(html) => match extract_description(&html) {
                Some(text) => DescriptionOutcome::Found(text),
                None => DescriptionOutcome::NotFound,
            },
            Err(e) => {
                warn!("Failed to fetch description from {url}: {e}");
                DescriptionOutcome::Failed(e.to_string())
            }
        }
    }
}

/// Pulls the description text out of a detail page. `None` when the page has
/// no description container.
///
/// Headings, paragraphs, lists and separators are taken in document order;
/// repeated text blocks are kept only once. A `ul` and its `li` items are
/// separate blocks, so list items appear once as the whole list and once each.
pub fn extract_description(html: &str) -> Option<String> {
    let document = Html::parse_document(html);
    let container = document.select(&DESCRIPTION_CONTAINER).next()?;

    let mut seen = HashSet::new();
    let parts: Vec<String> = container
        .select(&DESCRIPTION_PARTS)
        .map(|el| {
            el.text()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join("\n")
        })
        .filter(|text| !text.is_empty() && seen.insert(text.clone()))
        .collect();

    Some(parts.join("\n"))
}

/// Attaches fetched descriptions by `detail_url`. Records with no entry keep
/// `description = None`.
pub fn attach_descriptions(
    records: &mut [JobRecord],
    mut descriptions: HashMap<String, DescriptionOutcome>,
) {
    for record in records.iter_mut() {
        if let Some(outcome) = descriptions.remove(&record.detail_url) {
            record.description = Some(outcome);
        }
    }
}
