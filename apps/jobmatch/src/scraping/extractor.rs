//! Record Extractor — turns one search-results page into normalized `JobRecord`s.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::warn;
use url::Url;

use super::SITE_ORIGIN;
use crate::models::job::{JobRecord, SalaryBound, NOT_AVAILABLE};

fn selector(css: &str) -> Selector {
    Selector::parse(css).expect("static selector must parse")
}

static CARD_PRIMARY: LazyLock<Selector> =
    LazyLock::new(|| selector("article[data-automation='normalJob']"));
static CARD_FALLBACK: LazyLock<Selector> =
    LazyLock::new(|| selector("div[data-automation='normalJob']"));
static TITLE: LazyLock<Selector> = LazyLock::new(|| selector("a[data-automation='jobTitle']"));
static COMPANY: LazyLock<Selector> =
    LazyLock::new(|| selector("a[data-automation='jobCompany']"));
static LOCATION: LazyLock<Selector> =
    LazyLock::new(|| selector("a[data-automation='jobLocation']"));
static WORK_ARRANGEMENT: LazyLock<Selector> =
    LazyLock::new(|| selector("span[data-testid='work-arrangement']"));
static POSTED_DATE: LazyLock<Selector> =
    LazyLock::new(|| selector("span[data-automation='jobListingDate']"));
static SALARY: LazyLock<Selector> = LazyLock::new(|| selector("span[data-automation='jobSalary']"));
static NEXT_PAGE: LazyLock<Selector> = LazyLock::new(|| selector("a[aria-label='Next']"));

static NUMBER_GROUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\d,]+").expect("static regex must compile"));

/// A card that had a title but could not be turned into a record.
#[derive(Debug, Error)]
pub enum CardError {
    #[error("title link has no href")]
    MissingLink,

    #[error("title element is empty")]
    EmptyTitle,
}

/// Lazily yields one record per listing card. Cards without a title are
/// skipped silently; other broken cards are logged and skipped.
pub fn extract_records(document: &Html) -> impl Iterator<Item = JobRecord> + '_ {
    let mut cards = document.select(&CARD_PRIMARY).peekable();
    let cards: Box<dyn Iterator<Item = ElementRef<'_>> + '_> = if cards.peek().is_some() {
        Box::new(cards)
    } else {
        Box::new(document.select(&CARD_FALLBACK))
    };

    cards.filter_map(|card| match extract_card(card) {
        Ok(record) => record,
        Err(e) => {
            warn!("Error processing job card: {e}");
            None
        }
    })
}

/// `Ok(None)` means the card has no title element at all.
fn extract_card(card: ElementRef<'_>) -> Result<Option<JobRecord>, CardError> {
    let Some(title_el) = card.select(&TITLE).next() else {
        return Ok(None);
    };

    let title = element_text(title_el);
    if title.is_empty() {
        return Err(CardError::EmptyTitle);
    }
    let href = title_el
        .value()
        .attr("href")
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .ok_or(CardError::MissingLink)?;

    let field = |sel: &Selector| {
        card.select(sel)
            .next()
            .map(element_text)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string())
    };

    let salary_text = card.select(&SALARY).next().map(element_text);
    let (min_salary, max_salary) = parse_salary(salary_text.as_deref());

    Ok(Some(JobRecord {
        title,
        company: field(&*COMPANY),
        detail_url: resolve_link(href),
        location: field(&*LOCATION),
        work_arrangement: field(&*WORK_ARRANGEMENT),
        posted_date: field(&*POSTED_DATE),
        min_salary,
        max_salary,
        description: None,
    }))
}

fn element_text(el: ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// Resolves a card link against `SITE_ORIGIN`.
///
/// Absolute http(s) links are kept, root-relative links are prefixed with the
/// origin, and anything else is joined with exactly one slash.
pub fn resolve_link(href: &str) -> String {
    if let Ok(url) = Url::parse(href) {
        if matches!(url.scheme(), "http" | "https") && url.has_host() {
            return href.to_string();
        }
    }
    if href.starts_with('/') && !href.starts_with("//") {
        format!("{SITE_ORIGIN}{href}")
    } else {
        format!("{SITE_ORIGIN}/{}", href.trim_start_matches('/'))
    }
}

/// Parses a salary label into (min, max).
///
/// Two or more numbers give the smallest and largest, one number gives both
/// bounds, and no numbers or "not specified" give unknown bounds.
pub fn parse_salary(text: Option<&str>) -> (SalaryBound, SalaryBound) {
    let unknown = (SalaryBound::Unknown, SalaryBound::Unknown);
    let Some(text) = text.map(str::trim) else {
        return unknown;
    };
    if text.to_lowercase().contains("not specified") {
        return unknown;
    }

    let numbers: Vec<u64> = NUMBER_GROUP
        .find_iter(text)
        .filter_map(|m| m.as_str().replace(',', "").parse().ok())
        .collect();

    match (numbers.iter().min(), numbers.iter().max()) {
        (Some(&min), Some(&max)) => (SalaryBound::Known(min), SalaryBound::Known(max)),
        _ => unknown,
    }
}

/// Href of the "Next" pagination control, resolved against the origin.
pub fn next_page_url(document: &Html) -> Option<String> {
    document
        .select(&NEXT_PAGE)
        .next()
        .and_then(|a| a.value().attr("href"))
        .map(str::trim)
        .filter(|h| !h.is_empty())
        .map(resolve_link)
}
