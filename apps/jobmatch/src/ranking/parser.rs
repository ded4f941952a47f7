//! Response Parser — reads `N. <title and company> - <score>/10` entries.
//!
//! The reply grammar is strict: an entry header must match the full line
//! pattern with a score in 1..=10. Every non-blank line after a header, up to
//! the next header, belongs to that entry's explanation. Text before the first
//! header is preamble and ignored.

use std::sync::LazyLock;

use regex::Regex;

use crate::models::ranking::ScoredJob;

/// Literal the model is told to answer with when a chunk holds no listings.
pub const NO_JOBS_MARKER: &str = "No jobs to evaluate";

static ENTRY_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\d+\.\s*(.+?)\s*-\s*(\d+)/10\s*$").expect("static regex must compile")
});

/// Entry whose explanation is still being read.
struct Pending {
    title_company: String,
    score: u8,
    explanation: Vec<String>,
}

impl Pending {
    fn finish(self) -> ScoredJob {
        ScoredJob {
            title_company: self.title_company,
            score: self.score,
            explanation: self.explanation.join(" "),
        }
    }
}

enum State {
    Searching,
    Collecting(Pending),
}

/// Returns `(title_company, score)` if the trimmed line is an entry header.
fn match_header(line: &str) -> Option<(String, u8)> {
    let caps = ENTRY_HEADER.captures(line)?;
    let score: u8 = caps[2].parse().ok()?;
    if !(1..=10).contains(&score) {
        return None;
    }
    Some((caps[1].trim().to_string(), score))
}

/// Parses one chunk's reply. Malformed entries are dropped, never defaulted.
pub fn parse_rankings(reply: &str) -> Vec<ScoredJob> {
    if reply.contains(NO_JOBS_MARKER) {
        return Vec::new();
    }

    let mut entries = Vec::new();
    let mut state = State::Searching;

    for line in reply.lines().map(str::trim) {
        if let Some((title_company, score)) = match_header(line) {
            let next = State::Collecting(Pending {
                title_company,
                score,
                explanation: Vec::new(),
            });
            if let State::Collecting(done) = std::mem::replace(&mut state, next) {
                entries.push(done.finish());
            }
            continue;
        }

        if let State::Collecting(pending) = &mut state {
            if !line.is_empty() {
                pending.explanation.push(line.to_string());
            }
        }
    }

    if let State::Collecting(done) = state {
        entries.push(done.finish());
    }
    entries
}
