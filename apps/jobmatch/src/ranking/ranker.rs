//! Batch Ranker — scores a listings corpus chunk by chunk and builds the report.

use tracing::{info, warn};

use crate::llm_client::TextGenerator;
use crate::models::ranking::ScoredJob;
use crate::ranking::chunking::{is_scorable, split_corpus, CHUNK_BUDGET};
use crate::ranking::dedup::{remove_duplicates, sort_by_score};
use crate::ranking::parser::parse_rankings;
use crate::ranking::prompts::build_scoring_prompt;

// ────────────────────────────────────────────────────────────────────────────
// Ranking run
// ────────────────────────────────────────────────────────────────────────────

pub const REPORT_HEADER: &str = "Job Matches Based on Your Resume:";

/// Aggregated result of one ranking run.
#[derive(Debug, Clone, Default)]
pub struct RankingOutcome {
    /// Deduplicated, sorted by score descending.
    pub entries: Vec<ScoredJob>,
    pub chunks_scored: usize,
    pub chunks_skipped: usize,
    pub duplicates_removed: usize,
    /// One message per chunk whose scoring call failed.
    pub errors: Vec<String>,
}

impl RankingOutcome {
    pub fn report(&self) -> String {
        render_report(&self.entries)
    }
}

pub struct BatchRanker<'a> {
    generator: &'a dyn TextGenerator,
    budget: usize,
}

impl<'a> BatchRanker<'a> {
    pub fn new(generator: &'a dyn TextGenerator) -> Self {
        Self {
            generator,
            budget: CHUNK_BUDGET,
        }
    }

    pub fn with_budget(mut self, budget: usize) -> Self {
        self.budget = budget.max(1);
        self
    }

    /// Scores every chunk sequentially. A failed chunk is logged and skipped;
    /// the remaining chunks still run.
    pub async fn rank(&self, resume_text: &str, corpus: &str) -> RankingOutcome {
        let mut outcome = RankingOutcome::default();
        let mut all_entries = Vec::new();

        let chunks = split_corpus(corpus, self.budget);
        let total = chunks.len();

        for (i, chunk) in chunks.iter().enumerate() {
            let batch = i + 1;
            if !is_scorable(chunk) {
                info!("Skipping batch {batch}/{total}: too short to score");
                outcome.chunks_skipped += 1;
                continue;
            }

            let prompt = build_scoring_prompt(resume_text, chunk);
            match self.generator.generate(&prompt).await {
                Ok(reply) => {
                    let entries = parse_rankings(&reply);
                    info!("Batch {batch}/{total}: {} scored entries", entries.len());
                    all_entries.extend(entries);
                    outcome.chunks_scored += 1;
                }
                Err(e) => {
                    warn!("Error processing batch {batch}: {e}");
                    outcome.errors.push(format!("batch {batch}: {e}"));
                }
            }
        }

        info!("Analyzing {} job listings...", all_entries.len());

        let before = all_entries.len();
        let mut entries = remove_duplicates(all_entries);
        outcome.duplicates_removed = before - entries.len();
        if outcome.duplicates_removed > 0 {
            info!("Removed {} duplicate(s)", outcome.duplicates_removed);
        }

        sort_by_score(&mut entries);
        outcome.entries = entries;
        outcome
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Report rendering
// ────────────────────────────────────────────────────────────────────────────

/// Numbered report, one blank line between entries.
pub fn render_report(entries: &[ScoredJob]) -> String {
    let mut out = format!("{REPORT_HEADER}\n\n");
    for (i, job) in entries.iter().enumerate() {
        out.push_str(&format!(
            "{}. {} - {}/10\n{}\n\n",
            i + 1,
            job.title_company,
            job.score,
            job.explanation
        ));
    }
    out.trim().to_string()
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;

    use super::*;
    use crate::llm_client::LlmError;

    /// Replays canned replies in order and records every prompt.
    struct ScriptedGenerator {
        replies: Mutex<Vec<Result<String, LlmError>>>,
        prompts: Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(replies: Vec<Result<String, LlmError>>) -> Self {
            Self {
                replies: Mutex::new(replies.into_iter().rev().collect()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn prompts(&self) -> Vec<String> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(&self, prompt: &str) -> Result<String, LlmError> {
            self.prompts.lock().unwrap().push(prompt.to_string());
            self.replies
                .lock()
                .unwrap()
                .pop()
                .unwrap_or(Err(LlmError::EmptyContent))
        }
    }

    fn listing(n: usize, company: &str) -> String {
        format!(
            "Job {n}:\nCompany: {company}\nTitle: Engineer\nDescription: {}\n\n",
            "Builds services in Rust. ".repeat(8)
        )
    }

    #[tokio::test]
    async fn test_single_chunk_ranked_and_sorted() {
        let corpus = listing(1, "Acme") + &listing(2, "Beta");
        let generator = ScriptedGenerator::new(vec![Ok(
            "1. Engineer at Acme - 5/10\nOk.\n2. Engineer at Beta - 9/10\nGreat.".into(),
        )]);

        let outcome = BatchRanker::new(&generator).rank("Rust dev", &corpus).await;

        assert_eq!(outcome.chunks_scored, 1);
        assert_eq!(outcome.entries[0].title_company, "Engineer at Beta");
        assert_eq!(outcome.entries[1].score, 5);
        let prompts = generator.prompts();
        assert!(prompts[0].contains("Rust dev"));
        assert!(prompts[0].contains("Company: Beta"));
    }

    #[tokio::test]
    async fn test_failed_chunk_does_not_abort_others() {
        let corpus: String = (1..=4).map(|n| listing(n, &format!("Co{n}"))).collect();
        let generator = ScriptedGenerator::new(vec![
            Err(LlmError::Api {
                status: 400,
                message: "bad request".into(),
            }),
            Ok("1. Engineer at Co3 - 7/10\nSolid.".into()),
        ]);

        let outcome = BatchRanker::new(&generator)
            .with_budget(600)
            .rank("resume", &corpus)
            .await;

        assert_eq!(generator.prompts().len(), 2);
        assert_eq!(outcome.errors.len(), 1);
        assert!(outcome.errors[0].starts_with("batch 1"));
        assert_eq!(outcome.entries.len(), 1);
        assert_eq!(outcome.entries[0].title_company, "Engineer at Co3");
    }

    #[tokio::test]
    async fn test_tiny_chunk_never_submitted() {
        let generator = ScriptedGenerator::new(vec![]);
        let outcome = BatchRanker::new(&generator)
            .rank("resume", "Job 1:\nCompany: X\n")
            .await;

        assert!(generator.prompts().is_empty());
        assert_eq!(outcome.chunks_skipped, 1);
        assert!(outcome.entries.is_empty());
        assert_eq!(outcome.report(), REPORT_HEADER);
    }

    #[tokio::test]
    async fn test_duplicates_across_chunks_removed() {
        let corpus: String = (1..=4).map(|n| listing(n, "Acme")).collect();
        let generator = ScriptedGenerator::new(vec![
            Ok("1. Backend Engineer at Acme - 6/10\nFirst.".into()),
            Ok("1. backend engineer - Acme - 9/10\nSecond.".into()),
        ]);

        let outcome = BatchRanker::new(&generator)
            .with_budget(600)
            .rank("resume", &corpus)
            .await;

        assert_eq!(outcome.duplicates_removed, 1);
        assert_eq!(outcome.entries.len(), 1);
        assert_eq!(outcome.entries[0].explanation, "First.");
    }

    #[test]
    fn test_render_report_layout() {
        let entries = vec![
            ScoredJob {
                title_company: "Backend Engineer at Acme".into(),
                score: 8,
                explanation: "Great fit.".into(),
            },
            ScoredJob {
                title_company: "Data Entry at Beta".into(),
                score: 2,
                explanation: "Weak fit.".into(),
            },
        ];
        assert_eq!(
            render_report(&entries),
            "Job Matches Based on Your Resume:\n\n\
             1. Backend Engineer at Acme - 8/10\nGreat fit.\n\n\
             2. Data Entry at Beta - 2/10\nWeak fit."
        );
    }
}
