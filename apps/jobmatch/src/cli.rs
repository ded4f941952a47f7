//! Command-line surface. Any value missing from the arguments is prompted for
//! interactively.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::errors::AppError;

#[derive(Debug, Parser)]
#[command(name = "jobmatch", version, about = "Rank job board listings against your resume")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Full flow: resume → role suggestions → scrape → rank.
    Run {
        /// Resume file (PDF, DOCX, JPG, PNG).
        #[arg(long)]
        resume: Option<PathBuf>,
        /// 1-based index into the suggested roles.
        #[arg(long)]
        role_index: Option<String>,
        /// Number of listings to scrape.
        #[arg(long)]
        count: Option<String>,
    },
    /// Scrape and export listings for a role without ranking.
    Scrape {
        #[arg(long)]
        role: String,
        #[arg(long, default_value_t = 20)]
        count: usize,
    },
    /// Rank an exported listings file against a resume.
    Rank {
        #[arg(long)]
        resume: PathBuf,
        #[arg(long)]
        jobs: PathBuf,
        /// Report file; printed only when omitted.
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

/// Line-oriented prompts over any reader/writer pair.
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Prints `message` and reads one trimmed line.
    pub fn ask(&mut self, message: &str) -> Result<String, AppError> {
        write!(self.output, "{message}")?;
        self.output.flush()?;
        let mut line = String::new();
        self.input.read_line(&mut line)?;
        Ok(line.trim().to_string())
    }

    /// Uses `given` when present, otherwise prompts.
    pub fn value_or_ask(&mut self, given: Option<String>, message: &str) -> Result<String, AppError> {
        match given {
            Some(v) => Ok(v),
            None => self.ask(message),
        }
    }
}

/// Parses the listing-count target.
pub fn parse_count(input: &str) -> Result<usize, AppError> {
    match input.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(AppError::Validation(
            "Invalid input. Please enter a positive number.".into(),
        )),
    }
}
