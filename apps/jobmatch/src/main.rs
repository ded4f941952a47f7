mod cli;
mod config;
mod errors;
mod llm_client;
mod models;
mod pipeline;
mod ranking;
mod resume;
mod scraping;

use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::cli::{parse_count, Cli, Command, Prompter};
use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::pipeline::{
    build_loader, load_resume, rank_file, report_path, save_report, scrape_role, ScrapeSettings,
};
use crate::ranking::ranker::REPORT_HEADER;
use crate::resume::roles::{select_role, suggest_roles};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobmatch v{}", env!("CARGO_PKG_VERSION"));

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Run {
        resume: None,
        role_index: None,
        count: None,
    });

    if let Err(e) = dispatch(command, &config).await {
        error!(code = e.code(), "{e}");
        eprintln!("{e}");
        std::process::exit(1);
    }
    Ok(())
}

async fn dispatch(command: Command, config: &Config) -> Result<(), AppError> {
    match command {
        Command::Run {
            resume,
            role_index,
            count,
        } => {
            let stdin = std::io::stdin();
            let mut prompter = Prompter::new(stdin.lock(), std::io::stdout());
            run_interactive(config, &mut prompter, resume, role_index, count).await
        }
        Command::Scrape { role, count } => {
            let loader = build_loader(config)?;
            let summary = scrape_role(
                loader.as_ref(),
                &ScrapeSettings::from_config(config),
                Path::new(&config.data_dir),
                &role,
                count,
            )
            .await?;
            println!(
                "Saved {} jobs to {} and {}",
                summary.records.len(),
                summary.exports.text.display(),
                summary.exports.csv.display()
            );
            Ok(())
        }
        Command::Rank { resume, jobs, out } => {
            let llm = build_llm(config)?;
            let resume_text = load_resume(&resume).await?;
            let outcome = rank_file(&llm, &resume_text, &jobs, config.chunk_budget).await?;
            let report = outcome.report();
            println!("{report}");
            if let Some(out) = out {
                save_report(&out, &report)?;
                println!("\nRanking results saved to: {}", out.display());
            }
            Ok(())
        }
    }
}

fn build_llm(config: &Config) -> Result<LlmClient, AppError> {
    let api_key = config.require_api_key()?.to_string();
    let llm = LlmClient::new(
        api_key,
        config.gemini_model.clone(),
        config.gemini_base_url.clone(),
    )?;
    info!("LLM client initialized (model: {})", llm.model());
    Ok(llm)
}

async fn run_interactive<R: BufRead, W: Write>(
    config: &Config,
    prompter: &mut Prompter<R, W>,
    resume: Option<PathBuf>,
    role_index: Option<String>,
    count: Option<String>,
) -> Result<(), AppError> {
    let llm = build_llm(config)?;

    let resume_path = match resume {
        Some(p) => p,
        None => PathBuf::from(
            prompter.ask("Enter the full path to your resume file (PDF, DOCX, JPG, PNG): ")?,
        ),
    };

    println!("Extracting resume text...");
    let resume_text = load_resume(&resume_path).await?;

    println!("Analyzing resume to suggest job roles...");
    let suggestions = suggest_roles(&resume_text, &llm).await?;
    println!("\nSuggested Job Roles:\n\n{}", suggestions.raw);

    let selection = prompter.value_or_ask(
        role_index,
        "\nSelect a job role number from the list above (e.g., 1): ",
    )?;
    let role = select_role(&suggestions.roles, &selection)?;

    let count = parse_count(
        &prompter.value_or_ask(count, "Enter the number of job listings to scrape: ")?,
    )?;

    println!("\nStarting job scraping for '{role}' ({count} listings)...");
    let loader = build_loader(config)?;
    let summary = scrape_role(
        loader.as_ref(),
        &ScrapeSettings::from_config(config),
        Path::new(&config.data_dir),
        &role,
        count,
    )
    .await?;
    drop(loader);
    println!(
        "Collected {} listings ({} description errors, {} page errors)",
        summary.records.len(),
        summary.failed_descriptions,
        summary.page_errors.len()
    );

    println!("Ranking jobs based on your resume...");
    let outcome = rank_file(
        &llm,
        &resume_text,
        &summary.exports.text,
        config.chunk_budget,
    )
    .await?;
    let report = outcome.report();

    println!("\n{REPORT_HEADER}\n");
    println!("{}", report.trim_start_matches(REPORT_HEADER).trim_start());

    let output = report_path(&role);
    save_report(&output, &report)?;
    println!("\nRanking results saved to: {}", output.display());
    Ok(())
}
