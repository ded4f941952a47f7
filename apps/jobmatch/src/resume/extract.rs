//! Resume text extraction.
//!
//! PDFs are read in-process with `pdf-extract`. Word documents and images
//! shell out to `pandoc` and `tesseract`, which must be on `PATH`.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use tokio::process::Command;
use tracing::{info, warn};

const SHELLOUT_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResumeFormat {
    Pdf,
    Docx,
    Image,
}

impl ResumeFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "pdf" => Some(ResumeFormat::Pdf),
            "docx" => Some(ResumeFormat::Docx),
            "jpg" | "jpeg" | "png" => Some(ResumeFormat::Image),
            _ => None,
        }
    }
}

/// Returns the trimmed resume text, or an empty string when the format is
/// unsupported or extraction fails. Callers treat empty text as a failure.
pub async fn extract_text(path: &Path) -> String {
    let Some(format) = ResumeFormat::from_path(path) else {
        warn!(
            "Unsupported file format for {}. Please use JPG, PNG, PDF, or DOCX.",
            path.display()
        );
        return String::new();
    };

    info!("Extracting {:?} resume text from {}", format, path.display());
    let result = match format {
        ResumeFormat::Pdf => extract_pdf(path).await,
        ResumeFormat::Docx => run_tool(docx_command(path)).await,
        ResumeFormat::Image => run_tool(ocr_command(path)).await,
    };

    match result {
        Ok(text) => text.trim().to_string(),
        Err(e) => {
            warn!("[File Read ERROR] {e:#}");
            String::new()
        }
    }
}

async fn extract_pdf(path: &Path) -> Result<String> {
    let path = path.to_path_buf();
    tokio::task::spawn_blocking(move || pdf_extract::extract_text(&path))
        .await
        .context("PDF extraction task panicked")?
        .map_err(|e| anyhow::anyhow!("Failed to extract text from PDF: {e}"))
}

// pandoc <in> -t plain --wrap=none
fn docx_command(path: &Path) -> Command {
    let mut cmd = Command::new("pandoc");
    cmd.arg(path).arg("-t").arg("plain").arg("--wrap=none");
    cmd
}

// tesseract <in> stdout
fn ocr_command(path: &Path) -> Command {
    let mut cmd = Command::new("tesseract");
    cmd.arg(path).arg("stdout");
    cmd
}

async fn run_tool(mut cmd: Command) -> Result<String> {
    let program = cmd.as_std().get_program().to_string_lossy().to_string();
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true);

    let output = tokio::time::timeout(SHELLOUT_TIMEOUT, cmd.output())
        .await
        .with_context(|| format!("{program} timed out"))?
        .with_context(|| format!("Failed to run {program}; is it installed?"))?;

    if !output.status.success() {
        bail!("{program} exited with {}", output.status);
    }
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}
