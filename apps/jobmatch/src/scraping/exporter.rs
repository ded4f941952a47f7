//! Job Exporter — writes enriched listings as a text corpus and a CSV table.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use tracing::info;

use crate::errors::AppError;
use crate::models::job::JobRecord;

pub const CSV_HEADER: [&str; 8] = [
    "Job Title",
    "Company",
    "Location",
    "Work Arrangement",
    "Job Date",
    "Min Salary",
    "Max Salary",
    "Average Salary",
];

/// Where a run's exports were written.
#[derive(Debug, Clone)]
pub struct ExportPaths {
    pub text: PathBuf,
    pub csv: PathBuf,
}

/// Corpus file the ranker reads back for a role slug.
pub fn jobs_text_path(data_dir: &Path, slug: &str) -> PathBuf {
    data_dir.join(format!("jobstreet_{slug}_jobs.txt"))
}

fn jobs_csv_path(data_dir: &Path, slug: &str, count: usize) -> PathBuf {
    data_dir.join(format!("jobstreet_{slug}_{count}_data.csv"))
}

/// Writes both exports under `data_dir`, creating it if needed.
pub fn export_jobs(
    records: &[JobRecord],
    data_dir: &Path,
    slug: &str,
) -> Result<ExportPaths, AppError> {
    std::fs::create_dir_all(data_dir)?;
    let paths = ExportPaths {
        text: jobs_text_path(data_dir, slug),
        csv: jobs_csv_path(data_dir, slug, records.len()),
    };

    write_text(records, &paths.text)?;
    info!("Saved {} jobs to {}", records.len(), paths.text.display());
    write_csv(records, &paths.csv)?;
    info!("Saved CSV to {}", paths.csv.display());

    Ok(paths)
}

/// Numbered `Job N:` blocks, one blank line after each.
pub fn write_text(records: &[JobRecord], path: &Path) -> Result<(), AppError> {
    let mut writer = BufWriter::new(File::create(path)?);
    for (i, job) in records.iter().enumerate() {
        writeln!(writer, "Job {}:", i + 1)?;
        writeln!(writer, "Company: {}", job.company)?;
        writeln!(writer, "Title: {}", job.title)?;
        writeln!(writer, "Description: {}", job.description_text())?;
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_csv(records: &[JobRecord], path: &Path) -> Result<(), AppError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(CSV_HEADER)?;
    for job in records {
        let min_salary = job.min_salary.to_string();
        let max_salary = job.max_salary.to_string();
        let average_salary = job.average_salary().to_string();
        writer.write_record([
            job.title.as_str(),
            job.company.as_str(),
            job.location.as_str(),
            job.work_arrangement.as_str(),
            job.posted_date.as_str(),
            min_salary.as_str(),
            max_salary.as_str(),
            average_salary.as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::job::{DescriptionOutcome, SalaryBound};

    fn records() -> Vec<JobRecord> {
        vec![
            JobRecord {
                title: "Backend Engineer".into(),
                company: "Acme, Inc.".into(),
                detail_url: "https://ph.jobstreet.com/job/1".into(),
                location: "Taguig".into(),
                work_arrangement: "Remote".into(),
                posted_date: "1d ago".into(),
                min_salary: SalaryBound::Known(20_000),
                max_salary: SalaryBound::Known(25_001),
                description: Some(DescriptionOutcome::Found("Rust\nPostgres".into())),
            },
            JobRecord {
                title: "Data Entry".into(),
                company: "Beta".into(),
                detail_url: "https://ph.jobstreet.com/job/2".into(),
                location: "N/A".into(),
                work_arrangement: "N/A".into(),
                posted_date: "N/A".into(),
                min_salary: SalaryBound::Unknown,
                max_salary: SalaryBound::Unknown,
                description: Some(DescriptionOutcome::NotFound),
            },
        ]
    }

    #[test]
    fn test_text_export_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.txt");
        write_text(&records(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            content,
            "Job 1:\nCompany: Acme, Inc.\nTitle: Backend Engineer\nDescription: Rust\nPostgres\n\n\
             Job 2:\nCompany: Beta\nTitle: Data Entry\nDescription: Description not found\n\n"
        );
    }

    #[test]
    fn test_csv_export_average_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jobs.csv");
        write_csv(&records(), &path).unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "Job Title,Company,Location,Work Arrangement,Job Date,Min Salary,Max Salary,Average Salary"
        );
        assert_eq!(
            lines[1],
            "Backend Engineer,\"Acme, Inc.\",Taguig,Remote,1d ago,20000,25001,22500"
        );
        assert_eq!(lines[2], "Data Entry,Beta,N/A,N/A,N/A,unknown,unknown,unknown");
    }

    #[test]
    fn test_export_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");

        let first = export_jobs(&records(), &data_dir, "data-analyst").unwrap();
        let text_a = std::fs::read(&first.text).unwrap();
        let csv_a = std::fs::read(&first.csv).unwrap();

        let second = export_jobs(&records(), &data_dir, "data-analyst").unwrap();
        assert_eq!(first.text, second.text);
        assert_eq!(text_a, std::fs::read(&second.text).unwrap());
        assert_eq!(csv_a, std::fs::read(&second.csv).unwrap());
        assert!(first.csv.ends_with("jobstreet_data-analyst_2_data.csv"));
    }
}
