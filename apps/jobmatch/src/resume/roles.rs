//! Role suggestion — asks the model for job roles matching a resume.

use std::sync::LazyLock;

use regex::Regex;

use crate::errors::AppError;
use crate::llm_client::TextGenerator;
use crate::resume::prompts::build_role_prompt;

static NUMBERED_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d+\.\s*(.*)$").expect("static regex must compile"));

/// Raw reply plus the parsed role list.
#[derive(Debug, Clone)]
pub struct RoleSuggestions {
    pub raw: String,
    pub roles: Vec<String>,
}

/// Asks for role suggestions. An unparseable reply is fatal for the run.
pub async fn suggest_roles(
    resume_text: &str,
    generator: &dyn TextGenerator,
) -> Result<RoleSuggestions, AppError> {
    let raw = generator.generate(&build_role_prompt(resume_text)).await?;
    let roles = parse_role_suggestions(&raw);
    if roles.is_empty() {
        return Err(AppError::NoRoles);
    }
    Ok(RoleSuggestions { raw, roles })
}

/// Keeps the text after `N.` on each numbered line.
pub fn parse_role_suggestions(reply: &str) -> Vec<String> {
    reply
        .lines()
        .filter_map(|line| NUMBERED_LINE.captures(line.trim()))
        .map(|caps| caps[1].trim().to_string())
        .filter(|role| !role.is_empty())
        .collect()
}

/// Resolves a 1-based selection against the suggestions.
pub fn select_role(roles: &[String], input: &str) -> Result<String, AppError> {
    let invalid = || AppError::Validation("Invalid selection. Please enter a valid number.".into());
    let index: usize = input.trim().parse().map_err(|_| invalid())?;
    index
        .checked_sub(1)
        .and_then(|i| roles.get(i))
        .cloned()
        .ok_or_else(invalid)
}
