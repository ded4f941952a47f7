use crate::llm_client::prompts::CAREER_ADVISOR;

/// Number of roles requested from the model.
pub const SUGGESTED_ROLE_COUNT: usize = 5;

/// Role suggestion prompt. Replace `{count}` and `{resume_text}` before sending.
pub const ROLE_SUGGESTION_TEMPLATE: &str = "Based on the following resume text, suggest {count} job roles \
that match the candidate's skills and background:\n\n{resume_text}\n\n\
Return the suggestions as a numbered list and only the job role:\n1. Job Role A\n2. Job Role B\n...";

pub fn build_role_prompt(resume_text: &str) -> String {
    let body = ROLE_SUGGESTION_TEMPLATE
        .replace("{count}", &SUGGESTED_ROLE_COUNT.to_string())
        .replace("{resume_text}", resume_text);
    format!("{CAREER_ADVISOR} {body}")
}
