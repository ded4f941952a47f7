// Prompt templates for chunk scoring.

use crate::llm_client::prompts::CAREER_ADVISOR;

/// Scoring prompt template. Replace `{resume_text}` and `{job_listings}` before sending.
pub const SCORING_PROMPT_TEMPLATE: &str = r#"Candidate Resume:
{resume_text}

Job Listings:
{job_listings}

Evaluate how well each job matches the resume, be realistic and strictly no sugarcoating. Score each job from 1 to 10 based on relevance.

Respond in this EXACT format:
1. <Job Title> at <Company> - <Score>/10
<Explanation in 2 sentences>
2. <Job Title> at <Company> - <Score>/10
<Explanation in 2 sentences>

Only use the provided information. Evaluate only the jobs listed above. Do not create additional jobs. If no jobs are provided, respond with 'No jobs to evaluate.'"#;

pub fn build_scoring_prompt(resume_text: &str, chunk: &str) -> String {
    let body = SCORING_PROMPT_TEMPLATE
        .replace("{resume_text}", resume_text)
        .replace("{job_listings}", chunk);
    format!("{CAREER_ADVISOR}\n\n{body}")
}
