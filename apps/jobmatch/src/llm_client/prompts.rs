// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Persona line every jobmatch prompt opens with.
pub const CAREER_ADVISOR: &str = "You are a career advisor.";
