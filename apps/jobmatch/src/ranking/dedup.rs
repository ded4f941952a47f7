use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::models::ranking::ScoredJob;

static WHITESPACE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("static regex must compile"));
static SEPARATOR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*(?:\bat\b|@|-)\s*").expect("static regex must compile"));

/// Key under which two labels count as the same listing:
/// "Backend Engineer at Acme" and "backend engineer - Acme" collide.
pub fn normalize_key(title_company: &str) -> String {
    let lowered = title_company.trim().to_lowercase();
    let collapsed = WHITESPACE.replace_all(&lowered, " ");
    SEPARATOR.replace_all(&collapsed, " at ").into_owned()
}

/// Drops later entries whose normalized key was already seen.
pub fn remove_duplicates(entries: Vec<ScoredJob>) -> Vec<ScoredJob> {
    let mut seen = HashSet::new();
    entries
        .into_iter()
        .filter(|e| seen.insert(normalize_key(&e.title_company)))
        .collect()
}

/// Highest score first; equal scores keep their relative order.
pub fn sort_by_score(entries: &mut [ScoredJob]) {
    entries.sort_by(|a, b| b.score.cmp(&a.score));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(label: &str, score: u8) -> ScoredJob {
        ScoredJob {
            title_company: label.to_string(),
            score,
            explanation: format!("why {label}"),
        }
    }

    #[test]
    fn test_separator_variants_share_key() {
        let key = normalize_key("Backend Engineer at Acme");
        assert_eq!(key, "backend engineer at acme");
        assert_eq!(normalize_key("backend engineer - Acme"), key);
        assert_eq!(normalize_key("Backend  Engineer @Acme"), key);
        assert_eq!(normalize_key("  Backend\tEngineer   AT   Acme "), key);
    }

    #[test]
    fn test_at_inside_words_untouched() {
        assert_eq!(normalize_key("Data Analyst at Catalyst"), "data analyst at catalyst");
    }

    #[test]
    fn test_first_occurrence_wins() {
        let deduped = remove_duplicates(vec![
            entry("Backend Engineer at Acme", 8),
            entry("Data Entry at Beta", 2),
            entry("backend engineer - Acme", 9),
        ]);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].score, 8);
        assert_eq!(deduped[1].title_company, "Data Entry at Beta");
    }

    #[test]
    fn test_sort_is_stable_descending() {
        let mut entries = vec![entry("A at X", 5), entry("B at Y", 9), entry("C at Z", 5)];
        sort_by_score(&mut entries);
        let order: Vec<_> = entries.iter().map(|e| (e.title_company.as_str(), e.score)).collect();
        assert_eq!(order, vec![("B at Y", 9), ("A at X", 5), ("C at Z", 5)]);
    }
}
