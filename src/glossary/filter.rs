//! Search filtering
//!
//! A term matches a query when its term, definition or translation contains
//! the trimmed query, ignoring case. Matches keep glossary order.

use super::TermRecord;

/// Check whether a record matches an already trimmed, lower-cased query
pub fn matches_query(record: &TermRecord, needle: &str) -> bool {
    record.term.to_lowercase().contains(needle)
        || record.definition.to_lowercase().contains(needle)
        || record
            .translation
            .as_ref()
            .is_some_and(|t| t.to_lowercase().contains(needle))
}

/// Derive the filtered view of `terms` for a raw search query
///
/// A blank query yields a copy of the whole glossary.
pub fn filter_terms(terms: &[TermRecord], query: &str) -> Vec<TermRecord> {
    let query = query.trim();
    if query.is_empty() {
        return terms.to_vec();
    }

    let needle = query.to_lowercase();
    terms
        .iter()
        .filter(|record| matches_query(record, &needle))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<TermRecord> {
        vec![
            TermRecord::new("API", "Application Programming Interface"),
            TermRecord::new("cache", "temporary storage"),
            TermRecord::new("Deploy", "release software").with_translation("Desplegar"),
            TermRecord::new("bug", "a defect in a program"),
        ]
    }

    #[test]
    fn test_blank_query_returns_everything() {
        let terms = sample();
        assert_eq!(filter_terms(&terms, ""), terms);
        assert_eq!(filter_terms(&terms, "   \t"), terms);
    }

    #[test]
    fn test_case_insensitive_term_match() {
        let result = filter_terms(&sample(), "api");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].term, "API");
    }

    #[test]
    fn test_matches_definition_and_translation() {
        let terms = sample();

        let result = filter_terms(&terms, "STORAGE");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].term, "cache");

        let result = filter_terms(&terms, "desplegar");
        assert_eq!(result.len(), 1);
        assert_eq!(result[0].term, "Deploy");
    }

    #[test]
    fn test_query_is_trimmed() {
        let result = filter_terms(&sample(), "  cache  ");
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_matches_keep_glossary_order() {
        // "program" hits API's definition and bug's definition
        let result = filter_terms(&sample(), "program");
        let names: Vec<_> = result.iter().map(|r| r.term.as_str()).collect();
        assert_eq!(names, vec!["API", "bug"]);
    }

    #[test]
    fn test_partition_property() {
        let terms = sample();
        for query in ["a", "e", "program", "xyz", "DE", "soft"] {
            let needle = query.trim().to_lowercase();
            let kept = filter_terms(&terms, query);
            for record in &terms {
                assert_eq!(
                    kept.contains(record),
                    matches_query(record, &needle),
                    "query {:?} record {:?}",
                    query,
                    record.term
                );
            }
        }
    }

    #[test]
    fn test_no_match() {
        assert!(filter_terms(&sample(), "zzz").is_empty());
    }
}
