//! Field Pattern Matcher: ordered candidate patterns per field per
//! document type, first non-empty capture wins.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::TypeRegistry;
use crate::models::DocumentType;

use super::normalize::clean_value;

/// Applies a document type's pattern table to raw recognized text.
///
/// For each target field the candidate patterns are tried in declared
/// order; the first pattern whose first capture group survives cleaning
/// non-empty wins and the rest are skipped. Fields with no match are
/// absent from the result, never an error. Categorical fields then go
/// through their closed vocabulary; values outside it are dropped.
pub struct FieldMatcher {
    registry: Arc<TypeRegistry>,
}

impl FieldMatcher {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self { registry }
    }

    pub fn extract(&self, doc_type: DocumentType, text: &str) -> BTreeMap<String, String> {
        let config = self.registry.get(doc_type);
        let mut fields = BTreeMap::new();

        for rule in &config.field_rules {
            let mut matched = None;
            for pattern in &rule.patterns {
                let Some(captures) = pattern.captures(text) else {
                    continue;
                };
                let Some(value) = captures.get(1) else {
                    continue;
                };
                let cleaned = clean_value(value.as_str().trim(), rule.source_field);
                if !cleaned.is_empty() {
                    matched = Some(cleaned);
                    break;
                }
            }

            let Some(value) = matched else {
                continue;
            };

            // Closed-vocabulary fields keep only recognized labels; a
            // dropped label does not fall back to later patterns.
            let normalized = match &rule.vocab {
                Some(vocab) => vocab.normalize(&value),
                None => Some(value),
            };
            if let Some(value) = normalized {
                fields.insert(rule.canonical_field.to_string(), value);
            }
        }

        if !fields.is_empty() {
            tracing::debug!(
                doc_type = doc_type.as_str(),
                field_count = fields.len(),
                "structured fields extracted"
            );
        }

        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matcher() -> FieldMatcher {
        FieldMatcher::new(Arc::new(TypeRegistry::new()))
    }

    const CERTIFICATE_TEXT: &str = "freeCodeCamp\n\n\
        This certifies that Jane Doe has successfully completed the \
        Responsive Web Design Developer Certification on October 28, 2023.\n\
        Executive Director, freeCodeCamp.org\n";

    #[test]
    fn certificate_fields_extracted_and_normalized() {
        let fields = matcher().extract(DocumentType::Certificate, CERTIFICATE_TEXT);

        assert_eq!(fields.get("certificate_title").map(String::as_str), Some("Responsive Web Design"));
        assert_eq!(fields.get("issuer_name").map(String::as_str), Some("freeCodeCamp"));
        assert_eq!(fields.get("completion_date").map(String::as_str), Some("2023-10"));
        // "Certification" collapses to "Course" through the vocabulary.
        assert_eq!(fields.get("credential_type").map(String::as_str), Some("Course"));
    }

    #[test]
    fn job_history_fields_extracted() {
        let text = "Employment Verification\n\
            Position: Senior Software Engineer\n\
            Company: Acme Inc\n\
            From January 2020\n\
            Full-time\n";
        let fields = matcher().extract(DocumentType::JobHistory, text);

        assert_eq!(fields.get("job_title").map(String::as_str), Some("Senior Software Engineer"));
        assert_eq!(fields.get("employer_name").map(String::as_str), Some("Acme Inc"));
        assert_eq!(fields.get("start_date").map(String::as_str), Some("2020-01"));
        assert_eq!(fields.get("employment_type").map(String::as_str), Some("full-time"));
    }

    #[test]
    fn first_matching_pattern_wins() {
        // Both the "Position:" and the "as a ..." pattern would match;
        // the earlier pattern in the table takes precedence.
        let text = "Position: Staff Engineer\nWorked as a Senior Software Engineer\n";
        let fields = matcher().extract(DocumentType::JobHistory, text);
        assert_eq!(fields.get("job_title").map(String::as_str), Some("Staff Engineer"));
    }

    #[test]
    fn unmatched_fields_are_absent() {
        let fields = matcher().extract(DocumentType::Certificate, "completely unrelated text");
        assert!(fields.is_empty());
    }

    #[test]
    fn matching_is_case_insensitive() {
        let text = "POSITION: data analyst\n";
        let fields = matcher().extract(DocumentType::JobHistory, text);
        assert_eq!(fields.get("job_title").map(String::as_str), Some("data analyst"));
    }

    #[test]
    fn types_without_pattern_tables_extract_nothing() {
        let fields = matcher().extract(DocumentType::Skill, "Rust, advanced proficiency");
        assert!(fields.is_empty());
    }

    #[test]
    fn unknown_employment_label_is_dropped() {
        // "Contributor" is matched and kept; a text with no allowed
        // label yields no employment_type at all.
        let kept = matcher().extract(DocumentType::JobHistory, "Contributor since 2021\n");
        assert_eq!(kept.get("employment_type").map(String::as_str), Some("contributor"));

        let dropped = matcher().extract(DocumentType::JobHistory, "Employed on a freelance basis\n");
        assert!(!dropped.contains_key("employment_type"));
    }
}
