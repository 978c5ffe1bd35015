//! Immutable per-type configuration, built once at startup.
//!
//! Everything data-driven about a document type lives here: the ordered
//! allow-list of canonical fields, the required subset used for
//! confidence scoring, the extraction pattern tables, closed
//! vocabularies for categorical fields, and default suggestions for
//! gap filling. The extraction and processing components hold a shared
//! reference and never mutate it.

use std::collections::HashMap;

use regex::{Regex, RegexBuilder};

use crate::models::DocumentType;

/// One field of a type's canonical payload.
#[derive(Debug, Clone, Copy)]
pub struct CanonicalField {
    pub name: &'static str,
    /// Optional fields are serialized as `null` when absent;
    /// required fields missing from caller data are an error.
    pub required: bool,
}

const fn required(name: &'static str) -> CanonicalField {
    CanonicalField { name, required: true }
}

const fn optional(name: &'static str) -> CanonicalField {
    CanonicalField { name, required: false }
}

/// Closed vocabulary for a categorical field: synonym remapping first,
/// then membership in the allowed set. Unrecognized values are dropped.
#[derive(Debug, Clone, Copy)]
pub struct ClosedVocab {
    pub remap: &'static [(&'static str, &'static str)],
    pub allowed: &'static [&'static str],
}

impl ClosedVocab {
    /// Returns the normalized value, or `None` when it is outside the
    /// vocabulary.
    pub fn normalize(&self, value: &str) -> Option<String> {
        let mapped = self
            .remap
            .iter()
            .find(|(from, _)| *from == value)
            .map(|(_, to)| *to)
            .unwrap_or(value);
        self.allowed
            .iter()
            .find(|allowed| **allowed == mapped)
            .map(|allowed| allowed.to_string())
    }
}

/// Extraction rule for one target field: candidate patterns tried in
/// declared order, first non-empty capture wins.
#[derive(Debug)]
pub struct FieldRule {
    /// Key the matcher works with while cleaning (drives the
    /// field-specific cleaning in the normalizer).
    pub source_field: &'static str,
    /// Canonical field name the matched value is emitted under.
    pub canonical_field: &'static str,
    pub patterns: Vec<Regex>,
    pub vocab: Option<ClosedVocab>,
}

/// Full configuration for one document type.
#[derive(Debug)]
pub struct TypeConfig {
    pub doc_type: DocumentType,
    pub canonical_fields: &'static [CanonicalField],
    /// Required subset used by the confidence scorer. Empty for types
    /// without extraction support.
    pub confidence_required: &'static [&'static str],
    pub field_rules: Vec<FieldRule>,
    /// Per-type default values offered for fields the extraction missed.
    pub suggested_defaults: &'static [(&'static str, &'static str)],
}

/// Registry of all document types, constructed once and shared.
#[derive(Debug)]
pub struct TypeRegistry {
    configs: HashMap<DocumentType, TypeConfig>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        let mut configs = HashMap::new();
        configs.insert(DocumentType::Certificate, certificate_config());
        configs.insert(DocumentType::JobHistory, job_history_config());
        configs.insert(DocumentType::Skill, skill_config());
        configs.insert(DocumentType::Milestone, milestone_config());
        configs.insert(DocumentType::Community, community_config());
        Self { configs }
    }

    pub fn get(&self, doc_type: DocumentType) -> &TypeConfig {
        // Every variant is registered in `new`.
        &self.configs[&doc_type]
    }
}

impl Default for TypeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Case-insensitive, multi-line compilation for all pattern tables.
fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| {
            RegexBuilder::new(p)
                .case_insensitive(true)
                .multi_line(true)
                .build()
                .unwrap()
        })
        .collect()
}

const CREDENTIAL_TYPE_VOCAB: ClosedVocab = ClosedVocab {
    remap: &[("Certificate", "Course"), ("Certification", "Course")],
    allowed: &["Course", "Bootcamp", "Workshop", "Award"],
};

const EMPLOYMENT_TYPE_VOCAB: ClosedVocab = ClosedVocab {
    remap: &[],
    allowed: &["full-time", "part-time", "intern", "contributor", "contract"],
};

fn certificate_config() -> TypeConfig {
    TypeConfig {
        doc_type: DocumentType::Certificate,
        canonical_fields: const {
            &[
                required("certificate_title"),
                required("issuer_name"),
                required("completion_date"),
                required("credential_type"),
                required("program_category"),
            ]
        },
        confidence_required: &["certificate_title", "issuer_name", "completion_date"],
        field_rules: vec![
            FieldRule {
                source_field: "title",
                canonical_field: "certificate_title",
                patterns: compile(&[
                    // "Responsive Web Design" followed by optional words ending in "Certification"
                    r"successfully completed the\s+([A-Za-z0-9\s\-&,]+?)\s+(?:Developer\s+)?(?:Certification|Certificate)",
                    r"(?:Certificate of|Certification in|Course[:\s]+)([A-Za-z0-9\s\-&,]+?)(?:\n|$|Issued)",
                    r"(?:has successfully completed|certifies that.*?completed)\s+(?:the\s+)?([A-Za-z0-9\s\-&,]+?)(?:\s+on|\s+Certification|\n)",
                ]),
                vocab: None,
            },
            FieldRule {
                source_field: "issuer",
                canonical_field: "issuer_name",
                patterns: compile(&[
                    // Common platform names at line start or with signing context
                    r"^([A-Za-z]+(?:Camp|Academy|University|Institute|School|Code|Learn))",
                    r"(?:Executive Director|issued by),?\s+([A-Za-z0-9\s\-&\.]+?)(?:\.|$|\n)",
                    r"(?:Issued by[:\s]+|Issuer[:\s]+)([A-Za-z0-9\s\-&,\.]+?)(?:\n|$)",
                    r"(?:from|by)\s+([A-Z][A-Za-z\s&]+(?:University|Institute|Academy|Foundation|College|School|Company|Camp))",
                ]),
                vocab: None,
            },
            FieldRule {
                source_field: "date",
                canonical_field: "completion_date",
                patterns: compile(&[
                    r"on\s+([A-Z][a-z]+\s+\d{1,2},?\s+\d{4})",
                    r"(?:Completed|Issued|Date)[:\s]+([A-Za-z]+\s+\d{1,2},?\s+\d{4})",
                    r"(\d{1,2}[/-]\d{1,2}[/-]\d{2,4})",
                    r"([A-Z][a-z]+\s+\d{4})",
                ]),
                vocab: None,
            },
            FieldRule {
                source_field: "credential_type",
                canonical_field: "credential_type",
                patterns: compile(&[
                    r"\b(Certificate|Certification|Course|Bootcamp|Workshop|Award)\b",
                ]),
                vocab: Some(CREDENTIAL_TYPE_VOCAB),
            },
        ],
        suggested_defaults: &[
            ("certificate_title", "Professional Certificate"),
            ("program_category", "Professional Development"),
        ],
    }
}

fn job_history_config() -> TypeConfig {
    TypeConfig {
        doc_type: DocumentType::JobHistory,
        canonical_fields: const {
            &[
                required("job_title"),
                required("employer_name"),
                required("employment_type"),
                required("start_date"),
                optional("end_date"),
                required("job_category"),
            ]
        },
        confidence_required: &["job_title", "employer_name", "start_date"],
        field_rules: vec![
            FieldRule {
                source_field: "job_title",
                canonical_field: "job_title",
                patterns: compile(&[
                    r"(?:Position|Title|Role)[:\s]+([A-Za-z0-9\s\-&,]+?)(?:\n|$)",
                    r"(?:as|as a|as an)\s+([A-Z][A-Za-z\s]+(?:Engineer|Developer|Manager|Analyst|Designer|Specialist))",
                ]),
                vocab: None,
            },
            FieldRule {
                source_field: "employer",
                canonical_field: "employer_name",
                patterns: compile(&[
                    r"(?:Company|Employer|Organization)[:\s]+([A-Za-z0-9\s\-&,\.]+?)(?:\n|$)",
                    r"(?:at|with)\s+([A-Z][A-Za-z\s&]+(?:Inc|LLC|Ltd|Corp|Company))",
                ]),
                vocab: None,
            },
            FieldRule {
                source_field: "start_date",
                canonical_field: "start_date",
                patterns: compile(&[
                    r"(?:Start Date|From|Beginning)[:\s]+([A-Za-z]+\s+\d{4})",
                    r"(?:From|Since)\s+([A-Z][a-z]+\s+\d{4})",
                ]),
                vocab: None,
            },
            FieldRule {
                source_field: "employment_type",
                canonical_field: "employment_type",
                patterns: compile(&[
                    r"\b(Full-time|Part-time|Contract|Intern|Contributor|Full time|Part time)\b",
                ]),
                vocab: Some(EMPLOYMENT_TYPE_VOCAB),
            },
        ],
        suggested_defaults: &[("job_category", "General")],
    }
}

fn skill_config() -> TypeConfig {
    TypeConfig {
        doc_type: DocumentType::Skill,
        canonical_fields: const {
            &[
                required("skill_name"),
                required("skill_category"),
                optional("proficiency_level"),
            ]
        },
        confidence_required: &[],
        field_rules: vec![],
        suggested_defaults: &[],
    }
}

fn milestone_config() -> TypeConfig {
    TypeConfig {
        doc_type: DocumentType::Milestone,
        canonical_fields: const {
            &[
                required("milestone_type"),
                required("issuer_name"),
                required("date"),
                required("milestone_summary"),
            ]
        },
        confidence_required: &[],
        field_rules: vec![],
        suggested_defaults: &[],
    }
}

fn community_config() -> TypeConfig {
    TypeConfig {
        doc_type: DocumentType::Community,
        canonical_fields: const {
            &[
                required("contribution_type"),
                required("platform_name"),
                required("date"),
            ]
        },
        confidence_required: &[],
        field_rules: vec![],
        suggested_defaults: &[],
    }
}
