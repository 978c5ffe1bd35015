//! File ingestion: extraction plus record creation in one step.
//!
//! Two entry points: [`IngestService::preview`] runs extraction and
//! returns everything a review UI needs without writing anything, and
//! [`IngestService::ingest_file`] goes all the way to a stored record
//! when confidence allows, attaching the source file as evidence.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::config::TypeRegistry;
use crate::extraction::{ConfidenceReport, ExtractionEngine};
use crate::models::{CredentialRecord, DocumentType, FileUpload};
use crate::processing::DocumentProcessor;
use crate::storage::CredentialStore;

const PREVIEW_SAMPLE_CHARS: usize = 500;
const REVIEW_SAMPLE_CHARS: usize = 300;

/// Extraction result prepared for caller review. Nothing is stored.
#[derive(Debug, Clone)]
pub struct ExtractionPreview {
    /// Fields the pattern matcher found in the document text.
    pub extracted: BTreeMap<String, String>,
    /// What would be submitted: extraction, caller overrides, then
    /// suggested defaults for whatever is still missing.
    pub merged: BTreeMap<String, String>,
    pub suggestions: BTreeMap<String, String>,
    pub confidence: ConfidenceReport,
    pub raw_text_sample: String,
}

/// Outcome of a one-step file ingestion.
#[derive(Debug)]
pub enum IngestOutcome {
    /// A record was created; `warnings` holds non-fatal errors such as
    /// a rejected evidence attachment.
    Created {
        record: CredentialRecord,
        warnings: Vec<String>,
    },
    /// Confidence over the merged data was below the review threshold.
    /// Nothing was stored.
    NeedsReview {
        extracted: BTreeMap<String, String>,
        suggestions: BTreeMap<String, String>,
        confidence: ConfidenceReport,
        raw_text_sample: String,
    },
    /// Record creation failed. Nothing was stored.
    Failed {
        errors: Vec<String>,
        extracted: BTreeMap<String, String>,
    },
}

/// Couples the extraction engine with the processing pipeline.
pub struct IngestService<S: CredentialStore> {
    registry: Arc<TypeRegistry>,
    engine: ExtractionEngine,
    processor: DocumentProcessor<S>,
}

impl<S: CredentialStore> IngestService<S> {
    pub fn new(
        registry: Arc<TypeRegistry>,
        engine: ExtractionEngine,
        processor: DocumentProcessor<S>,
    ) -> Self {
        Self {
            registry,
            engine,
            processor,
        }
    }

    pub fn processor(&self) -> &DocumentProcessor<S> {
        &self.processor
    }

    /// Run extraction on a file and report what would be submitted,
    /// without creating anything.
    ///
    /// `overrides` are caller-confirmed values layered over the
    /// extraction; the confidence report covers extraction plus
    /// overrides, so confirmed values count toward the score.
    pub fn preview(
        &self,
        file: &FileUpload,
        doc_type: DocumentType,
        overrides: &BTreeMap<String, String>,
    ) -> ExtractionPreview {
        let extraction = self.engine.extract(file, doc_type);

        let mut merged = extraction.fields.clone();
        merged.extend(overrides.clone());
        let confidence = self.engine.confidence(&merged, doc_type);

        let suggestions = self.engine.suggest_missing(&merged, doc_type);
        merged.extend(suggestions.clone());

        ExtractionPreview {
            extracted: extraction.fields,
            merged,
            suggestions,
            confidence,
            raw_text_sample: truncate_chars(&extraction.raw_text, PREVIEW_SAMPLE_CHARS),
        }
    }

    /// Extract, gap-fill, and create a record with the source file
    /// attached as evidence.
    ///
    /// Confidence is scored over extraction plus `overrides`; below the
    /// review threshold nothing is stored. Types with no required set
    /// are never gated — their score is a constant zero by definition.
    pub fn ingest_file(
        &self,
        file: &FileUpload,
        doc_type: DocumentType,
        overrides: &BTreeMap<String, String>,
        owner_id: Option<&str>,
    ) -> IngestOutcome {
        let extraction = self.engine.extract(file, doc_type);

        let mut merged = extraction.fields.clone();
        merged.extend(overrides.clone());
        let confidence = self.engine.confidence(&merged, doc_type);

        let gated = !self.registry.get(doc_type).confidence_required.is_empty();
        if gated && confidence.needs_review() {
            tracing::info!(
                file = %file.file_name,
                doc_type = %doc_type,
                overall = confidence.overall,
                "extraction below review threshold"
            );
            let suggestions = self.engine.suggest_missing(&merged, doc_type);
            return IngestOutcome::NeedsReview {
                suggestions,
                confidence,
                raw_text_sample: truncate_chars(&extraction.raw_text, REVIEW_SAMPLE_CHARS),
                extracted: extraction.fields,
            };
        }

        merged.extend(self.engine.suggest_missing(&merged, doc_type));

        let data: Map<String, Value> = merged
            .into_iter()
            .map(|(k, v)| (k, Value::String(v)))
            .collect();

        let files = [file.clone()];
        match self.processor.process(doc_type.as_str(), &data, owner_id, &files) {
            (Some(record), warnings) => IngestOutcome::Created { record, warnings },
            (None, errors) => IngestOutcome::Failed {
                errors,
                extracted: extraction.fields,
            },
        }
    }
}

/// Truncate on a character boundary; byte slicing could split a
/// multi-byte character in OCR output.
fn truncate_chars(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
