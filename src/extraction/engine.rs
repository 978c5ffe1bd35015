//! Extraction Engine: single entry point for turning an uploaded
//! evidence file into structured fields plus the raw recognized text.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::config::TypeRegistry;
use crate::models::{DocumentType, FileUpload};

use super::confidence::{score_extraction, ConfidenceReport};
use super::patterns::FieldMatcher;
use super::types::{OcrEngine, PdfTextSource, RawExtraction};
use super::ExtractionError;

/// Image extensions routed to the OCR collaborator.
const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "tiff"];

/// Orchestrates raw-text retrieval, pattern extraction, gap-filling
/// suggestions, and confidence scoring.
///
/// Uses trait objects for OCR and PDF text retrieval, enabling
/// dependency injection. Expected failures (unsupported extension,
/// collaborator error) are returned as data, never as an error.
pub struct ExtractionEngine {
    registry: Arc<TypeRegistry>,
    matcher: FieldMatcher,
    ocr: Box<dyn OcrEngine + Send + Sync>,
    pdf: Box<dyn PdfTextSource + Send + Sync>,
}

impl ExtractionEngine {
    pub fn new(
        registry: Arc<TypeRegistry>,
        ocr: Box<dyn OcrEngine + Send + Sync>,
        pdf: Box<dyn PdfTextSource + Send + Sync>,
    ) -> Self {
        let matcher = FieldMatcher::new(Arc::clone(&registry));
        Self {
            registry,
            matcher,
            ocr,
            pdf,
        }
    }

    /// Extract structured fields from an uploaded file.
    ///
    /// Dispatches on the file extension: `pdf` goes to the text-layer
    /// reader, image extensions go through RGB conversion to OCR. Any
    /// other extension, and any collaborator failure, yields the soft
    /// failure shape (empty fields, diagnostic message as raw text).
    pub fn extract(&self, file: &FileUpload, doc_type: DocumentType) -> RawExtraction {
        let Some(extension) = file.extension() else {
            return RawExtraction::soft_failure("Unsupported file type");
        };

        let text = if extension == "pdf" {
            self.read_pdf(&file.bytes)
        } else if IMAGE_EXTENSIONS.contains(&extension.as_str()) {
            self.read_image(&file.bytes)
        } else {
            tracing::debug!(file = %file.file_name, "unsupported evidence extension");
            return RawExtraction::soft_failure("Unsupported file type");
        };

        match text {
            Ok(text) => {
                let fields = self.matcher.extract(doc_type, &text);
                RawExtraction { fields, raw_text: text }
            }
            Err(e) => {
                tracing::warn!(
                    file = %file.file_name,
                    error = %e,
                    "evidence text retrieval failed"
                );
                RawExtraction::soft_failure(format!("Error extracting data: {e}"))
            }
        }
    }

    /// Default values for a type-specific subset of fields absent from
    /// the extraction. Pure lookup, no text analysis.
    pub fn suggest_missing(
        &self,
        fields: &BTreeMap<String, String>,
        doc_type: DocumentType,
    ) -> BTreeMap<String, String> {
        self.registry
            .get(doc_type)
            .suggested_defaults
            .iter()
            .filter(|(name, _)| !fields.contains_key(*name))
            .map(|(name, default)| (name.to_string(), default.to_string()))
            .collect()
    }

    /// Confidence report for extracted fields under this type's
    /// required set.
    pub fn confidence(
        &self,
        fields: &BTreeMap<String, String>,
        doc_type: DocumentType,
    ) -> ConfidenceReport {
        score_extraction(fields, self.registry.get(doc_type))
    }

    fn read_pdf(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let pages = self.pdf.page_count(bytes)?;
        let mut text = String::new();
        for index in 0..pages {
            text.push_str(&self.pdf.page_text(bytes, index)?);
            text.push('\n');
        }
        Ok(text.trim().to_string())
    }

    fn read_image(&self, bytes: &[u8]) -> Result<String, ExtractionError> {
        let decoded = image::load_from_memory(bytes)?;
        // OCR collaborators take full-color input only.
        let rgb = decoded.to_rgb8();
        Ok(self.ocr.image_to_text(&rgb)?.trim().to_string())
    }
}
