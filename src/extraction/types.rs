use std::collections::BTreeMap;

use image::RgbImage;
use serde::{Deserialize, Serialize};

use super::ExtractionError;

/// Result of one extraction call: whatever fields matched, plus the
/// full recognized text. Produced and consumed within a single call;
/// never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawExtraction {
    /// Canonical field name to extracted value. Fields with no
    /// matching pattern are simply absent.
    pub fields: BTreeMap<String, String>,
    /// Full recognized text, or a diagnostic message on soft failure.
    pub raw_text: String,
}

impl RawExtraction {
    /// Soft failure shape: no fields, human-readable message in the
    /// raw-text channel.
    pub fn soft_failure(message: impl Into<String>) -> Self {
        Self {
            fields: BTreeMap::new(),
            raw_text: message.into(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// OCR engine abstraction (allows mocking for tests).
/// Input is always a decoded full-color buffer; the engine forces the
/// conversion before calling.
pub trait OcrEngine {
    fn image_to_text(&self, image: &RgbImage) -> Result<String, ExtractionError>;
}

/// PDF text-layer abstraction. Page outputs are concatenated by the
/// engine with newline separators.
pub trait PdfTextSource {
    fn page_count(&self, pdf_bytes: &[u8]) -> Result<usize, ExtractionError>;

    fn page_text(&self, pdf_bytes: &[u8], page_index: usize) -> Result<String, ExtractionError>;
}
