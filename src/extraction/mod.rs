//! Structured-field extraction from evidence documents.
//!
//! The engine turns raw recognized text into typed fields: pattern
//! matching per document type, value normalization, gap-filling
//! suggestions, and a confidence report. Expected failure modes
//! (unsupported file types, collaborator errors) never escape as
//! errors; they are returned as data so callers can offer a guided
//! retry.

pub mod confidence;
pub mod engine;
pub mod normalize;
pub mod patterns;
pub mod types;

pub use confidence::{score_extraction, ConfidenceReport, FieldConfidence, REVIEW_THRESHOLD};
pub use engine::ExtractionEngine;
pub use patterns::FieldMatcher;
pub use types::{OcrEngine, PdfTextSource, RawExtraction};

use thiserror::Error;

/// Failures raised by the OCR/PDF collaborators and the decoding step
/// in front of them. The engine converts these into soft failures at
/// its public boundary.
#[derive(Error, Debug)]
pub enum ExtractionError {
    #[error("PDF extraction failed: {0}")]
    Pdf(String),

    #[error("OCR processing failed: {0}")]
    Ocr(String),

    #[error("image decoding failed: {0}")]
    Image(#[from] image::ImageError),
}
