//! Canonicalization, content hashing, and record creation.
//!
//! The pipeline turns merged field data into a primary record plus its
//! typed sub-record, with compensating rollback when the second write
//! fails. Batch submissions isolate per-item failure.

pub mod batch;
pub mod canonical;
pub mod pipeline;

pub use batch::{BatchItem, BatchItemResult, BatchItemStatus, BatchReport, BatchStatistics};
pub use canonical::{assign_internal_id, canonicalize, CanonicalPayload};
pub use pipeline::DocumentProcessor;

use thiserror::Error;

use crate::models::DocumentType;
use crate::storage::StorageError;

#[derive(Error, Debug)]
pub enum ProcessingError {
    #[error("Unknown document type: {0}")]
    UnknownType(String),

    /// Caller contract violation: presence of required fields should
    /// have been validated before the pipeline was invoked.
    #[error("missing required field '{field}' for {doc_type}")]
    MissingField {
        doc_type: DocumentType,
        field: &'static str,
    },

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}
