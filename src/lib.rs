//! Credential evidence extraction and record creation.
//!
//! veridoc turns uploaded evidence documents (PDF scans, image scans)
//! into structured, verifiable credential records:
//!
//! 1. **Extraction** — recover raw text through injected PDF/OCR
//!    collaborators, match per-type pattern tables, normalize values,
//!    and score completeness against each type's required fields.
//! 2. **Processing** — project caller data onto the type's canonical
//!    allow-list, compute a SHA-256 validation hash over the
//!    deterministic serialization, and create the primary record plus
//!    its typed sub-record with compensating rollback.
//! 3. **Ingest** — the two combined: preview an extraction for human
//!    review, or create a record directly with the source file attached
//!    as evidence, gated on extraction confidence.
//!
//! Storage is a trait boundary ([`storage::CredentialStore`]); the
//! bundled [`storage::InMemoryStore`] backs tests and embedders without
//! a database.

pub mod config;
pub mod extraction;
pub mod ingest;
pub mod models;
pub mod processing;
pub mod storage;

pub use config::TypeRegistry;
pub use extraction::{ConfidenceReport, ExtractionEngine, OcrEngine, PdfTextSource};
pub use ingest::{IngestOutcome, IngestService};
pub use models::{CredentialRecord, DocumentType, FileUpload, RecordStatus};
pub use processing::{BatchItem, BatchReport, DocumentProcessor};
pub use storage::{CredentialStore, InMemoryStore, StorageError};
