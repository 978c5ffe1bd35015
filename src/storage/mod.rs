//! Storage collaborator boundary.
//!
//! The pipeline only depends on the [`CredentialStore`] trait; the
//! in-memory implementation backs tests and embedders without a
//! database. There is no multi-write transaction primitive here — the
//! pipeline performs compensating rollback on partial failure.

pub mod memory;

pub use memory::InMemoryStore;

use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{CredentialRecord, DocumentType, EvidenceRecord, FileUpload, RecordStatus};

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("record not found: {0}")]
    NotFound(Uuid),

    #[error("duplicate internal id: {0}")]
    DuplicateInternalId(String),

    #[error("invalid status transition: {from} -> {to}")]
    InvalidTransition {
        from: RecordStatus,
        to: RecordStatus,
    },

    #[error("evidence rejected: {0}")]
    EvidenceRejected(String),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// A primary record as handed to the store, before it assigns the
/// storage identifier and creation timestamp.
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub doc_type: DocumentType,
    pub internal_id: String,
    pub validation_hash: String,
    pub canonical_data: Map<String, Value>,
    pub owner_id: Option<String>,
}

/// Create/read/update/delete surface the processing pipeline relies on.
///
/// `create_primary` must reject duplicate internal identifiers — that
/// uniqueness constraint is what turns a same-microsecond identifier
/// collision into a visible creation failure instead of a silent
/// overwrite.
pub trait CredentialStore {
    fn create_primary(&self, record: NewRecord) -> Result<CredentialRecord, StorageError>;

    /// Create the typed sub-record, one-to-one with the primary record.
    fn create_subrecord(
        &self,
        doc_type: DocumentType,
        record_id: Uuid,
        payload: &Map<String, Value>,
    ) -> Result<Uuid, StorageError>;

    fn delete_primary(&self, record_id: Uuid) -> Result<(), StorageError>;

    fn attach_evidence(
        &self,
        record_id: Uuid,
        file: &FileUpload,
        content_type: &str,
        description: &str,
    ) -> Result<EvidenceRecord, StorageError>;

    /// The only post-creation mutation: `pending -> verified` or
    /// `pending -> rejected`.
    fn update_status(
        &self,
        record_id: Uuid,
        status: RecordStatus,
    ) -> Result<CredentialRecord, StorageError>;

    fn get(&self, record_id: Uuid) -> Result<Option<CredentialRecord>, StorageError>;
}
