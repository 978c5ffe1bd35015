//! In-memory reference implementation of the storage collaborator.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::models::{CredentialRecord, DocumentType, EvidenceRecord, FileUpload, RecordStatus};

use super::{CredentialStore, NewRecord, StorageError};

/// Evidence extensions accepted for attachment.
const ALLOWED_EVIDENCE_EXTENSIONS: &[&str] =
    &["pdf", "png", "jpg", "jpeg", "gif", "txt", "doc", "docx"];

/// Typed sub-record held one-to-one with its primary record.
#[derive(Debug, Clone)]
pub struct SubRecord {
    pub id: Uuid,
    pub record_id: Uuid,
    pub doc_type: DocumentType,
    pub fields: Map<String, Value>,
}

#[derive(Default)]
struct Inner {
    records: HashMap<Uuid, CredentialRecord>,
    subrecords: HashMap<Uuid, SubRecord>,
    evidence: HashMap<Uuid, Vec<EvidenceRecord>>,
}

/// Thread-safe in-memory store. Cloning shares the underlying state,
/// so tests can hold a handle while the pipeline owns another.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    inner: Arc<Mutex<Inner>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_count(&self) -> usize {
        self.inner.lock().unwrap().records.len()
    }

    /// The typed sub-record for a primary record, if any.
    pub fn subrecord_for(&self, record_id: Uuid) -> Option<SubRecord> {
        self.inner
            .lock()
            .unwrap()
            .subrecords
            .get(&record_id)
            .cloned()
    }

    pub fn evidence_for(&self, record_id: Uuid) -> Vec<EvidenceRecord> {
        self.inner
            .lock()
            .unwrap()
            .evidence
            .get(&record_id)
            .cloned()
            .unwrap_or_default()
    }
}

impl CredentialStore for InMemoryStore {
    fn create_primary(&self, record: NewRecord) -> Result<CredentialRecord, StorageError> {
        let mut inner = self.inner.lock().unwrap();

        if inner
            .records
            .values()
            .any(|r| r.internal_id == record.internal_id)
        {
            return Err(StorageError::DuplicateInternalId(record.internal_id));
        }

        let created = CredentialRecord {
            id: Uuid::new_v4(),
            doc_type: record.doc_type,
            internal_id: record.internal_id,
            validation_hash: record.validation_hash,
            canonical_data: record.canonical_data,
            owner_id: record.owner_id,
            status: RecordStatus::Pending,
            created_at: Utc::now(),
        };
        inner.records.insert(created.id, created.clone());
        Ok(created)
    }

    fn create_subrecord(
        &self,
        doc_type: DocumentType,
        record_id: Uuid,
        payload: &Map<String, Value>,
    ) -> Result<Uuid, StorageError> {
        let mut inner = self.inner.lock().unwrap();

        if !inner.records.contains_key(&record_id) {
            return Err(StorageError::NotFound(record_id));
        }

        let subrecord = SubRecord {
            id: Uuid::new_v4(),
            record_id,
            doc_type,
            fields: payload.clone(),
        };
        let id = subrecord.id;
        inner.subrecords.insert(record_id, subrecord);
        Ok(id)
    }

    fn delete_primary(&self, record_id: Uuid) -> Result<(), StorageError> {
        let mut inner = self.inner.lock().unwrap();

        if inner.records.remove(&record_id).is_none() {
            return Err(StorageError::NotFound(record_id));
        }
        // Cascade: the sub-record and evidence go with the primary.
        inner.subrecords.remove(&record_id);
        inner.evidence.remove(&record_id);
        Ok(())
    }

    fn attach_evidence(
        &self,
        record_id: Uuid,
        file: &FileUpload,
        content_type: &str,
        description: &str,
    ) -> Result<EvidenceRecord, StorageError> {
        let extension = file.extension().unwrap_or_default();
        if !ALLOWED_EVIDENCE_EXTENSIONS.contains(&extension.as_str()) {
            return Err(StorageError::EvidenceRejected(format!(
                "file extension '{extension}' is not allowed"
            )));
        }

        let mut inner = self.inner.lock().unwrap();

        if !inner.records.contains_key(&record_id) {
            return Err(StorageError::NotFound(record_id));
        }

        let evidence = EvidenceRecord {
            id: Uuid::new_v4(),
            record_id,
            file_name: file.file_name.clone(),
            content_type: content_type.to_string(),
            file_size: file.bytes.len(),
            description: description.to_string(),
            uploaded_at: Utc::now(),
        };
        inner
            .evidence
            .entry(record_id)
            .or_default()
            .push(evidence.clone());
        Ok(evidence)
    }

    fn update_status(
        &self,
        record_id: Uuid,
        status: RecordStatus,
    ) -> Result<CredentialRecord, StorageError> {
        let mut inner = self.inner.lock().unwrap();

        let record = inner
            .records
            .get_mut(&record_id)
            .ok_or(StorageError::NotFound(record_id))?;

        if !record.status.can_transition_to(status) {
            return Err(StorageError::InvalidTransition {
                from: record.status,
                to: status,
            });
        }
        record.status = status;
        Ok(record.clone())
    }

    fn get(&self, record_id: Uuid) -> Result<Option<CredentialRecord>, StorageError> {
        Ok(self.inner.lock().unwrap().records.get(&record_id).cloned())
    }
}
