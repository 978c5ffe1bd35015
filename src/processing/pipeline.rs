//! Record creation pipeline: canonicalize, hash, write the primary and
//! sub-record, attach evidence, with compensating rollback on partial
//! failure.

use std::sync::Arc;

use chrono::Utc;
use serde_json::{Map, Value};

use crate::config::TypeRegistry;
use crate::models::{CredentialRecord, DocumentType, FileUpload};
use crate::storage::{CredentialStore, NewRecord};

use super::canonical::{assign_internal_id, canonicalize};
use super::ProcessingError;

/// Drives document submission from caller data to stored records.
///
/// Errors accumulate in the returned list instead of aborting: evidence
/// attachment failures are warnings on an otherwise successful
/// creation, while primary or sub-record failures abort and clean up.
pub struct DocumentProcessor<S: CredentialStore> {
    registry: Arc<TypeRegistry>,
    store: S,
}

impl<S: CredentialStore> DocumentProcessor<S> {
    pub fn new(registry: Arc<TypeRegistry>, store: S) -> Self {
        Self { registry, store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Process one document submission.
    ///
    /// Returns the created record and any non-fatal errors, or `None`
    /// with the errors that prevented creation. When the sub-record
    /// write fails after the primary succeeded, the primary is deleted
    /// so no orphan survives.
    pub fn process(
        &self,
        proof_type: &str,
        data: &Map<String, Value>,
        owner_id: Option<&str>,
        evidence_files: &[FileUpload],
    ) -> (Option<CredentialRecord>, Vec<String>) {
        let mut errors = Vec::new();

        let Some(doc_type) = DocumentType::from_str(proof_type) else {
            errors.push(ProcessingError::UnknownType(proof_type.to_string()).to_string());
            return (None, errors);
        };

        let config = self.registry.get(doc_type);
        let payload = match canonicalize(config, data) {
            Ok(payload) => payload,
            Err(e) => {
                errors.push(e.to_string());
                return (None, errors);
            }
        };

        let record = match self.store.create_primary(NewRecord {
            doc_type,
            internal_id: assign_internal_id(doc_type, Utc::now()),
            validation_hash: payload.content_hash(),
            canonical_data: payload.fields().clone(),
            owner_id: owner_id.map(str::to_string),
        }) {
            Ok(record) => record,
            Err(e) => {
                errors.push(format!("Failed to create {doc_type} record: {e}"));
                return (None, errors);
            }
        };

        if let Err(e) = self
            .store
            .create_subrecord(doc_type, record.id, payload.fields())
        {
            errors.push(format!("Failed to create {doc_type} details: {e}"));
            tracing::warn!(
                record_id = %record.id,
                doc_type = %doc_type,
                error = %e,
                "sub-record creation failed, rolling back primary record"
            );
            if let Err(delete_err) = self.store.delete_primary(record.id) {
                tracing::warn!(
                    record_id = %record.id,
                    error = %delete_err,
                    "rollback of primary record failed"
                );
                errors.push(format!("Failed to roll back primary record: {delete_err}"));
            }
            return (None, errors);
        }

        for file in evidence_files {
            let content_type = mime_guess::from_path(&file.file_name)
                .first_raw()
                .unwrap_or("unknown")
                .to_string();
            let description = format!("Evidence for {doc_type}");
            if let Err(e) = self
                .store
                .attach_evidence(record.id, file, &content_type, &description)
            {
                tracing::warn!(
                    record_id = %record.id,
                    file = %file.file_name,
                    error = %e,
                    "evidence attachment failed"
                );
                errors.push(format!("Failed to attach evidence '{}': {e}", file.file_name));
            }
        }

        (Some(record), errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{EvidenceRecord, RecordStatus};
    use crate::storage::{InMemoryStore, StorageError};
    use uuid::Uuid;

    fn processor() -> DocumentProcessor<InMemoryStore> {
        DocumentProcessor::new(Arc::new(TypeRegistry::new()), InMemoryStore::new())
    }

    fn skill_data() -> Map<String, Value> {
        let mut data = Map::new();
        data.insert("skill_name".to_string(), Value::String("Rust".to_string()));
        data.insert(
            "skill_category".to_string(),
            Value::String("Programming".to_string()),
        );
        data
    }

    #[test]
    fn successful_submission_creates_primary_and_subrecord() {
        let processor = processor();
        let (record, errors) = processor.process("skill", &skill_data(), Some("user-7"), &[]);

        let record = record.unwrap();
        assert!(errors.is_empty());
        assert_eq!(record.doc_type, DocumentType::Skill);
        assert_eq!(record.status, RecordStatus::Pending);
        assert!(record.internal_id.starts_with("skill_"));
        assert_eq!(record.validation_hash.len(), 64);
        assert_eq!(record.owner_id.as_deref(), Some("user-7"));

        let subrecord = processor.store().subrecord_for(record.id).unwrap();
        assert_eq!(subrecord.fields, record.canonical_data);
    }

    #[test]
    fn unknown_type_writes_nothing() {
        let processor = processor();
        let (record, errors) = processor.process("diploma", &skill_data(), None, &[]);

        assert!(record.is_none());
        assert_eq!(errors, vec!["Unknown document type: diploma".to_string()]);
        assert_eq!(processor.store().record_count(), 0);
    }

    #[test]
    fn missing_required_field_writes_nothing() {
        let processor = processor();
        let mut data = skill_data();
        data.remove("skill_category");

        let (record, errors) = processor.process("skill", &data, None, &[]);

        assert!(record.is_none());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("skill_category"));
        assert_eq!(processor.store().record_count(), 0);
    }

    #[test]
    fn evidence_is_attached_with_guessed_content_type() {
        let processor = processor();
        let files = vec![FileUpload::new("transcript.pdf", b"%PDF-1.4".to_vec())];
        let (record, errors) = processor.process("skill", &skill_data(), None, &files);

        let record = record.unwrap();
        assert!(errors.is_empty());

        let evidence = processor.store().evidence_for(record.id);
        assert_eq!(evidence.len(), 1);
        assert_eq!(evidence[0].content_type, "application/pdf");
        assert_eq!(evidence[0].description, "Evidence for skill");
        assert_eq!(evidence[0].file_size, 8);
    }

    #[test]
    fn rejected_evidence_does_not_fail_the_submission() {
        let processor = processor();
        let files = vec![FileUpload::new("payload.exe", vec![0x4d, 0x5a])];
        let (record, errors) = processor.process("skill", &skill_data(), None, &files);

        let record = record.unwrap();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("payload.exe"));
        assert!(processor.store().evidence_for(record.id).is_empty());
    }

    /// Store wrapper whose sub-record write always fails, for exercising
    /// the rollback path.
    #[derive(Clone)]
    struct SubRecordFailure {
        inner: InMemoryStore,
    }

    impl CredentialStore for SubRecordFailure {
        fn create_primary(
            &self,
            record: NewRecord,
        ) -> Result<CredentialRecord, StorageError> {
            self.inner.create_primary(record)
        }

        fn create_subrecord(
            &self,
            _doc_type: DocumentType,
            _record_id: Uuid,
            _payload: &Map<String, Value>,
        ) -> Result<Uuid, StorageError> {
            Err(StorageError::Backend("disk full".to_string()))
        }

        fn delete_primary(&self, record_id: Uuid) -> Result<(), StorageError> {
            self.inner.delete_primary(record_id)
        }

        fn attach_evidence(
            &self,
            record_id: Uuid,
            file: &FileUpload,
            content_type: &str,
            description: &str,
        ) -> Result<EvidenceRecord, StorageError> {
            self.inner.attach_evidence(record_id, file, content_type, description)
        }

        fn update_status(
            &self,
            record_id: Uuid,
            status: RecordStatus,
        ) -> Result<CredentialRecord, StorageError> {
            self.inner.update_status(record_id, status)
        }

        fn get(&self, record_id: Uuid) -> Result<Option<CredentialRecord>, StorageError> {
            self.inner.get(record_id)
        }
    }

    #[test]
    fn subrecord_failure_rolls_back_the_primary() {
        let inner = InMemoryStore::new();
        let processor = DocumentProcessor::new(
            Arc::new(TypeRegistry::new()),
            SubRecordFailure { inner: inner.clone() },
        );

        let (record, errors) = processor.process("skill", &skill_data(), None, &[]);

        assert!(record.is_none());
        assert_eq!(errors.len(), 1);
        assert!(errors[0].contains("disk full"));
        assert_eq!(inner.record_count(), 0);
    }
}
