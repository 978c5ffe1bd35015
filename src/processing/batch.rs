//! Batch submission: strict input order, per-item failure isolation,
//! aggregate statistics.

use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::models::FileUpload;
use crate::storage::CredentialStore;

use super::pipeline::DocumentProcessor;

/// One document in a batch submission.
#[derive(Debug, Clone)]
pub struct BatchItem {
    pub proof_type: String,
    pub data: Map<String, Value>,
    pub evidence_files: Vec<FileUpload>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchItemStatus {
    Success,
    Failed,
}

/// Outcome of one batch item, at the same index as its input.
#[derive(Debug, Clone, Serialize)]
pub struct BatchItemResult {
    pub index: usize,
    pub proof_type: String,
    pub status: BatchItemStatus,
    pub record_id: Option<Uuid>,
    pub internal_id: Option<String>,
    pub errors: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BatchStatistics {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub results: Vec<BatchItemResult>,
    pub statistics: BatchStatistics,
}

impl<S: CredentialStore> DocumentProcessor<S> {
    /// Process every item in input order. A failed item never stops the
    /// batch; its errors land in its own result slot.
    pub fn process_batch(&self, items: &[BatchItem], owner_id: Option<&str>) -> BatchReport {
        let mut results = Vec::with_capacity(items.len());
        let mut successful = 0;

        for (index, item) in items.iter().enumerate() {
            let (record, errors) =
                self.process(&item.proof_type, &item.data, owner_id, &item.evidence_files);

            let status = if record.is_some() {
                successful += 1;
                BatchItemStatus::Success
            } else {
                BatchItemStatus::Failed
            };
            results.push(BatchItemResult {
                index,
                proof_type: item.proof_type.clone(),
                status,
                record_id: record.as_ref().map(|r| r.id),
                internal_id: record.map(|r| r.internal_id),
                errors,
            });
        }

        let total = items.len();
        tracing::info!(total, successful, failed = total - successful, "batch processed");
        BatchReport {
            statistics: BatchStatistics {
                total,
                successful,
                failed: total - successful,
            },
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TypeRegistry;
    use crate::storage::InMemoryStore;
    use std::sync::Arc;

    fn skill_item(name: &str) -> BatchItem {
        let mut data = Map::new();
        data.insert("skill_name".to_string(), Value::String(name.to_string()));
        data.insert(
            "skill_category".to_string(),
            Value::String("Programming".to_string()),
        );
        BatchItem {
            proof_type: "skill".to_string(),
            data,
            evidence_files: vec![],
        }
    }

    #[test]
    fn failed_item_does_not_stop_the_batch() {
        let processor = DocumentProcessor::new(Arc::new(TypeRegistry::new()), InMemoryStore::new());
        let items = vec![
            skill_item("Rust"),
            BatchItem {
                proof_type: "diploma".to_string(),
                data: Map::new(),
                evidence_files: vec![],
            },
            skill_item("SQL"),
        ];

        let report = processor.process_batch(&items, Some("user-7"));

        assert_eq!(
            report.statistics,
            BatchStatistics { total: 3, successful: 2, failed: 1 }
        );
        assert_eq!(report.results.len(), 3);
        assert_eq!(report.results[0].status, BatchItemStatus::Success);
        assert_eq!(report.results[1].status, BatchItemStatus::Failed);
        assert_eq!(report.results[1].index, 1);
        assert_eq!(report.results[1].errors, vec!["Unknown document type: diploma"]);
        assert_eq!(report.results[2].status, BatchItemStatus::Success);
        assert!(report.results[2].internal_id.as_deref().unwrap().starts_with("skill_"));
        assert_eq!(processor.store().record_count(), 2);
    }

    #[test]
    fn empty_batch_reports_zero_statistics() {
        let processor = DocumentProcessor::new(Arc::new(TypeRegistry::new()), InMemoryStore::new());
        let report = processor.process_batch(&[], None);

        assert!(report.results.is_empty());
        assert_eq!(
            report.statistics,
            BatchStatistics { total: 0, successful: 0, failed: 0 }
        );
    }
}
