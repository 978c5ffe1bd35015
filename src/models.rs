//! Core record types shared across the extraction and processing pipeline.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

/// The credential kinds this pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentType {
    Certificate,
    JobHistory,
    Skill,
    Milestone,
    Community,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Certificate => "certificate",
            Self::JobHistory => "job_history",
            Self::Skill => "skill",
            Self::Milestone => "milestone",
            Self::Community => "community",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "certificate" => Some(Self::Certificate),
            "job_history" => Some(Self::JobHistory),
            "skill" => Some(Self::Skill),
            "milestone" => Some(Self::Milestone),
            "community" => Some(Self::Community),
            _ => None,
        }
    }

    pub fn all() -> &'static [DocumentType] {
        &[
            Self::Certificate,
            Self::JobHistory,
            Self::Skill,
            Self::Milestone,
            Self::Community,
        ]
    }
}

impl std::fmt::Display for DocumentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Verification status of a credential record.
///
/// Records are created `Pending` and move to exactly one of the
/// terminal states; no further transition is defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordStatus {
    Pending,
    Verified,
    Rejected,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Verified => "verified",
            Self::Rejected => "rejected",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(Self::Pending),
            "verified" => Some(Self::Verified),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    /// Whether a status change is allowed by the record lifecycle.
    pub fn can_transition_to(&self, next: RecordStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Verified) | (Self::Pending, Self::Rejected)
        )
    }
}

impl std::fmt::Display for RecordStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The primary record created by the processing pipeline.
///
/// `canonical_data` holds the allow-listed field set the validation
/// hash was computed over; owner and status are metadata and do not
/// participate in hashing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub id: Uuid,
    pub doc_type: DocumentType,
    /// Human-traceable identifier: `<type>_<YYYYMMDDHHMMSSffffff>`.
    pub internal_id: String,
    /// 64 lowercase hex chars (SHA-256 of the canonical payload).
    pub validation_hash: String,
    pub canonical_data: Map<String, Value>,
    pub owner_id: Option<String>,
    pub status: RecordStatus,
    pub created_at: DateTime<Utc>,
}

/// An uploaded evidence file, as received from the caller.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Lowercased extension, if the name has one.
    pub fn extension(&self) -> Option<String> {
        self.file_name
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
    }
}

/// Stored metadata for an evidence file attached to a record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceRecord {
    pub id: Uuid,
    pub record_id: Uuid,
    pub file_name: String,
    pub content_type: String,
    pub file_size: usize,
    pub description: String,
    pub uploaded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_type_roundtrip() {
        for doc_type in DocumentType::all() {
            let s = doc_type.as_str();
            assert_eq!(DocumentType::from_str(s), Some(*doc_type), "roundtrip failed for {s}");
        }
    }

    #[test]
    fn document_type_from_invalid() {
        assert_eq!(DocumentType::from_str("diploma"), None);
        assert_eq!(DocumentType::from_str(""), None);
    }

    #[test]
    fn document_type_serde_uses_snake_case() {
        let json = serde_json::to_string(&DocumentType::JobHistory).unwrap();
        assert_eq!(json, "\"job_history\"");
        let parsed: DocumentType = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, DocumentType::JobHistory);
    }

    #[test]
    fn status_transitions_from_pending_only() {
        assert!(RecordStatus::Pending.can_transition_to(RecordStatus::Verified));
        assert!(RecordStatus::Pending.can_transition_to(RecordStatus::Rejected));
        assert!(!RecordStatus::Verified.can_transition_to(RecordStatus::Rejected));
        assert!(!RecordStatus::Rejected.can_transition_to(RecordStatus::Pending));
        assert!(!RecordStatus::Pending.can_transition_to(RecordStatus::Pending));
    }

    #[test]
    fn file_upload_extension_lowercased() {
        let file = FileUpload::new("Scan.PDF", vec![]);
        assert_eq!(file.extension().as_deref(), Some("pdf"));
    }

    #[test]
    fn file_upload_without_extension() {
        let file = FileUpload::new("README", vec![]);
        assert_eq!(file.extension(), None);
    }
}
