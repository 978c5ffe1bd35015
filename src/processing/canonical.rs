//! Canonical payload construction, content hashing, and identifier
//! assignment.

use std::fmt::Write as _;

use chrono::{DateTime, Utc};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

use crate::config::TypeConfig;
use crate::models::DocumentType;

use super::ProcessingError;

/// The allow-listed, validated field set for one document, ready to be
/// hashed and stored.
#[derive(Debug, Clone)]
pub struct CanonicalPayload {
    doc_type: DocumentType,
    fields: Map<String, Value>,
}

impl CanonicalPayload {
    pub fn doc_type(&self) -> DocumentType {
        self.doc_type
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// SHA-256 over the deterministic JSON serialization of the
    /// payload, as 64 lowercase hex characters.
    ///
    /// `serde_json::Map` keeps keys sorted, so equal field sets always
    /// serialize to equal bytes regardless of insertion order.
    pub fn content_hash(&self) -> String {
        let serialized = Value::Object(self.fields.clone()).to_string();
        let digest = Sha256::digest(serialized.as_bytes());
        digest.iter().fold(String::with_capacity(64), |mut s, byte| {
            let _ = write!(s, "{byte:02x}");
            s
        })
    }
}

/// Project caller data onto a type's canonical allow-list.
///
/// Required fields must be present (a present `null` passes — presence
/// is the contract, not non-nullness). Absent optional fields are
/// stored as explicit `null` so every payload of a type carries the
/// same key set. Keys outside the allow-list are ignored.
pub fn canonicalize(
    config: &TypeConfig,
    input: &Map<String, Value>,
) -> Result<CanonicalPayload, ProcessingError> {
    let mut fields = Map::new();
    for field in config.canonical_fields {
        match input.get(field.name) {
            Some(value) => {
                fields.insert(field.name.to_string(), value.clone());
            }
            None if field.required => {
                return Err(ProcessingError::MissingField {
                    doc_type: config.doc_type,
                    field: field.name,
                });
            }
            None => {
                fields.insert(field.name.to_string(), Value::Null);
            }
        }
    }
    Ok(CanonicalPayload {
        doc_type: config.doc_type,
        fields,
    })
}

/// Human-traceable identifier: `<type>_<YYYYMMDDHHMMSSffffff>` with a
/// microsecond suffix. Uniqueness is enforced by the store, not here.
pub fn assign_internal_id(doc_type: DocumentType, instant: DateTime<Utc>) -> String {
    format!(
        "{}_{}{:06}",
        doc_type.as_str(),
        instant.format("%Y%m%d%H%M%S"),
        instant.timestamp_subsec_micros()
    )
}
