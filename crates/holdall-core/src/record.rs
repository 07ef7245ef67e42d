use crate::{Entity, Key, RecordError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Type-erased envelope a backend stores and returns.
///
/// The entity body is kept as a JSON object so backends can evaluate field
/// filters without knowing the application type; the kind tag and key are
/// duplicated out of the body so key-only operations never touch it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    pub kind: String,
    pub key: Key,
    pub body: Value,
}

impl Record {
    /// Encode an entity into its stored form.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::Encode`] if serialization fails and
    /// [`RecordError::NonObjectBody`] if the type does not serialize to a
    /// JSON object (field filters would be meaningless against it).
    pub fn from_entity<E: Entity>(entity: &E) -> Result<Self, RecordError> {
        let body = serde_json::to_value(entity).map_err(|source| RecordError::Encode {
            kind: E::KIND,
            source,
        })?;
        if !body.is_object() {
            return Err(RecordError::NonObjectBody { kind: E::KIND });
        }
        Ok(Self {
            kind: E::KIND.to_string(),
            key: entity.key(),
            body,
        })
    }

    /// Decode the stored body back into the application type.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError::KindMismatch`] if the record belongs to a
    /// different extent than `E` and [`RecordError::Decode`] if the body no
    /// longer deserializes into `E`.
    pub fn into_entity<E: Entity>(self) -> Result<E, RecordError> {
        if self.kind != E::KIND {
            return Err(RecordError::KindMismatch {
                expected: E::KIND,
                found: self.kind,
            });
        }
        serde_json::from_value(self.body).map_err(|source| RecordError::Decode {
            kind: E::KIND,
            source,
        })
    }

    /// Top-level field of the body, used by filter evaluation.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.body.get(name)
    }
}
