use thiserror::Error;

/// Errors raised while moving entities through the record envelope.
#[derive(Debug, Error)]
pub enum RecordError {
    #[error("Failed to encode {kind} entity: {source}")]
    Encode {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to decode {kind} record: {source}")]
    Decode {
        kind: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("Entity of kind {kind} did not serialize to a JSON object")]
    NonObjectBody { kind: &'static str },

    #[error("Record kind mismatch: expected {expected}, found {found}")]
    KindMismatch {
        expected: &'static str,
        found: String,
    },
}
