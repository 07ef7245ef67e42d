use crate::Key;
use serde::{Serialize, de::DeserializeOwned};

/// A persistable application type.
///
/// Implementations declare the kind tag naming their extent and how to read
/// the identifying key out of a value. The serde bounds let stores move
/// entities through the type-erased [`Record`](crate::Record) envelope
/// without any runtime reflection.
pub trait Entity: Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Stable tag naming this type's extent, e.g. `"widget"`.
    ///
    /// Must be non-empty and must not change across runs while stored data
    /// for the type exists.
    const KIND: &'static str;

    /// The value of the designated identity field.
    fn key(&self) -> Key;
}
