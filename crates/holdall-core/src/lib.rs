pub mod entity;
pub mod error;
pub mod key;
pub mod record;

pub use entity::Entity;
pub use error::RecordError;
pub use key::{Key, generate_key};
pub use record::Record;
