//! Domain layer: entities and business logic
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod entities;
pub mod error;
pub mod history;
pub mod validate;

pub use entities::*;
pub use error::ValidationError;
pub use history::{History, DEFAULT_MAX_HISTORY};
pub use validate::decode_collection;
