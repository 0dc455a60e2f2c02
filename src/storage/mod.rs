//! Storage layer
//!
//! Persists character records as individual JSON files.

pub mod file_store;
pub mod key;
pub mod repository;

pub use file_store::FileCharacterStore;
pub use key::{StorageKey, normalize_name};
pub use repository::CharacterRepository;
