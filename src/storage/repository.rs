use async_trait::async_trait;

use crate::error::Result;
use crate::models::character::Character;

/// Durable character storage keyed by normalized name
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CharacterRepository: Send + Sync {
    /// Write the record, replacing whatever was stored under the same key
    async fn save(&self, character: &Character) -> Result<()>;

    /// `None` when nothing is stored, or the stored record is unreadable
    async fn load(&self, name: &str) -> Option<Character>;

    /// Names of every readable record, in directory order
    async fn list(&self) -> Vec<String>;

    /// `AppError::NotFound` when nothing is stored under the name
    async fn delete(&self, name: &str) -> Result<()>;

    /// Whether a record file exists under the name's key
    async fn exists(&self, name: &str) -> bool;
}
