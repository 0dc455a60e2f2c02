//! File-backed character store
//!
//! One pretty-printed JSON document per character at
//! `<root>/<storage key>.json`. Every operation goes to disk; nothing is
//! cached.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use super::key::{RECORD_EXTENSION, StorageKey};
use super::repository::CharacterRepository;
use crate::error::{AppError, Result};
use crate::models::character::Character;
use crate::models::validation::Validatable;

#[derive(Debug)]
pub struct FileCharacterStore {
    root: PathBuf,
    /// Serializes writes and deletes issued through this instance
    write_lock: Mutex<()>,
}

impl FileCharacterStore {
    /// Open a store rooted at `root`, creating the directory if needed
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::Storage(format!(
                "cannot create storage directory {}: {}",
                root.display(),
                e
            ))
        })?;
        info!(root = %root.display(), "Character store opened");

        Ok(Self {
            root,
            write_lock: Mutex::new(()),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn record_path(&self, name: &str) -> Result<PathBuf> {
        Ok(StorageKey::from_name(name)?.path_in(&self.root))
    }

    fn is_record_file(path: &Path) -> bool {
        path.extension().and_then(|ext| ext.to_str()) == Some(RECORD_EXTENSION)
    }

    /// Reads only the `name` field of a stored record
    async fn read_name(path: &Path) -> Option<String> {
        let text = match fs::read_to_string(path).await {
            Ok(text) => text,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Skipping unreadable record");
                return None;
            }
        };
        let value: serde_json::Value = match serde_json::from_str(&text) {
            Ok(value) => value,
            Err(e) => {
                debug!(path = %path.display(), error = %e, "Skipping unparsable record");
                return None;
            }
        };
        match value.get("name").and_then(|n| n.as_str()) {
            Some(name) => Some(name.to_string()),
            None => {
                debug!(path = %path.display(), "Skipping record without a name");
                None
            }
        }
    }
}

#[async_trait]
impl CharacterRepository for FileCharacterStore {
    async fn save(&self, character: &Character) -> Result<()> {
        character.validate()?;
        let path = self.record_path(&character.name)?;
        let payload = serde_json::to_string_pretty(character)?;

        let _guard = self.write_lock.lock().await;
        // The directory may have been removed since open
        fs::create_dir_all(&self.root).await.map_err(|e| {
            error!(root = %self.root.display(), error = %e, "Cannot create storage directory");
            AppError::Storage(e.to_string())
        })?;
        fs::write(&path, payload).await.map_err(|e| {
            error!(path = %path.display(), error = %e, "Failed to save character");
            AppError::Storage(e.to_string())
        })?;

        debug!(name = %character.name, path = %path.display(), "Character saved");
        Ok(())
    }

    async fn load(&self, name: &str) -> Option<Character> {
        let path = self.record_path(name).ok()?;
        let text = match fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Failed to read character");
                return None;
            }
        };

        match serde_json::from_str::<Character>(&text) {
            Ok(character) => Some(character),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Stored character is invalid");
                None
            }
        }
    }

    async fn list(&self) -> Vec<String> {
        let mut entries = match fs::read_dir(&self.root).await {
            Ok(entries) => entries,
            Err(e) => {
                warn!(root = %self.root.display(), error = %e, "Failed to list characters");
                return Vec::new();
            }
        };

        let mut names = Vec::new();
        loop {
            let entry = match entries.next_entry().await {
                Ok(Some(entry)) => entry,
                Ok(None) => break,
                Err(e) => {
                    warn!(root = %self.root.display(), error = %e, "Directory scan interrupted");
                    break;
                }
            };
            let path = entry.path();
            if !Self::is_record_file(&path) {
                continue;
            }
            if let Some(name) = Self::read_name(&path).await {
                names.push(name);
            }
        }
        names
    }

    async fn delete(&self, name: &str) -> Result<()> {
        let path = self.record_path(name)?;

        let _guard = self.write_lock.lock().await;
        if !fs::try_exists(&path).await.unwrap_or(false) {
            return Err(AppError::not_found());
        }
        fs::remove_file(&path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                return AppError::not_found();
            }
            error!(path = %path.display(), error = %e, "Failed to delete character");
            AppError::Storage(e.to_string())
        })?;

        debug!(name = %name, path = %path.display(), "Character deleted");
        Ok(())
    }

    async fn exists(&self, name: &str) -> bool {
        match self.record_path(name) {
            Ok(path) => fs::try_exists(&path).await.unwrap_or(false),
            Err(_) => false,
        }
    }
}
