//! Character service
//!
//! Request-level rules on top of the store: create versus update,
//! name checks, import and export, and the sheet view.

use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::models::character::Character;
use crate::models::sheet::CharacterSheet;
use crate::storage::key::RECORD_EXTENSION;
use crate::storage::repository::CharacterRepository;

/// A character ready to be sent as a file download
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportedCharacter {
    pub file_name: String,
    pub character: Character,
}

/// Character service trait
#[async_trait]
pub trait CharacterService: Send + Sync {
    /// Create a character; fails if one is already stored under the name
    async fn create(&self, character: Character) -> Result<()>;

    async fn get(&self, name: &str) -> Result<Character>;

    async fn list(&self) -> Vec<String>;

    /// Replace the character stored under `name`
    async fn update(&self, name: &str, character: Character) -> Result<()>;

    async fn delete(&self, name: &str) -> Result<()>;

    async fn export(&self, name: &str) -> Result<ExportedCharacter>;

    /// Create a character from an uploaded `.json` file
    async fn import(&self, file_name: &str, contents: &[u8]) -> Result<()>;

    async fn sheet(&self, name: &str) -> Result<CharacterSheet>;
}

/// Character service implementation
pub struct CharacterServiceImpl {
    repository: Arc<dyn CharacterRepository>,
}

impl CharacterServiceImpl {
    pub fn new(repository: Arc<dyn CharacterRepository>) -> Self {
        Self { repository }
    }

    fn has_json_extension(file_name: &str) -> bool {
        Path::new(file_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case(RECORD_EXTENSION))
    }

    fn parse_upload(contents: &[u8]) -> Result<Character> {
        let value: serde_json::Value = serde_json::from_slice(contents).map_err(|e| {
            AppError::bad_request(format!("Invalid character data: {}", e))
        })?;
        Character::from_value(&value).map_err(|errors| AppError::BadRequest {
            message: format!("Invalid character data: {}", errors),
            details: Some(errors),
        })
    }
}

#[async_trait]
impl CharacterService for CharacterServiceImpl {
    async fn create(&self, character: Character) -> Result<()> {
        if self.repository.exists(&character.name).await {
            return Err(AppError::Conflict("Character already exists".to_string()));
        }

        self.repository.save(&character).await?;
        info!(name = %character.name, "Character created");
        Ok(())
    }

    async fn get(&self, name: &str) -> Result<Character> {
        self.repository
            .load(name)
            .await
            .ok_or_else(AppError::not_found)
    }

    async fn list(&self) -> Vec<String> {
        self.repository.list().await
    }

    async fn update(&self, name: &str, character: Character) -> Result<()> {
        if !character.name_matches(name) {
            return Err(AppError::Conflict("Character name mismatch".to_string()));
        }
        if !self.repository.exists(name).await {
            return Err(AppError::not_found());
        }

        self.repository.save(&character).await?;
        info!(name = %character.name, "Character updated");
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<()> {
        if !self.repository.exists(name).await {
            return Err(AppError::not_found());
        }

        self.repository.delete(name).await?;
        info!(name = %name, "Character deleted");
        Ok(())
    }

    async fn export(&self, name: &str) -> Result<ExportedCharacter> {
        let character = self.get(name).await?;
        Ok(ExportedCharacter {
            file_name: format!("{}.{}", character.name, RECORD_EXTENSION),
            character,
        })
    }

    async fn import(&self, file_name: &str, contents: &[u8]) -> Result<()> {
        if !Self::has_json_extension(file_name) {
            return Err(AppError::bad_request("File must be a JSON file"));
        }
        debug!(file_name = %file_name, size = contents.len(), "Importing character");

        let character = Self::parse_upload(contents)?;
        self.create(character).await
    }

    async fn sheet(&self, name: &str) -> Result<CharacterSheet> {
        let character = self.get(name).await?;
        Ok(CharacterSheet::compute(&character))
    }
}

/// Create character service
pub fn create_character_service(
    repository: Arc<dyn CharacterRepository>,
) -> Box<dyn CharacterService> {
    Box::new(CharacterServiceImpl::new(repository))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::character::AbilityScores;
    use crate::storage::repository::MockCharacterRepository;
    use mockall::predicate::eq;

    fn character(name: &str) -> Character {
        Character {
            name: name.to_string(),
            race: "Dwarf".to_string(),
            character_class: "Cleric".to_string(),
            level: 5,
            ability_scores: AbilityScores::new(14, 8, 15, 10, 16, 12),
            max_hp: 38,
            current_hp: 38,
            inventory: Vec::new(),
        }
    }

    fn service(repository: MockCharacterRepository) -> CharacterServiceImpl {
        CharacterServiceImpl::new(Arc::new(repository))
    }

    #[tokio::test]
    async fn test_create_rejects_existing() {
        let mut repo = MockCharacterRepository::new();
        repo.expect_exists()
            .with(eq("Thorin"))
            .returning(|_| true);
        repo.expect_save().never();

        let err = service(repo).create(character("Thorin")).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == "Character already exists"));
    }

    #[tokio::test]
    async fn test_create_surfaces_storage_failure() {
        let mut repo = MockCharacterRepository::new();
        repo.expect_exists().returning(|_| false);
        repo.expect_save()
            .times(1)
            .returning(|_| Err(AppError::Storage("read-only file system".to_string())));

        let err = service(repo).create(character("Thorin")).await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }

    #[tokio::test]
    async fn test_update_checks_name_before_existence() {
        let mut repo = MockCharacterRepository::new();
        repo.expect_exists().never();
        repo.expect_save().never();

        let err = service(repo)
            .update("A", character("B"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(ref m) if m == "Character name mismatch"));
    }

    #[tokio::test]
    async fn test_update_name_compare_ignores_case() {
        let mut repo = MockCharacterRepository::new();
        repo.expect_exists()
            .with(eq("thorin"))
            .returning(|_| true);
        repo.expect_save().times(1).returning(|_| Ok(()));

        service(repo)
            .update("thorin", character("Thorin"))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let mut repo = MockCharacterRepository::new();
        repo.expect_exists().returning(|_| false);
        repo.expect_save().never();

        let err = service(repo)
            .update("Thorin", character("Thorin"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_surfaces_storage_failure() {
        let mut repo = MockCharacterRepository::new();
        repo.expect_exists().returning(|_| true);
        repo.expect_delete()
            .returning(|_| Err(AppError::Storage("permission denied".to_string())));

        let err = service(repo).delete("Thorin").await.unwrap_err();
        assert!(matches!(err, AppError::Storage(_)));
    }

    #[tokio::test]
    async fn test_import_rejects_extension_before_parsing() {
        let mut repo = MockCharacterRepository::new();
        repo.expect_exists().never();
        repo.expect_save().never();

        let err = service(repo)
            .import("character.txt", b"{\"name\": \"Thorin\"}")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest { ref message, .. } if message == "File must be a JSON file"));
    }

    #[tokio::test]
    async fn test_import_accepts_uppercase_extension() {
        let mut repo = MockCharacterRepository::new();
        repo.expect_exists().returning(|_| false);
        repo.expect_save().times(1).returning(|_| Ok(()));

        let body = serde_json::to_vec(&character("Thorin")).unwrap();
        service(repo).import("THORIN.JSON", &body).await.unwrap();
    }

    #[tokio::test]
    async fn test_import_invalid_data_lists_fields() {
        let mut repo = MockCharacterRepository::new();
        repo.expect_save().never();

        let err = service(repo)
            .import("character.json", br#"{"name": "Invalid"}"#)
            .await
            .unwrap_err();
        match err {
            AppError::BadRequest { message, details } => {
                assert!(message.starts_with("Invalid character data"));
                let details = details.unwrap();
                assert!(details.has_field("race"));
                assert!(details.has_field("ability_scores"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_import_unparsable_json() {
        let repo = MockCharacterRepository::new();

        let err = service(repo)
            .import("character.json", b"invalid data")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::BadRequest { details: None, .. }));
    }

    #[tokio::test]
    async fn test_export_uses_record_name() {
        let mut repo = MockCharacterRepository::new();
        repo.expect_load()
            .with(eq("thorin oakenshield"))
            .returning(|_| Some(character("Thorin Oakenshield")));

        let exported = service(repo).export("thorin oakenshield").await.unwrap();
        assert_eq!(exported.file_name, "Thorin Oakenshield.json");
    }

    #[tokio::test]
    async fn test_sheet_for_missing_character() {
        let mut repo = MockCharacterRepository::new();
        repo.expect_load().returning(|_| None);

        let err = service(repo).sheet("Nobody").await.unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_sheet_computes_proficiency() {
        let mut repo = MockCharacterRepository::new();
        repo.expect_load().returning(|name| Some(character(name)));

        let sheet = service(repo).sheet("Thorin").await.unwrap();
        assert_eq!(sheet.proficiency_bonus, 3);
        assert_eq!(sheet.ability_scores.wisdom.modifier, 3);
    }
}
