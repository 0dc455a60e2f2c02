//! Storage keys
//!
//! A character is filed under its name lower-cased with every space
//! replaced by an underscore. Distinct names may collapse onto one key;
//! the later write wins.

use std::path::{Path, PathBuf};

use crate::error::{AppError, Result};

pub const RECORD_EXTENSION: &str = "json";

/// Lower-case and replace spaces with underscores
pub fn normalize_name(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

/// A normalized name that is safe to use as a file stem inside the
/// storage directory
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn from_name(name: &str) -> Result<Self> {
        let key = normalize_name(name);
        if key.is_empty()
            || key == "."
            || key == ".."
            || key.contains(['/', '\\', '\0'])
        {
            return Err(AppError::InvalidName(name.to_string()));
        }
        Ok(Self(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn file_name(&self) -> String {
        format!("{}.{}", self.0, RECORD_EXTENSION)
    }

    pub fn path_in(&self, root: &Path) -> PathBuf {
        root.join(self.file_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Gandalf", "gandalf")]
    #[case("Bob Smith", "bob_smith")]
    #[case("bob smith", "bob_smith")]
    #[case("  Two  Spaces", "__two__spaces")]
    #[case("Éowyn", "éowyn")]
    #[case("Drizzt Do'Urden", "drizzt_do'urden")]
    fn test_normalize_name(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(normalize_name(name), expected);
        assert_eq!(StorageKey::from_name(name).unwrap().as_str(), expected);
    }

    #[test]
    fn test_tabs_are_not_replaced() {
        assert_eq!(normalize_name("A\tB"), "a\tb");
    }

    #[rstest]
    #[case("")]
    #[case(".")]
    #[case("..")]
    #[case("../etc/passwd")]
    #[case("a/b")]
    #[case("a\\b")]
    fn test_rejects_unsafe_keys(#[case] name: &str) {
        assert!(matches!(
            StorageKey::from_name(name),
            Err(AppError::InvalidName(_))
        ));
    }

    #[test]
    fn test_file_name_and_path() {
        let key = StorageKey::from_name("Test Character").unwrap();
        assert_eq!(key.file_name(), "test_character.json");
        assert_eq!(
            key.path_in(Path::new("/data")),
            PathBuf::from("/data/test_character.json")
        );
    }
}
