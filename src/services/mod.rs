//! Service layer

pub mod character_service;

pub use character_service::{
    CharacterService, CharacterServiceImpl, ExportedCharacter, create_character_service,
};
