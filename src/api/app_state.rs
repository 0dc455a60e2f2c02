use crate::services::character_service::CharacterService;
use std::sync::Arc;

/// Application state shared by every handler
#[derive(Clone)]
pub struct AppState {
    /// Character service for record operations
    pub character_service: Arc<dyn CharacterService>,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("character_service", &"Arc<dyn CharacterService>")
            .finish()
    }
}

impl AppState {
    /// Create new application state
    pub fn new(character_service: Box<dyn CharacterService>) -> Self {
        Self {
            character_service: Arc::from(character_service),
        }
    }
}
