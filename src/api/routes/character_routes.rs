//! Character Routes
//!
//! Defines the character API routes.

use crate::api::handlers::character_handler::*;
use axum::{
    Router,
    routing::{get, post},
};

use crate::api::app_state::AppState;

/// Create the character router
pub fn create_character_router() -> Router<AppState> {
    Router::new()
        // Collection, with and without the trailing slash
        .route("/characters", post(create_character).get(list_characters))
        .route("/characters/", post(create_character).get(list_characters))
        // Import / export. A character may itself be named "import".
        .route(
            "/characters/import",
            post(import_character)
                .get(get_character)
                .put(update_character)
                .delete(delete_character),
        )
        .route("/characters/export/:name", get(export_character))
        // Single character
        .route(
            "/characters/:name",
            get(get_character)
                .put(update_character)
                .delete(delete_character),
        )
        .route("/characters/:name/sheet", get(get_character_sheet))
}
