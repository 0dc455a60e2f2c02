//! Character API Handlers
//!
//! HTTP handlers for character CRUD, import/export and the sheet view.

use axum::{
    Json,
    extract::{Multipart, Path, State},
    response::IntoResponse,
};
use tracing::debug;

use crate::{
    api::{
        app_state::AppState,
        dto::character_dto::{CharacterBody, ExportResponse, IMPORT_FIELD},
    },
    error::AppError,
};

/// Create a new character
///
/// POST /characters/
pub async fn create_character(
    State(state): State<AppState>,
    CharacterBody(character): CharacterBody,
) -> Result<impl IntoResponse, AppError> {
    debug!("Creating character: {}", character.name);

    state.character_service.create(character).await?;

    Ok(Json(true))
}

/// Get a character by name
///
/// GET /characters/:name
pub async fn get_character(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Getting character: {}", name);

    let character = state.character_service.get(&name).await?;

    Ok(Json(character))
}

/// List all character names
///
/// GET /characters/
pub async fn list_characters(State(state): State<AppState>) -> impl IntoResponse {
    let names = state.character_service.list().await;
    debug!("Listing characters: {} found", names.len());

    Json(names)
}

/// Replace an existing character
///
/// PUT /characters/:name
pub async fn update_character(
    State(state): State<AppState>,
    Path(name): Path<String>,
    CharacterBody(character): CharacterBody,
) -> Result<impl IntoResponse, AppError> {
    debug!("Updating character: {}", name);

    state.character_service.update(&name, character).await?;

    Ok(Json(true))
}

/// Delete a character
///
/// DELETE /characters/:name
pub async fn delete_character(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Deleting character: {}", name);

    state.character_service.delete(&name).await?;

    Ok(Json(true))
}

/// Download a character as a JSON file
///
/// GET /characters/export/:name
pub async fn export_character(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Exporting character: {}", name);

    let exported = state.character_service.export(&name).await?;

    Ok(ExportResponse(exported))
}

/// Import a character from an uploaded JSON file
///
/// POST /characters/import
pub async fn import_character(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::bad_request(e.body_text()))?
    {
        if field.name() != Some(IMPORT_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        debug!("Importing character from file: {}", file_name);
        let contents = field
            .bytes()
            .await
            .map_err(|e| AppError::bad_request(e.body_text()))?;

        state
            .character_service
            .import(&file_name, &contents)
            .await?;

        return Ok(Json(true));
    }

    Err(AppError::bad_request(format!(
        "Missing '{}' upload field",
        IMPORT_FIELD
    )))
}

/// Get the derived character sheet
///
/// GET /characters/:name/sheet
pub async fn get_character_sheet(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    debug!("Getting character sheet: {}", name);

    let sheet = state.character_service.sheet(&name).await?;

    Ok(Json(sheet))
}
