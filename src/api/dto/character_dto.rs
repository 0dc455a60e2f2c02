//! Character DTOs
//!
//! Request extractors and response helpers for the character API.

use axum::{
    Json,
    async_trait,
    extract::{FromRequest, Request},
    http::{HeaderValue, header},
    response::{IntoResponse, Response},
};
use serde_json::Value;

use crate::error::AppError;
use crate::models::character::Character;
use crate::services::character_service::ExportedCharacter;

/// Multipart field carrying an imported character file
pub const IMPORT_FIELD: &str = "file";

/// A request body decoded and validated as a [`Character`].
///
/// Malformed JSON is rejected with 400; a well-formed body that breaks
/// record rules is rejected with 422 listing every offending field.
#[derive(Debug, Clone)]
pub struct CharacterBody(pub Character);

#[async_trait]
impl<S> FromRequest<S> for CharacterBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<Value>::from_request(req, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
        let character = Character::from_value(&value)?;
        Ok(Self(character))
    }
}

/// Character file download
#[derive(Debug)]
pub struct ExportResponse(pub ExportedCharacter);

impl ExportResponse {
    /// `attachment; filename="<name>.json"`, with characters that would
    /// break the quoted string replaced
    pub fn content_disposition(file_name: &str) -> Result<HeaderValue, AppError> {
        let safe: String = file_name
            .chars()
            .map(|c| match c {
                '"' | '\\' => '_',
                c if c.is_control() => '_',
                c => c,
            })
            .collect();
        let value = format!("attachment; filename=\"{}\"", safe);
        HeaderValue::from_bytes(value.as_bytes())
            .map_err(|e| AppError::Internal(format!("invalid content disposition: {}", e)))
    }
}

impl IntoResponse for ExportResponse {
    fn into_response(self) -> Response {
        let ExportedCharacter {
            file_name,
            character,
        } = self.0;

        let disposition = match Self::content_disposition(&file_name) {
            Ok(value) => value,
            Err(e) => return e.into_response(),
        };
        let body = match serde_json::to_string_pretty(&character) {
            Ok(body) => body,
            Err(e) => return AppError::from(e).into_response(),
        };

        (
            [
                (
                    header::CONTENT_TYPE,
                    HeaderValue::from_static("application/json"),
                ),
                (header::CONTENT_DISPOSITION, disposition),
            ],
            body,
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_disposition_plain() {
        let value = ExportResponse::content_disposition("Test Character.json").unwrap();
        assert_eq!(value, "attachment; filename=\"Test Character.json\"");
    }

    #[test]
    fn test_content_disposition_escapes_quotes() {
        let value = ExportResponse::content_disposition("The \"Grey\".json").unwrap();
        assert_eq!(value, "attachment; filename=\"The _Grey_.json\"");
    }

    #[test]
    fn test_content_disposition_non_ascii() {
        let value = ExportResponse::content_disposition("Éowyn.json").unwrap();
        assert_eq!(value.as_bytes(), "attachment; filename=\"Éowyn.json\"".as_bytes());
    }
}
