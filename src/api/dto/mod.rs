//! DTOs
//!
//! Request and response types for the HTTP API.

pub mod character_dto;

pub use character_dto::*;
