//! Routes
//!
//! Defines the API routes.

pub mod character_routes;
