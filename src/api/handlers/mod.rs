//! Handlers
//!
//! HTTP request handlers.

pub mod character_handler;
