//! Character Vault - record management for tabletop RPG character sheets
//!
//! Create, read, update, delete, list, import and export character
//! records, stored as one JSON document per character, plus a derived
//! sheet view with ability modifiers and proficiency bonus.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod observability;
pub mod services;
pub mod storage;
