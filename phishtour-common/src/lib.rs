//! # PhishTour Common Library
//!
//! Shared code for the PhishTour backend services including:
//! - Error taxonomy (Error enum, Result alias)
//! - Event types (HistoryEvent enum) and the EventBus
//! - Configuration loading and database path resolution
//! - SQLite database layer (pool init, show persistence)

pub mod config;
pub mod db;
pub mod error;
pub mod events;

pub use error::{Error, Result};
