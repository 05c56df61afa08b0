//! Core module - Settings, errors and the shared result model
//!
//! This module provides:
//! - Settings loading and validation
//! - The engine's error taxonomy
//! - Result model and rendering for the inspection commands
//! - Path normalization and search-path placeholder substitution
//! - Common utilities

pub mod config;
pub mod error;
pub mod model;
pub mod paths;
pub mod render;
pub mod util;
