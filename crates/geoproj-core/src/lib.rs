//! geoproj Core - Domain models, configuration, and port definitions
//!
//! This crate contains the domain types shared by the classifier and the
//! registration workflow, plus the traits that adapters implement.

pub mod config;
pub mod error;
pub mod formats;
pub mod models;
pub mod ports;

pub use error::{FieldErrors, GeoprojError, Result};
