//! geoproj Backend - Adapters for the registration backend and remote datasets
//!
//! - `http`: reqwest-based submitter and dataset fetcher
//! - `memory`: in-process submitter for dry runs and tests

pub mod http;
pub mod memory;

pub use http::{HttpFetcher, HttpProjectSubmitter};
pub use memory::{MemoryProjectSubmitter, ScriptedResponse};
