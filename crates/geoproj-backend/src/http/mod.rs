//! HTTP adapters

mod fetch;
mod submitter;

pub use fetch::HttpFetcher;
pub use submitter::{failure_message, HttpProjectSubmitter};
