//! Job scout library

pub mod cli;
pub mod config;
pub mod error;
pub mod extraction;
pub mod fetch;
pub mod listing;
pub mod notify;
pub mod pipeline;
pub mod resume;
pub mod scoring;
pub mod store;

pub use config::Config;
pub use error::{Result, ScoutError};
pub use extraction::{extract, extract_keywords, JobDescriptionRecord};
pub use scoring::{score, MatchScore};
