//! Resume input module
//! Loads the candidate resume once per run

pub mod extractor;
pub mod format;
pub mod loader;

pub use loader::load_resume;
