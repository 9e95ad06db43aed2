//! Job description extraction module
//! Turns a detail page into a structured record and a keyword string

pub mod fields;
pub mod keywords;
pub mod record;

pub use fields::{extract, FieldExtractor, BADGE_SEPARATOR};
pub use keywords::extract_keywords;
pub use record::{JobDescriptionRecord, Section, Sections};
