//! Structured job description record

use serde::{Deserialize, Serialize};

/// A bold heading and the bullets of the list that follows it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub heading: String,
    pub items: Vec<String>,
}

/// Heading -> bullets, in order of discovery.
///
/// Keys are compared exactly, case included. Inserting a heading that already
/// exists replaces its bullets but keeps its original position.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sections(Vec<Section>);

impl Sections {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, heading: String, items: Vec<String>) {
        match self.0.iter_mut().find(|s| s.heading == heading) {
            Some(existing) => existing.items = items,
            None => self.0.push(Section { heading, items }),
        }
    }

    pub fn get(&self, heading: &str) -> Option<&[String]> {
        self.0
            .iter()
            .find(|s| s.heading == heading)
            .map(|s| s.items.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Section> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(String, Vec<String>)> for Sections {
    fn from_iter<I: IntoIterator<Item = (String, Vec<String>)>>(iter: I) -> Self {
        let mut sections = Sections::new();
        for (heading, items) in iter {
            sections.insert(heading, items);
        }
        sections
    }
}

/// Fields pulled out of a single job detail page.
///
/// Every field is optional except `full_text`, which falls back to the whole
/// document when no description container exists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobDescriptionRecord {
    pub title: Option<String>,
    pub company: Option<String>,
    pub location: Option<String>,
    pub experience: Option<String>,
    pub duration: Option<String>,
    pub employment_type: Option<String>,
    pub badges: Vec<String>,
    pub sections: Sections,
    pub full_text: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sections_keep_discovery_order_on_replace() {
        let mut sections = Sections::new();
        sections.insert("Must have skills:".to_string(), vec!["Go".to_string()]);
        sections.insert("Benefits".to_string(), vec!["Remote".to_string()]);
        sections.insert("Must have skills:".to_string(), vec!["Rust".to_string()]);

        let headings: Vec<&str> = sections.iter().map(|s| s.heading.as_str()).collect();
        assert_eq!(headings, vec!["Must have skills:", "Benefits"]);
        assert_eq!(sections.get("Must have skills:"), Some(&["Rust".to_string()][..]));
    }

    #[test]
    fn test_sections_lookup_is_case_sensitive() {
        let sections: Sections = vec![("Must have skills:".to_string(), vec!["Go".to_string()])]
            .into_iter()
            .collect();

        assert!(sections.get("must have skills:").is_none());
        assert_eq!(sections.len(), 1);
    }
}
