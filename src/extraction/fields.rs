//! Field extraction from job detail pages
//!
//! Extraction is best effort: a missing header, container or label leaves the
//! corresponding field empty instead of failing.

use crate::extraction::record::{JobDescriptionRecord, Sections};
use log::debug;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::OnceLock;

/// Separator used when badges are rendered as a single string
pub const BADGE_SEPARATOR: &str = " | ";

const HEADER_SELECTORS: [&str; 2] = ["[data-testid=\"job-detail-header-card\"]", "header"];

/// Bold headings that describe metadata lines rather than bullet sections
const RESERVED_HEADINGS: [&str; 5] = ["position", "location", "duration", "experience", "main skills"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Location,
    Duration,
    Experience,
    EmploymentType,
}

/// One `Label: value` rule, evaluated against every text line
struct LabelRule {
    field: Field,
    pattern: Regex,
}

pub struct FieldExtractor {
    header_selectors: Vec<Selector>,
    heading_selector: Selector,
    company_selector: Selector,
    body_selector: Selector,
    item_selector: Selector,
    label_rules: Vec<LabelRule>,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl FieldExtractor {
    pub fn new() -> Self {
        let header_selectors = HEADER_SELECTORS
            .iter()
            .map(|s| Selector::parse(s).expect("Invalid header selector"))
            .collect();

        let heading_selector =
            Selector::parse("h1, h2, h3, h4, h5, h6").expect("Invalid heading selector");
        let company_selector =
            Selector::parse("a[href*=\"company-profile\"]").expect("Invalid company selector");
        let body_selector = Selector::parse("body").expect("Invalid body selector");
        let item_selector = Selector::parse("li").expect("Invalid list item selector");

        // Order matters: later rules see the same line, so a line carrying both
        // location and duration fills both.
        let label_rules = vec![
            LabelRule {
                field: Field::Title,
                pattern: Regex::new(r"(?i)(?:position|job title):\s*(.*)$").expect("Invalid title regex"),
            },
            LabelRule {
                field: Field::Location,
                pattern: Regex::new(r"(?i)location:\s*(.*?)\s*(?:duration:|$)").expect("Invalid location regex"),
            },
            LabelRule {
                field: Field::Duration,
                pattern: Regex::new(r"(?i)duration:\s*(.*)$").expect("Invalid duration regex"),
            },
            LabelRule {
                field: Field::Experience,
                pattern: Regex::new(r"(?i)experience:\s*(.*)$").expect("Invalid experience regex"),
            },
            LabelRule {
                field: Field::EmploymentType,
                pattern: Regex::new(r"(?i)employment type:\s*(.*)$").expect("Invalid employment type regex"),
            },
        ];

        Self {
            header_selectors,
            heading_selector,
            company_selector,
            body_selector,
            item_selector,
            label_rules,
        }
    }

    /// Parse a job detail page into a [`JobDescriptionRecord`]
    pub fn extract(&self, markup: &str) -> JobDescriptionRecord {
        let document = Html::parse_document(markup);
        let mut record = JobDescriptionRecord::default();

        if let Some(header) = self.find_header(&document) {
            self.read_header(header, &mut record);
        } else {
            debug!("No header region found");
        }

        let container = self.find_container(&document);
        let elements: Vec<ElementRef<'_>> = container
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .collect();

        let title_from_header = record.title.is_some();
        self.read_labelled_lines(&elements, title_from_header, &mut record);
        record.sections = self.read_sections(&elements);
        record.full_text = flatten_text(container);

        record
    }

    fn find_header<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        self.header_selectors
            .iter()
            .find_map(|selector| document.select(selector).next())
    }

    fn read_header(&self, header: ElementRef<'_>, record: &mut JobDescriptionRecord) {
        record.title = header
            .select(&self.heading_selector)
            .next()
            .map(flatten_text)
            .filter(|t| !t.is_empty());

        record.company = header
            .select(&self.company_selector)
            .next()
            .map(flatten_text)
            .filter(|t| !t.is_empty());

        let badge_container = header
            .descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .find(|el| {
                let element = el.value();
                [element.attr("class"), element.attr("data-testid")]
                    .into_iter()
                    .flatten()
                    .any(|value| value.to_lowercase().contains("badge"))
            });

        if let Some(container) = badge_container {
            record.badges = container
                .text()
                .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
                .filter(|t| !t.is_empty())
                .collect();
        }
    }

    /// Description container, falling back to `<body>` and then the whole document
    fn find_container<'a>(&self, document: &'a Html) -> ElementRef<'a> {
        let root = document.root_element();
        let candidates: Vec<(ElementRef<'a>, String)> = root
            .descendants()
            .filter_map(ElementRef::wrap)
            .map(|el| (el, marker_text(el)))
            .filter(|(_, marker)| !marker.is_empty())
            .collect();

        for needle in ["jobdescription", "description"] {
            if let Some((el, _)) = candidates.iter().find(|(_, marker)| marker.contains(needle)) {
                return *el;
            }
        }

        debug!("No description container found, falling back to body");
        document.select(&self.body_selector).next().unwrap_or(root)
    }

    /// Wrapper blocks are visited before the lines they contain, so every
    /// label is last-line-wins. A header title is never replaced.
    fn read_labelled_lines(
        &self,
        elements: &[ElementRef<'_>],
        title_from_header: bool,
        record: &mut JobDescriptionRecord,
    ) {
        for element in elements {
            if !matches!(element.value().name(), "p" | "div" | "li") {
                continue;
            }

            let line = flatten_text(*element);
            if line.is_empty() {
                continue;
            }

            for rule in &self.label_rules {
                let Some(value) = rule
                    .pattern
                    .captures(&line)
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str().trim().to_string())
                else {
                    continue;
                };
                if value.is_empty() {
                    continue;
                }

                match rule.field {
                    Field::Title => {
                        if !title_from_header {
                            record.title = Some(value);
                        }
                    }
                    Field::Location => record.location = Some(value),
                    Field::Duration => record.duration = Some(value),
                    Field::Experience => record.experience = Some(value),
                    Field::EmploymentType => record.employment_type = Some(value),
                }
            }
        }
    }

    fn read_sections(&self, elements: &[ElementRef<'_>]) -> Sections {
        let mut sections = Sections::new();

        for (index, heading) in elements.iter().enumerate() {
            if !matches!(heading.value().name(), "b" | "strong") {
                continue;
            }

            let text = flatten_text(*heading);
            if text.is_empty() || is_reserved_heading(&text) {
                continue;
            }

            // The list must come before the next bold heading
            let list = elements[index + 1..]
                .iter()
                .filter(|el| !el.ancestors().any(|a| a.id() == heading.id()))
                .take_while(|el| !matches!(el.value().name(), "b" | "strong"))
                .find(|el| el.value().name() == "ul");
            let Some(list) = list else {
                continue;
            };

            let items: Vec<String> = list
                .select(&self.item_selector)
                .map(flatten_text)
                .filter(|item| !item.is_empty())
                .collect();

            if !items.is_empty() {
                sections.insert(text, items);
            }
        }

        sections
    }
}

/// Parse a job detail page with the shared default extractor
pub fn extract(markup: &str) -> JobDescriptionRecord {
    static EXTRACTOR: OnceLock<FieldExtractor> = OnceLock::new();
    EXTRACTOR.get_or_init(FieldExtractor::new).extract(markup)
}

/// All descendant text nodes, whitespace collapsed to single spaces
pub(crate) fn flatten_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_reserved_heading(heading: &str) -> bool {
    let normalized = heading.trim().trim_end_matches(':').trim().to_lowercase();
    RESERVED_HEADINGS.contains(&normalized.as_str())
}

/// class, id and data-testid lower-cased with `-` and `_` removed
fn marker_text(element: ElementRef<'_>) -> String {
    let value = element.value();
    [value.attr("class"), value.attr("id"), value.attr("data-testid")]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
        .replace(['-', '_'], "")
}
