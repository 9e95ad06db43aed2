//! Search result page parsing and title filtering

use crate::error::{Result, ScoutError};
use crate::extraction::fields::flatten_text;
use crate::scoring::MatchScore;
use aho_corasick::AhoCorasick;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};

const LOCATION_CLASSES: [&str; 3] = ["text-sm", "font-normal", "text-zinc-600"];
const COMPANY_CLASSES: [&str; 4] = ["mb-0", "line-clamp-2", "text-sm", "sm:line-clamp-1"];

/// One search result, later enriched with detail page data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub url: String,
    pub location: Option<String>,
    pub employment_type: Option<String>,
    pub salary: Option<String>,
    pub company: Option<String>,
    pub ats_score: MatchScore,
    pub badges: Option<String>,
    pub duration: Option<String>,
    pub experience: Option<String>,
    pub description: Option<String>,
}

impl JobPosting {
    pub fn new(title: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            location: None,
            employment_type: None,
            salary: None,
            company: None,
            ats_score: MatchScore::NotAvailable,
            badges: None,
            duration: None,
            experience: None,
            description: None,
        }
    }
}

/// Case-insensitive "title contains any keyword" filter
pub struct TitleFilter {
    matcher: Option<AhoCorasick>,
}

impl TitleFilter {
    /// An empty keyword list keeps every title
    pub fn new(keywords: &[String]) -> Result<Self> {
        let patterns: Vec<&str> = keywords
            .iter()
            .map(|k| k.trim())
            .filter(|k| !k.is_empty())
            .collect();

        if patterns.is_empty() {
            return Ok(Self { matcher: None });
        }

        let matcher = AhoCorasick::builder()
            .ascii_case_insensitive(true)
            .build(&patterns)
            .map_err(|e| ScoutError::Configuration(format!("Failed to build title filter: {}", e)))?;

        Ok(Self { matcher: Some(matcher) })
    }

    pub fn matches(&self, title: &str) -> bool {
        match &self.matcher {
            Some(matcher) => matcher.is_match(&title.to_lowercase()),
            None => true,
        }
    }
}

pub struct ListingParser {
    link_selector: Selector,
    filter: TitleFilter,
}

impl ListingParser {
    pub fn new(filter: TitleFilter) -> Self {
        Self {
            link_selector: Selector::parse("a[data-testid=\"job-search-job-detail-link\"]")
                .expect("Invalid job link selector"),
            filter,
        }
    }

    /// Postings on one result page whose title passes the filter
    pub fn parse(&self, markup: &str) -> Vec<JobPosting> {
        let document = Html::parse_document(markup);
        let elements: Vec<ElementRef<'_>> = document
            .root_element()
            .descendants()
            .filter_map(ElementRef::wrap)
            .collect();

        let link_ids: Vec<_> = document.select(&self.link_selector).map(|el| el.id()).collect();

        let mut postings = Vec::new();
        for (index, link) in elements.iter().enumerate() {
            if !link_ids.contains(&link.id()) {
                continue;
            }

            let title = flatten_text(*link);
            let Some(url) = link.value().attr("href").map(str::to_string) else {
                continue;
            };
            if !self.filter.matches(&title) {
                continue;
            }

            // Fields are looked up in document order after the link
            let following = &elements[index + 1..];
            let mut posting = JobPosting::new(title, url);
            posting.location = find_text(following, |el| is_p_with_classes(el, &LOCATION_CLASSES));
            posting.employment_type = find_text(following, |el| is_p_with_id(el, "employmentType-label"));
            posting.salary = find_text(following, |el| is_p_with_id(el, "salary-label"));
            posting.company = find_text(following, |el| is_p_with_classes(el, &COMPANY_CLASSES));

            postings.push(posting);
        }

        postings
    }
}

fn find_text<F>(elements: &[ElementRef<'_>], predicate: F) -> Option<String>
where
    F: Fn(&ElementRef<'_>) -> bool,
{
    elements
        .iter()
        .find(|el| predicate(el))
        .map(|el| flatten_text(*el))
        .filter(|t| !t.is_empty())
}

fn is_p_with_id(element: &ElementRef<'_>, id: &str) -> bool {
    element.value().name() == "p" && element.value().id() == Some(id)
}

/// Exact class list match, order ignored
fn is_p_with_classes(element: &ElementRef<'_>, classes: &[&str]) -> bool {
    if element.value().name() != "p" {
        return false;
    }
    let mut found: Vec<&str> = element.value().classes().collect();
    let mut wanted = classes.to_vec();
    found.sort_unstable();
    wanted.sort_unstable();
    found == wanted
}
