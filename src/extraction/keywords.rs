//! Job-side keyword selection for ATS scoring

use crate::extraction::record::JobDescriptionRecord;

pub const MUST_HAVE_HEADING: &str = "Must have skills:";
pub const NICE_TO_HAVE_HEADING: &str = "Nice to have skills:";

/// Build the keyword string a posting is scored against.
///
/// Must-have bullets come first, then nice-to-have bullets, then the title.
/// When none of those exist the full description text is returned as is.
pub fn extract_keywords(record: &JobDescriptionRecord) -> String {
    let mut terms: Vec<&str> = Vec::new();

    for heading in [MUST_HAVE_HEADING, NICE_TO_HAVE_HEADING] {
        if let Some(items) = record.sections.get(heading) {
            terms.extend(items.iter().map(String::as_str));
        }
    }

    if let Some(title) = &record.title {
        terms.push(title);
    }

    if terms.is_empty() {
        return record.full_text.clone();
    }

    terms.join(" ")
}
