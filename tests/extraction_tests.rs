//! End-to-end extraction and scoring against saved pages

use job_scout::extraction::{extract, extract_keywords};
use job_scout::resume::load_resume;
use job_scout::scoring::{score, SimilarityScorer};
use std::path::Path;

fn detail_page() -> String {
    std::fs::read_to_string("tests/fixtures/job_detail.html").unwrap()
}

#[test]
fn test_detail_page_fields() {
    let record = extract(&detail_page());

    assert_eq!(record.title.as_deref(), Some("Go Developer Contract"));
    assert_eq!(record.company.as_deref(), Some("Initech Solutions"));
    assert_eq!(record.badges, vec!["Remote", "Contract", "Urgent"]);
    assert_eq!(record.location.as_deref(), Some("Remote"));
    assert_eq!(record.duration.as_deref(), Some("3 months"));
    assert_eq!(record.experience.as_deref(), Some("8+ years"));
    assert_eq!(record.employment_type.as_deref(), Some("C2C / W2"));
    assert!(!record.full_text.contains("Footer City"));
}

#[test]
fn test_detail_page_sections() {
    let record = extract(&detail_page());

    let headings: Vec<&str> = record.sections.iter().map(|s| s.heading.as_str()).collect();
    assert_eq!(headings, vec!["Must have skills:", "Nice to have skills:"]);
    assert_eq!(
        record.sections.get("Must have skills:").unwrap(),
        &["Go".to_string(), "AWS".to_string(), "Kubernetes".to_string()]
    );
}

#[test]
fn test_detail_page_without_header_takes_title_from_position_line() {
    let page = detail_page();
    let start = page.find("<div data-testid=\"job-detail-header-card\"").unwrap();
    let end = page.find("<div data-testid=\"jobDescriptionHtml\"").unwrap();
    let headless = format!("{}{}", &page[..start], &page[end..]);

    let record = extract(&headless);

    assert!(record.company.is_none());
    assert_eq!(record.title.as_deref(), Some("Senior Golang Engineer"));
    assert_eq!(record.location.as_deref(), Some("Remote"));
    assert_eq!(
        extract_keywords(&record),
        "Go AWS Kubernetes Terraform Senior Golang Engineer"
    );
}

#[test]
fn test_keywords_from_detail_page() {
    let record = extract(&detail_page());

    assert_eq!(
        extract_keywords(&record),
        "Go AWS Kubernetes Terraform Go Developer Contract"
    );
}

#[test]
fn test_short_posting_end_to_end() {
    let markup = r#"<html><body>
        <div data-testid="job-detail-header-card"><h1>Go Developer Contract</h1></div>
        <div class="job-description">
          <p>Duration: 3 months</p>
          <p><b>Must have skills:</b></p>
          <ul><li>Go</li><li>AWS</li></ul>
        </div>
    </body></html>"#;

    let record = extract(markup);
    assert_eq!(record.duration.as_deref(), Some("3 months"));

    let keywords = extract_keywords(&record);
    assert!(keywords.contains("Go"));
    assert!(keywords.contains("AWS"));
    assert!(keywords.contains("Go Developer Contract"));
    assert!(keywords.find("AWS").unwrap() < keywords.find("Developer").unwrap());

    // go and aws are present, developer and contract are not: half the job tokens
    let breakdown = SimilarityScorer::new().breakdown("Experienced Go and AWS engineer", &keywords);
    assert_eq!(breakdown.keyword_coverage, 0.5);
    assert!(breakdown.contextual_similarity > 0.0);
    assert!(breakdown.score > 35.0 && breakdown.score < 50.0);
}

#[test]
fn test_missing_header_page() {
    let record = extract("<html><body><div><p>Location: Remote Duration: 6 months</p></div></body></html>");

    assert!(record.title.is_none());
    assert!(record.company.is_none());
    assert!(record.badges.is_empty());
    assert_eq!(record.location.as_deref(), Some("Remote"));
    assert_eq!(record.duration.as_deref(), Some("6 months"));
    assert_eq!(record.full_text, "Location: Remote Duration: 6 months");
    assert_eq!(extract_keywords(&record), record.full_text);
}

#[test]
fn test_score_bounds_and_asymmetry() {
    let resume = "Go developer with Kubernetes, AWS and PostgreSQL experience";
    let keywords = "Go Kubernetes";

    let forward = score(resume, keywords);
    let backward = score(keywords, resume);

    assert_ne!(forward, backward);
    for s in [forward, backward] {
        assert!((0.0..=100.0).contains(&s));
    }
    assert_eq!(score(resume, ""), 0.0);
}

#[tokio::test]
async fn test_resume_fixture_scores_against_detail_page() {
    let resume = load_resume(Path::new("tests/fixtures/sample_resume.txt")).await.unwrap();
    let keywords = extract_keywords(&extract(&detail_page()));

    let breakdown = SimilarityScorer::new().breakdown(&resume, &keywords);

    assert_eq!(breakdown.keyword_coverage, 0.5);
    assert!(breakdown.score > 35.0 && breakdown.score < 70.0);
}

#[tokio::test]
async fn test_markdown_resume_is_plain_text() {
    let text = load_resume(Path::new("tests/fixtures/sample_resume.md")).await.unwrap();

    assert!(text.contains("Jane Doe"));
    assert!(text.contains("Kubernetes"));
    assert!(!text.contains("**"));
    assert!(!text.contains('#'));
}

#[tokio::test]
async fn test_unsupported_and_missing_resume() {
    assert!(load_resume(Path::new("tests/fixtures/unsupported.xyz")).await.is_err());
    assert!(load_resume(Path::new("tests/fixtures/nonexistent.txt")).await.is_err());
}
