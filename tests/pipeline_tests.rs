//! Orchestrator tests with in-memory collaborators

use job_scout::error::{Result, ScoutError};
use job_scout::fetch::JobSource;
use job_scout::listing::JobPosting;
use job_scout::notify::Notifier;
use job_scout::pipeline::Pipeline;
use job_scout::scoring::MatchScore;
use job_scout::store::JobStore;
use std::collections::HashMap;
use std::sync::Mutex;

const RESUME: &str = "Senior engineer: Go, AWS, Kubernetes and distributed systems";

struct FakeSource {
    postings: Vec<JobPosting>,
    details: HashMap<String, Result<Option<String>>>,
}

impl FakeSource {
    fn new(postings: Vec<JobPosting>) -> Self {
        Self {
            postings,
            details: HashMap::new(),
        }
    }

    fn with_detail(mut self, url: &str, detail: Result<Option<String>>) -> Self {
        self.details.insert(url.to_string(), detail);
        self
    }
}

impl JobSource for FakeSource {
    async fn fetch_postings(&self) -> Result<Vec<JobPosting>> {
        Ok(self.postings.clone())
    }

    async fn fetch_detail(&self, url: &str) -> Result<Option<String>> {
        match self.details.get(url) {
            Some(Ok(detail)) => Ok(detail.clone()),
            Some(Err(e)) => Err(ScoutError::Notification(e.to_string())),
            None => Ok(None),
        }
    }
}

#[derive(Default)]
struct RecordingNotifier {
    postings: Mutex<Vec<String>>,
    completions: Mutex<Vec<usize>>,
}

impl Notifier for RecordingNotifier {
    async fn notify_posting(&self, posting: &JobPosting) -> Result<()> {
        self.postings.lock().unwrap().push(posting.url.clone());
        Ok(())
    }

    async fn notify_completion(&self, new_jobs: usize) -> Result<()> {
        self.completions.lock().unwrap().push(new_jobs);
        Ok(())
    }
}

fn detail_page(skills: &[&str]) -> String {
    let items: String = skills.iter().map(|s| format!("<li>{}</li>", s)).collect();
    format!(
        r#"<html><body>
            <div data-testid="job-detail-header-card"><h1>Go Engineer</h1>
              <a href="/company-profile/1">Detail Co</a></div>
            <div class="job-description"><p><b>Must have skills:</b></p><ul>{}</ul></div>
        </body></html>"#,
        items
    )
}

#[tokio::test]
async fn test_new_postings_are_scored_saved_and_sent() {
    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("jobs.csv");

    let source = FakeSource::new(vec![
        JobPosting::new("Golang Dev", "https://jobs/1"),
        JobPosting::new("Backend Dev", "https://jobs/2"),
    ])
    .with_detail("https://jobs/1", Ok(Some(detail_page(&["Go", "AWS"]))))
    .with_detail("https://jobs/2", Ok(None));

    let pipeline = Pipeline::new(source, Some(RecordingNotifier::default()), JobStore::new(&store_path));
    let (postings, summary) = pipeline.run(RESUME).await.unwrap();

    assert_eq!(summary.scraped, 2);
    assert_eq!(summary.new_jobs, 2);
    assert_eq!(summary.scored, 1);
    assert_eq!(summary.unscored, 1);
    assert_eq!(summary.notified, 2);

    assert_eq!(postings[0].title, "Go Engineer");
    assert_eq!(postings[0].company.as_deref(), Some("Detail Co"));
    assert!(matches!(postings[0].ats_score, MatchScore::Scored(s) if s > 50.0));
    assert_eq!(postings[1].ats_score, MatchScore::NotAvailable);

    let rows = JobStore::new(&store_path).load().unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[1][6], "N/A");
}

#[tokio::test]
async fn test_known_postings_only_send_completion() {
    let dir = tempfile::tempdir().unwrap();
    let store = JobStore::new(dir.path().join("jobs.csv"));
    store.save(&[JobPosting::new("Golang Dev", "https://jobs/1")], &[]).unwrap();

    let notifier = RecordingNotifier::default();
    let source = FakeSource::new(vec![JobPosting::new("Golang Dev", "https://jobs/1")]);
    let pipeline = Pipeline::new(source, Some(notifier), store);

    let (postings, summary) = pipeline.run(RESUME).await.unwrap();

    assert!(postings.is_empty());
    assert_eq!(summary.new_jobs, 0);
    assert_eq!(summary.notified, 0);
}

#[tokio::test]
async fn test_fetch_error_is_isolated() {
    let dir = tempfile::tempdir().unwrap();
    let source = FakeSource::new(vec![
        JobPosting::new("Golang Dev", "https://jobs/1"),
        JobPosting::new("Go Developer", "https://jobs/2"),
    ])
    .with_detail("https://jobs/1", Err(ScoutError::InvalidInput("connection reset".to_string())))
    .with_detail("https://jobs/2", Ok(Some(detail_page(&["Kubernetes"]))));

    let pipeline = Pipeline::new(source, None::<RecordingNotifier>, JobStore::new(dir.path().join("jobs.csv")));
    let (postings, summary) = pipeline.run(RESUME).await.unwrap();

    assert_eq!(postings.len(), 2);
    assert_eq!(postings[0].ats_score, MatchScore::NotAvailable);
    assert!(matches!(postings[1].ats_score, MatchScore::Scored(_)));
    assert_eq!(summary.unscored, 1);
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store_path = dir.path().join("jobs.csv");
    let source = FakeSource::new(vec![JobPosting::new("Golang Dev", "https://jobs/1")])
        .with_detail("https://jobs/1", Ok(Some(detail_page(&["Go"]))));

    let pipeline = Pipeline::new(source, Some(RecordingNotifier::default()), JobStore::new(&store_path))
        .dry_run(true);
    let (postings, summary) = pipeline.run(RESUME).await.unwrap();

    assert_eq!(postings.len(), 1);
    assert_eq!(summary.notified, 0);
    assert!(!store_path.exists());
}

#[tokio::test]
async fn test_empty_scrape_stops_early() {
    let dir = tempfile::tempdir().unwrap();
    let pipeline = Pipeline::new(
        FakeSource::new(Vec::new()),
        Some(RecordingNotifier::default()),
        JobStore::new(dir.path().join("jobs.csv")),
    );

    let (postings, summary) = pipeline.run(RESUME).await.unwrap();

    assert!(postings.is_empty());
    assert_eq!(summary.scraped, 0);
}
