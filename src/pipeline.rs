//! Scrape, score, store and notify cycle

use crate::error::Result;
use crate::extraction::{extract_keywords, FieldExtractor, BADGE_SEPARATOR};
use crate::fetch::JobSource;
use crate::listing::JobPosting;
use crate::notify::Notifier;
use crate::scoring::{MatchScore, SimilarityScorer};
use crate::store::JobStore;
use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub scraped: usize,
    pub new_jobs: usize,
    pub scored: usize,
    pub unscored: usize,
    pub notified: usize,
}

pub struct Pipeline<S, N> {
    source: S,
    notifier: Option<N>,
    store: JobStore,
    extractor: FieldExtractor,
    scorer: SimilarityScorer,
    dry_run: bool,
    show_progress: bool,
}

impl<S: JobSource, N: Notifier> Pipeline<S, N> {
    pub fn new(source: S, notifier: Option<N>, store: JobStore) -> Self {
        Self {
            source,
            notifier,
            store,
            extractor: FieldExtractor::new(),
            scorer: SimilarityScorer::new(),
            dry_run: false,
            show_progress: false,
        }
    }

    /// Score postings but leave the record file and the chat untouched
    pub fn dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Run one cycle and return the enriched new postings with a summary
    pub async fn run(&self, resume_text: &str) -> Result<(Vec<JobPosting>, RunSummary)> {
        let mut summary = RunSummary::default();

        let scraped = self.source.fetch_postings().await?;
        summary.scraped = scraped.len();
        if scraped.is_empty() {
            info!("No jobs found during scraping");
            return Ok((Vec::new(), summary));
        }

        let existing = self.store.load()?;
        let new = self.store.filter_new(scraped, &existing);
        summary.new_jobs = new.len();

        if new.is_empty() {
            info!("No new jobs found; all scraped jobs already exist in the record file");
            self.send_completion(0).await;
            return Ok((Vec::new(), summary));
        }

        let progress = self.progress_bar(new.len() as u64);
        let mut enriched = Vec::with_capacity(new.len());
        for posting in new {
            progress.set_message(posting.title.clone());

            let detail = match self.source.fetch_detail(&posting.url).await {
                Ok(detail) => detail,
                Err(e) => {
                    warn!("Fetching {} failed: {}", posting.url, e);
                    None
                }
            };

            let posting = enrich_posting(posting, detail.as_deref(), resume_text, &self.extractor, &self.scorer);
            match posting.ats_score {
                MatchScore::Scored(_) => summary.scored += 1,
                MatchScore::NotAvailable => summary.unscored += 1,
            }
            enriched.push(posting);
            progress.inc(1);
        }
        progress.finish_and_clear();

        if self.dry_run {
            info!("Dry run: skipping record file and notifications");
            return Ok((enriched, summary));
        }

        self.store.save(&enriched, &existing)?;

        if let Some(notifier) = &self.notifier {
            for posting in &enriched {
                match notifier.notify_posting(posting).await {
                    Ok(()) => summary.notified += 1,
                    Err(e) => warn!("Failed to send job '{}': {}", posting.title, e),
                }
            }
        }
        self.send_completion(enriched.len()).await;

        Ok((enriched, summary))
    }

    async fn send_completion(&self, new_jobs: usize) {
        if self.dry_run {
            return;
        }
        if let Some(notifier) = &self.notifier {
            if let Err(e) = notifier.notify_completion(new_jobs).await {
                warn!("Failed to send completion message: {}", e);
            }
        }
    }

    fn progress_bar(&self, len: u64) -> ProgressBar {
        if !self.show_progress {
            return ProgressBar::hidden();
        }
        let bar = ProgressBar::new(len);
        if let Ok(style) = ProgressStyle::with_template("{spinner} [{bar:30}] {pos}/{len} {wide_msg}") {
            bar.set_style(style.progress_chars("=> "));
        }
        bar
    }
}

/// Fold detail page data and the ATS score into a posting.
///
/// Without detail markup the posting is returned with `MatchScore::NotAvailable`.
pub fn enrich_posting(
    mut posting: JobPosting,
    detail: Option<&str>,
    resume_text: &str,
    extractor: &FieldExtractor,
    scorer: &SimilarityScorer,
) -> JobPosting {
    let Some(markup) = detail else {
        posting.ats_score = MatchScore::NotAvailable;
        return posting;
    };

    let record = extractor.extract(markup);
    let keywords = extract_keywords(&record);
    posting.ats_score = MatchScore::Scored(scorer.score(resume_text, &keywords));

    if let Some(title) = record.title {
        posting.title = title;
    }
    if record.company.is_some() {
        posting.company = record.company;
    }
    if !record.badges.is_empty() {
        posting.badges = Some(record.badges.join(BADGE_SEPARATOR));
    }
    posting.location = posting.location.or(record.location);
    posting.employment_type = posting.employment_type.or(record.employment_type);
    posting.duration = record.duration;
    posting.experience = record.experience;
    posting.description = Some(record.full_text);

    posting
}
