//! Flat CSV record store keyed by posting URL

use crate::error::Result;
use crate::listing::JobPosting;
use crate::scoring::MatchScore;
use log::info;
use std::collections::HashSet;
use std::path::PathBuf;

const HEADER: [&str; 11] = [
    "Title",
    "URL",
    "Location",
    "Employment_Type",
    "Salary",
    "Company",
    "ATS_Score",
    "Badges",
    "Duration",
    "Experience",
    "Description",
];

/// One stored row, kept as text so rows written by older runs survive untouched
pub type StoredRow = Vec<String>;

pub struct JobStore {
    path: PathBuf,
}

impl JobStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Rows already on disk; a missing file means there are none
    pub fn load(&self) -> Result<Vec<StoredRow>> {
        if !self.path.exists() {
            info!("No existing record file at {}. Will create a new one.", self.path.display());
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)?;

        let columns = column_positions(reader.headers()?);

        let mut rows = Vec::new();
        for record in reader.records() {
            let record = record?;
            let row = match &columns {
                Some(columns) => columns
                    .iter()
                    .map(|pos| pos.and_then(|i| record.get(i)).unwrap_or_default().to_string())
                    .collect(),
                None => record.iter().map(str::to_string).collect(),
            };
            rows.push(row);
        }

        info!("Loaded {} existing jobs from {}", rows.len(), self.path.display());
        Ok(rows)
    }

    /// Postings whose URL is not among `existing`, in their original order
    pub fn filter_new(&self, scraped: Vec<JobPosting>, existing: &[StoredRow]) -> Vec<JobPosting> {
        let known: HashSet<&str> = existing
            .iter()
            .filter_map(|row| row.get(1).map(String::as_str))
            .collect();

        let total = scraped.len();
        let mut seen = HashSet::new();
        let new: Vec<JobPosting> = scraped
            .into_iter()
            .filter(|p| !known.contains(p.url.as_str()))
            .filter(|p| seen.insert(p.url.clone()))
            .collect();

        info!("Found {} new jobs out of {} scraped jobs", new.len(), total);
        new
    }

    /// Rewrite the file with `existing` followed by `new`, dropping repeated URLs (first kept)
    pub fn save(&self, new: &[JobPosting], existing: &[StoredRow]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let mut writer = csv::Writer::from_path(&self.path)?;
        writer.write_record(HEADER)?;

        let mut seen: HashSet<String> = HashSet::new();
        let rows = existing.iter().cloned().chain(new.iter().map(to_row));
        for row in rows {
            let url = row.get(1).cloned().unwrap_or_default();
            if !seen.insert(url) {
                continue;
            }
            let mut padded = row;
            padded.resize(HEADER.len(), String::new());
            writer.write_record(&padded)?;
        }
        writer.flush()?;

        if existing.is_empty() {
            info!("Created new record file: {}", self.path.display());
        } else {
            info!("Updated {} with {} new jobs", self.path.display(), new.len());
        }
        Ok(())
    }
}

/// Where each `HEADER` column sits in a file, so rows load in `HEADER` order.
///
/// `None` when the file has no `URL` column; rows are then kept as written.
fn column_positions(headers: &csv::StringRecord) -> Option<Vec<Option<usize>>> {
    let position = |name: &str| headers.iter().position(|h| h.trim() == name);
    position("URL")?;
    Some(HEADER.iter().map(|name| position(*name)).collect())
}

fn to_row(posting: &JobPosting) -> StoredRow {
    let text = |value: &Option<String>| value.clone().unwrap_or_default();
    let score = match posting.ats_score {
        MatchScore::Scored(value) => format!("{:.2}", value),
        MatchScore::NotAvailable => "N/A".to_string(),
    };

    vec![
        posting.title.clone(),
        posting.url.clone(),
        text(&posting.location),
        text(&posting.employment_type),
        text(&posting.salary),
        text(&posting.company),
        score,
        text(&posting.badges),
        text(&posting.duration),
        text(&posting.experience),
        text(&posting.description),
    ]
}
