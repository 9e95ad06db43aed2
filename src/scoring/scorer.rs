//! Hybrid keyword + TF-IDF match score between a resume and job keywords

use crate::scoring::tfidf::{cosine_similarity, TfIdfVectorizer};
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

const KEYWORD_WEIGHT: f64 = 0.7;
const CONTEXT_WEIGHT: f64 = 0.3;

/// Score attached to a posting.
///
/// `NotAvailable` marks postings whose detail page could not be fetched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum MatchScore {
    Scored(f64),
    NotAvailable,
}

impl MatchScore {
    pub fn value(&self) -> Option<f64> {
        match self {
            MatchScore::Scored(v) => Some(*v),
            MatchScore::NotAvailable => None,
        }
    }
}

impl fmt::Display for MatchScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatchScore::Scored(v) => write!(f, "{:.2}%", v),
            MatchScore::NotAvailable => write!(f, "N/A"),
        }
    }
}

/// Both components of a score, before weighting
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    /// Share of job tokens present in the resume, 0..=1
    pub keyword_coverage: f64,
    /// TF-IDF cosine similarity, 0..=1
    pub contextual_similarity: f64,
    /// Weighted percentage, rounded to two decimals
    pub score: f64,
}

/// Replace everything but letters, digits and whitespace with a space, then lower-case
pub fn normalize(text: &str) -> String {
    text.chars()
        .map(|c| if c.is_alphanumeric() || c.is_whitespace() { c } else { ' ' })
        .collect::<String>()
        .to_lowercase()
}

pub struct SimilarityScorer {
    vectorizer: TfIdfVectorizer,
}

impl Default for SimilarityScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SimilarityScorer {
    pub fn new() -> Self {
        Self {
            vectorizer: TfIdfVectorizer::new(),
        }
    }

    pub fn score(&self, resume_text: &str, job_keywords: &str) -> f64 {
        self.breakdown(resume_text, job_keywords).score
    }

    pub fn breakdown(&self, resume_text: &str, job_keywords: &str) -> ScoreBreakdown {
        let resume = normalize(resume_text);
        let job = normalize(job_keywords);

        let keyword_coverage = keyword_coverage(&resume, &job);
        let contextual_similarity = match self.vectorizer.fit_transform(&[resume.as_str(), job.as_str()]) {
            Ok(rows) => cosine_similarity(&rows[0], &rows[1]),
            Err(e) => {
                debug!("Contextual similarity skipped: {}", e);
                0.0
            }
        };

        let raw = 100.0 * (KEYWORD_WEIGHT * keyword_coverage + CONTEXT_WEIGHT * contextual_similarity);

        ScoreBreakdown {
            keyword_coverage,
            contextual_similarity,
            score: round2(raw.clamp(0.0, 100.0)),
        }
    }
}

/// Score resume text against job keywords, 0..=100 rounded to two decimals
pub fn score(resume_text: &str, job_keywords: &str) -> f64 {
    SimilarityScorer::new().score(resume_text, job_keywords)
}

fn keyword_coverage(resume: &str, job: &str) -> f64 {
    let job_tokens: HashSet<&str> = job.split_whitespace().collect();
    if job_tokens.is_empty() {
        return 0.0;
    }
    let resume_tokens: HashSet<&str> = resume.split_whitespace().collect();

    job_tokens.intersection(&resume_tokens).count() as f64 / job_tokens.len() as f64
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
