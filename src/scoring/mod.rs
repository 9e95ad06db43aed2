//! ATS scoring module
//! Keyword presence blended with TF-IDF cosine similarity

pub mod scorer;
pub mod tfidf;

pub use scorer::{normalize, score, MatchScore, ScoreBreakdown, SimilarityScorer};
