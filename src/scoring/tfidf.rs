//! TF-IDF vectorization over a small in-memory corpus

use regex::Regex;
use std::collections::{BTreeMap, HashSet};
use std::sync::OnceLock;

/// Returned when no term survives tokenization and stop word removal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyVocabulary;

impl std::fmt::Display for EmptyVocabulary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "empty vocabulary; documents only contain stop words")
    }
}

impl std::error::Error for EmptyVocabulary {}

/// Unigram + bigram TF-IDF vectorizer.
///
/// Tokens are runs of two or more word characters. Stop words are dropped
/// before bigrams are formed. Weights are raw counts times a smoothed idf,
/// `ln((1 + n) / (1 + df)) + 1`, and every row is l2-normalized.
pub struct TfIdfVectorizer {
    token_regex: Regex,
    stop_words: &'static HashSet<&'static str>,
    ngram_max: usize,
}

impl Default for TfIdfVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl TfIdfVectorizer {
    pub fn new() -> Self {
        Self {
            token_regex: Regex::new(r"\b\w\w+\b").expect("Invalid token regex"),
            stop_words: english_stop_words(),
            ngram_max: 2,
        }
    }

    /// Terms of one document, unigrams first then bigrams
    pub fn analyze(&self, document: &str) -> Vec<String> {
        let tokens: Vec<&str> = self
            .token_regex
            .find_iter(document)
            .map(|m| m.as_str())
            .filter(|t| !self.stop_words.contains(t))
            .collect();

        let mut terms: Vec<String> = tokens.iter().map(|t| t.to_string()).collect();
        for n in 2..=self.ngram_max {
            terms.extend(tokens.windows(n).map(|w| w.join(" ")));
        }
        terms
    }

    /// Fit on `documents` and return one l2-normalized row per document.
    ///
    /// All rows share the same column order (sorted vocabulary).
    pub fn fit_transform(&self, documents: &[&str]) -> Result<Vec<Vec<f64>>, EmptyVocabulary> {
        let counts: Vec<BTreeMap<String, usize>> = documents
            .iter()
            .map(|doc| {
                let mut tf = BTreeMap::new();
                for term in self.analyze(doc) {
                    *tf.entry(term).or_insert(0) += 1;
                }
                tf
            })
            .collect();

        let mut document_frequency: BTreeMap<&str, usize> = BTreeMap::new();
        for tf in &counts {
            for term in tf.keys() {
                *document_frequency.entry(term.as_str()).or_insert(0) += 1;
            }
        }

        if document_frequency.is_empty() {
            return Err(EmptyVocabulary);
        }

        let n = documents.len() as f64;
        let vocabulary: Vec<(&str, f64)> = document_frequency
            .iter()
            .map(|(term, df)| (*term, ((1.0 + n) / (1.0 + *df as f64)).ln() + 1.0))
            .collect();

        let rows = counts
            .iter()
            .map(|tf| {
                let mut row: Vec<f64> = vocabulary
                    .iter()
                    .map(|(term, idf)| tf.get(*term).copied().unwrap_or(0) as f64 * idf)
                    .collect();
                let norm = row.iter().map(|w| w * w).sum::<f64>().sqrt();
                if norm > 0.0 {
                    row.iter_mut().for_each(|w| *w /= norm);
                }
                row
            })
            .collect();

        Ok(rows)
    }
}

/// Cosine similarity; zero when either vector has no weight
pub fn cosine_similarity(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        0.0
    } else {
        dot / (norm_a * norm_b)
    }
}

/// The standard English stop word list used by common TF-IDF tooling
fn english_stop_words() -> &'static HashSet<&'static str> {
    static STOP_WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();
    STOP_WORDS.get_or_init(|| {
        [
            "a", "about", "above", "across", "after", "afterwards", "again", "against", "all",
            "almost", "alone", "along", "already", "also", "although", "always", "am", "among",
            "amongst", "amoungst", "amount", "an", "and", "another", "any", "anyhow", "anyone",
            "anything", "anyway", "anywhere", "are", "around", "as", "at", "back", "be", "became",
            "because", "become", "becomes", "becoming", "been", "before", "beforehand", "behind",
            "being", "below", "beside", "besides", "between", "beyond", "bill", "both", "bottom",
            "but", "by", "call", "can", "cannot", "cant", "co", "con", "could", "couldnt", "cry",
            "de", "describe", "detail", "do", "done", "down", "due", "during", "each", "eg",
            "eight", "either", "eleven", "else", "elsewhere", "empty", "enough", "etc", "even",
            "ever", "every", "everyone", "everything", "everywhere", "except", "few", "fifteen",
            "fifty", "fill", "find", "fire", "first", "five", "for", "former", "formerly", "forty",
            "found", "four", "from", "front", "full", "further", "get", "give", "go", "had", "has",
            "hasnt", "have", "he", "hence", "her", "here", "hereafter", "hereby", "herein",
            "hereupon", "hers", "herself", "him", "himself", "his", "how", "however", "hundred",
            "i", "ie", "if", "in", "inc", "indeed", "interest", "into", "is", "it", "its", "itself",
            "keep", "last", "latter", "latterly", "least", "less", "ltd", "made", "many", "may",
            "me", "meanwhile", "might", "mill", "mine", "more", "moreover", "most", "mostly",
            "move", "much", "must", "my", "myself", "name", "namely", "neither", "never",
            "nevertheless", "next", "nine", "no", "nobody", "none", "noone", "nor", "not",
            "nothing", "now", "nowhere", "of", "off", "often", "on", "once", "one", "only", "onto",
            "or", "other", "others", "otherwise", "our", "ours", "ourselves", "out", "over", "own",
            "part", "per", "perhaps", "please", "put", "rather", "re", "same", "see", "seem",
            "seemed", "seeming", "seems", "serious", "several", "she", "should", "show", "side",
            "since", "sincere", "six", "sixty", "so", "some", "somehow", "someone", "something",
            "sometime", "sometimes", "somewhere", "still", "such", "system", "take", "ten", "than",
            "that", "the", "their", "them", "themselves", "then", "thence", "there", "thereafter",
            "thereby", "therefore", "therein", "thereupon", "these", "they", "thick", "thin",
            "third", "this", "those", "though", "three", "through", "throughout", "thru", "thus",
            "to", "together", "too", "top", "toward", "towards", "twelve", "twenty", "two", "un",
            "under", "until", "up", "upon", "us", "very", "via", "was", "we", "well", "were",
            "what", "whatever", "when", "whence", "whenever", "where", "whereafter", "whereas",
            "whereby", "wherein", "whereupon", "wherever", "whether", "which", "while", "whither",
            "who", "whoever", "whole", "whom", "whose", "why", "will", "with", "within", "without",
            "would", "yet", "you", "your", "yours", "yourself", "yourselves",
        ]
        .into_iter()
        .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analyze_drops_stop_words_before_bigrams() {
        let vectorizer = TfIdfVectorizer::new();
        let terms = vectorizer.analyze("experience with distributed systems and go");

        assert_eq!(
            terms,
            vec!["experience", "distributed", "systems", "experience distributed", "distributed systems"]
        );
    }

    #[test]
    fn test_single_character_tokens_are_ignored() {
        let vectorizer = TfIdfVectorizer::new();
        assert_eq!(vectorizer.analyze("c r x"), Vec::<String>::new());
    }

    #[test]
    fn test_rows_are_unit_length() {
        let vectorizer = TfIdfVectorizer::new();
        let rows = vectorizer
            .fit_transform(&["rust tokio async", "rust axum web service"])
            .unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].len(), rows[1].len());
        for row in &rows {
            let norm = row.iter().map(|w| w * w).sum::<f64>().sqrt();
            assert!((norm - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn test_identical_documents_have_similarity_one() {
        let vectorizer = TfIdfVectorizer::new();
        let rows = vectorizer
            .fit_transform(&["kubernetes terraform aws", "kubernetes terraform aws"])
            .unwrap();

        assert!((cosine_similarity(&rows[0], &rows[1]) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_shared_term_similarity_matches_hand_computation() {
        // one shared unigram (idf 1) and four unique terms per side (idf ln(1.5) + 1)
        let vectorizer = TfIdfVectorizer::new();
        let rows = vectorizer
            .fit_transform(&["aws developer contract", "experienced aws engineer"])
            .unwrap();

        let unique = 1.5f64.ln() + 1.0;
        let expected = 1.0 / (1.0 + 4.0 * unique * unique);
        assert!((cosine_similarity(&rows[0], &rows[1]) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_only_stop_words_is_an_error() {
        let vectorizer = TfIdfVectorizer::new();
        assert_eq!(vectorizer.fit_transform(&["the and of", ""]), Err(EmptyVocabulary));
    }

    #[test]
    fn test_cosine_of_zero_vector_is_zero() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 0.0]), 0.0);
    }
}
