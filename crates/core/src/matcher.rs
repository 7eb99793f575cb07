//! Symptom matching.
//!
//! A query is reduced to lowercase alphanumeric words with filler words removed. Each record is
//! scored against those words:
//!
//! - a *token hit* is a distinct query word that is also a word of one of the record's symptom
//!   phrases;
//! - a *phrase hit* is a symptom phrase whose words appear consecutively in the query.
//!
//! `score = PHRASE_WEIGHT * phrase_hits + TOKEN_WEIGHT * token_hits`, so a query naming a whole
//! phrase such as "sore throat" ranks above one that only shares the word "throat".
//!
//! Matching never fails: empty or nonsense input simply yields no matches.

use crate::constants::{PHRASE_CONFIDENCE_SHARE, PHRASE_WEIGHT, STOP_WORDS, TOKEN_WEIGHT};
use crate::dataset::DiseaseRecord;
use std::collections::HashSet;

/// A record that matched a query, with the evidence behind its score.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoredMatch<'a> {
    pub record: &'a DiseaseRecord,
    /// Position of the record in the dataset.
    pub index: usize,
    pub score: u32,
    /// Percentage in `[0, 100]`, one decimal.
    pub confidence: f64,
    /// Symptom phrases found whole in the query, in record order.
    pub matched_phrases: Vec<&'a str>,
    pub token_hits: usize,
}

/// Splits text into lowercase alphanumeric words, dropping filler words.
///
/// Order and repeats are kept so phrases can be found as consecutive runs.
pub fn query_words(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty() && !STOP_WORDS.contains(w))
        .map(str::to_string)
        .collect()
}

/// A query prepared once and scored against many records.
#[derive(Clone, Debug)]
pub struct Query {
    words: Vec<String>,
    tokens: Vec<String>,
}

impl Query {
    pub fn new(text: &str) -> Self {
        let words = query_words(text);
        let mut seen = HashSet::new();
        let tokens = words
            .iter()
            .filter(|w| seen.insert(w.as_str()))
            .cloned()
            .collect();
        Self { words, tokens }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    fn contains_run(&self, run: &[String]) -> bool {
        !run.is_empty() && self.words.windows(run.len()).any(|w| w == run)
    }

    /// Scores one record; `None` when nothing in the query relates to it.
    pub fn score<'a>(&self, index: usize, record: &'a DiseaseRecord) -> Option<ScoredMatch<'a>> {
        if self.is_empty() {
            return None;
        }

        let phrases = record.normalized_symptoms();
        let mut symptom_words = HashSet::new();
        let mut matched_phrases = Vec::new();

        for phrase in phrases {
            let words = query_words(phrase);
            if self.contains_run(&words) {
                matched_phrases.push(phrase.as_str());
            }
            symptom_words.extend(words);
        }

        let token_hits = self
            .tokens
            .iter()
            .filter(|t| symptom_words.contains(*t))
            .count();
        if token_hits == 0 {
            return None;
        }

        let phrase_hits = matched_phrases.len();
        let score = PHRASE_WEIGHT * phrase_hits as u32 + TOKEN_WEIGHT * token_hits as u32;

        let phrase_cover = phrase_hits as f64 / phrases.len().max(1) as f64;
        let token_cover = token_hits as f64 / self.tokens.len() as f64;
        let raw = PHRASE_CONFIDENCE_SHARE * phrase_cover
            + (1.0 - PHRASE_CONFIDENCE_SHARE) * token_cover;
        let confidence = (100.0 * raw.clamp(0.0, 1.0) * 10.0).round() / 10.0;

        Some(ScoredMatch {
            record,
            index,
            score,
            confidence,
            matched_phrases,
            token_hits,
        })
    }
}

/// Ranks records against a free-text query.
///
/// Records scoring zero are left out. The result is sorted by descending score; equal scores keep
/// dataset order.
pub fn rank<'a>(query: &str, records: &'a [DiseaseRecord]) -> Vec<ScoredMatch<'a>> {
    let query = Query::new(query);
    if query.is_empty() {
        return Vec::new();
    }

    let mut matches: Vec<ScoredMatch<'a>> = records
        .iter()
        .enumerate()
        .filter_map(|(index, record)| query.score(index, record))
        .collect();

    // Stable sort keeps dataset order among equal scores.
    matches.sort_by(|a, b| b.score.cmp(&a.score));
    matches
}
