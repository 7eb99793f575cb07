//! Constants used throughout the SymptomX core crate.
//!
//! Paths, defaults and matcher tuning live here so the loader, the matcher and
//! the binaries agree on them.

/// Default location of the dataset file, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "data/diseases.json";

/// Default number of matches returned by a diagnosis.
pub const DEFAULT_TOP_K: usize = 5;

/// Upper bound for a configured or requested `top_k`.
pub const MAX_TOP_K: usize = 50;

/// Score contributed by each symptom phrase found whole in the query.
pub const PHRASE_WEIGHT: u32 = 2;

/// Score contributed by each distinct query token found in a record's symptoms.
pub const TOKEN_WEIGHT: u32 = 1;

/// Share of the confidence percentage driven by phrase coverage; the rest comes from token coverage.
pub const PHRASE_CONFIDENCE_SHARE: f64 = 0.7;

/// Separators between symptom phrases in free-text symptom descriptions.
pub const SYMPTOM_SEPARATORS: &[char] = &[',', ';', '/', '\n'];

/// Filler words ignored when comparing queries with symptom phrases.
pub const STOP_WORDS: &[&str] = &[
    "a", "am", "an", "and", "feel", "feeling", "have", "i", "in", "is", "my", "no", "not", "of",
    "on", "or", "the", "with",
];

/// Message returned for an empty query.
pub const EMPTY_QUERY_MESSAGE: &str = "Please enter your symptoms.";

/// Message returned when no record matches the query.
pub const NO_MATCH_MESSAGE: &str =
    "No confident match. Try different wording (e.g., 'fever, cough').";
