//! # SymptomX Core
//!
//! Core logic for the SymptomX symptom lookup service.
//!
//! This crate contains pure data operations:
//! - Loading the disease dataset (JSON, CSV sibling, or built-in fallback)
//! - Normalizing symptom descriptions and free-text queries
//! - Ranking diseases against a query
//!
//! **No API concerns**: HTTP servers, HTML rendering and CLI parsing belong in `api-rest` and
//! `symptomx-cli`.

pub mod config;
pub mod constants;
pub mod dataset;
pub mod error;
pub mod matcher;

pub use api_shared::{DiagnoseRes, DiseaseRes, HealthRes, MatchItem};
pub use config::CoreConfig;
pub use constants::{DEFAULT_DATA_PATH, DEFAULT_TOP_K, MAX_TOP_K};
pub use dataset::{Dataset, DatasetSource, DiseaseRecord};
pub use error::{CoreResult, SymptomError};
pub use matcher::{rank, ScoredMatch};

use api_shared::HealthService;
use constants::{EMPTY_QUERY_MESSAGE, NO_MATCH_MESSAGE};
use std::sync::Arc;

/// Diagnosis operations over an immutable, shared dataset.
///
/// Cloning is cheap; every clone reads the same records.
#[derive(Clone, Debug)]
pub struct SymptomService {
    dataset: Arc<Dataset>,
}

impl SymptomService {
    /// Wraps an already loaded dataset.
    pub fn new(dataset: Dataset) -> Self {
        Self {
            dataset: Arc::new(dataset),
        }
    }

    /// Loads the dataset named by the configuration, falling back to the built-in records.
    pub fn from_config(cfg: &CoreConfig) -> Self {
        Self::new(Dataset::load(Some(cfg.data_path())))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Ranks the dataset against `text` and shapes the result for presentation.
    ///
    /// At most `max(1, min(top_k, MAX_TOP_K))` matches are returned: the best as `primary`, the
    /// rest as `possible`. An empty query or a query without matches yields no matches and a
    /// neutral `message`; this never fails.
    pub fn diagnose(&self, text: &str, top_k: usize) -> DiagnoseRes {
        let text = text.trim();
        if text.is_empty() {
            return DiagnoseRes {
                message: Some(EMPTY_QUERY_MESSAGE.into()),
                ..Default::default()
            };
        }

        let limit = top_k.clamp(1, MAX_TOP_K);
        let mut items = rank(text, self.dataset.records())
            .into_iter()
            .take(limit)
            .map(to_match_item);

        let Some(primary) = items.next() else {
            tracing::debug!("no match for query of {} chars", text.len());
            return DiagnoseRes {
                message: Some(NO_MATCH_MESSAGE.into()),
                ..Default::default()
            };
        };

        DiagnoseRes {
            primary: Some(primary),
            possible: items.collect(),
            message: None,
        }
    }

    /// All loaded records in dataset order.
    pub fn list_diseases(&self) -> Vec<DiseaseRes> {
        self.dataset
            .records()
            .iter()
            .map(|r| DiseaseRes {
                disease: r.disease().to_string(),
                symptoms: r.symptoms_text().to_string(),
                normalized_symptoms: r.normalized_symptoms().to_vec(),
                treatment: r.treatment().to_string(),
            })
            .collect()
    }

    pub fn vocab(&self) -> &[String] {
        self.dataset.vocab()
    }

    pub fn health(&self) -> HealthRes {
        HealthService::check_health(
            self.dataset.len(),
            self.dataset.vocab().len(),
            self.dataset.source().to_string(),
            self.dataset.loaded_at().to_rfc3339(),
        )
    }
}

fn to_match_item(m: ScoredMatch<'_>) -> MatchItem {
    MatchItem {
        disease: m.record.disease().to_string(),
        treatment: m.record.treatment().to_string(),
        score: m.score,
        confidence: m.confidence,
        matched: m.matched_phrases.iter().map(|p| p.to_string()).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> SymptomService {
        SymptomService::new(Dataset::built_in())
    }

    #[test]
    fn empty_input_asks_for_symptoms() {
        let res = service().diagnose("   ", 5);
        assert!(res.primary.is_none());
        assert!(res.possible.is_empty());
        assert_eq!(res.message.as_deref(), Some(EMPTY_QUERY_MESSAGE));
    }

    #[test]
    fn no_match_is_neutral() {
        let res = service().diagnose("xyzzy-not-a-symptom", 5);
        assert!(res.primary.is_none());
        assert_eq!(res.message.as_deref(), Some(NO_MATCH_MESSAGE));
    }

    #[test]
    fn splits_primary_and_possible() {
        let res = service().diagnose("fever, cough, sore throat", 5);
        let primary = res.primary.expect("primary match");
        assert_eq!(primary.disease, "Influenza (Flu)");
        assert_eq!(primary.matched, ["fever", "sore throat"]);
        assert_eq!(res.possible.len(), 1);
        assert_eq!(res.possible[0].disease, "Common Cold");
        assert!(res.message.is_none());
    }

    #[test]
    fn top_k_limits_results() {
        let res = service().diagnose("headache sore throat cough", 1);
        assert!(res.primary.is_some());
        assert!(res.possible.is_empty());

        let res = service().diagnose("headache sore throat cough", 0);
        assert!(res.primary.is_some(), "top_k of zero still returns the best match");
    }

    #[test]
    fn health_reports_dataset() {
        let svc = service();
        let health = svc.health();
        assert!(health.ok);
        assert_eq!(health.diseases, 3);
        assert_eq!(health.vocab as usize, svc.vocab().len());
        assert_eq!(health.source, "built-in");
    }

    #[test]
    fn lists_diseases_in_order() {
        let diseases = service().list_diseases();
        let names: Vec<_> = diseases.iter().map(|d| d.disease.as_str()).collect();
        assert_eq!(names, ["Common Cold", "Influenza (Flu)", "Migraine"]);
        assert_eq!(diseases[2].normalized_symptoms[0], "headache");
    }

    #[test]
    fn loads_from_config() {
        let cfg = CoreConfig::new("/definitely/not/here.json".into(), 5).unwrap();
        let svc = SymptomService::from_config(&cfg);
        assert_eq!(svc.dataset().source(), &DatasetSource::BuiltIn);
    }
}
