use crate::types::HealthRes;

/// Simple health service that can be used by both the REST API and the CLI
///
/// This service provides a standardised way to report the health of SymptomX.
/// The service is healthy whenever a non-empty dataset is loaded, which the
/// built-in fallback guarantees.
#[derive(Clone)]
pub struct HealthService;

impl HealthService {
    /// Builds a health response from dataset statistics.
    ///
    /// # Arguments
    /// * `diseases` - Number of loaded disease records.
    /// * `vocab` - Number of distinct symptom phrases.
    /// * `source` - Human-readable dataset source.
    /// * `loaded_at` - RFC 3339 load timestamp.
    ///
    /// # Returns
    /// A `HealthRes`; `ok` is false only when no records are loaded.
    pub fn check_health(
        diseases: usize,
        vocab: usize,
        source: String,
        loaded_at: String,
    ) -> HealthRes {
        let ok = diseases > 0;
        HealthRes {
            ok,
            message: if ok {
                "SymptomX is alive".into()
            } else {
                "SymptomX has no dataset loaded".into()
            },
            diseases: diseases as u64,
            vocab: vocab as u64,
            source,
            loaded_at,
        }
    }
}
