//! Core runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into core services, so
//! request handling never reads process-wide environment variables.

use crate::constants::{DEFAULT_DATA_PATH, DEFAULT_TOP_K, MAX_TOP_K};
use crate::{CoreResult, SymptomError};
use std::path::{Path, PathBuf};

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    data_path: PathBuf,
    top_k: usize,
}

impl CoreConfig {
    /// Create a new `CoreConfig`.
    ///
    /// # Errors
    /// Returns `SymptomError::InvalidInput` if `top_k` is zero or above [`MAX_TOP_K`].
    pub fn new(data_path: PathBuf, top_k: usize) -> CoreResult<Self> {
        validate_top_k(top_k)?;
        Ok(Self { data_path, top_k })
    }

    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }
}

fn validate_top_k(top_k: usize) -> CoreResult<()> {
    if top_k == 0 || top_k > MAX_TOP_K {
        return Err(SymptomError::InvalidInput(format!(
            "top_k must be between 1 and {MAX_TOP_K}, got {top_k}"
        )));
    }
    Ok(())
}

/// Resolve the dataset path from an optional string value.
///
/// `None` or empty/whitespace yields [`DEFAULT_DATA_PATH`].
pub fn data_path_from_env_value(value: Option<String>) -> PathBuf {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH))
}

/// Parse `top_k` from an optional string value.
///
/// If `value` is `None` or empty/whitespace, returns [`DEFAULT_TOP_K`].
pub fn top_k_from_env_value(value: Option<String>) -> CoreResult<usize> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty());

    let Some(value) = value else {
        return Ok(DEFAULT_TOP_K);
    };

    let top_k = value
        .parse::<usize>()
        .map_err(|e| SymptomError::InvalidInput(format!("top_k '{value}' is not a number: {e}")))?;
    validate_top_k(top_k)?;
    Ok(top_k)
}
