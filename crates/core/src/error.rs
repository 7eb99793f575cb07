use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum SymptomError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("dataset file not found: {}", .0.display())]
    DatasetMissing(PathBuf),
    #[error("failed to read dataset file: {0}")]
    FileRead(std::io::Error),
    #[error("dataset JSON has the wrong shape: {0}")]
    JsonStructure(serde_path_to_error::Error<serde_json::Error>),
    #[error("failed to parse dataset JSON: {0}")]
    Json(serde_json::Error),
    #[error("failed to parse dataset CSV: {0}")]
    Csv(csv::Error),
    #[error("dataset contains no valid records")]
    NoValidRecords,
}

pub type CoreResult<T> = std::result::Result<T, SymptomError>;
