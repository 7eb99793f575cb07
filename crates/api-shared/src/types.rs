//! Request and response types shared by the REST API and the CLI.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Health status of the service and its loaded dataset.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct HealthRes {
    pub ok: bool,
    pub message: String,
    /// Number of disease records loaded.
    pub diseases: u64,
    /// Number of distinct normalized symptom phrases.
    pub vocab: u64,
    /// Where the dataset came from (`json:<path>`, `csv:<path>` or `built-in`).
    pub source: String,
    /// RFC 3339 timestamp of the dataset load.
    pub loaded_at: String,
}

/// A free-text symptom query.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DiagnoseReq {
    pub symptoms: String,
    /// Maximum number of matches to return. Falls back to the server default.
    #[serde(default)]
    pub top_k: Option<u32>,
}

/// One ranked match.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct MatchItem {
    pub disease: String,
    pub treatment: String,
    /// Ranking score; higher is better.
    pub score: u32,
    /// Percentage in `[0, 100]`, rounded to one decimal.
    pub confidence: f64,
    /// Normalized symptom phrases of the record found in the query.
    pub matched: Vec<String>,
}

/// Result of a diagnosis query.
///
/// `primary` is absent when nothing matched; `message` then carries a neutral explanation.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DiagnoseRes {
    pub primary: Option<MatchItem>,
    pub possible: Vec<MatchItem>,
    pub message: Option<String>,
}

/// A loaded disease record as exposed over the API.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct DiseaseRes {
    pub disease: String,
    pub symptoms: String,
    pub normalized_symptoms: Vec<String>,
    pub treatment: String,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ListDiseasesRes {
    pub diseases: Vec<DiseaseRes>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn diagnose_req_top_k_is_optional() {
        let req: DiagnoseReq = serde_json::from_str(r#"{"symptoms":"fever"}"#).unwrap();
        assert_eq!(req.symptoms, "fever");
        assert_eq!(req.top_k, None);
    }

    #[test]
    fn empty_diagnosis_serialises_null_primary() {
        let res = DiagnoseRes {
            message: Some("nothing".into()),
            ..Default::default()
        };
        let json = serde_json::to_value(&res).unwrap();
        assert!(json["primary"].is_null());
        assert_eq!(json["possible"], serde_json::json!([]));
        assert_eq!(json["message"], "nothing");
    }
}
