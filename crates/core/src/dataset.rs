//! Disease dataset loading.
//!
//! The dataset is read once at startup and never mutated afterwards. Loading never fails from the
//! caller's point of view: each source is attempted in turn and the built-in records are used when
//! none of them yields a valid record.
//!
//! ## Sources
//!
//! - JSON: an array of objects with `disease`, `symptoms` or `normalized_symptoms_list`, and
//!   `treatment` (`name`, `symptoms_normalized` and `care` are accepted as alternatives).
//! - CSV: the same columns with a header row, read from the `.csv` sibling of the configured path.
//! - Built-in: a handful of common conditions.

use crate::constants::SYMPTOM_SEPARATORS;
use crate::matcher::query_words;
use crate::{CoreResult, SymptomError};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// One dataset entry mapping a disease to its symptoms and suggested treatment.
///
/// Construction goes through [`DiseaseRecord::new`] or
/// [`DiseaseRecord::with_normalized_symptoms`], which guarantee a non-empty
/// name and at least one normalized symptom phrase containing a matchable word.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiseaseRecord {
    disease: String,
    symptoms_text: String,
    normalized_symptoms: Vec<String>,
    treatment: String,
}

impl DiseaseRecord {
    /// Builds a record, deriving the normalized symptoms from `symptoms_text`.
    ///
    /// Returns `None` if the name is blank or the text holds no phrase with a matchable word.
    pub fn new(disease: &str, symptoms_text: &str, treatment: &str) -> Option<Self> {
        Self::build(
            disease,
            symptoms_text.trim().to_string(),
            normalize_symptoms_text(symptoms_text),
            treatment,
        )
    }

    /// Builds a record from a precomputed symptom list.
    ///
    /// Each entry is trimmed and lowercased; blank entries are dropped. The list wins over
    /// `symptoms_text`, which is kept for display only. When it is absent the display text is the
    /// list joined with commas.
    pub fn with_normalized_symptoms(
        disease: &str,
        symptoms_text: Option<&str>,
        symptoms: &[String],
        treatment: &str,
    ) -> Option<Self> {
        let normalized = normalize_symptom_list(symptoms);
        let text = symptoms_text
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| normalized.join(", "));
        Self::build(disease, text, normalized, treatment)
    }

    fn build(
        disease: &str,
        symptoms_text: String,
        normalized_symptoms: Vec<String>,
        treatment: &str,
    ) -> Option<Self> {
        let disease = disease.trim();
        let matchable = normalized_symptoms
            .iter()
            .any(|p| !query_words(p).is_empty());
        if disease.is_empty() || !matchable {
            return None;
        }
        Some(Self {
            disease: disease.to_string(),
            symptoms_text,
            normalized_symptoms,
            treatment: treatment.trim().to_string(),
        })
    }

    pub fn disease(&self) -> &str {
        &self.disease
    }

    pub fn symptoms_text(&self) -> &str {
        &self.symptoms_text
    }

    pub fn normalized_symptoms(&self) -> &[String] {
        &self.normalized_symptoms
    }

    pub fn treatment(&self) -> &str {
        &self.treatment
    }
}

/// Splits a free-text symptom description into normalized phrases.
///
/// Lowercases, splits on commas, semicolons, slashes and newlines, collapses inner whitespace
/// and drops empty phrases. Applying it to its own output joined by `", "` is a no-op.
pub fn normalize_symptoms_text(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(SYMPTOM_SEPARATORS)
        .map(collapse_whitespace)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Normalizes an already split symptom list: entries are kept verbatim apart from trimming and
/// lowercasing.
pub fn normalize_symptom_list(symptoms: &[String]) -> Vec<String> {
    symptoms
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// One entry as it appears in a dataset file, before validation.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    disease: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    symptoms: Option<String>,
    #[serde(default)]
    symptoms_normalized: Option<String>,
    #[serde(default)]
    normalized_symptoms_list: Option<Vec<String>>,
    #[serde(default)]
    treatment: Option<String>,
    #[serde(default)]
    care: Option<String>,
}

impl RawRecord {
    fn into_record(self) -> Option<DiseaseRecord> {
        fn first_non_blank(a: Option<String>, b: Option<String>) -> Option<String> {
            a.filter(|s| !s.trim().is_empty())
                .or_else(|| b.filter(|s| !s.trim().is_empty()))
        }

        let disease = first_non_blank(self.disease, self.name)?;
        let treatment = first_non_blank(self.treatment, self.care).unwrap_or_default();

        match self.normalized_symptoms_list {
            Some(list) => DiseaseRecord::with_normalized_symptoms(
                &disease,
                self.symptoms.as_deref(),
                &list,
                &treatment,
            ),
            None => {
                let text = first_non_blank(self.symptoms_normalized, self.symptoms)?;
                DiseaseRecord::new(&disease, &text, &treatment)
            }
        }
    }
}

/// CSV rows cannot carry a list column, so they map onto the text fields only.
#[derive(Debug, Deserialize)]
struct CsvRow {
    #[serde(default)]
    disease: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    symptoms: Option<String>,
    #[serde(default)]
    symptoms_normalized: Option<String>,
    #[serde(default)]
    treatment: Option<String>,
    #[serde(default)]
    care: Option<String>,
}

impl From<CsvRow> for RawRecord {
    fn from(row: CsvRow) -> Self {
        RawRecord {
            disease: row.disease,
            name: row.name,
            symptoms: row.symptoms,
            symptoms_normalized: row.symptoms_normalized,
            normalized_symptoms_list: None,
            treatment: row.treatment,
            care: row.care,
        }
    }
}

/// Where a loaded dataset came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DatasetSource {
    Json(PathBuf),
    Csv(PathBuf),
    BuiltIn,
}

impl fmt::Display for DatasetSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatasetSource::Json(path) => write!(f, "json:{}", path.display()),
            DatasetSource::Csv(path) => write!(f, "csv:{}", path.display()),
            DatasetSource::BuiltIn => f.write_str("built-in"),
        }
    }
}

/// The immutable, loaded collection of disease records.
#[derive(Clone, Debug)]
pub struct Dataset {
    records: Vec<DiseaseRecord>,
    vocab: Vec<String>,
    source: DatasetSource,
    loaded_at: DateTime<Utc>,
}

impl Dataset {
    /// Wraps already validated records and builds the symptom vocabulary.
    pub fn new(records: Vec<DiseaseRecord>, source: DatasetSource) -> Self {
        let vocab = build_vocab(&records);
        tracing::info!("vocab built: {} phrases", vocab.len());
        Self {
            records,
            vocab,
            source,
            loaded_at: Utc::now(),
        }
    }

    /// The built-in dataset.
    pub fn built_in() -> Self {
        Self::new(fallback_records(), DatasetSource::BuiltIn)
    }

    /// Loads the dataset, falling back to the built-in records on any failure.
    ///
    /// For a `.csv` path only that file is tried. For any other path the JSON file is tried first,
    /// then its `.csv` sibling. `None` goes straight to the built-in records.
    ///
    /// The returned dataset is never empty.
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            tracing::info!("no dataset path configured; using built-in dataset");
            return Self::built_in();
        };

        for source in candidate_sources(path) {
            let attempt = match &source {
                DatasetSource::Json(p) => try_load_json(p),
                DatasetSource::Csv(p) => try_load_csv(p),
                DatasetSource::BuiltIn => continue,
            };

            match attempt {
                Ok(records) => {
                    tracing::info!("loaded {} diseases from {}", records.len(), source);
                    return Self::new(records, source);
                }
                Err(SymptomError::DatasetMissing(p)) => {
                    tracing::debug!("dataset file not present: {}", p.display());
                }
                Err(e) => {
                    tracing::error!("failed to load {}: {}", source, e);
                }
            }
        }

        let dataset = Self::built_in();
        tracing::warn!(
            "using built-in fallback dataset: {} diseases",
            dataset.records.len()
        );
        dataset
    }

    pub fn records(&self) -> &[DiseaseRecord] {
        &self.records
    }

    /// Distinct normalized symptom phrases in first-seen order.
    pub fn vocab(&self) -> &[String] {
        &self.vocab
    }

    pub fn source(&self) -> &DatasetSource {
        &self.source
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn candidate_sources(path: &Path) -> Vec<DatasetSource> {
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));

    if is_csv {
        vec![DatasetSource::Csv(path.to_path_buf())]
    } else {
        vec![
            DatasetSource::Json(path.to_path_buf()),
            DatasetSource::Csv(path.with_extension("csv")),
        ]
    }
}

fn build_vocab(records: &[DiseaseRecord]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut vocab = Vec::new();
    for phrase in records.iter().flat_map(|r| &r.normalized_symptoms) {
        if seen.insert(phrase.as_str()) {
            vocab.push(phrase.clone());
        }
    }
    vocab
}

fn read_source(path: &Path) -> CoreResult<String> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => SymptomError::DatasetMissing(path.to_path_buf()),
        _ => SymptomError::FileRead(e),
    })
}

fn non_empty(records: Vec<DiseaseRecord>) -> CoreResult<Vec<DiseaseRecord>> {
    if records.is_empty() {
        return Err(SymptomError::NoValidRecords);
    }
    Ok(records)
}

/// Reads a JSON dataset file.
///
/// The file must hold a JSON array. Entries that are not objects, have mistyped fields, or fail
/// the record invariants are skipped.
///
/// # Errors
/// - `DatasetMissing` if the file does not exist,
/// - `FileRead` if it cannot be read,
/// - `JsonStructure`/`Json` if it is not a JSON array,
/// - `NoValidRecords` if no entry survives validation.
pub fn try_load_json(path: &Path) -> CoreResult<Vec<DiseaseRecord>> {
    let contents = read_source(path)?;

    let mut de = serde_json::Deserializer::from_str(&contents);
    let items: Vec<serde_json::Value> =
        serde_path_to_error::deserialize(&mut de).map_err(SymptomError::JsonStructure)?;
    de.end().map_err(SymptomError::Json)?;

    let records = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| {
            let raw = match serde_json::from_value::<RawRecord>(value) {
                Ok(raw) => raw,
                Err(e) => {
                    tracing::warn!("skipping dataset entry {index} in {}: {e}", path.display());
                    return None;
                }
            };
            let record = raw.into_record();
            if record.is_none() {
                tracing::debug!("dropping incomplete dataset entry {index}");
            }
            record
        })
        .collect();

    non_empty(records)
}

/// Reads a CSV dataset file with a header row.
///
/// Rows that fail to parse or fail the record invariants are skipped.
///
/// # Errors
/// - `DatasetMissing` if the file does not exist,
/// - `FileRead`/`Csv` if it cannot be opened or its header cannot be read,
/// - `NoValidRecords` if no row survives validation.
pub fn try_load_csv(path: &Path) -> CoreResult<Vec<DiseaseRecord>> {
    let contents = read_source(path)?;

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(contents.as_bytes());
    reader.headers().map_err(SymptomError::Csv)?;

    let mut records = Vec::new();
    for (index, row) in reader.deserialize::<CsvRow>().enumerate() {
        match row {
            Ok(row) => match RawRecord::from(row).into_record() {
                Some(record) => records.push(record),
                None => tracing::debug!("dropping incomplete CSV row {index}"),
            },
            Err(e) => tracing::warn!("skipping CSV row {index} in {}: {e}", path.display()),
        }
    }

    non_empty(records)
}

/// The built-in records used when no dataset file can be loaded.
pub fn fallback_records() -> Vec<DiseaseRecord> {
    const BUILT_IN: &[(&str, &str, &str)] = &[
        (
            "Common Cold",
            "sneezing, runny nose, sore throat, mild cough, congestion",
            "rest, hydration, decongestants, throat lozenges",
        ),
        (
            "Influenza (Flu)",
            "fever, dry cough, sore throat, headache, muscle aches, fatigue",
            "rest, fluids, OTC pain relievers; antivirals when prescribed",
        ),
        (
            "Migraine",
            "headache, nausea, light sensitivity, sound sensitivity, aura",
            "rest in dark room, hydration, triptans/NSAIDs per guidance",
        ),
    ];

    BUILT_IN
        .iter()
        .filter_map(|(disease, symptoms, treatment)| {
            DiseaseRecord::new(disease, symptoms, treatment)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).expect("write dataset");
        path
    }

    fn names(dataset: &Dataset) -> Vec<&str> {
        dataset.records().iter().map(|r| r.disease()).collect()
    }

    #[test]
    fn normalizes_symptom_text() {
        assert_eq!(
            normalize_symptoms_text("Fever;  Dry Cough ,, sore throat/Headache\nFatigue "),
            vec!["fever", "dry cough", "sore throat", "headache", "fatigue"]
        );
        assert!(normalize_symptoms_text(" , ; ").is_empty());
    }

    #[test]
    fn normalization_is_idempotent() {
        let once = normalize_symptoms_text("Runny   Nose; SNEEZING, itchy eyes / Congestion");
        let twice = normalize_symptoms_text(&once.join(", "));
        assert_eq!(once, twice);
    }

    #[test]
    fn record_requires_name_and_symptoms() {
        assert!(DiseaseRecord::new("  ", "fever", "rest").is_none());
        assert!(DiseaseRecord::new("Flu", " ;, ", "rest").is_none());
        let rec = DiseaseRecord::new(" Flu ", "Fever", " rest ").unwrap();
        assert_eq!(rec.disease(), "Flu");
        assert_eq!(rec.treatment(), "rest");
        assert_eq!(rec.normalized_symptoms(), ["fever"]);
    }

    #[test]
    fn record_requires_a_matchable_phrase() {
        assert!(DiseaseRecord::new("Y", "-", "rest").is_none());
        assert!(DiseaseRecord::new("Y", "- , ?!", "rest").is_none());
        assert!(DiseaseRecord::with_normalized_symptoms("Y", None, &["--".into()], "rest").is_none());
        let rec = DiseaseRecord::new("Y", "-, cough", "rest").unwrap();
        assert_eq!(rec.normalized_symptoms(), ["-", "cough"]);
    }

    #[test]
    fn symptom_list_entries_are_only_trimmed_and_lowercased() {
        assert_eq!(
            normalize_symptom_list(&["  High   Fever ".into(), "   ".into(), "Chills".into()]),
            vec!["high   fever", "chills"]
        );
    }

    #[test]
    fn fallback_is_non_empty_and_valid() {
        let records = fallback_records();
        assert_eq!(records.len(), 3);
        assert!(records
            .iter()
            .all(|r| !r.disease().is_empty() && !r.normalized_symptoms().is_empty()));
    }

    #[test]
    fn loads_json_preserving_order() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "diseases.json",
            r#"[
                {"disease": "Strep Throat", "symptoms": "sore throat, fever", "treatment": "antibiotics"},
                {"disease": "Allergy", "normalized_symptoms_list": [" Sneezing ", "ITCHY EYES", ""], "treatment": "antihistamines"},
                {"name": "Gastritis", "symptoms_normalized": "stomach pain; nausea", "care": "antacids"}
            ]"#,
        );

        let dataset = Dataset::load(Some(path.as_path()));
        assert_eq!(names(&dataset), ["Strep Throat", "Allergy", "Gastritis"]);
        assert_eq!(dataset.source(), &DatasetSource::Json(path.clone()));

        let allergy = &dataset.records()[1];
        assert_eq!(allergy.normalized_symptoms(), ["sneezing", "itchy eyes"]);
        assert_eq!(allergy.symptoms_text(), "sneezing, itchy eyes");

        let gastritis = &dataset.records()[2];
        assert_eq!(gastritis.treatment(), "antacids");
        assert_eq!(gastritis.normalized_symptoms(), ["stomach pain", "nausea"]);
    }

    #[test]
    fn symptom_list_takes_precedence_over_text() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "diseases.json",
            r#"[{"disease": "X", "symptoms": "rash, itch", "normalized_symptoms_list": ["  High   Fever "], "treatment": "rest"}]"#,
        );

        let records = try_load_json(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].normalized_symptoms(), ["high   fever"]);
        assert_eq!(records[0].symptoms_text(), "rash, itch");

        assert!(crate::matcher::rank("rash", &records).is_empty());
        let matches = crate::matcher::rank("high fever", &records);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].matched_phrases, ["high   fever"]);
    }

    #[test]
    fn loads_bundled_default_dataset() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../..")
            .join(crate::constants::DEFAULT_DATA_PATH);

        let dataset = Dataset::load(Some(path.as_path()));
        assert_eq!(dataset.source(), &DatasetSource::Json(path.clone()));
        assert_eq!(dataset.len(), 10);
        assert_eq!(dataset.records()[0].disease(), "Common Cold");

        let covid = dataset
            .records()
            .iter()
            .find(|r| r.disease() == "COVID-19")
            .expect("COVID-19 record");
        assert_eq!(covid.normalized_symptoms()[3], "loss of taste");
        assert_eq!(
            covid.symptoms_text(),
            "fever, dry cough, fatigue, loss of taste, loss of smell, shortness of breath"
        );

        let matches = crate::matcher::rank("loss of taste and smell", dataset.records());
        assert_eq!(matches[0].record.disease(), "COVID-19");
    }

    #[test]
    fn drops_invalid_entries_silently() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "diseases.json",
            r#"[
                {"disease": "", "symptoms": "fever"},
                {"disease": "No Symptoms", "symptoms": ""},
                {"disease": "Punctuation Only", "symptoms": "-"},
                42,
                {"disease": ["not", "a", "string"], "symptoms": "cough"},
                {"disease": "Bronchitis", "symptoms": "cough, chest discomfort"}
            ]"#,
        );

        let records = try_load_json(&path).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].disease(), "Bronchitis");
    }

    #[test]
    fn missing_file_falls_back() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nope.json");

        assert!(matches!(
            try_load_json(&path),
            Err(SymptomError::DatasetMissing(_))
        ));
        let dataset = Dataset::load(Some(path.as_path()));
        assert_eq!(dataset.source(), &DatasetSource::BuiltIn);
        assert_eq!(dataset.len(), fallback_records().len());
    }

    #[test]
    fn empty_and_invalid_files_fall_back() {
        let dir = TempDir::new().unwrap();
        for (name, contents) in [
            ("empty.json", ""),
            ("garbage.json", "{not json"),
            ("object.json", r#"{"disease": "Flu"}"#),
            ("empty_array.json", "[]"),
            ("trailing.json", r#"[{"disease":"Flu","symptoms":"fever"}] junk"#),
        ] {
            let path = write(&dir, name, contents);
            assert!(try_load_json(&path).is_err(), "{name} should not load");
            let dataset = Dataset::load(Some(path.as_path()));
            assert_eq!(dataset.source(), &DatasetSource::BuiltIn, "{name}");
            assert!(!dataset.is_empty());
        }
    }

    #[test]
    fn wrong_shape_reports_json_path() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "object.json", r#"{"disease": "Flu"}"#);
        assert!(matches!(
            try_load_json(&path),
            Err(SymptomError::JsonStructure(_))
        ));
    }

    #[test]
    fn falls_through_to_csv_sibling() {
        let dir = TempDir::new().unwrap();
        let json = write(&dir, "diseases.json", "not json at all");
        write(
            &dir,
            "diseases.csv",
            "disease,symptoms,treatment\n\
             Sinusitis,\"facial pain, congestion, headache\",saline rinse\n\
             ,orphan symptom,nothing\n\
             Conjunctivitis,red eyes; itchy eyes,eye drops\n",
        );

        let dataset = Dataset::load(Some(json.as_path()));
        assert_eq!(names(&dataset), ["Sinusitis", "Conjunctivitis"]);
        assert_eq!(
            dataset.source(),
            &DatasetSource::Csv(dir.path().join("diseases.csv"))
        );
        assert_eq!(
            dataset.records()[0].normalized_symptoms(),
            ["facial pain", "congestion", "headache"]
        );
    }

    #[test]
    fn csv_path_loads_directly() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "data.csv",
            "name,symptoms,care\nTonsillitis,sore throat,rest\n",
        );
        let dataset = Dataset::load(Some(path.as_path()));
        assert_eq!(names(&dataset), ["Tonsillitis"]);
        assert_eq!(dataset.records()[0].treatment(), "rest");
    }

    #[test]
    fn vocab_is_distinct_in_first_seen_order() {
        let dataset = Dataset::built_in();
        let vocab = dataset.vocab();
        assert_eq!(&vocab[..3], ["sneezing", "runny nose", "sore throat"]);
        assert_eq!(vocab.iter().filter(|p| *p == "sore throat").count(), 1);
        assert_eq!(vocab.iter().filter(|p| *p == "headache").count(), 1);
    }

    #[test]
    fn source_display() {
        assert_eq!(DatasetSource::BuiltIn.to_string(), "built-in");
        assert_eq!(
            DatasetSource::Json(PathBuf::from("data/diseases.json")).to_string(),
            "json:data/diseases.json"
        );
    }
}
