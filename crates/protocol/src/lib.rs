use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

pub const REPORT_SCHEMA_VERSION: u32 = 1;

/// Metrics derived from one 32x32 pressure frame.
///
/// Created once per processed frame and handed to the persistence
/// collaborator as-is.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct FrameMetricRecord {
    /// Identifier assigned by the caller (the ingest pipeline uses the 1-based frame number)
    pub frame_id: i64,

    /// Highest trusted pressure value, 0 when the frame is noise only
    pub peak_pressure_index: f64,

    /// Share of cells in contact with the mat, 0..=100, two decimals
    pub contact_area_percent: f64,

    /// Coefficient of variation over contact cells, four decimals
    pub cov: f64,

    /// Wall-clock time of computation (unix epoch, milliseconds)
    pub computed_at_unix_ms: u64,
}

impl FrameMetricRecord {
    /// True when the three metrics match, ignoring identity and timestamp.
    #[must_use]
    pub fn same_metrics(&self, other: &Self) -> bool {
        self.peak_pressure_index == other.peak_pressure_index
            && self.contact_area_percent == other.contact_area_percent
            && self.cov == other.cov
    }
}

/// Outcome of the advisory pre-flight check on an upload.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, JsonSchema)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub file_name: String,
    #[serde(default)]
    pub errors: Vec<String>,
    #[serde(default)]
    pub warnings: Vec<String>,
    pub total_rows: usize,
    pub estimated_frames: usize,
    pub file_size_mb: f64,
}

impl ValidationResult {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            ..Default::default()
        }
    }

    pub fn add_error(&mut self, error: impl Into<String>) {
        self.errors.push(error.into());
        self.is_valid = false;
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// Settle `is_valid` once every check has run. Warnings never count.
    pub fn finalize(&mut self) {
        self.is_valid = self.errors.is_empty();
    }
}

/// Averages over the records produced by one ingest run.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct BatchSummary {
    pub frames: usize,
    pub mean_peak_pressure_index: f64,
    pub mean_contact_area_percent: f64,
    pub mean_cov: f64,
    pub max_peak_pressure_index: f64,
}

/// Result of ingesting one uploaded file.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, JsonSchema)]
pub struct IngestReport {
    pub schema_version: u32,
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub validation: Option<ValidationResult>,
    pub total_frames: usize,
    pub processed_frames: usize,
    pub failed_frames: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub errors: Vec<String>,
    pub aborted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<BatchSummary>,
}

impl IngestReport {
    pub fn new(file_name: impl Into<String>) -> Self {
        Self {
            schema_version: REPORT_SCHEMA_VERSION,
            file_name: file_name.into(),
            validation: None,
            total_frames: 0,
            processed_frames: 0,
            failed_frames: 0,
            errors: Vec::new(),
            aborted: false,
            summary: None,
        }
    }
}

pub fn serialize_json<T: Serialize>(value: &T, pretty: bool) -> serde_json::Result<String> {
    if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    }
}

/// JSON schemas for the records consumers receive, keyed by type name.
pub fn output_schemas() -> serde_json::Value {
    serde_json::json!({
        "FrameMetricRecord": schemars::schema_for!(FrameMetricRecord),
        "IngestReport": schemars::schema_for!(IngestReport),
        "ValidationResult": schemars::schema_for!(ValidationResult),
    })
}
