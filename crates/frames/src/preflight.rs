use crate::frame::GRID_SIDE;
use sensore_protocol::ValidationResult;
use serde::{Deserialize, Serialize};
use std::io::BufRead;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Limits applied by the pre-flight check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreflightConfig {
    /// Largest accepted upload, in MB
    pub max_file_size_mb: u64,
}

impl Default for PreflightConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 50,
        }
    }
}

impl PreflightConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.max_file_size_mb == 0 {
            return Err("max_file_size_mb must be > 0".to_string());
        }
        Ok(())
    }

    #[must_use]
    pub const fn max_file_size_bytes(&self) -> u64 {
        self.max_file_size_mb.saturating_mul(BYTES_PER_MB)
    }
}

/// Cheap feasibility check run before a full decode.
///
/// Only the first line is inspected for shape; the rest of the input is merely
/// counted. The result is advisory: the decoder re-checks everything and has
/// the final word.
#[derive(Debug, Clone, Default)]
pub struct PreflightValidator {
    config: PreflightConfig,
}

impl PreflightValidator {
    #[must_use]
    pub fn new(config: PreflightConfig) -> Self {
        Self { config }
    }

    /// Validate an upload given its name, size and a reader over its content
    pub fn validate_reader<R: BufRead>(
        &self,
        file_name: &str,
        len_bytes: u64,
        reader: R,
    ) -> ValidationResult {
        let mut result = ValidationResult::new(file_name);
        if !self.check_file(&mut result, len_bytes) {
            return result;
        }

        let mut lines = reader.lines();
        let first = match lines.next().transpose() {
            Ok(first) => first,
            Err(err) => return io_failure(result, &err),
        };
        if !self.check_first_line(&mut result, first.as_deref()) {
            return result;
        }

        let mut total_rows = 1;
        for line in lines {
            if let Err(err) = line {
                return io_failure(result, &err);
            }
            total_rows += 1;
        }
        self.record_row_count(&mut result, total_rows);
        result
    }

    /// Async variant of [`PreflightValidator::validate_reader`]
    pub async fn validate_async<R: AsyncBufRead + Unpin>(
        &self,
        file_name: &str,
        len_bytes: u64,
        reader: R,
    ) -> ValidationResult {
        let mut result = ValidationResult::new(file_name);
        if !self.check_file(&mut result, len_bytes) {
            return result;
        }

        let mut lines = reader.lines();
        let first = match lines.next_line().await {
            Ok(first) => first,
            Err(err) => return io_failure(result, &err),
        };
        if !self.check_first_line(&mut result, first.as_deref()) {
            return result;
        }

        let mut total_rows = 1;
        loop {
            match lines.next_line().await {
                Ok(Some(_)) => total_rows += 1,
                Ok(None) => break,
                Err(err) => return io_failure(result, &err),
            }
        }
        self.record_row_count(&mut result, total_rows);
        result
    }

    /// Validate a file on disk. IO failures become error entries.
    pub async fn validate_file(&self, path: impl AsRef<Path>) -> ValidationResult {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string();

        let len_bytes = match tokio::fs::metadata(path).await {
            Ok(meta) => meta.len(),
            Err(err) => {
                return io_failure(ValidationResult::new(file_name), &err);
            }
        };
        let file = match tokio::fs::File::open(path).await {
            Ok(file) => file,
            Err(err) => {
                return io_failure(ValidationResult::new(file_name), &err);
            }
        };

        let result = self
            .validate_async(&file_name, len_bytes, BufReader::new(file))
            .await;
        log::debug!(
            "Pre-flight for {}: valid={} errors={} warnings={}",
            path.display(),
            result.is_valid,
            result.errors.len(),
            result.warnings.len()
        );
        result
    }

    /// Name and size checks. Returns false once a fatal problem is recorded.
    fn check_file(&self, result: &mut ValidationResult, len_bytes: u64) -> bool {
        result.file_size_mb = len_bytes as f64 / BYTES_PER_MB as f64;

        if !has_csv_extension(&result.file_name) {
            result.add_error("File must be a CSV file (.csv extension)");
            return false;
        }

        if len_bytes > self.config.max_file_size_bytes() {
            result.add_error(format!(
                "File size exceeds {}MB limit",
                self.config.max_file_size_mb
            ));
            return false;
        }

        if len_bytes == 0 {
            result.add_error("File is empty");
            return false;
        }

        true
    }

    /// Column count and numeric first token, both checked before giving up
    fn check_first_line(&self, result: &mut ValidationResult, first: Option<&str>) -> bool {
        let Some(first) = first.filter(|line| !line.trim().is_empty()) else {
            result.add_error("CSV file appears to be empty");
            return false;
        };

        let columns: Vec<&str> = first.split(',').collect();
        if columns.len() != GRID_SIDE {
            result.add_error(format!(
                "Invalid format: Expected {GRID_SIDE} columns, found {}",
                columns.len()
            ));
        }

        if columns[0].trim().parse::<i32>().is_err() {
            result.add_error("First column does not contain valid numeric data");
        }

        result.errors.is_empty()
    }

    fn record_row_count(&self, result: &mut ValidationResult, total_rows: usize) {
        result.total_rows = total_rows;
        result.estimated_frames = total_rows / GRID_SIDE;
        if total_rows % GRID_SIDE != 0 {
            result.add_warning(format!(
                "Total rows ({total_rows}) is not divisible by {GRID_SIDE}. File may be incomplete."
            ));
        }
        result.finalize();
    }
}

/// Plain suffix match, so a bare ".csv" name passes too
fn has_csv_extension(file_name: &str) -> bool {
    let name = file_name.as_bytes();
    name.len() >= 4 && name[name.len() - 4..].eq_ignore_ascii_case(b".csv")
}

fn io_failure(mut result: ValidationResult, err: &std::io::Error) -> ValidationResult {
    log::warn!("Pre-flight read failed for {}: {err}", result.file_name);
    result.add_error(format!("Error validating file: {err}"));
    result
}
