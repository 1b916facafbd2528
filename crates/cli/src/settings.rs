use anyhow::{Context, Result};
use sensore_frames::PreflightConfig;
use sensore_metrics::MetricsConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming a settings file when `--config` is absent
pub const CONFIG_ENV: &str = "SENSORE_CONFIG";

/// Everything the ingest run can be tuned with, loaded from TOML
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub metrics: MetricsConfig,
    pub preflight: PreflightConfig,
    pub ingest: IngestSettings,
}

/// Orchestration knobs; none of these affect the metric values
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    /// Run the pre-flight check before decoding
    pub run_preflight: bool,

    /// Commit the sink after this many processed frames
    pub commit_batch_size: usize,

    /// Stop once more than this many frames have failed
    pub max_frame_failures: usize,

    /// Frame error messages kept in the report
    pub report_error_limit: usize,
}

impl Default for IngestSettings {
    fn default() -> Self {
        Self {
            run_preflight: true,
            commit_batch_size: 100,
            max_frame_failures: 10,
            report_error_limit: 5,
        }
    }
}

impl Settings {
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let settings: Self = toml::from_str(raw).context("Failed to parse settings TOML")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load from `path`, else from `$SENSORE_CONFIG`, else defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = path
            .map(Path::to_path_buf)
            .or_else(|| env::var_os(CONFIG_ENV).map(PathBuf::from));
        let Some(path) = path else {
            return Ok(Self::default());
        };

        log::debug!("Loading settings from {}", path.display());
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read settings file {}", path.display()))?;
        Self::from_toml_str(&raw).with_context(|| format!("Invalid settings in {}", path.display()))
    }

    pub fn validate(&self) -> Result<()> {
        self.metrics
            .validate()
            .map_err(anyhow::Error::msg)
            .context("[metrics]")?;
        self.preflight
            .validate()
            .map_err(anyhow::Error::msg)
            .context("[preflight]")?;
        if self.ingest.commit_batch_size == 0 {
            anyhow::bail!("[ingest] commit_batch_size must be > 0");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(Settings::from_toml_str("").unwrap(), Settings::default());
    }

    #[test]
    fn partial_tables_keep_defaults() {
        let settings = Settings::from_toml_str(
            r#"
            [metrics]
            contact_threshold = 40

            [ingest]
            commit_batch_size = 10
            "#,
        )
        .unwrap();

        assert_eq!(settings.metrics.contact_threshold, 40);
        assert_eq!(settings.metrics.high_pressure_threshold, 500);
        assert_eq!(settings.ingest.commit_batch_size, 10);
        assert_eq!(settings.ingest.max_frame_failures, 10);
        assert_eq!(settings.preflight.max_file_size_mb, 50);
    }

    #[test]
    fn invalid_values_are_rejected() {
        let err = Settings::from_toml_str("[metrics]\nmin_region_size = 0").unwrap_err();
        assert!(format!("{err:#}").contains("min_region_size"));

        assert!(Settings::from_toml_str("[ingest]\ncommit_batch_size = 0").is_err());
        assert!(Settings::from_toml_str("[metrics]\ncontact_threshold = \"high\"").is_err());
    }

    #[test]
    fn load_reads_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sensore.toml");
        std::fs::write(&path, "[preflight]\nmax_file_size_mb = 5\n").unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.preflight.max_file_size_mb, 5);
    }

    #[test]
    fn load_reports_missing_file() {
        let err = Settings::load(Some(Path::new("/no/such/sensore.toml"))).unwrap_err();
        assert!(err.to_string().contains("Failed to read settings file"));
    }
}
