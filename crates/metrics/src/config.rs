use serde::{Deserialize, Serialize};

/// Thresholds driving the metric calculations (12-bit sensor scale, 0-4095)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Cells above this value are in contact with the mat
    pub contact_threshold: i32,

    /// Cells above this value are high-pressure candidates
    pub high_pressure_threshold: i32,

    /// High-pressure sets at least this large are trusted without the clustering check
    pub min_region_size: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            contact_threshold: 30,
            high_pressure_threshold: 500,
            min_region_size: 10,
        }
    }
}

impl MetricsConfig {
    /// Validate configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.contact_threshold < 0 {
            return Err(format!(
                "contact_threshold ({}) must be >= 0",
                self.contact_threshold
            ));
        }

        if self.high_pressure_threshold < self.contact_threshold {
            return Err(format!(
                "high_pressure_threshold ({}) cannot be below contact_threshold ({})",
                self.high_pressure_threshold, self.contact_threshold
            ));
        }

        if self.min_region_size == 0 {
            return Err("min_region_size must be > 0".to_string());
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = MetricsConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.contact_threshold, 30);
        assert_eq!(config.high_pressure_threshold, 500);
        assert_eq!(config.min_region_size, 10);
    }

    #[test]
    fn test_config_validation() {
        let mut config = MetricsConfig::default();

        // Invalid: negative contact threshold
        config.contact_threshold = -1;
        assert!(config.validate().is_err());

        // Invalid: high pressure below contact
        config.contact_threshold = 600;
        assert!(config.validate().is_err());

        // Invalid: empty region
        config.contact_threshold = 30;
        config.min_region_size = 0;
        assert!(config.validate().is_err());

        // Valid configuration
        config.min_region_size = 4;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: MetricsConfig = toml::from_str("high_pressure_threshold = 800").unwrap();
        assert_eq!(config.high_pressure_threshold, 800);
        assert_eq!(config.contact_threshold, 30);
        assert_eq!(config.min_region_size, 10);
    }
}
