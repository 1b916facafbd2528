use crate::clustering::is_clustered;
use crate::config::MetricsConfig;
use crate::error::{MetricsError, Result};
use sensore_frames::{Frame, FrameError, FRAME_CELLS};
use sensore_protocol::FrameMetricRecord;
use std::time::{SystemTime, UNIX_EPOCH};

/// Computes the per-frame metric record.
///
/// Every call is a pure function of the frame and the configuration; nothing
/// carries over between frames, so one calculator can be shared across threads.
#[derive(Debug, Clone, Default)]
pub struct MetricsCalculator {
    config: MetricsConfig,
}

impl MetricsCalculator {
    pub fn new(config: MetricsConfig) -> Result<Self> {
        config.validate().map_err(MetricsError::invalid_config)?;
        Ok(Self { config })
    }

    /// Compute all three metrics for a frame
    #[must_use]
    pub fn compute(&self, frame: &Frame, frame_id: i64) -> FrameMetricRecord {
        FrameMetricRecord {
            frame_id,
            peak_pressure_index: self.peak_pressure_index(frame),
            contact_area_percent: self.contact_area_percent(frame),
            cov: self.coefficient_of_variation(frame),
            computed_at_unix_ms: current_unix_ms(),
        }
    }

    /// Compute metrics from unchecked flat data.
    ///
    /// Fails when the data is absent or not exactly 1024 cells.
    pub fn compute_raw(&self, data: Option<&[i32]>, frame_id: i64) -> Result<FrameMetricRecord> {
        let data = data.ok_or(FrameError::Missing)?;
        let frame = Frame::from_slice(data)?;
        Ok(self.compute(&frame, frame_id))
    }

    /// Highest trusted pressure value.
    ///
    /// Small sets of high-pressure cells that are not spatially clustered are
    /// treated as sensor noise and yield 0. Once a high-pressure region is
    /// confirmed, the frame-wide maximum is reported.
    #[must_use]
    pub fn peak_pressure_index(&self, frame: &Frame) -> f64 {
        let high = frame.indices_above(self.config.high_pressure_threshold);

        if high.is_empty() {
            let max = frame.max_value();
            return if max > self.config.contact_threshold {
                f64::from(max)
            } else {
                0.0
            };
        }

        if high.len() < self.config.min_region_size && !is_clustered(&high) {
            log::trace!(
                "Discarding {} scattered high-pressure cells as noise",
                high.len()
            );
            return 0.0;
        }

        f64::from(frame.max_value())
    }

    /// Percentage of cells in contact with the mat, two decimals
    #[must_use]
    pub fn contact_area_percent(&self, frame: &Frame) -> f64 {
        let contact = self.contact_values(frame).count();
        round_half_even(contact as f64 / FRAME_CELLS as f64 * 100.0, 2)
    }

    /// Population standard deviation over mean for contact cells, four decimals
    #[must_use]
    pub fn coefficient_of_variation(&self, frame: &Frame) -> f64 {
        let values: Vec<f64> = self.contact_values(frame).map(f64::from).collect();
        if values.len() < 2 {
            return 0.0;
        }

        let count = values.len() as f64;
        let mean = values.iter().sum::<f64>() / count;
        if mean == 0.0 {
            return 0.0;
        }

        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / count;
        round_half_even(variance.sqrt() / mean, 4)
    }

    fn contact_values<'a>(&self, frame: &'a Frame) -> impl Iterator<Item = i32> + 'a {
        let threshold = self.config.contact_threshold;
        frame.cells().iter().copied().filter(move |&v| v > threshold)
    }
}

/// Round to `decimals` places, ties to even.
pub(crate) fn round_half_even(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round_ties_even() / factor
}

fn current_unix_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|dur| u64::try_from(dur.as_millis()).ok())
        .unwrap_or(0)
}
