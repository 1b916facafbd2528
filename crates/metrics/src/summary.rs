use crate::calculator::round_half_even;
use sensore_protocol::{BatchSummary, FrameMetricRecord};

/// Running averages over the records of one batch
#[derive(Debug, Clone, Default)]
pub struct SummaryAccumulator {
    frames: usize,
    peak_sum: f64,
    contact_sum: f64,
    cov_sum: f64,
    peak_max: f64,
}

impl SummaryAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: &FrameMetricRecord) {
        self.frames += 1;
        self.peak_sum += record.peak_pressure_index;
        self.contact_sum += record.contact_area_percent;
        self.cov_sum += record.cov;
        self.peak_max = self.peak_max.max(record.peak_pressure_index);
    }

    #[must_use]
    pub fn frames(&self) -> usize {
        self.frames
    }

    /// `None` when nothing was pushed
    #[must_use]
    pub fn finish(&self) -> Option<BatchSummary> {
        if self.frames == 0 {
            return None;
        }
        let count = self.frames as f64;
        Some(BatchSummary {
            frames: self.frames,
            mean_peak_pressure_index: round_half_even(self.peak_sum / count, 2),
            mean_contact_area_percent: round_half_even(self.contact_sum / count, 2),
            mean_cov: round_half_even(self.cov_sum / count, 4),
            max_peak_pressure_index: self.peak_max,
        })
    }
}

impl<'a> Extend<&'a FrameMetricRecord> for SummaryAccumulator {
    fn extend<T: IntoIterator<Item = &'a FrameMetricRecord>>(&mut self, iter: T) {
        for record in iter {
            self.push(record);
        }
    }
}
