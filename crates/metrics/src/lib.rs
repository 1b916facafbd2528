//! # Sensore Metrics
//!
//! Clinical summary metrics for one 32x32 pressure frame.
//!
//! ## Metrics
//!
//! - **Peak Pressure Index**: highest trusted pressure. Small, scattered sets of
//!   high-pressure cells are rejected as sensor noise via the clustering check.
//! - **Contact Area %**: share of cells above the contact threshold.
//! - **COV**: population standard deviation over mean, contact cells only.
//!
//! ## Example
//!
//! ```rust
//! use sensore_frames::{Frame, FRAME_CELLS};
//! use sensore_metrics::{MetricsCalculator, MetricsConfig};
//!
//! let calculator = MetricsCalculator::new(MetricsConfig::default()).unwrap();
//! let frame = Frame::new(vec![100; FRAME_CELLS]).unwrap();
//!
//! let record = calculator.compute(&frame, 1);
//! assert_eq!(record.contact_area_percent, 100.0);
//! assert_eq!(record.cov, 0.0);
//! ```

mod calculator;
pub mod clustering;
mod config;
mod error;
mod summary;

pub use calculator::MetricsCalculator;
pub use clustering::{adjacent_pairs, is_clustered};
pub use config::MetricsConfig;
pub use error::{MetricsError, Result};
pub use summary::SummaryAccumulator;
