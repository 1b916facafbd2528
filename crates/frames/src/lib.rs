//! # Sensore Frames
//!
//! Turns raw pressure-mat uploads into validated 32x32 frames.
//!
//! ## Pipeline
//!
//! ```text
//! Upload (.csv)
//!     │
//!     ├──> Pre-flight Validator (advisory)
//!     │      ├─> extension / size / emptiness
//!     │      ├─> first line: 32 columns, numeric first token
//!     │      └─> row count estimate (+ warning when uneven)
//!     │
//!     └──> Frame Decoder (authoritative, all-or-nothing)
//!            ├─> drop blank lines
//!            ├─> every line: exactly 32 columns
//!            ├─> row count divisible by 32
//!            └─> 32-row groups → Frame (1024 cells, row-major)
//! ```
//!
//! ## Example
//!
//! ```rust
//! use sensore_frames::{FrameDecoder, GRID_SIDE};
//!
//! let row = vec!["0"; GRID_SIDE].join(",");
//! let csv = vec![row; GRID_SIDE].join("\n");
//!
//! let parsed = FrameDecoder::new().decode_str(&csv).unwrap();
//! assert_eq!(parsed.frames.len(), 1);
//! assert_eq!(parsed.frames[0].row_end, 32);
//! ```

mod decoder;
mod error;
mod frame;
mod preflight;

pub use decoder::{FrameDecoder, ParseResult};
pub use error::{DecodeError, FrameError, Result};
pub use frame::{grid_position, row_range, Frame, ParsedFrame, FRAME_CELLS, GRID_SIDE};
pub use preflight::{PreflightConfig, PreflightValidator};
pub use sensore_protocol::ValidationResult;
