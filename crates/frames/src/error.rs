use thiserror::Error;

/// Result type for decoding operations
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Errors raised while assembling a single frame
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// No frame data was supplied
    #[error("Frame data is missing; expected exactly 1024 values (32x32 grid)")]
    Missing,

    /// Flat data of the wrong length
    #[error("Frame data must be exactly 1024 values (32x32 grid), got {actual}")]
    InvalidLength { actual: usize },

    /// Row group of the wrong size handed to frame assembly
    #[error("Must provide exactly 32 rows for one frame, got {actual}")]
    InvalidRowCount { actual: usize },

    /// A row inside the group is too short
    #[error("Row {row} has fewer than 32 columns (found {found})")]
    ShortRow { row: usize, found: usize },

    /// A token that is not an integer
    #[error("Invalid value at row {row}, col {col}: {value:?}")]
    InvalidValue {
        row: usize,
        col: usize,
        value: String,
    },
}

/// Structural errors that abort a whole decode
#[derive(Error, Debug)]
pub enum DecodeError {
    /// A retained line without exactly 32 columns
    #[error("Invalid CSV format at line {line}: Expected 32 columns, found {found}")]
    ColumnCount { line: usize, found: usize },

    /// Retained rows cannot be grouped into whole frames
    #[error(
        "Invalid CSV format: Total rows ({rows}) is not divisible by 32. Each frame must be exactly 32 rows."
    )]
    RowCount { rows: usize },

    /// Frame assembly failed for one row group
    #[error("Error parsing frame {frame} (rows {row_start}-{row_end}): {source}")]
    Frame {
        frame: usize,
        row_start: usize,
        row_end: usize,
        #[source]
        source: FrameError,
    },

    /// IO error while reading lines
    #[error("Error reading CSV input: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    /// Physical line number the error points at, when there is one
    #[must_use]
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::ColumnCount { line, .. } => Some(*line),
            _ => None,
        }
    }
}
