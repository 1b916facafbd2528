use crate::error::FrameError;

/// Cells along one side of the sensor mat
pub const GRID_SIDE: usize = 32;

/// Cells in one frame (32 x 32, row-major)
pub const FRAME_CELLS: usize = GRID_SIDE * GRID_SIDE;

/// One 32x32 pressure snapshot, flattened row-major.
///
/// The length is part of the type: every way of building a `Frame` checks it
/// once, so callers never re-validate. Values are kept as read; out-of-range
/// sensor readings are not clamped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    cells: Box<[i32; FRAME_CELLS]>,
}

impl Frame {
    /// Build a frame from flat row-major data
    pub fn new(data: Vec<i32>) -> Result<Self, FrameError> {
        let actual = data.len();
        let cells: Box<[i32; FRAME_CELLS]> = data
            .into_boxed_slice()
            .try_into()
            .map_err(|_| FrameError::InvalidLength { actual })?;
        Ok(Self { cells })
    }

    /// Build a frame from borrowed flat data
    pub fn from_slice(data: &[i32]) -> Result<Self, FrameError> {
        if data.len() != FRAME_CELLS {
            return Err(FrameError::InvalidLength { actual: data.len() });
        }
        Self::new(data.to_vec())
    }

    /// Assemble a frame from exactly 32 CSV rows of at least 32 columns.
    ///
    /// Tokens are trimmed before parsing. Row and column numbers in errors are
    /// 0-based positions inside the group.
    pub fn from_csv_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, FrameError> {
        if rows.len() != GRID_SIDE {
            return Err(FrameError::InvalidRowCount { actual: rows.len() });
        }

        let mut cells = Box::new([0i32; FRAME_CELLS]);
        for (row, line) in rows.iter().enumerate() {
            let mut found = 0;
            for (col, token) in line.as_ref().split(',').take(GRID_SIDE).enumerate() {
                let token = token.trim();
                let value = token.parse::<i32>().map_err(|_| FrameError::InvalidValue {
                    row,
                    col,
                    value: token.to_string(),
                })?;
                cells[row * GRID_SIDE + col] = value;
                found += 1;
            }
            if found < GRID_SIDE {
                return Err(FrameError::ShortRow { row, found });
            }
        }

        Ok(Self { cells })
    }

    #[must_use]
    pub fn cells(&self) -> &[i32] {
        self.cells.as_slice()
    }

    /// Value at (row, col); `None` outside the grid
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> Option<i32> {
        if row >= GRID_SIDE || col >= GRID_SIDE {
            return None;
        }
        Some(self.cells[row * GRID_SIDE + col])
    }

    /// Largest cell value in the frame
    #[must_use]
    pub fn max_value(&self) -> i32 {
        // A frame always has FRAME_CELLS cells, so the fold never sees an empty grid.
        self.cells.iter().copied().fold(i32::MIN, i32::max)
    }

    /// Flat indices of cells strictly above `threshold`
    #[must_use]
    pub fn indices_above(&self, threshold: i32) -> Vec<usize> {
        self.cells
            .iter()
            .enumerate()
            .filter(|&(_, &value)| value > threshold)
            .map(|(idx, _)| idx)
            .collect()
    }

    /// Render the frame as 32 CSV lines, the inverse of [`Frame::from_csv_rows`]
    #[must_use]
    pub fn to_csv_rows(&self) -> Vec<String> {
        self.cells
            .chunks(GRID_SIDE)
            .map(|row| {
                row.iter()
                    .map(i32::to_string)
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect()
    }
}

impl TryFrom<Vec<i32>> for Frame {
    type Error = FrameError;

    fn try_from(data: Vec<i32>) -> Result<Self, Self::Error> {
        Self::new(data)
    }
}

impl AsRef<[i32]> for Frame {
    fn as_ref(&self) -> &[i32] {
        self.cells()
    }
}

/// Map a flat index to (row, col)
#[must_use]
pub const fn grid_position(index: usize) -> (usize, usize) {
    (index / GRID_SIDE, index % GRID_SIDE)
}

/// A decoded frame with its position in the source batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedFrame {
    /// 0-based position in the batch
    pub frame_index: usize,

    /// First retained row of the frame (1-based, inclusive)
    pub row_start: usize,

    /// Last retained row of the frame (1-based, inclusive)
    pub row_end: usize,

    pub frame: Frame,
}

impl ParsedFrame {
    #[must_use]
    pub fn new(frame_index: usize, frame: Frame) -> Self {
        let (row_start, row_end) = row_range(frame_index);
        Self {
            frame_index,
            row_start,
            row_end,
            frame,
        }
    }

    /// 1-based frame number used in messages and as the default frame id
    #[must_use]
    pub const fn frame_number(&self) -> usize {
        self.frame_index + 1
    }
}

/// Retained-row range covered by the frame at `frame_index`
#[must_use]
pub const fn row_range(frame_index: usize) -> (usize, usize) {
    (frame_index * GRID_SIDE + 1, (frame_index + 1) * GRID_SIDE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn sequential_rows() -> Vec<String> {
        (0..GRID_SIDE)
            .map(|row| {
                (0..GRID_SIDE)
                    .map(|col| (row * GRID_SIDE + col).to_string())
                    .collect::<Vec<_>>()
                    .join(",")
            })
            .collect()
    }

    #[test]
    fn new_rejects_wrong_length() {
        let err = Frame::new(vec![0; 1023]).unwrap_err();
        assert_eq!(err, FrameError::InvalidLength { actual: 1023 });
        assert!(err.to_string().contains("1024"));

        assert!(Frame::new(vec![0; 1025]).is_err());
        assert!(Frame::new(vec![0; FRAME_CELLS]).is_ok());
    }

    #[test]
    fn from_slice_matches_new() {
        let data: Vec<i32> = (0..FRAME_CELLS as i32).collect();
        assert_eq!(Frame::from_slice(&data).unwrap(), Frame::new(data).unwrap());
        assert!(Frame::from_slice(&[1, 2, 3]).is_err());
    }

    #[test]
    fn from_csv_rows_is_row_major() {
        let frame = Frame::from_csv_rows(&sequential_rows()).unwrap();
        assert_eq!(frame.cells().len(), FRAME_CELLS);
        assert_eq!(frame.cells()[0], 0);
        assert_eq!(frame.cells()[512], 512);
        assert_eq!(frame.cells()[1023], 1023);
        assert_eq!(frame.get(16, 0), Some(512));
        assert_eq!(frame.get(31, 31), Some(1023));
        assert_eq!(frame.get(32, 0), None);
    }

    #[test]
    fn from_csv_rows_trims_tokens() {
        let rows: Vec<String> = (0..GRID_SIDE)
            .map(|_| vec![" 7 "; GRID_SIDE].join(","))
            .collect();
        let frame = Frame::from_csv_rows(&rows).unwrap();
        assert!(frame.cells().iter().all(|&v| v == 7));
    }

    #[test]
    fn from_csv_rows_requires_32_rows() {
        let mut rows = sequential_rows();
        rows.pop();
        assert_eq!(
            Frame::from_csv_rows(&rows).unwrap_err(),
            FrameError::InvalidRowCount { actual: 31 }
        );
    }

    #[test]
    fn from_csv_rows_reports_short_row() {
        let mut rows = sequential_rows();
        rows[4] = vec!["1"; 30].join(",");
        assert_eq!(
            Frame::from_csv_rows(&rows).unwrap_err(),
            FrameError::ShortRow { row: 4, found: 30 }
        );
    }

    #[test]
    fn from_csv_rows_reports_bad_token_position() {
        let mut rows = sequential_rows();
        let mut tokens: Vec<String> = rows[3].split(',').map(str::to_string).collect();
        tokens[5] = "abc".to_string();
        rows[3] = tokens.join(",");

        let err = Frame::from_csv_rows(&rows).unwrap_err();
        assert_eq!(
            err,
            FrameError::InvalidValue {
                row: 3,
                col: 5,
                value: "abc".to_string()
            }
        );
        assert!(err.to_string().contains("row 3, col 5"));
    }

    #[test]
    fn negative_and_out_of_range_values_are_kept() {
        let mut data = vec![0; FRAME_CELLS];
        data[0] = -5;
        data[1] = 9000;
        let frame = Frame::new(data).unwrap();
        assert_eq!(frame.cells()[0], -5);
        assert_eq!(frame.max_value(), 9000);
    }

    #[test]
    fn indices_above_is_strict() {
        let mut data = vec![30; FRAME_CELLS];
        data[10] = 31;
        data[20] = 500;
        let frame = Frame::new(data).unwrap();
        assert_eq!(frame.indices_above(30), vec![10, 20]);
        assert_eq!(frame.indices_above(500), Vec::<usize>::new());
    }

    #[test]
    fn csv_rows_round_trip() {
        let frame = Frame::from_csv_rows(&sequential_rows()).unwrap();
        assert_eq!(frame.to_csv_rows(), sequential_rows());
    }

    #[test]
    fn parsed_frame_row_range() {
        let frame = Frame::new(vec![0; FRAME_CELLS]).unwrap();
        let parsed = ParsedFrame::new(2, frame);
        assert_eq!((parsed.row_start, parsed.row_end), (65, 96));
        assert_eq!(parsed.frame_number(), 3);
        assert_eq!(grid_position(33), (1, 1));
    }
}
