use crate::error::{DecodeError, Result};
use crate::frame::{row_range, Frame, ParsedFrame, GRID_SIDE};
use std::io::BufRead;
use std::path::Path;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};

/// Frames decoded from one batch, in input order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseResult {
    pub frames: Vec<ParsedFrame>,

    /// Retained (non-blank) rows read from the input
    pub total_rows: usize,
}

impl ParseResult {
    #[must_use]
    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn message(&self) -> String {
        format!("Successfully parsed {} frames from CSV", self.frames.len())
    }
}

/// Decodes comma-separated text into 32x32 frames.
///
/// The decode is all-or-nothing: any structural problem yields a single
/// [`DecodeError`] and no frames. Checks run in a fixed order across the whole
/// input: column counts per line first, then the total row count, then token
/// parsing frame by frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameDecoder;

impl FrameDecoder {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decode frames from an in-memory string
    pub fn decode_str(&self, content: &str) -> Result<ParseResult> {
        let mut collector = RowCollector::default();
        for line in content.lines() {
            collector.push_line(line)?;
        }
        collector.finish()
    }

    /// Decode frames from a buffered synchronous reader
    pub fn decode_reader<R: BufRead>(&self, reader: R) -> Result<ParseResult> {
        let mut collector = RowCollector::default();
        for line in reader.lines() {
            collector.push_line(&line?)?;
        }
        collector.finish()
    }

    /// Decode frames from a buffered async reader; reads are the only await points
    pub async fn decode_async<R: AsyncBufRead + Unpin>(&self, reader: R) -> Result<ParseResult> {
        let mut lines = reader.lines();
        let mut collector = RowCollector::default();
        while let Some(line) = lines.next_line().await? {
            collector.push_line(&line)?;
        }
        collector.finish()
    }

    /// Decode frames from a file on disk
    pub async fn decode_file(&self, path: impl AsRef<Path>) -> Result<ParseResult> {
        let path = path.as_ref();
        log::debug!("Decoding frames from {}", path.display());
        let file = tokio::fs::File::open(path).await?;
        self.decode_async(BufReader::new(file)).await
    }
}

/// Line-at-a-time accumulator shared by the sync and async entry points
#[derive(Debug, Default)]
struct RowCollector {
    /// Physical line number of the last line seen (blank lines included)
    line_number: usize,
    rows: Vec<String>,
}

impl RowCollector {
    fn push_line(&mut self, line: &str) -> Result<()> {
        self.line_number += 1;

        if line.trim().is_empty() {
            return Ok(());
        }

        let found = line.split(',').count();
        if found != GRID_SIDE {
            log::warn!(
                "Rejecting batch: line {} has {} columns",
                self.line_number,
                found
            );
            return Err(DecodeError::ColumnCount {
                line: self.line_number,
                found,
            });
        }

        self.rows.push(line.to_string());
        Ok(())
    }

    fn finish(self) -> Result<ParseResult> {
        let total_rows = self.rows.len();
        if total_rows % GRID_SIDE != 0 {
            log::warn!("Rejecting batch: {total_rows} rows is not a whole number of frames");
            return Err(DecodeError::RowCount { rows: total_rows });
        }

        let frames = self
            .rows
            .chunks(GRID_SIDE)
            .enumerate()
            .map(|(frame_index, group)| {
                let frame = Frame::from_csv_rows(group).map_err(|source| {
                    let (row_start, row_end) = row_range(frame_index);
                    DecodeError::Frame {
                        frame: frame_index + 1,
                        row_start,
                        row_end,
                        source,
                    }
                })?;
                log::debug!("Assembled frame {}", frame_index + 1);
                Ok(ParsedFrame::new(frame_index, frame))
            })
            .collect::<Result<Vec<_>>>()?;

        log::info!("Parsed {} frames from {} rows", frames.len(), total_rows);
        Ok(ParseResult { frames, total_rows })
    }
}
