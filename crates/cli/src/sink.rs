use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use sensore_protocol::FrameMetricRecord;
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Persistence collaborator that receives metric records.
///
/// The pipeline calls `accept` once per frame and `commit` at its batch
/// cadence and at the end of a run. Durability and transactions are up to the
/// implementation.
#[async_trait]
pub trait RecordSink: Send {
    /// Stage one record
    async fn accept(&mut self, record: FrameMetricRecord) -> Result<()>;

    /// Persist everything staged so far
    async fn commit(&mut self) -> Result<()>;
}

/// Writes one JSON object per line on commit.
///
/// Bytes a failed commit could not write stay buffered, and the next commit
/// resumes from the first unwritten byte, so a retry never repeats or splits
/// a line.
pub struct JsonLinesSink<W> {
    writer: W,
    pending: Vec<FrameMetricRecord>,
    unwritten: Vec<u8>,
    staged: usize,
    written: usize,
}

impl<W: AsyncWrite + Unpin + Send> JsonLinesSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            pending: Vec::new(),
            unwritten: Vec::new(),
            staged: 0,
            written: 0,
        }
    }

    /// Records written out so far
    #[must_use]
    pub fn written(&self) -> usize {
        self.written
    }

    pub fn into_inner(self) -> W {
        self.writer
    }
}

#[async_trait]
impl<W: AsyncWrite + Unpin + Send> RecordSink for JsonLinesSink<W> {
    async fn accept(&mut self, record: FrameMetricRecord) -> Result<()> {
        self.pending.push(record);
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        if self.pending.is_empty() && self.unwritten.is_empty() {
            return Ok(());
        }

        let mut lines = Vec::new();
        for record in &self.pending {
            serde_json::to_writer(&mut lines, record)?;
            lines.push(b'\n');
        }
        self.unwritten.extend_from_slice(&lines);
        self.staged += self.pending.len();
        self.pending.clear();

        while !self.unwritten.is_empty() {
            let n = self
                .writer
                .write(&self.unwritten)
                .await
                .context("Failed to write metric records")?;
            if n == 0 {
                bail!("Failed to write metric records: output closed");
            }
            self.unwritten.drain(..n);
        }
        self.writer
            .flush()
            .await
            .context("Failed to flush metric records")?;

        log::debug!("Committed {} records", self.staged);
        self.written += self.staged;
        self.staged = 0;
        Ok(())
    }
}

/// Keeps committed records in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    committed: Vec<FrameMetricRecord>,
    pending: Vec<FrameMetricRecord>,
    commits: usize,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn records(&self) -> &[FrameMetricRecord] {
        &self.committed
    }

    /// Number of `commit` calls that persisted at least one record
    #[must_use]
    pub fn commits(&self) -> usize {
        self.commits
    }

    pub fn into_records(self) -> Vec<FrameMetricRecord> {
        self.committed
    }
}

#[async_trait]
impl RecordSink for MemorySink {
    async fn accept(&mut self, record: FrameMetricRecord) -> Result<()> {
        self.pending.push(record);
        Ok(())
    }

    async fn commit(&mut self) -> Result<()> {
        if self.pending.is_empty() {
            return Ok(());
        }
        self.committed.append(&mut self.pending);
        self.commits += 1;
        Ok(())
    }
}
