use crate::settings::Settings;
use crate::sink::RecordSink;
use anyhow::{anyhow, bail, Context, Result};
use sensore_frames::{FrameDecoder, ParseResult, PreflightValidator};
use sensore_metrics::{MetricsCalculator, SummaryAccumulator};
use sensore_protocol::IngestReport;
use std::path::Path;

pub const TOO_MANY_ERRORS: &str = "Too many errors. Stopping processing.";

/// Upload flow: pre-flight, decode, per-frame metrics, hand-off to the sink.
///
/// A decode error aborts the run before any record reaches the sink. Frame
/// failures after decoding are counted and capped instead.
pub struct IngestPipeline<S> {
    settings: Settings,
    validator: PreflightValidator,
    decoder: FrameDecoder,
    calculator: MetricsCalculator,
    sink: S,
}

impl<S: RecordSink> IngestPipeline<S> {
    pub fn new(settings: Settings, sink: S) -> Result<Self> {
        settings.validate()?;
        let calculator = MetricsCalculator::new(settings.metrics)?;
        let validator = PreflightValidator::new(settings.preflight.clone());
        Ok(Self {
            settings,
            validator,
            decoder: FrameDecoder::new(),
            calculator,
            sink,
        })
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Ingest a CSV file from disk
    pub async fn run(&mut self, path: &Path) -> Result<IngestReport> {
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mut report = IngestReport::new(&file_name);

        if self.settings.ingest.run_preflight {
            let validation = self.validator.validate_file(path).await;
            if !validation.is_valid {
                bail!("Invalid CSV file: {}", validation.errors.join(", "));
            }
            for warning in &validation.warnings {
                log::warn!("{file_name}: {warning}");
            }
            report.validation = Some(validation);
        }

        let parsed = self
            .decoder
            .decode_file(path)
            .await
            .map_err(|err| anyhow!("Error parsing CSV: {err}"))?;
        self.process(parsed, report).await
    }

    /// Ingest CSV text already in memory; the file-level pre-flight does not apply
    pub async fn run_text(&mut self, file_name: &str, content: &str) -> Result<IngestReport> {
        let parsed = self
            .decoder
            .decode_str(content)
            .map_err(|err| anyhow!("Error parsing CSV: {err}"))?;
        self.process(parsed, IngestReport::new(file_name)).await
    }

    async fn process(&mut self, parsed: ParseResult, mut report: IngestReport) -> Result<IngestReport> {
        let limits = self.settings.ingest.clone();
        let mut summary = SummaryAccumulator::new();
        let mut errors = Vec::new();
        report.total_frames = parsed.frame_count();

        for parsed_frame in &parsed.frames {
            let frame_number = parsed_frame.frame_number();
            let record = self
                .calculator
                .compute(&parsed_frame.frame, frame_number as i64);

            let outcome = match self.sink.accept(record.clone()).await {
                Ok(()) => {
                    report.processed_frames += 1;
                    summary.push(&record);
                    if report.processed_frames % limits.commit_batch_size == 0 {
                        self.sink.commit().await
                    } else {
                        Ok(())
                    }
                }
                Err(err) => Err(err),
            };

            if let Err(err) = outcome {
                report.failed_frames += 1;
                log::warn!("Frame {frame_number} failed: {err:#}");
                errors.push(format!("Frame {frame_number}: {err:#}"));

                if report.failed_frames > limits.max_frame_failures {
                    errors.push(TOO_MANY_ERRORS.to_string());
                    report.aborted = true;
                    break;
                }
            }
        }

        self.sink
            .commit()
            .await
            .context("Failed to commit remaining metric records")?;

        errors.truncate(limits.report_error_limit);
        report.errors = errors;
        report.summary = summary.finish();

        log::info!(
            "Processed {} of {} frames from {} ({} failed)",
            report.processed_frames,
            report.total_frames,
            report.file_name,
            report.failed_frames
        );
        Ok(report)
    }
}
