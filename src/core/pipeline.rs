use crate::adapters::score_grid::read_score_grid_file;
use crate::core::report::compute;
use crate::core::{ConfigProvider, Pipeline, ReportBundle, Result, RunOutcome, ScoreTable, Storage};
use crate::domain::model::{ExportArtifact, ExportFormat, RankedReport, ScoreSource};
use crate::export::{delimited, json, pdf};

pub struct ReportPipeline<S: Storage, C: ConfigProvider> {
    storage: S,
    config: C,
}

impl<S: Storage, C: ConfigProvider> ReportPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Self {
        Self { storage, config }
    }

    fn render_artifact(&self, report: &RankedReport, format: ExportFormat) -> Result<ExportArtifact> {
        let bytes = match format {
            ExportFormat::Text => delimited::to_delimited_text(report)?.into_bytes(),
            ExportFormat::Pdf => pdf::render(report, self.config.report_title())?,
            ExportFormat::Json => json::to_json_summary(report)?.into_bytes(),
        };
        tracing::debug!("Rendered {} export ({} bytes)", format, bytes.len());

        Ok(ExportArtifact {
            format,
            file_name: self.config.file_name_for(format),
            bytes,
        })
    }
}

impl<S: Storage, C: ConfigProvider> Pipeline for ReportPipeline<S, C> {
    fn extract(&self) -> Result<ScoreTable> {
        match self.config.score_source() {
            ScoreSource::File(path) => {
                tracing::debug!("Reading score grid from: {}", path);
                read_score_grid_file(&path)
            }
            ScoreSource::Blank { students, subjects } => {
                tracing::warn!(
                    "No score grid given, using a blank {}x{} grid with every score at 0",
                    students,
                    subjects
                );
                ScoreTable::zeroed(students, subjects)
            }
        }
    }

    fn transform(&self, table: ScoreTable) -> Result<ReportBundle> {
        let num_subjects = self
            .config
            .num_subjects()
            .unwrap_or_else(|| table.num_subjects());
        let report = compute(&table, num_subjects)?;

        let formats = self
            .config
            .output_formats()
            .iter()
            .map(|f| f.parse::<ExportFormat>())
            .collect::<Result<Vec<_>>>()?;

        let artifacts = formats
            .into_iter()
            .map(|format| self.render_artifact(&report, format))
            .collect::<Result<Vec<_>>>()?;

        Ok(ReportBundle { report, artifacts })
    }

    fn load(&self, bundle: ReportBundle) -> Result<RunOutcome> {
        let mut written = Vec::with_capacity(bundle.artifacts.len());

        for artifact in &bundle.artifacts {
            tracing::debug!(
                "Writing {} ({}, {} bytes) to storage",
                artifact.file_name,
                artifact.mime_type(),
                artifact.bytes.len()
            );
            self.storage.write_file(&artifact.file_name, &artifact.bytes)?;
            written.push(format!("{}/{}", self.config.output_path(), artifact.file_name));
        }

        Ok(RunOutcome {
            report: bundle.report,
            written,
        })
    }
}
