use crate::core::{Pipeline, Result, RunOutcome};
use crate::export::format_percentage;

/// Runs one compute cycle: one call per trigger.
pub struct ReportEngine<P: Pipeline> {
    pipeline: P,
}

impl<P: Pipeline> ReportEngine<P> {
    pub fn new(pipeline: P) -> Self {
        Self { pipeline }
    }

    pub fn run(&self) -> Result<RunOutcome> {
        tracing::info!("Starting report run");

        // Extract
        tracing::info!("Reading score table...");
        let table = self.pipeline.extract()?;
        tracing::info!(
            "Read {} students across {} subjects",
            table.len(),
            table.num_subjects()
        );

        // Transform
        tracing::info!("Computing ranks and rendering exports...");
        let bundle = self.pipeline.transform(table)?;
        tracing::info!(
            "Ranked {} students, rendered {} export(s)",
            bundle.report.len(),
            bundle.artifacts.len()
        );

        // Load
        tracing::info!("Writing exports...");
        let outcome = self.pipeline.load(bundle)?;
        for path in &outcome.written {
            tracing::info!("Output saved to: {}", path);
        }

        if let Some(topper) = outcome.report.topper() {
            tracing::info!(
                "🏆 The class topper is {} with {}%",
                topper.student,
                format_percentage(topper.percentage)
            );
        }

        Ok(outcome)
    }
}
