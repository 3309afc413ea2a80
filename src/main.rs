use anyhow::Context;
use clap::Parser;
use student_ranker::adapters::score_grid::blank_grid_csv;
use student_ranker::config::cli::DEFAULT_BLANK_SUBJECTS;
use student_ranker::utils::{logger, validation::Validate};
use student_ranker::{CliConfig, LocalStorage, ReportEngine, ReportPipeline};

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting student-ranker CLI");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    if let Some(path) = &config.write_template {
        let subjects = config.subjects.unwrap_or(DEFAULT_BLANK_SUBJECTS);
        let template = blank_grid_csv(config.students, subjects)?;
        std::fs::write(path, template)
            .with_context(|| format!("failed to write score grid template to '{}'", path))?;
        println!(
            "📝 Blank grid ({} students x {} subjects) written to {}",
            config.students, subjects, path
        );
        return Ok(());
    }

    let storage = LocalStorage::new(config.output_path.clone());
    let pipeline = ReportPipeline::new(storage, config);
    let engine = ReportEngine::new(pipeline);

    match engine.run() {
        Ok(outcome) => {
            tracing::info!("✅ Report run completed successfully!");
            if let Some(topper) = outcome.report.topper() {
                println!(
                    "🏆 The class topper is {} with {:.2}%",
                    topper.student, topper.percentage
                );
            }
            for path in &outcome.written {
                println!("📁 Output saved to: {}", path);
            }
        }
        Err(e) => {
            tracing::error!(
                "❌ Report run failed: {} (Category: {:?}, Severity: {:?})",
                e,
                e.category(),
                e.severity()
            );
            tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

            eprintln!("❌ {}", e.user_friendly_message());
            eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

            std::process::exit(e.exit_code());
        }
    }

    Ok(())
}
