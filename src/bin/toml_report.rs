use clap::Parser;
use student_ranker::core::ConfigProvider;
use student_ranker::domain::model::{ExportFormat, ScoreSource};
use student_ranker::utils::{logger, validation::Validate};
use student_ranker::{LocalStorage, ReportEngine, ReportPipeline, TomlConfig};

#[derive(Parser)]
#[command(name = "toml-report")]
#[command(about = "Student ranking report with TOML configuration support")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "report-config.toml")]
    config: String,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Override the export formats from config (comma separated)
    #[arg(long, value_delimiter = ',')]
    formats: Option<Vec<String>>,

    /// Dry run - show what would be produced without writing anything
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 載入 TOML 配置
    let mut config = match TomlConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 初始化日誌
    let verbose = args.verbose || config.verbose();
    if config.json_logs() {
        logger::init_json_logger(verbose);
    } else {
        logger::init_cli_logger(verbose);
    }

    tracing::info!("🚀 Starting TOML-based report tool");
    tracing::info!("📁 Loaded configuration from: {}", args.config);

    // 套用命令列覆蓋設定
    if let Some(formats) = args.formats.clone() {
        tracing::info!("🔧 Export formats overridden to: {}", formats.join(", "));
        config.output.formats = formats;
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(e.exit_code());
    }

    tracing::info!("✅ Configuration loaded and validated successfully");

    display_config_summary(&config, &args);

    if args.dry_run {
        tracing::info!("🔍 DRY RUN MODE - nothing will be written");
        perform_dry_run(&config)?;
        return Ok(());
    }

    let storage = LocalStorage::new(config.output_path().to_string());
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

fn display_config_summary(config: &TomlConfig, args: &Args) {
    println!("📋 Configuration Summary:");
    println!("  Title: {}", config.report_title());
    match config.score_source() {
        ScoreSource::File(path) => println!("  Input: {}", path),
        ScoreSource::Blank { students, subjects } => {
            println!("  Input: blank grid ({} students x {} subjects)", students, subjects)
        }
    }
    if let Some(subjects) = config.num_subjects() {
        println!("  Subjects: {}", subjects);
    }
    println!("  Output: {}", config.output_path());
    println!("  Formats: {}", config.output_formats().join(", "));

    if args.dry_run {
        println!("  🔍 DRY RUN MODE ENABLED");
    }

    println!();
}

fn perform_dry_run(config: &TomlConfig) -> anyhow::Result<()> {
    println!("🔍 Dry Run Analysis:");
    println!();

    println!("💾 Planned exports:");
    for format in config.output_formats() {
        let format: ExportFormat = format.parse()?;
        println!(
            "  {}/{} ({})",
            config.output_path(),
            config.file_name_for(format),
            format.mime_type()
        );
    }

    println!();
    println!("✅ Dry run analysis complete. Use --verbose for more details during actual run.");

    Ok(())
}
