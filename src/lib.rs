pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod export;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;
pub use config::TomlConfig;

pub use adapters::storage::LocalStorage;
pub use core::{engine::ReportEngine, pipeline::ReportPipeline, report::compute};
pub use domain::model::{ExportFormat, RankedReport, ReportEntry, ScoreTable, StudentRow};
pub use export::{delimited::to_delimited_text, pdf::render};
pub use utils::error::{ReportError, Result};
