use crate::domain::model::{ExportFormat, ReportBundle, RunOutcome, ScoreSource, ScoreTable};
use crate::export::layout::DocumentLayout;
use crate::utils::error::Result;

pub trait Storage {
    fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}

pub trait ConfigProvider {
    fn score_source(&self) -> ScoreSource;
    /// 明確指定的科目數；未指定時使用表格欄數
    fn num_subjects(&self) -> Option<usize>;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[String];
    fn report_title(&self) -> &str;

    fn file_name_for(&self, format: ExportFormat) -> String {
        format.default_file_name().to_string()
    }
}

/// Turns a laid-out document into finished file bytes.
pub trait DocumentRenderer {
    fn render(&self, layout: &DocumentLayout) -> Result<Vec<u8>>;
}

pub trait Pipeline {
    fn extract(&self) -> Result<ScoreTable>;
    fn transform(&self, table: ScoreTable) -> Result<ReportBundle>;
    fn load(&self, bundle: ReportBundle) -> Result<RunOutcome>;
}
