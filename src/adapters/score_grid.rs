//! Score grid input: the CSV snapshot of the student-by-subject entry grid.
//!
//! The first header cell names the student column; every other header cell
//! is a subject label. Blank cells count as 0.

use crate::domain::model::{default_student_label, ScoreTable, StudentRow};
use crate::utils::error::{ReportError, Result};
use std::path::Path;

fn parse_cell(raw: &str, row: usize, subject: &str) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() => Ok(value),
        _ => Err(ReportError::invalid_input(format!(
            "row {}, column '{}': '{}' is not a number",
            row, subject, trimmed
        ))),
    }
}

pub fn read_score_grid(data: &[u8]) -> Result<ScoreTable> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = reader.headers()?.clone();
    if headers.is_empty() || headers.iter().all(str::is_empty) {
        return Err(ReportError::invalid_input("the score grid has no header row"));
    }
    let subjects: Vec<String> = headers.iter().skip(1).map(str::to_string).collect();
    if subjects.is_empty() {
        return Err(ReportError::invalid_input(
            "the score grid has no subject columns",
        ));
    }

    let mut rows = Vec::new();
    for (idx, record) in reader.records().enumerate() {
        let record = record?;
        // 第 1 列是表頭，資料列從 2 開始編號
        let line = idx + 2;
        if record.len() != headers.len() {
            return Err(ReportError::invalid_input(format!(
                "row {} has {} cells but the header has {}",
                line,
                record.len(),
                headers.len()
            )));
        }

        // 未填姓名的列使用預設標籤；整列空白即為全部 0 分的學生
        let label = match record.get(0).unwrap_or_default() {
            "" => default_student_label(rows.len()),
            name => name.to_string(),
        };
        let scores = record
            .iter()
            .skip(1)
            .zip(&subjects)
            .map(|(cell, subject)| parse_cell(cell, line, subject))
            .collect::<Result<Vec<f64>>>()?;
        rows.push(StudentRow::new(label, scores));
    }

    tracing::debug!(
        "Read score grid with {} students and {} subjects",
        rows.len(),
        subjects.len()
    );
    ScoreTable::new(subjects, rows)
}

pub fn read_score_grid_file<P: AsRef<Path>>(path: P) -> Result<ScoreTable> {
    let data = std::fs::read(path.as_ref())?;
    read_score_grid(&data)
}

/// CSV template for an all-zero grid of the given size.
pub fn blank_grid_csv(students: usize, subjects: usize) -> Result<String> {
    let table = ScoreTable::zeroed(students, subjects)?;
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["Student".to_string()];
    header.extend(table.subjects().iter().cloned());
    writer.write_record(&header)?;
    for row in table.rows() {
        let mut record = vec![row.label.clone()];
        record.extend(row.scores.iter().map(|_| "0".to_string()));
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::export(format!("failed to flush grid template: {}", e)))?;
    String::from_utf8(bytes)
        .map_err(|e| ReportError::export(format!("grid template is not valid UTF-8: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_grid_with_labels() {
        let grid = "Student,Math,Science\nAnn,80,90.5\nBo,70,60\n";
        let table = read_score_grid(grid.as_bytes()).unwrap();

        assert_eq!(table.subjects(), &["Math".to_string(), "Science".to_string()]);
        assert_eq!(table.len(), 2);
        assert_eq!(table.rows()[0].label, "Ann");
        assert_eq!(table.rows()[0].scores, vec![80.0, 90.5]);
    }

    #[test]
    fn test_blank_cells_default_to_zero() {
        let grid = "Student,Math,Science\nAnn,,90\nBo, 70 ,\n";
        let table = read_score_grid(grid.as_bytes()).unwrap();

        assert_eq!(table.rows()[0].scores, vec![0.0, 90.0]);
        assert_eq!(table.rows()[1].scores, vec![70.0, 0.0]);
    }

    #[test]
    fn test_all_blank_row_is_zero_score_student() {
        let grid = "Student,Math,Science\nAnn,80,90\n,,\nCy,10,20\n";
        let table = read_score_grid(grid.as_bytes()).unwrap();

        assert_eq!(table.len(), 3);
        assert_eq!(table.rows()[1].label, "Student 2");
        assert_eq!(table.rows()[1].scores, vec![0.0, 0.0]);
        assert_eq!(table.rows()[2].label, "Cy");
    }

    #[test]
    fn test_negative_and_large_scores_pass_through() {
        let grid = "Student,Math\nAnn,-5\nBo,140\n";
        let table = read_score_grid(grid.as_bytes()).unwrap();

        assert_eq!(table.rows()[0].scores, vec![-5.0]);
        assert_eq!(table.rows()[1].scores, vec![140.0]);
    }

    #[test]
    fn test_non_numeric_cell_is_rejected() {
        let grid = "Student,Math,Science\nAnn,80,ninety\n";
        match read_score_grid(grid.as_bytes()) {
            Err(ReportError::InvalidInput { message }) => {
                assert!(message.contains("row 2"));
                assert!(message.contains("Science"));
            }
            other => panic!("expected invalid input, got {:?}", other),
        }
    }

    #[test]
    fn test_nan_cell_is_rejected() {
        let grid = "Student,Math\nAnn,NaN\n";
        assert!(matches!(
            read_score_grid(grid.as_bytes()),
            Err(ReportError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_ragged_row_is_rejected() {
        let grid = "Student,Math,Science\nAnn,80\n";
        assert!(matches!(
            read_score_grid(grid.as_bytes()),
            Err(ReportError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_grid_without_subjects_is_rejected() {
        assert!(matches!(
            read_score_grid("Student\nAnn\n".as_bytes()),
            Err(ReportError::InvalidInput { .. })
        ));
        assert!(matches!(
            read_score_grid("".as_bytes()),
            Err(ReportError::InvalidInput { .. })
        ));
    }

    #[test]
    fn test_blank_grid_template_reads_back_as_zeroes() {
        let csv_text = blank_grid_csv(3, 4).unwrap();
        let table = read_score_grid(csv_text.as_bytes()).unwrap();

        assert_eq!(table, ScoreTable::zeroed(3, 4).unwrap());
    }
}
