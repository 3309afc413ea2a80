//! Report layout: turns a ranked report into positioned text on fixed-size
//! pages. Coordinates are PDF points with the origin at the bottom-left.
//!
//! The column header is drawn on the first page only. Continuation pages
//! start straight at the top with data rows.

use crate::domain::model::{RankedReport, ReportEntry};
use crate::export::{format_percentage, format_score};

pub const PAGE_WIDTH: f32 = 612.0;
pub const PAGE_HEIGHT: f32 = 792.0;

pub const TITLE_Y: f32 = 750.0;
pub const HEADER_Y: f32 = 720.0;
pub const FIRST_ROW_Y: f32 = HEADER_Y - LINE_HEIGHT;
pub const CONTINUATION_TOP_Y: f32 = 750.0;
pub const LINE_HEIGHT: f32 = 20.0;
pub const BOTTOM_MARGIN: f32 = 50.0;

pub const LEFT_X: f32 = 50.0;
pub const COLUMN_X: [f32; 4] = [50.0, 200.0, 300.0, 420.0];
pub const HEADER_LABELS: [&str; 4] = ["Student", "Total", "Percentage", "Rank"];

pub const DEFAULT_REPORT_TITLE: &str = "Student Results Report";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontStyle {
    Title,
    Header,
    Body,
}

impl FontStyle {
    pub fn size(self) -> f32 {
        match self {
            FontStyle::Title => 16.0,
            FontStyle::Header | FontStyle::Body => 12.0,
        }
    }

    pub fn is_bold(self) -> bool {
        !matches!(self, FontStyle::Body)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    pub text: String,
    pub x: f32,
    pub y: f32,
    pub font: FontStyle,
}

impl Placement {
    fn new(text: impl Into<String>, x: f32, y: f32, font: FontStyle) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageLayout {
    pub placements: Vec<Placement>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DocumentLayout {
    pub width: f32,
    pub height: f32,
    pub pages: Vec<PageLayout>,
}

fn rows_fitting_from(start_y: f32) -> usize {
    ((start_y - BOTTOM_MARGIN) / LINE_HEIGHT).floor() as usize + 1
}

pub fn rows_on_first_page() -> usize {
    rows_fitting_from(FIRST_ROW_Y)
}

pub fn rows_per_continuation_page() -> usize {
    rows_fitting_from(CONTINUATION_TOP_Y)
}

/// Number of pages needed for `entries` data rows.
pub fn page_count(entries: usize) -> usize {
    let first = rows_on_first_page();
    if entries <= first {
        return 1;
    }
    1 + (entries - first).div_ceil(rows_per_continuation_page())
}

fn row_placements(entry: &ReportEntry, y: f32) -> [Placement; 4] {
    [
        Placement::new(entry.student.clone(), COLUMN_X[0], y, FontStyle::Body),
        Placement::new(format_score(entry.total), COLUMN_X[1], y, FontStyle::Body),
        Placement::new(
            format!("{}%", format_percentage(entry.percentage)),
            COLUMN_X[2],
            y,
            FontStyle::Body,
        ),
        Placement::new(entry.rank.to_string(), COLUMN_X[3], y, FontStyle::Body),
    ]
}

pub fn layout_report(report: &RankedReport, title: &str) -> DocumentLayout {
    let mut pages = Vec::with_capacity(page_count(report.len()));
    let mut page = PageLayout::default();

    page.placements
        .push(Placement::new(title, LEFT_X, TITLE_Y, FontStyle::Title));
    for (label, x) in HEADER_LABELS.iter().zip(COLUMN_X) {
        page.placements
            .push(Placement::new(*label, x, HEADER_Y, FontStyle::Header));
    }

    let mut y = FIRST_ROW_Y;
    for entry in report.entries() {
        if y < BOTTOM_MARGIN {
            // 換頁後從頁首開始，不重畫表頭
            pages.push(std::mem::take(&mut page));
            y = CONTINUATION_TOP_Y;
        }
        page.placements.extend(row_placements(entry, y));
        y -= LINE_HEIGHT;
    }
    pages.push(page);

    DocumentLayout {
        width: PAGE_WIDTH,
        height: PAGE_HEIGHT,
        pages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::report::compute;
    use crate::domain::model::ScoreTable;

    fn report_with(students: usize) -> RankedReport {
        let scores = (0..students).map(|i| vec![(i % 100) as f64]).collect();
        compute(&ScoreTable::from_scores(scores).unwrap(), 1).unwrap()
    }

    fn header_count(page: &PageLayout) -> usize {
        page.placements
            .iter()
            .filter(|p| p.font == FontStyle::Header)
            .count()
    }

    #[test]
    fn test_page_capacities() {
        assert_eq!(rows_on_first_page(), 33);
        assert_eq!(rows_per_continuation_page(), 36);
    }

    #[test]
    fn test_page_count_boundaries() {
        assert_eq!(page_count(0), 1);
        assert_eq!(page_count(33), 1);
        assert_eq!(page_count(34), 2);
        assert_eq!(page_count(69), 2);
        assert_eq!(page_count(70), 3);
    }

    #[test]
    fn test_empty_report_is_title_and_header() {
        let layout = layout_report(&RankedReport::empty(vec!["Subject 1".to_string()]), "Results");

        assert_eq!(layout.pages.len(), 1);
        let texts: Vec<&str> = layout.pages[0]
            .placements
            .iter()
            .map(|p| p.text.as_str())
            .collect();
        assert_eq!(texts, vec!["Results", "Student", "Total", "Percentage", "Rank"]);
    }

    #[test]
    fn test_layout_matches_page_count() {
        for n in [1, 32, 33, 34, 68, 69, 70, 120] {
            let layout = layout_report(&report_with(n), DEFAULT_REPORT_TITLE);
            assert_eq!(layout.pages.len(), page_count(n), "entries = {}", n);
        }
    }

    #[test]
    fn test_every_entry_appears_once_in_order() {
        let report = report_with(80);
        let layout = layout_report(&report, DEFAULT_REPORT_TITLE);

        let students: Vec<&str> = layout
            .pages
            .iter()
            .flat_map(|p| p.placements.iter())
            .filter(|p| p.font == FontStyle::Body && p.x == COLUMN_X[0])
            .map(|p| p.text.as_str())
            .collect();
        let expected: Vec<&str> = report.entries().iter().map(|e| e.student.as_str()).collect();
        assert_eq!(students, expected);
    }

    #[test]
    fn test_header_only_on_first_page() {
        let layout = layout_report(&report_with(75), DEFAULT_REPORT_TITLE);

        assert_eq!(layout.pages.len(), 3);
        assert_eq!(header_count(&layout.pages[0]), 4);
        assert_eq!(header_count(&layout.pages[1]), 0);
        assert_eq!(header_count(&layout.pages[2]), 0);
    }

    #[test]
    fn test_row_positions() {
        let layout = layout_report(&report_with(35), DEFAULT_REPORT_TITLE);

        let first_page_rows: Vec<f32> = layout.pages[0]
            .placements
            .iter()
            .filter(|p| p.font == FontStyle::Body && p.x == COLUMN_X[0])
            .map(|p| p.y)
            .collect();
        assert_eq!(first_page_rows.first(), Some(&700.0));
        assert_eq!(first_page_rows.last(), Some(&60.0));

        let second_page_rows: Vec<f32> = layout.pages[1]
            .placements
            .iter()
            .filter(|p| p.x == COLUMN_X[0])
            .map(|p| p.y)
            .collect();
        assert_eq!(second_page_rows, vec![750.0, 730.0]);
        assert!(layout
            .pages
            .iter()
            .flat_map(|p| p.placements.iter())
            .all(|p| p.y >= BOTTOM_MARGIN));
    }

    #[test]
    fn test_row_cells() {
        let table = ScoreTable::from_scores(vec![vec![80.0, 70.0, 90.0, 60.0]]).unwrap();
        let layout = layout_report(&compute(&table, 4).unwrap(), DEFAULT_REPORT_TITLE);

        let cells: Vec<&str> = layout.pages[0]
            .placements
            .iter()
            .filter(|p| p.font == FontStyle::Body)
            .map(|p| p.text.as_str())
            .collect();
        assert_eq!(cells, vec!["Student 1", "300", "75.00%", "1"]);
    }
}
