use crate::domain::model::RankedReport;
use crate::domain::ports::DocumentRenderer;
use crate::export::layout::{layout_report, DocumentLayout, FontStyle, PageLayout};
use crate::utils::error::{ReportError, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

const REGULAR_FONT: &str = "F1";
const BOLD_FONT: &str = "F2";

/// Writes layouts with the standard Type1 Helvetica faces, one content
/// stream per page.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfRenderer;

fn font_resource(font: FontStyle) -> &'static str {
    if font.is_bold() {
        BOLD_FONT
    } else {
        REGULAR_FONT
    }
}

/// Standard fonts only cover Latin-1; anything outside it prints as `?`.
fn encode_text(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

fn page_content(page: &PageLayout) -> Content {
    let mut operations = Vec::with_capacity(page.placements.len() * 5);
    for placement in &page.placements {
        operations.push(Operation::new("BT", vec![]));
        operations.push(Operation::new(
            "Tf",
            vec![
                font_resource(placement.font).into(),
                placement.font.size().into(),
            ],
        ));
        operations.push(Operation::new(
            "Td",
            vec![placement.x.into(), placement.y.into()],
        ));
        operations.push(Operation::new(
            "Tj",
            vec![Object::string_literal(encode_text(&placement.text))],
        ));
        operations.push(Operation::new("ET", vec![]));
    }
    Content { operations }
}

impl DocumentRenderer for LopdfRenderer {
    fn render(&self, layout: &DocumentLayout) -> Result<Vec<u8>> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();

        let regular_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica",
        });
        let bold_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Helvetica-Bold",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! {
                REGULAR_FONT => regular_id,
                BOLD_FONT => bold_id,
            },
        });

        let mut kids: Vec<Object> = Vec::with_capacity(layout.pages.len());
        for (idx, page) in layout.pages.iter().enumerate() {
            let encoded = page_content(page).encode().map_err(|e| {
                ReportError::render(format!("failed to encode page {}: {}", idx + 1, e))
            })?;
            let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let page_total = kids.len() as i64;
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_total,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), layout.width.into(), layout.height.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));

        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);
        doc.compress();

        let mut buffer = Vec::new();
        doc.save_to(&mut buffer)
            .map_err(|e| ReportError::render(format!("failed to write PDF document: {}", e)))?;

        tracing::debug!(
            "Rendered PDF with {} page(s), {} bytes",
            layout.pages.len(),
            buffer.len()
        );
        Ok(buffer)
    }
}

/// Lays out and renders the report as a finished PDF document.
pub fn render(report: &RankedReport, title: &str) -> Result<Vec<u8>> {
    render_with(&LopdfRenderer, report, title)
}

pub fn render_with<R: DocumentRenderer>(
    renderer: &R,
    report: &RankedReport,
    title: &str,
) -> Result<Vec<u8>> {
    let layout = layout_report(report, title);
    renderer.render(&layout)
}
