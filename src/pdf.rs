//! Summary export as a PDF file.
//!
//! DESIGN
//! ======
//! The export is a few lines of Helvetica text on A4. Layout happens here;
//! `lopdf` owns the object graph, string escaping and the cross-reference
//! table. Coordinates are given in millimetres from the top-left corner (the
//! way the page is designed) and converted to PDF points from the bottom-left
//! when the content stream is built.
//!
//! Text uses the standard Type 1 fonts with `WinAnsiEncoding`; characters
//! outside that encoding are written as `?`. Wrapping measures strings with
//! the Helvetica AFM advance widths.

use lopdf::content::{Content, Operation};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream, StringFormat, dictionary};
use time::Date;

const PT_PER_MM: f64 = 72.0 / 25.4;
const PAGE_WIDTH_MM: f64 = 210.0;
const PAGE_HEIGHT_MM: f64 = 297.0;

const MARGIN_X_MM: f64 = 14.0;
const TITLE_Y_MM: f64 = 20.0;
const PERIOD_Y_MM: f64 = 30.0;
const BODY_START_Y_MM: f64 = 45.0;
const CONTINUATION_Y_MM: f64 = 20.0;
const BODY_LIMIT_Y_MM: f64 = 275.0;
const FOOTER_Y_MM: f64 = 285.0;
const BODY_MAX_WIDTH_MM: f64 = 180.0;

const TITLE_SIZE: f64 = 16.0;
const BODY_SIZE: f64 = 11.0;
const FOOTER_SIZE: f64 = 9.0;
const LINE_HEIGHT_FACTOR: f64 = 1.6;

pub const DEFAULT_TITLE: &str = "Appraisal Summary";
pub const FILE_NAME: &str = "appraisal-summary.pdf";

/// Helvetica advance widths (1/1000 em) for ASCII 32..=126.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '..'/'
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, // '0'..'9'
    278, 278, 584, 584, 584, 556, 1015, // ':'..'@'
    667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, // 'A'..'M'
    722, 778, 667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, // 'N'..'Z'
    278, 278, 278, 469, 556, 333, // '['..'`'
    556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, // 'a'..'m'
    556, 556, 556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, // 'n'..'z'
    334, 260, 334, 584, // '{'..'~'
];
const BULLET_WIDTH: u16 = 350;
const FALLBACK_WIDTH: u16 = 556;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource(self) -> &'static str {
        match self {
            Self::Regular => "F1",
            Self::Bold => "F2",
        }
    }
}

/// Everything printed on the export.
#[derive(Debug, Clone)]
pub struct SummaryDocument<'a> {
    pub title: &'a str,
    pub period_days: u32,
    pub bullets: &'a [String],
    pub generated_on: Date,
}

#[derive(Debug, thiserror::Error)]
pub enum PdfError {
    #[error("pdf encoding failed: {0}")]
    Encode(#[from] lopdf::Error),
    #[error("pdf write failed: {0}")]
    Io(#[from] std::io::Error),
}

struct TextRun {
    font: Font,
    size: f64,
    x_mm: f64,
    y_mm: f64,
    text: String,
}

/// Render the summary as a complete PDF file.
///
/// # Errors
///
/// Returns `PdfError` if a content stream or the document cannot be serialized.
pub fn render_summary_pdf(doc: &SummaryDocument<'_>) -> Result<Vec<u8>, PdfError> {
    let footer = format!("Generated on {}", us_date(doc.generated_on));
    let mut pages: Vec<Vec<TextRun>> = vec![vec![
        TextRun { font: Font::Bold, size: TITLE_SIZE, x_mm: MARGIN_X_MM, y_mm: TITLE_Y_MM, text: doc.title.to_owned() },
        TextRun {
            font: Font::Regular,
            size: BODY_SIZE,
            x_mm: MARGIN_X_MM,
            y_mm: PERIOD_Y_MM,
            text: format!("Period: Last {} days", doc.period_days),
        },
    ]];

    let line_step_mm = BODY_SIZE * LINE_HEIGHT_FACTOR / PT_PER_MM;
    let max_width_pt = BODY_MAX_WIDTH_MM * PT_PER_MM;
    let mut y = BODY_START_Y_MM;

    for bullet in doc.bullets {
        for line in wrap_text(&format!("• {bullet}"), BODY_SIZE, max_width_pt) {
            if y > BODY_LIMIT_Y_MM {
                pages.push(Vec::new());
                y = CONTINUATION_Y_MM;
            }
            if let Some(page) = pages.last_mut() {
                page.push(TextRun { font: Font::Regular, size: BODY_SIZE, x_mm: MARGIN_X_MM, y_mm: y, text: line });
            }
            y += line_step_mm;
        }
    }

    for page in &mut pages {
        page.push(TextRun {
            font: Font::Regular,
            size: FOOTER_SIZE,
            x_mm: MARGIN_X_MM,
            y_mm: FOOTER_Y_MM,
            text: footer.clone(),
        });
    }

    write_document(&pages)
}

fn us_date(date: Date) -> String {
    format!("{:02}/{:02}/{}", u8::from(date.month()), date.day(), date.year())
}

// =============================================================================
// TEXT MEASUREMENT
// =============================================================================

fn char_width(c: char) -> u16 {
    match c {
        ' '..='~' => HELVETICA_WIDTHS[c as usize - 32],
        '•' => BULLET_WIDTH,
        _ => FALLBACK_WIDTH,
    }
}

/// Width of `text` in points at `size`.
pub(crate) fn text_width(text: &str, size: f64) -> f64 {
    let units: u32 = text.chars().map(|c| u32::from(char_width(c))).sum();
    f64::from(units) * size / 1000.0
}

/// Greedy word wrap. Words wider than a whole line are split by character.
pub(crate) fn wrap_text(text: &str, size: f64, max_width_pt: f64) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let candidate = if current.is_empty() { word.to_owned() } else { format!("{current} {word}") };
        if text_width(&candidate, size) <= max_width_pt {
            current = candidate;
            continue;
        }

        if !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if text_width(word, size) <= max_width_pt {
            current = word.to_owned();
            continue;
        }

        for c in word.chars() {
            current.push(c);
            if text_width(&current, size) > max_width_pt {
                current.pop();
                lines.push(std::mem::take(&mut current));
                current.push(c);
            }
        }
    }

    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

// =============================================================================
// ENCODING
// =============================================================================

fn win_ansi_byte(c: char) -> u8 {
    match c {
        ' '..='~' => c as u8,
        '•' => 0x95,
        '‘' => 0x91,
        '’' => 0x92,
        '“' => 0x93,
        '”' => 0x94,
        '–' => 0x96,
        '—' => 0x97,
        '\u{a0}'..='\u{ff}' => u8::try_from(u32::from(c)).unwrap_or(b'?'),
        _ => b'?',
    }
}

/// Encode `text` for a `WinAnsiEncoding` font.
pub(crate) fn win_ansi(text: &str) -> Vec<u8> {
    text.chars().map(win_ansi_byte).collect()
}

// =============================================================================
// DOCUMENT
// =============================================================================

#[allow(clippy::cast_possible_truncation)]
fn real(value: f64) -> Object {
    Object::Real(value as f32)
}

fn text_operations(runs: &[TextRun]) -> Vec<Operation> {
    let mut ops = Vec::with_capacity(runs.len() * 4);
    for run in runs {
        let x = run.x_mm * PT_PER_MM;
        let y = (PAGE_HEIGHT_MM - run.y_mm) * PT_PER_MM;
        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new("Tf", vec![run.font.resource().into(), real(run.size)]));
        ops.push(Operation::new("Td", vec![real(x), real(y)]));
        ops.push(Operation::new("Tj", vec![Object::String(win_ansi(&run.text), StringFormat::Literal)]));
        ops.push(Operation::new("ET", vec![]));
    }
    ops
}

fn type1_font(base: &str) -> Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding"
    }
}

fn write_document(pages: &[Vec<TextRun>]) -> Result<Vec<u8>, PdfError> {
    let mut doc = Document::with_version("1.4");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(type1_font("Helvetica"));
    let bold_id = doc.add_object(type1_font("Helvetica-Bold"));
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            Font::Regular.resource() => regular_id,
            Font::Bold.resource() => bold_id
        }
    });

    let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
    for runs in pages {
        let content = Content { operations: text_operations(runs) };
        let content_id = doc.add_object(Stream::new(Dictionary::new(), content.encode()?));
        let page_id: ObjectId = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id
        });
        kids.push(page_id.into());
    }

    let count = i64::try_from(kids.len()).unwrap_or(i64::MAX);
    let page_tree = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => count,
        "Resources" => resources_id,
        "MediaBox" => vec![real(0.0), real(0.0), real(PAGE_WIDTH_MM * PT_PER_MM), real(PAGE_HEIGHT_MM * PT_PER_MM)]
    };
    doc.objects.insert(pages_id, Object::Dictionary(page_tree));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id
    });
    doc.trailer.set("Root", catalog_id);

    let mut out = Vec::new();
    doc.save_to(&mut out)?;
    Ok(out)
}

#[cfg(test)]
#[path = "pdf_test.rs"]
mod tests;
