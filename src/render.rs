//! PDF renderer – takes a [`LayoutConfig`] and produces PDF bytes using
//! `printpdf` (v0.8 ops-based API).

use printpdf::*;

use crate::error::{GuestListError, Result};
use crate::fonts::{FontManager, FontWeight};
use crate::layout_config::{LayoutConfig, PlacedLine};

/// Face used to draw a run: a PDF base-14 font or an embedded TrueType font.
#[derive(Clone)]
enum Face {
    Builtin(BuiltinFont),
    Embedded(FontId),
}

struct Faces {
    regular: Face,
    bold: Face,
}

impl Faces {
    fn for_run(&self, bold: bool) -> &Face {
        if bold {
            &self.bold
        } else {
            &self.regular
        }
    }
}

/// Register the document fonts, embedding user-supplied TTFs when present.
fn register_faces(doc: &mut PdfDocument, fonts: &FontManager) -> Result<Faces> {
    if !fonts.has_real_fonts() {
        return Ok(Faces {
            regular: Face::Builtin(BuiltinFont::Helvetica),
            bold: Face::Builtin(BuiltinFont::HelveticaBold),
        });
    }

    let mut warnings = Vec::new();
    let mut embed = |weight: FontWeight| -> Result<Face> {
        let data = fonts
            .get(weight)
            .ok_or_else(|| GuestListError::Render(format!("no {weight:?} font loaded")))?;
        let parsed = ParsedFont::from_bytes(&data.bytes, 0, &mut warnings)
            .ok_or_else(|| GuestListError::Render(format!("printpdf could not parse the {weight:?} font")))?;
        Ok(Face::Embedded(doc.add_font(&parsed)))
    };
    let regular = embed(FontWeight::Regular)?;
    let bold = embed(FontWeight::Bold)?;
    for w in &warnings {
        log::debug!("Font warning: {w:?}");
    }
    Ok(Faces { regular, bold })
}

/// Render a LayoutConfig into PDF bytes.
pub fn render_pdf(config: &LayoutConfig, fonts: &FontManager) -> Result<Vec<u8>> {
    let page_w = Mm(config.page_width_pt * 0.352778); // pt → mm
    let page_h = Mm(config.page_height_pt * 0.352778);

    let mut doc = PdfDocument::new(&config.title);
    let faces = register_faces(&mut doc, fonts)?;

    let mut pages = Vec::with_capacity(config.pages.len());
    for page_layout in &config.pages {
        let mut ops = Vec::new();
        for line in &page_layout.lines {
            render_line(&mut ops, line, config.page_height_pt, &faces, fonts);
        }
        pages.push(PdfPage::new(page_w, page_h, ops));
    }

    // Ensure at least one page.
    if pages.is_empty() {
        pages.push(PdfPage::new(page_w, page_h, Vec::new()));
    }

    doc.with_pages(pages);
    let mut warnings = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    log::debug!(
        "Rendered {} page(s), {} bytes, {} warning(s)",
        config.pages.len(),
        bytes.len(),
        warnings.len()
    );

    Ok(bytes)
}

/// Convert a UTF-8 string to raw Windows-1252 bytes then wrap in a String so
/// printpdf writes the bytes unchanged into the PDF stream (builtin fonts use
/// WinAnsiEncoding, so each glyph is one byte 0x00–0xFF).
fn to_winlatin(s: &str) -> String {
    let bytes: Vec<u8> = s
        .chars()
        .map(|c| match c {
            '\u{20AC}' => 0x80, // euro
            '\u{2026}' => 0x85, // ellipsis
            '\u{2018}' => 0x91, // left single quote
            '\u{2019}' => 0x92, // right single quote
            '\u{201C}' => 0x93, // left double quote
            '\u{201D}' => 0x94, // right double quote
            '\u{2013}' => 0x96, // en-dash
            '\u{2014}' => 0x97, // em-dash
            '\u{0160}' => 0x8A, // S caron
            '\u{0152}' => 0x8C, // OE ligature
            '\u{017D}' => 0x8E, // Z caron
            '\u{0161}' => 0x9A, // s caron
            '\u{0153}' => 0x9C, // oe ligature
            '\u{017E}' => 0x9E, // z caron
            '\u{0178}' => 0x9F, // Y diaeresis
            '\u{00A0}' => 0x20, // non-breaking space -> space
            c if (c as u32) < 256 => c as u8,
            _ => b'?',
        })
        .collect();
    // SAFETY: intentionally non-UTF-8 for 0x80-0xFF. The String is never
    // inspected as text: for a builtin font printpdf 0.8 finds no custom
    // encoder for `WinAnsiEncoding` and falls through to lopdf's
    // `text.as_bytes()`, which copies these bytes verbatim into the content
    // stream. Revisit on any printpdf or lopdf upgrade.
    #[allow(unsafe_code)]
    unsafe {
        String::from_utf8_unchecked(bytes)
    }
}

fn rgb(color: [f32; 4]) -> Color {
    Color::Rgb(Rgb {
        r: color[0],
        g: color[1],
        b: color[2],
        icc_profile: None,
    })
}

/// Emit one text section per line; runs follow each other on the same
/// baseline because the text cursor advances after every write.
fn render_line(ops: &mut Vec<Op>, line: &PlacedLine, page_height: f32, faces: &Faces, fonts: &FontManager) {
    if line.runs.iter().all(|r| r.text.is_empty()) {
        return;
    }

    // Half-leading above the glyphs, then the ascender, gives the baseline.
    // PDF coordinate system: origin at bottom-left.
    let half_leading = (line.leading - line.font_size).max(0.0) / 2.0;
    let baseline = line.y + half_leading + fonts.ascender_px(line.font_size, FontWeight::Regular);
    let text_y = page_height - baseline;

    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: Point {
            x: Pt(line.x),
            y: Pt(text_y),
        },
    });
    ops.push(Op::SetLineHeight {
        lh: Pt(line.leading),
    });

    for run in &line.runs {
        if run.text.is_empty() {
            continue;
        }
        ops.push(Op::SetFillColor { col: rgb(run.color) });
        match faces.for_run(run.bold) {
            Face::Builtin(font) => {
                ops.push(Op::SetFontSizeBuiltinFont {
                    size: Pt(line.font_size),
                    font: *font,
                });
                ops.push(Op::WriteTextBuiltinFont {
                    items: vec![TextItem::Text(to_winlatin(&run.text))],
                    font: *font,
                });
            }
            Face::Embedded(id) => {
                ops.push(Op::SetFontSize {
                    size: Pt(line.font_size),
                    font: id.clone(),
                });
                ops.push(Op::WriteText {
                    items: vec![TextItem::Text(run.text.clone())],
                    font: id.clone(),
                });
            }
        }
    }

    ops.push(Op::EndTextSection);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout_config::{LineKind, PageLayout, TextRun};

    fn layout(pages: Vec<PageLayout>) -> LayoutConfig {
        LayoutConfig {
            title: "Wedding Guest List".to_string(),
            page_width_pt: 2383.94,
            page_height_pt: 1683.78,
            font_size: 27.0,
            columns: Vec::new(),
            pages,
        }
    }

    fn run(text: &str, bold: bool) -> TextRun {
        TextRun {
            text: text.to_string(),
            bold,
            color: [0.0, 0.0, 0.0, 1.0],
        }
    }

    #[test]
    fn render_empty_page() {
        let bytes = render_pdf(&layout(Vec::new()), &FontManager::builtin()).unwrap();
        assert!(bytes.len() > 100, "PDF should have content");
        // PDF magic number
        assert_eq!(&bytes[0..5], b"%PDF-");
    }

    #[test]
    fn guest_line_emits_one_text_section_with_all_runs() {
        let line = PlacedLine {
            kind: LineKind::Guest,
            column: 0,
            x: 42.0,
            y: 42.0,
            font_size: 27.0,
            leading: 35.0,
            runs: vec![run("Jane Mary", false), run(" Smith", true), run(" 4", false)],
        };
        let faces = Faces {
            regular: Face::Builtin(BuiltinFont::Helvetica),
            bold: Face::Builtin(BuiltinFont::HelveticaBold),
        };
        let mut ops = Vec::new();
        render_line(&mut ops, &line, 1683.78, &faces, &FontManager::builtin());

        let sections = ops.iter().filter(|op| matches!(op, Op::StartTextSection)).count();
        let writes = ops.iter().filter(|op| matches!(op, Op::WriteTextBuiltinFont { .. })).count();
        let bold = ops
            .iter()
            .filter(|op| matches!(op, Op::WriteTextBuiltinFont { font: BuiltinFont::HelveticaBold, .. }))
            .count();
        assert_eq!(sections, 1);
        assert_eq!(writes, 3);
        assert_eq!(bold, 1);
    }

    #[test]
    fn empty_line_emits_nothing() {
        let line = PlacedLine {
            kind: LineKind::Guest,
            column: 0,
            x: 0.0,
            y: 0.0,
            font_size: 10.0,
            leading: 12.0,
            runs: Vec::new(),
        };
        let faces = Faces {
            regular: Face::Builtin(BuiltinFont::Helvetica),
            bold: Face::Builtin(BuiltinFont::HelveticaBold),
        };
        let mut ops = Vec::new();
        render_line(&mut ops, &line, 100.0, &faces, &FontManager::builtin());
        assert!(ops.is_empty());
    }

    #[test]
    fn winlatin_maps_accents_to_single_bytes() {
        assert_eq!(to_winlatin("José").as_bytes(), &[b'J', b'o', b's', 0xE9]);
        assert_eq!(to_winlatin("Łukasz").as_bytes()[0], b'?');
    }

    #[test]
    fn winlatin_is_one_byte_per_char() {
        let name = "O\u{2019}Brien \u{2013} Zoë €5";
        let encoded = to_winlatin(name);
        assert_eq!(encoded.len(), name.chars().count());
        assert_eq!(encoded.as_bytes()[1], 0x92);
        assert_eq!(encoded.as_bytes()[8], 0x96);
        assert_eq!(encoded.as_bytes()[12], 0xEB);
        assert_eq!(encoded.as_bytes()[14], 0x80);
    }

    #[test]
    fn multi_page_layout_renders() {
        let pages = (0..3)
            .map(|i| PageLayout {
                page_index: i,
                lines: vec![PlacedLine {
                    kind: LineKind::Heading,
                    column: 0,
                    x: 42.0,
                    y: 42.0,
                    font_size: 48.0,
                    leading: 56.0,
                    runs: vec![run("A", true)],
                }],
            })
            .collect();
        let bytes = render_pdf(&layout(pages), &FontManager::builtin()).unwrap();
        assert_eq!(&bytes[0..5], b"%PDF-");
    }
}
