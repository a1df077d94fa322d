//! Font loading and text measurement using `ttf-parser`.
//!
//! Without user-supplied fonts the renderer falls back to the built-in
//! Helvetica faces, whose widths are estimated with an average-advance
//! heuristic. When TrueType files are loaded, glyph advances are summed
//! exactly and the same bytes are embedded in the PDF.

use std::path::Path;

use crate::error::{GuestListError, Result};

/// Regular or bold face.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
pub enum FontWeight {
    Regular,
    Bold,
}

/// A loaded font face with metrics.
#[derive(Clone)]
pub struct FontData {
    /// Raw font bytes (kept alive for ttf-parser's zero-copy API).
    pub bytes: Vec<u8>,
    pub units_per_em: f32,
    pub ascender: f32,
}

impl FontData {
    pub fn parse(bytes: Vec<u8>) -> std::result::Result<Self, String> {
        let face = ttf_parser::Face::parse(&bytes, 0).map_err(|e| format!("Failed to parse font: {e}"))?;
        Ok(Self {
            units_per_em: face.units_per_em() as f32,
            ascender: face.ascender() as f32,
            bytes,
        })
    }
}

/// The regular/bold pair used for the whole document.
#[derive(Clone, Default)]
pub struct FontManager {
    regular: Option<FontData>,
    bold: Option<FontData>,
}

impl FontManager {
    /// Built-in Helvetica with heuristic metrics.
    pub fn builtin() -> Self {
        Self::default()
    }

    pub fn load_font(&mut self, weight: FontWeight, bytes: Vec<u8>) -> std::result::Result<(), String> {
        let data = FontData::parse(bytes)?;
        match weight {
            FontWeight::Regular => self.regular = Some(data),
            FontWeight::Bold => self.bold = Some(data),
        }
        Ok(())
    }

    pub fn load_font_file(&mut self, weight: FontWeight, path: &Path) -> Result<()> {
        let bytes = std::fs::read(path).map_err(|e| GuestListError::Font {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        self.load_font(weight, bytes).map_err(|reason| GuestListError::Font {
            path: path.to_path_buf(),
            reason,
        })?;
        log::debug!("Loaded {weight:?} font from '{}'", path.display());
        Ok(())
    }

    /// Font data for a weight. Each weight falls back to the other face when
    /// only one file was supplied.
    pub fn get(&self, weight: FontWeight) -> Option<&FontData> {
        match weight {
            FontWeight::Regular => self.regular.as_ref().or(self.bold.as_ref()),
            FontWeight::Bold => self.bold.as_ref().or(self.regular.as_ref()),
        }
    }

    /// True when glyphs will be embedded rather than drawn with built-ins.
    pub fn has_real_fonts(&self) -> bool {
        self.regular.is_some() || self.bold.is_some()
    }

    /// Measure the width of a string at a given font size (in pt).
    /// If we have actual font bytes, we parse glyph advances. Otherwise we
    /// use an average character width heuristic (0.5 × font_size per char).
    pub fn measure_text_width(&self, text: &str, font_size: f32, weight: FontWeight) -> f32 {
        let Some(data) = self.get(weight) else {
            // Bold is ~10 % wider.
            let avg = match weight {
                FontWeight::Regular => 0.5,
                FontWeight::Bold => 0.55,
            };
            return text.chars().count() as f32 * font_size * avg;
        };

        match ttf_parser::Face::parse(&data.bytes, 0) {
            Ok(face) => {
                let scale = font_size / data.units_per_em;
                text.chars()
                    .map(|ch| match face.glyph_index(ch) {
                        Some(gid) => face.glyph_hor_advance(gid).unwrap_or(0) as f32 * scale,
                        None => font_size * 0.5,
                    })
                    .sum()
            }
            Err(_) => text.chars().count() as f32 * font_size * 0.5,
        }
    }

    /// Distance from the top of a line box to the baseline.
    pub fn ascender_px(&self, font_size: f32, weight: FontWeight) -> f32 {
        match self.get(weight) {
            Some(data) => data.ascender * font_size / data.units_per_em,
            None => font_size * 0.75,
        }
    }
}

/// A run of uniformly styled text within a paragraph.
#[derive(Debug, Clone, PartialEq)]
pub struct Span {
    pub text: String,
    pub weight: FontWeight,
    pub color: [f32; 4],
}

/// Word-wrap styled spans to fit within `max_width`. Each returned line is
/// a list of spans with adjacent same-style words merged. Words wider than
/// the column are left on a line of their own.
pub fn wrap_spans(spans: &[Span], font_size: f32, max_width: f32, fonts: &FontManager) -> Vec<Vec<Span>> {
    let words: Vec<(&str, &Span)> = spans
        .iter()
        .flat_map(|span| span.text.split_whitespace().map(move |w| (w, span)))
        .collect();
    if words.is_empty() {
        return vec![Vec::new()];
    }

    let space = |weight| fonts.measure_text_width(" ", font_size, weight);

    let mut lines: Vec<Vec<Span>> = Vec::new();
    let mut current: Vec<Span> = Vec::new();
    let mut current_width = 0.0f32;

    for (word, style) in words {
        let word_width = fonts.measure_text_width(word, font_size, style.weight);
        let gap = if current.is_empty() { 0.0 } else { space(style.weight) };

        if !current.is_empty() && max_width > 0.0 && current_width + gap + word_width > max_width {
            lines.push(std::mem::take(&mut current));
            current_width = 0.0;
        }

        let lead = if current.is_empty() { "" } else { " " };
        match current.last_mut() {
            Some(last) if last.weight == style.weight && last.color == style.color => {
                last.text.push_str(lead);
                last.text.push_str(word);
            }
            _ => current.push(Span {
                text: format!("{lead}{word}"),
                weight: style.weight,
                color: style.color,
            }),
        }
        current_width += if lead.is_empty() { word_width } else { space(style.weight) + word_width };
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
