//! Layout config – the intermediate representation between flowing and PDF
//! rendering. This is the "frozen" structure that encodes exactly which
//! line goes where on each page.

use serde::{Deserialize, Serialize};

use crate::columns::ColumnFrame;
use crate::error::Result;

/// A complete document layout ready for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Document title embedded in the PDF metadata.
    pub title: String,
    /// Width of each page in PDF points (1 pt = 1/72 inch).
    pub page_width_pt: f32,
    /// Height of each page in PDF points.
    pub page_height_pt: f32,
    /// Guest-name font size this layout was built with.
    pub font_size: f32,
    /// Column frames shared by every page.
    pub columns: Vec<ColumnFrame>,
    /// Ordered list of pages.
    pub pages: Vec<PageLayout>,
}

/// One page of content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    pub page_index: usize,
    pub lines: Vec<PlacedLine>,
}

/// What a placed line represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LineKind {
    Heading,
    /// First line of a guest entry.
    Guest,
    /// Wrapped remainder of a guest entry.
    Continuation,
}

/// A single line of text at a page-absolute position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedLine {
    pub kind: LineKind,
    pub column: usize,
    /// Left edge, in points from the page's left edge.
    pub x: f32,
    /// Top of the line box, in points from the page's top edge.
    pub y: f32,
    pub font_size: f32,
    pub leading: f32,
    pub runs: Vec<TextRun>,
}

/// Uniformly styled text inside a line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextRun {
    pub text: String,
    pub bold: bool,
    pub color: [f32; 4],
}

impl LayoutConfig {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Number of guest entries placed across all pages.
    pub fn guest_count(&self) -> usize {
        self.lines().filter(|l| l.kind == LineKind::Guest).count()
    }

    pub fn lines(&self) -> impl Iterator<Item = &PlacedLine> {
        self.pages.iter().flat_map(|p| p.lines.iter())
    }

    /// Serialise to JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialise from JSON.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

impl PlacedLine {
    /// Concatenated text of every run.
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    pub fn bottom(&self) -> f32 {
        self.y + self.leading
    }
}
