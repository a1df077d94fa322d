//! Flowing – places a sequence of blocks into column frames, page by page.
//!
//! Handles:
//! - column and page boundaries
//! - paragraphs split between lines when they straddle a column end
//! - keep-with-next for letter headings
//! - spacers swallowed at the top of a column

use crate::columns::ColumnFrame;
use crate::fonts::{wrap_spans, FontManager, FontWeight, Span};
use crate::layout_config::{LineKind, PageLayout, PlacedLine, TextRun};
use crate::style::ParagraphStyle;

/// Tolerance for floating point comparisons against the frame bottom.
const FUZZ: f32 = 1e-3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Heading,
    Guest,
}

/// A paragraph of styled spans.
#[derive(Debug, Clone, PartialEq)]
pub struct Paragraph {
    pub kind: BlockKind,
    pub style: ParagraphStyle,
    pub spans: Vec<Span>,
    /// Never leave this paragraph as the last thing in a column.
    pub keep_with_next: bool,
}

/// Unit of content handed to [`flow_blocks`].
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(Paragraph),
    Spacer(f32),
}

/// Position of the next free line.
struct Cursor<'a> {
    frames: &'a [ColumnFrame],
    pages: Vec<PageLayout>,
    column: usize,
    used: f32,
}

impl<'a> Cursor<'a> {
    fn new(frames: &'a [ColumnFrame]) -> Self {
        Self {
            frames,
            pages: vec![PageLayout {
                page_index: 0,
                lines: Vec::new(),
            }],
            column: 0,
            used: 0.0,
        }
    }

    fn frame(&self) -> &ColumnFrame {
        &self.frames[self.column]
    }

    fn at_top(&self) -> bool {
        self.used <= FUZZ
    }

    fn remaining(&self) -> f32 {
        self.frame().content_height() - self.used
    }

    fn fits(&self, height: f32) -> bool {
        height <= self.remaining() + FUZZ
    }

    /// Move to the next column, starting a new page after the last one.
    fn advance(&mut self) {
        self.column += 1;
        if self.column == self.frames.len() {
            self.column = 0;
            self.pages.push(PageLayout {
                page_index: self.pages.len(),
                lines: Vec::new(),
            });
        }
        self.used = 0.0;
    }

    fn place(&mut self, kind: LineKind, style: &ParagraphStyle, spans: Vec<Span>) {
        if !self.at_top() && !self.fits(style.leading) {
            self.advance();
        }
        if self.at_top() && !self.fits(style.leading) {
            log::warn!(
                "Line of {:.1} pt does not fit a {:.1} pt column; it will overflow",
                style.leading,
                self.frame().content_height()
            );
        }

        let frame = *self.frame();
        let line = PlacedLine {
            kind,
            column: self.column,
            x: frame.content_x(),
            y: frame.content_y() + self.used,
            font_size: style.font_size,
            leading: style.leading,
            runs: spans
                .into_iter()
                .map(|s| TextRun {
                    text: s.text,
                    bold: s.weight == FontWeight::Bold,
                    color: s.color,
                })
                .collect(),
        };
        self.used += style.leading;
        if let Some(page) = self.pages.last_mut() {
            page.lines.push(line);
        }
    }
}

/// Flow `blocks` through `frames`, repeating the frame set on as many pages
/// as needed. Always returns at least one page.
pub fn flow_blocks(blocks: &[Block], frames: &[ColumnFrame], fonts: &FontManager) -> Vec<PageLayout> {
    if frames.is_empty() {
        return vec![PageLayout {
            page_index: 0,
            lines: Vec::new(),
        }];
    }
    let mut cursor = Cursor::new(frames);

    for (i, block) in blocks.iter().enumerate() {
        match block {
            Block::Spacer(height) => {
                if cursor.at_top() {
                    continue;
                }
                if cursor.fits(*height) {
                    cursor.used += *height;
                } else {
                    // Column is done; the break happens lazily so a trailing
                    // spacer never opens an empty page.
                    cursor.used = cursor.frame().content_height();
                }
            }
            Block::Paragraph(para) => {
                let width = cursor.frame().content_width();
                let lines = wrap_spans(&para.spans, para.style.font_size, width, fonts);

                if para.keep_with_next && !cursor.at_top() {
                    let next_leading = match blocks.get(i + 1) {
                        Some(Block::Paragraph(next)) => next.style.leading,
                        _ => 0.0,
                    };
                    let own = lines.len() as f32 * para.style.leading + para.style.space_after;
                    if !cursor.fits(own + next_leading) {
                        cursor.advance();
                    }
                }

                for (n, line) in lines.into_iter().enumerate() {
                    let kind = match (para.kind, n) {
                        (BlockKind::Heading, _) => LineKind::Heading,
                        (BlockKind::Guest, 0) => LineKind::Guest,
                        (BlockKind::Guest, _) => LineKind::Continuation,
                    };
                    cursor.place(kind, &para.style, line);
                }
                cursor.used += para.style.space_after;
            }
        }
    }

    cursor.pages
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frames(count: usize, height: f32) -> Vec<ColumnFrame> {
        (0..count)
            .map(|i| ColumnFrame {
                x: i as f32 * 110.0,
                y: 10.0,
                width: 100.0,
                height,
                padding: 0.0,
            })
            .collect()
    }

    fn style(leading: f32, space_after: f32) -> ParagraphStyle {
        ParagraphStyle {
            font_size: 8.0,
            leading,
            space_after,
        }
    }

    fn para(kind: BlockKind, text: &str, leading: f32) -> Block {
        Block::Paragraph(Paragraph {
            kind,
            style: style(leading, 0.0),
            spans: vec![Span {
                text: text.to_string(),
                weight: FontWeight::Regular,
                color: [0.0, 0.0, 0.0, 1.0],
            }],
            keep_with_next: kind == BlockKind::Heading,
        })
    }

    #[test]
    fn empty_input_gives_one_empty_page() {
        let pages = flow_blocks(&[], &frames(2, 100.0), &FontManager::builtin());
        assert_eq!(pages.len(), 1);
        assert!(pages[0].lines.is_empty());
    }

    #[test]
    fn fills_columns_then_pages() {
        let blocks: Vec<Block> = (0..25).map(|i| para(BlockKind::Guest, &format!("g{i}"), 10.0)).collect();
        let pages = flow_blocks(&blocks, &frames(2, 100.0), &FontManager::builtin());
        // 10 lines per column, 20 per page.
        assert_eq!(pages.len(), 2);
        assert_eq!(pages[0].lines.len(), 20);
        assert_eq!(pages[1].lines.len(), 5);
        assert_eq!(pages[0].lines[9].column, 0);
        assert_eq!(pages[0].lines[10].column, 1);
        assert!((pages[0].lines[10].y - 10.0).abs() < 1e-4);
        assert!((pages[0].lines[10].x - 110.0).abs() < 1e-4);
    }

    #[test]
    fn heading_is_kept_with_next_line() {
        let mut blocks: Vec<Block> = (0..9).map(|i| para(BlockKind::Guest, &format!("g{i}"), 10.0)).collect();
        blocks.push(para(BlockKind::Heading, "B", 10.0));
        blocks.push(para(BlockKind::Guest, "Bob", 10.0));
        let pages = flow_blocks(&blocks, &frames(2, 100.0), &FontManager::builtin());
        let heading = pages[0].lines.iter().find(|l| l.kind == LineKind::Heading).unwrap();
        assert_eq!(heading.column, 1);
        assert!((heading.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn spacer_dropped_at_column_top() {
        let mut blocks: Vec<Block> = (0..10).map(|i| para(BlockKind::Guest, &format!("g{i}"), 10.0)).collect();
        blocks.push(Block::Spacer(30.0));
        blocks.push(para(BlockKind::Guest, "next", 10.0));
        let pages = flow_blocks(&blocks, &frames(2, 100.0), &FontManager::builtin());
        let last = pages[0].lines.last().unwrap();
        assert_eq!(last.column, 1);
        assert!((last.y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn trailing_spacer_opens_no_page() {
        let mut blocks: Vec<Block> = (0..20).map(|i| para(BlockKind::Guest, &format!("g{i}"), 10.0)).collect();
        blocks.push(Block::Spacer(30.0));
        let pages = flow_blocks(&blocks, &frames(2, 100.0), &FontManager::builtin());
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn wrapped_guest_splits_across_columns() {
        let mut blocks: Vec<Block> = (0..9).map(|i| para(BlockKind::Guest, &format!("g{i}"), 10.0)).collect();
        // 8pt heuristic: 4pt per char, 100pt column → wraps into several lines.
        blocks.push(para(BlockKind::Guest, "Maximilian Alexander Bartholomew Featherstonehaugh", 10.0));
        let pages = flow_blocks(&blocks, &frames(2, 100.0), &FontManager::builtin());
        let guests = pages[0].lines.iter().filter(|l| l.kind == LineKind::Guest).count();
        let continuations: Vec<&PlacedLine> = pages[0]
            .lines
            .iter()
            .filter(|l| l.kind == LineKind::Continuation)
            .collect();
        assert_eq!(guests, 10);
        assert!(!continuations.is_empty());
        assert!(continuations.iter().all(|l| l.column == 1));
    }

    #[test]
    fn oversized_line_still_progresses() {
        let blocks = vec![para(BlockKind::Guest, "a", 500.0), para(BlockKind::Guest, "b", 500.0)];
        let pages = flow_blocks(&blocks, &frames(1, 100.0), &FontManager::builtin());
        assert_eq!(pages.len(), 2);
        assert_eq!(pages.iter().map(|p| p.lines.len()).sum::<usize>(), 2);
    }
}
