//! Document builder – turns grouped guests into styled blocks and flows them
//! into a [`LayoutConfig`].
//!
//! [`build_document`] is pure: every call constructs its blocks from scratch,
//! so the auto-fit search can call it repeatedly with different styles.

use crate::columns::ColumnFrame;
use crate::flow::{flow_blocks, Block, BlockKind, Paragraph};
use crate::fonts::{FontManager, FontWeight, Span};
use crate::grouping::GroupedGuests;
use crate::guests::GuestRecord;
use crate::layout_config::LayoutConfig;
use crate::style::GuestListStyle;

/// Page-level inputs that do not change between auto-fit attempts.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentFrame {
    pub title: String,
    pub page_width_pt: f32,
    pub page_height_pt: f32,
    pub columns: Vec<ColumnFrame>,
}

/// Spans for one guest line: first name, bold last name, muted table.
pub fn guest_spans(guest: &GuestRecord, style: &GuestListStyle) -> Vec<Span> {
    let text_color = style.text_color.to_array();
    let mut spans = Vec::with_capacity(3);
    if !guest.first_name.is_empty() {
        spans.push(Span {
            text: guest.first_name.clone(),
            weight: FontWeight::Regular,
            color: text_color,
        });
    }
    if !guest.last_name.is_empty() {
        spans.push(Span {
            text: guest.last_name.clone(),
            weight: FontWeight::Bold,
            color: text_color,
        });
    }
    if !guest.table.is_empty() {
        spans.push(Span {
            text: guest.table.clone(),
            weight: FontWeight::Regular,
            color: style.table_color.to_array(),
        });
    }
    spans
}

/// One heading per group, one paragraph per guest, a spacer after each group.
pub fn build_blocks(groups: &GroupedGuests, style: &GuestListStyle) -> Vec<Block> {
    let mut blocks = Vec::with_capacity(groups.guest_count() + 2 * groups.group_count());
    for (letter, guests) in groups.iter() {
        blocks.push(Block::Paragraph(Paragraph {
            kind: BlockKind::Heading,
            style: style.heading,
            spans: vec![Span {
                text: letter.to_string(),
                weight: FontWeight::Bold,
                color: style.heading_color.to_array(),
            }],
            keep_with_next: true,
        }));
        for guest in guests {
            blocks.push(Block::Paragraph(Paragraph {
                kind: BlockKind::Guest,
                style: style.guest,
                spans: guest_spans(guest, style),
                keep_with_next: false,
            }));
        }
        blocks.push(Block::Spacer(style.group_spacing));
    }
    blocks
}

/// Lay out the full guest list with `style`.
pub fn build_document(
    groups: &GroupedGuests,
    style: &GuestListStyle,
    frame: &DocumentFrame,
    fonts: &FontManager,
) -> LayoutConfig {
    let blocks = build_blocks(groups, style);
    let pages = flow_blocks(&blocks, &frame.columns, fonts);
    LayoutConfig {
        title: frame.title.clone(),
        page_width_pt: frame.page_width_pt,
        page_height_pt: frame.page_height_pt,
        font_size: style.guest.font_size,
        columns: frame.columns.clone(),
        pages,
    }
}
