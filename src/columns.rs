//! Page geometry – uses Taffy to split the usable page area into equal-width
//! column frames.

use serde::{Deserialize, Serialize};
use taffy::prelude::*;

use crate::error::{GuestListError, Result};

/// 1 inch in PDF points.
pub const INCH_PT: f32 = 72.0;

/// Standard ISO paper sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageSize {
    A0,
    #[default]
    A1,
    A2,
    A3,
    A4,
}

impl PageSize {
    /// Portrait (width, height) in points.
    pub fn portrait_pt(self) -> (f32, f32) {
        match self {
            PageSize::A0 => (2383.94, 3370.39),
            PageSize::A1 => (1683.78, 2383.94),
            PageSize::A2 => (1190.55, 1683.78),
            PageSize::A3 => (841.89, 1190.55),
            PageSize::A4 => (595.28, 841.89),
        }
    }
}

/// Page orientation for the generated PDF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageOrientation {
    Portrait,
    /// Landscape mode: width > height (default for wall charts).
    #[default]
    Landscape,
}

/// Physical page plus the column grid laid over it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub page_size: PageSize,
    pub orientation: PageOrientation,
    /// Margin on every side, in points (default: 0.5 in).
    pub margin: f32,
    pub columns: usize,
    /// Horizontal gap between adjacent columns (default: 0.25 in).
    pub column_gap: f32,
    /// Inner padding of each column frame.
    pub frame_padding: f32,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            page_size: PageSize::A1,
            orientation: PageOrientation::Landscape,
            margin: 0.5 * INCH_PT,
            columns: 4,
            column_gap: 0.25 * INCH_PT,
            frame_padding: 6.0,
        }
    }
}

impl PageGeometry {
    /// Effective page width after applying orientation.
    pub fn page_width(&self) -> f32 {
        let (w, h) = self.page_size.portrait_pt();
        match self.orientation {
            PageOrientation::Portrait => w,
            PageOrientation::Landscape => h,
        }
    }

    /// Effective page height after applying orientation.
    pub fn page_height(&self) -> f32 {
        let (w, h) = self.page_size.portrait_pt();
        match self.orientation {
            PageOrientation::Portrait => h,
            PageOrientation::Landscape => w,
        }
    }

    pub fn usable_width(&self) -> f32 {
        self.page_width() - 2.0 * self.margin
    }

    pub fn usable_height(&self) -> f32 {
        self.page_height() - 2.0 * self.margin
    }

    pub fn validate(&self) -> Result<()> {
        if self.columns == 0 {
            return Err(GuestListError::Config("column count must be at least 1".into()));
        }
        if self.margin < 0.0 || self.column_gap < 0.0 || self.frame_padding < 0.0 {
            return Err(GuestListError::Config(
                "margin, column gap and padding must not be negative".into(),
            ));
        }
        let gaps = self.column_gap * (self.columns - 1) as f32;
        let inner = self.usable_width() - gaps - 2.0 * self.frame_padding * self.columns as f32;
        if inner <= 0.0 || self.usable_height() - 2.0 * self.frame_padding <= 0.0 {
            return Err(GuestListError::Config(format!(
                "{} column(s) leave no printable area on a {:.0}×{:.0} pt page",
                self.columns,
                self.page_width(),
                self.page_height()
            )));
        }
        Ok(())
    }
}

/// One column frame in page coordinates (origin top-left, points).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ColumnFrame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub padding: f32,
}

impl ColumnFrame {
    pub fn content_x(&self) -> f32 {
        self.x + self.padding
    }

    pub fn content_y(&self) -> f32 {
        self.y + self.padding
    }

    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.padding
    }

    pub fn content_height(&self) -> f32 {
        self.height - 2.0 * self.padding
    }
}

/// Lay the frames out as a Taffy flex row: every column grows from a zero
/// basis so all widths come out equal and the gaps are exact.
pub fn compute_columns(geometry: &PageGeometry) -> Result<Vec<ColumnFrame>> {
    geometry.validate()?;

    let usable_width = geometry.usable_width();
    let usable_height = geometry.usable_height();

    let mut taffy: TaffyTree<()> = TaffyTree::new();
    taffy.disable_rounding();

    let column_style = Style {
        flex_grow: 1.0,
        flex_shrink: 1.0,
        flex_basis: Dimension::Length(0.0),
        size: Size {
            width: Dimension::Auto,
            height: Dimension::Length(usable_height),
        },
        ..Default::default()
    };
    let children = (0..geometry.columns)
        .map(|_| taffy.new_leaf(column_style.clone()))
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| GuestListError::Config(format!("column layout failed: {e}")))?;

    let row_style = Style {
        display: taffy::Display::Flex,
        flex_direction: taffy::FlexDirection::Row,
        gap: Size {
            width: LengthPercentage::Length(geometry.column_gap),
            height: LengthPercentage::Length(0.0),
        },
        size: Size {
            width: Dimension::Length(usable_width),
            height: Dimension::Length(usable_height),
        },
        ..Default::default()
    };

    let layout_err = |e: taffy::TaffyError| GuestListError::Config(format!("column layout failed: {e}"));
    let root = taffy.new_with_children(row_style, &children).map_err(layout_err)?;
    taffy
        .compute_layout(
            root,
            Size {
                width: AvailableSpace::Definite(usable_width),
                height: AvailableSpace::Definite(usable_height),
            },
        )
        .map_err(layout_err)?;

    let mut frames = Vec::with_capacity(children.len());
    for child in children {
        let layout = taffy.layout(child).map_err(layout_err)?;
        frames.push(ColumnFrame {
            x: geometry.margin + layout.location.x,
            y: geometry.margin + layout.location.y,
            width: layout.size.width,
            height: layout.size.height,
            padding: geometry.frame_padding,
        });
    }
    log::debug!(
        "{} column(s) of {:.2} pt on a {:.2}×{:.2} pt page",
        frames.len(),
        frames.first().map(|f| f.width).unwrap_or(0.0),
        geometry.page_width(),
        geometry.page_height()
    );
    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn a1_landscape_dimensions() {
        let g = PageGeometry::default();
        assert!((g.page_width() - 2383.94).abs() < 0.01);
        assert!((g.page_height() - 1683.78).abs() < 0.01);
        assert!((g.margin - 36.0).abs() < 1e-6);
    }

    #[test]
    fn four_equal_columns_fill_usable_width() {
        let g = PageGeometry {
            columns: 4,
            ..PageGeometry::default()
        };
        let frames = compute_columns(&g).unwrap();
        assert_eq!(frames.len(), 4);

        let expected = (g.usable_width() - 3.0 * g.column_gap) / 4.0;
        for f in &frames {
            assert!((f.width - expected).abs() < 0.01, "width {} != {}", f.width, expected);
            assert!((f.height - g.usable_height()).abs() < 0.01);
            assert!((f.y - g.margin).abs() < 0.01);
        }

        let total: f32 = frames.iter().map(|f| f.width).sum::<f32>() + 3.0 * g.column_gap;
        assert!((total - g.usable_width()).abs() < 0.05);

        assert!((frames[0].x - g.margin).abs() < 0.01);
        for pair in frames.windows(2) {
            let gap = pair[1].x - (pair[0].x + pair[0].width);
            assert!((gap - g.column_gap).abs() < 0.01);
        }
        let last = frames[3];
        assert!((last.x + last.width - (g.page_width() - g.margin)).abs() < 0.05);
    }

    #[test]
    fn zero_columns_rejected() {
        let g = PageGeometry {
            columns: 0,
            ..PageGeometry::default()
        };
        assert!(matches!(compute_columns(&g), Err(GuestListError::Config(_))));
    }

    #[test]
    fn too_many_columns_rejected() {
        let g = PageGeometry {
            page_size: PageSize::A4,
            columns: 200,
            ..PageGeometry::default()
        };
        assert!(g.validate().is_err());
    }
}
