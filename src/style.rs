//! Typography for headings and guest lines.
//!
//! All metrics are expressed relative to the guest-name font size so the
//! auto-fit search can rescale the whole document by changing a single
//! number.

use serde::{Deserialize, Serialize};

/// RGBA colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() == 6 {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()? as f32 / 255.0;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()? as f32 / 255.0;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()? as f32 / 255.0;
            Some(Self { r, g, b, a: 1.0 })
        } else if hex.len() == 3 {
            let r = u8::from_str_radix(&hex[0..1].repeat(2), 16).ok()? as f32 / 255.0;
            let g = u8::from_str_radix(&hex[1..2].repeat(2), 16).ok()? as f32 / 255.0;
            let b = u8::from_str_radix(&hex[2..3].repeat(2), 16).ok()? as f32 / 255.0;
            Some(Self { r, g, b, a: 1.0 })
        } else {
            None
        }
    }

    /// `#3E3E3E`, used for letter headings.
    pub fn heading() -> Self {
        Self::from_hex("#3E3E3E").unwrap_or(Self::BLACK)
    }

    /// `#888888`, used for table numbers.
    pub fn muted() -> Self {
        Self::from_hex("#888888").unwrap_or(Self::BLACK)
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// Font size, line height and trailing space of one kind of paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParagraphStyle {
    pub font_size: f32,
    pub leading: f32,
    pub space_after: f32,
}

impl ParagraphStyle {
    fn scaled(self, factor: f32) -> Self {
        Self {
            font_size: self.font_size * factor,
            leading: self.leading * factor,
            space_after: self.space_after * factor,
        }
    }
}

/// Complete document typography.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GuestListStyle {
    pub guest: ParagraphStyle,
    pub heading: ParagraphStyle,
    /// Vertical space inserted after every letter group.
    pub group_spacing: f32,
    pub text_color: Color,
    pub heading_color: Color,
    pub table_color: Color,
}

impl Default for GuestListStyle {
    fn default() -> Self {
        Self {
            guest: ParagraphStyle {
                font_size: 27.0,
                leading: 35.0,
                space_after: 2.0,
            },
            heading: ParagraphStyle {
                font_size: 48.0,
                leading: 56.0,
                space_after: 18.0,
            },
            group_spacing: 32.0,
            text_color: Color::BLACK,
            heading_color: Color::heading(),
            table_color: Color::muted(),
        }
    }
}

impl GuestListStyle {
    /// Rescale every metric so the guest font size becomes `font_size`,
    /// keeping line heights and spacing proportional.
    pub fn with_font_size(&self, font_size: f32) -> Self {
        let factor = if self.guest.font_size > 0.0 {
            font_size / self.guest.font_size
        } else {
            1.0
        };
        Self {
            guest: self.guest.scaled(factor),
            heading: self.heading.scaled(factor),
            group_spacing: self.group_spacing * factor,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_colors() {
        let c = Color::from_hex("#888888").unwrap();
        assert!((c.r - 136.0 / 255.0).abs() < 1e-6);
        assert_eq!(Color::from_hex("#fff").unwrap().to_array(), [1.0, 1.0, 1.0, 1.0]);
        assert!(Color::from_hex("#12").is_none());
    }

    #[test]
    fn scaling_keeps_proportions() {
        let base = GuestListStyle::default();
        let half = base.with_font_size(13.5);
        assert!((half.guest.font_size - 13.5).abs() < 1e-4);
        assert!((half.guest.leading - 17.5).abs() < 1e-4);
        assert!((half.heading.font_size - 24.0).abs() < 1e-4);
        assert!((half.group_spacing - 16.0).abs() < 1e-4);
        assert_eq!(half.table_color, base.table_color);
    }
}
