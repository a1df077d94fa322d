//! Pipeline – ties together loading, grouping, layout, auto-fit and
//! rendering into a single function call.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::autofit::{auto_fit, AutoFitConfig, FitStatus};
use crate::columns::{compute_columns, PageGeometry};
use crate::document::{build_document, DocumentFrame};
use crate::error::{GuestListError, Result};
use crate::fonts::{FontManager, FontWeight};
use crate::grouping::{sort_guests, Collation, GroupedGuests};
use crate::guests::{read_guests, GuestRecord, NameFormat};
use crate::layout_config::LayoutConfig;
use crate::render::render_pdf;
use crate::style::GuestListStyle;

pub const DEFAULT_TITLE: &str = "Wedding Guest List";

/// Named presets for the layouts the tool has historically produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Variant {
    /// Four columns at full size, no shrinking.
    #[default]
    Classic,
    /// Seven narrow columns from first/last name columns, shrunk to one page.
    Compact,
    /// Six columns, shrunk to one page.
    AutoFit,
}

/// Configuration for the guest-list pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Document title embedded in the PDF metadata.
    pub title: String,
    pub geometry: PageGeometry,
    /// Typography at the base font size.
    pub style: GuestListStyle,
    /// Shrink to a single page when set.
    pub auto_fit: Option<AutoFitConfig>,
    pub collation: Collation,
    pub name_format: NameFormat,
    /// TrueType file for regular text; built-in Helvetica when unset.
    pub regular_font: Option<PathBuf>,
    /// TrueType file for last names and headings.
    pub bold_font: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self::for_variant(Variant::Classic)
    }
}

impl PipelineConfig {
    pub fn for_variant(variant: Variant) -> Self {
        let (columns, auto_fit, name_format) = match variant {
            Variant::Classic => (4, None, NameFormat::Auto),
            Variant::Compact => (7, Some(AutoFitConfig::default()), NameFormat::SplitColumns),
            Variant::AutoFit => (6, Some(AutoFitConfig::default()), NameFormat::Auto),
        };
        Self {
            title: DEFAULT_TITLE.to_string(),
            geometry: PageGeometry {
                columns,
                ..PageGeometry::default()
            },
            style: GuestListStyle::default(),
            auto_fit,
            collation: Collation::default(),
            name_format,
            regular_font: None,
            bold_font: None,
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<()> {
        self.geometry.validate()?;
        if !(self.style.guest.font_size > 0.0) {
            return Err(GuestListError::Config("guest font size must be positive".into()));
        }
        if let Some(fit) = &self.auto_fit {
            fit.validate()?;
        }
        Ok(())
    }

    /// Load the configured TTFs, or fall back to built-in Helvetica.
    pub fn load_fonts(&self) -> Result<FontManager> {
        let mut fonts = FontManager::builtin();
        if let Some(path) = &self.regular_font {
            fonts.load_font_file(FontWeight::Regular, path)?;
        }
        if let Some(path) = &self.bold_font {
            fonts.load_font_file(FontWeight::Bold, path)?;
        }
        Ok(fonts)
    }
}

/// Result of a pipeline run.
#[derive(Debug, Clone)]
pub struct GuestListPdf {
    pub bytes: Vec<u8>,
    pub layout: LayoutConfig,
    /// `None` when auto-fit was disabled.
    pub fit: Option<FitStatus>,
    /// Number of layout passes performed.
    pub layout_passes: usize,
}

/// Sort, group, lay out and render `guests`.
pub fn generate_guest_list(guests: &[GuestRecord], config: &PipelineConfig) -> Result<GuestListPdf> {
    config.validate()?;
    let fonts = config.load_fonts()?;

    let mut sorted = guests.to_vec();
    sort_guests(&mut sorted, config.collation);
    let groups = GroupedGuests::new(&sorted, config.collation);
    if groups.is_empty() {
        log::warn!("No guests to list; the PDF will have a single blank page");
    }

    let frame = DocumentFrame {
        title: config.title.clone(),
        page_width_pt: config.geometry.page_width(),
        page_height_pt: config.geometry.page_height(),
        columns: compute_columns(&config.geometry)?,
    };

    let (layout, fit, layout_passes) = match &config.auto_fit {
        Some(fit_config) => {
            let outcome = auto_fit(fit_config, |font_size| {
                let style = config.style.with_font_size(font_size);
                Ok(build_document(&groups, &style, &frame, &fonts))
            })?;
            (outcome.layout, Some(outcome.status), outcome.attempts.len())
        }
        None => (build_document(&groups, &config.style, &frame, &fonts), None, 1),
    };

    log::info!(
        "{} guest(s) in {} group(s) -> {} page(s) at {:.2} pt",
        groups.guest_count(),
        groups.group_count(),
        layout.page_count(),
        layout.font_size
    );

    let bytes = render_pdf(&layout, &fonts)?;
    Ok(GuestListPdf {
        bytes,
        layout,
        fit,
        layout_passes,
    })
}

/// Full pipeline: CSV file → PDF file.
pub fn generate_guest_list_file(input: &Path, output: &Path, config: &PipelineConfig) -> Result<GuestListPdf> {
    let guests = read_guests(input, config.name_format)?;
    let pdf = generate_guest_list(&guests, config)?;

    // Create output directory if necessary.
    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| GuestListError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
        }
    }
    fs::write(output, &pdf.bytes).map_err(|source| GuestListError::Write {
        path: output.to_path_buf(),
        source,
    })?;
    log::info!("Wrote '{}' ({} bytes)", output.display(), pdf.bytes.len());
    Ok(pdf)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variants_set_column_defaults() {
        assert_eq!(PipelineConfig::for_variant(Variant::Classic).geometry.columns, 4);
        assert_eq!(PipelineConfig::for_variant(Variant::Compact).geometry.columns, 7);
        assert_eq!(PipelineConfig::for_variant(Variant::AutoFit).geometry.columns, 6);
        assert!(PipelineConfig::default().auto_fit.is_none());
        assert!(PipelineConfig::for_variant(Variant::AutoFit).auto_fit.is_some());
    }

    #[test]
    fn partial_json_config_keeps_defaults() {
        let config = PipelineConfig::from_json(r#"{"geometry": {"columns": 5}, "collation": "case-sensitive"}"#).unwrap();
        assert_eq!(config.geometry.columns, 5);
        assert_eq!(config.collation, Collation::CaseSensitive);
        assert_eq!(config.title, DEFAULT_TITLE);
        assert!((config.geometry.margin - 36.0).abs() < 1e-6);

        let back = PipelineConfig::from_json(&config.to_json().unwrap()).unwrap();
        assert_eq!(back.geometry, config.geometry);
        assert_eq!(back.collation, config.collation);
        assert_eq!(back.auto_fit, config.auto_fit);
    }

    #[test]
    fn pipeline_basic() {
        let guests = vec![GuestRecord::new("Jane Mary", "Smith", "4"), GuestRecord::new("", "Cher", "12")];
        let pdf = generate_guest_list(&guests, &PipelineConfig::default()).unwrap();
        assert_eq!(&pdf.bytes[0..5], b"%PDF-");
        assert_eq!(pdf.layout.guest_count(), 2);
        assert_eq!(pdf.layout.page_count(), 1);
        assert_eq!(pdf.fit, None);
        assert_eq!(pdf.layout_passes, 1);
    }

    #[test]
    fn empty_guest_list_renders_one_blank_page() {
        let pdf = generate_guest_list(&[], &PipelineConfig::default()).unwrap();
        assert_eq!(&pdf.bytes[0..5], b"%PDF-");
        assert_eq!(pdf.layout.page_count(), 1);
        assert!(pdf.layout.lines().next().is_none());
    }

    #[test]
    fn invalid_columns_fail_before_rendering() {
        let mut config = PipelineConfig::default();
        config.geometry.columns = 0;
        let err = generate_guest_list(&[], &config).unwrap_err();
        assert!(matches!(err, GuestListError::Config(_)));
    }

    #[test]
    fn missing_font_file_is_reported() {
        let config = PipelineConfig {
            regular_font: Some(PathBuf::from("/no/such/font.ttf")),
            ..PipelineConfig::default()
        };
        assert!(matches!(config.load_fonts(), Err(GuestListError::Font { .. })));
    }
}
