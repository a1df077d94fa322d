//! guestlist – seating CSV → printable PDF guest list.
//!
//! Usage:
//!   guestlist [--input seating.csv] [--output guestlist.pdf] [--columns N]
//!             [--variant classic|compact|auto-fit] [--auto-fit] ...
//!
//! Set `RUST_LOG=debug` to trace column geometry and auto-fit attempts.

use std::path::PathBuf;
use std::{fs, process};

use clap::{Parser, ValueEnum};

use guestlist::autofit::{AutoFitConfig, FitStatus};
use guestlist::columns::{PageOrientation, PageSize};
use guestlist::error::{GuestListError, Result};
use guestlist::grouping::Collation;
use guestlist::guests::NameFormat;
use guestlist::pipeline::{generate_guest_list_file, PipelineConfig, Variant};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum VariantArg {
    Classic,
    Compact,
    AutoFit,
}

impl From<VariantArg> for Variant {
    fn from(v: VariantArg) -> Self {
        match v {
            VariantArg::Classic => Variant::Classic,
            VariantArg::Compact => Variant::Compact,
            VariantArg::AutoFit => Variant::AutoFit,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum PageSizeArg {
    A0,
    A1,
    A2,
    A3,
    A4,
}

impl From<PageSizeArg> for PageSize {
    fn from(p: PageSizeArg) -> Self {
        match p {
            PageSizeArg::A0 => PageSize::A0,
            PageSizeArg::A1 => PageSize::A1,
            PageSizeArg::A2 => PageSize::A2,
            PageSizeArg::A3 => PageSize::A3,
            PageSizeArg::A4 => PageSize::A4,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum NameFormatArg {
    Auto,
    FullName,
    SplitColumns,
}

impl From<NameFormatArg> for NameFormat {
    fn from(f: NameFormatArg) -> Self {
        match f {
            NameFormatArg::Auto => NameFormat::Auto,
            NameFormatArg::FullName => NameFormat::FullName,
            NameFormatArg::SplitColumns => NameFormat::SplitColumns,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "guestlist",
    about = "Generate a large-format PDF guest list from a seating CSV",
    version
)]
struct Cli {
    /// Input CSV file
    #[arg(long, default_value = "seating.csv")]
    input: PathBuf,

    /// Output PDF file
    #[arg(long, default_value = "guestlist.pdf")]
    output: PathBuf,

    /// Number of columns per page (default depends on the variant)
    #[arg(long)]
    columns: Option<usize>,

    /// Layout preset
    #[arg(long, value_enum, default_value = "classic")]
    variant: VariantArg,

    /// Start from a JSON pipeline config instead of a preset
    #[arg(long, conflicts_with = "variant")]
    config: Option<PathBuf>,

    /// Paper size
    #[arg(long, value_enum)]
    page_size: Option<PageSizeArg>,

    /// Portrait instead of landscape
    #[arg(long)]
    portrait: bool,

    /// Document title in PDF metadata
    #[arg(long)]
    title: Option<String>,

    /// Shrink the font until everything fits on one page
    #[arg(long, conflicts_with = "no_auto_fit")]
    auto_fit: bool,

    /// Keep the base font size even if the list spills onto more pages
    #[arg(long)]
    no_auto_fit: bool,

    /// Guest-name font size in points (headings scale with it)
    #[arg(long)]
    font_size: Option<f32>,

    /// Auto-fit floor in points
    #[arg(long)]
    min_font_size: Option<f32>,

    /// Auto-fit decrement in points
    #[arg(long)]
    font_step: Option<f32>,

    /// How names are read from the CSV
    #[arg(long, value_enum)]
    name_format: Option<NameFormatArg>,

    /// Sort names case-sensitively
    #[arg(long)]
    case_sensitive: bool,

    /// TrueType font for regular text
    #[arg(long)]
    font: Option<PathBuf>,

    /// TrueType font for last names and headings
    #[arg(long)]
    bold_font: Option<PathBuf>,

    /// Also write the computed layout as JSON
    #[arg(long)]
    layout_json: Option<PathBuf>,
}

impl Cli {
    /// Preset (or config file) with every explicit flag layered on top.
    fn pipeline_config(&self) -> Result<PipelineConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let json = fs::read_to_string(path).map_err(|source| GuestListError::Read {
                    path: path.clone(),
                    source,
                })?;
                PipelineConfig::from_json(&json)?
            }
            None => PipelineConfig::for_variant(self.variant.into()),
        };

        if let Some(columns) = self.columns {
            config.geometry.columns = columns;
        }
        if let Some(size) = self.page_size {
            config.geometry.page_size = size.into();
        }
        if self.portrait {
            config.geometry.orientation = PageOrientation::Portrait;
        }
        if let Some(title) = &self.title {
            config.title = title.clone();
        }
        if self.auto_fit && config.auto_fit.is_none() {
            config.auto_fit = Some(AutoFitConfig::default());
        }
        if self.no_auto_fit {
            config.auto_fit = None;
        }
        if let Some(size) = self.font_size {
            config.style = config.style.with_font_size(size);
        }
        if let Some(fit) = config.auto_fit.as_mut() {
            fit.base_font_size = config.style.guest.font_size;
            if let Some(min) = self.min_font_size {
                fit.min_font_size = min;
            }
            if let Some(step) = self.font_step {
                fit.step = step;
            }
        } else if self.min_font_size.is_some() || self.font_step.is_some() {
            log::warn!("--min-font-size and --font-step have no effect without auto-fit");
        }
        if let Some(format) = self.name_format {
            config.name_format = format.into();
        }
        if self.case_sensitive {
            config.collation = Collation::CaseSensitive;
        }
        if let Some(path) = &self.font {
            config.regular_font = Some(path.clone());
        }
        if let Some(path) = &self.bold_font {
            config.bold_font = Some(path.clone());
        }
        Ok(config)
    }
}

fn run(cli: &Cli) -> Result<()> {
    let config = cli.pipeline_config()?;
    let pdf = generate_guest_list_file(&cli.input, &cli.output, &config)?;

    if let Some(path) = &cli.layout_json {
        fs::write(path, pdf.layout.to_json()?).map_err(|source| GuestListError::Write {
            path: path.clone(),
            source,
        })?;
    }

    if pdf.fit == Some(FitStatus::Floored) {
        eprintln!(
            "Warning: list still spans {} pages at the minimum font size ({:.1} pt)",
            pdf.layout.page_count(),
            pdf.layout.font_size
        );
    }
    println!("Generated {}", cli.output.display());
    Ok(())
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    if let Err(e) = run(&cli) {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_for(args: &[&str]) -> PipelineConfig {
        let mut argv = vec!["guestlist"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().pipeline_config().unwrap()
    }

    #[test]
    fn defaults_are_the_classic_preset() {
        let cli = Cli::try_parse_from(["guestlist"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("seating.csv"));
        assert_eq!(cli.output, PathBuf::from("guestlist.pdf"));
        assert_eq!(cli.pipeline_config().unwrap(), PipelineConfig::default());
    }

    #[test]
    fn columns_override_the_preset() {
        let config = config_for(&["--variant", "compact", "--columns", "3"]);
        assert_eq!(config.geometry.columns, 3);
        assert!(config.auto_fit.is_some());
    }

    #[test]
    fn auto_fit_base_follows_font_size() {
        let config = config_for(&["--auto-fit", "--font-size", "20", "--min-font-size", "8", "--font-step", "0.25"]);
        let fit = config.auto_fit.unwrap();
        assert_eq!(fit.base_font_size, config.style.guest.font_size);
        assert!((fit.base_font_size - 20.0).abs() < 1e-4);
        assert_eq!(fit.min_font_size, 8.0);
        assert_eq!(fit.step, 0.25);
    }

    #[test]
    fn fit_flags_without_auto_fit_are_ignored() {
        let config = config_for(&["--min-font-size", "8"]);
        assert!(config.auto_fit.is_none());
        assert_eq!(config.style.guest.font_size, 27.0);
    }

    #[test]
    fn no_auto_fit_disables_the_preset_search() {
        let config = config_for(&["--variant", "auto-fit", "--no-auto-fit", "--portrait", "--case-sensitive"]);
        assert!(config.auto_fit.is_none());
        assert_eq!(config.geometry.orientation, PageOrientation::Portrait);
        assert_eq!(config.collation, Collation::CaseSensitive);
    }

    #[test]
    fn conflicting_fit_flags_are_rejected() {
        assert!(Cli::try_parse_from(["guestlist", "--auto-fit", "--no-auto-fit"]).is_err());
    }
}
