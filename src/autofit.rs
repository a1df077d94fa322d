//! Auto-fit – finds the largest guest font size whose layout fits on a
//! single page.
//!
//! Candidate sizes form a descending grid `base, base - step, base - 2·step, …`
//! that stops before reaching `min_font_size`. The selected size is the first
//! candidate on that grid (scanning from the largest) whose layout is at most
//! one page, exactly as a decrement-and-rebuild loop would find it. Instead
//! of walking the grid linearly the search bisects it, assuming page count
//! never grows as the font shrinks. When no candidate fits the result is
//! *floored*: the smallest candidate's layout is returned as best effort.

use serde::{Deserialize, Serialize};

use crate::error::{GuestListError, Result};
use crate::layout_config::LayoutConfig;

/// Upper bound on the size of the candidate grid.
const MAX_CANDIDATES: f32 = 10_000.0;

/// Shrink-loop parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoFitConfig {
    /// Guest-name size the search starts from.
    pub base_font_size: f32,
    /// Floor; no candidate at or below this size is tried.
    pub min_font_size: f32,
    /// Decrement between adjacent candidates.
    pub step: f32,
}

impl Default for AutoFitConfig {
    fn default() -> Self {
        Self {
            base_font_size: 27.0,
            min_font_size: 6.0,
            step: 0.5,
        }
    }
}

impl AutoFitConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.base_font_size > 0.0) {
            return Err(GuestListError::Config("base font size must be positive".into()));
        }
        if !(self.step > 0.0) {
            return Err(GuestListError::Config("font step must be positive".into()));
        }
        if !(self.min_font_size >= 0.0) {
            return Err(GuestListError::Config("minimum font size must not be negative".into()));
        }
        if (self.base_font_size - self.min_font_size) / self.step > MAX_CANDIDATES {
            return Err(GuestListError::Config(format!(
                "font step {} is too fine for the {}..{} pt range",
                self.step, self.min_font_size, self.base_font_size
            )));
        }
        Ok(())
    }

    /// Index of the smallest candidate. Candidate `k` is
    /// `base - k·step`; index 0 is always a candidate.
    pub fn last_candidate(&self) -> usize {
        if self.base_font_size <= self.min_font_size {
            return 0;
        }
        let mut k = ((self.base_font_size - self.min_font_size) / self.step).ceil() as usize;
        while k > 0 && self.candidate(k) <= self.min_font_size {
            k -= 1;
        }
        while self.candidate(k + 1) > self.min_font_size {
            k += 1;
        }
        k
    }

    pub fn candidate(&self, k: usize) -> f32 {
        self.base_font_size - k as f32 * self.step
    }
}

/// One layout pass made by the search.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Attempt {
    pub font_size: f32,
    pub pages: usize,
}

/// Terminal state of the shrink loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FitStatus {
    /// The layout fits on a single page.
    Done,
    /// No candidate above the floor fits; the smallest one was kept.
    Floored,
}

/// Chosen layout plus the search trace.
#[derive(Debug, Clone)]
pub struct AutoFitOutcome {
    pub status: FitStatus,
    pub font_size: f32,
    pub layout: LayoutConfig,
    pub attempts: Vec<Attempt>,
}

/// Run the search. `build` is called with a font size and must return a
/// freshly built layout for it.
pub fn auto_fit<F>(config: &AutoFitConfig, mut build: F) -> Result<AutoFitOutcome>
where
    F: FnMut(f32) -> Result<LayoutConfig>,
{
    config.validate()?;

    let mut attempts = Vec::new();
    let mut measure = |k: usize, attempts: &mut Vec<Attempt>| -> Result<LayoutConfig> {
        let font_size = config.candidate(k);
        let layout = build(font_size)?;
        let pages = layout.page_count();
        log::debug!("Auto-fit: {font_size:.2} pt -> {pages} page(s)");
        attempts.push(Attempt { font_size, pages });
        Ok(layout)
    };

    let first = measure(0, &mut attempts)?;
    if first.page_count() <= 1 {
        return Ok(finish(FitStatus::Done, config.candidate(0), first, attempts));
    }

    let last = config.last_candidate();
    if last == 0 {
        return Ok(finish(FitStatus::Floored, config.candidate(0), first, attempts));
    }

    let smallest = measure(last, &mut attempts)?;
    if smallest.page_count() > 1 {
        return Ok(finish(FitStatus::Floored, config.candidate(last), smallest, attempts));
    }

    // Invariant: candidate `lo` overflows, candidate `hi` fits.
    let (mut lo, mut hi) = (0usize, last);
    let mut best = smallest;
    while hi - lo > 1 {
        let mid = lo + (hi - lo) / 2;
        let layout = measure(mid, &mut attempts)?;
        if layout.page_count() <= 1 {
            hi = mid;
            best = layout;
        } else {
            lo = mid;
        }
    }
    Ok(finish(FitStatus::Done, config.candidate(hi), best, attempts))
}

fn finish(status: FitStatus, font_size: f32, layout: LayoutConfig, attempts: Vec<Attempt>) -> AutoFitOutcome {
    match status {
        FitStatus::Done => log::info!(
            "Auto-fit settled on {font_size:.2} pt after {} layout pass(es)",
            attempts.len()
        ),
        FitStatus::Floored => log::warn!(
            "Auto-fit reached the {font_size:.2} pt floor with {} page(s)",
            layout.page_count()
        ),
    }
    AutoFitOutcome {
        status,
        font_size,
        layout,
        attempts,
    }
}
