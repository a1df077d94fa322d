//! # guestlist – seating CSV → printable PDF guest list
//!
//! The pipeline stages are:
//!
//! 1. **Load** – CSV rows → [`guests::GuestRecord`]s ([`guests`])
//! 2. **Group** – sort and bucket by last-name initial ([`grouping`])
//! 3. **Build** – headings and guest paragraphs as styled blocks ([`document`])
//! 4. **Flow** – place blocks into equal-width columns ([`columns`], [`flow`])
//! 5. **Fit** – optionally shrink the font until one page suffices ([`autofit`])
//! 6. **Render** – emit PDF bytes via printpdf ([`render`])

pub mod autofit;
pub mod columns;
pub mod document;
pub mod error;
pub mod flow;
pub mod fonts;
pub mod grouping;
pub mod guests;
pub mod layout_config;
pub mod pipeline;
pub mod render;
pub mod style;

// Re-exports for convenience
pub use error::{GuestListError, Result};
pub use guests::{read_guests, GuestRecord};
pub use pipeline::{generate_guest_list, generate_guest_list_file, PipelineConfig, Variant};
