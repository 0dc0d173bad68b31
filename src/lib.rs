//! # Paper Tools
//!
//! Two small batch utilities for preparing printed material:
//!
//! - [`PageLabeler`] stamps every page of a PDF with a rotated
//!   `PAPER n - FRONT/BACK` label and a vertical cut guide.
//! - [`ImageSplitter`] cuts every image in a folder into left and right
//!   halves saved as `<name>A.<ext>` and `<name>B.<ext>`.
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use paper_tools::{ImageSplitter, LabelConfig, PageLabeler, SplitConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let report = PageLabeler::run(&LabelConfig::for_dir("./print")).await?;
//!     println!("Labeled {} pages into {}", report.pages, report.output.display());
//!
//!     let summary = ImageSplitter::split_directory(&SplitConfig::for_dir("./scans")).await?;
//!     println!("Split {} images", summary.split.len());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod error;
pub mod logging;
pub mod services;
pub mod types;

// Re-export main types and services for easier usage
pub use error::{PaperToolsError, Result};
pub use services::{
    label_text, FileDiscovery, FontResolver, ImageSplitter, LabelFont, OverlayBuilder,
    PageLabeler, SplitManifest,
};
pub use types::{
    LabelConfig, LabelReport, Overlay, PageGeometry, SplitConfig, SplitOutcome, SplitSummary,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
