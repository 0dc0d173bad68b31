use std::path::{Path, PathBuf};

/// Default name of the optional custom label font, looked up in the working directory.
pub const DEFAULT_FONT_FILE: &str = "font.ttf";

/// Prefix prepended to the input file name to form the labeled output.
pub const OUTPUT_PREFIX: &str = "labeled_";

/// Extensions eligible for splitting, compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "tiff"];

#[derive(Debug, Clone)]
pub struct LabelConfig {
    pub dir: PathBuf,
    pub font_path: PathBuf,
    pub font_size: f32,
    /// Clearance kept between the label and each end of the cut line.
    pub gap_margin: f32,
    pub line_width: f32,
    pub dry_run: bool,
}

impl LabelConfig {
    pub fn for_dir(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            font_path: dir.join(DEFAULT_FONT_FILE),
            dir,
            ..Self::default()
        }
    }

    pub fn output_path_for(&self, input: &Path) -> PathBuf {
        let name = input
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("document.pdf");
        input
            .parent()
            .unwrap_or(&self.dir)
            .join(format!("{}{}", OUTPUT_PREFIX, name))
    }
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("."),
            font_path: PathBuf::from(DEFAULT_FONT_FILE),
            font_size: 12.0,
            gap_margin: 10.0,
            line_width: 0.5,
            dry_run: false,
        }
    }
}

/// Visible area of a page in default user space, taken from its MediaBox.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageGeometry {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

/// One vertical stroke of the cut guide, in page-local coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub x: f32,
    pub y_start: f32,
    pub y_end: f32,
}

/// Everything drawn on top of a single page.
#[derive(Debug, Clone, PartialEq)]
pub struct Overlay {
    pub label: String,
    pub text_width: f32,
    /// Lower and upper bound of the gap left in the cut line for the label.
    pub gap: (f32, f32),
    pub segments: Vec<Segment>,
    /// Point the text is rotated about; the label is centered on it.
    pub pivot: (f32, f32),
}

#[derive(Debug, Clone)]
pub struct LabelReport {
    pub input: PathBuf,
    pub output: PathBuf,
    pub pages: usize,
    pub font: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Half {
    Left,
    Right,
}

impl Half {
    pub fn suffix(self) -> char {
        match self {
            Half::Left => 'A',
            Half::Right => 'B',
        }
    }
}

#[derive(Debug, Clone)]
pub struct SplitConfig {
    pub dir: PathBuf,
    pub use_manifest: bool,
    pub dry_run: bool,
}

impl SplitConfig {
    pub fn for_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            use_manifest: false,
            dry_run: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitOutcome {
    pub source: PathBuf,
    pub left: PathBuf,
    pub right: PathBuf,
    pub width: u32,
    pub height: u32,
    pub left_width: u32,
    pub right_width: u32,
}

#[derive(Debug, Clone)]
pub struct SplitFailure {
    pub source: PathBuf,
    pub reason: String,
}

#[derive(Debug, Clone, Default)]
pub struct SplitSummary {
    pub split: Vec<SplitOutcome>,
    /// Filled instead of `split` on a dry run.
    pub planned: Vec<PathBuf>,
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<SplitFailure>,
}

impl SplitSummary {
    /// Files that were attempted, whether or not the split succeeded.
    pub fn processed_count(&self) -> usize {
        self.split.len() + self.failed.len()
    }
}
