use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PaperToolsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Manifest serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    #[error("Expected 1 PDF, found {found}. Place one PDF in the folder.")]
    InputCardinality { found: usize },

    #[error("Cannot load font {}: {reason}", path.display())]
    FontLoad { path: PathBuf, reason: String },

    #[error("Page {page} has an invalid bounding box: {reason}")]
    PageGeometry { page: usize, reason: String },

    #[error("Image is {width}px wide; at least 2px are needed to split it")]
    ImageTooNarrow { width: u32 },

    #[error("Directory scan failed for {}: {reason}", path.display())]
    Scan { path: PathBuf, reason: String },
}

pub type Result<T> = std::result::Result<T, PaperToolsError>;
