use clap::Parser;
use std::path::PathBuf;

/// Stamp every page of the single PDF in a folder with a sheet label and a
/// cut guide.
#[derive(Parser, Debug)]
#[command(name = "label-pdf")]
#[command(version)]
pub struct LabelCli {
    /// Folder holding exactly one PDF; the labeled copy is written there too
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// TrueType font for the label [default: <DIR>/font.ttf]
    #[arg(long, value_name = "PATH")]
    pub font: Option<PathBuf>,

    /// Print the label planned for each page without writing a file
    #[arg(long)]
    pub dry_run: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Split every image in a folder into left (A) and right (B) halves.
#[derive(Parser, Debug)]
#[command(name = "split-images")]
#[command(version)]
pub struct SplitCli {
    /// Folder to scan for images
    #[arg(short, long, default_value = ".")]
    pub dir: PathBuf,

    /// List the images that would be split without writing anything
    #[arg(long)]
    pub dry_run: bool,

    /// Record produced halves in a sidecar manifest and skip files it lists
    #[arg(long)]
    pub manifest: bool,

    /// Exit without waiting for Enter
    #[arg(long)]
    pub no_pause: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}
