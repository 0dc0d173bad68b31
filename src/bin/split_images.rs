use anyhow::Context;
use clap::Parser;
use paper_tools::cli::SplitCli;
use paper_tools::{logging, ImageSplitter, SplitConfig, SplitSummary};
use std::io::IsTerminal;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = SplitCli::parse();
    logging::init(cli.verbose);

    let config = SplitConfig {
        dir: cli.dir.clone(),
        use_manifest: cli.manifest,
        dry_run: cli.dry_run,
    };

    let outcome = ImageSplitter::split_directory(&config).await;
    match &outcome {
        Ok(summary) => print_summary(summary, config.dry_run),
        Err(e) => error!("Operation failed: {}", e),
    }

    if !cli.no_pause && std::io::stdin().is_terminal() {
        println!("\nScript finished. Press Enter to exit.");
        let mut line = String::new();
        BufReader::new(tokio::io::stdin())
            .read_line(&mut line)
            .await
            .context("Failed to read from stdin")?;
    }

    if outcome.is_err() {
        std::process::exit(1);
    }

    Ok(())
}

fn print_summary(summary: &SplitSummary, dry_run: bool) {
    if dry_run {
        println!("\n=== Dry Run ===");
        if summary.planned.is_empty() {
            println!("No new images found to process.");
        }
        for path in &summary.planned {
            println!("  would split {}", path.display());
        }
        return;
    }

    if summary.processed_count() == 0 {
        println!("No new images found to process.");
        return;
    }

    println!("\nFinished processing {} image(s).", summary.processed_count());
    println!("Split: {}", summary.split.len());
    println!("Skipped: {}", summary.skipped.len());

    if !summary.failed.is_empty() {
        println!("Failed:");
        for failure in &summary.failed {
            println!("  - {}: {}", failure.source.display(), failure.reason);
        }
    }
}
