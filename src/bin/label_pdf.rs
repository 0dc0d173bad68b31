use anyhow::Context;
use clap::Parser;
use paper_tools::cli::LabelCli;
use paper_tools::{logging, LabelConfig, PageLabeler, Result};
use tracing::error;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = LabelCli::parse();
    logging::init(cli.verbose);

    let dir = cli
        .dir
        .canonicalize()
        .with_context(|| format!("Cannot open folder {}", cli.dir.display()))?;

    let mut config = LabelConfig::for_dir(dir);
    if let Some(font) = cli.font {
        config.font_path = font;
    }
    config.dry_run = cli.dry_run;

    let result = if config.dry_run {
        handle_dry_run(&config).await
    } else {
        handle_label(&config).await
    };

    if let Err(e) = result {
        error!("{}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn handle_label(config: &LabelConfig) -> Result<()> {
    let report = PageLabeler::run(config).await?;

    println!("\n=== Labeling Summary ===");
    println!("Input:  {}", report.input.display());
    println!("Output: {}", report.output.display());
    println!("Pages:  {}", report.pages);
    println!("Font:   {}", report.font);
    Ok(())
}

async fn handle_dry_run(config: &LabelConfig) -> Result<()> {
    let plan = PageLabeler::plan(config).await?;

    println!("\n=== Label Plan ({} pages) ===", plan.len());
    for (index, (geometry, overlay)) in plan.iter().enumerate() {
        println!(
            "  Page {}: {} ({:.0} x {:.0} pt, gap {:.1}-{:.1})",
            index + 1,
            overlay.label,
            geometry.width,
            geometry.height,
            overlay.gap.0,
            overlay.gap.1
        );
    }
    Ok(())
}
