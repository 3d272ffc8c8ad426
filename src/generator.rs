use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use tales_reader::config::ReaderConfig;
use tales_reader::export::{self, Exporter};
use tales_reader::telemetry;

#[derive(Parser)]
#[command(name = "tales-generator")]
#[command(about = "Export the tales reader as static HTML")]
struct Args {
    #[command(flatten)]
    reader: ReaderConfig,

    #[arg(short, long, default_value = "dist")]
    output: String,

    /// Path prefix the export is served under, e.g. /words_made_of_pixels
    #[arg(long, default_value = "")]
    base_path: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();
    let args = Args::parse();
    let config = &args.reader;

    let source = config.source()?;
    println!("🔍 Reading tales from: {}", source.describe());

    let indexes = source
        .fetch_indexes(&config.parser())
        .await
        .context("failed to load indexes")?;
    println!(
        "📝 Found {} tales in {} collections",
        indexes.tales.len(),
        indexes.collections.len()
    );

    let missing = export::missing_documents(&source, &indexes);
    if !missing.is_empty() {
        println!("⚠️  {} declared documents are missing:", missing.len());
        for route in &missing {
            println!("  ❌ {}.md", route);
        }
    }

    let out = PathBuf::from(&args.output);
    let exporter = Exporter::new(config, &source, &out, &args.base_path)?;
    let summary = exporter
        .export_all(&indexes)
        .await
        .with_context(|| format!("failed to export to {}", out.display()))?;

    for (lang, count) in &summary.pages {
        println!("  📄 {}: {} pages", lang, count);
    }
    println!("🏠 Root page: {}", summary.home);
    println!("✅ Exported {} pages to: {}", summary.total(), out.display());
    Ok(())
}
