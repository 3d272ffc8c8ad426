use anyhow::Context;
use clap::Parser;
use tales_reader::config::ReaderConfig;
use tales_reader::server::{self, AppState};
use tales_reader::telemetry;
use tracing::info;

#[derive(Parser)]
#[command(name = "tales-server")]
#[command(about = "Serve the tales reader over HTTP")]
struct Args {
    #[command(flatten)]
    reader: ReaderConfig,

    /// Address to listen on
    #[arg(short, long, env = "TALES_BIND", default_value = "0.0.0.0:3000")]
    bind: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init_tracing();
    let args = Args::parse();

    let state = AppState::new(args.reader).context("failed to set up reader")?;
    info!(source = %state.source().describe(), "reading tales");
    let app = server::router(state);

    let listener = tokio::net::TcpListener::bind(&args.bind)
        .await
        .with_context(|| format!("failed to bind {}", args.bind))?;
    println!("🚀 Tales server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
