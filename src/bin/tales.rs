use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::sync::Arc;
use tales_reader::config::ReaderConfig;
use tales_reader::content::{self, ContentState, ContentView, Converter};
use tales_reader::language;
use tales_reader::reader::{self, Body};
use tales_reader::source::Source;
use tales_reader::telemetry;
use tales_reader::view::{TaleEntry, ViewBuilder};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::JoinSet;

#[derive(Parser)]
#[command(author, version, about = "Read tales from the terminal", long_about = None)]
struct Args {
    #[command(flatten)]
    reader: ReaderConfig,

    /// Output format
    #[arg(short = 'o', long = "output", value_enum, global = true, default_value_t = Output::Human)]
    output: Output,

    #[command(subcommand)]
    command: Command,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum Output {
    Human,
    Json,
}

#[derive(Subcommand)]
enum Command {
    /// Languages any tale is written in
    Languages,
    /// Collection folders readable in the selected language
    Collections,
    /// Tales of one collection (or `standalone`); every tale when omitted
    List { collection: Option<String> },
    /// Print one tale, e.g. `the-fox-en`
    Read {
        route: String,
        /// Print sanitized HTML instead of the markdown source
        #[arg(long)]
        html: bool,
    },
    /// Read route keys from stdin and show each tale as it loads
    Browse,
}

#[tokio::main]
async fn main() -> Result<()> {
    telemetry::init_tracing();
    let args = Args::parse();
    let config = &args.reader;
    let source = config.source()?;

    if let Command::Browse = args.command {
        return browse(source).await;
    }

    let indexes = source.fetch_indexes(&config.parser()).await?;
    let lang = config.language_or_default(None);
    let fallback = config.fallback();
    let builder = ViewBuilder::new(&indexes, &lang, &fallback);
    let view = builder.build();

    match &args.command {
        Command::Languages => {
            let languages = language::available_languages(&indexes.tales);
            if args.output == Output::Json {
                println!("{}", serde_json::to_string_pretty(&languages)?);
            } else {
                for code in languages {
                    let marker = if code == lang { "*" } else { " " };
                    println!("{} {}", marker, code);
                }
            }
        }
        Command::Collections => {
            let folders = builder.folders(&view, &config.standalone_label);
            if args.output == Output::Json {
                println!("{}", serde_json::to_string_pretty(&folders)?);
            } else {
                for folder in folders {
                    println!("📁 {} ({})", folder.name, folder.slug);
                }
            }
        }
        Command::List {
            collection: Some(slug),
        } => {
            let page = builder.collection_page(&view, slug, &config.standalone_label)?;
            if args.output == Output::Json {
                println!("{}", serde_json::to_string_pretty(&page)?);
            } else {
                println!("{}", page.name);
                for entry in &page.entries {
                    print_entry(entry);
                }
            }
        }
        Command::List { collection: None } => {
            if args.output == Output::Json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                for group in &view.collections {
                    println!("📁 {}", group.name);
                    group.entries.iter().for_each(print_entry);
                }
                if !view.standalone.is_empty() {
                    println!("📁 {}", config.standalone_label);
                    view.standalone.iter().for_each(print_entry);
                }
            }
        }
        Command::Read { route, html } => {
            let body = if *html { Body::Html } else { Body::Markdown };
            let reading = reader::read(&source, &builder, route, body).await?;
            if args.output == Output::Json {
                println!("{}", serde_json::to_string_pretty(&reading)?);
            } else {
                println!("{}", reading.to_text());
            }
        }
        Command::Browse => unreachable!("handled above"),
    }

    Ok(())
}

fn print_entry(entry: &TaleEntry) {
    let marker = if entry.available { "📄" } else { "  " };
    println!(
        "  {} {} - {} ({})  → {}",
        marker, entry.title, entry.tale.author, entry.year, entry.href
    );
}

/// Every line starts a navigation; a result is printed only if no newer
/// line arrived while it was loading.
async fn browse(source: Source) -> Result<()> {
    let view = Arc::new(ContentView::new());
    let source = Arc::new(source);
    let converter = Converter::default();
    let mut tasks = JoinSet::new();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let route = line.trim().to_string();
        if route.is_empty() {
            continue;
        }
        let (view, source) = (view.clone(), source.clone());
        tasks.spawn(async move {
            let ticket = view.begin(&route);
            let state = content::load(&source, &converter, &route).await;
            if view.commit(ticket, state.clone()) {
                match state {
                    ContentState::Loaded { html } => println!("── {} ──\n{}", route, html),
                    ContentState::NotFound { message } | ContentState::Error { message } => {
                        println!("── {} ── {}", route, message)
                    }
                    _ => {}
                }
            }
        });
    }

    while tasks.join_next().await.is_some() {}
    Ok(())
}
