use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::info;

use vigil::config::AppConfig;
use vigil::db::Database;
use vigil::relevance::{classify, SourceMeta};
use vigil::{api, logging, pipeline};

#[derive(Parser)]
#[command(name = "vigil", about = "Diagnostics-industry news pipeline", version)]
struct Cli {
    /// Path to the JSON config file (defaults to $VIGIL_CONFIG_PATH)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database path
    #[arg(long, global = true, default_value = "vigil.db")]
    database: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Serve the feed API
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
    /// Ingest raw items from a JSON file
    Ingest {
        #[arg(long)]
        file: PathBuf,
    },
    /// Classify the item window and rebuild the story read model
    Rebuild,
    /// Classify one text and print the decision with its explain record
    Classify {
        text: String,
        #[arg(long, default_value = "")]
        title: String,
        #[arg(long, default_value = "")]
        url: String,
        #[arg(long, default_value = "")]
        source_group: String,
        #[arg(long, default_value = "")]
        source_id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    logging::configure_logging();
    let cli = Cli::parse();
    let config = AppConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Serve { port } => {
            let db = Database::new(&cli.database).await?;
            api::serve(db, port).await?;
        }
        Command::Ingest { file } => {
            let db = Database::new(&cli.database).await?;
            let added = pipeline::ingest_file(&db, &file).await?;
            info!("Ingested {} items", added);
        }
        Command::Rebuild => {
            let db = Database::new(&cli.database).await?;
            let stats = pipeline::rebuild(&db, &config, Utc::now()).await?;
            info!(
                "Rebuild finished: {} items seen, {} kept, {} dropped, {} stories",
                stats.items_seen, stats.kept, stats.dropped, stats.stories
            );
        }
        Command::Classify {
            text,
            title,
            url,
            source_group,
            source_id,
        } => {
            let meta = SourceMeta {
                title,
                url,
                source_group,
                event_type: String::new(),
                source_id,
            };
            let classification = classify(&text, &meta, &config.rules);
            println!("{}", serde_json::to_string_pretty(&classification)?);
        }
    }

    Ok(())
}
