use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::Path;

use tuankb_core::{config, pipeline, search, snapshot};

#[derive(Parser)]
#[command(name = "tuankb", about = "Document tree catalog: rebuild, serve, search")]
struct Cli {
    /// Config file (defaults to config/default.toml).
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run one full rebuild and publish the snapshot.
    Build {
        #[arg(long)]
        json: bool,
    },
    /// Serve the catalog over HTTP.
    Serve,
    /// Rank snapshot documents against a query, offline.
    Search {
        query: String,
        #[arg(long, default_value_t = 5)]
        topk: usize,
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Build { json } => {
            let summary = pipeline::run(&cfg)?;
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "raw_files": summary.raw_files,
                        "indexed": summary.indexed,
                        "snapshot": summary.snapshot_path,
                    })
                );
            } else {
                println!(
                    "raw={} indexed={} snapshot={}",
                    summary.raw_files,
                    summary.indexed,
                    summary.snapshot_path.display()
                );
            }
            Ok(())
        }
        Commands::Serve => tuankb_server::serve(cfg).await,
        Commands::Search { query, topk, json } => {
            let catalog = snapshot::load(Path::new(&cfg.snapshot.path))?;
            let ranked = search::rank(&query, catalog.documents());
            let window = ranked.iter().take(topk);
            if json {
                let hits: Vec<serde_json::Value> = window
                    .map(|hit| {
                        serde_json::json!({
                            "score": hit.score,
                            "title": hit.doc.title,
                            "project_name": hit.doc.project_name,
                            "category": hit.doc.category,
                            "file_path": hit.doc.file_path,
                        })
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&hits)?);
            } else {
                for (i, hit) in window.enumerate() {
                    println!(
                        "{}. [{}] {} | 项目:{} | {}",
                        i + 1,
                        hit.score,
                        hit.doc.title,
                        hit.doc.project_name,
                        hit.doc.file_path
                    );
                }
            }
            Ok(())
        }
    }
}
