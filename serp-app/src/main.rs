use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use serp_common::{SerpError, Tool};
use serp_common::observability::init_logging;
use serp_google::locale;

mod wiring;

#[derive(Debug, Parser)]
#[command(name = "serp", version, about = "Google Search through SerpApi")]
struct Cli {
    /// YAML config file; defaults to <config_dir>/serp/serp.yaml when present.
    #[arg(long, short, global = true, env = "SERP_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run one search and print each emitted message as a JSON line.
    Search {
        #[arg(long, short)]
        query: String,
        #[arg(long)]
        hl: Option<String>,
        #[arg(long)]
        gl: Option<String>,
        #[arg(long)]
        location: Option<String>,
        #[arg(long)]
        imgsz: Option<String>,
    },
    /// Probe SerpApi with the configured key.
    ValidateCredentials,
    /// List the locale codes accepted without an advisory.
    Locales {
        #[arg(long, value_enum, default_value_t = LocaleList::Countries)]
        kind: LocaleList,
    },
    /// Print the tool's parameter schema.
    Schema,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum LocaleList {
    Countries,
    Languages,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1) Load config (env wins)
    let cfg = wiring::load_config(cli.config)?;
    let log_path = init_logging(wiring::log_config(&cfg))?;
    tracing::info!(log = %log_path.display(), endpoint = %cfg.serpapi.endpoint, "serp.start");

    match cli.command {
        Command::Search {
            query,
            hl,
            gl,
            location,
            imgsz,
        } => {
            let tool = wiring::build_tool(&cfg)?;
            let params = wiring::search_parameters(query, hl, gl, location, imgsz);
            let messages = tool.invoke(&wiring::credentials(&cfg), &params).await;
            for msg in messages {
                println!("{}", serde_json::to_string(&msg)?);
            }
        }
        Command::ValidateCredentials => {
            let provider = wiring::build_provider(&cfg)?;
            provider
                .validate_credentials(&wiring::credentials(&cfg))
                .await
                .map_err(|e| SerpError::Tool(e.to_string()))?;
            println!("credentials ok");
        }
        Command::Locales { kind } => {
            let set = match kind {
                LocaleList::Countries => locale::countries(),
                LocaleList::Languages => locale::languages(),
            };
            for (code, name) in set.entries() {
                println!("{code}\t{name}");
            }
        }
        Command::Schema => {
            let tool = wiring::build_tool(&cfg)?;
            println!("{}", serde_json::to_string_pretty(&tool.parameters_schema())?);
        }
    }

    Ok(())
}
