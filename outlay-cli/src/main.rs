use std::collections::HashMap;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

use outlay_classify::{classify_intent, Categorizer, LlmClient};
use outlay_core::{ExpenseIntent, VendorTable};
use outlay_ingest::{IngestOutcome, IngestPipeline};
use outlay_query::dispatch;

mod ledger;

#[derive(Parser, Debug)]
#[command(name = "outlay", version, about = "Bank-notification expense tracker")]
struct Cli {
    /// Ledger file (default: ~/.outlay/ledger.json)
    #[arg(long, global = true)]
    ledger: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse decoded email bodies into the ledger, one file per message
    Ingest {
        files: Vec<PathBuf>,
    },

    /// Answer a spending question with a deterministic numeric result
    Ask {
        /// Free-text question, classified into an intent by the configured LLM
        question: Option<String>,

        /// Raw intent JSON; bypasses the LLM classifier
        #[arg(long)]
        intent: Option<String>,
    },

    /// Resolve one vendor through the categorization chain
    Categorize {
        vendor: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logger();
    let cli = Cli::parse();

    let ledger_path = match cli.ledger {
        Some(path) => path,
        None => ledger::default_ledger_path()?,
    };
    let store = ledger::JsonLedger::open(&ledger_path)?;
    let table = VendorTable::builtin();
    let llm = LlmClient::from_env();

    match cli.command {
        Command::Ingest { files } => {
            if files.is_empty() {
                bail!("no input files (pass one decoded email body per file)");
            }

            let mut categorizer = Categorizer::new(&table).with_store(&store);
            if let Some(client) = llm.as_ref() {
                categorizer = categorizer.with_classifier(client);
            }
            let pipeline = IngestPipeline::new(&store, categorizer);

            let mut saved = 0;
            let mut unparsed = 0;
            for file in &files {
                let body = std::fs::read_to_string(file)
                    .with_context(|| format!("read {}", file.display()))?;
                match pipeline.process(&body, &HashMap::new())? {
                    IngestOutcome::Saved(tx) => {
                        saved += 1;
                        println!(
                            "parsed {:?}: {} | {:.2} | {}",
                            tx.kind,
                            if tx.vendor.is_empty() { "(transfer)" } else { tx.vendor.as_str() },
                            tx.amount,
                            tx.category
                        );
                    }
                    IngestOutcome::Unparsed => {
                        unparsed += 1;
                        println!("no known format: {}", file.display());
                    }
                }
            }
            println!("\n{saved} parsed, {unparsed} unparsed (kept for review)");
        }

        Command::Ask { question, intent } => {
            let intent = match (intent, question) {
                (Some(json), _) => ExpenseIntent::from_model_response(&json)?,
                (None, Some(q)) => {
                    let client = llm.as_ref().context(
                        "no API key configured; set ANTHROPIC_API_KEY or OPENAI_API_KEY, \
or pass --intent <json>",
                    )?;
                    classify_intent(client, &q)?
                }
                (None, None) => bail!("pass a question or --intent <json>"),
            };

            let outcome = dispatch(&intent, &store)?;
            // printed verbatim: downstream explanation treats these numbers
            // as ground truth and must not recompute them
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }

        Command::Categorize { vendor } => {
            let mut categorizer = Categorizer::new(&table).with_store(&store);
            if let Some(client) = llm.as_ref() {
                categorizer = categorizer.with_classifier(client);
            }
            println!("{} -> {}", vendor, categorizer.categorize(&vendor));
        }
    }

    Ok(())
}

fn init_logger() {
    let filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy();
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
