//! Stdin-driven intake demo.
//!
//! Reads one message per line, processes it through the extraction
//! pipeline and prints replies plus the rows that would go to the
//! persistence sink. Without an OPENAI_API_KEY the fallback degrades
//! deterministically, which is still a complete run.

use std::io::BufRead;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use clap::Parser;
use order_intake::{
    Catalog, ExtractionModel, IntakeConfig, OpenAiModel, OrderIntake, Replier, RowSink,
};
use tracing::warn;

#[derive(Parser)]
#[command(name = "intake-cli", about = "Order intake extraction demo")]
struct Args {
    /// Known-customers list, one entry per line
    #[arg(long, default_value = "known_customers.txt")]
    customers: String,

    /// Known-products list, one entry per line
    #[arg(long, default_value = "known_products.txt")]
    products: String,

    /// Author stamped on every record
    #[arg(long, default_value = "cli")]
    author: String,
}

/// Stand-in model when no API key is configured; every fallback call
/// resolves to the degraded record.
struct DisabledModel;

#[async_trait]
impl ExtractionModel for DisabledModel {
    async fn complete(&self, _system: &str, _user: &str) -> Result<String> {
        Err(anyhow!("extraction model not configured"))
    }
}

struct StdoutSink;

#[async_trait]
impl RowSink for StdoutSink {
    async fn append_row(&self, row: &[String; 7]) -> Result<()> {
        println!("row: {}", row.join(" | "));
        Ok(())
    }
}

struct StdoutReplier;

#[async_trait]
impl Replier for StdoutReplier {
    async fn reply(&self, text: &str) -> Result<()> {
        println!("{text}");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let catalog = Catalog::from_files(&args.customers, &args.products)?;
    let config = IntakeConfig::default();

    let model: Arc<dyn ExtractionModel> = match OpenAiModel::from_env() {
        Ok(model) => Arc::new(model),
        Err(e) => {
            warn!("Running without extraction model: {e}");
            Arc::new(DisabledModel)
        }
    };

    let intake = OrderIntake::new(&config, catalog, model);

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        intake
            .process_message(&line, &args.author, &StdoutSink, &StdoutReplier)
            .await;
    }

    Ok(())
}
