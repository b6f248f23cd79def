use std::path::PathBuf;
use std::sync::Arc;
use clap::{Parser, Subcommand};
use log::info;
use tokio::io::BufReader;
use crate::config::LookupConfig;
use crate::viacep::ViaCepClient;

mod batch;
mod config;
mod form;
mod input;
mod record;
mod render;
mod session;
mod terminal;
#[cfg(test)]
mod testing;
mod utils;
mod viacep;

/// Look up Brazilian postal codes (CEP) on ViaCEP
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    #[command(flatten)]
    config: LookupConfig,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// interactive form, one line per edit of the postal code field (default)
    Form,
    /// look a single postal code up
    Lookup {
        cep: String,
        /// print the raw record as JSON
        #[arg(long)]
        json: bool,
    },
    /// look up every postal code in a file, one per line, and save the results as CSV
    Batch {
        input: PathBuf,
        #[arg(short, long, default_value = "result/addresses.csv")]
        output: PathBuf,
        #[arg(long, default_value_t = 10)]
        concurrency: usize,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    install_tracing();
    color_eyre::install()?;

    let cli = Cli::parse();
    match cli.command.unwrap_or(Command::Form) {
        Command::Form => run_form(&cli.config).await,
        Command::Lookup { cep, json } => run_lookup(&cli.config, &cep, json).await,
        Command::Batch { input, output, concurrency } => run_batch(&cli.config, input, output, concurrency).await,
    }
}

fn install_tracing() {
    use tracing_error::ErrorLayer;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::{fmt, EnvFilter};

    let fmt_layer = fmt::layer()
        .with_target(false)
        .with_writer(std::io::stderr);
    let filter_layer = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();
}

async fn run_form(config: &LookupConfig) -> color_eyre::Result<()> {
    let client = Arc::new(ViaCepClient::new(config)?);
    let stdin = BufReader::new(tokio::io::stdin());
    let mut stdout = std::io::stdout();
    terminal::run_form(client, config.completion_rule(), stdin, &mut stdout).await
}

async fn run_lookup(config: &LookupConfig, cep: &str, json: bool) -> color_eyre::Result<()> {
    let client = ViaCepClient::new(config)?;
    let mut stdout = std::io::stdout();
    terminal::run_lookup(&client, config.completion_rule(), cep, json, &mut stdout).await
}

async fn run_batch(config: &LookupConfig, input: PathBuf, output: PathBuf, concurrency: usize) -> color_eyre::Result<()> {
    let codes = batch::read_codes(&input)?;
    info!("read [{}] postal codes from [{}]", codes.len(), input.display());

    let client = ViaCepClient::new(config)?;
    let records = batch::lookup_codes(&client, codes, config.completion_rule(), concurrency).await;

    info!("saving records to [{}]", output.display());
    batch::save_records(&records, &output)
}
