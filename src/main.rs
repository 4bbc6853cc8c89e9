use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use miette::{IntoDiagnostic, Result};
use rental_allocation::application::collector::{PaymentCollector, PaymentIntent};
use rental_allocation::domain::money::Money;
use rental_allocation::domain::obligation::ObligationId;
use rental_allocation::domain::payment::{PaymentDetails, PaymentMethod};
use rental_allocation::domain::schedule::ContractId;
use rental_allocation::error::PaymentError;
use rental_allocation::infrastructure::in_memory::{InMemoryObligationSource, InMemoryPaymentSink};
use rental_allocation::interfaces::csv::allocation_writer::AllocationWriter;
use rental_allocation::interfaces::csv::schedule_reader::{ScheduleBook, ScheduleReader};
use rust_decimal::Decimal;
use std::fs::File;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// One row per obligation
    Csv,
    /// Allocation, submitted batch and receipt
    Json,
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Payment schedule CSV file
    input: PathBuf,

    /// Contract to pay against
    #[arg(long)]
    contract: String,

    /// Amount tendered
    #[arg(long)]
    amount: Decimal,

    /// Obligation to pay in full regardless of ordering (repeatable)
    #[arg(long = "force")]
    force: Vec<String>,

    /// Restrict the payment to these obligations (repeatable). Defaults to all outstanding.
    #[arg(long = "select")]
    select: Vec<String>,

    #[arg(long, value_enum, default_value_t = PaymentMethod::Cash)]
    method: PaymentMethod,

    /// Payment date, YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<NaiveDate>,

    /// Free-text payment reference
    #[arg(long)]
    reference: Option<String>,

    #[arg(long)]
    notes: Option<String>,

    /// Reference to an uploaded receipt
    #[arg(long)]
    receipt: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    output: OutputFormat,
}

impl Cli {
    fn intent(&self) -> PaymentIntent {
        let paid_on = self.date.unwrap_or_else(|| Local::now().date_naive());
        let mut intent = PaymentIntent::new(
            ContractId::new(self.contract.clone()),
            Money::new(self.amount),
            paid_on,
        );
        if !self.select.is_empty() {
            intent.selected = Some(self.select.iter().map(ObligationId::new).collect());
        }
        intent.forced_full = self.force.iter().map(ObligationId::new).collect();
        intent.details = PaymentDetails {
            method: self.method,
            reference: self.reference.clone(),
            notes: self.notes.clone(),
            receipt: self.receipt.clone(),
        };
        intent
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_ansi(io::stderr().is_terminal())
        .init();

    let cli = Cli::parse();

    // Load the schedule; bad rows are reported and skipped
    let file = File::open(&cli.input).into_diagnostic()?;
    let mut book = ScheduleBook::new();
    for entry in ScheduleReader::new(file).entries() {
        if let Err(e) = entry.and_then(|entry| book.insert(entry)) {
            warn!("Error reading schedule row: {}", e);
        }
    }

    let collector = PaymentCollector::new(
        Box::new(InMemoryObligationSource::from(book.into_balances())),
        Box::new(InMemoryPaymentSink::new()),
    );

    let outcome = match collector.collect(cli.intent()).await {
        Ok(outcome) => outcome,
        Err(PaymentError::AllocationError(e)) => return Err(e.into()),
        Err(e) => return Err(e).into_diagnostic(),
    };

    let stdout = io::stdout();
    match cli.output {
        OutputFormat::Csv => {
            let mut writer = AllocationWriter::new(stdout.lock());
            writer
                .write_allocation(&outcome.obligations, &outcome.allocation)
                .into_diagnostic()?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(stdout.lock(), &outcome).into_diagnostic()?;
            println!();
        }
    }

    Ok(())
}
