use clap::Parser;
use feeplan::application::desk::PaymentDesk;
use feeplan::domain::ports::{CourseCatalogBox, PaymentGatewayBox, PaymentStore, PaymentStoreBox};
use feeplan::infrastructure::in_memory::{InMemoryCourseCatalog, InMemoryPaymentStore};
#[cfg(feature = "storage-rocksdb")]
use feeplan::infrastructure::rocksdb::RocksDbPaymentStore;
use feeplan::infrastructure::sandbox::SandboxGateway;
use feeplan::interfaces::csv::payment_reader::PaymentReader;
use feeplan::interfaces::csv::status_writer::{StatusRow, StatusWriter};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Summarizes every student's payment obligation from a payments CSV export.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Payments CSV export
    input: PathBuf,

    /// Fee string of a selected course (e.g. "₹70,000"); repeat for
    /// multiple courses. The cheapest course sets the base fee.
    #[arg(long = "fee", required = true)]
    fees: Vec<String>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[cfg(feature = "storage-rocksdb")]
fn build_store(db_path: Option<PathBuf>) -> Result<PaymentStoreBox> {
    match db_path {
        Some(path) => Ok(Box::new(
            RocksDbPaymentStore::open(path).into_diagnostic()?,
        )),
        None => Ok(Box::new(InMemoryPaymentStore::new())),
    }
}

#[cfg(not(feature = "storage-rocksdb"))]
fn build_store(db_path: Option<PathBuf>) -> Result<PaymentStoreBox> {
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
        );
    }
    Ok(Box::new(InMemoryPaymentStore::new()))
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let payments: PaymentStoreBox = build_store(cli.db_path)?;

    // Load the export; unreadable rows are reported and skipped.
    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = PaymentReader::new(file);
    for result in reader.payments() {
        match result {
            Ok(payment) => payments.record(payment).await.into_diagnostic()?,
            Err(e) => eprintln!("Error reading payment: {}", e),
        }
    }

    let catalog: CourseCatalogBox = Box::new(InMemoryCourseCatalog::with_default_fees(cli.fees));
    let gateway: PaymentGatewayBox = Box::new(SandboxGateway::new());
    let desk = PaymentDesk::new(payments, catalog, gateway);

    let mut rows = Vec::new();
    for student_id in desk.student_ids().await.into_diagnostic()? {
        let (_, state) = desk.obligation(&student_id).await.into_diagnostic()?;
        rows.push(StatusRow::new(student_id, &state));
    }

    let stdout = io::stdout();
    let mut writer = StatusWriter::new(stdout.lock());
    writer.write_rows(rows).into_diagnostic()?;

    Ok(())
}
