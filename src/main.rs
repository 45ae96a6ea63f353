use clap::Parser;
use miette::{IntoDiagnostic, Result};
use parkledger::application::record_store::RecordStore;
use parkledger::application::service::ParkingService;
use parkledger::config::Settings;
use parkledger::domain::ports::StorageBox;
use parkledger::infrastructure::clock::SystemClock;
use parkledger::infrastructure::csv_files::CsvFileStorage;
use parkledger::infrastructure::ticket_ids::TimestampTicketIds;
use parkledger::interfaces::console::Console;
use std::io;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding users.csv, slots.csv and parking_ledger.csv
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// TOML config file, which must exist (defaults to parkledger.toml in the
    /// data directory, read only if present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(env_filter)
        .init();
}

#[cfg(feature = "storage-rocksdb")]
fn open_storage(data_dir: &Path, db_path: Option<PathBuf>) -> Result<StorageBox> {
    use parkledger::infrastructure::rocksdb::RocksDBStorage;

    if let Some(db_path) = db_path {
        let storage = RocksDBStorage::open(db_path).into_diagnostic()?;
        return Ok(Box::new(storage));
    }
    Ok(Box::new(CsvFileStorage::open(data_dir).into_diagnostic()?))
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_storage(data_dir: &Path, db_path: Option<PathBuf>) -> Result<StorageBox> {
    if db_path.is_some() {
        eprintln!(
            "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to CSV file storage."
        );
    }
    Ok(Box::new(CsvFileStorage::open(data_dir).into_diagnostic()?))
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let settings =
        Settings::resolve(cli.data_dir.as_deref(), cli.config.as_deref()).into_diagnostic()?;
    let storage = open_storage(&settings.data_dir, cli.db_path)?;

    let loaded = RecordStore::load(storage.as_ref()).await;
    for (kind, e) in &loaded.fallbacks {
        eprintln!("Warning: could not load {kind} records ({e}). Using built-in defaults.");
    }

    let mut service = ParkingService::new(
        loaded.store,
        storage,
        Box::new(SystemClock),
        Box::new(TimestampTicketIds::new()),
        settings.rates,
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    Console::new(&mut service, stdin.lock(), stdout.lock())
        .run()
        .await
        .into_diagnostic()?;

    Ok(())
}
