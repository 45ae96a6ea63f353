use crate::config::ConfigError;
use crate::domain::vehicle::VehicleCategory;
use thiserror::Error;

/// Every failure the parking ledger can report.
///
/// Most variants are expected, operator-facing outcomes of a single menu
/// action. The storage family (`Storage`, `Csv`, `Io`) covers corrupt or
/// unreachable records and is the only path that involves the disk.
#[derive(Error, Debug)]
pub enum ParkingError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Vehicle {vehicle} is already parked")]
    DuplicateVehicle { vehicle: String },
    #[error("No free slots available for {category}")]
    NoFreeSlot { category: VehicleCategory },
    #[error("Vehicle {vehicle} not found in the parking lot")]
    VehicleNotFound { vehicle: String },
    #[error("Ticket {ticket} is already closed")]
    EntryClosed { ticket: String },
    #[error("A slot with number {slot} already exists")]
    DuplicateSlot { slot: String },
    #[error("Slot {slot} not found")]
    SlotNotFound { slot: String },
    #[error("Slot {slot} is occupied by an open ticket")]
    SlotOccupied { slot: String },
    #[error("Invalid username or password")]
    InvalidCredentials,
    #[error("Access denied: {0}")]
    AccessDenied(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error(transparent)]
    ConfigError(#[from] ConfigError),
}

impl ParkingError {
    pub fn storage(message: impl Into<String>) -> Self {
        Self::StorageError(message.into())
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }

    /// True for failures that come from the record files rather than from
    /// the operator's input.
    pub fn is_storage(&self) -> bool {
        matches!(
            self,
            Self::StorageError(_) | Self::CsvError(_) | Self::IoError(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, ParkingError>;
