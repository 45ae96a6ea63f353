//! Application layer: the record store, the parking service that sequences
//! entry and exit, and the read-only reports.
//!
//! `ParkingService` is the entry point. It owns the `RecordStore` and writes
//! each committed change through to the configured `StorageProvider`.

pub mod defaults;
pub mod record_store;
pub mod reports;
pub mod service;
