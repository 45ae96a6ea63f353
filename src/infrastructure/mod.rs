//! Implementations of the domain ports: storage providers, clocks and
//! ticket-number generators.

pub mod clock;
pub mod csv_files;
pub mod in_memory;
#[cfg(feature = "storage-rocksdb")]
pub mod rocksdb;
pub mod ticket_ids;
