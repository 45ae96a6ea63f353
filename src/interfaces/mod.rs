//! Adapters between the parking ledger and the outside world: the CSV record
//! format and the operator console.

pub mod console;
pub mod csv;
