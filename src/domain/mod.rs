//! Parking entities and the rules that govern them.
//!
//! Everything here is pure: slot allocation and billing read the current
//! records and propose new ones, they never touch storage.

pub mod allocation;
pub mod billing;
pub mod ledger;
pub mod ports;
pub mod slot;
pub mod user;
pub mod vehicle;
