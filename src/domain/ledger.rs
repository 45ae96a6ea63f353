use super::vehicle::{VehicleCategory, same_id, same_vehicle};
use crate::error::{ParkingError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// One parking session.
///
/// An entry is open while `exit_time` is unset. It is created on vehicle
/// entry and closed exactly once, on exit, by [`LedgerEntry::close`].
#[derive(Debug, Clone, PartialEq)]
pub struct LedgerEntry {
    pub ticket: String,
    pub vehicle: String,
    pub owner: String,
    pub category: VehicleCategory,
    pub slot: String,
    pub entry_time: DateTime<Utc>,
    pub exit_time: Option<DateTime<Utc>>,
    pub fee: Option<Decimal>,
}

impl LedgerEntry {
    pub fn open(
        ticket: String,
        vehicle: String,
        owner: String,
        category: VehicleCategory,
        slot: String,
        entry_time: DateTime<Utc>,
    ) -> Self {
        Self {
            ticket,
            vehicle,
            owner,
            category,
            slot,
            entry_time,
            exit_time: None,
            fee: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.exit_time.is_none()
    }

    pub fn is_for_vehicle(&self, vehicle: &str) -> bool {
        same_vehicle(&self.vehicle, vehicle)
    }

    pub fn occupies(&self, slot: &str) -> bool {
        self.is_open() && same_id(&self.slot, slot)
    }

    /// Records the exit. There is no way back: closing twice is rejected
    /// so a session can never be charged again.
    pub fn close(&mut self, exit_time: DateTime<Utc>, fee: Decimal) -> Result<()> {
        if !self.is_open() {
            return Err(ParkingError::EntryClosed {
                ticket: self.ticket.clone(),
            });
        }
        self.exit_time = Some(exit_time);
        self.fee = Some(fee);
        Ok(())
    }
}

/// What the operator hands the driver on entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Ticket {
    pub ticket: String,
    pub vehicle: String,
    pub owner: String,
    pub category: VehicleCategory,
    pub slot: String,
    pub entry_time: DateTime<Utc>,
}

impl From<&LedgerEntry> for Ticket {
    fn from(entry: &LedgerEntry) -> Self {
        Self {
            ticket: entry.ticket.clone(),
            vehicle: entry.vehicle.clone(),
            owner: entry.owner.clone(),
            category: entry.category,
            slot: entry.slot.clone(),
            entry_time: entry.entry_time,
        }
    }
}
