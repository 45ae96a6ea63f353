use super::ledger::LedgerEntry;
use super::slot::Slot;
use super::vehicle::VehicleCategory;
use crate::error::{ParkingError, Result};
use chrono::{DateTime, Utc};
use std::collections::HashSet;

/// A vehicle asking to be parked. `vehicle` is expected to be normalized.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryRequest {
    pub vehicle: String,
    pub owner: String,
    pub category: VehicleCategory,
}

/// Slot identifiers referenced by open entries, upper-cased.
pub fn occupied_slots(ledger: &[LedgerEntry]) -> HashSet<String> {
    ledger
        .iter()
        .filter(|entry| entry.is_open())
        .map(|entry| entry.slot.to_uppercase())
        .collect()
}

pub fn find_open_entry<'a>(ledger: &'a [LedgerEntry], vehicle: &str) -> Option<&'a LedgerEntry> {
    ledger
        .iter()
        .find(|entry| entry.is_open() && entry.is_for_vehicle(vehicle))
}

/// Picks the first free slot of the requested category, in registration
/// order, and proposes a new open entry for it.
///
/// Nothing is mutated; the caller commits the returned entry.
pub fn allocate_slot(
    request: &EntryRequest,
    ledger: &[LedgerEntry],
    slots: &[Slot],
    ticket: String,
    now: DateTime<Utc>,
) -> Result<LedgerEntry> {
    if request.vehicle.trim().is_empty() {
        return Err(ParkingError::validation("Vehicle Number cannot be empty"));
    }

    if find_open_entry(ledger, &request.vehicle).is_some() {
        return Err(ParkingError::DuplicateVehicle {
            vehicle: request.vehicle.clone(),
        });
    }

    let occupied = occupied_slots(ledger);
    let slot = slots
        .iter()
        .filter(|slot| slot.category == request.category)
        .find(|slot| !occupied.contains(&slot.id.to_uppercase()))
        .ok_or(ParkingError::NoFreeSlot {
            category: request.category,
        })?;

    Ok(LedgerEntry::open(
        ticket,
        request.vehicle.clone(),
        request.owner.clone(),
        request.category,
        slot.id.clone(),
        now,
    ))
}

/// Free slots of `category` right now.
pub fn available_slots(category: VehicleCategory, ledger: &[LedgerEntry], slots: &[Slot]) -> usize {
    let occupied = occupied_slots(ledger);
    slots
        .iter()
        .filter(|slot| slot.category == category && !occupied.contains(&slot.id.to_uppercase()))
        .count()
}
