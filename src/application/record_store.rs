use super::defaults::{default_slots, default_users};
use crate::domain::allocation::find_open_entry;
use crate::domain::ledger::LedgerEntry;
use crate::domain::ports::{RecordKind, StorageProvider};
use crate::domain::slot::Slot;
use crate::domain::user::User;
use crate::error::{ParkingError, Result};
use crate::interfaces::csv::records::{RecordCodec, decode_all, encode_all};
use std::collections::HashSet;

/// The in-memory copy of every record collection.
///
/// Slots keep their registration order, which is the order allocation
/// walks them in. The ledger is append-only.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    users: Vec<User>,
    slots: Vec<Slot>,
    ledger: Vec<LedgerEntry>,
}

/// A store loaded from storage, plus the kinds that had to fall back to
/// built-in defaults and why.
#[derive(Debug)]
pub struct LoadedStore {
    pub store: RecordStore,
    pub fallbacks: Vec<(RecordKind, ParkingError)>,
}

impl RecordStore {
    /// Builds a store, rejecting repeated slot ids and a ledger that breaks
    /// the occupancy rules.
    pub fn new(users: Vec<User>, slots: Vec<Slot>, ledger: Vec<LedgerEntry>) -> Result<Self> {
        check_slots(&slots)?;
        check_ledger(&ledger)?;
        Ok(Self {
            users,
            slots,
            ledger,
        })
    }

    pub fn with_defaults() -> Self {
        Self {
            users: default_users(),
            slots: default_slots(),
            ledger: Vec::new(),
        }
    }

    /// Loads every record kind. A kind that is missing, unreadable or
    /// corrupt is replaced by its built-in default instead of failing startup.
    pub async fn load(storage: &dyn StorageProvider) -> LoadedStore {
        let mut fallbacks = Vec::new();

        let users = load_kind(storage, &mut fallbacks, default_users).await;
        let mut slots = load_kind(storage, &mut fallbacks, default_slots).await;
        if let Err(e) = check_slots(&slots) {
            tracing::error!(error = %e, "Slot list repeats an id, using default slots");
            fallbacks.push((RecordKind::Slots, e));
            slots = default_slots();
        }
        let mut ledger: Vec<LedgerEntry> = load_kind(storage, &mut fallbacks, Vec::new).await;

        if let Err(e) = check_ledger(&ledger) {
            tracing::error!(error = %e, "Ledger violates occupancy rules, starting with an empty ledger");
            fallbacks.push((RecordKind::Ledger, e));
            ledger = Vec::new();
        }

        LoadedStore {
            store: Self {
                users,
                slots,
                ledger,
            },
            fallbacks,
        }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn ledger(&self) -> &[LedgerEntry] {
        &self.ledger
    }

    pub fn find_slot(&self, id: &str) -> Option<&Slot> {
        self.slots.iter().find(|slot| slot.has_id(id))
    }

    pub fn is_slot_occupied(&self, id: &str) -> bool {
        self.ledger.iter().any(|entry| entry.occupies(id.trim()))
    }

    pub fn entry_mut(&mut self, ticket: &str) -> Option<&mut LedgerEntry> {
        self.ledger.iter_mut().find(|entry| entry.ticket == ticket)
    }

    /// Commits a new open entry, re-checking every ledger rule so no path
    /// can leave two open entries on one vehicle or one slot.
    pub fn append(&mut self, entry: LedgerEntry) -> Result<()> {
        if self.ledger.iter().any(|e| e.ticket == entry.ticket) {
            return Err(ParkingError::validation(format!(
                "Ticket {} has already been issued",
                entry.ticket
            )));
        }
        if find_open_entry(&self.ledger, &entry.vehicle).is_some() {
            return Err(ParkingError::DuplicateVehicle {
                vehicle: entry.vehicle,
            });
        }
        match self.find_slot(&entry.slot) {
            None => {
                return Err(ParkingError::SlotNotFound { slot: entry.slot });
            }
            Some(slot) if slot.category != entry.category => {
                return Err(ParkingError::validation(format!(
                    "Slot {} does not take {}",
                    slot.id, entry.category
                )));
            }
            Some(_) => {}
        }
        if self.is_slot_occupied(&entry.slot) {
            return Err(ParkingError::SlotOccupied { slot: entry.slot });
        }
        self.ledger.push(entry);
        Ok(())
    }

    pub fn add_slot(&mut self, slot: Slot) -> Result<()> {
        if self.find_slot(&slot.id).is_some() {
            return Err(ParkingError::DuplicateSlot { slot: slot.id });
        }
        self.slots.push(slot);
        Ok(())
    }

    /// Removes a slot that no open entry references.
    pub fn remove_slot(&mut self, id: &str) -> Result<Slot> {
        let index = self
            .slots
            .iter()
            .position(|slot| slot.has_id(id))
            .ok_or_else(|| ParkingError::SlotNotFound {
                slot: id.trim().to_uppercase(),
            })?;
        if self.is_slot_occupied(&self.slots[index].id) {
            return Err(ParkingError::SlotOccupied {
                slot: self.slots[index].id.clone(),
            });
        }
        Ok(self.slots.remove(index))
    }

    /// Writes one record kind through the storage provider.
    pub async fn persist(&self, storage: &dyn StorageProvider, kind: RecordKind) -> Result<()> {
        let records = match kind {
            RecordKind::Users => encode_all(&self.users),
            RecordKind::Slots => encode_all(&self.slots),
            RecordKind::Ledger => encode_all(&self.ledger),
        };
        storage.save(kind, records).await
    }

    pub async fn persist_all(&self, storage: &dyn StorageProvider) -> Result<()> {
        for kind in RecordKind::ALL {
            self.persist(storage, kind).await?;
        }
        Ok(())
    }
}

async fn load_kind<T: RecordCodec>(
    storage: &dyn StorageProvider,
    fallbacks: &mut Vec<(RecordKind, ParkingError)>,
    default: fn() -> Vec<T>,
) -> Vec<T> {
    let loaded = match storage.load(T::KIND).await {
        Ok(None) => {
            tracing::info!(kind = %T::KIND, "No stored records, using defaults");
            return default();
        }
        Ok(Some(records)) => decode_all(&records),
        Err(e) => Err(e),
    };

    match loaded {
        Ok(items) => {
            tracing::debug!(kind = %T::KIND, count = items.len(), "Loaded records");
            items
        }
        Err(e) => {
            tracing::error!(kind = %T::KIND, error = %e, "Failed to load records, using defaults");
            fallbacks.push((T::KIND, e));
            default()
        }
    }
}

fn check_slots(slots: &[Slot]) -> Result<()> {
    let mut ids = HashSet::new();
    for slot in slots {
        if !ids.insert(slot.id.trim().to_uppercase()) {
            return Err(ParkingError::storage(format!(
                "slot {} is listed more than once",
                slot.id
            )));
        }
    }
    Ok(())
}

fn check_ledger(ledger: &[LedgerEntry]) -> Result<()> {
    let mut vehicles = HashSet::new();
    let mut slots = HashSet::new();
    let mut tickets = HashSet::new();
    for entry in ledger {
        if !tickets.insert(entry.ticket.as_str()) {
            return Err(ParkingError::storage(format!(
                "ticket {} appears more than once",
                entry.ticket
            )));
        }
        if !entry.is_open() {
            continue;
        }
        if !vehicles.insert(entry.vehicle.trim().to_uppercase()) {
            return Err(ParkingError::storage(format!(
                "vehicle {} has more than one open ticket",
                entry.vehicle
            )));
        }
        if !slots.insert(entry.slot.trim().to_uppercase()) {
            return Err(ParkingError::storage(format!(
                "slot {} has more than one open ticket",
                entry.slot
            )));
        }
    }
    Ok(())
}
