use super::record_store::RecordStore;
use super::reports::{self, Availability, DailyIncome};
use crate::domain::allocation::{self, EntryRequest};
use crate::domain::billing::{self, Bill, RateTable};
use crate::domain::ledger::{LedgerEntry, Ticket};
use crate::domain::ports::{ClockBox, RecordKind, StorageBox, TicketIdsBox};
use crate::domain::slot::Slot;
use crate::domain::user::User;
use crate::domain::vehicle::{VehicleCategory, normalize_vehicle_id};
use crate::error::{ParkingError, Result};
use chrono::NaiveDate;

/// The result of a committed change, with the save failure, if any.
///
/// A failed save never undoes the change in memory; the operator is told
/// the change may not survive a restart.
#[derive(Debug)]
pub struct Committed<T> {
    pub value: T,
    pub save_error: Option<ParkingError>,
}

impl<T> Committed<T> {
    pub fn is_durable(&self) -> bool {
        self.save_error.is_none()
    }
}

/// What the operator sees at the exit gate: the session and its bill.
/// Shown as a quote before payment and kept as the receipt after.
#[derive(Debug, Clone, PartialEq)]
pub struct Invoice {
    pub ticket: Ticket,
    pub bill: Bill,
}

#[derive(Debug)]
pub enum ExitOutcome {
    /// The fee was accepted and the entry closed.
    Paid(Committed<Invoice>),
    /// The fee was refused; the vehicle is still parked.
    Declined(Invoice),
}

/// Sequences entry and exit for the parking lot.
///
/// Owns the record store and writes through to storage after every
/// committed change. Methods take `&mut self`, so the "find a free slot,
/// then assign it" and "check for a duplicate, then record" steps can never
/// interleave with another operation.
pub struct ParkingService {
    store: RecordStore,
    storage: StorageBox,
    clock: ClockBox,
    ticket_ids: TicketIdsBox,
    rates: RateTable,
}

impl ParkingService {
    pub fn new(
        store: RecordStore,
        storage: StorageBox,
        clock: ClockBox,
        ticket_ids: TicketIdsBox,
        rates: RateTable,
    ) -> Self {
        Self {
            store,
            storage,
            clock,
            ticket_ids,
            rates,
        }
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn rates(&self) -> &RateTable {
        &self.rates
    }

    pub fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        match self
            .store
            .users()
            .iter()
            .find(|user| user.matches(username, password))
        {
            Some(user) => {
                tracing::info!(user = %user.username, role = %user.role, "Login succeeded");
                Ok(user.clone())
            }
            None => {
                tracing::warn!(user = %username.trim(), "Login failed");
                Err(ParkingError::InvalidCredentials)
            }
        }
    }

    /// Screens a vehicle number before the rest of the entry is collected.
    /// Returns the normalized number.
    pub fn check_entry(&self, vehicle: &str) -> Result<String> {
        let vehicle = normalize_vehicle_id(vehicle)?;
        if allocation::find_open_entry(self.store.ledger(), &vehicle).is_some() {
            return Err(ParkingError::DuplicateVehicle { vehicle });
        }
        Ok(vehicle)
    }

    /// Parks a vehicle in the first free slot of its category.
    pub async fn enter_vehicle(
        &mut self,
        vehicle: &str,
        owner: &str,
        category: VehicleCategory,
    ) -> Result<Committed<Ticket>> {
        let request = EntryRequest {
            vehicle: normalize_vehicle_id(vehicle)?,
            owner: owner.trim().to_string(),
            category,
        };

        let entry = allocation::allocate_slot(
            &request,
            self.store.ledger(),
            self.store.slots(),
            self.ticket_ids.new_ticket_id(),
            self.clock.now(),
        )?;
        let ticket = Ticket::from(&entry);
        self.store.append(entry)?;

        tracing::info!(
            ticket = %ticket.ticket,
            vehicle = %ticket.vehicle,
            slot = %ticket.slot,
            "Vehicle entered"
        );
        Ok(self.commit(RecordKind::Ledger, ticket).await)
    }

    /// Quotes the fee for a parked vehicle and closes its entry only if
    /// `confirm` accepts the quote.
    pub async fn exit_vehicle<F>(&mut self, vehicle: &str, confirm: F) -> Result<ExitOutcome>
    where
        F: FnOnce(&Invoice) -> bool,
    {
        let vehicle = normalize_vehicle_id(vehicle)?;
        let entry = allocation::find_open_entry(self.store.ledger(), &vehicle)
            .ok_or_else(|| ParkingError::VehicleNotFound {
                vehicle: vehicle.clone(),
            })?;

        let bill = billing::compute_bill(entry, self.clock.now(), &self.rates)?;
        let invoice = Invoice {
            ticket: Ticket::from(entry),
            bill,
        };

        if !confirm(&invoice) {
            tracing::info!(ticket = %invoice.ticket.ticket, "Exit declined");
            return Ok(ExitOutcome::Declined(invoice));
        }

        let entry = self
            .store
            .entry_mut(&invoice.ticket.ticket)
            .ok_or_else(|| ParkingError::VehicleNotFound {
                vehicle: vehicle.clone(),
            })?;
        billing::close_entry(entry, &invoice.bill)?;

        tracing::info!(
            ticket = %invoice.ticket.ticket,
            vehicle = %invoice.ticket.vehicle,
            fee = %invoice.bill.fee,
            "Vehicle exited"
        );
        Ok(ExitOutcome::Paid(self.commit(RecordKind::Ledger, invoice).await))
    }

    /// Settles a ticket directly. Refuses a ticket that is already closed.
    pub async fn close_ticket(&mut self, ticket: &str, bill: &Bill) -> Result<Committed<()>> {
        let entry = self
            .store
            .entry_mut(ticket)
            .ok_or_else(|| ParkingError::validation(format!("Unknown ticket {ticket}")))?;
        billing::close_entry(entry, bill)?;
        Ok(self.commit(RecordKind::Ledger, ()).await)
    }

    pub fn available_slots(&self, category: VehicleCategory) -> usize {
        allocation::available_slots(category, self.store.ledger(), self.store.slots())
    }

    pub fn availability(&self) -> Vec<Availability> {
        reports::availability(self.store.slots(), self.store.ledger())
    }

    pub fn currently_parked(&self) -> Vec<LedgerEntry> {
        reports::currently_parked(self.store.ledger())
    }

    pub fn daily_income(&self, date: NaiveDate) -> DailyIncome {
        reports::daily_income(self.store.ledger(), date)
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.now().with_timezone(&chrono::Local).date_naive()
    }

    /// Slots in registration order.
    pub fn list_slots(&self) -> &[Slot] {
        self.store.slots()
    }

    pub fn list_users(&self) -> &[User] {
        self.store.users()
    }

    pub async fn add_slot(&mut self, id: &str, category: VehicleCategory) -> Result<Committed<Slot>> {
        let slot = Slot::new(id, category)?;
        self.store.add_slot(slot.clone())?;
        tracing::info!(slot = %slot.id, category = %slot.category, "Slot added");
        Ok(self.commit(RecordKind::Slots, slot).await)
    }

    pub async fn remove_slot(&mut self, id: &str) -> Result<Committed<Slot>> {
        let slot = self.store.remove_slot(id)?;
        tracing::info!(slot = %slot.id, "Slot removed");
        Ok(self.commit(RecordKind::Slots, slot).await)
    }

    /// Writes every record kind.
    pub async fn save_all(&self) -> Result<()> {
        self.store.persist_all(self.storage.as_ref()).await
    }

    async fn commit<T>(&self, kind: RecordKind, value: T) -> Committed<T> {
        let save_error = match self.store.persist(self.storage.as_ref(), kind).await {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(kind = %kind, error = %e, "Change kept in memory but not saved");
                Some(e)
            }
        };
        Committed { value, save_error }
    }
}
