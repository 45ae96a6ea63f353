use crate::domain::ledger::LedgerEntry;
use crate::domain::slot::Slot;
use crate::domain::vehicle::VehicleCategory;
use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;
use std::collections::HashSet;

/// Free and total slot counts for one category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Availability {
    pub category: VehicleCategory,
    pub free: usize,
    pub total: usize,
}

/// Per-category availability for every category that has at least one slot.
pub fn availability(slots: &[Slot], ledger: &[LedgerEntry]) -> Vec<Availability> {
    let occupied: HashSet<String> = ledger
        .iter()
        .filter(|entry| entry.is_open())
        .map(|entry| entry.slot.to_uppercase())
        .collect();

    VehicleCategory::ALL
        .into_iter()
        .filter_map(|category| {
            let (total, free) = slots
                .iter()
                .filter(|slot| slot.category == category)
                .fold((0, 0), |(total, free), slot| {
                    let is_free = !occupied.contains(&slot.id.to_uppercase());
                    (total + 1, free + usize::from(is_free))
                });
            (total > 0).then_some(Availability {
                category,
                free,
                total,
            })
        })
        .collect()
}

/// Open entries, longest-parked first.
pub fn currently_parked(ledger: &[LedgerEntry]) -> Vec<LedgerEntry> {
    let mut parked: Vec<LedgerEntry> = ledger.iter().filter(|e| e.is_open()).cloned().collect();
    parked.sort_by_key(|entry| entry.entry_time);
    parked
}

#[derive(Debug, Clone, PartialEq)]
pub struct DailyIncome {
    pub date: NaiveDate,
    pub exits: Vec<LedgerEntry>,
    pub total: Decimal,
}

/// Entries closed on `date` (local calendar day), in exit order.
pub fn daily_income(ledger: &[LedgerEntry], date: NaiveDate) -> DailyIncome {
    let mut exits: Vec<LedgerEntry> = ledger
        .iter()
        .filter(|entry| {
            entry
                .exit_time
                .is_some_and(|exit| exit.with_timezone(&Local).date_naive() == date)
        })
        .cloned()
        .collect();
    exits.sort_by_key(|entry| entry.exit_time);

    let total = exits.iter().filter_map(|entry| entry.fee).sum();
    DailyIncome { date, exits, total }
}
