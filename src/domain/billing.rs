use super::ledger::LedgerEntry;
use super::vehicle::VehicleCategory;
use crate::error::{ParkingError, Result};
use chrono::{DateTime, TimeDelta, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::collections::HashMap;

const MILLIS_PER_HOUR: i64 = 3_600_000;

/// A per-hour price. Always strictly positive.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct HourlyRate(Decimal);

impl HourlyRate {
    pub fn new(value: Decimal) -> Result<Self> {
        if value > Decimal::ZERO {
            Ok(Self(value))
        } else {
            Err(ParkingError::validation("Hourly rate must be positive"))
        }
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

impl TryFrom<Decimal> for HourlyRate {
    type Error = ParkingError;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

/// Maps every vehicle category to its hourly rate.
#[derive(Debug, Clone, PartialEq)]
pub struct RateTable {
    rates: HashMap<VehicleCategory, HourlyRate>,
}

impl RateTable {
    /// Builds a table; every category must be priced.
    pub fn new(rates: HashMap<VehicleCategory, HourlyRate>) -> Result<Self> {
        if let Some(missing) = VehicleCategory::ALL
            .iter()
            .find(|category| !rates.contains_key(category))
        {
            return Err(ParkingError::validation(format!(
                "No hourly rate configured for {missing}"
            )));
        }
        Ok(Self { rates })
    }

    pub fn rate(&self, category: VehicleCategory) -> HourlyRate {
        // `new` guarantees every category is present.
        self.rates[&category]
    }

    pub fn with_rate(mut self, category: VehicleCategory, rate: HourlyRate) -> Self {
        self.rates.insert(category, rate);
        self
    }
}

impl Default for RateTable {
    /// Four-wheelers pay 5.00/hour; every other category pays 2.00/hour.
    fn default() -> Self {
        let rates = VehicleCategory::ALL
            .into_iter()
            .map(|category| {
                let rate = match category {
                    VehicleCategory::FourWheeler => dec!(5.00),
                    _ => dec!(2.00),
                };
                (category, HourlyRate(rate))
            })
            .collect();
        Self { rates }
    }
}

/// A fee quote for an open entry. Nothing is recorded until the operator
/// accepts it.
#[derive(Debug, Clone, PartialEq)]
pub struct Bill {
    pub exit_time: DateTime<Utc>,
    pub duration: TimeDelta,
    pub billed_hours: i64,
    pub hourly_rate: Decimal,
    pub fee: Decimal,
}

/// Hours charged for a stay: started hours rounded up, never less than one.
pub fn billed_hours(duration: TimeDelta) -> i64 {
    let millis = duration.num_milliseconds();
    if millis <= 0 {
        return 1;
    }
    ((millis + MILLIS_PER_HOUR - 1) / MILLIS_PER_HOUR).max(1)
}

/// Quotes the fee for leaving at `now`.
///
/// The entry is not touched; closing it is up to the caller once the quote
/// has been accepted.
pub fn compute_bill(entry: &LedgerEntry, now: DateTime<Utc>, rates: &RateTable) -> Result<Bill> {
    if !entry.is_open() {
        return Err(ParkingError::EntryClosed {
            ticket: entry.ticket.clone(),
        });
    }

    let duration = now - entry.entry_time;
    let hours = billed_hours(duration);
    let hourly_rate = rates.rate(entry.category).value();

    Ok(Bill {
        exit_time: now,
        duration,
        billed_hours: hours,
        hourly_rate,
        fee: Decimal::from(hours) * hourly_rate,
    })
}

/// Settles an open entry with an accepted bill. Fails if the entry was
/// already closed.
pub fn close_entry(entry: &mut LedgerEntry, bill: &Bill) -> Result<()> {
    entry.close(bill.exit_time, bill.fee)
}
