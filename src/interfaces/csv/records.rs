use crate::domain::ledger::LedgerEntry;
use crate::domain::ports::{RawRecord, RecordKind};
use crate::domain::slot::Slot;
use crate::domain::user::{User, UserRole};
use crate::domain::vehicle::VehicleCategory;
use crate::error::{ParkingError, Result};
use chrono::{DateTime, Local, NaiveDateTime, SecondsFormat, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use std::str::FromStr;

/// Conversion between a domain record and its persisted text fields.
///
/// Decoding validates codes against their closed sets; anything that does
/// not fit is a storage error rather than a panic.
pub trait RecordCodec: Sized {
    const KIND: RecordKind;

    fn encode(&self) -> RawRecord;
    fn decode(record: &[String]) -> Result<Self>;
}

pub fn encode_all<T: RecordCodec>(items: &[T]) -> Vec<RawRecord> {
    items.iter().map(RecordCodec::encode).collect()
}

pub fn decode_all<T: RecordCodec>(records: &[RawRecord]) -> Result<Vec<T>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            T::decode(record).map_err(|e| {
                ParkingError::storage(format!("{} row {}: {}", T::KIND, index + 1, e))
            })
        })
        .collect()
}

fn parse_row<T: DeserializeOwned>(kind: RecordKind, fields: &[String]) -> Result<T> {
    let expected = kind.header().len();
    if fields.len() != expected {
        return Err(ParkingError::storage(format!(
            "expected {expected} fields, found {}",
            fields.len()
        )));
    }
    csv::StringRecord::from(fields.to_vec())
        .deserialize(None)
        .map_err(|e| ParkingError::storage(e.to_string()))
}

/// Numeric code columns tolerate surrounding spaces; text columns are kept
/// as written.
fn trimmed_code<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u8, D::Error> {
    let text = String::deserialize(deserializer)?;
    text.trim().parse().map_err(serde::de::Error::custom)
}

/// Timestamps are written as RFC 3339 in UTC with microsecond precision.
pub fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Reads RFC 3339 timestamps, falling back to offset-less ISO 8601 text,
/// which is taken as local time.
pub fn parse_timestamp(text: &str) -> Result<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(text) {
        return Ok(ts.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .map_err(|e| ParkingError::storage(format!("invalid timestamp '{text}': {e}")))?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|ts| ts.with_timezone(&Utc))
        .ok_or_else(|| ParkingError::storage(format!("timestamp '{text}' does not exist locally")))
}

fn parse_fee(text: &str) -> Result<Decimal> {
    Decimal::from_str(text.trim())
        .map_err(|e| ParkingError::storage(format!("invalid fee '{text}': {e}")))
}

#[derive(Deserialize)]
struct UserRow {
    username: String,
    password: String,
    full_name: String,
    #[serde(deserialize_with = "trimmed_code")]
    role: u8,
}

impl RecordCodec for User {
    const KIND: RecordKind = RecordKind::Users;

    fn encode(&self) -> RawRecord {
        vec![
            self.username.clone(),
            self.password.clone(),
            self.full_name.clone(),
            self.role.code().to_string(),
        ]
    }

    fn decode(record: &[String]) -> Result<Self> {
        let row: UserRow = parse_row(Self::KIND, record)?;
        if row.username.trim().is_empty() {
            return Err(ParkingError::storage("empty username"));
        }
        Ok(Self {
            username: row.username.trim().to_string(),
            password: row.password,
            full_name: row.full_name,
            role: UserRole::from_code(row.role)?,
        })
    }
}

#[derive(Deserialize)]
struct SlotRow {
    id: String,
    #[serde(deserialize_with = "trimmed_code")]
    category: u8,
}

impl RecordCodec for Slot {
    const KIND: RecordKind = RecordKind::Slots;

    fn encode(&self) -> RawRecord {
        vec![self.id.clone(), self.category.code().to_string()]
    }

    fn decode(record: &[String]) -> Result<Self> {
        let row: SlotRow = parse_row(Self::KIND, record)?;
        let category = VehicleCategory::from_code(row.category)?;
        Slot::new(&row.id, category).map_err(|e| ParkingError::storage(e.to_string()))
    }
}

#[derive(Deserialize)]
struct LedgerRow {
    ticket: String,
    vehicle: String,
    owner: String,
    #[serde(deserialize_with = "trimmed_code")]
    category: u8,
    slot: String,
    entry_time: String,
    exit_time: Option<String>,
    fee: Option<String>,
}

impl RecordCodec for LedgerEntry {
    const KIND: RecordKind = RecordKind::Ledger;

    fn encode(&self) -> RawRecord {
        vec![
            self.ticket.clone(),
            self.vehicle.clone(),
            self.owner.clone(),
            self.category.code().to_string(),
            self.slot.clone(),
            format_timestamp(&self.entry_time),
            self.exit_time.as_ref().map(format_timestamp).unwrap_or_default(),
            self.fee.map(|fee| fee.to_string()).unwrap_or_default(),
        ]
    }

    fn decode(record: &[String]) -> Result<Self> {
        let row: LedgerRow = parse_row(Self::KIND, record)?;

        if row.ticket.trim().is_empty() || row.vehicle.trim().is_empty() {
            return Err(ParkingError::storage("missing ticket or vehicle number"));
        }

        let exit_time = row.exit_time.filter(|s| !s.trim().is_empty());
        let fee = row.fee.filter(|s| !s.trim().is_empty());
        let (exit_time, fee) = match (exit_time, fee) {
            (None, None) => (None, None),
            (Some(exit), Some(fee)) => (Some(parse_timestamp(&exit)?), Some(parse_fee(&fee)?)),
            _ => {
                return Err(ParkingError::storage(
                    "exit time and fee must both be set or both be empty",
                ));
            }
        };

        Ok(Self {
            ticket: row.ticket.trim().to_string(),
            vehicle: row.vehicle.trim().to_string(),
            owner: row.owner,
            category: VehicleCategory::from_code(row.category)?,
            slot: row.slot.trim().to_string(),
            entry_time: parse_timestamp(&row.entry_time)?,
            exit_time,
            fee,
        })
    }
}
