use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;

/// The three record collections kept in storage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecordKind {
    Users,
    Slots,
    Ledger,
}

impl RecordKind {
    pub const ALL: [RecordKind; 3] = [RecordKind::Users, RecordKind::Slots, RecordKind::Ledger];

    pub const fn name(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Slots => "slots",
            Self::Ledger => "parking_ledger",
        }
    }

    /// Column names, in persisted order.
    pub const fn header(self) -> &'static [&'static str] {
        match self {
            Self::Users => &["Username", "Password", "FullName", "Role"],
            Self::Slots => &["SlotNumber", "Type"],
            Self::Ledger => &[
                "TicketNumber",
                "VehicleNumber",
                "OwnerName",
                "Type",
                "AllocatedSlotNumber",
                "EntryTime",
                "ExitTime",
                "TotalFee",
            ],
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One persisted row, as text fields in header order.
pub type RawRecord = Vec<String>;

/// Durable load/save of whole record collections.
#[async_trait]
pub trait StorageProvider: Send + Sync {
    /// Returns `None` when nothing has ever been saved for `kind`.
    async fn load(&self, kind: RecordKind) -> Result<Option<Vec<RawRecord>>>;
    /// Replaces everything stored for `kind`.
    async fn save(&self, kind: RecordKind, records: Vec<RawRecord>) -> Result<()>;
}

pub type StorageBox = Box<dyn StorageProvider>;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub type ClockBox = Box<dyn Clock>;

pub trait TicketIdGenerator: Send + Sync {
    fn new_ticket_id(&self) -> String;
}

pub type TicketIdsBox = Box<dyn TicketIdGenerator>;
