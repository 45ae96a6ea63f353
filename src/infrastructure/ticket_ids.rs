use crate::domain::ports::TicketIdGenerator;
use chrono::{DateTime, Local, Utc};
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

/// Ticket numbers derived from the wall clock: `T` followed by
/// `yyMMddHHmmssfff` in local time.
///
/// Two tickets issued within the same millisecond get a `-2`, `-3`, ...
/// suffix so numbers stay unique within a process.
#[derive(Debug, Default)]
pub struct TimestampTicketIds {
    last: Mutex<Option<(String, u32)>>,
}

impl TimestampTicketIds {
    pub fn new() -> Self {
        Self::default()
    }

    fn issue_at(&self, at: DateTime<Utc>) -> String {
        let base = format!("T{}", at.with_timezone(&Local).format("%y%m%d%H%M%S%3f"));
        let mut last = self.last.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some((prev, count)) = last.as_mut()
            && *prev == base
        {
            *count += 1;
            return format!("{base}-{count}");
        }
        *last = Some((base.clone(), 1));
        base
    }
}

impl TicketIdGenerator for TimestampTicketIds {
    fn new_ticket_id(&self) -> String {
        self.issue_at(Utc::now())
    }
}

/// `T0001`, `T0002`, ... Predictable numbers for tests and demos.
#[derive(Debug, Default)]
pub struct SequentialTicketIds {
    next: AtomicU64,
}

impl SequentialTicketIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TicketIdGenerator for SequentialTicketIds {
    fn new_ticket_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        format!("T{n:04}")
    }
}
