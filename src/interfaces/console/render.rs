use crate::application::reports::{Availability, DailyIncome};
use crate::application::service::Invoice;
use crate::domain::ledger::{LedgerEntry, Ticket};
use crate::domain::slot::Slot;
use crate::domain::user::User;
use chrono::{DateTime, Local, TimeDelta, Utc};
use std::io::{self, Write};

const RULE: &str = "=======================================================";

pub fn local_time(ts: &DateTime<Utc>) -> String {
    ts.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string()
}

pub fn duration_text(duration: TimeDelta) -> String {
    let minutes = duration.num_minutes().max(0);
    format!("{} hours, {} minutes", minutes / 60, minutes % 60)
}

pub fn header<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    writeln!(out, "{RULE}")?;
    writeln!(out, "  {title}")?;
    writeln!(out, "{RULE}")
}

pub fn menu<W: Write>(out: &mut W, title: &str, items: &[(&str, &str)]) -> io::Result<()> {
    writeln!(out, "\n--- {title} ---")?;
    for (key, label) in items {
        writeln!(out, "{key}. {label}")?;
    }
    writeln!(out, "---------------------------------")
}

pub fn availability<W: Write>(out: &mut W, rows: &[Availability]) -> io::Result<()> {
    writeln!(out, "--- Parking Availability ---")?;
    for row in rows {
        writeln!(out, "{}: {} Free / {} Total", row.category, row.free, row.total)?;
    }
    writeln!(out, "----------------------------")
}

pub fn ticket<W: Write>(out: &mut W, ticket: &Ticket) -> io::Result<()> {
    writeln!(out, "\n--- Entry Ticket ---")?;
    writeln!(out, "Ticket Number: {}", ticket.ticket)?;
    writeln!(out, "Owner: {}", ticket.owner)?;
    writeln!(out, "Vehicle Number: {}", ticket.vehicle)?;
    writeln!(out, "Vehicle Type: {}", ticket.category)?;
    writeln!(out, "Slot Number: {}", ticket.slot)?;
    writeln!(out, "Entry Time: {}", local_time(&ticket.entry_time))?;
    writeln!(out, "--------------------")
}

pub fn invoice<W: Write>(out: &mut W, invoice: &Invoice) -> io::Result<()> {
    let Invoice { ticket, bill } = invoice;
    writeln!(out, "\n--- Parking Bill ---")?;
    writeln!(out, "Ticket Number: {}", ticket.ticket)?;
    writeln!(out, "Vehicle Number: {}", ticket.vehicle)?;
    writeln!(out, "Owner: {}", ticket.owner)?;
    writeln!(out, "Entry Time: {}", local_time(&ticket.entry_time))?;
    writeln!(out, "Exit Time:  {}", local_time(&bill.exit_time))?;
    writeln!(out, "Duration:   {}", duration_text(bill.duration))?;
    writeln!(out, "Billed Hours: {}", bill.billed_hours)?;
    writeln!(out, "Hourly Rate: ${:.2}", bill.hourly_rate)?;
    writeln!(out, "--------------------")?;
    writeln!(out, "Total Fee:  ${:.2}", bill.fee)?;
    writeln!(out, "--------------------")
}

pub fn parked<W: Write>(out: &mut W, entries: &[LedgerEntry]) -> io::Result<()> {
    if entries.is_empty() {
        return writeln!(out, "The parking lot is currently empty.");
    }
    writeln!(
        out,
        "{:<10}{:<15}{:<20}{:<20}",
        "Slot", "Vehicle No.", "Owner", "Entry Time"
    )?;
    writeln!(out, "{}", "-".repeat(65))?;
    for entry in entries {
        writeln!(
            out,
            "{:<10}{:<15}{:<20}{:<20}",
            entry.slot,
            entry.vehicle,
            entry.owner,
            local_time(&entry.entry_time)
        )?;
    }
    Ok(())
}

pub fn daily_income<W: Write>(out: &mut W, report: &DailyIncome) -> io::Result<()> {
    let date = report.date.format("%Y-%m-%d");
    if report.exits.is_empty() {
        return writeln!(out, "No vehicles have exited and paid today ({date}).");
    }
    writeln!(out, "Total Vehicles Exited Today: {}", report.exits.len())?;
    writeln!(out, "Total Income for {date}: ${:.2}", report.total)?;
    writeln!(out, "\n--- Individual Records ---")?;
    for entry in &report.exits {
        let exit = entry
            .exit_time
            .map(|ts| ts.with_timezone(&Local).format("%H:%M:%S").to_string())
            .unwrap_or_default();
        let fee = entry.fee.unwrap_or_default();
        writeln!(out, "- {} ({exit}): ${fee:.2}", entry.vehicle)?;
    }
    Ok(())
}

pub fn slots<W: Write>(out: &mut W, slots: &[Slot]) -> io::Result<()> {
    writeln!(out, "Current Slots:")?;
    for slot in slots {
        writeln!(out, "- {} ({})", slot.id, slot.category)?;
    }
    Ok(())
}

pub fn users<W: Write>(out: &mut W, users: &[User]) -> io::Result<()> {
    writeln!(out, "Current Users:")?;
    for user in users {
        writeln!(out, "- {} ({})", user.username, user.role)?;
    }
    Ok(())
}
