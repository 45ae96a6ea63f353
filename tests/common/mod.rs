#![allow(dead_code)]

use assert_cmd::cargo_bin;
use chrono::{TimeZone, Utc};
use parkledger::application::defaults::default_users;
use parkledger::application::record_store::RecordStore;
use parkledger::application::service::ParkingService;
use parkledger::domain::billing::RateTable;
use parkledger::domain::slot::Slot;
use parkledger::domain::vehicle::VehicleCategory;
use parkledger::infrastructure::clock::ManualClock;
use parkledger::infrastructure::in_memory::InMemoryStorage;
use parkledger::infrastructure::ticket_ids::SequentialTicketIds;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Output, Stdio};
use std::sync::Arc;

/// A command for the binary against `data_dir`, ready for `write_stdin`.
pub fn console(data_dir: &Path) -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(cargo_bin!("parkledger"));
    cmd.arg("--data-dir").arg(data_dir);
    cmd
}

/// Runs the binary against `data_dir`, feeding `script` on stdin.
pub fn run_console(data_dir: &Path, extra_args: &[&str], script: &str) -> Output {
    let mut child = Command::new(cargo_bin!("parkledger"))
        .arg("--data-dir")
        .arg(data_dir)
        .args(extra_args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to start parkledger");

    child
        .stdin
        .take()
        .unwrap()
        .write_all(script.as_bytes())
        .unwrap();
    child.wait_with_output().expect("Failed to wait for parkledger")
}

pub fn write_file(dir: &Path, name: &str, lines: &[&str]) {
    let mut content = lines.join("\n");
    content.push('\n');
    std::fs::write(dir.join(name), content).unwrap();
}

pub fn start_time() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
}

/// A service over the given slots with a manual clock and in-memory storage.
pub fn service_with_slots(
    slots: Vec<Slot>,
    storage: InMemoryStorage,
) -> (ParkingService, Arc<ManualClock>) {
    let clock = Arc::new(ManualClock::new(start_time()));
    let store = RecordStore::new(default_users(), slots, Vec::new()).unwrap();
    let service = ParkingService::new(
        store,
        Box::new(storage),
        Box::new(clock.clone()),
        Box::new(SequentialTicketIds::new()),
        RateTable::default(),
    );
    (service, clock)
}

pub fn slot(id: &str, category: VehicleCategory) -> Slot {
    Slot::new(id, category).unwrap()
}
