mod common;

use common::{run_console, write_file};
use tempfile::tempdir;

#[test]
fn test_parked_vehicle_survives_restart() {
    let dir = tempdir().unwrap();

    // 1. First run: park a vehicle and quit
    let first = run_console(
        dir.path(),
        &[],
        "attendant1\npass123\n1\nKA-01-HH-1234\nAsha\n1\n0\n",
    );
    assert!(first.status.success());
    assert!(String::from_utf8_lossy(&first.stdout).contains("Slot Number: A01"));

    // 2. Second run: the slot is still taken and the vehicle is still parked
    let second = run_console(
        dir.path(),
        &[],
        "attendant1\npass123\n1\nka-01-hh-1234\n1\nKA-02-XY-9\nRavi\n1\n0\n",
    );
    assert!(second.status.success());
    let stdout = String::from_utf8_lossy(&second.stdout);
    assert!(stdout.contains("4-Wheeler: 19 Free / 20 Total"));
    assert!(stdout.contains("Error: Vehicle KA-01-HH-1234 is already parked"));
    assert!(stdout.contains("Slot Number: A02"));

    // 3. Third run: exit the first vehicle
    let third = run_console(
        dir.path(),
        &[],
        "attendant1\npass123\n2\nKA-01-HH-1234\ny\n0\n",
    );
    assert!(third.status.success());
    let stdout = String::from_utf8_lossy(&third.stdout);
    assert!(stdout.contains("4-Wheeler: 18 Free / 20 Total"));
    assert!(stdout.contains("Vehicle exited successfully. Slot is now free."));

    let ledger = std::fs::read_to_string(dir.path().join("parking_ledger.csv")).unwrap();
    assert_eq!(ledger.lines().count(), 3);
}

#[test]
fn test_legacy_timestamps_are_read() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "parking_ledger.csv",
        &[
            "TicketNumber,VehicleNumber,OwnerName,Type,AllocatedSlotNumber,EntryTime,ExitTime,TotalFee",
            "T2401011200000,KA-09-Z-1,Old Owner,1,A01,2024-01-01T12:00:00.0000000,,",
        ],
    );

    let output = run_console(dir.path(), &[], "admin\npass123\n3\n1\n9\n0\n");
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("4-Wheeler: 19 Free / 20 Total"));
    assert!(stdout.contains("KA-09-Z-1"));
    assert!(String::from_utf8_lossy(&output.stderr).is_empty());
}
