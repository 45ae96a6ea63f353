mod common;

use common::{console, run_console, write_file};
use predicates::prelude::*;
use tempfile::tempdir;

#[test]
fn test_cli_end_to_end() {
    let dir = tempdir().unwrap();
    let script = [
        "admin",
        "pass123",
        "1",
        "ka-01-hh-1234",
        "Asha Rao",
        "1",
        "2",
        "KA-01-HH-1234",
        "y",
        "3",
        "2",
        "9",
        "0",
    ]
    .join("\n");

    console(dir.path())
        .write_stdin(script)
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome, Admin User (Admin)!"))
        .stdout(predicate::str::contains("4-Wheeler: 20 Free / 20 Total"))
        .stdout(predicate::str::contains("2-Wheeler: 10 Free / 10 Total"))
        .stdout(predicate::str::contains("Vehicle Number: KA-01-HH-1234"))
        .stdout(predicate::str::contains("Slot Number: A01"))
        .stdout(predicate::str::contains("Billed Hours: 1"))
        .stdout(predicate::str::contains("Total Fee:  $5.00"))
        .stdout(predicate::str::contains(
            "Vehicle exited successfully. Slot is now free.",
        ))
        .stdout(predicate::str::contains("Total Vehicles Exited Today: 1"))
        .stdout(predicate::str::contains("All data saved. Exiting application."));

    let ledger = std::fs::read_to_string(dir.path().join("parking_ledger.csv")).unwrap();
    let mut lines = ledger.lines();
    assert_eq!(
        lines.next(),
        Some(
            "TicketNumber,VehicleNumber,OwnerName,Type,AllocatedSlotNumber,EntryTime,ExitTime,TotalFee"
        )
    );
    let row = lines.next().unwrap();
    assert!(row.contains(",KA-01-HH-1234,Asha Rao,1,A01,"));
    assert!(row.ends_with(",5.00"));
    assert!(dir.path().join("users.csv").exists());
    assert!(dir.path().join("slots.csv").exists());
}

#[test]
fn test_eof_saves_and_exits() {
    let dir = tempdir().unwrap();
    let output = run_console(dir.path(), &[], "attendant1\npass123\n");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Welcome, John Smith (Attendant)!"));
    assert!(stdout.contains("All data saved. Exiting application."));

    let slots = std::fs::read_to_string(dir.path().join("slots.csv")).unwrap();
    assert!(slots.starts_with("SlotNumber,Type\nA01,1\n"));
    assert_eq!(slots.lines().count(), 31);
}

#[test]
fn test_security_sees_dashboard_only() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "users.csv",
        &["Username,Password,FullName,Role", "guard,secret,Night Guard,2"],
    );

    console(dir.path())
        .write_stdin("guard\nsecret\n1\n3\n0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Welcome, Night Guard (Security)!"))
        .stdout(predicate::str::contains("4-Wheeler: 20 Free / 20 Total"))
        .stdout(predicate::str::contains("1. Vehicle Entry").not())
        .stdout(predicate::str::contains(
            "Error: Access denied: Security cannot record vehicle entry or exit",
        ))
        .stdout(predicate::str::contains(
            "Error: Access denied: Security does not have permission for this feature",
        ));
}

#[test]
fn test_config_rates_apply() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "parkledger.toml",
        &["[rates]", "two_wheeler = \"3.50\""],
    );

    console(dir.path())
        .write_stdin("admin\npass123\n1\nKA-05-B-77\nRavi\n2\n2\nKA-05-B-77\ny\n0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Slot Number: B01"))
        .stdout(predicate::str::contains("Hourly Rate: $3.50"))
        .stdout(predicate::str::contains("Total Fee:  $3.50"));
}

#[test]
fn test_missing_explicit_config_fails_startup() {
    let dir = tempdir().unwrap();

    console(dir.path())
        .arg("--config")
        .arg(dir.path().join("absent.toml"))
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to read config"))
        .stderr(predicate::str::contains("absent.toml"));
}

#[test]
fn test_invalid_config_fails_startup() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "parkledger.toml", &["[rates]", "vip = \"-1\""]);

    console(dir.path())
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("rate for VIP must be positive"));
}

#[test]
fn test_password_with_spaces_logs_in() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "users.csv",
        &["Username,Password,FullName,Role", "kim, two words ,Kim Lee, 0"],
    );

    console(dir.path())
        .write_stdin("kim\ntwo words\nkim\n two words \n0\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Error: Invalid username or password"))
        .stdout(predicate::str::contains("Welcome, Kim Lee (Admin)!"));
}
