//! The operator console: login, menus and prompts over any line-oriented
//! input and output.
//!
//! Every failure of a menu action is printed and the loop carries on. End of
//! input ends the session the same way "Save & Exit" does.

pub mod render;

use crate::application::service::{ExitOutcome, Invoice, ParkingService};
use crate::domain::user::User;
use crate::domain::vehicle::VehicleCategory;
use crate::error::{ParkingError, Result};
use std::io::{BufRead, Write};

enum Flow {
    Continue,
    Quit,
}

pub struct Console<'a, R, W> {
    service: &'a mut ParkingService,
    input: R,
    output: W,
    user: Option<User>,
}

/// Prompts and reads one line. `None` means the input is exhausted.
fn prompt<R: BufRead, W: Write>(input: &mut R, output: &mut W, text: &str) -> Result<Option<String>> {
    write!(output, "{text}")?;
    output.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Ok(None);
    }
    Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
}

fn confirm_payment<R: BufRead, W: Write>(input: &mut R, output: &mut W, invoice: &Invoice) -> bool {
    if render::invoice(output, invoice).is_err() {
        return false;
    }
    match prompt(input, output, "\nConfirm payment and exit? (y/n): ") {
        Ok(Some(answer)) => answer.trim().eq_ignore_ascii_case("y"),
        _ => false,
    }
}

impl<'a, R: BufRead, W: Write> Console<'a, R, W> {
    pub fn new(service: &'a mut ParkingService, input: R, output: W) -> Self {
        Self {
            service,
            input,
            output,
            user: None,
        }
    }

    /// Runs until the operator chooses "Save & Exit" or input runs out.
    pub async fn run(mut self) -> Result<()> {
        loop {
            let flow = match self.user.clone() {
                None => self.login()?,
                Some(user) => self.main_menu(&user).await?,
            };
            if let Flow::Quit = flow {
                break;
            }
        }
        self.save_and_exit().await
    }

    fn ask(&mut self, text: &str) -> Result<Option<String>> {
        prompt(&mut self.input, &mut self.output, text)
    }

    fn report(&mut self, error: &ParkingError) -> Result<()> {
        writeln!(self.output, "\nError: {error}")?;
        Ok(())
    }

    fn warn_not_durable(&mut self, save_error: Option<ParkingError>) -> Result<()> {
        if let Some(e) = save_error {
            writeln!(self.output, "Warning: change may not be durable: {e}")?;
        }
        Ok(())
    }

    fn login(&mut self) -> Result<Flow> {
        render::header(&mut self.output, "System Login")?;
        let Some(username) = self.ask("Enter Username: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(password) = self.ask("Enter Password: ")? else {
            return Ok(Flow::Quit);
        };

        match self.service.authenticate(&username, &password) {
            Ok(user) => {
                writeln!(self.output, "\nWelcome, {} ({})!", user.full_name, user.role)?;
                self.user = Some(user);
            }
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    async fn main_menu(&mut self, user: &User) -> Result<Flow> {
        render::header(
            &mut self.output,
            &format!("Main Dashboard | Welcome, {}", user.full_name),
        )?;
        render::availability(&mut self.output, &self.service.availability())?;

        let mut items = Vec::new();
        if user.role.can_operate_gate() {
            items.push(("1", "Vehicle Entry"));
            items.push(("2", "Vehicle Exit & Billing"));
        }
        if user.role.can_administer() {
            items.push(("3", "System Reports"));
            items.push(("4", "Admin Functions"));
        }
        items.push(("9", "Logout"));
        items.push(("0", "Save & Exit"));
        render::menu(&mut self.output, "Main Menu", &items)?;

        let Some(choice) = self.ask("\nEnter your choice: ")? else {
            return Ok(Flow::Quit);
        };
        let allowed = match choice.trim() {
            "1" | "2" => user.role.ensure_gate_access(),
            "3" | "4" => user.role.ensure_admin(),
            _ => Ok(()),
        };
        if let Err(e) = allowed {
            self.report(&e)?;
            return Ok(Flow::Continue);
        }

        match choice.trim() {
            "1" => self.vehicle_entry().await,
            "2" => self.vehicle_exit().await,
            "3" => self.reports_menu(),
            "4" => self.admin_menu().await,
            "9" => {
                writeln!(self.output, "\nLogging out...")?;
                self.user = None;
                Ok(Flow::Continue)
            }
            "0" => Ok(Flow::Quit),
            _ => {
                writeln!(self.output, "Invalid choice. Please try again.")?;
                Ok(Flow::Continue)
            }
        }
    }

    async fn vehicle_entry(&mut self) -> Result<Flow> {
        render::header(&mut self.output, "New Vehicle Entry")?;
        let Some(vehicle) = self.ask("Enter Vehicle Number: ")? else {
            return Ok(Flow::Quit);
        };
        if let Err(e) = self.service.check_entry(&vehicle) {
            self.report(&e)?;
            return Ok(Flow::Continue);
        }
        let Some(owner) = self.ask("Enter Owner's Name: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(choice) =
            self.ask("Select Vehicle Type (1 for 4-Wheeler, 2 for 2-Wheeler, 3 for EV, 4 for VIP): ")?
        else {
            return Ok(Flow::Quit);
        };

        let category = match VehicleCategory::from_menu_choice(&choice) {
            Ok(category) => category,
            Err(e) => {
                self.report(&e)?;
                return Ok(Flow::Continue);
            }
        };

        match self.service.enter_vehicle(&vehicle, &owner, category).await {
            Ok(committed) => {
                render::ticket(&mut self.output, &committed.value)?;
                self.warn_not_durable(committed.save_error)?;
            }
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    async fn vehicle_exit(&mut self) -> Result<Flow> {
        render::header(&mut self.output, "Vehicle Exit & Billing")?;
        let Some(vehicle) = self.ask("Enter Vehicle Number to exit: ")? else {
            return Ok(Flow::Quit);
        };

        let input = &mut self.input;
        let output = &mut self.output;
        let outcome = self
            .service
            .exit_vehicle(&vehicle, |invoice| confirm_payment(input, output, invoice))
            .await;

        match outcome {
            Ok(ExitOutcome::Paid(committed)) => {
                writeln!(self.output, "\nVehicle exited successfully. Slot is now free.")?;
                self.warn_not_durable(committed.save_error)?;
            }
            Ok(ExitOutcome::Declined(_)) => writeln!(self.output, "\nExit cancelled.")?,
            Err(e) => self.report(&e)?,
        }
        Ok(Flow::Continue)
    }

    fn reports_menu(&mut self) -> Result<Flow> {
        loop {
            render::menu(
                &mut self.output,
                "System Reports",
                &[
                    ("1", "View Currently Parked Vehicles"),
                    ("2", "View Daily Income Report"),
                    ("9", "Back to Main Menu"),
                ],
            )?;
            let Some(choice) = self.ask("Enter your choice: ")? else {
                return Ok(Flow::Quit);
            };
            match choice.trim() {
                "1" => {
                    render::header(&mut self.output, "Currently Parked Vehicles")?;
                    render::parked(&mut self.output, &self.service.currently_parked())?;
                }
                "2" => {
                    render::header(&mut self.output, "Daily Income Report")?;
                    let report = self.service.daily_income(self.service.today());
                    render::daily_income(&mut self.output, &report)?;
                }
                "9" => return Ok(Flow::Continue),
                _ => writeln!(self.output, "Invalid choice.")?,
            }
        }
    }

    async fn admin_menu(&mut self) -> Result<Flow> {
        loop {
            render::menu(
                &mut self.output,
                "Admin Functions",
                &[
                    ("1", "Manage Parking Slots"),
                    ("2", "Manage Users"),
                    ("9", "Back to Main Menu"),
                ],
            )?;
            let Some(choice) = self.ask("Enter your choice: ")? else {
                return Ok(Flow::Quit);
            };
            match choice.trim() {
                "1" => {
                    if let Flow::Quit = self.manage_slots().await? {
                        return Ok(Flow::Quit);
                    }
                }
                "2" => {
                    render::header(&mut self.output, "Manage Users")?;
                    render::users(&mut self.output, self.service.list_users())?;
                }
                "9" => return Ok(Flow::Continue),
                _ => writeln!(self.output, "Invalid choice.")?,
            }
        }
    }

    async fn manage_slots(&mut self) -> Result<Flow> {
        render::header(&mut self.output, "Manage Parking Slots")?;
        render::slots(&mut self.output, self.service.list_slots())?;

        let Some(option) = self.ask("\nOptions: [a]dd / [r]emove / [b]ack\nChoose an option: ")? else {
            return Ok(Flow::Quit);
        };
        match option.trim().to_lowercase().as_str() {
            "a" => {
                let Some(id) = self.ask("Enter new slot number (e.g., C01): ")? else {
                    return Ok(Flow::Quit);
                };
                let Some(choice) =
                    self.ask("Enter type (1 for 4-Wheeler, 2 for 2-Wheeler, 3 for EV, 4 for VIP): ")?
                else {
                    return Ok(Flow::Quit);
                };
                let added = match VehicleCategory::from_menu_choice(&choice) {
                    Ok(category) => self.service.add_slot(&id, category).await,
                    Err(e) => Err(e),
                };
                match added {
                    Ok(committed) => {
                        writeln!(self.output, "Slot {} added.", committed.value.id)?;
                        self.warn_not_durable(committed.save_error)?;
                    }
                    Err(e) => self.report(&e)?,
                }
            }
            "r" => {
                let Some(id) = self.ask("Enter slot number to remove: ")? else {
                    return Ok(Flow::Quit);
                };
                match self.service.remove_slot(&id).await {
                    Ok(committed) => {
                        writeln!(self.output, "Slot {} removed.", committed.value.id)?;
                        self.warn_not_durable(committed.save_error)?;
                    }
                    Err(e) => self.report(&e)?,
                }
            }
            _ => {}
        }
        Ok(Flow::Continue)
    }

    async fn save_and_exit(&mut self) -> Result<()> {
        match self.service.save_all().await {
            Ok(()) => writeln!(self.output, "All data saved. Exiting application.")?,
            Err(e) => writeln!(self.output, "Warning: data could not be saved: {e}")?,
        }
        self.output.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::record_store::RecordStore;
    use crate::domain::billing::RateTable;
    use crate::infrastructure::clock::SystemClock;
    use crate::infrastructure::in_memory::InMemoryStorage;
    use crate::infrastructure::ticket_ids::SequentialTicketIds;

    fn service() -> ParkingService {
        ParkingService::new(
            RecordStore::with_defaults(),
            Box::new(InMemoryStorage::new()),
            Box::new(SystemClock),
            Box::new(SequentialTicketIds::new()),
            RateTable::default(),
        )
    }

    async fn run_script(service: &mut ParkingService, script: &str) -> String {
        let mut out = Vec::new();
        Console::new(service, script.as_bytes(), &mut out)
            .run()
            .await
            .unwrap();
        String::from_utf8(out).unwrap()
    }

    #[tokio::test]
    async fn test_bad_login_then_quit_on_eof() {
        let mut service = service();
        let out = run_script(&mut service, "admin\nwrong\n").await;
        assert!(out.contains("Error: Invalid username or password"));
        assert!(out.contains("All data saved. Exiting application."));
    }

    #[tokio::test]
    async fn test_entry_and_cancelled_exit() {
        let mut service = service();
        let script = "attendant1\npass123\n1\nka-01-hh-1234\nAsha\n1\n2\nKA-01-HH-1234\nn\n0\n";
        let out = run_script(&mut service, script).await;

        assert!(out.contains("Welcome, John Smith (Attendant)!"));
        assert!(out.contains("Ticket Number: T0001"));
        assert!(out.contains("Slot Number: A01"));
        assert!(out.contains("Total Fee:  $5.00"));
        assert!(out.contains("Exit cancelled."));
        assert_eq!(service.available_slots(VehicleCategory::FourWheeler), 19);
    }

    #[tokio::test]
    async fn test_parked_vehicle_rejected_before_owner_prompt() {
        let mut service = service();
        let script = "admin\npass123\n1\nKA-01\nAsha\n1\n1\nka-01\n0\n";
        let out = run_script(&mut service, script).await;

        let rejected = out.find("Error: Vehicle KA-01 is already parked").unwrap();
        assert_eq!(out.matches("Enter Owner's Name: ").count(), 1);
        assert!(out[rejected..].contains("Main Menu"));
        assert_eq!(service.store().ledger().len(), 1);
    }

    #[tokio::test]
    async fn test_attendant_cannot_open_admin() {
        let mut service = service();
        let out = run_script(&mut service, "attendant1\npass123\n4\n0\n").await;
        assert!(out.contains("Error: Access denied"));
        assert!(!out.contains("Admin Functions"));
    }

    #[tokio::test]
    async fn test_invalid_category_reported() {
        let mut service = service();
        let out = run_script(&mut service, "admin\npass123\n1\nKA-01\nAsha\n8\n0\n").await;
        assert!(out.contains("Error: Validation error: Invalid vehicle type selected"));
        assert!(service.store().ledger().is_empty());
    }

    #[tokio::test]
    async fn test_admin_adds_and_removes_slot() {
        let mut service = service();
        let script = "admin\npass123\n4\n1\na\nc01\n3\n1\nr\nA01\n9\n0\n";
        let out = run_script(&mut service, script).await;

        assert!(out.contains("Slot C01 added."));
        assert!(out.contains("Slot A01 removed."));
        assert!(out.contains("EV: 1 Free / 1 Total"));
        assert_eq!(service.list_slots().len(), 30);
    }
}
