use crate::domain::slot::Slot;
use crate::domain::user::{User, UserRole};
use crate::domain::vehicle::VehicleCategory;

/// Operators available on a fresh install or when `users.csv` is unusable.
pub fn default_users() -> Vec<User> {
    vec![
        User::new("admin", "pass123", "Admin User", UserRole::Admin),
        User::new("attendant1", "pass123", "John Smith", UserRole::Attendant),
    ]
}

/// A01..A20 for four-wheelers, then B01..B10 for two-wheelers.
pub fn default_slots() -> Vec<Slot> {
    let four = (1..=20).map(|i| Slot {
        id: format!("A{i:02}"),
        category: VehicleCategory::FourWheeler,
    });
    let two = (1..=10).map(|i| Slot {
        id: format!("B{i:02}"),
        category: VehicleCategory::TwoWheeler,
    });
    four.chain(two).collect()
}
