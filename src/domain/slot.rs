use super::vehicle::{VehicleCategory, same_id};
use crate::error::{ParkingError, Result};

/// A parking space with a fixed vehicle-category capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slot {
    pub id: String,
    pub category: VehicleCategory,
}

impl Slot {
    /// Builds a slot from operator input, normalizing the identifier.
    pub fn new(id: &str, category: VehicleCategory) -> Result<Self> {
        let id = id.trim().to_uppercase();
        if id.is_empty() {
            return Err(ParkingError::validation("Slot number cannot be empty"));
        }
        Ok(Self { id, category })
    }

    pub fn has_id(&self, id: &str) -> bool {
        same_id(&self.id, id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_id_normalized() {
        let slot = Slot::new(" c01", VehicleCategory::Ev).unwrap();
        assert_eq!(slot.id, "C01");
        assert!(slot.has_id("c01"));
        assert!(Slot::new("", VehicleCategory::Ev).is_err());

        let slot = Slot::new("é01", VehicleCategory::Vip).unwrap();
        assert_eq!(slot.id, "É01");
        assert!(slot.has_id("é01"));
    }
}
