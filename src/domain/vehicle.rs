use crate::error::{ParkingError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of vehicle categories a slot can accept.
///
/// Persisted as a numeric code; see [`VehicleCategory::code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleCategory {
    TwoWheeler,
    FourWheeler,
    Ev,
    Vip,
}

impl VehicleCategory {
    pub const ALL: [VehicleCategory; 4] = [
        VehicleCategory::TwoWheeler,
        VehicleCategory::FourWheeler,
        VehicleCategory::Ev,
        VehicleCategory::Vip,
    ];

    pub const fn code(self) -> u8 {
        match self {
            Self::TwoWheeler => 0,
            Self::FourWheeler => 1,
            Self::Ev => 2,
            Self::Vip => 3,
        }
    }

    /// Decodes a persisted category code. Unknown codes are a storage error.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::TwoWheeler),
            1 => Ok(Self::FourWheeler),
            2 => Ok(Self::Ev),
            3 => Ok(Self::Vip),
            other => Err(ParkingError::storage(format!(
                "unknown vehicle category code {other}"
            ))),
        }
    }

    /// Maps the console menu choice ("1" = 4-Wheeler, "2" = 2-Wheeler, ...).
    pub fn from_menu_choice(choice: &str) -> Result<Self> {
        match choice.trim() {
            "1" => Ok(Self::FourWheeler),
            "2" => Ok(Self::TwoWheeler),
            "3" => Ok(Self::Ev),
            "4" => Ok(Self::Vip),
            _ => Err(ParkingError::validation("Invalid vehicle type selected")),
        }
    }
}

impl fmt::Display for VehicleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::TwoWheeler => "2-Wheeler",
            Self::FourWheeler => "4-Wheeler",
            Self::Ev => "EV",
            Self::Vip => "VIP",
        };
        f.write_str(label)
    }
}

/// Normalizes operator input for a vehicle registration number.
///
/// Registration numbers are stored upper-cased; comparisons stay
/// case-insensitive so records written by hand still match.
pub fn normalize_vehicle_id(raw: &str) -> Result<String> {
    let id = raw.trim().to_uppercase();
    if id.is_empty() {
        return Err(ParkingError::validation("Vehicle Number cannot be empty"));
    }
    Ok(id)
}

/// Case-insensitive identifier match, using the same Unicode upper-casing
/// as [`normalize_vehicle_id`] so stored and typed ids always agree.
pub fn same_id(a: &str, b: &str) -> bool {
    a.trim().to_uppercase() == b.trim().to_uppercase()
}

pub fn same_vehicle(a: &str, b: &str) -> bool {
    same_id(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_are_stable() {
        for category in VehicleCategory::ALL {
            assert_eq!(
                VehicleCategory::from_code(category.code()).unwrap(),
                category
            );
        }
        assert_eq!(VehicleCategory::FourWheeler.code(), 1);
    }

    #[test]
    fn test_unknown_code_is_storage_error() {
        let err = VehicleCategory::from_code(9).unwrap_err();
        assert!(err.is_storage());
    }

    #[test]
    fn test_menu_choice() {
        assert_eq!(
            VehicleCategory::from_menu_choice(" 1 ").unwrap(),
            VehicleCategory::FourWheeler
        );
        assert!(matches!(
            VehicleCategory::from_menu_choice("7"),
            Err(ParkingError::ValidationError(_))
        ));
    }

    #[test]
    fn test_normalize_vehicle_id() {
        assert_eq!(normalize_vehicle_id(" ka-01-hh-1234 ").unwrap(), "KA-01-HH-1234");
        assert!(matches!(
            normalize_vehicle_id("   "),
            Err(ParkingError::ValidationError(_))
        ));
        assert!(same_vehicle("ka-01", "KA-01"));
    }

    #[test]
    fn test_non_ascii_ids_compare_like_normalized_input() {
        let typed = normalize_vehicle_id("é-1").unwrap();
        assert_eq!(typed, "É-1");
        assert!(same_vehicle("é-1", &typed));
        assert!(same_id(" ß1 ", "SS1"));
        assert!(!same_vehicle("é-1", "E-1"));
    }

    #[test]
    fn test_serde_names_match_config_keys() {
        let json = serde_json::to_string(&VehicleCategory::FourWheeler).unwrap();
        assert_eq!(json, "\"four_wheeler\"");
        let parsed: VehicleCategory = serde_json::from_str("\"vip\"").unwrap();
        assert_eq!(parsed, VehicleCategory::Vip);
    }
}
