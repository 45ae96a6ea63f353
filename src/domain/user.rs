use super::vehicle::same_id;
use crate::error::{ParkingError, Result};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserRole {
    Admin,
    Attendant,
    Security,
}

impl UserRole {
    pub const fn code(self) -> u8 {
        match self {
            Self::Admin => 0,
            Self::Attendant => 1,
            Self::Security => 2,
        }
    }

    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::Admin),
            1 => Ok(Self::Attendant),
            2 => Ok(Self::Security),
            other => Err(ParkingError::storage(format!("unknown role code {other}"))),
        }
    }

    /// Entry and exit at the gate.
    pub fn can_operate_gate(self) -> bool {
        matches!(self, Self::Admin | Self::Attendant)
    }

    /// Reports, slot and user administration.
    pub fn can_administer(self) -> bool {
        self == Self::Admin
    }

    pub fn ensure_gate_access(self) -> Result<()> {
        if self.can_operate_gate() {
            Ok(())
        } else {
            Err(ParkingError::AccessDenied(format!(
                "{self} cannot record vehicle entry or exit"
            )))
        }
    }

    pub fn ensure_admin(self) -> Result<()> {
        if self.can_administer() {
            Ok(())
        } else {
            Err(ParkingError::AccessDenied(format!(
                "{self} does not have permission for this feature"
            )))
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Admin => "Admin",
            Self::Attendant => "Attendant",
            Self::Security => "Security",
        };
        f.write_str(label)
    }
}

/// An operator account. Passwords are kept in plaintext, as the record
/// files always have.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub password: String,
    pub full_name: String,
    pub role: UserRole,
}

impl User {
    pub fn new(username: &str, password: &str, full_name: &str, role: UserRole) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            full_name: full_name.to_string(),
            role,
        }
    }

    pub fn matches(&self, username: &str, password: &str) -> bool {
        same_id(&self.username, username) && self.password == password
    }
}
