//! Account roles.
//!
//! Roles are ordinal: `Client < Admin < Super`. Route gates compare against
//! exact allow-sets, while ownership checks treat `Admin` and above as
//! privileged. On the wire and in storage a role is its integer value.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
#[repr(u8)]
pub enum Role {
    #[default]
    Client = 0,
    Admin = 1,
    Super = 2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("unknown role {0}")]
pub struct UnknownRole(pub u8);

impl Role {
    pub const ALL: &'static [Role] = &[Role::Client, Role::Admin, Role::Super];

    /// `Admin` or `Super`.
    #[must_use]
    pub fn is_privileged(self) -> bool {
        self >= Role::Admin
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Client => "client",
            Role::Admin => "admin",
            Role::Super => "super",
        }
    }
}

impl TryFrom<u8> for Role {
    type Error = UnknownRole;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Role::Client),
            1 => Ok(Role::Admin),
            2 => Ok(Role::Super),
            other => Err(UnknownRole(other)),
        }
    }
}

impl TryFrom<i16> for Role {
    type Error = UnknownRole;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        u8::try_from(value)
            .map_err(|_| UnknownRole(u8::MAX))
            .and_then(Role::try_from)
    }
}

impl From<Role> for u8 {
    fn from(role: Role) -> u8 {
        role as u8
    }
}

impl From<Role> for i16 {
    fn from(role: Role) -> i16 {
        role as u8 as i16
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
