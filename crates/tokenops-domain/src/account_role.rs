use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Static signing roles an operator can act as.
///
/// Each role maps to exactly one private key loaded at startup; there is no
/// runtime key management.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountRole {
    Deployer,
    A1,
    A2,
    A3,
}

#[derive(Debug, thiserror::Error)]
#[error("Unknown account role '{0}', expected one of DEPLOYER, A1, A2, A3")]
pub struct UnknownAccountRole(pub String);

impl AccountRole {
    pub const ALL: [AccountRole; 4] = [Self::Deployer, Self::A1, Self::A2, Self::A3];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deployer => "DEPLOYER",
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::A3 => "A3",
        }
    }

    /// Environment variable holding this role's private key.
    pub fn env_var(&self) -> &'static str {
        match self {
            Self::Deployer => "DEPLOYER_PRIVATE_KEY",
            Self::A1 => "A1",
            Self::A2 => "A2",
            Self::A3 => "A3",
        }
    }
}

impl std::fmt::Display for AccountRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountRole {
    type Err = UnknownAccountRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "DEPLOYER" => Ok(Self::Deployer),
            "A1" => Ok(Self::A1),
            "A2" => Ok(Self::A2),
            "A3" => Ok(Self::A3),
            _ => Err(UnknownAccountRole(s.to_string())),
        }
    }
}
