//! SteamID64 value object.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Number of decimal digits in a SteamID64.
pub const STEAM_ID_LEN: usize = 17;

/// A 64-bit Steam account id in its 17-digit decimal form.
///
/// The only constructor checks `^\d{17}$`, so a `SteamId` reaching the
/// profile store is always well-formed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SteamId(String);

impl SteamId {
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        if raw.len() != STEAM_ID_LEN {
            return Err(ValidationError::invalid_format(
                "steam_id",
                format!("expected {} digits, got {} characters", STEAM_ID_LEN, raw.len()),
            ));
        }
        if !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::invalid_format(
                "steam_id",
                "must contain only ASCII digits",
            ));
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SteamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SteamId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for SteamId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        SteamId::parse(&raw).map_err(serde::de::Error::custom)
    }
}
