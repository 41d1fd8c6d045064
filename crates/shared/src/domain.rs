use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::LookupError;

pub const PINCODE_LEN: usize = 6;

/// A six digit Indian postal code. Only constructed through [`Pincode::parse`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Pincode(String);

impl Pincode {
    /// Accepts exactly six ASCII decimal digits. Surrounding whitespace is
    /// not trimmed.
    pub fn parse(input: &str) -> Result<Self, LookupError> {
        if input.len() == PINCODE_LEN && input.bytes().all(|b| b.is_ascii_digit()) {
            Ok(Self(input.to_string()))
        } else {
            Err(LookupError::InvalidFormat)
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Pincode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Pincode {
    type Err = LookupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl<'de> Deserialize<'de> for Pincode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct PostOffice {
    pub name: String,
    pub branch_type: String,
    pub delivery_status: String,
    pub district: String,
    pub division: String,
}

impl PostOffice {
    /// Case-insensitive substring match on the office name. An empty needle
    /// matches everything.
    pub fn name_matches(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty() || self.name.to_lowercase().contains(needle_lower)
    }
}
