use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Card rarity, written as a one-letter code in card sheets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Mythic,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [
        Rarity::Common,
        Rarity::Uncommon,
        Rarity::Rare,
        Rarity::Mythic,
    ];

    /// Look up a rarity by its one-letter code (`C`, `U`, `R` or `M`).
    pub fn from_code(code: &str) -> Result<Self> {
        Rarity::ALL
            .into_iter()
            .find(|r| r.code() == code)
            .ok_or_else(|| CatalogError::UnknownRarity(code.to_string()))
    }

    pub fn code(self) -> &'static str {
        match self {
            Rarity::Common => "C",
            Rarity::Uncommon => "U",
            Rarity::Rare => "R",
            Rarity::Mythic => "M",
        }
    }

    pub fn long_name(self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::Mythic => "mythic",
        }
    }
}

impl FromStr for Rarity {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        Rarity::from_code(s)
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.long_name())
    }
}
