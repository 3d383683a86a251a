use crate::cost::{Color, Cost};
use crate::error::{CatalogError, Result};
use crate::rarity::Rarity;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Token in rule text that stands for the card's own name.
pub const NAME_PLACEHOLDER: &str = "~";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub set_code: String,
    pub rarity: Rarity,
    pub legendary: bool,
    /// The first entry is the primary type.
    pub types: Vec<String>,
    pub subtypes: Vec<String>,
    pub classes: Vec<String>,
    pub power: Option<Stat>,
    pub toughness: Option<Stat>,
    pub cost: Cost,
    pub rules: Vec<String>,
    pub name: String,
    pub flavor: String,
}

impl Card {
    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }

    /// Classify the primary type. Fails for types with no known category.
    pub fn kind(&self) -> Result<PrimaryType> {
        self.primary_type()
            .ok_or_else(|| CatalogError::MissingType(self.name.clone()))?
            .parse()
    }

    /// Rule lines with every name placeholder replaced by the card name.
    pub fn expand_rules(&self) -> Vec<String> {
        self.rules
            .iter()
            .map(|rule| rule.replace(NAME_PLACEHOLDER, &self.name))
            .collect()
    }

    /// Both stats, if the card has both.
    pub fn power_toughness(&self) -> Option<(&Stat, &Stat)> {
        self.power.as_ref().zip(self.toughness.as_ref())
    }

    pub fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        self.cost.colors()
    }
}

/// Power or toughness: a number, or a literal such as `*` or `1+*`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Stat {
    Number(i64),
    Literal(String),
}

impl Stat {
    /// An empty cell has no stat; anything that is not an integer is kept verbatim.
    pub fn parse(cell: &str) -> Option<Stat> {
        if cell.is_empty() {
            return None;
        }
        Some(match cell.parse::<i64>() {
            Ok(n) => Stat::Number(n),
            Err(_) => Stat::Literal(cell.to_string()),
        })
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stat::Number(n) => write!(f, "{n}"),
            Stat::Literal(s) => f.write_str(s),
        }
    }
}

/// Primary card types the catalog knows how to group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PrimaryType {
    Land,
    BasicLand,
    Enchantment,
    Artifact,
    Creature,
    Instant,
    Sorcery,
}

impl PrimaryType {
    /// Row the deck builder uses to group this type in card lists.
    pub fn table_row(self) -> u8 {
        match self {
            PrimaryType::Land | PrimaryType::BasicLand => 0,
            PrimaryType::Enchantment | PrimaryType::Artifact => 1,
            PrimaryType::Creature => 2,
            PrimaryType::Instant | PrimaryType::Sorcery => 3,
        }
    }
}

impl FromStr for PrimaryType {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "land" => Ok(PrimaryType::Land),
            "basic land" => Ok(PrimaryType::BasicLand),
            "enchantment" => Ok(PrimaryType::Enchantment),
            "artifact" => Ok(PrimaryType::Artifact),
            "creature" => Ok(PrimaryType::Creature),
            "instant" => Ok(PrimaryType::Instant),
            "sorcery" => Ok(PrimaryType::Sorcery),
            _ => Err(CatalogError::UnknownCardType(s.to_string())),
        }
    }
}
