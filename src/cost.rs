//! Mana cost notation such as `3WUBRG`.
//!
//! A cost string is an optional run of digits (the generic component)
//! followed by any number of colored pips drawn from `W`, `U`, `B`, `R` and
//! `G`. The canonical form groups the pips by color in that order.

use crate::error::{CatalogError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The five colors, in canonical W-U-B-R-G order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Color {
    W,
    U,
    B,
    R,
    G,
}

impl Color {
    pub const ALL: [Color; 5] = [Color::W, Color::U, Color::B, Color::R, Color::G];

    pub fn symbol(self) -> char {
        match self {
            Color::W => 'W',
            Color::U => 'U',
            Color::B => 'B',
            Color::R => 'R',
            Color::G => 'G',
        }
    }

    /// Uppercase only; `'w'` is not a color.
    pub fn from_symbol(c: char) -> Option<Color> {
        Color::ALL.into_iter().find(|color| color.symbol() == c)
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// A parsed mana cost.
///
/// `generic` is `None` when the cost string has no leading digits, which is
/// not the same as an explicit `0`. `colorless` pips have no notation in the
/// cost string and are never produced by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Cost {
    pips: [u32; 5],
    generic: Option<u32>,
    colorless: u32,
}

impl Cost {
    pub fn new(generic: Option<u32>, pips: [u32; 5]) -> Self {
        Cost {
            pips,
            generic,
            colorless: 0,
        }
    }

    pub fn with_colorless(mut self, colorless: u32) -> Self {
        self.colorless = colorless;
        self
    }

    pub fn count(&self, color: Color) -> u32 {
        self.pips[color.index()]
    }

    pub fn generic(&self) -> Option<u32> {
        self.generic
    }

    pub fn colorless(&self) -> u32 {
        self.colorless
    }

    /// Colors with at least one pip, in W-U-B-R-G order.
    pub fn colors(&self) -> impl Iterator<Item = Color> + '_ {
        Color::ALL
            .into_iter()
            .filter(move |color| self.count(*color) > 0)
    }

    /// Canonical notation: generic digits (if any), then pips grouped by color.
    pub fn as_str(&self) -> String {
        self.to_string()
    }

    /// Converted mana cost. Colorless pips do not count.
    pub fn cmc(&self) -> u64 {
        let pips: u64 = self.pips.iter().map(|&n| u64::from(n)).sum();
        pips + u64::from(self.generic.unwrap_or(0))
    }
}

impl FromStr for Cost {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || CatalogError::InvalidCost(s.to_string());

        let split = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
        let (digits, symbols) = s.split_at(split);
        let generic = if digits.is_empty() {
            None
        } else {
            Some(digits.parse::<u32>().map_err(|_| invalid())?)
        };

        let mut pips = [0u32; 5];
        for c in symbols.chars() {
            let color = Color::from_symbol(c).ok_or_else(invalid)?;
            pips[color.index()] += 1;
        }

        Ok(Cost::new(generic, pips))
    }
}

impl fmt::Display for Cost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(generic) = self.generic {
            write!(f, "{generic}")?;
        }
        for color in Color::ALL {
            for _ in 0..self.count(color) {
                write!(f, "{color}")?;
            }
        }
        Ok(())
    }
}
