//! Ticker code parsing and market resolution.
//!
//! A ticker code is exactly 4 uppercase ASCII letters. Position 0 selects
//! the category (built-in letters) or the user-defined space, positions 1-2
//! select the statistical profile, and position 3 selects the market and is
//! restricted to A, B or C.

use std::fmt;

use serde::{Serialize, Serializer};

use crate::domain::error::FauxtickError;

pub const CODE_LEN: usize = 4;

/// First letter of the user-defined code space. Letters below this are
/// reserved for built-in categories, whether or not a category is currently
/// registered for them.
pub const USER_DEFINED_MIN_LETTER: char = 'G';

/// A validated 4-letter ticker code.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TickerCode(String);

impl TickerCode {
    /// Parse and validate a raw code against `[A-Z]{3}[A-C]`.
    pub fn parse(input: &str) -> Result<Self, FauxtickError> {
        let bytes = input.as_bytes();
        if bytes.len() != CODE_LEN {
            return Err(FauxtickError::Validation {
                reason: format!("ticker code must be {CODE_LEN} characters: {input:?}"),
            });
        }
        for &b in &bytes[..3] {
            if !b.is_ascii_uppercase() {
                return Err(FauxtickError::Validation {
                    reason: format!("ticker code must be uppercase letters A-Z: {input:?}"),
                });
            }
        }
        if !(b'A'..=b'C').contains(&bytes[3]) {
            return Err(FauxtickError::Validation {
                reason: format!("ticker market letter must be A, B or C: {input:?}"),
            });
        }
        Ok(Self(input.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Position 0: selects the built-in category or the user-defined space.
    pub fn category_letter(&self) -> char {
        self.0.as_bytes()[0] as char
    }

    /// Position 1: drives drift and volatility interpolation.
    pub fn stats_letter(&self) -> char {
        self.0.as_bytes()[1] as char
    }

    /// Position 2: drives the jump parameter interpolation.
    pub fn jump_letter(&self) -> char {
        self.0.as_bytes()[2] as char
    }

    /// Position 3: selects the market.
    pub fn market_letter(&self) -> char {
        self.0.as_bytes()[3] as char
    }

    pub fn market(&self) -> Market {
        Market::from_letter(self.market_letter())
    }

    /// Validate this code for user-defined creation: the first three letters
    /// must all lie in G-Z, keeping the user-defined space disjoint from the
    /// reserved built-in prefix letters by rule rather than by whichever
    /// categories happen to be registered.
    pub fn validate_user_defined(&self) -> Result<(), FauxtickError> {
        for letter in [
            self.category_letter(),
            self.stats_letter(),
            self.jump_letter(),
        ] {
            if letter < USER_DEFINED_MIN_LETTER {
                return Err(FauxtickError::Validation {
                    reason: format!(
                        "user-defined ticker codes must use letters {USER_DEFINED_MIN_LETTER}-Z \
                         in the first three positions: {:?}",
                        self.0
                    ),
                });
            }
        }
        Ok(())
    }
}

impl fmt::Display for TickerCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Market resolved from the code's 4th letter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Market {
    Nyse,
    Lse,
    Continuous,
    /// Unreachable through validated input; observing it on a valid data
    /// path indicates an internal consistency violation.
    Unknown,
}

impl Market {
    pub fn from_letter(letter: char) -> Self {
        match letter {
            'A' => Market::Nyse,
            'B' => Market::Lse,
            'C' => Market::Continuous,
            _ => Market::Unknown,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Market::Nyse => "NYSE",
            Market::Lse => "LSE",
            Market::Continuous => "continuous",
            Market::Unknown => "unknown",
        }
    }
}

impl fmt::Display for Market {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Market {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}
