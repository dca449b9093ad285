//! RGB colours as sent in `#RRGGBB` notation.

use std::{fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::Serialize;

/// A 24-bit RGB colour.
#[derive(Copy, Clone, Hash, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct Colour {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// The string was not a `#` followed by exactly six hex digits.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct ParseColourError;

impl fmt::Display for ParseColourError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("expected a colour of the form #RRGGBB")
    }
}

impl std::error::Error for ParseColourError {}

impl Colour {
    /// Construct a colour from its three components.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Colour { r, g, b }
    }

    /// Re-encode the colour in lower-case `#rrggbb` notation.
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Unpack a colour sent as `0xRRGGBB`; higher bits are ignored.
    pub const fn from_u32(rgb: u32) -> Self {
        Colour {
            r: (rgb >> 16) as u8,
            g: (rgb >> 8) as u8,
            b: rgb as u8,
        }
    }

    /// The colour packed as `0xRRGGBB`, the way embed colours are sent.
    pub fn to_u32(&self) -> u32 {
        (self.r as u32) << 16 | (self.g as u32) << 8 | self.b as u32
    }
}

impl FromStr for Colour {
    type Err = ParseColourError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').ok_or(ParseColourError)?;
        // from_str_radix tolerates a leading sign, so check the digits first
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseColourError);
        }

        let channel = |at: usize| u8::from_str_radix(&digits[at..at + 2], 16);
        match (channel(0), channel(2), channel(4)) {
            (Ok(r), Ok(g), Ok(b)) => Ok(Colour { r, g, b }),
            _ => Err(ParseColourError),
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}
