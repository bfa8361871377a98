use std::fmt;
use std::str::FromStr;

use chartguard_core::{Error, Result};
use serde::{Deserialize, Serialize};

/// An opaque sRGB color parsed from `#rgb` / `#rrggbb` notation.
///
/// Serializes as its `#rrggbb` string and deserializes through the same
/// parser as `FromStr`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a 3- or 6-digit hex color with an optional leading `#`.
    pub fn parse(input: &str) -> Result<Self> {
        input.parse()
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl FromStr for HexColor {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let digits = input.strip_prefix('#').unwrap_or(input);
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(invalid_color(input));
        }

        match digits.len() {
            3 => {
                let mut channels = [0u8; 3];
                for (slot, byte) in channels.iter_mut().zip(digits.bytes()) {
                    // #abc expands to #aabbcc
                    *slot = hex_value(byte) * 17;
                }
                Ok(Self::rgb(channels[0], channels[1], channels[2]))
            }
            6 => {
                let pair = |idx: usize| {
                    u8::from_str_radix(&digits[idx..idx + 2], 16).map_err(|_| invalid_color(input))
                };
                Ok(Self::rgb(pair(0)?, pair(2)?, pair(4)?))
            }
            _ => Err(invalid_color(input)),
        }
    }
}

impl TryFrom<String> for HexColor {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<HexColor> for String {
    fn from(color: HexColor) -> Self {
        color.to_hex()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

fn hex_value(byte: u8) -> u8 {
    match byte {
        b'0'..=b'9' => byte - b'0',
        b'a'..=b'f' => byte - b'a' + 10,
        b'A'..=b'F' => byte - b'A' + 10,
        _ => 0,
    }
}

fn invalid_color(input: &str) -> Error {
    Error::InvalidInput(format!(
        "'{input}' is not a 3- or 6-digit hex color"
    ))
}
