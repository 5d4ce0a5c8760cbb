use serde::{Deserialize, Serialize};

use crate::foundation::error::{AvatarError, AvatarResult};

/// A 24-bit packed RGB color (`0xRRGGBB`).
///
/// Serialized as a plain number, matching how colors are persisted. Deserialization also
/// accepts hex strings (`"#ff9933"`, `"0xff9933"`, `"ff9933"`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Rgb(u32);

impl Rgb {
    pub const BLACK: Self = Self(0x000000);
    pub const WHITE: Self = Self(0xffffff);

    /// Build a color from a packed value; bits above 24 are discarded.
    pub const fn new(packed: u32) -> Self {
        Self(packed & 0x00ff_ffff)
    }

    pub const fn from_channels(r: u8, g: u8, b: u8) -> Self {
        Self(((r as u32) << 16) | ((g as u32) << 8) | (b as u32))
    }

    pub const fn packed(self) -> u32 {
        self.0
    }

    pub const fn channels(self) -> [u8; 3] {
        [(self.0 >> 16) as u8, (self.0 >> 8) as u8, self.0 as u8]
    }

    /// Parse `#rrggbb`, `0xrrggbb` or bare `rrggbb` (case-insensitive).
    pub fn parse_hex(s: &str) -> AvatarResult<Self> {
        let s = s.trim();
        let digits = s
            .strip_prefix('#')
            .or_else(|| s.strip_prefix("0x"))
            .or_else(|| s.strip_prefix("0X"))
            .unwrap_or(s);
        if digits.len() != 6 {
            return Err(AvatarError::validation(format!(
                "color \"{s}\" must be #RRGGBB (case-insensitive)"
            )));
        }
        u32::from_str_radix(digits, 16)
            .map(Self::new)
            .map_err(|_| AvatarError::validation(format!("invalid hex color \"{s}\"")))
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:06x}", self.0)
    }
}

impl From<u32> for Rgb {
    fn from(packed: u32) -> Self {
        Self::new(packed)
    }
}

impl<'de> Deserialize<'de> for Rgb {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Packed(u32),
            Hex(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Packed(v) if v <= 0x00ff_ffff => Ok(Self(v)),
            Repr::Packed(v) => Err(serde::de::Error::custom(format!(
                "packed color {v:#x} exceeds 24 bits"
            ))),
            Repr::Hex(s) => Self::parse_hex(&s).map_err(serde::de::Error::custom),
        }
    }
}

/// Shade `color` toward black (`percent < 0`) or white (`percent > 0`).
///
/// `percent` is clamped into `[-1, 1]`; each channel moves by
/// `round((target - channel) * |percent|)` with half-up rounding.
pub fn shade(color: Rgb, percent: f64) -> Rgb {
    let p = if percent.is_nan() {
        0.0
    } else {
        percent.clamp(-1.0, 1.0)
    };
    let target = if p < 0.0 { 0.0 } else { 255.0 };
    let amount = p.abs();

    let [r, g, b] = color.channels().map(|c| {
        let c = f64::from(c);
        let v = ((target - c) * amount + 0.5).floor() + c;
        v.clamp(0.0, 255.0) as u8
    });
    Rgb::from_channels(r, g, b)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/color.rs"]
mod tests;
