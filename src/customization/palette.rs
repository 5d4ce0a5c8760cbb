use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::foundation::{
    color::Rgb,
    error::{AvatarError, AvatarResult},
};

/// Named rendering patterns that can stand in for a plain color on some parts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Pattern {
    /// Orange tail with black stripes.
    OrangeStripes,
    /// Grey tail with dark grey stripes.
    GreyStripes,
    /// Left eye green, right eye light blue.
    GreenBlueSplit,
    /// Nose split into a black left half and a grey right half.
    HalfBlackGrey,
}

impl Pattern {
    pub const ALL: [Self; 4] = [
        Self::OrangeStripes,
        Self::GreyStripes,
        Self::GreenBlueSplit,
        Self::HalfBlackGrey,
    ];

    pub fn tag(self) -> &'static str {
        match self {
            Self::OrangeStripes => "orangeStripes",
            Self::GreyStripes => "greyStripes",
            Self::GreenBlueSplit => "greenBlueSplit",
            Self::HalfBlackGrey => "halfBlackGrey",
        }
    }
}

impl FromStr for Pattern {
    type Err = AvatarError;

    fn from_str(s: &str) -> AvatarResult<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.tag().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AvatarError::validation(format!("unknown pattern \"{s}\"")))
    }
}

/// Tail coloring: a solid color or one of the striped patterns.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TailStyle {
    Solid(Rgb),
    OrangeStripes,
    GreyStripes,
}

/// Eye coloring: both eyes one color, or the fixed green/blue split.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EyeStyle {
    Solid(Rgb),
    GreenBlueSplit,
}

/// Nose coloring: a solid disc or the black/grey half split.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoseStyle {
    Solid(Rgb),
    HalfBlackGrey,
}

/// Raw value of a tagged color field: a plain color or a pattern tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PartValue {
    Color(Rgb),
    Pattern(Pattern),
}

impl FromStr for PartValue {
    type Err = AvatarError;

    /// Accepts pattern tags, hex colors, or decimal packed colors.
    fn from_str(s: &str) -> AvatarResult<Self> {
        if let Ok(p) = s.parse::<Pattern>() {
            return Ok(Self::Pattern(p));
        }
        if let Ok(c) = Rgb::parse_hex(s) {
            return Ok(Self::Color(c));
        }
        match s.trim().parse::<u32>() {
            Ok(v) if v <= 0x00ff_ffff => Ok(Self::Color(Rgb::new(v))),
            _ => Err(AvatarError::validation(format!(
                "\"{s}\" is neither a color nor a pattern tag"
            ))),
        }
    }
}

macro_rules! tagged_style {
    ($ty:ident { $($pat:ident),+ }) => {
        impl TryFrom<PartValue> for $ty {
            type Error = AvatarError;

            fn try_from(v: PartValue) -> AvatarResult<Self> {
                match v {
                    PartValue::Color(c) => Ok(Self::Solid(c)),
                    $(PartValue::Pattern(Pattern::$pat) => Ok(Self::$pat),)+
                    PartValue::Pattern(p) => Err(AvatarError::validation(format!(
                        "pattern \"{}\" is not valid for {}",
                        p.tag(),
                        stringify!($ty)
                    ))),
                }
            }
        }

        impl From<$ty> for PartValue {
            fn from(v: $ty) -> Self {
                match v {
                    $ty::Solid(c) => Self::Color(c),
                    $($ty::$pat => Self::Pattern(Pattern::$pat),)+
                }
            }
        }

        impl Serialize for $ty {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                PartValue::from(*self).serialize(serializer)
            }
        }

        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = PartValue::deserialize(deserializer)?;
                Self::try_from(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

tagged_style!(TailStyle { OrangeStripes, GreyStripes });
tagged_style!(EyeStyle { GreenBlueSplit });
tagged_style!(NoseStyle { HalfBlackGrey });

/// Optional accessory drawn on the head.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Accessory {
    #[default]
    None,
    TopHat,
    Necklace,
}

impl Accessory {
    pub const ALL: [Self; 3] = [Self::None, Self::TopHat, Self::Necklace];

    /// Tag used by the persisted accessory key.
    pub fn tag(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::TopHat => "topHat",
            Self::Necklace => "necklace",
        }
    }
}

impl FromStr for Accessory {
    type Err = AvatarError;

    fn from_str(s: &str) -> AvatarResult<Self> {
        Self::ALL
            .into_iter()
            .find(|a| a.tag().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| AvatarError::validation(format!("unknown accessory \"{s}\"")))
    }
}

/// Customizable parts, named as in the persisted record.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PartKey {
    Ears,
    Body,
    Belly,
    Muzzle,
    Paws,
    Tail,
    TailTip,
    Eyes,
    EyeBase,
    Nose,
}

impl PartKey {
    pub const ALL: [Self; 10] = [
        Self::Ears,
        Self::Body,
        Self::Belly,
        Self::Muzzle,
        Self::Paws,
        Self::Tail,
        Self::TailTip,
        Self::Eyes,
        Self::EyeBase,
        Self::Nose,
    ];

    /// Key used in the persisted colors record.
    pub fn key(self) -> &'static str {
        match self {
            Self::Ears => "ears",
            Self::Body => "body",
            Self::Belly => "belly",
            Self::Muzzle => "muzzle",
            Self::Paws => "paws",
            Self::Tail => "tail",
            Self::TailTip => "tailTip",
            Self::Eyes => "eyes",
            Self::EyeBase => "eyeBase",
            Self::Nose => "nose",
        }
    }
}

impl FromStr for PartKey {
    type Err = AvatarError;

    fn from_str(s: &str) -> AvatarResult<Self> {
        // "tail-tip", "tail_tip" and "tailTip" all name the same part.
        let wanted = s.trim().replace(['-', '_'], "");
        Self::ALL
            .into_iter()
            .find(|k| k.key().eq_ignore_ascii_case(&wanted))
            .ok_or_else(|| AvatarError::validation(format!("unknown part \"{s}\"")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/customization/palette.rs"]
mod tests;
