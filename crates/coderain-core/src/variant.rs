//! Named variants selected by configuration strings.

use std::fmt;
use std::str::FromStr;

use crate::EffectError;

/// Direction the rain falls in.
///
/// Only top-to-bottom is implemented; every other value is rejected when the
/// configuration is parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    #[default]
    TopBottom,
}

impl Direction {
    /// Configuration name of this direction.
    pub fn name(self) -> &'static str {
        match self {
            Direction::TopBottom => "top-bottom",
        }
    }
}

impl FromStr for Direction {
    type Err = EffectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "top-bottom" => Ok(Direction::TopBottom),
            other => Err(EffectError::UnsupportedVariant {
                kind: "direction",
                value: other.to_string(),
            }),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Text effect variant, numbered as in the settings file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EffectKind {
    /// Scrambled glyphs that lock into the message one character at a time.
    #[default]
    Reveal,
}

impl EffectKind {
    /// Look up an effect by its settings number.
    pub fn from_id(id: u8) -> Result<Self, EffectError> {
        match id {
            1 => Ok(EffectKind::Reveal),
            other => Err(EffectError::UnsupportedVariant {
                kind: "text effect",
                value: other.to_string(),
            }),
        }
    }

    /// Settings number of this effect.
    pub fn id(self) -> u8 {
        match self {
            EffectKind::Reveal => 1,
        }
    }
}
