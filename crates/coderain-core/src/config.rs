//! Validated effect configuration.

use std::time::Duration;

use ratatui::layout::Rect;

use crate::chars::{KATAKANA_RAIN, LATIN_SCRAMBLE};
use crate::{Direction, EffectError, Result, Rgba};

/// Width and height of a viewport or surface, in cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const ZERO: Size = Size::new(0, 0);

    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Number of cells covered by this size.
    pub fn area(self) -> usize {
        self.width as usize * self.height as usize
    }
}

impl From<Rect> for Size {
    fn from(rect: Rect) -> Self {
        Size::new(rect.width as u32, rect.height as u32)
    }
}

impl From<ratatui::layout::Size> for Size {
    fn from(size: ratatui::layout::Size) -> Self {
        Size::new(size.width as u32, size.height as u32)
    }
}

/// Ordered, non-empty set of glyphs an effect picks from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet(Vec<char>);

impl Alphabet {
    /// Split a string into glyphs. Fails when the string is empty.
    pub fn parse(field: &'static str, characters: &str) -> Result<Self> {
        let glyphs: Vec<char> = characters.chars().collect();
        if glyphs.is_empty() {
            return Err(EffectError::config(field, "must not be empty"));
        }
        Ok(Self(glyphs))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Never true for a parsed alphabet.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Glyph at `index`, wrapping around the alphabet.
    pub fn glyph(&self, index: usize) -> char {
        self.0[index % self.0.len()]
    }

    pub fn as_slice(&self) -> &[char] {
        &self.0
    }
}

/// Font used for rain glyphs. Terminal surfaces ignore it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Font {
    pub family: String,
    pub size: u16,
}

impl Default for Font {
    fn default() -> Self {
        Self {
            family: "monospace".to_string(),
            size: 14,
        }
    }
}

/// Hyperlink wrapped around a text effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    pub url: String,
    pub target: String,
}

/// Decoration placed before and after a text effect.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Wrappers {
    pub prefix: String,
    pub suffix: String,
}

/// Settings for the falling glyph rain.
#[derive(Debug, Clone, PartialEq)]
pub struct RainConfig {
    /// Glyphs the rain is made of.
    pub characters: String,
    /// Horizontal distance between columns.
    pub column_width: u32,
    /// Vertical distance between rows.
    pub row_height: u32,
    /// Time between two ticks.
    pub interval: Duration,
    pub font: Font,
    pub text_color: Rgba,
    /// Translucent colour laid over the canvas every tick to fade old glyphs.
    pub overlay_color: Rgba,
    /// Colour of each column's leading glyph, drawn on a separate layer.
    pub highlight_color: Option<Rgba>,
    /// When false the canvas is pre-filled before the first frame is shown.
    pub show_start: bool,
    pub direction: Direction,
}

impl Default for RainConfig {
    fn default() -> Self {
        Self {
            characters: KATAKANA_RAIN.to_string(),
            column_width: 2,
            row_height: 1,
            interval: Duration::from_millis(50),
            font: Font::default(),
            text_color: Rgba::rgb(0, 255, 70),
            overlay_color: Rgba::new(0, 0, 0, 0.08),
            highlight_color: Some(Rgba::rgb(200, 255, 200)),
            show_start: false,
            direction: Direction::TopBottom,
        }
    }
}

impl RainConfig {
    /// Check every field and return the rain alphabet.
    pub fn validate(&self) -> Result<Alphabet> {
        let alphabet = Alphabet::parse("characters", &self.characters)?;
        if self.column_width == 0 {
            return Err(EffectError::config("column_width", "must be positive"));
        }
        if self.row_height == 0 {
            return Err(EffectError::config("row_height", "must be positive"));
        }
        if self.interval.is_zero() {
            return Err(EffectError::config("interval", "must be positive"));
        }
        if self.font.size == 0 {
            return Err(EffectError::config("font_size", "must be positive"));
        }
        Ok(alphabet)
    }
}

/// Settings for the character reveal text effect.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRevealConfig {
    /// Glyphs shown in place of unresolved characters.
    pub characters: String,
    /// Final text the effect resolves to.
    pub message: String,
    pub interval: Duration,
    /// Ticks before the first character resolves.
    pub pending_ticks: u32,
    /// Ticks between each later character.
    pub character_ticks: u32,
    pub pending_color: Rgba,
    /// Colour of the glyph right after the resolved prefix.
    pub highlight_color: Option<Rgba>,
    pub wrappers: Option<Wrappers>,
    pub link: Option<Link>,
    /// Delay before a finished effect plays again.
    pub replay: Option<Duration>,
}

impl Default for TextRevealConfig {
    fn default() -> Self {
        Self {
            characters: LATIN_SCRAMBLE.to_string(),
            message: "Wake up, Neo...".to_string(),
            interval: Duration::from_millis(60),
            pending_ticks: 30,
            character_ticks: 3,
            pending_color: Rgba::rgb(0, 120, 40),
            highlight_color: Some(Rgba::WHITE),
            wrappers: None,
            link: None,
            replay: None,
        }
    }
}

impl TextRevealConfig {
    /// Check every field and return `(alphabet, message glyphs)`.
    pub fn validate(&self) -> Result<(Alphabet, Vec<char>)> {
        let alphabet = Alphabet::parse("characters", &self.characters)?;
        let message: Vec<char> = self.message.chars().collect();
        if message.is_empty() {
            return Err(EffectError::config("message", "must not be empty"));
        }
        if self.interval.is_zero() {
            return Err(EffectError::config("interval", "must be positive"));
        }
        if self.pending_ticks == 0 {
            return Err(EffectError::config("pending_ticks", "must be positive"));
        }
        if self.character_ticks == 0 {
            return Err(EffectError::config("character_ticks", "must be positive"));
        }
        if self.replay.is_some_and(|d| d.is_zero()) {
            return Err(EffectError::config("replay", "must be positive when set"));
        }
        Ok((alphabet, message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alphabet() {
        let alphabet = Alphabet::parse("characters", "ab1").unwrap();
        assert_eq!(alphabet.len(), 3);
        assert_eq!(alphabet.glyph(4), 'b');
        assert_eq!(
            Alphabet::parse("characters", ""),
            Err(EffectError::config("characters", "must not be empty"))
        );
    }

    #[test]
    fn test_rain_defaults_validate() {
        assert!(RainConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rain_rejects_zero_sizes() {
        let config = RainConfig {
            column_width: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EffectError::Configuration { field: "column_width", .. })
        ));

        let config = RainConfig {
            interval: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = RainConfig {
            characters: String::new(),
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EffectError::Configuration { field: "characters", .. })
        ));
    }

    #[test]
    fn test_text_validate() {
        let (alphabet, message) = TextRevealConfig::default().validate().unwrap();
        assert!(!alphabet.is_empty());
        assert_eq!(message.len(), "Wake up, Neo...".chars().count());

        let config = TextRevealConfig {
            message: String::new(),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = TextRevealConfig {
            character_ticks: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = TextRevealConfig {
            pending_ticks: 0,
            ..Default::default()
        };
        assert!(matches!(
            config.validate(),
            Err(EffectError::Configuration { field: "pending_ticks", .. })
        ));

        let config = TextRevealConfig {
            pending_ticks: 1,
            character_ticks: 1,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_size_from_rect() {
        let size = Size::from(Rect::new(3, 4, 80, 24));
        assert_eq!(size, Size::new(80, 24));
        assert_eq!(size.area(), 1920);
    }
}
