//! Serde model of the settings file.

use std::time::Duration;

use coderain_core::{
    Direction, EffectError, EffectKind, Font, Link, RainConfig, Rgba, TextRevealConfig,
    Wrappers,
    chars::{KATAKANA_RAIN, LATIN_SCRAMBLE},
};
use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// Top-level settings file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub rain: RainSettings,
    pub message: MessageSettings,
    pub context_message: ContextMessageSettings,
}

/// `[rain]` section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RainSettings {
    pub enabled: bool,
    pub characters: String,
    pub column_width: u32,
    pub row_height: u32,
    pub interval_ms: u64,
    pub font: String,
    pub font_size: u16,
    pub text_color: String,
    pub overlay_color: String,
    /// Colour of each column's leading glyph.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_first_char: Option<String>,
    pub show_start: bool,
    pub direction: String,
    pub auto_start: bool,
}

impl Default for RainSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            characters: KATAKANA_RAIN.to_string(),
            column_width: 2,
            row_height: 1,
            interval_ms: 50,
            font: "monospace".to_string(),
            font_size: 14,
            text_color: "#00ff46".to_string(),
            overlay_color: "rgba(0, 0, 0, 0.08)".to_string(),
            highlight_first_char: Some("#c8ffc8".to_string()),
            show_start: false,
            direction: Direction::TopBottom.name().to_string(),
            auto_start: true,
        }
    }
}

impl RainSettings {
    /// Validated rain configuration.
    pub fn to_config(&self) -> Result<RainConfig, ConfigError> {
        let invalid = ConfigError::invalid;
        let config = RainConfig {
            characters: self.characters.clone(),
            column_width: self.column_width,
            row_height: self.row_height,
            interval: Duration::from_millis(self.interval_ms),
            font: Font {
                family: self.font.clone(),
                size: self.font_size,
            },
            text_color: color("text_color", &self.text_color).map_err(invalid("rain"))?,
            overlay_color: color("overlay_color", &self.overlay_color)
                .map_err(invalid("rain"))?,
            highlight_color: self
                .highlight_first_char
                .as_deref()
                .map(|c| color("highlight_first_char", c))
                .transpose()
                .map_err(invalid("rain"))?,
            show_start: self.show_start,
            direction: self.direction.parse().map_err(invalid("rain"))?,
        };
        config.validate().map_err(invalid("rain"))?;
        Ok(config)
    }
}

/// Hyperlink around a text effect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkSettings {
    pub url: String,
    #[serde(default = "default_link_target")]
    pub target: String,
}

fn default_link_target() -> String {
    "_self".to_string()
}

/// `text_effect` table inside a message section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextEffectSettings {
    /// Effect number; only `1` exists.
    pub effect: u8,
    pub characters: String,
    pub message: String,
    pub interval_ms: u64,
    pub pending_ticks: u32,
    pub character_ticks: u32,
    pub pending_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub highlight_char: Option<String>,
    /// `[prefix, suffix]` placed around the text.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wrappers: Option<[String; 2]>,
    /// Seconds to wait before playing again once finished. `0` means
    /// never.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub replay: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<LinkSettings>,
}

impl Default for TextEffectSettings {
    fn default() -> Self {
        Self {
            effect: EffectKind::Reveal.id(),
            characters: LATIN_SCRAMBLE.to_string(),
            message: "Wake up, Neo...".to_string(),
            interval_ms: 60,
            pending_ticks: 30,
            character_ticks: 3,
            pending_color: "#00782a".to_string(),
            highlight_char: Some("#ffffff".to_string()),
            wrappers: None,
            replay: None,
            link: None,
        }
    }
}

impl TextEffectSettings {
    /// Validated effect kind and configuration. `section` names the
    /// enclosing section in error messages.
    pub fn to_config(
        &self,
        section: &'static str,
    ) -> Result<(EffectKind, TextRevealConfig), ConfigError> {
        let invalid = ConfigError::invalid;
        let kind = EffectKind::from_id(self.effect).map_err(invalid(section))?;

        let replay = self
            .replay
            .filter(|&secs| secs != 0.0)
            .map(|secs| {
                Duration::try_from_secs_f64(secs).map_err(|_| {
                    EffectError::config("replay", "must be a non-negative number of seconds")
                })
            })
            .transpose()
            .map_err(invalid(section))?;

        let config = TextRevealConfig {
            characters: self.characters.clone(),
            message: self.message.clone(),
            interval: Duration::from_millis(self.interval_ms),
            pending_ticks: self.pending_ticks,
            character_ticks: self.character_ticks,
            pending_color: color("pending_color", &self.pending_color)
                .map_err(invalid(section))?,
            highlight_color: self
                .highlight_char
                .as_deref()
                .map(|c| color("highlight_char", c))
                .transpose()
                .map_err(invalid(section))?,
            wrappers: self.wrappers.as_ref().map(|[prefix, suffix]| Wrappers {
                prefix: prefix.clone(),
                suffix: suffix.clone(),
            }),
            link: self.link.as_ref().map(|link| Link {
                url: link.url.clone(),
                target: link.target.clone(),
            }),
            replay,
        };
        config.validate().map_err(invalid(section))?;
        Ok((kind, config))
    }
}

/// `[message]` section: the centred overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessageSettings {
    pub enabled: bool,
    /// Left click on the message replays it once it has finished.
    pub replay_on_click: bool,
    pub auto_start: bool,
    pub text_effect: TextEffectSettings,
}

impl Default for MessageSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            replay_on_click: true,
            auto_start: true,
            text_effect: TextEffectSettings::default(),
        }
    }
}

/// `[context_message]` section: the box opened by a right click.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextMessageSettings {
    pub enabled: bool,
    pub text_effect: TextEffectSettings,
}

impl Default for ContextMessageSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            text_effect: TextEffectSettings {
                message: "Follow the white rabbit.".to_string(),
                interval_ms: 40,
                pending_ticks: 8,
                character_ticks: 1,
                wrappers: Some(["[ ".to_string(), " ]".to_string()]),
                ..TextEffectSettings::default()
            },
        }
    }
}

fn color(field: &'static str, value: &str) -> Result<Rgba, EffectError> {
    value
        .parse()
        .map_err(|_| EffectError::config(field, format!("is not a colour: `{value}`")))
}
