//! Colours as written in settings files.

use std::fmt;
use std::str::FromStr;

use ratatui::style::Color;

use crate::EffectError;

/// An sRGB colour with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    /// Opacity from 0.0 (transparent) to 1.0 (opaque).
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0.0);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    /// Create a colour from channels and opacity.
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Create an opaque colour.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Whether the colour fully covers what is beneath it.
    pub fn is_opaque(self) -> bool {
        self.a >= 1.0
    }

    /// Composite this colour over `base` and return the opaque result.
    pub fn over(self, base: Rgba) -> Rgba {
        let a = self.a.clamp(0.0, 1.0);
        let mix = |top: u8, bottom: u8| -> u8 {
            (bottom as f32 * (1.0 - a) + top as f32 * a).round() as u8
        };
        Rgba::rgb(mix(self.r, base.r), mix(self.g, base.g), mix(self.b, base.b))
    }

    /// Largest per-channel difference between two colours, ignoring alpha.
    pub fn distance(self, other: Rgba) -> u8 {
        self.r
            .abs_diff(other.r)
            .max(self.g.abs_diff(other.g))
            .max(self.b.abs_diff(other.b))
    }

    /// Terminal colour for this value. Alpha is dropped.
    pub fn to_color(self) -> Color {
        Color::Rgb(self.r, self.g, self.b)
    }

    /// Convert HSL (hue in degrees, saturation and lightness in 0..=1).
    pub fn hsl(h: f32, s: f32, l: f32) -> Rgba {
        if s == 0.0 {
            let v = (l * 255.0) as u8;
            return Rgba::rgb(v, v, v);
        }

        let q = if l < 0.5 {
            l * (1.0 + s)
        } else {
            l + s - l * s
        };
        let p = 2.0 * l - q;

        let h = h.rem_euclid(360.0) / 360.0;

        let r = hue_to_rgb(p, q, h + 1.0 / 3.0);
        let g = hue_to_rgb(p, q, h);
        let b = hue_to_rgb(p, q, h - 1.0 / 3.0);

        Rgba::rgb((r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8)
    }
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

impl From<Rgba> for Color {
    fn from(value: Rgba) -> Self {
        value.to_color()
    }
}

impl fmt::Display for Rgba {
    /// Formats as CSS: `#rrggbb` when opaque, `rgba(...)` otherwise.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_opaque() {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
        }
    }
}

impl FromStr for Rgba {
    type Err = EffectError;

    /// Parse `#rgb`, `#rrggbb`, `#rrggbbaa`, `rgb()`, `rgba()`, `hsl()`,
    /// `transparent` and a few colour names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let invalid = || EffectError::config("color", format!("cannot parse `{s}`"));

        if let Some(hex) = s.strip_prefix('#') {
            return parse_hex(hex).ok_or_else(invalid);
        }

        let lower = s.to_ascii_lowercase();
        if let Some(args) = function_args(&lower, "rgba").or_else(|| function_args(&lower, "rgb"))
        {
            return parse_rgb_args(&args).ok_or_else(invalid);
        }
        if let Some(args) = function_args(&lower, "hsl") {
            return parse_hsl_args(&args).ok_or_else(invalid);
        }

        match lower.as_str() {
            "transparent" => Ok(Rgba::TRANSPARENT),
            "black" => Ok(Rgba::BLACK),
            "white" => Ok(Rgba::WHITE),
            "red" => Ok(Rgba::rgb(255, 0, 0)),
            "lime" => Ok(Rgba::rgb(0, 255, 0)),
            "green" => Ok(Rgba::rgb(0, 128, 0)),
            "blue" => Ok(Rgba::rgb(0, 0, 255)),
            "gray" | "grey" => Ok(Rgba::rgb(128, 128, 128)),
            _ => Err(invalid()),
        }
    }
}

fn parse_hex(hex: &str) -> Option<Rgba> {
    let nibble = |i: usize| u8::from_str_radix(hex.get(i..i + 1)?, 16).ok();
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();

    match hex.len() {
        3 => Some(Rgba::rgb(
            nibble(0)? * 17,
            nibble(1)? * 17,
            nibble(2)? * 17,
        )),
        6 => Some(Rgba::rgb(byte(0)?, byte(2)?, byte(4)?)),
        8 => Some(Rgba::new(
            byte(0)?,
            byte(2)?,
            byte(4)?,
            byte(6)? as f32 / 255.0,
        )),
        _ => None,
    }
}

/// Split `name(a, b, c)` into its trimmed arguments.
fn function_args<'a>(s: &'a str, name: &str) -> Option<Vec<&'a str>> {
    let inner = s.strip_prefix(name)?.trim_start().strip_prefix('(')?;
    let inner = inner.strip_suffix(')')?;
    Some(inner.split(',').map(str::trim).collect())
}

fn parse_rgb_args(args: &[&str]) -> Option<Rgba> {
    let channel = |v: &str| v.parse::<u8>().ok();
    match args {
        [r, g, b] => Some(Rgba::rgb(channel(r)?, channel(g)?, channel(b)?)),
        [r, g, b, a] => {
            let a = a.parse::<f32>().ok()?;
            if !(0.0..=1.0).contains(&a) {
                return None;
            }
            Some(Rgba::new(channel(r)?, channel(g)?, channel(b)?, a))
        }
        _ => None,
    }
}

fn parse_hsl_args(args: &[&str]) -> Option<Rgba> {
    let percent = |v: &str| -> Option<f32> {
        let v = v.strip_suffix('%')?.parse::<f32>().ok()?;
        (0.0..=100.0).contains(&v).then_some(v / 100.0)
    };
    match args {
        [h, s, l] => Some(Rgba::hsl(h.parse().ok()?, percent(s)?, percent(l)?)),
        _ => None,
    }
}
