//! Core types shared by the coderain effects, config and terminal app.

pub mod chars;
mod color;
mod config;
mod error;
mod variant;

pub use color::Rgba;
pub use config::{Alphabet, Font, Link, RainConfig, Size, TextRevealConfig, Wrappers};
pub use error::{EffectError, Result};
pub use variant::{Direction, EffectKind};
