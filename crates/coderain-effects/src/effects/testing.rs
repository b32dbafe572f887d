//! Deterministic doubles shared by the engine tests.

use std::collections::VecDeque;

use coderain_core::{EffectError, Result, Rgba, Size};

use crate::random::RandomSource;
use crate::surface::{GlyphStyle, GlyphSurface};

/// Returns queued values, then `fallback` forever.
pub struct Scripted {
    values: VecDeque<f64>,
    fallback: f64,
}

impl Scripted {
    pub fn new(values: impl IntoIterator<Item = f64>, fallback: f64) -> Self {
        Self {
            values: values.into_iter().collect(),
            fallback,
        }
    }

    pub fn constant(value: f64) -> Self {
        Self::new([], value)
    }
}

impl RandomSource for Scripted {
    fn next_f64(&mut self) -> f64 {
        self.values.pop_front().unwrap_or(self.fallback)
    }
}

/// Operation performed on a [`Recorder`].
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    Resize(Size),
    Clear,
    Fill(Rgba),
    Glyph { x: u32, y: u32, glyph: char, color: Rgba },
}

/// Surface that logs every call.
#[derive(Debug, Default)]
pub struct Recorder {
    pub size: Size,
    pub ops: Vec<Op>,
    pub released: bool,
    /// Fail every glyph draw once this many ops have been logged.
    pub fail_after: Option<usize>,
}

impl GlyphSurface for Recorder {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, size: Size) -> Result<()> {
        self.size = size;
        self.ops.push(Op::Resize(size));
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.ops.push(Op::Clear);
        Ok(())
    }

    fn fill(&mut self, color: Rgba) -> Result<()> {
        self.ops.push(Op::Fill(color));
        Ok(())
    }

    fn draw_glyph(&mut self, x: u32, y: u32, glyph: char, style: &GlyphStyle) -> Result<()> {
        if self.fail_after.is_some_and(|n| self.ops.len() >= n) {
            return Err(EffectError::RenderTargetMissing("recorder".into()));
        }
        self.ops.push(Op::Glyph {
            x,
            y,
            glyph,
            color: style.color,
        });
        Ok(())
    }

    fn release(&mut self) {
        self.released = true;
        self.size = Size::ZERO;
    }
}
