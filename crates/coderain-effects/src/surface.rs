//! Drawing surfaces the rain renders into.

use coderain_core::{Font, Result, Rgba, Size};

/// Colour and font of a drawn glyph.
#[derive(Debug, Clone, PartialEq)]
pub struct GlyphStyle {
    pub color: Rgba,
    pub font: Font,
}

/// A fixed-size layer that glyphs are painted onto.
///
/// Coordinates follow an HTML canvas: `x` is the left edge of the glyph and
/// `y` its baseline. Anything outside the surface is clipped.
pub trait GlyphSurface {
    /// Current size of the surface.
    fn size(&self) -> Size;

    /// Reallocate the surface for a new size. Existing content is dropped.
    fn resize(&mut self, size: Size) -> Result<()>;

    /// Erase everything.
    fn clear(&mut self) -> Result<()>;

    /// Paint `color` over the whole surface, honouring its alpha.
    fn fill(&mut self, color: Rgba) -> Result<()>;

    /// Paint a single glyph.
    fn draw_glyph(&mut self, x: u32, y: u32, glyph: char, style: &GlyphStyle) -> Result<()>;

    /// Free the surface. Later drawing fails with `RenderTargetMissing`.
    fn release(&mut self);
}
