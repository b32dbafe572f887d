//! Terminal cell canvas.

use coderain_core::{EffectError, Result, Rgba, Size};
use ratatui::{
    buffer::Buffer,
    layout::{Position, Rect},
    widgets::Widget,
};

use crate::surface::{GlyphStyle, GlyphSurface};

/// Channel distance under which a faded glyph counts as gone.
const FADE_EPSILON: u8 = 12;

/// A lit cell on the canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasCell {
    pub glyph: char,
    pub color: Rgba,
}

/// [`GlyphSurface`] backed by a grid of terminal cells.
///
/// Translucent fills darken every lit cell toward the fill colour, which is
/// what leaves the fading trail behind each drop.
#[derive(Debug, Clone)]
pub struct GlyphCanvas {
    name: &'static str,
    size: Size,
    cells: Vec<Option<CanvasCell>>,
    released: bool,
}

impl GlyphCanvas {
    /// Create an empty canvas. `name` identifies it in error messages.
    pub fn new(name: &'static str, size: Size) -> Self {
        Self {
            name,
            size,
            cells: vec![None; size.area()],
            released: false,
        }
    }

    /// Cell at column `x`, row `y`, if lit.
    pub fn cell(&self, x: u32, y: u32) -> Option<CanvasCell> {
        if x >= self.size.width || y >= self.size.height {
            return None;
        }
        self.cells[self.offset(x, y)]
    }

    /// Number of lit cells.
    pub fn lit(&self) -> usize {
        self.cells.iter().filter(|c| c.is_some()).count()
    }

    /// Whether [`GlyphSurface::release`] has been called.
    pub fn is_released(&self) -> bool {
        self.released
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        y as usize * self.size.width as usize + x as usize
    }

    fn ensure_live(&self) -> Result<()> {
        if self.released {
            return Err(EffectError::RenderTargetMissing(self.name.to_string()));
        }
        Ok(())
    }
}

impl GlyphSurface for GlyphCanvas {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, size: Size) -> Result<()> {
        self.released = false;
        self.size = size;
        self.cells = vec![None; size.area()];
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.ensure_live()?;
        self.cells.fill(None);
        Ok(())
    }

    fn fill(&mut self, color: Rgba) -> Result<()> {
        self.ensure_live()?;
        if color.a <= 0.0 {
            return Ok(());
        }
        if color.is_opaque() {
            self.cells.fill(None);
            return Ok(());
        }

        let background = Rgba::rgb(color.r, color.g, color.b);
        for slot in &mut self.cells {
            let Some(cell) = slot.as_mut() else {
                continue;
            };
            cell.color = color.over(cell.color);
            if cell.color.distance(background) <= FADE_EPSILON {
                *slot = None;
            }
        }
        Ok(())
    }

    fn draw_glyph(&mut self, x: u32, y: u32, glyph: char, style: &GlyphStyle) -> Result<()> {
        self.ensure_live()?;
        // The glyph sits on its baseline, so it fills the row above `y`.
        let Some(row) = y.checked_sub(1) else {
            return Ok(());
        };
        if x >= self.size.width || row >= self.size.height {
            return Ok(());
        }
        let offset = self.offset(x, row);
        self.cells[offset] = Some(CanvasCell {
            glyph,
            color: style.color,
        });
        Ok(())
    }

    fn release(&mut self) {
        self.released = true;
        self.size = Size::ZERO;
        self.cells = Vec::new();
    }
}

impl Widget for &GlyphCanvas {
    /// Draw the lit cells, leaving unlit cells untouched so layers stack.
    fn render(self, area: Rect, buf: &mut Buffer) {
        let width = (area.width as u32).min(self.size.width);
        let height = (area.height as u32).min(self.size.height);

        for y in 0..height {
            for x in 0..width {
                let Some(lit) = self.cells[self.offset(x, y)] else {
                    continue;
                };
                let position = Position::new(area.x + x as u16, area.y + y as u16);
                if let Some(cell) = buf.cell_mut(position) {
                    cell.set_char(lit.glyph).set_fg(lit.color.to_color());
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coderain_core::Font;

    fn style(color: Rgba) -> GlyphStyle {
        GlyphStyle {
            color,
            font: Font::default(),
        }
    }

    #[test]
    fn test_draw_uses_baseline() {
        let mut canvas = GlyphCanvas::new("rain", Size::new(4, 3));
        let green = style(Rgba::rgb(0, 255, 0));

        canvas.draw_glyph(1, 1, 'a', &green).unwrap();
        assert_eq!(canvas.cell(1, 0).map(|c| c.glyph), Some('a'));

        // Baseline 0 puts the glyph above the surface.
        canvas.draw_glyph(2, 0, 'b', &green).unwrap();
        // Baseline past the bottom is clipped too.
        canvas.draw_glyph(2, 4, 'c', &green).unwrap();
        canvas.draw_glyph(9, 2, 'd', &green).unwrap();
        assert_eq!(canvas.lit(), 1);
    }

    #[test]
    fn test_fill_fades_cells() {
        let mut canvas = GlyphCanvas::new("rain", Size::new(2, 2));
        canvas
            .draw_glyph(0, 1, 'x', &style(Rgba::rgb(0, 200, 0)))
            .unwrap();

        canvas.fill(Rgba::new(0, 0, 0, 0.5)).unwrap();
        assert_eq!(canvas.cell(0, 0).map(|c| c.color), Some(Rgba::rgb(0, 100, 0)));

        for _ in 0..8 {
            canvas.fill(Rgba::new(0, 0, 0, 0.5)).unwrap();
        }
        assert_eq!(canvas.lit(), 0);
    }

    #[test]
    fn test_opaque_fill_clears() {
        let mut canvas = GlyphCanvas::new("rain", Size::new(2, 2));
        canvas.draw_glyph(0, 1, 'x', &style(Rgba::WHITE)).unwrap();
        canvas.fill(Rgba::new(1, 2, 3, 0.0)).unwrap();
        assert_eq!(canvas.lit(), 1);
        canvas.fill(Rgba::BLACK).unwrap();
        assert_eq!(canvas.lit(), 0);
    }

    #[test]
    fn test_released_canvas_reports_missing_target() {
        let mut canvas = GlyphCanvas::new("highlight", Size::new(2, 2));
        canvas.release();
        assert!(canvas.is_released());
        assert_eq!(canvas.size(), Size::ZERO);
        assert_eq!(
            canvas.draw_glyph(0, 1, 'x', &style(Rgba::WHITE)),
            Err(EffectError::RenderTargetMissing("highlight".into()))
        );

        canvas.resize(Size::new(1, 1)).unwrap();
        assert!(canvas.clear().is_ok());
    }

    #[test]
    fn test_render_widget() {
        let mut canvas = GlyphCanvas::new("rain", Size::new(3, 2));
        canvas
            .draw_glyph(2, 2, 'ア', &style(Rgba::rgb(0, 255, 0)))
            .unwrap();

        let area = Rect::new(0, 0, 3, 2);
        let mut buf = Buffer::empty(area);
        (&canvas).render(area, &mut buf);

        assert_eq!(buf[(2, 1)].symbol(), "ア");
        assert_eq!(buf[(0, 0)].symbol(), " ");
    }
}
