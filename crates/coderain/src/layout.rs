//! Placement of the message boxes.

use coderain_core::Size;
use ratatui::layout::Rect;

fn to_u16(value: u32) -> u16 {
    value.min(u16::MAX as u32) as u16
}

/// Centre a `width` x `height` box in the viewport. Odd leftovers round
/// toward the top left, and boxes larger than the viewport stick to it.
pub fn centered(viewport: Size, width: u32, height: u32) -> Rect {
    let left = viewport.width.saturating_sub(width) / 2;
    let top = viewport.height.saturating_sub(height) / 2;
    Rect::new(
        to_u16(left),
        to_u16(top),
        to_u16(width.min(viewport.width)),
        to_u16(height.min(viewport.height)),
    )
}

/// Place a box at the pointer, flipping it to the left of or above the
/// pointer when it would run off the viewport.
pub fn at_pointer(viewport: Size, x: u32, y: u32, width: u32, height: u32) -> Rect {
    let left = if x + width > viewport.width {
        x.saturating_sub(width)
    } else {
        x
    };
    let top = if y + height > viewport.height {
        y.saturating_sub(height)
    } else {
        y
    };
    Rect::new(
        to_u16(left),
        to_u16(top),
        to_u16(width.min(viewport.width)),
        to_u16(height.min(viewport.height)),
    )
}
