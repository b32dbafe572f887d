//! Terminal renditions of the coderain effects.
//!
//! Two engines live here: [`RainEngine`], the falling glyph rain, and
//! [`TextRevealEngine`], which scrambles a message and locks it in one
//! character at a time. Neither engine owns a clock or touches the terminal
//! directly. Time arrives through a [`Scheduler`], randomness through a
//! [`RandomSource`], and output goes to a [`GlyphSurface`] or a
//! [`MarkupSurface`], so every piece can be swapped for a deterministic
//! double in tests.

mod canvas;
mod effects;
mod markup;
mod random;
mod schedule;
mod surface;

pub use canvas::{CanvasCell, GlyphCanvas};
pub use effects::rain::{PREFILL_TICKS, RESET_THRESHOLD, RainEngine};
pub use effects::reveal::{Phase, RevealState, TextRevealEngine};
pub use markup::{Markup, MarkupBuffer, MarkupSurface};
pub use random::{RandomSource, SeededRandom};
pub use schedule::{Scheduler, TickOutcome, TimerGuard, TimerId, TimerQueue};
pub use surface::{GlyphStyle, GlyphSurface};
