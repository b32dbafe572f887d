//! The centred message overlay.

use std::cell::Cell;
use std::rc::Rc;

use coderain_config::MessageSettings;
use coderain_core::{EffectKind, Result as EffectResult, Size};
use coderain_effects::{
    MarkupBuffer, Scheduler, SeededRandom, TextRevealEngine, TickOutcome, TimerId,
};
use ratatui::{
    Frame,
    layout::{Position, Rect},
    widgets::{Clear, Paragraph},
};

use crate::layout::centered;

/// Text effect shown in the middle of the screen.
pub struct MessageBox {
    effect: TextRevealEngine<MarkupBuffer>,
    replay_on_click: bool,
    /// Set by the effect whenever its content changes.
    dirty: Rc<Cell<bool>>,
    viewport: Size,
    area: Rect,
}

impl MessageBox {
    /// Build the message and start it unless `auto_start` is off.
    pub fn new(
        settings: &MessageSettings,
        viewport: Size,
        scheduler: Rc<dyn Scheduler>,
    ) -> color_eyre::Result<Self> {
        let (kind, config) = settings.text_effect.to_config("message")?;
        let mut effect = match kind {
            EffectKind::Reveal => TextRevealEngine::new(
                config,
                MarkupBuffer::new(),
                Box::new(SeededRandom::from_os_rng()),
                scheduler,
            )?,
        };

        let dirty = Rc::new(Cell::new(true));
        let flag = Rc::clone(&dirty);
        effect.set_on_change(move || flag.set(true));

        if settings.auto_start {
            effect.start()?;
        }

        let mut message = Self {
            effect,
            replay_on_click: settings.replay_on_click,
            dirty,
            viewport,
            area: Rect::default(),
        };
        message.position();
        Ok(message)
    }

    /// Re-centre on the current content.
    pub fn position(&mut self) {
        let width = self
            .effect
            .container()
            .content()
            .map_or(0, |markup| markup.width() as u32);
        self.area = centered(self.viewport, width, 1);
        self.dirty.set(false);
    }

    pub fn resize(&mut self, viewport: Size) {
        if self.viewport != viewport {
            self.viewport = viewport;
            self.position();
        }
    }

    /// Play again, unless it is still playing.
    pub fn replay(&mut self) -> EffectResult<()> {
        if !self.effect.is_playing() {
            self.effect.replay()?;
        }
        Ok(())
    }

    /// Handle a left click. Returns whether the click landed on the message.
    pub fn on_click(&mut self, x: u16, y: u16) -> EffectResult<bool> {
        if !self.area.contains(Position::new(x, y)) {
            return Ok(false);
        }
        if self.replay_on_click {
            self.replay()?;
        }
        Ok(true)
    }

    pub fn on_timer(&mut self, id: TimerId) -> EffectResult<TickOutcome> {
        self.effect.on_timer(id)
    }

    pub fn is_playing(&self) -> bool {
        self.effect.is_playing()
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn render(&mut self, frame: &mut Frame) {
        if self.dirty.get() {
            self.position();
        }
        let Some(markup) = self.effect.container().content().filter(|m| !m.hidden) else {
            return;
        };
        frame.render_widget(Clear, self.area);
        frame.render_widget(Paragraph::new(markup.to_line()), self.area);
    }

    pub fn destroy(&mut self) -> EffectResult<()> {
        self.effect.destroy()
    }
}
