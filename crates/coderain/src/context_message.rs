//! The message opened by a right click.

use std::rc::Rc;

use coderain_config::ContextMessageSettings;
use coderain_core::{EffectKind, Result as EffectResult, Size};
use coderain_effects::{
    MarkupBuffer, Scheduler, SeededRandom, TextRevealEngine, TickOutcome, TimerId,
};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Style},
    widgets::{Block, Clear, Paragraph},
};

use crate::layout::at_pointer;

/// Box anchored at the pointer that plays its text effect each time it
/// opens.
pub struct ContextMessage {
    effect: TextRevealEngine<MarkupBuffer>,
    width: u32,
    area: Rect,
    open: bool,
}

impl ContextMessage {
    pub fn new(
        settings: &ContextMessageSettings,
        scheduler: Rc<dyn Scheduler>,
    ) -> color_eyre::Result<Self> {
        let (kind, config) = settings.text_effect.to_config("context_message")?;
        let effect = match kind {
            EffectKind::Reveal => TextRevealEngine::new(
                config,
                MarkupBuffer::new(),
                Box::new(SeededRandom::from_os_rng()),
                scheduler,
            )?,
        };
        // The placeholder already has the final width, plus one cell of
        // border on each side.
        let width = effect
            .container()
            .content()
            .map_or(0, |markup| markup.width() as u32)
            + 2;

        Ok(Self {
            effect,
            width,
            area: Rect::default(),
            open: false,
        })
    }

    /// Open at the pointer and play from the start.
    pub fn show(&mut self, x: u16, y: u16, viewport: Size) -> EffectResult<()> {
        self.area = at_pointer(viewport, x.into(), y.into(), self.width, 3);
        self.effect.start()?;
        self.open = true;
        Ok(())
    }

    pub fn hide(&mut self) {
        if self.open {
            self.effect.stop();
            self.open = false;
        }
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn on_timer(&mut self, id: TimerId) -> EffectResult<TickOutcome> {
        self.effect.on_timer(id)
    }

    pub fn render(&self, frame: &mut Frame) {
        if !self.open {
            return;
        }
        let Some(markup) = self.effect.container().content().filter(|m| !m.hidden) else {
            return;
        };
        let block = Block::bordered().border_style(Style::default().fg(Color::DarkGray));
        frame.render_widget(Clear, self.area);
        frame.render_widget(Paragraph::new(markup.to_line()).block(block), self.area);
    }

    pub fn destroy(&mut self) -> EffectResult<()> {
        self.open = false;
        self.effect.destroy()
    }
}
