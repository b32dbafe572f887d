//! Everything on screen: the rain, the centred message and the context
//! message.

use std::rc::Rc;

use coderain_config::Settings;
use coderain_core::{Result as EffectResult, Size};
use coderain_effects::{GlyphCanvas, RainEngine, Scheduler, SeededRandom, TickOutcome, TimerId};
use ratatui::Frame;
use tracing::{debug, error, trace};

use crate::context_message::ContextMessage;
use crate::message::MessageBox;

/// Owns the effects enabled in the settings and routes input and timers to
/// them.
pub struct Shell {
    rain: Option<RainEngine<GlyphCanvas>>,
    message: Option<MessageBox>,
    context: Option<ContextMessage>,
    viewport: Size,
}

impl Shell {
    pub fn new(
        settings: &Settings,
        viewport: Size,
        scheduler: Rc<dyn Scheduler>,
    ) -> color_eyre::Result<Self> {
        let rain = if settings.rain.enabled {
            let mut rain = RainEngine::new(
                settings.rain.to_config()?,
                GlyphCanvas::new("rain", Size::ZERO),
                Some(GlyphCanvas::new("rain highlight", Size::ZERO)),
                viewport,
                Box::new(SeededRandom::from_os_rng()),
                Rc::clone(&scheduler),
            )?;
            if settings.rain.auto_start {
                rain.start()?;
            }
            Some(rain)
        } else {
            None
        };

        let message = settings
            .message
            .enabled
            .then(|| MessageBox::new(&settings.message, viewport, Rc::clone(&scheduler)))
            .transpose()?;

        let context = settings
            .context_message
            .enabled
            .then(|| ContextMessage::new(&settings.context_message, Rc::clone(&scheduler)))
            .transpose()?;

        Ok(Self {
            rain,
            message,
            context,
            viewport,
        })
    }

    pub fn resize(&mut self, viewport: Size) -> EffectResult<()> {
        if self.viewport == viewport {
            return Ok(());
        }
        debug!(width = viewport.width, height = viewport.height, "viewport resized");
        self.viewport = viewport;
        if let Some(rain) = &mut self.rain {
            rain.resize(viewport)?;
        }
        if let Some(message) = &mut self.message {
            message.resize(viewport);
        }
        if let Some(context) = &mut self.context {
            context.hide();
        }
        Ok(())
    }

    /// Offer a fired timer to every effect; only its owner acts on it.
    /// Tick failures are logged, the failing effect has already stopped.
    pub fn dispatch(&mut self, id: TimerId) {
        let outcomes = [
            ("rain", self.rain.as_mut().map(|rain| rain.on_timer(id))),
            ("message", self.message.as_mut().map(|message| message.on_timer(id))),
            (
                "context message",
                self.context.as_mut().map(|context| context.on_timer(id)),
            ),
        ];
        for (effect, outcome) in outcomes {
            match outcome {
                Some(Err(err)) => error!(effect, %id, %err, "effect tick failed"),
                Some(Ok(TickOutcome::Ignored)) | None => {}
                Some(Ok(outcome)) => trace!(effect, %id, ?outcome, "timer handled"),
            }
        }
    }

    /// Pause the rain, or resume it where it left off.
    pub fn toggle_rain(&mut self) -> EffectResult<()> {
        let Some(rain) = &mut self.rain else {
            return Ok(());
        };
        if rain.is_playing() {
            rain.stop(false)
        } else {
            rain.start()
        }
    }

    pub fn replay_message(&mut self) -> EffectResult<()> {
        match &mut self.message {
            Some(message) => message.replay(),
            None => Ok(()),
        }
    }

    /// A left click closes an open context message, otherwise it goes to
    /// the message.
    pub fn on_left_click(&mut self, x: u16, y: u16) -> EffectResult<()> {
        if let Some(context) = self.context.as_mut().filter(|c| c.is_open()) {
            context.hide();
            return Ok(());
        }
        if let Some(message) = &mut self.message {
            message.on_click(x, y)?;
        }
        Ok(())
    }

    pub fn on_right_click(&mut self, x: u16, y: u16) -> EffectResult<()> {
        match &mut self.context {
            Some(context) => context.show(x, y, self.viewport),
            None => Ok(()),
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let area = frame.area();
        if let Some(rain) = &self.rain {
            frame.render_widget(rain.primary(), area);
            if let Some(highlight) = rain.highlight() {
                frame.render_widget(highlight, area);
            }
        }
        if let Some(message) = &mut self.message {
            message.render(frame);
        }
        if let Some(context) = &self.context {
            context.render(frame);
        }
    }

    /// Tear down every effect, releasing surfaces and timers.
    pub fn destroy(&mut self) -> EffectResult<()> {
        if let Some(rain) = &mut self.rain {
            rain.destroy()?;
        }
        if let Some(message) = &mut self.message {
            message.destroy()?;
        }
        if let Some(context) = &mut self.context {
            context.destroy()?;
        }
        Ok(())
    }

    pub fn rain(&self) -> Option<&RainEngine<GlyphCanvas>> {
        self.rain.as_ref()
    }

    pub fn message(&self) -> Option<&MessageBox> {
        self.message.as_ref()
    }

    pub fn context(&self) -> Option<&ContextMessage> {
        self.context.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use coderain_effects::TimerQueue;

    use super::*;

    fn shell(settings: &Settings) -> (Shell, Rc<TimerQueue>, Instant) {
        let start = Instant::now();
        let queue = Rc::new(TimerQueue::new(start));
        let shell = Shell::new(settings, Size::new(40, 10), queue.clone()).unwrap();
        (shell, queue, start)
    }

    #[test]
    fn test_defaults_start_rain_and_message() {
        let (shell, queue, _) = shell(&Settings::default());
        assert!(shell.rain().unwrap().is_playing());
        assert!(shell.message().unwrap().is_playing());
        assert!(!shell.context().unwrap().is_open());
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_disabled_sections_are_skipped() {
        let mut settings = Settings::default();
        settings.rain.enabled = false;
        settings.message.enabled = false;
        let (shell, queue, _) = shell(&settings);
        assert!(shell.rain().is_none());
        assert!(shell.message().is_none());
        assert!(shell.context().is_some());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_dispatch_advances_rain() {
        let mut settings = Settings::default();
        settings.message.enabled = false;
        let (mut shell, queue, start) = shell(&settings);

        let before = shell.rain().unwrap().drops().to_vec();
        for id in queue.poll(start + Duration::from_millis(50)) {
            shell.dispatch(id);
        }
        assert_ne!(shell.rain().unwrap().drops(), before.as_slice());
    }

    #[test]
    fn test_toggle_rain() {
        let (mut shell, _, _) = shell(&Settings::default());
        shell.toggle_rain().unwrap();
        assert!(!shell.rain().unwrap().is_playing());
        shell.toggle_rain().unwrap();
        assert!(shell.rain().unwrap().is_playing());
    }

    #[test]
    fn test_clicks() {
        let (mut shell, queue, _) = shell(&Settings::default());
        shell.on_right_click(5, 5).unwrap();
        assert!(shell.context().unwrap().is_open());
        assert_eq!(queue.len(), 3);

        shell.on_left_click(5, 5).unwrap();
        assert!(!shell.context().unwrap().is_open());
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn test_destroy_releases_everything() {
        let (mut shell, queue, _) = shell(&Settings::default());
        shell.destroy().unwrap();
        assert!(queue.is_empty());
        assert!(shell.rain().unwrap().primary().is_released());
        assert!(shell.message().is_some_and(|m| !m.is_playing()));
    }
}
