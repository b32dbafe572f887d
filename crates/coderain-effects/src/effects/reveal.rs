//! Scrambled text that resolves one character at a time.

use std::fmt;
use std::rc::Rc;

use coderain_core::{Alphabet, EffectError, Result, TextRevealConfig};
use tracing::{debug, error};

use crate::markup::{Markup, MarkupSurface};
use crate::random::RandomSource;
use crate::schedule::{Scheduler, TickOutcome, TimerGuard, TimerId};

/// Where a play-through stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Phase {
    /// Initial dwell before the first character resolves.
    #[default]
    PreviewPending,
    /// At least one character has resolved.
    Revealing,
}

/// Progress of one play-through.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RevealState {
    /// Number of message characters locked in.
    pub resolved: usize,
    /// Ticks since the last resolution.
    pub ticks: u32,
    pub phase: Phase,
}

/// Text effect that shows random glyphs and locks the message in from the
/// left.
///
/// The first character waits `pending_ticks`, each later one
/// `character_ticks`. Every tick replaces the container content. Once the
/// whole message is shown the effect stops, which resets its progress, and
/// if a replay delay is configured it starts again from the beginning after
/// that delay.
pub struct TextRevealEngine<C: MarkupSurface> {
    config: TextRevealConfig,
    alphabet: Alphabet,
    message: Vec<char>,
    container: C,
    random: Box<dyn RandomSource>,
    scheduler: Rc<dyn Scheduler>,
    state: RevealState,
    ticker: Option<TimerGuard>,
    repeat: Option<TimerGuard>,
    playing: bool,
    destroyed: bool,
    on_change: Option<Box<dyn FnMut()>>,
}

impl<C: MarkupSurface> TextRevealEngine<C> {
    /// Build the engine. The container immediately receives an invisible
    /// copy of the finished text so it has its final size. Not started.
    pub fn new(
        config: TextRevealConfig,
        mut container: C,
        random: Box<dyn RandomSource>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Result<Self> {
        let (alphabet, message) = config.validate()?;
        container.set_content(Markup::placeholder(
            &config.message,
            config.wrappers.clone(),
            config.link.clone(),
        ))?;

        Ok(Self {
            config,
            alphabet,
            message,
            container,
            random,
            scheduler,
            state: RevealState::default(),
            ticker: None,
            repeat: None,
            playing: false,
            destroyed: false,
            on_change: None,
        })
    }

    /// Register a callback run after every rendered tick.
    pub fn set_on_change(&mut self, callback: impl FnMut() + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// Start from the beginning, cancelling any pending repeat.
    pub fn start(&mut self) -> Result<()> {
        if self.destroyed {
            return Err(EffectError::Destroyed);
        }
        if self.playing {
            self.stop();
        }
        self.ticker = Some(TimerGuard::periodic(&self.scheduler, self.config.interval));
        self.playing = true;
        self.repeat = None;
        debug!(message = %self.config.message, "text effect started");
        Ok(())
    }

    /// Stop ticking and forget all progress.
    pub fn stop(&mut self) {
        self.ticker = None;
        self.state = RevealState::default();
        self.playing = false;
    }

    /// Stop, then start again.
    pub fn replay(&mut self) -> Result<()> {
        self.stop();
        self.start()
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Stop, empty the container and drop any pending repeat.
    pub fn destroy(&mut self) -> Result<()> {
        self.stop();
        self.repeat = None;
        self.destroyed = true;
        self.container.clear()
    }

    /// Handle a fired timer: either a tick or the pending repeat.
    ///
    /// A failing tick stops the effect before the error is returned.
    pub fn on_timer(&mut self, id: TimerId) -> Result<TickOutcome> {
        if self.ticker.as_ref().map(TimerGuard::id) == Some(id) {
            return match self.write() {
                Ok(outcome) => Ok(outcome),
                Err(err) => {
                    error!(error = %err, "text effect tick failed, stopping");
                    self.stop();
                    Err(err)
                }
            };
        }

        if self.repeat.as_ref().map(TimerGuard::id) == Some(id) {
            self.repeat = None;
            self.start()?;
            return Ok(TickOutcome::Restarted);
        }

        Ok(TickOutcome::Ignored)
    }

    /// One tick: maybe resolve a character, then render.
    fn write(&mut self) -> Result<TickOutcome> {
        self.state.ticks += 1;
        let due = match self.state.phase {
            Phase::PreviewPending => self.state.ticks >= self.config.pending_ticks,
            Phase::Revealing => self.state.ticks >= self.config.character_ticks,
        };
        if due {
            self.state.resolved += 1;
            self.state.ticks = 0;
            self.state.phase = Phase::Revealing;
        }

        let markup = self.compose();
        self.container.set_content(markup)?;

        if let Some(on_change) = self.on_change.as_mut() {
            on_change();
        }

        if self.state.resolved < self.message.len() {
            return Ok(TickOutcome::Advanced);
        }

        self.stop();
        if let Some(delay) = self.config.replay {
            self.repeat = Some(TimerGuard::once(&self.scheduler, delay));
            debug!(?delay, "text effect finished, repeat scheduled");
        }
        Ok(TickOutcome::Completed)
    }

    fn compose(&mut self) -> Markup {
        let resolved = self.state.resolved.min(self.message.len());
        let pending = (resolved..self.message.len())
            .map(|_| self.alphabet.glyph(self.random.index(self.alphabet.len())))
            .collect();

        Markup {
            wrappers: self.config.wrappers.clone(),
            link: self.config.link.clone(),
            resolved: self.message[..resolved].iter().collect(),
            pending,
            pending_color: self.config.pending_color,
            highlight: match self.state.phase {
                Phase::PreviewPending => None,
                Phase::Revealing => self.config.highlight_color,
            },
            hidden: false,
        }
    }

    pub fn state(&self) -> RevealState {
        self.state
    }

    /// Whether a repeat is waiting to fire.
    pub fn has_pending_repeat(&self) -> bool {
        self.repeat.is_some()
    }

    pub fn message(&self) -> &[char] {
        &self.message
    }

    pub fn config(&self) -> &TextRevealConfig {
        &self.config
    }

    pub fn container(&self) -> &C {
        &self.container
    }
}

impl<C: MarkupSurface + fmt::Debug> fmt::Debug for TextRevealEngine<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextRevealEngine")
            .field("message", &self.config.message)
            .field("state", &self.state)
            .field("playing", &self.playing)
            .field("container", &self.container)
            .finish_non_exhaustive()
    }
}
