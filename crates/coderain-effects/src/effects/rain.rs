//! Falling glyph rain.

use std::rc::Rc;

use coderain_core::{Alphabet, Direction, EffectError, RainConfig, Result, Size};
use tracing::{debug, error};

use crate::random::RandomSource;
use crate::schedule::{Scheduler, TickOutcome, TimerGuard, TimerId};
use crate::surface::{GlyphStyle, GlyphSurface};

/// Ticks run up front when the start of the rain should not be shown.
pub const PREFILL_TICKS: usize = 150;

/// A drop past the bottom restarts at the top when a draw exceeds this.
pub const RESET_THRESHOLD: f64 = 0.975;

/// The digital rain: one drop per column, each advancing a row per tick.
///
/// Every tick lays the translucent overlay over the primary surface, then
/// draws one random glyph at every drop. When a highlight colour is set the
/// same glyphs are also drawn on a second surface that is wiped each tick,
/// so only the leading glyph of each column carries the highlight.
pub struct RainEngine<S: GlyphSurface> {
    config: RainConfig,
    alphabet: Alphabet,
    text_style: GlyphStyle,
    /// Highlight layer and its style; present only with a highlight colour.
    highlight: Option<(S, GlyphStyle)>,
    primary: S,
    viewport: Option<Size>,
    columns: u32,
    rows: u32,
    /// Row counter per column.
    drops: Vec<u32>,
    random: Box<dyn RandomSource>,
    scheduler: Rc<dyn Scheduler>,
    ticker: Option<TimerGuard>,
    playing: bool,
    destroyed: bool,
}

impl<S: GlyphSurface> RainEngine<S> {
    /// Build the engine and size it to `viewport`. The rain is not started.
    ///
    /// `highlight` is required when the config sets a highlight colour and
    /// ignored otherwise.
    pub fn new(
        config: RainConfig,
        primary: S,
        highlight: Option<S>,
        viewport: Size,
        random: Box<dyn RandomSource>,
        scheduler: Rc<dyn Scheduler>,
    ) -> Result<Self> {
        let alphabet = config.validate()?;

        let highlight = match (config.highlight_color, highlight) {
            (Some(color), Some(layer)) => Some((
                layer,
                GlyphStyle {
                    color,
                    font: config.font.clone(),
                },
            )),
            (Some(_), None) => {
                return Err(EffectError::RenderTargetMissing(
                    "rain highlight layer".to_string(),
                ));
            }
            (None, _) => None,
        };

        let text_style = GlyphStyle {
            color: config.text_color,
            font: config.font.clone(),
        };

        let mut engine = Self {
            config,
            alphabet,
            text_style,
            highlight,
            primary,
            viewport: None,
            columns: 0,
            rows: 0,
            drops: Vec::new(),
            random,
            scheduler,
            ticker: None,
            playing: false,
            destroyed: false,
        };
        engine.resize(viewport)?;
        Ok(engine)
    }

    /// Fit the grid to a new viewport.
    ///
    /// Does nothing and returns `false` when the viewport is unchanged.
    /// Otherwise the surfaces are reallocated and columns that already
    /// existed keep their drop. Columns that no longer fit are hidden but
    /// keep their drop for when the viewport grows again. Columns seen for
    /// the first time start just below the bottom row.
    pub fn resize(&mut self, viewport: Size) -> Result<bool> {
        if self.destroyed {
            return Err(EffectError::Destroyed);
        }
        if self.viewport == Some(viewport) {
            return Ok(false);
        }

        self.primary.resize(viewport)?;
        if let Some((layer, _)) = &mut self.highlight {
            layer.resize(viewport)?;
        }

        self.viewport = Some(viewport);
        self.columns = viewport.width / self.config.column_width;
        self.rows = viewport.height / self.config.row_height;
        self.init_drops();

        debug!(
            columns = self.columns,
            rows = self.rows,
            width = viewport.width,
            height = viewport.height,
            "rain resized"
        );
        Ok(true)
    }

    fn init_drops(&mut self) {
        match self.config.direction {
            Direction::TopBottom => {
                let columns = self.columns as usize;
                if self.drops.len() < columns {
                    let start = self.rows + 1;
                    self.drops.resize(columns, start);
                }
            }
        }
    }

    /// Start ticking.
    ///
    /// Unless `show_start` is set, [`PREFILL_TICKS`] ticks are run first so
    /// the screen is already full of trails when it becomes visible.
    pub fn start(&mut self) -> Result<()> {
        if self.destroyed {
            return Err(EffectError::Destroyed);
        }
        self.ticker = None;

        if !self.config.show_start {
            for _ in 0..PREFILL_TICKS {
                if let Err(err) = self.advance() {
                    self.playing = false;
                    return Err(err);
                }
            }
        }

        self.ticker = Some(TimerGuard::periodic(&self.scheduler, self.config.interval));
        self.playing = true;
        debug!(interval = ?self.config.interval, "rain started");
        Ok(())
    }

    /// Stop ticking, optionally erasing what has been drawn.
    pub fn stop(&mut self, clear: bool) -> Result<()> {
        self.ticker = None;
        self.playing = false;
        debug!(clear, "rain stopped");
        if clear {
            self.clear()?;
        }
        Ok(())
    }

    /// Erase both surfaces.
    pub fn clear(&mut self) -> Result<()> {
        self.primary.clear()?;
        if let Some((layer, _)) = &mut self.highlight {
            layer.clear()?;
        }
        Ok(())
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    /// Stop, clear and release the surfaces. Further starts fail.
    pub fn destroy(&mut self) -> Result<()> {
        if self.destroyed {
            return Ok(());
        }
        self.stop(true)?;
        self.primary.release();
        if let Some((layer, _)) = &mut self.highlight {
            layer.release();
        }
        self.drops.clear();
        self.columns = 0;
        self.rows = 0;
        self.viewport = None;
        self.destroyed = true;
        Ok(())
    }

    /// Handle a fired timer.
    ///
    /// Timers other than the live ticker are ignored. A failing tick stops
    /// the rain before the error is returned.
    pub fn on_timer(&mut self, id: TimerId) -> Result<TickOutcome> {
        if self.ticker.as_ref().map(TimerGuard::id) != Some(id) {
            return Ok(TickOutcome::Ignored);
        }
        match self.advance() {
            Ok(()) => Ok(TickOutcome::Advanced),
            Err(err) => {
                error!(error = %err, "rain tick failed, stopping");
                self.ticker = None;
                self.playing = false;
                Err(err)
            }
        }
    }

    /// Run one tick: fade, draw a glyph per column, move every drop down.
    pub fn advance(&mut self) -> Result<()> {
        self.primary.fill(self.config.overlay_color)?;
        if let Some((layer, _)) = &mut self.highlight {
            layer.clear()?;
        }

        let columns = self.columns as usize;
        for (i, drop) in self.drops.iter_mut().take(columns).enumerate() {
            let glyph = self
                .alphabet
                .glyph(self.random.index(self.alphabet.len()));
            let x = self.config.column_width.saturating_mul(i as u32);
            let y = self.config.row_height.saturating_mul(*drop);

            self.primary.draw_glyph(x, y, glyph, &self.text_style)?;
            if let Some((layer, style)) = &mut self.highlight {
                layer.draw_glyph(x, y, glyph, style)?;
            }

            if *drop > self.rows && self.random.next_f64() > RESET_THRESHOLD {
                *drop = 0;
            }
            *drop = drop.saturating_add(1);
        }
        Ok(())
    }

    pub fn columns(&self) -> u32 {
        self.columns
    }

    pub fn rows(&self) -> u32 {
        self.rows
    }

    /// Current drop position of every visible column.
    pub fn drops(&self) -> &[u32] {
        &self.drops[..self.columns as usize]
    }

    pub fn viewport(&self) -> Option<Size> {
        self.viewport
    }

    pub fn config(&self) -> &RainConfig {
        &self.config
    }

    pub fn primary(&self) -> &S {
        &self.primary
    }

    /// Highlight layer, when a highlight colour is configured.
    pub fn highlight(&self) -> Option<&S> {
        self.highlight.as_ref().map(|(layer, _)| layer)
    }
}

#[cfg(test)]
mod tests {
    use std::time::{Duration, Instant};

    use coderain_core::Rgba;

    use super::*;
    use crate::effects::testing::{Op, Recorder, Scripted};
    use crate::schedule::TimerQueue;

    fn config() -> RainConfig {
        RainConfig {
            characters: "ab".into(),
            column_width: 1,
            row_height: 1,
            interval: Duration::from_millis(40),
            text_color: Rgba::rgb(0, 255, 0),
            overlay_color: Rgba::new(0, 0, 0, 0.05),
            highlight_color: Some(Rgba::WHITE),
            show_start: true,
            ..Default::default()
        }
    }

    fn engine_with(
        config: RainConfig,
        viewport: Size,
        random: Scripted,
    ) -> (RainEngine<Recorder>, Rc<TimerQueue>) {
        let queue = Rc::new(TimerQueue::new(Instant::now()));
        let engine = RainEngine::new(
            config,
            Recorder::default(),
            Some(Recorder::default()),
            viewport,
            Box::new(random),
            queue.clone(),
        )
        .unwrap();
        (engine, queue)
    }

    #[test]
    fn test_empty_alphabet_is_rejected() {
        let queue: Rc<dyn Scheduler> = Rc::new(TimerQueue::new(Instant::now()));
        let result = RainEngine::new(
            RainConfig {
                characters: String::new(),
                ..config()
            },
            Recorder::default(),
            Some(Recorder::default()),
            Size::new(10, 10),
            Box::new(Scripted::constant(0.0)),
            queue,
        );
        assert!(matches!(
            result,
            Err(EffectError::Configuration { field: "characters", .. })
        ));
    }

    #[test]
    fn test_highlight_needs_a_layer() {
        let queue: Rc<dyn Scheduler> = Rc::new(TimerQueue::new(Instant::now()));
        let result = RainEngine::new(
            config(),
            Recorder::default(),
            None,
            Size::new(10, 10),
            Box::new(Scripted::constant(0.0)),
            queue,
        );
        assert!(matches!(result, Err(EffectError::RenderTargetMissing(_))));
    }

    #[test]
    fn test_grid_dimensions() {
        let (engine, _) = engine_with(
            RainConfig {
                column_width: 2,
                row_height: 3,
                ..config()
            },
            Size::new(11, 10),
            Scripted::constant(0.0),
        );
        assert_eq!(engine.columns(), 5);
        assert_eq!(engine.rows(), 3);
        assert_eq!(engine.drops(), &[4, 4, 4, 4, 4]);
        assert_eq!(engine.primary().size(), Size::new(11, 10));
        assert_eq!(engine.highlight().map(|h| h.size()), Some(Size::new(11, 10)));
    }

    #[test]
    fn test_resize_is_idempotent() {
        let (mut engine, _) = engine_with(config(), Size::new(4, 5), Scripted::constant(0.0));
        engine.advance().unwrap();
        let drops = engine.drops().to_vec();

        assert!(!engine.resize(Size::new(4, 5)).unwrap());
        assert_eq!(engine.drops(), drops.as_slice());
        let resizes = engine
            .primary()
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Resize(_)))
            .count();
        assert_eq!(resizes, 1);
    }

    #[test]
    fn test_resize_keeps_existing_columns() {
        let (mut engine, _) = engine_with(config(), Size::new(2, 5), Scripted::constant(0.5));
        engine.advance().unwrap();
        assert_eq!(engine.drops(), &[7, 7]);

        assert!(engine.resize(Size::new(4, 8)).unwrap());
        assert_eq!(engine.drops(), &[7, 7, 9, 9]);

        assert!(engine.resize(Size::new(1, 8)).unwrap());
        assert_eq!(engine.drops(), &[7]);
    }

    #[test]
    fn test_hidden_columns_resume_after_regrow() {
        let (mut engine, _) = engine_with(config(), Size::new(3, 5), Scripted::constant(0.5));
        engine.advance().unwrap();
        assert_eq!(engine.drops(), &[7, 7, 7]);

        assert!(engine.resize(Size::new(1, 5)).unwrap());
        engine.advance().unwrap();
        assert_eq!(engine.drops(), &[8]);

        assert!(engine.resize(Size::new(4, 5)).unwrap());
        assert_eq!(engine.drops(), &[8, 7, 7, 6]);
    }

    #[test]
    fn test_failing_prefill_leaves_rain_stopped() {
        let queue = Rc::new(TimerQueue::new(Instant::now()));
        // One column: the resize plus 150 fills and 150 glyphs fit, the
        // next prefill's glyph does not.
        let primary = Recorder {
            fail_after: Some(1 + 2 * PREFILL_TICKS),
            ..Default::default()
        };
        let mut engine = RainEngine::new(
            RainConfig {
                show_start: false,
                ..config()
            },
            primary,
            Some(Recorder::default()),
            Size::new(1, 4),
            Box::new(Scripted::constant(0.0)),
            queue.clone(),
        )
        .unwrap();
        engine.start().unwrap();
        assert!(engine.is_playing());

        assert!(matches!(
            engine.start(),
            Err(EffectError::RenderTargetMissing(_))
        ));
        assert!(!engine.is_playing());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_overlay_once_per_tick_before_glyphs() {
        let (mut engine, _) = engine_with(config(), Size::new(3, 5), Scripted::constant(0.0));
        engine.advance().unwrap();

        let ops = &engine.primary().ops;
        assert_eq!(ops[0], Op::Resize(Size::new(3, 5)));
        assert_eq!(ops[1], Op::Fill(Rgba::new(0, 0, 0, 0.05)));
        assert_eq!(ops.iter().filter(|op| matches!(op, Op::Fill(_))).count(), 1);
        assert_eq!(
            &ops[2..],
            &[
                Op::Glyph { x: 0, y: 6, glyph: 'a', color: Rgba::rgb(0, 255, 0) },
                Op::Glyph { x: 1, y: 6, glyph: 'a', color: Rgba::rgb(0, 255, 0) },
                Op::Glyph { x: 2, y: 6, glyph: 'a', color: Rgba::rgb(0, 255, 0) },
            ]
        );

        let highlight = &engine.highlight().unwrap().ops;
        assert_eq!(highlight[1], Op::Clear);
        assert!(matches!(
            highlight[2],
            Op::Glyph { x: 0, color, .. } if color == Rgba::WHITE
        ));
    }

    #[test]
    fn test_no_highlight_layer_without_colour() {
        let (mut engine, _) = engine_with(
            RainConfig {
                highlight_color: None,
                ..config()
            },
            Size::new(3, 5),
            Scripted::constant(0.0),
        );
        engine.advance().unwrap();
        assert!(engine.highlight().is_none());
    }

    #[test]
    fn test_reset_on_threshold_draw() {
        // Three columns, five rows: every drop starts at 6, past the bottom,
        // so each column draws a glyph index then a reset chance every tick.
        let mut script = Vec::new();
        for tick in 1..=10 {
            for column in 0..3 {
                script.push(0.0);
                script.push(if tick == 10 && column == 1 { 0.99 } else { 0.5 });
            }
        }
        let (mut engine, _) =
            engine_with(config(), Size::new(3, 5), Scripted::new(script, 0.0));

        for _ in 0..9 {
            engine.advance().unwrap();
        }
        assert_eq!(engine.drops(), &[15, 15, 15]);

        engine.advance().unwrap();
        assert_eq!(engine.drops(), &[16, 1, 16]);
    }

    #[test]
    fn test_no_reset_above_bottom() {
        let (mut engine, _) = engine_with(config(), Size::new(1, 5), Scripted::constant(0.99));
        let mut seen = Vec::new();
        for _ in 0..7 {
            engine.advance().unwrap();
            seen.push(engine.drops()[0]);
        }
        assert_eq!(seen, vec![1, 2, 3, 4, 5, 6, 1]);
    }

    #[test]
    fn test_start_prefills_when_start_hidden() {
        let (mut engine, queue) = engine_with(
            RainConfig {
                show_start: false,
                ..config()
            },
            Size::new(2, 4),
            Scripted::constant(0.0),
        );
        engine.start().unwrap();

        let fills = engine
            .primary()
            .ops
            .iter()
            .filter(|op| matches!(op, Op::Fill(_)))
            .count();
        assert_eq!(fills, PREFILL_TICKS);
        assert!(engine.is_playing());
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_single_ticker() {
        let (mut engine, queue) = engine_with(config(), Size::new(2, 4), Scripted::constant(0.0));
        engine.start().unwrap();
        engine.start().unwrap();
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn test_timer_drives_ticks() {
        let start = Instant::now();
        let queue = Rc::new(TimerQueue::new(start));
        let mut engine = RainEngine::new(
            config(),
            Recorder::default(),
            Some(Recorder::default()),
            Size::new(2, 4),
            Box::new(Scripted::constant(0.0)),
            queue.clone(),
        )
        .unwrap();
        engine.start().unwrap();

        let ids = queue.poll(start + Duration::from_millis(40));
        assert_eq!(ids.len(), 1);
        assert_eq!(engine.on_timer(ids[0]).unwrap(), TickOutcome::Advanced);
        assert_eq!(engine.drops(), &[6, 6]);

        engine.stop(true).unwrap();
        assert!(!engine.is_playing());
        assert!(queue.is_empty());
        assert_eq!(engine.primary().ops.last(), Some(&Op::Clear));
        // A tick that was already collected before the stop is a no-op.
        assert_eq!(engine.on_timer(ids[0]).unwrap(), TickOutcome::Ignored);
        assert_eq!(engine.drops(), &[6, 6]);
    }

    #[test]
    fn test_failing_tick_stops_engine() {
        let start = Instant::now();
        let queue = Rc::new(TimerQueue::new(start));
        let primary = Recorder {
            fail_after: Some(2),
            ..Default::default()
        };
        let mut engine = RainEngine::new(
            config(),
            primary,
            Some(Recorder::default()),
            Size::new(2, 4),
            Box::new(Scripted::constant(0.0)),
            queue.clone(),
        )
        .unwrap();
        engine.start().unwrap();

        let ids = queue.poll(start + Duration::from_millis(40));
        assert!(matches!(
            engine.on_timer(ids[0]),
            Err(EffectError::RenderTargetMissing(_))
        ));
        assert!(!engine.is_playing());
        assert!(queue.is_empty());
    }

    #[test]
    fn test_destroy() {
        let (mut engine, queue) = engine_with(config(), Size::new(2, 4), Scripted::constant(0.0));
        engine.start().unwrap();
        engine.destroy().unwrap();

        assert!(queue.is_empty());
        assert!(engine.primary().released);
        assert!(engine.highlight().unwrap().released);
        assert!(engine.drops().is_empty());
        assert_eq!(engine.start(), Err(EffectError::Destroyed));
        assert!(engine.destroy().is_ok());
    }
}
