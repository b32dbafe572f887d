mod context_message;
mod layout;
mod logging;
mod message;
mod shell;

use std::rc::Rc;
use std::time::{Duration, Instant};

use coderain_config::Settings;
use coderain_core::Size;
use coderain_effects::TimerQueue;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    execute,
};
use ratatui::{DefaultTerminal, Frame};
use tracing::{info, warn};

use crate::shell::Shell;

/// Longest the loop sleeps waiting for input.
const MAX_IDLE: Duration = Duration::from_millis(100);

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    logging::init()?;
    let settings = Settings::load()?;

    let terminal = ratatui::init();
    restoring(
        || {
            execute!(std::io::stdout(), EnableMouseCapture)?;
            App::new(&settings, &terminal)?.run(terminal)
        },
        || {
            if let Err(err) = execute!(std::io::stdout(), DisableMouseCapture) {
                warn!(%err, "failed to disable mouse capture");
            }
            ratatui::restore();
        },
    )
}

/// Run `body`, then `restore` whether or not `body` failed.
fn restoring<T>(
    body: impl FnOnce() -> color_eyre::Result<T>,
    restore: impl FnOnce(),
) -> color_eyre::Result<T> {
    let result = body();
    restore();
    result
}

/// The main application which holds the state and logic of the application.
pub struct App {
    /// Is the application running?
    running: bool,
    /// Timers of every effect, polled by the main loop.
    queue: Rc<TimerQueue>,
    shell: Shell,
}

impl App {
    /// Construct a new instance of [`App`] sized to the terminal.
    pub fn new(settings: &Settings, terminal: &DefaultTerminal) -> color_eyre::Result<Self> {
        let queue = Rc::new(TimerQueue::new(Instant::now()));
        let size = terminal.size()?;
        let shell = Shell::new(settings, Size::from(size), queue.clone())?;
        Ok(Self {
            running: false,
            queue,
            shell,
        })
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        info!("coderain started");
        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
            self.fire_timers();
        }
        self.shell.destroy()?;
        info!("coderain stopped");
        Ok(())
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        self.shell.render(frame);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits no longer than the next timer deadline.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        let timeout = self
            .queue
            .next_deadline()
            .map_or(MAX_IDLE, |due| {
                due.saturating_duration_since(Instant::now()).min(MAX_IDLE)
            });
        if event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                Event::Resize(width, height) => {
                    self.shell.resize(Size::new(width.into(), height.into()))?
                }
                _ => {}
            }
        }
        Ok(())
    }

    /// Dispatch every timer that is due.
    fn fire_timers(&mut self) {
        for id in self.queue.poll(Instant::now()) {
            self.shell.dispatch(id);
        }
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        let result = match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => {
                self.quit();
                Ok(())
            }
            (_, KeyCode::Char(' ')) => self.shell.toggle_rain(),
            (_, KeyCode::Char('r')) => self.shell.replay_message(),
            _ => Ok(()),
        };
        if let Err(err) = result {
            warn!(%err, "key ignored");
        }
    }

    /// Handles mouse clicks: right opens the context message, left closes
    /// it or replays the message.
    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        let result = match mouse.kind {
            MouseEventKind::Down(MouseButton::Right) => {
                self.shell.on_right_click(mouse.column, mouse.row)
            }
            MouseEventKind::Down(MouseButton::Left) => {
                self.shell.on_left_click(mouse.column, mouse.row)
            }
            _ => Ok(()),
        };
        if let Err(err) = result {
            warn!(%err, "click ignored");
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}
