//! Event loop for the `play` command.
//!
//! One thread does everything the web host used to: draw, read keys, and
//! deliver expired poll timers to the transport. Wall time since launch is
//! the timer clock.

use std::time::{Duration, Instant};

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{DefaultTerminal, Frame};

use retro_tape::{
    engine::{device::DeviceFactory, timer::DeadlineTimers},
    RetroConfig, Transport,
};

use crate::ui::{self, Dashboard};

/// Redraw at least this often
const FRAME: Duration = Duration::from_millis(16);

/// Samples kept for the oscilloscope
const SCOPE_LEN: usize = 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Splash,
    Dashboard,
}

pub struct App {
    transport: Transport<DeviceFactory, DeadlineTimers>,
    launched: Instant,
    screen: Screen,
    scope: Vec<f32>,
    monitor: Vec<f32>,
    should_quit: bool,
}

impl App {
    pub fn new(config: RetroConfig) -> EyreResult<Self> {
        let transport = Transport::new(config, DeviceFactory::new(), DeadlineTimers::new())?;
        Ok(Self {
            transport,
            launched: Instant::now(),
            screen: Screen::Splash,
            scope: vec![0.0; SCOPE_LEN],
            monitor: Vec::with_capacity(8192),
            should_quit: false,
        })
    }

    /// Run until the user quits. Dropping `self` on return stops the audio.
    pub fn run(mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.fire_due_timers();
            self.poll_monitor();

            terminal.draw(|frame| self.render(frame))?;

            if event::poll(self.poll_timeout())? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }
        Ok(())
    }

    fn fire_due_timers(&mut self) {
        let due = self
            .transport
            .timers_mut()
            .advance_to(self.launched.elapsed());
        for handle in due {
            self.transport.fire(handle);
        }
    }

    /// Wake for the next poll timer or the next frame, whichever is sooner.
    fn poll_timeout(&mut self) -> Duration {
        let elapsed = self.launched.elapsed();
        self.transport
            .timers_mut()
            .next_deadline()
            .map_or(FRAME, |deadline| deadline.saturating_sub(elapsed).min(FRAME))
    }

    fn poll_monitor(&mut self) {
        if !self.transport.is_audio_on() {
            self.scope.fill(0.0);
            return;
        }

        self.monitor.clear();
        self.transport.drain_monitor(&mut self.monitor);
        if self.monitor.is_empty() {
            return;
        }

        self.scope.extend_from_slice(&self.monitor);
        if self.scope.len() > SCOPE_LEN {
            let excess = self.scope.len() - SCOPE_LEN;
            self.scope.drain(..excess);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match (self.screen, key) {
            (_, KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc) => {
                self.should_quit = true;
            }
            (Screen::Splash, KeyCode::Enter) => {
                self.transport.toggle();
                self.screen = Screen::Dashboard;
            }
            (Screen::Dashboard, KeyCode::Char(' ')) => {
                self.transport.toggle();
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        match self.screen {
            Screen::Splash => {
                let area = frame.area();
                ui::render_splash(frame, area);
            }
            Screen::Dashboard => {
                let dashboard = Dashboard {
                    status: self.transport.status(),
                    beats: self.transport.recent_beats(),
                    scope: &self.scope,
                };
                ui::render_dashboard(frame, &dashboard);
            }
        }
    }
}
