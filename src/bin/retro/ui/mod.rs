//! TUI widgets for retro
//!
//! Stateless: every frame is drawn from a fresh [`Dashboard`] snapshot.

mod beat_grid;
mod splash;
mod transport;
mod waveform;

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    Frame,
};

use retro_tape::engine::{scheduler::BeatRecord, transport::TransportStatus};

use beat_grid::render_beat_grid;
use transport::{render_transport, AudioStats};
use waveform::render_waveform;

pub use splash::render_splash;

/// Everything one dashboard frame shows.
pub struct Dashboard<'a> {
    pub status: TransportStatus,
    /// Recently booked beats, oldest first
    pub beats: Vec<BeatRecord>,
    pub scope: &'a [f32],
}

pub fn render_dashboard(frame: &mut Frame, dashboard: &Dashboard) {
    let area = frame.area();

    // Main layout: transport, beat grid, scope, help
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Transport bar
            Constraint::Length(9), // Beat grid
            Constraint::Min(6),    // Scope
            Constraint::Length(1), // Help bar
        ])
        .split(area);

    let stats = AudioStats::from_buffer(dashboard.scope);
    render_transport(frame, chunks[0], &dashboard.status, &stats);
    render_beat_grid(frame, chunks[1], &dashboard.beats, dashboard.status.time);
    render_waveform(frame, chunks[2], dashboard.scope);

    let help = Paragraph::new(" [Space] Audio on/off  [Q] Quit")
        .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(help, chunks[3]);
}
