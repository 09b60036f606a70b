//! Transport bar widget - audio indicator, tempo, position, chord and levels

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use retro_tape::{engine::transport::TransportStatus, pattern::BEATS_PER_CHORD};

/// Levels of the most recent scope window
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

pub fn render_transport(frame: &mut Frame, area: Rect, status: &TransportStatus, stats: &AudioStats) {
    let block = Block::default().title(" retro tape ").borders(Borders::ALL);

    let indicator = if status.audio_on {
        Span::styled(
            " ● AUDIO ON  ",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(" ○ AUDIO OFF  ", Style::default().fg(Color::DarkGray))
    };

    // Bars follow the chord changes
    let position = match status.beat_index {
        Some(beat) => format!(
            "Bar {} | Beat {}  ",
            beat / BEATS_PER_CHORD + 1,
            beat % BEATS_PER_CHORD + 1
        ),
        None => "Bar - | Beat -  ".to_string(),
    };

    let line = Line::from(vec![
        indicator,
        Span::styled(
            format!("BPM: {:.0}  ", status.bpm),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(position, Style::default().fg(Color::White)),
        Span::styled(
            format!("Chord: {:<3} ", status.chord.unwrap_or("-")),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(
            format!("{:>7.2}s  ", status.time),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", stats.peak, stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    let paragraph = Paragraph::new(line).block(block);
    frame.render_widget(paragraph, area);
}
