//! Beat grid - the last 16 booked beats by instrument, with a playhead

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use retro_tape::{
    engine::scheduler::BeatRecord,
    pattern::{Instrument, PATTERN_LENGTH},
};

const ROWS: [(&str, Instrument); 5] = [
    ("kick", Instrument::Kick),
    ("snare", Instrument::Snare),
    ("hihat", Instrument::HiHat),
    ("bass", Instrument::Bass),
    ("chord", Instrument::Chord),
];

const LABEL_WIDTH: usize = 8;
const CELL_WIDTH: usize = 3;

pub fn render_beat_grid(frame: &mut Frame, area: Rect, beats: &[BeatRecord], now: f64) {
    let block = Block::default().title(" Pattern ").borders(Borders::ALL);

    // Beats are booked ahead of the clock; the playhead sits on the last one already sounding
    let playing = beats
        .iter()
        .rev()
        .find(|record| record.time <= now)
        .map(|record| record.event.beat_index);

    let slot_of = |beat: u64| (beat % PATTERN_LENGTH) as usize;
    let mut cells: [Option<&BeatRecord>; PATTERN_LENGTH as usize] = [None; PATTERN_LENGTH as usize];
    for record in beats {
        cells[slot_of(record.event.beat_index)] = Some(record);
    }

    let mut lines = Vec::with_capacity(ROWS.len() + 2);

    let mut header = " ".repeat(LABEL_WIDTH);
    for step in 0..PATTERN_LENGTH {
        header.push_str(&format!("{:<width$}", step + 1, width = CELL_WIDTH));
    }
    lines.push(Line::from(Span::styled(
        header,
        Style::default().fg(Color::DarkGray),
    )));

    for (label, instrument) in ROWS {
        let mut spans = vec![Span::styled(
            format!("{label:<width$}", width = LABEL_WIDTH),
            Style::default().fg(Color::White),
        )];
        for cell in &cells {
            let (glyph, style) = match cell {
                Some(record) => {
                    let hits = record.event.count(instrument);
                    let glyph = match hits {
                        0 => "·",
                        1 => "▓",
                        _ => "█",
                    };
                    let color = if Some(record.event.beat_index) == playing {
                        Color::Yellow
                    } else if hits > 0 {
                        Color::Cyan
                    } else {
                        Color::DarkGray
                    };
                    (glyph, Style::default().fg(color))
                }
                None => ("░", Style::default().fg(Color::DarkGray)),
            };
            spans.push(Span::styled(
                format!("{glyph:<width$}", width = CELL_WIDTH),
                style,
            ));
        }
        lines.push(Line::from(spans));
    }

    // Playhead row
    let mut playhead = " ".repeat(LABEL_WIDTH);
    for step in 0..PATTERN_LENGTH {
        let marker = if playing.map(slot_of) == Some(step as usize) {
            "▲"
        } else {
            " "
        };
        playhead.push_str(&format!("{marker:<width$}", width = CELL_WIDTH));
    }
    lines.push(Line::from(Span::styled(
        playhead,
        Style::default().fg(Color::Yellow),
    )));

    let paragraph = Paragraph::new(lines).block(block);
    frame.render_widget(paragraph, area);
}
