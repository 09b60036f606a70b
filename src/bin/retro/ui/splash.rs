//! Splash screen - the first Enter turns the audio on

use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
    Frame,
};

pub fn render_splash(frame: &mut Frame, area: Rect) {
    let [row] = Layout::vertical([Constraint::Length(9)])
        .flex(Flex::Center)
        .areas(area);
    let [card] = Layout::horizontal([Constraint::Length(44)])
        .flex(Flex::Center)
        .areas(row);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "R E T R O   T A P E",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            "C  G  Am  F  on a worn cassette",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "press Enter to roll tape",
            Style::default().fg(Color::Cyan),
        )),
        Line::from(Span::styled("[Q] quit", Style::default().fg(Color::DarkGray))),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded);
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(block);
    frame.render_widget(paragraph, card);
}
