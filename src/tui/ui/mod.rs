//! UI module: View components for the TUI.

pub mod auth;
pub mod prediction;

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::tui::styles::MedicalTheme;

pub fn render_disclaimer(f: &mut Frame, area: Rect) {
    let text = vec![Line::from(vec![Span::styled(
        "DISCLAIMER: Predictions are indicative only and do not replace professional medical evaluation.",
        MedicalTheme::text_muted(),
    )])];

    let block = Block::default()
        .borders(Borders::TOP)
        .border_style(MedicalTheme::border());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}

/// Degraded-mode notice listing startup warnings.
pub fn render_warnings(f: &mut Frame, area: Rect, warnings: &[String]) {
    let text: Vec<Line> = warnings
        .iter()
        .map(|w| {
            Line::from(vec![
                Span::styled(" ⚠ ", MedicalTheme::warning()),
                Span::styled(w.clone(), MedicalTheme::warning()),
            ])
        })
        .collect();

    let block = Block::default()
        .title(Span::styled(" Degraded mode ", MedicalTheme::warning()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::warning());

    let p = Paragraph::new(text).block(block).wrap(Wrap { trim: true });

    f.render_widget(p, area);
}
