use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::stats::StatsSnapshot;
use crate::ui::theme::Theme;
use crate::ui::{format_countdown, format_seconds};

/// Live metrics while typing. Percentages are clamped to [0, 100] here —
/// the stats engine reports raw ratios.
pub struct StatsSidebar<'a> {
    stats: &'a StatsSnapshot,
    elapsed_secs: f64,
    remaining_secs: f64,
    theme: &'a Theme,
}

impl<'a> StatsSidebar<'a> {
    pub fn new(
        stats: &'a StatsSnapshot,
        elapsed_secs: f64,
        remaining_secs: f64,
        theme: &'a Theme,
    ) -> Self {
        Self {
            stats,
            elapsed_secs,
            remaining_secs,
            theme,
        }
    }
}

pub fn accuracy_color(accuracy: f64, theme: &Theme) -> ratatui::style::Color {
    let colors = &theme.colors;
    if accuracy >= 95.0 {
        colors.success()
    } else if accuracy >= 85.0 {
        colors.warning()
    } else {
        colors.error()
    }
}

impl Widget for StatsSidebar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let stats = self.stats;

        let gross = stats.gross_wpm.max(0.0).round();
        let net = stats.net_wpm.max(0.0).round();
        let accuracy = stats.accuracy.clamp(0.0, 100.0);
        let error_rate = stats.error_rate.clamp(0.0, 100.0);
        let progress = stats.progress.clamp(0.0, 100.0);

        let label = |text: &str| Span::styled(text.to_string(), Style::default().fg(colors.fg()));

        let lines = vec![
            Line::from(vec![
                label("Left: "),
                Span::styled(
                    format_countdown(self.remaining_secs),
                    Style::default().fg(if self.remaining_secs < 10.0 {
                        colors.error()
                    } else {
                        colors.accent()
                    }),
                ),
            ]),
            Line::from(vec![
                label("Time: "),
                Span::styled(
                    format_seconds(self.elapsed_secs),
                    Style::default().fg(colors.fg()),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                label("Gross: "),
                Span::styled(format!("{gross:.0}"), Style::default().fg(colors.accent())),
            ]),
            Line::from(vec![
                label("Net:   "),
                Span::styled(format!("{net:.0}"), Style::default().fg(colors.accent())),
            ]),
            Line::from(""),
            Line::from(vec![
                label("Accuracy: "),
                Span::styled(
                    format!("{accuracy:.1}%"),
                    Style::default().fg(accuracy_color(accuracy, self.theme)),
                ),
            ]),
            Line::from(vec![
                label("Typed:    "),
                Span::styled(
                    format!("{}/{}", stats.typed_len, stats.reference_len),
                    Style::default().fg(colors.fg()),
                ),
            ]),
            Line::from(vec![
                label("Correct:  "),
                Span::styled(
                    format!("{}", stats.correct),
                    Style::default().fg(colors.success()),
                ),
            ]),
            Line::from(vec![
                label("Errors:   "),
                Span::styled(
                    format!("{}", stats.incorrect),
                    Style::default().fg(colors.error()),
                ),
            ]),
            Line::from(vec![
                label("Err rate: "),
                Span::styled(
                    format!("{error_rate:.1}%"),
                    Style::default().fg(colors.error()),
                ),
            ]),
            Line::from(""),
            Line::from(vec![
                label("Progress: "),
                Span::styled(
                    format!("{progress:.1}%"),
                    Style::default().fg(colors.accent()),
                ),
            ]),
        ];

        let block = Block::bordered()
            .title(" Stats ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
