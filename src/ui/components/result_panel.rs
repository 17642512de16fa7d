use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::app::RunOutcome;
use crate::ui::components::stats_sidebar::accuracy_color;
use crate::ui::format_seconds;
use crate::ui::theme::Theme;

/// Final metrics, rank badge, and the stored best for the finished file.
pub struct ResultPanel<'a> {
    outcome: &'a RunOutcome,
    theme: &'a Theme,
}

impl<'a> ResultPanel<'a> {
    pub fn new(outcome: &'a RunOutcome, theme: &'a Theme) -> Self {
        Self { outcome, theme }
    }
}

impl Widget for ResultPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;
        let outcome = self.outcome;
        let stats = &outcome.stats;

        let gross = stats.gross_wpm.max(0.0).round();
        let net = stats.net_wpm.max(0.0).round();
        let accuracy = stats.accuracy.clamp(0.0, 100.0);
        let error_rate = stats.error_rate.clamp(0.0, 100.0);

        let label = |text: &str| Span::styled(text.to_string(), Style::default().fg(colors.fg()));

        let mut lines = vec![
            Line::from(Span::styled(
                format!(" {} ", outcome.rank.label()),
                Style::default()
                    .fg(colors.header_fg())
                    .bg(colors.accent_dim())
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
            Line::from(vec![
                label("Net WPM:   "),
                Span::styled(format!("{net:.0}"), Style::default().fg(colors.accent())),
            ]),
            Line::from(vec![
                label("Gross WPM: "),
                Span::styled(format!("{gross:.0}"), Style::default().fg(colors.accent())),
            ]),
            Line::from(vec![
                label("Accuracy:  "),
                Span::styled(
                    format!("{accuracy:.1}%"),
                    Style::default().fg(accuracy_color(accuracy, self.theme)),
                ),
            ]),
            Line::from(vec![
                label("Errors:    "),
                Span::styled(
                    format!("{} ({error_rate:.1}%)", stats.incorrect),
                    Style::default().fg(colors.error()),
                ),
            ]),
            Line::from(vec![
                label("Time:      "),
                Span::styled(
                    format_seconds(outcome.elapsed_secs),
                    Style::default().fg(colors.fg()),
                ),
            ]),
            Line::from(""),
        ];

        let best = &outcome.best;
        lines.push(Line::from(vec![
            label("Best: "),
            Span::styled(
                format!("{} net | {}% | {}s", best.net, best.acc, best.time),
                Style::default().fg(colors.success()),
            ),
            if outcome.new_best {
                Span::styled(
                    "  new best!",
                    Style::default()
                        .fg(colors.warning())
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                Span::raw("")
            },
        ]));

        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "r retry   Esc back to files",
            Style::default().fg(colors.text_pending()),
        )));

        let block = Block::bordered()
            .title(" Run complete ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
