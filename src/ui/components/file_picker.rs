use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::ui::theme::Theme;

/// Candidate file list with a selection bar, or a loading/error message
/// when there is nothing to pick from.
pub struct FilePicker<'a> {
    candidates: &'a [String],
    selected: usize,
    error: Option<&'a str>,
    theme: &'a Theme,
}

impl<'a> FilePicker<'a> {
    pub fn new(
        candidates: &'a [String],
        selected: usize,
        error: Option<&'a str>,
        theme: &'a Theme,
    ) -> Self {
        Self {
            candidates,
            selected,
            error,
            theme,
        }
    }
}

impl Widget for FilePicker<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Pick a file ")
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        if let Some(error) = self.error {
            let lines = vec![
                Line::from(Span::styled(
                    error.to_string(),
                    Style::default().fg(colors.error()),
                )),
                Line::from(""),
                Line::from(Span::styled(
                    "Press g to reload the file list.",
                    Style::default().fg(colors.text_pending()),
                )),
            ];
            Paragraph::new(lines).block(block).render(area, buf);
            return;
        }

        if self.candidates.is_empty() {
            Paragraph::new(Line::from(Span::styled(
                "Loading file list\u{2026}",
                Style::default().fg(colors.text_pending()),
            )))
            .block(block)
            .render(area, buf);
            return;
        }

        // Window the list around the selection so long repositories scroll.
        let inner_height = block.inner(area).height as usize;
        let first = self
            .selected
            .saturating_sub(inner_height / 2)
            .min(self.candidates.len().saturating_sub(inner_height.max(1)));

        let lines: Vec<Line> = self
            .candidates
            .iter()
            .enumerate()
            .skip(first)
            .take(inner_height.max(1))
            .map(|(i, path)| {
                if i == self.selected {
                    Line::from(Span::styled(
                        format!("> {path}"),
                        Style::default()
                            .fg(colors.accent())
                            .add_modifier(Modifier::BOLD),
                    ))
                } else {
                    Line::from(Span::styled(
                        format!("  {path}"),
                        Style::default().fg(colors.fg()),
                    ))
                }
            })
            .collect();

        Paragraph::new(lines).block(block).render(area, buf);
    }
}
