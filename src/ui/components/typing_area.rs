use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph, Widget};

use crate::session::projector::{CharCell, CharClass, Projection};
use crate::ui::theme::Theme;

pub struct TypingArea<'a> {
    projection: &'a Projection,
    placeholder: &'a str,
    theme: &'a Theme,
}

impl<'a> TypingArea<'a> {
    pub fn new(projection: &'a Projection, placeholder: &'a str, theme: &'a Theme) -> Self {
        Self {
            projection,
            placeholder,
            theme,
        }
    }
}

/// Visible stand-ins for control characters so file content cannot mangle
/// the terminal: newlines render as a return marker plus a real line break,
/// tabs as an arrow. Everything else is drawn as-is by ratatui, which
/// treats text purely as data.
fn display_char(ch: char) -> String {
    match ch {
        '\n' => "\u{21b5}".to_string(),
        '\t' => "\u{2192}".to_string(),
        c if c.is_control() => "\u{fffd}".to_string(),
        _ => ch.to_string(),
    }
}

impl Widget for TypingArea<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .border_style(Style::default().fg(colors.border()))
            .style(Style::default().bg(colors.bg()));

        let cells = match self.projection {
            Projection::Empty => {
                let paragraph = Paragraph::new(Line::from(Span::styled(
                    self.placeholder,
                    Style::default().fg(colors.text_pending()),
                )))
                .block(block);
                paragraph.render(area, buf);
                return;
            }
            Projection::Cells(cells) => cells,
        };

        let mut lines: Vec<Vec<Span>> = vec![Vec::new()];
        let mut cursor_line = 0usize;

        for cell in cells {
            let style = cell_style(cell, colors);
            lines
                .last_mut()
                .unwrap()
                .push(Span::styled(display_char(cell.ch), style));
            if cell.cursor {
                cursor_line = lines.len() - 1;
            }
            if cell.ch == '\n' {
                lines.push(Vec::new());
            }
        }

        // Keep the cursor line inside the viewport, roughly centered.
        let inner_height = block.inner(area).height as usize;
        let scroll = cursor_line.saturating_sub(inner_height / 2);

        let ratatui_lines: Vec<Line> = lines.into_iter().map(Line::from).collect();
        let paragraph = Paragraph::new(ratatui_lines)
            .block(block)
            .scroll((scroll as u16, 0));

        paragraph.render(area, buf);
    }
}

fn cell_style(cell: &CharCell, colors: &crate::ui::theme::ThemeColors) -> Style {
    if cell.cursor {
        return Style::default()
            .fg(colors.text_cursor_fg())
            .bg(colors.text_cursor_bg());
    }
    match cell.class {
        CharClass::Ok => Style::default().fg(colors.text_correct()),
        CharClass::Bad => Style::default()
            .fg(colors.text_incorrect())
            .bg(colors.text_incorrect_bg())
            .add_modifier(Modifier::UNDERLINED),
        CharClass::Pending => Style::default().fg(colors.text_pending()),
    }
}
