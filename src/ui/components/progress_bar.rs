use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Widget};

use crate::session::stats::StatsSnapshot;
use crate::ui::theme::Theme;

/// How far through the reference the typed buffer has reached, as a filled
/// bar with the raw character counts centered on it.
pub struct ProgressBar<'a> {
    percent: f64,
    typed: usize,
    total: usize,
    theme: &'a Theme,
}

impl<'a> ProgressBar<'a> {
    pub fn new(stats: &StatsSnapshot, theme: &'a Theme) -> Self {
        Self {
            percent: stats.progress.clamp(0.0, 100.0),
            typed: stats.typed_len.min(stats.reference_len),
            total: stats.reference_len,
            theme,
        }
    }
}

impl Widget for ProgressBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let colors = &self.theme.colors;

        let block = Block::bordered()
            .title(" Progress ")
            .border_style(Style::default().fg(colors.border()));
        let inner = block.inner(area);
        block.render(area, buf);

        if inner.width == 0 || inner.height == 0 {
            return;
        }

        let filled = (self.percent / 100.0 * inner.width as f64).round() as u16;
        for x in inner.x..inner.x + inner.width {
            let style = if x < inner.x + filled {
                Style::default().fg(colors.bg()).bg(colors.bar_filled())
            } else {
                Style::default().fg(colors.fg()).bg(colors.bar_empty())
            };
            buf[(x, inner.y)].set_style(style);
        }

        let label = format!("{:.1}%  ({}/{} chars)", self.percent, self.typed, self.total);
        if (label.len() as u16) <= inner.width {
            let label_x = inner.x + (inner.width - label.len() as u16) / 2;
            buf.set_string(label_x, inner.y, &label, Style::default().fg(colors.fg()));
        }
    }
}
