#![allow(dead_code)]

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

use crate::shared::theme::{Icons, ProgressChars, Theme};

/// Helper function to render text with proper Unicode support
/// Returns the number of columns (visual width) consumed
fn render_text_unicode_aware(
    text: &str,
    buf: &mut Buffer,
    x: u16,
    y: u16,
    max_x: u16,
    style: Style,
) -> u16 {
    let mut current_x = x;

    for grapheme in text.graphemes(true) {
        let width = grapheme.width();

        if current_x + width as u16 > max_x {
            break;
        }

        let cell = buf.get_mut(current_x, y);
        cell.set_symbol(grapheme);
        cell.set_style(style);

        current_x += width as u16;

        // For zero-width graphemes, ensure we advance at least one position
        if width == 0 && current_x == x {
            current_x += 1;
        }
    }

    current_x - x
}

/// Bordered card with a title and wrapped text content
pub struct Card<'a> {
    title: Option<&'a str>,
    content: Text<'a>,
    theme: &'a Theme,
    focused: bool,
}

impl<'a> Card<'a> {
    pub fn new(content: Text<'a>, theme: &'a Theme) -> Self {
        Self {
            title: None,
            content,
            theme,
            focused: false,
        }
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }
}

impl<'a> Widget for Card<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            self.theme.border_focused_style()
        } else {
            self.theme.border_style()
        };

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style);

        if let Some(title) = self.title {
            block = block.title(title);
        }

        let inner = block.inner(area);
        block.render(area, buf);

        Paragraph::new(self.content)
            .wrap(Wrap { trim: true })
            .render(inner, buf);
    }
}

/// Single-row progress bar with an optional centered label
pub struct ProgressBar<'a> {
    percentage: f64,
    theme: &'a Theme,
    show_percentage: bool,
}

impl<'a> ProgressBar<'a> {
    pub fn new(percentage: f64, theme: &'a Theme) -> Self {
        Self {
            percentage: percentage.clamp(0.0, 100.0),
            theme,
            show_percentage: true,
        }
    }

    pub fn show_percentage(mut self, show: bool) -> Self {
        self.show_percentage = show;
        self
    }
}

impl<'a> Widget for ProgressBar<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width < 3 || area.height < 1 {
            return;
        }

        let progress_style = if self.percentage >= 100.0 {
            self.theme.success_style()
        } else {
            self.theme.info_style()
        };

        let progress_width = area.width as f64 * (self.percentage / 100.0);
        let filled_chars = progress_width.floor() as u16;
        let remaining_width = progress_width - filled_chars as f64;

        for x in 0..area.width {
            let cell = buf.get_mut(area.x + x, area.y);

            if x < filled_chars {
                cell.set_char(ProgressChars::FILLED);
                cell.set_style(progress_style);
            } else if x == filled_chars && remaining_width > 0.5 {
                cell.set_char(ProgressChars::PARTIAL);
                cell.set_style(progress_style);
            } else {
                cell.set_char(ProgressChars::EMPTY);
                cell.set_style(self.theme.dimmed_style());
            }
        }

        if self.show_percentage && area.width > 10 {
            let overlay_text = format!("{:.0}%", self.percentage);
            let text_width = overlay_text.width();
            if text_width <= area.width as usize {
                let x_offset = (area.width as usize - text_width) / 2;
                render_text_unicode_aware(
                    &overlay_text,
                    buf,
                    area.x + x_offset as u16,
                    area.y,
                    area.x + area.width,
                    Style::default().fg(self.theme.text_primary),
                );
            }
        }
    }
}

/// List widget with a selection marker and per-row styling
pub struct RowList<'a> {
    items: Vec<RowItem<'a>>,
    selected: Option<usize>,
    theme: &'a Theme,
    title: Option<&'a str>,
}

pub struct RowItem<'a> {
    text: Line<'a>,
    icon: Option<&'a str>,
    style: Option<Style>,
}

impl<'a> RowItem<'a> {
    pub fn new<T: Into<Line<'a>>>(text: T) -> Self {
        Self {
            text: text.into(),
            icon: None,
            style: None,
        }
    }

    pub fn icon(mut self, icon: &'a str) -> Self {
        self.icon = Some(icon);
        self
    }

    pub fn style(mut self, style: Style) -> Self {
        self.style = Some(style);
        self
    }
}

impl<'a> RowList<'a> {
    pub fn new(items: Vec<RowItem<'a>>, theme: &'a Theme) -> Self {
        Self {
            items,
            selected: None,
            theme,
            title: None,
        }
    }

    pub fn selected(mut self, index: Option<usize>) -> Self {
        self.selected = index;
        self
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }
}

impl<'a> Widget for RowList<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_style(self.theme.border_style());

        if let Some(title) = self.title {
            block = block.title(title);
        }

        let inner = block.inner(area);
        block.render(area, buf);

        for (i, item) in self.items.iter().enumerate() {
            if i >= inner.height as usize {
                break;
            }

            let y = inner.y + i as u16;
            let mut x = inner.x;

            let item_style = if Some(i) == self.selected {
                self.theme.selected_style()
            } else {
                item.style
                    .unwrap_or_else(|| self.theme.secondary_text_style())
            };

            // Paint the full row background for the selected item
            if Some(i) == self.selected {
                for bg_x in inner.x..inner.x + inner.width {
                    let cell = buf.get_mut(bg_x, y);
                    cell.set_style(item_style);
                }
            }

            if let Some(icon) = item.icon {
                let consumed =
                    render_text_unicode_aware(icon, buf, x, y, inner.x + inner.width, item_style);
                x += consumed;
                if x < inner.x + inner.width {
                    let cell = buf.get_mut(x, y);
                    cell.set_char(' ');
                    x += 1;
                }
            }

            for span in &item.text.spans {
                let consumed = render_text_unicode_aware(
                    &span.content,
                    buf,
                    x,
                    y,
                    inner.x + inner.width,
                    span.style.patch(item_style),
                );
                x += consumed;
            }
        }
    }
}

/// Helper function to create a styled block
pub fn panel_block<'a>(title: Option<&'a str>, theme: &'a Theme, focused: bool) -> Block<'a> {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .border_style(if focused {
            theme.border_focused_style()
        } else {
            theme.border_style()
        });

    if let Some(title) = title {
        block = block.title(title);
    }

    block
}

/// Create a styled icon span
pub fn icon_span(icon: &str, style: Style) -> Span<'_> {
    Span::styled(icon, style)
}

/// Create a metric display span (for numbers)
pub fn metric_span(text: String, theme: &Theme) -> Span<'_> {
    Span::styled(text, theme.metric_style())
}

/// Icon for a todo's completion state
pub fn completion_icon(completed: bool) -> &'static str {
    if completed {
        Icons::COMPLETED
    } else {
        Icons::PENDING
    }
}

/// Format a todo title with consistent truncation across the UI
/// Handles Unicode characters properly and provides consistent display
pub fn format_title(title: &str, max_width: usize) -> String {
    if title.width() <= max_width {
        title.to_string()
    } else {
        // Use grapheme clusters to handle Unicode properly
        let mut result = String::new();
        let mut current_width = 0;
        let ellipsis = "...";
        let ellipsis_width = ellipsis.width();
        let target_width = max_width.saturating_sub(ellipsis_width);

        for grapheme in title.graphemes(true) {
            let grapheme_width = grapheme.width();
            if current_width + grapheme_width > target_width {
                break;
            }
            result.push_str(grapheme);
            current_width += grapheme_width;
        }

        result.push_str(ellipsis);
        result
    }
}

/// Centered popup area used by overlays
pub fn centered_rect(area: Rect) -> Rect {
    Rect {
        x: area.width / 6,
        y: area.height / 6,
        width: area.width * 2 / 3,
        height: area.height * 2 / 3,
    }
}
