use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Clear, Widget},
    Frame,
};

use crate::{
    app::{App, InputMode},
    features::todos::Filter,
    shared::theme::{Icons, Theme},
    widgets::{
        centered_rect, completion_icon, format_title, icon_span, metric_span, Card, ProgressBar,
        RowItem, RowList,
    },
};

/// Widest a todo title gets rendered before truncation
const MAX_TITLE_WIDTH: usize = 60;

/// Draw the main UI
pub fn draw(f: &mut Frame, app: &mut App) {
    let theme = app.theme.clone();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // Header: title bar + input line
            Constraint::Min(0),    // Todo list
            Constraint::Length(4), // Footer: counts, filter, progress
        ])
        .split(f.size());

    draw_header(f, chunks[0], app, &theme);
    draw_todo_list(f, chunks[1], app, &theme);
    draw_footer(f, chunks[2], app, &theme);

    // Draw help overlay if enabled
    if app.config.show_help {
        draw_help_overlay(f, f.size(), &theme);
    }
}

/// Draw the header with the app title, loading state, error banner and the
/// new-todo input line
fn draw_header(f: &mut Frame, area: Rect, app: &mut App, theme: &Theme) {
    let mut title_spans = vec![
        icon_span(Icons::TOGGLE_ALL, Style::default().fg(theme.accent)),
        Span::styled(" tuido", theme.header_style()),
        Span::styled(" │ ", theme.border_style()),
        metric_span(app.store.len().to_string(), theme),
        Span::styled(" todos", theme.secondary_text_style()),
    ];

    if app.store.all_completed() {
        title_spans.push(Span::styled(" │ ", theme.border_style()));
        title_spans.push(Span::styled("all done", theme.success_style()));
    }

    // Loading indicator while any request is in flight
    if app.is_loading() {
        let spinner_char = app.spinner_char();
        title_spans.push(Span::styled(" ", theme.border_style()));
        title_spans.push(Span::styled(
            format!("{spinner_char}"),
            theme.warning_style(),
        ));
    }

    // Transient error banner, auto-cleared by the app loop
    if let Some(error) = app.error() {
        title_spans.push(Span::styled(" │ ", theme.border_style()));
        title_spans.push(Span::styled(
            format!("{} {}", Icons::ERROR, error.message()),
            theme.danger_style(),
        ));
    }

    let input_line = if app.mode == InputMode::Insert {
        Line::from(vec![
            Span::styled(Icons::PROMPT, Style::default().fg(theme.accent)),
            Span::styled(format!(" {}", app.input), Style::default().fg(theme.text_primary)),
            Span::styled("▏", theme.warning_style()),
        ])
    } else if app.input.is_empty() {
        Line::from(vec![Span::styled(
            format!("{} press i to add a todo", Icons::PROMPT),
            theme.dimmed_style(),
        )])
    } else {
        // A failed create keeps the typed title around
        Line::from(vec![
            Span::styled(Icons::PROMPT, Style::default().fg(theme.accent)),
            Span::styled(format!(" {}", app.input), theme.secondary_text_style()),
        ])
    };

    let header_content = Text::from(vec![Line::from(title_spans), input_line]);

    let focused = app.mode == InputMode::Insert;
    let header_card = Card::new(header_content, theme)
        .title("New todo")
        .focused(focused);

    header_card.render(area, f.buffer_mut());
}

/// Draw the visible todos with selection, inline edit buffer and the
/// temporary in-flight todo
fn draw_todo_list(f: &mut Frame, area: Rect, app: &mut App, theme: &Theme) {
    // Sample the spinner before borrowing the store for the frame
    let spinner_char = app.spinner_char();
    let visible = app.store.visible();

    if visible.is_empty() && app.store.temp().is_none() {
        let message = match app.store.filter() {
            Filter::All => "No todos yet",
            Filter::Active => "No active todos",
            Filter::Completed => "No completed todos",
        };
        let empty_content = Text::from(vec![
            Line::from(""),
            Line::from(vec![Span::styled(message, theme.secondary_text_style())]),
        ]);
        let empty_card = Card::new(empty_content, theme).title("Todos");
        empty_card.render(area, f.buffer_mut());
        return;
    }

    let mut list_items = Vec::new();

    for (i, todo) in visible.iter().enumerate() {
        let is_selected = i == app.selected;
        let icon_style = if todo.completed {
            Style::default().fg(theme.success)
        } else {
            Style::default().fg(theme.text_secondary)
        };

        let title_span = if let InputMode::Edit(edit_id) = app.mode {
            if edit_id == todo.id {
                Span::styled(
                    format!("{}▏", app.edit_buffer),
                    Style::default()
                        .fg(theme.text_primary)
                        .add_modifier(Modifier::UNDERLINED),
                )
            } else {
                todo_title_span(todo.completed, &todo.title, theme)
            }
        } else {
            todo_title_span(todo.completed, &todo.title, theme)
        };

        let line = Line::from(vec![
            icon_span(completion_icon(todo.completed), icon_style),
            Span::styled(" ", Style::default()),
            title_span,
        ]);

        let mut item = RowItem::new(line);
        if is_selected {
            item = item.icon(Icons::ARROW_RIGHT);
        }

        list_items.push(item);
    }

    // The unsaved create, rendered last and never selectable
    if let Some(temp) = app.store.temp() {
        let line = Line::from(vec![
            Span::styled(format!("{spinner_char} "), theme.warning_style()),
            Span::styled(
                format_title(&temp.title, MAX_TITLE_WIDTH),
                theme.dimmed_style(),
            ),
        ]);
        list_items.push(RowItem::new(line).style(theme.dimmed_style()));
    }

    let selected = if app.mode == InputMode::Insert {
        None
    } else {
        Some(app.selected)
    };

    let list_title = format!("Todos ({})", app.store.filter().title());
    let todos_list = RowList::new(list_items, theme)
        .title(&list_title)
        .selected(selected);

    todos_list.render(area, f.buffer_mut());
}

fn todo_title_span<'a>(completed: bool, title: &str, theme: &Theme) -> Span<'a> {
    let text = format_title(title, MAX_TITLE_WIDTH);
    if completed {
        Span::styled(text, theme.dimmed_style().add_modifier(Modifier::CROSSED_OUT))
    } else {
        Span::styled(text, Style::default().fg(theme.text_primary))
    }
}

/// Draw the footer with counts, filter tabs and completion progress. The
/// full footer only appears once the list has todos.
fn draw_footer(f: &mut Frame, area: Rect, app: &App, theme: &Theme) {
    if app.store.is_empty() {
        let hints_content = Text::from(vec![
            Line::from(vec![
                Span::styled("i", theme.key_hint_style()),
                Span::styled(" add | ", theme.secondary_text_style()),
                Span::styled("r", theme.key_hint_style()),
                Span::styled(" reload | ", theme.secondary_text_style()),
                Span::styled("?", theme.key_hint_style()),
                Span::styled(" help | ", theme.secondary_text_style()),
                Span::styled("q", theme.danger_style()),
                Span::styled(" quit", theme.secondary_text_style()),
            ]),
        ]);
        let hints_card = Card::new(hints_content, theme).title("Controls");
        hints_card.render(area, f.buffer_mut());
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Min(0),     // Counts and filter tabs
            Constraint::Length(24), // Completion progress
        ])
        .split(area);

    let mut filter_spans = vec![Span::styled("filter ", theme.secondary_text_style())];
    for index in 0..Filter::count() {
        let filter = Filter::from_index(index);
        let style = if filter == app.store.filter() {
            theme.selected_style()
        } else {
            theme.secondary_text_style()
        };
        filter_spans.push(Span::styled(format!(" {} {} ", index + 1, filter.title()), style));
    }

    let mut status_spans = vec![
        metric_span(app.store.active_count().to_string(), theme),
        Span::styled(" items left", theme.secondary_text_style()),
    ];
    let completed = app.store.completed_count();
    if completed > 0 {
        status_spans.push(Span::styled(" │ ", theme.border_style()));
        status_spans.push(Span::styled("c", theme.key_hint_style()));
        status_spans.push(Span::styled(
            format!(" clear completed ({completed})"),
            theme.secondary_text_style(),
        ));
    }
    status_spans.push(Span::styled(" │ ", theme.border_style()));
    status_spans.push(Span::styled("a", theme.key_hint_style()));
    status_spans.push(Span::styled(" toggle all", theme.secondary_text_style()));
    status_spans.push(Span::styled(" │ ", theme.border_style()));
    status_spans.push(Span::styled("?", theme.key_hint_style()));
    status_spans.push(Span::styled(" help", theme.secondary_text_style()));

    let footer_content = Text::from(vec![Line::from(status_spans), Line::from(filter_spans)]);
    let footer_card = Card::new(footer_content, theme).title("Status");
    footer_card.render(chunks[0], f.buffer_mut());

    // Completion ratio card with the progress bar rendered into its body
    let percentage = if app.store.len() > 0 {
        (app.store.completed_count() as f64 / app.store.len() as f64) * 100.0
    } else {
        0.0
    };

    let progress_card = Card::new(Text::from(""), theme).title("Done");
    progress_card.render(chunks[1], f.buffer_mut());

    if chunks[1].width > 4 && chunks[1].height > 2 {
        let progress_area = Rect {
            x: chunks[1].x + 2,
            y: chunks[1].y + 1,
            width: chunks[1].width - 4,
            height: 1,
        };
        ProgressBar::new(percentage, theme).render(progress_area, f.buffer_mut());
    }
}

/// Draw help overlay with key bindings
fn draw_help_overlay(f: &mut Frame, area: Rect, theme: &Theme) {
    let popup_area = centered_rect(area);

    // Clear the background
    f.render_widget(Clear, popup_area);

    let bindings: &[(&str, &str)] = &[
        ("j/k ↑↓", "move selection"),
        ("i n", "add a new todo"),
        ("Enter e", "edit selected title"),
        ("Space x", "toggle selected"),
        ("d", "delete selected"),
        ("a", "toggle all todos"),
        ("c", "clear completed todos"),
        ("Tab 1/2/3", "switch filter (All/Active/Completed)"),
        ("r", "reload from server"),
        ("t", "cycle theme"),
        ("?", "toggle this help"),
        ("q Esc", "quit"),
    ];

    let mut lines = vec![
        Line::from(vec![Span::styled("Key bindings", theme.header_style())]),
        Line::from(""),
    ];
    for (keys, action) in bindings {
        lines.push(Line::from(vec![
            Span::styled(format!("{keys:>10}  "), theme.key_hint_style()),
            Span::styled(*action, theme.secondary_text_style()),
        ]));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(vec![Span::styled(
        "Errors clear on their own after a few seconds.",
        theme.dimmed_style(),
    )]));

    let help_card = Card::new(Text::from(lines), theme)
        .title("Help")
        .focused(true);
    help_card.render(popup_area, f.buffer_mut());
}
