//! UI rendering for the TUI.
//!
//! Handles layout and widget rendering using ratatui.
//! Colors come from the active [`Theme`](crate::tui::Theme).

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::AppMode;
use crate::core::{Shortcut, ViewMode};
use crate::editor::{EditorField, EditorForm};
use crate::tui::Theme;
use crate::App;

/// Height of one card in grid view, borders included.
const CARD_HEIGHT: u16 = 6;

/// Draw the main UI.
pub fn draw(frame: &mut Frame, app: &App) {
    if matches!(app.mode, AppMode::Help) {
        draw_help_screen(frame, app);
        return;
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header with search
            Constraint::Min(6),    // Shortcuts
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    if app.filtered.is_empty() {
        draw_empty_state(frame, app, chunks[1]);
    } else {
        match app.view_mode {
            ViewMode::Grid => draw_grid(frame, app, chunks[1]),
            ViewMode::List => draw_list(frame, app, chunks[1]),
        }
    }
    draw_status_bar(frame, app, chunks[2]);

    match &app.mode {
        AppMode::Editor => {
            if let Some(form) = &app.editor {
                draw_editor_overlay(frame, app, form);
            }
        }
        AppMode::ConfirmDelete(_) => draw_confirm_delete_overlay(frame, app),
        _ => {}
    }
}

/// Draw the header with the search input.
fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let count = if app.input.trim().is_empty() {
        format!(" {} shortcuts ", app.repo.len())
    } else {
        format!(" {} of {} ", app.filtered.len(), app.repo.len())
    };

    let input_line = if app.input.is_empty() {
        Line::from(vec![
            Span::styled(" / ", Style::default().fg(theme.primary)),
            Span::styled("Search projects...", Style::default().fg(theme.text_muted)),
        ])
    } else {
        Line::from(vec![
            Span::styled(" / ", Style::default().fg(theme.primary)),
            Span::styled(&app.input, Style::default().fg(theme.text)),
            Span::styled("▏", Style::default().fg(theme.primary)),
        ])
    };

    let header = Paragraph::new(input_line).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.border))
            .title(Span::styled(
                " DevDeck ",
                Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
            ))
            .title_top(Line::from(Span::styled(count, Style::default().fg(theme.text_muted))).right_aligned()),
    );

    frame.render_widget(header, area);
}

fn draw_empty_state(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let message = if app.repo.is_empty() {
        vec![
            Line::from(Span::styled("No shortcuts yet", Style::default().fg(theme.text))),
            Line::from(""),
            Line::from(Span::styled(
                "Press Ctrl+N to add your first project",
                Style::default().fg(theme.text_muted),
            )),
        ]
    } else {
        vec![Line::from(Span::styled(
            format!("No shortcuts match \"{}\"", app.input.trim()),
            Style::default().fg(theme.text_dim),
        ))]
    };

    let top = area.height.saturating_sub(message.len() as u16) / 2;
    let inner = Rect { y: area.y + top, height: area.height.saturating_sub(top), ..area };
    frame.render_widget(Paragraph::new(message).alignment(Alignment::Center), inner);
}

/// Cards laid out in rows, scrolled so the selected card stays visible.
fn draw_grid(frame: &mut Frame, app: &App, area: Rect) {
    let columns = app.grid_columns.max(1);
    let rows_visible = usize::from((area.height / CARD_HEIGHT).max(1));
    let selected_row = app.selected / columns;
    let first_row = selected_row.saturating_sub(rows_visible - 1);

    let row_areas =
        Layout::vertical(vec![Constraint::Length(CARD_HEIGHT); rows_visible]).split(area);
    let list = app.repo.list();

    for (r, row_area) in row_areas.iter().enumerate() {
        let cells = Layout::horizontal(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(*row_area);
        for (c, cell) in cells.iter().enumerate() {
            let position = (first_row + r) * columns + c;
            let Some(shortcut) = app.filtered.get(position).and_then(|&i| list.get(i)) else {
                return;
            };
            draw_card(frame, &app.theme, shortcut, position == app.selected, *cell);
        }
    }
}

fn draw_card(frame: &mut Frame, theme: &Theme, shortcut: &Shortcut, selected: bool, area: Rect) {
    let width = usize::from(area.width.saturating_sub(4));

    let (border, background) = if selected {
        (Style::default().fg(theme.primary), Style::default().bg(theme.selected_bg))
    } else {
        (Style::default().fg(theme.border), Style::default())
    };

    let mut title = vec![
        Span::styled(format!(" {} ", shortcut.icon.glyph()), Style::default().fg(theme.accent)),
        Span::styled(
            truncate(&shortcut.name, width.saturating_sub(10)),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ];
    if let Some(port) = shortcut.active_port() {
        title.push(Span::styled(format!(":{port} "), Style::default().fg(theme.port)));
    }

    let path_style = if App::path_exists(shortcut) {
        Style::default().fg(theme.text_dim)
    } else {
        Style::default().fg(theme.warning)
    };

    let mut lines = vec![
        Line::from(Span::styled(truncate(&shortcut.path, width), path_style)),
        Line::from(vec![
            Span::styled("$ ", Style::default().fg(theme.text_muted)),
            Span::styled(
                truncate(&shortcut.command, width.saturating_sub(2)),
                Style::default().fg(theme.text),
            ),
        ]),
    ];
    if let Some(description) = &shortcut.description {
        lines.push(Line::from(Span::styled(
            truncate(description, width),
            Style::default().fg(theme.text_muted).add_modifier(Modifier::ITALIC),
        )));
    }

    let card = Paragraph::new(lines).style(background).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(Line::from(title)),
    );
    frame.render_widget(card, area);
}

/// One shortcut per line.
fn draw_list(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let items: Vec<ListItem> = app
        .visible()
        .map(|shortcut| {
            let port = shortcut.active_port().map(|p| format!(":{p}")).unwrap_or_default();
            ListItem::new(Line::from(vec![
                Span::styled(format!(" {} ", shortcut.icon.glyph()), Style::default().fg(theme.accent)),
                Span::styled(
                    format!("{:24}", truncate(&shortcut.name, 24)),
                    Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
                ),
                Span::styled(format!("{port:7}"), Style::default().fg(theme.port)),
                Span::styled(
                    format!("{:36}", truncate(&shortcut.path, 36)),
                    Style::default().fg(theme.text_dim),
                ),
                Span::styled(format!(" $ {}", shortcut.command), Style::default().fg(theme.text_muted)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(theme.border)),
        )
        .highlight_style(Style::default().bg(theme.selected_bg).add_modifier(Modifier::BOLD))
        .highlight_symbol("▌");

    let mut state = ListState::default().with_selected(Some(app.selected));
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;

    let mut spans = vec![
        Span::styled(
            format!(" DevDeck v{} ", crate::VERSION),
            Style::default().fg(theme.selected_bg).bg(theme.primary).add_modifier(Modifier::BOLD),
        ),
        Span::raw(" "),
    ];

    match &app.status_message {
        Some(message) => {
            spans.push(Span::styled(message.as_str(), Style::default().fg(theme.success)));
        }
        None => {
            let view = match app.view_mode {
                ViewMode::Grid => "grid",
                ViewMode::List => "list",
            };
            spans.push(Span::styled(format!("{view} view"), Style::default().fg(theme.text_muted)));
        }
    }

    let hints = "Enter run • ^N new • ^E edit • ^D delete • ? help ";
    let used = Line::from(spans.clone()).width() + hints.chars().count();
    let padding = usize::from(area.width).saturating_sub(used).max(1);
    spans.push(Span::raw(" ".repeat(padding)));
    spans.push(Span::styled(hints, Style::default().fg(theme.text_muted)));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_editor_overlay(frame: &mut Frame, app: &App, form: &EditorForm) {
    let theme = &app.theme;
    let area = centered_rect(64, 26, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = Vec::new();
    for field in EditorField::ORDER {
        let focused = form.focus == field;
        let label_style = if focused {
            Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(theme.text_muted)
        };
        lines.push(Line::from(Span::styled(field.label(), label_style)));
        lines.push(field_value_line(form, field, focused, theme));

        if field == EditorField::Port {
            if let Some(warning) = form.port_warning(&app.repo) {
                lines.push(Line::from(Span::styled(
                    format!("⚠ {warning}"),
                    Style::default().fg(theme.warning),
                )));
            }
        }
        if field == EditorField::Command {
            lines.push(suggest_hint(app, form, theme));
        }
        if field == EditorField::IconFile && focused {
            lines.push(Line::from(Span::styled(
                "  [^O] embed image as icon",
                Style::default().fg(theme.text_muted),
            )));
        }
    }

    lines.push(Line::from(""));
    if let Some(error) = &form.error {
        lines.push(Line::from(Span::styled(error.as_str(), Style::default().fg(theme.error))));
    }
    lines.push(Line::from(vec![
        Span::styled("[Enter] ", Style::default().fg(theme.success)),
        Span::styled(form.submit_label(), Style::default().fg(theme.text)),
        Span::styled("  [Tab] ", Style::default().fg(theme.primary)),
        Span::styled("next field", Style::default().fg(theme.text_dim)),
        Span::styled("  [Esc] ", Style::default().fg(theme.text_muted)),
        Span::styled("cancel", Style::default().fg(theme.text_dim)),
    ]));

    let popup = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.primary))
            .title(format!(" {} ", form.title()))
            .title_style(Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(popup, area);
}

fn field_value_line<'a>(
    form: &'a EditorForm,
    field: EditorField,
    focused: bool,
    theme: &Theme,
) -> Line<'a> {
    if field == EditorField::Icon {
        let arrows = if focused { theme.primary } else { theme.text_muted };
        return Line::from(vec![
            Span::styled("  ◀ ", Style::default().fg(arrows)),
            Span::styled(form.icon.glyph(), Style::default().fg(theme.accent)),
            Span::styled(format!(" {}", form.icon.label()), Style::default().fg(theme.text)),
            Span::styled(" ▶", Style::default().fg(arrows)),
        ]);
    }

    let value = form.value(field).unwrap_or_default();
    let mut spans = vec![Span::raw("  ")];
    if value.is_empty() && !focused {
        spans.push(Span::styled(placeholder(field), Style::default().fg(theme.text_muted)));
    } else {
        spans.push(Span::styled(value, Style::default().fg(theme.text)));
    }
    if focused {
        spans.push(Span::styled("▏", Style::default().fg(theme.primary)));
    }
    Line::from(spans)
}

fn suggest_hint(app: &App, form: &EditorForm, theme: &Theme) -> Line<'static> {
    let (text, color) = if form.is_suggestion_pending() {
        ("  ✦ Suggesting...", theme.accent)
    } else if !app.suggestions_configured() {
        ("  [^G] suggest (no AI provider, uses default)", theme.text_muted)
    } else if form.can_suggest() {
        ("  [^G] AI suggest", theme.accent)
    } else {
        ("  [^G] AI suggest (enter a name or path first)", theme.text_muted)
    };
    Line::from(Span::styled(text, Style::default().fg(color)))
}

fn placeholder(field: EditorField) -> &'static str {
    match field {
        EditorField::Name => "My Project",
        EditorField::Path => "~/projects/my-app",
        EditorField::Command => "npm run dev",
        EditorField::Port => "3000",
        EditorField::Description => "What is this project?",
        EditorField::IconFile => "~/Pictures/logo.png",
        EditorField::Icon => "",
    }
}

fn draw_confirm_delete_overlay(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = centered_rect(50, 5, frame.area());
    frame.render_widget(Clear, area);

    let name = app.pending_delete_name().unwrap_or("this shortcut");
    let content = vec![
        Line::from(""),
        Line::from(vec![
            Span::styled(" Delete ", Style::default().fg(theme.text)),
            Span::styled(name, Style::default().fg(theme.text).add_modifier(Modifier::BOLD)),
            Span::styled("? ", Style::default().fg(theme.text)),
            Span::styled("[y] Delete  ", Style::default().fg(theme.error)),
            Span::styled("[n] Keep", Style::default().fg(theme.text_muted)),
        ]),
    ];

    let popup = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(theme.error))
            .title(" Delete Shortcut ")
            .title_style(Style::default().fg(theme.error).add_modifier(Modifier::BOLD)),
    );
    frame.render_widget(popup, area);
}

fn draw_help_screen(frame: &mut Frame, app: &App) {
    let theme = &app.theme;
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(10), Constraint::Length(1)])
        .split(area);

    let title = Paragraph::new(Line::from(Span::styled(
        " Keyboard Shortcuts ",
        Style::default().fg(theme.primary).add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(theme.primary)));
    frame.render_widget(title, chunks[0]);

    let section = |name: &'static str| {
        Line::from(Span::styled(name, Style::default().fg(theme.accent).add_modifier(Modifier::BOLD)))
    };

    let lines = vec![
        section("Dashboard"),
        help_line("type", "Search by name or path", theme),
        help_line("↑ ↓ ← →", "Move selection", theme),
        help_line("Enter", "Save launcher script for the selected project", theme),
        help_line("Ctrl+N", "New shortcut", theme),
        help_line("Ctrl+E", "Edit selected shortcut", theme),
        help_line("Ctrl+D", "Delete selected shortcut", theme),
        help_line("Ctrl+V / Tab", "Toggle grid and list view", theme),
        help_line("Ctrl+U", "Clear search", theme),
        help_line("Esc", "Clear search, or quit", theme),
        Line::from(""),
        section("Editor"),
        help_line("Tab / Shift+Tab", "Next / previous field", theme),
        help_line("← →", "Change icon (icon field)", theme),
        help_line("Ctrl+O", "Embed the image in the icon file field", theme),
        help_line("Ctrl+G", "Suggest a run command", theme),
        help_line("Ctrl+P", "Use next free port", theme),
        help_line("Enter", "Save", theme),
        help_line("Esc", "Cancel", theme),
    ];
    frame.render_widget(Paragraph::new(lines), chunks[1]);

    let footer = Paragraph::new(Span::styled(
        "Press Esc or ? to close",
        Style::default().fg(theme.text_muted),
    ))
    .alignment(Alignment::Center);
    frame.render_widget(footer, chunks[2]);
}

fn help_line<'a>(key: &'a str, description: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("  {key:18}"), Style::default().fg(theme.primary).add_modifier(Modifier::BOLD)),
        Span::styled(description, Style::default().fg(theme.text)),
    ])
}

/// A `width` x `height` rectangle centered in `area`, clipped to it.
fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width.saturating_sub(2));
    let height = height.min(area.height.saturating_sub(2));
    Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    )
}

/// Cut `text` to `max` characters, ending with an ellipsis when shortened.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut cut: String = text.chars().take(max - 1).collect();
    cut.push('…');
    cut
}
