use ratatui::{
    Frame,
    layout::{Layout, Direction, Constraint, Rect},
    widgets::{Block, Borders, BorderType, List, ListItem, Paragraph, Wrap, Clear},
    style::{Color, Style, Modifier},
    text::{Line, Span},
};

use crate::app::App;
use crate::screens::{
    onboarding, ActiveScreen, BoardScreen, BoardsScreen, DetailsScreen, IdentifiedScreen, ScanningScreen,
};
use crate::section::ListSection;
use crate::toast::{Toast, ToastPreset};
use crate::types::{BoardKind, CollectionEntry, PermissionState, Pin};
use crate::util_text::{or_unknown, truncate_chars};

const FOCUS: Color = Color::Cyan;
const UNFOCUSED: Color = Color::DarkGray;
const DIM: Color = Color::Gray;
const DONE: Color = Color::Green;
const ERROR: Color = Color::Red;
const SELECTION_BG: Color = Color::Cyan;
const SELECTION_FG: Color = Color::Black;

// ===============================
// Top-level draw
// ===============================
pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // header
            Constraint::Min(0),    // body
            Constraint::Length(2), // footer
        ])
        .split(f.area());

    header(f, chunks[0], app);
    match app.screen() {
        ActiveScreen::Onboarding(_) => onboarding_body(f, chunks[1]),
        ActiveScreen::Boards(s) => boards_body(f, chunks[1], s),
        ActiveScreen::Board(s) => board_body(f, chunks[1], s),
        ActiveScreen::Details(s) => details_body(f, chunks[1], s),
        ActiveScreen::Scanning(s) => scanning_body(f, chunks[1], s),
        ActiveScreen::Identified(s) => identified_body(f, chunks[1], s),
    }
    footer(f, chunks[2], app);

    // Overlays render last
    if let ActiveScreen::Details(s) = app.screen() {
        if s.confirm_remove_visible() {
            draw_confirm_modal(f);
        }
    }
    if let Some(toast) = app.toast() {
        draw_toast_modal(f, toast);
    }
}

// ===============================
// Header / Footer
// ===============================
fn header(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![
        Span::styled("Pinboard", Style::default().fg(FOCUS).add_modifier(Modifier::BOLD)),
        Span::raw(" │ "),
        Span::raw(app.route().name()),
    ];
    if let Some(link) = app.route().to_link() {
        spans.push(Span::styled(format!("  {link}"), Style::default().fg(DIM)));
    }
    let w = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::BOTTOM).border_type(BorderType::Plain));
    f.render_widget(w, area);
}

fn key(k: &'static str) -> Span<'static> {
    Span::styled(k, Style::default().fg(FOCUS))
}

fn footer(f: &mut Frame, area: Rect, app: &App) {
    let mut spans: Vec<Span> = Vec::with_capacity(32);
    let mut hint = |k: &'static str, label: &'static str| {
        spans.push(key(k));
        spans.push(Span::raw(format!(" {label} │ ")));
    };

    match app.screen() {
        ActiveScreen::Onboarding(_) => hint("Enter", "get started"),
        ActiveScreen::Boards(_) => {
            hint("↑/↓", "board");
            hint("Enter", "open");
            hint("r", "reload");
        }
        ActiveScreen::Board(_) => {
            hint("←/→/↑/↓", "move");
            hint("Enter", "details");
            hint("r", "reload");
        }
        ActiveScreen::Details(_) => {
            hint("d", "remove");
            hint("1/2/3", "move to board");
            hint("r", "retry");
        }
        ActiveScreen::Scanning(_) => {
            hint("c", "capture");
            hint("p", "permission");
        }
        ActiveScreen::Identified(_) => {
            hint("Enter", "view");
            hint("r", "scan again");
        }
    }
    hint("s", "scan");
    hint("b", "boards");
    hint("m", "my board");
    if app.can_go_back() {
        hint("Esc", "back");
    }
    hint("q", "quit");
    spans.push(Span::raw(format!("FPS {}", app.fps())));

    let w = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::TOP).border_type(BorderType::Plain));
    f.render_widget(w, area);
}

fn pane(title: String, focused: bool) -> Block<'static> {
    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_type(if focused { BorderType::Double } else { BorderType::Rounded })
        .border_style(
            Style::default()
                .fg(if focused { FOCUS } else { UNFOCUSED })
                .add_modifier(if focused { Modifier::BOLD } else { Modifier::empty() }),
        )
}

fn entry_label(entry: &CollectionEntry) -> String {
    or_unknown(entry.pin.name.as_deref()).to_string()
}

fn empty_state(board: BoardKind) -> &'static str {
    match board {
        BoardKind::MyBoard => "No pins on your board yet. Scan one to get started.",
        BoardKind::Wishlist => "Your wishlist is empty.",
        BoardKind::Trading => "Nothing up for trade.",
    }
}

// ===============================
// Screens
// ===============================
fn onboarding_body(f: &mut Frame, area: Rect) {
    let text = vec![
        Line::from(""),
        Line::from(Span::styled(onboarding::HEADLINE, Style::default().add_modifier(Modifier::BOLD))),
        Line::from(""),
        Line::from(onboarding::BODY),
        Line::from(""),
        Line::from(vec![key("Enter"), Span::raw("  Get started")]),
    ];
    let w = Paragraph::new(text).wrap(Wrap { trim: true }).block(pane(" Welcome ".into(), true));
    f.render_widget(w, area);
}

fn section_lines(section: &ListSection<CollectionEntry>, board: BoardKind) -> Vec<ListItem<'static>> {
    if section.is_loading() && section.data().is_none() {
        return vec![ListItem::new("Loading…").style(Style::default().fg(DIM))];
    }
    if section.items().is_empty() {
        // Failed fetches render the same empty state
        return vec![ListItem::new(empty_state(board)).style(Style::default().fg(DIM))];
    }
    section
        .items()
        .iter()
        .map(|e| ListItem::new(format!("• {}", entry_label(e))))
        .collect()
}

fn boards_body(f: &mut Frame, area: Rect, screen: &BoardsScreen) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(1, 3), Constraint::Ratio(1, 3)])
        .split(area);

    let layout = screen.device_class().as_str();
    for (i, board) in BoardKind::ALL.into_iter().enumerate() {
        let section = screen.section(board);
        let focused = screen.selected_board() == board;
        let mut title = format!(" {} ", board.title());
        if section.is_loading() {
            title.push_str("· loading ");
        }
        if i == 0 {
            title.push_str(&format!("· {layout} "));
        }
        let list = List::new(section_lines(section, board)).block(pane(title, focused));
        f.render_widget(list, rows[i]);
    }
}

fn board_body(f: &mut Frame, area: Rect, screen: &BoardScreen) {
    let entries = screen.entries();
    let mut title = format!(" {} ({}) ", screen.board().title(), entries.items().len());
    if entries.is_loading() {
        title.push_str("· loading ");
    }
    let outer = pane(title, true);
    let inner = outer.inner(area);
    f.render_widget(outer, area);

    if entries.items().is_empty() {
        let msg = if entries.is_loading() { "Loading…" } else { empty_state(screen.board()) };
        f.render_widget(Paragraph::new(msg).style(Style::default().fg(DIM)), inner);
        return;
    }

    let cols = screen.columns().max(1);
    let cell_h = 3u16;
    let visible_rows = (inner.height / cell_h).max(1) as usize;
    let cursor_row = screen.cursor() / cols;
    let first_row = cursor_row.saturating_sub(visible_rows - 1);

    let rows: Vec<&[CollectionEntry]> = entries.items().chunks(cols).collect();
    for (r, row) in rows.iter().enumerate().skip(first_row).take(visible_rows) {
        let y = inner.y + ((r - first_row) as u16) * cell_h;
        let row_area = Rect { x: inner.x, y, width: inner.width, height: cell_h.min(inner.bottom() - y) };
        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, cols as u32); cols])
            .split(row_area);
        for (c, entry) in row.iter().enumerate() {
            let selected = r * cols + c == screen.cursor();
            let width = cells[c].width.saturating_sub(2) as usize;
            let style = if selected {
                Style::default().bg(SELECTION_BG).fg(SELECTION_FG).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            let w = Paragraph::new(truncate_chars(&entry_label(entry), width))
                .style(style)
                .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded));
            f.render_widget(w, cells[c]);
        }
    }
}

fn pin_lines(pin: &Pin) -> Vec<Line<'static>> {
    pin.detail_rows()
        .into_iter()
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(format!("{label:<15}"), Style::default().fg(DIM)),
                Span::raw(or_unknown(value).to_string()),
            ])
        })
        .collect()
}

fn details_body(f: &mut Frame, area: Rect, screen: &DetailsScreen) {
    let mut lines: Vec<Line> = Vec::new();
    if let Some(pin) = screen.pin().data() {
        lines.extend(pin_lines(pin));
    } else if let Some(err) = screen.error_message() {
        lines.push(Line::from(Span::styled(err, Style::default().fg(ERROR))));
        lines.push(Line::from(""));
        lines.push(Line::from(vec![key("r"), Span::raw("  Retry")]));
    } else {
        lines.push(Line::from(Span::styled("Loading…", Style::default().fg(DIM))));
    }

    lines.push(Line::from(""));
    if screen.is_removing() {
        lines.push(Line::from("Removing…"));
    }
    if let Some(to) = screen.moving_to() {
        lines.push(Line::from(format!("Moving to {}…", to.title())));
    }
    if screen.move_enabled() {
        lines.push(Line::from(vec![
            Span::raw("Move to: "),
            key("1"), Span::raw(" my board  "),
            key("2"), Span::raw(" wishlist  "),
            key("3"), Span::raw(" trading"),
        ]));
    }

    let title = format!(" Pin {} ", screen.item_id());
    let w = Paragraph::new(lines).wrap(Wrap { trim: false }).block(pane(title, true));
    f.render_widget(w, area);
}

fn scanning_body(f: &mut Frame, area: Rect, screen: &ScanningScreen) {
    let lines = match screen.permission() {
        PermissionState::Unknown => vec![Line::from("Checking camera access…")],
        PermissionState::Denied => vec![
            Line::from(Span::styled("Camera access is needed to scan pins.", Style::default().fg(ERROR))),
            Line::from("Configure a capture source (CAPTURE_PATH) and request access again."),
            Line::from(""),
            Line::from(vec![key("p"), Span::raw("  Request access")]),
        ],
        PermissionState::Granted if screen.is_loading() => {
            vec![Line::from("Identifying your pin…")]
        }
        PermissionState::Granted => vec![
            Line::from("Center the pin in the frame."),
            Line::from(""),
            Line::from(vec![key("c"), Span::raw("  Capture")]),
        ],
    };
    let w = Paragraph::new(lines).wrap(Wrap { trim: true }).block(pane(" Scan a pin ".into(), true));
    f.render_widget(w, area);
}

fn identified_body(f: &mut Frame, area: Rect, screen: &IdentifiedScreen) {
    let mut lines = vec![
        Line::from(Span::styled("Pin identified", Style::default().fg(DONE).add_modifier(Modifier::BOLD))),
        Line::from(""),
    ];
    lines.extend(pin_lines(screen.data().pin()));
    lines.push(Line::from(""));
    lines.push(Line::from(vec![key("Enter"), Span::raw("  View on my board")]));
    let w = Paragraph::new(lines).wrap(Wrap { trim: false }).block(pane(" Result ".into(), true));
    f.render_widget(w, area);
}

// ===============================
// Overlays
// ===============================
fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect { x, y, width, height }
}

fn draw_confirm_modal(f: &mut Frame) {
    let overlay = centered(f.area(), 44, 5);
    f.render_widget(Clear, overlay);
    let text = vec![
        Line::from("Remove this pin from your collection?"),
        Line::from(vec![key("y"), Span::raw(" remove   "), key("n"), Span::raw(" cancel")]),
    ];
    let w = Paragraph::new(text).block(
        Block::default()
            .title(" Remove Pin ")
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(ERROR)),
    );
    f.render_widget(w, overlay);
}

fn draw_toast_modal(f: &mut Frame, toast: &Toast) {
    let (icon, color) = match toast.preset {
        ToastPreset::Done => ("✓", DONE),
        ToastPreset::Error => ("✗", ERROR),
    };

    // Small centered box (40% width, 4 lines height)
    let area = f.area();
    let overlay = centered(area, ((area.width * 4) / 10).max(30), 4);
    f.render_widget(Clear, overlay);

    let block = Block::default()
        .title(format!(" {icon} {} ", toast.title))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color));

    let text = Paragraph::new(toast.message.clone())
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .block(block);

    f.render_widget(text, overlay);
}
