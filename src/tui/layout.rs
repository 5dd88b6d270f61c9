//! Player layout.
//!
//! ```text
//!  1 TypeScript │ 2 Express │ 3 Next │ ...
//! ┌─ nextjs · tsx ──────────────────────────────────┐
//! │  1 // pages/index.js                            │
//! │  2 export default function Home() {▌            │
//! │                                                 │
//! └─────────────────────────────────────────────────┘
//!  ▶ playing  auto ✓  42%  duotone-sea   ←/→ tabs ...
//! ```

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use crate::config::Theme;
use crate::player::Scheduler;

use super::app::TuiApp;

/// Typing cursor shown while a tab is still revealing.
const CURSOR: &str = "▌";

/// Colors for one theme.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    pub accent: Color,
    pub text: Color,
    pub dim: Color,
    pub background: Color,
}

pub fn palette(theme: Theme) -> Palette {
    match theme {
        Theme::DuotoneSea => Palette {
            accent: Color::Rgb(0, 255, 153),
            text: Color::Rgb(200, 220, 230),
            dim: Color::Rgb(90, 110, 125),
            background: Color::Rgb(19, 17, 28),
        },
        Theme::Dracula => Palette {
            accent: Color::Rgb(189, 147, 249),
            text: Color::Rgb(248, 248, 242),
            dim: Color::Rgb(98, 114, 164),
            background: Color::Rgb(40, 42, 54),
        },
        Theme::Monokai => Palette {
            accent: Color::Rgb(166, 226, 46),
            text: Color::Rgb(248, 248, 242),
            dim: Color::Rgb(117, 113, 94),
            background: Color::Rgb(39, 40, 34),
        },
        Theme::Light => Palette {
            accent: Color::Rgb(0, 120, 80),
            text: Color::Black,
            dim: Color::DarkGray,
            background: Color::White,
        },
    }
}

/// Draw the full player.
pub fn draw<S: Scheduler>(f: &mut Frame, app: &TuiApp<S>) {
    let colors = palette(app.preferences.theme);
    f.render_widget(
        Block::default().style(Style::default().bg(colors.background)),
        f.area(),
    );

    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // tab bar
            Constraint::Min(3),    // code pane
            Constraint::Length(1), // status bar
        ])
        .split(f.area());

    if app.player.tabs().is_empty() {
        let empty = Paragraph::new("No tabs provided").style(Style::default().fg(colors.dim));
        f.render_widget(empty, outer[1]);
    } else {
        draw_tab_bar(f, app, outer[0], colors);
        draw_code(f, app, outer[1], colors);
    }
    draw_status(f, app, outer[2], colors);
}

fn draw_tab_bar<S: Scheduler>(f: &mut Frame, app: &TuiApp<S>, area: Rect, colors: Palette) {
    let active = app.player.active_index();
    let mut spans = Vec::new();
    for (i, tab) in app.player.tabs().iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" │ ", Style::default().fg(colors.dim)));
        }
        let style = if Some(i) == active {
            Style::default()
                .fg(colors.accent)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(colors.text)
        };
        let label = if i < 9 {
            format!("{} {}", i + 1, tab.label)
        } else {
            tab.label.clone()
        };
        spans.push(Span::styled(label, style));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn draw_code<S: Scheduler>(f: &mut Frame, app: &TuiApp<S>, area: Rect, colors: Palette) {
    let title = match (app.player.active_tab(), app.active_language()) {
        (Some(tab), Some(lang)) => format!(" {} · {lang} ", tab.id),
        _ => String::new(),
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.accent));
    let inner = block.inner(area);

    let text = app.player.visible_text();
    let show_cursor = app.player.is_playing() && !app.player.is_complete();
    let lines = code_lines(text, app.preferences.show_line_numbers, show_cursor, colors);

    // Keep the line being typed in view.
    let scroll = lines.len().saturating_sub(inner.height as usize) as u16;
    let paragraph = Paragraph::new(lines).block(block).scroll((scroll, 0));
    f.render_widget(paragraph, area);
}

/// Build styled lines for the revealed text.
pub fn code_lines(text: &str, line_numbers: bool, cursor: bool, colors: Palette) -> Vec<Line<'_>> {
    let total = text.split('\n').count();
    let width = total.to_string().len();
    let mut lines: Vec<Line> = text
        .split('\n')
        .enumerate()
        .map(|(i, raw)| {
            let mut spans = Vec::new();
            if line_numbers {
                spans.push(Span::styled(
                    format!("{:>width$} ", i + 1),
                    Style::default().fg(colors.dim),
                ));
            }
            let style = if is_comment(raw) {
                Style::default().fg(colors.dim).add_modifier(Modifier::ITALIC)
            } else {
                Style::default().fg(colors.text)
            };
            spans.push(Span::styled(raw, style));
            Line::from(spans)
        })
        .collect();

    if cursor {
        if let Some(last) = lines.last_mut() {
            last.spans.push(Span::styled(CURSOR, Style::default().fg(colors.accent)));
        }
    }
    lines
}

fn is_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    ["//", "#", "--", "/*", "*"].iter().any(|p| trimmed.starts_with(p))
}

fn draw_status<S: Scheduler>(f: &mut Frame, app: &TuiApp<S>, area: Rect, colors: Palette) {
    let play = if app.player.is_playing() {
        "▶ playing"
    } else {
        "⏸ paused"
    };
    let auto = if app.player.auto_advance() { "auto ✓" } else { "auto ✗" };
    let progress = format!("{:>3.0}%", app.player.progress() * 100.0);

    let mut spans = vec![
        Span::styled(format!(" {play} "), Style::default().fg(colors.accent)),
        Span::styled(format!(" {auto} "), Style::default().fg(colors.text)),
        Span::styled(format!(" {progress} "), Style::default().fg(colors.text)),
        Span::styled(
            format!(" {} ", app.preferences.theme.name()),
            Style::default().fg(colors.dim),
        ),
    ];
    match &app.last_error {
        Some(err) => spans.push(Span::styled(format!("  {err}"), Style::default().fg(Color::Red))),
        None => spans.push(Span::styled(
            "  ←/→ tabs  space play  a auto  n lines  t theme  r restart  q quit",
            Style::default().fg(colors.dim),
        )),
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
