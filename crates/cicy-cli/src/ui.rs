//! Rendering of the session.

use cicy_session::{LineKind, Mode, Session};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
};

const TITLE: Color = Color::Rgb(0x7a, 0xa2, 0xf7);
const USER: Color = Color::Rgb(0xf7, 0x76, 0x8e);
const REPLY: Color = Color::Rgb(0x9e, 0xce, 0x6a);
const MUTED: Color = Color::Rgb(0x56, 0x5f, 0x89);
const INCOMING: Color = Color::Rgb(0xbb, 0x9a, 0xf7);

const fn line_style(kind: LineKind) -> Style {
    let fg = match kind {
        LineKind::Banner => TITLE,
        LineKind::User => USER,
        LineKind::Reply => REPLY,
        LineKind::Elapsed | LineKind::Status => MUTED,
        LineKind::Incoming => INCOMING,
        LineKind::Error => Color::Red,
    };
    Style::new().fg(fg)
}

pub fn draw(f: &mut Frame, session: &Session) {
    let loading = session.loading_text();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),                                  // Title
            Constraint::Min(3),                                     // Transcript
            Constraint::Length(u16::from(loading.is_some())),       // Loading
            Constraint::Length(3),                                  // Input
            Constraint::Length(1),                                  // Help
        ])
        .split(f.area());

    let title = Paragraph::new(Span::styled(
        "CICY - MCP Message System",
        Style::new().fg(TITLE).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center);
    f.render_widget(title, chunks[0]);

    draw_transcript(f, session, chunks[1]);

    if let Some(loading) = loading {
        f.render_widget(
            Paragraph::new(Span::styled(loading, Style::new().fg(MUTED))),
            chunks[2],
        );
    }

    let input = Paragraph::new(format!("{} {}█", session.prompt(), session.input()))
        .style(Style::new().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(input, chunks[3]);

    let help = Paragraph::new(Span::styled(
        format!("  {}", session.help_text()),
        Style::new().fg(MUTED),
    ));
    f.render_widget(help, chunks[4]);

    if let Mode::HostSelect { hosts, cursor } = session.mode() {
        draw_host_select(f, hosts, *cursor);
    }
}

fn draw_transcript(f: &mut Frame, session: &Session, area: Rect) {
    let lines: Vec<Line> = session
        .transcript()
        .iter()
        .map(|line| {
            let rendered = Line::styled(line.text.as_str(), line_style(line.kind));
            if line.kind == LineKind::Banner {
                rendered.alignment(Alignment::Center)
            } else {
                rendered
            }
        })
        .collect();

    // Keep the newest lines in view.
    let visible = usize::from(area.height.saturating_sub(2));
    let scroll = u16::try_from(lines.len().saturating_sub(visible)).unwrap_or(u16::MAX);

    let transcript = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL))
        .scroll((scroll, 0));
    f.render_widget(transcript, area);
}

fn draw_host_select(f: &mut Frame, hosts: &[String], cursor: usize) {
    let items: Vec<ListItem> = hosts
        .iter()
        .enumerate()
        .map(|(i, host)| {
            if i == cursor {
                ListItem::new(format!("▶ {host}"))
                    .style(Style::new().fg(Color::Black).bg(TITLE).add_modifier(Modifier::BOLD))
            } else {
                ListItem::new(format!("  {host}"))
            }
        })
        .collect();

    let height = u16::try_from(hosts.len()).unwrap_or(u16::MAX).saturating_add(2);
    let area = centered(f.area(), 40, height);
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Select SSH host ")
            .title_bottom(" ↑/↓: select | Enter: confirm | ESC: cancel ")
            .border_style(Style::new().fg(TITLE)),
    );
    f.render_widget(Clear, area);
    f.render_widget(list, area);
}

fn centered(outer: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(outer.width);
    let height = height.min(outer.height);
    Rect {
        x: outer.x + (outer.width - width) / 2,
        y: outer.y + (outer.height - height) / 2,
        width,
        height,
    }
}
