use chrono::NaiveDateTime;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::widgets::block::{Position, Title};
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};

use crate::app::{App, Focus};
use crate::model::{GoalTable, LiveText, Match, MatchStats, Period, PlayerStatRow, TeamInfo, TeamStat};
use crate::panels::{CategoryPanel, SCHEDULE_ROW_HEIGHT, SchedulePanel, StatsPanel, TextLivePanel};
use crate::state::{ListSelection, Selectable, Status};
use crate::theme;

pub const CATEGORY_WIDTH: u16 = 16;
pub const SCHEDULE_WIDTH: u16 = 32;
pub const TEXT_LIVE_WIDTH: u16 = 48;
const BORDER_SIZE: u16 = 2;
const FOOTER_HEIGHT: u16 = 1;
const PLAYER_COLUMN_MAX: usize = 14;
const GOAL_CELL_WIDTH: usize = 6;

pub fn ui(frame: &mut Frame, app: &App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(FOOTER_HEIGHT)])
        .split(frame.size());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(CATEGORY_WIDTH + BORDER_SIZE),
            Constraint::Length(SCHEDULE_WIDTH + BORDER_SIZE),
            Constraint::Min(BORDER_SIZE + 1),
            Constraint::Length(TEXT_LIVE_WIDTH + BORDER_SIZE),
        ])
        .split(rows[0]);

    let spin = theme::spinner_frame(app.spinner());
    render_category_panel(
        frame,
        columns[0],
        &app.categories,
        app.is_focused(Focus::Categories),
        spin,
    );
    render_schedule_panel(
        frame,
        columns[1],
        &app.schedule,
        app.is_focused(Focus::Schedule),
        spin,
    );
    render_stats_panel(
        frame,
        columns[2],
        &app.stats,
        app.is_focused(Focus::Stats),
        spin,
    );
    render_text_live_panel(frame, columns[3], &app.text_live, spin);

    let footer = Paragraph::new(footer_line(app));
    frame.render_widget(footer, rows[1]);
}

/// Rows available inside a bordered panel for a terminal of `height` rows.
pub fn panel_inner_height(height: u16) -> u16 {
    height.saturating_sub(BORDER_SIZE + FOOTER_HEIGHT)
}

/// Inner `(width, height)` of the stats panel for a terminal `size`.
pub fn stats_viewport(size: (u16, u16)) -> (usize, usize) {
    let fixed = CATEGORY_WIDTH + SCHEDULE_WIDTH + TEXT_LIVE_WIDTH + 4 * BORDER_SIZE;
    let width = size.0.saturating_sub(fixed);
    (usize::from(width), usize::from(panel_inner_height(size.1)))
}

fn panel_block(focused: bool) -> Block<'static> {
    let (kind, style) = theme::border(focused);
    Block::default()
        .borders(Borders::ALL)
        .border_type(kind)
        .border_style(style)
}

/// Placeholder text for every state except a non-empty Success.
pub fn status_text(status: Status, error: Option<&str>, spin: &str) -> Option<String> {
    match status {
        Status::Initial => Some(String::new()),
        Status::Loading => Some(format!("{spin} Loading...")),
        Status::Failed => Some(format!("Load failed: {}", error.unwrap_or("unknown error"))),
        Status::Success => None,
    }
}

fn render_placeholder(frame: &mut Frame, area: Rect, block: Block<'static>, text: String) {
    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn list_placeholder<T: Selectable>(list: &ListSelection<T>, spin: &str) -> Option<String> {
    let state = list.state();
    if let Some(text) = status_text(state.status(), state.error(), spin) {
        return Some(text);
    }
    if list.items().is_empty() {
        return Some("No data".to_string());
    }
    None
}

fn position_title<T: Selectable>(list: &ListSelection<T>) -> Title<'static> {
    let indicator = format!("|{}/{}|", list.selected_index() + 1, list.items().len());
    Title::from(indicator)
        .position(Position::Bottom)
        .alignment(Alignment::Right)
}

pub fn render_category_panel(
    frame: &mut Frame,
    area: Rect,
    panel: &CategoryPanel,
    focused: bool,
    spin: &str,
) {
    let block = panel_block(focused);
    let list = panel.list();
    if let Some(text) = list_placeholder(list, spin) {
        render_placeholder(frame, area, block, text);
        return;
    }
    let inner = block.inner(area);
    let lines = category_lines(panel, usize::from(inner.width), usize::from(inner.height));
    let block = block.title(position_title(list));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn category_lines(panel: &CategoryPanel, width: usize, height: usize) -> Vec<Line<'static>> {
    let list = panel.list();
    let items = list.items();
    let (start, end) = visible_range(list.selected_index(), items.len(), height.max(1));
    (start..end)
        .map(|idx| {
            let name = &items[idx].name;
            if idx == list.selected_index() {
                Line::styled(truncate(&format!("> {name}"), width), theme::highlight())
            } else {
                Line::raw(truncate(&format!("  {name}"), width))
            }
        })
        .collect()
}

pub fn render_schedule_panel(
    frame: &mut Frame,
    area: Rect,
    panel: &SchedulePanel,
    focused: bool,
    spin: &str,
) {
    let block = panel_block(focused);
    let list = panel.list();
    if let Some(text) = list_placeholder(list, spin) {
        render_placeholder(frame, area, block, text);
        return;
    }
    let inner = block.inner(area);
    let lines = schedule_lines(panel, usize::from(inner.width), usize::from(inner.height));
    let block = block.title(position_title(list));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

pub fn schedule_lines(panel: &SchedulePanel, width: usize, height: usize) -> Vec<Line<'static>> {
    let list = panel.list();
    let items = list.items();
    let visible = (height / SCHEDULE_ROW_HEIGHT).max(1);
    let (start, end) = visible_range(list.selected_index(), items.len(), visible);

    let mut lines = Vec::new();
    for idx in start..end {
        let row = schedule_row(&items[idx], width);
        let style = if idx == list.selected_index() {
            theme::highlight()
        } else {
            Style::default()
        };
        for text in row {
            lines.push(Line::styled(text, style).alignment(Alignment::Center));
        }
        lines.push(Line::styled("─".repeat(width), theme::muted()));
    }
    lines
}

/// Title, teams with score, and period for one schedule entry.
pub fn schedule_row(m: &Match, width: usize) -> [String; 3] {
    let inner = width.saturating_sub(2);
    let when = NaiveDateTime::parse_from_str(m.start_time.trim(), "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.format("%m-%d %H:%M").to_string())
        .unwrap_or_default();
    let title = truncate(format!("{when} {}", m.description).trim(), inner);

    let teams = if m.right_team.is_empty() {
        truncate(&m.left_team, inner)
    } else {
        let score = format!("{} - {}", m.left_score, m.right_score);
        let name_width = inner.saturating_sub(2 + score.chars().count()) / 2;
        format!(
            "{} {score} {}",
            centered(&truncate(&m.left_team, name_width), name_width),
            centered(&truncate(&m.right_team, name_width), name_width),
        )
    };

    let period = match m.period {
        Period::Coming => "Not started".to_string(),
        Period::InProgress => format!("{} {}", m.quarter_label, m.quarter_time)
            .trim()
            .to_string(),
        Period::Ended => "Finished".to_string(),
    };

    [title, teams, period]
}

pub fn render_text_live_panel(frame: &mut Frame, area: Rect, panel: &TextLivePanel, spin: &str) {
    let block = Block::default().padding(Padding::uniform(1));
    let state = panel.state();
    let placeholder = status_text(state.status(), state.error(), spin).or_else(|| {
        state
            .payload()
            .filter(|live| live.entries.is_empty())
            .map(|_| "No data".to_string())
    });
    if let Some(text) = placeholder {
        render_placeholder(frame, area, block, text);
        return;
    }
    let lines = state.payload().map(text_live_lines).unwrap_or_default();
    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

pub fn text_live_lines(live: &LiveText) -> Vec<Line<'static>> {
    let Some(first) = live.entries.first() else {
        return Vec::new();
    };
    let mut banner = format!("{} - {}", first.left_goal, first.right_goal);
    match first.quarter.trim() {
        "" => {}
        q if q.parse::<u32>().is_ok() => banner = format!("Q{q} {banner}"),
        q => banner = format!("{q} {banner}"),
    }

    let mut lines = vec![
        Line::from(Span::styled(format!(" {banner} "), theme::banner())),
        Line::raw(""),
    ];
    for entry in &live.entries {
        let content = if entry.time.is_empty() {
            entry.content.clone()
        } else {
            format!("{} {}", entry.time, entry.content)
        };
        let mut spans = vec![Span::raw(content.clone())];
        if !entry.plus.is_empty() {
            spans.push(Span::raw(" "));
            spans.push(Span::styled(
                format!("{}({}-{})", entry.plus, entry.left_goal, entry.right_goal),
                theme::highlight(),
            ));
        } else if content.trim().is_empty() {
            continue;
        }
        lines.push(Line::from(spans));
    }
    lines
}

pub fn render_stats_panel(
    frame: &mut Frame,
    area: Rect,
    panel: &StatsPanel,
    focused: bool,
    spin: &str,
) {
    let block = panel_block(focused);
    let state = panel.state();
    let placeholder = status_text(state.status(), state.error(), spin).or_else(|| {
        state
            .payload()
            .filter(|stats| stats.is_empty())
            .map(|_| "No data".to_string())
    });
    if let Some(text) = placeholder {
        render_placeholder(frame, area, block, text);
        return;
    }
    let inner = block.inner(area);
    let lines = stats_lines(panel, usize::from(inner.width));
    let max_scroll = lines.len().saturating_sub(usize::from(inner.height));
    let scroll = panel
        .scroll()
        .min(u16::try_from(max_scroll).unwrap_or(u16::MAX));
    let paragraph = Paragraph::new(lines).block(block).scroll((scroll, 0));
    frame.render_widget(paragraph, area);
}

pub fn stats_lines(panel: &StatsPanel, width: usize) -> Vec<Line<'static>> {
    let Some(stats) = panel.state().payload() else {
        return Vec::new();
    };
    match_stats_lines(stats, width)
}

pub fn match_stats_lines(stats: &MatchStats, width: usize) -> Vec<Line<'static>> {
    let Some(teams) = stats.teams.as_ref() else {
        return Vec::new();
    };
    let mut lines = Vec::new();
    if let Some(goals) = stats.goals.as_ref() {
        lines.extend(goal_lines(goals, teams));
        lines.push(Line::raw(""));
    }
    if !stats.team_stats.is_empty() {
        lines.extend(team_stat_lines(&stats.team_stats, teams, width));
        lines.push(Line::raw(""));
    }
    for (idx, block) in stats.player_stats.iter().enumerate() {
        let title = match idx {
            0 => Some(teams.left_name.as_str()),
            1 => Some(teams.right_name.as_str()),
            _ => None,
        };
        lines.extend(player_lines(block, title));
        lines.push(Line::raw(""));
    }
    lines
}

fn goal_lines(goals: &GoalTable, teams: &TeamInfo) -> Vec<Line<'static>> {
    let name_width = teams.name_width();
    let mut header = pad_right("", name_width);
    for cell in &goals.head {
        header.push(' ');
        header.push_str(&centered(cell, GOAL_CELL_WIDTH));
    }
    let mut lines = vec![Line::styled(header, theme::muted()).alignment(Alignment::Center)];
    for (name, row) in [&teams.left_name, &teams.right_name]
        .into_iter()
        .zip(goals.rows.iter())
    {
        let mut text = pad_right(name, name_width);
        for cell in row {
            text.push(' ');
            text.push_str(&centered(cell, GOAL_CELL_WIDTH));
        }
        lines.push(Line::raw(text).alignment(Alignment::Center));
    }
    lines
}

fn team_stat_lines(rows: &[TeamStat], teams: &TeamInfo, width: usize) -> Vec<Line<'static>> {
    let text_width = rows.iter().map(|r| r.text.chars().count()).max().unwrap_or(0);
    let value_width = rows
        .iter()
        .map(|r| r.left.chars().count().max(r.right.chars().count()))
        .max()
        .unwrap_or(0);
    let usable = width.saturating_sub(6);
    let bar_width = usable.saturating_sub(value_width * 2 + text_width) / 2;
    if bar_width == 0 {
        return Vec::new();
    }

    let mut lines = vec![
        Line::raw(format!(
            "{}{}{}",
            teams.left_name,
            centered("vs", text_width),
            teams.right_name
        ))
        .alignment(Alignment::Center),
    ];
    for row in rows {
        let (left_share, right_share) = row.shares();
        let bar_len = |share: f64| ((share * bar_width as f64) as usize).max(1);
        let left_bar = "━".repeat(bar_len(left_share));
        let right_bar = "━".repeat(bar_len(right_share));
        let (left_style, right_style) = if left_share > right_share {
            (theme::highlight(), Style::default())
        } else if right_share > left_share {
            (Style::default(), theme::highlight())
        } else {
            (Style::default(), Style::default())
        };
        lines.push(Line::from(vec![
            Span::raw(format!(" {} ", pad_right(&row.left, value_width))),
            Span::styled(pad_left(&left_bar, bar_width), left_style),
            Span::raw(format!(" {} ", centered(&row.text, text_width))),
            Span::styled(pad_right(&right_bar, bar_width), right_style),
            Span::raw(format!(" {} ", pad_left(&row.right, value_width))),
        ]));
    }
    lines
}

fn player_lines(block: &[PlayerStatRow], title: Option<&str>) -> Vec<Line<'static>> {
    let mut widths: Vec<usize> = Vec::new();
    for row in block {
        for (k, cell) in row.head.iter().chain(row.row.iter()).enumerate() {
            let k = if k >= row.head.len() { k - row.head.len() } else { k };
            let w = cell.chars().count();
            if k >= widths.len() {
                widths.resize(k + 1, 0);
            }
            widths[k] = widths[k].max(w).min(PLAYER_COLUMN_MAX);
        }
    }

    let format_row = |cells: &[String]| -> String {
        cells
            .iter()
            .enumerate()
            .map(|(k, cell)| {
                let w = widths.get(k).copied().unwrap_or(PLAYER_COLUMN_MAX);
                pad_right(&truncate(cell, w), w)
            })
            .collect::<Vec<_>>()
            .join("  ")
    };

    let mut lines = Vec::new();
    for row in block {
        if !row.head.is_empty() {
            let mut head = row.head.clone();
            if let (Some(first), Some(title)) = (head.first_mut(), title) {
                *first = title.to_string();
            }
            lines.push(Line::styled(
                format_row(&head),
                Style::default().add_modifier(Modifier::BOLD),
            ));
        }
        if !row.row.is_empty() && !row.is_unused_player() {
            lines.push(Line::raw(format_row(&row.row)));
        }
    }
    lines
}

fn footer_line(app: &App) -> Line<'static> {
    let hints = "Tab/Shift-Tab Focus | j/k/↑/↓ Move | PgUp/PgDn Page | r Reload | q Quit";
    let mut spans = vec![Span::styled(hints.to_string(), theme::muted())];
    if let Some(last) = app.logs().back() {
        spans.push(Span::raw("  "));
        spans.push(Span::raw(last.clone()));
    }
    Line::from(spans)
}

pub fn visible_range(selected: usize, total: usize, visible: usize) -> (usize, usize) {
    if total == 0 {
        return (0, 0);
    }
    if total <= visible {
        return (0, total);
    }

    let mut start = selected.saturating_sub(visible / 2);
    if start + visible > total {
        start = total - visible;
    }
    (start, start + visible)
}

pub fn truncate(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count <= width {
        return text.to_string();
    }
    if width <= 3 {
        return text.chars().take(width).collect();
    }
    let mut out: String = text.chars().take(width - 3).collect();
    out.push_str("...");
    out
}

fn pad_right(text: &str, width: usize) -> String {
    format!("{text:<width$}")
}

fn pad_left(text: &str, width: usize) -> String {
    format!("{text:>width$}")
}

fn centered(text: &str, width: usize) -> String {
    format!("{text:^width$}")
}
