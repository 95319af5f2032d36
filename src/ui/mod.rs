use chrono::Local;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{block::Title, Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::app::App;
use crate::calendar::{format_day, is_current_hour, is_today, DayPattern};
use crate::tasks::Task;

// ─── Root draw ────────────────────────────────────────────────────────────────

pub fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    f.render_widget(
        Block::default().style(Style::default().bg(app.theme.bg()).fg(app.theme.fg())),
        area,
    );

    // Layout: [ header(3) | week(5) | tasks | status_bar(1) ]
    let rows = Layout::default().direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(0),
            Constraint::Length(1),
        ]).split(area);

    draw_header(f, app, rows[0]);
    draw_week(f, app, rows[1]);
    draw_tasks(f, app, rows[2]);
    draw_statusbar(f, app, rows[3]);

    if app.show_help { draw_help(f, area, app); }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header(f: &mut Frame, app: &App, area: Rect) {
    let t    = &app.theme;
    let cols = Layout::default().direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(12)]).split(area);

    let lines = vec![
        Line::from(Span::styled(
            format!(" {}", Local::now().format("%b %-d, %Y")),
            Style::default().fg(t.fg_dim()),
        )),
        Line::from(Span::styled(
            " Current Day",
            Style::default().fg(t.fg()).add_modifier(Modifier::BOLD),
        )),
    ];
    f.render_widget(Paragraph::new(lines), cols[0]);

    // Inert add-person control
    f.render_widget(
        Paragraph::new(Line::from(Span::styled("[⊕ person] ", Style::default().fg(t.accent()))))
            .alignment(Alignment::Right),
        cols[1],
    );
}

// ─── Week strip ───────────────────────────────────────────────────────────────

fn draw_week(f: &mut Frame, app: &App, area: Rect) {
    let t     = &app.theme;
    let chips = Layout::default().direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 7); 7]).split(area);

    for (day, rect) in app.week.days().iter().zip(chips.iter()) {
        let selected = app.store.is_selected_day(*day);
        let (bg, fg) = if selected { t.chip_highlight() } else { (t.bg(), t.fg()) };
        let base     = Style::default().bg(bg).fg(fg);
        let marker   = if is_today(*day) { "•" } else { " " };

        let lines = vec![
            Line::from(Span::styled(
                format_day(*day, DayPattern::DayOfMonth),
                base.add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(format_day(*day, DayPattern::WeekdayShort), base)),
            Line::from(Span::styled(marker, base.fg(if selected { fg } else { t.today() }))),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(if selected { t.border_active() } else { t.border() }))
            .style(Style::default().bg(bg));

        f.render_widget(Paragraph::new(lines).block(block).alignment(Alignment::Center), *rect);
    }
}

// ─── Tasks panel ──────────────────────────────────────────────────────────────

fn draw_tasks(f: &mut Frame, app: &App, area: Rect) {
    let t     = &app.theme;
    let title = Line::from(Span::styled(
        format!(" Tasks — {} ", app.store.selected_day().format("%A, %B %-d")),
        Style::default().fg(t.accent()),
    ));

    let block = Block::default()
        .title(Title::from(title))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(t.border()))
        .style(Style::default().bg(t.bg()));

    let view = match app.view() {
        None => {
            f.render_widget(
                Paragraph::new("  Loading…").block(block).style(Style::default().fg(t.fg_dim())),
                area,
            );
            return;
        }
        Some(v) if v.is_empty() => {
            f.render_widget(
                Paragraph::new("  No tasks found!!!").block(block).style(Style::default().fg(t.fg_dim())),
                area,
            );
            return;
        }
        Some(v) => v,
    };

    let items: Vec<ListItem> = view.iter().map(|task| task_item(app, task)).collect();

    let mut state = ListState::default();
    state.select(Some(app.task_cursor));
    f.render_stateful_widget(List::new(items).block(block).highlight_symbol("▶ "), area, &mut state);
}

fn task_item<'a>(app: &App, task: &'a Task) -> ListItem<'a> {
    let t    = &app.theme;
    let time = task.due_at.format("%H:%M").to_string();

    if is_current_hour(task.due_at) {
        let (bg, fg) = t.card_highlight();
        let card     = Style::default().bg(bg).fg(fg);
        return ListItem::new(vec![
            Line::from(vec![
                Span::styled(format!(" {time} "), Style::default().fg(t.accent())),
                Span::styled(" ● ", card),
                Span::styled(format!("{} ", task.title), card.add_modifier(Modifier::BOLD)),
            ]),
            Line::from(vec![
                Span::raw("        "),
                Span::styled(format!(" {} ", task.description), card),
            ]),
            Line::from(vec![
                Span::raw("        "),
                Span::styled(" [⊕] [✓] ", card.add_modifier(Modifier::DIM)),
            ]),
        ]);
    }

    ListItem::new(vec![
        Line::from(vec![
            Span::styled(format!(" {time} "), Style::default().fg(t.fg_dim())),
            Span::styled(" ○ ", Style::default().fg(t.fg_dim())),
            Span::styled(task.title.as_str(), Style::default().fg(t.fg()).add_modifier(Modifier::BOLD)),
        ]),
        Line::from(vec![
            Span::raw("        "),
            Span::styled(format!(" {}", task.description), Style::default().fg(t.fg_dim())),
        ]),
    ])
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_statusbar(f: &mut Frame, app: &App, area: Rect) {
    let t   = &app.theme;
    let bar = Paragraph::new(Line::from(vec![
        Span::styled(" TODAY ", Style::default().bg(t.accent()).fg(t.bg()).add_modifier(Modifier::BOLD)),
        Span::styled(
            "  h/l:day  j/k:task  t:today  T:theme  ?:help  q:quit",
            Style::default().fg(t.fg_dim()),
        ),
        Span::styled(
            format!("  {}", app.status),
            Style::default().fg(t.fg_dim()).add_modifier(Modifier::ITALIC),
        ),
    ])).style(Style::default().bg(t.bg2()));
    f.render_widget(bar, area);
}

// ─── Help overlay ────────────────────────────────────────────────────────────

fn draw_help(f: &mut Frame, area: Rect, app: &App) {
    let t    = &app.theme;
    let rect = centered(60, 60, area);
    f.render_widget(Clear, rect);

    let title = Line::from(Span::styled(
        " Keyboard Shortcuts ",
        Style::default().fg(t.accent()).add_modifier(Modifier::BOLD),
    ));
    let block = Block::default()
        .title(Title::from(title))
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(t.border_active()))
        .style(Style::default().bg(t.popup_bg()));

    let accent = Style::default().fg(t.accent()).add_modifier(Modifier::BOLD);
    let dim    = Style::default().fg(t.fg_dim());
    let lines  = vec![
        Line::from(""),
        Line::from(Span::styled("  Week", accent)),
        Line::from(Span::styled("  h/l  ←→      Previous / next day", dim)),
        Line::from(Span::styled("  t            Jump to today", dim)),
        Line::from(""),
        Line::from(Span::styled("  Tasks", accent)),
        Line::from(Span::styled("  j/k  ↓↑      Move cursor", dim)),
        Line::from(Span::styled("  Space        Check (not available)", dim)),
        Line::from(Span::styled("  p            Add person (not available)", dim)),
        Line::from(""),
        Line::from(Span::styled("  General", accent)),
        Line::from(Span::styled("  T            Cycle theme", dim)),
        Line::from(Span::styled("  ? / Esc      Close help", dim)),
        Line::from(Span::styled("  q            Quit", dim)),
    ];

    f.render_widget(
        Paragraph::new(lines).block(block).style(Style::default().fg(t.fg()))
            .wrap(Wrap { trim: false }),
        rect,
    );
}

// ─── Utilities ────────────────────────────────────────────────────────────────

fn centered(pct_x: u16, pct_y: u16, r: Rect) -> Rect {
    let vert = Layout::default().direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - pct_y) / 2),
            Constraint::Percentage(pct_y),
            Constraint::Percentage((100 - pct_y) / 2),
        ]).split(r);
    Layout::default().direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - pct_x) / 2),
            Constraint::Percentage(pct_x),
            Constraint::Percentage((100 - pct_x) / 2),
        ]).split(vert[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::{at_local, Week};
    use crate::tasks::TaskStore;
    use crate::theme::ThemeConfig;
    use chrono::{NaiveDate, NaiveTime, Weekday};
    use ratatui::{backend::TestBackend, Terminal};

    fn render(app: &App) -> String {
        let mut term = Terminal::new(TestBackend::new(80, 30)).unwrap();
        term.draw(|f| draw(f, app)).unwrap();
        term.backend().buffer().content.iter().map(|c| c.symbol()).collect()
    }

    fn week() -> Week { Week::containing(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap(), Weekday::Sun) }

    #[tokio::test]
    async fn shows_loading_before_the_first_pass() {
        let store = TaskStore::new(NaiveDate::from_ymd_opt(2026, 10, 14).unwrap());
        let app   = App::with_parts(store, week(), ThemeConfig::default());
        let out   = render(&app);
        assert!(out.contains("Loading"));
        assert!(out.contains("Wed"));
        assert!(out.contains("14"));
    }

    #[tokio::test]
    async fn shows_empty_state_and_task_titles() {
        let day       = NaiveDate::from_ymd_opt(2026, 10, 14).unwrap();
        let mut store = TaskStore::new(day);
        store.filter_current_day_tasks();
        store.wait_filtered().await;
        let app = App::with_parts(store, week(), ThemeConfig::default());
        assert!(render(&app).contains("No tasks found!!!"));

        let mut store = TaskStore::new(day);
        store.replace_tasks(vec![Task::new(
            "Buy groceries", "Remember to buy milk and bread.",
            at_local(day, NaiveTime::from_hms_opt(9, 30, 0).unwrap()),
        )]);
        store.wait_filtered().await;
        let app = App::with_parts(store, week(), ThemeConfig::default());
        let out = render(&app);
        assert!(out.contains("Buy groceries"));
        assert!(out.contains("09:30"));
    }
}
