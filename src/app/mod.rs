use anyhow::Result;
use chrono::{Local, NaiveDate};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tokio::sync::watch;

use crate::{
    calendar::Week,
    config::AppConfig,
    tasks::{FilteredView, TaskStore},
    theme::ThemeConfig,
    ui::draw,
};

// ─── App state ────────────────────────────────────────────────────────────────

pub struct App {
    pub store:       TaskStore,
    pub week:        Week,
    pub theme:       ThemeConfig,
    pub theme_idx:   usize,
    pub task_cursor: usize,
    pub show_help:   bool,
    pub status:      String,
    pub running:     bool,
    view_rx:         watch::Receiver<FilteredView>,
}

impl App {
    /// Builds the screen state: the current week plus freshly generated
    /// sample tasks, with today selected.
    pub fn new(cfg: &AppConfig, theme: ThemeConfig) -> Self {
        let today = Local::now().date_naive();
        let week  = Week::containing(today, cfg.week_start());
        let mut store = TaskStore::new(today);
        store.generate_sample_tasks(cfg.sample_task_count());
        Self::with_parts(store, week, theme)
    }

    pub fn with_parts(store: TaskStore, week: Week, theme: ThemeConfig) -> Self {
        let idx     = ThemeConfig::all_themes().iter().position(|t| t.name == theme.name).unwrap_or(0);
        let view_rx = store.subscribe();
        Self {
            store, week, theme,
            theme_idx:   idx,
            task_cursor: 0,
            show_help:   false,
            status:      String::new(),
            running:     true,
            view_rx,
        }
    }

    // ── TUI loop ──────────────────────────────────────────────────────────────

    pub async fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend  = CrosstermBackend::new(stdout);
        let mut term = Terminal::new(backend)?;

        let result = self.event_loop(&mut term).await;

        disable_raw_mode()?;
        execute!(term.backend_mut(), LeaveAlternateScreen)?;
        term.show_cursor()?;
        result
    }

    async fn event_loop(
        &mut self,
        term: &mut Terminal<CrosstermBackend<io::Stdout>>,
    ) -> Result<()> {
        let tick = std::time::Duration::from_millis(50);
        while self.running {
            self.poll_view();
            term.draw(|f| draw(f, self))?;

            if event::poll(tick)? {
                if let Event::Key(key) = event::read()? {
                    self.on_key(key);
                }
            }
            // Give filter workers a chance to publish between frames.
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    /// Picks up a newly published view; returns true when one arrived.
    pub fn poll_view(&mut self) -> bool {
        if !self.view_rx.has_changed().unwrap_or(false) { return false; }
        let len = self.view_rx.borrow_and_update().as_ref().map_or(0, Vec::len);
        self.task_cursor = self.task_cursor.min(len.saturating_sub(1));
        tracing::debug!("View refreshed: {len} task(s) on {}", self.store.selected_day());
        true
    }

    pub fn view(&self) -> FilteredView { self.store.filtered() }

    // ── Input ─────────────────────────────────────────────────────────────────

    pub fn on_key(&mut self, key: KeyEvent) {
        if self.show_help {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                self.show_help = false;
            }
            return;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
                self.running = false;
            }
            (KeyCode::Char('?'), _) => self.show_help = true,
            (KeyCode::Right | KeyCode::Char('l'), _) => self.shift_day(1),
            (KeyCode::Left  | KeyCode::Char('h'), _) => self.shift_day(-1),
            (KeyCode::Char('t'), _) => self.select(Local::now().date_naive()),
            (KeyCode::Down | KeyCode::Char('j'), _) => {
                let len = self.view().map_or(0, |v| v.len());
                if self.task_cursor + 1 < len { self.task_cursor += 1; }
            }
            (KeyCode::Up | KeyCode::Char('k'), _) => {
                self.task_cursor = self.task_cursor.saturating_sub(1);
            }
            // Placeholder controls: the check mark and add-person buttons
            // exist on screen but change nothing.
            (KeyCode::Char(' '), _) => {
                tracing::debug!("check control pressed at cursor {}", self.task_cursor);
                self.status = "Completing tasks is not available".into();
            }
            (KeyCode::Char('p'), _) => {
                tracing::debug!("add-person control pressed");
                self.status = "Assigning people is not available".into();
            }
            (KeyCode::Char('T'), _) => {
                let themes = ThemeConfig::all_themes();
                self.theme_idx = (self.theme_idx + 1) % themes.len();
                self.theme     = themes[self.theme_idx].clone();
                if let Err(e) = self.theme.save() {
                    tracing::warn!("failed to save theme: {e}");
                }
            }
            _ => {}
        }
    }

    // ── Helpers ───────────────────────────────────────────────────────────────

    /// Moves the selection along the week strip, clamped at both ends.
    fn shift_day(&mut self, delta: i64) {
        let next = match self.week.position(self.store.selected_day()) {
            Some(i)           => (i as i64 + delta).clamp(0, 6) as usize,
            None if delta > 0 => 0,
            None              => 6,
        };
        self.select(self.week.days()[next]);
    }

    fn select(&mut self, day: NaiveDate) {
        if day == self.store.selected_day() && self.store.filtered().is_some() { return; }
        tracing::info!("Selected {day}");
        self.status.clear();
        self.task_cursor = 0;
        self.store.select_day(day);
    }
}
