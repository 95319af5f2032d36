mod app;
mod calendar;
mod config;
mod tasks;
mod theme;
mod ui;

use anyhow::{anyhow, Result};
use app::App;
use calendar::{current_week_dates, format_day, is_current_hour, is_today, DayPattern};
use chrono::{Local, NaiveDate};
use config::AppConfig;
use tasks::TaskStore;
use theme::ThemeConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();

    // ── nt week ───────────────────────────────────────────────────────────────
    if args.get(1).map(|s| s.as_str()) == Some("week") {
        return cmd_week();
    }

    // ── nt list [YYYY-MM-DD] [--json] ─────────────────────────────────────────
    if args.get(1).map(|s| s.as_str()) == Some("list") {
        return cmd_list(&args[2..]).await;
    }

    // ── nt (TUI) ──────────────────────────────────────────────────────────────
    run_tui().await
}

fn init_stderr_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

// ─── Week command ─────────────────────────────────────────────────────────────

fn cmd_week() -> Result<()> {
    init_stderr_logging();
    let cfg  = AppConfig::load()?;
    tracing::debug!("Week start: {:?}", cfg.week_start());

    for day in &current_week_dates(cfg.week_start()) {
        let mark = if is_today(*day) { "  ← today" } else { "" };
        println!(
            "{} {}  {day}{mark}",
            format_day(*day, DayPattern::WeekdayShort),
            format_day(*day, DayPattern::DayOfMonth),
        );
    }
    Ok(())
}

// ─── List command ─────────────────────────────────────────────────────────────

async fn cmd_list(rest: &[String]) -> Result<()> {
    init_stderr_logging();
    let cfg  = AppConfig::load()?;
    let json = rest.iter().any(|a| a == "--json");
    let day  = match rest.iter().find(|a| !a.starts_with("--")) {
        Some(s) => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .map_err(|e| anyhow!("invalid date {s:?} (expected YYYY-MM-DD): {e}"))?,
        None    => Local::now().date_naive(),
    };

    let mut store = TaskStore::new(day);
    store.generate_sample_tasks(cfg.sample_task_count());
    let view = store.wait_filtered().await.unwrap_or_default();

    if json {
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    if view.is_empty() {
        println!("No tasks found!!!");
        return Ok(());
    }
    for task in &view {
        let now = if is_current_hour(task.due_at) { " *" } else { "" };
        println!("{}{now}  {}  {}", task.due_at.format("%H:%M"), task.title, task.description);
    }
    Ok(())
}

// ─── TUI ─────────────────────────────────────────────────────────────────────

async fn run_tui() -> Result<()> {
    let log_dir = dirs::data_dir()
        .unwrap_or_else(|| std::path::PathBuf::from("."))
        .join("notorious");
    std::fs::create_dir_all(&log_dir)?;
    let file_appender = tracing_appender::rolling::daily(&log_dir, "notorious.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(non_blocking))
        .init();

    tracing::info!("Starting Notorious");

    let cfg = AppConfig::load().unwrap_or_else(|e| {
        tracing::warn!("Falling back to default config: {e}");
        AppConfig::default()
    });
    let theme = ThemeConfig::load(cfg.theme.as_deref())?;

    let mut app = App::new(&cfg, theme);
    app.run().await?;
    Ok(())
}
