//! Task model, sample data and the day-filtered task store.

use chrono::{DateTime, Local, NaiveDate};
use rand::{seq::SliceRandom, Rng};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::calendar::{end_of_day, start_of_day};

// ─── Domain model ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id:          String,
    pub title:       String,
    pub description: String,
    pub due_at:      DateTime<Local>,
}

impl Task {
    pub fn new(title: &str, description: &str, due_at: DateTime<Local>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.to_owned(),
            description: description.to_owned(),
            due_at,
        }
    }
}

/// `None` until the first filter pass lands; `Some(vec![])` means no tasks.
pub type FilteredView = Option<Vec<Task>>;

// ─── Sample data ──────────────────────────────────────────────────────────────

pub const DEFAULT_SAMPLE_COUNT: usize = 10;

pub const SAMPLE_TITLES: &[&str] = &[
    "Buy groceries", "Clean the house", "Finish the project", "Call a friend", "Go for a run",
];

pub const SAMPLE_DESCRIPTIONS: &[&str] = &[
    "Remember to buy milk and bread.",
    "Clean the living room.",
    "Work on the presentation.",
    "Catch up with John.",
    "Run 5 miles.",
];

/// `n` tasks due at uniformly random whole seconds within `day`.
pub fn sample_tasks<R: Rng + ?Sized>(
    rng:          &mut R,
    n:            usize,
    day:          NaiveDate,
    titles:       &[&str],
    descriptions: &[&str],
) -> Vec<Task> {
    let lo = start_of_day(day).timestamp();
    let hi = end_of_day(day).timestamp();

    (0..n).map(|_| {
        let title       = titles.choose(rng).copied().unwrap_or_default();
        let description = descriptions.choose(rng).copied().unwrap_or_default();
        let secs        = rng.gen_range(lo..=hi);
        let due_at      = DateTime::from_timestamp(secs, 0)
            .map(|utc| utc.with_timezone(&Local))
            .unwrap_or_else(|| start_of_day(day));
        let task = Task::new(title, description, due_at);
        tracing::debug!("sample task {} due {}", task.id, task.due_at.format("%d-%m-%y %H:%M:%S"));
        task
    }).collect()
}

// ─── Filtering ────────────────────────────────────────────────────────────────

/// Tasks due on `day`, ascending by due time.
pub fn tasks_on(tasks: &[Task], day: NaiveDate) -> Vec<Task> {
    let mut out: Vec<Task> = tasks.iter()
        .filter(|t| t.due_at.date_naive() == day)
        .cloned()
        .collect();
    out.sort_by(|a, b| a.due_at.cmp(&b.due_at));
    out
}

// ─── Store ────────────────────────────────────────────────────────────────────

/// Owns the task collection and the selected day. Every mutation schedules
/// a filter pass on a tokio worker that publishes into a watch channel; only
/// the newest pass may publish. Must be used inside a tokio runtime.
pub struct TaskStore {
    tasks:        Arc<Vec<Task>>,
    selected_day: NaiveDate,
    view_tx:      Arc<watch::Sender<FilteredView>>,
    generation:   Arc<AtomicU64>,
    in_flight:    Option<JoinHandle<()>>,
}

impl TaskStore {
    pub fn new(today: NaiveDate) -> Self {
        let (view_tx, _) = watch::channel(None);
        Self {
            tasks:        Arc::new(Vec::new()),
            selected_day: today,
            view_tx:      Arc::new(view_tx),
            generation:   Arc::new(AtomicU64::new(0)),
            in_flight:    None,
        }
    }

    pub fn tasks(&self) -> &[Task] { &self.tasks }

    pub fn selected_day(&self) -> NaiveDate { self.selected_day }

    pub fn is_selected_day(&self, date: NaiveDate) -> bool {
        crate::calendar::is_selected_day(date, self.selected_day)
    }

    pub fn subscribe(&self) -> watch::Receiver<FilteredView> { self.view_tx.subscribe() }

    pub fn filtered(&self) -> FilteredView { self.view_tx.borrow().clone() }

    /// Replaces the collection with `n` random tasks due today.
    pub fn generate_sample_tasks(&mut self, n: usize) {
        let today = Local::now().date_naive();
        let tasks = sample_tasks(
            &mut rand::thread_rng(), n, today, SAMPLE_TITLES, SAMPLE_DESCRIPTIONS,
        );
        tracing::info!("Generated {} sample tasks for {today}", tasks.len());
        self.replace_tasks(tasks);
    }

    pub fn replace_tasks(&mut self, tasks: Vec<Task>) {
        self.tasks = Arc::new(tasks);
        self.filter_current_day_tasks();
    }

    pub fn select_day(&mut self, date: NaiveDate) {
        self.selected_day = date;
        self.filter_current_day_tasks();
    }

    /// Schedules a filter pass for the selected day, superseding any pass
    /// still running.
    pub fn filter_current_day_tasks(&mut self) {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(prev) = self.in_flight.take() { prev.abort(); }

        let tasks   = Arc::clone(&self.tasks);
        let day     = self.selected_day;
        let view_tx = Arc::clone(&self.view_tx);
        let current = Arc::clone(&self.generation);

        self.in_flight = Some(tokio::spawn(async move {
            let view = tasks_on(&tasks, day);
            let published = view_tx.send_if_modified(|slot| {
                if current.load(Ordering::SeqCst) != generation { return false; }
                *slot = Some(view);
                true
            });
            if published {
                tracing::debug!("Filtered view for {day} published (generation {generation})");
            } else {
                tracing::debug!("Dropped stale filter pass for {day} (generation {generation})");
            }
        }));
    }

    /// Waits for the latest scheduled filter pass and returns its view.
    pub async fn wait_filtered(&mut self) -> FilteredView {
        if let Some(handle) = self.in_flight.take() {
            if let Err(e) = handle.await {
                tracing::warn!("filter pass did not complete: {e}");
            }
        }
        self.filtered()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::at_local;
    use chrono::{Duration, NaiveTime};
    use rand::{rngs::StdRng, SeedableRng};

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn at(day: NaiveDate, h: u32, m: u32) -> DateTime<Local> {
        at_local(day, NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    fn titles(view: &[Task]) -> Vec<&str> {
        view.iter().map(|t| t.title.as_str()).collect()
    }

    #[test]
    fn sample_tasks_fall_within_the_day() {
        let mut rng = StdRng::seed_from_u64(7);
        let day     = d(2026, 10, 18);
        let tasks   = sample_tasks(&mut rng, 10, day, SAMPLE_TITLES, SAMPLE_DESCRIPTIONS);

        assert_eq!(tasks.len(), 10);
        for t in &tasks {
            assert!(t.due_at >= start_of_day(day) && t.due_at <= end_of_day(day));
            assert!(SAMPLE_TITLES.contains(&t.title.as_str()));
            assert!(SAMPLE_DESCRIPTIONS.contains(&t.description.as_str()));
        }
        let mut ids: Vec<&str> = tasks.iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }

    #[test]
    fn sample_tasks_with_empty_lists_use_empty_strings() {
        let mut rng = StdRng::seed_from_u64(1);
        let tasks   = sample_tasks(&mut rng, 3, d(2026, 10, 18), &[], &[]);
        assert_eq!(tasks.len(), 3);
        assert!(tasks.iter().all(|t| t.title.is_empty() && t.description.is_empty()));
    }

    #[test]
    fn tasks_on_matches_filter_then_sort() {
        let mut rng  = StdRng::seed_from_u64(42);
        let base     = d(2026, 10, 12);
        for _ in 0..200 {
            let n     = rng.gen_range(0..25);
            let tasks: Vec<Task> = (0..n).map(|i| {
                let day = base + Duration::days(rng.gen_range(0..5));
                let due = at(day, rng.gen_range(0..24), rng.gen_range(0..60));
                Task::new(&format!("t{i}"), "", due)
            }).collect();
            let day  = base + Duration::days(rng.gen_range(0..5));
            let view = tasks_on(&tasks, day);

            let expected = tasks.iter().filter(|t| t.due_at.date_naive() == day).count();
            assert_eq!(view.len(), expected);
            assert!(view.iter().all(|t| t.due_at.date_naive() == day));
            assert!(view.windows(2).all(|w| w[0].due_at <= w[1].due_at));
        }
    }

    #[tokio::test]
    async fn view_is_absent_before_the_first_pass() {
        let store = TaskStore::new(d(2026, 10, 18));
        assert_eq!(store.filtered(), None);
        assert_eq!(*store.subscribe().borrow(), None);
    }

    #[tokio::test]
    async fn empty_store_yields_an_empty_view() {
        let mut store = TaskStore::new(d(2026, 10, 18));
        store.filter_current_day_tasks();
        assert_eq!(store.wait_filtered().await, Some(vec![]));
    }

    #[tokio::test]
    async fn selecting_days_filters_and_sorts() {
        let today    = d(2026, 10, 18);
        let tomorrow = d(2026, 10, 19);
        let mut store = TaskStore::new(today);
        store.replace_tasks(vec![
            Task::new("late", "", at(today, 23, 0)),
            Task::new("next", "", at(tomorrow, 9, 0)),
            Task::new("early", "", at(today, 9, 0)),
        ]);

        store.select_day(today);
        let view = store.wait_filtered().await.unwrap();
        assert_eq!(titles(&view), ["early", "late"]);

        store.select_day(tomorrow);
        let view = store.wait_filtered().await.unwrap();
        assert_eq!(titles(&view), ["next"]);
        assert!(store.is_selected_day(tomorrow));
        assert!(!store.is_selected_day(today));
    }

    #[tokio::test]
    async fn selecting_the_same_day_twice_is_idempotent() {
        let today = d(2026, 10, 18);
        let mut store = TaskStore::new(today);
        store.replace_tasks(vec![
            Task::new("b", "", at(today, 11, 0)),
            Task::new("a", "", at(today, 8, 0)),
        ]);

        store.select_day(today);
        let once = store.wait_filtered().await;
        store.select_day(today);
        store.select_day(today);
        let twice = store.wait_filtered().await;
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn last_selection_wins() {
        let base = d(2026, 10, 12);
        let mut store = TaskStore::new(base);
        store.replace_tasks((0..7).map(|i| {
            Task::new(&format!("day{i}"), "", at(base + Duration::days(i), 10, 0))
        }).collect());

        for i in 0..7 {
            store.select_day(base + Duration::days(i));
        }
        store.select_day(base + Duration::days(3));
        let view = store.wait_filtered().await.unwrap();
        assert_eq!(titles(&view), ["day3"]);
    }

    #[tokio::test]
    async fn subscribers_see_published_views() {
        let today = d(2026, 10, 18);
        let mut store = TaskStore::new(today);
        let mut rx    = store.subscribe();
        store.replace_tasks(vec![Task::new("x", "", at(today, 12, 0))]);

        rx.changed().await.unwrap();
        let view = rx.borrow_and_update().clone().unwrap();
        assert_eq!(titles(&view), ["x"]);
    }

    #[tokio::test]
    async fn generated_sample_tasks_are_due_today() {
        let today = Local::now().date_naive();
        let mut store = TaskStore::new(today);
        store.generate_sample_tasks(DEFAULT_SAMPLE_COUNT);

        assert_eq!(store.tasks().len(), DEFAULT_SAMPLE_COUNT);
        for t in store.tasks() {
            assert!(t.due_at >= start_of_day(today) && t.due_at <= end_of_day(today));
        }
        let view = store.wait_filtered().await.unwrap();
        assert!(view.windows(2).all(|w| w[0].due_at <= w[1].due_at));
    }
}
