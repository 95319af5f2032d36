//! Week window and day/hour classification against the local calendar.

use chrono::{DateTime, Datelike, Duration, Local, NaiveDate, NaiveTime, TimeZone, Timelike, Weekday};

// ─── Local day boundaries ─────────────────────────────────────────────────────

/// Resolves a wall-clock time on `day` to a local instant. Falls back to the
/// earliest valid instant when the time lands in a DST gap.
pub fn at_local(day: NaiveDate, time: NaiveTime) -> DateTime<Local> {
    let naive = day.and_time(time);
    Local.from_local_datetime(&naive).earliest()
        .unwrap_or_else(|| Local.from_utc_datetime(&naive))
}

pub fn start_of_day(day: NaiveDate) -> DateTime<Local> {
    at_local(day, NaiveTime::MIN)
}

/// One second before the next midnight.
pub fn end_of_day(day: NaiveDate) -> DateTime<Local> {
    at_local(day, NaiveTime::MIN + Duration::seconds(86_399))
}

// ─── Week window ──────────────────────────────────────────────────────────────

/// Seven consecutive days: the day after the week start through the next
/// week start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Week {
    days: [NaiveDate; 7],
}

impl Week {
    pub fn containing(today: NaiveDate, week_start: Weekday) -> Self {
        let first = week_start_on_or_before(today, week_start);
        Self { days: std::array::from_fn(|i| first + Duration::days(i as i64 + 1)) }
    }

    pub fn current(week_start: Weekday) -> Self {
        Self::containing(Local::now().date_naive(), week_start)
    }

    pub fn days(&self) -> &[NaiveDate; 7] { &self.days }

    pub fn position(&self, day: NaiveDate) -> Option<usize> {
        self.days.iter().position(|d| *d == day)
    }

    pub fn contains(&self, day: NaiveDate) -> bool { self.position(day).is_some() }
}

/// The week window for "now".
pub fn current_week_dates(week_start: Weekday) -> [NaiveDate; 7] {
    *Week::current(week_start).days()
}

/// Most recent `week_start` weekday, `today` inclusive.
pub fn week_start_on_or_before(today: NaiveDate, week_start: Weekday) -> NaiveDate {
    let back = (7 + today.weekday().num_days_from_monday()
        - week_start.num_days_from_monday()) % 7;
    today - Duration::days(back as i64)
}

// ─── Locale week start ────────────────────────────────────────────────────────

const SUNDAY_REGIONS: &[&str] = &[
    "AG", "AS", "BD", "BR", "BS", "BT", "BW", "BZ", "CA", "CN", "CO", "DM", "DO",
    "ET", "GT", "GU", "HK", "HN", "ID", "IL", "IN", "JM", "JP", "KE", "KH", "KR",
    "LA", "MH", "MM", "MO", "MT", "MX", "MZ", "NI", "NP", "PA", "PE", "PH", "PK",
    "PR", "PT", "PY", "SA", "SG", "SV", "TH", "TT", "TW", "UM", "US", "VE", "VI",
    "WS", "YE", "ZA", "ZW",
];

const SATURDAY_REGIONS: &[&str] = &[
    "AE", "AF", "BH", "DJ", "DZ", "EG", "IQ", "IR", "JO", "KW", "LY", "OM", "QA",
    "SD", "SY",
];

/// First weekday for the process locale (`LC_ALL`, `LC_TIME`, `LANG`).
pub fn locale_week_start() -> Weekday {
    let locale = ["LC_ALL", "LC_TIME", "LANG"].iter()
        .filter_map(|k| std::env::var(k).ok())
        .find(|v| !v.is_empty())
        .unwrap_or_default();
    week_start_for_locale(&locale)
}

/// Maps a POSIX/BCP-47 locale string such as `en_US.UTF-8` or `de-DE` to its
/// first weekday. C/POSIX and region-less locales start on Sunday.
pub fn week_start_for_locale(locale: &str) -> Weekday {
    let base   = locale.split(['.', '@']).next().unwrap_or_default();
    let region = base.split(['_', '-']).nth(1).map(str::to_ascii_uppercase);

    match region.as_deref() {
        None => Weekday::Sun,
        Some(r) if SUNDAY_REGIONS.contains(&r)   => Weekday::Sun,
        Some(r) if SATURDAY_REGIONS.contains(&r) => Weekday::Sat,
        Some(_) => Weekday::Mon,
    }
}

// ─── Classifiers ──────────────────────────────────────────────────────────────

pub fn is_today(date: NaiveDate) -> bool {
    is_today_at(date, Local::now())
}

pub fn is_today_at(date: NaiveDate, now: DateTime<Local>) -> bool {
    date == now.date_naive()
}

pub fn is_selected_day(date: NaiveDate, selected: NaiveDate) -> bool {
    date == selected
}

/// Compares hour-of-day only; the date part of `ts` is ignored.
pub fn is_current_hour(ts: DateTime<Local>) -> bool {
    is_current_hour_at(ts, Local::now())
}

pub fn is_current_hour_at(ts: DateTime<Local>, now: DateTime<Local>) -> bool {
    ts.hour() == now.hour()
}

// ─── Formatting ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DayPattern {
    /// `07`
    DayOfMonth,
    /// `Wed`
    WeekdayShort,
}

impl DayPattern {
    fn fmt_str(self) -> &'static str {
        match self {
            DayPattern::DayOfMonth   => "%d",
            DayPattern::WeekdayShort => "%a",
        }
    }
}

pub fn format_day(date: NaiveDate, pattern: DayPattern) -> String {
    date.format(pattern.fmt_str()).to_string()
}
