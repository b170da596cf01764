use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use tracing::{debug, info};

use crate::clock::{Clock, TickSchedule};
use crate::error::WalkError;
use crate::position::{path_length_km, GeoPoint, PositionSource};
use crate::store::{Entity, Id, Ordering, Repository};
use crate::util::round_to_tenth;

pub const DEFAULT_GOAL_MINUTES: u32 = 30;
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);
const SUMMARY_WINDOW_DAYS: u64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum WalkStatus {
    Idle,
    Active,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
#[strum(serialize_all = "lowercase")]
pub enum WalkCommand {
    Start,
    Stop,
}

/// A finished walk. Never changes once it is in the history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WalkRecord {
    pub id: Id,
    pub date: NaiveDate,
    pub duration_minutes: u64,
    pub distance_km: f64,
    pub path: Vec<GeoPoint>,
}

impl WalkRecord {
    pub fn new(date: NaiveDate, duration_minutes: u64, distance_km: f64, path: Vec<GeoPoint>) -> Self {
        Self {
            id: Id::UNASSIGNED,
            date,
            duration_minutes,
            distance_km,
            path,
        }
    }

    /// Record whose distance is the length of `path`
    pub fn from_path(date: NaiveDate, duration_minutes: u64, path: Vec<GeoPoint>) -> Self {
        let distance_km = round_to_tenth(path_length_km(&path));
        Self::new(date, duration_minutes, distance_km, path)
    }
}

impl Entity for WalkRecord {
    const KIND: &'static str = "walk";

    fn id(&self) -> Id {
        self.id
    }

    fn assign_id(&mut self, id: Id) {
        self.id = id;
    }
}

/// Completed walks, most recent first
#[derive(Debug, Clone)]
pub struct WalkHistoryStore {
    records: Repository<WalkRecord>,
}

impl Default for WalkHistoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl WalkHistoryStore {
    pub fn new() -> Self {
        Self {
            records: Repository::new(Ordering::NewestFirst),
        }
    }

    /// Seed with records listed most recent first
    pub fn seeded(records: Vec<WalkRecord>) -> Self {
        Self {
            records: Repository::seeded(Ordering::NewestFirst, records),
        }
    }

    /// Put `record` at the front under a fresh id
    pub fn prepend(&mut self, record: WalkRecord) -> &WalkRecord {
        self.records.create(record)
    }

    pub fn list(&self) -> &[WalkRecord] {
        self.records.list()
    }

    pub fn get(&self, id: Id) -> Option<&WalkRecord> {
        self.records.get(id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Totals over the seven days ending with `today`
    pub fn weekly_summary(&self, today: NaiveDate) -> WalkSummary {
        let from = today
            .checked_sub_days(Days::new(SUMMARY_WINDOW_DAYS - 1))
            .unwrap_or(NaiveDate::MIN);
        WalkSummary::over(
            self.records
                .iter()
                .filter(|r| r.date >= from && r.date <= today),
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WalkSummary {
    pub walks: usize,
    pub total_km: f64,
    pub total_minutes: u64,
    pub avg_speed_kmh: f64,
}

impl WalkSummary {
    pub fn over<'a>(records: impl IntoIterator<Item = &'a WalkRecord>) -> Self {
        let mut summary = WalkSummary::default();
        for record in records {
            summary.walks += 1;
            summary.total_km += record.distance_km;
            summary.total_minutes += record.duration_minutes;
        }
        summary.total_km = round_to_tenth(summary.total_km);
        if summary.total_minutes > 0 {
            summary.avg_speed_kmh =
                round_to_tenth(summary.total_km / (summary.total_minutes as f64 / 60.0));
        }
        summary
    }
}

/// `MM:SS`, zero padded; minutes keep counting past 59
pub fn format_elapsed(elapsed_secs: u64) -> String {
    format!("{:02}:{:02}", elapsed_secs / 60, elapsed_secs % 60)
}

/// Share of the daily goal covered, clamped to 0..=100
pub fn progress_percent(elapsed_secs: u64, goal_minutes: u32) -> f64 {
    if goal_minutes == 0 {
        return 100.0;
    }
    let pct = elapsed_secs as f64 / 60.0 / goal_minutes as f64 * 100.0;
    pct.min(100.0)
}

/// The walk timer: idle until started, then counts whole seconds until stopped.
///
/// While active the session owns a recurring schedule from its clock. The
/// schedule is released before anything else happens on `stop`, and when the
/// session itself is dropped, so no tick can land on a finished walk.
pub struct WalkSession<C: Clock> {
    clock: C,
    schedule: Option<C::Schedule>,
    elapsed_seconds: u64,
    goal_minutes: u32,
    path: Vec<GeoPoint>,
    positions: Option<Box<dyn PositionSource>>,
}

impl<C: Clock> fmt::Debug for WalkSession<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalkSession")
            .field("status", &self.status())
            .field("elapsed_seconds", &self.elapsed_seconds)
            .field("goal_minutes", &self.goal_minutes)
            .field("path_len", &self.path.len())
            .finish_non_exhaustive()
    }
}

impl<C: Clock> WalkSession<C> {
    pub fn new(clock: C, goal_minutes: u32) -> Self {
        Self {
            clock,
            schedule: None,
            elapsed_seconds: 0,
            goal_minutes,
            path: Vec::new(),
            positions: None,
        }
    }

    pub fn with_positions<P: PositionSource + 'static>(mut self, source: P) -> Self {
        self.positions = Some(Box::new(source));
        self
    }

    pub fn status(&self) -> WalkStatus {
        if self.schedule.is_some() {
            WalkStatus::Active
        } else {
            WalkStatus::Idle
        }
    }

    pub fn is_active(&self) -> bool {
        self.status() == WalkStatus::Active
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    pub fn goal_minutes(&self) -> u32 {
        self.goal_minutes
    }

    pub fn set_goal_minutes(&mut self, goal_minutes: u32) {
        self.goal_minutes = goal_minutes;
    }

    /// Positions recorded so far in the running walk
    pub fn path(&self) -> &[GeoPoint] {
        &self.path
    }

    pub fn formatted_elapsed(&self) -> String {
        format_elapsed(self.elapsed_seconds)
    }

    pub fn progress_percent(&self) -> f64 {
        progress_percent(self.elapsed_seconds, self.goal_minutes)
    }

    pub fn goal_reached(&self) -> bool {
        self.elapsed_seconds >= u64::from(self.goal_minutes) * 60
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn start(&mut self) -> Result<(), WalkError> {
        if self.schedule.is_some() {
            return Err(WalkError::InvalidTransition {
                from: WalkStatus::Active,
                command: WalkCommand::Start,
            });
        }

        self.elapsed_seconds = 0;
        self.path.clear();
        self.schedule = Some(self.clock.schedule_recurring(TICK_INTERVAL));
        self.sample_position();
        info!(goal_minutes = self.goal_minutes, "walk started");
        Ok(())
    }

    /// Apply the ticks that came due since the last poll.
    /// Returns how many seconds were added.
    pub fn poll(&mut self) -> u32 {
        let due = match self.schedule.as_mut() {
            Some(schedule) => schedule.take_due(),
            None => return 0,
        };
        for _ in 0..due {
            self.tick();
        }
        due
    }

    fn tick(&mut self) {
        self.elapsed_seconds += 1;
        self.sample_position();
    }

    fn sample_position(&mut self) {
        let elapsed = self.elapsed_seconds;
        let next = self
            .positions
            .as_mut()
            .and_then(|source| source.next_position(elapsed));
        if let Some(point) = next {
            self.record_position(point);
        }
    }

    /// Append a position fix to the running walk. Ignored while idle.
    pub fn record_position(&mut self, point: GeoPoint) {
        if !self.is_active() || self.path.last() == Some(&point) {
            return;
        }
        self.path.push(point);
    }

    /// Finish the walk and commit it to `history`.
    pub fn stop(&mut self, history: &mut WalkHistoryStore) -> Result<WalkRecord, WalkError> {
        let Some(schedule) = self.schedule.take() else {
            return Err(WalkError::InvalidTransition {
                from: WalkStatus::Idle,
                command: WalkCommand::Stop,
            });
        };
        schedule.cancel();

        let duration_minutes = self.elapsed_seconds / 60;
        let path = std::mem::take(&mut self.path);
        let record = WalkRecord::from_path(self.clock.today(), duration_minutes, path);
        let committed = history.prepend(record).clone();
        self.elapsed_seconds = 0;

        info!(
            id = %committed.id,
            minutes = committed.duration_minutes,
            km = committed.distance_km,
            "walk saved"
        );
        Ok(committed)
    }

    /// The single walk button: start when idle, stop when active.
    /// Returns the committed record when a walk was stopped.
    pub fn toggle(&mut self, history: &mut WalkHistoryStore) -> Result<Option<WalkRecord>, WalkError> {
        match self.status() {
            WalkStatus::Idle => self.start().map(|_| None),
            WalkStatus::Active => self.stop(history).map(Some),
        }
    }
}

impl<C: Clock> Drop for WalkSession<C> {
    fn drop(&mut self) {
        if self.schedule.take().is_some() {
            debug!(elapsed = self.elapsed_seconds, "walk discarded on teardown");
        }
    }
}
