use std::time::Duration;

use assert_matches::assert_matches;
use chrono::{Days, NaiveDate};
use pawtrack::clock::FakeClock;
use pawtrack::error::WalkError;
use pawtrack::position::{path_length_km, SimulatedWalker, DEFAULT_LOCATION};
use pawtrack::util::round_to_tenth;
use pawtrack::walk::{format_elapsed, WalkHistoryStore, WalkSession, WalkStatus};

fn start_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
}

fn walk_for(clock: &FakeClock, session: &mut WalkSession<FakeClock>, secs: u64) {
    for _ in 0..secs {
        clock.advance_secs(1);
        session.poll();
    }
}

#[test]
fn durations_are_whole_minutes_of_elapsed_time() {
    let clock = FakeClock::new(start_day());
    let mut session = WalkSession::new(clock.clone(), 30);
    let mut history = WalkHistoryStore::new();

    for (secs, minutes) in [(0, 0), (59, 0), (60, 1), (61, 1), (3599, 59), (3600, 60)] {
        session.start().unwrap();
        assert_eq!(session.elapsed_seconds(), 0);
        walk_for(&clock, &mut session, secs);
        assert_eq!(session.elapsed_seconds(), secs);

        let record = session.stop(&mut history).unwrap();
        assert_eq!(record.duration_minutes, minutes, "after {secs}s");
        assert_eq!(session.elapsed_seconds(), 0);
        assert_eq!(history.list()[0], record);
    }

    assert_eq!(history.len(), 6);
    let mut ids: Vec<_> = history.list().iter().map(|r| r.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 6);
}

#[test]
fn exactly_one_schedule_no_matter_how_often_start_is_pressed() {
    let clock = FakeClock::new(start_day());
    let mut session = WalkSession::new(clock.clone(), 30);

    session.start().unwrap();
    for _ in 0..5 {
        assert_matches!(
            session.start(),
            Err(WalkError::InvalidTransition {
                from: WalkStatus::Active,
                ..
            })
        );
    }
    assert_eq!(clock.active_schedules(), 1);

    walk_for(&clock, &mut session, 42);
    assert_eq!(session.elapsed_seconds(), 42);
}

#[test]
fn late_ticks_never_reach_a_stopped_walk() {
    let clock = FakeClock::new(start_day());
    let mut session = WalkSession::new(clock.clone(), 30);
    let mut history = WalkHistoryStore::new();

    session.start().unwrap();
    walk_for(&clock, &mut session, 10);
    // ten more seconds pass without a poll
    clock.advance(Duration::from_secs(10));
    let record = session.stop(&mut history).unwrap();
    assert_eq!(record.duration_minutes, 0);

    clock.advance(Duration::from_secs(100));
    assert_eq!(session.poll(), 0);
    assert_eq!(session.status(), WalkStatus::Idle);
    assert_eq!(session.elapsed_seconds(), 0);
    assert_eq!(session.formatted_elapsed(), format_elapsed(0));
}

#[test]
fn simulated_walk_distance_matches_recorded_path() {
    let clock = FakeClock::new(start_day());
    let mut session = WalkSession::new(clock.clone(), 30)
        .with_positions(SimulatedWalker::with_seed(DEFAULT_LOCATION, 5, 7));
    let mut history = WalkHistoryStore::new();

    session.start().unwrap();
    walk_for(&clock, &mut session, 20 * 60);
    let record = session.stop(&mut history).unwrap();

    assert_eq!(record.duration_minutes, 20);
    assert_eq!(record.path.first(), Some(&DEFAULT_LOCATION));
    // one fix at the start plus one every five seconds
    assert_eq!(record.path.len(), 1 + 20 * 60 / 5);
    assert_eq!(record.distance_km, round_to_tenth(path_length_km(&record.path)));
    // walking pace keeps twenty minutes well under two kilometres
    assert!(record.distance_km > 0.0 && record.distance_km < 2.0);
}

#[test]
fn weekly_summary_follows_the_calendar() {
    let clock = FakeClock::new(start_day());
    let mut session = WalkSession::new(clock.clone(), 30);
    let mut history = WalkHistoryStore::new();

    for day in 0..10u64 {
        clock.set_today(start_day().checked_add_days(Days::new(day)).unwrap());
        session.start().unwrap();
        walk_for(&clock, &mut session, 600);
        session.stop(&mut history).unwrap();
    }

    let summary = history.weekly_summary(session.today());
    assert_eq!(summary.walks, 7);
    assert_eq!(summary.total_minutes, 70);
}
