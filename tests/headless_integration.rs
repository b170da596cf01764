use std::sync::mpsc;
use std::time::Duration;

use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use pawtrack::clock::FakeClock;
use pawtrack::runtime::{AppEvent, FixedTicker, Runner};
use pawtrack::walk::{WalkHistoryStore, WalkSession, WalkStatus};

fn space() -> AppEvent {
    AppEvent::Key(KeyEvent::new(KeyCode::Char(' '), KeyModifiers::NONE))
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

// Headless integration using the internal runtime + WalkSession without a TTY.
// Each runtime tick advances the fake clock by one second.
#[test]
fn headless_walk_flow_saves_a_record() {
    let (tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        rx,
        FixedTicker::new(Duration::from_millis(1)),
    );
    let clock = FakeClock::new(today());
    let mut session = WalkSession::new(clock.clone(), 30);
    let mut history = WalkHistoryStore::new();

    tx.send(space()).unwrap();

    let mut ticks = 0u32;
    let mut saved = None;
    for _ in 0..1000u32 {
        match runner.step().event {
            AppEvent::Tick => {
                clock.advance_secs(1);
                session.poll();
                ticks += 1;
                if ticks == 90 {
                    tx.send(space()).unwrap();
                }
            }
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                assert_eq!(key.code, KeyCode::Char(' '));
                if let Some(record) = session.toggle(&mut history).unwrap() {
                    saved = Some(record);
                    break;
                }
            }
        }
    }

    let record = saved.expect("walk should have been stopped");
    assert_eq!(record.duration_minutes, 1);
    assert_eq!(record.date, today());
    assert_eq!(history.list(), &[record]);
    assert_eq!(session.status(), WalkStatus::Idle);
    assert_eq!(session.elapsed_seconds(), 0);
    assert_eq!(clock.active_schedules(), 0);
}

#[test]
fn headless_idle_session_ignores_ticks() {
    let (_tx, rx) = mpsc::channel();
    let mut runner = Runner::new(
        rx,
        FixedTicker::new(Duration::from_millis(1)),
    );
    let clock = FakeClock::new(today());
    let mut session = WalkSession::new(clock.clone(), 30);

    for _ in 0..20u32 {
        if let AppEvent::Tick = runner.step().event {
            clock.advance_secs(1);
            session.poll();
        }
    }

    assert_eq!(session.elapsed_seconds(), 0);
    assert_eq!(session.formatted_elapsed(), "00:00");
}

#[test]
fn headless_closed_input_still_ticks() {
    let (tx, rx) = mpsc::channel::<AppEvent>();
    drop(tx);
    let mut runner = Runner::new(
        rx,
        FixedTicker::new(Duration::from_millis(1)),
    );
    let clock = FakeClock::new(today());
    let mut session = WalkSession::new(clock.clone(), 1);
    session.start().unwrap();

    for _ in 0..120u32 {
        if let AppEvent::Tick = runner.step().event {
            clock.advance_secs(1);
            session.poll();
        }
    }

    assert_eq!(session.elapsed_seconds(), 120);
    assert!(session.goal_reached());
    assert_eq!(session.progress_percent(), 100.0);
}
