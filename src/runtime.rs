use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as CtEvent, KeyEvent, KeyEventKind};
use tracing::debug;

/// Unified event type consumed by the app runner
#[derive(Clone, Debug)]
pub enum AppEvent {
    Key(KeyEvent),
    /// Terminal size changed; the next draw picks up the new size
    Resize,
    Tick,
}

/// Source of terminal events (keyboard, resize, etc.)
pub trait EventSource: Send + 'static {
    /// Block for up to `timeout` waiting for an event.
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError>;
}

/// A plain channel is a source too; headless runs and tests feed it directly.
impl EventSource for Receiver<AppEvent> {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        Receiver::recv_timeout(self, timeout)
    }
}

/// Terminal input read on a background thread
pub struct CrosstermEventSource {
    rx: Receiver<AppEvent>,
}

impl CrosstermEventSource {
    /// Start the reader thread
    pub fn spawn() -> Self {
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || forward_terminal_events(&tx));
        Self { rx }
    }
}

// Runs until the terminal read fails or the app side hangs up.
fn forward_terminal_events(tx: &Sender<AppEvent>) {
    loop {
        let event = match event::read() {
            // key release/repeat events would double up input on some terminals
            Ok(CtEvent::Key(key)) if key.kind == KeyEventKind::Press => AppEvent::Key(key),
            Ok(CtEvent::Resize(_, _)) => AppEvent::Resize,
            Ok(_) => continue,
            Err(e) => {
                debug!(error = %e, "terminal input closed");
                return;
            }
        };
        if tx.send(event).is_err() {
            return;
        }
    }
}

impl EventSource for CrosstermEventSource {
    fn recv_timeout(&self, timeout: Duration) -> Result<AppEvent, RecvTimeoutError> {
        self.rx.recv_timeout(timeout)
    }
}

/// Configurable ticker interface
pub trait Ticker: Send + Sync + 'static {
    fn interval(&self) -> Duration;
}

/// Fixed interval ticker
#[derive(Clone, Copy, Debug)]
pub struct FixedTicker {
    interval: Duration,
}

impl FixedTicker {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }
}

impl Ticker for FixedTicker {
    fn interval(&self) -> Duration {
        self.interval
    }
}

/// One turn of the loop
#[derive(Debug)]
pub struct Step {
    pub event: AppEvent,
    /// Wall time since the previous step returned (or since the runner was built)
    pub elapsed: Duration,
}

/// Waits for the next event and measures the time between turns.
///
/// Keystrokes arriving faster than the tick interval keep the timeout from
/// firing, so `elapsed` is reported on every step, not only on ticks.
pub struct Runner<E: EventSource, T: Ticker> {
    event_source: E,
    ticker: T,
    last_step: Instant,
}

impl<E: EventSource, T: Ticker> Runner<E, T> {
    pub fn new(event_source: E, ticker: T) -> Self {
        Self {
            event_source,
            ticker,
            last_step: Instant::now(),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        self.ticker.interval()
    }

    /// Blocks up to the tick interval. A closed source degrades to plain ticks.
    pub fn step(&mut self) -> Step {
        let event = match self.event_source.recv_timeout(self.ticker.interval()) {
            Ok(ev) => ev,
            Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => AppEvent::Tick,
        };
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_step);
        self.last_step = now;
        Step { event, elapsed }
    }
}
