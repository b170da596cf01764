mod ui;

use chrono::{Local, NaiveDate};
use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use pawtrack::{
    app_dirs::AppDirs,
    clock::{Clock, SystemClock},
    community::{CommunityFeed, FeedTab},
    config::{Config, ConfigStore, FileConfigStore},
    diary::{parse_record_date, DiaryBook, HealthKind, ProfileField, RECORD_DATE_FORMAT},
    error::StoreError,
    facilities::{FacilityDirectory, FacilityFilter},
    logging,
    position::{SimulatedWalker, DEFAULT_LOCATION},
    runtime::{AppEvent, CrosstermEventSource, EventSource, FixedTicker, Runner, Step, Ticker},
    seed::{self, WeatherInfo},
    store::Id,
    toast::{ToastLevel, Toasts, LONG_TOAST, SHORT_TOAST},
    walk::{WalkHistoryStore, WalkSession},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    io::{self, stdin},
    path::PathBuf,
    time::Duration,
};
use tracing::{debug, info, warn};

/// walk timer, health diary and dog community in your terminal
#[derive(Parser, Debug, Clone, Default)]
#[clap(
    version,
    about,
    long_about = "A terminal companion for dog owners: time walks against a daily goal, keep a health diary, find nearby pet facilities and chat with other owners."
)]
pub struct Cli {
    /// daily walk goal in minutes (overrides the config file)
    #[clap(short = 'g', long)]
    goal_minutes: Option<u32>,

    /// name to show for your dog (overrides the config file)
    #[clap(short = 'n', long)]
    pet_name: Option<String>,

    /// redraw interval of the terminal loop in milliseconds
    #[clap(long)]
    tick_ms: Option<u64>,

    /// write logs here instead of the default state dir
    #[clap(long)]
    log_file: Option<PathBuf>,

    /// store the effective settings as the new defaults
    #[clap(long)]
    save_config: bool,
}

/// Config file values with command line overrides applied
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeSettings {
    pub goal_minutes: u32,
    pub pet_name: Option<String>,
    pub tick_ms: u64,
    pub sample_every_secs: u64,
}

impl RuntimeSettings {
    pub fn resolve(cli: &Cli, config: Config) -> Self {
        Self {
            goal_minutes: cli.goal_minutes.unwrap_or(config.goal_minutes),
            pet_name: cli.pet_name.clone().or(config.pet_name),
            tick_ms: cli.tick_ms.unwrap_or(config.tick_ms).max(1),
            sample_every_secs: config.sample_every_secs,
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms)
    }
}

impl Default for RuntimeSettings {
    fn default() -> Self {
        Self::resolve(&Cli::default(), Config::default())
    }
}

impl From<&RuntimeSettings> for Config {
    fn from(settings: &RuntimeSettings) -> Self {
        Config {
            goal_minutes: settings.goal_minutes,
            pet_name: settings.pet_name.clone(),
            tick_ms: settings.tick_ms,
            sample_every_secs: settings.sample_every_secs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, strum_macros::Display)]
pub enum Page {
    #[default]
    Diary,
    Walk,
    Facilities,
    Community,
}

impl Page {
    pub const ALL: [Page; 4] = [Page::Diary, Page::Walk, Page::Facilities, Page::Community];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn next(self) -> Page {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Page {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    /// Page bound to a number key, counted from 1
    pub fn from_digit(c: char) -> Option<Page> {
        let n = c.to_digit(10)? as usize;
        Self::ALL.get(n.checked_sub(1)?).copied()
    }

    pub fn icon(self) -> &'static str {
        match self {
            Page::Diary => "📔",
            Page::Walk => "🐕",
            Page::Facilities => "📍",
            Page::Community => "💬",
        }
    }
}

/// What the text prompt at the bottom of the screen is collecting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputPurpose {
    SearchFacilities,
    SearchPosts,
    NewPost,
    Comment(Id),
    /// First step of a health record: the date, prefilled with today
    HealthDate(HealthKind),
    HealthNote(HealthKind, NaiveDate),
    Profile(ProfileField),
}

impl InputPurpose {
    pub fn label(&self) -> String {
        match self {
            InputPurpose::SearchFacilities => "Search facilities".to_string(),
            InputPurpose::SearchPosts => "Search posts".to_string(),
            InputPurpose::NewPost => "New post".to_string(),
            InputPurpose::Comment(id) => format!("Comment on post {id}"),
            InputPurpose::HealthDate(kind) => format!("{kind} date (YYYY-MM-DD)"),
            InputPurpose::HealthNote(kind, date) => {
                format!("{kind} notes for {}", date.format(RECORD_DATE_FORMAT))
            }
            InputPurpose::Profile(field) => format!("Edit {field}"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputPrompt {
    pub purpose: InputPurpose,
    pub buffer: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiaryState {
    /// Kind used for the next health record
    pub kind: HealthKind,
}

impl Default for DiaryState {
    fn default() -> Self {
        Self {
            kind: HealthKind::Vaccination,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FacilityState {
    pub filter: FacilityFilter,
    pub selected: usize,
}

#[derive(Debug, Clone, Default)]
pub struct CommunityState {
    pub tab: FeedTab,
    pub query: String,
    pub selected: usize,
    /// Post opened in the detail pane
    pub detail: Option<Id>,
}

#[derive(Debug)]
pub struct App<C: Clock = SystemClock> {
    pub page: Page,
    pub walk: WalkSession<C>,
    pub history: WalkHistoryStore,
    pub diary: DiaryBook,
    pub facilities: FacilityDirectory,
    pub community: CommunityFeed,
    pub weather: WeatherInfo,
    pub toasts: Toasts,
    pub diary_state: DiaryState,
    pub facility_state: FacilityState,
    pub community_state: CommunityState,
    pub input: Option<InputPrompt>,
}

impl App<SystemClock> {
    pub fn new(settings: &RuntimeSettings) -> Self {
        Self::with_clock(SystemClock, settings)
    }
}

impl<C: Clock> App<C> {
    pub fn with_clock(clock: C, settings: &RuntimeSettings) -> Self {
        let walker = SimulatedWalker::new(DEFAULT_LOCATION, settings.sample_every_secs);
        let walk = WalkSession::new(clock, settings.goal_minutes).with_positions(walker);

        let mut diary = DiaryBook::new(seed::dog_profile(), seed::health_records());
        if let Some(name) = settings.pet_name.as_deref() {
            if let Err(e) = diary.edit_profile(ProfileField::Name, name) {
                warn!(error = %e, "ignoring pet name override");
            }
        }

        Self {
            page: Page::default(),
            walk,
            history: WalkHistoryStore::seeded(seed::walk_history()),
            diary,
            facilities: FacilityDirectory::new(seed::facilities()),
            community: CommunityFeed::new(seed::current_user(), seed::posts(Local::now())),
            weather: seed::weather(),
            toasts: Toasts::default(),
            diary_state: DiaryState::default(),
            facility_state: FacilityState::default(),
            community_state: CommunityState::default(),
            input: None,
        }
    }

    /// Advance timers by `dt` of wall time
    pub fn on_tick(&mut self, dt: Duration) {
        let was_reached = self.walk.goal_reached();
        self.walk.poll();
        if self.walk.is_active() && !was_reached && self.walk.goal_reached() {
            self.toasts
                .show("Daily walk goal reached!", ToastLevel::Info, LONG_TOAST);
        }
        self.toasts.on_tick(dt);
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Control {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Control::Quit;
        }
        if self.input.is_some() {
            self.on_input_key(key);
            return Control::Continue;
        }

        match key.code {
            KeyCode::Esc if self.page == Page::Community && self.community_state.detail.is_some() => {
                self.community_state.detail = None;
            }
            KeyCode::Esc | KeyCode::Char('q') => return Control::Quit,
            KeyCode::Tab => self.page = self.page.next(),
            KeyCode::BackTab => self.page = self.page.prev(),
            KeyCode::Char(c @ '1'..='4') => {
                if let Some(page) = Page::from_digit(c) {
                    self.page = page;
                }
            }
            _ => match self.page {
                Page::Diary => self.on_diary_key(key),
                Page::Walk => self.on_walk_key(key),
                Page::Facilities => self.on_facilities_key(key),
                Page::Community => self.on_community_key(key),
            },
        }
        Control::Continue
    }

    pub fn toggle_walk(&mut self) {
        match self.walk.toggle(&mut self.history) {
            Ok(Some(record)) => self.toasts.show(
                format!(
                    "Walk saved: {} min, {:.1} km",
                    record.duration_minutes, record.distance_km
                ),
                ToastLevel::Success,
                LONG_TOAST,
            ),
            Ok(None) => {}
            Err(e) => debug!(error = %e, "walk command ignored"),
        }
    }

    fn on_walk_key(&mut self, key: KeyEvent) {
        if matches!(key.code, KeyCode::Char(' ') | KeyCode::Enter) {
            self.toggle_walk();
        }
    }

    fn on_diary_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('a') => {
                let today = self.walk.today().format(RECORD_DATE_FORMAT).to_string();
                self.open_input(InputPurpose::HealthDate(self.diary_state.kind), today)
            }
            KeyCode::Char('k') => self.diary_state.kind = self.diary_state.kind.next(),
            KeyCode::Char('n') => self.open_profile_edit(ProfileField::Name),
            KeyCode::Char('b') => self.open_profile_edit(ProfileField::Breed),
            KeyCode::Char('g') => self.open_profile_edit(ProfileField::Age),
            KeyCode::Char('w') => self.open_profile_edit(ProfileField::Weight),
            _ => {}
        }
    }

    fn open_profile_edit(&mut self, field: ProfileField) {
        let current = self.diary.profile().field(field).to_string();
        self.open_input(InputPurpose::Profile(field), current);
    }

    pub fn visible_facility_ids(&self) -> Vec<Id> {
        self.facilities
            .filter(&self.facility_state.filter)
            .into_iter()
            .map(|f| f.id)
            .collect()
    }

    fn on_facilities_key(&mut self, key: KeyEvent) {
        let visible = self.visible_facility_ids();
        match key.code {
            KeyCode::Char('/') => {
                let query = self.facility_state.filter.query.clone();
                self.open_input(InputPurpose::SearchFacilities, query);
            }
            KeyCode::Char('c') => {
                let categories = self.facilities.categories();
                self.facility_state.filter.cycle_category(&categories);
                self.facility_state.selected = 0;
            }
            KeyCode::Up => {
                self.facility_state.selected = self.facility_state.selected.saturating_sub(1)
            }
            KeyCode::Down => {
                self.facility_state.selected =
                    step_down(self.facility_state.selected, visible.len())
            }
            KeyCode::Char('f') | KeyCode::Enter => {
                if let Some(id) = visible.get(self.facility_state.selected).copied() {
                    match self.facilities.toggle_favorite(id) {
                        Ok(true) => self.toasts.success("Added to favorites"),
                        Ok(false) => self.toasts.success("Removed from favorites"),
                        Err(e) => warn!(error = %e, "favorite toggle failed"),
                    }
                }
            }
            _ => {}
        }
    }

    pub fn visible_post_ids(&self) -> Vec<Id> {
        self.community
            .view(self.community_state.tab, &self.community_state.query)
            .into_iter()
            .map(|p| p.id)
            .collect()
    }

    /// The opened post, or else the highlighted one
    pub fn focused_post(&self) -> Option<Id> {
        self.community_state.detail.or_else(|| {
            self.visible_post_ids()
                .get(self.community_state.selected)
                .copied()
        })
    }

    fn on_community_key(&mut self, key: KeyEvent) {
        let tab = self.community_state.tab;
        match key.code {
            KeyCode::Char('/') => {
                let query = self.community_state.query.clone();
                self.open_input(InputPurpose::SearchPosts, query);
            }
            KeyCode::Char('t') | KeyCode::Right => self.switch_tab(tab.next()),
            KeyCode::Left => self.switch_tab(tab.prev()),
            KeyCode::Up => {
                self.community_state.selected = self.community_state.selected.saturating_sub(1)
            }
            KeyCode::Down => {
                let len = self.visible_post_ids().len();
                self.community_state.selected = step_down(self.community_state.selected, len);
            }
            KeyCode::Enter => {
                self.community_state.detail = match self.community_state.detail {
                    Some(_) => None,
                    None => self.focused_post(),
                };
            }
            KeyCode::Char('l') => {
                if let Some(id) = self.focused_post() {
                    match self.community.toggle_like(id) {
                        Ok(_) => self.follow_post(id),
                        Err(e) => warn!(error = %e, "like failed"),
                    }
                }
            }
            KeyCode::Char('c') => {
                if let Some(id) = self.focused_post() {
                    self.open_input(InputPurpose::Comment(id), String::new());
                }
            }
            KeyCode::Char('p') => self.open_input(InputPurpose::NewPost, String::new()),
            _ => {}
        }
    }

    // likes reorder the Popular tab; keep the highlight on the same post
    fn follow_post(&mut self, id: Id) {
        if let Some(idx) = self.visible_post_ids().iter().position(|p| *p == id) {
            self.community_state.selected = idx;
        }
    }

    fn switch_tab(&mut self, tab: FeedTab) {
        self.community_state.tab = tab;
        self.community_state.selected = 0;
        self.community_state.detail = None;
    }

    fn open_input(&mut self, purpose: InputPurpose, buffer: String) {
        self.input = Some(InputPrompt { purpose, buffer });
    }

    fn on_input_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.cancel_input(),
            KeyCode::Enter => {
                if let Some(prompt) = self.input.take() {
                    self.submit_input(prompt);
                }
            }
            KeyCode::Backspace => {
                if let Some(prompt) = self.input.as_mut() {
                    prompt.buffer.pop();
                }
                self.apply_live_search();
            }
            KeyCode::Char(c) => {
                if let Some(prompt) = self.input.as_mut() {
                    prompt.buffer.push(c);
                }
                self.apply_live_search();
            }
            _ => {}
        }
    }

    // searches filter as you type
    fn apply_live_search(&mut self) {
        let Some(prompt) = self.input.as_ref() else {
            return;
        };
        match prompt.purpose {
            InputPurpose::SearchFacilities => {
                self.facility_state.filter.query = prompt.buffer.clone();
                self.facility_state.selected = 0;
            }
            InputPurpose::SearchPosts => {
                self.community_state.query = prompt.buffer.clone();
                self.community_state.selected = 0;
            }
            _ => {}
        }
    }

    // dropping a search also clears its filter
    fn cancel_input(&mut self) {
        let Some(prompt) = self.input.take() else {
            return;
        };
        match prompt.purpose {
            InputPurpose::SearchFacilities => {
                self.facility_state.filter.query.clear();
                self.facility_state.selected = 0;
            }
            InputPurpose::SearchPosts => {
                self.community_state.query.clear();
                self.community_state.selected = 0;
            }
            _ => {}
        }
    }

    fn submit_input(&mut self, prompt: InputPrompt) {
        let now = Local::now();
        let outcome: Result<Option<String>, StoreError> = match prompt.purpose {
            InputPurpose::SearchFacilities | InputPurpose::SearchPosts => Ok(None),
            InputPurpose::NewPost => self
                .community
                .create_post(&prompt.buffer, now)
                .map(|_| Some("Post published".to_string())),
            InputPurpose::Comment(id) => self
                .community
                .add_comment(id, &prompt.buffer, now)
                .map(|_| Some("Comment added".to_string())),
            InputPurpose::HealthDate(kind) => parse_record_date(&prompt.buffer).map(|date| {
                self.open_input(InputPurpose::HealthNote(kind, date), String::new());
                None
            }),
            InputPurpose::HealthNote(kind, date) => self
                .diary
                .add_health_record(date, kind, &prompt.buffer)
                .map(|_| Some(format!("{kind} recorded"))),
            InputPurpose::Profile(field) => self
                .diary
                .edit_profile(field, &prompt.buffer)
                .map(|_| None),
        };

        match outcome {
            Ok(message) => {
                if prompt.purpose == InputPurpose::NewPost {
                    self.switch_tab(FeedTab::Latest);
                }
                if let Some(message) = message {
                    self.toasts.success(message);
                }
            }
            Err(StoreError::EmptyContent { field }) => debug!(field, "empty submission ignored"),
            Err(e @ StoreError::InvalidDate { .. }) => {
                debug!(error = %e, "date rejected");
                self.toasts.show(e.to_string(), ToastLevel::Info, SHORT_TOAST);
                self.input = Some(prompt);
            }
            Err(e) => warn!(error = %e, "submission failed"),
        }
    }
}

fn step_down(selected: usize, len: usize) -> usize {
    if len == 0 {
        0
    } else {
        (selected + 1).min(len - 1)
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    if let Some(path) = cli.log_file.clone().or_else(AppDirs::log_path) {
        if let Err(e) = logging::init_file_logging(&path) {
            eprintln!("pawtrack: logging disabled ({}): {e}", path.display());
        }
    }

    let store = FileConfigStore::new();
    let settings = RuntimeSettings::resolve(&cli, store.load());
    if cli.save_config {
        store.save(&Config::from(&settings))?;
        info!(path = %store.path().display(), "settings saved");
    }
    info!(goal_minutes = settings.goal_minutes, tick_ms = settings.tick_ms, "starting");

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(&settings);
    let mut runner = Runner::new(
        CrosstermEventSource::spawn(),
        FixedTicker::new(settings.tick_interval()),
    );
    let result = start_tui(&mut terminal, &mut app, &mut runner);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B, C, E, T>(
    terminal: &mut Terminal<B>,
    app: &mut App<C>,
    runner: &mut Runner<E, T>,
) -> Result<(), Box<dyn Error>>
where
    B: Backend,
    C: Clock,
    E: EventSource,
    T: Ticker,
{
    terminal.draw(|f| ui::draw(app, f))?;

    loop {
        let Step { event, elapsed } = runner.step();
        app.on_tick(elapsed);

        match event {
            AppEvent::Tick | AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if app.on_key(key) == Control::Quit {
                    break;
                }
            }
        }
        terminal.draw(|f| ui::draw(app, f))?;
    }

    info!("quit");
    Ok(())
}
