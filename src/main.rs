pub mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    event::{KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Frame, Terminal,
};
use spinwheel::{
    app::WheelApp,
    app_dirs::AppDirs,
    celebration::Celebration,
    config::{Config, ConfigStore, FileConfigStore},
    controller::{AnimationController, SpinHandle, SpinRequest, SpinResult, SpinSettings},
    persistence::{KeyValueMedium, MemoryMedium, PersistenceStore, SqliteMedium, SystemClock},
    runtime::{CrosstermEventSource, Runner, WheelEvent},
    wheel::parse_entries,
};
use std::{
    error::Error,
    fs::OpenOptions,
    io::{self, stdin},
    sync::Mutex,
    time::Duration,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::ui::screen::current_screen;

/// Names shown the first time the wheel is opened.
const SAMPLE_ENTRIES: &str = "Alice\nBob\nCharlie\nDiana";

/// spin-the-wheel name picker for the terminal
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Put names on a wheel, spin it, and let the pointer pick one. The list is remembered for a week."
)]
pub struct Cli {
    /// entry to put on the wheel (repeat for more); replaces the remembered list
    #[clap(short = 'e', long = "entry")]
    entries: Vec<String>,

    /// fixed spin duration in milliseconds (default: random between the configured bounds)
    #[clap(short = 'd', long)]
    duration: Option<u64>,

    /// spin speed multiplier
    #[clap(long)]
    speed: Option<f64>,

    /// forget the remembered entry list before starting
    #[clap(long)]
    forget: bool,

    /// write the effective spin settings to the config file
    #[clap(long)]
    save_settings: bool,
}

impl Cli {
    /// Overlay command line settings on the stored config
    fn apply_to(&self, config: &mut Config) {
        if let Some(ms) = self.duration {
            config.spin_duration_ms = Some(ms);
        }
        if let Some(speed) = self.speed {
            config.speed_multiplier = speed;
        }
    }

    fn initial_entries(&self) -> Vec<String> {
        parse_entries(&self.entries.join("\n"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Wheel,
    Edit,
}

type Medium = Box<dyn KeyValueMedium>;

pub struct App {
    pub wheel: WheelApp<Medium, SystemClock, rand::rngs::StdRng>,
    pub state: AppState,
    pub editor: String,
    pub notice: Option<String>,
    pub celebration: Celebration,
    pub spin: Option<SpinHandle>,
    pub size: (u16, u16),
}

impl App {
    pub fn new(settings: SpinSettings, medium: Medium) -> Self {
        Self {
            wheel: WheelApp::new(
                AnimationController::new(settings),
                PersistenceStore::new(medium),
            ),
            state: AppState::Wheel,
            editor: String::new(),
            notice: None,
            celebration: Celebration::new(),
            spin: None,
            size: (80, 24),
        }
    }

    pub fn spin(&mut self) {
        match self.wheel.request_spin() {
            Ok(SpinRequest::Started(handle)) => self.spin = Some(handle),
            Ok(SpinRequest::Ignored) => {}
            Err(err) if err.is_user_facing() => self.notice = Some(err.to_string()),
            Err(err) => {
                tracing::error!(error = %err, "spin failed");
                self.notice = Some(err.to_string());
            }
        }
    }

    pub fn open_editor(&mut self) {
        self.editor = self.wheel.raw_entries();
        self.state = AppState::Edit;
    }

    pub fn apply_editor(&mut self) {
        self.wheel.edit_entries(&self.editor);
        self.state = AppState::Wheel;
    }

    /// Advances animation by `dt`. Returns true if the screen needs a redraw.
    pub fn on_tick(&mut self, dt: Duration) -> bool {
        let outcome = self.wheel.tick(dt);

        if let Some(handle) = &self.spin {
            match handle.try_winner() {
                Ok(winner) => {
                    self.celebration
                        .start(&winner.name, self.size.0, self.size.1);
                    self.spin = None;
                }
                Err(SpinResult::Cancelled) => self.spin = None,
                Err(SpinResult::Pending) => {}
            }
        }

        let celebrating = self.celebration.is_active();
        if celebrating {
            self.celebration.update();
        }
        outcome.redraw || celebrating
    }

    /// Handles one key press. Returns true when the app should quit.
    pub fn on_key(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return true;
        }
        // Notices and the winner banner swallow the next key.
        if self.notice.take().is_some() {
            return false;
        }
        if self.celebration.is_active() {
            self.celebration.dismiss();
            return false;
        }
        if self.state == AppState::Wheel && matches!(key.code, KeyCode::Esc | KeyCode::Char('q'))
        {
            return true;
        }
        let mut screen = current_screen(&self.state);
        screen.on_key(key, self);
        false
    }
}

fn open_medium() -> Medium {
    let opened = match AppDirs::db_path() {
        Some(path) => SqliteMedium::open(path),
        None => Err(io::Error::new(io::ErrorKind::NotFound, "no state directory").into()),
    };
    match opened {
        Ok(medium) => Box::new(medium),
        Err(err) => {
            tracing::warn!(error = %err, "entry list will not be remembered this session");
            Box::new(MemoryMedium::new())
        }
    }
}

/// Logs go to a file next to the database because the TUI owns the terminal.
fn init_tracing() {
    let Some(path) = AppDirs::log_path() else {
        return;
    };
    if let Some(parent) = path.parent() {
        if std::fs::create_dir_all(parent).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .try_init();
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_tracing();

    let config_store = FileConfigStore::new();
    let mut config = config_store.load();
    cli.apply_to(&mut config);
    let settings = match config.spin_settings() {
        Ok(settings) => settings,
        Err(err) => {
            let mut cmd = Cli::command();
            cmd.error(ErrorKind::InvalidValue, err.to_string()).exit();
        }
    };
    if cli.save_settings {
        config_store.save(&config)?;
    }

    let mut app = App::new(settings, open_medium());
    if cli.forget {
        app.wheel.forget()?;
    }
    let entries = cli.initial_entries();
    if !entries.is_empty() {
        app.wheel.set_entries(entries);
    } else if !app.wheel.load_saved() {
        app.wheel
            .controller_mut()
            .set_entries(parse_entries(SAMPLE_ENTRIES));
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    result
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let mut runner = Runner::new(CrosstermEventSource::new());
    terminal.draw(|f| ui(app, f))?;

    loop {
        let (event, elapsed) = runner.step_timed();
        let mut redraw = app.on_tick(elapsed);

        match event {
            WheelEvent::Tick => {}
            WheelEvent::Resize => redraw = true,
            WheelEvent::Key(key) => {
                if app.on_key(key) {
                    break;
                }
                redraw = true;
            }
        }

        if redraw {
            terminal.draw(|f| ui(app, f))?;
        }
    }

    Ok(())
}

fn ui(app: &mut App, f: &mut Frame) {
    app.size = (f.area().width, f.area().height);
    current_screen(&app.state).render(app, f);
}
