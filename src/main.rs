use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::{debug, error, info, warn};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use sightright::app::App;
use sightright::config::Config;
use sightright::event::{AppEvent, EventHandler};
use sightright::exit::ExitStatus;
use sightright::logging::{self, LogDestination};
use sightright::session::input::InputEvent;
use sightright::store::import::import_csv_file;
use sightright::store::phrase_store::{PhraseStore, StoreError};
use sightright::store::schema::{BatchId, PhraseId};
use sightright::ui::components::flash_card::FlashCard;

// Roughly the 60 fps the drill loop has always run at
const TICK_RATE: Duration = Duration::from_millis(16);

#[derive(Parser)]
#[command(
    name = "sightright",
    version,
    about = "A flash card game for parents and children to play together"
)]
struct Cli {
    #[arg(short, long, help = "List phrases stored in the database")]
    list_phrases: bool,

    #[arg(short, long, value_name = "CSV", help = "Import a CSV file of phrases into the database")]
    import_phrases: Option<PathBuf>,

    #[arg(long, value_name = "ID", help = "Make a phrase eligible for future rounds")]
    enable: Option<i64>,

    #[arg(long, value_name = "ID", help = "Stop a phrase from being chosen")]
    disable: Option<i64>,

    #[arg(long, value_name = "ID", help = "Remove a phrase from the database")]
    delete: Option<i64>,

    #[arg(long, value_name = "BATCH", help = "Show the recorded answers for a round")]
    history: Option<i64>,

    #[arg(short, long, help = "Enable debug output, for more verbosity")]
    debug: bool,

    #[arg(short, long, help = "Number of phrases per round")]
    words: Option<usize>,

    #[arg(long, value_name = "MS", help = "How long an answered phrase stays on screen")]
    splash_ms: Option<u64>,

    #[arg(long, value_name = "PATH", help = "Phrase database file")]
    db: Option<PathBuf>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,
}

impl Cli {
    fn is_maintenance(&self) -> bool {
        self.list_phrases
            || self.import_phrases.is_some()
            || self.enable.is_some()
            || self.disable.is_some()
            || self.delete.is_some()
            || self.history.is_some()
    }

    fn apply_overrides(&self, config: &mut Config) {
        if let Some(words) = self.words {
            config.batch_size = words;
        }
        if let Some(ms) = self.splash_ms {
            config.splash_delay_ms = ms;
        }
        if let Some(ref db) = self.db {
            config.database_path = db.to_string_lossy().to_string();
        }
        if let Some(ref theme) = self.theme {
            config.theme = theme.clone();
        }
        config.validate();
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let status = run(&cli);
    if status == ExitStatus::Clean {
        info!("SightRight execution finished");
    } else {
        warn!("SightRight is exiting with a non-zero exit code: {}", status.code());
    }
    status.into()
}

fn fatal(status: ExitStatus, message: impl std::fmt::Display) -> ExitStatus {
    error!("{message}");
    eprintln!("Error: {message}");
    status
}

fn run(cli: &Cli) -> ExitStatus {
    let (mut config, config_err) = match Config::load() {
        Ok(config) => (config, None),
        Err(e) => (Config::default(), Some(e)),
    };
    cli.apply_overrides(&mut config);

    let destination = if cli.is_maintenance() {
        LogDestination::Stderr
    } else {
        LogDestination::Directory(Path::new(&config.log_dir))
    };
    match logging::init(cli.debug, destination) {
        Ok(Some(path)) => debug!("logging to {}", path.display()),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error: could not set up logging in {}: {e}", config.log_dir);
            return ExitStatus::LogUnavailable;
        }
    }
    if let Some(e) = config_err {
        warn!("could not read config file, using defaults: {e:#}");
    }

    let db_path = Path::new(&config.database_path);
    let mut store = match PhraseStore::open(db_path) {
        Ok(store) => store,
        Err(e) => {
            return fatal(
                ExitStatus::StorageUnavailable,
                format!("could not open phrase database {}: {e}", db_path.display()),
            );
        }
    };
    debug!("phrase database {} open", db_path.display());

    if cli.is_maintenance() {
        return run_maintenance(cli, &mut store);
    }

    let mut app = match App::new(store, &config) {
        Ok(app) => app,
        Err(e) => return fatal(ExitStatus::from(&e), e),
    };

    match run_terminal(&mut app) {
        Ok(()) => ExitStatus::Clean,
        Err(e) => fatal(ExitStatus::TerminalFailure, format!("{e:?}")),
    }
}

fn run_maintenance(cli: &Cli, store: &mut PhraseStore) -> ExitStatus {
    if let Some(ref path) = cli.import_phrases {
        match import_csv_file(store, path) {
            Ok(summary) => println!(
                "Imported {} phrases ({} skipped)",
                summary.added, summary.skipped
            ),
            Err(e) => {
                return fatal(
                    ExitStatus::ImportFailed,
                    format!("import of {} failed: {e}", path.display()),
                );
            }
        }
    }

    let edits: [(Option<i64>, &str, fn(&mut PhraseStore, PhraseId) -> Result<(), StoreError>); 3] = [
        (cli.enable, "Enabled", PhraseStore::enable_phrase),
        (cli.disable, "Disabled", PhraseStore::disable_phrase),
        (cli.delete, "Deleted", PhraseStore::delete_phrase),
    ];
    for (id, verb, apply) in edits {
        let Some(id) = id.map(PhraseId) else {
            continue;
        };
        match apply(store, id) {
            Ok(()) => println!("{verb} phrase {id}"),
            Err(e @ StoreError::NotFound(_)) => {
                warn!("{e}");
                eprintln!("Failed: {e}");
            }
            Err(e) => return fatal(ExitStatus::StorageUnavailable, e),
        }
    }

    if cli.list_phrases {
        match store.list_all_phrases() {
            Ok(phrases) => {
                for phrase in phrases {
                    println!("{}\t{}\t{}", phrase.id, phrase.text, phrase.enabled);
                }
            }
            Err(e) => return fatal(ExitStatus::StorageUnavailable, e),
        }
    }

    if let Some(batch) = cli.history.map(BatchId) {
        match store.responses_for_batch(batch) {
            Ok(records) => {
                for record in records {
                    println!(
                        "{}\t{}\t{}\t{}",
                        record.batch_id, record.phrase_id, record.response_time_ms, record.status
                    );
                }
            }
            Err(e) => return fatal(ExitStatus::StorageUnavailable, e),
        }
    }

    ExitStatus::Clean
}

fn run_terminal(app: &mut App) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let events = EventHandler::new(TICK_RATE);

    let result = run_app(&mut terminal, app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        let mut pending = vec![events.next()?];
        pending.extend(events.drain());
        let inputs: Vec<InputEvent> = pending.iter().filter_map(AppEvent::input).collect();

        app.step(&inputs, Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}

fn render(frame: &mut ratatui::Frame, app: &App) {
    let card = FlashCard::new(app.session.view(), &app.theme);
    frame.render_widget(card, frame.area());
}
