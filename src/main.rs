mod ui;

use clap::{error::ErrorKind, CommandFactory, Parser};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    tty::IsTty,
};
use log::{info, LevelFilter};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    error::Error,
    fs::{self, File, OpenOptions},
    io::{self, stdin},
    path::{Path, PathBuf},
    time::Duration,
};

use quizreview::{
    app::{App, Flow},
    app_dirs::AppDirs,
    config::{ConfigStore, FileConfigStore},
    results::load_results,
    runtime::{AppEvent, CrosstermEventSource, Runner},
    view::export_to_dir,
};

const TICK_RATE_MS: u64 = 100;

/// see which quiz questions each student answered wrongly
#[derive(Parser, Debug, Clone)]
#[clap(
    version,
    about,
    long_about = "Load a scored quiz export (CSV) and an optional Aiken-format question bank, then browse each student's wrong answers or export them as wronglyAnswered.csv."
)]
pub struct Cli {
    /// quiz results CSV to open on start
    results: Option<PathBuf>,

    /// Aiken-format question bank to open on start
    #[clap(short = 'q', long = "questions", value_name = "BANK")]
    questions: Option<PathBuf>,

    /// config file to use instead of the default location
    #[clap(short = 'c', long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// write the wrong-answers CSV into DIR and exit without starting the UI
    #[clap(short = 'e', long, value_name = "DIR")]
    export: Option<PathBuf>,

    /// directory the (e)xport key writes into
    #[clap(long, value_name = "DIR", default_value = ".")]
    export_dir: PathBuf,

    /// save the effective config to the config file and exit
    #[clap(long)]
    write_config: bool,
}

impl Cli {
    fn config_store(&self) -> FileConfigStore {
        match &self.config {
            Some(path) => FileConfigStore::with_path(path),
            None => FileConfigStore::new(),
        }
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let store = cli.config_store();
    let config = store.load();

    if cli.write_config {
        store.save(&config)?;
        println!("{}", store.path().display());
        return Ok(());
    }

    if let Some(dir) = &cli.export {
        init_logging(None);
        let Some(results) = &cli.results else {
            let mut cmd = Cli::command();
            cmd.error(
                ErrorKind::MissingRequiredArgument,
                "--export needs a RESULTS file",
            )
            .exit();
        };
        let students = load_results(results, &config.identity_columns())?;
        let path = export_to_dir(&students, dir, &config.export_file_name)?;
        println!("{}", path.display());
        return Ok(());
    }

    if !stdin().is_tty() {
        let mut cmd = Cli::command();
        cmd.error(ErrorKind::Io, "stdin must be a tty").exit();
    }

    init_logging(AppDirs::log_path().as_deref());

    let mut app = App::new(config, cli.export_dir.clone());
    if let Some(path) = &cli.results {
        let _ = app.load_results(path);
    }
    if let Some(path) = &cli.questions {
        let _ = app.load_bank(path);
    }

    enable_raw_mode()?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let outcome = start_tui(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen,)?;
    terminal.show_cursor()?;

    outcome
}

/// Log to `log_file` when given (the TUI owns the terminal), otherwise to stderr.
fn init_logging(log_file: Option<&Path>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));

    if let Some(path) = log_file {
        match open_log(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(_) => {
                builder.filter_level(LevelFilter::Off);
            }
        }
    }

    let _ = builder.try_init();
}

fn open_log(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).append(true).open(path)
}

fn start_tui<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    let runner = Runner::new(
        CrosstermEventSource::new(),
        Duration::from_millis(TICK_RATE_MS),
    );
    info!("ui started");

    terminal.draw(|f| ui::draw(app, f))?;
    loop {
        match runner.step() {
            AppEvent::Tick => {
                if app.status.is_none() {
                    continue;
                }
                app.on_tick();
            }
            AppEvent::Resize => {}
            AppEvent::Key(key) => {
                if app.on_key(key) == Flow::Quit {
                    break;
                }
            }
        }
        terminal.draw(|f| ui::draw(app, f))?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_default_values() {
        let cli = Cli::parse_from(["quizreview"]);

        assert_eq!(cli.results, None);
        assert_eq!(cli.questions, None);
        assert_eq!(cli.config, None);
        assert_eq!(cli.export, None);
        assert_eq!(cli.export_dir, PathBuf::from("."));
        assert!(!cli.write_config);
    }

    #[test]
    fn test_cli_inputs() {
        let cli = Cli::parse_from(["quizreview", "grades.csv", "-q", "bank.txt"]);
        assert_eq!(cli.results, Some(PathBuf::from("grades.csv")));
        assert_eq!(cli.questions, Some(PathBuf::from("bank.txt")));

        let cli = Cli::parse_from(["quizreview", "grades.csv", "--questions", "other.txt"]);
        assert_eq!(cli.questions, Some(PathBuf::from("other.txt")));
    }

    #[test]
    fn test_cli_export() {
        let cli = Cli::parse_from(["quizreview", "grades.csv", "--export", "out"]);
        assert_eq!(cli.export, Some(PathBuf::from("out")));

        let cli = Cli::parse_from(["quizreview", "grades.csv", "-e", "out2"]);
        assert_eq!(cli.export, Some(PathBuf::from("out2")));
    }

    #[test]
    fn test_cli_config_override() {
        let cli = Cli::parse_from(["quizreview", "-c", "/tmp/q.json"]);
        assert_eq!(cli.config_store().path(), Path::new("/tmp/q.json"));
    }

    #[test]
    fn test_cli_rejects_unknown_flag() {
        assert!(Cli::try_parse_from(["quizreview", "--nope"]).is_err());
    }

    #[test]
    fn test_open_log_creates_parent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("quizreview.log");
        open_log(&path).unwrap();
        assert!(path.exists());
    }
}
