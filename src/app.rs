use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::{info, warn};

use crate::config::Config;
use crate::error::QuizError;
use crate::question_bank::{load_question_bank, QuestionBank};
use crate::results::{load_results, StudentResult};
use crate::view::{export_to_dir, search_indices};

/// Ticks a status line stays on screen (~5s at the default tick rate).
const STATUS_TICKS: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum LoadTarget {
    #[strum(to_string = "results")]
    Results,
    #[strum(to_string = "question bank")]
    QuestionBank,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Browse,
    Search,
    Detail,
    PathPrompt(LoadTarget),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Status {
    Info(String),
    Error(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Everything the screens render from.
///
/// Loaded data (`students`, `bank`) is only ever replaced wholesale after a successful parse.
/// `query` and `selected` are transient and reset independently of each other.
#[derive(Debug)]
pub struct App {
    pub config: Config,
    pub students: Vec<StudentResult>,
    pub bank: Option<QuestionBank>,
    pub results_path: Option<PathBuf>,
    pub bank_path: Option<PathBuf>,
    pub export_dir: PathBuf,
    pub query: String,
    pub selected: Option<usize>,
    pub cursor: usize,
    pub detail_scroll: u16,
    pub mode: Mode,
    pub path_input: String,
    pub status: Option<Status>,
    status_ticks: u32,
}

impl App {
    pub fn new(config: Config, export_dir: PathBuf) -> Self {
        Self {
            config,
            students: Vec::new(),
            bank: None,
            results_path: None,
            bank_path: None,
            export_dir,
            query: String::new(),
            selected: None,
            cursor: 0,
            detail_scroll: 0,
            mode: Mode::Browse,
            path_input: String::new(),
            status: None,
            status_ticks: 0,
        }
    }

    pub fn load_results(&mut self, path: &Path) -> Result<usize, QuizError> {
        match load_results(path, &self.config.identity_columns()) {
            Ok(students) => {
                let count = students.len();
                self.students = students;
                self.results_path = Some(path.to_path_buf());
                self.clear_selection();
                self.cursor = 0;
                self.set_status(Status::Info(format!(
                    "Loaded {count} students from {}",
                    path.display()
                )));
                Ok(count)
            }
            Err(e) => {
                warn!("{e}");
                self.set_status(Status::Error(e.to_string()));
                Err(e)
            }
        }
    }

    pub fn load_bank(&mut self, path: &Path) -> Result<usize, QuizError> {
        match load_question_bank(path) {
            Ok(bank) => {
                let count = bank.len();
                self.bank = Some(bank);
                self.bank_path = Some(path.to_path_buf());
                self.set_status(Status::Info(format!(
                    "Loaded {count} questions from {}",
                    path.display()
                )));
                Ok(count)
            }
            Err(e) => {
                warn!("{e}");
                self.set_status(Status::Error(e.to_string()));
                Err(e)
            }
        }
    }

    pub fn export(&mut self) -> Result<PathBuf, QuizError> {
        match export_to_dir(
            &self.students,
            &self.export_dir,
            &self.config.export_file_name,
        ) {
            Ok(path) => {
                self.set_status(Status::Info(format!("Exported {}", path.display())));
                Ok(path)
            }
            Err(e) => {
                warn!("{e}");
                self.set_status(Status::Error(e.to_string()));
                Err(e)
            }
        }
    }

    pub fn clear_search(&mut self) {
        self.query.clear();
        self.cursor = 0;
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
        self.detail_scroll = 0;
        if self.mode == Mode::Detail {
            self.mode = Mode::Browse;
        }
    }

    /// Student indices the list currently shows.
    pub fn visible_indices(&self) -> Vec<usize> {
        if self.query.is_empty() && self.mode != Mode::Search {
            (0..self.students.len()).collect()
        } else {
            search_indices(&self.students, &self.query)
        }
    }

    pub fn selected_student(&self) -> Option<&StudentResult> {
        self.selected.and_then(|idx| self.students.get(idx))
    }

    pub fn on_tick(&mut self) {
        if self.status.is_some() {
            self.status_ticks = self.status_ticks.saturating_sub(1);
            if self.status_ticks == 0 {
                self.status = None;
            }
        }
    }

    pub fn on_key(&mut self, key: KeyEvent) -> Flow {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            return Flow::Quit;
        }

        match self.mode {
            Mode::Browse => return self.on_browse_key(key),
            Mode::Search => self.on_search_key(key),
            Mode::Detail => self.on_detail_key(key),
            Mode::PathPrompt(target) => self.on_prompt_key(key, target),
        }
        Flow::Continue
    }

    fn on_browse_key(&mut self, key: KeyEvent) -> Flow {
        match key.code {
            KeyCode::Char('q') => return Flow::Quit,
            KeyCode::Esc => {
                if self.query.is_empty() {
                    return Flow::Quit;
                }
                self.clear_search();
            }
            KeyCode::Char('/') => {
                self.mode = Mode::Search;
                self.cursor = 0;
            }
            KeyCode::Up | KeyCode::Char('k') => self.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => self.move_cursor(1),
            KeyCode::Home => self.cursor = 0,
            KeyCode::Enter => self.select_at_cursor(),
            KeyCode::Char('o') => self.open_prompt(LoadTarget::Results),
            KeyCode::Char('b') => self.open_prompt(LoadTarget::QuestionBank),
            KeyCode::Char('e') => {
                let _ = self.export();
            }
            _ => {}
        }
        Flow::Continue
    }

    fn on_search_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => {
                self.clear_search();
                self.mode = Mode::Browse;
            }
            KeyCode::Enter => {
                self.mode = Mode::Browse;
                if self.visible_indices().len() == 1 {
                    self.select_at_cursor();
                }
            }
            KeyCode::Backspace => {
                self.query.pop();
                self.cursor = 0;
            }
            KeyCode::Up => self.move_cursor(-1),
            KeyCode::Down => self.move_cursor(1),
            KeyCode::Char(c) => {
                self.query.push(c);
                self.cursor = 0;
            }
            _ => {}
        }
    }

    fn on_detail_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Left | KeyCode::Char('q') => {
                self.clear_selection();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.detail_scroll = self.detail_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.detail_scroll = self.detail_scroll.saturating_add(1);
            }
            KeyCode::PageUp => self.detail_scroll = self.detail_scroll.saturating_sub(10),
            KeyCode::PageDown => self.detail_scroll = self.detail_scroll.saturating_add(10),
            _ => {}
        }
    }

    fn on_prompt_key(&mut self, key: KeyEvent, target: LoadTarget) {
        match key.code {
            KeyCode::Esc => self.mode = Mode::Browse,
            KeyCode::Backspace => {
                self.path_input.pop();
            }
            KeyCode::Enter => {
                let input = self.path_input.trim().to_string();
                self.mode = Mode::Browse;
                if input.is_empty() {
                    return;
                }
                let path = PathBuf::from(input);
                info!("loading {target} from {}", path.display());
                let _ = match target {
                    LoadTarget::Results => self.load_results(&path),
                    LoadTarget::QuestionBank => self.load_bank(&path),
                };
            }
            KeyCode::Char(c) => self.path_input.push(c),
            _ => {}
        }
    }

    fn open_prompt(&mut self, target: LoadTarget) {
        let current = match target {
            LoadTarget::Results => &self.results_path,
            LoadTarget::QuestionBank => &self.bank_path,
        };
        self.path_input = current
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        self.mode = Mode::PathPrompt(target);
    }

    fn move_cursor(&mut self, delta: isize) {
        let len = self.visible_indices().len();
        if len == 0 {
            self.cursor = 0;
            return;
        }
        self.cursor = self.cursor.saturating_add_signed(delta).min(len - 1);
    }

    fn select_at_cursor(&mut self) {
        if let Some(&idx) = self.visible_indices().get(self.cursor) {
            self.selected = Some(idx);
            self.detail_scroll = 0;
            self.mode = Mode::Detail;
        }
    }

    fn set_status(&mut self, status: Status) {
        self.status = Some(status);
        self.status_ticks = STATUS_TICKS;
    }
}
