use ratatui::{layout::Rect, Frame};

use quizreview::app::{App, Mode};

use crate::ui::{detail::render_detail, student_table::render_student_list};

/// A UI Screen boundary: responsible for rendering the body area for one mode
pub trait Screen {
    fn render(&self, app: &mut App, f: &mut Frame, area: Rect);
}

/// Student list, also shown underneath the search and path prompts
pub struct ListScreen;

impl Screen for ListScreen {
    fn render(&self, app: &mut App, f: &mut Frame, area: Rect) {
        render_student_list(app, f, area);
    }
}

/// One student's wrong answers with question bank content
pub struct DetailScreen;

impl Screen for DetailScreen {
    fn render(&self, app: &mut App, f: &mut Frame, area: Rect) {
        render_detail(app, f, area);
    }
}

/// Helper to construct the appropriate screen for the current mode
pub fn current_screen(mode: &Mode) -> Box<dyn Screen> {
    match mode {
        Mode::Browse | Mode::Search | Mode::PathPrompt(_) => Box::new(ListScreen),
        Mode::Detail => Box::new(DetailScreen),
    }
}
