pub mod detail;
pub mod screen;
pub mod student_table;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use quizreview::app::{App, Mode, Status};

use self::screen::current_screen;

pub fn draw(app: &mut App, f: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(0),    // Screen body
            Constraint::Length(1), // Prompt / status
            Constraint::Length(1), // Key hints
        ])
        .split(f.area());

    render_title(app, f, chunks[0]);
    current_screen(&app.mode).render(app, f, chunks[1]);
    render_status(app, f, chunks[2]);
    render_hints(app, f, chunks[3]);
}

fn render_title(app: &App, f: &mut Frame, area: Rect) {
    let describe = |path: &Option<std::path::PathBuf>| {
        path.as_ref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "none".to_string())
    };

    let bank = match &app.bank {
        Some(bank) => format!("{} ({} questions)", describe(&app.bank_path), bank.len()),
        None => "none".to_string(),
    };

    let title = Paragraph::new(format!(
        "Results: {}  |  Question bank: {}",
        describe(&app.results_path),
        bank
    ))
    .block(Block::default().borders(Borders::ALL).title("quizreview"))
    .style(
        Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD),
    )
    .alignment(Alignment::Center);
    f.render_widget(title, area);
}

fn render_status(app: &App, f: &mut Frame, area: Rect) {
    let line = match (&app.mode, &app.status) {
        (Mode::PathPrompt(target), _) => Line::from(vec![
            Span::styled(
                format!("Open {target}: "),
                Style::default().fg(Color::Yellow),
            ),
            Span::raw(app.path_input.as_str()),
            Span::styled("█", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
        (Mode::Search, _) => Line::from(vec![
            Span::styled("Search: ", Style::default().fg(Color::Yellow)),
            Span::raw(app.query.as_str()),
            Span::styled("█", Style::default().add_modifier(Modifier::SLOW_BLINK)),
        ]),
        (_, Some(Status::Error(msg))) => {
            Line::from(Span::styled(msg.as_str(), Style::default().fg(Color::Red)))
        }
        (_, Some(Status::Info(msg))) => {
            Line::from(Span::styled(msg.as_str(), Style::default().fg(Color::Green)))
        }
        (_, None) if !app.query.is_empty() => Line::from(Span::styled(
            format!("Filter: {}", app.query),
            Style::default().fg(Color::Gray),
        )),
        (_, None) => Line::default(),
    };
    f.render_widget(Paragraph::new(line), area);
}

fn render_hints(app: &App, f: &mut Frame, area: Rect) {
    let hints = match app.mode {
        Mode::Browse => "(/)search (enter)open ↑/↓ (o)pen results (b)ank (e)xport (q)uit",
        Mode::Search => "type to search | (enter)done (esc)clear",
        Mode::Detail => "↑/↓ PgUp/PgDn scroll | (esc)back",
        Mode::PathPrompt(_) => "(enter)load (esc)cancel",
    };
    let hints = Paragraph::new(hints)
        .style(Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC))
        .alignment(Alignment::Center);
    f.render_widget(hints, area);
}
