use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use quizreview::app::{App, Mode};
use quizreview::results::StudentResult;
use quizreview::view::{class_summary, miss_counts, score_percent, LABEL_SEPARATOR};

const MIN_NAME_WIDTH: u16 = 12;
const MAX_NAME_WIDTH: u16 = 40;
const MOST_MISSED_SHOWN: usize = 5;

pub struct StudentRowData<'a> {
    pub name: &'a str,
    pub score: Option<f64>,
    pub wrong: &'a [String],
}

impl<'a> From<&'a StudentResult> for StudentRowData<'a> {
    fn from(student: &'a StudentResult) -> Self {
        Self {
            name: &student.name,
            score: score_percent(student).ok(),
            wrong: &student.wrong_answers,
        }
    }
}

/// Pure presenter for a single student row
pub fn present_row(data: &StudentRowData) -> Row<'static> {
    let score_color = match data.score {
        Some(s) if s >= 80.0 => Color::Green,
        Some(s) if s >= 50.0 => Color::Yellow,
        Some(_) => Color::Red,
        None => Color::Gray,
    };
    let score_display = data.score.map(|s| format!("{s:.1}%")).unwrap_or_default();

    let name_display = if data.name.is_empty() {
        "(no name)".to_string()
    } else {
        data.name.to_string()
    };

    Row::new(vec![
        Cell::from(name_display),
        Cell::from(score_display).style(Style::default().fg(score_color)),
        Cell::from(data.wrong.join(LABEL_SEPARATOR)),
    ])
}

fn name_column_width(students: &[StudentResult], visible: &[usize]) -> u16 {
    let widest = visible
        .iter()
        .map(|&idx| students[idx].name.width())
        .max()
        .unwrap_or(0);
    widest.clamp(MIN_NAME_WIDTH.into(), MAX_NAME_WIDTH.into()) as u16
}

fn summary_text(students: &[StudentResult]) -> String {
    let summary = class_summary(students);
    let average = match (summary.mean, summary.std_dev) {
        (Some(mean), Some(sd)) => format!("avg {mean:.1}% (sd {sd:.1})"),
        _ => "avg n/a".to_string(),
    };
    let most_missed = miss_counts(students)
        .into_iter()
        .take(MOST_MISSED_SHOWN)
        .map(|(label, count)| format!("{label}×{count}"))
        .collect::<Vec<_>>()
        .join("  ");

    format!(
        "{} students, {average}  |  most missed: {}",
        summary.students,
        if most_missed.is_empty() { "none" } else { most_missed.as_str() }
    )
}

pub fn render_student_list(app: &mut App, f: &mut Frame, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    if app.students.is_empty() {
        let empty = Paragraph::new(
            "No results loaded.\nPress (o) and enter the path of a quiz results CSV.",
        )
        .block(Block::default().borders(Borders::ALL).title("Students"))
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center);
        f.render_widget(empty, area);
        return;
    }

    let summary = Paragraph::new(summary_text(&app.students))
        .block(Block::default().borders(Borders::ALL).title("Class"))
        .alignment(Alignment::Center);
    f.render_widget(summary, chunks[0]);

    let visible = app.visible_indices();
    if app.cursor >= visible.len() {
        app.cursor = visible.len().saturating_sub(1);
    }

    let header = Row::new(vec![
        Cell::from("Name"),
        Cell::from("Score"),
        Cell::from("Wrongly answered"),
    ])
    .style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = visible
        .iter()
        .map(|&idx| present_row(&StudentRowData::from(&app.students[idx])))
        .collect();

    let title = match app.mode {
        Mode::Search if app.query.is_empty() => "Students (type to search)".to_string(),
        _ if !app.query.is_empty() => {
            format!("Students matching \"{}\" ({})", app.query, visible.len())
        }
        _ => format!("Students ({})", visible.len()),
    };

    let table = Table::new(
        rows,
        [
            Constraint::Length(name_column_width(&app.students, &visible) + 2),
            Constraint::Length(8),
            Constraint::Min(10),
        ],
    )
    .header(header)
    .block(Block::default().borders(Borders::ALL).title(title))
    .row_highlight_style(Style::default().bg(Color::DarkGray));

    let mut state = TableState::default().with_selected(if visible.is_empty() {
        None
    } else {
        Some(app.cursor)
    });
    f.render_stateful_widget(table, chunks[1], &mut state);
}
