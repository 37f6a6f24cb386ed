use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use quizreview::app::App;
use quizreview::question_bank::QuestionBank;
use quizreview::results::StudentResult;
use quizreview::view::{format_score, question_lookup, LABEL_SEPARATOR};

/// Lines for one student's detail view. Labels the bank doesn't know are shown bare.
pub fn detail_lines(student: &StudentResult, bank: Option<&QuestionBank>) -> Vec<Line<'static>> {
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = Vec::new();

    let score = format_score(student);
    lines.push(Line::from(vec![
        Span::styled("Score: ", bold),
        Span::raw(if score.is_empty() { "n/a".to_string() } else { score }),
        Span::raw(format!(
            "   ({} correct, {} wrong)",
            student.correct_answers.len(),
            student.wrong_answers.len()
        )),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Correct: ", Style::default().patch(bold).fg(Color::Green)),
        Span::raw(student.correct_answers.join(LABEL_SEPARATOR)),
    ]));
    lines.push(Line::default());

    if student.wrong_answers.is_empty() {
        lines.push(Line::from(Span::styled(
            "No wrong answers.",
            Style::default().fg(Color::Green),
        )));
        return lines;
    }

    for label in &student.wrong_answers {
        let question = bank.and_then(|b| question_lookup(b, label));
        let Some(question) = question else {
            lines.push(Line::from(Span::styled(
                format!("Question {label}"),
                Style::default().patch(bold).fg(Color::Red),
            )));
            continue;
        };

        lines.push(Line::from(vec![
            Span::styled(
                format!("Question {label}: "),
                Style::default().patch(bold).fg(Color::Red),
            ),
            Span::raw(question.text.clone()),
        ]));
        for option in &question.options {
            let is_key = !question.correct_answer.is_empty()
                && option.starts_with(question.correct_answer.as_str());
            let style = if is_key {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            lines.push(Line::from(Span::styled(format!("    {option}"), style)));
        }
        if !question.correct_answer.is_empty() {
            lines.push(Line::from(Span::styled(
                format!("    Answer: {}", question.correct_answer),
                Style::default().add_modifier(Modifier::ITALIC),
            )));
        }
        lines.push(Line::default());
    }

    lines
}

pub fn render_detail(app: &mut App, f: &mut Frame, area: Rect) {
    let Some(student) = app.selected_student() else {
        let none = Paragraph::new("No student selected.")
            .block(Block::default().borders(Borders::ALL))
            .alignment(Alignment::Center);
        f.render_widget(none, area);
        return;
    };

    let lines = detail_lines(student, app.bank.as_ref());
    let title = if student.name.is_empty() {
        "(no name)".to_string()
    } else {
        student.name.clone()
    };

    let limit = max_scroll(lines.len(), area.height);
    if app.detail_scroll > limit {
        app.detail_scroll = limit;
    }

    let detail = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .wrap(Wrap { trim: false })
        .scroll((app.detail_scroll, 0));
    f.render_widget(detail, area);
}

/// Last scroll offset that still fills a bordered pane `height` rows tall.
fn max_scroll(line_count: usize, height: u16) -> u16 {
    u16::try_from(line_count)
        .unwrap_or(u16::MAX)
        .saturating_sub(height.saturating_sub(2))
}
