use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use itertools::Itertools;
use log::info;

use crate::error::{DivisionUndefined, QuizError};
use crate::question_bank::{Question, QuestionBank};
use crate::results::StudentResult;
use crate::util::{mean, round_tenths, std_dev};

pub const EXPORT_HEADER: [&str; 2] = ["name", "wronglyAnswered"];
pub const LABEL_SEPARATOR: &str = ", ";

/// Write one `name,wronglyAnswered` row per student, in list order.
pub fn write_wrong_answers<W: Write>(students: &[StudentResult], writer: W) -> csv::Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .terminator(csv::Terminator::CRLF)
        .from_writer(writer);

    writer.write_record(EXPORT_HEADER)?;
    for student in students {
        writer.write_record([
            student.name.as_str(),
            student.wrong_answers.join(LABEL_SEPARATOR).as_str(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

pub fn wrong_answers_export(students: &[StudentResult]) -> csv::Result<String> {
    let mut buf = Vec::new();
    write_wrong_answers(students, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

pub fn export_to_dir(
    students: &[StudentResult],
    dir: &Path,
    file_name: &str,
) -> Result<PathBuf, QuizError> {
    let path = dir.join(file_name);
    let export_err = |source: std::io::Error| QuizError::Export {
        path: path.clone(),
        source,
    };

    let csv = wrong_answers_export(students).map_err(|e| export_err(e.into()))?;
    fs::write(&path, csv).map_err(export_err)?;
    info!("exported {} rows to {}", students.len(), path.display());
    Ok(path)
}

/// Percentage of question columns answered correctly, to one decimal place.
pub fn score_percent(student: &StudentResult) -> Result<f64, DivisionUndefined> {
    let correct = student.correct_answers.len();
    let total = student.question_count();
    if total == 0 {
        return Err(DivisionUndefined);
    }
    Ok(round_tenths(correct as f64 / total as f64 * 100.0))
}

/// Score for display; blank when it is undefined.
pub fn format_score(student: &StudentResult) -> String {
    score_percent(student)
        .map(|pct| format!("{pct:.1}%"))
        .unwrap_or_default()
}

/// Indices of students whose name contains `query`, ignoring case. An empty query matches none.
pub fn search_indices(students: &[StudentResult], query: &str) -> Vec<usize> {
    if query.is_empty() {
        return Vec::new();
    }
    let needle = query.to_lowercase();
    students
        .iter()
        .enumerate()
        .filter(|(_, s)| s.name.to_lowercase().contains(&needle))
        .map(|(idx, _)| idx)
        .collect()
}

pub fn search_filter<'a>(students: &'a [StudentResult], query: &str) -> Vec<&'a StudentResult> {
    search_indices(students, query)
        .into_iter()
        .map(|idx| &students[idx])
        .collect()
}

pub fn question_lookup<'a>(bank: &'a QuestionBank, label: &str) -> Option<&'a Question> {
    label
        .trim()
        .parse::<u32>()
        .ok()
        .and_then(|number| bank.get(number))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClassSummary {
    pub students: usize,
    /// Students with a defined score.
    pub scored: usize,
    pub mean: Option<f64>,
    pub std_dev: Option<f64>,
}

pub fn class_summary(students: &[StudentResult]) -> ClassSummary {
    let scores: Vec<f64> = students
        .iter()
        .filter_map(|s| score_percent(s).ok())
        .collect();

    ClassSummary {
        students: students.len(),
        scored: scores.len(),
        mean: mean(&scores).map(round_tenths),
        std_dev: std_dev(&scores).map(round_tenths),
    }
}

/// Question labels by how many students got them wrong, most-missed first.
/// Ties keep the order the labels were first seen in.
pub fn miss_counts(students: &[StudentResult]) -> Vec<(String, usize)> {
    let mut order: Vec<&str> = Vec::new();
    let mut counts: HashMap<&str, usize> = HashMap::new();

    for label in students.iter().flat_map(|s| s.wrong_answers.iter()) {
        let count = counts.entry(label.as_str()).or_insert_with(|| {
            order.push(label.as_str());
            0
        });
        *count += 1;
    }

    order
        .into_iter()
        .map(|label| (label.to_string(), counts[label]))
        .sorted_by(|a, b| b.1.cmp(&a.1))
        .collect()
}
