use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::{debug, info};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::error::QuizError;

/// Max-score annotation at the end of a score column header, e.g. the ` /2.5` in `Q. 3 /2.5`.
static MAX_SCORE_SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r" /\d+(?:\.\d+)?$").expect("static regex"));

const QUESTION_PREFIX: &str = "Q. ";

/// A single cell of the results table, typed once when the row is read.
///
/// Numbers keep the field as written so identity columns like `007` survive untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number { value: f64, raw: String },
}

impl CellValue {
    pub fn from_field(field: &str) -> Self {
        let trimmed = field.trim();
        match trimmed.parse::<f64>() {
            Ok(value) if !trimmed.is_empty() && value.is_finite() => CellValue::Number {
                value,
                raw: field.to_string(),
            },
            _ => CellValue::Text(field.to_string()),
        }
    }

    /// `"0"`, `"0.00"` and `0` all count; blanks and text never do.
    pub fn is_zero(&self) -> bool {
        matches!(self, CellValue::Number { value, .. } if *value == 0.0)
    }

    pub fn as_text(&self) -> &str {
        match self {
            CellValue::Text(s) => s,
            CellValue::Number { raw, .. } => raw,
        }
    }
}

/// One student's row, columns kept in header order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoredRow {
    cells: Vec<(String, CellValue)>,
}

impl ScoredRow {
    pub fn new(cells: Vec<(String, CellValue)>) -> Self {
        Self { cells }
    }

    pub fn get(&self, column: &str) -> Option<&CellValue> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    pub fn columns(&self) -> impl Iterator<Item = &(String, CellValue)> {
        self.cells.iter()
    }

    /// Every column whose header contains a capital `Q`.
    ///
    /// This sweeps in non-question headers too; existing exports rely on it.
    pub fn question_columns(&self) -> impl Iterator<Item = &(String, CellValue)> {
        self.cells.iter().filter(|(name, _)| name.contains('Q'))
    }
}

/// Which headers hold the student's name.
#[derive(Debug, Clone, PartialEq)]
pub struct IdentityColumns {
    pub first_name: String,
    /// Checked in order; the first one present in the row wins.
    pub last_name: Vec<String>,
}

impl Default for IdentityColumns {
    fn default() -> Self {
        Self {
            first_name: "First name".to_string(),
            last_name: vec!["Surname".to_string(), "Last name".to_string()],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentResult {
    pub name: String,
    pub correct_answers: Vec<String>,
    pub wrong_answers: Vec<String>,
}

impl StudentResult {
    pub fn question_count(&self) -> usize {
        self.correct_answers.len() + self.wrong_answers.len()
    }
}

/// Strip the `Q. ` prefix and ` /<max>` suffix from a score column header.
pub fn question_label(header: &str) -> String {
    let without_prefix = header.strip_prefix(QUESTION_PREFIX).unwrap_or(header);
    MAX_SCORE_SUFFIX.replace(without_prefix, "").into_owned()
}

pub fn student_name(row: &ScoredRow, identity: &IdentityColumns) -> String {
    let first = row.get(&identity.first_name);
    let last = identity.last_name.iter().find_map(|col| row.get(col));

    [first, last]
        .into_iter()
        .flatten()
        .map(|value| value.as_text().trim())
        .filter(|part| !part.is_empty())
        .collect::<Vec<&str>>()
        .join(" ")
}

pub fn student_result(row: &ScoredRow, identity: &IdentityColumns) -> StudentResult {
    let mut result = StudentResult {
        name: student_name(row, identity),
        ..Default::default()
    };

    for (header, value) in row.question_columns() {
        let label = question_label(header);
        if value.is_zero() {
            result.wrong_answers.push(label);
        } else {
            result.correct_answers.push(label);
        }
    }

    result
}

/// Read the table into typed rows. The first record is the header; blank rows are skipped.
pub fn read_rows<R: Read>(reader: R) -> Result<Vec<ScoredRow>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let cells = headers
            .iter()
            .zip(record.iter())
            .map(|(header, field)| (header.clone(), CellValue::from_field(field)))
            .collect();
        rows.push(ScoredRow::new(cells));
    }

    Ok(rows)
}

pub fn parse_results<R: Read>(
    reader: R,
    identity: &IdentityColumns,
) -> Result<Vec<StudentResult>, csv::Error> {
    let rows = read_rows(reader)?;
    debug!("read {} result rows", rows.len());
    Ok(rows.iter().map(|row| student_result(row, identity)).collect())
}

pub fn load_results(
    path: &Path,
    identity: &IdentityColumns,
) -> Result<Vec<StudentResult>, QuizError> {
    let file = File::open(path).map_err(|e| QuizError::file_read(path, e))?;
    let students = parse_results(file, identity).map_err(|e| QuizError::table_parse(path, e))?;
    info!(
        "loaded {} students from {}",
        students.len(),
        path.display()
    );
    Ok(students)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(csv: &str) -> Vec<StudentResult> {
        parse_results(csv.as_bytes(), &IdentityColumns::default()).unwrap()
    }

    #[test]
    fn zero_scores_are_wrong_answers() {
        let students = parse("First name,Surname,Q. 1 /1,Q. 2 /1\nAnn,Lee,0,1\n");
        assert_eq!(
            students,
            vec![StudentResult {
                name: "Ann Lee".into(),
                correct_answers: vec!["2".into()],
                wrong_answers: vec!["1".into()],
            }]
        );
    }

    #[test]
    fn labels_keep_column_order() {
        let students = parse("First name,Surname,Q. 3 /2.5,Q. 1 /1,Q. 2 /1\nA,B,0,0,1\n");
        assert_eq!(students[0].wrong_answers, vec!["3", "1"]);
        assert_eq!(students[0].correct_answers, vec!["2"]);
    }

    #[test]
    fn question_label_strips_decoration() {
        assert_eq!(question_label("Q. 3 /2.5"), "3");
        assert_eq!(question_label("Q. 12 /10"), "12");
        assert_eq!(question_label("Q. 4"), "4");
        assert_eq!(question_label("Quiz total /10"), "Quiz total");
        assert_eq!(question_label("Q7"), "Q7");
    }

    #[test]
    fn any_header_with_capital_q_is_a_question() {
        let students = parse("First name,Surname,Quality,question,Q. 1 /1\nA,B,0,0,5\n");
        assert_eq!(students[0].wrong_answers, vec!["Quality"]);
        assert_eq!(students[0].correct_answers, vec!["1"]);
    }

    #[test]
    fn blank_and_text_values_count_as_correct() {
        let students = parse("First name,Surname,Q. 1 /1,Q. 2 /1,Q. 3 /1,Q. 4 /1\nA,B,,-,0.00, 0 \n");
        assert_eq!(students[0].correct_answers, vec!["1", "2"]);
        assert_eq!(students[0].wrong_answers, vec!["3", "4"]);
    }

    #[test]
    fn answers_partition_question_columns() {
        let csv = "First name,Surname,Q. 1 /1,Q. 2 /1,Q. 3 /1\nA,B,0,1,0\nC,D,1,1,1\nE,F,0,0,0\n";
        for student in parse(csv) {
            assert_eq!(student.question_count(), 3);
            assert!(student
                .correct_answers
                .iter()
                .all(|label| !student.wrong_answers.contains(label)));
        }
    }

    #[test]
    fn missing_identity_never_leaks_undefined() {
        let students = parse("First name,Q. 1 /1\nAnn,0\n");
        assert_eq!(students[0].name, "Ann");

        let students = parse("Email,Q. 1 /1\nx@y.z,1\n");
        assert_eq!(students[0].name, "");
    }

    #[test]
    fn numeric_looking_names_keep_their_text() {
        let students = parse("First name,Surname,Q. 1 /1\n007,1e3,0\n");
        assert_eq!(students[0].name, "007 1e3");
        assert_eq!(students[0].wrong_answers, vec!["1"]);
        assert_eq!(
            crate::view::wrong_answers_export(&students).unwrap(),
            "name,wronglyAnswered\r\n007 1e3,1\r\n"
        );
    }

    #[test]
    fn last_name_falls_back_to_alternative_header() {
        let students = parse("First name,Last name,Q. 1 /1\n Ann , Lee ,1\n");
        assert_eq!(students[0].name, "Ann Lee");
    }

    #[test]
    fn empty_rows_are_skipped() {
        let students = parse("First name,Surname,Q. 1 /1\n\nAnn,Lee,1\n,,\nBob,Ray,0\n");
        assert_eq!(students.len(), 2);
        assert_eq!(students[1].name, "Bob Ray");
    }

    #[test]
    fn short_rows_are_best_effort() {
        let students = parse("First name,Surname,Q. 1 /1,Q. 2 /1\nAnn,Lee,0\n");
        assert_eq!(students[0].wrong_answers, vec!["1"]);
        assert!(students[0].correct_answers.is_empty());
    }

    #[test]
    fn byte_order_mark_is_dropped_from_header() {
        let students = parse("\u{feff}First name,Surname,Q. 1 /1\nAnn,Lee,1\n");
        assert_eq!(students[0].name, "Ann Lee");
    }

    #[test]
    fn invalid_utf8_is_a_table_error() {
        let bytes: &[u8] = b"First name,Surname\n\xff\xfe,Lee\n";
        assert!(parse_results(bytes, &IdentityColumns::default()).is_err());
    }

    #[test]
    fn cell_value_typing() {
        assert_eq!(
            CellValue::from_field("0"),
            CellValue::Number {
                value: 0.0,
                raw: "0".into()
            }
        );
        assert_eq!(
            CellValue::from_field(" 2.5 "),
            CellValue::Number {
                value: 2.5,
                raw: " 2.5 ".into()
            }
        );
        assert_eq!(CellValue::from_field("007").as_text(), "007");
        assert_eq!(CellValue::from_field(""), CellValue::Text(String::new()));
        assert_eq!(CellValue::from_field("NaN"), CellValue::Text("NaN".into()));
        assert!(!CellValue::from_field("-").is_zero());
    }
}
