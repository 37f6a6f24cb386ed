//! Reader for Aiken-style question banks.
//!
//! ```text
//! What is 2+2?
//! A) 3
//! B) 4
//! ANSWER: B
//! ```
//!
//! Questions are numbered 1, 2, 3, … in the order they are committed. An entry that reaches
//! an `ANSWER:` line or the end of input without any options is dropped and does not take a
//! number, so numbering can drift from whatever the author intended.
//!
//! Option and `ANSWER:` markers must start in the first column; an indented `  A)` is body
//! text. Only trailing whitespace is stripped before matching, so options are stored as written.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use log::{debug, info};
use serde::Serialize;

use crate::error::QuizError;

const ANSWER_PREFIX: &str = "ANSWER:";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub number: u32,
    pub text: String,
    pub options: Vec<String>,
    /// Empty when the entry had no `ANSWER:` line.
    pub correct_answer: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuestionBank {
    questions: BTreeMap<u32, Question>,
}

impl QuestionBank {
    pub fn get(&self, number: u32) -> Option<&Question> {
        self.questions.get(&number)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.values()
    }

    fn insert(&mut self, question: Question) {
        self.questions.insert(question.number, question);
    }
}

/// `A)` through `E)` at the very start of the line.
fn is_option_line(line: &str) -> bool {
    let mut chars = line.chars();
    matches!(
        (chars.next(), chars.next()),
        (Some('A'..='E'), Some(')'))
    )
}

fn answer_value(line: &str) -> Option<&str> {
    line.strip_prefix(ANSWER_PREFIX).map(str::trim)
}

#[derive(Debug)]
enum ScanState {
    SeekingBody { body: Vec<String> },
    CollectingOptions { body: Vec<String>, options: Vec<String> },
}

impl Default for ScanState {
    fn default() -> Self {
        ScanState::SeekingBody { body: Vec::new() }
    }
}

/// Single left-to-right pass over the non-blank lines of a bank.
#[derive(Debug, Default)]
struct Scanner {
    state: ScanState,
    bank: QuestionBank,
    next_number: u32,
    dropped: usize,
}

impl Scanner {
    fn new() -> Self {
        Self {
            next_number: 1,
            ..Default::default()
        }
    }

    fn feed(&mut self, line: &str) {
        let state = std::mem::take(&mut self.state);
        self.state = match state {
            ScanState::SeekingBody { body } => {
                if is_option_line(line) {
                    ScanState::CollectingOptions {
                        body,
                        options: vec![line.to_string()],
                    }
                } else if answer_value(line).is_some() {
                    self.drop_entry(&body, "answer before any option");
                    ScanState::default()
                } else {
                    let mut body = body;
                    body.push(line.trim_start().to_string());
                    ScanState::SeekingBody { body }
                }
            }
            ScanState::CollectingOptions { body, mut options } => {
                if is_option_line(line) {
                    options.push(line.to_string());
                    ScanState::CollectingOptions { body, options }
                } else if let Some(answer) = answer_value(line) {
                    self.commit(body, options, answer.to_string());
                    ScanState::default()
                } else {
                    self.commit(body, options, String::new());
                    ScanState::SeekingBody {
                        body: vec![line.trim_start().to_string()],
                    }
                }
            }
        };
    }

    fn finish(mut self) -> (QuestionBank, usize) {
        match std::mem::take(&mut self.state) {
            ScanState::SeekingBody { body } => {
                if !body.is_empty() {
                    self.drop_entry(&body, "end of input before any option");
                }
            }
            ScanState::CollectingOptions { body, options } => {
                self.commit(body, options, String::new());
            }
        }
        (self.bank, self.dropped)
    }

    fn commit(&mut self, body: Vec<String>, options: Vec<String>, correct_answer: String) {
        let text = body.join(" ");
        if text.is_empty() || options.is_empty() {
            self.drop_entry(&body, "missing body text");
            return;
        }

        self.bank.insert(Question {
            number: self.next_number,
            text,
            options,
            correct_answer,
        });
        self.next_number += 1;
    }

    fn drop_entry(&mut self, body: &[String], reason: &str) {
        self.dropped += 1;
        debug!("dropping question entry ({reason}): {:?}", body.join(" "));
    }
}

pub fn parse_question_bank(text: &str) -> QuestionBank {
    let mut scanner = Scanner::new();
    text.lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .for_each(|line| scanner.feed(line));

    let (bank, dropped) = scanner.finish();
    if dropped > 0 {
        debug!("{dropped} question entries dropped while scanning");
    }
    bank
}

pub fn load_question_bank(path: &Path) -> Result<QuestionBank, QuizError> {
    let text = fs::read_to_string(path).map_err(|e| QuizError::file_read(path, e))?;
    let bank = parse_question_bank(&text);
    info!("loaded {} questions from {}", bank.len(), path.display());
    Ok(bank)
}
