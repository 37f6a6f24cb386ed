use std::fs;
use std::path::PathBuf;

use quizreview::config::Config;
use quizreview::question_bank::load_question_bank;
use quizreview::results::load_results;
use quizreview::view::{
    miss_counts, question_lookup, score_percent, search_filter, wrong_answers_export,
    LABEL_SEPARATOR,
};
use quizreview::DivisionUndefined;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

#[test]
fn moodle_style_export_is_parsed() {
    let students = load_results(&fixture("results.csv"), &Config::default().identity_columns())
        .unwrap();

    let names: Vec<&str> = students.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Ann Lee", "Bob Ray", "Cara O'Neil, Jr", "Overall average"]
    );

    assert_eq!(students[0].wrong_answers, vec!["1", "4"]);
    assert_eq!(students[0].correct_answers, vec!["2", "3"]);
    assert!(students[1].wrong_answers.is_empty());
    assert_eq!(students[2].wrong_answers, vec!["1", "2", "3", "4"]);

    for student in &students {
        assert_eq!(student.question_count(), 4);
    }
}

#[test]
fn scores_follow_the_binary_policy() {
    let students = load_results(&fixture("results.csv"), &Config::default().identity_columns())
        .unwrap();
    assert_eq!(score_percent(&students[0]), Ok(50.0));
    assert_eq!(score_percent(&students[1]), Ok(100.0));
    assert_eq!(score_percent(&students[2]), Ok(0.0));
}

#[test]
fn export_matches_the_download_format() {
    let students = load_results(&fixture("results.csv"), &Config::default().identity_columns())
        .unwrap();
    let csv = wrong_answers_export(&students).unwrap();
    assert_eq!(
        csv,
        "name,wronglyAnswered\r\n\
         Ann Lee,\"1, 4\"\r\n\
         Bob Ray,\r\n\
         \"Cara O'Neil, Jr\",\"1, 2, 3, 4\"\r\n\
         Overall average,\r\n"
    );

    let mut reader = csv::Reader::from_reader(csv.as_bytes());
    let cara = reader.records().nth(2).unwrap().unwrap();
    assert_eq!(
        cara[1].split(LABEL_SEPARATOR).collect::<Vec<_>>(),
        vec!["1", "2", "3", "4"]
    );
}

#[test]
fn bank_enriches_wrong_answers() {
    let bank = load_question_bank(&fixture("bank.txt")).unwrap();
    assert_eq!(bank.len(), 4);

    let q2 = question_lookup(&bank, "2").unwrap();
    assert_eq!(q2.text, "Which planet is closest to the sun?");
    assert_eq!(q2.options, vec!["A) Venus", "B) Mercury", "C) Mars"]);
    assert_eq!(q2.correct_answer, "B");

    // the entry without options takes no number
    assert_eq!(question_lookup(&bank, "3").unwrap().text, "Pick the prime.");
    assert_eq!(question_lookup(&bank, "4").unwrap().text, "Name the largest ocean.");
    assert!(question_lookup(&bank, "5").is_none());
}

#[test]
fn search_and_miss_counts_over_loaded_results() {
    let students = load_results(&fixture("results.csv"), &Config::default().identity_columns())
        .unwrap();

    let hits = search_filter(&students, "o'neil");
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "Cara O'Neil, Jr");

    let counts = miss_counts(&students);
    assert_eq!(counts[0], ("1".to_string(), 2));
    assert_eq!(counts[1], ("4".to_string(), 2));
}

#[test]
fn configured_identity_columns_are_used() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.csv");
    fs::write(&path, "Given,Family,Q. 1 /1\nAnn,Lee,0\n").unwrap();

    let config = Config {
        first_name_column: "Given".into(),
        last_name_columns: vec!["Family".into()],
        ..Config::default()
    };
    let students = load_results(&path, &config.identity_columns()).unwrap();
    assert_eq!(students[0].name, "Ann Lee");
}

#[test]
fn student_without_questions_has_no_score() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("results.csv");
    fs::write(&path, "First name,Surname\nAnn,Lee\n").unwrap();

    let students = load_results(&path, &Config::default().identity_columns()).unwrap();
    assert_eq!(score_percent(&students[0]), Err(DivisionUndefined));
}
