// Library surface for headless/integration tests and reuse.
// Parsers and derived views are pure; `app` holds the UI state the binary renders.
pub mod app;
pub mod app_dirs;
pub mod config;
pub mod error;
pub mod question_bank;
pub mod results;
pub mod runtime;
pub mod util;
pub mod view;

pub use error::{DivisionUndefined, QuizError};
pub use question_bank::{parse_question_bank, Question, QuestionBank};
pub use results::{parse_results, StudentResult};
