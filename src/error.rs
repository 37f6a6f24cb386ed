use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Failures local to a single load or export attempt.
///
/// None of these are fatal: the caller reports them and keeps whatever state it had.
#[derive(Debug, Error)]
pub enum QuizError {
    #[error("could not parse results table {}: {source}", path.display())]
    TableParse {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("could not read {}: {source}", path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("could not write export {}: {source}", path.display())]
    Export {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl QuizError {
    pub fn table_parse(path: impl Into<PathBuf>, source: csv::Error) -> Self {
        Self::TableParse {
            path: path.into(),
            source,
        }
    }

    pub fn file_read(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }
}

/// A score percentage was asked for a student with no question columns at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("score is undefined without any scored questions")]
pub struct DivisionUndefined;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_read_message_names_path() {
        let err = QuizError::file_read(
            "bank.txt",
            io::Error::new(io::ErrorKind::NotFound, "missing"),
        );
        assert_eq!(err.to_string(), "could not read bank.txt: missing");
    }
}
