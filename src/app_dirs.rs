use directories::ProjectDirs;
use std::path::PathBuf;

/// Centralized application directory resolution
pub struct AppDirs;

impl AppDirs {
    /// Where the TUI sends its log output while it owns the terminal.
    pub fn log_path() -> Option<PathBuf> {
        if let Ok(home) = std::env::var("HOME") {
            let state_dir = PathBuf::from(home)
                .join(".local")
                .join("state")
                .join("quizreview");
            Some(state_dir.join("quizreview.log"))
        } else {
            ProjectDirs::from("", "", "quizreview")
                .map(|proj_dirs| proj_dirs.data_local_dir().join("quizreview.log"))
        }
    }
}
