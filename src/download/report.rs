//! Per-target download report.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use crate::dlc::ExpansionOutcome;
use crate::fetch::PayloadOrigin;

/// Pipeline stage whose failure does not abort the save.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    KeyMap,
    KeyInjection,
    Expansion,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Stage::KeyMap => "key map",
            Stage::KeyInjection => "key injection",
            Stage::Expansion => "supplementary content",
        })
    }
}

/// A downgraded stage failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageWarning {
    pub stage: Stage,
    pub message: String,
}

impl fmt::Display for StageWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.stage, self.message)
    }
}

/// Everything that happened while producing one script.
#[derive(Debug, Clone)]
pub struct DownloadReport {
    pub id: String,
    pub origin: PayloadOrigin,
    /// Where the script was written.
    pub path: PathBuf,
    /// Size of the saved script.
    pub bytes: usize,
    /// Directive lines commented out.
    pub commented: usize,
    /// Registration calls rewritten with a key.
    pub keyed: usize,
    /// `None` when expansion was disabled or failed.
    pub expansion: Option<ExpansionOutcome>,
    pub warnings: Vec<StageWarning>,
    pub elapsed: Duration,
}

impl DownloadReport {
    pub(crate) fn warn(&mut self, stage: Stage, message: impl fmt::Display) {
        let warning = StageWarning {
            stage,
            message: message.to_string(),
        };
        tracing::warn!("{}", warning);
        self.warnings.push(warning);
    }

    /// Registrations appended by expansion.
    pub fn appended(&self) -> usize {
        self.expansion
            .as_ref()
            .map(ExpansionOutcome::appended)
            .unwrap_or(0)
    }
}
