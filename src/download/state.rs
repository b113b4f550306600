//! Session-wide statistics.

use crate::download::DownloadReport;

/// Totals across every target processed in one run.
#[derive(Debug, Default)]
pub struct SessionStats {
    pub targets_processed: u64,
    pub targets_failed: u64,
    pub from_archive: u64,
    pub keys_injected: u64,
    pub registrations_appended: u64,
    pub warnings: u64,
}

impl SessionStats {
    /// Add a finished target.
    pub fn record(&mut self, report: &DownloadReport) {
        self.targets_processed += 1;
        if matches!(report.origin, crate::fetch::PayloadOrigin::Archive { .. }) {
            self.from_archive += 1;
        }
        if report.keyed > 0 {
            self.keys_injected += 1;
        }
        self.registrations_appended += report.appended() as u64;
        self.warnings += report.warnings.len() as u64;
    }

    /// Mark a target as failed.
    pub fn mark_failed(&mut self) {
        self.targets_failed += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dlc::ExpansionOutcome;
    use crate::download::Stage;
    use crate::fetch::PayloadOrigin;

    #[test]
    fn test_record_accumulates() {
        let mut report = DownloadReport {
            id: "440".to_string(),
            origin: PayloadOrigin::Archive {
                url: "https://archive.test/440.zip".to_string(),
                attempts: 2,
            },
            path: "440.lua".into(),
            bytes: 10,
            commented: 1,
            keyed: 1,
            expansion: Some(ExpansionOutcome::Appended(vec!["20".into(), "30".into()])),
            warnings: Vec::new(),
            elapsed: Default::default(),
        };
        report.warn(Stage::KeyMap, "unreachable");

        let mut stats = SessionStats::default();
        stats.record(&report);
        stats.mark_failed();

        assert_eq!(stats.targets_processed, 1);
        assert_eq!(stats.targets_failed, 1);
        assert_eq!(stats.from_archive, 1);
        assert_eq!(stats.keys_injected, 1);
        assert_eq!(stats.registrations_appended, 2);
        assert_eq!(stats.warnings, 1);
    }
}
