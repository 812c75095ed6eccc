//! Session export to JSON, saved after every turn so a crash loses nothing.

use crate::state::TurnRecord;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The on-disk session document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExport {
    pub participant_name: String,
    pub started_at: DateTime<Utc>,
    pub turns: Vec<TurnRecord>,
    /// Rendered final report text, set once at session end.
    #[serde(default)]
    pub final_report: Option<String>,
}

/// Writes the session document to `<dir>/interview_log_<timestamp>.json`,
/// rewriting the whole file on every append.
#[derive(Debug)]
pub struct SessionLogger {
    path: PathBuf,
    export: SessionExport,
}

impl SessionLogger {
    /// Creates the log directory and the session document.
    pub fn start(dir: &Path, participant_name: &str) -> io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        let started_at = Utc::now();
        let filename = format!("interview_log_{}.json", started_at.format("%Y%m%d_%H%M%S"));
        let path = dir.join(filename);
        debug!(path = %path.display(), "Session log started");
        Ok(Self {
            path,
            export: SessionExport {
                participant_name: participant_name.to_string(),
                started_at,
                turns: Vec::new(),
                final_report: None,
            },
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one turn record and persists. A write failure is logged but
    /// never interrupts the session.
    pub fn log_turn(&mut self, record: TurnRecord) {
        self.export.turns.push(record);
        self.save();
    }

    /// Attaches the rendered final report and persists.
    pub fn log_final_report(&mut self, report_text: &str) {
        self.export.final_report = Some(report_text.to_string());
        self.save();
    }

    fn save(&self) {
        let json = match serde_json::to_string_pretty(&self.export) {
            Ok(json) => json,
            Err(err) => {
                warn!(error = %err, "Failed to serialize session log");
                return;
            }
        };
        if let Err(err) = std::fs::write(&self.path, json) {
            warn!(path = %self.path.display(), error = %err, "Failed to write session log");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(turn_id: u32) -> TurnRecord {
        TurnRecord {
            turn_id,
            agent_visible_message: format!("question {turn_id}"),
            user_message: format!("answer {turn_id}"),
            internal_thoughts: "[classifier] answer".to_string(),
        }
    }

    #[test]
    fn test_export_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut logger = SessionLogger::start(dir.path(), "Alex").unwrap();
        logger.log_turn(record(1));
        logger.log_turn(record(2));
        logger.log_final_report("verdict text");

        let content = std::fs::read_to_string(logger.path()).unwrap();
        let export: SessionExport = serde_json::from_str(&content).unwrap();
        assert_eq!(export.participant_name, "Alex");
        assert_eq!(export.turns.len(), 2);
        assert_eq!(export.turns[1], record(2));
        assert_eq!(export.final_report.as_deref(), Some("verdict text"));
    }

    #[test]
    fn test_log_saved_after_every_turn() {
        let dir = tempfile::tempdir().unwrap();
        let mut logger = SessionLogger::start(dir.path(), "Alex").unwrap();
        logger.log_turn(record(1));

        // On-disk document already holds the turn, before any final report.
        let content = std::fs::read_to_string(logger.path()).unwrap();
        let export: SessionExport = serde_json::from_str(&content).unwrap();
        assert_eq!(export.turns.len(), 1);
        assert!(export.final_report.is_none());
    }

    #[test]
    fn test_creates_log_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("logs");
        let logger = SessionLogger::start(&nested, "Alex").unwrap();
        assert!(logger.path().starts_with(&nested));
        assert!(nested.is_dir());
    }
}
