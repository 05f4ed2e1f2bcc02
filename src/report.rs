//! End-of-run summary of which languages and actors had partial or failed data.

use std::fmt;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Status {
    Complete,
    Partial,
    Failed,
}

impl Status {
    pub fn label(&self) -> &'static str {
        match self {
            Status::Complete => "complete",
            Status::Partial => "partial",
            Status::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportEntry {
    pub subject: String,
    pub status: Status,
    pub notes: Vec<String>,
}

/// Outcome of one command over many records, in processing order.
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    title: String,
    entries: Vec<ReportEntry>,
}

impl RunReport {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            entries: Vec::new(),
        }
    }

    fn entry_mut(&mut self, subject: &str) -> &mut ReportEntry {
        match self.entries.iter().position(|e| e.subject == subject) {
            Some(index) => &mut self.entries[index],
            None => {
                self.entries.push(ReportEntry {
                    subject: subject.to_string(),
                    status: Status::Complete,
                    notes: Vec::new(),
                });
                let last = self.entries.len() - 1;
                &mut self.entries[last]
            }
        }
    }

    fn record(&mut self, subject: &str, status: Status, note: Option<String>) {
        let entry = self.entry_mut(subject);
        entry.status = entry.status.max(status);
        if let Some(note) = note {
            if !entry.notes.contains(&note) {
                entry.notes.push(note);
            }
        }
    }

    pub fn complete(&mut self, subject: &str) {
        self.record(subject, Status::Complete, None);
    }

    /// Data is missing for `subject`; the record was still produced.
    pub fn partial(&mut self, subject: &str, note: impl fmt::Display) {
        self.record(subject, Status::Partial, Some(note.to_string()));
    }

    /// `subject` could not be produced at all.
    pub fn failed(&mut self, subject: &str, reason: impl fmt::Display) {
        self.record(subject, Status::Failed, Some(reason.to_string()));
    }

    /// Fold another report's entries into this one.
    pub fn absorb(&mut self, other: RunReport) {
        for entry in other.entries {
            let target = self.entry_mut(&entry.subject);
            target.status = target.status.max(entry.status);
            for note in entry.notes {
                if !target.notes.contains(&note) {
                    target.notes.push(note);
                }
            }
        }
    }

    pub fn entries(&self) -> &[ReportEntry] {
        &self.entries
    }

    pub fn status_of(&self, subject: &str) -> Option<Status> {
        self.entries
            .iter()
            .find(|e| e.subject == subject)
            .map(|e| e.status)
    }

    pub fn count(&self, status: Status) -> usize {
        self.entries.iter().filter(|e| e.status == status).count()
    }

    pub fn has_failures(&self) -> bool {
        self.count(Status::Failed) > 0
    }

    /// Log the summary: one line of totals, then one line per non-complete record.
    pub fn log_summary(&self) {
        info!(
            "{}: {} complete, {} partial, {} failed",
            self.title,
            self.count(Status::Complete),
            self.count(Status::Partial),
            self.count(Status::Failed)
        );
        for entry in self.entries.iter().filter(|e| e.status != Status::Complete) {
            warn!(
                "  {} [{}] {}",
                entry.subject,
                entry.status.label(),
                entry.notes.join("; ")
            );
        }
    }
}

impl fmt::Display for RunReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{}: {} complete, {} partial, {} failed",
            self.title,
            self.count(Status::Complete),
            self.count(Status::Partial),
            self.count(Status::Failed)
        )?;
        for entry in self.entries.iter().filter(|e| e.status != Status::Complete) {
            writeln!(
                f,
                "  {} [{}] {}",
                entry.subject,
                entry.status.label(),
                entry.notes.join("; ")
            )?;
        }
        Ok(())
    }
}
