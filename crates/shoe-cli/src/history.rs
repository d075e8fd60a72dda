//! Card history for one monitoring session.
//!
//! Kept by the observer, not the monitor. Unbounded: a gaming session can
//! run for hours and every card stays visible until cleared.

use shoe_hardware::MonitorEvent;

/// Outcome shown for a history entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryStatus {
    /// Card read and identified.
    Ok,
    /// Read failure with a reason.
    Fail,
    /// Empty or unexplained failure.
    Unknown,
}

impl EntryStatus {
    /// Bracketed marker printed in front of the entry.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Ok => "[OK]",
            Self::Fail => "[FAIL]",
            Self::Unknown => "[X]",
        }
    }
}

/// One card notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub text: String,
    pub status: EntryStatus,
}

impl HistoryEntry {
    fn classify(text: &str, success: bool) -> EntryStatus {
        if text.starts_with("FAIL:") {
            EntryStatus::Fail
        } else if success && !text.is_empty() {
            EntryStatus::Ok
        } else {
            EntryStatus::Unknown
        }
    }
}

#[derive(Debug, Default)]
pub struct SessionHistory {
    entries: Vec<HistoryEntry>,
    cards_read: usize,
    failed_reads: usize,
}

impl SessionHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a card notification. Other notifications are ignored.
    pub fn record(&mut self, event: &MonitorEvent) -> Option<&HistoryEntry> {
        let MonitorEvent::Card { text, success } = event else {
            return None;
        };

        let status = HistoryEntry::classify(text, *success);
        match status {
            EntryStatus::Ok => self.cards_read += 1,
            EntryStatus::Fail | EntryStatus::Unknown => self.failed_reads += 1,
        }

        self.entries.push(HistoryEntry {
            text: text.clone(),
            status,
        });
        self.entries.last()
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn cards_read(&self) -> usize {
        self.cards_read
    }

    pub fn failed_reads(&self) -> usize {
        self.failed_reads
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.cards_read = 0;
        self.failed_reads = 0;
    }

    /// One-line session summary.
    pub fn summary(&self) -> String {
        format!(
            "{} cards read, {} failed reads",
            self.cards_read(),
            self.failed_reads()
        )
    }
}
