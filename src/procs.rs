//! Cosmetic process ledger.
//!
//! These numbers exist only for display: opening a window books a fixed
//! per-applet memory cost under a named "process", closing releases it.
//! Nothing here schedules or isolates anything.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// Pretend machine memory, in megabytes.
pub const TOTAL_MEMORY_MB: u32 = 16 * 1024;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProcessEntry {
    pub name: String,
    pub memory_mb: u32,
    pub started: DateTime<Local>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProcessTable {
    #[serde(default)]
    entries: Vec<ProcessEntry>,
}

/// Snapshot handed to applets that display the numbers.
#[derive(Debug, Clone, Copy, Default)]
pub struct LedgerStats {
    pub used_mb: u32,
    pub total_mb: u32,
    pub process_count: usize,
}

impl ProcessTable {
    pub fn add(&mut self, name: impl Into<String>, memory_mb: u32) {
        self.entries.push(ProcessEntry {
            name: name.into(),
            memory_mb,
            started: Local::now(),
        });
    }

    /// Remove the oldest entry with the given name, if any.
    pub fn remove(&mut self, name: &str) {
        if let Some(idx) = self.entries.iter().position(|entry| entry.name == name) {
            self.entries.remove(idx);
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn used_mb(&self) -> u32 {
        self.entries.iter().map(|entry| entry.memory_mb).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[ProcessEntry] {
        &self.entries
    }

    pub fn stats(&self) -> LedgerStats {
        LedgerStats {
            used_mb: self.used_mb(),
            total_mb: TOTAL_MEMORY_MB,
            process_count: self.len(),
        }
    }
}

impl LedgerStats {
    pub fn usage_percent(&self) -> f64 {
        if self.total_mb == 0 {
            return 0.0;
        }
        self.used_mb as f64 / self.total_mb as f64 * 100.0
    }
}

/// "512 MB", "1.25 GB" style formatting for megabyte counts.
pub fn format_memory(mb: u32) -> String {
    if mb >= 1024 {
        format!("{:.2} GB", mb as f64 / 1024.0)
    } else {
        format!("{mb} MB")
    }
}
