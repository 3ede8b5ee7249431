use std::collections::VecDeque;

use crate::config::BattleConfig;

/// Most recent battle log lines, oldest first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BattleLog {
    entries: VecDeque<String>,
}

impl BattleLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a line, evicting the oldest once capacity is reached.
    pub fn push(&mut self, line: impl Into<String>) {
        if self.entries.len() == BattleConfig::LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(line.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn latest(&self) -> Option<&str> {
        self.entries.back().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
