//! Line history

use alloc::{collections::VecDeque, string::String};

/// Default number of entries kept
pub const DEFAULT_LIMIT: usize = 500;

/// Active traversal of the history. The snapshot of the unsaved input
/// lives and dies with the position.
#[cfg_attr(test, derive(Debug, PartialEq, Eq))]
struct Cycle {
    position: usize,
    unsaved: String,
}

/// Result of moving down in the history
#[cfg_attr(test, derive(Debug, PartialEq, Eq))]
pub(crate) enum HistoryMove {
    /// Moved to a newer entry
    Entry(String),
    /// Moved past the newest entry, back to the unsaved input
    Restore(String),
}

/// Ordered list of past lines, oldest first.
///
/// Methods that can end an ongoing traversal return the input that was
/// unsaved when it started, so the editor can restore it.
pub struct History {
    entries: VecDeque<String>,
    limit: Option<usize>,
    cycle: Option<Cycle>,
}

impl Default for History {
    fn default() -> Self {
        Self::new(Some(DEFAULT_LIMIT))
    }
}

impl History {
    /// Create history holding at most `limit` entries, `None` for
    /// unlimited
    pub fn new(limit: Option<usize>) -> Self {
        Self {
            entries: VecDeque::new(),
            limit,
            cycle: None,
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }

    pub fn number_of_entries(&self) -> usize {
        self.entries.len()
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }

    /// Add new entry at the end
    pub(crate) fn add_entry(&mut self, entry: &str) -> Option<String> {
        self.entries.push_back(String::from(entry));

        self.truncate()
    }

    pub(crate) fn set_limit(&mut self, limit: Option<usize>) -> Option<String> {
        self.limit = limit;

        self.truncate()
    }

    pub(crate) fn clear(&mut self) -> Option<String> {
        self.entries.clear();

        self.cycle.take().map(|cycle| cycle.unsaved)
    }

    fn truncate(&mut self) -> Option<String> {
        let limit = self.limit?;
        let excess = self.entries.len().checked_sub(limit).filter(|&n| n > 0)?;

        self.entries.drain(..excess);

        match self.cycle.take() {
            Some(mut cycle) if cycle.position >= excess => {
                cycle.position -= excess;
                self.cycle = Some(cycle);
                None
            }
            Some(cycle) => Some(cycle.unsaved),
            None => None,
        }
    }

    /// Step to the previous entry. The first step snapshots `current`
    /// and jumps to the newest entry.
    pub(crate) fn move_up(&mut self, current: &str) -> Result<String, ()> {
        let position = match &self.cycle {
            Some(cycle) if cycle.position > 0 => cycle.position - 1,
            Some(_) => return Err(()),
            None if !self.entries.is_empty() => self.entries.len() - 1,
            None => return Err(()),
        };

        let entry = self.entries.get(position).cloned().ok_or(())?;

        match &mut self.cycle {
            Some(cycle) => cycle.position = position,
            None => {
                self.cycle = Some(Cycle {
                    position,
                    unsaved: String::from(current),
                })
            }
        }

        Ok(entry)
    }

    pub(crate) fn move_down(&mut self) -> Result<HistoryMove, ()> {
        let cycle = self.cycle.as_mut().ok_or(())?;
        let position = cycle.position + 1;

        if let Some(entry) = self.entries.get(position) {
            cycle.position = position;
            Ok(HistoryMove::Entry(entry.clone()))
        } else {
            let unsaved = core::mem::take(&mut cycle.unsaved);
            self.cycle = None;
            Ok(HistoryMove::Restore(unsaved))
        }
    }

    /// Forget the current traversal without restoring anything
    pub(crate) fn reset(&mut self) {
        self.cycle = None;
    }

    pub fn is_active(&self) -> bool {
        self.cycle.is_some()
    }
}
