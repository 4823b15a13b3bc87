use std::collections::VecDeque;

use shared_resources::level::Level;

/// Calls that arrived while no cabin could take them, oldest first.
/// The same level may be queued more than once; each entry is served separately.
#[derive(Debug, Clone, Default)]
pub struct WaitList {
    levels: VecDeque<Level>,
}

impl WaitList {
    pub fn new() -> Self {
        WaitList { levels: VecDeque::new() }
    }

    /// Returns the 1-based position of the new entry.
    pub fn push(&mut self, level: Level) -> usize {
        self.levels.push_back(level);
        self.levels.len()
    }

    /// Removes and returns the oldest entry itself, never another entry with the same level.
    pub fn take_next(&mut self) -> Option<Level> {
        self.levels.pop_front()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn to_vec(&self) -> Vec<Level> {
        self.levels.iter().copied().collect()
    }
}
