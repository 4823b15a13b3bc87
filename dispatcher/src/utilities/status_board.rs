/// ----- STATUS BOARD -----
/// One row per building level, each showing the last reported level and
/// state of every cabin. A publish overwrites the cabin's slot in every row,
/// so any row answers "where are the cabins" as seen from that level.
/// The board has its own lock and is never held while taking the
/// building's shared lock.

use std::fmt;

use parking_lot::RwLock;

use shared_resources::cabin_state::CabinState;
use shared_resources::config::NUM_CABINS;
use shared_resources::level::Level;

#[derive(serde::Serialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct CabinReport {
    pub level: Level,
    pub state: CabinState,
}

#[derive(serde::Serialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusRow {
    pub level: Level,
    pub cabins: [CabinReport; NUM_CABINS],
}

impl fmt::Display for StatusRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "l{}:", self.level)?;
        for (id, report) in self.cabins.iter().enumerate() {
            write!(f, " cabin{}[{},{}]", id, report.level, report.state)?;
        }
        Ok(())
    }
}

#[derive(Debug)]
pub struct StatusBoard {
    rows: RwLock<Vec<StatusRow>>,
}

impl StatusBoard {
    pub fn new(initial_level: Level) -> Self {
        let initial = CabinReport { level: initial_level, state: CabinState::IdleClosed };
        StatusBoard {
            rows: RwLock::new(
                Level::iter()
                    .map(|level| StatusRow { level, cabins: [initial; NUM_CABINS] })
                    .collect(),
            ),
        }
    }

    pub fn publish(&self, cabin_id: usize, level: Level, state: CabinState) {
        let mut rows = self.rows.write();
        for row in rows.iter_mut() {
            row.cabins[cabin_id] = CabinReport { level, state };
        }
    }

    pub fn row(&self, level: Level) -> StatusRow {
        self.rows.read()[level.index()].clone()
    }

    pub fn rows(&self) -> Vec<StatusRow> {
        self.rows.read().clone()
    }
}
