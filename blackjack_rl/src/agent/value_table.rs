use std::collections::{BTreeSet, HashMap};
use std::fs::{self, File};
use std::io::{BufReader, ErrorKind};
use std::path::{Path, PathBuf};

use crate::{Action, Result, State};
use log::debug;
use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::IntoEnumIterator;

use super::argmax;

/// Visit count given to every entry read back from a file, so early updates
/// after loading move the estimates only slightly.
pub const LOADED_VISITS: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct StateAction {
    pub state: State,
    pub action: Action,
}

impl StateAction {
    pub fn new(state: State, action: Action) -> Self {
        StateAction { state, action }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Estimate {
    pub value: f64,
    pub visits: u32,
}

/// Learned action values. Entries are created on first update; reading an
/// entry that was never touched gives `Estimate::default()`.
#[derive(Debug, Default, Clone)]
pub struct ValueTable {
    entries: HashMap<StateAction, Estimate>,
}

/// One line of a saved table.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct TableRow {
    ace_count: u8,
    value: u8,
    dealer: u8,
    hit: f64,
    stay: f64,
}

impl ValueTable {
    pub fn new() -> Self {
        ValueTable {
            entries: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, state: &State, action: Action) -> Estimate {
        self.entries
            .get(&StateAction::new(*state, action))
            .copied()
            .unwrap_or_default()
    }

    pub fn value(&self, state: &State, action: Action) -> f64 {
        self.get(state, action).value
    }

    pub fn max_value(&self, state: &State) -> f64 {
        self.value(state, Action::Hit)
            .max(self.value(state, Action::Stay))
    }

    pub fn greedy_action<R: Rng + ?Sized>(&self, state: &State, rng: &mut R) -> Action {
        argmax(
            self.value(state, Action::Hit),
            self.value(state, Action::Stay),
            rng,
        )
    }

    /// Counts one more visit and moves the estimate toward `target` by one
    /// over the visit count. Returns the new estimate.
    pub fn update_toward(&mut self, key: StateAction, target: f64) -> f64 {
        let estimate = self.entries.entry(key).or_default();
        estimate.visits += 1;
        estimate.value += (target - estimate.value) / estimate.visits as f64;
        estimate.value
    }

    pub fn set(&mut self, key: StateAction, estimate: Estimate) {
        self.entries.insert(key, estimate);
    }

    /// Every state with at least one entry, in ascending order.
    pub fn states(&self) -> Vec<State> {
        let states: BTreeSet<State> = self.entries.keys().map(|key| key.state).collect();
        states.into_iter().collect()
    }

    /// Writes one row per state with the Hit and Stay estimates rounded to 3
    /// decimals. Visit counts are not written.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let states = self.states();
        let mut writer = csv::Writer::from_path(path)?;
        for state in &states {
            writer.serialize(TableRow {
                ace_count: state.ace_count,
                value: state.non_ace_sum,
                dealer: state.dealer_card,
                hit: round3(self.value(state, Action::Hit)),
                stay: round3(self.value(state, Action::Stay)),
            })?;
        }
        writer.flush()?;
        debug!("saved {} states to {}", states.len(), path.display());
        Ok(())
    }

    /// Reads a table written by `save`. Each row seeds both actions of its
    /// state with `LOADED_VISITS` visits. A missing file gives an empty table.
    pub fn load(path: &Path) -> Result<Self> {
        let file = match File::open(path) {
            Ok(file) => file,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!("no table at {}, starting empty", path.display());
                return Ok(Self::new());
            }
            Err(err) => return Err(err.into()),
        };

        let mut table = Self::new();
        let mut rows = 0usize;
        let mut reader = csv::Reader::from_reader(BufReader::new(file));
        for row in reader.deserialize() {
            let row: TableRow = row?;
            rows += 1;
            let state = State::new(row.ace_count, row.value, row.dealer);
            for action in Action::iter() {
                let value = match action {
                    Action::Hit => row.hit,
                    Action::Stay => row.stay,
                };
                table.set(
                    StateAction::new(state, action),
                    Estimate {
                        value,
                        visits: LOADED_VISITS,
                    },
                );
            }
        }
        debug!("loaded {} states from {}", rows, path.display());
        Ok(table)
    }
}

/// `path` with `_{index}` appended to the file stem, for agents that keep more
/// than one table.
pub fn indexed_path(path: &Path, index: usize) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let file_name = match path.extension() {
        Some(extension) => format!("{}_{}.{}", stem, index, extension.to_string_lossy()),
        None => format!("{}_{}", stem, index),
    };
    path.with_file_name(file_name)
}

fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
