//! Per-call accumulator of what the samples exercised, keyed by schema path.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use hlsdk_schema::{JsonType, SchemaPath};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Whether an optional property was seen in a sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Presence {
    Present,
    Absent,
}

impl Presence {
    pub const ALL: [Presence; 2] = [Presence::Present, Presence::Absent];
}

impl fmt::Display for Presence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Present => "present",
            Self::Absent => "absent",
        })
    }
}

/// Whether an array (or map) was seen empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Fill {
    Empty,
    NonEmpty,
}

impl Fill {
    pub const ALL: [Fill; 2] = [Fill::Empty, Fill::NonEmpty];

    pub fn of_len(len: usize) -> Self {
        if len == 0 {
            Self::Empty
        } else {
            Self::NonEmpty
        }
    }
}

impl fmt::Display for Fill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Empty => "empty",
            Self::NonEmpty => "non-empty",
        })
    }
}

/// Everything observed at one schema path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathObservations {
    pub branches: BTreeSet<usize>,
    /// Distinct enum members in first-seen order.
    pub enum_values: Vec<Value>,
    pub types: BTreeSet<JsonType>,
    pub presence: BTreeSet<Presence>,
    pub fill: BTreeSet<Fill>,
}

/// Mutable coverage state for one `check_coverage` call.
///
/// Created empty, filled while samples are walked, read once to compute
/// gaps, then dropped. Nothing carries over between calls.
#[derive(Debug, Default)]
pub struct CoverageRecord {
    paths: BTreeMap<SchemaPath, PathObservations>,
    visits: usize,
}

impl CoverageRecord {
    pub fn new() -> Self {
        Self::default()
    }

    fn at(&mut self, path: &SchemaPath) -> &mut PathObservations {
        self.paths.entry(path.clone()).or_default()
    }

    pub fn visit(&mut self) {
        self.visits += 1;
    }

    pub fn observe_branch(&mut self, path: &SchemaPath, index: usize) {
        self.at(path).branches.insert(index);
    }

    pub fn observe_enum_value(&mut self, path: &SchemaPath, value: &Value) {
        let seen = &mut self.at(path).enum_values;
        if !seen.contains(value) {
            seen.push(value.clone());
        }
    }

    pub fn observe_type(&mut self, path: &SchemaPath, json_type: JsonType) {
        self.at(path).types.insert(json_type);
    }

    pub fn observe_presence(&mut self, path: &SchemaPath, presence: Presence) {
        self.at(path).presence.insert(presence);
    }

    pub fn observe_fill(&mut self, path: &SchemaPath, fill: Fill) {
        self.at(path).fill.insert(fill);
    }

    pub fn get(&self, path: &SchemaPath) -> Option<&PathObservations> {
        self.paths.get(path)
    }

    /// Total node visits across all samples.
    pub fn visits(&self) -> usize {
        self.visits
    }
}
