//! # Ignore Specs
//!
//! Caller-declared exclusions: items a test run is allowed to leave
//! uncovered, e.g. an enum value the live account never produces. Entries
//! are keyed by schema path and apply to that exact path only.
//!
//! Paths that do not exist in the schema are accepted and have no effect,
//! so specs can be written ahead of schema changes.
//!
//! Specs load from JSON or YAML (chosen by file extension):
//!
//! ```yaml
//! ignoreEnumValuesByPath:
//!   "#/items/properties/orderType": ["Market"]
//! ignoreFillByPath:
//!   "#/items/properties/children": ["nonEmpty"]
//! ```

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use hlsdk_schema::{JsonType, SchemaPath};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::record::{Fill, Presence};
use crate::report::{CoverageGap, GapKind};

/// Error loading an ignore spec from disk.
#[derive(Error, Debug)]
pub enum IgnoreSpecError {
    #[error("cannot read ignore spec '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid ignore spec '{path}': {reason}")]
    Parse { path: String, reason: String },
}

/// Exclusions by schema path.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct IgnoreSpec {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub ignore_enum_values_by_path: BTreeMap<SchemaPath, Vec<Value>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub ignore_branches_by_path: BTreeMap<SchemaPath, Vec<usize>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub ignore_types_by_path: BTreeMap<SchemaPath, Vec<JsonType>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub ignore_presence_by_path: BTreeMap<SchemaPath, Vec<Presence>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub ignore_fill_by_path: BTreeMap<SchemaPath, Vec<Fill>>,
}

impl IgnoreSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Excuse enum members at `path`.
    pub fn enum_values(
        mut self,
        path: impl Into<SchemaPath>,
        values: impl IntoIterator<Item = Value>,
    ) -> Self {
        self.ignore_enum_values_by_path
            .entry(path.into())
            .or_default()
            .extend(values);
        self
    }

    /// Excuse union branches (by index) at `path`.
    pub fn branches(
        mut self,
        path: impl Into<SchemaPath>,
        indices: impl IntoIterator<Item = usize>,
    ) -> Self {
        self.ignore_branches_by_path
            .entry(path.into())
            .or_default()
            .extend(indices);
        self
    }

    /// Excuse declared types at `path`.
    pub fn types(
        mut self,
        path: impl Into<SchemaPath>,
        types: impl IntoIterator<Item = JsonType>,
    ) -> Self {
        self.ignore_types_by_path
            .entry(path.into())
            .or_default()
            .extend(types);
        self
    }

    /// Excuse presence states of the optional property at `path`.
    pub fn presence(
        mut self,
        path: impl Into<SchemaPath>,
        states: impl IntoIterator<Item = Presence>,
    ) -> Self {
        self.ignore_presence_by_path
            .entry(path.into())
            .or_default()
            .extend(states);
        self
    }

    /// Excuse fill states of the array or map at `path`.
    pub fn fill(
        mut self,
        path: impl Into<SchemaPath>,
        states: impl IntoIterator<Item = Fill>,
    ) -> Self {
        self.ignore_fill_by_path
            .entry(path.into())
            .or_default()
            .extend(states);
        self
    }

    /// Combine with `other`; entries from both apply.
    pub fn merge(mut self, other: IgnoreSpec) -> Self {
        fn extend<T>(into: &mut BTreeMap<SchemaPath, Vec<T>>, from: BTreeMap<SchemaPath, Vec<T>>) {
            for (path, items) in from {
                into.entry(path).or_default().extend(items);
            }
        }
        extend(&mut self.ignore_enum_values_by_path, other.ignore_enum_values_by_path);
        extend(&mut self.ignore_branches_by_path, other.ignore_branches_by_path);
        extend(&mut self.ignore_types_by_path, other.ignore_types_by_path);
        extend(&mut self.ignore_presence_by_path, other.ignore_presence_by_path);
        extend(&mut self.ignore_fill_by_path, other.ignore_fill_by_path);
        self
    }

    /// Whether `gap` is excused.
    pub fn excuses(&self, gap: &CoverageGap) -> bool {
        let path = &gap.path;
        match &gap.kind {
            GapKind::Branch { index } => listed(&self.ignore_branches_by_path, path, index),
            GapKind::EnumValue { value } => listed(&self.ignore_enum_values_by_path, path, value),
            GapKind::Type { json_type } => listed(&self.ignore_types_by_path, path, json_type),
            GapKind::Presence { state } => listed(&self.ignore_presence_by_path, path, state),
            GapKind::Fill { state } => listed(&self.ignore_fill_by_path, path, state),
        }
    }

    /// Every path mentioned by any entry.
    pub fn paths(&self) -> BTreeSet<&SchemaPath> {
        self.ignore_enum_values_by_path
            .keys()
            .chain(self.ignore_branches_by_path.keys())
            .chain(self.ignore_types_by_path.keys())
            .chain(self.ignore_presence_by_path.keys())
            .chain(self.ignore_fill_by_path.keys())
            .collect()
    }

    pub fn is_empty(&self) -> bool {
        self.paths().is_empty()
    }

    /// Load a spec from a `.json`, `.yaml` or `.yml` file.
    pub fn from_file(path: &Path) -> Result<Self, IgnoreSpecError> {
        let content = std::fs::read_to_string(path).map_err(|source| IgnoreSpecError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let parsed = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content).map_err(|e| e.to_string()),
            _ => serde_json::from_str(&content).map_err(|e| e.to_string()),
        };
        parsed.map_err(|reason| IgnoreSpecError::Parse {
            path: path.display().to_string(),
            reason,
        })
    }
}

fn listed<T: PartialEq>(entries: &BTreeMap<SchemaPath, Vec<T>>, path: &SchemaPath, item: &T) -> bool {
    entries.get(path).is_some_and(|items| items.contains(item))
}
