//! # Schema Coverage Checker
//!
//! Walks a [`SchemaNode`] tree and each sample value in lockstep, records
//! what the samples exercised, then lists everything declared but never
//! observed.
//!
//! ## What Counts as Covered
//!
//! | node | covered when samples show |
//! |------|---------------------------|
//! | union | every branch matched at least once |
//! | enum | every member |
//! | multi-type (`["string", "null"]`) | every declared type |
//! | optional property | both present and absent |
//! | array, map | both empty and non-empty |
//!
//! Union branches are matched structurally in declaration order; the first
//! match wins.
//!
//! ## Purity
//!
//! Each call builds a fresh [`CoverageRecord`] and drops it. The checker
//! holds only its options, so concurrent calls on independent inputs need no
//! coordination and repeated calls return identical reports.

use std::collections::BTreeSet;

use hlsdk_schema::{Additional, JsonType, NodeKind, SchemaNode, SchemaPath};
use serde_json::Value;

use crate::error::{CoverageError, CoverageGapError, SchemaShapeError};
use crate::ignore::IgnoreSpec;
use crate::record::{CoverageRecord, Fill, Presence};
use crate::report::{CoverageGap, CoverageReport, GapKind};

/// Default bound on traversal depth.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Checker configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckerOptions {
    /// Schema nesting beyond this depth is reported as a shape error.
    pub max_depth: usize,
}

impl Default for CheckerOptions {
    fn default() -> Self {
        Self { max_depth: DEFAULT_MAX_DEPTH }
    }
}

/// Schema coverage checker.
#[derive(Debug, Clone, Copy, Default)]
pub struct CoverageChecker {
    options: CheckerOptions,
}

/// Check with default options. See [`CoverageChecker::check`].
pub fn check_coverage(
    schema: &SchemaNode,
    samples: &[Value],
    ignore: Option<&IgnoreSpec>,
) -> Result<CoverageReport, CoverageError> {
    CoverageChecker::default().check(schema, samples, ignore)
}

/// Analyze with default options. See [`CoverageChecker::analyze`].
pub fn analyze(
    schema: &SchemaNode,
    samples: &[Value],
    ignore: Option<&IgnoreSpec>,
) -> Result<CoverageReport, CoverageError> {
    CoverageChecker::default().analyze(schema, samples, ignore)
}

impl CoverageChecker {
    pub fn new(options: CheckerOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> CheckerOptions {
        self.options
    }

    /// Require full coverage.
    ///
    /// # Errors
    ///
    /// - [`CoverageError::Gap`] when gaps remain after `ignore` is applied.
    /// - [`CoverageError::Shape`] when a sample does not fit the schema.
    /// - [`CoverageError::NoSamples`] for an empty batch.
    pub fn check(
        &self,
        schema: &SchemaNode,
        samples: &[Value],
        ignore: Option<&IgnoreSpec>,
    ) -> Result<CoverageReport, CoverageError> {
        let report = self.analyze(schema, samples, ignore)?;
        if report.is_complete() {
            Ok(report)
        } else {
            Err(CoverageGapError { report }.into())
        }
    }

    /// Produce the report without failing on gaps.
    ///
    /// # Errors
    ///
    /// Shape errors and empty batches, as for [`check`](Self::check).
    pub fn analyze(
        &self,
        schema: &SchemaNode,
        samples: &[Value],
        ignore: Option<&IgnoreSpec>,
    ) -> Result<CoverageReport, CoverageError> {
        if samples.is_empty() {
            return Err(CoverageError::NoSamples);
        }
        check_schema_depth(schema, 0, self.options.max_depth)?;

        let mut walker = Walker {
            record: CoverageRecord::new(),
            sample: 0,
            instance: Vec::new(),
        };
        for (index, sample) in samples.iter().enumerate() {
            walker.sample = index;
            walker.visit(schema, sample)?;
        }

        let mut collector = GapCollector {
            record: &walker.record,
            gaps: Vec::new(),
            paths: BTreeSet::new(),
        };
        collector.collect(schema);

        let (excused, gaps): (Vec<_>, Vec<_>) = match ignore {
            Some(spec) => collector.gaps.into_iter().partition(|gap| spec.excuses(gap)),
            None => (Vec::new(), collector.gaps),
        };

        if let Some(spec) = ignore {
            for path in spec.paths() {
                if !collector.paths.contains(path) {
                    tracing::debug!(%path, "ignore entry names a path absent from the schema");
                }
            }
        }

        tracing::debug!(
            samples = samples.len(),
            nodes_visited = walker.record.visits(),
            gaps = gaps.len(),
            excused = excused.len(),
            "schema coverage analyzed"
        );

        Ok(CoverageReport {
            samples: samples.len(),
            nodes_visited: walker.record.visits(),
            gaps,
            excused,
        })
    }
}

/// Reject schemas nested deeper than `max_depth` before any sample is
/// walked, so the outcome does not depend on how deep the samples reach.
fn check_schema_depth(node: &SchemaNode, depth: usize, max_depth: usize) -> Result<(), SchemaShapeError> {
    if depth > max_depth {
        return Err(SchemaShapeError {
            sample: 0,
            instance_path: String::new(),
            schema_path: node.path.clone(),
            reason: format!("schema nesting exceeds {max_depth} levels"),
        });
    }
    match &node.kind {
        NodeKind::Any | NodeKind::Primitive | NodeKind::Enum(_) => Ok(()),
        NodeKind::Object(shape) => {
            for property in &shape.properties {
                check_schema_depth(&property.node, depth + 1, max_depth)?;
            }
            match &shape.additional {
                Additional::Schema(values) => check_schema_depth(values, depth + 1, max_depth),
                Additional::Open | Additional::Closed => Ok(()),
            }
        }
        NodeKind::Array(items) => check_schema_depth(items, depth + 1, max_depth),
        NodeKind::Union(shape) => shape
            .branches
            .iter()
            .try_for_each(|branch| check_schema_depth(branch, depth + 1, max_depth)),
    }
}

/// Enum membership with numeric equality: `1.0` matches a declared `1`.
fn enum_member<'a>(members: &'a [Value], value: &Value) -> Option<&'a Value> {
    members.iter().find(|member| same_value(member, value))
}

fn same_value(a: &Value, b: &Value) -> bool {
    match (a, b) {
        // Integers compare exactly; a float on either side compares as f64.
        (Value::Number(x), Value::Number(y)) if x.is_f64() || y.is_f64() => x.as_f64() == y.as_f64(),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| same_value(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs.iter().all(|(key, x)| ys.get(key).is_some_and(|y| same_value(x, y)))
        }
        _ => a == b,
    }
}

struct Walker {
    record: CoverageRecord,
    sample: usize,
    /// Current position inside the sample, as pointer segments.
    instance: Vec<String>,
}

impl Walker {
    fn shape_error(&self, node: &SchemaNode, reason: impl Into<String>) -> SchemaShapeError {
        let instance_path = self
            .instance
            .iter()
            .map(|s| format!("/{}", s.replace('~', "~0").replace('/', "~1")))
            .collect();
        SchemaShapeError {
            sample: self.sample,
            instance_path,
            schema_path: node.path.clone(),
            reason: reason.into(),
        }
    }

    fn visit_child(
        &mut self,
        segment: String,
        node: &SchemaNode,
        value: &Value,
    ) -> Result<(), SchemaShapeError> {
        self.instance.push(segment);
        let result = self.visit(node, value);
        self.instance.pop();
        result
    }

    fn visit(&mut self, node: &SchemaNode, value: &Value) -> Result<(), SchemaShapeError> {
        self.record.visit();

        if !node.admits_type(value) {
            return Err(self.shape_error(
                node,
                format!(
                    "expected {}, found {}",
                    type_list(node),
                    JsonType::of(value)
                ),
            ));
        }
        if node.types.len() > 1 {
            for json_type in node.matched_types(value) {
                self.record.observe_type(&node.path, json_type);
            }
        }

        match &node.kind {
            NodeKind::Any | NodeKind::Primitive => Ok(()),

            NodeKind::Enum(members) => {
                if members.is_empty() {
                    return Err(self.shape_error(node, "enum declares no members"));
                }
                let Some(member) = enum_member(members, value) else {
                    return Err(self.shape_error(node, format!("{value} is not an enum member")));
                };
                self.record.observe_enum_value(&node.path, member);
                Ok(())
            }

            NodeKind::Object(shape) => {
                let map = match value {
                    Value::Object(map) => map,
                    // A declared `null` on a nullable object ends the walk here.
                    Value::Null if !node.types.is_empty() => return Ok(()),
                    other => {
                        return Err(self.shape_error(
                            node,
                            format!("expected object, found {}", JsonType::of(other)),
                        ))
                    }
                };

                for property in &shape.properties {
                    match map.get(&property.name) {
                        Some(field) => {
                            if !property.required {
                                self.record.observe_presence(&property.node.path, Presence::Present);
                            }
                            self.visit_child(property.name.clone(), &property.node, field)?;
                        }
                        None if property.required => {
                            return Err(self.shape_error(
                                &property.node,
                                format!("required property '{}' is missing", property.name),
                            ));
                        }
                        None => self.record.observe_presence(&property.node.path, Presence::Absent),
                    }
                }

                for (key, field) in map {
                    if shape.property(key).is_some() {
                        continue;
                    }
                    match &shape.additional {
                        Additional::Open => {}
                        Additional::Closed => {
                            return Err(self.shape_error(
                                node,
                                format!("undeclared property '{key}'"),
                            ));
                        }
                        Additional::Schema(values) => {
                            self.visit_child(key.clone(), values, field)?;
                        }
                    }
                }

                if shape.is_map() {
                    self.record.observe_fill(&node.path, Fill::of_len(map.len()));
                }
                Ok(())
            }

            NodeKind::Array(items) => {
                let elements = match value {
                    Value::Array(elements) => elements,
                    Value::Null if !node.types.is_empty() => return Ok(()),
                    other => {
                        return Err(self.shape_error(
                            node,
                            format!("expected array, found {}", JsonType::of(other)),
                        ))
                    }
                };
                self.record.observe_fill(&node.path, Fill::of_len(elements.len()));
                for (i, element) in elements.iter().enumerate() {
                    self.visit_child(i.to_string(), items, element)?;
                }
                Ok(())
            }

            NodeKind::Union(shape) => {
                if shape.branches.is_empty() {
                    return Err(self.shape_error(node, "union declares no branches"));
                }
                let Some(index) = shape
                    .branches
                    .iter()
                    .position(|branch| matches(branch, value))
                else {
                    return Err(self.shape_error(
                        node,
                        format!("value matches none of the {} branches", shape.branches.len()),
                    ));
                };
                self.record.observe_branch(&node.path, index);
                self.visit(&shape.branches[index], value)
            }
        }
    }
}

fn type_list(node: &SchemaNode) -> String {
    node.types
        .iter()
        .map(|t| t.as_str())
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Deep structural match used to pick a union branch. Mirrors the checks
/// `Walker::visit` makes, without recording anything.
fn matches(node: &SchemaNode, value: &Value) -> bool {
    if !node.admits_type(value) {
        return false;
    }
    match &node.kind {
        NodeKind::Any | NodeKind::Primitive => true,
        NodeKind::Enum(members) => enum_member(members, value).is_some(),
        NodeKind::Object(shape) => match value {
            Value::Object(map) => {
                let declared_ok = shape.properties.iter().all(|property| {
                    match map.get(&property.name) {
                        Some(field) => matches(&property.node, field),
                        None => !property.required,
                    }
                });
                declared_ok
                    && map
                        .iter()
                        .filter(|(key, _)| shape.property(key).is_none())
                        .all(|(_, field)| match &shape.additional {
                            Additional::Open => true,
                            Additional::Closed => false,
                            Additional::Schema(values) => matches(values, field),
                        })
            }
            Value::Null => !node.types.is_empty(),
            _ => false,
        },
        NodeKind::Array(items) => match value {
            Value::Array(elements) => elements
                .iter()
                .all(|element| matches(items, element)),
            Value::Null => !node.types.is_empty(),
            _ => false,
        },
        NodeKind::Union(shape) => shape
            .branches
            .iter()
            .any(|branch| matches(branch, value)),
    }
}

/// Walks the schema (not the samples) so every declared item is considered,
/// including those under subtrees no sample reached.
struct GapCollector<'r> {
    record: &'r CoverageRecord,
    gaps: Vec<CoverageGap>,
    /// Every path in the schema, for spotting stale ignore entries.
    paths: BTreeSet<SchemaPath>,
}

impl GapCollector<'_> {
    fn push(&mut self, path: &SchemaPath, kind: GapKind) {
        self.gaps.push(CoverageGap { path: path.clone(), kind });
    }

    fn collect(&mut self, node: &SchemaNode) {
        self.paths.insert(node.path.clone());
        let record = self.record;
        let seen = record.get(&node.path);

        if node.types.len() > 1 {
            for json_type in &node.types {
                if !seen.is_some_and(|s| s.types.contains(json_type)) {
                    self.push(&node.path, GapKind::Type { json_type: *json_type });
                }
            }
        }

        match &node.kind {
            NodeKind::Any | NodeKind::Primitive => {}

            NodeKind::Enum(members) => {
                for member in members {
                    if !seen.is_some_and(|s| s.enum_values.contains(member)) {
                        self.push(&node.path, GapKind::EnumValue { value: member.clone() });
                    }
                }
            }

            NodeKind::Object(shape) => {
                for property in &shape.properties {
                    if !property.required {
                        let prop_seen = record.get(&property.node.path);
                        for state in Presence::ALL {
                            if !prop_seen.is_some_and(|s| s.presence.contains(&state)) {
                                self.push(&property.node.path, GapKind::Presence { state });
                            }
                        }
                    }
                    self.collect(&property.node);
                }
                if shape.is_map() {
                    self.collect_fill(node);
                }
                if let Additional::Schema(values) = &shape.additional {
                    self.collect(values);
                }
            }

            NodeKind::Array(items) => {
                self.collect_fill(node);
                self.collect(items);
            }

            NodeKind::Union(shape) => {
                for index in 0..shape.branches.len() {
                    if !seen.is_some_and(|s| s.branches.contains(&index)) {
                        self.push(&node.path, GapKind::Branch { index });
                    }
                }
                for branch in &shape.branches {
                    self.collect(branch);
                }
            }
        }
    }

    fn collect_fill(&mut self, node: &SchemaNode) {
        let record = self.record;
        let seen = record.get(&node.path);
        for state in Fill::ALL {
            if !seen.is_some_and(|s| s.fill.contains(&state)) {
                self.push(&node.path, GapKind::Fill { state });
            }
        }
    }
}
