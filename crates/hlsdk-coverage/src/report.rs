//! Coverage results.

use std::fmt;

use hlsdk_schema::{JsonType, SchemaPath};
use serde::Serialize;
use serde_json::Value;

use crate::record::{Fill, Presence};

/// What was declared at a path but never observed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum GapKind {
    /// A union branch no sample matched.
    Branch { index: usize },
    /// An enum member no sample carried.
    EnumValue { value: Value },
    /// A declared type (of a multi-type node) no sample had.
    #[serde(rename_all = "camelCase")]
    Type { json_type: JsonType },
    /// An optional property was always present, or always absent.
    Presence { state: Presence },
    /// An array or map was always empty, or never empty.
    Fill { state: Fill },
}

impl fmt::Display for GapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Branch { index } => write!(f, "union branch {index} never matched"),
            Self::EnumValue { value } => write!(f, "enum value {value} never observed"),
            Self::Type { json_type } => write!(f, "type {json_type} never observed"),
            Self::Presence { state } => write!(f, "property never observed {state}"),
            Self::Fill { state } => write!(f, "never observed {state}"),
        }
    }
}

/// One uncovered item at one schema path.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoverageGap {
    pub path: SchemaPath,
    #[serde(flatten)]
    pub kind: GapKind,
}

impl fmt::Display for CoverageGap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.kind)
    }
}

/// Result of one coverage analysis.
///
/// Gaps are listed in schema order, so two runs over the same inputs produce
/// identical reports.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CoverageReport {
    /// Number of sample values analyzed.
    pub samples: usize,
    /// Schema nodes visited across all samples.
    pub nodes_visited: usize,
    /// Uncovered items remaining after exclusions.
    pub gaps: Vec<CoverageGap>,
    /// Uncovered items removed by the ignore spec.
    pub excused: Vec<CoverageGap>,
}

impl CoverageReport {
    /// True when nothing is left uncovered.
    pub fn is_complete(&self) -> bool {
        self.gaps.is_empty()
    }

    /// Gaps recorded at exactly `path`.
    pub fn gaps_at<'a>(&'a self, path: &'a SchemaPath) -> impl Iterator<Item = &'a GapKind> + 'a {
        self.gaps.iter().filter(move |g| &g.path == path).map(|g| &g.kind)
    }
}

impl fmt::Display for CoverageReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.gaps.is_empty() {
            write!(
                f,
                "schema fully covered by {} sample(s) ({} excused)",
                self.samples,
                self.excused.len()
            )
        } else {
            for (i, gap) in self.gaps.iter().enumerate() {
                if i > 0 {
                    writeln!(f)?;
                }
                write!(f, "  {gap}")?;
            }
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn gap_display_names_path_and_item() {
        let gap = CoverageGap {
            path: SchemaPath::from("#/items/properties/tif/anyOf/0"),
            kind: GapKind::EnumValue { value: json!("Alo") },
        };
        assert_eq!(
            gap.to_string(),
            r##"#/items/properties/tif/anyOf/0: enum value "Alo" never observed"##
        );
    }

    #[test]
    fn gap_serializes_flat() {
        let gap = CoverageGap {
            path: SchemaPath::from("#/items"),
            kind: GapKind::Fill { state: Fill::Empty },
        };
        assert_eq!(
            serde_json::to_value(&gap).unwrap(),
            json!({ "path": "#/items", "kind": "fill", "state": "empty" })
        );
        let gap = CoverageGap {
            path: SchemaPath::from("#/properties/cloid"),
            kind: GapKind::Type { json_type: JsonType::Null },
        };
        assert_eq!(
            serde_json::to_value(&gap).unwrap(),
            json!({ "path": "#/properties/cloid", "kind": "type", "jsonType": "null" })
        );
    }

    #[test]
    fn gaps_at_filters_by_exact_path() {
        let tif = SchemaPath::from("#/tif");
        let report = CoverageReport {
            samples: 1,
            nodes_visited: 3,
            gaps: vec![
                CoverageGap { path: tif.clone(), kind: GapKind::Branch { index: 1 } },
                CoverageGap {
                    path: tif.branch("anyOf", 0),
                    kind: GapKind::EnumValue { value: json!("Alo") },
                },
            ],
            excused: vec![],
        };
        assert_eq!(report.gaps_at(&tif).count(), 1);
        assert!(!report.is_complete());
    }
}
