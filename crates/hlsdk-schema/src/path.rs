//! # Schema Pointers
//!
//! Every node of a [`SchemaNode`](crate::SchemaNode) tree carries a
//! [`SchemaPath`]: a JSON Pointer into the schema document, rendered with a
//! leading `#` (e.g. `#/items/properties/tif/anyOf/0`). Coverage observations
//! and ignore entries are keyed by these paths.
//!
//! `$ref` targets are inlined when the tree is built, so a path follows the
//! instance structure and never passes through `$defs`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A slash-delimited pointer from the schema root to one node.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SchemaPath {
    segments: Vec<String>,
}

impl SchemaPath {
    /// The root pointer, rendered as `#`.
    pub fn root() -> Self {
        Self::default()
    }

    /// Returns a new path with `segment` appended.
    pub fn child(&self, segment: impl Into<String>) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }

    /// `<self>/properties/<name>`
    pub fn property(&self, name: &str) -> Self {
        self.child("properties").child(name)
    }

    /// `<self>/items`
    pub fn items(&self) -> Self {
        self.child("items")
    }

    /// `<self>/additionalProperties`
    pub fn additional_properties(&self) -> Self {
        self.child("additionalProperties")
    }

    /// `<self>/<keyword>/<index>`, e.g. `anyOf/1`.
    pub fn branch(&self, keyword: &str, index: usize) -> Self {
        self.child(keyword).child(index.to_string())
    }

    /// Raw (unescaped) segments from the root.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Number of segments; the root has depth zero.
    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for SchemaPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("#")?;
        for segment in &self.segments {
            write!(f, "/{}", escape(segment))?;
        }
        Ok(())
    }
}

/// Parses `#/a/b`, `/a/b`, `a/b` and `#` alike.
impl FromStr for SchemaPath {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let trimmed = trimmed.strip_prefix('#').unwrap_or(trimmed);
        let trimmed = trimmed.strip_prefix('/').unwrap_or(trimmed);
        if trimmed.is_empty() {
            return Ok(Self::root());
        }
        let segments = trimmed.split('/').map(unescape).collect();
        Ok(Self { segments })
    }
}

impl From<&str> for SchemaPath {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(path) => path,
            Err(never) => match never {},
        }
    }
}

impl Serialize for SchemaPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SchemaPath {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(SchemaPath::from(raw.as_str()))
    }
}

/// RFC 6901 escaping: `~` → `~0`, `/` → `~1`.
fn escape(segment: &str) -> String {
    segment.replace('~', "~0").replace('/', "~1")
}

fn unescape(segment: &str) -> String {
    segment.replace("~1", "/").replace("~0", "~")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn root_renders_as_hash() {
        assert_eq!(SchemaPath::root().to_string(), "#");
        assert!(SchemaPath::root().is_root());
    }

    #[test]
    fn child_paths_render_as_pointer() {
        let path = SchemaPath::root().items().property("tif").branch("anyOf", 0);
        assert_eq!(path.to_string(), "#/items/properties/tif/anyOf/0");
        assert_eq!(path.depth(), 5);
    }

    #[test]
    fn parse_accepts_all_prefix_forms() {
        let expected = SchemaPath::root().child("tif").branch("anyOf", 0);
        for raw in ["#/tif/anyOf/0", "/tif/anyOf/0", "tif/anyOf/0", " tif/anyOf/0 "] {
            assert_eq!(SchemaPath::from(raw), expected, "failed for {raw:?}");
        }
        assert_eq!(SchemaPath::from("#"), SchemaPath::root());
        assert_eq!(SchemaPath::from(""), SchemaPath::root());
    }

    #[test]
    fn slash_and_tilde_in_property_names_round_trip() {
        let path = SchemaPath::root().property("a/b~c");
        let rendered = path.to_string();
        assert_eq!(rendered, "#/properties/a~1b~0c");
        assert_eq!(SchemaPath::from(rendered.as_str()), path);
    }

    #[test]
    fn serde_uses_pointer_string() {
        let path = SchemaPath::root().items();
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, r##""#/items""##);
        let back: SchemaPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }
}
