//! JSON production with type stamps and ancestor cycle detection

use cellar_core::{
    Error, Graph, Node, NodeId, Result, Value, CIRCULAR_MARKER, MAX_NESTING_DEPTH,
    TYPE_STAMP_DATE, TYPE_STAMP_FIELD, TYPE_STAMP_ISO_FIELD,
};
use serde_json::{Map as JsonMap, Value as Json};
use std::fmt;

/// Encode a value tree as JSON text.
///
/// Containers nested more than [`MAX_NESTING_DEPTH`] levels deep are rejected,
/// so everything this produces can be decoded again.
pub fn encode(value: &Value) -> Result<String> {
    let json = to_stamped_json(value)?;
    to_text(&json)
}

/// Encode an arena graph as JSON text.
///
/// A container that is already open on the path from the root is written as
/// `"[Circular]"` instead of being visited again. Containers reached through
/// sibling paths (shared but not cyclic) are written out in full each time.
pub fn encode_graph(graph: &Graph) -> Result<String> {
    let json = graph_to_stamped_json(graph)?;
    to_text(&json)
}

/// Convert a value tree to JSON, replacing dates with type stamps
pub fn to_stamped_json(value: &Value) -> Result<Json> {
    let mut path = Path::default();
    Ok(stamp_tree(value, &mut path)?.unwrap_or(Json::Null))
}

/// Convert an arena graph to JSON, replacing dates with type stamps and
/// ancestor references with the circular marker
pub fn graph_to_stamped_json(graph: &Graph) -> Result<Json> {
    let root = graph
        .root()
        .ok_or_else(|| Error::encode("$", "graph has no root node"))?;
    let mut walker = GraphWalker {
        graph,
        open: Vec::new(),
        path: Path::default(),
    };
    Ok(walker.visit(root)?.unwrap_or(Json::Null))
}

fn to_text(json: &Json) -> Result<String> {
    serde_json::to_string(json).map_err(|e| Error::encode("$", e.to_string()))
}

/// Location of the value being encoded, for error messages
#[derive(Default)]
struct Path(Vec<Segment>);

enum Segment {
    Field(String),
    Index(usize),
}

impl Path {
    fn push_field(&mut self, field: &str) {
        self.0.push(Segment::Field(field.to_string()));
    }

    fn push_index(&mut self, index: usize) {
        self.0.push(Segment::Index(index));
    }

    fn pop(&mut self) {
        self.0.pop();
    }

    /// Fails when a container at this path would exceed the nesting limit
    fn enter_container(&self) -> Result<()> {
        if self.0.len() >= MAX_NESTING_DEPTH {
            return Err(Error::encode(
                self.to_string(),
                format!("nested deeper than {MAX_NESTING_DEPTH} levels"),
            ));
        }
        Ok(())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            match segment {
                Segment::Field(name) => write!(f, ".{name}")?,
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

/// `None` means the value is omitted (undefined)
fn stamp_leaf(value: &Value, path: &Path) -> Result<Option<Json>> {
    let json = match value {
        Value::Undefined => return Ok(None),
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Number(n) => Json::Number(n.clone()),
        Value::String(s) => Json::String(s.clone()),
        Value::Date(instant) => {
            let mut stamp = JsonMap::new();
            stamp.insert(
                TYPE_STAMP_FIELD.to_string(),
                Json::String(TYPE_STAMP_DATE.to_string()),
            );
            stamp.insert(
                TYPE_STAMP_ISO_FIELD.to_string(),
                Json::String(instant.to_iso()),
            );
            Json::Object(stamp)
        }
        Value::Opaque(name) => {
            return Err(Error::encode(
                path.to_string(),
                format!("{name} has no data representation"),
            ))
        }
        Value::Array(_) | Value::Object(_) => {
            return Err(Error::encode(path.to_string(), "container stored as a leaf"))
        }
    };
    Ok(Some(json))
}

fn stamp_tree(value: &Value, path: &mut Path) -> Result<Option<Json>> {
    match value {
        Value::Array(items) => {
            path.enter_container()?;
            let mut out = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                path.push_index(index);
                out.push(stamp_tree(item, path)?.unwrap_or(Json::Null));
                path.pop();
            }
            Ok(Some(Json::Array(out)))
        }
        Value::Object(fields) => {
            path.enter_container()?;
            let mut out = JsonMap::new();
            for (key, item) in fields {
                path.push_field(key);
                if let Some(json) = stamp_tree(item, path)? {
                    out.insert(key.clone(), json);
                }
                path.pop();
            }
            Ok(Some(Json::Object(out)))
        }
        leaf => stamp_leaf(leaf, path),
    }
}

struct GraphWalker<'g> {
    graph: &'g Graph,
    /// Containers open on the current path, innermost last
    open: Vec<NodeId>,
    path: Path,
}

impl GraphWalker<'_> {
    fn visit(&mut self, id: NodeId) -> Result<Option<Json>> {
        let graph = self.graph;
        let node = graph
            .node(id)
            .ok_or_else(|| Error::encode(self.path.to_string(), format!("no such node {id}")))?;

        if let Node::Leaf(value) = node {
            return stamp_leaf(value, &self.path);
        }
        if self.open.contains(&id) {
            tracing::trace!(node = %id, path = %self.path, "circular reference replaced");
            return Ok(Some(Json::String(CIRCULAR_MARKER.to_string())));
        }

        self.path.enter_container()?;
        self.open.push(id);
        let result = self.visit_children(node);
        self.open.pop();
        result.map(Some)
    }

    fn visit_children(&mut self, node: &Node) -> Result<Json> {
        match node {
            Node::Array(items) => {
                let mut out = Vec::with_capacity(items.len());
                for (index, &child) in items.iter().enumerate() {
                    self.path.push_index(index);
                    out.push(self.visit(child)?.unwrap_or(Json::Null));
                    self.path.pop();
                }
                Ok(Json::Array(out))
            }
            Node::Object(fields) => {
                let mut out = JsonMap::new();
                for (key, &child) in fields {
                    self.path.push_field(key);
                    if let Some(json) = self.visit(child)? {
                        out.insert(key.clone(), json);
                    }
                    self.path.pop();
                }
                Ok(Json::Object(out))
            }
            Node::Leaf(value) => Ok(stamp_leaf(value, &self.path)?.unwrap_or(Json::Null)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cellar_core::DateInstant;

    #[test]
    fn test_plain_object() {
        let value = Value::object([("a", Value::from(1)), ("b", Value::from("x"))]);
        assert_eq!(encode(&value).unwrap(), r#"{"a":1,"b":"x"}"#);
    }

    #[test]
    fn test_dates_become_type_stamps() {
        let instant = DateInstant::parse_iso("2025-01-01T12:00:00.000Z").unwrap();
        let value = Value::object([("d", Value::Date(instant))]);
        assert_eq!(
            encode(&value).unwrap(),
            r#"{"d":{"__type":"Date","iso":"2025-01-01T12:00:00.000Z"}}"#
        );
    }

    #[test]
    fn test_undefined_follows_json_conventions() {
        let value = Value::object([
            ("nullVal", Value::Null),
            ("undefVal", Value::Undefined),
            ("list", Value::Array(vec![Value::Undefined, Value::from(1)])),
        ]);
        assert_eq!(
            encode(&value).unwrap(),
            r#"{"nullVal":null,"list":[null,1]}"#
        );
        assert_eq!(encode(&Value::Undefined).unwrap(), "null");
    }

    #[test]
    fn test_opaque_values_fail_with_their_path() {
        let value = Value::object([(
            "tasks",
            Value::Array(vec![Value::object([(
                "onDone",
                Value::Opaque("function".to_string()),
            )])]),
        )]);
        match encode(&value) {
            Err(Error::Encode { path, .. }) => assert_eq!(path, "$.tasks[0].onDone"),
            other => panic!("expected encode error, got {other:?}"),
        }
    }

    #[test]
    fn test_self_reference_is_marked() {
        let mut graph = Graph::new();
        let obj = graph.object();
        let name = graph.add(&Value::from("Circle"));
        graph.insert(obj, "name", name).unwrap();
        graph.insert(obj, "self", obj).unwrap();
        graph.set_root(obj).unwrap();

        assert_eq!(
            encode_graph(&graph).unwrap(),
            r#"{"name":"Circle","self":"[Circular]"}"#
        );
    }

    #[test]
    fn test_indirect_cycle_is_marked_at_the_back_edge() {
        let mut graph = Graph::new();
        let parent = graph.object();
        let children = graph.array();
        let child = graph.object();
        graph.insert(parent, "children", children).unwrap();
        graph.push(children, child).unwrap();
        graph.insert(child, "parent", parent).unwrap();
        graph.set_root(parent).unwrap();

        assert_eq!(
            encode_graph(&graph).unwrap(),
            r#"{"children":[{"parent":"[Circular]"}]}"#
        );
    }

    #[test]
    fn test_shared_siblings_are_not_flagged() {
        let mut graph = Graph::new();
        let root = graph.object();
        let shared = graph.add(&Value::object([("id", Value::from(7))]));
        graph.insert(root, "left", shared).unwrap();
        graph.insert(root, "right", shared).unwrap();
        graph.set_root(root).unwrap();

        assert_eq!(
            encode_graph(&graph).unwrap(),
            r#"{"left":{"id":7},"right":{"id":7}}"#
        );
    }

    fn nested_arrays(depth: usize) -> Value {
        (0..depth).fold(Value::from(1), |inner, _| Value::Array(vec![inner]))
    }

    #[test]
    fn test_nesting_at_the_limit_decodes() {
        let mut innermost = Value::Date(DateInstant::from_millis(0).unwrap());
        for _ in 0..MAX_NESTING_DEPTH {
            innermost = Value::Array(vec![innermost]);
        }
        let text = encode(&innermost).unwrap();
        assert_eq!(crate::serialization::decode(&text).unwrap(), innermost);
    }

    #[test]
    fn test_excessive_nesting_is_rejected() {
        match encode(&nested_arrays(200)) {
            Err(Error::Encode { path, message }) => {
                assert!(path.starts_with("$[0][0]"));
                assert!(message.contains("nested deeper"));
            }
            other => panic!("expected encode error, got {other:?}"),
        }
        assert!(encode_graph(&Graph::from(&nested_arrays(200))).is_err());
        assert!(encode(&nested_arrays(MAX_NESTING_DEPTH + 1)).is_err());
    }

    #[test]
    fn test_graph_without_root() {
        assert!(encode_graph(&Graph::new()).is_err());
    }

    #[test]
    fn test_graph_and_tree_encodings_agree() {
        let value = Value::object([
            ("when", Value::Date(DateInstant::from_millis(0).unwrap())),
            ("tags", Value::Array(vec!["a".into(), "b".into()])),
            ("skip", Value::Undefined),
        ]);
        assert_eq!(
            encode(&value).unwrap(),
            encode_graph(&Graph::from(&value)).unwrap()
        );
    }
}
