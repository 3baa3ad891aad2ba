//! Arena representation for values with shared or cyclic references
//!
//! A [`Value`] is a plain tree and cannot refer to itself. Callers that hold
//! object graphs (a task pointing back at its parent list, a record reachable
//! from two places) build a [`Graph`] instead: every container is a node in an
//! arena and children are [`NodeId`] handles, so the same node may appear under
//! several parents or under itself.

use super::value::Value;
use crate::errors::{Error, Result};
use indexmap::IndexMap;
use std::fmt;

/// Handle of a node inside a [`Graph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A node of the arena
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Any non-container value
    Leaf(Value),
    Array(Vec<NodeId>),
    Object(IndexMap<String, NodeId>),
}

/// Arena of nodes with a designated root
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    root: Option<NodeId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_node(&mut self, node: Node) -> NodeId {
        self.nodes.push(node);
        NodeId(self.nodes.len() - 1)
    }

    /// Add an empty object node
    pub fn object(&mut self) -> NodeId {
        self.push_node(Node::Object(IndexMap::new()))
    }

    /// Add an empty array node
    pub fn array(&mut self) -> NodeId {
        self.push_node(Node::Array(Vec::new()))
    }

    /// Deep-copy a value into the arena; every container gets a fresh node
    pub fn add(&mut self, value: &Value) -> NodeId {
        match value {
            Value::Array(items) => {
                let children = items.iter().map(|item| self.add(item)).collect();
                self.push_node(Node::Array(children))
            }
            Value::Object(fields) => {
                let children = fields
                    .iter()
                    .map(|(key, item)| (key.clone(), self.add(item)))
                    .collect();
                self.push_node(Node::Object(children))
            }
            leaf => self.push_node(Node::Leaf(leaf.clone())),
        }
    }

    /// Set `key` on an object node to refer to `child`
    pub fn insert(&mut self, object: NodeId, key: impl Into<String>, child: NodeId) -> Result<()> {
        self.check(child)?;
        match self.nodes.get_mut(object.0) {
            Some(Node::Object(fields)) => {
                fields.insert(key.into(), child);
                Ok(())
            }
            Some(_) => Err(Error::encode(object.to_string(), "node is not an object")),
            None => Err(Error::encode(object.to_string(), "no such node")),
        }
    }

    /// Append `child` to an array node
    pub fn push(&mut self, array: NodeId, child: NodeId) -> Result<()> {
        self.check(child)?;
        match self.nodes.get_mut(array.0) {
            Some(Node::Array(items)) => {
                items.push(child);
                Ok(())
            }
            Some(_) => Err(Error::encode(array.to_string(), "node is not an array")),
            None => Err(Error::encode(array.to_string(), "no such node")),
        }
    }

    pub fn set_root(&mut self, root: NodeId) -> Result<()> {
        self.check(root)?;
        self.root = Some(root);
        Ok(())
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    fn check(&self, id: NodeId) -> Result<()> {
        if id.0 < self.nodes.len() {
            Ok(())
        } else {
            Err(Error::encode(id.to_string(), "no such node"))
        }
    }
}

impl From<&Value> for Graph {
    fn from(value: &Value) -> Self {
        let mut graph = Graph::new();
        let root = graph.add(value);
        graph.root = Some(root);
        graph
    }
}
