//! An in-memory configuration store.
//!
//! The tree is a `serde_json::Value`; objects are keyed children, arrays are
//! positional children. Alongside the tree sits a UUID to path map that can be
//! rebuilt from the tree or edited directly, which makes it possible to put
//! the index out of step with the tree on purpose.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};
use std::hash::BuildHasherDefault;
use std::sync::{RwLock, RwLockReadGuard};

use seahash::SeaHasher;
use serde_json::Value;
use tracing::{debug, warn};

use crate::configuration::{Configuration, Node, Nodes, UUID_ATTRIBUTE};
use crate::error::{ConfError, Result};
use crate::index::ReferenceIndex;
use crate::litepath::{self, Axis, Expr, LitePath, NodeTest, Predicate, Step};
use crate::path::{Path, Segment};

pub type IndexHasher = BuildHasherDefault<SeaHasher>;

// @name yields the key a node is stored under
const NAME_ATTRIBUTE: &str = "name";

#[derive(Debug, Default)]
pub struct MemoryConfiguration {
    tree: RwLock<Node>,
    index: RwLock<HashMap<String, Path, IndexHasher>>,
}

impl MemoryConfiguration {
    /// A store over `tree` with an empty index.
    pub fn new(tree: Node) -> Self {
        Self { tree: RwLock::new(tree), index: RwLock::new(HashMap::default()) }
    }
    /// A store over `tree` with the index built from it.
    pub fn indexed(tree: Node) -> Result<Self> {
        let store = Self::new(tree);
        store.reindex()?;
        Ok(store)
    }
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }
    pub fn from_file(file: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(file)?;
        Self::from_json_str(&json)
    }

    fn read_tree(&self) -> Result<RwLockReadGuard<'_, Node>> {
        self.tree.read().map_err(|e| ConfError::Lock(e.to_string()))
    }
    fn read_index(&self) -> Result<RwLockReadGuard<'_, HashMap<String, Path, IndexHasher>>> {
        self.index.read().map_err(|e| ConfError::Lock(e.to_string()))
    }

    /// Replaces the tree. The index is left as it was.
    pub fn replace_tree(&self, tree: Node) -> Result<()> {
        *self.tree.write().map_err(|e| ConfError::Lock(e.to_string()))? = tree;
        Ok(())
    }
    pub fn tree(&self) -> Result<Node> {
        Ok(self.read_tree()?.clone())
    }
    pub fn node_at(&self, path: &Path) -> Result<Option<Node>> {
        Ok(node_at(&*self.read_tree()?, path).cloned())
    }

    /// Rebuilds the index from every `_.uuid` string in the tree and returns
    /// the number of entries.
    pub fn reindex(&self) -> Result<usize> {
        let mut entries = HashMap::default();
        {
            let tree = self.read_tree()?;
            collect_uuids(&tree, &mut Vec::new(), &mut entries);
        }
        let count = entries.len();
        *self.index.write().map_err(|e| ConfError::Lock(e.to_string()))? = entries;
        debug!(entries = count, "reference index rebuilt");
        Ok(count)
    }
    pub fn insert_index_entry(&self, uuid: impl Into<String>, path: Path) -> Result<Option<Path>> {
        let mut index = self.index.write().map_err(|e| ConfError::Lock(e.to_string()))?;
        Ok(index.insert(uuid.into(), path))
    }
    pub fn remove_index_entry(&self, uuid: &str) -> Result<Option<Path>> {
        let mut index = self.index.write().map_err(|e| ConfError::Lock(e.to_string()))?;
        Ok(index.remove(uuid))
    }
    pub fn index_len(&self) -> Result<usize> {
        Ok(self.read_index()?.len())
    }
}

fn collect_uuids(node: &Node, trail: &mut Vec<Segment>, entries: &mut HashMap<String, Path, IndexHasher>) {
    match node {
        Value::Object(map) => {
            if let Some(Value::String(uuid)) = map.get(UUID_ATTRIBUTE) {
                let path = Path::new(trail.clone());
                if let Some(previous) = entries.insert(uuid.clone(), path.clone()) {
                    warn!(%uuid, first = %previous, second = %path, "duplicate uuid in configuration tree");
                }
            }
            for (key, child) in map {
                trail.push(Segment::Key(key.clone()));
                collect_uuids(child, trail, entries);
                trail.pop();
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                trail.push(Segment::Index(i));
                collect_uuids(child, trail, entries);
                trail.pop();
            }
        }
        _ => {}
    }
}

pub fn node_at<'t>(root: &'t Node, path: &Path) -> Option<&'t Node> {
    path.segments().iter().try_fold(root, |node, segment| match (node, segment) {
        (Value::Object(map), Segment::Key(key)) => map.get(key),
        (Value::Array(items), Segment::Index(i)) => items.get(*i),
        _ => None,
    })
}

// ------------- Evaluation -------------
// A node together with where it was found.
#[derive(Debug, Clone)]
struct Located<'t> {
    path: Path,
    value: Cow<'t, Node>,
}

struct Evaluator<'t> {
    root: &'t Node,
}

impl<'t> Evaluator<'t> {
    fn top(&self) -> Located<'t> {
        Located { path: Path::default(), value: Cow::Borrowed(self.root) }
    }

    fn evaluate(&self, location: &LitePath, context: &Located<'t>) -> Vec<Located<'t>> {
        let mut current = vec![if location.anchored { self.top() } else { context.clone() }];
        for step in &location.steps {
            let mut seen = HashSet::<Path, IndexHasher>::default();
            let mut next = Vec::new();
            for item in &current {
                for found in self.step(step, item) {
                    if seen.insert(found.path.clone()) {
                        next.push(found);
                    }
                }
            }
            current = next;
        }
        current
    }

    fn step(&self, step: &Step, item: &Located<'t>) -> Vec<Located<'t>> {
        let mut candidates = match step.axis {
            Axis::Child => self.select(&step.test, item),
            Axis::Descendant => self
                .descendants_or_self(item)
                .iter()
                .flat_map(|n| self.select(&step.test, n))
                .collect(),
        };
        for predicate in &step.predicates {
            candidates = match predicate {
                Predicate::Position(n) => candidates.into_iter().nth(n.saturating_sub(1)).into_iter().collect(),
                Predicate::Filter(expr) => candidates.into_iter().filter(|c| self.holds(expr, c)).collect(),
            };
        }
        candidates
    }

    fn select(&self, test: &NodeTest, item: &Located<'t>) -> Vec<Located<'t>> {
        match test {
            NodeTest::Name(name) => self.keyed(item, name).into_iter().collect(),
            NodeTest::Wildcard => self.children(item),
            NodeTest::Current => vec![item.clone()],
            NodeTest::Parent => item
                .path
                .parent()
                .and_then(|p| node_at(self.root, &p).map(|v| Located { path: p, value: Cow::Borrowed(v) }))
                .into_iter()
                .collect(),
            NodeTest::Attribute(name) if name == NAME_ATTRIBUTE => match item.path.last() {
                Some(Segment::Key(key)) => vec![Located {
                    path: item.path.child(format!("@{NAME_ATTRIBUTE}")),
                    value: Cow::Owned(Value::String(key.clone())),
                }],
                _ => Vec::new(),
            },
            NodeTest::Attribute(name) => self.keyed(item, name).into_iter().collect(),
        }
    }

    fn keyed(&self, item: &Located<'t>, key: &str) -> Option<Located<'t>> {
        match borrowed(item) {
            Some(Value::Object(map)) => map.get(key).map(|v| Located {
                path: item.path.child(key),
                value: Cow::Borrowed(v),
            }),
            _ => None,
        }
    }

    fn children(&self, item: &Located<'t>) -> Vec<Located<'t>> {
        match borrowed(item) {
            Some(Value::Object(map)) => map
                .iter()
                .map(|(k, v)| Located { path: item.path.child(k.as_str()), value: Cow::Borrowed(v) })
                .collect(),
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(i, v)| Located { path: item.path.child(i), value: Cow::Borrowed(v) })
                .collect(),
            _ => Vec::new(),
        }
    }

    // pre-order, self first
    fn descendants_or_self(&self, item: &Located<'t>) -> Vec<Located<'t>> {
        let mut found = Vec::new();
        self.walk(item.clone(), &mut found);
        found
    }

    fn walk(&self, item: Located<'t>, found: &mut Vec<Located<'t>>) {
        let children = self.children(&item);
        found.push(item);
        for child in children {
            self.walk(child, found);
        }
    }

    fn holds(&self, expr: &Expr, item: &Located<'t>) -> bool {
        match expr {
            Expr::Or(items) => items.iter().any(|e| self.holds(e, item)),
            Expr::And(items) => items.iter().all(|e| self.holds(e, item)),
            Expr::Exists(location) => !self.evaluate(location, item).is_empty(),
            Expr::Equals(location, literal) => self
                .evaluate(location, item)
                .iter()
                .any(|found| scalar_equals(&found.value, literal)),
        }
    }
}

// attribute values are owned and have no children
fn borrowed<'t>(item: &Located<'t>) -> Option<&'t Node> {
    match item.value {
        Cow::Borrowed(value) => Some(value),
        Cow::Owned(_) => None,
    }
}

fn scalar_equals(value: &Value, literal: &str) -> bool {
    match value {
        Value::String(s) => s == literal,
        Value::Number(n) => n.to_string() == literal,
        Value::Bool(b) => b.to_string() == literal,
        _ => false,
    }
}

impl Configuration for MemoryConfiguration {
    fn search(&self, query: &str) -> Result<Nodes> {
        let location = litepath::parse(query)?;
        let tree = self.read_tree()?;
        let evaluator = Evaluator { root: &*tree };
        let found: Vec<Node> = evaluator
            .evaluate(&location, &evaluator.top())
            .into_iter()
            .map(|n| n.value.into_owned())
            .collect();
        Ok(found.into_iter())
    }

    fn get_configuration_node(&self, query: &str, context: Option<&Node>) -> Result<Option<Node>> {
        let location = litepath::parse(query)?;
        let first = |root: &Node| {
            let evaluator = Evaluator { root };
            evaluator
                .evaluate(&location, &evaluator.top())
                .into_iter()
                .next()
                .map(|n| n.value.into_owned())
        };
        match context {
            Some(node) if !location.anchored => Ok(first(node)),
            _ => Ok(first(&*self.read_tree()?)),
        }
    }
}

impl ReferenceIndex for MemoryConfiguration {
    fn resolve_path(&self, uuid: &str) -> Result<Option<Path>> {
        Ok(self.read_index()?.get(uuid).cloned())
    }

    fn check_consistency(&self, uuid: &str) -> Result<()> {
        let Some(path) = self.read_index()?.get(uuid).cloned() else {
            return Ok(());
        };
        let tree = self.read_tree()?;
        match node_at(&tree, &path).and_then(|node| node.get(UUID_ATTRIBUTE)) {
            Some(Value::String(found)) if found == uuid => Ok(()),
            Some(other) => Err(ConfError::OutOfSync {
                uuid: uuid.to_string(),
                reason: format!("node at {path} carries {other}"),
            }),
            None => Err(ConfError::OutOfSync {
                uuid: uuid.to_string(),
                reason: format!("no node with that uuid at {path}"),
            }),
        }
    }
}
