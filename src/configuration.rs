use std::sync::Arc;

use crate::error::Result;

/// A configuration node: a subtree or scalar value of the configuration tree.
pub type Node = serde_json::Value;

/// Search results, in the order the store produced them.
pub type Nodes = std::vec::IntoIter<Node>;

/// The attribute holding a node's UUID.
pub const UUID_ATTRIBUTE: &str = "_.uuid";

/// Read access to a configuration tree through lite-path queries.
///
/// `search` is the canonical (and possibly slow) evaluator; `get_configuration_node`
/// materializes the single node found at an address.
pub trait Configuration {
    fn search(&self, query: &str) -> Result<Nodes>;
    /// First node addressed by `query`, or `None`. Relative queries are
    /// evaluated against `context` when one is given.
    fn get_configuration_node(&self, query: &str, context: Option<&Node>) -> Result<Option<Node>>;
}

impl<T: Configuration + ?Sized> Configuration for Arc<T> {
    fn search(&self, query: &str) -> Result<Nodes> {
        (**self).search(query)
    }
    fn get_configuration_node(&self, query: &str, context: Option<&Node>) -> Result<Option<Node>> {
        (**self).get_configuration_node(query, context)
    }
}

impl<T: Configuration + ?Sized> Configuration for &T {
    fn search(&self, query: &str) -> Result<Nodes> {
        (**self).search(query)
    }
    fn get_configuration_node(&self, query: &str, context: Option<&Node>) -> Result<Option<Node>> {
        (**self).get_configuration_node(query, context)
    }
}
