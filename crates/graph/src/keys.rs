//! Field names binding edges to nodes.

use alloc::string::{String, ToString};

/// Names the columns that identify nodes and edge endpoints.
///
/// Without a node key, edges store raw node row numbers. With one, edges
/// store values of that node column and nodes are resolved through an index.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GraphKeys {
    /// Integer column identifying nodes, or `None` to use row numbers.
    pub node_key: Option<String>,
    /// Edge column holding the source node identity.
    pub source_key: String,
    /// Edge column holding the target node identity.
    pub target_key: String,
}

impl Default for GraphKeys {
    fn default() -> Self {
        Self::new("source", "target")
    }
}

impl GraphKeys {
    /// Keys for edges stored in `source_key` and `target_key`.
    pub fn new(source_key: &str, target_key: &str) -> Self {
        Self {
            node_key: None,
            source_key: source_key.to_string(),
            target_key: target_key.to_string(),
        }
    }

    /// Keys for parent-to-child tree edges.
    pub fn tree() -> Self {
        Self::new("parent", "child")
    }

    /// Identifies nodes by the values of `node_key`.
    pub fn with_node_key(mut self, node_key: &str) -> Self {
        self.node_key = Some(node_key.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let keys = GraphKeys::default();
        assert_eq!(keys.source_key, "source");
        assert_eq!(keys.target_key, "target");
        assert!(keys.node_key.is_none());

        let keys = GraphKeys::tree().with_node_key("id");
        assert_eq!(keys.source_key, "parent");
        assert_eq!(keys.node_key.as_deref(), Some("id"));
    }
}
