//! Path store
//!
//! Maps absolute path strings to entries. There is no tree index: the
//! hierarchy is derived on demand by comparing each key's parent path.
//!
//! Keys are bound to node ids and node ids own the entries, so two keys may
//! share one entry. A symlink created with [`PathStore::alias`] is such a
//! binding: a change made through either key is visible through the other,
//! and removing one key leaves the other holding a live entry.

use std::collections::HashMap;

use super::Entry;

/// Arena index of a stored entry
pub type NodeId = u64;

#[derive(Debug)]
struct Node {
    entry: Entry,
    /// Number of path keys bound to this node
    links: usize,
}

/// Path to entry mapping
#[derive(Debug, Default)]
pub struct PathStore {
    /// Path to node mapping
    paths: HashMap<String, NodeId>,

    /// Node arena
    nodes: HashMap<NodeId, Node>,

    next_id: NodeId,
}

impl PathStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Get an entry by path
    pub fn get(&self, path: &str) -> Option<&Entry> {
        let id = self.paths.get(path)?;
        self.nodes.get(id).map(|node| &node.entry)
    }

    /// Get a mutable entry by path
    pub fn get_mut(&mut self, path: &str) -> Option<&mut Entry> {
        let id = self.paths.get(path)?;
        self.nodes.get_mut(id).map(|node| &mut node.entry)
    }

    /// Check if path exists
    pub fn contains(&self, path: &str) -> bool {
        self.paths.contains_key(path)
    }

    /// Bind `path` to a new entry, unbinding whatever it pointed at before
    pub fn put(&mut self, path: &str, entry: Entry) -> NodeId {
        let id = self.next_id;
        self.next_id += 1;
        self.nodes.insert(id, Node { entry, links: 0 });
        self.bind(path, id);
        id
    }

    /// Remove an entry; returns true if the path existed
    pub fn remove(&mut self, path: &str) -> bool {
        match self.paths.remove(path) {
            Some(id) => {
                self.unlink(id);
                true
            }
            None => false,
        }
    }

    /// Move the entry bound at `source` to `destination`.
    /// Returns false (and changes nothing) if `source` is absent.
    pub fn rename(&mut self, source: &str, destination: &str) -> bool {
        match self.paths.remove(source) {
            Some(id) => {
                // The source binding is transferred, not duplicated
                self.bind(destination, id);
                self.unlink(id);
                true
            }
            None => false,
        }
    }

    /// Bind `destination` to the same entry as `source`.
    /// Returns false (and changes nothing) if `source` is absent.
    pub fn alias(&mut self, source: &str, destination: &str) -> bool {
        match self.paths.get(source).copied() {
            Some(id) => {
                self.bind(destination, id);
                true
            }
            None => false,
        }
    }

    /// Whether two paths are bound to the same entry
    pub fn same_entry(&self, a: &str, b: &str) -> bool {
        match (self.paths.get(a), self.paths.get(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    /// Number of paths bound to the entry at `path`; 0 if absent
    pub fn link_count(&self, path: &str) -> usize {
        self.paths
            .get(path)
            .and_then(|id| self.nodes.get(id))
            .map_or(0, |node| node.links)
    }

    /// All entries whose parent path equals `parent`, excluding `parent` itself
    pub fn list_children(&self, parent: &str) -> Vec<&Entry> {
        self.paths
            .iter()
            .filter(|(path, _)| path.as_str() != parent && parent_path(path) == parent)
            .filter_map(|(_, id)| self.nodes.get(id).map(|node| &node.entry))
            .collect()
    }

    /// Remove every key whose parent path equals `parent`; returns how many
    pub fn remove_children(&mut self, parent: &str) -> usize {
        let children: Vec<String> = self
            .paths
            .keys()
            .filter(|path| parent_path(path) == parent)
            .cloned()
            .collect();

        for path in &children {
            self.remove(path);
        }
        children.len()
    }

    /// Get all paths
    pub fn paths(&self) -> impl Iterator<Item = &String> {
        self.paths.keys()
    }

    /// Get path count
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Number of distinct entries held (aliases counted once)
    pub fn entry_count(&self) -> usize {
        self.nodes.len()
    }

    fn bind(&mut self, path: &str, id: NodeId) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.links += 1;
        }
        if let Some(previous) = self.paths.insert(path.to_string(), id) {
            self.unlink(previous);
        }
    }

    fn unlink(&mut self, id: NodeId) {
        let orphaned = match self.nodes.get_mut(&id) {
            Some(node) => {
                node.links = node.links.saturating_sub(1);
                node.links == 0
            }
            None => false,
        };
        if orphaned {
            self.nodes.remove(&id);
        }
    }
}

/// Parent directory of a slash-separated path.
///
/// `"/a/b"` → `"/a"`, `"/a"` → `"/"`, `"/"` → `"/"`, `"a"` → `"."`.
/// Trailing and repeated separators are ignored.
pub fn parent_path(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        return if path.starts_with('/') { "/" } else { "." };
    }

    match trimmed.rfind('/') {
        Some(idx) => {
            let head = trimmed[..idx].trim_end_matches('/');
            if head.is_empty() {
                "/"
            } else {
                head
            }
        }
        None => ".",
    }
}

/// Final segment of a slash-separated path (`""` for the root)
pub fn base_name(path: &str) -> &str {
    let trimmed = path.trim_end_matches('/');
    match trimmed.rfind('/') {
        Some(idx) => &trimmed[idx + 1..],
        None => trimmed,
    }
}
