use std::collections::HashMap;
use std::sync::Arc;

use crate::Category;

/// Height of a node nothing has been filed under yet.
pub const MAX_HEIGHT: usize = 100_000;

/// Outgoing edges of a trie node. Most nodes have exactly one child, so the
/// single case is kept inline and upgraded to a map on the second edge.
#[derive(Debug)]
enum Edges {
    Single(String, Box<Node>),
    Many(HashMap<String, Node>),
}

/// A trie node. It is a leaf iff it holds a rule.
#[derive(Debug)]
pub(crate) struct Node {
    pub category: Option<Arc<Category>>,
    /// Minimum number of path words needed to reach any rule below.
    pub height: usize,
    /// The rule stands in for a `<THAT> * <TOPIC> *` suffix.
    pub shortcut: bool,
    /// Lowercase names of the word-sets with an edge out of this node.
    pub sets: Vec<String>,
    edges: Option<Edges>,
}

impl Default for Node {
    fn default() -> Self {
        Node {
            category: None,
            height: MAX_HEIGHT,
            shortcut: false,
            sets: Vec::new(),
            edges: None,
        }
    }
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        self.category.is_some()
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        match self.edges.as_ref()? {
            Edges::Single(word, child) if word == key => Some(child.as_ref()),
            Edges::Single(..) => None,
            Edges::Many(children) => children.get(key),
        }
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        match self.edges.as_mut()? {
            Edges::Single(word, child) if word.as_str() == key => Some(child.as_mut()),
            Edges::Single(..) => None,
            Edges::Many(children) => children.get_mut(key),
        }
    }

    #[cfg(test)]
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Returns the child under `key`, creating it if needed.
    pub fn child_or_insert(&mut self, key: &str) -> &mut Node {
        let edges = match self.edges.take() {
            None => Edges::Single(key.to_owned(), Box::default()),
            Some(Edges::Single(word, child)) if word != key => {
                let mut children = HashMap::with_capacity(2);
                children.insert(word, *child);
                Edges::Many(children)
            }
            Some(edges) => edges,
        };

        match self.edges.insert(edges) {
            Edges::Single(_, child) => &mut **child,
            Edges::Many(children) => children.entry(key.to_owned()).or_default(),
        }
    }

    pub fn add_set(&mut self, name: String) {
        if !self.sets.contains(&name) {
            self.sets.push(name);
        }
    }

    pub fn edge_count(&self) -> usize {
        match &self.edges {
            None => 0,
            Some(Edges::Single(..)) => 1,
            Some(Edges::Many(children)) => children.len(),
        }
    }

    pub fn is_singleton(&self) -> bool {
        matches!(self.edges, Some(Edges::Single(..)))
    }

    pub fn edges(&self) -> Box<dyn Iterator<Item = (&str, &Node)> + '_> {
        match &self.edges {
            None => Box::new(std::iter::empty()),
            Some(Edges::Single(word, child)) => {
                Box::new(std::iter::once((word.as_str(), child.as_ref())))
            }
            Some(Edges::Many(children)) => {
                Box::new(children.iter().map(|(word, child)| (word.as_str(), child)))
            }
        }
    }
}
