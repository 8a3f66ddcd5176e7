//! The pattern graph: a word trie of rules with a prioritized backtracking
//! matcher.
//!
//! Rules are filed under the path `pattern <THAT> that <TOPIC> topic`. The
//! common `<THAT> * <TOPIC> *` suffix is collapsed into a shortcut leaf when
//! [`GraphConfig::shortcuts`] is set; matching treats both shapes the same.

mod matching;

pub use matching::Match;

use std::collections::BTreeSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{debug, info};

use crate::category::canonical;
use crate::node::Node;
use crate::path::{Path, THAT, TOPIC, UNKNOWN, input_that_topic};
use crate::{Category, GraphConfig, Properties, WordSets};

const BOT_OPEN: &str = "<bot name=\"";
const BOT_CLOSE: &str = "\"/>";

/// Shape counters for a graph, as reported by [`Graph::stats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GraphStats {
    /// Total number of nodes, root included.
    pub nodes: usize,
    /// Nodes holding a rule.
    pub leaves: usize,
    /// Nodes with exactly one outgoing edge.
    pub singletons: usize,
    /// Leaves that stand for a collapsed `<THAT> * <TOPIC> *` suffix.
    pub shortcuts: usize,
    /// Nodes with more than one outgoing edge.
    pub branching: usize,
    /// Total number of edges.
    pub edges: usize,
}

impl GraphStats {
    /// Average out-degree of the branching nodes.
    pub fn branching_factor(&self) -> f64 {
        let multi = self.edges.saturating_sub(self.singletons);
        if self.branching == 0 {
            0.0
        } else {
            multi as f64 / self.branching as f64
        }
    }
}

/// A trie of rules keyed by the words of their paths.
#[derive(Debug)]
pub struct Graph {
    root: Node,
    config: GraphConfig,
    categories: usize,
    attempts: AtomicU64,
}

impl Default for Graph {
    fn default() -> Self {
        Graph::new(GraphConfig::default())
    }
}

impl Graph {
    /// An empty graph.
    pub fn new(config: GraphConfig) -> Self {
        Graph {
            root: Node::default(),
            config,
            categories: 0,
            attempts: AtomicU64::new(0),
        }
    }

    /// The settings the graph was built with.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    /// Files a rule under its path and returns the shared handle now owned by
    /// the graph. A rule already filed under the same path is replaced.
    pub fn insert(
        &mut self,
        category: impl Into<Arc<Category>>,
        properties: &dyn Properties,
        sets: &dyn WordSets,
    ) -> Arc<Category> {
        let category = category.into();
        let path = Path::from_sentence(&resolve_properties(
            &category.input_that_topic(),
            properties,
        ));

        let replaced = add_path(
            &mut self.root,
            path.words(),
            Arc::clone(&category),
            self.config.shortcuts,
            sets,
        );

        if replaced {
            debug!(path = %path, "Replaced existing category");
        } else {
            self.categories += 1;
        }

        category
    }

    /// Looks up the rule filed under exactly this pattern, that and topic.
    /// `<bot name>` placeholders resolve as they did on insert.
    pub fn find(
        &self,
        pattern: &str,
        that: &str,
        topic: &str,
        properties: &dyn Properties,
    ) -> Option<Arc<Category>> {
        let path = canonical_path(pattern, that, topic, properties);
        let mut node = &self.root;
        let mut words = path.words();
        loop {
            if words.is_empty() || (node.shortcut && is_shortcut_tail(words)) {
                return node.category.clone();
            }
            node = node.get(&words[0])?;
            words = &words[1..];
        }
    }

    /// Whether a rule is filed under exactly this path.
    pub fn contains(
        &self,
        pattern: &str,
        that: &str,
        topic: &str,
        properties: &dyn Properties,
    ) -> bool {
        self.find(pattern, that, topic, properties).is_some()
    }

    /// Soft-deletes a rule: the trie path stays, the leaf forgets its rule.
    pub fn forget(
        &mut self,
        pattern: &str,
        that: &str,
        topic: &str,
        properties: &dyn Properties,
    ) -> Option<Arc<Category>> {
        let path = canonical_path(pattern, that, topic, properties);
        let mut node = &mut self.root;
        let mut words = path.words();
        loop {
            if words.is_empty() || (node.shortcut && is_shortcut_tail(words)) {
                let removed = node.category.take();
                if removed.is_some() {
                    self.categories = self.categories.saturating_sub(1);
                    debug!(path = %path, "Forgot category");
                }
                return removed;
            }
            node = node.get_mut(&words[0])?;
            words = &words[1..];
        }
    }

    /// Every live rule, ordered by the path it is filed under.
    pub fn categories(&self) -> Vec<Arc<Category>> {
        let mut categories = Vec::with_capacity(self.categories);
        collect_categories(&self.root, &mut categories);
        categories.sort_by_key(|category| category.input_that_topic());
        categories
    }

    /// Every edge label in the trie.
    pub fn vocabulary(&self) -> BTreeSet<String> {
        let mut vocabulary = BTreeSet::new();
        collect_vocabulary(&self.root, &mut vocabulary);
        vocabulary
    }

    /// Counts the graph's nodes by shape.
    pub fn stats(&self) -> GraphStats {
        let mut stats = GraphStats::default();
        collect_stats(&self.root, &mut stats);
        stats
    }

    /// Number of rules currently filed.
    pub fn len(&self) -> usize {
        self.categories
    }

    /// Whether no rule is filed.
    pub fn is_empty(&self) -> bool {
        self.categories == 0
    }

    /// Nodes visited by the matcher since the graph was created.
    pub fn match_attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }
}

fn canonical_path(pattern: &str, that: &str, topic: &str, properties: &dyn Properties) -> Path {
    let path = input_that_topic(&canonical(pattern), &canonical(that), &canonical(topic));
    Path::from_sentence(&resolve_properties(&path, properties))
}

fn is_shortcut_tail(words: &[String]) -> bool {
    matches!(words, [that, star, topic, other] if that == THAT && star == "*" && topic == TOPIC && other == "*")
}

fn set_name(word: &str) -> Option<String> {
    word.strip_prefix("<SET>")
        .and_then(|rest| rest.strip_suffix("</SET>"))
        .map(str::to_lowercase)
}

fn add_path(
    node: &mut Node,
    words: &[String],
    category: Arc<Category>,
    shortcuts: bool,
    sets: &dyn WordSets,
) -> bool {
    let Some((word, rest)) = words.split_first() else {
        node.height = 0;
        return node.category.replace(category).is_some();
    };

    if shortcuts && is_shortcut_tail(words) {
        node.height = node.height.min(4);
        node.shortcut = true;
        return node.category.replace(category).is_some();
    }

    if let Some(name) = set_name(word) {
        if sets.is_defined(&name) {
            node.add_set(name);
        } else {
            info!(set = %name, "No such set; pattern edge will only match literally");
        }
    }

    let child = node.child_or_insert(word);
    let replaced = add_path(child, rest, category, shortcuts, sets);
    let below = child.height;
    let offset = if word == "#" || word == "^" { 0 } else { 1 };
    node.height = node.height.min(offset + below);
    replaced
}

/// Replaces each `<bot name="x"/>` placeholder with the uppercased property.
fn resolve_properties(path: &str, properties: &dyn Properties) -> String {
    let mut resolved = String::with_capacity(path.len());
    let mut rest = path;

    while let Some(start) = rest.to_ascii_lowercase().find(BOT_OPEN) {
        let name_start = start + BOT_OPEN.len();
        let Some(name_len) = rest[name_start..].find(BOT_CLOSE) else {
            break;
        };
        let name = rest[name_start..name_start + name_len].to_lowercase();
        let value = properties
            .property(&name)
            .unwrap_or_else(|| UNKNOWN.to_owned());

        resolved.push_str(&rest[..start]);
        resolved.push_str(&value.to_uppercase());
        rest = &rest[name_start + name_len + BOT_CLOSE.len()..];
    }

    resolved.push_str(rest);
    resolved
}

fn collect_categories(node: &Node, categories: &mut Vec<Arc<Category>>) {
    if let Some(category) = &node.category {
        categories.push(Arc::clone(category));
    }
    for (_, child) in node.edges() {
        collect_categories(child, categories);
    }
}

fn collect_vocabulary(node: &Node, vocabulary: &mut BTreeSet<String>) {
    for (word, child) in node.edges() {
        vocabulary.insert(word.to_owned());
        collect_vocabulary(child, vocabulary);
    }
}

fn collect_stats(node: &Node, stats: &mut GraphStats) {
    stats.nodes += 1;
    stats.edges += node.edge_count();
    if node.is_leaf() {
        stats.leaves += 1;
    }
    if node.shortcut {
        stats.shortcuts += 1;
    }
    if node.is_singleton() {
        stats.singletons += 1;
    }
    if node.edge_count() > 1 {
        stats.branching += 1;
    }
    for (_, child) in node.edges() {
        collect_stats(child, stats);
    }
}
