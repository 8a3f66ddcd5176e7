use std::sync::Arc;
use std::sync::atomic::Ordering;

use tracing::{debug, trace, warn};

use super::Graph;
use crate::node::Node;
use crate::path::{Path, Segment, THAT, TOPIC, is_marker, sentence};
use crate::{Category, Stars, WordSets};

/// A successful match: the selected rule and the spans its wildcards bound.
#[derive(Debug, Clone)]
pub struct Match {
    /// The selected rule.
    pub category: Arc<Category>,
    /// What each wildcard bound, per segment.
    pub stars: Stars,
}

/// A leaf reached by the search, with bindings collected while unwinding.
struct Found<'g> {
    node: &'g Node,
    stars: Stars,
}

impl<'g> Found<'g> {
    fn at(node: &'g Node) -> Self {
        Found {
            node,
            stars: Stars::default(),
        }
    }
}

/// Where the search is within the path: which segment's stars are being
/// filled and the next free index in it.
#[derive(Debug, Clone, Copy)]
struct Cursor {
    segment: Segment,
    star: usize,
}

impl Cursor {
    fn next_star(self) -> Self {
        Cursor {
            star: self.star + 1,
            ..self
        }
    }
}

impl Graph {
    /// Finds the highest-priority rule for an input in context.
    ///
    /// Empty fields are replaced by sentinel tokens before matching; `None`
    /// means no rule applies.
    pub fn match_input(
        &self,
        input: &str,
        that: &str,
        topic: &str,
        sets: &dyn WordSets,
    ) -> Option<Match> {
        let path = Path::from_context(input, that, topic);
        let search = Search { graph: self, sets };

        let Some(found) = search.visit(&self.root, path.words(), Cursor {
            segment: Segment::Input,
            star: 0,
        }) else {
            debug!(path = %path, "No match");
            return None;
        };

        let category = found.node.category.clone()?;
        category.record_activation(path.to_string(), self.config.max_sample_matches);
        debug!(path = %path, matched = %category.input_that_topic(), "Matched");

        Some(Match {
            category,
            stars: found.stars,
        })
    }
}

struct Search<'g> {
    graph: &'g Graph,
    sets: &'g dyn WordSets,
}

impl<'g> Search<'g> {
    fn visit(&self, node: &'g Node, path: &[String], cursor: Cursor) -> Option<Found<'g>> {
        self.graph.attempts.fetch_add(1, Ordering::Relaxed);

        let Some(word) = path.first() else {
            return node.is_leaf().then(|| Found::at(node));
        };
        if path.len() < node.height {
            return None;
        }

        let upper = word.to_uppercase();
        self.dollar(node, path, &upper, cursor)
            .or_else(|| self.zero_or_more(node, path, "#", cursor))
            .or_else(|| self.one_or_more(node, path, "_", cursor))
            .or_else(|| self.word(node, path, &upper, cursor))
            .or_else(|| self.set(node, path, cursor))
            .or_else(|| self.shortcut(node, path))
            .or_else(|| self.zero_or_more(node, path, "^", cursor))
            .or_else(|| self.one_or_more(node, path, "*", cursor))
    }

    fn dollar(&self, node: &'g Node, path: &[String], upper: &str, cursor: Cursor) -> Option<Found<'g>> {
        let child = node.get(&format!("${upper}"))?;
        self.visit(child, &path[1..], cursor)
    }

    fn word(&self, node: &'g Node, path: &[String], upper: &str, cursor: Cursor) -> Option<Found<'g>> {
        let child = node.get(upper)?;
        let cursor = match path[0].as_str() {
            THAT => Cursor {
                segment: Segment::That,
                star: 0,
            },
            TOPIC => Cursor {
                segment: Segment::Topic,
                star: 0,
            },
            _ => cursor,
        };
        self.visit(child, &path[1..], cursor)
    }

    /// `#` and `^`: the zero-width binding first, then one or more words.
    fn zero_or_more(
        &self,
        node: &'g Node,
        path: &[String],
        wildcard: &str,
        cursor: Cursor,
    ) -> Option<Found<'g>> {
        let child = node.get(wildcard)?;
        if let Some(mut found) = self.visit(child, path, cursor.next_star()) {
            self.bind(&mut found, cursor, self.graph.config.null_star.clone());
            return Some(found);
        }
        self.span(child, path, cursor)
    }

    fn one_or_more(
        &self,
        node: &'g Node,
        path: &[String],
        wildcard: &str,
        cursor: Cursor,
    ) -> Option<Found<'g>> {
        let child = node.get(wildcard)?;
        self.span(child, path, cursor)
    }

    /// Binds one or more leading words to the wildcard leading to `child`,
    /// trying the shortest span first.
    fn span(&self, child: &'g Node, path: &[String], cursor: Cursor) -> Option<Found<'g>> {
        if is_marker(&path[0]) {
            return None;
        }

        if child.is_leaf() && !child.shortcut {
            let mut found = Found::at(child);
            self.bind(&mut found, cursor, sentence(path));
            return Some(found);
        }

        for consumed in 1..path.len() {
            if let Some(mut found) = self.visit(child, &path[consumed..], cursor.next_star()) {
                self.bind(&mut found, cursor, sentence(&path[..consumed]));
                return Some(found);
            }
            if is_marker(&path[consumed]) {
                break;
            }
        }
        None
    }

    /// Tries each set routed through this node, preferring the longest
    /// member phrase.
    fn set(&self, node: &'g Node, path: &[String], cursor: Cursor) -> Option<Found<'g>> {
        if node.sets.is_empty() || is_marker(&path[0]) {
            return None;
        }

        for name in &node.sets {
            let Some(child) = node.get(&format!("<SET>{}</SET>", name.to_uppercase())) else {
                continue;
            };
            let longest = self.sets.max_phrase_length(name).min(path.len() - 1);

            let mut best = None;
            for length in 1..=longest {
                let phrase = &path[..length];
                if is_marker(&phrase[length - 1]) {
                    break;
                }
                if !self.sets.contains(name, &sentence(phrase).to_uppercase()) {
                    continue;
                }
                if let Some(mut found) = self.visit(child, &path[length..], cursor.next_star()) {
                    trace!(set = %name, phrase = %sentence(phrase), "Set member matched");
                    self.bind(&mut found, cursor, sentence(phrase));
                    best = Some(found);
                }
            }

            if best.is_some() {
                return best;
            }
        }
        None
    }

    fn shortcut(&self, node: &'g Node, path: &[String]) -> Option<Found<'g>> {
        if !node.shortcut || !node.is_leaf() || path[0] != THAT {
            return None;
        }

        let topic_at = path.iter().position(|word| word == TOPIC)?;
        let mut found = Found::at(node);
        found.stars.bind(Segment::That, 0, sentence(&path[1..topic_at]));
        found.stars.bind(Segment::Topic, 0, sentence(&path[topic_at + 1..]));
        Some(found)
    }

    fn bind(&self, found: &mut Found<'g>, cursor: Cursor, span: String) {
        if cursor.star < self.graph.config.max_stars {
            found.stars.bind(cursor.segment, cursor.star, span);
        } else {
            warn!(index = cursor.star, "Too many wildcards; binding dropped");
        }
    }
}
