use std::collections::VecDeque;

/// A bounded most-recent-first history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct History<T> {
    items: VecDeque<T>,
    capacity: usize,
}

impl<T> History<T> {
    /// An empty history keeping at most `capacity` items.
    pub fn new(capacity: usize) -> Self {
        History {
            items: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Records the newest item, evicting the oldest once full.
    pub fn push(&mut self, item: T) {
        if self.capacity == 0 {
            return;
        }
        if self.items.len() == self.capacity {
            self.items.pop_back();
        }
        self.items.push_front(item);
    }

    /// The item `index` steps back; 0 is the newest.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Items from most to least recent.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.items.iter()
    }

    /// Number of items kept.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing was pushed yet.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
