use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Key/value lookups used by `<map>`.
pub trait WordMaps {
    /// Looks `key` (uppercased) up in the named map.
    fn get(&self, map: &str, key: &str) -> Option<String>;
}

type Compute = Arc<dyn Fn(&str) -> Option<String> + Send + Sync>;

#[derive(Clone)]
enum WordMap {
    Listed(HashMap<String, String>),
    Computed(Compute),
}

impl Debug for WordMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WordMap::Listed(entries) => f.debug_tuple("Listed").field(&entries.len()).finish(),
            WordMap::Computed(_) => f.write_str("Computed"),
        }
    }
}

/// In-memory maps, with `successor` and `predecessor` computed over
/// integers.
#[derive(Debug, Clone)]
pub struct MapRegistry {
    maps: HashMap<String, WordMap>,
}

impl Default for MapRegistry {
    fn default() -> Self {
        let mut registry = MapRegistry {
            maps: HashMap::new(),
        };
        registry.insert_computed("successor", |key| {
            key.trim().parse::<i64>().ok()?.checked_add(1).map(|n| n.to_string())
        });
        registry.insert_computed("predecessor", |key| {
            key.trim().parse::<i64>().ok()?.checked_sub(1).map(|n| n.to_string())
        });
        registry
    }
}

impl MapRegistry {
    /// Registers a listed map. Keys are matched uppercased.
    pub fn insert<I, K, V>(&mut self, name: &str, entries: I)
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let entries = entries
            .into_iter()
            .map(|(key, value)| (key.as_ref().trim().to_uppercase(), value.into()))
            .collect();
        self.maps.insert(name.to_lowercase(), WordMap::Listed(entries));
    }

    /// Registers a map whose values are computed from the key.
    pub fn insert_computed<F>(&mut self, name: &str, compute: F)
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.maps
            .insert(name.to_lowercase(), WordMap::Computed(Arc::new(compute)));
    }

    /// Whether a map with this name is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.maps.contains_key(&name.to_lowercase())
    }
}

impl WordMaps for MapRegistry {
    fn get(&self, map: &str, key: &str) -> Option<String> {
        match self.maps.get(&map.to_lowercase())? {
            WordMap::Listed(entries) => entries.get(key).cloned(),
            WordMap::Computed(compute) => compute(key),
        }
    }
}
