use std::collections::{BTreeSet, HashMap};

use tracing::debug;

/// A stored fact. Fields are whitespace-collapsed and uppercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Triple {
    /// Store-assigned identifier.
    pub id: String,
    /// Normalized subject.
    pub subject: String,
    /// Normalized predicate.
    pub predicate: String,
    /// Normalized object.
    pub object: String,
}

impl Triple {
    fn key(subject: &str, predicate: &str, object: &str) -> String {
        format!("{subject}:{predicate}:{object}")
    }
}

/// An in-memory triple store with subject, predicate and object indexes.
#[derive(Debug)]
pub struct TripleStore {
    name: String,
    next_id: u64,
    triples: HashMap<String, Triple>,
    by_key: HashMap<String, String>,
    subjects: HashMap<String, BTreeSet<String>>,
    predicates: HashMap<String, BTreeSet<String>>,
    objects: HashMap<String, BTreeSet<String>>,
}

impl Default for TripleStore {
    fn default() -> Self {
        TripleStore::new("triple")
    }
}

impl TripleStore {
    /// Creates an empty store. Triple ids are `name` followed by a counter.
    pub fn new(name: impl Into<String>) -> Self {
        TripleStore {
            name: name.into(),
            next_id: 0,
            triples: HashMap::new(),
            by_key: HashMap::new(),
            subjects: HashMap::new(),
            predicates: HashMap::new(),
            objects: HashMap::new(),
        }
    }

    /// Stores a fact and returns its id. Re-adding an existing fact returns
    /// the id it already has. `None` if any field is blank.
    pub fn add(&mut self, subject: &str, predicate: &str, object: &str) -> Option<String> {
        let (subject, predicate, object) = normalize_all(subject, predicate, object)?;
        let key = Triple::key(&subject, &predicate, &object);
        if let Some(id) = self.by_key.get(&key) {
            return Some(id.clone());
        }

        self.next_id += 1;
        let id = format!("{}{}", self.name, self.next_id);
        debug!(%id, %subject, %predicate, %object, "Adding triple");

        index(&mut self.subjects, &subject, &id);
        index(&mut self.predicates, &predicate, &id);
        index(&mut self.objects, &object, &id);
        self.by_key.insert(key, id.clone());
        self.triples.insert(
            id.clone(),
            Triple {
                id: id.clone(),
                subject,
                predicate,
                object,
            },
        );
        Some(id)
    }

    /// Removes a fact and returns the id it had, or `None` if it was not
    /// stored.
    pub fn delete(&mut self, subject: &str, predicate: &str, object: &str) -> Option<String> {
        let (subject, predicate, object) = normalize_all(subject, predicate, object)?;
        let id = self
            .by_key
            .remove(&Triple::key(&subject, &predicate, &object))?;
        debug!(%id, "Deleting triple");

        unindex(&mut self.subjects, &subject, &id);
        unindex(&mut self.predicates, &predicate, &id);
        unindex(&mut self.objects, &object, &id);
        self.triples.remove(&id);
        Some(id)
    }

    /// Ids of the triples matching the given fields. An absent field, or one
    /// naming a `?variable`, is unconstrained.
    pub fn get_triples(
        &self,
        subject: Option<&str>,
        predicate: Option<&str>,
        object: Option<&str>,
    ) -> BTreeSet<String> {
        let constraints = [
            (subject, &self.subjects),
            (predicate, &self.predicates),
            (object, &self.objects),
        ];

        let mut result: Option<BTreeSet<String>> = None;
        for (field, by_field) in constraints {
            let Some(value) = field.filter(|value| !value.starts_with('?')) else {
                continue;
            };
            let candidates = by_field.get(&normalize(value)).cloned().unwrap_or_default();
            result = Some(match result {
                None => candidates,
                Some(found) => found.intersection(&candidates).cloned().collect(),
            });
        }

        result.unwrap_or_else(|| self.ids())
    }

    /// The triple with this id.
    pub fn triple(&self, id: &str) -> Option<&Triple> {
        self.triples.get(id)
    }

    /// Subject of the triple with this id.
    pub fn subject(&self, id: &str) -> Option<&str> {
        self.triple(id).map(|triple| triple.subject.as_str())
    }

    /// Predicate of the triple with this id.
    pub fn predicate(&self, id: &str) -> Option<&str> {
        self.triple(id).map(|triple| triple.predicate.as_str())
    }

    /// Object of the triple with this id.
    pub fn object(&self, id: &str) -> Option<&str> {
        self.triple(id).map(|triple| triple.object.as_str())
    }

    /// Every stored triple id.
    pub fn ids(&self) -> BTreeSet<String> {
        self.triples.keys().cloned().collect()
    }

    /// Number of stored triples.
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Whether the store holds no triples.
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }
}

/// Collapses whitespace and uppercases a field.
pub fn normalize(field: &str) -> String {
    field
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_uppercase()
}

fn normalize_all(subject: &str, predicate: &str, object: &str) -> Option<(String, String, String)> {
    let fields = [normalize(subject), normalize(predicate), normalize(object)];
    if fields.iter().any(String::is_empty) {
        return None;
    }
    let [subject, predicate, object] = fields;
    Some((subject, predicate, object))
}

fn index(index: &mut HashMap<String, BTreeSet<String>>, value: &str, id: &str) {
    index
        .entry(value.to_owned())
        .or_default()
        .insert(id.to_owned());
}

fn unindex(index: &mut HashMap<String, BTreeSet<String>>, value: &str, id: &str) {
    if let Some(ids) = index.get_mut(value) {
        ids.remove(id);
        if ids.is_empty() {
            index.remove(value);
        }
    }
}
