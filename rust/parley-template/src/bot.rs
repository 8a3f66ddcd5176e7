//! The shared half of the engine: rules, collaborators and configuration.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use parley_pattern::{Category, Graph, Match};
use tracing::{debug, info};

use crate::{
    EngineConfig, Extensions, MapRegistry, PreProcessor, PropertyMap, SetRegistry, TagHandler,
    UNKNOWN,
};

/// Which learn graph a learned rule is recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Learned {
    /// `<learn>`: kept for the life of the bot.
    Session,
    /// `<learnf>`: meant to be written out by the host.
    Persistent,
}

/// A bot: the brain every session matches against plus the read-only
/// collaborators templates consult.
///
/// Share it between sessions as an `Arc<Bot>`. The brain sits behind a
/// read-write lock that is held for one match or one insert at a time, never
/// while a template runs.
#[derive(Debug)]
pub struct Bot {
    config: EngineConfig,
    brain: RwLock<Graph>,
    learned: RwLock<Graph>,
    learned_persistent: RwLock<Graph>,
    properties: PropertyMap,
    sets: SetRegistry,
    maps: MapRegistry,
    preprocessor: PreProcessor,
    predicate_defaults: HashMap<String, String>,
    extensions: Extensions,
}

impl Default for Bot {
    fn default() -> Self {
        Bot::new(EngineConfig::default())
    }
}

impl Bot {
    /// A bot with no rules, properties, sets or maps.
    pub fn new(config: EngineConfig) -> Self {
        Bot {
            brain: RwLock::new(Graph::new(config.graph.clone())),
            learned: RwLock::new(Graph::new(config.graph.clone())),
            learned_persistent: RwLock::new(Graph::new(config.graph.clone())),
            config,
            properties: PropertyMap::default(),
            sets: SetRegistry::default(),
            maps: MapRegistry::default(),
            preprocessor: PreProcessor::default(),
            predicate_defaults: HashMap::new(),
            extensions: Extensions::default(),
        }
    }

    /// Replaces the bot properties read by `<bot>`.
    pub fn with_properties(mut self, properties: PropertyMap) -> Self {
        self.properties = properties;
        self
    }

    /// Replaces the word-sets used by patterns.
    pub fn with_sets(mut self, sets: SetRegistry) -> Self {
        self.sets = sets;
        self
    }

    /// Replaces the maps read by `<map>`.
    pub fn with_maps(mut self, maps: MapRegistry) -> Self {
        self.maps = maps;
        self
    }

    /// Replaces the substitution tables.
    pub fn with_preprocessor(mut self, preprocessor: PreProcessor) -> Self {
        self.preprocessor = preprocessor;
        self
    }

    /// A value every new session starts with for predicate `name`.
    pub fn with_predicate_default(mut self, name: &str, value: impl Into<String>) -> Self {
        self.predicate_defaults.insert(name.to_owned(), value.into());
        self
    }

    /// Registers a handler for a tag name no built-in tag claims.
    pub fn with_extension(mut self, tag: &str, handler: impl TagHandler + 'static) -> Self {
        self.extensions.register(tag, handler);
        self
    }

    /// The engine settings.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The registered word-sets.
    pub fn sets(&self) -> &SetRegistry {
        &self.sets
    }

    /// The registered maps.
    pub fn maps(&self) -> &MapRegistry {
        &self.maps
    }

    /// The substitution tables.
    pub fn preprocessor(&self) -> &PreProcessor {
        &self.preprocessor
    }

    /// Handlers for host-defined tags.
    pub fn extensions(&self) -> &Extensions {
        &self.extensions
    }

    /// Predicate values every new session starts with.
    pub fn predicate_defaults(&self) -> impl Iterator<Item = (&str, &str)> {
        self.predicate_defaults
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// A bot property, or `unknown`.
    pub fn property(&self, name: &str) -> &str {
        self.properties.get(name).unwrap_or(UNKNOWN)
    }

    /// Adds a rule to the brain.
    pub fn add_category(&self, category: impl Into<Arc<Category>>) -> Arc<Category> {
        self.brain
            .write()
            .insert(category, &self.properties, &self.sets)
    }

    /// Matches against the brain under its read lock.
    pub fn match_input(&self, input: &str, that: &str, topic: &str) -> Option<Match> {
        self.brain.read().match_input(input, that, topic, &self.sets)
    }

    /// Adds a rule learned at runtime to the brain and records it so it can
    /// be reset later.
    pub fn learn(&self, category: Category, kind: Learned) -> Arc<Category> {
        let category = self.add_category(category);
        self.learn_graph(kind)
            .write()
            .insert(Arc::clone(&category), &self.properties, &self.sets);
        debug!(
            category = %category.input_that_topic(),
            kind = ?kind,
            "Learned category"
        );
        category
    }

    /// Forgets every rule of one learn graph from the brain. Returns how many
    /// were removed.
    pub fn reset_learned(&self, kind: Learned) -> usize {
        let learned = std::mem::replace(
            &mut *self.learn_graph(kind).write(),
            Graph::new(self.config.graph.clone()),
        );
        let mut brain = self.brain.write();
        let forgotten = learned
            .categories()
            .iter()
            .filter(|category| {
                brain
                    .forget(
                        category.pattern(),
                        category.that(),
                        category.topic(),
                        &self.properties,
                    )
                    .is_some()
            })
            .count();
        info!(forgotten, kind = ?kind, "Reset learned categories");
        forgotten
    }

    /// Rules learned into one learn graph, in path order.
    pub fn learned(&self, kind: Learned) -> Vec<Arc<Category>> {
        self.learn_graph(kind).read().categories()
    }

    fn learn_graph(&self, kind: Learned) -> &RwLock<Graph> {
        match kind {
            Learned::Session => &self.learned,
            Learned::Persistent => &self.learned_persistent,
        }
    }

    /// Number of rules in the brain.
    pub fn size(&self) -> usize {
        self.brain.read().len()
    }

    /// Distinct words across the brain's patterns and every listed set.
    pub fn vocabulary(&self) -> usize {
        let mut words = self.brain.read().vocabulary();
        words.extend(self.sets.words());
        words.len()
    }

    /// Every rule in the brain, in path order.
    pub fn categories(&self) -> Vec<Arc<Category>> {
        self.brain.read().categories()
    }
}
