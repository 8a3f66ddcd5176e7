use std::collections::HashMap;

use parley_pattern::Properties;

/// Bot properties such as `name`, read by `<bot>` and by
/// `<bot name="x"/>` placeholders in patterns.
#[derive(Debug, Clone, Default)]
pub struct PropertyMap {
    values: HashMap<String, String>,
}

impl PropertyMap {
    /// Sets a property, replacing any earlier value.
    pub fn insert(&mut self, name: &str, value: impl Into<String>) {
        self.values.insert(name.to_lowercase(), value.into());
    }

    /// The value of a property, if set.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(&name.to_lowercase()).map(String::as_str)
    }
}

impl Properties for PropertyMap {
    fn property(&self, name: &str) -> Option<String> {
        self.get(name).map(str::to_owned)
    }
}
