//! Text substitution tables and the pre-processor that applies them.

use regex::{NoExpand, Regex, RegexBuilder};

use crate::ConfigError;

/// An ordered list of case-insensitive literal replacements.
///
/// Patterns usually carry their own padding (`" i am "`), so the text is
/// padded with a space on each side before the rules run, in order.
#[derive(Debug, Clone, Default)]
pub struct SubstitutionList {
    rules: Vec<(Regex, String)>,
}

impl SubstitutionList {
    /// Builds the rules in order; each pattern matches literally and
    /// case-insensitively.
    pub fn new<I, P, R>(pairs: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (P, R)>,
        P: AsRef<str>,
        R: Into<String>,
    {
        let rules = pairs
            .into_iter()
            .map(|(pattern, replacement)| {
                let pattern = pattern.as_ref();
                RegexBuilder::new(&regex::escape(pattern))
                    .case_insensitive(true)
                    .build()
                    .map(|regex| (regex, replacement.into()))
                    .map_err(|source| ConfigError::Substitution {
                        pattern: pattern.to_owned(),
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(SubstitutionList { rules })
    }

    /// Applies every rule in order to the space-padded text.
    pub fn apply(&self, text: &str) -> String {
        let mut result = format!(" {text} ");
        for (pattern, replacement) in &self.rules {
            result = pattern
                .replace_all(&result, NoExpand(replacement))
                .into_owned();
        }
        collapse_spaces(&result)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the list has no rules.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Which table a transform tag uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Substitutions {
    /// Applied to every input before matching.
    Normal,
    /// Reverses normalization for display.
    Denormal,
    /// First and second person swapped.
    Person,
    /// First and third person swapped.
    Person2,
    /// Masculine and feminine pronouns swapped.
    Gender,
}

/// Input and output text shaping: the five substitution tables and the
/// sentence splitter.
#[derive(Debug, Clone, Default)]
pub struct PreProcessor {
    normal: SubstitutionList,
    denormal: SubstitutionList,
    person: SubstitutionList,
    person2: SubstitutionList,
    gender: SubstitutionList,
}

impl PreProcessor {
    /// Replaces one table.
    pub fn set(&mut self, table: Substitutions, list: SubstitutionList) {
        *self.table_mut(table) = list;
    }

    /// The rules of one table.
    pub fn table(&self, table: Substitutions) -> &SubstitutionList {
        match table {
            Substitutions::Normal => &self.normal,
            Substitutions::Denormal => &self.denormal,
            Substitutions::Person => &self.person,
            Substitutions::Person2 => &self.person2,
            Substitutions::Gender => &self.gender,
        }
    }

    fn table_mut(&mut self, table: Substitutions) -> &mut SubstitutionList {
        match table {
            Substitutions::Normal => &mut self.normal,
            Substitutions::Denormal => &mut self.denormal,
            Substitutions::Person => &mut self.person,
            Substitutions::Person2 => &mut self.person2,
            Substitutions::Gender => &mut self.gender,
        }
    }

    /// Applies the normal table and flattens line breaks.
    pub fn normalize(&self, text: &str) -> String {
        self.normal.apply(&text.replace(['\r', '\n'], " "))
    }

    /// Applies the denormal table.
    pub fn denormalize(&self, text: &str) -> String {
        self.denormal.apply(text)
    }

    /// Applies the person table.
    pub fn person(&self, text: &str) -> String {
        self.person.apply(text)
    }

    /// Applies the person2 table.
    pub fn person2(&self, text: &str) -> String {
        self.person2.apply(text)
    }

    /// Applies the gender table.
    pub fn gender(&self, text: &str) -> String {
        self.gender.apply(text)
    }

    /// Splits on `.`, `!` and `?` (full-width forms included), dropping
    /// empty sentences.
    pub fn sentence_split(&self, text: &str) -> Vec<String> {
        text.split(['.', '!', '?', '。', '？', '！'])
            .map(str::trim)
            .filter(|sentence| !sentence.is_empty())
            .map(str::to_owned)
            .collect()
    }
}

fn collapse_spaces(text: &str) -> String {
    text.split(' ')
        .filter(|word| !word.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
