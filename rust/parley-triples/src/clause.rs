use std::fmt::Display;

use crate::Tuple;

/// One position of a clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Term {
    /// Matches anything and binds nothing.
    Any,
    /// A `?name` placeholder, bound by the query as it runs.
    Variable(String),
    /// A normalized value the field must equal.
    Constant(String),
}

impl Term {
    /// Reads a clause field: absent or blank is [`Term::Any`], a leading
    /// `?` makes a variable, anything else is a constant.
    pub fn parse(field: Option<&str>) -> Self {
        match field.map(str::trim) {
            None | Some("") => Term::Any,
            Some(variable) if variable.starts_with('?') => Term::Variable(variable.to_owned()),
            Some(constant) => Term::Constant(constant.to_owned()),
        }
    }

    /// The variable name, if the term is one.
    pub fn variable(&self) -> Option<&str> {
        match self {
            Term::Variable(name) => Some(name.as_str()),
            _ => None,
        }
    }

    /// The constant, if the term is one.
    pub fn constant(&self) -> Option<&str> {
        match self {
            Term::Constant(value) => Some(value.as_str()),
            _ => None,
        }
    }

    /// Replaces a variable with its bound value, if the tuple has one.
    pub fn substitute(&self, tuple: &Tuple) -> Self {
        match self {
            Term::Variable(name) => match tuple.value(name) {
                Some(value) => Term::Constant(value.to_owned()),
                None => self.clone(),
            },
            other => other.clone(),
        }
    }
}

impl From<&str> for Term {
    fn from(value: &str) -> Self {
        Term::parse(Some(value))
    }
}

impl Display for Term {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Term::Any => write!(f, "_"),
            Term::Variable(name) | Term::Constant(name) => write!(f, "{name}"),
        }
    }
}

/// A triple pattern, optionally negated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause {
    /// Constraint on the subject.
    pub subject: Term,
    /// Constraint on the predicate.
    pub predicate: Term,
    /// Constraint on the object.
    pub object: Term,
    /// `false` for a negated clause.
    pub affirm: bool,
}

impl Clause {
    /// A clause that must match at least one triple.
    pub fn new(subject: impl Into<Term>, predicate: impl Into<Term>, object: impl Into<Term>) -> Self {
        Clause {
            subject: subject.into(),
            predicate: predicate.into(),
            object: object.into(),
            affirm: true,
        }
    }

    /// A clause that holds when no triple matches it.
    pub fn not(subject: impl Into<Term>, predicate: impl Into<Term>, object: impl Into<Term>) -> Self {
        Clause {
            affirm: false,
            ..Clause::new(subject, predicate, object)
        }
    }

    /// Subject, predicate and object, in that order.
    pub fn terms(&self) -> [&Term; 3] {
        [&self.subject, &self.predicate, &self.object]
    }

    /// Variable names in subject, predicate, object order.
    pub fn variables(&self) -> impl Iterator<Item = &str> {
        self.terms().into_iter().filter_map(Term::variable)
    }

    /// Replaces the variables bound in `tuple` with constants.
    pub fn substitute(&self, tuple: &Tuple) -> Self {
        Clause {
            subject: self.subject.substitute(tuple),
            predicate: self.predicate.substitute(tuple),
            object: self.object.substitute(tuple),
            affirm: self.affirm,
        }
    }
}

impl Display for Clause {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.affirm {
            write!(f, "! ")?;
        }
        write!(f, "({} {} {})", self.subject, self.predicate, self.object)
    }
}
