use std::fmt::Display;
use std::str::FromStr;

/// The built-in template tags.
///
/// Element names outside this set are offered to the registered extensions
/// and otherwise rendered back verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    /// `<template>`: the root of every template.
    Template,
    /// `<random>`: one `<li>` chosen at random.
    Random,
    /// `<condition>`: branches on a predicate or variable.
    Condition,
    /// `<srai>`: answers its content as a new input.
    Srai,
    /// `<sr/>`: `<srai>` of the first input star.
    Sr,
    /// `<set>`: stores a predicate or variable.
    Set,
    /// `<get>`: reads a predicate, variable or tuple value.
    Get,
    /// `<map>`: looks a key up in a named map.
    Map,
    /// `<bot>`: a bot property.
    Bot,
    /// `<id/>`: the session id.
    Id,
    /// `<size/>`: number of rules in the brain.
    Size,
    /// `<vocabulary/>`: number of known words.
    Vocabulary,
    /// `<program/>`: program name and version.
    Program,
    /// `<think>`: evaluates its content and outputs nothing.
    Think,
    /// `<explode>`: spaces out every character.
    Explode,
    /// `<normalize>`: applies the normal table.
    Normalize,
    /// `<denormalize>`: applies the denormal table.
    Denormalize,
    /// `<uppercase>`
    Uppercase,
    /// `<lowercase>`
    Lowercase,
    /// `<formal>`: capitalizes every word.
    Formal,
    /// `<sentence>`: capitalizes the first character.
    Sentence,
    /// `<person>`: swaps first and second person.
    Person,
    /// `<person2>`: swaps first and third person.
    Person2,
    /// `<gender>`: swaps gendered pronouns.
    Gender,
    /// `<star/>`: an input wildcard span.
    Star,
    /// `<thatstar/>`: a that wildcard span.
    ThatStar,
    /// `<topicstar/>`: a topic wildcard span.
    TopicStar,
    /// `<that/>`: a sentence of an earlier response.
    That,
    /// `<input/>`: an earlier input sentence.
    Input,
    /// `<request/>`: an earlier request.
    Request,
    /// `<response/>`: an earlier response.
    Response,
    /// `<learn>`: adds rules for the bot's lifetime.
    Learn,
    /// `<learnf>`: adds rules recorded as persistent.
    Learnf,
    /// `<addtriple>`
    AddTriple,
    /// `<deletetriple>`
    DeleteTriple,
    /// `<select>`: runs a conjunctive query and names the answers.
    Select,
    /// `<uniq>`: one value from a single-clause query.
    Uniq,
    /// `<subject>`: subject of a triple by id.
    Subject,
    /// `<predicate>`: predicate of a triple by id.
    Predicate,
    /// `<object>`: object of a triple by id.
    Object,
    /// `<first>`: the first word.
    First,
    /// `<rest>`: all but the first word.
    Rest,
    /// `<resetlearn/>`: forgets rules added by `<learn>`.
    ResetLearn,
    /// `<resetlearnf/>`: forgets rules added by `<learnf>`.
    ResetLearnf,
}

impl Tag {
    /// Every built-in tag.
    pub const ALL: [Tag; 44] = [
        Tag::Template,
        Tag::Random,
        Tag::Condition,
        Tag::Srai,
        Tag::Sr,
        Tag::Set,
        Tag::Get,
        Tag::Map,
        Tag::Bot,
        Tag::Id,
        Tag::Size,
        Tag::Vocabulary,
        Tag::Program,
        Tag::Think,
        Tag::Explode,
        Tag::Normalize,
        Tag::Denormalize,
        Tag::Uppercase,
        Tag::Lowercase,
        Tag::Formal,
        Tag::Sentence,
        Tag::Person,
        Tag::Person2,
        Tag::Gender,
        Tag::Star,
        Tag::ThatStar,
        Tag::TopicStar,
        Tag::That,
        Tag::Input,
        Tag::Request,
        Tag::Response,
        Tag::Learn,
        Tag::Learnf,
        Tag::AddTriple,
        Tag::DeleteTriple,
        Tag::Select,
        Tag::Uniq,
        Tag::Subject,
        Tag::Predicate,
        Tag::Object,
        Tag::First,
        Tag::Rest,
        Tag::ResetLearn,
        Tag::ResetLearnf,
    ];

    /// The element name the tag is written with.
    pub fn name(self) -> &'static str {
        match self {
            Tag::Template => "template",
            Tag::Random => "random",
            Tag::Condition => "condition",
            Tag::Srai => "srai",
            Tag::Sr => "sr",
            Tag::Set => "set",
            Tag::Get => "get",
            Tag::Map => "map",
            Tag::Bot => "bot",
            Tag::Id => "id",
            Tag::Size => "size",
            Tag::Vocabulary => "vocabulary",
            Tag::Program => "program",
            Tag::Think => "think",
            Tag::Explode => "explode",
            Tag::Normalize => "normalize",
            Tag::Denormalize => "denormalize",
            Tag::Uppercase => "uppercase",
            Tag::Lowercase => "lowercase",
            Tag::Formal => "formal",
            Tag::Sentence => "sentence",
            Tag::Person => "person",
            Tag::Person2 => "person2",
            Tag::Gender => "gender",
            Tag::Star => "star",
            Tag::ThatStar => "thatstar",
            Tag::TopicStar => "topicstar",
            Tag::That => "that",
            Tag::Input => "input",
            Tag::Request => "request",
            Tag::Response => "response",
            Tag::Learn => "learn",
            Tag::Learnf => "learnf",
            Tag::AddTriple => "addtriple",
            Tag::DeleteTriple => "deletetriple",
            Tag::Select => "select",
            Tag::Uniq => "uniq",
            Tag::Subject => "subject",
            Tag::Predicate => "predicate",
            Tag::Object => "object",
            Tag::First => "first",
            Tag::Rest => "rest",
            Tag::ResetLearn => "resetlearn",
            Tag::ResetLearnf => "resetlearnf",
        }
    }
}

impl FromStr for Tag {
    type Err = ();

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        Tag::ALL
            .into_iter()
            .find(|tag| tag.name() == name)
            .ok_or(())
    }
}

impl Display for Tag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
