//! One conversation with a bot.

use std::sync::Arc;

use parley_pattern::NULL_INPUT;
use parley_triples::{TripleStore, TupleArena};
use tracing::{debug, error, warn};

use crate::{
    Bot, EvalError, History, Interpreter, Predicates, REPETITION_DETECTED, TEMPLATE_FAILED,
    TOO_MUCH_RECURSION, UNKNOWN,
};

/// Per-conversation state: histories, predicates and a private fact base.
///
/// Histories are most-recent-first. The `that` history keeps, for each past
/// request, the sentences of the bot's reply to it.
#[derive(Debug)]
pub struct Session {
    id: String,
    bot: Arc<Bot>,
    that_history: History<History<String>>,
    request_history: History<String>,
    response_history: History<String>,
    input_history: History<String>,
    predicates: Predicates,
    triples: TripleStore,
    tuples: TupleArena,
}

impl Session {
    /// A fresh conversation with the bot's predicate defaults applied.
    pub fn new(id: impl Into<String>, bot: Arc<Bot>) -> Self {
        let capacity = bot.config().max_history;
        let mut predicates = Predicates::default();
        predicates.set("topic", UNKNOWN);
        for (name, value) in bot.predicate_defaults() {
            predicates.set(name, value);
        }

        Session {
            id: id.into(),
            bot,
            that_history: History::new(capacity),
            request_history: History::new(capacity),
            response_history: History::new(capacity),
            input_history: History::new(capacity),
            predicates,
            triples: TripleStore::default(),
            tuples: TupleArena::default(),
        }
    }

    /// The identifier the session was created with.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The bot shared by every session.
    pub fn bot(&self) -> &Arc<Bot> {
        &self.bot
    }

    /// Values written by `<set name>`.
    pub fn predicates(&self) -> &Predicates {
        &self.predicates
    }

    /// Mutable access to the predicates.
    pub fn predicates_mut(&mut self) -> &mut Predicates {
        &mut self.predicates
    }

    /// Facts added by `<addtriple>` during this session.
    pub fn triples(&self) -> &TripleStore {
        &self.triples
    }

    /// Mutable access to the session's facts.
    pub fn triples_mut(&mut self) -> &mut TripleStore {
        &mut self.triples
    }

    /// Tuples named by `<select>` during the current request.
    pub fn tuples(&self) -> &TupleArena {
        &self.tuples
    }

    /// Mutable access to the named tuples.
    pub fn tuples_mut(&mut self) -> &mut TupleArena {
        &mut self.tuples
    }

    /// Sentence `sentence` of the reply to the request `request` steps back,
    /// both 1-based.
    pub fn that(&self, request: usize, sentence: usize) -> Option<&str> {
        self.that_history
            .get(request.checked_sub(1)?)?
            .get(sentence.checked_sub(1)?)
            .map(String::as_str)
    }

    /// The `index`th most recent sentence input (1-based), including the one
    /// being answered.
    pub fn input(&self, index: usize) -> Option<&str> {
        nth(&self.input_history, index)
    }

    /// The `index`th most recent completed request (1-based).
    pub fn request(&self, index: usize) -> Option<&str> {
        nth(&self.request_history, index)
    }

    /// The `index`th most recent completed response (1-based).
    pub fn response(&self, index: usize) -> Option<&str> {
        nth(&self.response_history, index)
    }

    /// Answers a request that may hold several sentences.
    ///
    /// The request is normalized and split into sentences, each answered in
    /// turn; the replies are joined with a space. Tuples left over from the
    /// previous request are dropped first.
    pub fn multisentence_respond(&mut self, request: &str) -> String {
        self.tuples.clear();

        let bot = Arc::clone(&self.bot);
        let normalized = bot.preprocessor().normalize(request);
        let mut sentences = bot.preprocessor().sentence_split(&normalized);
        if sentences.is_empty() {
            sentences.push(String::new());
        }

        let mut context = History::new(bot.config().max_history);
        let replies = sentences
            .iter()
            .map(|sentence| self.respond(sentence, &mut context))
            .filter(|reply| !reply.is_empty())
            .collect::<Vec<_>>();
        let response = replies.join(" ");

        self.request_history.push(request.to_owned());
        self.response_history.push(response.clone());
        self.that_history.push(context);
        debug!(session = %self.id, request, response = %response, "Responded");

        response
    }

    /// Answers one sentence, recording the sentences of the reply in
    /// `context`, the `that` history of the request being answered.
    pub fn respond(&mut self, input: &str, context: &mut History<String>) -> String {
        let that = self.that(1, 1).unwrap_or(UNKNOWN).to_owned();
        let topic = self.predicates.get("topic").to_owned();
        let input = self.check_repetition(input);

        let response = match Interpreter::new(self).respond(&input, &that, &topic) {
            Ok(response) => response,
            Err(EvalError::RecursionLimit { depth, count }) => {
                warn!(input = %input, depth, count, "Gave up on recursion");
                TOO_MUCH_RECURSION.to_owned()
            }
            Err(error) => {
                error!(input = %input, %error, "Response failed");
                TEMPLATE_FAILED.to_owned()
            }
        };

        let preprocessor = self.bot.preprocessor();
        let sentences = preprocessor.sentence_split(&preprocessor.normalize(&response));
        if sentences.is_empty() {
            context.push(UNKNOWN.to_owned());
        }
        for sentence in sentences {
            context.push(sentence);
        }

        response.trim().to_owned()
    }

    /// Records the input and swaps it for `REPETITIONDETECTED` when it
    /// repeats the last few inputs.
    fn check_repetition(&mut self, input: &str) -> String {
        let count = self.bot.config().repetition_count;
        let repeated = count > 0
            && input != NULL_INPUT
            && (0..count).all(|index| {
                self.input_history
                    .get(index)
                    .is_some_and(|previous| previous.to_uppercase() == input.to_uppercase())
            });
        self.input_history.push(input.to_owned());

        if repeated {
            debug!(session = %self.id, input, "Repetition detected");
            REPETITION_DETECTED.to_owned()
        } else {
            input.to_owned()
        }
    }
}

fn nth(history: &History<String>, index: usize) -> Option<&str> {
    history
        .get(index.checked_sub(1)?)
        .map(String::as_str)
}
