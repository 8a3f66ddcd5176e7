use itertools::Itertools;
use tracing::trace;

use crate::{Clause, Term, TripleStore, Tuple};

impl TripleStore {
    /// Answers a conjunction of clauses.
    ///
    /// Evaluation starts from one tuple over `variables` with nothing bound
    /// and joins the clauses left to right. Answers are deduplicated on the
    /// `visible` variables, keeping the first occurrence.
    pub fn select<V, S>(&self, variables: V, visible: S, clauses: &[Clause]) -> Vec<Tuple>
    where
        V: IntoIterator,
        V::Item: Into<String>,
        S: IntoIterator,
        S::Item: Into<String>,
    {
        let mut tuples = vec![Tuple::new(variables, visible)];
        for clause in clauses {
            tuples = tuples
                .iter()
                .flat_map(|tuple| self.select_single(tuple, clause))
                .collect();
            trace!(%clause, answers = tuples.len(), "Joined clause");
            if tuples.is_empty() {
                break;
            }
        }

        tuples
            .into_iter()
            .enumerate()
            .unique_by(|(position, tuple)| answer_key(tuple).ok_or(*position))
            .map(|(_, tuple)| tuple)
            .collect()
    }

    /// One join step: extends `partial` with every triple matching `clause`
    /// once its bound variables are substituted. A negated clause passes
    /// `partial` through unchanged when nothing matches, and drops it
    /// otherwise.
    pub fn select_single(&self, partial: &Tuple, clause: &Clause) -> Vec<Tuple> {
        let clause = clause.substitute(partial);
        let ids = self.get_triples(
            clause.subject.constant(),
            clause.predicate.constant(),
            clause.object.constant(),
        );

        if !clause.affirm {
            return if ids.is_empty() {
                vec![partial.clone()]
            } else {
                Vec::new()
            };
        }

        ids.iter()
            .filter_map(|id| self.triple(id))
            .map(|triple| {
                let mut tuple = partial.clone();
                let fields = [&triple.subject, &triple.predicate, &triple.object];
                for (term, value) in clause.terms().into_iter().zip(fields) {
                    if let Term::Variable(variable) = term {
                        tuple.bind(variable, value.as_str());
                    }
                }
                tuple
            })
            .collect()
    }
}

fn answer_key(tuple: &Tuple) -> Option<Vec<(String, String)>> {
    tuple.answer().map(|answer| {
        answer
            .into_iter()
            .map(|(variable, value)| (variable.to_owned(), value.to_owned()))
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> TripleStore {
        let mut store = TripleStore::default();
        store.add("BOB", "LIKES", "PIZZA");
        store.add("ALICE", "LIKES", "PIZZA");
        store.add("ALICE", "LIKES", "SUSHI");
        store.add("BOB", "IS", "VEGETARIAN");
        store
    }

    #[test]
    fn it_joins_clauses_left_to_right() {
        let store = store();
        let answers = store.select(
            ["?x", "?food"],
            ["?x"],
            &[
                Clause::new("?x", "LIKES", "?food"),
                Clause::new("?x", "IS", "VEGETARIAN"),
            ],
        );
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].value("?x"), Some("BOB"));
    }

    #[test]
    fn it_deduplicates_on_visible_variables() {
        let store = store();
        let answers = store.select(["?x", "?food"], ["?x"], &[Clause::new("?x", "LIKES", "?food")]);
        let people = answers
            .iter()
            .filter_map(|tuple| tuple.value("?x"))
            .collect::<Vec<_>>();
        assert_eq!(people, vec!["BOB", "ALICE"]);
    }

    #[test]
    fn negation_passes_through_only_without_matches() {
        let store = store();
        let partial = Tuple::new(["?x"], ["?x"]);

        let kept = store.select_single(&partial, &Clause::not("CAROL", "LIKES", "PIZZA"));
        assert_eq!(kept, vec![partial.clone()]);

        let dropped = store.select_single(&partial, &Clause::not("BOB", "LIKES", "PIZZA"));
        assert!(dropped.is_empty());
    }

    #[test]
    fn negation_filters_earlier_bindings() {
        let store = store();
        let answers = store.select(
            ["?x"],
            ["?x"],
            &[
                Clause::new("?x", "LIKES", "PIZZA"),
                Clause::not("?x", "IS", "VEGETARIAN"),
            ],
        );
        assert_eq!(answers.len(), 1);
        assert_eq!(answers[0].value("?x"), Some("ALICE"));
    }
}
