use std::collections::BTreeSet;

use parley_triples::{Clause, TripleStore};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

#[test_log::test]
fn it_answers_who_likes_pizza() -> anyhow::Result<()> {
    let mut store = TripleStore::default();
    store.add("BOB", "LIKES", "PIZZA");

    let answers = store.select(["?x"], ["?x"], &[Clause::new("?x", "LIKES", "PIZZA")]);
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].value("?x"), Some("BOB"));
    Ok(())
}

#[test_log::test]
fn repeated_variables_keep_the_first_binding() -> anyhow::Result<()> {
    let mut store = TripleStore::default();
    store.add("BOB", "KNOWS", "ALICE");

    let answers = store.select(["?x"], ["?x"], &[Clause::new("?x", "KNOWS", "?x")]);
    assert_eq!(answers.len(), 1);
    assert_eq!(answers[0].value("?x"), Some("BOB"));
    Ok(())
}

#[test]
fn an_unconstrained_clause_matches_everything() {
    let mut store = TripleStore::default();
    store.add("A", "B", "C");
    store.add("D", "E", "F");

    let answers = store.select(["?s"], ["?s"], &[Clause::new("?s", "?p", "?o")]);
    let subjects = answers
        .iter()
        .filter_map(|tuple| tuple.value("?s"))
        .collect::<BTreeSet<_>>();
    assert_eq!(subjects, BTreeSet::from(["A", "D"]));
}

#[test]
fn a_failed_clause_ends_the_join() {
    let mut store = TripleStore::default();
    store.add("BOB", "LIKES", "PIZZA");

    let answers = store.select(
        ["?x"],
        ["?x"],
        &[
            Clause::new("?x", "LIKES", "SUSHI"),
            Clause::not("?x", "LIKES", "PIZZA"),
        ],
    );
    assert!(answers.is_empty());
}

fn field() -> impl Strategy<Value = String> {
    "[A-Z]{1,8}"
}

proptest! {
    #[test]
    fn added_triples_are_found_under_any_mask(
        subject in field(),
        predicate in field(),
        object in field(),
        mask in 0u8..8,
    ) {
        let mut store = TripleStore::default();
        let id = store.add(&subject, &predicate, &object);
        prop_assert!(id.is_some());
        let id = id.unwrap_or_default();

        let pick = |bit: u8, value: &str| {
            if mask & bit == 0 { value.to_owned() } else { format!("?v{bit}") }
        };
        let (s, p, o) = (pick(1, &subject), pick(2, &predicate), pick(4, &object));

        prop_assert!(store.get_triples(Some(&s), Some(&p), Some(&o)).contains(&id));

        prop_assert_eq!(store.delete(&subject, &predicate, &object), Some(id.clone()));
        prop_assert!(!store.get_triples(Some(&s), Some(&p), Some(&o)).contains(&id));
    }
}
