use std::collections::BTreeSet;

use parley_triples::{Clause, Term, Tuple};
use tracing::debug;

use super::{Frame, Interpreter};
use crate::{Element, EvalError, NIL, Tag, UNDEFINED_TRIPLE, UNKNOWN};

impl Interpreter<'_> {
    /// `<addtriple>`: the id of the stored triple, or `NIL`.
    pub(super) fn add_triple(
        &mut self,
        element: &Element,
        frame: &mut Frame,
    ) -> Result<String, EvalError> {
        let Some((subject, predicate, object)) = self.triple_parameters(element, frame)? else {
            return Ok(NIL.to_owned());
        };
        Ok(self
            .session
            .triples_mut()
            .add(&subject, &predicate, &object)
            .unwrap_or_else(|| NIL.to_owned()))
    }

    /// `<deletetriple>`: the id of the removed triple, or `undefined`.
    pub(super) fn delete_triple(
        &mut self,
        element: &Element,
        frame: &mut Frame,
    ) -> Result<String, EvalError> {
        let Some((subject, predicate, object)) = self.triple_parameters(element, frame)? else {
            return Ok(NIL.to_owned());
        };
        Ok(self
            .session
            .triples_mut()
            .delete(&subject, &predicate, &object)
            .unwrap_or_else(|| UNDEFINED_TRIPLE.to_owned()))
    }

    fn triple_parameters(
        &mut self,
        element: &Element,
        frame: &mut Frame,
    ) -> Result<Option<(String, String, String)>, EvalError> {
        let subject = self.attribute_or_child(element, "subj", frame)?;
        let predicate = self.attribute_or_child(element, "pred", frame)?;
        let object = self.attribute_or_child(element, "obj", frame)?;
        Ok(subject
            .zip(predicate)
            .zip(object)
            .map(|((subject, predicate), object)| (subject, predicate, object)))
    }

    /// `<select>`: answers the `<q>`/`<notq>` clauses and returns the names
    /// of the answer tuples, or `NIL`.
    pub(super) fn select(&mut self, element: &Element, frame: &mut Frame) -> Result<String, EvalError> {
        let mut variables = BTreeSet::new();
        let mut visible = Vec::new();
        let mut clauses = Vec::new();

        for child in element.elements() {
            match child.name.as_str() {
                "vars" => visible.extend(
                    self.eval_content(child, frame)?
                        .split_whitespace()
                        .map(str::to_owned),
                ),
                "q" | "notq" => {
                    let [subject, predicate, object] =
                        self.clause_fields(child, frame, &mut variables)?;
                    clauses.push(if child.name == "q" {
                        Clause::new(subject, predicate, object)
                    } else {
                        Clause::not(subject, predicate, object)
                    });
                }
                _ => {}
            }
        }

        let tuples = self.session.triples().select(variables, visible, &clauses);
        debug!(clauses = clauses.len(), answers = tuples.len(), "Selected");
        if tuples.is_empty() {
            return Ok(NIL.to_owned());
        }
        let arena = self.session.tuples_mut();
        Ok(tuples
            .into_iter()
            .map(|tuple| arena.register(tuple))
            .collect::<Vec<_>>()
            .join(" "))
    }

    fn clause_fields(
        &mut self,
        clause: &Element,
        frame: &mut Frame,
        variables: &mut BTreeSet<String>,
    ) -> Result<[Term; 3], EvalError> {
        let mut fields = [Term::Any, Term::Any, Term::Any];
        for field in clause.elements() {
            let position = match field.name.as_str() {
                "subj" => 0,
                "pred" => 1,
                "obj" => 2,
                _ => continue,
            };
            let value = self.eval_content(field, frame)?;
            let term = Term::parse(Some(value.as_str()));
            if let Some(variable) = term.variable() {
                variables.insert(variable.to_owned());
            }
            fields[position] = term;
        }
        Ok(fields)
    }

    /// `<uniq>`: the value of the clause's variable in its first answer.
    /// Positions left out default to `?subject`, `?predicate` and `?object`.
    pub(super) fn uniq(&mut self, element: &Element, frame: &mut Frame) -> Result<String, EvalError> {
        let mut fields = ["?subject", "?predicate", "?object"].map(Term::from);
        let mut variables = Vec::new();
        let mut target = None;

        for child in element.elements() {
            let position = match child.name.as_str() {
                "subj" => 0,
                "pred" => 1,
                "obj" => 2,
                _ => continue,
            };
            let value = self.eval_content(child, frame)?;
            let term = Term::parse(Some(value.as_str()));
            if let Some(variable) = term.variable() {
                variables.push(variable.to_owned());
                target = Some(variable.to_owned());
            }
            fields[position] = term;
        }

        let Some(target) = target else {
            return Ok(UNKNOWN.to_owned());
        };
        let [subject, predicate, object] = fields;
        let partial = Tuple::new(variables.clone(), variables);
        let answers = self
            .session
            .triples()
            .select_single(&partial, &Clause::new(subject, predicate, object));
        Ok(answers
            .first()
            .and_then(|tuple| tuple.value(&target))
            .unwrap_or(UNKNOWN)
            .to_owned())
    }

    /// `<subject>`, `<predicate>` and `<object>` of a triple id.
    pub(super) fn triple_field(
        &mut self,
        tag: Tag,
        element: &Element,
        frame: &mut Frame,
    ) -> Result<String, EvalError> {
        let id = self.eval_content(element, frame)?;
        let id = id.trim();
        let triples = self.session.triples();
        let field = match tag {
            Tag::Subject => triples.subject(id),
            Tag::Predicate => triples.predicate(id),
            _ => triples.object(id),
        };
        Ok(field.unwrap_or(UNKNOWN).to_owned())
    }
}
