//! Lite-path templates with named parameter slots.
//!
//! A template is an ordinary lite-path in which some literals are written as
//! `'{param}'`. Matching is done on the parsed form, so a query matches a
//! template when both have the same steps, axes, node tests and predicates,
//! and every non-slot literal is equal. Quoting style and whitespace in the
//! query don't matter.

use std::collections::HashMap;
use std::hash::BuildHasherDefault;

use lazy_static::lazy_static;
use regex::Regex;
use seahash::SeaHasher;

use crate::error::{ConfError, Result};
use crate::litepath::{self, Expr, LitePath, Predicate, Step};

pub type ParamHasher = BuildHasherDefault<SeaHasher>;
pub type Bindings = HashMap<String, String, ParamHasher>;

lazy_static! {
    static ref SLOT: Regex = Regex::new(r"^\{([A-Za-z_][A-Za-z0-9_]*)\}$").unwrap();
}

fn slot(literal: &str) -> Option<&str> {
    SLOT.captures(literal).and_then(|c| c.get(1)).map(|m| m.as_str())
}

#[derive(Debug, Clone)]
pub struct PathPattern {
    template: String,
    compiled: LitePath,
    params: Vec<String>,
}

impl PathPattern {
    pub fn compile(template: &str) -> Result<Self> {
        let compiled = litepath::parse(template)?;
        let mut params = Vec::new();
        visit_literals(&compiled, &mut |literal: &str| {
            if let Some(name) = slot(literal) {
                if !params.iter().any(|p| p == name) {
                    params.push(name.to_string());
                }
            }
        });
        Ok(Self { template: template.to_string(), compiled, params })
    }
    pub fn template(&self) -> &str {
        &self.template
    }
    pub fn params(&self) -> &[String] {
        &self.params
    }
    /// Binds the template's slots against an already parsed query.
    pub fn matches(&self, query: &LitePath) -> Option<Bindings> {
        let mut bindings = Bindings::default();
        match_location(&self.compiled, query, &mut bindings).then_some(bindings)
    }
    /// Parses `query` and matches it. Malformed queries are an error, a
    /// well-formed query of another shape is `Ok(None)`.
    pub fn parse_if_matches(&self, query: &str) -> Result<Option<Bindings>> {
        Ok(self.matches(&litepath::parse(query)?))
    }
    /// Renders the template with every slot replaced by the given value.
    pub fn fill(&self, values: &[(&str, &str)]) -> Result<String> {
        let mut filled = self.compiled.clone();
        let mut unbound = None;
        substitute(&mut filled, &mut |literal: &mut String| {
            if let Some(name) = slot(literal.as_str()).map(str::to_string) {
                match values.iter().find(|(param, _)| *param == name) {
                    Some((_, value)) => *literal = value.to_string(),
                    None if unbound.is_none() => unbound = Some(name),
                    None => {}
                }
            }
        });
        match unbound {
            Some(name) => Err(ConfError::UnboundParameter(name)),
            None => Ok(filled.to_string()),
        }
    }
}

// ------------- Structural matching -------------
fn match_location(template: &LitePath, query: &LitePath, bindings: &mut Bindings) -> bool {
    template.anchored == query.anchored
        && template.steps.len() == query.steps.len()
        && template.steps.iter().zip(&query.steps).all(|(t, q)| match_step(t, q, bindings))
}

fn match_step(template: &Step, query: &Step, bindings: &mut Bindings) -> bool {
    template.axis == query.axis
        && template.test == query.test
        && template.predicates.len() == query.predicates.len()
        && template
            .predicates
            .iter()
            .zip(&query.predicates)
            .all(|(t, q)| match (t, q) {
                (Predicate::Position(a), Predicate::Position(b)) => a == b,
                (Predicate::Filter(a), Predicate::Filter(b)) => match_expr(a, b, bindings),
                _ => false,
            })
}

fn match_expr(template: &Expr, query: &Expr, bindings: &mut Bindings) -> bool {
    match (template, query) {
        (Expr::Or(a), Expr::Or(b)) | (Expr::And(a), Expr::And(b)) => {
            a.len() == b.len() && a.iter().zip(b).all(|(t, q)| match_expr(t, q, bindings))
        }
        (Expr::Equals(tl, tv), Expr::Equals(ql, qv)) => match_location(tl, ql, bindings) && match_literal(tv, qv, bindings),
        (Expr::Exists(tl), Expr::Exists(ql)) => match_location(tl, ql, bindings),
        _ => false,
    }
}

fn match_literal(template: &str, query: &str, bindings: &mut Bindings) -> bool {
    match slot(template) {
        Some(name) => match bindings.get(name) {
            // a slot used twice must see the same value both times
            Some(bound) => bound == query,
            None => {
                bindings.insert(name.to_string(), query.to_string());
                true
            }
        },
        None => template == query,
    }
}

// ------------- Literal traversal -------------
fn visit_literals(location: &LitePath, visit: &mut impl FnMut(&str)) {
    for step in &location.steps {
        for predicate in &step.predicates {
            if let Predicate::Filter(expr) = predicate {
                visit_expr(expr, visit);
            }
        }
    }
}

fn visit_expr(expr: &Expr, visit: &mut impl FnMut(&str)) {
    match expr {
        Expr::Or(items) | Expr::And(items) => {
            for e in items {
                visit_expr(e, visit);
            }
        }
        Expr::Equals(location, literal) => {
            visit_literals(location, visit);
            visit(literal.as_str());
        }
        Expr::Exists(location) => visit_literals(location, visit),
    }
}

fn substitute(location: &mut LitePath, replace: &mut impl FnMut(&mut String)) {
    for step in &mut location.steps {
        for predicate in &mut step.predicates {
            if let Predicate::Filter(expr) = predicate {
                substitute_expr(expr, replace);
            }
        }
    }
}

fn substitute_expr(expr: &mut Expr, replace: &mut impl FnMut(&mut String)) {
    match expr {
        Expr::Or(items) | Expr::And(items) => {
            for e in items {
                substitute_expr(e, replace);
            }
        }
        Expr::Equals(location, literal) => {
            substitute(location, replace);
            replace(literal);
        }
        Expr::Exists(location) => substitute(location, replace),
    }
}
