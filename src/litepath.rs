//! Lite-path parsing and rendering.
//!
//! Queries against the configuration tree are written in a restricted
//! XPath-like syntax (see `litepath.pest`). Parsing produces a small AST
//! ([`LitePath`]) which can be compared structurally (this is what the
//! shortcut templates do) and rendered back to a canonical textual form
//! that parses to the same AST.

use std::fmt;

use pest::iterators::{Pair, Pairs};
use pest::Parser;
use pest_derive::Parser;

use crate::error::{ConfError, Result};

#[derive(Parser)]
#[grammar = "litepath.pest"]
struct LitePathParser;

// ------------- AST -------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    Child,
    Descendant,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeTest {
    Name(String),
    Attribute(String),
    Wildcard,
    Current,
    Parent,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Predicate {
    /// 1-based position among the candidates of a step.
    Position(usize),
    Filter(Expr),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    Or(Vec<Expr>),
    And(Vec<Expr>),
    Equals(LitePath, String),
    Exists(LitePath),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Step {
    pub axis: Axis,
    pub test: NodeTest,
    pub predicates: Vec<Predicate>,
}

impl Step {
    pub fn child(test: NodeTest) -> Self {
        Self { axis: Axis::Child, test, predicates: Vec::new() }
    }
}

/// A parsed lite-path location. `anchored` locations start at the tree root,
/// the others at whatever node they are evaluated against.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LitePath {
    pub anchored: bool,
    pub steps: Vec<Step>,
}

impl LitePath {
    pub fn is_root(&self) -> bool {
        self.anchored && self.steps.is_empty()
    }
}

// ------------- Parsing -------------
/// Parses a lite-path query, reporting syntax problems as `IllegalQuery`.
pub fn parse(query: &str) -> Result<LitePath> {
    let mut pairs = LitePathParser::parse(Rule::query, query).map_err(|e| {
        let position = match e.location {
            pest::error::InputLocation::Pos(p) => p,
            pest::error::InputLocation::Span((start, _)) => start,
        };
        ConfError::IllegalQuery {
            query: query.to_string(),
            message: e.variant.message().to_string(),
            position: Some(position),
        }
    })?;
    let root = next(&mut pairs, query)?;
    let location = next(&mut root.into_inner(), query)?;
    build_location(location, query)
}

fn next<'i>(pairs: &mut Pairs<'i, Rule>, query: &str) -> Result<Pair<'i, Rule>> {
    pairs
        .next()
        .ok_or_else(|| ConfError::illegal_query(query, "unexpected end of query"))
}

fn build_location(pair: Pair<Rule>, query: &str) -> Result<LitePath> {
    let mut anchored = false;
    let mut axis = Axis::Child;
    let mut steps = Vec::new();
    for part in pair.into_inner() {
        match part.as_rule() {
            Rule::separator => {
                if steps.is_empty() {
                    anchored = true;
                }
                axis = match part.into_inner().next().map(|p| p.as_rule()) {
                    Some(Rule::descendant) => Axis::Descendant,
                    _ => Axis::Child,
                };
            }
            Rule::step => {
                steps.push(build_step(part, axis, query)?);
                axis = Axis::Child;
            }
            _ => {}
        }
    }
    if steps.is_empty() && axis == Axis::Descendant {
        return Err(ConfError::illegal_query(query, "'//' must be followed by a step"));
    }
    Ok(LitePath { anchored, steps })
}

fn build_step(pair: Pair<Rule>, axis: Axis, query: &str) -> Result<Step> {
    let mut inner = pair.into_inner();
    let head = next(&mut inner, query)?;
    let test = match head.as_rule() {
        Rule::name => NodeTest::Name(head.as_str().to_string()),
        Rule::attribute => NodeTest::Attribute(next(&mut head.into_inner(), query)?.as_str().to_string()),
        Rule::wildcard => NodeTest::Wildcard,
        Rule::current => NodeTest::Current,
        Rule::parent => NodeTest::Parent,
        other => return Err(ConfError::illegal_query(query, format!("unexpected {other:?} in step"))),
    };
    let predicates = inner
        .map(|p| build_predicate(p, query))
        .collect::<Result<Vec<_>>>()?;
    Ok(Step { axis, test, predicates })
}

fn build_predicate(pair: Pair<Rule>, query: &str) -> Result<Predicate> {
    let body = next(&mut pair.into_inner(), query)?;
    match body.as_rule() {
        Rule::position => body
            .as_str()
            .parse::<usize>()
            .map(Predicate::Position)
            .map_err(|e| ConfError::illegal_query(query, format!("bad position '{}': {e}", body.as_str()))),
        _ => Ok(Predicate::Filter(build_expr(body, query)?)),
    }
}

fn build_expr(pair: Pair<Rule>, query: &str) -> Result<Expr> {
    let mut disjuncts = pair
        .into_inner()
        .filter(|p| p.as_rule() == Rule::conjunction)
        .map(|p| build_conjunction(p, query))
        .collect::<Result<Vec<_>>>()?;
    Ok(if disjuncts.len() == 1 { disjuncts.remove(0) } else { Expr::Or(disjuncts) })
}

fn build_conjunction(pair: Pair<Rule>, query: &str) -> Result<Expr> {
    let mut conjuncts = pair
        .into_inner()
        .filter(|p| p.as_rule() == Rule::comparison)
        .map(|p| build_comparison(p, query))
        .collect::<Result<Vec<_>>>()?;
    Ok(if conjuncts.len() == 1 { conjuncts.remove(0) } else { Expr::And(conjuncts) })
}

fn build_comparison(pair: Pair<Rule>, query: &str) -> Result<Expr> {
    let mut inner = pair.into_inner();
    let head = next(&mut inner, query)?;
    if head.as_rule() == Rule::expr {
        return build_expr(head, query);
    }
    let location = build_location(head, query)?;
    match inner.next() {
        Some(literal) => {
            let text = next(&mut literal.into_inner(), query)?.as_str();
            Ok(Expr::Equals(location, unescape(text)))
        }
        None => Ok(Expr::Exists(location)),
    }
}

// ------------- Literals -------------
fn unescape(text: &str) -> String {
    text.replace("&apos;", "'").replace("&quot;", "\"").replace("&amp;", "&")
}

/// Quotes a literal so that it parses back to exactly `value`.
pub fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('&', "&amp;").replace('\'', "&apos;"))
}

// ------------- Rendering -------------
impl fmt::Display for NodeTest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NodeTest::Name(name) => f.write_str(name),
            NodeTest::Attribute(name) => write!(f, "@{name}"),
            NodeTest::Wildcard => f.write_str("*"),
            NodeTest::Current => f.write_str("."),
            NodeTest::Parent => f.write_str(".."),
        }
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Position(n) => write!(f, "[{n}]"),
            Predicate::Filter(expr) => write!(f, "[{expr}]"),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.test)?;
        for predicate in &self.predicates {
            write!(f, "{predicate}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Or(disjuncts) => {
                for (i, e) in disjuncts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" or ")?;
                    }
                    match e {
                        Expr::Or(_) => write!(f, "({e})")?,
                        _ => write!(f, "{e}")?,
                    }
                }
                Ok(())
            }
            Expr::And(conjuncts) => {
                for (i, e) in conjuncts.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" and ")?;
                    }
                    match e {
                        Expr::Or(_) | Expr::And(_) => write!(f, "({e})")?,
                        _ => write!(f, "{e}")?,
                    }
                }
                Ok(())
            }
            Expr::Equals(location, literal) => write!(f, "{location}={}", quote_literal(literal)),
            Expr::Exists(location) => write!(f, "{location}"),
        }
    }
}

impl fmt::Display for LitePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.steps.is_empty() {
            return f.write_str(if self.anchored { "/" } else { "." });
        }
        for (i, step) in self.steps.iter().enumerate() {
            match step.axis {
                Axis::Child if i == 0 && !self.anchored => {}
                Axis::Child => f.write_str("/")?,
                Axis::Descendant => f.write_str("//")?,
            }
            write!(f, "{step}")?;
        }
        Ok(())
    }
}
