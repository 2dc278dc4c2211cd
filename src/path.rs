// used to recognize keys that can be written as plain steps
use lazy_static::lazy_static;
use regex::Regex;

// used to print out the lite-path form of a path
use std::fmt;
use std::str::FromStr;

use crate::error::{ConfError, Result};
use crate::litepath::{self, Axis, Expr, LitePath, NodeTest, Predicate, Step, quote_literal};

lazy_static! {
    static ref PLAIN_KEY: Regex = Regex::new(r"^[A-Za-z_][A-Za-z0-9_.\-]*$").unwrap();
}

// ------------- Segment -------------
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    pub fn key(&self) -> Option<&str> {
        match self {
            Segment::Key(key) => Some(key),
            Segment::Index(_) => None,
        }
    }
    pub fn is_key(&self) -> bool {
        matches!(self, Segment::Key(_))
    }
    // Keys that don't look like names, or read like a connective, are written as *[@name='...'].
    pub fn is_plain(&self) -> bool {
        match self {
            Segment::Key(key) => PLAIN_KEY.is_match(key) && !matches!(key.as_str(), "and" | "or"),
            Segment::Index(_) => false,
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Segment::Key(key.to_string())
    }
}
impl From<String> for Segment {
    fn from(key: String) -> Self {
        Segment::Key(key)
    }
}
impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Segment::Index(index)
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Key(key) if self.is_plain() => f.write_str(key),
            Segment::Key(key) => write!(f, "*[@name={}]", quote_literal(key)),
            // widened so that any index stored in an entry can be rendered
            Segment::Index(index) => write!(f, "*[{}]", *index as u128 + 1),
        }
    }
}

// ------------- Path -------------
/// An immutable address of a node in the configuration tree, from the root down.
///
/// Every operation that "changes" a path returns a new one.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path {
    segments: Vec<Segment>,
}

impl Path {
    pub fn new(segments: Vec<Segment>) -> Self {
        Self { segments }
    }
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self { segments: keys.into_iter().map(|k| Segment::Key(k.into())).collect() }
    }
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }
    pub fn get(&self, i: usize) -> Option<&Segment> {
        self.segments.get(i)
    }
    pub fn len(&self) -> usize {
        self.segments.len()
    }
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
    /// The segments `from..to` as a new path.
    pub fn sub_path(&self, from: usize, to: usize) -> Result<Path> {
        if to > self.segments.len() || from > to {
            return Err(ConfError::PathIndex { from, to, len: self.segments.len() });
        }
        Ok(Self { segments: self.segments[from..to].to_vec() })
    }
    /// The first `len` segments; fails if the path is shorter than that.
    pub fn prefix(&self, len: usize) -> Result<Path> {
        self.sub_path(0, len)
    }
    pub fn child(&self, segment: impl Into<Segment>) -> Path {
        let mut segments = self.segments.clone();
        segments.push(segment.into());
        Self { segments }
    }
    pub fn parent(&self) -> Option<Path> {
        match self.segments.len() {
            0 => None,
            n => Some(Self { segments: self.segments[..n - 1].to_vec() }),
        }
    }
    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }
    /// Renders the path as an escaped lite-path that addresses exactly this node.
    pub fn to_escaped_lite_path(&self) -> String {
        self.to_string()
    }
    /// Parses the output of [`Path::to_escaped_lite_path`].
    pub fn parse(text: &str) -> Result<Path> {
        let location = litepath::parse(text)?;
        if !location.anchored {
            return Err(ConfError::illegal_query(text, "a path must start at the root"));
        }
        location
            .steps
            .iter()
            .map(|step| segment_of(step).ok_or_else(|| ConfError::illegal_query(text, format!("'{step}' is not a simple path step"))))
            .collect::<Result<Vec<_>>>()
            .map(Path::new)
    }
}

fn segment_of(step: &Step) -> Option<Segment> {
    if step.axis != Axis::Child {
        return None;
    }
    match (&step.test, step.predicates.as_slice()) {
        (NodeTest::Name(name), []) => Some(Segment::Key(name.clone())),
        (NodeTest::Wildcard, [Predicate::Position(n)]) => Some(Segment::Index(n - 1)),
        (NodeTest::Wildcard, [Predicate::Filter(Expr::Equals(attribute, key))]) if is_name_attribute(attribute) => {
            Some(Segment::Key(key.clone()))
        }
        _ => None,
    }
}

fn is_name_attribute(location: &LitePath) -> bool {
    !location.anchored
        && matches!(location.steps.as_slice(),
            [Step { axis: Axis::Child, test: NodeTest::Attribute(a), predicates }] if a == "name" && predicates.is_empty())
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("/");
        }
        for segment in &self.segments {
            write!(f, "/{segment}")?;
        }
        Ok(())
    }
}

impl FromStr for Path {
    type Err = ConfError;
    fn from_str(s: &str) -> Result<Self> {
        Path::parse(s)
    }
}
