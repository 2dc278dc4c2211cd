//! Index-backed shortcut resolution in front of a [`Configuration`].
//!
//! [`ReferenceShortcuts`] is a decorator: queries matching one of the
//! [`Shortcut`](crate::shortcut::Shortcut) templates are answered by looking
//! the UUID up in a [`ReferenceIndex`], re-anchoring at the owning device and
//! reading one attribute from there. Everything else goes to the delegate's
//! full search unchanged.
//!
//! Outcomes per shortcut query:
//! * index and tree disagree (`OutOfSync`): full search on the original query;
//! * no index entry: empty result;
//! * entry shorter than an anchor path, or not shaped like a device path:
//!   empty result and an error record. These are *not* treated as staleness
//!   and never fall back to a full search;
//! * otherwise: the node at anchor + suffix.

use std::sync::Arc;

use crate::anchor::{ANCHOR_DEPTH, Anchors};
use crate::configuration::{Configuration, Node, Nodes};
use crate::error::{ConfError, Result};
use crate::index::ReferenceIndex;
use crate::litepath;
use crate::observe::{Severity, ShortcutEvent, ShortcutObserver, TracingObserver};
use crate::path::Segment;
use crate::pattern::Bindings;
use crate::shortcut::{self, ShortcutTemplate};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmptyReason {
    NotIndexed,
    ShortPath,
    ShapeMismatch,
    Unmaterialized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    NoShortcut,
    OutOfSync,
    Disabled,
}

/// What a single query resolves to. Lives for one call.
#[derive(Debug, Clone, PartialEq)]
pub enum Resolution {
    Materialized(Node),
    Empty(EmptyReason),
    /// Answer with the delegate's full search on the original query.
    FullSearch(Fallback),
}

pub struct ReferenceShortcuts<C, I> {
    delegate: C,
    index: I,
    anchors: Anchors,
    observer: Arc<dyn ShortcutObserver>,
    enabled: bool,
}

impl<C: Configuration, I: ReferenceIndex> ReferenceShortcuts<C, I> {
    pub fn new(delegate: C, index: I) -> Self {
        Self {
            delegate,
            index,
            anchors: Anchors::devices(),
            observer: Arc::new(TracingObserver),
            enabled: true,
        }
    }
    pub fn with_observer(mut self, observer: Arc<dyn ShortcutObserver>) -> Self {
        self.observer = observer;
        self
    }
    pub fn with_anchors(mut self, anchors: Anchors) -> Self {
        self.anchors = anchors;
        self
    }
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }
    pub fn delegate(&self) -> &C {
        &self.delegate
    }
    pub fn index(&self) -> &I {
        &self.index
    }

    /// Decides how `query` is answered without running a fallback search.
    pub fn resolve(&self, query: &str) -> Result<Resolution> {
        let parsed = litepath::parse(query)?;
        if !self.enabled {
            self.observer.count(ShortcutEvent::PassThrough);
            return Ok(Resolution::FullSearch(Fallback::Disabled));
        }
        match shortcut::match_query(&parsed) {
            Some((template, bindings)) => self.resolve_shortcut(template, &bindings),
            None => {
                self.observer.count(ShortcutEvent::PassThrough);
                Ok(Resolution::FullSearch(Fallback::NoShortcut))
            }
        }
    }

    /// Resolves a query already matched against `template`.
    pub fn resolve_shortcut(&self, template: &ShortcutTemplate, bindings: &Bindings) -> Result<Resolution> {
        let shortcut = template.shortcut();
        let Some(uuid) = bindings.get(template.param()) else {
            self.observer.record(
                Severity::Error,
                &format!("{shortcut}: template {} binds no '{}'", template.pattern().template(), template.param()),
            );
            self.observer.count(ShortcutEvent::PassThrough);
            return Ok(Resolution::FullSearch(Fallback::NoShortcut));
        };

        // probe the live tree before trusting the index
        match self.index.check_consistency(uuid) {
            Ok(()) => {}
            Err(ConfError::OutOfSync { reason, .. }) => {
                self.observer.record(
                    Severity::Error,
                    &format!("Config index out of sync! {shortcut} for {uuid}: {reason}"),
                );
                self.observer.count(ShortcutEvent::OutOfSync);
                return Ok(Resolution::FullSearch(Fallback::OutOfSync));
            }
            Err(e) => return Err(e),
        }

        let path = match self.index.resolve_path(uuid)? {
            Some(path) if !path.is_empty() => path,
            _ => {
                self.observer.record(Severity::Debug, &format!("{shortcut}: no index entry for {uuid}"));
                self.observer.count(ShortcutEvent::NotIndexed);
                return Ok(Resolution::Empty(EmptyReason::NotIndexed));
            }
        };
        if path.len() < ANCHOR_DEPTH {
            self.observer.record(Severity::Error, &format!("Unexpected path to device - wrong length: {path}"));
            self.observer.count(ShortcutEvent::MalformedEntry);
            return Ok(Resolution::Empty(EmptyReason::ShortPath));
        }
        let anchor = path.prefix(ANCHOR_DEPTH)?;
        if !self.anchors.validate(&anchor) {
            self.observer.record(Severity::Error, &format!("Unexpected path to device: {anchor}"));
            self.observer.count(ShortcutEvent::ShapeMismatch);
            return Ok(Resolution::Empty(EmptyReason::ShapeMismatch));
        }

        let address = anchor.child(Segment::from(template.suffix())).to_escaped_lite_path();
        match self.delegate.get_configuration_node(&address, None)? {
            Some(node) => {
                self.observer.count(ShortcutEvent::Hit);
                Ok(Resolution::Materialized(node))
            }
            None => {
                self.observer.record(Severity::Debug, &format!("{shortcut}: nothing at {address}"));
                self.observer.count(ShortcutEvent::Unmaterialized);
                Ok(Resolution::Empty(EmptyReason::Unmaterialized))
            }
        }
    }
}

impl<C: Configuration, I: ReferenceIndex> Configuration for ReferenceShortcuts<C, I> {
    fn search(&self, query: &str) -> Result<Nodes> {
        match self.resolve(query)? {
            Resolution::Materialized(node) => Ok(vec![node].into_iter()),
            Resolution::Empty(_) => Ok(Vec::new().into_iter()),
            Resolution::FullSearch(_) => self.delegate.search(query),
        }
    }
    fn get_configuration_node(&self, query: &str, context: Option<&Node>) -> Result<Option<Node>> {
        self.delegate.get_configuration_node(query, context)
    }
}
