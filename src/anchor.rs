use crate::path::{Path, Segment};

pub const CONFIGURATION_ROOT: &str = "dicomConfigurationRoot";
pub const DEVICES_ROOT: &str = "dicomDevicesRoot";

/// Number of segments in an anchor path: root, collection, item.
pub const ANCHOR_DEPTH: usize = 3;

/// The fixed shape of an anchor path, e.g. `/dicomConfigurationRoot/dicomDevicesRoot/<device>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Anchors {
    root: String,
    collection: String,
}

impl Anchors {
    pub fn new(root: impl Into<String>, collection: impl Into<String>) -> Self {
        Self { root: root.into(), collection: collection.into() }
    }
    pub fn devices() -> Self {
        Self::new(CONFIGURATION_ROOT, DEVICES_ROOT)
    }
    pub fn root(&self) -> &str {
        &self.root
    }
    pub fn collection(&self) -> &str {
        &self.collection
    }
    /// True iff the path has at least [`ANCHOR_DEPTH`] segments, starts with
    /// the root and collection keys, and its third segment is a key rather
    /// than a list position.
    pub fn validate(&self, path: &Path) -> bool {
        match path.segments() {
            [Segment::Key(root), Segment::Key(collection), Segment::Key(_), ..] => {
                *root == self.root && *collection == self.collection
            }
            _ => false,
        }
    }
}

impl Default for Anchors {
    fn default() -> Self {
        Self::devices()
    }
}
