use std::sync::Arc;

use crate::error::Result;
use crate::path::Path;

/// UUID to path lookups, maintained outside of this crate.
///
/// Implementations are read concurrently and without locking on the caller's
/// side; each call has to see a consistent snapshot of the index.
pub trait ReferenceIndex {
    /// Where the node carrying `uuid` lives. `Ok(None)` means the index has
    /// no entry, which is not an error.
    fn resolve_path(&self, uuid: &str) -> Result<Option<Path>>;
    /// Probes the live tree for `uuid`. Divergence between index and tree is
    /// reported as [`ConfError::OutOfSync`](crate::error::ConfError::OutOfSync).
    fn check_consistency(&self, uuid: &str) -> Result<()>;
}

impl<T: ReferenceIndex + ?Sized> ReferenceIndex for Arc<T> {
    fn resolve_path(&self, uuid: &str) -> Result<Option<Path>> {
        (**self).resolve_path(uuid)
    }
    fn check_consistency(&self, uuid: &str) -> Result<()> {
        (**self).check_consistency(uuid)
    }
}

impl<T: ReferenceIndex + ?Sized> ReferenceIndex for &T {
    fn resolve_path(&self, uuid: &str) -> Result<Option<Path>> {
        (**self).resolve_path(uuid)
    }
    fn check_consistency(&self, uuid: &str) -> Result<()> {
        (**self).check_consistency(uuid)
    }
}
