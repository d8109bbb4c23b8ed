//! Shared asset handles
//!
//! A handle is an `Arc` plus a process-unique id. Components borrow assets
//! by cloning handles; the reference count is the implicit ownership ledger
//! and the registry holds the last handle until shutdown.

use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Id generator; id zero is reserved for the renderer's white fallback
static NEXT_ASSET_ID: AtomicU64 = AtomicU64::new(1);

fn next_id() -> u64 {
    NEXT_ASSET_ID.fetch_add(1, Ordering::Relaxed)
}

/// A shared handle to an asset of type `T`
#[derive(Debug)]
pub struct AssetHandle<T> {
    id: u64,
    inner: Arc<T>,
}

impl<T> AssetHandle<T> {
    /// Wrap a value in a new handle with a fresh id
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            id: next_id(),
            inner: Arc::new(value),
        }
    }

    /// Process-unique id of the asset
    #[must_use]
    pub const fn id(&self) -> u64 {
        self.id
    }

    /// Borrow the underlying asset
    #[must_use]
    pub fn get(&self) -> &T {
        &self.inner
    }

    /// Number of live handles to this asset
    #[must_use]
    pub fn strong_count(&self) -> usize {
        Arc::strong_count(&self.inner)
    }
}

impl<T> Clone for AssetHandle<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> PartialEq for AssetHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for AssetHandle<T> {}

impl<T> Hash for AssetHandle<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl<T> std::ops::Deref for AssetHandle<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_share_and_count() {
        let a = AssetHandle::new("atlas".to_string());
        let b = a.clone();
        assert_eq!(a.id(), b.id());
        assert_eq!(a, b);
        assert_eq!(a.strong_count(), 2);
        drop(b);
        assert_eq!(a.strong_count(), 1);
    }

    #[test]
    fn test_distinct_assets_get_distinct_ids() {
        let a = AssetHandle::new(1_u32);
        let b = AssetHandle::new(1_u32);
        assert_ne!(a.id(), b.id());
        assert_ne!(a, b);
    }
}
