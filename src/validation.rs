//! Validation context for cancellation.
//!
//! This module provides the [`ValidationContext`] type that is passed through
//! every validation call. A context can be derived into a cancellable child;
//! cancelling a context is visible to all of its descendants but never to its
//! ancestors. Cancellation is advisory: running checks are not interrupted,
//! but no new registered check starts once the context is cancelled.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::Error;

struct CancelNode {
    cancelled: AtomicBool,
    parent: Option<Arc<CancelNode>>,
}

/// Validation context carries cancellation state through the call chain.
///
/// The context is cheap to clone and safe to share across threads. The
/// background context can never be cancelled.
///
/// # Example
///
/// ```rust
/// use inquest::ValidationContext;
///
/// let parent = ValidationContext::background();
/// let (child, handle) = parent.with_cancel();
///
/// handle.cancel();
/// assert!(child.is_cancelled());
/// assert!(!parent.is_cancelled());
/// ```
#[derive(Clone, Default)]
pub struct ValidationContext {
    node: Option<Arc<CancelNode>>,
}

impl ValidationContext {
    /// Creates a root context that is never cancelled.
    pub fn background() -> Self {
        Self::default()
    }

    /// Derives a child context together with the handle that cancels it.
    ///
    /// Dropping the handle also cancels the child.
    pub fn with_cancel(&self) -> (Self, CancelHandle) {
        let node = Arc::new(CancelNode {
            cancelled: AtomicBool::new(false),
            parent: self.node.clone(),
        });
        let handle = CancelHandle {
            node: Arc::clone(&node),
        };
        (Self { node: Some(node) }, handle)
    }

    /// Returns true if this context or any ancestor was cancelled.
    pub fn is_cancelled(&self) -> bool {
        let mut node = self.node.as_deref();
        while let Some(current) = node {
            if current.cancelled.load(Ordering::Acquire) {
                return true;
            }
            node = current.parent.as_deref();
        }
        false
    }

    /// Returns [`Error::Cancelled`] once the context is cancelled.
    pub fn check(&self) -> Result<(), Error> {
        if self.is_cancelled() {
            Err(Error::Cancelled)
        } else {
            Ok(())
        }
    }
}

impl std::fmt::Debug for ValidationContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidationContext")
            .field("cancelled", &self.is_cancelled())
            .finish()
    }
}

/// Cancels the context it was created with.
#[derive(Debug)]
pub struct CancelHandle {
    node: Arc<CancelNode>,
}

impl CancelHandle {
    /// Marks the context and all of its descendants as cancelled.
    pub fn cancel(&self) {
        self.node.cancelled.store(true, Ordering::Release);
    }
}

impl Drop for CancelHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl std::fmt::Debug for CancelNode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CancelNode")
            .field("cancelled", &self.cancelled.load(Ordering::Relaxed))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_background_is_never_cancelled() {
        let ctx = ValidationContext::background();
        assert!(!ctx.is_cancelled());
        assert!(ctx.check().is_ok());
    }

    #[test]
    fn test_cancel_propagates_to_descendants() {
        let root = ValidationContext::background();
        let (child, handle) = root.with_cancel();
        let (grandchild, _grandchild_handle) = child.with_cancel();

        assert!(!grandchild.is_cancelled());
        handle.cancel();

        assert!(child.is_cancelled());
        assert!(grandchild.is_cancelled());
        assert!(!root.is_cancelled());
        assert!(matches!(grandchild.check(), Err(Error::Cancelled)));
    }

    #[test]
    fn test_cancel_does_not_reach_parent() {
        let (parent, _parent_handle) = ValidationContext::background().with_cancel();
        let (child, handle) = parent.with_cancel();
        handle.cancel();

        assert!(child.is_cancelled());
        assert!(!parent.is_cancelled());
    }

    #[test]
    fn test_dropping_handle_cancels() {
        let (ctx, handle) = ValidationContext::background().with_cancel();
        drop(handle);
        assert!(ctx.is_cancelled());
    }

    #[test]
    fn test_clones_share_state() {
        let (ctx, handle) = ValidationContext::background().with_cancel();
        let clone = ctx.clone();
        handle.cancel();
        assert!(clone.is_cancelled());
    }
}
