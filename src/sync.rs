//! Lock and atomic primitives used by the views.
//!
//! By default these are `parking_lot`'s reader-writer locks and the standard
//! atomics. With the `loom` feature they are replaced by `loom::sync`
//! equivalents so concurrency tests can explore every interleaving.

#[cfg(not(feature = "loom"))]
pub(crate) use parking_lot::RwLock;

#[cfg(not(feature = "loom"))]
pub(crate) use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "loom")]
pub(crate) use loom::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "loom")]
pub(crate) use loom_lock::RwLock;

#[cfg(feature = "loom")]
mod loom_lock {
    use std::sync::PoisonError;

    use loom::sync::{RwLockReadGuard, RwLockWriteGuard};

    /// `parking_lot`-shaped wrapper over `loom::sync::RwLock`.
    ///
    /// Poisoning is ignored, matching `parking_lot` which has none.
    pub(crate) struct RwLock<T>(loom::sync::RwLock<T>);

    impl<T> RwLock<T> {
        pub(crate) fn new(value: T) -> Self {
            Self(loom::sync::RwLock::new(value))
        }

        pub(crate) fn read(&self) -> RwLockReadGuard<'_, T> {
            self.0.read().unwrap_or_else(PoisonError::into_inner)
        }

        pub(crate) fn write(&self) -> RwLockWriteGuard<'_, T> {
            self.0.write().unwrap_or_else(PoisonError::into_inner)
        }
    }
}
