//! The process-wide default backend handle.
//!
//! Kernels always take their backend explicitly through
//! [`Activation::apply()`](crate::activation::Activation::apply). This slot only
//! backs the convenience `invoke` call shapes of
//! [`ActivationExt`](crate::activation::ActivationExt). The handle is created
//! lazily on first access, at most once, and may be replaced at any time; a
//! replacement is visible to every later reader.

use std::sync::{Arc, OnceLock, PoisonError, RwLock};

use crate::backend::DefaultBackend;

static DEFAULT_BACKEND: OnceLock<RwLock<Arc<DefaultBackend>>> = OnceLock::new();

fn slot() -> &'static RwLock<Arc<DefaultBackend>> {
    DEFAULT_BACKEND.get_or_init(|| {
        log::debug!("initializing default backend");
        RwLock::new(Arc::new(DefaultBackend::default()))
    })
}

/// Returns the current default backend handle, creating it on first use.
#[must_use]
pub fn default_backend() -> Arc<DefaultBackend> {
    let guard = slot().read().unwrap_or_else(PoisonError::into_inner);
    Arc::clone(&guard)
}

/// Replaces the default backend handle and returns the previous one.
///
/// Callers that already hold the previous handle keep using it until they
/// drop it; every later call to [`default_backend()`] sees `backend`.
pub fn set_default_backend(backend: Arc<DefaultBackend>) -> Arc<DefaultBackend> {
    let mut guard = slot().write().unwrap_or_else(PoisonError::into_inner);
    log::debug!("replacing default backend");
    core::mem::replace(&mut *guard, backend)
}
