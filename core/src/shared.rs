//! Thread-safe handle for when the transport decoder runs on another task.

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::sync::PoisonError;

use crate::error::RegistryError;
use crate::model::IntakeRequest;
use crate::registry::IntakeRegistry;

/// Clones share one registry. Pushes and resets are serialized; queries run
/// against a settled registry through [`SharedIntakeRegistry::read`] or an
/// owned [`SharedIntakeRegistry::snapshot`].
#[derive(Debug, Clone, Default)]
pub struct SharedIntakeRegistry(Arc<Mutex<IntakeRegistry>>);

impl SharedIntakeRegistry {
    pub fn new(registry: IntakeRegistry) -> Self {
        Self(Arc::new(Mutex::new(registry)))
    }

    // A panicking holder cannot leave the registry half-written, so a
    // poisoned lock is still usable.
    fn lock(&self) -> MutexGuard<'_, IntakeRegistry> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn push(&self, request: IntakeRequest) {
        self.lock().push(request);
    }

    pub fn try_push(&self, request: IntakeRequest) -> Result<(), RegistryError> {
        self.lock().try_push(request)
    }

    pub fn reset(&self) {
        self.lock().reset();
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn has_only_bridge_requests(&self) -> bool {
        self.lock().has_only_bridge_requests()
    }

    /// Runs `query` while holding the lock. Keep it short: pushes wait on it.
    pub fn read<R>(&self, query: impl FnOnce(&IntakeRegistry) -> R) -> R {
        query(&*self.lock())
    }

    pub fn snapshot(&self) -> IntakeRegistry {
        self.lock().clone()
    }
}

impl From<IntakeRegistry> for SharedIntakeRegistry {
    fn from(registry: IntakeRegistry) -> Self {
        Self::new(registry)
    }
}
