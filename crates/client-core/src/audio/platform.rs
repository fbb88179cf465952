//! Platform audio session abstraction
//!
//! The host platform's audio stack is reached through the
//! [`AudioSessionActivator`] trait. Production builds wrap the actual
//! platform API; tests and headless hosts use the provided [`MockActivator`]
//! and [`NullActivator`].

use std::sync::Mutex;
use thiserror::Error;

/// Audio session category requested on activation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioSessionCategory {
    /// Simultaneous playback and recording (used for publishing)
    PlayAndRecord,
    /// Playback only (receive-only rendering paths)
    Playback,
}

/// Failure reported by the platform audio stack
///
/// Carries the raw platform error code; interpretation of the code is the
/// probe's business, not the activator's.
#[derive(Debug, Clone, Error)]
#[error("audio session activation failed (code {code}): {message}")]
pub struct ActivationError {
    /// Raw platform error code
    pub code: i32,
    /// Platform error description
    pub message: String,
}

impl ActivationError {
    /// Create an activation error with the given platform code
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// Access to the platform audio session
///
/// Calls are synchronous and normally fast; pathological platform states can
/// stall them, so callers treat activation as bounded-time but not free.
pub trait AudioSessionActivator: Send + Sync {
    /// Activate the audio session for the given category
    fn activate(&self, category: AudioSessionCategory) -> Result<(), ActivationError>;

    /// Deactivate the audio session
    fn deactivate(&self) -> Result<(), ActivationError>;
}

/// Activator for hosts without exclusive audio semantics
///
/// Always succeeds, so the contention gate never fires.
#[derive(Debug, Default)]
pub struct NullActivator;

impl AudioSessionActivator for NullActivator {
    fn activate(&self, _category: AudioSessionCategory) -> Result<(), ActivationError> {
        Ok(())
    }

    fn deactivate(&self) -> Result<(), ActivationError> {
        Ok(())
    }
}

/// Scriptable activator for tests and demos
///
/// Activation fails with the configured error until the error is cleared.
#[derive(Debug, Default)]
pub struct MockActivator {
    error: Mutex<Option<ActivationError>>,
}

impl MockActivator {
    /// Create a mock activator that succeeds
    pub fn new() -> Self {
        Self::default()
    }

    /// Make subsequent activations fail with the given platform code
    pub fn fail_with(&self, code: i32, message: impl Into<String>) {
        *self.error.lock().unwrap() = Some(ActivationError::new(code, message));
    }

    /// Make subsequent activations succeed
    pub fn succeed(&self) {
        *self.error.lock().unwrap() = None;
    }
}

impl AudioSessionActivator for MockActivator {
    fn activate(&self, _category: AudioSessionCategory) -> Result<(), ActivationError> {
        match self.error.lock().unwrap().as_ref() {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn deactivate(&self) -> Result<(), ActivationError> {
        Ok(())
    }
}
