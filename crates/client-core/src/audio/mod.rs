//! Audio contention probing
//!
//! Before publishing into a session, and again when new remote streams
//! arrive, the client checks whether the device audio session can actually
//! be claimed for simultaneous playback and recording. Two specific platform
//! error codes are recognized as "the device belongs to someone else";
//! everything else, including success, means the audio path is usable.
//!
//! The code whitelist mirrors the platform contract: other activation
//! failures have historically been transient and must not trigger the
//! abandon-and-reconnect path.

pub mod platform;

pub use platform::{
    ActivationError, AudioSessionActivator, AudioSessionCategory, MockActivator, NullActivator,
};

use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{RoomError, RoomResult};

/// Platform code for an activation refused due to insufficient priority
pub const CODE_INSUFFICIENT_PRIORITY: i32 = 561_017_449;

/// Platform code for an audio session initialization failure
///
/// Typically a bad or unsupported audio device.
pub const CODE_INITIALIZATION_ERROR: i32 = 1_768_843_583;

/// Probe for device audio contention
///
/// Attempts to activate the platform audio session for play-and-record and
/// interprets the result. The probe is a pure boundary check; it never
/// mutates session state.
///
/// # Examples
///
/// ```rust
/// use std::sync::Arc;
/// use mosaic_client_core::audio::{
///     AudioContentionProbe, MockActivator, CODE_INSUFFICIENT_PRIORITY,
/// };
///
/// let activator = Arc::new(MockActivator::new());
/// let probe = AudioContentionProbe::new(activator.clone());
/// assert!(!probe.is_audio_busy());
///
/// activator.fail_with(CODE_INSUFFICIENT_PRIORITY, "held by another app");
/// assert!(probe.is_audio_busy());
/// ```
pub struct AudioContentionProbe {
    activator: Arc<dyn AudioSessionActivator>,
}

impl AudioContentionProbe {
    /// Create a probe over the given platform activator
    pub fn new(activator: Arc<dyn AudioSessionActivator>) -> Self {
        Self { activator }
    }

    /// Check for contention, returning the offending platform code if busy
    ///
    /// Returns `Some(code)` only for the two recognized contention codes;
    /// `None` on success and for any other activation failure.
    pub fn check(&self) -> Option<i32> {
        match self
            .activator
            .activate(AudioSessionCategory::PlayAndRecord)
        {
            Ok(()) => None,
            Err(err) => match err.code {
                CODE_INSUFFICIENT_PRIORITY => {
                    warn!(code = err.code, "audio device is in use by another app");
                    Some(err.code)
                }
                CODE_INITIALIZATION_ERROR => {
                    warn!(
                        code = err.code,
                        "audio session initialization error (bad or unsupported device)"
                    );
                    Some(err.code)
                }
                other => {
                    debug!(code = other, error = %err, "ignoring unrecognized activation failure");
                    None
                }
            },
        }
    }

    /// Whether the audio device is currently claimed by another process
    pub fn is_audio_busy(&self) -> bool {
        self.check().is_some()
    }

    /// Fail with [`RoomError::AudioContention`] if the device is contended
    ///
    /// Convenience for hosts that gate their own operations on the probe.
    pub fn ensure_free(&self) -> RoomResult<()> {
        match self.check() {
            None => Ok(()),
            Some(code) => Err(RoomError::AudioContention { code }),
        }
    }
}
