//! Credential rotation
//!
//! Sessions are joined with credentials drawn round-robin from a fixed
//! ordered list. Rotation has no failure modes at use time; the rotator
//! refuses to be built over an empty list.

use crate::client::config::CredentialPair;
use crate::error::{RoomError, RoomResult};

/// Round-robin supplier of session credentials
///
/// # Examples
///
/// ```rust
/// use mosaic_client_core::client::config::CredentialPair;
/// use mosaic_client_core::client::rotation::CredentialRotator;
///
/// let mut rotator = CredentialRotator::new(vec![
///     CredentialPair::new("s1", "t1"),
///     CredentialPair::new("s2", "t2"),
/// ])
/// .unwrap();
///
/// assert_eq!(rotator.next().session_id, "s1");
/// assert_eq!(rotator.next().session_id, "s2");
/// assert_eq!(rotator.next().session_id, "s1"); // wraps around
/// ```
#[derive(Debug, Clone)]
pub struct CredentialRotator {
    credentials: Vec<CredentialPair>,
    index: usize,
}

impl CredentialRotator {
    /// Create a rotator over a non-empty credential list
    ///
    /// Fails with [`RoomError::Configuration`] on an empty list so `next`
    /// can stay infallible.
    pub fn new(credentials: Vec<CredentialPair>) -> RoomResult<Self> {
        if credentials.is_empty() {
            return Err(RoomError::configuration(
                "credential rotation list must not be empty",
            ));
        }
        Ok(Self {
            credentials,
            index: 0,
        })
    }

    /// Return the current pair and advance the rotation index
    pub fn next(&mut self) -> CredentialPair {
        let pair = self.credentials[self.index].clone();
        self.index = (self.index + 1) % self.credentials.len();
        pair
    }

    /// Number of pairs in the rotation list
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    /// Whether the rotation list is empty (never true by construction)
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }

    /// Index of the pair the next call to [`next`](Self::next) will return
    pub fn position(&self) -> usize {
        self.index
    }
}
