//! Password handling with redacted Debug output.

use crate::{ErrorLocation, RedactError};

use std::fmt;
use std::panic::Location;

use serde::ser::Error;
use zeroize::Zeroize;

/// A password that never exposes its value in logs or debug output.
#[derive(Clone, PartialEq, Eq)]
pub struct RedactedPassword {
    inner: String,
}

impl RedactedPassword {
    /// Wrap a password.
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            inner: password.into(),
        }
    }

    /// Wrap a password only if it is non-empty.
    ///
    /// Empty form fields and unset preferences both arrive as `""`; treating
    /// them as `None` keeps the fallback logic in one place.
    pub fn non_empty(password: impl Into<String>) -> Option<Self> {
        let password = Self::new(password);
        if password.is_empty() {
            None
        } else {
            Some(password)
        }
    }

    /// Get the actual password for handing to the external tool.
    ///
    /// # Security Note
    /// Only call this when building the process argument vector.
    #[inline]
    pub fn expose(&self) -> &str {
        &self.inner
    }

    /// Get the password length (safe to log).
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Check if the password is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl fmt::Debug for RedactedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RedactedPassword([REDACTED])")
    }
}

impl fmt::Display for RedactedPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl Drop for RedactedPassword {
    fn drop(&mut self) {
        self.inner.zeroize();
    }
}

// Prevent accidental serialization
impl serde::Serialize for RedactedPassword {
    fn serialize<S>(&self, _serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        Err(S::Error::custom(RedactError::Serialization {
            message: String::from(
                "RedactedPassword cannot be serialized - use expose() explicitly",
            ),
            location: ErrorLocation::from(Location::caller()),
        }))
    }
}
