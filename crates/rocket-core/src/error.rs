#![forbid(unsafe_code)]

//! Error types shared by the reactive layer and the component lifecycle.
//!
//! # Failure Modes
//!
//! | Failure | Raised by | Policy |
//! |---------|-----------|--------|
//! | Component mounted twice | [`ComponentHost::mount`](crate::component::ComponentHost::mount) | Fatal, returned to the caller |
//! | Component remounted after unmount | [`ComponentHost::mount`](crate::component::ComponentHost::mount) | Fatal, returned to the caller |
//! | Build on an unmounted instance | [`ComponentHost::build`](crate::component::ComponentHost::build) | Fatal, returned to the caller |
//! | Subscriber returned an error | [`Signal::set`](crate::Signal::set) / [`Signal::notify`](crate::Signal::notify) | Remaining subscribers skipped, error returned |

use std::error::Error;
use std::fmt;

use thiserror::Error;

/// Violations of the `unmounted → mounted → unmounted` lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// `mount` was called on an instance that is already mounted.
    #[error("component `{component}` is already mounted")]
    AlreadyMounted { component: &'static str },
    /// `mount` was called on an instance that has already been unmounted.
    #[error("component `{component}` was unmounted and cannot be mounted again")]
    Retired { component: &'static str },
    /// An operation that needs a mounted instance ran after unmount (or before mount).
    #[error("component `{component}` is not mounted")]
    NotMounted { component: &'static str },
}

/// A subscriber callback failed while a signal was notifying.
///
/// Notification is fail-fast: the first failing subscriber stops the loop
/// and this error surfaces from `set`/`notify`.
pub struct SubscriberError {
    signal: Option<String>,
    source: Box<dyn Error + 'static>,
}

impl SubscriberError {
    /// Wrap any error raised inside a subscriber.
    pub fn new(source: impl Into<Box<dyn Error + 'static>>) -> Self {
        Self {
            signal: None,
            source: source.into(),
        }
    }

    /// Convenience for subscribers that fail with a plain message.
    #[must_use]
    pub fn msg(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self::new(message)
    }

    /// Name of the signal whose notification failed, if known.
    #[must_use]
    pub fn signal(&self) -> Option<&str> {
        self.signal.as_deref()
    }

    pub(crate) fn in_signal(mut self, name: &str) -> Self {
        if self.signal.is_none() {
            self.signal = Some(name.to_owned());
        }
        self
    }
}

impl fmt::Debug for SubscriberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubscriberError")
            .field("signal", &self.signal)
            .field("source", &self.source)
            .finish()
    }
}

impl fmt::Display for SubscriberError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.signal {
            Some(name) => write!(f, "subscriber of signal `{name}` failed: {}", self.source),
            None => write!(f, "subscriber failed: {}", self.source),
        }
    }
}

impl Error for SubscriberError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.source.as_ref())
    }
}
