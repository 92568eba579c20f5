#![forbid(unsafe_code)]

//! Theme handle exposed to components through the build context.
//!
//! The framework only tracks the active [`ThemeMode`]; color values come
//! from an application-supplied [`Palette`].

use std::fmt;
use std::rc::Rc;

use crate::error::SubscriberError;
use crate::reactive::{Signal, Subscriber};

/// Light or dark appearance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }
}

/// Color lookup for a theme mode.
pub trait Palette {
    /// Color for `key` (e.g. `"text"`, `"accent"`), if the palette defines it.
    fn color(&self, mode: ThemeMode, key: &str) -> Option<String>;
}

/// Shared theme state: the active mode plus a palette.
///
/// Clones share the same mode signal.
#[derive(Clone)]
pub struct Theme {
    mode: Signal<ThemeMode>,
    palette: Rc<dyn Palette>,
}

impl Theme {
    pub fn new(mode: ThemeMode, palette: impl Palette + 'static) -> Self {
        Self {
            mode: Signal::named("theme", mode),
            palette: Rc::new(palette),
        }
    }

    #[must_use]
    pub fn mode(&self) -> ThemeMode {
        self.mode.get()
    }

    #[must_use]
    pub fn is_dark(&self) -> bool {
        self.mode() == ThemeMode::Dark
    }

    pub fn set_mode(&self, mode: ThemeMode) -> Result<(), SubscriberError> {
        self.mode.set(mode)
    }

    pub fn toggle(&self) -> Result<(), SubscriberError> {
        self.set_mode(self.mode().toggled())
    }

    /// Color for `key` under the current mode.
    #[must_use]
    pub fn color(&self, key: &str) -> Option<String> {
        self.palette.color(self.mode(), key)
    }

    /// The underlying mode signal, for subscribing to theme changes.
    #[must_use]
    pub fn signal(&self) -> &Signal<ThemeMode> {
        &self.mode
    }

    /// Register a listener for mode changes.
    pub fn subscribe(&self, subscriber: &Subscriber<ThemeMode>) -> bool {
        self.mode.subscribe(subscriber)
    }
}

impl fmt::Debug for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Theme").field("mode", &self.mode()).finish()
    }
}
