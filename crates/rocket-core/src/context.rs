#![forbid(unsafe_code)]

//! Ambient dependencies threaded through a render pass.
//!
//! A [`BuildContext`] is created once at the root of a pass and handed,
//! unchanged, to every `build` call in that pass. It is read-only: there are
//! no setters, only builders that produce a new context.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use ahash::AHashMap;

use crate::theme::Theme;

#[derive(Default)]
struct ContextInner {
    window: Option<Rc<dyn Any>>,
    theme: Option<Theme>,
    data: AHashMap<String, Rc<dyn Any>>,
}

/// Read-only bag of ambient dependencies: theme, host window, keyed data.
///
/// Cloning is cheap and shares the same bag.
#[derive(Clone, Default)]
pub struct BuildContext {
    inner: Rc<ContextInner>,
}

impl BuildContext {
    /// An empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builder() -> BuildContextBuilder {
        BuildContextBuilder::default()
    }

    /// Start a builder pre-filled with this context's contents.
    #[must_use]
    pub fn to_builder(&self) -> BuildContextBuilder {
        BuildContextBuilder {
            window: self.inner.window.clone(),
            theme: self.inner.theme.clone(),
            data: self.inner.data.clone(),
        }
    }

    /// Derive a context with one extra (or replaced) data entry.
    #[must_use]
    pub fn with_data<V: 'static>(&self, key: impl Into<String>, value: V) -> Self {
        self.to_builder().data(key, value).build()
    }

    #[must_use]
    pub fn theme(&self) -> Option<&Theme> {
        self.inner.theme.as_ref()
    }

    /// Theme color for `key`, if a theme is present and defines it.
    #[must_use]
    pub fn color(&self, key: &str) -> Option<String> {
        self.theme().and_then(|theme| theme.color(key))
    }

    /// Host window handle, if one of type `W` was provided.
    #[must_use]
    pub fn window<W: 'static>(&self) -> Option<&W> {
        self.inner.window.as_ref()?.downcast_ref::<W>()
    }

    /// Data entry `key`, if present and of type `V`.
    #[must_use]
    pub fn get<V: 'static>(&self, key: &str) -> Option<&V> {
        self.inner.data.get(key)?.downcast_ref::<V>()
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.inner.data.contains_key(key)
    }

    /// Whether both handles share the same bag.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&str> = self.inner.data.keys().map(String::as_str).collect();
        keys.sort_unstable();
        f.debug_struct("BuildContext")
            .field("window", &self.inner.window.is_some())
            .field("theme", &self.inner.theme)
            .field("data", &keys)
            .finish()
    }
}

/// Builder for [`BuildContext`].
#[derive(Default)]
pub struct BuildContextBuilder {
    window: Option<Rc<dyn Any>>,
    theme: Option<Theme>,
    data: AHashMap<String, Rc<dyn Any>>,
}

impl BuildContextBuilder {
    #[must_use]
    pub fn window<W: 'static>(mut self, window: W) -> Self {
        self.window = Some(Rc::new(window));
        self
    }

    #[must_use]
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    #[must_use]
    pub fn data<V: 'static>(mut self, key: impl Into<String>, value: V) -> Self {
        self.data.insert(key.into(), Rc::new(value));
        self
    }

    #[must_use]
    pub fn build(self) -> BuildContext {
        BuildContext {
            inner: Rc::new(ContextInner {
                window: self.window,
                theme: self.theme,
                data: self.data,
            }),
        }
    }
}
