#![forbid(unsafe_code)]

//! Named pages and the application shell that renders them.
//!
//! A [`Router`] owns the [`Reconciler`] for one window. Pages are registered
//! under route names; [`Router::go`] switches the active page and renders
//! it. When the base context carries a [`Theme`](rocket_core::Theme), the
//! router re-renders the active page on every mode change.
//!
//! Each render builds the page against the base context extended with the
//! active route name, readable through [`current_route`].
//!
//! # Failure Modes
//!
//! - Navigating to an unregistered name returns
//!   [`RouterError::UnknownRoute`] and leaves the active page unchanged.
//! - A render triggered by a theme change that fails is reported to the
//!   theme signal's `set` caller as a subscriber error.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use ahash::AHashMap;
use rocket_core::{BuildContext, Node, Subscriber, SubscriberError, Subscription};
use rocket_render::{Reconciler, RenderError, Toolkit};
use thiserror::Error;
use tracing::{debug, info};

/// Context data key holding the active route name.
pub const ROUTE_KEY: &str = "rocket.route";

/// Name of the active route, as stored in the build context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentRoute(pub String);

/// The route name of the page being built, if a router is building it.
#[must_use]
pub fn current_route(cx: &BuildContext) -> Option<&str> {
    cx.get::<CurrentRoute>(ROUTE_KEY).map(|r| r.0.as_str())
}

/// A top-level screen.
pub trait Page {
    fn build(&self, cx: &BuildContext) -> Node;
}

impl<F: Fn(&BuildContext) -> Node> Page for F {
    fn build(&self, cx: &BuildContext) -> Node {
        self(cx)
    }
}

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("route {0:?} is not registered")]
    UnknownRoute(String),
    #[error(transparent)]
    Render(#[from] RenderError),
}

struct RouterInner<T: Toolkit> {
    reconciler: Reconciler<T>,
    base: BuildContext,
    routes: RefCell<AHashMap<String, Rc<dyn Page>>>,
    current: RefCell<Option<String>>,
}

/// Page registry and renderer for one window.
pub struct Router<T: Toolkit> {
    inner: Rc<RouterInner<T>>,
    _theme: Option<Subscription>,
}

impl<T: Toolkit + 'static> Router<T> {
    /// Render pages through `reconciler`, building each against `base`.
    pub fn new(reconciler: Reconciler<T>, base: BuildContext) -> Self {
        let inner = Rc::new(RouterInner {
            reconciler,
            base,
            routes: RefCell::new(AHashMap::new()),
            current: RefCell::new(None),
        });
        let theme = inner.base.theme().map(|theme| {
            let weak: Weak<RouterInner<T>> = Rc::downgrade(&inner);
            theme.signal().subscribe_scoped(Subscriber::fallible(move |mode| {
                let Some(inner) = weak.upgrade() else {
                    return Ok(());
                };
                debug!(?mode, "theme changed; re-rendering");
                inner.render().map_err(SubscriberError::new)
            }))
        });
        Self {
            inner,
            _theme: theme,
        }
    }

    /// Register `page` under `name`, replacing any previous page of that name.
    pub fn register(&self, name: impl Into<String>, page: impl Page + 'static) {
        self.inner
            .routes
            .borrow_mut()
            .insert(name.into(), Rc::new(page));
    }

    /// Make `name` the active page and render it.
    pub fn go(&self, name: &str) -> Result<(), RouterError> {
        if !self.inner.routes.borrow().contains_key(name) {
            return Err(RouterError::UnknownRoute(name.to_owned()));
        }
        info!(route = name, "navigate");
        *self.inner.current.borrow_mut() = Some(name.to_owned());
        self.inner.render()?;
        Ok(())
    }

    /// Re-render the active page. Does nothing before the first [`go`](Self::go).
    pub fn render(&self) -> Result<(), RenderError> {
        self.inner.render()
    }

    #[must_use]
    pub fn current(&self) -> Option<String> {
        self.inner.current.borrow().clone()
    }

    #[must_use]
    pub fn routes(&self) -> Vec<String> {
        let mut names: Vec<String> = self.inner.routes.borrow().keys().cloned().collect();
        names.sort();
        names
    }

    #[must_use]
    pub fn reconciler(&self) -> &Reconciler<T> {
        &self.inner.reconciler
    }
}

impl<T: Toolkit + 'static> RouterInner<T> {
    fn render(&self) -> Result<(), RenderError> {
        let Some(name) = self.current.borrow().clone() else {
            return Ok(());
        };
        let page = self.routes.borrow().get(&name).cloned();
        let Some(page) = page else {
            return Ok(());
        };
        let cx = self.base.with_data(ROUTE_KEY, CurrentRoute(name));
        let root = page.build(&cx);
        self.reconciler.render(root, &cx)
    }
}

impl<T: Toolkit> fmt::Debug for Router<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Router")
            .field("current", &self.inner.current.borrow())
            .field("routes", &self.inner.routes.borrow().len())
            .finish()
    }
}
