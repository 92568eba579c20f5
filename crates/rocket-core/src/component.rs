#![forbid(unsafe_code)]

//! Components and their lifecycle host.
//!
//! A [`Component`] turns props and a [`BuildContext`] into at most one child
//! [`Node`]. Stateless components only implement `build`. Stateful
//! components additionally register signals through [`Hooks`] in
//! `on_mount`/`on_update`; the host then re-renders them whenever one of
//! those signals changes.
//!
//! [`ComponentHost`] owns one component instance and enforces its lifecycle:
//!
//! ```text
//!   unmounted ──mount──▶ mounted ──unmount──▶ unmounted (terminal)
//! ```
//!
//! # Invariants
//!
//! 1. `mount` succeeds at most once per host; a second call returns
//!    [`LifecycleError::AlreadyMounted`] while mounted and
//!    [`LifecycleError::Retired`] after `unmount`.
//! 2. `unmount` is idempotent.
//! 3. Every registered signal is unsubscribed exactly once, before
//!    `on_unmount` runs.
//! 4. The change handler does nothing once the host is unmounted, and
//!    schedules exactly one update per signal change while mounted.
//!
//! # Failure Modes
//!
//! - `build` on an unmounted host returns [`LifecycleError::NotMounted`].
//! - A failing update request surfaces from the `Signal::set` that
//!   triggered it.

use std::any::type_name;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::debug;

use crate::context::BuildContext;
use crate::error::{LifecycleError, SubscriberError};
use crate::node::{ComponentType, Node, short_type_name};
use crate::props::Props;
use crate::reactive::{Signal, SignalId, Subscriber, Subscription};

/// Inputs a component builds from.
#[derive(Debug, Clone, Copy)]
pub struct Element<'a> {
    /// Current props of the component's node.
    pub props: &'a Props,
    /// Children passed to the component's node, for containers to forward.
    pub children: &'a [Node],
}

/// A unit of UI that renders as at most one child node.
pub trait Component: 'static {
    /// Instantiate from the node's props.
    fn create(props: &Props) -> Self
    where
        Self: Sized;

    /// Diagnostic name.
    fn name() -> &'static str
    where
        Self: Sized,
    {
        short_type_name(type_name::<Self>())
    }

    /// Called once, right after the host flips to mounted.
    fn on_mount(&mut self, _hooks: &mut Hooks<'_>) {}

    /// Called when the instance is reused with new props, before the next `build`.
    fn on_update(&mut self, _previous: &Props, _hooks: &mut Hooks<'_>) {}

    /// Called once during unmount, after signals have been released.
    fn on_unmount(&mut self) {}

    /// Describe the single child this component renders as.
    ///
    /// Must be a pure function of `el` and `cx`.
    fn build(&self, el: &Element<'_>, cx: &BuildContext) -> Option<Node>;
}

/// Callback installed by the renderer to re-render a host in place.
pub type UpdateRequest = Rc<dyn Fn() -> Result<(), SubscriberError>>;

struct HostState {
    name: &'static str,
    mounted: Cell<bool>,
    request_update: RefCell<Option<UpdateRequest>>,
}

impl HostState {
    fn on_signal_change(&self) -> Result<(), SubscriberError> {
        if !self.mounted.get() {
            return Ok(());
        }
        // Clone out so no borrow is held while the renderer runs.
        let request = self.request_update.borrow().clone();
        match request {
            Some(request) => {
                debug!(component = self.name, "signal changed; requesting update");
                request()
            }
            None => Ok(()),
        }
    }
}

/// Signals a host has subscribed to, released in registration order.
#[derive(Default)]
struct SignalRegistry {
    entries: Vec<(SignalId, Subscription)>,
}

impl SignalRegistry {
    fn contains(&self, id: SignalId) -> bool {
        self.entries.iter().any(|(existing, _)| *existing == id)
    }

    fn remove(&mut self, id: SignalId) -> bool {
        match self.entries.iter().position(|(existing, _)| *existing == id) {
            Some(index) => {
                self.entries.remove(index).1.release();
                true
            }
            None => false,
        }
    }

    fn release_all(&mut self) -> usize {
        let count = self.entries.len();
        for (_, subscription) in self.entries.drain(..) {
            subscription.release();
        }
        count
    }
}

/// Lifecycle services available to a component in `on_mount`/`on_update`.
pub struct Hooks<'a> {
    props: &'a Props,
    context: &'a BuildContext,
    registry: &'a mut SignalRegistry,
    state: &'a Rc<HostState>,
}

impl Hooks<'_> {
    #[must_use]
    pub fn props(&self) -> &Props {
        self.props
    }

    #[must_use]
    pub fn context(&self) -> &BuildContext {
        self.context
    }

    /// Re-render this component whenever `signal` changes.
    ///
    /// Returns `false` if the signal was already registered.
    pub fn register_signal<T: Clone + PartialEq + 'static>(&mut self, signal: &Signal<T>) -> bool {
        if self.registry.contains(signal.id()) {
            return false;
        }
        let state: Weak<HostState> = Rc::downgrade(self.state);
        let handler = Subscriber::fallible(move |_: &T| match state.upgrade() {
            Some(state) => state.on_signal_change(),
            None => Ok(()),
        });
        let subscription = signal.subscribe_scoped(handler);
        self.registry.entries.push((signal.id(), subscription));
        true
    }

    /// Stop re-rendering on `signal`. Returns `false` if it was not registered.
    pub fn unregister_signal<T>(&mut self, signal: &Signal<T>) -> bool {
        self.registry.remove(signal.id())
    }
}

/// Owns one component instance and drives it through its lifecycle.
pub struct ComponentHost {
    ty: ComponentType,
    component: Box<dyn Component>,
    props: Props,
    children: Vec<Node>,
    context: Option<BuildContext>,
    state: Rc<HostState>,
    signals: SignalRegistry,
    retired: bool,
}

impl ComponentHost {
    /// Instantiate `ty` with `props`. The host starts unmounted.
    #[must_use]
    pub fn new(ty: ComponentType, props: Props, children: Vec<Node>) -> Self {
        let component = ty.instantiate(&props);
        Self {
            ty,
            component,
            props,
            children,
            context: None,
            state: Rc::new(HostState {
                name: ty.name(),
                mounted: Cell::new(false),
                request_update: RefCell::new(None),
            }),
            signals: SignalRegistry::default(),
            retired: false,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        self.ty.name()
    }

    #[must_use]
    pub fn component_type(&self) -> ComponentType {
        self.ty
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.state.mounted.get()
    }

    #[must_use]
    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Context stored at mount (or the latest update). `None` when unmounted.
    #[must_use]
    pub fn context(&self) -> Option<&BuildContext> {
        self.context.as_ref()
    }

    /// Number of signals currently registered.
    #[must_use]
    pub fn signal_count(&self) -> usize {
        self.signals.entries.len()
    }

    /// Install the callback the change handler invokes.
    pub fn set_request_update(&mut self, request: UpdateRequest) {
        *self.state.request_update.borrow_mut() = Some(request);
    }

    /// Store `context`, flip to mounted, run `on_mount`.
    pub fn mount(&mut self, context: BuildContext) -> Result<(), LifecycleError> {
        if self.is_mounted() {
            return Err(LifecycleError::AlreadyMounted {
                component: self.name(),
            });
        }
        if self.retired {
            return Err(LifecycleError::Retired {
                component: self.name(),
            });
        }
        self.state.mounted.set(true);
        let context = self.context.insert(context);
        let mut hooks = Hooks {
            props: &self.props,
            context,
            registry: &mut self.signals,
            state: &self.state,
        };
        self.component.on_mount(&mut hooks);
        debug!(component = self.name(), "mounted");
        Ok(())
    }

    /// Release signals, run `on_unmount`, flip to unmounted. No-op if not mounted.
    pub fn unmount(&mut self) {
        if !self.is_mounted() {
            return;
        }
        let released = self.signals.release_all();
        self.component.on_unmount();
        self.state.mounted.set(false);
        self.retired = true;
        self.state.request_update.borrow_mut().take();
        self.context = None;
        debug!(component = self.name(), released, "unmounted");
    }

    /// Reuse the instance with new inputs; runs `on_update` with the previous props.
    pub fn update(
        &mut self,
        props: Props,
        children: Vec<Node>,
        context: BuildContext,
    ) -> Result<(), LifecycleError> {
        if !self.is_mounted() {
            return Err(LifecycleError::NotMounted {
                component: self.name(),
            });
        }
        let previous = std::mem::replace(&mut self.props, props);
        self.children = children;
        let context = self.context.insert(context);
        let mut hooks = Hooks {
            props: &self.props,
            context,
            registry: &mut self.signals,
            state: &self.state,
        };
        self.component.on_update(&previous, &mut hooks);
        Ok(())
    }

    /// Build the child node from the current props and stored context.
    pub fn build(&self) -> Result<Option<Node>, LifecycleError> {
        let context = match (&self.context, self.is_mounted()) {
            (Some(context), true) => context,
            _ => {
                return Err(LifecycleError::NotMounted {
                    component: self.name(),
                });
            }
        };
        let el = Element {
            props: &self.props,
            children: &self.children,
        };
        Ok(self.component.build(&el, context))
    }
}

impl fmt::Debug for ComponentHost {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ComponentHost")
            .field("name", &self.name())
            .field("mounted", &self.is_mounted())
            .field("signals", &self.signal_count())
            .finish()
    }
}

impl Drop for ComponentHost {
    fn drop(&mut self) {
        self.unmount();
    }
}
