#![forbid(unsafe_code)]

//! Observable value with weakly-held subscribers.
//!
//! A [`Signal<T>`] is a shared cell. Cloning a signal yields another handle to
//! the same cell. Subscribers are [`Subscriber<T>`] handles: the signal only
//! keeps a `Weak` reference, so whoever registered the callback decides how
//! long it lives. Dropping the last strong handle silently retires the
//! subscription; the dead entry is swept on the next `notify`/`unsubscribe`.
//!
//! # Invariants
//!
//! 1. `set(v)` notifies only when `v != previous` (value equality).
//! 2. Subscribers run synchronously, in registration order.
//! 3. Registering the same [`Subscriber`] twice is a no-op.
//! 4. A subscriber that was unsubscribed, or whose last strong handle was
//!    dropped, is never invoked again, even mid-notification.
//! 5. `version()` increments exactly once per effective change.
//!
//! # Failure Modes
//!
//! - A subscriber returning `Err` stops the notification loop; later
//!   subscribers are skipped for that call and the error is returned from
//!   `set`/`notify`. The stored value has already been updated.
//! - No `RefCell` borrow is held while subscribers run, so a subscriber may
//!   read or set any signal, including the one notifying it.

use std::borrow::Cow;
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use tracing::{trace, warn};

use crate::error::SubscriberError;

type Callback<T> = dyn Fn(&T) -> Result<(), SubscriberError>;

static SIGNAL_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a signal cell (shared by all its clones).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SignalId(u64);

impl SignalId {
    fn next() -> Self {
        Self(SIGNAL_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Raw id value.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

/// Strong handle to a subscriber callback.
///
/// Clones share identity: subscribing a clone of an already-registered
/// subscriber is a no-op, and unsubscribing any clone removes the entry.
pub struct Subscriber<T> {
    callback: Rc<Callback<T>>,
}

impl<T> Clone for Subscriber<T> {
    fn clone(&self) -> Self {
        Self {
            callback: Rc::clone(&self.callback),
        }
    }
}

impl<T> fmt::Debug for Subscriber<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriber")
            .field("ptr", &Rc::as_ptr(&self.callback).cast::<()>())
            .finish()
    }
}

impl<T: 'static> Subscriber<T> {
    /// Wrap an infallible callback.
    pub fn new(f: impl Fn(&T) + 'static) -> Self {
        let callback: Rc<Callback<T>> = Rc::new(move |value: &T| {
            f(value);
            Ok(())
        });
        Self { callback }
    }

    /// Wrap a callback whose failure aborts the current notification.
    pub fn fallible(f: impl Fn(&T) -> Result<(), SubscriberError> + 'static) -> Self {
        Self {
            callback: Rc::new(f),
        }
    }
}

impl<T> Subscriber<T> {
    /// Whether both handles refer to the same callback.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.callback, &other.callback)
    }

    fn downgrade(&self) -> Weak<Callback<T>> {
        Rc::downgrade(&self.callback)
    }
}

struct SignalInner<T> {
    id: SignalId,
    name: Cow<'static, str>,
    value: RefCell<T>,
    version: Cell<u64>,
    debug: Cell<bool>,
    subscribers: RefCell<Vec<Weak<Callback<T>>>>,
}

/// A mutable cell with synchronous change notification.
pub struct Signal<T> {
    inner: Rc<SignalInner<T>>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Signal<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Signal<{}>({:?})", self.inner.name, self.inner.value.borrow())
    }
}

impl<T: Default + Clone + PartialEq + 'static> Default for Signal<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> Signal<T> {
    /// Identity shared by every clone of this signal.
    #[must_use]
    pub fn id(&self) -> SignalId {
        self.inner.id
    }

    /// Diagnostic name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// Whether both handles refer to the same cell.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }

    /// Number of effective changes since construction.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.version.get()
    }

    /// Emit `trace` events for every change and notification.
    pub fn set_debug(&self, enabled: bool) {
        self.inner.debug.set(enabled);
    }

    /// Borrow the current value without cloning.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Number of live subscribers (dead entries are not counted).
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .subscribers
            .borrow()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// Register `subscriber`. Returns `false` if it was already registered.
    pub fn subscribe(&self, subscriber: &Subscriber<T>) -> bool {
        let mut subs = self.inner.subscribers.borrow_mut();
        let weak = subscriber.downgrade();
        if subs.iter().any(|existing| Weak::ptr_eq(existing, &weak)) {
            return false;
        }
        subs.push(weak);
        if self.inner.debug.get() {
            trace!(signal = %self.inner.name, "subscribed");
        }
        true
    }

    /// Remove `subscriber` and sweep dead entries. Returns `true` if it was registered.
    pub fn unsubscribe(&self, subscriber: &Subscriber<T>) -> bool {
        let weak = subscriber.downgrade();
        let mut subs = self.inner.subscribers.borrow_mut();
        let before = subs.len();
        let mut removed = false;
        subs.retain(|existing| {
            if Weak::ptr_eq(existing, &weak) {
                removed = true;
                return false;
            }
            existing.strong_count() > 0
        });
        if self.inner.debug.get() {
            trace!(
                signal = %self.inner.name,
                swept = before - subs.len(),
                "unsubscribed"
            );
        }
        removed
    }

    fn is_registered(&self, callback: &Rc<Callback<T>>) -> bool {
        let weak = Rc::downgrade(callback);
        self.inner
            .subscribers
            .borrow()
            .iter()
            .any(|existing| Weak::ptr_eq(existing, &weak))
    }
}

impl<T: Clone + PartialEq + 'static> Signal<T> {
    /// Create an anonymous signal.
    #[must_use]
    pub fn new(value: T) -> Self {
        Self::named("Signal", value)
    }

    /// Create a signal with a diagnostic name.
    #[must_use]
    pub fn named(name: impl Into<Cow<'static, str>>, value: T) -> Self {
        Self {
            inner: Rc::new(SignalInner {
                id: SignalId::next(),
                name: name.into(),
                value: RefCell::new(value),
                version: Cell::new(0),
                debug: Cell::new(false),
                subscribers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Clone out the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Store `value` and notify subscribers if it differs from the current value.
    pub fn set(&self, value: T) -> Result<(), SubscriberError> {
        {
            let mut current = self.inner.value.borrow_mut();
            if *current == value {
                return Ok(());
            }
            *current = value;
        }
        self.inner.version.set(self.inner.version.get() + 1);
        if self.inner.debug.get() {
            trace!(
                signal = %self.inner.name,
                version = self.inner.version.get(),
                "changed"
            );
        }
        self.notify()
    }

    /// Mutate in place; notifies only if the result differs from the old value.
    pub fn update(&self, f: impl FnOnce(&mut T)) -> Result<(), SubscriberError> {
        let mut next = self.get();
        f(&mut next);
        self.set(next)
    }

    /// Re-broadcast the current value to every live subscriber.
    ///
    /// Used when state held outside the signal changed and dependents must
    /// re-read it.
    pub fn notify(&self) -> Result<(), SubscriberError> {
        let live: Vec<Rc<Callback<T>>> = {
            let mut subs = self.inner.subscribers.borrow_mut();
            subs.retain(|weak| weak.strong_count() > 0);
            subs.iter().filter_map(Weak::upgrade).collect()
        };

        for callback in &live {
            // Our snapshot is the only strong handle left: the owner dropped it.
            if Rc::strong_count(callback) == 1 || !self.is_registered(callback) {
                continue;
            }
            if self.inner.debug.get() {
                trace!(signal = %self.inner.name, "notifying subscriber");
            }
            // Re-read per call: an earlier subscriber may have set this signal.
            let value = self.get();
            if let Err(err) = callback(&value) {
                warn!(
                    signal = %self.inner.name,
                    error = %err,
                    "subscriber failed; remaining subscribers skipped"
                );
                return Err(err.in_signal(&self.inner.name));
            }
        }
        Ok(())
    }

    /// Subscribe and return a guard that unsubscribes when dropped.
    pub fn subscribe_scoped(&self, subscriber: Subscriber<T>) -> Subscription {
        self.subscribe(&subscriber);
        let signal = Rc::downgrade(&self.inner);
        Subscription {
            release: Some(Box::new(move || {
                if let Some(inner) = signal.upgrade() {
                    Signal { inner }.unsubscribe(&subscriber);
                }
            })),
        }
    }
}

/// RAII guard for a scoped subscription.
///
/// Holds the only strong handle to its subscriber; dropping the guard (or
/// calling [`release`](Self::release)) unsubscribes exactly once.
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Unsubscribe now.
    pub fn release(mut self) {
        self.release_inner();
    }

    /// Whether the subscription is still held.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }

    fn release_inner(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release_inner();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}
