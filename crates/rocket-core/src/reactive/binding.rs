#![forbid(unsafe_code)]

//! Two-way sync between a pair of [`Signal`]s.
//!
//! [`TwoWayBinding<T>`] writes a change on either side to the other. Widgets
//! use it to tie an application signal to the edit buffer a native input
//! widget writes into.
//!
//! # Invariants
//!
//! 1. Construction copies `a` into `b`; afterwards both hold equal values
//!    whenever no `set` is in flight.
//! 2. The pair never loops: a re-entrancy guard drops the echo write.
//! 3. Dropping the binding unsubscribes both directions.
//!
//! # Failure Modes
//!
//! - A subscriber failure on the mirrored side propagates to whoever called
//!   `set` on the originating side.

use std::cell::Cell;
use std::rc::Rc;

use super::signal::{Signal, Subscriber, Subscription};
use crate::error::SubscriberError;

/// Bidirectional sync between two signals of the same type.
///
/// Drop the binding to disconnect both directions.
pub struct TwoWayBinding<T: Clone + PartialEq + 'static> {
    _a_to_b: Subscription,
    _b_to_a: Subscription,
    _phantom: std::marker::PhantomData<T>,
}

impl<T: Clone + PartialEq + 'static> TwoWayBinding<T> {
    /// Connect `a` and `b`; `b` first takes `a`'s current value.
    pub fn new(a: &Signal<T>, b: &Signal<T>) -> Result<Self, SubscriberError> {
        b.set(a.get())?;

        let syncing = Rc::new(Cell::new(false));
        let a_to_b = mirror(a, b, &syncing);
        let b_to_a = mirror(b, a, &syncing);

        Ok(Self {
            _a_to_b: a_to_b,
            _b_to_a: b_to_a,
            _phantom: std::marker::PhantomData,
        })
    }
}

fn mirror<T: Clone + PartialEq + 'static>(
    from: &Signal<T>,
    to: &Signal<T>,
    syncing: &Rc<Cell<bool>>,
) -> Subscription {
    let target = to.clone();
    let guard = Rc::clone(syncing);
    from.subscribe_scoped(Subscriber::fallible(move |value: &T| {
        if guard.get() {
            return Ok(());
        }
        guard.set(true);
        let result = target.set(value.clone());
        guard.set(false);
        result
    }))
}

impl<T: Clone + PartialEq + 'static> std::fmt::Debug for TwoWayBinding<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwoWayBinding").finish()
    }
}
