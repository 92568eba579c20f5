#![forbid(unsafe_code)]

//! Reactive state for Rocket.
//!
//! - [`Signal`]: a shared cell with synchronous change notification to
//!   weakly-held [`Subscriber`]s.
//! - [`Subscription`]: RAII guard that unsubscribes on drop.
//! - [`TwoWayBinding`]: bidirectional sync between two signals.
//!
//! # Architecture
//!
//! `Signal<T>` uses `Rc` + `RefCell` for single-threaded shared ownership.
//! Subscriber callbacks live in `Rc`s owned by whoever subscribed; the signal
//! stores `Weak`s and prunes dead ones lazily. A signal therefore never keeps
//! a component alive, and a component never keeps a signal alive beyond its
//! own strong handle.
//!
//! Signals are `!Send`. Background work marshals onto the UI thread before
//! calling `set`.

pub mod binding;
pub mod signal;

pub use binding::TwoWayBinding;
pub use signal::{Signal, SignalId, Subscriber, Subscription};
