#![forbid(unsafe_code)]

//! Core types for Rocket, a declarative UI framework.
//!
//! This crate provides:
//! - [`Signal`] observable values and the [`TwoWayBinding`] that syncs a pair
//! - [`Node`] descriptors, the virtual tree a render pass consumes
//! - [`Component`] and the [`ComponentHost`] lifecycle state machine
//! - [`BuildContext`], the read-only bag threaded through `build`
//! - [`Theme`] mode tracking with an application [`Palette`]
//!
//! The reconciler that realizes node trees lives in `rocket-render`.

pub mod component;
pub mod context;
pub mod error;
pub mod node;
pub mod props;
pub mod reactive;
pub mod theme;

pub use component::{Component, ComponentHost, Element, Hooks, UpdateRequest};
pub use context::{BuildContext, BuildContextBuilder};
pub use error::{LifecycleError, SubscriberError};
pub use node::{ComponentType, Identity, LayoutStrategy, NativeKind, Node, NodeParts};
pub use props::{Action, Fill, Gap, LayoutHints, PropValue, Props, Side};
pub use reactive::{Signal, SignalId, Subscriber, Subscription, TwoWayBinding};
pub use theme::{Palette, Theme, ThemeMode};
