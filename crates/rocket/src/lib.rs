#![forbid(unsafe_code)]

//! Rocket: declarative UI over a retained-mode native toolkit.
//!
//! Applications describe their interface as [`Node`] trees built from the
//! element factories, hand them to a [`Reconciler`] (directly or through a
//! [`Router`]), and let signals drive incremental updates. This crate ties
//! the workspace together and adds the application shell:
//!
//! - [`config`]: `rocket.toml` project and window settings
//! - [`logging`]: `tracing` subscriber setup honouring the release flag
//! - [`router`]: named pages with theme-driven re-rendering
//! - [`dispatch`]: marshalling background results onto the UI thread
//!
//! # Quick start
//!
//! ```ignore
//! use rocket::prelude::*;
//!
//! let config = RocketConfig::discover();
//! rocket::logging::init(&config);
//!
//! let count = Signal::new(0_i64);
//! let reconciler = Reconciler::new(my_toolkit);
//! reconciler.render(column([label("Clicks"), button("+1", inc)], 8), &BuildContext::new())?;
//! ```

pub mod config;
pub mod dispatch;
pub mod logging;
pub mod router;

pub use rocket_core as core;
pub use rocket_render as render;
pub use rocket_widgets as widgets;

pub use rocket_core::{
    Action, BuildContext, Component, Element, Hooks, Identity, LayoutHints, Node,
    Palette, PropValue, Props, Signal, Subscriber, Subscription, Theme, ThemeMode, TwoWayBinding,
};
pub use rocket_render::{ChildDiff, Reconciler, ReconcilerConfig, RenderError, Toolkit};

pub use config::{ConfigError, RocketConfig, WindowConfig};
pub use dispatch::{Dispatcher, UiSender, spawn_background};
pub use router::{Page, Router, RouterError};

/// Everything an application module usually needs.
pub mod prelude {
    pub use crate::config::{RocketConfig, WindowConfig};
    pub use crate::dispatch::{Dispatcher, UiSender, spawn_background};
    pub use crate::router::{Page, Router, RouterError, current_route};
    pub use rocket_core::{
        Action, BuildContext, Component, Element, Fill, Gap, Hooks, Node, Palette, PropValue,
        Props, Side, Signal, Subscriber, Theme, ThemeMode,
    };
    pub use rocket_render::{Reconciler, RenderError, Toolkit};
    pub use rocket_widgets::{
        button, checkbox, column, div, entry, label, row, scrollable_column, scrollable_row,
        switch,
    };
}
