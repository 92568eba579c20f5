#![forbid(unsafe_code)]

//! Node factories for Rocket.
//!
//! Every factory is a pure function returning a [`Node`](rocket_core::Node);
//! nothing renders until the node reaches a reconciler. Extra options chain
//! on the returned node:
//!
//! ```ignore
//! use rocket_widgets::{button, column, label};
//!
//! let ui = column([label("Hello"), button("Quit", quit)], 8).expand(true);
//! ```
//!
//! Elements whose text or state can follow a [`Signal`](rocket_core::Signal)
//! are stateful components: they subscribe while mounted and re-render when
//! the signal changes.

pub mod button;
pub mod containers;
pub mod entry;
pub mod kinds;
pub mod label;
pub mod toggle;
mod tracked;

pub use button::{Button, button};
pub use containers::{
    Column, Container, ContainerKind, Div, Row, ScrollableColumn, ScrollableRow, column, div,
    row, scrollable_column, scrollable_row,
};
pub use entry::{Entry, entry};
pub use label::{Label, label};
pub use toggle::{Checkbox, Switch, checkbox, switch};

/// Prop keys shared by the element set.
pub mod keys {
    pub const TEXT: &str = "text";
    pub const FONT: &str = "font";
    pub const COMMAND: &str = "command";
    pub const CHECKED: &str = "checked";
    pub const VARIABLE: &str = "variable";
    pub const TEXT_VARIABLE: &str = "text_variable";
    /// Edit buffer handed to the native entry widget.
    pub const TEXTVARIABLE: &str = "textvariable";
    pub const ORIENTATION: &str = "orientation";
    pub const TEXT_COLOR: &str = "text_color";
    pub const FG_COLOR: &str = "fg_color";
    pub const HOVER_COLOR: &str = "hover_color";
    pub use rocket_render::SPACING;
}

/// Theme palette keys the elements look up.
pub mod palette {
    pub const TEXT: &str = "text";
    pub const ACCENT: &str = "accent";
    pub const HOVER: &str = "hover";
    pub const BG: &str = "bg";
}
