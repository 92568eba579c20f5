#![forbid(unsafe_code)]

//! The native toolkit capability set.
//!
//! The reconciler never touches concrete widgets. Everything it needs from a
//! host toolkit goes through [`Toolkit`]: create a widget under a parent,
//! push changed options to it, attach it to its parent's layout, destroy it.
//!
//! # Failure Modes
//!
//! | Operation | Policy on `Err` |
//! |-----------|-----------------|
//! | `create` | Abort the pass; no instance exists to attach children to |
//! | `configure` | Log at `error`, keep the previous values, continue |
//! | `place` | Log at `warn`, continue |

use std::fmt::Debug;

use rocket_core::{Fill, Gap, LayoutStrategy, NativeKind, Props, Side};
use thiserror::Error;

/// Prop key a container reads its inter-child spacing from.
pub const SPACING: &str = "spacing";

/// Failures reported by a toolkit implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToolkitError {
    #[error("widget kind `{0}` is not supported by this toolkit")]
    UnsupportedKind(&'static str),
    #[error("`{widget}` rejected option `{key}`: {reason}")]
    RejectedProp {
        widget: &'static str,
        key: String,
        reason: String,
    },
    #[error("widget handle no longer exists")]
    MissingWidget,
    #[error("{0}")]
    Other(String),
}

/// Where and how a widget is attached inside its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    /// Position among the parent's children.
    pub index: usize,
    pub side: Side,
    pub fill: Fill,
    pub expand: bool,
    pub padx: Gap,
    pub pady: Gap,
}

/// Layout policy a container applies to its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContainerLayout {
    pub strategy: LayoutStrategy,
    pub spacing: u16,
}

impl ContainerLayout {
    /// Vertical flow with no spacing: the policy of a toolkit root window.
    pub const ROOT: Self = Self {
        strategy: LayoutStrategy::Column,
        spacing: 0,
    };

    /// Policy of a native container. Leaf widgets fall back to [`Self::ROOT`].
    #[must_use]
    pub fn of(kind: &NativeKind, props: &Props) -> Self {
        let spacing = props
            .get_int(SPACING)
            .and_then(|s| u16::try_from(s).ok())
            .unwrap_or(0);
        Self {
            strategy: kind.strategy().unwrap_or(LayoutStrategy::Column),
            spacing,
        }
    }
}

/// A host widget toolkit the reconciler drives.
pub trait Toolkit {
    /// Opaque widget handle.
    type Handle: Clone + Debug + PartialEq + 'static;

    /// Handle of the root the reconciler mounts under.
    fn root(&self) -> Self::Handle;

    /// Construct a widget of `kind` under `parent`, configured with `props`.
    fn create(
        &mut self,
        parent: &Self::Handle,
        kind: &NativeKind,
        props: &Props,
    ) -> Result<Self::Handle, ToolkitError>;

    /// Apply `changes` (only the keys that differ) to an existing widget.
    fn configure(&mut self, widget: &Self::Handle, changes: &Props) -> Result<(), ToolkitError>;

    /// Attach (or re-attach) a widget to its parent's layout.
    fn place(&mut self, widget: &Self::Handle, placement: &Placement) -> Result<(), ToolkitError>;

    /// Destroy a widget. Native children are destroyed with it.
    fn destroy(&mut self, widget: &Self::Handle);
}
