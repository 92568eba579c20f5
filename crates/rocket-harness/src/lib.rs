#![forbid(unsafe_code)]

//! Test harness for Rocket.
//!
//! [`HeadlessToolkit`] is an in-memory [`Toolkit`]: it keeps a widget table
//! and an ordered log of every operation the reconciler issued, so tests can
//! assert on exactly what was created, configured, placed and destroyed.
//!
//! Faults can be injected per prop key ([`HeadlessToolkit::reject_prop`])
//! or per widget kind ([`HeadlessToolkit::fail_create`]).
//!
//! # Example
//!
//! ```ignore
//! use rocket_harness::{HeadlessToolkit, Op};
//! use rocket_render::Reconciler;
//!
//! let r = Reconciler::new(HeadlessToolkit::new());
//! r.render(tree, &cx)?;
//! assert!(r.toolkit().ops().iter().all(|op| matches!(op, Op::Create { .. } | Op::Place { .. })));
//! ```

use std::fmt::Write as _;

use ahash::{AHashMap, AHashSet};
use rocket_core::{NativeKind, Props};
use rocket_render::{Placement, Toolkit, ToolkitError};
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Handle of a headless widget. [`WidgetId::ROOT`] is the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct WidgetId(pub u32);

impl WidgetId {
    pub const ROOT: Self = Self(0);
}

/// One recorded toolkit call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    Create {
        id: WidgetId,
        parent: WidgetId,
        kind: &'static str,
    },
    /// Successful configure with the changed keys, sorted.
    Configure { id: WidgetId, keys: Vec<String> },
    Place { id: WidgetId, placement: Placement },
    Destroy { id: WidgetId },
}

impl Op {
    #[must_use]
    pub fn id(&self) -> WidgetId {
        match self {
            Self::Create { id, .. }
            | Self::Configure { id, .. }
            | Self::Place { id, .. }
            | Self::Destroy { id } => *id,
        }
    }
}

/// A live headless widget.
#[derive(Debug, Clone)]
pub struct Widget {
    pub id: WidgetId,
    pub kind: &'static str,
    pub parent: WidgetId,
    pub props: Props,
    pub placement: Option<Placement>,
}

/// In-memory toolkit that records every operation.
#[derive(Debug, Default)]
pub struct HeadlessToolkit {
    next: u32,
    widgets: AHashMap<WidgetId, Widget>,
    ops: Vec<Op>,
    rejected_props: AHashSet<String>,
    failing_kinds: AHashSet<&'static str>,
    rejections: usize,
}

impl HeadlessToolkit {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every `configure` touching `key` fail.
    pub fn reject_prop(&mut self, key: impl Into<String>) {
        self.rejected_props.insert(key.into());
    }

    /// Make `create` fail for widgets of `kind`.
    pub fn fail_create(&mut self, kind: &NativeKind) {
        self.failing_kinds.insert(kind.name());
    }

    /// Remove all injected faults.
    pub fn heal(&mut self) {
        self.rejected_props.clear();
        self.failing_kinds.clear();
    }

    #[must_use]
    pub fn ops(&self) -> &[Op] {
        &self.ops
    }

    /// Drain the operation log.
    pub fn take_ops(&mut self) -> Vec<Op> {
        std::mem::take(&mut self.ops)
    }

    /// Number of configure calls that were rejected.
    #[must_use]
    pub fn rejections(&self) -> usize {
        self.rejections
    }

    #[must_use]
    pub fn widget(&self, id: WidgetId) -> Option<&Widget> {
        self.widgets.get(&id)
    }

    #[must_use]
    pub fn live_count(&self) -> usize {
        self.widgets.len()
    }

    /// Live children of `parent`, in placement order. Unplaced widgets sort last.
    #[must_use]
    pub fn children_of(&self, parent: WidgetId) -> Vec<&Widget> {
        let mut children: Vec<&Widget> = self
            .widgets
            .values()
            .filter(|w| w.parent == parent)
            .collect();
        children.sort_by_key(|w| (w.placement.map_or(usize::MAX, |p| p.index), w.id));
        children
    }

    /// Live widgets of `kind`, ordered by id.
    #[must_use]
    pub fn find(&self, kind: &NativeKind) -> Vec<&Widget> {
        let mut found: Vec<&Widget> = self
            .widgets
            .values()
            .filter(|w| w.kind == kind.name())
            .collect();
        found.sort_by_key(|w| w.id);
        found
    }

    /// Indented outline of the live tree, one widget per line, with its
    /// `text` prop when it has one.
    #[must_use]
    pub fn outline(&self) -> String {
        let mut out = String::new();
        self.outline_into(WidgetId::ROOT, 0, &mut out);
        out
    }

    fn outline_into(&self, parent: WidgetId, depth: usize, out: &mut String) {
        for widget in self.children_of(parent) {
            let _ = write!(out, "{:indent$}{}", "", widget.kind, indent = depth * 2);
            if let Some(text) = widget.props.get("text").and_then(|v| v.resolve_text()) {
                let _ = write!(out, " {text:?}");
            }
            out.push('\n');
            self.outline_into(widget.id, depth + 1, out);
        }
    }

    fn remove_subtree(&mut self, id: WidgetId) {
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            self.widgets.remove(&next);
            stack.extend(
                self.widgets
                    .values()
                    .filter(|w| w.parent == next)
                    .map(|w| w.id),
            );
        }
    }
}

impl Toolkit for HeadlessToolkit {
    type Handle = WidgetId;

    fn root(&self) -> WidgetId {
        WidgetId::ROOT
    }

    fn create(
        &mut self,
        parent: &WidgetId,
        kind: &NativeKind,
        props: &Props,
    ) -> Result<WidgetId, ToolkitError> {
        if self.failing_kinds.contains(kind.name()) {
            debug!(kind = kind.name(), "injected create fault");
            return Err(ToolkitError::UnsupportedKind(kind.name()));
        }
        if *parent != WidgetId::ROOT && !self.widgets.contains_key(parent) {
            return Err(ToolkitError::MissingWidget);
        }
        self.next += 1;
        let id = WidgetId(self.next);
        self.widgets.insert(
            id,
            Widget {
                id,
                kind: kind.name(),
                parent: *parent,
                props: props.clone(),
                placement: None,
            },
        );
        self.ops.push(Op::Create {
            id,
            parent: *parent,
            kind: kind.name(),
        });
        Ok(id)
    }

    fn configure(&mut self, widget: &WidgetId, changes: &Props) -> Result<(), ToolkitError> {
        let Some(target) = self.widgets.get_mut(widget) else {
            return Err(ToolkitError::MissingWidget);
        };
        if let Some(key) = changes.keys().find(|k| self.rejected_props.contains(*k)) {
            self.rejections += 1;
            debug!(widget = target.kind, key = %key, "injected configure fault");
            return Err(ToolkitError::RejectedProp {
                widget: target.kind,
                key: key.to_owned(),
                reason: "rejected by test fixture".into(),
            });
        }
        for (key, value) in changes {
            target.props.insert(key.clone(), value.clone());
        }
        self.ops.push(Op::Configure {
            id: *widget,
            keys: changes.keys().map(str::to_owned).collect(),
        });
        Ok(())
    }

    fn place(&mut self, widget: &WidgetId, placement: &Placement) -> Result<(), ToolkitError> {
        let Some(target) = self.widgets.get_mut(widget) else {
            return Err(ToolkitError::MissingWidget);
        };
        target.placement = Some(*placement);
        self.ops.push(Op::Place {
            id: *widget,
            placement: *placement,
        });
        Ok(())
    }

    fn destroy(&mut self, widget: &WidgetId) {
        if !self.widgets.contains_key(widget) {
            return;
        }
        self.remove_subtree(*widget);
        self.ops.push(Op::Destroy { id: *widget });
    }
}

/// Install a test-friendly `tracing` subscriber (honours `RUST_LOG`).
///
/// Safe to call from every test; only the first call installs.
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}
