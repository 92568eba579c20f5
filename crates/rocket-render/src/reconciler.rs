#![forbid(unsafe_code)]

//! The reconciler: diffs successive node trees and applies the minimal set
//! of create/configure/place/destroy operations to a [`Toolkit`].
//!
//! # Architecture
//!
//! The reconciler owns a *mounted mirror* of the last rendered tree. Each
//! mirror entry pairs a node's identity and key with its realized instance:
//! a native widget handle (plus the props and placement last applied to it)
//! or a shared [`ComponentCell`] holding the component host and the subtree
//! it last rendered. Descriptor trees stay disposable; the mirror is where
//! instances survive from one render to the next.
//!
//! Components are zero-width: a component's rendered child is realized
//! under the component's own native parent, in the component's slot.
//!
//! # Passes and re-entrancy
//!
//! Every `render` and every self-update runs as a *pass*. A component update
//! requested while a pass is running (e.g. a signal set from a lifecycle
//! hook, or from a subscriber reacting to a toolkit operation) is queued,
//! not applied, so no pass ever observes a half-built subtree. The queue is
//! drained, in order, when the outermost pass completes. Outside a pass,
//! a request runs immediately.
//!
//! # Invariants
//!
//! 1. Identity mismatch always unmounts the old subtree before mounting the
//!    new one; there is no cross-type patching.
//! 2. `configure` only receives keys whose values changed, and is never
//!    called with an empty change set.
//! 3. `place` is only called when a widget's computed placement differs
//!    from the one last applied.
//! 4. Every mounted component is unmounted exactly once.
//!
//! # Failure Modes
//!
//! - Lifecycle violations and create failures abort the pass and are
//!   returned. A node that fails to mount is torn down along with whatever
//!   of its subtree was already created; every other node stays in the
//!   mirror, so the next render diffs against exactly what is live.
//! - Configure failures are logged; the widget keeps its previous values and
//!   the next render retries the same keys.
//! - Place failures are logged and retried on the next render.

use std::cell::{Cell, Ref, RefCell, RefMut};
use std::collections::VecDeque;
use std::fmt;
use std::rc::{Rc, Weak};

use ahash::{AHashMap, AHashSet};
use rocket_core::{
    BuildContext, ComponentHost, ComponentType, Identity, LayoutHints, LifecycleError,
    NativeKind, Node, Props, SubscriberError, UpdateRequest,
};
use thiserror::Error;
use tracing::{debug, error, trace, warn};

use crate::layout::placement_for;
use crate::toolkit::{ContainerLayout, Placement, Toolkit, ToolkitError};

/// Errors that abort a render pass.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
    #[error("failed to create `{kind}`: {source}")]
    Create {
        kind: &'static str,
        #[source]
        source: ToolkitError,
    },
}

/// How children of a native container are matched across renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChildDiff {
    /// Match by position.
    #[default]
    Positional,
    /// Match by key when every old and new child carries a unique key;
    /// otherwise fall back to position.
    Keyed,
}

/// Reconciler settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconcilerConfig {
    pub child_diff: ChildDiff,
    /// Layout policy applied to nodes mounted directly under the root.
    pub root_layout: ContainerLayout,
}

impl Default for ReconcilerConfig {
    fn default() -> Self {
        Self {
            child_diff: ChildDiff::Positional,
            root_layout: ContainerLayout::ROOT,
        }
    }
}

/// Counters for diagnostics and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RenderStats {
    /// Completed `render` passes.
    pub renders: u64,
    /// Completed component self-updates.
    pub component_updates: u64,
    /// Requests queued because a pass was running.
    pub deferred: u64,
}

/// A native parent and the layout policy it applies to its children.
#[derive(Clone)]
struct Parent<H> {
    handle: H,
    layout: ContainerLayout,
}

/// Position of a node among its parent's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    index: usize,
    count: usize,
}

impl Slot {
    const ONLY: Self = Self { index: 0, count: 1 };
}

struct Mounted<H> {
    identity: Identity,
    key: Option<String>,
    realized: Realized<H>,
}

enum Realized<H> {
    Native(NativeNode<H>),
    Component(Rc<ComponentCell<H>>),
}

struct NativeNode<H> {
    handle: H,
    props: Props,
    placement: Option<Placement>,
    container: ContainerLayout,
    children: Vec<Mounted<H>>,
}

/// A mounted component: its host, where it sits, and what it last rendered.
struct ComponentCell<H> {
    host: RefCell<ComponentHost>,
    rendered: RefCell<Option<Mounted<H>>>,
    parent: RefCell<Parent<H>>,
    slot: Cell<Slot>,
    layout: Cell<LayoutHints>,
}

enum Pending<H> {
    Update(Weak<ComponentCell<H>>),
    Render(Node, BuildContext),
}

struct Shared<T: Toolkit> {
    toolkit: RefCell<T>,
    root: Parent<T::Handle>,
    child_diff: ChildDiff,
    tree: RefCell<Option<Mounted<T::Handle>>>,
    depth: Cell<usize>,
    pending: RefCell<VecDeque<Pending<T::Handle>>>,
    stats: Cell<RenderStats>,
}

/// Decrements the pass depth when dropped.
struct PassGuard<'a> {
    depth: &'a Cell<usize>,
}

impl<'a> PassGuard<'a> {
    fn enter(depth: &'a Cell<usize>) -> Self {
        depth.set(depth.get() + 1);
        Self { depth }
    }
}

impl Drop for PassGuard<'_> {
    fn drop(&mut self) {
        self.depth.set(self.depth.get().saturating_sub(1));
    }
}

/// Diffs node trees and drives a [`Toolkit`].
///
/// One reconciler owns one native root. Cloning is not supported; share it
/// behind an `Rc` if several owners need to render.
pub struct Reconciler<T: Toolkit> {
    shared: Rc<Shared<T>>,
}

impl<T: Toolkit + 'static> Reconciler<T> {
    /// Reconcile under `toolkit.root()` with default settings.
    #[must_use]
    pub fn new(toolkit: T) -> Self {
        Self::with_config(toolkit, ReconcilerConfig::default())
    }

    #[must_use]
    pub fn with_config(toolkit: T, config: ReconcilerConfig) -> Self {
        let root = Parent {
            handle: toolkit.root(),
            layout: config.root_layout,
        };
        Self {
            shared: Rc::new(Shared {
                toolkit: RefCell::new(toolkit),
                root,
                child_diff: config.child_diff,
                tree: RefCell::new(None),
                depth: Cell::new(0),
                pending: RefCell::new(VecDeque::new()),
                stats: Cell::new(RenderStats::default()),
            }),
        }
    }

    /// Mount `node` on the first call; diff it against the current tree afterwards.
    ///
    /// Called during a pass (from a lifecycle hook or a subscriber), the
    /// render is queued and applied once the running pass completes.
    pub fn render(&self, node: Node, cx: &BuildContext) -> Result<(), RenderError> {
        let shared = &self.shared;
        if shared.in_pass() {
            shared.defer(Pending::Render(node, cx.clone()));
            return Ok(());
        }
        shared.run(|| shared.render_now(node, cx))
    }

    /// Unmount and destroy the whole tree.
    pub fn clear(&self) {
        let tree = self.shared.tree.borrow_mut().take();
        if let Some(tree) = tree {
            let _pass = PassGuard::enter(&self.shared.depth);
            self.shared.unmount(tree, true);
        }
        self.shared.pending.borrow_mut().clear();
    }

    /// Whether a tree is currently mounted.
    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.shared.tree.borrow().is_some()
    }

    /// Borrow the toolkit.
    ///
    /// # Panics
    ///
    /// Panics if called while the reconciler is mid-operation on the toolkit.
    #[must_use]
    pub fn toolkit(&self) -> Ref<'_, T> {
        self.shared.toolkit.borrow()
    }

    /// Mutably borrow the toolkit (e.g. to reconfigure a test double).
    #[must_use]
    pub fn toolkit_mut(&self) -> RefMut<'_, T> {
        self.shared.toolkit.borrow_mut()
    }

    #[must_use]
    pub fn stats(&self) -> RenderStats {
        self.shared.stats.get()
    }
}

impl<T: Toolkit> fmt::Debug for Reconciler<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Reconciler")
            .field("child_diff", &self.shared.child_diff)
            .field("mounted", &self.shared.tree.borrow().is_some())
            .field("stats", &self.shared.stats.get())
            .finish()
    }
}

impl<T: Toolkit + 'static> Shared<T> {
    fn in_pass(&self) -> bool {
        self.depth.get() > 0
    }

    fn bump(&self, f: impl FnOnce(&mut RenderStats)) {
        let mut stats = self.stats.get();
        f(&mut stats);
        self.stats.set(stats);
    }

    fn defer(&self, pending: Pending<T::Handle>) {
        let mut queue = self.pending.borrow_mut();
        if let Pending::Update(cell) = &pending {
            let queued = queue
                .iter()
                .any(|p| matches!(p, Pending::Update(other) if Weak::ptr_eq(other, cell)));
            if queued {
                return;
            }
        }
        queue.push_back(pending);
        drop(queue);
        self.bump(|s| s.deferred += 1);
        debug!("update requested during a pass; deferred");
    }

    /// Run `f` as an outermost pass, then drain deferred work.
    fn run(self: &Rc<Self>, f: impl FnOnce() -> Result<(), RenderError>) -> Result<(), RenderError> {
        let result = {
            let _pass = PassGuard::enter(&self.depth);
            f()
        };
        if let Err(err) = result {
            self.pending.borrow_mut().clear();
            return Err(err);
        }
        self.drain()
    }

    fn drain(self: &Rc<Self>) -> Result<(), RenderError> {
        loop {
            let next = self.pending.borrow_mut().pop_front();
            let Some(next) = next else {
                return Ok(());
            };
            let result = {
                let _pass = PassGuard::enter(&self.depth);
                match next {
                    Pending::Update(cell) => match cell.upgrade() {
                        Some(cell) => self.rebuild(&cell),
                        None => Ok(()),
                    },
                    Pending::Render(node, cx) => self.render_now(node, &cx),
                }
            };
            if let Err(err) = result {
                self.pending.borrow_mut().clear();
                return Err(err);
            }
        }
    }

    fn render_now(self: &Rc<Self>, node: Node, cx: &BuildContext) -> Result<(), RenderError> {
        debug!("render cycle start");
        let mut tree = self.tree.borrow_mut().take();
        let root = self.root.clone();
        let result = self.reconcile(&mut tree, Some(node), &root, Slot::ONLY, cx);
        *self.tree.borrow_mut() = tree;
        result?;
        self.bump(|s| s.renders += 1);
        debug!("render cycle complete");
        Ok(())
    }

    fn request_update(self: &Rc<Self>, cell: &Rc<ComponentCell<T::Handle>>) -> Result<(), RenderError> {
        if self.in_pass() {
            self.defer(Pending::Update(Rc::downgrade(cell)));
            return Ok(());
        }
        self.run(|| self.rebuild(cell))
    }

    fn update_request(self: &Rc<Self>, cell: &Rc<ComponentCell<T::Handle>>) -> UpdateRequest {
        let shared = Rc::downgrade(self);
        let cell = Rc::downgrade(cell);
        Rc::new(move || {
            let (Some(shared), Some(cell)) = (shared.upgrade(), cell.upgrade()) else {
                return Ok(());
            };
            shared.request_update(&cell).map_err(SubscriberError::new)
        })
    }

    /// Rebuild a mounted component and reconcile its subtree in place.
    fn rebuild(self: &Rc<Self>, cell: &Rc<ComponentCell<T::Handle>>) -> Result<(), RenderError> {
        let (child, cx) = {
            let host = cell.host.borrow();
            if !host.is_mounted() {
                return Ok(());
            }
            debug!(component = host.name(), "scheduled update");
            let cx = host.context().cloned().unwrap_or_default();
            (host.build()?, cx)
        };
        self.reconcile_rendered(cell, child, &cx)?;
        self.bump(|s| s.component_updates += 1);
        Ok(())
    }

    /// Bring `current` in line with `new`. On error `current` still lists
    /// exactly the widgets that are live.
    fn reconcile(
        self: &Rc<Self>,
        current: &mut Option<Mounted<T::Handle>>,
        new: Option<Node>,
        parent: &Parent<T::Handle>,
        slot: Slot,
        cx: &BuildContext,
    ) -> Result<(), RenderError> {
        let Some(new) = new else {
            if let Some(old) = current.take() {
                self.unmount(old, true);
            }
            return Ok(());
        };
        match current {
            Some(old) if old.identity == new.identity() => self.patch(old, new, parent, slot, cx),
            _ => {
                if let Some(old) = current.take() {
                    debug!(
                        from = old.identity.name(),
                        to = new.identity().name(),
                        "identity changed; replacing"
                    );
                    self.unmount(old, true);
                }
                *current = Some(self.mount(new, parent, slot, cx)?);
                Ok(())
            }
        }
    }

    /// Update a mounted node in place from a descriptor of the same identity.
    fn patch(
        self: &Rc<Self>,
        mounted: &mut Mounted<T::Handle>,
        new: Node,
        parent: &Parent<T::Handle>,
        slot: Slot,
        cx: &BuildContext,
    ) -> Result<(), RenderError> {
        let parts = new.into_parts();
        mounted.key = parts.key;
        match (&mut mounted.realized, &parts.identity) {
            (Realized::Component(cell), _) => {
                let cell = Rc::clone(cell);
                *cell.parent.borrow_mut() = parent.clone();
                cell.slot.set(slot);
                cell.layout.set(parts.layout);
                let child = {
                    let mut host = cell.host.borrow_mut();
                    host.update(parts.props, parts.children, cx.clone())?;
                    host.build()?
                };
                self.reconcile_rendered(&cell, child, cx)
            }
            (Realized::Native(native), Identity::Native(kind)) => self.update_native(
                native,
                kind,
                parts.props,
                &parts.layout,
                parts.children,
                parent,
                slot,
                cx,
            ),
            // Equal identities imply equal variants.
            (Realized::Native(_), Identity::Component(_)) => Ok(()),
        }
    }

    /// Diff a component's freshly built child against what it rendered last.
    fn reconcile_rendered(
        self: &Rc<Self>,
        cell: &Rc<ComponentCell<T::Handle>>,
        child: Option<Node>,
        cx: &BuildContext,
    ) -> Result<(), RenderError> {
        let parent = cell.parent.borrow().clone();
        let slot = cell.slot.get();
        let hints = cell.layout.get();
        let child = child.map(|mut node| {
            node.inherit_layout(&hints);
            node
        });
        let mut rendered = cell.rendered.borrow_mut().take();
        let result = self.reconcile(&mut rendered, child, &parent, slot, cx);
        *cell.rendered.borrow_mut() = rendered;
        result
    }

    fn mount(
        self: &Rc<Self>,
        node: Node,
        parent: &Parent<T::Handle>,
        slot: Slot,
        cx: &BuildContext,
    ) -> Result<Mounted<T::Handle>, RenderError> {
        let parts = node.into_parts();
        debug!(node = parts.identity.name(), index = slot.index, "mount");
        let realized = match parts.identity {
            Identity::Component(ty) => Realized::Component(self.mount_component(
                ty,
                parts.props,
                parts.layout,
                parts.children,
                parent,
                slot,
                cx,
            )?),
            Identity::Native(kind) => Realized::Native(self.mount_native(
                &kind,
                parts.props,
                &parts.layout,
                parts.children,
                parent,
                slot,
                cx,
            )?),
        };
        Ok(Mounted {
            identity: parts.identity,
            key: parts.key,
            realized,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn mount_component(
        self: &Rc<Self>,
        ty: ComponentType,
        props: Props,
        layout: LayoutHints,
        children: Vec<Node>,
        parent: &Parent<T::Handle>,
        slot: Slot,
        cx: &BuildContext,
    ) -> Result<Rc<ComponentCell<T::Handle>>, RenderError> {
        let cell = Rc::new(ComponentCell {
            host: RefCell::new(ComponentHost::new(ty, props, children)),
            rendered: RefCell::new(None),
            parent: RefCell::new(parent.clone()),
            slot: Cell::new(slot),
            layout: Cell::new(layout),
        });
        let built = {
            let mut host = cell.host.borrow_mut();
            host.mount(cx.clone())?;
            host.set_request_update(self.update_request(&cell));
            host.build()
        };
        let result = built
            .map_err(RenderError::from)
            .and_then(|child| self.reconcile_rendered(&cell, child, cx));
        if let Err(err) = result {
            self.unmount_component(&cell, true);
            return Err(err);
        }
        Ok(cell)
    }

    #[allow(clippy::too_many_arguments)]
    fn mount_native(
        self: &Rc<Self>,
        kind: &NativeKind,
        props: Props,
        hints: &LayoutHints,
        children: Vec<Node>,
        parent: &Parent<T::Handle>,
        slot: Slot,
        cx: &BuildContext,
    ) -> Result<NativeNode<T::Handle>, RenderError> {
        let handle = self
            .toolkit
            .borrow_mut()
            .create(&parent.handle, kind, &props)
            .map_err(|source| RenderError::Create {
                kind: kind.name(),
                source,
            })?;

        let placement = placement_for(&parent.layout, hints, slot.index, slot.count);
        let placed = self.place(&handle, &placement, kind.name());

        let container = ContainerLayout::of(kind, &props);
        let me = Parent {
            handle: handle.clone(),
            layout: container,
        };
        let count = children.len();
        let mut native = NativeNode {
            handle,
            props,
            placement: placed.then_some(placement),
            container,
            children: Vec::with_capacity(count),
        };
        for (index, child) in children.into_iter().enumerate() {
            match self.mount(child, &me, Slot { index, count }, cx) {
                Ok(mounted) => native.children.push(mounted),
                Err(err) => {
                    debug!(
                        widget = kind.name(),
                        "child failed to mount; destroying partial subtree"
                    );
                    self.unmount_native(native, true);
                    return Err(err);
                }
            }
        }
        Ok(native)
    }

    #[allow(clippy::too_many_arguments)]
    fn update_native(
        self: &Rc<Self>,
        native: &mut NativeNode<T::Handle>,
        kind: &NativeKind,
        mut props: Props,
        hints: &LayoutHints,
        children: Vec<Node>,
        parent: &Parent<T::Handle>,
        slot: Slot,
        cx: &BuildContext,
    ) -> Result<(), RenderError> {
        let changes = props.changed_since(&native.props);
        if !changes.is_empty() {
            let keys: Vec<&str> = changes.keys().collect();
            trace!(widget = kind.name(), ?keys, "configure");
            let result = self.toolkit.borrow_mut().configure(&native.handle, &changes);
            if let Err(err) = result {
                error!(
                    widget = kind.name(),
                    error = %err,
                    "configuration rejected; keeping previous values"
                );
                for key in changes.keys() {
                    match native.props.get(key) {
                        Some(previous) => props.insert(key, previous.clone()),
                        None => {
                            props.remove(key);
                        }
                    }
                }
            }
        }
        native.props = props;

        let placement = placement_for(&parent.layout, hints, slot.index, slot.count);
        if native.placement != Some(placement) && self.place(&native.handle, &placement, kind.name()) {
            native.placement = Some(placement);
        }

        native.container = ContainerLayout::of(kind, &native.props);
        let me = Parent {
            handle: native.handle.clone(),
            layout: native.container,
        };
        self.diff_children(&mut native.children, children, &me, cx)
    }

    fn place(&self, handle: &T::Handle, placement: &Placement, kind: &'static str) -> bool {
        let result = self.toolkit.borrow_mut().place(handle, placement);
        match result {
            Ok(()) => true,
            Err(err) => {
                warn!(widget = kind, error = %err, "could not place widget");
                false
            }
        }
    }

    /// Reconcile `current` against `new` in place. On error, children not
    /// yet reached stay as they were.
    fn diff_children(
        self: &Rc<Self>,
        current: &mut Vec<Mounted<T::Handle>>,
        new: Vec<Node>,
        parent: &Parent<T::Handle>,
        cx: &BuildContext,
    ) -> Result<(), RenderError> {
        if self.child_diff == ChildDiff::Keyed && keys_usable(current.as_slice(), &new) {
            return self.diff_keyed(current, new, parent, cx);
        }
        let count = new.len();
        let mut slots: Vec<Option<Mounted<T::Handle>>> =
            std::mem::take(current).into_iter().map(Some).collect();
        if slots.len() < count {
            slots.resize_with(count, || None);
        }

        let mut result = Ok(());
        for ((index, child), state) in new.into_iter().enumerate().zip(slots.iter_mut()) {
            result = self.reconcile(state, Some(child), parent, Slot { index, count }, cx);
            if result.is_err() {
                break;
            }
        }
        if result.is_ok() {
            for leftover in slots.drain(count..).flatten() {
                self.unmount(leftover, true);
            }
        }
        *current = slots.into_iter().flatten().collect();
        result
    }

    fn diff_keyed(
        self: &Rc<Self>,
        current: &mut Vec<Mounted<T::Handle>>,
        new: Vec<Node>,
        parent: &Parent<T::Handle>,
        cx: &BuildContext,
    ) -> Result<(), RenderError> {
        let by_key: AHashMap<String, usize> = current
            .iter()
            .enumerate()
            .filter_map(|(i, m)| Some((m.key.clone()?, i)))
            .collect();
        let mut pool: Vec<Option<Mounted<T::Handle>>> =
            std::mem::take(current).into_iter().map(Some).collect();

        let count = new.len();
        let mut out = Vec::with_capacity(count);
        let mut result = Ok(());
        for (index, child) in new.into_iter().enumerate() {
            let mut state = child
                .key()
                .and_then(|key| by_key.get(key))
                .and_then(|&i| pool.get_mut(i))
                .and_then(Option::take);
            result = self.reconcile(&mut state, Some(child), parent, Slot { index, count }, cx);
            out.extend(state);
            if result.is_err() {
                break;
            }
        }
        let vanished = pool.into_iter().flatten();
        if result.is_ok() {
            for node in vanished {
                self.unmount(node, true);
            }
        } else {
            out.extend(vanished);
        }
        *current = out;
        result
    }

    /// Tear down `node`. Only the topmost native widget is destroyed; the
    /// toolkit cascades to its native children, but the walk continues so
    /// nested components are unmounted.
    fn unmount(&self, node: Mounted<T::Handle>, destroy: bool) {
        debug!(node = node.identity.name(), "unmount");
        match node.realized {
            Realized::Component(cell) => self.unmount_component(&cell, destroy),
            Realized::Native(native) => self.unmount_native(native, destroy),
        }
    }

    fn unmount_component(&self, cell: &ComponentCell<T::Handle>, destroy: bool) {
        cell.host.borrow_mut().unmount();
        let child = cell.rendered.borrow_mut().take();
        if let Some(child) = child {
            self.unmount(child, destroy);
        }
    }

    fn unmount_native(&self, native: NativeNode<T::Handle>, destroy: bool) {
        if destroy {
            self.toolkit.borrow_mut().destroy(&native.handle);
        }
        for child in native.children {
            self.unmount(child, false);
        }
    }
}

/// Keyed matching applies only when every child on both sides has a key and
/// no key repeats.
fn keys_usable<H>(old: &[Mounted<H>], new: &[Node]) -> bool {
    let mut seen = AHashSet::with_capacity(old.len());
    if !old
        .iter()
        .all(|m| m.key.as_deref().is_some_and(|k| seen.insert(k)))
    {
        return false;
    }
    let mut seen = AHashSet::with_capacity(new.len());
    new.iter().all(|n| n.key().is_some_and(|k| seen.insert(k)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket_core::{Component, Element, Hooks, LayoutStrategy, Signal};

    const ROW: NativeKind = NativeKind::container("row", LayoutStrategy::Row);
    const LABEL: NativeKind = NativeKind::leaf("label");
    const BUTTON: NativeKind = NativeKind::leaf("button");

    /// Minimal toolkit that records operations as strings.
    #[derive(Default)]
    struct Recorder {
        next: u32,
        log: Vec<String>,
        reject_configure: bool,
        fail_kind: Option<&'static str>,
    }

    impl Toolkit for Recorder {
        type Handle = u32;

        fn root(&self) -> u32 {
            0
        }

        fn create(&mut self, parent: &u32, kind: &NativeKind, _props: &Props) -> Result<u32, ToolkitError> {
            if self.fail_kind == Some(kind.name()) {
                return Err(ToolkitError::UnsupportedKind(kind.name()));
            }
            self.next += 1;
            self.log.push(format!("create {}#{} in #{parent}", kind.name(), self.next));
            Ok(self.next)
        }

        fn configure(&mut self, widget: &u32, changes: &Props) -> Result<(), ToolkitError> {
            if self.reject_configure {
                return Err(ToolkitError::Other("nope".into()));
            }
            let keys: Vec<&str> = changes.keys().collect();
            self.log.push(format!("configure #{widget} {}", keys.join(",")));
            Ok(())
        }

        fn place(&mut self, widget: &u32, placement: &Placement) -> Result<(), ToolkitError> {
            self.log.push(format!("place #{widget} @{}", placement.index));
            Ok(())
        }

        fn destroy(&mut self, widget: &u32) {
            self.log.push(format!("destroy #{widget}"));
        }
    }

    fn take_log(r: &Reconciler<Recorder>) -> Vec<String> {
        std::mem::take(&mut r.toolkit_mut().log)
    }

    fn label(text: &str) -> Node {
        Node::native(LABEL).prop("text", text)
    }

    #[test]
    fn first_render_mounts_tree() {
        let r = Reconciler::new(Recorder::default());
        r.render(
            Node::native(ROW).child(label("a")).child(label("b")),
            &BuildContext::new(),
        )
        .unwrap();

        assert_eq!(
            take_log(&r),
            vec![
                "create row#1 in #0",
                "place #1 @0",
                "create label#2 in #1",
                "place #2 @0",
                "create label#3 in #1",
                "place #3 @1",
            ]
        );
        assert!(r.is_mounted());
        assert_eq!(r.stats().renders, 1);
    }

    #[test]
    fn identical_render_is_silent() {
        let r = Reconciler::new(Recorder::default());
        let tree = || Node::native(ROW).child(label("a"));
        r.render(tree(), &BuildContext::new()).unwrap();
        take_log(&r);

        r.render(tree(), &BuildContext::new()).unwrap();
        assert!(take_log(&r).is_empty());
    }

    #[test]
    fn configure_fault_is_retried_next_render() {
        let r = Reconciler::new(Recorder::default());
        r.render(label("a"), &BuildContext::new()).unwrap();
        take_log(&r);

        r.toolkit_mut().reject_configure = true;
        r.render(label("b"), &BuildContext::new()).unwrap();
        assert!(take_log(&r).is_empty());

        r.toolkit_mut().reject_configure = false;
        r.render(label("b"), &BuildContext::new()).unwrap();
        assert_eq!(take_log(&r), vec!["configure #1 text"]);
    }

    #[test]
    fn clear_destroys_root_widget_only() {
        let r = Reconciler::new(Recorder::default());
        r.render(
            Node::native(ROW).child(label("a")).child(label("b")),
            &BuildContext::new(),
        )
        .unwrap();
        take_log(&r);

        r.clear();
        assert_eq!(take_log(&r), vec!["destroy #1"]);
        assert!(!r.is_mounted());
    }

    struct Echo {
        text: Signal<String>,
    }

    impl Component for Echo {
        fn create(props: &Props) -> Self {
            let text = match props.get("text") {
                Some(rocket_core::PropValue::Text(sig)) => sig.clone(),
                _ => Signal::new(String::new()),
            };
            Self { text }
        }

        fn on_mount(&mut self, hooks: &mut Hooks<'_>) {
            hooks.register_signal(&self.text);
        }

        fn build(&self, _el: &Element<'_>, _cx: &BuildContext) -> Option<Node> {
            Some(label(&self.text.get()))
        }
    }

    #[test]
    fn signal_change_updates_component_in_place() {
        let text = Signal::new(String::from("one"));
        let r = Reconciler::new(Recorder::default());
        r.render(
            Node::component::<Echo>().prop("text", &text),
            &BuildContext::new(),
        )
        .unwrap();
        take_log(&r);

        text.set("two".into()).unwrap();
        assert_eq!(take_log(&r), vec!["configure #1 text"]);
        assert_eq!(r.stats().component_updates, 1);

        r.clear();
        assert_eq!(text.subscriber_count(), 0);
    }

    struct Pair {
        text: Signal<String>,
    }

    impl Component for Pair {
        fn create(props: &Props) -> Self {
            Self {
                text: Echo::create(props).text,
            }
        }

        fn on_mount(&mut self, hooks: &mut Hooks<'_>) {
            hooks.register_signal(&self.text);
        }

        fn build(&self, _el: &Element<'_>, _cx: &BuildContext) -> Option<Node> {
            Some(
                Node::native(ROW)
                    .child(label(&self.text.get()))
                    .child(Node::native(BUTTON)),
            )
        }
    }

    #[test]
    fn failed_component_mount_is_torn_down() {
        let text = Signal::new(String::from("x"));
        let r = Reconciler::new(Recorder::default());
        r.toolkit_mut().fail_kind = Some("button");

        let tree = || Node::component::<Pair>().prop("text", &text);
        assert!(r.render(tree(), &BuildContext::new()).is_err());
        assert_eq!(
            take_log(&r),
            vec![
                "create row#1 in #0",
                "place #1 @0",
                "create label#2 in #1",
                "place #2 @0",
                "destroy #1",
            ]
        );
        assert!(!r.is_mounted());
        assert_eq!(text.subscriber_count(), 0);

        r.toolkit_mut().fail_kind = None;
        r.render(tree(), &BuildContext::new()).unwrap();
        assert_eq!(text.subscriber_count(), 1);
        assert_eq!(r.stats().renders, 1);
    }

    #[test]
    fn keys_usable_requires_unique_keys_everywhere() {
        let keyed = |k: &str| label(k).keyed(k);
        assert!(keys_usable::<u32>(&[], &[keyed("a"), keyed("b")]));
        assert!(!keys_usable::<u32>(&[], &[keyed("a"), keyed("a")]));
        assert!(!keys_usable::<u32>(&[], &[keyed("a"), label("b")]));
    }
}
