#![forbid(unsafe_code)]

//! Node descriptors: the virtual tree a render pass consumes.
//!
//! A [`Node`] describes one element of the UI: *what* it is ([`Identity`]),
//! how it is configured ([`Props`]), where it asks to be placed
//! ([`LayoutHints`]), what it contains (ordered children) and, optionally, a
//! stable key.
//!
//! Trees are disposable. Every `build` produces a fresh tree; the reconciler
//! correlates successive trees and keeps the realized instances in its own
//! mounted mirror, so descriptors never carry live state.
//!
//! # Invariants
//!
//! 1. A node's identity is fixed at construction; builders only touch props,
//!    hints, children and key.
//! 2. Children are ordered; position is significant.

use std::any::TypeId;
use std::fmt;

use crate::component::Component;
use crate::props::{Fill, Gap, LayoutHints, PropValue, Props, Side};

/// How a native container attaches its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutStrategy {
    /// Children flow left to right.
    Row,
    /// Children flow top to bottom.
    Column,
}

/// A widget kind implemented by the native toolkit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NativeKind {
    name: &'static str,
    strategy: Option<LayoutStrategy>,
}

impl NativeKind {
    /// A widget that holds no children.
    #[must_use]
    pub const fn leaf(name: &'static str) -> Self {
        Self {
            name,
            strategy: None,
        }
    }

    /// A widget that lays out children with `strategy`.
    #[must_use]
    pub const fn container(name: &'static str, strategy: LayoutStrategy) -> Self {
        Self {
            name,
            strategy: Some(strategy),
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub const fn strategy(&self) -> Option<LayoutStrategy> {
        self.strategy
    }
}

type Construct = fn(&Props) -> Box<dyn Component>;

fn construct<C: Component>(props: &Props) -> Box<dyn Component> {
    Box::new(C::create(props))
}

/// Type tag for a component identity.
///
/// Two tags are equal when they name the same Rust type.
#[derive(Clone, Copy)]
pub struct ComponentType {
    name: &'static str,
    type_id: TypeId,
    construct: Construct,
}

impl ComponentType {
    #[must_use]
    pub fn of<C: Component>() -> Self {
        Self {
            name: C::name(),
            type_id: TypeId::of::<C>(),
            construct: construct::<C>,
        }
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Instantiate the component from `props`.
    #[must_use]
    pub fn instantiate(&self, props: &Props) -> Box<dyn Component> {
        (self.construct)(props)
    }
}

impl PartialEq for ComponentType {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for ComponentType {}

impl fmt::Debug for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ComponentType").field(&self.name).finish()
    }
}

/// What a node is. Identity mismatch between renders means hard replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Identity {
    Component(ComponentType),
    Native(NativeKind),
}

impl Identity {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Component(ty) => ty.name(),
            Self::Native(kind) => kind.name(),
        }
    }

    #[must_use]
    pub fn is_component(&self) -> bool {
        matches!(self, Self::Component(_))
    }
}

/// One node of the virtual tree.
#[derive(Clone)]
pub struct Node {
    identity: Identity,
    props: Props,
    layout: LayoutHints,
    children: Vec<Node>,
    key: Option<String>,
}

impl Node {
    /// A node backed directly by the toolkit.
    #[must_use]
    pub fn native(kind: NativeKind) -> Self {
        Self::with_identity(Identity::Native(kind))
    }

    /// A node realized by component `C`.
    #[must_use]
    pub fn component<C: Component>() -> Self {
        Self::with_identity(Identity::Component(ComponentType::of::<C>()))
    }

    fn with_identity(identity: Identity) -> Self {
        Self {
            identity,
            props: Props::new(),
            layout: LayoutHints::default(),
            children: Vec::new(),
            key: None,
        }
    }

    #[must_use]
    pub fn prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.props.insert(key, value);
        self
    }

    /// Merge `props` in, overriding existing keys.
    #[must_use]
    pub fn with_props(mut self, props: Props) -> Self {
        for (key, value) in &props {
            self.props.insert(key.clone(), value.clone());
        }
        self
    }

    #[must_use]
    pub fn child(mut self, child: Node) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(children);
        self
    }

    #[must_use]
    pub fn keyed(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    #[must_use]
    pub fn with_layout(mut self, layout: LayoutHints) -> Self {
        self.layout = layout;
        self
    }

    #[must_use]
    pub fn side(mut self, side: Side) -> Self {
        self.layout.side = Some(side);
        self
    }

    #[must_use]
    pub fn expand(mut self, expand: bool) -> Self {
        self.layout.expand = Some(expand);
        self
    }

    #[must_use]
    pub fn fill(mut self, fill: Fill) -> Self {
        self.layout.fill = Some(fill);
        self
    }

    #[must_use]
    pub fn padx(mut self, gap: Gap) -> Self {
        self.layout.padx = Some(gap);
        self
    }

    #[must_use]
    pub fn pady(mut self, gap: Gap) -> Self {
        self.layout.pady = Some(gap);
        self
    }

    #[must_use]
    pub fn identity(&self) -> Identity {
        self.identity
    }

    #[must_use]
    pub fn props(&self) -> &Props {
        &self.props
    }

    #[must_use]
    pub fn layout(&self) -> &LayoutHints {
        &self.layout
    }

    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    #[must_use]
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Fill unset layout hints from `parent`.
    pub fn inherit_layout(&mut self, parent: &LayoutHints) {
        self.layout.inherit_from(parent);
    }

    /// Take the node apart into its owned pieces.
    #[must_use]
    pub fn into_parts(self) -> NodeParts {
        NodeParts {
            identity: self.identity,
            props: self.props,
            layout: self.layout,
            children: self.children,
            key: self.key,
        }
    }
}

/// Owned pieces of a [`Node`], for consumers that need to move them apart.
#[derive(Debug)]
pub struct NodeParts {
    pub identity: Identity,
    pub props: Props,
    pub layout: LayoutHints,
    pub children: Vec<Node>,
    pub key: Option<String>,
}

impl fmt::Debug for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{}", self.identity.name())?;
        if let Some(key) = &self.key {
            write!(f, " key={key:?}")?;
        }
        for (k, v) in &self.props {
            write!(f, " {k}={v:?}")?;
        }
        if self.children.is_empty() {
            return f.write_str("/>");
        }
        f.write_str(">")?;
        f.debug_list().entries(&self.children).finish()?;
        write!(f, "</{}>", self.identity.name())
    }
}

/// Last path segment of a type name, without generic arguments.
#[must_use]
pub fn short_type_name(full: &'static str) -> &'static str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::Element;
    use crate::context::BuildContext;

    struct Greeting;

    impl Component for Greeting {
        fn create(_props: &Props) -> Self {
            Self
        }

        fn build(&self, _el: &Element<'_>, _cx: &BuildContext) -> Option<Node> {
            None
        }
    }

    struct Farewell;

    impl Component for Farewell {
        fn create(_props: &Props) -> Self {
            Self
        }

        fn build(&self, _el: &Element<'_>, _cx: &BuildContext) -> Option<Node> {
            None
        }
    }

    const LABEL: NativeKind = NativeKind::leaf("label");
    const ROW: NativeKind = NativeKind::container("row", LayoutStrategy::Row);

    #[test]
    fn identity_equality() {
        assert_eq!(Node::native(LABEL).identity(), Node::native(LABEL).identity());
        assert_ne!(Node::native(LABEL).identity(), Node::native(ROW).identity());
        assert_eq!(
            Node::component::<Greeting>().identity(),
            Node::component::<Greeting>().identity()
        );
        assert_ne!(
            Node::component::<Greeting>().identity(),
            Node::component::<Farewell>().identity()
        );
        assert_ne!(
            Node::component::<Greeting>().identity(),
            Node::native(LABEL).identity()
        );
    }

    #[test]
    fn builders_keep_child_order_and_hints() {
        let node = Node::native(ROW)
            .prop("spacing", 4)
            .child(Node::native(LABEL).keyed("a"))
            .with_children([Node::native(LABEL).keyed("b"), Node::native(LABEL).keyed("c")])
            .expand(true)
            .side(Side::Right);

        let keys: Vec<_> = node.children().iter().filter_map(Node::key).collect();
        assert_eq!(keys, vec!["a", "b", "c"]);
        assert_eq!(node.layout().expand, Some(true));
        assert_eq!(node.layout().side, Some(Side::Right));
        assert_eq!(node.props().get_int("spacing"), Some(4));
        assert!(!node.props().contains("expand"));
    }

    #[test]
    fn component_type_names_are_short() {
        assert_eq!(ComponentType::of::<Greeting>().name(), "Greeting");
        assert_eq!(short_type_name("a::b::Wrap<c::d::Inner>"), "Wrap");
        assert_eq!(short_type_name("Plain"), "Plain");
    }

    #[test]
    fn debug_renders_markup() {
        let node = Node::native(ROW).child(Node::native(LABEL).prop("text", "hi").keyed("k"));
        assert_eq!(
            format!("{node:?}"),
            "<row>[<label key=\"k\" text=\"hi\"/>]</row>"
        );
    }
}
