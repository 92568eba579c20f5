#![forbid(unsafe_code)]

//! Layout containers.
//!
//! A container is a stateless component that renders as one native
//! container node, forwarding its props and children. Keeping the component
//! layer means containers can later grow behavior without changing the node
//! shape callers build.

use std::marker::PhantomData;

use rocket_core::{BuildContext, Component, Element, NativeKind, Node, Props};

use crate::keys::{ORIENTATION, SPACING};
use crate::kinds;

/// Binds a container component to its native kind.
pub trait ContainerKind: 'static {
    const NAME: &'static str;
    const NATIVE: NativeKind;

    /// Props every instance gets unless the caller set them.
    fn defaults() -> Props {
        Props::new()
    }
}

/// Stateless container rendering as `K::NATIVE`.
pub struct Container<K: ContainerKind> {
    _kind: PhantomData<K>,
}

impl<K: ContainerKind> Component for Container<K> {
    fn create(_props: &Props) -> Self {
        Self { _kind: PhantomData }
    }

    fn name() -> &'static str {
        K::NAME
    }

    fn build(&self, el: &Element<'_>, _cx: &BuildContext) -> Option<Node> {
        let mut props = el.props.clone();
        props.fill_from(&K::defaults());
        Some(
            Node::native(K::NATIVE)
                .with_props(props)
                .with_children(el.children.iter().cloned()),
        )
    }
}

pub enum Column {}
pub enum Row {}
pub enum ScrollableColumn {}
pub enum ScrollableRow {}
pub enum Div {}

impl ContainerKind for Column {
    const NAME: &'static str = "Column";
    const NATIVE: NativeKind = kinds::COLUMN;
}

impl ContainerKind for Row {
    const NAME: &'static str = "Row";
    const NATIVE: NativeKind = kinds::ROW;
}

impl ContainerKind for ScrollableColumn {
    const NAME: &'static str = "ScrollableColumn";
    const NATIVE: NativeKind = kinds::SCROLLABLE_COLUMN;
}

impl ContainerKind for ScrollableRow {
    const NAME: &'static str = "ScrollableRow";
    const NATIVE: NativeKind = kinds::SCROLLABLE_ROW;

    fn defaults() -> Props {
        Props::new().with(ORIENTATION, "horizontal")
    }
}

impl ContainerKind for Div {
    const NAME: &'static str = "Div";
    const NATIVE: NativeKind = kinds::COLUMN;
}

fn container<K: ContainerKind>(children: impl IntoIterator<Item = Node>) -> Node {
    Node::component::<Container<K>>().with_children(children)
}

/// Vertical container with `spacing` between children.
pub fn column(children: impl IntoIterator<Item = Node>, spacing: u16) -> Node {
    container::<Column>(children).prop(SPACING, spacing)
}

/// Horizontal container with `spacing` between children.
pub fn row(children: impl IntoIterator<Item = Node>, spacing: u16) -> Node {
    container::<Row>(children).prop(SPACING, spacing)
}

/// Vertical container that scrolls.
pub fn scrollable_column(children: impl IntoIterator<Item = Node>) -> Node {
    container::<ScrollableColumn>(children)
}

/// Horizontal container that scrolls horizontally.
pub fn scrollable_row(children: impl IntoIterator<Item = Node>) -> Node {
    container::<ScrollableRow>(children)
}

/// Plain grouping box.
pub fn div(children: impl IntoIterator<Item = Node>) -> Node {
    container::<Div>(children)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::label;
    use rocket_core::{ComponentHost, ComponentType, Identity};

    fn realize(node: &Node) -> Node {
        let Identity::Component(ty) = node.identity() else {
            panic!("factories produce component nodes");
        };
        let mut host = ComponentHost::new(ty, node.props().clone(), node.children().to_vec());
        host.mount(BuildContext::new()).unwrap();
        host.build().unwrap().unwrap()
    }

    #[test]
    fn row_forwards_children_and_spacing() {
        let node = row([label("a"), label("b")], 10);
        let native = realize(&node);

        assert_eq!(native.identity(), Identity::Native(kinds::ROW));
        assert_eq!(native.props().get_int(SPACING), Some(10));
        assert_eq!(native.children().len(), 2);
    }

    #[test]
    fn scrollable_row_defaults_to_horizontal() {
        let native = realize(&scrollable_row(Vec::new()));
        assert_eq!(native.props().get_str(ORIENTATION), Some("horizontal"));

        let vertical = realize(&scrollable_row(Vec::new()).prop(ORIENTATION, "vertical"));
        assert_eq!(vertical.props().get_str(ORIENTATION), Some("vertical"));
    }

    #[test]
    fn containers_are_distinct_identities() {
        assert_ne!(column(Vec::new(), 0).identity(), row(Vec::new(), 0).identity());
        assert_ne!(div(Vec::new()).identity(), column(Vec::new(), 0).identity());
        assert_eq!(
            ComponentType::of::<Container<Div>>().name(),
            "Div"
        );
    }

    #[test]
    fn factory_does_not_consume_caller_collection() {
        let items = vec![label("x"), label("y")];
        let node = column(items.iter().cloned(), 0);
        assert_eq!(items.len(), 2);
        assert_eq!(node.children().len(), 2);
    }
}
