#![forbid(unsafe_code)]

//! Two-state inputs: [`Checkbox`] (stateful, follows a `Signal<bool>`) and
//! [`Switch`] (stateless, `checked` comes straight from props).

use rocket_core::{
    Action, BuildContext, Component, Element, Hooks, Node, PropValue, Props, Signal,
};

use crate::keys::{CHECKED, COMMAND, TEXT, TEXT_COLOR, VARIABLE};
use crate::kinds;
use crate::palette;
use crate::tracked::{flag_signal, retrack};

pub struct Checkbox {
    variable: Option<Signal<bool>>,
}

impl Component for Checkbox {
    fn create(_props: &Props) -> Self {
        Self { variable: None }
    }

    fn on_mount(&mut self, hooks: &mut Hooks<'_>) {
        let next = flag_signal(hooks.props(), VARIABLE);
        retrack(hooks, &mut self.variable, next);
    }

    fn on_update(&mut self, _previous: &Props, hooks: &mut Hooks<'_>) {
        let next = flag_signal(hooks.props(), VARIABLE);
        retrack(hooks, &mut self.variable, next);
    }

    fn build(&self, el: &Element<'_>, cx: &BuildContext) -> Option<Node> {
        let checked = el
            .props
            .get(VARIABLE)
            .and_then(PropValue::resolve_flag)
            .unwrap_or(false);

        let mut node = Node::native(kinds::CHECKBOX);
        if let Some(color) = cx.color(palette::TEXT) {
            node = node.prop(TEXT_COLOR, color);
        }
        Some(
            node.with_props(el.props.without(&[VARIABLE]))
                .prop(CHECKED, checked),
        )
    }
}

/// A labelled checkbox whose state follows `variable`.
pub fn checkbox(text: &str, variable: Option<&Signal<bool>>, command: Option<Action>) -> Node {
    let mut node = Node::component::<Checkbox>().prop(TEXT, text);
    if let Some(variable) = variable {
        node = node.prop(VARIABLE, variable);
    }
    if let Some(command) = command {
        node = node.prop(COMMAND, command);
    }
    node
}

pub struct Switch;

impl Component for Switch {
    fn create(_props: &Props) -> Self {
        Self
    }

    fn build(&self, el: &Element<'_>, _cx: &BuildContext) -> Option<Node> {
        Some(Node::native(kinds::SWITCH).with_props(el.props.clone()))
    }
}

/// An on/off switch.
pub fn switch(checked: bool, command: Option<Action>) -> Node {
    let node = Node::component::<Switch>().prop(CHECKED, checked);
    match command {
        Some(command) => node.prop(COMMAND, command),
        None => node,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket_core::{ComponentHost, ComponentType};

    fn build<C: Component>(node: &Node) -> (ComponentHost, Node) {
        let mut host = ComponentHost::new(ComponentType::of::<C>(), node.props().clone(), Vec::new());
        host.mount(BuildContext::new()).unwrap();
        let native = host.build().unwrap().unwrap();
        (host, native)
    }

    #[test]
    fn checkbox_reflects_variable() {
        let done = Signal::new(true);
        let (host, native) = build::<Checkbox>(&checkbox("Buy milk", Some(&done), None));

        assert_eq!(native.identity(), rocket_core::Identity::Native(kinds::CHECKBOX));
        assert_eq!(native.props().get_bool(CHECKED), Some(true));
        assert_eq!(native.props().get_str(TEXT), Some("Buy milk"));
        assert!(!native.props().contains(VARIABLE));
        assert_eq!(host.signal_count(), 1);

        done.set(false).unwrap();
        assert_eq!(host.build().unwrap().unwrap().props().get_bool(CHECKED), Some(false));
    }

    #[test]
    fn switch_is_stateless() {
        let (host, native) = build::<Switch>(&switch(true, None));
        assert_eq!(native.props().get_bool(CHECKED), Some(true));
        assert!(!native.props().contains(COMMAND));
        assert_eq!(host.signal_count(), 0);
    }
}
