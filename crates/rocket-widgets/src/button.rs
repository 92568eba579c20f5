#![forbid(unsafe_code)]

//! Push button with themed colors and a click [`Action`].

use rocket_core::{Action, BuildContext, Component, Element, Hooks, Node, PropValue, Props, Signal};

use crate::keys::{COMMAND, FG_COLOR, HOVER_COLOR, TEXT, TEXT_COLOR};
use crate::kinds;
use crate::palette;
use crate::tracked::{retrack, text_signal};

pub struct Button {
    text: Option<Signal<String>>,
}

impl Component for Button {
    fn create(_props: &Props) -> Self {
        Self { text: None }
    }

    fn on_mount(&mut self, hooks: &mut Hooks<'_>) {
        let next = text_signal(hooks.props(), TEXT);
        retrack(hooks, &mut self.text, next);
    }

    fn on_update(&mut self, _previous: &Props, hooks: &mut Hooks<'_>) {
        let next = text_signal(hooks.props(), TEXT);
        retrack(hooks, &mut self.text, next);
    }

    fn build(&self, el: &Element<'_>, cx: &BuildContext) -> Option<Node> {
        let text = el
            .props
            .get(TEXT)
            .and_then(PropValue::resolve_text)
            .unwrap_or_default();

        let mut node = Node::native(kinds::BUTTON);
        for (prop, key) in [
            (FG_COLOR, palette::ACCENT),
            (HOVER_COLOR, palette::HOVER),
            (TEXT_COLOR, palette::TEXT),
        ] {
            if let Some(color) = cx.color(key) {
                node = node.prop(prop, color);
            }
        }
        Some(node.with_props(el.props.without(&[TEXT])).prop(TEXT, text))
    }
}

/// A button labelled `text` that runs `command` when clicked.
pub fn button(text: impl Into<PropValue>, command: Action) -> Node {
    Node::component::<Button>()
        .prop(TEXT, text)
        .prop(COMMAND, command)
}
