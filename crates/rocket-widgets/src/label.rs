#![forbid(unsafe_code)]

//! Text label. The text may be a plain string or a `Signal<String>`; a
//! signal is followed for as long as the label is mounted.

use rocket_core::{
    BuildContext, Component, Element, Hooks, Node, PropValue, Props, Signal,
};

use crate::keys::{FONT, TEXT, TEXT_COLOR};
use crate::kinds;
use crate::palette;
use crate::tracked::{retrack, text_signal};

const DEFAULT_FONT: &str = "Helvetica 14";

pub struct Label {
    text: Option<Signal<String>>,
}

impl Component for Label {
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
        let font = el.props.get(FONT).cloned().unwrap_or_else(|| DEFAULT_FONT.into());

        let mut node = Node::native(kinds::LABEL);
        if let Some(color) = cx.color(palette::TEXT) {
            node = node.prop(TEXT_COLOR, color);
        }
        Some(
            node.with_props(el.props.without(&[TEXT, FONT]))
                .prop(TEXT, text)
                .prop(FONT, font),
        )
    }
}

/// A label showing `text` (a string or a text signal).
pub fn label(text: impl Into<PropValue>) -> Node {
    Node::component::<Label>().prop(TEXT, text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rocket_core::{ComponentHost, ComponentType, Palette, Theme, ThemeMode};

    struct Mono;

    impl Palette for Mono {
        fn color(&self, mode: ThemeMode, key: &str) -> Option<String> {
            match (mode, key) {
                (ThemeMode::Light, "text") => Some("black".into()),
                (ThemeMode::Dark, "text") => Some("white".into()),
                _ => None,
            }
        }
    }

    fn host(node: &Node, cx: BuildContext) -> ComponentHost {
        let mut host = ComponentHost::new(
            ComponentType::of::<Label>(),
            node.props().clone(),
            Vec::new(),
        );
        host.mount(cx).unwrap();
        host
    }

    #[test]
    fn plain_text_with_theme_color() {
        let cx = BuildContext::builder()
            .theme(Theme::new(ThemeMode::Dark, Mono))
            .build();
        let host = host(&label("hi"), cx);
        let native = host.build().unwrap().unwrap();

        assert_eq!(native.props().get_str(TEXT), Some("hi"));
        assert_eq!(native.props().get_str(TEXT_COLOR), Some("white"));
        assert_eq!(native.props().get_str(FONT), Some(DEFAULT_FONT));
        assert_eq!(host.signal_count(), 0);
    }

    #[test]
    fn caller_props_override_theme() {
        let cx = BuildContext::builder()
            .theme(Theme::new(ThemeMode::Light, Mono))
            .build();
        let node = label("hi").prop(TEXT_COLOR, "red").prop(FONT, "Arial 9");
        let native = host(&node, cx).build().unwrap().unwrap();

        assert_eq!(native.props().get_str(TEXT_COLOR), Some("red"));
        assert_eq!(native.props().get_str(FONT), Some("Arial 9"));
    }

    #[test]
    fn signal_text_is_resolved_and_tracked() {
        let text = Signal::new(String::from("one"));
        let mut host = host(&label(&text), BuildContext::new());
        assert_eq!(text.subscriber_count(), 1);

        text.set("two".into()).unwrap();
        let native = host.build().unwrap().unwrap();
        assert_eq!(native.props().get_str(TEXT), Some("two"));

        host.unmount();
        assert_eq!(text.subscriber_count(), 0);
    }

    #[test]
    fn swapping_signals_moves_subscription() {
        let first = Signal::new(String::from("a"));
        let second = Signal::new(String::from("b"));
        let mut host = host(&label(&first), BuildContext::new());

        host.update(label(&second).props().clone(), Vec::new(), BuildContext::new())
            .unwrap();
        assert_eq!(first.subscriber_count(), 0);
        assert_eq!(second.subscriber_count(), 1);
        assert_eq!(host.signal_count(), 1);
    }
}
