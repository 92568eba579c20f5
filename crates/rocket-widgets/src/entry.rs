#![forbid(unsafe_code)]

//! Single-line text input.
//!
//! When given a text signal, the entry keeps it in sync with an edit buffer
//! the native widget writes into (`textvariable`): typing updates the
//! signal, setting the signal updates the widget. The two-way link lives
//! only while the entry is mounted.

use rocket_core::{BuildContext, Component, Element, Hooks, Node, Props, Signal, TwoWayBinding};
use tracing::warn;

use crate::keys::{FG_COLOR, TEXT_COLOR, TEXT_VARIABLE, TEXTVARIABLE};
use crate::kinds;
use crate::palette;
use crate::tracked::{retrack, text_signal};

struct Link {
    buffer: Signal<String>,
    _binding: TwoWayBinding<String>,
}

pub struct Entry {
    source: Option<Signal<String>>,
    link: Option<Link>,
}

impl Entry {
    fn relink(&mut self, hooks: &mut Hooks<'_>) {
        let next = text_signal(hooks.props(), TEXT_VARIABLE);
        let same = match (&self.source, &next) {
            (Some(a), Some(b)) => a.ptr_eq(b),
            (None, None) => true,
            _ => false,
        };
        if same {
            return;
        }
        self.link = None;
        if let Some(source) = &next {
            let buffer = Signal::named("entry-buffer", source.get());
            match TwoWayBinding::new(source, &buffer) {
                Ok(binding) => {
                    self.link = Some(Link {
                        buffer,
                        _binding: binding,
                    });
                }
                Err(err) => warn!(error = %err, "could not bind entry to its text signal"),
            }
        }
        retrack(hooks, &mut self.source, next);
    }
}

impl Component for Entry {
    fn create(_props: &Props) -> Self {
        Self {
            source: None,
            link: None,
        }
    }

    fn on_mount(&mut self, hooks: &mut Hooks<'_>) {
        self.relink(hooks);
    }

    fn on_update(&mut self, _previous: &Props, hooks: &mut Hooks<'_>) {
        self.relink(hooks);
    }

    fn on_unmount(&mut self) {
        self.link = None;
        self.source = None;
    }

    fn build(&self, el: &Element<'_>, cx: &BuildContext) -> Option<Node> {
        let mut node = Node::native(kinds::ENTRY);
        if let Some(color) = cx.color(palette::TEXT) {
            node = node.prop(TEXT_COLOR, color);
        }
        if let Some(color) = cx.color(palette::BG) {
            node = node.prop(FG_COLOR, color);
        }
        node = node.with_props(el.props.without(&[TEXT_VARIABLE]));
        if let Some(link) = &self.link {
            node = node.prop(TEXTVARIABLE, &link.buffer);
        }
        Some(node)
    }
}

/// A text input, optionally bound two-way to `text`.
pub fn entry(text: Option<&Signal<String>>) -> Node {
    let node = Node::component::<Entry>();
    match text {
        Some(sig) => node.prop(TEXT_VARIABLE, sig),
        None => node,
    }
}
