#![forbid(unsafe_code)]

use rocket_core::{Hooks, PropValue, Props, Signal};

/// The text signal under `key`, if the prop holds one.
pub(crate) fn text_signal(props: &Props, key: &str) -> Option<Signal<String>> {
    match props.get(key) {
        Some(PropValue::Text(sig)) => Some(sig.clone()),
        _ => None,
    }
}

/// The flag signal under `key`, if the prop holds one.
pub(crate) fn flag_signal(props: &Props, key: &str) -> Option<Signal<bool>> {
    match props.get(key) {
        Some(PropValue::Flag(sig)) => Some(sig.clone()),
        _ => None,
    }
}

/// Point `slot` at `next`, moving the registration along with it.
pub(crate) fn retrack<T: Clone + PartialEq + 'static>(
    hooks: &mut Hooks<'_>,
    slot: &mut Option<Signal<T>>,
    next: Option<Signal<T>>,
) {
    let unchanged = match (slot.as_ref(), next.as_ref()) {
        (Some(a), Some(b)) => a.ptr_eq(b),
        (None, None) => true,
        _ => false,
    };
    if unchanged {
        return;
    }
    if let Some(old) = slot.take() {
        hooks.unregister_signal(&old);
    }
    if let Some(new) = &next {
        hooks.register_signal(new);
    }
    *slot = next;
}
