#![forbid(unsafe_code)]

//! Integration tests: reconciliation against the headless toolkit.

use std::cell::Cell;
use std::rc::Rc;

use proptest::prelude::*;
use rocket_core::{
    BuildContext, Component, Element, Gap, Hooks, Node, PropValue, Props, Side, Signal,
};
use rocket_harness::{HeadlessToolkit, Op, WidgetId, init_test_logging};
use rocket_render::{Reconciler, RenderError, ToolkitError};
use rocket_widgets::kinds::{BUTTON, COLUMN, LABEL, ROW};

fn text(value: &str) -> Node {
    Node::native(LABEL).prop("text", value)
}

fn row_of(texts: &[&str], spacing: u16) -> Node {
    Node::native(ROW)
        .prop("spacing", spacing)
        .with_children(texts.iter().map(|t| text(t)))
}

fn setup() -> Reconciler<HeadlessToolkit> {
    init_test_logging();
    Reconciler::new(HeadlessToolkit::new())
}

fn take(r: &Reconciler<HeadlessToolkit>) -> Vec<Op> {
    r.toolkit_mut().take_ops()
}

fn tally(ops: &[Op], pred: impl Fn(&Op) -> bool) -> usize {
    ops.iter().filter(|op| pred(op)).count()
}

// ============================================================================
// Structural scenarios
// ============================================================================

#[test]
fn shrinking_children_updates_survivors_and_unmounts_tail() {
    let r = setup();
    let cx = BuildContext::new();
    r.render(row_of(&["A", "B", "C"], 0), &cx).unwrap();
    let labels: Vec<WidgetId> = r.toolkit().find(&LABEL).iter().map(|w| w.id).collect();
    take(&r);

    r.render(row_of(&["A2", "B2"], 0), &cx).unwrap();
    let ops = take(&r);

    assert_eq!(
        ops,
        vec![
            Op::Configure { id: labels[0], keys: vec!["text".into()] },
            Op::Configure { id: labels[1], keys: vec!["text".into()] },
            Op::Destroy { id: labels[2] },
        ]
    );
    assert_eq!(r.toolkit().outline(), "row\n  label \"A2\"\n  label \"B2\"\n");
}

#[test]
fn only_changed_leaves_are_configured() {
    let r = setup();
    let cx = BuildContext::new();
    let tree = |middle: &str| {
        Node::native(COLUMN)
            .child(row_of(&["a", middle], 0))
            .child(row_of(&["c", "d"], 0))
    };
    r.render(tree("b"), &cx).unwrap();
    let before = r.toolkit().live_count();
    take(&r);

    r.render(tree("B"), &cx).unwrap();
    let ops = take(&r);

    assert_eq!(ops.len(), 1);
    assert!(matches!(&ops[0], Op::Configure { keys, .. } if keys == &["text".to_owned()]));
    assert_eq!(r.toolkit().live_count(), before);
}

#[test]
fn identity_change_replaces_whole_subtree() {
    let r = setup();
    let cx = BuildContext::new();
    r.render(Node::native(COLUMN).child(row_of(&["x", "y"], 0)), &cx).unwrap();
    let old_row = r.toolkit().find(&ROW)[0].id;
    take(&r);

    r.render(
        Node::native(COLUMN).child(Node::native(COLUMN).child(text("x")).child(text("y"))),
        &cx,
    )
    .unwrap();
    let ops = take(&r);

    assert_eq!(ops[0], Op::Destroy { id: old_row });
    assert_eq!(tally(&ops, |op| matches!(op, Op::Destroy { .. })), 1);
    assert_eq!(tally(&ops, |op| matches!(op, Op::Create { .. })), 3);
    assert_eq!(tally(&ops, |op| matches!(op, Op::Configure { .. })), 0);
    assert!(r.toolkit().find(&ROW).is_empty());
}

#[test]
fn removed_props_are_not_sent() {
    let r = setup();
    let cx = BuildContext::new();
    r.render(text("a").prop("width", 80), &cx).unwrap();
    take(&r);

    r.render(text("a"), &cx).unwrap();
    assert!(take(&r).is_empty());
}

// ============================================================================
// Layout
// ============================================================================

#[test]
fn row_spacing_sits_between_children_only() {
    let r = setup();
    r.render(row_of(&["one", "two"], 10), &BuildContext::new()).unwrap();

    let tk = r.toolkit();
    let labels = tk.find(&LABEL);
    let first = labels[0].placement.unwrap();
    let second = labels[1].placement.unwrap();
    assert_eq!(first.side, Side::Left);
    assert_eq!(first.padx, Gap::after(10));
    assert_eq!(second.padx, Gap::ZERO);
}

#[test]
fn growing_a_row_replaces_the_old_last_child() {
    let r = setup();
    let cx = BuildContext::new();
    r.render(row_of(&["a", "b"], 6), &cx).unwrap();
    let old_last = r.toolkit().find(&LABEL)[1].id;
    take(&r);

    r.render(row_of(&["a", "b", "c"], 6), &cx).unwrap();
    let ops = take(&r);

    let placed: Vec<WidgetId> = ops
        .iter()
        .filter_map(|op| match op {
            Op::Place { id, .. } => Some(*id),
            _ => None,
        })
        .collect();
    assert_eq!(placed.len(), 2);
    assert_eq!(placed[0], old_last);
    assert_eq!(
        r.toolkit().widget(old_last).unwrap().placement.unwrap().padx,
        Gap::after(6)
    );
}

#[test]
fn layout_hint_change_replaces_without_configure() {
    let r = setup();
    let cx = BuildContext::new();
    r.render(text("a"), &cx).unwrap();
    take(&r);

    r.render(text("a").expand(true), &cx).unwrap();
    let ops = take(&r);
    assert_eq!(ops.len(), 1);
    assert!(matches!(&ops[0], Op::Place { placement, .. } if placement.expand));
}

// ============================================================================
// Fault handling
// ============================================================================

#[test]
fn configure_fault_is_isolated_to_its_widget() {
    let r = setup();
    let cx = BuildContext::new();
    r.render(
        Node::native(COLUMN)
            .child(text("a").prop("font", "x"))
            .child(text("b")),
        &cx,
    )
    .unwrap();
    r.toolkit_mut().reject_prop("font");
    take(&r);

    r.render(
        Node::native(COLUMN)
            .child(text("a2").prop("font", "y"))
            .child(text("b2")),
        &cx,
    )
    .unwrap();

    let tk = r.toolkit();
    let labels = tk.find(&LABEL);
    assert_eq!(labels[0].props.get_str("text"), Some("a"), "prior value stays");
    assert_eq!(labels[1].props.get_str("text"), Some("b2"));
    assert_eq!(tk.rejections(), 1);
}

#[test]
fn create_fault_aborts_the_pass() {
    let r = setup();
    r.toolkit_mut().fail_create(&BUTTON);

    let err = r
        .render(
            Node::native(COLUMN).child(Node::native(BUTTON)),
            &BuildContext::new(),
        )
        .unwrap_err();
    assert!(matches!(
        err,
        RenderError::Create {
            kind: "button",
            source: ToolkitError::UnsupportedKind("button")
        }
    ));
}

#[test]
fn create_fault_leaves_no_orphaned_widgets() {
    let r = setup();
    let cx = BuildContext::new();
    let tree = |nested: bool| {
        let column = Node::native(COLUMN).child(text("a"));
        if nested {
            column.child(Node::native(ROW).child(text("b")).child(Node::native(BUTTON)))
        } else {
            column
        }
    };
    r.render(tree(false), &cx).unwrap();
    take(&r);

    r.toolkit_mut().fail_create(&BUTTON);
    assert!(r.render(tree(true), &cx).is_err());
    let ops = take(&r);
    let row = ops
        .iter()
        .find_map(|op| match op {
            Op::Create { id, kind: "row", .. } => Some(*id),
            _ => None,
        })
        .unwrap();
    assert_eq!(ops.last(), Some(&Op::Destroy { id: row }));
    assert_eq!(r.toolkit().live_count(), 2);
    assert_eq!(r.toolkit().outline(), "column\n  label \"a\"\n");

    r.toolkit_mut().heal();
    r.render(tree(false), &cx).unwrap();
    assert!(take(&r).is_empty());
    assert_eq!(r.toolkit().live_count(), 2);

    r.render(tree(true), &cx).unwrap();
    assert_eq!(r.toolkit().live_count(), 5);
    assert_eq!(
        r.toolkit().outline(),
        "column\n  label \"a\"\n  row\n    label \"b\"\n    button\n"
    );
}

// ============================================================================
// Components
// ============================================================================

struct Counter {
    count: Signal<i32>,
    builds: Rc<Cell<u32>>,
}

impl Component for Counter {
    fn create(props: &Props) -> Self {
        Self {
            count: props.get_opaque::<Signal<i32>>("count").cloned().unwrap_or_default(),
            builds: props
                .get_opaque::<Rc<Cell<u32>>>("builds")
                .cloned()
                .unwrap_or_default(),
        }
    }

    fn on_mount(&mut self, hooks: &mut Hooks<'_>) {
        hooks.register_signal(&self.count);
    }

    fn build(&self, _el: &Element<'_>, _cx: &BuildContext) -> Option<Node> {
        self.builds.set(self.builds.get() + 1);
        Some(text(&format!("count: {}", self.count.get())))
    }
}

fn counter(count: &Signal<i32>, builds: &Rc<Cell<u32>>) -> Node {
    Node::component::<Counter>()
        .prop("count", PropValue::opaque(count.clone()))
        .prop("builds", PropValue::opaque(Rc::clone(builds)))
}

#[test]
fn duplicate_set_is_suppressed() {
    let r = setup();
    let count = Signal::new(0);
    let builds = Rc::new(Cell::new(0));
    r.render(counter(&count, &builds), &BuildContext::new()).unwrap();
    take(&r);

    for value in [1, 2, 2] {
        count.set(value).unwrap();
    }

    assert_eq!(r.stats().component_updates, 2);
    assert_eq!(builds.get(), 3, "one mount build plus two updates");
    let ops = take(&r);
    assert_eq!(tally(&ops, |op| matches!(op, Op::Configure { .. })), 2);
    assert_eq!(r.toolkit().outline(), "label \"count: 2\"\n");
}

#[test]
fn unmounted_component_stops_listening() {
    let r = setup();
    let cx = BuildContext::new();
    let count = Signal::new(0);
    let builds = Rc::new(Cell::new(0));
    r.render(Node::native(COLUMN).child(counter(&count, &builds)), &cx).unwrap();
    assert_eq!(count.subscriber_count(), 1);

    r.render(Node::native(COLUMN), &cx).unwrap();
    assert_eq!(count.subscriber_count(), 0);

    count.set(5).unwrap();
    assert_eq!(r.stats().component_updates, 0);

    r.render(Node::native(COLUMN).child(counter(&count, &builds)), &cx).unwrap();
    assert_eq!(count.subscriber_count(), 1);
}

#[test]
fn reused_component_keeps_its_instance() {
    let r = setup();
    let cx = BuildContext::new();
    let count = Signal::new(1);
    let builds = Rc::new(Cell::new(0));
    r.render(counter(&count, &builds), &cx).unwrap();
    let label = r.toolkit().find(&LABEL)[0].id;
    take(&r);

    r.render(counter(&count, &builds), &cx).unwrap();
    assert!(take(&r).is_empty());
    assert_eq!(r.toolkit().find(&LABEL)[0].id, label);
    assert_eq!(count.subscriber_count(), 1);
}

struct Wrapper;

impl Component for Wrapper {
    fn create(_props: &Props) -> Self {
        Self
    }

    fn build(&self, _el: &Element<'_>, _cx: &BuildContext) -> Option<Node> {
        Some(text("wrapped"))
    }
}

#[test]
fn component_layout_hints_flow_to_rendered_child() {
    let r = setup();
    r.render(
        Node::native(ROW).child(Node::component::<Wrapper>().expand(true).side(Side::Right)),
        &BuildContext::new(),
    )
    .unwrap();

    let tk = r.toolkit();
    let placement = tk.find(&LABEL)[0].placement.unwrap();
    assert!(placement.expand);
    assert_eq!(placement.side, Side::Right);
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn positional_diff_operation_counts(old_len in 0usize..8, new_len in 0usize..8) {
        let r = Reconciler::new(HeadlessToolkit::new());
        let cx = BuildContext::new();
        let names: Vec<String> = (0..8).map(|i| format!("item {i}")).collect();
        let texts = |n: usize| names[..n].iter().map(String::as_str).collect::<Vec<_>>();

        r.render(row_of(&texts(old_len), 5), &cx).unwrap();
        take(&r);
        r.render(row_of(&texts(new_len), 5), &cx).unwrap();
        let ops = take(&r);

        let creates = tally(&ops, |op| matches!(op, Op::Create { .. }));
        let destroys = tally(&ops, |op| matches!(op, Op::Destroy { .. }));
        let configures = tally(&ops, |op| matches!(op, Op::Configure { .. }));
        let places = tally(&ops, |op| matches!(op, Op::Place { .. }));

        let boundary = usize::from(old_len != new_len && old_len.min(new_len) > 0);
        prop_assert_eq!(creates, new_len.saturating_sub(old_len));
        prop_assert_eq!(destroys, old_len.saturating_sub(new_len));
        prop_assert_eq!(configures, 0);
        prop_assert_eq!(places, new_len.saturating_sub(old_len) + boundary);
        prop_assert_eq!(r.toolkit().find(&LABEL).len(), new_len);
    }
}
