#![forbid(unsafe_code)]

//! Property bags and layout hints carried by [`Node`](crate::Node)s.
//!
//! Ordinary properties are a string-keyed map of [`PropValue`]s: the set of
//! keys is open because each native kind accepts its own options. Layout
//! placement is not part of that map; it travels separately as typed
//! [`LayoutHints`] so the reconciler can attach a widget without sifting
//! through its configuration.
//!
//! # Equality
//!
//! Values compare by value where that is meaningful (numbers, strings) and
//! by identity for shared handles (signals, actions, opaque values). The
//! reconciler relies on this to compute minimal configuration updates.

use std::any::Any;
use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;
use std::rc::Rc;

use crate::reactive::Signal;

/// A click or change handler invoked by the native toolkit.
#[derive(Clone)]
pub struct Action(Rc<dyn Fn()>);

impl Action {
    /// Wrap a handler.
    pub fn new(f: impl Fn() + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Run the handler.
    pub fn invoke(&self) {
        (self.0)()
    }

    /// Whether both actions are the same handler.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Action({:p})", Rc::as_ptr(&self.0).cast::<()>())
    }
}

/// One property value.
#[derive(Clone)]
pub enum PropValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    /// Text that follows a signal.
    Text(Signal<String>),
    /// Flag that follows a signal.
    Flag(Signal<bool>),
    Action(Action),
    /// Anything else, compared by identity.
    Opaque(Rc<dyn Any>),
}

impl PropValue {
    /// Wrap an arbitrary value; equality is by identity of the shared handle.
    pub fn opaque<T: 'static>(value: T) -> Self {
        Self::Opaque(Rc::new(value))
    }

    #[must_use]
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_action(&self) -> Option<&Action> {
        match self {
            Self::Action(a) => Some(a),
            _ => None,
        }
    }

    /// Resolve text-or-signal to the current string.
    #[must_use]
    pub fn resolve_text(&self) -> Option<String> {
        match self {
            Self::Str(s) => Some(s.clone()),
            Self::Text(sig) => Some(sig.get()),
            _ => None,
        }
    }

    /// Resolve flag-or-signal to the current boolean.
    #[must_use]
    pub fn resolve_flag(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            Self::Flag(sig) => Some(sig.get()),
            _ => None,
        }
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Int(a), Self::Int(b)) => a == b,
            (Self::Float(a), Self::Float(b)) => a.to_bits() == b.to_bits(),
            (Self::Str(a), Self::Str(b)) => a == b,
            (Self::Text(a), Self::Text(b)) => a.ptr_eq(b),
            (Self::Flag(a), Self::Flag(b)) => a.ptr_eq(b),
            (Self::Action(a), Self::Action(b)) => a.ptr_eq(b),
            (Self::Opaque(a), Self::Opaque(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Text(sig) => write!(f, "{sig:?}"),
            Self::Flag(sig) => write!(f, "{sig:?}"),
            Self::Action(a) => write!(f, "{a:?}"),
            Self::Opaque(_) => f.write_str("<opaque>"),
        }
    }
}

impl From<bool> for PropValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for PropValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<i32> for PropValue {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<u16> for PropValue {
    fn from(v: u16) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for PropValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<&str> for PropValue {
    fn from(v: &str) -> Self {
        Self::Str(v.to_owned())
    }
}

impl From<String> for PropValue {
    fn from(v: String) -> Self {
        Self::Str(v)
    }
}

impl From<Signal<String>> for PropValue {
    fn from(v: Signal<String>) -> Self {
        Self::Text(v)
    }
}

impl From<&Signal<String>> for PropValue {
    fn from(v: &Signal<String>) -> Self {
        Self::Text(v.clone())
    }
}

impl From<Signal<bool>> for PropValue {
    fn from(v: Signal<bool>) -> Self {
        Self::Flag(v)
    }
}

impl From<&Signal<bool>> for PropValue {
    fn from(v: &Signal<bool>) -> Self {
        Self::Flag(v.clone())
    }
}

impl From<Action> for PropValue {
    fn from(v: Action) -> Self {
        Self::Action(v)
    }
}

/// Ordered property map.
#[derive(Clone, Default, PartialEq)]
pub struct Props {
    entries: BTreeMap<String, PropValue>,
}

impl Props {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue>) {
        self.entries.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<PropValue> {
        self.entries.remove(key)
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&PropValue> {
        self.entries.get(key)
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    #[must_use]
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(PropValue::as_bool)
    }

    #[must_use]
    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(PropValue::as_int)
    }

    #[must_use]
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(PropValue::as_str)
    }

    /// Downcast a [`PropValue::Opaque`] entry.
    #[must_use]
    pub fn get_opaque<T: 'static>(&self, key: &str) -> Option<&T> {
        match self.get(key)? {
            PropValue::Opaque(any) => any.downcast_ref::<T>(),
            _ => None,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, PropValue> {
        self.entries.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Copy of `self` without the listed keys.
    #[must_use]
    pub fn without(&self, keys: &[&str]) -> Self {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(k, _)| !keys.contains(&k.as_str()))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }

    /// Insert every entry of `other` whose key is not already present.
    pub fn fill_from(&mut self, other: &Props) {
        for (key, value) in &other.entries {
            self.entries
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
    }

    /// Entries of `self` that are new or differ from `previous`.
    ///
    /// Keys present only in `previous` are not reported.
    #[must_use]
    pub fn changed_since(&self, previous: &Props) -> Props {
        Self {
            entries: self
                .entries
                .iter()
                .filter(|(k, v)| previous.get(k) != Some(*v))
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

impl fmt::Debug for Props {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<K: Into<String>, V: Into<PropValue>> FromIterator<(K, V)> for Props {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

impl<'a> IntoIterator for &'a Props {
    type Item = (&'a String, &'a PropValue);
    type IntoIter = btree_map::Iter<'a, String, PropValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Edge of the parent a widget is attached against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

/// Axes along which a widget stretches into its allotted space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Fill {
    #[default]
    None,
    X,
    Y,
    Both,
}

/// Leading/trailing padding along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Gap {
    pub before: u16,
    pub after: u16,
}

impl Gap {
    pub const ZERO: Self = Self::new(0, 0);

    #[must_use]
    pub const fn new(before: u16, after: u16) -> Self {
        Self { before, after }
    }

    #[must_use]
    pub const fn even(amount: u16) -> Self {
        Self::new(amount, amount)
    }

    #[must_use]
    pub const fn after(amount: u16) -> Self {
        Self::new(0, amount)
    }
}

/// Placement hints a node asks of its parent container.
///
/// `None` means "use the container's default".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LayoutHints {
    pub side: Option<Side>,
    pub expand: Option<bool>,
    pub fill: Option<Fill>,
    pub padx: Option<Gap>,
    pub pady: Option<Gap>,
}

impl LayoutHints {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Fill every unset hint from `parent`. Set hints are never overridden.
    pub fn inherit_from(&mut self, parent: &LayoutHints) {
        self.side = self.side.or(parent.side);
        self.expand = self.expand.or(parent.expand);
        self.fill = self.fill.or(parent.fill);
        self.padx = self.padx.or(parent.padx);
        self.pady = self.pady.or(parent.pady);
    }
}
