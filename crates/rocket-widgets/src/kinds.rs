#![forbid(unsafe_code)]

//! Native widget kinds a toolkit binding must provide.

use rocket_core::{LayoutStrategy, NativeKind};

pub const COLUMN: NativeKind = NativeKind::container("column", LayoutStrategy::Column);
pub const ROW: NativeKind = NativeKind::container("row", LayoutStrategy::Row);
pub const SCROLLABLE_COLUMN: NativeKind =
    NativeKind::container("scrollable_column", LayoutStrategy::Column);
/// Scrolls horizontally.
pub const SCROLLABLE_ROW: NativeKind =
    NativeKind::container("scrollable_row", LayoutStrategy::Row);

pub const LABEL: NativeKind = NativeKind::leaf("label");
pub const BUTTON: NativeKind = NativeKind::leaf("button");
pub const ENTRY: NativeKind = NativeKind::leaf("entry");
pub const CHECKBOX: NativeKind = NativeKind::leaf("checkbox");
pub const SWITCH: NativeKind = NativeKind::leaf("switch");

/// Every kind above, for toolkits that want to validate support up front.
pub const ALL: [NativeKind; 9] = [
    COLUMN,
    ROW,
    SCROLLABLE_COLUMN,
    SCROLLABLE_ROW,
    LABEL,
    BUTTON,
    ENTRY,
    CHECKBOX,
    SWITCH,
];
