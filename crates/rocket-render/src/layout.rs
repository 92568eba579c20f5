#![forbid(unsafe_code)]

//! Placement policy: from a parent's layout strategy and a child's hints to
//! a concrete [`Placement`].
//!
//! - `Row` places children against the left edge, filling vertically, with
//!   trailing horizontal spacing.
//! - `Column` places children against the top edge, filling horizontally,
//!   with trailing vertical spacing.
//!
//! Spacing goes after every child except the last, so it only ever sits
//! *between* siblings. Hints then override: `side` replaces the edge,
//! `expand` claims spare space and fills both axes, an explicit `fill` or
//! padding wins over everything above.

use rocket_core::{Fill, Gap, LayoutHints, LayoutStrategy, Side};

use crate::toolkit::{ContainerLayout, Placement};

/// Compute the placement of the child at `index` of `count` siblings.
#[must_use]
pub fn placement_for(
    parent: &ContainerLayout,
    hints: &LayoutHints,
    index: usize,
    count: usize,
) -> Placement {
    let trailing = if index + 1 < count { parent.spacing } else { 0 };

    let mut placement = match parent.strategy {
        LayoutStrategy::Row => Placement {
            index,
            side: Side::Left,
            fill: Fill::Y,
            expand: false,
            padx: Gap::after(trailing),
            pady: Gap::ZERO,
        },
        LayoutStrategy::Column => Placement {
            index,
            side: Side::Top,
            fill: Fill::X,
            expand: false,
            padx: Gap::ZERO,
            pady: Gap::after(trailing),
        },
    };

    if let Some(side) = hints.side {
        placement.side = side;
    }
    if hints.expand == Some(true) {
        placement.expand = true;
        placement.fill = Fill::Both;
    }
    if let Some(fill) = hints.fill {
        placement.fill = fill;
    }
    if let Some(padx) = hints.padx {
        placement.padx = padx;
    }
    if let Some(pady) = hints.pady {
        placement.pady = pady;
    }
    placement
}
