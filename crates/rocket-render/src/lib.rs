#![forbid(unsafe_code)]

//! Rendering for Rocket.
//!
//! This crate provides:
//! - [`Toolkit`], the capability set a native widget toolkit implements
//! - [`placement_for`], the row/column placement policy
//! - [`Reconciler`], which diffs node trees and drives a toolkit

pub mod layout;
pub mod reconciler;
pub mod toolkit;

pub use layout::placement_for;
pub use reconciler::{ChildDiff, Reconciler, ReconcilerConfig, RenderError, RenderStats};
pub use toolkit::{ContainerLayout, Placement, SPACING, Toolkit, ToolkitError};
