//! **flowgrid-core** — The authoritative grid model for flowgrid.
//!
//! This crate provides the foundational types used across the *flowgrid*
//! workspace: geometry primitives, per-cell state (passability, endpoint
//! role, highlight), and the shared-buffer [`GridMap`] that the search and
//! session crates operate on.

pub mod cell;
pub mod geom;
pub mod grid;

pub use cell::{CellState, Endpoint, Highlight, Role};
pub use geom::{Point, Range};
pub use grid::{GridError, GridMap};
