//! **flowgrid-session** — Session composition for flowgrid.
//!
//! This crate ties the grid model and the search engine together behind the
//! surface a presentation adapter drives:
//!
//! - [`Session`] — the explicit session object owning the grid, the undo
//!   histories, the search caches, and the animation driver;
//! - [`AnimationDriver`] — paces a single search run across discrete ticks,
//!   one frontier finalization per tick;
//! - [`HighlightHistory`] — two independent LIFO undo stacks, one for path
//!   runs and one for flow runs.
//!
//! The adapter owns rendering, input, and the tick timer; the core owns all
//! state mutation and never blocks between ticks.

pub mod anim;
pub mod history;
pub mod pather;
pub mod session;

pub use anim::{AnimStatus, AnimationConfig, AnimationDriver, FlowMode, TickEvent};
pub use history::{FlowRecord, HighlightHistory, PathRecord};
pub use pather::GridPather;
pub use session::{Session, SessionError};
