//! Per-cell state: passability, endpoint role, and highlight kind.

use std::fmt;

/// Cosmetic marker on a cell indicating it belongs to a displayed path or a
/// displayed flow. Orthogonal to passability; a cell carries at most one
/// highlight at a time (last write wins).
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Highlight {
    /// No highlight.
    #[default]
    None,
    /// Part of the most recent shortest-path result painted on this cell.
    Path,
    /// Visited by an animated flow run.
    Flow,
}

/// Which endpoint of a search a cell is marked as.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Endpoint {
    Start,
    End,
}

impl Endpoint {
    /// The opposite endpoint.
    #[inline]
    pub const fn other(self) -> Self {
        match self {
            Self::Start => Self::End,
            Self::End => Self::Start,
        }
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::End => f.write_str("end"),
        }
    }
}

/// A cell's endpoint role: [`Endpoint::Start`], [`Endpoint::End`], or
/// neither (`None`). Derived from the grid's endpoint slots rather than
/// stored per cell, which makes "at most one start, at most one end"
/// structural.
pub type Role = Option<Endpoint>;

/// The mutable state of a single grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CellState {
    /// Whether the search may traverse this cell. `false` = obstacle.
    pub passable: bool,
    pub highlight: Highlight,
}

impl CellState {
    /// Set passability (builder).
    #[inline]
    pub const fn with_passable(mut self, passable: bool) -> Self {
        self.passable = passable;
        self
    }

    /// Set the highlight (builder).
    #[inline]
    pub const fn with_highlight(mut self, highlight: Highlight) -> Self {
        self.highlight = highlight;
        self
    }
}

impl Default for CellState {
    #[inline]
    fn default() -> Self {
        Self {
            passable: true,
            highlight: Highlight::None,
        }
    }
}
