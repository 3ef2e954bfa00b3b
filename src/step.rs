use serde::{Deserialize, Serialize};

use crate::cell::Tile;
use crate::location::Location;

/// Where a moved tile came from.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Source {
    /// A board cell.
    Cell(Location),
    /// Above the board: a freshly spawned tile entering `column` from `depth` rows over the top edge.
    OffGrid {
        /// Column the tile falls into.
        column: usize,
        /// Rows above row 0 the tile starts from; at least 1.
        depth: usize,
    },
}

/// A tile travelling from one place to another.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Origin.
    pub from: Source,
    /// Destination cell.
    pub to: Location,
    /// The tile as it sits at `to`.
    pub tile: Tile,
}

/// One cell of a water wave.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct WaterCell {
    /// The cell.
    pub location: Location,
    /// Breadth-first layer counted from the inlet, which is 0.
    pub distance: usize,
}

/// One entry of the ordered, replayable log a resolve produces.
///
/// Renderers play these back in order; the engine attaches no timing to them.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResolveStep {
    /// Water fills a network, ordered by distance from its inlet.
    Water {
        /// Network cells with their wave ordinals.
        cells: Vec<WaterCell>,
    },
    /// Cells emptied.
    Clear {
        /// Cells emptied, in the order they were removed.
        cells: Vec<Location>,
    },
    /// Tiles fell, either down their column or in from above the board.
    Drop {
        /// Individual tile movements.
        moves: Vec<Move>,
    },
    /// Tiles carried along a drag path.
    ///
    /// Resolves never emit this; it wraps the moves of [`Engine::shift_along_path`](crate::Engine::shift_along_path)
    /// when a caller wants drags and resolves in one log. See [`ResolveStep::shift`].
    Shift {
        /// Individual tile movements.
        moves: Vec<Move>,
    },
    /// The stage's flow counter changed.
    FlowCount {
        /// Always 1 for a cleared network.
        delta: u32,
    },
}

impl ResolveStep {
    /// A [`Shift`](Self::Shift) step for the moves of a drag, or `None` if the drag moved nothing.
    pub fn shift(moves: Vec<Move>) -> Option<Self> {
        (!moves.is_empty()).then_some(Self::Shift { moves })
    }
}

/// Result of [`Engine::resolve_all`](crate::Engine::resolve_all).
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveOutcome {
    /// Everything that happened, in order.
    pub steps: Vec<ResolveStep>,
    /// Networks cleared by this call.
    pub flows_gained: u32,
}
