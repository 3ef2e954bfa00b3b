use crate::config::StageConfig;
use crate::location::{Dimension, Location};
use crate::shape::SquareStep;

/// Inlet and drain edges of a stage, resolved against the board size.
#[derive(Clone, Debug)]
pub(crate) struct Faucets {
    dims: (Dimension, Dimension),
    inlet_side: SquareStep,
    drain_side: SquareStep,
    // ascending; this is the scan order of the resolve loop
    inlets: Vec<usize>,
    outlets: Vec<usize>,
}

impl Faucets {
    pub(crate) fn new(config: &StageConfig, dims: (Dimension, Dimension)) -> Self {
        let mode = config.faucets.mode;
        let edge_len = if mode.is_horizontal() { dims.1.get() } else { dims.0.get() };

        Self {
            dims,
            inlet_side: mode.inlet_side(),
            drain_side: mode.drain_side(),
            inlets: config.faucets.inlets.indices(edge_len),
            outlets: config.faucets.outlets.indices(edge_len),
        }
    }

    pub(crate) fn inlet_side(&self) -> SquareStep {
        self.inlet_side
    }

    pub(crate) fn drain_side(&self) -> SquareStep {
        self.drain_side
    }

    /// The board cell at `index` along the edge facing `side`.
    fn edge_cell(&self, side: SquareStep, index: usize) -> Location {
        let (max_x, max_y) = (self.dims.0.get() - 1, self.dims.1.get() - 1);
        match side {
            SquareStep::Up => Location(index, 0),
            SquareStep::Down => Location(index, max_y),
            SquareStep::Left => Location(0, index),
            SquareStep::Right => Location(max_x, index),
        }
    }

    /// Position of `location` along the edge facing `side`, if it lies on that edge.
    fn edge_index(&self, side: SquareStep, location: Location) -> Option<usize> {
        let (max_x, max_y) = (self.dims.0.get() - 1, self.dims.1.get() - 1);
        match side {
            SquareStep::Up if location.1 == 0 => Some(location.0),
            SquareStep::Down if location.1 == max_y => Some(location.0),
            SquareStep::Left if location.0 == 0 => Some(location.1),
            SquareStep::Right if location.0 == max_x => Some(location.1),
            _ => None,
        }
    }

    /// Enabled inlet cells in scan order.
    pub(crate) fn inlet_cells(&self) -> Vec<Location> {
        self.inlets.iter().map(|index| self.edge_cell(self.inlet_side, *index)).collect()
    }

    /// Enabled drain cells in edge order.
    pub(crate) fn drain_cells(&self) -> Vec<Location> {
        self.outlets.iter().map(|index| self.edge_cell(self.drain_side, *index)).collect()
    }

    /// Whether an opening at `location` toward `direction` leaves the board through an enabled inlet.
    pub(crate) fn is_inlet_opening(&self, location: Location, direction: SquareStep) -> bool {
        direction == self.inlet_side
            && self.edge_index(direction, location).is_some_and(|index| self.inlets.binary_search(&index).is_ok())
    }

    /// Whether an opening at `location` toward `direction` leaves the board through an enabled drain.
    pub(crate) fn is_drain_opening(&self, location: Location, direction: SquareStep) -> bool {
        direction == self.drain_side
            && self.edge_index(direction, location).is_some_and(|index| self.outlets.binary_search(&index).is_ok())
    }
}
