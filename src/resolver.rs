use log::{debug, error, trace};

use crate::cell::Tile;
use crate::error::EngineError;
use crate::faucet::Faucets;
use crate::graph::{link_graph, Network};
use crate::grid::Grid;
use crate::location::Location;
use crate::piece::Category;
use crate::spawner::Spawner;
use crate::step::{ResolveOutcome, ResolveStep};
use crate::validate::{validate, Rejection};

/// Borrows an engine's state for the duration of one resolve call.
pub(crate) struct Resolver<'a> {
    grid: &'a mut Grid,
    spawner: &'a mut Spawner,
    faucets: &'a Faucets,
    max_passes: usize,
}

impl<'a> Resolver<'a> {
    pub(crate) fn new(grid: &'a mut Grid, spawner: &'a mut Spawner, faucets: &'a Faucets, max_passes: usize) -> Self {
        Self { grid, spawner, faucets, max_passes }
    }

    /// The network of the first inlet, in scan order, that can be drained right now.
    fn first_drainable(&self) -> Option<Network> {
        let grid = &*self.grid;
        let graph = link_graph(grid);

        for inlet in self.faucets.inlet_cells() {
            let Some(network) = Network::explore(&graph, grid, self.faucets, inlet) else {
                trace!("inlet {inlet} floods nothing");
                continue;
            };

            match validate(&network, grid, self.faucets) {
                Ok(()) => return Some(network),
                Err(Rejection::Dry) => trace!("network from {inlet} ({} cells) does not reach a drain", network.len()),
                Err(Rejection::Leaks(leak)) => debug!("network from {inlet} rejected: {leak:?}"),
            }
        }

        None
    }

    /// Gravity, then refill, each recorded only if something moved.
    fn settle(&mut self, steps: &mut Vec<ResolveStep>) -> Result<(), EngineError> {
        let fallen = self.grid.apply_gravity();
        if !fallen.is_empty() {
            steps.push(ResolveStep::Drop { moves: fallen });
        }

        let spawned = self.spawner.refill(self.grid)?;
        if !spawned.is_empty() {
            steps.push(ResolveStep::Drop { moves: spawned });
        }

        Ok(())
    }

    fn drain(&mut self, network: Network, steps: &mut Vec<ResolveStep>) -> Result<(), EngineError> {
        debug!("draining {} cells from inlet {}", network.len(), network.inlet());

        let water = network.water_cells();
        let cleared = water.iter().map(|cell| cell.location).collect();
        for cell in &water {
            self.grid.take(cell.location);
        }

        steps.push(ResolveStep::Water { cells: water });
        steps.push(ResolveStep::Clear { cells: cleared });
        steps.push(ResolveStep::FlowCount { delta: 1 });

        self.settle(steps)
    }

    /// Clear drainable networks until none is left, scanning inlets from the lowest index after every clear.
    /// Each clear is added to `total` as it happens.
    pub(crate) fn resolve_all(mut self, total: &mut u32) -> Result<ResolveOutcome, EngineError> {
        let mut outcome = ResolveOutcome::default();

        while let Some(network) = self.first_drainable() {
            if outcome.flows_gained as usize >= self.max_passes {
                error!("resolve still clearing after {} passes, giving up", self.max_passes);
                return Err(EngineError::PassLimitExceeded { limit: self.max_passes, applied: outcome.steps });
            }

            outcome.flows_gained += 1;
            *total += 1;
            self.drain(network, &mut outcome.steps)?;
        }

        trace!("settled after {} flows", outcome.flows_gained);
        Ok(outcome)
    }

    /// Fire the trigger at `at`: it and the unbroken run of tiles it points at are cleared, then the board settles.
    ///
    /// Anything that is not a trigger yields no steps.
    pub(crate) fn fire_trigger(mut self, at: Location) -> Result<Vec<ResolveStep>, EngineError> {
        let Some(tile) = self.grid.get(at).filter(|tile: &Tile| tile.category() == Category::Trigger) else {
            return Ok(Vec::new());
        };
        let Some(direction) = tile.mask().directions().next() else {
            return Ok(Vec::new());
        };

        let mut cells = vec![at];
        let mut next = direction.attempt_from(at);
        while self.grid.get(next).is_some() {
            cells.push(next);
            next = direction.attempt_from(next);
        }
        debug!("trigger at {at} fires {direction:?}, clearing {} cells", cells.len());

        for cell in &cells {
            self.grid.take(*cell);
        }

        let mut steps = vec![ResolveStep::Clear { cells }];
        self.settle(&mut steps)?;
        Ok(steps)
    }
}
