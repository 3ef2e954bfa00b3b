use std::fmt::{Display, Formatter};

use log::info;
use unordered_pair::UnorderedPair;

use crate::cell::Tile;
use crate::config::StageConfig;
use crate::error::EngineError;
use crate::faucet::Faucets;
use crate::grid::Grid;
use crate::location::Location;
use crate::resolver::Resolver;
use crate::spawner::Spawner;
use crate::step::{Move, ResolveOutcome, ResolveStep};

/// One attempt at a stage: the board, its tile generator and the running flow count.
///
/// An engine exclusively owns its state; callers serialize their calls into it.
/// Every coordinate-taking method tolerates off-board coordinates, reading them as empty and ignoring writes to them.
#[derive(Clone, Debug)]
pub struct Engine {
    config: StageConfig,
    grid: Grid,
    spawner: Spawner,
    faucets: Faucets,
    flows_gained: u32,
}

impl Engine {
    /// Validate `config`, build the board and populate it. Nothing is resolved yet.
    pub fn new(config: StageConfig) -> Result<Self, EngineError> {
        config.validate()?;
        let dims = config.dims().ok_or_else(|| EngineError::InvalidStage(config.invalid_reasons()))?;

        let mut grid = Grid::new(dims);
        let mut spawner = Spawner::new(&config);
        spawner.initial_fill(&mut grid, config.initial_rows())?;
        let faucets = Faucets::new(&config, dims);

        info!(
            "new {}x{} stage, {} rows filled, seed {}",
            grid.width(), grid.height(), config.initial_rows(), spawner.seed(),
        );

        Ok(Self { config, grid, spawner, faucets, flows_gained: 0 })
    }

    /// Parse a JSON stage and build an engine for it.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        Self::new(StageConfig::from_json(json)?)
    }

    /// Columns.
    pub fn width(&self) -> usize {
        self.grid.width()
    }

    /// Rows.
    pub fn height(&self) -> usize {
        self.grid.height()
    }

    /// Flows cleared since construction.
    pub fn flows_gained(&self) -> u32 {
        self.flows_gained
    }

    /// The stage this engine was built from.
    pub fn stage_config(&self) -> &StageConfig {
        &self.config
    }

    /// The RNG seed in effect. For an unseeded stage this is the one drawn from entropy, so the puzzle can be replayed.
    pub fn seed(&self) -> u64 {
        self.spawner.seed()
    }

    /// Whether the cumulative flow count has reached the stage goal.
    pub fn is_goal_met(&self) -> bool {
        self.flows_gained >= self.config.goal.flows_to_clear
    }

    /// Read-only view of the board.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Enabled inlet cells, in the order the resolve loop scans them.
    pub fn inlet_cells(&self) -> Vec<Location> {
        self.faucets.inlet_cells()
    }

    /// Enabled drain cells.
    pub fn drain_cells(&self) -> Vec<Location> {
        self.faucets.drain_cells()
    }

    /// See [`Grid::get`].
    pub fn get_cell(&self, location: Location) -> Option<Tile> {
        self.grid.get(location)
    }

    /// See [`Grid::in_bounds`].
    pub fn in_bounds(&self, location: Location) -> bool {
        self.grid.in_bounds(location)
    }

    /// See [`Grid::rotate_cw`].
    pub fn rotate_cw(&mut self, location: Location) {
        self.grid.rotate_cw(location)
    }

    /// See [`Grid::swap`].
    pub fn swap_cells(&mut self, a: Location, b: Location) {
        self.grid.swap(UnorderedPair(a, b))
    }

    /// See [`Grid::shift_along_path`].
    pub fn shift_along_path(&mut self, path: &[Location]) -> Vec<Move> {
        self.grid.shift_along_path(path)
    }

    /// Write a cell directly, returning what was there. Off-board writes do nothing.
    pub fn place(&mut self, location: Location, tile: Option<Tile>) -> Option<Tile> {
        self.grid.set(location, tile)
    }

    /// Replace the whole board with a text layout in the format [`Display`] writes.
    ///
    /// The layout must match the stage's dimensions.
    pub fn load_layout(&mut self, layout: &str) -> Result<(), EngineError> {
        let grid: Grid = layout.parse()?;
        if (grid.width(), grid.height()) != (self.width(), self.height()) {
            return Err(EngineError::Layout(format!(
                "layout is {}x{}, stage is {}x{}",
                grid.width(), grid.height(), self.width(), self.height(),
            )));
        }

        self.grid = grid;
        Ok(())
    }

    /// Clear every drainable network, settling the board after each, until none remains.
    ///
    /// Returns the ordered step log and the number of flows this call gained.
    /// A stage that keeps producing drainable networks past `limits.maxResolvePasses` is an error.
    /// Flows cleared before that point stay applied: they count toward [`flows_gained`](Self::flows_gained)
    /// and their steps come back in [`EngineError::PassLimitExceeded`].
    pub fn resolve_all(&mut self) -> Result<ResolveOutcome, EngineError> {
        Resolver::new(&mut self.grid, &mut self.spawner, &self.faucets, self.config.limits.max_resolve_passes)
            .resolve_all(&mut self.flows_gained)
    }

    /// Fire the trigger tile at `location`. Cells that are empty, off the board or not triggers yield no steps.
    pub fn trigger_at(&mut self, location: Location) -> Result<Vec<ResolveStep>, EngineError> {
        Resolver::new(&mut self.grid, &mut self.spawner, &self.faucets, self.config.limits.max_resolve_passes)
            .fire_trigger(location)
    }
}

impl Display for Engine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.grid)
    }
}
