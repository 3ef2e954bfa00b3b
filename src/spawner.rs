use std::collections::BTreeSet;

use itertools::Itertools;
use log::info;
use rand_core::SeedableRng;

use crate::cell::Tile;
use crate::config::{StageConfig, Weights};
use crate::error::EngineError;
use crate::grid::Grid;
use crate::location::Location;
use crate::piece::PieceId;
use crate::rng::XorShift32;
use crate::step::{Move, Source};

/// Produces new tiles for a single engine, from the stage deck and the engine's own generator.
#[derive(Clone, Debug)]
pub(crate) struct Spawner {
    rng: XorShift32,
    seed: u64,
    enabled: Option<BTreeSet<PieceId>>,
    // weights in catalog order, so draws do not depend on map iteration
    deck: Vec<(PieceId, f64)>,
    initial: Vec<(PieceId, f64)>,
}

fn ordered(weights: &Weights) -> Vec<(PieceId, f64)> {
    weights.iter().map(|(piece, weight)| (*piece, *weight)).collect_vec()
}

impl Spawner {
    pub(crate) fn new(config: &StageConfig) -> Self {
        let (seed, rng) = match config.deck.rng_seed {
            Some(seed) => (seed, XorShift32::seed_from_u64(seed)),
            None => {
                let (seed, rng) = XorShift32::entropy_seeded();
                info!("stage has no rng seed, seeded from entropy with {seed}");
                (seed, rng)
            }
        };

        Self {
            rng,
            seed,
            enabled: config.deck.enabled_pieces.clone(),
            deck: ordered(&config.deck.weights),
            initial: ordered(config.initial_weights()),
        }
    }

    /// Seed in effect, including one drawn from entropy.
    pub(crate) fn seed(&self) -> u64 {
        self.seed
    }

    fn draw(rng: &mut XorShift32, weights: &[(PieceId, f64)], enabled: &Option<BTreeSet<PieceId>>) -> Result<Tile, EngineError> {
        let piece = *rng.pick_weighted(weights, |piece| enabled.as_ref().map_or(true, |set| set.contains(piece)))?;
        let rotation = rng.next_int(4) as u8;
        Ok(Tile::new(piece, rotation))
    }

    /// A fresh tile from the play deck, at a random rotation.
    pub(crate) fn spawn(&mut self) -> Result<Tile, EngineError> {
        Self::draw(&mut self.rng, &self.deck, &self.enabled)
    }

    /// Populate the bottom `rows` rows, row by row from the top of that band, using the initial weights.
    pub(crate) fn initial_fill(&mut self, grid: &mut Grid, rows: usize) -> Result<(), EngineError> {
        let first_row = grid.height() - rows.min(grid.height());
        for y in first_row..grid.height() {
            for x in 0..grid.width() {
                let tile = Self::draw(&mut self.rng, &self.initial, &self.enabled)?;
                grid.set(Location(x, y), Some(tile));
            }
        }

        Ok(())
    }

    /// Fill every empty cell with a freshly spawned tile, recording where above the board each one falls from.
    ///
    /// Within a column the `k` empty cells, top to bottom, fall from depths `k` down to 1, so tiles keep their
    /// relative order on the way in. The board is full afterward.
    pub(crate) fn refill(&mut self, grid: &mut Grid) -> Result<Vec<Move>, EngineError> {
        let mut moves = Vec::new();

        for (column, empties) in &grid.empty_cells().into_iter().chunk_by(|location| location.0) {
            let empties = empties.collect_vec();
            let count = empties.len();
            for (j, to) in empties.into_iter().enumerate() {
                let tile = self.spawn()?;
                grid.set(to, Some(tile));
                moves.push(Move { from: Source::OffGrid { column, depth: count - j }, to, tile });
            }
        }

        Ok(moves)
    }
}
