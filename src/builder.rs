use std::collections::BTreeSet;

use thiserror::Error;

use crate::config::{BoardSize, DeckConfig, EdgeSelector, FaucetConfig, FaucetMode, Goal, InitialFill, Limits, StageConfig, Weights};
use crate::piece::PieceId;

/// Reasons a stage may be unusable.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Error)]
pub enum StageInvalidReason {
    /// Width or height is zero.
    #[error("board width and height must be non-zero")]
    ZeroDimension,
    /// An inlet index does not exist on the inlet edge.
    #[error("inlet index outside the inlet edge")]
    InletOutOfRange,
    /// An outlet index does not exist on the drain edge.
    #[error("outlet index outside the drain edge")]
    OutletOutOfRange,
    /// More initial rows than the board has.
    #[error("initial fill is taller than the board")]
    FillTooTall,
    /// A weight is negative, infinite, or NaN.
    #[error("weights must be finite and non-negative")]
    BadWeight,
    /// No enabled piece has positive weight, so nothing can ever spawn.
    #[error("no enabled piece has a positive weight")]
    EmptyDeck,
    /// The resolve pass cap is zero.
    #[error("max resolve passes must be at least 1")]
    ZeroPassLimit,
}

/// Chained construction of a [`StageConfig`].
///
/// Builders mutate themselves while building but can be [`Clone`]d to save their state at some point.
/// Once a call records a [`StageInvalidReason`], every later call does nothing.
#[derive(Clone)]
pub struct StageBuilder {
    config: StageConfig,
    invalid_reasons: Vec<StageInvalidReason>,
}

impl Default for StageBuilder {
    fn default() -> Self {
        Self::with_dims((6, 6))
    }
}

impl StageBuilder {
    /// Construct a new builder with the specified dimensions, specified in `(x, y)` order.
    ///
    /// The stage starts left-to-right with every row an inlet and a drain, an empty deck,
    /// a full initial fill, entropy seeding and a goal of one flow.
    pub fn with_dims(dims: (usize, usize)) -> Self {
        let mut invalid_reasons = Vec::new();
        if dims.0 == 0 || dims.1 == 0 {
            invalid_reasons.push(StageInvalidReason::ZeroDimension);
        }

        Self {
            config: StageConfig {
                board: BoardSize { width: dims.0, height: dims.1 },
                faucets: FaucetConfig {
                    mode: FaucetMode::LeftToRight,
                    inlets: EdgeSelector::All,
                    outlets: EdgeSelector::All,
                },
                deck: DeckConfig {
                    enabled_pieces: None,
                    weights: Weights::new(),
                    rng_seed: None,
                },
                initial_fill: InitialFill::default(),
                goal: Goal { flows_to_clear: 1 },
                limits: Limits::default(),
            },
            invalid_reasons,
        }
    }

    #[inline]
    fn edge_len(&self) -> usize {
        if self.config.faucets.mode.is_horizontal() { self.config.board.height } else { self.config.board.width }
    }

    /// Set the flow direction. Inlet and outlet selections are kept as given.
    pub fn faucets(&mut self, mode: FaucetMode) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        self.config.faucets.mode = mode;
        self
    }

    /// Enable only `indices` along the inlet edge.
    ///
    /// May cause the builder to enter an [`InletOutOfRange`](StageInvalidReason::InletOutOfRange) invalid state.
    pub fn inlets(&mut self, indices: &[usize]) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if indices.iter().any(|index| *index >= self.edge_len()) {
            self.invalid_reasons.push(StageInvalidReason::InletOutOfRange);
            return self;
        }

        self.config.faucets.inlets = EdgeSelector::Only(indices.iter().copied().collect());
        self
    }

    /// Enable only `indices` along the drain edge.
    ///
    /// May cause the builder to enter an [`OutletOutOfRange`](StageInvalidReason::OutletOutOfRange) invalid state.
    pub fn outlets(&mut self, indices: &[usize]) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if indices.iter().any(|index| *index >= self.edge_len()) {
            self.invalid_reasons.push(StageInvalidReason::OutletOutOfRange);
            return self;
        }

        self.config.faucets.outlets = EdgeSelector::Only(indices.iter().copied().collect());
        self
    }

    /// Give `piece` a spawn weight in the deck.
    ///
    /// May cause the builder to enter a [`BadWeight`](StageInvalidReason::BadWeight) invalid state.
    pub fn weight(&mut self, piece: PieceId, weight: f64) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !weight.is_finite() || weight < 0.0 {
            self.invalid_reasons.push(StageInvalidReason::BadWeight);
            return self;
        }

        self.config.deck.weights.insert(piece, weight);
        self
    }

    /// Give `piece` a weight used only for the initial population.
    /// The first call stops the initial fill from borrowing the deck weights.
    ///
    /// May cause the builder to enter a [`BadWeight`](StageInvalidReason::BadWeight) invalid state.
    pub fn initial_weight(&mut self, piece: PieceId, weight: f64) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if !weight.is_finite() || weight < 0.0 {
            self.invalid_reasons.push(StageInvalidReason::BadWeight);
            return self;
        }

        self.config.initial_fill.weights.get_or_insert_with(Weights::new).insert(piece, weight);
        self
    }

    /// Restrict the deck to `pieces`. Weighted pieces outside this set are never drawn.
    pub fn enable(&mut self, pieces: &[PieceId]) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        self.config.deck.enabled_pieces = Some(pieces.iter().copied().collect::<BTreeSet<_>>());
        self
    }

    /// Seed the stage's generator; without this the engine seeds from entropy.
    pub fn seed(&mut self, seed: u64) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        self.config.deck.rng_seed = Some(seed);
        self
    }

    /// Populate only the bottom `rows` rows at construction.
    ///
    /// May cause the builder to enter a [`FillTooTall`](StageInvalidReason::FillTooTall) invalid state.
    pub fn fill_rows(&mut self, rows: usize) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if rows > self.config.board.height {
            self.invalid_reasons.push(StageInvalidReason::FillTooTall);
            return self;
        }

        self.config.initial_fill.rows_from_bottom = Some(rows);
        self
    }

    /// Flows needed to finish.
    pub fn goal(&mut self, flows_to_clear: u32) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        self.config.goal.flows_to_clear = flows_to_clear;
        self
    }

    /// Cap passes per resolve.
    ///
    /// May cause the builder to enter a [`ZeroPassLimit`](StageInvalidReason::ZeroPassLimit) invalid state.
    pub fn max_passes(&mut self, passes: usize) -> &mut Self {
        if !self.invalid_reasons.is_empty() {
            return self;
        }

        if passes == 0 {
            self.invalid_reasons.push(StageInvalidReason::ZeroPassLimit);
            return self;
        }

        self.config.limits.max_resolve_passes = passes;
        self
    }

    /// Check the validity of this builder, ensuring no [`StageInvalidReason`] condition has arisen.
    ///
    /// Returns `None` if the builder is valid, `Some(&Vec<StageInvalidReason>)` otherwise.
    pub fn is_valid(&self) -> Option<&Vec<StageInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            None
        } else {
            Some(&self.invalid_reasons)
        }
    }

    /// Convert the state of this builder into a [`StageConfig`].
    /// Checks spanning several calls, such as an empty deck, run here and are recorded on the builder.
    pub fn build(&mut self) -> Result<StageConfig, &Vec<StageInvalidReason>> {
        if self.invalid_reasons.is_empty() {
            self.invalid_reasons = self.config.invalid_reasons();
        }

        if !self.invalid_reasons.is_empty() {
            return Err(&self.invalid_reasons);
        }

        Ok(self.config.clone())
    }
}
