use std::collections::{BTreeMap, BTreeSet};
use std::num::NonZero;

use serde::{Deserialize, Serialize};

use crate::builder::StageInvalidReason;
use crate::error::EngineError;
use crate::location::Dimension;
use crate::piece::PieceId;
use crate::shape::SquareStep;

/// Relative spawn weights, keyed by piece.
pub type Weights = BTreeMap<PieceId, f64>;

/// Everything a stage needs to build and run a puzzle. The engine reads it and never changes it.
///
/// Stage files are JSON with `camelCase` keys; see [`StageConfig::from_json`].
/// Programmatic construction usually goes through [`StageBuilder`](crate::builder::StageBuilder).
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageConfig {
    /// Board dimensions.
    pub board: BoardSize,
    /// Which edges are inlets and drains.
    pub faucets: FaucetConfig,
    /// Pieces the spawner may produce during play.
    pub deck: DeckConfig,
    /// How the board is populated before the first move.
    #[serde(default)]
    pub initial_fill: InitialFill,
    /// Completion target.
    pub goal: Goal,
    /// Safety caps.
    #[serde(default)]
    pub limits: Limits,
}

/// Board dimensions in cells.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct BoardSize {
    /// Columns.
    pub width: usize,
    /// Rows.
    pub height: usize,
}

/// Direction water runs across the board. The first edge named holds the inlets, the opposite edge the drains.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FaucetMode {
    /// Inlets on the left edge, drains on the right; edge indices are rows.
    LeftToRight,
    /// Inlets on the right edge, drains on the left; edge indices are rows.
    RightToLeft,
    /// Inlets on the top edge, drains on the bottom; edge indices are columns.
    TopToBottom,
    /// Inlets on the bottom edge, drains on the top; edge indices are columns.
    BottomToTop,
}

impl FaucetMode {
    /// The exterior direction an inlet cell must open toward.
    pub fn inlet_side(&self) -> SquareStep {
        match self {
            Self::LeftToRight => SquareStep::Left,
            Self::RightToLeft => SquareStep::Right,
            Self::TopToBottom => SquareStep::Up,
            Self::BottomToTop => SquareStep::Down,
        }
    }

    /// The exterior direction a drain cell must open toward.
    pub fn drain_side(&self) -> SquareStep {
        self.inlet_side().invert()
    }

    /// Whether edge indices count rows rather than columns.
    pub fn is_horizontal(&self) -> bool {
        matches!(self, Self::LeftToRight | Self::RightToLeft)
    }
}

/// Which positions along an edge are enabled.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "EdgeSelectorRepr", into = "EdgeSelectorRepr")]
pub enum EdgeSelector {
    /// Every row or column along the edge.
    All,
    /// Only these rows or columns.
    Only(BTreeSet<usize>),
}

impl EdgeSelector {
    /// Whether `index` is enabled.
    pub fn includes(&self, index: usize) -> bool {
        match self {
            Self::All => true,
            Self::Only(indices) => indices.contains(&index),
        }
    }

    /// Enabled indices below `edge_len`, ascending.
    pub fn indices(&self, edge_len: usize) -> Vec<usize> {
        match self {
            Self::All => (0..edge_len).collect(),
            Self::Only(indices) => indices.range(..edge_len).copied().collect(),
        }
    }

    fn fits(&self, edge_len: usize) -> bool {
        match self {
            Self::All => true,
            Self::Only(indices) => indices.iter().all(|index| *index < edge_len),
        }
    }
}

#[derive(Serialize, Deserialize)]
#[serde(untagged)]
enum EdgeSelectorRepr {
    Keyword(String),
    Indices(Vec<usize>),
}

impl TryFrom<EdgeSelectorRepr> for EdgeSelector {
    type Error = String;

    fn try_from(value: EdgeSelectorRepr) -> Result<Self, Self::Error> {
        match value {
            EdgeSelectorRepr::Keyword(keyword) if keyword.eq_ignore_ascii_case("all") => Ok(Self::All),
            EdgeSelectorRepr::Keyword(keyword) => Err(format!("unknown edge selector {keyword:?}, expected \"ALL\" or a list of indices")),
            EdgeSelectorRepr::Indices(indices) => Ok(Self::Only(indices.into_iter().collect())),
        }
    }
}

impl From<EdgeSelector> for EdgeSelectorRepr {
    fn from(value: EdgeSelector) -> Self {
        match value {
            EdgeSelector::All => Self::Keyword("ALL".to_string()),
            EdgeSelector::Only(indices) => Self::Indices(indices.into_iter().collect()),
        }
    }
}

/// Inlet and drain placement.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct FaucetConfig {
    /// Flow direction across the board.
    pub mode: FaucetMode,
    /// Enabled positions along the inlet edge.
    pub inlets: EdgeSelector,
    /// Enabled positions along the drain edge.
    pub outlets: EdgeSelector,
}

/// Spawn deck.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeckConfig {
    /// Pieces the spawner may draw. Absent means every catalog piece.
    #[serde(default)]
    pub enabled_pieces: Option<BTreeSet<PieceId>>,
    /// Relative weights. Pieces with no entry are never drawn.
    pub weights: Weights,
    /// Seed for the stage's generator. Absent means seed from entropy.
    #[serde(default)]
    pub rng_seed: Option<u64>,
}

impl DeckConfig {
    /// Whether the enabled-piece filter admits `piece`.
    pub fn is_enabled(&self, piece: PieceId) -> bool {
        self.enabled_pieces.as_ref().map_or(true, |enabled| enabled.contains(&piece))
    }

    fn selectable_total(&self, weights: &Weights) -> f64 {
        weights.iter()
            .filter(|(piece, weight)| **weight > 0.0 && self.is_enabled(**piece))
            .map(|(_, weight)| weight)
            .sum()
    }
}

/// Board population at construction.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialFill {
    /// Rows to populate, counted up from the bottom. Absent means the whole board.
    #[serde(default)]
    pub rows_from_bottom: Option<usize>,
    /// Weights for the initial population. Absent means the deck weights.
    #[serde(default)]
    pub weights: Option<Weights>,
}

/// Completion target.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    /// Cumulative flows needed to finish the stage.
    pub flows_to_clear: u32,
}

/// Safety caps.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Limits {
    /// Passes one resolve may run before it is treated as a runaway clear/refill cycle.
    pub max_resolve_passes: usize,
}

pub(crate) const DEFAULT_MAX_RESOLVE_PASSES: usize = 256;

impl Default for Limits {
    fn default() -> Self {
        Self { max_resolve_passes: DEFAULT_MAX_RESOLVE_PASSES }
    }
}

impl StageConfig {
    /// Parse and validate a JSON stage.
    pub fn from_json(json: &str) -> Result<Self, EngineError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, EngineError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the configuration, reporting every problem at once.
    pub fn validate(&self) -> Result<(), EngineError> {
        let reasons = self.invalid_reasons();
        if reasons.is_empty() {
            Ok(())
        } else {
            Err(EngineError::InvalidStage(reasons))
        }
    }

    /// Every [`StageInvalidReason`] that applies; empty when the stage is usable.
    pub fn invalid_reasons(&self) -> Vec<StageInvalidReason> {
        let mut reasons = Vec::new();

        let Some((width, height)) = self.dims() else {
            reasons.push(StageInvalidReason::ZeroDimension);
            return reasons;
        };

        let edge_len = self.edge_len(width, height);
        if !self.faucets.inlets.fits(edge_len) {
            reasons.push(StageInvalidReason::InletOutOfRange);
        }
        if !self.faucets.outlets.fits(edge_len) {
            reasons.push(StageInvalidReason::OutletOutOfRange);
        }

        if self.initial_fill.rows_from_bottom.is_some_and(|rows| rows > height.get()) {
            reasons.push(StageInvalidReason::FillTooTall);
        }

        let all_weights = self.deck.weights.values()
            .chain(self.initial_fill.weights.iter().flat_map(|weights| weights.values()));
        for weight in all_weights {
            if !weight.is_finite() || *weight < 0.0 {
                reasons.push(StageInvalidReason::BadWeight);
                break;
            }
        }

        let fills_anything = self.initial_fill.rows_from_bottom.map_or(true, |rows| rows > 0);
        if !(self.deck.selectable_total(&self.deck.weights) > 0.0)
            || (fills_anything && !(self.deck.selectable_total(self.initial_weights()) > 0.0)) {
            reasons.push(StageInvalidReason::EmptyDeck);
        }

        if self.limits.max_resolve_passes == 0 {
            reasons.push(StageInvalidReason::ZeroPassLimit);
        }

        reasons
    }

    /// `(width, height)`, or `None` if either is zero.
    pub(crate) fn dims(&self) -> Option<(Dimension, Dimension)> {
        Some((NonZero::new(self.board.width)?, NonZero::new(self.board.height)?))
    }

    /// Weights used for the initial population.
    pub(crate) fn initial_weights(&self) -> &Weights {
        self.initial_fill.weights.as_ref().unwrap_or(&self.deck.weights)
    }

    /// Rows populated at construction.
    pub(crate) fn initial_rows(&self) -> usize {
        self.initial_fill.rows_from_bottom.unwrap_or(self.board.height).min(self.board.height)
    }

    fn edge_len(&self, width: Dimension, height: Dimension) -> usize {
        if self.faucets.mode.is_horizontal() { height.get() } else { width.get() }
    }
}
