use itertools::Itertools;
use thiserror::Error;

use crate::builder::StageInvalidReason;
use crate::step::ResolveStep;

/// Errors surfaced by the engine.
///
/// Out-of-range coordinates and "nothing to clear" are not errors; those are ordinary outcomes.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The stage configuration was rejected before any grid was built.
    #[error("invalid stage configuration: {}", .0.iter().join("; "))]
    InvalidStage(Vec<StageInvalidReason>),
    /// A weighted draw found nothing to pick: the enabled, positively weighted total was `total`.
    #[error("no selectable piece: enabled deck weight total is {total}")]
    NoSelectablePiece {
        /// Sum of the weights that survived filtering.
        total: f64,
    },
    /// A resolve ran more passes than the stage allows, which means the stage clears and refills without settling.
    ///
    /// The clears made before the cap stay on the board and in the flow counter; `applied` is their log,
    /// so a renderer can still play back what happened.
    #[error("resolve did not settle within {limit} passes")]
    PassLimitExceeded {
        /// The configured cap.
        limit: usize,
        /// Steps of the passes that were applied before giving up.
        applied: Vec<ResolveStep>,
    },
    /// A text board layout could not be read.
    #[error("invalid board layout: {0}")]
    Layout(String),
    /// Stage JSON could not be parsed.
    #[error("could not parse stage: {0}")]
    Parse(#[from] serde_json::Error),
}
