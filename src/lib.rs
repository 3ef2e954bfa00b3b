#![warn(missing_docs)]

//! # `spillway`
//!
//! The resolution engine of a pipe-rotation flow puzzle.
//! A board of rotatable pipe tiles is fed by inlets on one edge and drained on the opposite edge.
//! Whenever a network of pipes runs unbroken from an inlet to a drain without leaking, it is cleared,
//! the tiles above fall into the gap and fresh tiles drop in from above until the board is full again.
//!
//! Begin by describing a stage, either in JSON through [`StageConfig::from_json`] or with a [`StageBuilder`].
//! Construct an [`Engine`] from it, mutate the board with [`rotate_cw`](Engine::rotate_cw),
//! [`swap_cells`](Engine::swap_cells) and [`shift_along_path`](Engine::shift_along_path),
//! then call [`resolve_all`](Engine::resolve_all) to clear whatever now drains.
//!
//! # Output
//! The engine does no rendering and keeps no timing. Every resolve returns an ordered log of [`ResolveStep`]s
//! (water waves, clears, drops, flow count changes) which a renderer replays at whatever pace it likes
//! before handing control back to the player.
//!
//! # Internals
//! A high level overview of a resolve pass is as follows:
//!
//! 1. Express the water-carrying links of the board as an undirected graph. A vertex is an occupied conduit cell,
//!    and an edge joins two orthogonal neighbours whose openings face each other.
//! 2. For each enabled inlet in ascending order, flood the graph breadth-first from the inlet cell,
//!    labelling each reached cell with its layer. Every inlet seeds its own network; networks are never merged.
//! 3. Independently of the flood, re-walk every open connector of the network. A network is cleared only if one of
//!    its cells opens through an enabled drain and every other connector ends at an enabled edge opening
//!    or at a matching cell of the same network.
//! 4. Clear the first network that passes, let the board settle, and start over from the first inlet.
//!
//! The pass ends when no inlet yields a clearable network.
//! All randomness comes from a seeded [`XorShift32`] owned by the engine, so a stage with a seed always plays out identically.

pub use builder::{StageBuilder, StageInvalidReason};
pub use cell::Tile;
pub use config::{BoardSize, DeckConfig, EdgeSelector, FaucetConfig, FaucetMode, Goal, InitialFill, Limits, StageConfig, Weights};
pub use engine::Engine;
pub use error::EngineError;
pub use grid::Grid;
pub use location::Location;
pub use piece::{piece_mask, Category, PieceDef, PieceId, PIECE_DEFS};
pub use rng::XorShift32;
pub use shape::{Mask, SquareStep};
pub use step::{Move, ResolveOutcome, ResolveStep, Source, WaterCell};

mod tests;
pub(crate) mod location;
pub mod shape;
pub(crate) mod piece;
pub(crate) mod cell;
pub(crate) mod rng;
pub(crate) mod error;
pub mod config;
pub mod builder;
pub(crate) mod faucet;
pub(crate) mod grid;
pub(crate) mod graph;
pub(crate) mod validate;
pub(crate) mod spawner;
pub(crate) mod step;
pub(crate) mod resolver;
pub(crate) mod engine;
#[cfg(feature = "wasm")]
pub mod wasm;
