use serde::{Deserialize, Serialize};
use strum::{Display, EnumString, VariantArray};

use crate::shape::{Mask, SquareStep};

/// What a tile does when it sits on the board.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Category {
    /// A passive pipe. Conduits carry water and are cleared as part of a network.
    Conduit,
    /// A one-shot directional effect, fired with [`Engine::trigger_at`](crate::Engine::trigger_at).
    /// Triggers are closed to water.
    Trigger,
}

/// Identifier of an entry in the piece catalog.
///
/// The serialized names (`I1`, `I2`, ...) are the ones stage files use for deck weights.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, VariantArray, Display, EnumString, Serialize, Deserialize)]
pub enum PieceId {
    /// Dead end, open to the right at rotation 0.
    #[strum(serialize = "I1")]
    #[serde(rename = "I1")]
    Cap,
    /// Horizontal straight at rotation 0.
    #[strum(serialize = "I2")]
    #[serde(rename = "I2")]
    Straight,
    /// Up/right elbow at rotation 0.
    #[strum(serialize = "L2")]
    #[serde(rename = "L2")]
    Elbow,
    /// Left/right/down junction at rotation 0.
    #[strum(serialize = "T3")]
    #[serde(rename = "T3")]
    Tee,
    /// Open on all four sides.
    #[strum(serialize = "X4")]
    #[serde(rename = "X4")]
    Cross,
    /// Line-clearing arrow, pointing up at rotation 0.
    #[strum(serialize = "ARROW")]
    #[serde(rename = "ARROW")]
    Arrow,
}

/// Immutable catalog record of a piece at rotation 0.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct PieceDef {
    /// Catalog key.
    pub id: PieceId,
    /// Behaviour on the board.
    pub category: Category,
    /// Open directions at rotation 0.
    pub base_mask: Mask,
}

const fn def(id: PieceId, category: Category, base_bits: u8) -> PieceDef {
    PieceDef { id, category, base_mask: Mask::from_bits(base_bits) }
}

/// The piece catalog, in [`PieceId`] declaration order.
///
/// Mask bits are Up = 1, Right = 2, Down = 4, Left = 8.
pub static PIECE_DEFS: [PieceDef; 6] = [
    def(PieceId::Cap, Category::Conduit, 0b0010),
    def(PieceId::Straight, Category::Conduit, 0b1010),
    def(PieceId::Elbow, Category::Conduit, 0b0011),
    def(PieceId::Tee, Category::Conduit, 0b1110),
    def(PieceId::Cross, Category::Conduit, 0b1111),
    def(PieceId::Arrow, Category::Trigger, 0b0001),
];

impl PieceId {
    /// This piece's catalog record.
    pub fn def(self) -> &'static PieceDef {
        // PIECE_DEFS is laid out in declaration order
        &PIECE_DEFS[self as usize]
    }

    /// Shorthand for `self.def().category`.
    pub fn category(self) -> Category {
        self.def().category
    }
}

/// Open directions of `piece` after `rotation` clockwise quarter-turns.
pub fn piece_mask(piece: PieceId, rotation: u8) -> Mask {
    piece.def().base_mask.rotate(rotation)
}
