use serde::{Deserialize, Serialize};
use strum::VariantArray;

use crate::piece::{piece_mask, Category, PieceId};
use crate::shape::{Mask, SquareStep};

/// A piece sitting on the board at some rotation.
///
/// The rotation is always in `0..4`; deserialized tiles are normalised the same way [`Tile::new`] does.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(from = "TileRepr")]
pub struct Tile {
    /// Catalog key.
    pub piece: PieceId,
    rotation: u8,
}

#[derive(Deserialize)]
struct TileRepr {
    piece: PieceId,
    rotation: u8,
}

impl From<TileRepr> for Tile {
    fn from(value: TileRepr) -> Self {
        Self::new(value.piece, value.rotation)
    }
}

impl Tile {
    /// A tile of `piece` at `rotation`, normalised into `0..4`.
    pub fn new(piece: PieceId, rotation: u8) -> Self {
        Self { piece, rotation: rotation % 4 }
    }

    /// Clockwise quarter-turns from the catalog orientation.
    pub fn rotation(&self) -> u8 {
        self.rotation
    }

    /// Shorthand for the piece's category.
    pub fn category(&self) -> Category {
        self.piece.category()
    }

    /// Open directions at the current rotation.
    pub fn mask(&self) -> Mask {
        piece_mask(self.piece, self.rotation)
    }

    /// Openings water may use. Triggers never carry water.
    pub fn flow_mask(&self) -> Mask {
        match self.category() {
            Category::Conduit => self.mask(),
            Category::Trigger => Mask::CLOSED,
        }
    }

    /// The same tile turned a quarter clockwise.
    pub fn rotated_cw(self) -> Self {
        Self::new(self.piece, self.rotation % 4 + 1)
    }

    pub(crate) fn glyph(&self) -> char {
        match self.category() {
            Category::Trigger => match self.mask().directions().next() {
                Some(SquareStep::Up) => '↑',
                Some(SquareStep::Right) => '→',
                Some(SquareStep::Down) => '↓',
                Some(SquareStep::Left) => '←',
                None => '?',
            },
            // indexed by mask bits: Up = 1, Right = 2, Down = 4, Left = 8
            Category::Conduit => [
                '?', '╵', '╶', '└', '╷', '│', '┌', '├', '╴', '┘', '─', '┴', '┐', '┤', '┬', '┼',
            ][self.mask().bits() as usize],
        }
    }

    /// The first catalog tile, in catalog and rotation order, drawn as `glyph`.
    pub(crate) fn from_glyph(glyph: char) -> Option<Self> {
        PieceId::VARIANTS.iter()
            .flat_map(|piece| (0..4).map(move |rotation| Self::new(*piece, rotation)))
            .find(|tile| tile.glyph() == glyph)
    }
}
