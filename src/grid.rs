use std::fmt::{Display, Formatter};
use std::num::NonZero;
use std::str::FromStr;

use itertools::Itertools;
use ndarray::Array2;
use unordered_pair::UnorderedPair;

use crate::cell::Tile;
use crate::error::EngineError;
use crate::location::{Dimension, Location};
use crate::step::{Move, Source};

/// A `width` by `height` matrix of optional tiles.
///
/// Every accessor is bounds-checked: reads outside the board yield `None`, writes outside it do nothing.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Grid {
    // indexed (y, x), like every ndarray in this crate
    cells: Array2<Option<Tile>>,
    dims: (Dimension, Dimension),
}

impl Grid {
    /// An empty board with `dims` given as `(width, height)`.
    pub(crate) fn new(dims: (Dimension, Dimension)) -> Self {
        Self {
            cells: Array2::from_elem((dims.1.get(), dims.0.get()), None),
            dims,
        }
    }

    /// Columns.
    pub fn width(&self) -> usize {
        self.dims.0.get()
    }

    /// Rows.
    pub fn height(&self) -> usize {
        self.dims.1.get()
    }

    /// Whether `location` is on the board.
    pub fn in_bounds(&self, location: Location) -> bool {
        location.0 < self.width() && location.1 < self.height()
    }

    /// The tile at `location`; `None` if the cell is empty or off the board.
    pub fn get(&self, location: Location) -> Option<Tile> {
        self.cells.get(location.as_index()).copied().flatten()
    }

    /// Overwrite `location`, returning what was there.
    pub fn set(&mut self, location: Location, tile: Option<Tile>) -> Option<Tile> {
        self.cells.get_mut(location.as_index())
            .and_then(|slot| std::mem::replace(slot, tile))
    }

    /// Empty `location`, returning what was there.
    pub fn take(&mut self, location: Location) -> Option<Tile> {
        self.cells.get_mut(location.as_index()).and_then(Option::take)
    }

    /// Turn the tile at `location` a quarter clockwise. Empty or off-board cells are left alone.
    pub fn rotate_cw(&mut self, location: Location) {
        if let Some(Some(tile)) = self.cells.get_mut(location.as_index()) {
            *tile = tile.rotated_cw();
        }
    }

    /// Exchange the contents of two cells, empty or not.
    /// Nothing happens if the cells coincide or either is off the board.
    pub fn swap(&mut self, cells: UnorderedPair<Location>) {
        let UnorderedPair(a, b) = cells;
        if a == b || !self.in_bounds(a) || !self.in_bounds(b) {
            return;
        }

        self.cells.swap(a.as_index(), b.as_index());
    }

    /// Carry tiles one step along a drag path: the tile at the head (`path[0]`) lands on the tail,
    /// and every other tile moves one step toward the head.
    ///
    /// Needs at least two distinct on-board cells, all occupied; otherwise nothing moves and the result is empty.
    pub fn shift_along_path(&mut self, path: &[Location]) -> Vec<Move> {
        if path.len() < 2 || !path.iter().all_unique() {
            return Vec::new();
        }
        // also rejects off-board cells, which read as empty
        let Some(tiles) = path.iter().map(|location| self.get(*location)).collect::<Option<Vec<_>>>() else {
            return Vec::new();
        };

        let tail = path[path.len() - 1];
        let moves = path.iter().zip(tiles).enumerate()
            .map(|(i, (from, tile))| Move {
                from: Source::Cell(*from),
                to: if i == 0 { tail } else { path[i - 1] },
                tile,
            })
            .collect_vec();

        for single in &moves {
            self.set(single.to, Some(single.tile));
        }

        moves
    }

    /// Let tiles fall: every column is compacted toward the bottom row, keeping its order.
    /// Returns a move for every tile whose row changed, column by column, lowest tile first.
    pub fn apply_gravity(&mut self) -> Vec<Move> {
        let mut moves = Vec::new();

        for x in 0..self.width() {
            let mut landing = self.height();
            for y in (0..self.height()).rev() {
                let Some(tile) = self.get(Location(x, y)) else {
                    continue;
                };
                landing -= 1;
                if landing != y {
                    self.take(Location(x, y));
                    self.set(Location(x, landing), Some(tile));
                    moves.push(Move { from: Source::Cell(Location(x, y)), to: Location(x, landing), tile });
                }
            }
        }

        moves
    }

    /// Every empty cell in column-major order, top to bottom.
    pub fn empty_cells(&self) -> Vec<Location> {
        (0..self.width())
            .cartesian_product(0..self.height())
            .map(|(x, y)| Location(x, y))
            .filter(|location| self.get(*location).is_none())
            .collect()
    }

    /// Whether every cell holds a tile.
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Occupied cells in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = (Location, Tile)> + '_ {
        self.cells.indexed_iter()
            .filter_map(|(index, cell)| cell.map(|tile| (Location::from(index), tile)))
    }
}

impl Display for Grid {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut out = String::with_capacity(self.cells.nrows() * (self.cells.ncols() + 1));

        for row in self.cells.rows() {
            for cell in row {
                out.push(cell.map_or('.', |tile| tile.glyph()));
            }
            out.push('\n');
        }

        write!(f, "{}", out)
    }
}

impl FromStr for Grid {
    type Err = EngineError;

    /// Read a board in the format [`Display`] writes: one line per row, `.` for an empty cell,
    /// and any conduit or arrow glyph for a tile.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let rows = s.lines().map(|line| line.chars().collect_vec()).collect_vec();

        let height = NonZero::new(rows.len()).ok_or_else(|| EngineError::Layout("no rows".to_string()))?;
        let width = NonZero::new(rows[0].len()).ok_or_else(|| EngineError::Layout("empty first row".to_string()))?;
        if let Some((y, _)) = rows.iter().find_position(|row| row.len() != width.get()) {
            return Err(EngineError::Layout(format!("row {y} is not {width} cells wide")));
        }

        let mut grid = Self::new((width, height));
        for (y, row) in rows.iter().enumerate() {
            for (x, glyph) in row.iter().enumerate() {
                if *glyph == '.' {
                    continue;
                }
                let tile = Tile::from_glyph(*glyph)
                    .ok_or_else(|| EngineError::Layout(format!("unknown glyph {glyph:?} at ({x}, {y})")))?;
                grid.set(Location(x, y), Some(tile));
            }
        }

        Ok(grid)
    }
}
