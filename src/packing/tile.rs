use crate::math::{Real, Vector2};

/// Number of rows and columns of the discard-tile grid.
pub const GRID_DIM: u8 = 4;

/// Total number of discard tiles.
pub const NUM_TILES: usize = (GRID_DIM * GRID_DIM) as usize;

/// Index of the first tile handed out by automatic allocation, in scan
/// order: row 0 is reserved for default (non-discarded) content and is only
/// consumed once every other row is full.
const FIRST_AUTO_INDEX: usize = GRID_DIM as usize;

/// One cell of the 4×4 discard-tile grid.
///
/// A tile identifies the texture-space region `[col, col+1] × [row, row+1]`:
/// a vertex is moved into the tile by adding `(col, row)` to its UV
/// coordinate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct Tile {
    /// The row of this tile, in `[0, 3]`.
    pub row: u8,
    /// The column of this tile, in `[0, 3]`.
    pub col: u8,
}

impl Tile {
    /// Creates a tile, or `None` if the coordinates fall outside the grid.
    pub fn new(row: u8, col: u8) -> Option<Tile> {
        (row < GRID_DIM && col < GRID_DIM).then_some(Tile { row, col })
    }

    /// The UV offset moving a vertex into this tile.
    #[inline]
    pub fn uv_offset(&self) -> Vector2<Real> {
        Vector2::new(self.col as Real, self.row as Real)
    }

    /// The row-major index of this tile.
    #[inline]
    pub fn index(&self) -> usize {
        self.row as usize * GRID_DIM as usize + self.col as usize
    }

    /// The tile at the given row-major index.
    ///
    /// Panics if `index >= NUM_TILES`.
    #[inline]
    fn from_index(index: usize) -> Tile {
        assert!(index < NUM_TILES);
        Tile {
            row: (index / GRID_DIM as usize) as u8,
            col: (index % GRID_DIM as usize) as u8,
        }
    }
}

/// The discard-tile grid is full.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
#[error("all {NUM_TILES} discard tiles are already allocated.")]
pub struct TileLimitExceeded;

/// Allocator for the 4×4 discard-tile grid of one body mesh.
///
/// Automatic allocation scans the grid row-major starting at `(1, 0)` and
/// wraps around into the reserved row 0 last. The scan cursor never moves
/// backwards, and is shared between individual and overlap allocations so
/// overlap tiles continue after the last individual tile.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
pub struct TileGrid {
    used: [bool; NUM_TILES],
    cursor: usize,
}

impl TileGrid {
    /// Creates a grid with every tile free.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the given tile is already allocated.
    #[inline]
    pub fn is_used(&self, tile: Tile) -> bool {
        self.used[tile.index()]
    }

    /// The number of allocated tiles.
    pub fn num_used(&self) -> usize {
        self.used.iter().filter(|u| **u).count()
    }

    /// Reserves a specific tile, for manual tile requests.
    ///
    /// Fails if the tile is already allocated; the caller is expected to
    /// fall back to automatic allocation.
    pub fn reserve(&mut self, tile: Tile) -> Result<(), TileLimitExceeded> {
        if self.used[tile.index()] {
            return Err(TileLimitExceeded);
        }
        self.used[tile.index()] = true;
        Ok(())
    }

    /// Allocates the next free tile in scan order.
    pub fn allocate_auto(&mut self) -> Result<Tile, TileLimitExceeded> {
        while self.cursor < NUM_TILES {
            let index = (FIRST_AUTO_INDEX + self.cursor) % NUM_TILES;
            self.cursor += 1;

            if !self.used[index] {
                self.used[index] = true;
                return Ok(Tile::from_index(index));
            }
        }

        Err(TileLimitExceeded)
    }
}
