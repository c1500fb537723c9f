//! Static tile geometry for one screen.
//!
//! Queries never fail. Outside the grid the answer depends on the axis:
//! past the left/right edge every tile is solid (an implicit side wall),
//! past the top/bottom edge every tile is empty so stacked screens join
//! without a seam. When both axes are out of range the wall wins.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tile {
    #[default]
    Empty,
    Full,
}

impl Tile {
    /// Only `'#'` is solid. Spaces, NULs and anything unrecognized load as empty.
    pub fn from_symbol(symbol: char) -> Self {
        match symbol {
            '#' => Tile::Full,
            _ => Tile::Empty,
        }
    }

    pub fn is_solid(self) -> bool {
        matches!(self, Tile::Full)
    }
}

const OUT_OF_BOUNDS_X: Tile = Tile::Full;
const OUT_OF_BOUNDS_Y: Tile = Tile::Empty;

/// Upper bound on tiles per screen. Keeps `y * width + x` inside `i32`.
pub const MAX_SCREEN_TILES: i32 = 1 << 20;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileGrid {
    width: i32,
    height: i32,
    tiles: Vec<Tile>,
}

impl TileGrid {
    /// An all-empty grid. Used for the reserved sentinel screen.
    pub fn empty(width: i32, height: i32) -> Self {
        let len = width.max(0) as usize * height.max(0) as usize;
        Self {
            width,
            height,
            tiles: vec![Tile::Empty; len],
        }
    }

    /// Build a grid from authored rows, top row first. Short rows and
    /// missing rows are padded with `Tile::Empty`.
    pub fn from_rows<S: AsRef<str>>(width: i32, height: i32, rows: &[S]) -> Result<Self, String> {
        if width <= 0 || height <= 0 {
            return Err(format!(
                "Tile grid validation failed: dimensions must be > 0 (got {width}x{height})"
            ));
        }
        match width.checked_mul(height) {
            Some(count) if count <= MAX_SCREEN_TILES => {}
            _ => {
                return Err(format!(
                    "Tile grid validation failed: {width}x{height} exceeds {MAX_SCREEN_TILES} tiles per screen"
                ))
            }
        }
        if rows.len() > height as usize {
            return Err(format!(
                "Tile grid validation failed: {} rows exceed screen height {height}",
                rows.len()
            ));
        }

        let mut grid = Self::empty(width, height);
        for (y, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            let len = row.chars().count();
            if len > width as usize {
                return Err(format!(
                    "Tile grid validation failed: row {y} has {len} tiles, screen width is {width}"
                ));
            }
            for (x, symbol) in row.chars().enumerate() {
                let index = y * width as usize + x;
                grid.tiles[index] = Tile::from_symbol(symbol);
            }
        }
        Ok(grid)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn get(&self, x: i32, y: i32) -> Tile {
        if x < 0 || x >= self.width {
            return OUT_OF_BOUNDS_X;
        }
        if y < 0 || y >= self.height {
            return OUT_OF_BOUNDS_Y;
        }
        self.tiles[(y * self.width + x) as usize]
    }

    pub fn is_solid(&self, x: i32, y: i32) -> bool {
        self.get(x, y).is_solid()
    }

    pub fn solid_count(&self) -> usize {
        self.tiles.iter().filter(|t| t.is_solid()).count()
    }
}
