use std::sync::Arc;

use crate::catalog::{ColorCatalog, TileCategory};
use crate::color::Color;
use crate::coord::{Coord, Direction};
use crate::error::CoreError;

/// Largest accepted width or height.
pub const MAX_GRID_SIZE: i32 = 1000;

/// Grille catégorielle du plan : une couleur RGBA par cellule, row-major.
///
/// Cells never populated read as [`Color::TRANSPARENT`], i.e. the invalid
/// category. `populate` is the only per-cell mutation; `clone` is a deep copy that
/// shares the (immutable) catalog.
///
/// # Example
/// ```
/// use ep_core::grid::Grid;
/// use ep_core::catalog::TileCategory;
/// use ep_core::coord::Coord;
/// use ep_core::color::Color;
///
/// let mut grid = Grid::new(128, 128).unwrap();
/// grid.populate(Coord::new(3, 4), Color::rgb(255, 60, 128)).unwrap();
/// assert_eq!(grid.tile_category(Coord::new(3, 4)).unwrap(), TileCategory::Opening);
/// assert_eq!(grid.tile_category(Coord::new(0, 0)).unwrap(), TileCategory::Invalid);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Color>,
    width: u32,
    height: u32,
    catalog: Arc<ColorCatalog>,
}

impl Grid {
    /// Empty grid using the default floor-plan catalog.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimension`] unless both sizes are in `1..=1000`.
    pub fn new(width: i32, height: i32) -> Result<Self, CoreError> {
        Self::with_catalog(width, height, Arc::new(ColorCatalog::default()))
    }

    /// Empty grid classified against `catalog`.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidDimension`] unless both sizes are in `1..=1000`.
    pub fn with_catalog(
        width: i32,
        height: i32,
        catalog: Arc<ColorCatalog>,
    ) -> Result<Self, CoreError> {
        let valid = 1..=MAX_GRID_SIZE;
        if !valid.contains(&width) || !valid.contains(&height) {
            return Err(CoreError::InvalidDimension {
                width: i64::from(width),
                height: i64::from(height),
            });
        }
        let (width, height) = (width as u32, height as u32);
        Ok(Self {
            cells: vec![Color::TRANSPARENT; width as usize * height as usize],
            width,
            height,
            catalog,
        })
    }

    /// Empty grid with the same size and catalog.
    #[must_use]
    pub fn blank_like(&self) -> Self {
        Self {
            cells: vec![Color::TRANSPARENT; self.cells.len()],
            width: self.width,
            height: self.height,
            catalog: Arc::clone(&self.catalog),
        }
    }

    /// Width in cells (`getSizeX`).
    #[inline(always)]
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in cells (`getSizeY`).
    #[inline(always)]
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[must_use]
    pub fn catalog(&self) -> &Arc<ColorCatalog> {
        &self.catalog
    }

    /// True if `at` lies in `[0, width) × [0, height)`.
    #[inline(always)]
    #[must_use]
    pub fn contains(&self, at: Coord) -> bool {
        at.x >= 0 && at.y >= 0 && (at.x as u32) < self.width && (at.y as u32) < self.height
    }

    /// Same strict rule for reads and writes.
    #[inline(always)]
    fn index(&self, at: Coord) -> Result<usize, CoreError> {
        if self.contains(at) {
            Ok(at.y as usize * self.width as usize + at.x as usize)
        } else {
            Err(CoreError::OutOfBounds {
                x: i64::from(at.x),
                y: i64::from(at.y),
                width: self.width,
                height: self.height,
            })
        }
    }

    /// Overwrite one cell.
    ///
    /// # Errors
    /// Returns [`CoreError::OutOfBounds`] outside the grid.
    #[inline]
    pub fn populate(&mut self, at: Coord, color: Color) -> Result<(), CoreError> {
        let i = self.index(at)?;
        self.cells[i] = color;
        Ok(())
    }

    /// Overwrite one cell from untyped channels (3 or 4 values in `[0, 255]`).
    ///
    /// # Errors
    /// Returns [`CoreError::OutOfBounds`] outside the grid and
    /// [`CoreError::InvalidColor`] for a malformed color.
    ///
    /// # Example
    /// ```
    /// use ep_core::grid::Grid;
    /// use ep_core::coord::Coord;
    /// use ep_core::color::Color;
    /// let mut grid = Grid::new(4, 4).unwrap();
    /// grid.populate_channels(Coord::new(1, 1), &[9, 8, 7]).unwrap();
    /// assert_eq!(grid.get(Coord::new(1, 1)).unwrap(), Color::rgba(9, 8, 7, 255));
    /// assert!(grid.populate_channels(Coord::new(4, 0), &[9, 8, 7]).is_err());
    /// ```
    pub fn populate_channels(&mut self, at: Coord, channels: &[i64]) -> Result<(), CoreError> {
        let i = self.index(at)?;
        self.cells[i] = Color::from_channels(channels)?;
        Ok(())
    }

    /// Stored color of a cell.
    ///
    /// # Errors
    /// Returns [`CoreError::OutOfBounds`] outside the grid.
    #[inline]
    pub fn get(&self, at: Coord) -> Result<Color, CoreError> {
        Ok(self.cells[self.index(at)?])
    }

    /// Category of a cell; `Invalid` for unset cells and unknown colors.
    ///
    /// # Errors
    /// Returns [`CoreError::OutOfBounds`] outside the grid.
    #[inline]
    pub fn tile_category(&self, at: Coord) -> Result<TileCategory, CoreError> {
        Ok(self.catalog.category_of(self.get(at)?))
    }

    /// In-bounds 4-neighbors of `at`, labelled, in N/E/S/W order.
    ///
    /// # Errors
    /// Returns [`CoreError::OutOfBounds`] if `at` itself is outside the grid.
    ///
    /// # Example
    /// ```
    /// use ep_core::grid::Grid;
    /// use ep_core::coord::{Coord, Direction};
    /// let grid = Grid::new(10, 10).unwrap();
    /// let adj = grid.adjacent_coordinates(Coord::new(0, 0)).unwrap();
    /// let dirs: Vec<Direction> = adj.iter().map(|(d, _)| d).collect();
    /// assert_eq!(dirs, vec![Direction::East, Direction::South]);
    /// ```
    pub fn adjacent_coordinates(&self, at: Coord) -> Result<Adjacent, CoreError> {
        self.index(at)?;
        let mut slots = [None; 4];
        for (slot, dir) in slots.iter_mut().zip(Direction::ALL) {
            let n = at.step(dir);
            if self.contains(n) {
                *slot = Some(n);
            }
        }
        Ok(Adjacent { slots })
    }

    /// Category of every in-bounds 4-neighbor of `at`, in N/E/S/W order.
    ///
    /// # Errors
    /// Returns [`CoreError::OutOfBounds`] if `at` itself is outside the grid.
    pub fn adjacent_categories(
        &self,
        at: Coord,
    ) -> Result<Vec<(Direction, TileCategory)>, CoreError> {
        self.adjacent_coordinates(at)?
            .iter()
            .map(|(dir, n)| Ok((dir, self.tile_category(n)?)))
            .collect()
    }

    /// Number of cells holding exactly the canonical color of `category`.
    #[must_use]
    pub fn count_category(&self, category: TileCategory) -> usize {
        let color = self.catalog.color_of(category);
        self.cells.iter().filter(|&&c| c == color).count()
    }

    /// Row-major walk over every cell. Cloning the iterator restarts it.
    pub fn cells(&self) -> std::iter::Copied<std::slice::Iter<'_, Color>> {
        self.cells.iter().copied()
    }

    /// Row-major walk yielding each cell with its coordinate.
    pub fn enumerate(&self) -> impl Iterator<Item = (Coord, Color)> + '_ {
        let w = self.width as usize;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &c)| (Coord::new((i % w) as i32, (i / w) as i32), c))
    }

    /// Rows as slices, top to bottom.
    pub fn rows(&self) -> std::slice::ChunksExact<'_, Color> {
        self.cells.chunks_exact(self.width as usize)
    }

    /// Row `y`, or an empty slice past the last row.
    #[must_use]
    pub fn row(&self, y: u32) -> &[Color] {
        let w = self.width as usize;
        let start = y as usize * w;
        self.cells.get(start..start + w).unwrap_or(&[])
    }

    /// Raw row-major storage, for data-parallel writers filling a fresh grid.
    pub fn cells_mut(&mut self) -> &mut [Color] {
        &mut self.cells
    }

    /// Cells packed as RGBA bytes, row-major, 4 bytes per cell.
    #[must_use]
    pub fn to_rgba_bytes(&self) -> Vec<u8> {
        self.cells.iter().flat_map(|c| c.to_array()).collect()
    }
}

/// Voisins valides d'une cellule, indexés par direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Adjacent {
    slots: [Option<Coord>; 4],
}

impl Adjacent {
    /// Neighbor in `dir`, if inside the grid.
    #[must_use]
    pub fn get(&self, dir: Direction) -> Option<Coord> {
        self.slots[dir as usize]
    }

    /// Present neighbors in N/E/S/W order.
    pub fn iter(&self) -> impl Iterator<Item = (Direction, Coord)> + '_ {
        Direction::ALL
            .into_iter()
            .zip(self.slots)
            .filter_map(|(d, s)| s.map(|c| (d, c)))
    }

    /// Present neighbors' coordinates in N/E/S/W order.
    pub fn coords(&self) -> impl Iterator<Item = Coord> + '_ {
        self.slots.iter().flatten().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.iter().flatten().count()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const SIZE: i32 = 128;

    fn opening() -> Color {
        ColorCatalog::default().color_of(TileCategory::Opening)
    }

    #[test]
    fn rejects_bad_dimensions() {
        for (w, h) in [(0, 5), (5, 0), (-1, 5), (1001, 5), (5, 1001)] {
            assert!(matches!(
                Grid::new(w, h),
                Err(CoreError::InvalidDimension { .. })
            ));
        }
        let grid = Grid::new(1000, 1).unwrap();
        assert_eq!((grid.width(), grid.height()), (1000, 1));
    }

    #[test]
    fn reads_and_writes_share_bounds() {
        let mut grid = Grid::new(SIZE, SIZE).unwrap();
        for at in [
            Coord::new(SIZE, 0),
            Coord::new(0, SIZE),
            Coord::new(-1, 0),
            Coord::new(0, -1),
        ] {
            assert!(matches!(grid.get(at), Err(CoreError::OutOfBounds { .. })));
            assert!(matches!(
                grid.populate(at, opening()),
                Err(CoreError::OutOfBounds { .. })
            ));
        }
    }

    #[test]
    fn unset_cells_are_invalid() {
        let grid = Grid::new(3, 3).unwrap();
        assert_eq!(grid.get(Coord::new(1, 1)).unwrap(), Color::TRANSPARENT);
        assert_eq!(grid.count_category(TileCategory::Invalid), 9);
    }

    #[test]
    fn unknown_color_is_invalid() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid.populate(Coord::new(0, 0), Color::rgb(1, 2, 3)).unwrap();
        assert_eq!(
            grid.tile_category(Coord::new(0, 0)).unwrap(),
            TileCategory::Invalid
        );
    }

    #[test]
    fn adjacent_categories_follow_neighbors() {
        let mut grid = Grid::new(3, 3).unwrap();
        let wall = ColorCatalog::default().color_of(TileCategory::Wall);
        grid.populate(Coord::new(1, 0), wall).unwrap();
        grid.populate(Coord::new(2, 1), opening()).unwrap();
        let adj = grid.adjacent_categories(Coord::new(1, 1)).unwrap();
        assert_eq!(
            adj,
            vec![
                (Direction::North, TileCategory::Wall),
                (Direction::East, TileCategory::Opening),
                (Direction::South, TileCategory::Invalid),
                (Direction::West, TileCategory::Invalid),
            ]
        );
    }

    #[test]
    fn adjacent_of_out_of_bounds_fails() {
        let grid = Grid::new(3, 3).unwrap();
        assert!(grid.adjacent_coordinates(Coord::new(3, 3)).is_err());
    }

    #[test]
    fn cells_are_row_major_and_restartable() {
        let mut grid = Grid::new(3, 2).unwrap();
        grid.populate(Coord::new(2, 0), opening()).unwrap();
        let cells = grid.cells();
        assert_eq!(cells.clone().count(), 6);
        assert_eq!(cells.clone().position(|c| c == opening()), Some(2));
        assert_eq!(cells.count(), 6);
        assert_eq!(grid.to_rgba_bytes().len(), 24);
    }

    proptest! {
        #[test]
        fn construction_echoes_valid_sizes(w in -5i32..1010, h in -5i32..1010) {
            match Grid::new(w, h) {
                Ok(grid) => {
                    prop_assert!((1..=1000).contains(&w) && (1..=1000).contains(&h));
                    prop_assert_eq!(grid.width(), w as u32);
                    prop_assert_eq!(grid.height(), h as u32);
                }
                Err(e) => {
                    prop_assert!(!((1..=1000).contains(&w) && (1..=1000).contains(&h)));
                    prop_assert!(
                        matches!(e, CoreError::InvalidDimension { .. }),
                        "unexpected error: {:?}",
                        e
                    );
                }
            }
        }

        #[test]
        fn populate_then_get(
            x in 0i32..SIZE,
            y in 0i32..SIZE,
            rgb in any::<[u8; 3]>(),
        ) {
            let mut grid = Grid::new(SIZE, SIZE).unwrap();
            let channels: Vec<i64> = rgb.iter().map(|&c| i64::from(c)).collect();
            grid.populate_channels(Coord::new(x, y), &channels).unwrap();
            prop_assert_eq!(
                grid.get(Coord::new(x, y)).unwrap(),
                Color::rgba(rgb[0], rgb[1], rgb[2], 255)
            );
        }

        #[test]
        fn adjacent_in_bounds_and_one_step(x in 0i32..SIZE, y in 0i32..SIZE) {
            let grid = Grid::new(SIZE, SIZE).unwrap();
            let at = Coord::new(x, y);
            for (_, n) in grid.adjacent_coordinates(at).unwrap().iter() {
                prop_assert!(grid.contains(n));
                prop_assert_eq!(at.manhattan(n), 1);
            }
        }

        #[test]
        fn count_matches_populated(
            points in prop::collection::hash_set((0i32..SIZE, 0i32..SIZE), 0..200)
        ) {
            let mut grid = Grid::new(SIZE, SIZE).unwrap();
            for &(x, y) in &points {
                grid.populate(Coord::new(x, y), opening()).unwrap();
            }
            prop_assert_eq!(grid.count_category(TileCategory::Opening), points.len());
        }
    }
}
