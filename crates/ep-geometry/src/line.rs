//! Lignes discrètes (Bresenham) et requêtes de ligne de vue sur la grille.
//!
//! ```text
//! From (0,0) to (7,3):
//!
//!     3 │        ●
//!     2 │     ●●
//!     1 │  ●●
//!     0 ●●
//!       └──────────
//!        0 1 2 3 4 5 6 7
//! ```

use std::collections::HashSet;

use ep_core::{CoreError, Coord, Grid, TileCategory};

/// Bresenham's line algorithm iterator.
///
/// The major axis is Y only when `|dy| > |dx|`. A zero delta walks in the
/// negative direction, which only matters once the walk is extended past its
/// end point.
///
/// Steps are counted in `i64`, so any pair of `i32` points is valid; an
/// unbounded walk ends where it leaves the `i32` plane.
#[derive(Clone, Debug)]
pub struct BresenhamLine {
    start: Coord,
    /// Unit step along the major axis.
    major_step: (i64, i64),
    /// Unit step along the minor axis.
    minor_step: (i64, i64),
    major: i64,
    minor: i64,
    error: i64,
    /// Steps taken on the major axis.
    i: i64,
    /// Steps taken on the minor axis.
    j: i64,
    /// Last major step to emit, `None` for an unbounded walk.
    last: Option<i64>,
}

impl BresenhamLine {
    /// Cells from `start` to `end`, both included.
    ///
    /// # Example
    /// ```
    /// use ep_core::Coord;
    /// use ep_geometry::line::BresenhamLine;
    /// let cells: Vec<Coord> = BresenhamLine::new(Coord::new(0, 0), Coord::new(3, 1)).collect();
    /// assert_eq!(cells, vec![Coord::new(0, 0), Coord::new(1, 0), Coord::new(2, 1), Coord::new(3, 1)]);
    /// ```
    #[must_use]
    pub fn new(start: Coord, end: Coord) -> Self {
        let mut line = Self::through(start, end);
        line.last = Some(line.major);
        line
    }

    /// Same trajectory as [`BresenhamLine::new`], continuing past `toward` forever.
    #[must_use]
    pub fn through(start: Coord, toward: Coord) -> Self {
        let dx = i64::from(toward.x) - i64::from(start.x);
        let dy = i64::from(toward.y) - i64::from(start.y);
        let x_sign = if dx > 0 { 1 } else { -1 };
        let y_sign = if dy > 0 { 1 } else { -1 };
        let (dx, dy) = (dx.abs(), dy.abs());

        let (major, minor, major_step, minor_step) = if dy > dx {
            (dy, dx, (0, y_sign), (x_sign, 0))
        } else {
            (dx, dy, (x_sign, 0), (0, y_sign))
        };

        Self {
            start,
            major_step,
            minor_step,
            major,
            minor,
            error: 2 * minor - major,
            i: 0,
            j: 0,
            last: None,
        }
    }

    /// Number of major-axis steps between the two defining points.
    #[must_use]
    pub fn major_len(&self) -> u64 {
        self.major.unsigned_abs()
    }
}

impl Iterator for BresenhamLine {
    type Item = Coord;

    fn next(&mut self) -> Option<Coord> {
        if self.last.is_some_and(|last| self.i > last) {
            return None;
        }
        let x = i64::from(self.start.x) + self.i * self.major_step.0 + self.j * self.minor_step.0;
        let y = i64::from(self.start.y) + self.i * self.major_step.1 + self.j * self.minor_step.1;
        let (Ok(x), Ok(y)) = (i32::try_from(x), i32::try_from(y)) else {
            self.last = Some(self.i - 1);
            return None;
        };
        let cell = Coord::new(x, y);
        if self.error >= 0 {
            self.j += 1;
            self.error -= 2 * self.major;
        }
        self.error += 2 * self.minor;
        self.i += 1;
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self.last {
            Some(last) => {
                let n = (last - self.i + 1).max(0) as usize;
                (n, Some(n))
            }
            None => (0, None),
        }
    }
}

/// Ligne discrète entre deux points, extrémités incluses, de `start` vers `end`.
///
/// Length is `max(|dx|, |dy|) + 1`.
///
/// # Example
/// ```
/// use ep_core::Coord;
/// use ep_geometry::line::rasterize;
/// let p = Coord::new(5, 9);
/// assert_eq!(rasterize(p, p), vec![p]);
/// assert_eq!(rasterize(Coord::new(0, 0), Coord::new(2, 7)).len(), 8);
/// ```
#[must_use]
pub fn rasterize(start: Coord, end: Coord) -> Vec<Coord> {
    BresenhamLine::new(start, end).collect()
}

/// Requêtes de ligne de vue sur une grille figée.
///
/// # Example
/// ```
/// use std::collections::HashSet;
/// use ep_core::{Color, Coord, Grid};
/// use ep_geometry::line::{rasterize, LineCaster};
///
/// let mut grid = Grid::new(8, 8).unwrap();
/// grid.populate(Coord::new(3, 3), Color::rgb(0, 0, 0)).unwrap();
/// let caster = LineCaster::new(&grid);
/// let line = rasterize(Coord::new(0, 0), Coord::new(7, 7));
/// assert_eq!(caster.obstruction_count(&line, &HashSet::new()).unwrap(), 1);
/// ```
#[derive(Clone, Copy, Debug)]
pub struct LineCaster<'a> {
    grid: &'a Grid,
}

impl<'a> LineCaster<'a> {
    #[must_use]
    pub fn new(grid: &'a Grid) -> Self {
        Self { grid }
    }

    /// Number of wall or opening cells on `line`, cells in `ignore` excepted.
    ///
    /// # Errors
    /// Returns [`CoreError::OutOfBounds`] if a counted cell lies outside the grid.
    pub fn obstruction_count(
        &self,
        line: &[Coord],
        ignore: &HashSet<Coord>,
    ) -> Result<usize, CoreError> {
        let mut count = 0;
        for &cell in line.iter().filter(|c| !ignore.contains(*c)) {
            if self.grid.tile_category(cell)?.obstructs() {
                count += 1;
            }
        }
        Ok(count)
    }

    /// Up to two cells just beyond an opening, on the line from `start` through `centroid`.
    ///
    /// The walk resumes at the centroid and lasts at most `opening_len` steps,
    /// never past major step `width`. Cells outside the grid are skipped;
    /// the first two non-opening cells are kept.
    #[must_use]
    pub fn pierce_through_opening(
        &self,
        start: Coord,
        centroid: Coord,
        opening_len: usize,
    ) -> Vec<Coord> {
        let line = BresenhamLine::through(start, centroid);
        let from = line.major_len() as usize;
        let until = from.saturating_add(opening_len).min(self.grid.width() as usize);
        line.skip(from)
            .take(until.saturating_sub(from))
            .filter(|&c| {
                self.grid
                    .tile_category(c)
                    .is_ok_and(|cat| cat != TileCategory::Opening)
            })
            .take(2)
            .collect()
    }

    /// Catégorie dominante de l'autre côté d'une ouverture, vue depuis `start`.
    ///
    /// Votes are the categories of every in-bounds neighbor of each pierced
    /// cell; ties go to the category seen first. `Invalid` when nothing lies
    /// beyond the opening.
    #[must_use]
    pub fn other_side_category(
        &self,
        start: Coord,
        centroid: Coord,
        opening_len: usize,
    ) -> TileCategory {
        let mut tally: Vec<(TileCategory, usize)> = Vec::new();
        for cell in self.pierce_through_opening(start, centroid, opening_len) {
            let Ok(adjacent) = self.grid.adjacent_coordinates(cell) else {
                continue;
            };
            for n in adjacent.coords() {
                let Ok(cat) = self.grid.tile_category(n) else {
                    continue;
                };
                match tally.iter_mut().find(|(c, _)| *c == cat) {
                    Some((_, votes)) => *votes += 1,
                    None => tally.push((cat, 1)),
                }
            }
        }

        let mut best: Option<(TileCategory, usize)> = None;
        for (cat, votes) in tally {
            if best.is_none_or(|(_, v)| votes > v) {
                best = Some((cat, votes));
            }
        }
        best.map_or(TileCategory::Invalid, |(cat, _)| cat)
    }
}
