use ep_core::{Coord, Direction, Grid, TileCategory};

/// Composantes 4-connexes d'une catégorie, d'au moins deux pixels.
///
/// Cells are scanned column by column (x outer, y inner); a shape is emitted
/// when its first scanned pixel is met. Pixels inside a shape come in
/// depth-first pre-order, neighbors tried north, east, south, west.
/// Isolated pixels are left out. `grid` is only read: visits are tracked in a
/// private bitmap and the walk uses an explicit stack, so region size is not
/// bounded by the call stack.
///
/// # Example
/// ```
/// use ep_core::{Color, Coord, Grid, TileCategory};
/// use ep_geometry::shapes::find_shapes;
///
/// let mut grid = Grid::new(8, 8).unwrap();
/// let opening = Color::rgb(255, 60, 128);
/// for at in [(1, 1), (1, 2), (2, 2), (6, 6)] {
///     grid.populate(Coord::from(at), opening).unwrap();
/// }
/// let shapes = find_shapes(&grid, TileCategory::Opening);
/// assert_eq!(shapes, vec![vec![Coord::new(1, 1), Coord::new(1, 2), Coord::new(2, 2)]]);
/// ```
#[must_use]
pub fn find_shapes(grid: &Grid, category: TileCategory) -> Vec<Vec<Coord>> {
    let width = grid.width() as usize;
    let height = grid.height() as usize;
    let catalog = grid.catalog();
    let matches: Vec<bool> = grid
        .cells()
        .map(|c| catalog.category_of(c) == category)
        .collect();
    let mut visited = vec![false; matches.len()];
    let index = |at: Coord| at.y as usize * width + at.x as usize;

    let mut shapes = Vec::new();
    let mut stack = Vec::new();
    for x in 0..width {
        for y in 0..height {
            let start = Coord::new(x as i32, y as i32);
            let i = index(start);
            if !matches[i] || visited[i] {
                continue;
            }
            let has_twin = Direction::ALL
                .into_iter()
                .map(|d| start.step(d))
                .any(|n| grid.contains(n) && matches[index(n)]);
            if !has_twin {
                continue;
            }

            let mut shape = Vec::new();
            stack.push(start);
            while let Some(at) = stack.pop() {
                let i = index(at);
                if visited[i] || !matches[i] {
                    continue;
                }
                visited[i] = true;
                shape.push(at);
                // Reversed so that north is popped, hence explored, first.
                for dir in Direction::ALL.into_iter().rev() {
                    let n = at.step(dir);
                    if grid.contains(n) && !visited[index(n)] {
                        stack.push(n);
                    }
                }
            }
            shapes.push(shape);
        }
    }

    log::debug!(
        "{} forme(s) « {category} » sur une grille {width}×{height}",
        shapes.len()
    );
    shapes
}
