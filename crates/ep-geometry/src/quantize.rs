use ep_core::{Color, ColorCatalog, Grid, TileCategory};
use rayon::prelude::*;

/// Distance euclidienne RGBA entre deux couleurs.
///
/// # Example
/// ```
/// use ep_core::Color;
/// use ep_geometry::quantize::color_distance;
/// assert!((color_distance(Color::rgb(0, 0, 0), Color::rgb(0, 3, 4)) - 5.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn color_distance(a: Color, b: Color) -> f64 {
    a.distance(b)
}

/// Catalog color closest to `color`; on a tie the earlier catalog entry wins.
#[inline]
#[must_use]
pub fn nearest_color(catalog: &ColorCatalog, color: Color) -> Color {
    let mut best = Color::TRANSPARENT;
    let mut best_distance = u32::MAX;
    for (_, candidate) in catalog.iter() {
        let d = color.distance_squared(candidate);
        if d < best_distance {
            best = candidate;
            best_distance = d;
        }
    }
    best
}

/// Category of the catalog color closest to `color`.
///
/// # Example
/// ```
/// use ep_core::{Color, ColorCatalog, TileCategory};
/// use ep_geometry::quantize::nearest_category;
/// let catalog = ColorCatalog::default();
/// assert_eq!(nearest_category(&catalog, Color::rgb(250, 58, 130)), TileCategory::Opening);
/// ```
#[must_use]
pub fn nearest_category(catalog: &ColorCatalog, color: Color) -> TileCategory {
    catalog.category_of(nearest_color(catalog, color))
}

/// Ramène chaque cellule à la couleur de catalogue la plus proche.
///
/// Returns a new grid of the same size and catalog; `grid` is untouched.
/// Rows are processed in parallel.
///
/// # Example
/// ```
/// use ep_core::{Color, Coord, Grid, TileCategory};
/// use ep_geometry::quantize::quantize;
///
/// let mut grid = Grid::new(2, 1).unwrap();
/// grid.populate(Coord::new(0, 0), Color::rgb(10, 5, 3)).unwrap();
/// grid.populate(Coord::new(1, 0), Color::rgb(250, 250, 245)).unwrap();
/// let crushed = quantize(&grid);
/// assert_eq!(crushed.tile_category(Coord::new(0, 0)).unwrap(), TileCategory::Wall);
/// assert_eq!(crushed.tile_category(Coord::new(1, 0)).unwrap(), TileCategory::Background);
/// ```
#[must_use]
pub fn quantize(grid: &Grid) -> Grid {
    let catalog = grid.catalog();
    let mut out = grid.blank_like();
    let width = grid.width() as usize;

    out.cells_mut()
        .par_chunks_mut(width)
        .enumerate()
        .for_each(|(y, row)| {
            let source = grid.row(y as u32);
            for (cell, &color) in row.iter_mut().zip(source) {
                *cell = nearest_color(catalog, color);
            }
        });

    log::debug!("quantification {}×{}", grid.width(), grid.height());
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ep_core::Coord;
    use proptest::prelude::*;

    #[test]
    fn exact_colors_are_kept() {
        let mut grid = Grid::new(10, 1).unwrap();
        let palette: Vec<Color> = grid.catalog().iter().map(|(_, c)| c).collect();
        for (x, &color) in palette.iter().enumerate() {
            grid.populate(Coord::new(x as i32, 0), color).unwrap();
        }
        let crushed = quantize(&grid);
        assert_eq!(crushed, grid);
    }

    #[test]
    fn ties_go_to_earlier_entry() {
        let hall = Color::rgb(255, 155, 0);
        let bedroom = Color::rgb(155, 255, 0);
        let between = Color::rgb(205, 205, 0);
        assert_eq!(between.distance_squared(hall), between.distance_squared(bedroom));

        let mut entries: Vec<(TileCategory, Color)> = ColorCatalog::FLOOR_PLAN
            .iter()
            .map(|&(cat, color)| match cat {
                TileCategory::Hall => (cat, hall),
                TileCategory::Bedroom => (cat, bedroom),
                _ => (cat, color),
            })
            .collect();
        // Bedroom precedes hall in the default order.
        let catalog = ColorCatalog::new(entries.clone()).unwrap();
        assert_eq!(nearest_category(&catalog, between), TileCategory::Bedroom);

        entries.sort_by_key(|&(cat, _)| cat != TileCategory::Hall);
        let catalog = ColorCatalog::new(entries).unwrap();
        assert_eq!(nearest_category(&catalog, between), TileCategory::Hall);
    }

    #[test]
    fn unset_cells_stay_invalid() {
        let grid = Grid::new(3, 3).unwrap();
        let crushed = quantize(&grid);
        assert_eq!(crushed.count_category(TileCategory::Invalid), 9);
    }

    #[test]
    fn source_untouched_and_size_kept() {
        let mut grid = Grid::new(7, 3).unwrap();
        grid.populate(Coord::new(6, 2), Color::rgb(200, 70, 120)).unwrap();
        let before = grid.clone();
        let crushed = quantize(&grid);
        assert_eq!(grid, before);
        assert_eq!((crushed.width(), crushed.height()), (7, 3));
        assert_eq!(
            crushed.tile_category(Coord::new(6, 2)).unwrap(),
            TileCategory::Opening
        );
    }

    proptest! {
        #[test]
        fn quantize_is_idempotent(
            w in 1i32..12,
            h in 1i32..12,
            colors in proptest::collection::vec(any::<[u8; 4]>(), 144),
        ) {
            let mut grid = Grid::new(w, h).unwrap();
            for y in 0..h {
                for x in 0..w {
                    let color = Color::from(colors[(y * 12 + x) as usize]);
                    grid.populate(Coord::new(x, y), color).unwrap();
                }
            }
            let once = quantize(&grid);
            let twice = quantize(&once);
            prop_assert_eq!(&once, &twice);
            prop_assert!(once.cells().all(|c| once.catalog().iter().any(|(_, k)| k == c)));
        }
    }
}
