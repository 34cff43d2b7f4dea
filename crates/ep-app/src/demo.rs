use std::sync::Arc;

use anyhow::Result;
use ep_core::{ColorCatalog, Coord, Grid, TileCategory};

/// Side of the demo plan.
pub const DEMO_SIZE: i32 = 128;

/// Fill the half-open rectangle `[x0, x1) × [y0, y1)`.
fn fill_rect(
    grid: &mut Grid,
    category: TileCategory,
    (x0, y0): (i32, i32),
    (x1, y1): (i32, i32),
) -> Result<()> {
    let color = grid.catalog().color_of(category);
    for y in y0..y1 {
        for x in x0..x1 {
            grid.populate(Coord::new(x, y), color)?;
        }
    }
    Ok(())
}

/// Plan de démonstration : une maison de trois pièces posée sur un fond blanc.
///
/// ```text
///  16         64 66        112
///   ┌──────────┬─────██─────┐ 16   ██ window
///   │          │            │
///   │ bedroom  █    hall    │ 36
///   │          █            │
///   │          ├────██──────┤ 64   █ door
///   █          │  bathroom  │ 80
///   █          │            │
///   └──────────┴────────────┘ 112
/// ```
///
/// # Errors
/// Propagates grid construction errors.
pub fn sample_plan(catalog: Arc<ColorCatalog>) -> Result<Grid> {
    let mut grid = Grid::with_catalog(DEMO_SIZE, DEMO_SIZE, catalog)?;
    fill_rect(&mut grid, TileCategory::Background, (0, 0), (128, 128))?;

    // Outer walls, two cells thick.
    fill_rect(&mut grid, TileCategory::Wall, (16, 16), (112, 112))?;

    fill_rect(&mut grid, TileCategory::Bedroom, (18, 18), (64, 110))?;
    fill_rect(&mut grid, TileCategory::Hall, (66, 18), (110, 64))?;
    fill_rect(&mut grid, TileCategory::Bathroom, (66, 66), (110, 110))?;

    // Doors in the inner walls, windows in the outer ones.
    fill_rect(&mut grid, TileCategory::Opening, (64, 36), (66, 42))?;
    fill_rect(&mut grid, TileCategory::Opening, (84, 64), (90, 66))?;
    fill_rect(&mut grid, TileCategory::Opening, (84, 16), (92, 18))?;
    fill_rect(&mut grid, TileCategory::Opening, (16, 80), (18, 88))?;

    Ok(grid)
}
