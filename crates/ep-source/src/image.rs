use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use ep_core::{Color, ColorCatalog, Coord, Grid};
use image::RgbaImage;

/// Charge une image depuis le disque, convertie en RGBA 8 bits.
///
/// # Errors
/// Returns an error if the file cannot be read or decoded.
///
/// # Example
/// ```no_run
/// use ep_source::image::load_image;
/// use std::path::Path;
/// let img = load_image(Path::new("plan.png")).unwrap();
/// ```
pub fn load_image(path: &Path) -> Result<RgbaImage> {
    let img = image::open(path)
        .with_context(|| format!("Impossible de charger {}", path.display()))?;
    Ok(img.to_rgba8())
}

/// Load an image straight into a grid of the same size.
///
/// # Errors
/// Returns an error if the image cannot be loaded or is not within 1..=1000
/// pixels on each side.
///
/// # Example
/// ```no_run
/// use ep_core::ColorCatalog;
/// use ep_source::image::load_grid;
/// use std::path::Path;
/// use std::sync::Arc;
/// let grid = load_grid(Path::new("saved.png"), Arc::new(ColorCatalog::default())).unwrap();
/// ```
pub fn load_grid(path: &Path, catalog: Arc<ColorCatalog>) -> Result<Grid> {
    let img = load_image(path)?;
    grid_from_image(&img, catalog)
        .with_context(|| format!("Image inutilisable comme grille : {}", path.display()))
}

/// Copy every pixel of `img` into a fresh grid, row by row.
///
/// # Errors
/// Returns an error if either side of `img` is outside 1..=1000.
///
/// # Example
/// ```
/// use ep_core::{ColorCatalog, Coord, TileCategory};
/// use ep_source::image::grid_from_image;
/// use std::sync::Arc;
///
/// let img = image::RgbaImage::from_pixel(4, 2, image::Rgba([255, 60, 128, 255]));
/// let grid = grid_from_image(&img, Arc::new(ColorCatalog::default())).unwrap();
/// assert_eq!((grid.width(), grid.height()), (4, 2));
/// assert_eq!(grid.tile_category(Coord::new(3, 1)).unwrap(), TileCategory::Opening);
/// ```
pub fn grid_from_image(img: &RgbaImage, catalog: Arc<ColorCatalog>) -> Result<Grid> {
    let (w, h) = img.dimensions();
    let mut grid = Grid::with_catalog(
        i32::try_from(w).unwrap_or(i32::MAX),
        i32::try_from(h).unwrap_or(i32::MAX),
        catalog,
    )?;
    for (x, y, px) in img.enumerate_pixels() {
        grid.populate(Coord::new(x as i32, y as i32), Color::from(px.0))?;
    }
    Ok(grid)
}

/// Image RGBA de même taille que la grille.
///
/// # Errors
/// Returns an error if the cell buffer does not match the grid size.
pub fn grid_to_image(grid: &Grid) -> Result<RgbaImage> {
    RgbaImage::from_raw(grid.width(), grid.height(), grid.to_rgba_bytes())
        .context("Buffer de grille incohérent")
}

/// Write the grid as an image; the format follows the extension.
///
/// # Errors
/// Returns an error if the file cannot be encoded or written.
pub fn save_grid(grid: &Grid, path: &Path) -> Result<()> {
    grid_to_image(grid)?
        .save(path)
        .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
    log::debug!("grille écrite : {}", path.display());
    Ok(())
}
