use std::sync::Arc;

use anyhow::{Context, Result};
use ep_core::Grid;
use fast_image_resize::images::Image;
use fast_image_resize::{FilterType, PixelType, ResizeAlg, ResizeOptions, Resizer as FirResizer};
use image::RgbaImage;

use crate::image::{grid_from_image, grid_to_image};

/// Resizer réutilisable wrappant fast_image_resize, filtre boîte.
///
/// Each output pixel averages the source pixels it covers, which keeps
/// large flat regions flat when a plan is shrunk.
///
/// # Example
/// ```
/// use ep_source::resize::Resizer;
/// let r = Resizer::new();
/// ```
pub struct Resizer {
    inner: FirResizer,
    options: ResizeOptions,
    /// Scratch copy of the source (fast_image_resize wants `&mut`).
    src_buf: Vec<u8>,
}

impl Resizer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            inner: FirResizer::new(),
            options: ResizeOptions::new().resize_alg(ResizeAlg::Convolution(FilterType::Box)),
            src_buf: Vec::new(),
        }
    }

    /// Resize `src` to `width`×`height`.
    ///
    /// # Errors
    /// Returns an error if a dimension is zero or the resize fails.
    ///
    /// # Example
    /// ```
    /// use ep_source::resize::Resizer;
    /// let mut r = Resizer::new();
    /// let src = image::RgbaImage::from_pixel(100, 100, image::Rgba([9, 9, 9, 255]));
    /// let dst = r.resize_image(&src, 25, 25).unwrap();
    /// assert_eq!(dst.dimensions(), (25, 25));
    /// assert_eq!(dst.get_pixel(3, 3).0, [9, 9, 9, 255]);
    /// ```
    pub fn resize_image(&mut self, src: &RgbaImage, width: u32, height: u32) -> Result<RgbaImage> {
        if src.dimensions() == (width, height) {
            return Ok(src.clone());
        }

        self.src_buf.clear();
        self.src_buf.extend_from_slice(src.as_raw());

        let src_image =
            Image::from_slice_u8(src.width(), src.height(), &mut self.src_buf, PixelType::U8x4)
                .context("Dimensions source invalides")?;
        let mut dst_image = Image::new(width, height, PixelType::U8x4);

        self.inner
            .resize(&src_image, &mut dst_image, Some(&self.options))
            .context("Échec du redimensionnement")?;

        RgbaImage::from_raw(width, height, dst_image.into_vec())
            .context("Dimensions destination invalides")
    }

    /// Resize a grid; the result keeps the grid's catalog.
    ///
    /// # Errors
    /// Returns an error if the target size is outside 1..=1000.
    pub fn resize_grid(&mut self, grid: &Grid, width: u32, height: u32) -> Result<Grid> {
        let img = self.resize_image(&grid_to_image(grid)?, width, height)?;
        grid_from_image(&img, Arc::clone(grid.catalog()))
    }
}

impl Default for Resizer {
    fn default() -> Self {
        Self::new()
    }
}

/// One-shot box-filter resize of a grid.
///
/// # Errors
/// Returns an error if the target size is outside 1..=1000.
///
/// # Example
/// ```
/// use ep_core::Grid;
/// use ep_source::resize::resize_grid;
/// let grid = Grid::new(512, 512).unwrap();
/// assert_eq!(resize_grid(&grid, 128, 128).unwrap().width(), 128);
/// ```
pub fn resize_grid(grid: &Grid, width: u32, height: u32) -> Result<Grid> {
    Resizer::new().resize_grid(grid, width, height)
}

/// Flou gaussien (`sigma` en pixels) appliqué à toute la grille.
///
/// A non-positive `sigma` returns an unchanged copy.
///
/// # Errors
/// Returns an error if the grid cannot be converted to an image.
pub fn blur_grid(grid: &Grid, sigma: f32) -> Result<Grid> {
    if sigma <= 0.0 {
        return Ok(grid.clone());
    }
    let blurred = image::imageops::blur(&grid_to_image(grid)?, sigma);
    grid_from_image(&blurred, Arc::clone(grid.catalog()))
}
