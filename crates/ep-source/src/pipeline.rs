use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use ep_core::config::PipelineConfig;
use ep_core::{ColorCatalog, Grid};
use ep_geometry::quantize;
use image::RgbaImage;

use crate::image::{grid_from_image, save_grid};
use crate::resize::{Resizer, blur_grid};

/// Nettoyage de la sortie du modèle de segmentation.
///
/// Stages, in order:
/// 1. resize to `working_size` (skipped when 0 or already that size);
/// 2. Gaussian blur, written as `blurred.png`;
/// 3. quantize to the catalog;
/// 4. box-resize to `final_size`, written as `crushed.png`;
/// 5. quantize again when `crush_passes == 2`, written as `saved.png`.
///
/// Intermediates are only written when `intermediates_dir` is set.
///
/// # Example
/// ```
/// use std::sync::Arc;
/// use ep_core::config::PipelineConfig;
/// use ep_core::ColorCatalog;
/// use ep_source::CleanupPipeline;
///
/// let config = PipelineConfig { working_size: 64, final_size: 16, ..PipelineConfig::default() };
/// let mut pipeline = CleanupPipeline::new(config);
/// let raw = image::RgbaImage::from_pixel(200, 200, image::Rgba([250, 250, 250, 255]));
/// let grid = pipeline.run(&raw, Arc::new(ColorCatalog::default())).unwrap();
/// assert_eq!((grid.width(), grid.height()), (16, 16));
/// ```
pub struct CleanupPipeline {
    config: PipelineConfig,
    resizer: Resizer,
}

impl CleanupPipeline {
    #[must_use]
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            resizer: Resizer::new(),
        }
    }

    #[must_use]
    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage on a raw image.
    ///
    /// # Errors
    /// Returns an error if the working image does not fit a grid (input over
    /// 1000 pixels with `working_size = 0`), or if an intermediate cannot be
    /// written.
    pub fn run(&mut self, raw: &RgbaImage, catalog: Arc<ColorCatalog>) -> Result<Grid> {
        let working = match self.config.working_size {
            0 => raw.clone(),
            size => self.resizer.resize_image(raw, size, size)?,
        };
        let grid = grid_from_image(&working, catalog).context("Image de travail invalide")?;
        self.run_grid(&grid)
    }

    /// Run every stage after the initial resize on an existing grid.
    ///
    /// # Errors
    /// Returns an error if an intermediate cannot be written.
    pub fn run_grid(&mut self, grid: &Grid) -> Result<Grid> {
        log::info!(
            "nettoyage {}×{} → {}×{}",
            grid.width(),
            grid.height(),
            self.config.final_size,
            self.config.final_size
        );

        let blurred = blur_grid(grid, self.config.blur_sigma)?;
        self.write_intermediate(&blurred, "blurred.png")?;

        let crushed = quantize(&blurred);
        let size = self.config.final_size;
        let shrunk = self.resizer.resize_grid(&crushed, size, size)?;
        self.write_intermediate(&shrunk, "crushed.png")?;

        let cleaned = if self.config.crush_passes >= 2 {
            quantize(&shrunk)
        } else {
            shrunk
        };
        self.write_intermediate(&cleaned, "saved.png")?;
        Ok(cleaned)
    }

    fn write_intermediate(&self, grid: &Grid, name: &str) -> Result<()> {
        let Some(dir) = self.config.intermediates_dir.as_deref() else {
            return Ok(());
        };
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Impossible de créer {}", dir.display()))?;
        save_grid(grid, &Path::new(dir).join(name))
    }
}
