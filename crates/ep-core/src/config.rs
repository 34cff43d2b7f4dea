use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::catalog::{ColorCatalog, TileCategory};
use crate::color::Color;
use crate::coord::Direction;
use crate::error::CoreError;

/// Configuration complète : pipeline de nettoyage, scène sonore, palette.
///
/// Sérialisable en TOML. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use ep_core::config::PlanConfig;
/// let config = PlanConfig::default();
/// assert_eq!(config.pipeline.final_size, 128);
/// ```
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct PlanConfig {
    pub pipeline: PipelineConfig,
    pub stage: StageConfig,
    /// Category name → `[r, g, b]` or `[r, g, b, a]` recolorings of the default palette.
    pub palette: BTreeMap<String, Vec<i64>>,
}

/// Cleanup of raw segmentation output.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PipelineConfig {
    /// Resize input to this square size before blurring. 0 = keep input size.
    pub working_size: u32,
    /// Square size of the final grid [1, 1000].
    pub final_size: u32,
    /// Gaussian blur sigma applied before the first quantization. 0.0 = no blur.
    pub blur_sigma: f32,
    /// Quantization passes: 1 = before downscale only, 2 = also after.
    pub crush_passes: u8,
    /// Where to write `blurred.png`, `crushed.png` and `saved.png`, if anywhere.
    pub intermediates_dir: Option<PathBuf>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            working_size: 512,
            final_size: 128,
            blur_sigma: 1.0,
            crush_passes: 2,
            intermediates_dir: None,
        }
    }
}

/// Listener-relative sound stage.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct StageConfig {
    /// Initial listener orientation.
    pub facing: Direction,
    /// Distance rolloff handed to the spatial audio engine [0.0, 10.0].
    pub rolloff: f32,
    /// Obstructions tolerated on the line to an opening for it to stay audible.
    pub max_obstructions: usize,
}

impl Default for StageConfig {
    fn default() -> Self {
        Self {
            facing: Direction::North,
            rolloff: 1.0,
            max_obstructions: 0,
        }
    }
}

impl PlanConfig {
    /// Clamp all numeric fields to their valid ranges.
    /// Called after TOML deserialization to prevent out-of-range values.
    pub fn clamp_all(&mut self) {
        self.pipeline.working_size = self.pipeline.working_size.min(1000);
        self.pipeline.final_size = self.pipeline.final_size.clamp(1, 1000);
        self.pipeline.blur_sigma = self.pipeline.blur_sigma.clamp(0.0, 10.0);
        self.pipeline.crush_passes = self.pipeline.crush_passes.clamp(1, 2);
        self.stage.rolloff = self.stage.rolloff.clamp(0.0, 10.0);
    }

    /// Build the catalog described by `[palette]`, default colors elsewhere.
    ///
    /// # Errors
    /// Returns [`CoreError::Config`] for an unknown category name and
    /// [`CoreError::InvalidColor`] / [`CoreError::InvalidCatalog`] for bad colors.
    ///
    /// # Example
    /// ```
    /// use ep_core::config::PlanConfig;
    /// use ep_core::catalog::TileCategory;
    /// use ep_core::color::Color;
    /// let mut config = PlanConfig::default();
    /// config.palette.insert("hall".into(), vec![10, 20, 30]);
    /// let catalog = config.catalog().unwrap();
    /// assert_eq!(catalog.color_of(TileCategory::Hall), Color::rgb(10, 20, 30));
    /// ```
    pub fn catalog(&self) -> Result<ColorCatalog, CoreError> {
        let overrides = self
            .palette
            .iter()
            .map(|(name, channels)| {
                let category: TileCategory = name.parse()?;
                Ok((category, Color::from_channels(channels)?))
            })
            .collect::<Result<Vec<_>, CoreError>>()?;
        ColorCatalog::with_overrides(&overrides)
    }
}

/// Structure TOML intermédiaire pour désérialisation avec valeurs optionnelles.
#[derive(Deserialize)]
struct ConfigFile {
    pipeline: Option<PipelineSection>,
    stage: Option<StageSection>,
    palette: Option<BTreeMap<String, Vec<i64>>>,
}

/// Pipeline section of the TOML config, all fields optional for partial override.
#[derive(Deserialize)]
struct PipelineSection {
    working_size: Option<u32>,
    final_size: Option<u32>,
    blur_sigma: Option<f32>,
    crush_passes: Option<u8>,
    intermediates_dir: Option<PathBuf>,
}

/// Stage section of the TOML config, all fields optional.
#[derive(Deserialize)]
struct StageSection {
    facing: Option<Direction>,
    rolloff: Option<f32>,
    max_obstructions: Option<usize>,
}

/// Charge un fichier TOML et fusionne avec les valeurs par défaut.
///
/// # Errors
/// Returns an error if the file cannot be read or parsed, or if `[palette]`
/// does not describe a valid catalog.
///
/// # Example
/// ```no_run
/// use ep_core::config::load_config;
/// use std::path::Path;
/// let config = load_config(Path::new("config/default.toml")).unwrap();
/// ```
pub fn load_config(path: &Path) -> Result<PlanConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    parse_config(&content).with_context(|| format!("Configuration rejetée : {}", path.display()))
}

/// Parse TOML text, merge over defaults, clamp.
///
/// # Errors
/// Returns an error on malformed TOML or an invalid palette.
pub fn parse_config(content: &str) -> Result<PlanConfig> {
    let file: ConfigFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut config = PlanConfig::default();

    if let Some(p) = file.pipeline {
        if let Some(v) = p.working_size {
            config.pipeline.working_size = v;
        }
        if let Some(v) = p.final_size {
            config.pipeline.final_size = v;
        }
        if let Some(v) = p.blur_sigma {
            config.pipeline.blur_sigma = v;
        }
        if let Some(v) = p.crush_passes {
            config.pipeline.crush_passes = v;
        }
        if p.intermediates_dir.is_some() {
            config.pipeline.intermediates_dir = p.intermediates_dir;
        }
    }

    if let Some(s) = file.stage {
        if let Some(v) = s.facing {
            config.stage.facing = v;
        }
        if let Some(v) = s.rolloff {
            config.stage.rolloff = v;
        }
        if let Some(v) = s.max_obstructions {
            config.stage.max_obstructions = v;
        }
    }

    if let Some(palette) = file.palette {
        config.palette = palette;
    }

    config.clamp_all();
    // Fail at load time rather than on first use.
    config.catalog()?;
    log::debug!("config chargée : {config:?}");
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = parse_config("[pipeline]\nfinal_size = 64\n").unwrap();
        assert_eq!(config.pipeline.final_size, 64);
        assert_eq!(config.pipeline.working_size, 512);
        assert_eq!(config.stage.facing, Direction::North);
    }

    #[test]
    fn values_are_clamped() {
        let config = parse_config(
            "[pipeline]\nfinal_size = 5000\ncrush_passes = 9\n[stage]\nrolloff = -3.0\n",
        )
        .unwrap();
        assert_eq!(config.pipeline.final_size, 1000);
        assert_eq!(config.pipeline.crush_passes, 2);
        assert!(config.stage.rolloff.abs() < f32::EPSILON);
    }

    #[test]
    fn stage_facing_parses() {
        let config = parse_config("[stage]\nfacing = \"west\"\nmax_obstructions = 2\n").unwrap();
        assert_eq!(config.stage.facing, Direction::West);
        assert_eq!(config.stage.max_obstructions, 2);
    }

    #[test]
    fn bad_palette_is_rejected() {
        assert!(parse_config("[palette]\nkitchen = [1, 2, 3]\n").is_err());
        assert!(parse_config("[palette]\nhall = [1, 2, 300]\n").is_err());
        // Collides with the wall color.
        assert!(parse_config("[palette]\nhall = [0, 0, 0]\n").is_err());
        // Unset cells are always (0, 0, 0, 0).
        assert!(parse_config("[palette]\ninvalid = [1, 1, 1]\n").is_err());
    }

    #[test]
    fn shipped_default_matches_builtin() {
        let config = parse_config(include_str!("../../../config/default.toml")).unwrap();
        let builtin = PlanConfig::default();
        assert_eq!(config.pipeline.working_size, builtin.pipeline.working_size);
        assert_eq!(config.pipeline.final_size, builtin.pipeline.final_size);
        assert_eq!(config.pipeline.crush_passes, builtin.pipeline.crush_passes);
        assert_eq!(config.stage.facing, builtin.stage.facing);
        assert!(config.palette.is_empty());
    }

    #[test]
    fn loads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[stage]\nrolloff = 2.5").unwrap();
        let config = load_config(file.path()).unwrap();
        assert!((config.stage.rolloff - 2.5).abs() < f32::EPSILON);
        assert!(load_config(Path::new("/nonexistent/echoplan.toml")).is_err());
    }
}
