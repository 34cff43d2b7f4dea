use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::CoreError;

/// Semantic tile category of a floor-plan pixel.
///
/// # Example
/// ```
/// use ep_core::catalog::TileCategory;
/// let cat: TileCategory = "dining room".parse().unwrap();
/// assert_eq!(cat, TileCategory::DiningRoom);
/// assert_eq!(cat.to_string(), "dining room");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TileCategory {
    Wall,
    Background,
    Closet,
    /// Bathroom / washroom.
    Bathroom,
    /// Living room, kitchen or dining room.
    DiningRoom,
    Bedroom,
    Hall,
    Balcony,
    /// Door or window.
    Opening,
    /// "Pas de donnée" : cellule vide ou couleur hors catalogue.
    Invalid,
}

impl TileCategory {
    /// Every category, in default catalog order.
    pub const ALL: [Self; 10] = [
        Self::Wall,
        Self::Background,
        Self::Closet,
        Self::Bathroom,
        Self::DiningRoom,
        Self::Bedroom,
        Self::Hall,
        Self::Balcony,
        Self::Opening,
        Self::Invalid,
    ];

    /// Human-readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Wall => "wall",
            Self::Background => "background",
            Self::Closet => "closet",
            Self::Bathroom => "bathroom",
            Self::DiningRoom => "dining room",
            Self::Bedroom => "bedroom",
            Self::Hall => "hall",
            Self::Balcony => "balcony",
            Self::Opening => "opening",
            Self::Invalid => "invalid",
        }
    }

    /// True for categories that block line of sight (walls and openings).
    #[must_use]
    pub const fn obstructs(self) -> bool {
        matches!(self, Self::Wall | Self::Opening)
    }
}

impl fmt::Display for TileCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for TileCategory {
    type Err = CoreError;

    /// Accepts the display name, its snake_case form, and `NaN` for `invalid`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase().replace(['_', '-'], " ");
        if key == "nan" {
            return Ok(Self::Invalid);
        }
        Self::ALL
            .into_iter()
            .find(|c| c.name() == key)
            .ok_or_else(|| CoreError::Config(format!("catégorie inconnue : {s}")))
    }
}

/// Table bijective catégorie ↔ couleur canonique.
///
/// Immutable once built. Share it with `Arc`; alternate palettes are new
/// instances, never edits of the default one.
///
/// # Example
/// ```
/// use ep_core::catalog::{ColorCatalog, TileCategory};
/// use ep_core::color::Color;
/// let catalog = ColorCatalog::default();
/// assert_eq!(catalog.color_of(TileCategory::Opening), Color::rgb(255, 60, 128));
/// assert_eq!(catalog.category_of(Color::rgb(1, 2, 3)), TileCategory::Invalid);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorCatalog {
    /// One entry per category, iteration order = tie-break order.
    entries: Vec<(TileCategory, Color)>,
}

impl ColorCatalog {
    /// Palette produite par le modèle de segmentation DeepFloorPlan.
    pub const FLOOR_PLAN: [(TileCategory, Color); 10] = [
        (TileCategory::Wall, Color::rgb(0, 0, 0)),
        (TileCategory::Background, Color::rgb(255, 255, 255)),
        (TileCategory::Closet, Color::rgb(192, 192, 224)),
        (TileCategory::Bathroom, Color::rgb(192, 255, 255)),
        (TileCategory::DiningRoom, Color::rgb(224, 255, 192)),
        (TileCategory::Bedroom, Color::rgb(255, 224, 128)),
        (TileCategory::Hall, Color::rgb(255, 160, 96)),
        (TileCategory::Balcony, Color::rgb(255, 224, 224)),
        (TileCategory::Opening, Color::rgb(255, 60, 128)),
        (TileCategory::Invalid, Color::TRANSPARENT),
    ];

    /// Build a catalog from explicit entries.
    ///
    /// Every category must appear exactly once and no color may be shared.
    /// `Invalid` stays [`Color::TRANSPARENT`], the color of unset cells.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidCatalog`] if the entries are not a bijection
    /// or `Invalid` is recolored.
    pub fn new(entries: Vec<(TileCategory, Color)>) -> Result<Self, CoreError> {
        for category in TileCategory::ALL {
            let n = entries.iter().filter(|(c, _)| *c == category).count();
            if n != 1 {
                return Err(CoreError::InvalidCatalog(format!(
                    "{category} apparaît {n} fois"
                )));
            }
        }
        if let Some((_, color)) = entries
            .iter()
            .find(|(c, color)| *c == TileCategory::Invalid && *color != Color::TRANSPARENT)
        {
            return Err(CoreError::InvalidCatalog(format!(
                "invalid est réservé à {:?}, reçu {color:?}",
                Color::TRANSPARENT
            )));
        }
        for (i, (cat_a, color_a)) in entries.iter().enumerate() {
            if let Some((cat_b, _)) = entries[i + 1..].iter().find(|(_, c)| c == color_a) {
                return Err(CoreError::InvalidCatalog(format!(
                    "{cat_a} et {cat_b} partagent la couleur {color_a:?}"
                )));
            }
        }
        Ok(Self { entries })
    }

    /// Default catalog with some categories recolored.
    ///
    /// # Errors
    /// Returns [`CoreError::InvalidCatalog`] if an override collides with another
    /// color or recolors `Invalid`.
    ///
    /// # Example
    /// ```
    /// use ep_core::catalog::{ColorCatalog, TileCategory};
    /// use ep_core::color::Color;
    /// let c = ColorCatalog::with_overrides(&[(TileCategory::Hall, Color::rgb(1, 1, 1))]).unwrap();
    /// assert_eq!(c.category_of(Color::rgb(1, 1, 1)), TileCategory::Hall);
    /// ```
    pub fn with_overrides(overrides: &[(TileCategory, Color)]) -> Result<Self, CoreError> {
        let entries = Self::FLOOR_PLAN
            .iter()
            .map(|&(cat, color)| {
                let color = overrides
                    .iter()
                    .rev()
                    .find(|(c, _)| *c == cat)
                    .map_or(color, |&(_, o)| o);
                (cat, color)
            })
            .collect();
        Self::new(entries)
    }

    /// Canonical color of a category.
    #[inline]
    #[must_use]
    pub fn color_of(&self, category: TileCategory) -> Color {
        self.entries
            .iter()
            .find(|(c, _)| *c == category)
            .map_or(Color::TRANSPARENT, |&(_, color)| color)
    }

    /// Category whose canonical color is exactly `color`, else `Invalid`.
    #[inline]
    #[must_use]
    pub fn category_of(&self, color: Color) -> TileCategory {
        self.entries
            .iter()
            .find(|(_, c)| *c == color)
            .map_or(TileCategory::Invalid, |&(cat, _)| cat)
    }

    /// Entries in iteration (tie-break) order.
    pub fn iter(&self) -> impl Iterator<Item = (TileCategory, Color)> + '_ {
        self.entries.iter().copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ColorCatalog {
    fn default() -> Self {
        Self {
            entries: Self::FLOOR_PLAN.to_vec(),
        }
    }
}
