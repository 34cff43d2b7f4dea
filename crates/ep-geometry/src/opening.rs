use std::collections::BTreeMap;

use ep_core::coord::centroid;
use ep_core::traits::SoundSourceId;
use ep_core::{CoreError, Coord, Grid, TileCategory};
use serde::Serialize;

use crate::shapes::find_shapes;

/// Une porte ou une fenêtre : pixels de la forme et centre dérivé.
///
/// Only the sound-source handle may change after construction.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Opening {
    pixels: Vec<Coord>,
    centroid: Coord,
    sound_source: Option<SoundSourceId>,
}

impl Opening {
    /// Wrap a shape and compute its centroid.
    ///
    /// # Errors
    /// Returns [`CoreError::EmptyInput`] for an empty pixel list.
    ///
    /// # Example
    /// ```
    /// use ep_core::Coord;
    /// use ep_geometry::opening::Opening;
    /// let o = Opening::new(vec![Coord::new(4, 0), Coord::new(5, 0), Coord::new(5, 1)]).unwrap();
    /// assert_eq!(o.location(), Coord::new(4, 0));
    /// ```
    pub fn new(pixels: Vec<Coord>) -> Result<Self, CoreError> {
        let centroid = centroid(&pixels)?;
        Ok(Self {
            pixels,
            centroid,
            sound_source: None,
        })
    }

    /// Member pixels, in extraction order.
    #[must_use]
    pub fn pixels(&self) -> &[Coord] {
        &self.pixels
    }

    /// Centroid; not necessarily a member pixel.
    #[must_use]
    pub fn location(&self) -> Coord {
        self.centroid
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    pub fn set_sound_source(&mut self, source: SoundSourceId) {
        self.sound_source = Some(source);
    }

    #[must_use]
    pub fn sound_source(&self) -> Option<SoundSourceId> {
        self.sound_source
    }
}

/// Toutes les ouvertures de la grille, numérotées à partir de 1 dans l'ordre de découverte.
///
/// # Example
/// ```
/// use ep_core::{Color, Coord, Grid};
/// use ep_geometry::opening::extract_openings;
///
/// let mut grid = Grid::new(4, 4).unwrap();
/// grid.populate(Coord::new(0, 0), Color::rgb(255, 60, 128)).unwrap();
/// grid.populate(Coord::new(0, 1), Color::rgb(255, 60, 128)).unwrap();
/// let openings = extract_openings(&grid);
/// assert_eq!(openings.keys().copied().collect::<Vec<_>>(), vec![1]);
/// assert_eq!(openings[&1].location(), Coord::new(0, 0));
/// ```
#[must_use]
pub fn extract_openings(grid: &Grid) -> BTreeMap<u32, Opening> {
    let openings: BTreeMap<u32, Opening> = find_shapes(grid, TileCategory::Opening)
        .into_iter()
        .zip(1u32..)
        .filter_map(|(pixels, id)| Opening::new(pixels).ok().map(|o| (id, o)))
        .collect();
    log::info!("{} ouverture(s) détectée(s)", openings.len());
    openings
}
