use std::collections::{BTreeMap, HashSet};
use std::fmt;

use anyhow::{Result, bail};
use ep_core::config::StageConfig;
use ep_core::traits::{Cue, SpatialAudio};
use ep_core::{Coord, Grid, TileCategory};
use ep_geometry::{LineCaster, Opening, extract_openings, rasterize};
use serde::Serialize;

use crate::listener::Listener;
use crate::report::LocationReport;

/// Distance euclidienne entre deux cellules.
///
/// # Example
/// ```
/// use ep_core::Coord;
/// use ep_stage::distance;
/// assert!((distance(Coord::new(0, 0), Coord::new(3, 4)) - 5.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn distance(a: Coord, b: Coord) -> f64 {
    a.distance(b)
}

/// Nature d'une ouverture vue depuis l'auditeur.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OpeningKind {
    Door,
    /// The far side is background, i.e. outside.
    Window,
}

impl OpeningKind {
    /// Kind implied by the dominant category behind an opening.
    #[must_use]
    pub fn from_other_side(category: TileCategory) -> Self {
        if category == TileCategory::Background {
            Self::Window
        } else {
            Self::Door
        }
    }

    #[must_use]
    pub fn cue(self) -> Cue {
        match self {
            Self::Door => Cue::Door,
            Self::Window => Cue::Window,
        }
    }
}

impl fmt::Display for OpeningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Door => "door",
            Self::Window => "window",
        })
    }
}

/// Grille nettoyée, ses ouvertures et les réglages de la scène.
///
/// Openings are extracted once at construction; only their sound handles
/// change afterwards.
///
/// # Example
/// ```
/// use ep_core::config::StageConfig;
/// use ep_core::{Coord, Grid};
/// use ep_stage::{Facing, Listener, LogAudio, SoundStage};
///
/// let grid = Grid::new(16, 16).unwrap();
/// let mut stage = SoundStage::new(grid, StageConfig::default());
/// let listener = Listener::new(Coord::new(8, 8), Facing::North);
/// let mut audio = LogAudio::default();
/// assert!(stage.prepare(&listener, &mut audio).unwrap().is_empty());
/// assert!(stage.play(&listener, &mut audio).unwrap().is_empty());
/// ```
#[derive(Clone, Debug)]
pub struct SoundStage {
    grid: Grid,
    openings: BTreeMap<u32, Opening>,
    config: StageConfig,
}

impl SoundStage {
    #[must_use]
    pub fn new(grid: Grid, config: StageConfig) -> Self {
        let openings = extract_openings(&grid);
        Self {
            grid,
            openings,
            config,
        }
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Openings keyed by id, from 1 in discovery order.
    #[must_use]
    pub fn openings(&self) -> &BTreeMap<u32, Opening> {
        &self.openings
    }

    #[must_use]
    pub fn config(&self) -> &StageConfig {
        &self.config
    }

    /// Door or window, as seen from `listener`.
    #[must_use]
    pub fn classify(&self, listener: Coord, opening: &Opening) -> OpeningKind {
        let other_side = LineCaster::new(&self.grid).other_side_category(
            listener,
            opening.location(),
            opening.len(),
        );
        OpeningKind::from_other_side(other_side)
    }

    /// Classify every opening from the listener's cell and open one source per opening.
    ///
    /// Returns the kind chosen for each opening id.
    ///
    /// On failure no opening changes source: those from an earlier
    /// successful call stay attached.
    ///
    /// # Errors
    /// Fails if the listener is outside the grid or the engine rejects a request.
    pub fn prepare<A: SpatialAudio>(
        &mut self,
        listener: &Listener,
        audio: &mut A,
    ) -> Result<BTreeMap<u32, OpeningKind>> {
        self.check_inside(listener.position)?;
        audio.place_listener(listener.position_3d(), listener.orientation())?;

        let kinds: BTreeMap<u32, OpeningKind> = self
            .openings
            .iter()
            .map(|(&id, opening)| (id, self.classify(listener.position, opening)))
            .collect();

        // Sources are attached only once the engine accepted every request.
        let mut sources = Vec::with_capacity(kinds.len());
        for (&id, &kind) in &kinds {
            let Some(opening) = self.openings.get(&id) else {
                continue;
            };
            let at = opening.location();
            let source = audio.open_source(
                kind.cue(),
                [at.x as f32, at.y as f32, 0.0],
                self.config.rolloff,
            )?;
            log::debug!("ouverture {id} ({kind}) en {at} → source {source}");
            sources.push((id, source));
        }
        for (id, source) in sources {
            if let Some(opening) = self.openings.get_mut(&id) {
                opening.set_sound_source(source);
            }
        }
        log::info!("{} source(s) préparée(s)", kinds.len());
        Ok(kinds)
    }

    /// Ids of openings with at most `max_obstructions` walls or openings on the
    /// line from `listener` to their centroid, their own pixels excepted.
    ///
    /// # Errors
    /// Fails if the listener is outside the grid.
    pub fn audible(&self, listener: Coord) -> Result<Vec<u32>> {
        self.check_inside(listener)?;
        let caster = LineCaster::new(&self.grid);
        let mut ids = Vec::new();
        for (&id, opening) in &self.openings {
            let line = rasterize(listener, opening.location());
            let own: HashSet<Coord> = opening.pixels().iter().copied().collect();
            let count = caster.obstruction_count(&line, &own)?;
            if count <= self.config.max_obstructions {
                ids.push(id);
            } else {
                log::trace!("ouverture {id} masquée ({count} obstacle(s))");
            }
        }
        Ok(ids)
    }

    /// Play the source of every audible opening, in id order.
    ///
    /// Openings without a source (stage not prepared) are skipped with a
    /// warning. Returns the ids actually played.
    ///
    /// # Errors
    /// Fails if the listener is outside the grid or the engine fails to play.
    pub fn play<A: SpatialAudio>(&self, listener: &Listener, audio: &mut A) -> Result<Vec<u32>> {
        audio.place_listener(listener.position_3d(), listener.orientation())?;
        let mut played = Vec::new();
        for id in self.audible(listener.position)? {
            let Some(source) = self.openings.get(&id).and_then(Opening::sound_source) else {
                log::warn!("ouverture {id} sans source : scène non préparée ?");
                continue;
            };
            audio.play(source)?;
            played.push(id);
        }
        Ok(played)
    }

    /// Where the listener stands, for narration.
    ///
    /// # Errors
    /// Fails if the listener is outside the grid.
    pub fn report(&self, listener: &Listener) -> Result<LocationReport> {
        let tile = self.grid.tile_category(listener.position)?;
        Ok(LocationReport::new(
            listener,
            self.grid.width(),
            self.grid.height(),
            tile,
        ))
    }

    fn check_inside(&self, at: Coord) -> Result<()> {
        if !self.grid.contains(at) {
            bail!(
                "Auditeur hors grille : {at} pour une grille {}×{}",
                self.grid.width(),
                self.grid.height()
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::LogAudio;
    use crate::listener::Facing;
    use ep_core::traits::SoundSourceId;

    fn fill(grid: &mut Grid, category: TileCategory, xs: std::ops::Range<i32>, ys: std::ops::Range<i32>) {
        let color = grid.catalog().color_of(category);
        for y in ys {
            for x in xs.clone() {
                grid.populate(Coord::new(x, y), color).unwrap();
            }
        }
    }

    /// 20×12 plan: bedroom x < 8, wall column x = 8, hall 9..16, wall x = 16,
    /// outside 17..20. Door at (8, 4..=6), window at (16, 4..=6).
    fn two_rooms() -> Grid {
        let mut grid = Grid::new(20, 12).unwrap();
        fill(&mut grid, TileCategory::Bedroom, 0..8, 0..12);
        fill(&mut grid, TileCategory::Wall, 8..9, 0..12);
        fill(&mut grid, TileCategory::Hall, 9..16, 0..12);
        fill(&mut grid, TileCategory::Wall, 16..17, 0..12);
        fill(&mut grid, TileCategory::Background, 17..20, 0..12);
        fill(&mut grid, TileCategory::Opening, 8..9, 4..7);
        fill(&mut grid, TileCategory::Opening, 16..17, 4..7);
        grid
    }

    #[test]
    fn openings_are_extracted_in_order() {
        let stage = SoundStage::new(two_rooms(), StageConfig::default());
        let centroids: Vec<Coord> = stage.openings().values().map(Opening::location).collect();
        assert_eq!(centroids, vec![Coord::new(8, 5), Coord::new(16, 5)]);
    }

    #[test]
    fn door_and_window_from_the_hall() {
        let stage = SoundStage::new(two_rooms(), StageConfig::default());
        let from = Coord::new(12, 5);
        let kinds: Vec<OpeningKind> = stage
            .openings()
            .values()
            .map(|o| stage.classify(from, o))
            .collect();
        assert_eq!(kinds, vec![OpeningKind::Door, OpeningKind::Window]);
    }

    #[test]
    fn prepare_attaches_sources() {
        let mut stage = SoundStage::new(two_rooms(), StageConfig::default());
        let listener = Listener::new(Coord::new(12, 5), Facing::East);
        let mut audio = LogAudio::default();
        let kinds = stage.prepare(&listener, &mut audio).unwrap();
        assert_eq!(kinds[&1], OpeningKind::Door);
        assert_eq!(kinds[&2], OpeningKind::Window);
        assert_eq!(stage.openings()[&1].sound_source(), Some(SoundSourceId(1)));
        assert_eq!(stage.openings()[&2].sound_source(), Some(SoundSourceId(2)));
        assert_eq!(audio.listener(), Some(([12.0, 5.0, 0.0], [1.0, 0.0, 0.0, 0.0, 0.0, -1.0])));
        let (cue, position, rolloff) = audio.source(SoundSourceId(2)).unwrap();
        assert_eq!(cue, Cue::Window);
        assert_eq!(position, [16.0, 5.0, 0.0]);
        assert!((rolloff - 1.0).abs() < f32::EPSILON);
    }

    /// Engine that accepts `budget` sources, then fails.
    struct Exhausted {
        budget: u64,
        opened: u64,
    }

    impl SpatialAudio for Exhausted {
        fn place_listener(&mut self, _position: [f32; 3], _orientation: [f32; 6]) -> Result<()> {
            Ok(())
        }

        fn open_source(&mut self, _cue: Cue, _position: [f32; 3], _rolloff: f32) -> Result<SoundSourceId> {
            if self.opened == self.budget {
                bail!("plus de sources disponibles");
            }
            self.opened += 1;
            Ok(SoundSourceId(100 + self.opened))
        }

        fn play(&mut self, _source: SoundSourceId) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_prepare_keeps_previous_sources() {
        let mut stage = SoundStage::new(two_rooms(), StageConfig::default());
        let listener = Listener::new(Coord::new(12, 5), Facing::North);

        let mut fresh = Exhausted { budget: 1, opened: 0 };
        assert!(stage.prepare(&listener, &mut fresh).is_err());
        assert_eq!(stage.openings()[&1].sound_source(), None);

        stage.prepare(&listener, &mut LogAudio::default()).unwrap();
        let mut failing = Exhausted { budget: 1, opened: 0 };
        assert!(stage.prepare(&listener, &mut failing).is_err());
        assert_eq!(failing.opened, 1);
        assert_eq!(stage.openings()[&1].sound_source(), Some(SoundSourceId(1)));
        assert_eq!(stage.openings()[&2].sound_source(), Some(SoundSourceId(2)));
    }

    #[test]
    fn listener_outside_is_rejected() {
        let mut stage = SoundStage::new(two_rooms(), StageConfig::default());
        let mut audio = LogAudio::default();
        let outside = Listener::new(Coord::new(20, 3), Facing::North);
        assert!(stage.prepare(&outside, &mut audio).is_err());
        assert!(stage.audible(Coord::new(-1, 0)).is_err());
        assert!(audio.sources().is_empty());
    }

    #[test]
    fn walls_block_sound() {
        let stage = SoundStage::new(two_rooms(), StageConfig::default());
        // From the hall both openings are in clear view.
        assert_eq!(stage.audible(Coord::new(12, 5)).unwrap(), vec![1, 2]);
        // From the bedroom the line to the window crosses the door.
        assert_eq!(stage.audible(Coord::new(3, 5)).unwrap(), vec![1]);
        // Higher up it crosses the wall column instead.
        assert_eq!(stage.audible(Coord::new(3, 0)).unwrap(), vec![1]);
        // From outside, the window only.
        assert_eq!(stage.audible(Coord::new(19, 5)).unwrap(), vec![2]);
    }

    #[test]
    fn obstruction_tolerance_is_configurable() {
        let config = StageConfig {
            max_obstructions: 3,
            ..StageConfig::default()
        };
        let stage = SoundStage::new(two_rooms(), config);
        assert_eq!(stage.audible(Coord::new(3, 5)).unwrap(), vec![1, 2]);
    }

    #[test]
    fn play_only_audible_prepared_sources() {
        let mut stage = SoundStage::new(two_rooms(), StageConfig::default());
        let listener = Listener::new(Coord::new(3, 5), Facing::North);
        let mut audio = LogAudio::default();
        assert!(stage.play(&listener, &mut audio).unwrap().is_empty());

        stage.prepare(&listener, &mut audio).unwrap();
        assert_eq!(stage.play(&listener, &mut audio).unwrap(), vec![1]);
        assert_eq!(audio.played(), &[SoundSourceId(1)]);
    }

    #[test]
    fn report_describes_the_cell() {
        let stage = SoundStage::new(two_rooms(), StageConfig::default());
        let report = stage
            .report(&Listener::new(Coord::new(12, 9), Facing::South))
            .unwrap();
        assert_eq!(report.tile, TileCategory::Hall);
        assert!(stage.report(&Listener::new(Coord::new(99, 0), Facing::South)).is_err());
    }
}
