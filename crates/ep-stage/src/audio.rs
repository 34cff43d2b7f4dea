use anyhow::{Result, bail};
use ep_core::traits::{Cue, SoundSourceId, SpatialAudio};

/// Source requested from a [`LogAudio`] engine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LoggedSource {
    pub id: SoundSourceId,
    pub cue: Cue,
    pub position: [f32; 3],
    pub rolloff: f32,
}

/// Moteur audio sans son : enregistre et journalise chaque requête.
///
/// Handles are numbered from 1. Used by the CLI when no real engine is
/// plugged in, and by tests to observe what the stage asked for.
///
/// # Example
/// ```
/// use ep_core::traits::{Cue, SpatialAudio};
/// use ep_stage::LogAudio;
///
/// let mut audio = LogAudio::default();
/// let id = audio.open_source(Cue::Door, [3.0, 4.0, 0.0], 1.0).unwrap();
/// audio.play(id).unwrap();
/// assert_eq!(audio.played(), &[id]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct LogAudio {
    listener: Option<([f32; 3], [f32; 6])>,
    sources: Vec<LoggedSource>,
    played: Vec<SoundSourceId>,
}

impl LogAudio {
    /// Last listener placement.
    #[must_use]
    pub fn listener(&self) -> Option<([f32; 3], [f32; 6])> {
        self.listener
    }

    #[must_use]
    pub fn sources(&self) -> &[LoggedSource] {
        &self.sources
    }

    /// Cue, position and rolloff of a source.
    #[must_use]
    pub fn source(&self, id: SoundSourceId) -> Option<(Cue, [f32; 3], f32)> {
        self.sources
            .iter()
            .find(|s| s.id == id)
            .map(|s| (s.cue, s.position, s.rolloff))
    }

    /// Sources played so far, in order.
    #[must_use]
    pub fn played(&self) -> &[SoundSourceId] {
        &self.played
    }
}

impl SpatialAudio for LogAudio {
    fn place_listener(&mut self, position: [f32; 3], orientation: [f32; 6]) -> Result<()> {
        log::debug!("auditeur en {position:?}, orientation {orientation:?}");
        self.listener = Some((position, orientation));
        Ok(())
    }

    fn open_source(&mut self, cue: Cue, position: [f32; 3], rolloff: f32) -> Result<SoundSourceId> {
        let id = SoundSourceId(self.sources.len() as u64 + 1);
        self.sources.push(LoggedSource {
            id,
            cue,
            position,
            rolloff,
        });
        log::debug!("source {id} : {cue:?} en {position:?}, rolloff {rolloff}");
        Ok(id)
    }

    fn play(&mut self, source: SoundSourceId) -> Result<()> {
        let Some(s) = self.sources.iter().find(|s| s.id == source) else {
            bail!("Source inconnue : {source}");
        };
        log::info!("lecture {source} ({:?}) en {:?}", s.cue, s.position);
        self.played.push(source);
        Ok(())
    }
}
