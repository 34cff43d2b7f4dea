use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Opaque handle to a source owned by the spatial audio engine.
///
/// The analysis layer stores it next to an opening and hands it back; it never
/// looks inside.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SoundSourceId(pub u64);

impl fmt::Display for SoundSourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Son joué pour une ouverture.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cue {
    /// Opening leading to another room.
    Door,
    /// Opening leading outside.
    Window,
}

/// Moteur audio spatialisé externe (OpenAL ou équivalent).
///
/// Coordinates are grid cells, z = 0; the listener orientation is
/// `(front_x, front_y, front_z, up_x, up_y, up_z)` in a right-handed frame.
///
/// # Example
/// ```
/// use ep_core::traits::{Cue, SoundSourceId, SpatialAudio};
///
/// struct Silent(u64);
/// impl SpatialAudio for Silent {
///     fn place_listener(&mut self, _position: [f32; 3], _orientation: [f32; 6]) -> anyhow::Result<()> { Ok(()) }
///     fn open_source(&mut self, _cue: Cue, _position: [f32; 3], _rolloff: f32) -> anyhow::Result<SoundSourceId> {
///         self.0 += 1;
///         Ok(SoundSourceId(self.0))
///     }
///     fn play(&mut self, _source: SoundSourceId) -> anyhow::Result<()> { Ok(()) }
/// }
/// ```
pub trait SpatialAudio {
    /// Move and orient the listener.
    ///
    /// # Errors
    /// Engine-defined.
    fn place_listener(&mut self, position: [f32; 3], orientation: [f32; 6]) -> Result<()>;

    /// Create a source for `cue` at `position`.
    ///
    /// # Errors
    /// Engine-defined, e.g. missing sample file.
    fn open_source(&mut self, cue: Cue, position: [f32; 3], rolloff: f32)
    -> Result<SoundSourceId>;

    /// Play a source previously returned by `open_source`, to completion.
    ///
    /// # Errors
    /// Engine-defined, e.g. unknown handle.
    fn play(&mut self, source: SoundSourceId) -> Result<()>;
}
