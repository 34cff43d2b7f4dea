/// Scène sonore d'echoplan : auditeur, classification des ouvertures, lecture.
///
/// Places a listener on a cleaned grid, turns every opening into a door or
/// window cue for a [`ep_core::traits::SpatialAudio`] engine, and plays the
/// ones with a clear line of sight.

pub mod audio;
pub mod listener;
pub mod report;
pub mod stage;

pub use audio::LogAudio;
pub use listener::{Facing, Listener, Quadrant};
pub use report::LocationReport;
pub use stage::{OpeningKind, SoundStage, distance};
