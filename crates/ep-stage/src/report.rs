use std::fmt;

use ep_core::{Coord, TileCategory};
use serde::Serialize;

use crate::listener::{Facing, Listener, Quadrant};

/// Description parlée de la position de l'auditeur.
///
/// `Display` renders the three narration sentences, one per line.
///
/// # Example
/// ```
/// use ep_core::{Coord, TileCategory};
/// use ep_stage::{Facing, Listener, LocationReport};
///
/// let listener = Listener::new(Coord::new(10, 90), Facing::East);
/// let report = LocationReport::new(&listener, 128, 128, TileCategory::Hall);
/// let text = report.to_string();
/// assert!(text.starts_with("You are standing in the bottom-left quadrant of the floorplan, facing east."));
/// assert!(text.contains("you are 90 down, and 10 across"));
/// assert!(text.ends_with("There is hall here."));
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LocationReport {
    pub quadrant: Quadrant,
    pub facing: Facing,
    pub position: Coord,
    pub tile: TileCategory,
}

impl LocationReport {
    #[must_use]
    pub fn new(listener: &Listener, width: u32, height: u32, tile: TileCategory) -> Self {
        Self {
            quadrant: Quadrant::of(listener.position, width, height),
            facing: listener.facing,
            position: listener.position,
            tile,
        }
    }

    /// Sentence announcing a new facing after a turn.
    #[must_use]
    pub fn turn_sentence(facing: Facing) -> String {
        format!("You are now facing {facing}.")
    }
}

impl fmt::Display for LocationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "You are standing in the {} quadrant of the floorplan, facing {}.",
            self.quadrant, self.facing
        )?;
        writeln!(
            f,
            "From the top-left corner, you are {} down, and {} across.",
            self.position.y, self.position.x
        )?;
        write!(f, "There is {} here.", self.tile)
    }
}
