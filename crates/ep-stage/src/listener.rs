use std::fmt;

use ep_core::{Coord, Direction};
use serde::Serialize;

/// Direction faced by the listener.
pub type Facing = Direction;

/// Up vector shared by every orientation: the listener looks at the plan from above.
const UP: [f32; 3] = [0.0, 0.0, -1.0];

/// Orientation `(front_x, front_y, front_z, up_x, up_y, up_z)` for the audio engine.
///
/// The engine frame is right-handed with y pointing down the plan, so facing
/// north looks along `-y`.
///
/// # Example
/// ```
/// use ep_stage::listener::{orientation, Facing};
/// assert_eq!(orientation(Facing::North), [0.0, -1.0, 0.0, 0.0, 0.0, -1.0]);
/// assert_eq!(orientation(Facing::West), [-1.0, 0.0, 0.0, 0.0, 0.0, -1.0]);
/// ```
#[must_use]
pub fn orientation(facing: Facing) -> [f32; 6] {
    let (dx, dy) = facing.offset();
    [dx as f32, dy as f32, 0.0, UP[0], UP[1], UP[2]]
}

/// Inverse of [`orientation`]; `None` for any other vector.
#[must_use]
pub fn facing_from_orientation(vector: [f32; 6]) -> Option<Facing> {
    Direction::ALL
        .into_iter()
        .find(|&d| orientation(d) == vector)
}

/// Quart de plan où se trouve l'auditeur.
///
/// Split at half the width and height; the middle row and column belong to
/// the bottom and right halves.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Quadrant {
    TopLeft,
    BottomLeft,
    TopRight,
    BottomRight,
}

impl Quadrant {
    /// Quadrant of `at` on a `width`×`height` plan.
    ///
    /// # Example
    /// ```
    /// use ep_core::Coord;
    /// use ep_stage::listener::Quadrant;
    /// assert_eq!(Quadrant::of(Coord::new(63, 64), 128, 128), Quadrant::BottomLeft);
    /// assert_eq!(Quadrant::of(Coord::new(64, 63), 128, 128), Quadrant::TopRight);
    /// ```
    #[must_use]
    pub fn of(at: Coord, width: u32, height: u32) -> Self {
        let left = f64::from(at.x) < f64::from(width) / 2.0;
        let top = f64::from(at.y) < f64::from(height) / 2.0;
        match (left, top) {
            (true, true) => Self::TopLeft,
            (true, false) => Self::BottomLeft,
            (false, true) => Self::TopRight,
            (false, false) => Self::BottomRight,
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TopLeft => "top-left",
            Self::BottomLeft => "bottom-left",
            Self::TopRight => "top-right",
            Self::BottomRight => "bottom-right",
        }
    }
}

impl fmt::Display for Quadrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Position et orientation de l'auditeur sur la grille.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct Listener {
    pub position: Coord,
    pub facing: Facing,
}

impl Listener {
    #[must_use]
    pub fn new(position: Coord, facing: Facing) -> Self {
        Self { position, facing }
    }

    /// Rotate in place from a key press: `e` turns clockwise, `q` counter-clockwise.
    ///
    /// Returns the new facing, or `None` (and no change) for any other key.
    ///
    /// # Example
    /// ```
    /// use ep_core::Coord;
    /// use ep_stage::listener::{Facing, Listener};
    /// let mut l = Listener::new(Coord::new(0, 0), Facing::West);
    /// assert_eq!(l.turn_key('e'), Some(Facing::North));
    /// assert_eq!(l.turn_key('q'), Some(Facing::West));
    /// assert_eq!(l.turn_key('x'), None);
    /// ```
    pub fn turn_key(&mut self, key: char) -> Option<Facing> {
        self.facing = match key.to_ascii_lowercase() {
            'e' => self.facing.clockwise(),
            'q' => self.facing.counter_clockwise(),
            _ => return None,
        };
        Some(self.facing)
    }

    /// Position in engine space, z = 0.
    #[must_use]
    pub fn position_3d(&self) -> [f32; 3] {
        [self.position.x as f32, self.position.y as f32, 0.0]
    }

    #[must_use]
    pub fn orientation(&self) -> [f32; 6] {
        orientation(self.facing)
    }
}
