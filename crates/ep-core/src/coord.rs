use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// Grid coordinate, origin in the top-left corner, y growing downwards.
///
/// Signed, since line walks and neighbor offsets may step outside the grid.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct Coord {
    pub x: i32,
    pub y: i32,
}

impl Coord {
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Neighbor one step in `dir`.
    #[inline(always)]
    #[must_use]
    pub const fn step(self, dir: Direction) -> Self {
        let (dx, dy) = dir.offset();
        Self::new(self.x + dx, self.y + dy)
    }

    /// Manhattan distance.
    #[must_use]
    pub const fn manhattan(self, other: Self) -> u32 {
        self.x.abs_diff(other.x) + self.y.abs_diff(other.y)
    }

    /// Euclidean distance.
    ///
    /// # Example
    /// ```
    /// use ep_core::coord::Coord;
    /// assert!((Coord::new(0, 0).distance(Coord::new(3, 4)) - 5.0).abs() < 1e-9);
    /// ```
    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        let dx = f64::from(self.x) - f64::from(other.x);
        let dy = f64::from(self.y) - f64::from(other.y);
        dx.hypot(dy)
    }
}

impl From<(i32, i32)> for Coord {
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Les quatre voisins d'une cellule (connexité 4).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Neighbor visiting order used everywhere: N, E, S, W.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    #[must_use]
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Self::North => (0, -1),
            Self::East => (1, 0),
            Self::South => (0, 1),
            Self::West => (-1, 0),
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::East => "east",
            Self::South => "south",
            Self::West => "west",
        }
    }

    /// Quarter turn to the right.
    #[must_use]
    pub const fn clockwise(self) -> Self {
        match self {
            Self::North => Self::East,
            Self::East => Self::South,
            Self::South => Self::West,
            Self::West => Self::North,
        }
    }

    /// Quarter turn to the left.
    #[must_use]
    pub const fn counter_clockwise(self) -> Self {
        match self {
            Self::North => Self::West,
            Self::West => Self::South,
            Self::South => Self::East,
            Self::East => Self::North,
        }
    }
}

impl FromStr for Direction {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "north" | "n" => Ok(Self::North),
            "east" | "e" => Ok(Self::East),
            "south" | "s" => Ok(Self::South),
            "west" | "w" => Ok(Self::West),
            other => Err(CoreError::Config(format!("direction inconnue : {other}"))),
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Centre d'un ensemble de pixels : moyenne par axe, tronquée vers zéro.
///
/// The result need not belong to the set.
///
/// # Errors
/// Returns [`CoreError::EmptyInput`] for an empty slice.
///
/// # Example
/// ```
/// use ep_core::coord::{centroid, Coord};
/// let c = centroid(&[Coord::new(0, 0), Coord::new(3, 1)]).unwrap();
/// assert_eq!(c, Coord::new(1, 0));
/// assert!(centroid(&[]).is_err());
/// ```
pub fn centroid(pixels: &[Coord]) -> Result<Coord, CoreError> {
    if pixels.is_empty() {
        return Err(CoreError::EmptyInput("moyenne d'une liste de pixels vide"));
    }
    let n = pixels.len() as i64;
    let (sx, sy) = pixels.iter().fold((0i64, 0i64), |(sx, sy), p| {
        (sx + i64::from(p.x), sy + i64::from(p.y))
    });
    // Integer division truncates toward zero, like the float mean cast to int.
    Ok(Coord::new((sx / n) as i32, (sy / n) as i32))
}
