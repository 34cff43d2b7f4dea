/// Types partagés d'echoplan : couleurs, catalogue de tuiles, grille, configuration.
///
/// Every other crate of the workspace speaks in terms of these types.

pub mod catalog;
pub mod color;
pub mod config;
pub mod coord;
pub mod error;
pub mod grid;
pub mod traits;

pub use catalog::{ColorCatalog, TileCategory};
pub use color::Color;
pub use config::PlanConfig;
pub use coord::{Coord, Direction};
pub use error::CoreError;
pub use grid::Grid;
