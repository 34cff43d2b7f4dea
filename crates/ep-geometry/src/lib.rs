/// Moteur d'analyse de grille pour echoplan.
///
/// Connected shapes, openings, Bresenham lines of sight and palette
/// quantization over an [`ep_core::Grid`].
pub mod line;
pub mod opening;
pub mod quantize;
pub mod shapes;

pub use line::{rasterize, BresenhamLine, LineCaster};
pub use opening::{extract_openings, Opening};
pub use quantize::quantize;
pub use shapes::find_shapes;
