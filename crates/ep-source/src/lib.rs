/// Sources raster pour echoplan : chargement d'images, redimensionnement, nettoyage.
///
/// Turns the segmentation output of a floor-plan model into a clean
/// categorical [`ep_core::Grid`].

pub mod image;
pub mod pipeline;
pub mod resize;

pub use pipeline::CleanupPipeline;
