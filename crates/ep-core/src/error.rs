use thiserror::Error;

/// Errors originating from the core module.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Grid width/height outside `1..=1000`.
    #[error("Dimensions invalides : {width}×{height} (attendu 1..=1000)")]
    InvalidDimension {
        /// Requested width.
        width: i64,
        /// Requested height.
        height: i64,
    },

    /// Coordinate outside `[0, width) × [0, height)`.
    #[error("Coordonnées hors grille : ({x}, {y}) pour une grille {width}×{height}")]
    OutOfBounds {
        /// X coordinate.
        x: i64,
        /// Y coordinate.
        y: i64,
        /// Grid width.
        width: u32,
        /// Grid height.
        height: u32,
    },

    /// Channel out of `[0, 255]` or wrong tuple arity.
    #[error("Couleur invalide : {0}")]
    InvalidColor(String),

    /// Averaging over zero elements.
    #[error("Entrée vide : {0}")]
    EmptyInput(&'static str),

    /// Custom catalog that is not a bijection over the tile categories.
    #[error("Catalogue invalide : {0}")]
    InvalidCatalog(String),

    /// Invalid configuration value or structure.
    #[error("Configuration invalide : {0}")]
    Config(String),
}
