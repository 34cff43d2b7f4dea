use std::path::PathBuf;

use clap::Parser;
use ep_core::{Coord, Direction};

/// echoplan : sonification de plans d'étage.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Plan segmenté : chemin vers une image (PNG, JPEG, BMP, GIF).
    #[arg(long)]
    pub image: Option<PathBuf>,

    /// Utiliser le plan de démonstration intégré.
    #[arg(long, default_value_t = false)]
    pub demo: bool,

    /// Fichier de configuration TOML. Défaut : config/default.toml.
    #[arg(short, long, default_value = "config/default.toml")]
    pub config: PathBuf,

    /// Position de l'auditeur « x,y ». Défaut : centre du plan.
    #[arg(long, value_parser = parse_coord)]
    pub listener: Option<Coord>,

    /// Orientation initiale : north, east, south, west.
    #[arg(long)]
    pub facing: Option<Direction>,

    /// Rotations à appliquer ensuite : `e` horaire, `q` anti-horaire (ex. "eeq").
    #[arg(long)]
    pub turn: Option<String>,

    /// Utiliser l'image telle quelle, sans nettoyage.
    #[arg(long, default_value_t = false)]
    pub no_cleanup: bool,

    /// Écrire blurred.png, crushed.png et saved.png dans ce dossier.
    #[arg(long)]
    pub save_intermediates: Option<PathBuf>,

    /// Sortie JSON au lieu du texte.
    #[arg(long, default_value_t = false)]
    pub json: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Validate that exactly one plan source is provided.
    ///
    /// # Errors
    /// Returns an error if neither or both of `--image` and `--demo` are given.
    pub fn validate_source(&self) -> anyhow::Result<()> {
        let count = usize::from(self.image.is_some()) + usize::from(self.demo);

        if count == 0 {
            anyhow::bail!("Aucun plan spécifié. Utilisez --image ou --demo.");
        }
        if count > 1 {
            anyhow::bail!("Un seul plan à la fois. Spécifiez --image OU --demo.");
        }
        Ok(())
    }
}

/// Parse `x,y` (spaces allowed) into a coordinate.
fn parse_coord(s: &str) -> Result<Coord, String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("attendu « x,y », reçu « {s} »"))?;
    let x = x.trim().parse::<i32>().map_err(|e| format!("x invalide : {e}"))?;
    let y = y.trim().parse::<i32>().map_err(|e| format!("y invalide : {e}"))?;
    Ok(Coord::new(x, y))
}
