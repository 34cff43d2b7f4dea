use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use ep_core::config::{PlanConfig, load_config};
use ep_core::{ColorCatalog, Coord, Grid};
use ep_source::CleanupPipeline;
use ep_source::image::{grid_from_image, load_image};
use ep_stage::{Listener, LocationReport, LogAudio, SoundStage};

pub mod cli;
pub mod demo;
pub mod summary;

fn main() -> Result<()> {
    // 1. Parser CLI
    let cli = cli::Cli::parse();

    // 2. Initialiser le logging
    env_logger::Builder::new()
        .filter_level(cli.log_level.parse().unwrap_or(log::LevelFilter::Warn))
        .init();

    // 3. Valider la source
    cli.validate_source()?;

    // 4. Charger la config, puis les overrides CLI
    let mut config = resolve_config(&cli)?;
    if let Some(facing) = cli.facing {
        config.stage.facing = facing;
    }
    if let Some(ref dir) = cli.save_intermediates {
        config.pipeline.intermediates_dir = Some(dir.clone());
    }
    let catalog = Arc::new(config.catalog()?);

    // 5. Construire la grille
    let grid = build_grid(&cli, &config, catalog)?;
    log::info!("grille {}×{} prête", grid.width(), grid.height());

    // 6. Placer l'auditeur
    let position = cli.listener.unwrap_or_else(|| {
        Coord::new((grid.width() / 2) as i32, (grid.height() / 2) as i32)
    });
    let mut listener = Listener::new(position, config.stage.facing);
    for key in cli.turn.as_deref().unwrap_or_default().chars() {
        match listener.turn_key(key) {
            Some(facing) => log::info!("{}", LocationReport::turn_sentence(facing)),
            None => log::warn!("Touche de rotation ignorée : '{key}'"),
        }
    }

    // 7. Scène sonore
    let mut stage = SoundStage::new(grid, config.stage.clone());
    let mut audio = LogAudio::default();
    let kinds = stage.prepare(&listener, &mut audio)?;
    let played = stage.play(&listener, &mut audio)?;
    let location = stage.report(&listener)?;

    // 8. Rapport
    let summary = summary::PlanSummary::new(&stage, &listener, &kinds, played, location);
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{summary}");
    }
    Ok(())
}

/// Demo plan, raw image, or cleaned image.
fn build_grid(cli: &cli::Cli, config: &PlanConfig, catalog: Arc<ColorCatalog>) -> Result<Grid> {
    let Some(ref path) = cli.image else {
        return demo::sample_plan(catalog);
    };
    let raw = load_image(path)?;
    if cli.no_cleanup {
        return grid_from_image(&raw, catalog)
            .with_context(|| format!("Plan inutilisable tel quel : {}", path.display()));
    }
    CleanupPipeline::new(config.pipeline.clone()).run(&raw, catalog)
}

/// Resolve config: --config if it exists, defaults otherwise.
fn resolve_config(cli: &cli::Cli) -> Result<PlanConfig> {
    if cli.config.exists() {
        load_config(&cli.config)
    } else {
        log::warn!(
            "Config introuvable : {}. Utilisation des défauts.",
            cli.config.display()
        );
        Ok(PlanConfig::default())
    }
}
