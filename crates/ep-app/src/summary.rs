use std::collections::BTreeMap;
use std::fmt::{self, Write as _};

use ep_core::Coord;
use ep_stage::{Listener, LocationReport, OpeningKind, SoundStage, distance};
use serde::Serialize;

/// Une ligne du tableau des ouvertures.
#[derive(Clone, Debug, Serialize)]
pub struct OpeningSummary {
    pub id: u32,
    pub centroid: Coord,
    pub size: usize,
    pub kind: OpeningKind,
    pub distance: f64,
    pub audible: bool,
}

/// Everything the CLI prints, in text or JSON.
#[derive(Clone, Debug, Serialize)]
pub struct PlanSummary {
    pub width: u32,
    pub height: u32,
    pub listener: Listener,
    pub openings: Vec<OpeningSummary>,
    pub played: Vec<u32>,
    pub location: LocationReport,
}

impl PlanSummary {
    #[must_use]
    pub fn new(
        stage: &SoundStage,
        listener: &Listener,
        kinds: &BTreeMap<u32, OpeningKind>,
        played: Vec<u32>,
        location: LocationReport,
    ) -> Self {
        let openings = stage
            .openings()
            .iter()
            .map(|(&id, opening)| OpeningSummary {
                id,
                centroid: opening.location(),
                size: opening.len(),
                kind: kinds
                    .get(&id)
                    .copied()
                    .unwrap_or_else(|| stage.classify(listener.position, opening)),
                distance: distance(listener.position, opening.location()),
                audible: played.contains(&id),
            })
            .collect();
        Self {
            width: stage.grid().width(),
            height: stage.grid().height(),
            listener: *listener,
            openings,
            played,
            location,
        }
    }
}

impl fmt::Display for PlanSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Plan {}×{}, {} ouverture(s)",
            self.width,
            self.height,
            self.openings.len()
        )?;
        for o in &self.openings {
            let mut line = format!(
                "  #{:<3} {:<6} centre {:<10} {:>3} px  à {:>6.1}",
                o.id,
                o.kind,
                o.centroid.to_string(),
                o.size,
                o.distance
            );
            if o.audible {
                line.push_str("  ♪");
            }
            writeln!(f, "{line}")?;
        }
        let mut played = String::new();
        for id in &self.played {
            let _ = write!(played, " #{id}");
        }
        writeln!(f, "Audibles :{}", if played.is_empty() { " aucune" } else { played.as_str() })?;
        writeln!(f)?;
        write!(f, "{}", self.location)
    }
}
