use crate::domain::models::TournamentTier;

/// Base points for the top eight finishers, indexed by `placement - 1`
const BASE_POINTS: [u32; 8] = [100, 75, 50, 50, 25, 25, 25, 25];

/// Flat base for placements 9 through 16
const ROUND_OF_16_POINTS: u32 = 10;
const LAST_SCORING_PLACEMENT: u32 = 16;

impl TournamentTier {
    /// Multiplier applied to base points
    pub fn multiplier(&self) -> f64 {
        f64::from(self.multiplier_halves()) / 2.0
    }

    // Every multiplier is a multiple of 0.5, so points are computed
    // in integer halves and floored by the final division.
    fn multiplier_halves(&self) -> u32 {
        match self {
            TournamentTier::Major => 4,
            TournamentTier::Ppa => 3,
            TournamentTier::Mlp => 3,
            TournamentTier::App => 2,
            TournamentTier::Other => 1,
        }
    }
}

/// Points earned for a finish; unmapped placements score zero.
///
/// Computed once when a match result is ingested and stored with it.
pub fn calculate_points(placement: u32, tier: TournamentTier) -> u32 {
    base_points(placement) * tier.multiplier_halves() / 2
}

fn base_points(placement: u32) -> u32 {
    match placement {
        0 => 0,
        1..=8 => BASE_POINTS[(placement - 1) as usize],
        9..=LAST_SCORING_PLACEMENT => ROUND_OF_16_POINTS,
        _ => 0,
    }
}

/// Display label for a placement. Only 1, 2 and 3 get special suffixes;
/// everything else, 21 and 22 included, ends in "th".
pub fn placement_label(placement: u32) -> String {
    match placement {
        1 => "1st".to_string(),
        2 => "2nd".to_string(),
        3 => "3rd".to_string(),
        n => format!("{}th", n),
    }
}
