use gridiron_sim::config::SimConfig;
use gridiron_sim::dataset::LeagueDataset;
use gridiron_sim::monte_carlo::{MatchupEngine, SimulationRequest};
use gridiron_sim::situation::{SituationalInputs, VolatilityTier};
use once_cell::sync::Lazy;

pub const SEASON: u16 = 2025;

static LEAGUE_JSON: &str = include_str!("../fixtures/league.json");

pub static DATASET: Lazy<LeagueDataset> =
    Lazy::new(|| serde_json::from_str(LEAGUE_JSON).expect("league fixture parses"));

pub fn engine(iterations: usize, volatility: VolatilityTier) -> MatchupEngine {
    let config = SimConfig {
        iterations,
        volatility,
        ..SimConfig::default()
    };
    MatchupEngine::new(DATASET.clone(), config)
}

pub fn request(team_a: &str, team_b: &str) -> SimulationRequest {
    SimulationRequest {
        season: SEASON,
        team_a: team_a.to_string(),
        team_b: team_b.to_string(),
        situation: SituationalInputs::default(),
    }
}
