use serde::{Deserialize, Serialize};

/// Per-game statistical profile for one team in one season. All rates are
/// per-game or percentage figures as published by the stats provider.
///
/// This is the immutable source of truth: adjustment passes clone it and
/// return the clone, the original is never written after load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStats {
    // Offense
    pub off_points_per_game: f64,
    pub off_pass_yards_per_game: f64,
    pub off_rush_yards_per_game: f64,
    pub off_passer_rating: f64,
    pub off_wr_yards_per_game: f64,
    pub off_te_yards_per_game: f64,
    pub off_turnovers_per_game: f64,
    pub off_rz_efficiency_pct: f64,
    pub off_explosive_play_rate_pct: f64,
    pub off_pressure_allowed_pct: f64,
    pub off_third_down_pct: f64,
    pub off_fourth_down_pct: f64,
    pub off_penalties_per_game: f64,
    pub off_avg_starting_field_pos: f64,

    // Defense
    pub def_points_allowed_per_game: f64,
    pub def_pass_yards_allowed_per_game: f64,
    pub def_rush_yards_allowed_per_game: f64,
    pub def_passer_rating_allowed: f64,
    pub def_wr_yards_allowed_per_game: f64,
    pub def_te_yards_allowed_per_game: f64,
    pub def_turnovers_forced_per_game: f64,
    pub def_rz_efficiency_allowed_pct: f64,
    pub def_explosive_play_rate_allowed_pct: f64,
    pub def_pressure_generated_pct: f64,
    pub def_third_down_allowed_pct: f64,
    pub def_fourth_down_allowed_pct: f64,
    pub def_penalties_per_game: f64,
    pub def_avg_starting_field_pos_allowed: f64,

    /// Schedule difficulty rating, roughly in "rating points" where 0 is a
    /// league-average slate. Positive means the team faced a tough schedule.
    #[serde(default)]
    pub schedule_strength: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamStatProfile {
    pub team_id: String,
    pub team_name: String,
    pub stats: TeamStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonData {
    pub season: u16,
    pub teams: Vec<TeamStatProfile>,
}

impl SeasonData {
    pub fn team(&self, team_id: &str) -> Option<&TeamStatProfile> {
        self.teams.iter().find(|t| t.team_id == team_id)
    }
}

/// Already-parsed league data handed in by the caller. The engine defines the
/// in-memory shape only; acquiring and decoding the data is the caller's
/// problem.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueDataset {
    pub seasons: Vec<SeasonData>,
}

impl LeagueDataset {
    pub fn season(&self, season: u16) -> Option<&SeasonData> {
        self.seasons.iter().find(|s| s.season == season)
    }

    /// Most recent season in the dataset, if any.
    pub fn latest_season(&self) -> Option<&SeasonData> {
        self.seasons.iter().max_by_key(|s| s.season)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// A league-average profile. Unit tests derive variations from this via
    /// `shifted` so every metric keeps a non-degenerate spread.
    pub(crate) fn average_stats() -> TeamStats {
        TeamStats {
            off_points_per_game: 22.5,
            off_pass_yards_per_game: 220.0,
            off_rush_yards_per_game: 115.0,
            off_passer_rating: 90.0,
            off_wr_yards_per_game: 145.0,
            off_te_yards_per_game: 55.0,
            off_turnovers_per_game: 1.3,
            off_rz_efficiency_pct: 55.0,
            off_explosive_play_rate_pct: 9.0,
            off_pressure_allowed_pct: 22.0,
            off_third_down_pct: 40.0,
            off_fourth_down_pct: 50.0,
            off_penalties_per_game: 6.5,
            off_avg_starting_field_pos: 28.5,
            def_points_allowed_per_game: 22.5,
            def_pass_yards_allowed_per_game: 220.0,
            def_rush_yards_allowed_per_game: 115.0,
            def_passer_rating_allowed: 90.0,
            def_wr_yards_allowed_per_game: 145.0,
            def_te_yards_allowed_per_game: 55.0,
            def_turnovers_forced_per_game: 1.3,
            def_rz_efficiency_allowed_pct: 55.0,
            def_explosive_play_rate_allowed_pct: 9.0,
            def_pressure_generated_pct: 22.0,
            def_third_down_allowed_pct: 40.0,
            def_fourth_down_allowed_pct: 50.0,
            def_penalties_per_game: 6.5,
            def_avg_starting_field_pos_allowed: 28.5,
            schedule_strength: 0.0,
        }
    }

    /// Every field moved by `steps` small increments so that a set of teams
    /// built from different steps has strictly positive spread everywhere.
    pub(crate) fn shifted(steps: f64) -> TeamStats {
        let base = average_stats();
        TeamStats {
            off_points_per_game: base.off_points_per_game + 1.5 * steps,
            off_pass_yards_per_game: base.off_pass_yards_per_game + 12.0 * steps,
            off_rush_yards_per_game: base.off_rush_yards_per_game + 8.0 * steps,
            off_passer_rating: base.off_passer_rating + 3.0 * steps,
            off_wr_yards_per_game: base.off_wr_yards_per_game + 9.0 * steps,
            off_te_yards_per_game: base.off_te_yards_per_game + 4.0 * steps,
            off_turnovers_per_game: base.off_turnovers_per_game - 0.1 * steps,
            off_rz_efficiency_pct: base.off_rz_efficiency_pct + 2.0 * steps,
            off_explosive_play_rate_pct: base.off_explosive_play_rate_pct + 0.6 * steps,
            off_pressure_allowed_pct: base.off_pressure_allowed_pct - 1.0 * steps,
            off_third_down_pct: base.off_third_down_pct + 1.2 * steps,
            off_fourth_down_pct: base.off_fourth_down_pct + 1.5 * steps,
            off_penalties_per_game: base.off_penalties_per_game - 0.2 * steps,
            off_avg_starting_field_pos: base.off_avg_starting_field_pos + 0.4 * steps,
            def_points_allowed_per_game: base.def_points_allowed_per_game - 1.5 * steps,
            def_pass_yards_allowed_per_game: base.def_pass_yards_allowed_per_game - 10.0 * steps,
            def_rush_yards_allowed_per_game: base.def_rush_yards_allowed_per_game - 6.0 * steps,
            def_passer_rating_allowed: base.def_passer_rating_allowed - 2.5 * steps,
            def_wr_yards_allowed_per_game: base.def_wr_yards_allowed_per_game - 7.0 * steps,
            def_te_yards_allowed_per_game: base.def_te_yards_allowed_per_game - 3.0 * steps,
            def_turnovers_forced_per_game: base.def_turnovers_forced_per_game + 0.12 * steps,
            def_rz_efficiency_allowed_pct: base.def_rz_efficiency_allowed_pct - 1.8 * steps,
            def_explosive_play_rate_allowed_pct: base.def_explosive_play_rate_allowed_pct
                - 0.5 * steps,
            def_pressure_generated_pct: base.def_pressure_generated_pct + 1.1 * steps,
            def_third_down_allowed_pct: base.def_third_down_allowed_pct - 1.0 * steps,
            def_fourth_down_allowed_pct: base.def_fourth_down_allowed_pct - 1.3 * steps,
            def_penalties_per_game: base.def_penalties_per_game + 0.15 * steps,
            def_avg_starting_field_pos_allowed: base.def_avg_starting_field_pos_allowed
                - 0.3 * steps,
            schedule_strength: 0.2 * steps,
        }
    }

    pub(crate) fn profile(team_id: &str, steps: f64) -> TeamStatProfile {
        TeamStatProfile {
            team_id: team_id.to_string(),
            team_name: format!("Team {team_id}"),
            stats: shifted(steps),
        }
    }

    /// Six-team season with spread on every metric.
    pub(crate) fn season() -> SeasonData {
        SeasonData {
            season: 2025,
            teams: vec![
                profile("AAA", -2.0),
                profile("BBB", -1.0),
                profile("CCC", -0.3),
                profile("DDD", 0.3),
                profile("EEE", 1.0),
                profile("FFF", 2.0),
            ],
        }
    }

    pub(crate) fn dataset() -> LeagueDataset {
        LeagueDataset {
            seasons: vec![season()],
        }
    }
}
