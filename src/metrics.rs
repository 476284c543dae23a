use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dataset::{SeasonData, TeamStats};
use crate::error::{EngineError, Result};

/// Every raw metric the scorer normalizes against a league baseline. Each
/// variant maps to exactly one strongly-typed field accessor, so a missing
/// stat is a compile error rather than a silent zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Metric {
    PassOffense,
    PassDefense,
    RushOffense,
    RushDefense,
    PasserRating,
    PasserRatingAllowed,
    WrProduction,
    WrProductionAllowed,
    TeProduction,
    TeProductionAllowed,
    TurnoversLost,
    TurnoversForced,
    RedZoneOffense,
    RedZoneDefense,
    ExplosiveOffense,
    ExplosiveDefense,
    PressureAllowed,
    PressureGenerated,
}

impl Metric {
    pub const ALL: [Metric; 18] = [
        Metric::PassOffense,
        Metric::PassDefense,
        Metric::RushOffense,
        Metric::RushDefense,
        Metric::PasserRating,
        Metric::PasserRatingAllowed,
        Metric::WrProduction,
        Metric::WrProductionAllowed,
        Metric::TeProduction,
        Metric::TeProductionAllowed,
        Metric::TurnoversLost,
        Metric::TurnoversForced,
        Metric::RedZoneOffense,
        Metric::RedZoneDefense,
        Metric::ExplosiveOffense,
        Metric::ExplosiveDefense,
        Metric::PressureAllowed,
        Metric::PressureGenerated,
    ];

    pub fn accessor(self) -> fn(&TeamStats) -> f64 {
        match self {
            Metric::PassOffense => |s| s.off_pass_yards_per_game,
            Metric::PassDefense => |s| s.def_pass_yards_allowed_per_game,
            Metric::RushOffense => |s| s.off_rush_yards_per_game,
            Metric::RushDefense => |s| s.def_rush_yards_allowed_per_game,
            Metric::PasserRating => |s| s.off_passer_rating,
            Metric::PasserRatingAllowed => |s| s.def_passer_rating_allowed,
            Metric::WrProduction => |s| s.off_wr_yards_per_game,
            Metric::WrProductionAllowed => |s| s.def_wr_yards_allowed_per_game,
            Metric::TeProduction => |s| s.off_te_yards_per_game,
            Metric::TeProductionAllowed => |s| s.def_te_yards_allowed_per_game,
            Metric::TurnoversLost => |s| s.off_turnovers_per_game,
            Metric::TurnoversForced => |s| s.def_turnovers_forced_per_game,
            Metric::RedZoneOffense => |s| s.off_rz_efficiency_pct,
            Metric::RedZoneDefense => |s| s.def_rz_efficiency_allowed_pct,
            Metric::ExplosiveOffense => |s| s.off_explosive_play_rate_pct,
            Metric::ExplosiveDefense => |s| s.def_explosive_play_rate_allowed_pct,
            Metric::PressureAllowed => |s| s.off_pressure_allowed_pct,
            Metric::PressureGenerated => |s| s.def_pressure_generated_pct,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Metric::PassOffense => "pass yards per game",
            Metric::PassDefense => "pass yards allowed per game",
            Metric::RushOffense => "rush yards per game",
            Metric::RushDefense => "rush yards allowed per game",
            Metric::PasserRating => "passer rating",
            Metric::PasserRatingAllowed => "passer rating allowed",
            Metric::WrProduction => "WR yards per game",
            Metric::WrProductionAllowed => "WR yards allowed per game",
            Metric::TeProduction => "TE yards per game",
            Metric::TeProductionAllowed => "TE yards allowed per game",
            Metric::TurnoversLost => "turnovers per game",
            Metric::TurnoversForced => "turnovers forced per game",
            Metric::RedZoneOffense => "red zone efficiency",
            Metric::RedZoneDefense => "red zone efficiency allowed",
            Metric::ExplosiveOffense => "explosive play rate",
            Metric::ExplosiveDefense => "explosive play rate allowed",
            Metric::PressureAllowed => "pressure rate allowed",
            Metric::PressureGenerated => "pressure rate generated",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// League-wide mean and population standard deviation for one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricBaseline {
    pub mean: f64,
    pub std_dev: f64,
}

/// Distance of `value` from the baseline mean, in standard deviations.
/// `invert` flips the sign for metrics where a lower raw value is favorable,
/// keeping "positive means good for the offense being evaluated" everywhere.
pub fn zscore(value: f64, baseline: &MetricBaseline, invert: bool) -> Result<f64> {
    if baseline.std_dev == 0.0 {
        return Err(EngineError::ZeroStdDev);
    }
    let z = (value - baseline.mean) / baseline.std_dev;
    Ok(if invert { -z } else { z })
}

/// Baselines for every metric in [`Metric::ALL`], computed across all teams
/// of one season. Validated at construction: any metric with zero spread is a
/// configuration error, so downstream z-scores can never divide by zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueBaselines {
    season: u16,
    baselines: Vec<MetricBaseline>,
}

impl LeagueBaselines {
    pub fn compute(season: &SeasonData) -> Result<Self> {
        let mut baselines = Vec::with_capacity(Metric::ALL.len());
        for metric in Metric::ALL {
            let accessor = metric.accessor();
            let values: Vec<f64> = season.teams.iter().map(|t| accessor(&t.stats)).collect();
            let baseline = population_baseline(&values);
            if baseline.std_dev == 0.0 {
                return Err(EngineError::DegenerateBaseline { metric });
            }
            baselines.push(baseline);
        }
        Ok(Self {
            season: season.season,
            baselines,
        })
    }

    pub fn season(&self) -> u16 {
        self.season
    }

    pub fn metric(&self, metric: Metric) -> &MetricBaseline {
        &self.baselines[metric.index()]
    }

    /// Z-score of a team's raw value for `metric`, looked up through the
    /// metric's typed accessor.
    pub fn zscore_of(&self, stats: &TeamStats, metric: Metric, invert: bool) -> Result<f64> {
        let value = (metric.accessor())(stats);
        zscore(value, self.metric(metric), invert).map_err(|_| EngineError::DegenerateBaseline {
            metric,
        })
    }
}

fn population_baseline(values: &[f64]) -> MetricBaseline {
    if values.is_empty() {
        return MetricBaseline {
            mean: 0.0,
            std_dev: 0.0,
        };
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    MetricBaseline {
        mean,
        std_dev: variance.sqrt(),
    }
}
