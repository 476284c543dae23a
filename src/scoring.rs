use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use crate::config::{CategoryWeights, ContextConfig, SimConfig};
use crate::dataset::TeamStats;
use crate::error::Result;
use crate::metrics::{LeagueBaselines, Metric};
use crate::situation::{
    HomeField, MomentumSide, RestGap, SituationalInputs, StakesTier, TravelBurden,
};

/// The weighted matchup categories. Fixed set; each pairs one offensive
/// metric of the team under evaluation against one defensive metric of its
/// opponent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    PassVolume,
    Rush,
    QbEfficiency,
    WrProduction,
    TeProduction,
    Turnovers,
    RedZone,
    ExplosivePlays,
    Pressure,
}

impl Category {
    pub const ALL: [Category; 9] = [
        Category::PassVolume,
        Category::Rush,
        Category::QbEfficiency,
        Category::WrProduction,
        Category::TeProduction,
        Category::Turnovers,
        Category::RedZone,
        Category::ExplosivePlays,
        Category::Pressure,
    ];

    pub fn offense_metric(self) -> Metric {
        match self {
            Category::PassVolume => Metric::PassOffense,
            Category::Rush => Metric::RushOffense,
            Category::QbEfficiency => Metric::PasserRating,
            Category::WrProduction => Metric::WrProduction,
            Category::TeProduction => Metric::TeProduction,
            Category::Turnovers => Metric::TurnoversLost,
            Category::RedZone => Metric::RedZoneOffense,
            Category::ExplosivePlays => Metric::ExplosiveOffense,
            Category::Pressure => Metric::PressureAllowed,
        }
    }

    pub fn defense_metric(self) -> Metric {
        match self {
            Category::PassVolume => Metric::PassDefense,
            Category::Rush => Metric::RushDefense,
            Category::QbEfficiency => Metric::PasserRatingAllowed,
            Category::WrProduction => Metric::WrProductionAllowed,
            Category::TeProduction => Metric::TeProductionAllowed,
            Category::Turnovers => Metric::TurnoversForced,
            Category::RedZone => Metric::RedZoneDefense,
            Category::ExplosivePlays => Metric::ExplosiveDefense,
            Category::Pressure => Metric::PressureGenerated,
        }
    }

    /// Turnovers lost and pressure allowed are "lower is better" for the
    /// offense, so their z-scores flip to keep positive favorable.
    pub fn offense_inverted(self) -> bool {
        matches!(self, Category::Turnovers | Category::Pressure)
    }

    /// "Allowed" defensive metrics invert (less allowed = stronger defense).
    /// Turnovers forced and pressure generated already point the right way.
    pub fn defense_inverted(self) -> bool {
        !matches!(self, Category::Turnovers | Category::Pressure)
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::PassVolume => "passing volume",
            Category::Rush => "rushing",
            Category::QbEfficiency => "QB efficiency",
            Category::WrProduction => "WR production",
            Category::TeProduction => "TE production",
            Category::Turnovers => "turnovers",
            Category::RedZone => "red zone",
            Category::ExplosivePlays => "explosive plays",
            Category::Pressure => "pressure",
        }
    }
}

/// Norm that brings the weighted category sum back to unit-ish standard
/// deviation: the Euclidean norm of the weight vector times sqrt(2), because
/// every category draws two independent noise terms (one per side).
pub fn normalization_factor(weights: &CategoryWeights) -> f64 {
    weights.euclidean_norm() * std::f64::consts::SQRT_2
}

/// Baseline (zero-noise) advantage of one category, with its weighted
/// contribution to the delta. Narrative/x-factor material.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryAdvantage {
    pub category: Category,
    pub advantage: f64,
    pub weighted: f64,
}

/// Scores one orientation of a matchup: the evaluated team's offense against
/// the opponent's defense. Built once per run against fixed baselines.
pub struct Scorer<'a> {
    baselines: &'a LeagueBaselines,
    weights: &'a CategoryWeights,
    norm: f64,
    red_zone_threshold: f64,
    red_zone_amplifier: f64,
}

impl<'a> Scorer<'a> {
    pub fn new(baselines: &'a LeagueBaselines, config: &'a SimConfig) -> Self {
        Self {
            baselines,
            weights: &config.weights,
            norm: normalization_factor(&config.weights),
            red_zone_threshold: config.red_zone_threshold,
            red_zone_amplifier: config.red_zone_amplifier,
        }
    }

    fn advantage<R: Rng>(
        &self,
        category: Category,
        team: &TeamStats,
        opponent: &TeamStats,
        noise_level: f64,
        rng: &mut R,
    ) -> Result<f64> {
        let off = self.baselines.zscore_of(
            team,
            category.offense_metric(),
            category.offense_inverted(),
        )?;
        let def = self.baselines.zscore_of(
            opponent,
            category.defense_metric(),
            category.defense_inverted(),
        )?;
        if noise_level > 0.0 {
            let n_off: f64 = rng.sample(StandardNormal);
            let n_def: f64 = rng.sample(StandardNormal);
            Ok((off + noise_level * n_off) - (def + noise_level * n_def))
        } else {
            Ok(off - def)
        }
    }

    /// One trial's normalized delta for `team` evaluated against `opponent`.
    /// With `noise_level == 0` this is deterministic and bit-stable.
    pub fn score_trial<R: Rng>(
        &self,
        team: &TeamStats,
        opponent: &TeamStats,
        noise_level: f64,
        rng: &mut R,
    ) -> Result<f64> {
        let mut raw = 0.0;
        let mut red_zone_adv = 0.0;
        for category in Category::ALL {
            let adv = self.advantage(category, team, opponent, noise_level, rng)?;
            if category == Category::RedZone {
                red_zone_adv = adv;
            }
            raw += adv * self.weights.weight(category);
        }
        let mut delta = raw / self.norm;

        // Red-zone leverage: a clear territorial edge pointing the same way
        // as the overall delta converts to points disproportionately.
        if red_zone_adv.abs() > self.red_zone_threshold && red_zone_adv * delta > 0.0 {
            delta *= self.red_zone_amplifier;
        }
        Ok(delta)
    }

    /// Zero-noise advantage of every category, for the baseline breakdown.
    pub fn baseline_advantages(
        &self,
        team: &TeamStats,
        opponent: &TeamStats,
    ) -> Result<Vec<CategoryAdvantage>> {
        let mut rng = rand::thread_rng();
        Category::ALL
            .iter()
            .map(|&category| {
                let advantage = self.advantage(category, team, opponent, 0.0, &mut rng)?;
                Ok(CategoryAdvantage {
                    category,
                    advantage,
                    weighted: advantage * self.weights.weight(category),
                })
            })
            .collect()
    }
}

/// Trial-invariant matchup context, computed once per run: an additive edge
/// in normalized delta units and a multiplicative spread compressor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextTerms {
    pub additive: f64,
    pub compression: f64,
}

impl ContextTerms {
    pub fn compute(situation: &SituationalInputs, config: &ContextConfig) -> Self {
        let mut additive = 0.0;

        match situation.home_field {
            HomeField::TeamA => additive += config.home_field_edge,
            HomeField::TeamB => additive -= config.home_field_edge,
            HomeField::Neutral => {}
        }
        match situation.travel {
            TravelBurden::TeamATravels => additive -= config.travel_penalty,
            TravelBurden::TeamBTravels => additive += config.travel_penalty,
            TravelBurden::None => {}
        }
        match situation.momentum {
            MomentumSide::TeamA => additive += config.momentum_edge,
            MomentumSide::TeamB => additive -= config.momentum_edge,
            MomentumSide::None => {}
        }
        additive += rest_term(situation.rest_a, config) - rest_term(situation.rest_b, config);

        let mut compression = match situation.stakes {
            StakesTier::RegularSeason => 1.0,
            StakesTier::PlayoffRound => config.playoff_compression,
            StakesTier::Championship => config.championship_compression,
        };
        if situation.division_rivalry {
            compression *= config.division_compression;
        }

        Self {
            additive,
            compression,
        }
    }

    /// Fold the context into one trial's combined scorer delta.
    pub fn finalize(&self, combined_delta: f64) -> f64 {
        (combined_delta + self.additive) * self.compression
    }
}

fn rest_term(rest: RestGap, config: &ContextConfig) -> f64 {
    match rest {
        RestGap::Short => -config.short_week_penalty,
        RestGap::Standard => 0.0,
        RestGap::Bye => config.bye_week_bonus,
    }
}
