use serde::{Deserialize, Serialize};

use crate::config::SimConfig;
use crate::dataset::{TeamStatProfile, TeamStats};
use crate::situation::{
    DefensiveRole, InjurySeverity, Position, PrecipLevel, SituationalInputs, TeamInjuryReport,
    WindLevel,
};

/// Stat families the adjustment overlays can touch. Each maps to exactly one
/// profile field; families an overlay does not name are left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatFamily {
    PassVolume,
    RushVolume,
    RedZone,
    Explosive,
    PressureAllowed,
    TurnoverRate,
    PressureGenerated,
    RushDefense,
    PassDefense,
    ExplosiveDefense,
}

const FAMILY_COUNT: usize = 10;

impl StatFamily {
    fn index(self) -> usize {
        self as usize
    }
}

/// Multiplier accumulator across all adjustment passes. Starts at identity;
/// passes compose multiplicatively.
#[derive(Debug, Clone, Copy)]
struct FamilyMultipliers([f64; FAMILY_COUNT]);

impl FamilyMultipliers {
    fn identity() -> Self {
        Self([1.0; FAMILY_COUNT])
    }

    fn scale(&mut self, family: StatFamily, factor: f64) {
        self.0[family.index()] *= factor;
    }

    fn get(&self, family: StatFamily) -> f64 {
        self.0[family.index()]
    }
}

/// Per-position multiplier triples indexed by severity level [healthy,
/// questionable, out]. Derived from historical EPA and success-rate splits.
fn injury_table(position: Position) -> &'static [(StatFamily, [f64; 3])] {
    match position {
        // Backup QBs throw shorter and hold the ball longer.
        Position::Qb => &[
            (StatFamily::PassVolume, [1.0, 0.90, 0.75]),
            (StatFamily::RedZone, [1.0, 0.88, 0.82]),
            (StatFamily::Explosive, [1.0, 0.82, 0.65]),
            (StatFamily::PressureAllowed, [1.0, 1.10, 1.25]),
        ],
        Position::Rb => &[
            (StatFamily::RushVolume, [1.0, 0.97, 0.92]),
            (StatFamily::PassVolume, [1.0, 0.98, 0.90]),
            (StatFamily::Explosive, [1.0, 0.90, 0.80]),
            (StatFamily::RedZone, [1.0, 0.95, 0.88]),
            (StatFamily::PressureAllowed, [1.0, 1.05, 1.12]),
        ],
        Position::Wr => &[
            (StatFamily::PassVolume, [1.0, 0.95, 0.90]),
            (StatFamily::RedZone, [1.0, 0.98, 0.95]),
            (StatFamily::Explosive, [1.0, 0.88, 0.78]),
        ],
        Position::Te => &[
            (StatFamily::PassVolume, [1.0, 0.98, 0.95]),
            (StatFamily::RedZone, [1.0, 0.90, 0.80]),
            (StatFamily::Explosive, [1.0, 0.97, 0.95]),
            (StatFamily::PressureAllowed, [1.0, 1.03, 1.08]),
        ],
        Position::OffensiveLine => &[
            (StatFamily::RushVolume, [1.0, 0.95, 0.88]),
            (StatFamily::PassVolume, [1.0, 0.97, 0.92]),
            (StatFamily::Explosive, [1.0, 0.92, 0.80]),
            (StatFamily::RedZone, [1.0, 0.95, 0.90]),
            (StatFamily::PressureAllowed, [1.0, 1.08, 1.22]),
        ],
        Position::DefensiveLine => &[
            (StatFamily::PressureGenerated, [1.0, 0.95, 0.85]),
            (StatFamily::RushDefense, [1.0, 1.05, 1.12]),
        ],
        Position::Secondary => &[
            (StatFamily::PassDefense, [1.0, 1.04, 1.10]),
            (StatFamily::ExplosiveDefense, [1.0, 1.08, 1.18]),
        ],
    }
}

// Non-linear unit-collapse penalties, composed on top of the individual
// multipliers with fixed values (not re-derived from the adjusted stat).
const OL_CLIFF_STARTERS_OUT: usize = 3;
const OL_CLIFF_PASS_VOLUME: f64 = 0.85;
const OL_CLIFF_PRESSURE_ALLOWED: f64 = 1.25;
const OL_CLIFF_EXPLOSIVE: f64 = 0.80;
const SECONDARY_CLIFF_EXPLOSIVE_DEF: f64 = 1.15;
const SECONDARY_CLIFF_PASS_DEF: f64 = 1.08;

/// A team profile after schedule-strength, injury, and weather multipliers.
/// Derived and ephemeral; recomputed every run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustedStatProfile {
    pub team_id: String,
    pub team_name: String,
    pub stats: TeamStats,
}

/// Apply the full adjustment pipeline to one team:
/// schedule strength, then individual injuries, then collapse cliffs, then
/// weather. The input profile is cloned, never mutated.
pub fn adjust(
    profile: &TeamStatProfile,
    injuries: &TeamInjuryReport,
    situation: &SituationalInputs,
    config: &SimConfig,
) -> AdjustedStatProfile {
    let mut stats = profile.stats.clone();

    if config.sos_enabled {
        apply_schedule_strength(&mut stats, config.sos_factor_per_point);
    }

    let mut mults = FamilyMultipliers::identity();
    apply_individual_injuries(&mut mults, injuries);
    apply_cliffs(&mut mults, injuries, &profile.team_id);
    apply_weather(&mut mults, situation);
    apply_families(&mut stats, &mults);

    AdjustedStatProfile {
        team_id: profile.team_id.clone(),
        team_name: profile.team_name.clone(),
        stats,
    }
}

/// Teams that faced a tough slate get their offensive volume revised up and
/// their defensive-allowed figures revised down, linearly per rating point.
fn apply_schedule_strength(stats: &mut TeamStats, factor_per_point: f64) {
    let rating = stats.schedule_strength;
    if rating == 0.0 {
        return;
    }
    let up = 1.0 + factor_per_point * rating;
    let down = 1.0 - factor_per_point * rating;

    stats.off_points_per_game *= up;
    stats.off_pass_yards_per_game *= up;
    stats.off_rush_yards_per_game *= up;
    stats.off_wr_yards_per_game *= up;
    stats.off_te_yards_per_game *= up;

    stats.def_points_allowed_per_game *= down;
    stats.def_pass_yards_allowed_per_game *= down;
    stats.def_rush_yards_allowed_per_game *= down;
    stats.def_wr_yards_allowed_per_game *= down;
    stats.def_te_yards_allowed_per_game *= down;
}

fn apply_individual_injuries(mults: &mut FamilyMultipliers, injuries: &TeamInjuryReport) {
    for entry in &injuries.entries {
        if entry.severity == InjurySeverity::Healthy {
            continue;
        }
        let level = entry.severity.level();
        for (family, triple) in injury_table(entry.position) {
            mults.scale(*family, triple[level]);
        }
    }
}

fn apply_cliffs(mults: &mut FamilyMultipliers, injuries: &TeamInjuryReport, team_id: &str) {
    if injuries.out_count(Position::OffensiveLine) >= OL_CLIFF_STARTERS_OUT {
        log::debug!("{team_id}: offensive line collapse cliff triggered");
        mults.scale(StatFamily::PassVolume, OL_CLIFF_PASS_VOLUME);
        mults.scale(StatFamily::PressureAllowed, OL_CLIFF_PRESSURE_ALLOWED);
        mults.scale(StatFamily::Explosive, OL_CLIFF_EXPLOSIVE);
    }

    let cb1 = injuries.role_out(DefensiveRole::Cb1);
    let collapse =
        (cb1 && injuries.role_out(DefensiveRole::Cb2)) || (cb1 && injuries.role_out(DefensiveRole::S1));
    if collapse {
        log::debug!("{team_id}: secondary collapse cliff triggered");
        mults.scale(StatFamily::ExplosiveDefense, SECONDARY_CLIFF_EXPLOSIVE_DEF);
        mults.scale(StatFamily::PassDefense, SECONDARY_CLIFF_PASS_DEF);
    }
}

/// Wind and precipitation suppress the passing game and raise the turnover
/// rate. Rushing is not boosted; suppressing passing already tilts the
/// weighted delta toward ground games.
fn apply_weather(mults: &mut FamilyMultipliers, situation: &SituationalInputs) {
    match situation.wind {
        WindLevel::Calm => {}
        WindLevel::Medium => {
            mults.scale(StatFamily::PassVolume, 0.95);
            mults.scale(StatFamily::Explosive, 0.90);
        }
        WindLevel::High => {
            mults.scale(StatFamily::PassVolume, 0.85);
            mults.scale(StatFamily::Explosive, 0.75);
            mults.scale(StatFamily::TurnoverRate, 1.08);
        }
    }

    match situation.precipitation {
        PrecipLevel::Dry => {}
        PrecipLevel::Light => {
            mults.scale(StatFamily::PassVolume, 0.97);
            mults.scale(StatFamily::Explosive, 0.95);
            mults.scale(StatFamily::TurnoverRate, 1.05);
        }
        PrecipLevel::Heavy => {
            mults.scale(StatFamily::PassVolume, 0.92);
            mults.scale(StatFamily::Explosive, 0.88);
            mults.scale(StatFamily::TurnoverRate, 1.12);
        }
    }
}

fn apply_families(stats: &mut TeamStats, mults: &FamilyMultipliers) {
    stats.off_pass_yards_per_game *= mults.get(StatFamily::PassVolume);
    stats.off_rush_yards_per_game *= mults.get(StatFamily::RushVolume);
    stats.off_rz_efficiency_pct *= mults.get(StatFamily::RedZone);
    stats.off_explosive_play_rate_pct *= mults.get(StatFamily::Explosive);
    stats.off_pressure_allowed_pct *= mults.get(StatFamily::PressureAllowed);
    stats.off_turnovers_per_game *= mults.get(StatFamily::TurnoverRate);

    stats.def_pressure_generated_pct *= mults.get(StatFamily::PressureGenerated);
    stats.def_rush_yards_allowed_per_game *= mults.get(StatFamily::RushDefense);
    stats.def_pass_yards_allowed_per_game *= mults.get(StatFamily::PassDefense);
    stats.def_explosive_play_rate_allowed_pct *= mults.get(StatFamily::ExplosiveDefense);
}
