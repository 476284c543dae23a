use serde::{Deserialize, Serialize};

/// Which sideline hosts the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HomeField {
    TeamA,
    #[default]
    Neutral,
    TeamB,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TravelBurden {
    #[default]
    None,
    TeamATravels,
    TeamBTravels,
}

/// Days of preparation relative to a normal week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RestGap {
    /// Short week (Thursday game after a Sunday).
    Short,
    #[default]
    Standard,
    /// Coming off a bye.
    Bye,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MomentumSide {
    TeamA,
    #[default]
    None,
    TeamB,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StakesTier {
    #[default]
    RegularSeason,
    PlayoffRound,
    Championship,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum WindLevel {
    #[default]
    Calm,
    Medium,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PrecipLevel {
    #[default]
    Dry,
    Light,
    Heavy,
}

/// Position groups the injury tables know about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Qb,
    Rb,
    Wr,
    Te,
    OffensiveLine,
    DefensiveLine,
    Secondary,
}

/// 0 = healthy, 1 = questionable, 2 = out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum InjurySeverity {
    #[default]
    Healthy,
    Questionable,
    Out,
}

impl InjurySeverity {
    /// Index into the per-family multiplier triples.
    pub fn level(self) -> usize {
        match self {
            InjurySeverity::Healthy => 0,
            InjurySeverity::Questionable => 1,
            InjurySeverity::Out => 2,
        }
    }

    /// For callers mapping raw 0/1/2 input widgets.
    pub fn from_level(level: u8) -> Option<Self> {
        match level {
            0 => Some(InjurySeverity::Healthy),
            1 => Some(InjurySeverity::Questionable),
            2 => Some(InjurySeverity::Out),
            _ => None,
        }
    }
}

/// Named defensive backfield roles tracked for the secondary collapse cliff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DefensiveRole {
    Cb1,
    Cb2,
    S1,
}

/// One injured player (or position-group designation). Multiple entries per
/// position are allowed; the offensive-line cliff counts them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InjuryEntry {
    pub position: Position,
    pub severity: InjurySeverity,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<DefensiveRole>,
}

impl InjuryEntry {
    pub fn new(position: Position, severity: InjurySeverity) -> Self {
        Self {
            position,
            severity,
            role: None,
        }
    }

    pub fn with_role(position: Position, severity: InjurySeverity, role: DefensiveRole) -> Self {
        Self {
            position,
            severity,
            role: Some(role),
        }
    }
}

/// A team's injury situation for one matchup.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TeamInjuryReport {
    pub entries: Vec<InjuryEntry>,
}

impl TeamInjuryReport {
    pub fn healthy() -> Self {
        Self::default()
    }

    pub fn new(entries: Vec<InjuryEntry>) -> Self {
        Self { entries }
    }

    /// Number of entries at the given position that are fully out.
    pub fn out_count(&self, position: Position) -> usize {
        self.entries
            .iter()
            .filter(|e| e.position == position && e.severity == InjurySeverity::Out)
            .count()
    }

    /// Whether the named defensive role is out.
    pub fn role_out(&self, role: DefensiveRole) -> bool {
        self.entries
            .iter()
            .any(|e| e.role == Some(role) && e.severity == InjurySeverity::Out)
    }
}

/// One matchup's contextual knobs, supplied wholesale per simulation request
/// and never mutated mid-run.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SituationalInputs {
    pub home_field: HomeField,
    pub travel: TravelBurden,
    pub rest_a: RestGap,
    pub rest_b: RestGap,
    pub momentum: MomentumSide,
    pub division_rivalry: bool,
    pub stakes: StakesTier,
    pub wind: WindLevel,
    pub precipitation: PrecipLevel,
    pub injuries_a: TeamInjuryReport,
    pub injuries_b: TeamInjuryReport,
}

/// Named noise presets. The numeric spread is the standard deviation of the
/// Gaussian drawn per side per category in each trial.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum VolatilityTier {
    /// Chalky league stretch, little week-to-week swing.
    Stable,
    #[default]
    Realistic,
    /// Anything-can-happen mode.
    Chaos,
    /// Explicit spread for callers tuning their own deployment.
    Custom(f64),
}

impl VolatilityTier {
    pub fn noise_level(self) -> f64 {
        match self {
            VolatilityTier::Stable => 0.15,
            VolatilityTier::Realistic => 0.25,
            VolatilityTier::Chaos => 0.50,
            VolatilityTier::Custom(level) => level.max(0.0),
        }
    }
}
