use serde::{Deserialize, Serialize};

use crate::scoring::Category;
use crate::situation::VolatilityTier;

/// Per-category impact weights. Defaults reflect the calibrated production
/// weighting: turnovers dominate, volume stats matter less than efficiency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeights {
    pub pass_volume: f64,
    pub rush: f64,
    pub qb: f64,
    pub wr: f64,
    pub te: f64,
    pub turnover: f64,
    pub red_zone: f64,
    pub explosive: f64,
    pub pressure: f64,
}

impl Default for CategoryWeights {
    fn default() -> Self {
        Self {
            pass_volume: 0.30,
            rush: 0.85,
            qb: 0.55,
            wr: 0.20,
            te: 0.20,
            turnover: 1.50,
            red_zone: 0.70,
            explosive: 0.40,
            pressure: 0.50,
        }
    }
}

impl CategoryWeights {
    pub fn weight(&self, category: Category) -> f64 {
        match category {
            Category::PassVolume => self.pass_volume,
            Category::Rush => self.rush,
            Category::QbEfficiency => self.qb,
            Category::WrProduction => self.wr,
            Category::TeProduction => self.te,
            Category::Turnovers => self.turnover,
            Category::RedZone => self.red_zone,
            Category::ExplosivePlays => self.explosive,
            Category::Pressure => self.pressure,
        }
    }

    pub fn euclidean_norm(&self) -> f64 {
        Category::ALL
            .iter()
            .map(|c| self.weight(*c).powi(2))
            .sum::<f64>()
            .sqrt()
    }
}

/// Trial-invariant context terms: additive edges in normalized delta units
/// and multiplicative spread compressors for familiar/high-stakes games.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContextConfig {
    pub home_field_edge: f64,
    pub travel_penalty: f64,
    pub momentum_edge: f64,
    pub short_week_penalty: f64,
    pub bye_week_bonus: f64,
    /// Division opponents know each other; spreads compress.
    pub division_compression: f64,
    pub playoff_compression: f64,
    pub championship_compression: f64,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            home_field_edge: 0.05,
            travel_penalty: 0.03,
            momentum_edge: 0.03,
            short_week_penalty: 0.02,
            bye_week_bonus: 0.02,
            division_compression: 0.92,
            playoff_compression: 0.90,
            championship_compression: 0.85,
        }
    }
}

/// Thresholds for the qualitative labels in the summary. These drifted across
/// deployments, so they are configuration rather than constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SummaryConfig {
    /// |winProbA - 0.5| below this counts as a tight margin.
    pub margin_tight: f64,
    /// |winProbA - 0.5| above this counts as a wide margin.
    pub margin_wide: f64,
    /// IQR above this reads as a chaotic delta distribution.
    pub iqr_high: f64,
    /// IQR below this reads as a settled delta distribution.
    pub iqr_low: f64,
    /// IQR above this forces the Volatile confidence tier outright.
    pub iqr_volatile: f64,
    pub margin_coin_flip: f64,
    pub margin_slight_edge: f64,
    pub margin_clear_edge: f64,
    pub upset_remote: f64,
    pub upset_unlikely: f64,
    pub upset_live: f64,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            margin_tight: 0.07,
            margin_wide: 0.15,
            iqr_high: 1.5,
            iqr_low: 0.9,
            iqr_volatile: 2.0,
            margin_coin_flip: 0.03,
            margin_slight_edge: 0.10,
            margin_clear_edge: 0.20,
            upset_remote: 0.10,
            upset_unlikely: 0.25,
            upset_live: 0.40,
        }
    }
}

/// Full engine configuration for one deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimConfig {
    pub iterations: usize,
    /// Sigmoid steepness. Kept shallow to absorb irreducible game-day
    /// randomness: mid-game injuries, officiating, weather swings.
    pub sigmoid_k: f64,
    pub volatility: VolatilityTier,
    pub weights: CategoryWeights,
    pub sos_enabled: bool,
    /// Linear schedule-strength scaling, per rating point.
    pub sos_factor_per_point: f64,
    /// Red-zone advantage magnitude (z-units) beyond which leverage kicks in.
    pub red_zone_threshold: f64,
    pub red_zone_amplifier: f64,
    pub context: ContextConfig,
    pub summary: SummaryConfig,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            iterations: 10_000,
            sigmoid_k: 0.65,
            volatility: VolatilityTier::Realistic,
            weights: CategoryWeights::default(),
            sos_enabled: true,
            sos_factor_per_point: 0.01,
            red_zone_threshold: 1.0,
            red_zone_amplifier: 1.10,
            context: ContextConfig::default(),
            summary: SummaryConfig::default(),
        }
    }
}

impl SimConfig {
    pub fn noise_level(&self) -> f64 {
        self.volatility.noise_level()
    }
}
