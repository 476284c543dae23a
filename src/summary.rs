use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use crate::config::SummaryConfig;
use crate::monte_carlo::{BaselineBreakdown, ResultPopulation};
use crate::scoring::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    TeamA,
    TeamB,
}

/// How breakable the projected outcome is, read jointly from the win margin
/// and the spread of simulated deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StabilityTier {
    /// Wide margin, tight distribution.
    Lock,
    Moderate,
    /// Clear favorite, but the distribution leaves real downside.
    TrapGame,
    /// Near coin flip with a wide distribution; small edges flip this game.
    Chaotic,
}

impl StabilityTier {
    pub fn label(self) -> &'static str {
        match self {
            StabilityTier::Lock => "stable",
            StabilityTier::Moderate => "moderate",
            StabilityTier::TrapGame => "trap game",
            StabilityTier::Chaotic => "fragile",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceTier {
    /// Distribution too wide to trust the margin at all.
    Volatile,
    CoinFlip,
    SlightEdge,
    ClearEdge,
    StrongFavorite,
}

impl ConfidenceTier {
    pub fn label(self) -> &'static str {
        match self {
            ConfidenceTier::Volatile => "volatile",
            ConfidenceTier::CoinFlip => "coin flip",
            ConfidenceTier::SlightEdge => "slight edge",
            ConfidenceTier::ClearEdge => "clear edge",
            ConfidenceTier::StrongFavorite => "strong favorite",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpsetInterpretation {
    Remote,
    Unlikely,
    LiveUnderdog,
    CoinFlip,
}

impl UpsetInterpretation {
    pub fn label(self) -> &'static str {
        match self {
            UpsetInterpretation::Remote => "remote",
            UpsetInterpretation::Unlikely => "unlikely",
            UpsetInterpretation::LiveUnderdog => "live underdog",
            UpsetInterpretation::CoinFlip => "coin flip",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UpsetReport {
    pub underdog: Side,
    /// The underdog's own win probability.
    pub rate: f64,
    pub interpretation: UpsetInterpretation,
}

/// Interpolated order statistics of the delta distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentileLadder {
    pub p2_5: f64,
    pub p10: f64,
    pub p25: f64,
    pub median: f64,
    pub p75: f64,
    pub p90: f64,
    pub p97_5: f64,
}

impl PercentileLadder {
    pub fn iqr(&self) -> f64 {
        self.p75 - self.p25
    }
}

/// The final report handed back to the presentation layer. Pure function of
/// the completed population and baseline breakdown; recomputed, never
/// incrementally updated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub win_prob_a: f64,
    pub win_prob_b: f64,
    pub mean_delta: f64,
    pub median_delta: f64,
    pub std_dev_delta: f64,
    pub percentiles: PercentileLadder,
    pub iqr: f64,
    pub stability: StabilityTier,
    pub confidence: ConfidenceTier,
    pub upset: UpsetReport,
    /// Category with the largest weighted baseline advantage. Narrative
    /// only; never fed back into scoring.
    pub x_factor: Category,
    pub trials: usize,
    pub generated_at: String,
}

/// Percentile with linear interpolation between order statistics:
/// `index = p/100 * (n - 1)`, interpolated between floor and ceil.
/// `sorted` must be ascending; returns 0.0 for an empty slice.
pub fn percentile(sorted: &[f64], p: f64) -> f64 {
    if sorted.is_empty() {
        return 0.0;
    }
    let idx = (p / 100.0) * (sorted.len() - 1) as f64;
    let low = idx.floor() as usize;
    let high = idx.ceil() as usize;
    let w = idx - low as f64;
    sorted[low] + w * (sorted[high] - sorted[low])
}

pub fn summarize(
    population: &ResultPopulation,
    baseline: &BaselineBreakdown,
    config: &SummaryConfig,
) -> SimulationSummary {
    let mut deltas: Vec<f64> = population.trials.iter().map(|t| t.delta).collect();
    deltas.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));

    let ladder = PercentileLadder {
        p2_5: percentile(&deltas, 2.5),
        p10: percentile(&deltas, 10.0),
        p25: percentile(&deltas, 25.0),
        median: percentile(&deltas, 50.0),
        p75: percentile(&deltas, 75.0),
        p90: percentile(&deltas, 90.0),
        p97_5: percentile(&deltas, 97.5),
    };
    let iqr = ladder.iqr();

    let n = deltas.len();
    let mean = if n == 0 {
        0.0
    } else {
        deltas.iter().sum::<f64>() / n as f64
    };
    let std_dev = if n == 0 {
        0.0
    } else {
        (deltas.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / n as f64).sqrt()
    };
    if n > 1 && std_dev == 0.0 {
        log::warn!("zero-variance trial population; percentiles collapse to a single value");
    }

    let win_prob_a = population.win_prob_a;
    let margin = (win_prob_a - 0.5).abs();

    SimulationSummary {
        win_prob_a,
        win_prob_b: population.win_prob_b(),
        mean_delta: mean,
        median_delta: ladder.median,
        std_dev_delta: std_dev,
        percentiles: ladder,
        iqr,
        stability: stability_tier(margin, iqr, config),
        confidence: confidence_tier(margin, iqr, config),
        upset: upset_report(win_prob_a, config),
        x_factor: dominant_x_factor(baseline),
        trials: n,
        generated_at: chrono::Utc::now().to_rfc3339(),
    }
}

fn stability_tier(margin: f64, iqr: f64, config: &SummaryConfig) -> StabilityTier {
    if margin < config.margin_tight && iqr > config.iqr_high {
        StabilityTier::Chaotic
    } else if margin >= config.margin_wide && iqr <= config.iqr_low {
        StabilityTier::Lock
    } else if margin >= config.margin_wide && iqr > config.iqr_high {
        StabilityTier::TrapGame
    } else {
        StabilityTier::Moderate
    }
}

fn confidence_tier(margin: f64, iqr: f64, config: &SummaryConfig) -> ConfidenceTier {
    if iqr > config.iqr_volatile {
        ConfidenceTier::Volatile
    } else if margin < config.margin_coin_flip {
        ConfidenceTier::CoinFlip
    } else if margin < config.margin_slight_edge {
        ConfidenceTier::SlightEdge
    } else if margin < config.margin_clear_edge {
        ConfidenceTier::ClearEdge
    } else {
        ConfidenceTier::StrongFavorite
    }
}

fn upset_report(win_prob_a: f64, config: &SummaryConfig) -> UpsetReport {
    let (underdog, rate) = if win_prob_a < 0.5 {
        (Side::TeamA, win_prob_a)
    } else {
        (Side::TeamB, 1.0 - win_prob_a)
    };
    let interpretation = if rate < config.upset_remote {
        UpsetInterpretation::Remote
    } else if rate < config.upset_unlikely {
        UpsetInterpretation::Unlikely
    } else if rate < config.upset_live {
        UpsetInterpretation::LiveUnderdog
    } else {
        UpsetInterpretation::CoinFlip
    };
    UpsetReport {
        underdog,
        rate,
        interpretation,
    }
}

fn dominant_x_factor(baseline: &BaselineBreakdown) -> Category {
    baseline
        .advantages
        .iter()
        .max_by(|a, b| {
            a.weighted
                .abs()
                .partial_cmp(&b.weighted.abs())
                .unwrap_or(Ordering::Equal)
        })
        .map(|a| a.category)
        .unwrap_or(Category::Turnovers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monte_carlo::TrialResult;
    use crate::scoring::CategoryAdvantage;

    fn population_from_deltas(deltas: &[f64], win_prob_a: f64) -> ResultPopulation {
        ResultPopulation {
            trials: deltas
                .iter()
                .map(|&d| TrialResult {
                    strength_a: d,
                    strength_b: 0.0,
                    delta: d,
                    prob_a: 0.5,
                })
                .collect(),
            win_prob_a,
            iterations: deltas.len(),
            noise_level: 0.25,
            generated_at: "test".to_string(),
        }
    }

    fn flat_baseline() -> BaselineBreakdown {
        BaselineBreakdown {
            delta: 0.0,
            prob_a: 0.5,
            advantages: Category::ALL
                .iter()
                .map(|&category| CategoryAdvantage {
                    category,
                    advantage: 0.0,
                    weighted: 0.0,
                })
                .collect(),
        }
    }

    #[test]
    fn percentile_interpolates_between_order_statistics() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        assert_eq!(percentile(&sorted, 0.0), 1.0);
        assert_eq!(percentile(&sorted, 100.0), 4.0);
        assert!((percentile(&sorted, 50.0) - 2.5).abs() < 1e-12);
        assert!((percentile(&sorted, 25.0) - 1.75).abs() < 1e-12);
    }

    #[test]
    fn ladder_is_monotone() {
        let deltas: Vec<f64> = (0..500).map(|i| ((i * 37) % 101) as f64 / 10.0 - 5.0).collect();
        let pop = population_from_deltas(&deltas, 0.55);
        let summary = summarize(&pop, &flat_baseline(), &SummaryConfig::default());
        let l = summary.percentiles;
        assert!(l.p2_5 <= l.p10);
        assert!(l.p10 <= l.p25);
        assert!(l.p25 <= l.median);
        assert!(l.median <= l.p75);
        assert!(l.p75 <= l.p90);
        assert!(l.p90 <= l.p97_5);
    }

    #[test]
    fn zero_variance_population_degrades_gracefully() {
        let pop = population_from_deltas(&[0.8; 64], 0.62);
        let summary = summarize(&pop, &flat_baseline(), &SummaryConfig::default());
        assert_eq!(summary.percentiles.p2_5, 0.8);
        assert_eq!(summary.percentiles.p97_5, 0.8);
        assert_eq!(summary.iqr, 0.0);
        assert_eq!(summary.std_dev_delta, 0.0);
        assert!(summary.mean_delta.is_finite());
    }

    #[test]
    fn tight_margin_and_wide_spread_reads_chaotic() {
        let cfg = SummaryConfig::default();
        // IQR of a symmetric two-point distribution at +-2 is 4.
        let mut deltas = vec![-2.0; 50];
        deltas.extend(vec![2.0; 50]);
        let pop = population_from_deltas(&deltas, 0.51);
        let summary = summarize(&pop, &flat_baseline(), &cfg);
        assert_eq!(summary.stability, StabilityTier::Chaotic);
        assert_eq!(summary.confidence, ConfidenceTier::Volatile);
    }

    #[test]
    fn wide_margin_and_tight_spread_reads_lock() {
        let cfg = SummaryConfig::default();
        let deltas: Vec<f64> = (0..100).map(|i| 1.0 + (i as f64) * 0.001).collect();
        let pop = population_from_deltas(&deltas, 0.82);
        let summary = summarize(&pop, &flat_baseline(), &cfg);
        assert_eq!(summary.stability, StabilityTier::Lock);
        assert_eq!(summary.confidence, ConfidenceTier::StrongFavorite);
    }

    #[test]
    fn underdog_is_the_side_below_half() {
        let cfg = SummaryConfig::default();
        let pop = population_from_deltas(&[0.5; 10], 0.70);
        let summary = summarize(&pop, &flat_baseline(), &cfg);
        assert_eq!(summary.upset.underdog, Side::TeamB);
        assert!((summary.upset.rate - 0.30).abs() < 1e-12);
        assert_eq!(summary.upset.interpretation, UpsetInterpretation::LiveUnderdog);

        let pop = population_from_deltas(&[-0.5; 10], 0.08);
        let summary = summarize(&pop, &flat_baseline(), &cfg);
        assert_eq!(summary.upset.underdog, Side::TeamA);
        assert_eq!(summary.upset.interpretation, UpsetInterpretation::Remote);
    }

    #[test]
    fn x_factor_is_the_largest_weighted_edge() {
        let mut baseline = flat_baseline();
        for adv in &mut baseline.advantages {
            if adv.category == Category::Rush {
                adv.advantage = -1.2;
                adv.weighted = -1.02;
            }
            if adv.category == Category::QbEfficiency {
                adv.advantage = 1.0;
                adv.weighted = 0.55;
            }
        }
        let pop = population_from_deltas(&[0.1; 10], 0.52);
        let summary = summarize(&pop, &baseline, &SummaryConfig::default());
        assert_eq!(summary.x_factor, Category::Rush);
    }
}
