use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Instant;

use rand::Rng;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::adjust::{AdjustedStatProfile, adjust};
use crate::config::SimConfig;
use crate::dataset::{LeagueDataset, TeamStatProfile};
use crate::error::{EngineError, Result};
use crate::metrics::LeagueBaselines;
use crate::scoring::{CategoryAdvantage, ContextTerms, Scorer};
use crate::situation::SituationalInputs;
use crate::summary::{SimulationSummary, summarize};

/// Logistic mapping from an unbounded advantage to a (0, 1) win probability.
/// The steepness `k` stays well below 1 so even clear statistical edges leave
/// room for game-day randomness.
pub fn sigmoid(delta: f64, k: f64) -> f64 {
    1.0 / (1.0 + (-k * delta).exp())
}

/// Engine lifecycle. One run at a time; a request against a `Running` engine
/// is rejected, not queued.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RunState {
    Idle,
    Running,
    Complete,
    Failed,
}

const STATE_IDLE: u8 = 0;
const STATE_RUNNING: u8 = 1;
const STATE_COMPLETE: u8 = 2;
const STATE_FAILED: u8 = 3;

fn state_from_u8(raw: u8) -> RunState {
    match raw {
        STATE_RUNNING => RunState::Running,
        STATE_COMPLETE => RunState::Complete,
        STATE_FAILED => RunState::Failed,
        _ => RunState::Idle,
    }
}

/// One Monte Carlo iteration: the per-orientation strength scores, the final
/// context-folded delta, and its sigmoid win probability for team A.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrialResult {
    pub strength_a: f64,
    pub strength_b: f64,
    pub delta: f64,
    pub prob_a: f64,
}

impl TrialResult {
    /// Exact complement of `prob_a`.
    pub fn prob_b(&self) -> f64 {
        1.0 - self.prob_a
    }
}

/// Every trial of one completed run. Append-only while running, conceptually
/// immutable afterwards; the raw delta list is the input for any external
/// distribution rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResultPopulation {
    pub trials: Vec<TrialResult>,
    /// Mean of per-trial sigmoid probabilities. Deliberately not the
    /// fraction of trials with a positive delta; averaging the sigmoid is
    /// smoother and better calibrated than a hard threshold.
    pub win_prob_a: f64,
    pub iterations: usize,
    pub noise_level: f64,
    pub generated_at: String,
}

impl ResultPopulation {
    pub fn win_prob_b(&self) -> f64 {
        1.0 - self.win_prob_a
    }

    pub fn deltas(&self) -> Vec<f64> {
        self.trials.iter().map(|t| t.delta).collect()
    }
}

/// Deterministic zero-noise view of the matchup, with per-category net
/// advantages for narrative use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaselineBreakdown {
    pub delta: f64,
    pub prob_a: f64,
    pub advantages: Vec<CategoryAdvantage>,
}

/// One matchup request: which season, which two teams, and the situational
/// snapshot for this game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationRequest {
    pub season: u16,
    pub team_a: String,
    pub team_b: String,
    pub situation: SituationalInputs,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub summary: SimulationSummary,
    pub population: ResultPopulation,
    pub baseline: BaselineBreakdown,
}

/// The simulation engine. Holds the league dataset and deployment
/// configuration; all per-run state lives on the stack of `run`, so the
/// engine is freely shareable across threads.
pub struct MatchupEngine {
    dataset: LeagueDataset,
    config: SimConfig,
    state: AtomicU8,
    baseline_cache: Mutex<Option<Arc<LeagueBaselines>>>,
}

impl MatchupEngine {
    pub fn new(dataset: LeagueDataset, config: SimConfig) -> Self {
        Self {
            dataset,
            config,
            state: AtomicU8::new(STATE_IDLE),
            baseline_cache: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn dataset(&self) -> &LeagueDataset {
        &self.dataset
    }

    pub fn run_state(&self) -> RunState {
        state_from_u8(self.state.load(Ordering::Acquire))
    }

    /// Full Monte Carlo run. Validates inputs first, then claims the engine
    /// for the duration; the summary is computed only after every trial has
    /// landed in the population.
    pub fn run(&self, request: &SimulationRequest) -> Result<SimulationReport> {
        let iterations = self.config.iterations;
        if iterations == 0 {
            return Err(EngineError::InvalidIterations { got: 0 });
        }
        let (team_a, team_b) = self.resolve_matchup(request)?;
        let baselines = self.baselines_for(request.season)?;

        self.begin_run()?;
        let result = self.execute(request, team_a, team_b, &baselines);
        let next = if result.is_ok() {
            STATE_COMPLETE
        } else {
            STATE_FAILED
        };
        self.state.store(next, Ordering::Release);
        result
    }

    /// Deterministic baseline matchup (zero noise, single evaluation) for
    /// pre-sim display. Does not claim the run state.
    pub fn baseline(&self, request: &SimulationRequest) -> Result<BaselineBreakdown> {
        let (team_a, team_b) = self.resolve_matchup(request)?;
        let baselines = self.baselines_for(request.season)?;
        let adj_a = adjust(
            team_a,
            &request.situation.injuries_a,
            &request.situation,
            &self.config,
        );
        let adj_b = adjust(
            team_b,
            &request.situation.injuries_b,
            &request.situation,
            &self.config,
        );
        let scorer = Scorer::new(&baselines, &self.config);
        let context = ContextTerms::compute(&request.situation, &self.config.context);
        baseline_breakdown(&scorer, &adj_a, &adj_b, &context, self.config.sigmoid_k)
    }

    fn execute(
        &self,
        request: &SimulationRequest,
        team_a: &TeamStatProfile,
        team_b: &TeamStatProfile,
        baselines: &LeagueBaselines,
    ) -> Result<SimulationReport> {
        let started = Instant::now();
        let adj_a = adjust(
            team_a,
            &request.situation.injuries_a,
            &request.situation,
            &self.config,
        );
        let adj_b = adjust(
            team_b,
            &request.situation.injuries_b,
            &request.situation,
            &self.config,
        );
        let scorer = Scorer::new(baselines, &self.config);
        let context = ContextTerms::compute(&request.situation, &self.config.context);
        let noise_level = self.config.noise_level();
        let k = self.config.sigmoid_k;
        let iterations = self.config.iterations;

        // Trials are independent; fan out with a thread-local generator per
        // worker and merge behind the collect barrier.
        let trials = (0..iterations)
            .into_par_iter()
            .map(|_| {
                let mut rng = rand::thread_rng();
                run_trial(&scorer, &adj_a, &adj_b, &context, noise_level, k, &mut rng)
            })
            .collect::<Result<Vec<TrialResult>>>()?;

        let win_prob_a = trials.iter().map(|t| t.prob_a).sum::<f64>() / iterations as f64;
        let population = ResultPopulation {
            trials,
            win_prob_a,
            iterations,
            noise_level,
            generated_at: chrono::Utc::now().to_rfc3339(),
        };
        let baseline = baseline_breakdown(&scorer, &adj_a, &adj_b, &context, k)?;
        let summary = summarize(&population, &baseline, &self.config.summary);

        log::info!(
            "{} vs {}: {iterations} trials in {:?}, winProbA={:.3}",
            team_a.team_id,
            team_b.team_id,
            started.elapsed(),
            win_prob_a,
        );

        Ok(SimulationReport {
            summary,
            population,
            baseline,
        })
    }

    fn resolve_matchup(
        &self,
        request: &SimulationRequest,
    ) -> Result<(&TeamStatProfile, &TeamStatProfile)> {
        let season = self
            .dataset
            .season(request.season)
            .ok_or(EngineError::UnknownSeason {
                season: request.season,
            })?;
        let team_a = season
            .team(&request.team_a)
            .ok_or_else(|| EngineError::UnknownTeam {
                team: request.team_a.clone(),
                season: request.season,
            })?;
        let team_b = season
            .team(&request.team_b)
            .ok_or_else(|| EngineError::UnknownTeam {
                team: request.team_b.clone(),
                season: request.season,
            })?;
        Ok((team_a, team_b))
    }

    /// Baselines are recomputed only when the requested season changes.
    fn baselines_for(&self, season: u16) -> Result<Arc<LeagueBaselines>> {
        let mut guard = match self.baseline_cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        };
        if let Some(cached) = guard.as_ref()
            && cached.season() == season
        {
            return Ok(Arc::clone(cached));
        }
        let season_data = self
            .dataset
            .season(season)
            .ok_or(EngineError::UnknownSeason { season })?;
        let fresh = Arc::new(LeagueBaselines::compute(season_data)?);
        *guard = Some(Arc::clone(&fresh));
        Ok(fresh)
    }

    fn begin_run(&self) -> Result<()> {
        loop {
            let current = self.state.load(Ordering::Acquire);
            if current == STATE_RUNNING {
                return Err(EngineError::ConcurrentRun);
            }
            if self
                .state
                .compare_exchange(current, STATE_RUNNING, Ordering::AcqRel, Ordering::Acquire)
                .is_ok()
            {
                return Ok(());
            }
        }
    }
}

fn run_trial<R: Rng>(
    scorer: &Scorer<'_>,
    team_a: &AdjustedStatProfile,
    team_b: &AdjustedStatProfile,
    context: &ContextTerms,
    noise_level: f64,
    k: f64,
    rng: &mut R,
) -> Result<TrialResult> {
    let strength_a = scorer.score_trial(&team_a.stats, &team_b.stats, noise_level, rng)?;
    let strength_b = scorer.score_trial(&team_b.stats, &team_a.stats, noise_level, rng)?;
    let delta = context.finalize((strength_a - strength_b) / 2.0);
    Ok(TrialResult {
        strength_a,
        strength_b,
        delta,
        prob_a: sigmoid(delta, k),
    })
}

fn baseline_breakdown(
    scorer: &Scorer<'_>,
    team_a: &AdjustedStatProfile,
    team_b: &AdjustedStatProfile,
    context: &ContextTerms,
    k: f64,
) -> Result<BaselineBreakdown> {
    let mut rng = rand::thread_rng();
    let forward = scorer.score_trial(&team_a.stats, &team_b.stats, 0.0, &mut rng)?;
    let reverse = scorer.score_trial(&team_b.stats, &team_a.stats, 0.0, &mut rng)?;
    let delta = context.finalize((forward - reverse) / 2.0);

    let fwd = scorer.baseline_advantages(&team_a.stats, &team_b.stats)?;
    let rev = scorer.baseline_advantages(&team_b.stats, &team_a.stats)?;
    let advantages = fwd
        .iter()
        .zip(&rev)
        .map(|(f, r)| CategoryAdvantage {
            category: f.category,
            advantage: (f.advantage - r.advantage) / 2.0,
            weighted: (f.weighted - r.weighted) / 2.0,
        })
        .collect();

    Ok(BaselineBreakdown {
        delta,
        prob_a: sigmoid(delta, k),
        advantages,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures;
    use crate::situation::VolatilityTier;

    fn engine_with(iterations: usize, volatility: VolatilityTier) -> MatchupEngine {
        let config = SimConfig {
            iterations,
            volatility,
            ..SimConfig::default()
        };
        MatchupEngine::new(fixtures::dataset(), config)
    }

    fn request(team_a: &str, team_b: &str) -> SimulationRequest {
        SimulationRequest {
            season: 2025,
            team_a: team_a.to_string(),
            team_b: team_b.to_string(),
            situation: SituationalInputs::default(),
        }
    }

    #[test]
    fn sigmoid_is_bounded_and_centered() {
        assert_eq!(sigmoid(0.0, 0.65), 0.5);
        for delta in [-50.0, -3.0, -0.4, 0.4, 3.0, 50.0] {
            let p = sigmoid(delta, 0.65);
            assert!(p > 0.0 && p < 1.0, "sigmoid({delta}) = {p}");
        }
        assert!(sigmoid(2.0, 0.65) > sigmoid(1.0, 0.65));
    }

    #[test]
    fn zero_iterations_is_rejected_before_anything_runs() {
        let engine = engine_with(0, VolatilityTier::Realistic);
        let err = engine.run(&request("AAA", "BBB")).unwrap_err();
        assert_eq!(err, EngineError::InvalidIterations { got: 0 });
        assert_eq!(engine.run_state(), RunState::Idle);
    }

    #[test]
    fn unknown_team_and_season_are_rejected() {
        let engine = engine_with(32, VolatilityTier::Realistic);
        let mut bad_season = request("AAA", "BBB");
        bad_season.season = 1987;
        assert!(matches!(
            engine.run(&bad_season).unwrap_err(),
            EngineError::UnknownSeason { season: 1987 }
        ));
        assert!(matches!(
            engine.run(&request("AAA", "ZZZ")).unwrap_err(),
            EngineError::UnknownTeam { .. }
        ));
        // Rejected before any trial: state never left idle.
        assert_eq!(engine.run_state(), RunState::Idle);
    }

    #[test]
    fn run_while_running_is_rejected_not_queued() {
        let engine = engine_with(16, VolatilityTier::Realistic);
        engine.state.store(STATE_RUNNING, Ordering::Release);
        let err = engine.run(&request("AAA", "BBB")).unwrap_err();
        assert_eq!(err, EngineError::ConcurrentRun);

        // Once the in-flight run finishes, a new one goes through.
        engine.state.store(STATE_COMPLETE, Ordering::Release);
        assert!(engine.run(&request("AAA", "BBB")).is_ok());
        assert_eq!(engine.run_state(), RunState::Complete);
    }

    #[test]
    fn population_size_matches_iterations_and_probs_complement() {
        let engine = engine_with(257, VolatilityTier::Realistic);
        let report = engine.run(&request("EEE", "BBB")).unwrap();
        assert_eq!(report.population.trials.len(), 257);
        assert_eq!(report.population.iterations, 257);
        for trial in &report.population.trials {
            assert!(trial.prob_a > 0.0 && trial.prob_a < 1.0);
            assert_eq!(trial.prob_b(), 1.0 - trial.prob_a);
        }
        assert_eq!(
            report.population.win_prob_b(),
            1.0 - report.population.win_prob_a
        );
    }

    #[test]
    fn zero_noise_run_is_degenerate_and_matches_baseline() {
        let engine = engine_with(64, VolatilityTier::Custom(0.0));
        let req = request("EEE", "BBB");
        let report = engine.run(&req).unwrap();
        let first = report.population.trials[0].delta;
        assert!(report.population.trials.iter().all(|t| t.delta == first));
        assert_eq!(report.baseline.delta, first);
        assert!((report.population.win_prob_a - report.baseline.prob_a).abs() < 1e-12);
    }

    #[test]
    fn stronger_team_is_favored() {
        // FFF dominates AAA in every fixture metric.
        let engine = engine_with(2_000, VolatilityTier::Realistic);
        let report = engine.run(&request("FFF", "AAA")).unwrap();
        assert!(report.population.win_prob_a > 0.60);
        assert!(report.baseline.delta > 0.0);
    }

    #[test]
    fn baselines_are_cached_per_season() {
        let engine = engine_with(16, VolatilityTier::Realistic);
        let first = engine.baselines_for(2025).unwrap();
        let second = engine.baselines_for(2025).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn baseline_is_exposed_without_claiming_run_state() {
        let engine = engine_with(16, VolatilityTier::Chaos);
        let breakdown = engine.baseline(&request("EEE", "BBB")).unwrap();
        assert_eq!(breakdown.advantages.len(), 9);
        assert_eq!(engine.run_state(), RunState::Idle);
    }
}
