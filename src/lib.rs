//! Monte Carlo matchup simulation engine for American-football win
//! probabilities.
//!
//! The pipeline: raw team statistics are normalized into league-relative
//! z-scores, situational and injury adjustments reshape each team's profile,
//! a weighted scorer computes a per-trial net advantage with injected
//! Gaussian noise, a Monte Carlo runner aggregates thousands of trials into a
//! sigmoid-averaged win probability, and a summary analyzer reduces the trial
//! population to percentiles and narrative tiers.
//!
//! The crate is presentation-free: callers hand in an already-parsed
//! [`dataset::LeagueDataset`] plus a [`situation::SituationalInputs`]
//! snapshot and get back a [`monte_carlo::SimulationReport`] carrying both
//! the summary and the raw per-trial deltas for their own rendering.

pub mod adjust;
pub mod config;
pub mod dataset;
pub mod error;
pub mod metrics;
pub mod monte_carlo;
pub mod scoring;
pub mod situation;
pub mod summary;

pub use crate::adjust::AdjustedStatProfile;
pub use crate::config::SimConfig;
pub use crate::dataset::{LeagueDataset, SeasonData, TeamStatProfile, TeamStats};
pub use crate::error::{EngineError, Result};
pub use crate::monte_carlo::{
    MatchupEngine, ResultPopulation, RunState, SimulationReport, SimulationRequest, TrialResult,
};
pub use crate::situation::SituationalInputs;
pub use crate::summary::SimulationSummary;
