use thiserror::Error;

use crate::metrics::Metric;

/// Failures surfaced synchronously to the caller. Nothing here is fatal to
/// the hosting process and the engine never retries on its own.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A league baseline has zero spread for a metric the scorer normalizes.
    /// Usually a single-team or constant-valued season.
    #[error("degenerate baseline for {metric}: standard deviation is zero")]
    DegenerateBaseline { metric: Metric },

    /// Raw divide-by-zero guard for callers normalizing against an ad-hoc
    /// baseline outside [`crate::metrics::LeagueBaselines`].
    #[error("cannot z-score against a baseline with zero standard deviation")]
    ZeroStdDev,

    #[error("season {season} is not present in the dataset")]
    UnknownSeason { season: u16 },

    #[error("team '{team}' is not present in season {season}")]
    UnknownTeam { team: String, season: u16 },

    #[error("iteration count must be at least 1, got {got}")]
    InvalidIterations { got: usize },

    /// A run was requested while another run on the same engine instance was
    /// still in flight. Rejected, never queued.
    #[error("a simulation run is already in progress on this engine")]
    ConcurrentRun,
}

pub type Result<T> = std::result::Result<T, EngineError>;
