//! PageRank estimation engine.
//!
//! Motivation
//! ----------
//! Ranking a link graph is one problem with six workable answers: the exact
//! stationary distribution of the teleporting random surfer, or a Monte
//! Carlo estimate of it from simulated walks. The exact solver is
//! deterministic and precise but touches every edge every round; the
//! sampled estimators trade exactness for walk-level parallelism. All six
//! consume the same immutable [`linkrank_graph::LinkGraph`] and produce the
//! same shape of output, a dense [`score::ScoreVector`].
//!
//! The five sampling strategies intentionally differ in start distribution,
//! dead-end policy, counting, and normalization; they are presets of one
//! parametrized walk driver ([`walk`]), not five copies of the loop.

pub mod estimator;
pub mod power;
pub mod report;
pub mod score;
pub mod walk;

pub use estimator::{estimate, EstimateRun, EstimatorConfig, Method, RunDetail};
pub use power::{power_iteration, PowerIterationConfig, PowerIterationRun};
pub use report::{
    default_report_filename, render_text, top_entries, write_report, RankReportV1, RankedEntryV1,
    ReportError, RANK_REPORT_VERSION,
};
pub use score::ScoreVector;
pub use walk::{
    simulate_walks, CountPolicy, DeadEndPolicy, Normalization, StartPolicy, WalkBudget, WalkPlan,
    WalkRun,
};

/// The probability that the surfer gets bored on a step and stops following
/// links.
pub const BORED: f64 = 0.15;

/// The probability that the surfer follows an outlink instead.
pub const NOT_BORED: f64 = 1.0 - BORED;
