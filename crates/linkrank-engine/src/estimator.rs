//! Estimator selection and dispatch.
//!
//! Six strategies, one exact and five sampled, selected by the short tokens
//! the CLI accepts (`s`, `mc1`..`mc5`). The sampled strategies are the
//! classic Monte Carlo PageRank family: end-point sampling with random or
//! cyclic starts, and complete-path sampling with or without teleporting
//! out of dead ends.

use linkrank_graph::LinkGraph;
use tracing::debug;

use crate::power::{power_iteration, PowerIterationConfig};
use crate::score::ScoreVector;
use crate::walk::{
    simulate_walks, CountPolicy, DeadEndPolicy, Normalization, StartPolicy, WalkBudget, WalkPlan,
};

/// One of the six scoring strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// Exact power iteration.
    Power,
    /// End-point sampling, uniformly random starts.
    EndPointRandomStart,
    /// End-point sampling, every node started in turn.
    EndPointCyclicStart,
    /// Complete-path sampling; dead ends teleport and the walk continues.
    CompletePath,
    /// Complete-path sampling; walks stop at dead ends.
    CompletePathDanglingHalt,
    /// Complete-path sampling with random starts; walks stop at dead ends.
    CompletePathRandomStart,
}

impl Method {
    /// Parse a selection token. Unrecognized tokens are the caller's
    /// fallback decision, so this returns `None` rather than defaulting.
    pub fn parse(token: &str) -> Option<Method> {
        match token {
            "s" | "power" => Some(Method::Power),
            "mc1" => Some(Method::EndPointRandomStart),
            "mc2" => Some(Method::EndPointCyclicStart),
            "mc3" => Some(Method::CompletePath),
            "mc4" => Some(Method::CompletePathDanglingHalt),
            "mc5" => Some(Method::CompletePathRandomStart),
            _ => None,
        }
    }

    /// The canonical token, used for report file naming.
    pub fn token(&self) -> &'static str {
        match self {
            Method::Power => "s",
            Method::EndPointRandomStart => "mc1",
            Method::EndPointCyclicStart => "mc2",
            Method::CompletePath => "mc3",
            Method::CompletePathDanglingHalt => "mc4",
            Method::CompletePathRandomStart => "mc5",
        }
    }

    fn walk_plan(&self) -> Option<WalkPlan> {
        match self {
            Method::Power => None,
            Method::EndPointRandomStart => Some(WalkPlan {
                start: StartPolicy::UniformRandom,
                dead_end: DeadEndPolicy::Teleport,
                counting: CountPolicy::EndpointOnly,
                normalization: Normalization::PerWalk,
            }),
            Method::EndPointCyclicStart => Some(WalkPlan {
                start: StartPolicy::CyclicByNode,
                dead_end: DeadEndPolicy::Teleport,
                counting: CountPolicy::EndpointOnly,
                normalization: Normalization::PerWalk,
            }),
            // The complete-path tally divides by walk count (scaled by the
            // boredom probability), not by the visit total; the dangling
            // variants divide by the visit total. Distinct on purpose.
            Method::CompletePath => Some(WalkPlan {
                start: StartPolicy::CyclicByNode,
                dead_end: DeadEndPolicy::Teleport,
                counting: CountPolicy::EveryVisit,
                normalization: Normalization::BoredPerWalk,
            }),
            Method::CompletePathDanglingHalt => Some(WalkPlan {
                start: StartPolicy::CyclicByNode,
                dead_end: DeadEndPolicy::Terminate,
                counting: CountPolicy::EveryVisit,
                normalization: Normalization::PerVisit,
            }),
            Method::CompletePathRandomStart => Some(WalkPlan {
                start: StartPolicy::UniformRandom,
                dead_end: DeadEndPolicy::Terminate,
                counting: CountPolicy::EveryVisit,
                normalization: Normalization::PerVisit,
            }),
        }
    }
}

/// Knobs shared by every estimation run.
#[derive(Debug, Clone, Copy)]
pub struct EstimatorConfig {
    /// Seed for the walk generators; identical seeds reproduce identical
    /// estimates.
    pub seed: u64,
    /// Walks started from each node by the cyclic-start strategies.
    pub walks_per_node: u64,
    /// Total walks for the random-start strategies; defaults to the node
    /// count when unset.
    pub walks: Option<u64>,
    pub power: PowerIterationConfig,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            walks_per_node: 100,
            walks: None,
            power: PowerIterationConfig::default(),
        }
    }
}

/// Strategy-specific run facts, carried into the report.
#[derive(Debug, Clone, Copy)]
pub enum RunDetail {
    Exact { iterations: usize, converged: bool },
    Sampled { walks: u64, visits: u64 },
}

/// A score vector plus how it was produced.
#[derive(Debug, Clone)]
pub struct EstimateRun {
    pub scores: ScoreVector,
    pub detail: RunDetail,
}

/// Run the selected strategy over the graph.
pub fn estimate(graph: &LinkGraph, method: Method, config: &EstimatorConfig) -> EstimateRun {
    debug!(method = method.token(), "estimating pagerank");
    match method.walk_plan() {
        None => {
            let run = power_iteration(graph, &config.power);
            EstimateRun {
                scores: run.scores,
                detail: RunDetail::Exact {
                    iterations: run.iterations,
                    converged: run.converged,
                },
            }
        }
        Some(plan) => {
            let n = graph.node_count() as u64;
            let walks = match plan.start {
                StartPolicy::CyclicByNode => n * config.walks_per_node,
                StartPolicy::UniformRandom => config.walks.unwrap_or(n),
            };
            let budget = WalkBudget {
                walks,
                walks_per_node: config.walks_per_node,
            };
            let run = simulate_walks(graph, plan, budget, config.seed);
            EstimateRun {
                scores: run.scores,
                detail: RunDetail::Sampled {
                    walks: run.walks,
                    visits: run.visits,
                },
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_round_trip() {
        for token in ["s", "mc1", "mc2", "mc3", "mc4", "mc5"] {
            let method = Method::parse(token).expect("known token");
            assert_eq!(method.token(), token);
        }
        assert_eq!(Method::parse("power"), Some(Method::Power));
    }

    #[test]
    fn unknown_tokens_are_rejected() {
        assert_eq!(Method::parse("mc6"), None);
        assert_eq!(Method::parse(""), None);
        assert_eq!(Method::parse("S"), None);
    }
}
