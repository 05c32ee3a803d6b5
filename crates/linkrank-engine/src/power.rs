//! Exact power-iteration solver for the teleporting-surfer model.
//!
//! Transition probability from j to i:
//!
//! ```text
//! P(i|j) = 1/N                              if j is a sink
//!        = BORED/N                          if i is not an outlink of j
//!        = (1-BORED)/out(j) + BORED/N       if i is an outlink of j
//! ```
//!
//! The naive update is O(N²) per round because the teleport term couples
//! every pair of nodes. The loop below folds the teleport and sink
//! contributions into a single per-round base term, so each round costs
//! O(E + N):
//!
//! ```text
//! base  = (sink_mass + BORED * (total - sink_mass)) / N
//! x'[i] = base + (1-BORED) * sum over j linking to i of x[j]/out(j)
//! ```

use linkrank_graph::{DocId, LinkGraph};
use tracing::{trace, warn};

use crate::score::ScoreVector;
use crate::{BORED, NOT_BORED};

/// Convergence criterion: stop once the L1 distance between successive
/// score vectors is at most this.
pub const EPSILON: f64 = 1e-4;

/// Never run more rounds than this, converged or not.
pub const MAX_ITERATIONS: usize = 1000;

#[derive(Debug, Clone, Copy)]
pub struct PowerIterationConfig {
    pub epsilon: f64,
    pub max_iterations: usize,
}

impl Default for PowerIterationConfig {
    fn default() -> Self {
        Self {
            epsilon: EPSILON,
            max_iterations: MAX_ITERATIONS,
        }
    }
}

/// Outcome of a solver run. A run that hits the iteration cap still carries
/// the last computed vector; `converged` records which case happened.
#[derive(Debug, Clone)]
pub struct PowerIterationRun {
    pub scores: ScoreVector,
    pub iterations: usize,
    pub converged: bool,
}

/// Compute the stationary distribution by fixed-point iteration.
///
/// Deterministic: the same graph always yields the same vector. The result
/// sums to 1 within floating-point tolerance.
pub fn power_iteration(graph: &LinkGraph, config: &PowerIterationConfig) -> PowerIterationRun {
    let n = graph.node_count();
    if n == 0 {
        return PowerIterationRun {
            scores: ScoreVector::from_vec(Vec::new()),
            iterations: 0,
            converged: true,
        };
    }
    let n_f64 = n as f64;

    let sinks: Vec<DocId> = (0..n as DocId).filter(|&i| graph.is_sink(i)).collect();

    let mut scores = vec![1.0 / n_f64; n];
    let mut next = vec![0.0; n];
    let mut iterations = 0;
    let mut converged = false;

    while iterations < config.max_iterations {
        let total: f64 = scores.iter().sum();
        let sink_mass: f64 = sinks.iter().map(|&i| scores[i as usize]).sum();
        let base = (sink_mass + BORED * (total - sink_mass)) / n_f64;

        next.fill(base);
        for j in 0..n {
            let outs = graph.outlinks(j as DocId);
            if outs.is_empty() {
                continue;
            }
            let share = NOT_BORED * scores[j] / outs.len() as f64;
            for &target in outs {
                next[target as usize] += share;
            }
        }

        iterations += 1;
        let residual: f64 = scores
            .iter()
            .zip(next.iter())
            .map(|(a, b)| (a - b).abs())
            .sum();
        std::mem::swap(&mut scores, &mut next);
        trace!(iteration = iterations, residual, "power iteration round");

        if residual <= config.epsilon {
            converged = true;
            break;
        }
    }

    if !converged {
        warn!(
            iterations,
            "power iteration hit the iteration cap before converging"
        );
    }

    PowerIterationRun {
        scores: ScoreVector::from_vec(scores),
        iterations,
        converged,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use linkrank_graph::{parse_links, LoaderConfig};

    fn graph_from(input: &str) -> LinkGraph {
        parse_links(input.as_bytes(), LoaderConfig::default())
            .expect("parse")
            .graph
    }

    #[test]
    fn empty_graph_yields_empty_vector() {
        let run = power_iteration(&LinkGraph::new(), &PowerIterationConfig::default());
        assert!(run.scores.is_empty());
        assert!(run.converged);
    }

    #[test]
    fn three_cycle_converges_to_uniform() {
        let graph = graph_from("A;B\nB;C\nC;A\n");
        let run = power_iteration(&graph, &PowerIterationConfig::default());
        assert!(run.converged);
        for doc in 0..3 {
            assert_abs_diff_eq!(run.scores.get(doc), 1.0 / 3.0, epsilon = 1e-3);
        }
    }

    #[test]
    fn scores_sum_to_one() {
        let graph = graph_from("a;b,c\nb;c\nc;a\nd;a,b,c\ne;\n");
        let run = power_iteration(&graph, &PowerIterationConfig::default());
        assert_abs_diff_eq!(run.scores.sum(), 1.0, epsilon = 1e-6);
    }

    #[test]
    fn sink_outranks_its_only_source() {
        // B is a sink fed by A; it inherits A's rank plus the teleport-only
        // inflow, so it must score higher.
        let graph = graph_from("A;B\n");
        let run = power_iteration(&graph, &PowerIterationConfig::default());
        let a = run.scores.get(0);
        let b = run.scores.get(1);
        assert!(b > a, "expected score(B)={b} > score(A)={a}");
    }

    #[test]
    fn deterministic_across_runs() {
        let graph = graph_from("a;b,c\nb;c\nc;a\nd;\n");
        let first = power_iteration(&graph, &PowerIterationConfig::default());
        let second = power_iteration(&graph, &PowerIterationConfig::default());
        assert_eq!(first.scores.as_slice(), second.scores.as_slice());
        assert_eq!(first.iterations, second.iterations);
    }

    #[test]
    fn iteration_cap_returns_best_effort_vector() {
        let graph = graph_from("a;b\nb;a\nc;a,b\n");
        let config = PowerIterationConfig {
            epsilon: 0.0,
            max_iterations: 3,
        };
        let run = power_iteration(&graph, &config);
        assert!(!run.converged);
        assert_eq!(run.iterations, 3);
        assert_abs_diff_eq!(run.scores.sum(), 1.0, epsilon = 1e-9);
    }
}
