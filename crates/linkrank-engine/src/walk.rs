//! Parametrized Monte Carlo random-walk driver.
//!
//! All five sampling estimators simulate the same surfer: on each step the
//! walk gets bored with probability [`BORED`] and stops; otherwise it moves
//! to a uniformly random distinct outlink, and at a dead end the
//! [`DeadEndPolicy`] decides what happens. The estimators differ only in
//! where walks start, what they count, and how the tally is normalized, so
//! they are expressed as [`WalkPlan`] values over one driver instead of
//! five near-identical loops.
//!
//! Walks are embarrassingly parallel: the driver fans them out with rayon,
//! each worker tallying into a local counter array, merged by summation at
//! the end. Every walk derives its own generator from (seed, walk index),
//! so the result is identical for a given seed no matter how the walks are
//! scheduled across threads.

use linkrank_graph::{DocId, LinkGraph};
use rayon::prelude::*;
use tracing::debug;

use crate::score::ScoreVector;
use crate::BORED;

// ============================================================================
// Deterministic RNG
// ============================================================================

/// Deterministic xorshift generator for walk sampling.
#[derive(Debug, Clone)]
pub(crate) struct XorShift64 {
    state: u64,
}

impl XorShift64 {
    pub(crate) fn new(seed: u64) -> Self {
        Self { state: seed.max(1) }
    }

    fn next_u64(&mut self) -> u64 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.state = x;
        x
    }

    /// Uniform draw from [0, 1).
    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 * (1.0 / 9_007_199_254_740_992.0)
    }

    /// Uniform index below `n`. `n` must be nonzero.
    fn pick(&mut self, n: usize) -> usize {
        if n <= 1 {
            return 0;
        }
        (self.next_u64() % n as u64) as usize
    }
}

/// Splitmix-style mixer deriving one generator stream per walk.
fn stream_seed(seed: u64, stream: u64) -> u64 {
    let mut z = seed.wrapping_add(stream.wrapping_mul(0x9E37_79B9_7F4A_7C15));
    z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
    z ^ (z >> 31)
}

// ============================================================================
// Walk configuration
// ============================================================================

/// Where walks start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartPolicy {
    /// Every walk starts at a uniformly random node.
    UniformRandom,
    /// Node 0 starts the first `walks_per_node` walks, node 1 the next
    /// batch, and so on through the whole graph.
    CyclicByNode,
}

/// What a walk does upon reaching a node with no outlinks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadEndPolicy {
    /// Jump to a uniformly random node and keep walking.
    Teleport,
    /// The walk ends at the dead end.
    Terminate,
}

/// Which visits enter the tally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountPolicy {
    /// Only the page the surfer was on when boredom struck.
    EndpointOnly,
    /// Every page at every step, the start included.
    EveryVisit,
}

/// How the merged tally becomes a score vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Normalization {
    /// count / walks.
    PerWalk,
    /// count * BORED / walks.
    BoredPerWalk,
    /// count / total visits across all walks.
    PerVisit,
}

/// One estimator's walk behavior.
#[derive(Debug, Clone, Copy)]
pub struct WalkPlan {
    pub start: StartPolicy,
    pub dead_end: DeadEndPolicy,
    pub counting: CountPolicy,
    pub normalization: Normalization,
}

/// How much simulation to run.
#[derive(Debug, Clone, Copy)]
pub struct WalkBudget {
    /// Total number of walks.
    pub walks: u64,
    /// Walks per start node; only consulted by [`StartPolicy::CyclicByNode`].
    pub walks_per_node: u64,
}

/// The normalized estimate plus the raw simulation totals.
#[derive(Debug, Clone)]
pub struct WalkRun {
    pub scores: ScoreVector,
    pub walks: u64,
    pub visits: u64,
}

// ============================================================================
// Driver
// ============================================================================

/// Simulate `budget.walks` independent walks over `graph` and normalize the
/// merged tally according to the plan.
pub fn simulate_walks(graph: &LinkGraph, plan: WalkPlan, budget: WalkBudget, seed: u64) -> WalkRun {
    let n = graph.node_count();
    if n == 0 {
        return WalkRun {
            scores: ScoreVector::from_vec(Vec::new()),
            walks: 0,
            visits: 0,
        };
    }

    let (counts, visits) = (0..budget.walks)
        .into_par_iter()
        .fold(
            || (vec![0u64; n], 0u64),
            |(mut counts, mut visits), walk| {
                let mut rng = XorShift64::new(stream_seed(seed, walk));
                let start = match plan.start {
                    StartPolicy::UniformRandom => rng.pick(n) as DocId,
                    StartPolicy::CyclicByNode => {
                        ((walk / budget.walks_per_node.max(1)) % n as u64) as DocId
                    }
                };
                visits += walk_once(graph, plan, start, &mut rng, &mut counts);
                (counts, visits)
            },
        )
        .reduce(
            || (vec![0u64; n], 0u64),
            |(mut acc, acc_visits), (counts, visits)| {
                for (a, c) in acc.iter_mut().zip(counts) {
                    *a += c;
                }
                (acc, acc_visits + visits)
            },
        );

    debug!(
        walks = budget.walks,
        visits, "random-walk simulation finished"
    );

    let scores = normalize(&counts, plan.normalization, budget.walks, visits);
    WalkRun {
        scores,
        walks: budget.walks,
        visits,
    }
}

/// Run one walk, tallying into `counts`; returns the number of visits the
/// walk contributed.
fn walk_once(
    graph: &LinkGraph,
    plan: WalkPlan,
    start: DocId,
    rng: &mut XorShift64,
    counts: &mut [u64],
) -> u64 {
    let n = counts.len();
    let mut current = start;
    let mut visits = 0u64;

    loop {
        if plan.counting == CountPolicy::EveryVisit {
            counts[current as usize] += 1;
            visits += 1;
        }
        if rng.next_f64() <= BORED {
            break;
        }
        let outs = graph.outlinks(current);
        if !outs.is_empty() {
            current = outs[rng.pick(outs.len())];
        } else {
            match plan.dead_end {
                DeadEndPolicy::Teleport => current = rng.pick(n) as DocId,
                DeadEndPolicy::Terminate => break,
            }
        }
    }

    if plan.counting == CountPolicy::EndpointOnly {
        counts[current as usize] += 1;
        visits = 1;
    }
    visits
}

fn normalize(counts: &[u64], normalization: Normalization, walks: u64, visits: u64) -> ScoreVector {
    let scores = match normalization {
        Normalization::PerWalk => {
            let denom = walks.max(1) as f64;
            counts.iter().map(|&c| c as f64 / denom).collect()
        }
        Normalization::BoredPerWalk => {
            let denom = walks.max(1) as f64;
            counts.iter().map(|&c| c as f64 * BORED / denom).collect()
        }
        Normalization::PerVisit => {
            if visits == 0 {
                vec![0.0; counts.len()]
            } else {
                let denom = visits as f64;
                counts.iter().map(|&c| c as f64 / denom).collect()
            }
        }
    };
    ScoreVector::from_vec(scores)
}
