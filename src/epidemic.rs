//! Stochastic SIS spread over a fixed graph.
//!
//! Each tick every infected node independently
//!
//! 1. stays infected unless its recovery trial succeeds, and
//! 2. runs one transmission trial per neighbor, infecting that neighbor on
//!    success, whatever the neighbor's current state.
//!
//! The next state is built in a separate buffer that starts all-healthy, so
//! every trial reads the previous tick's state only. Afterwards, if fewer
//! than `reseed_threshold` nodes are infected, every node gets one extra
//! trial that can infect it. Without that the process would eventually
//! reach zero infections and stay there.
//!
//! # Draw order
//!
//! Samples are taken from the [`UniformSource`] in a fixed order, which is
//! what makes a tick reproducible with a replayed source:
//!
//! - infected nodes in ascending id order: one recovery draw, then one
//!   transmission draw per neighbor in ascending id order;
//! - then, only when reseeding, one draw per node in ascending id order.

use crate::error::{check_probability, NetworkError};
use crate::graph::{Graph, NodeId};
use crate::rng::UniformSource;
use serde::{Deserialize, Serialize};

/// Per-tick probabilities and the extinction safeguard settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EpidemicParams {
    /// Chance per tick that an infected node recovers.
    pub recovery_probability: f32,
    /// Chance per tick and per neighbor that an infected node infects it.
    pub transmission_probability: f32,
    /// Reseeding runs when fewer than this many nodes are infected after spreading.
    pub reseed_threshold: usize,
    /// Expected number of nodes a reseed pass infects; each node is hit
    /// with probability `reseed_expected / N`.
    pub reseed_expected: f32,
    /// Fixed per-node reseed probability, overriding `reseed_expected`.
    pub reseed_probability: Option<f32>,
}

impl Default for EpidemicParams {
    fn default() -> Self {
        Self {
            recovery_probability: 0.04,
            transmission_probability: 0.01,
            reseed_threshold: 10,
            reseed_expected: 10.0,
            reseed_probability: None,
        }
    }
}

impl EpidemicParams {
    /// Set the per-tick recovery probability.
    pub fn with_recovery(mut self, p: f32) -> Self {
        self.recovery_probability = p;
        self
    }

    /// Set the per-neighbor transmission probability.
    pub fn with_transmission(mut self, p: f32) -> Self {
        self.transmission_probability = p;
        self
    }

    /// Set the infected count below which reseeding kicks in.
    pub fn with_reseed_threshold(mut self, threshold: usize) -> Self {
        self.reseed_threshold = threshold;
        self
    }

    /// Set the expected number of nodes infected by one reseed pass.
    pub fn with_reseed_expected(mut self, expected: f32) -> Self {
        self.reseed_expected = expected;
        self
    }

    /// Use a fixed per-node reseed probability instead of `reseed_expected / N`.
    pub fn with_reseed_probability(mut self, p: f32) -> Self {
        self.reseed_probability = Some(p);
        self
    }

    /// Check every probability lies in `[0, 1]`.
    pub fn validate(&self) -> Result<(), NetworkError> {
        check_probability("recovery_probability", self.recovery_probability)?;
        check_probability("transmission_probability", self.transmission_probability)?;
        if let Some(p) = self.reseed_probability {
            check_probability("reseed_probability", p)?;
        }
        if !(self.reseed_expected.is_finite() && self.reseed_expected >= 0.0) {
            return Err(NetworkError::InvalidParameter {
                name: "reseed_expected",
                reason: format!("must be finite and non-negative, got {}", self.reseed_expected),
            });
        }
        Ok(())
    }

    /// Per-node reseed probability for a network of `n` nodes.
    pub fn reseed_probability_for(&self, n: usize) -> f32 {
        match self.reseed_probability {
            Some(p) => p,
            None if n == 0 => 0.0,
            None => (self.reseed_expected / n as f32).min(1.0),
        }
    }
}

/// Infection flag for every node, indexed by id.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InfectionState {
    flags: Vec<bool>,
}

impl InfectionState {
    /// All `n` nodes healthy.
    pub fn healthy(n: usize) -> Self {
        Self { flags: vec![false; n] }
    }

    pub fn from_flags(flags: Vec<bool>) -> Self {
        Self { flags }
    }

    /// All healthy except the given ids. Out-of-range ids are ignored.
    pub fn with_infected(n: usize, infected: &[NodeId]) -> Self {
        let mut state = Self::healthy(n);
        for &id in infected {
            state.set(id, true);
        }
        state
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.flags.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.flags.is_empty()
    }

    /// Whether `id` is infected. Unknown ids read as healthy.
    #[inline]
    pub fn is_infected(&self, id: NodeId) -> bool {
        self.flags.get(id as usize).copied().unwrap_or(false)
    }

    /// Set the flag of `id`. Unknown ids are ignored.
    #[inline]
    pub fn set(&mut self, id: NodeId, infected: bool) {
        if let Some(flag) = self.flags.get_mut(id as usize) {
            *flag = infected;
        }
    }

    pub fn infected_count(&self) -> usize {
        self.flags.iter().filter(|&&f| f).count()
    }

    /// Flags aligned to node id.
    #[inline]
    pub fn as_slice(&self) -> &[bool] {
        &self.flags
    }

    /// Ids of infected nodes in ascending order.
    pub fn iter_infected(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.flags
            .iter()
            .enumerate()
            .filter(|&(_, &f)| f)
            .map(|(id, _)| id as NodeId)
    }

    pub fn into_flags(self) -> Vec<bool> {
        self.flags
    }
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TickSummary {
    /// Infected before the tick.
    pub before: usize,
    /// Infected after recovery and transmission, before reseeding.
    pub after_spread: usize,
    /// Whether the reseed pass ran.
    pub reseed_triggered: bool,
    /// Nodes newly infected by reseeding.
    pub reseeded: usize,
    /// Infected at the end of the tick.
    pub infected: usize,
}

/// Advance `state` by one tick over `graph`.
///
/// Pure in everything but `rng`: the same state, graph and sample stream
/// always give the same result. The returned state has the same length as
/// `state`.
///
/// `params` are assumed valid (see [`EpidemicParams::validate`]).
///
/// # Errors
///
/// [`NetworkError::InvalidParameter`] if `state` does not hold exactly one
/// flag per node of `graph`. No samples are drawn in that case.
pub fn step<R: UniformSource + ?Sized>(
    params: &EpidemicParams,
    state: &InfectionState,
    graph: &Graph,
    rng: &mut R,
) -> Result<InfectionState, NetworkError> {
    step_with_summary(params, state, graph, rng).map(|(next, _)| next)
}

/// [`step`], also reporting what the tick did.
pub fn step_with_summary<R: UniformSource + ?Sized>(
    params: &EpidemicParams,
    state: &InfectionState,
    graph: &Graph,
    rng: &mut R,
) -> Result<(InfectionState, TickSummary), NetworkError> {
    check_state_len(state, graph)?;
    Ok(advance(params, state, graph, rng))
}

/// Fail unless `state` has one flag per node of `graph`.
pub(crate) fn check_state_len(state: &InfectionState, graph: &Graph) -> Result<(), NetworkError> {
    if state.len() == graph.len() {
        Ok(())
    } else {
        Err(NetworkError::InvalidParameter {
            name: "state",
            reason: format!("expected {} flags, got {}", graph.len(), state.len()),
        })
    }
}

/// One tick without the length check; callers guarantee `state` matches `graph`.
pub(crate) fn advance<R: UniformSource + ?Sized>(
    params: &EpidemicParams,
    state: &InfectionState,
    graph: &Graph,
    rng: &mut R,
) -> (InfectionState, TickSummary) {
    let n = state.len();
    let mut next = vec![false; n];

    for a in state.iter_infected() {
        if rng.uniform() >= params.recovery_probability {
            next[a as usize] = true;
        }
        for &b in graph.neighbors(a) {
            if rng.uniform() < params.transmission_probability {
                next[b as usize] = true;
            }
        }
    }

    let after_spread = next.iter().filter(|&&f| f).count();
    let mut summary = TickSummary {
        before: state.infected_count(),
        after_spread,
        ..TickSummary::default()
    };

    if after_spread < params.reseed_threshold {
        summary.reseed_triggered = true;
        let p = params.reseed_probability_for(n);
        for flag in next.iter_mut() {
            if rng.uniform() < p && !*flag {
                *flag = true;
                summary.reseeded += 1;
            }
        }
    }

    summary.infected = after_spread + summary.reseeded;
    (InfectionState::from_flags(next), summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{FixedSample, SampleSequence};

    /// 0 - 1 - 2 - 3 path.
    fn path4() -> Graph {
        Graph::from_adjacency(&[vec![1], vec![2], vec![3], vec![]]).unwrap()
    }

    fn no_reseed(params: EpidemicParams) -> EpidemicParams {
        params.with_reseed_threshold(0)
    }

    #[test]
    fn test_defaults() {
        let params = EpidemicParams::default();
        assert_eq!(params.recovery_probability, 0.04);
        assert_eq!(params.transmission_probability, 0.01);
        assert_eq!(params.reseed_threshold, 10);
        assert!((params.reseed_probability_for(100) - 0.1).abs() < 1e-6);
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        assert!(EpidemicParams::default().with_recovery(1.5).validate().is_err());
        assert!(EpidemicParams::default().with_transmission(-0.1).validate().is_err());
        assert!(EpidemicParams::default().with_reseed_probability(2.0).validate().is_err());
        assert!(EpidemicParams::default().with_reseed_expected(-1.0).validate().is_err());
    }

    #[test]
    fn test_reseed_probability_capped() {
        let params = EpidemicParams::default();
        assert_eq!(params.reseed_probability_for(5), 1.0);
        assert_eq!(params.reseed_probability_for(0), 0.0);
        assert_eq!(params.with_reseed_probability(0.3).reseed_probability_for(1000), 0.3);
    }

    #[test]
    fn test_infected_node_stays_when_recovery_fails() {
        let params = no_reseed(EpidemicParams::default());
        let state = InfectionState::with_infected(4, &[1]);
        // 0.5 >= 0.04 keeps node 1, and 0.5 >= 0.01 transmits nothing.
        let next = step(&params, &state, &path4(), &mut FixedSample(0.5)).unwrap();
        assert_eq!(next, state);
    }

    #[test]
    fn test_recovery_and_transmission() {
        let params = no_reseed(EpidemicParams::default());
        let state = InfectionState::with_infected(4, &[1]);
        // Node 1: recover (0.0 < 0.04), then neighbors 0 and 2 both infected.
        let next = step(&params, &state, &path4(), &mut FixedSample(0.0)).unwrap();
        assert_eq!(next.as_slice(), &[true, false, true, false]);
    }

    #[test]
    fn test_transmission_reads_previous_state_only() {
        let params = no_reseed(EpidemicParams::default());
        let state = InfectionState::with_infected(4, &[0]);
        // Node 0 stays and infects node 1; node 1 was healthy at the start of
        // the tick so it draws nothing and cannot reach node 2.
        let mut seq = SampleSequence::new(vec![0.5, 0.0]);
        let next = step(&params, &state, &path4(), &mut seq).unwrap();
        assert_eq!(next.as_slice(), &[true, true, false, false]);
        assert_eq!(seq.drawn(), 2);
    }

    #[test]
    fn test_draw_order() {
        let params = no_reseed(EpidemicParams::default());
        let state = InfectionState::with_infected(4, &[1, 2]);
        // Node 1: recovery 0.9 (stays), neighbor 0 -> 0.9, neighbor 2 -> 0.9.
        // Node 2: recovery 0.0 (recovers), neighbor 1 -> 0.9, neighbor 3 -> 0.0 (infect).
        let mut seq = SampleSequence::new(vec![0.9, 0.9, 0.9, 0.0, 0.9, 0.0]);
        let next = step(&params, &state, &path4(), &mut seq).unwrap();
        assert_eq!(next.as_slice(), &[false, true, false, true]);
        assert_eq!(seq.drawn(), 6);
    }

    #[test]
    fn test_healthy_state_draws_only_for_reseed() {
        let params = EpidemicParams::default();
        let state = InfectionState::healthy(4);
        let mut seq = SampleSequence::new(vec![0.99]);
        let (next, summary) = step_with_summary(&params, &state, &path4(), &mut seq).unwrap();
        assert_eq!(seq.drawn(), 4);
        // 10 / 4 caps at 1.0, and 0.99 < 1.0.
        assert_eq!(next.infected_count(), 4);
        assert!(summary.reseed_triggered);
        assert_eq!(summary.reseeded, 4);
    }

    #[test]
    fn test_reseed_never_clears() {
        let params = EpidemicParams::default().with_reseed_probability(0.0);
        let state = InfectionState::with_infected(4, &[0, 3]);
        let (next, summary) = step_with_summary(&params, &state, &path4(), &mut FixedSample(0.5)).unwrap();
        assert!(summary.reseed_triggered);
        assert_eq!(summary.reseeded, 0);
        assert_eq!(next, state);
    }

    #[test]
    fn test_reseed_counts_only_new_infections() {
        let params = EpidemicParams::default().with_reseed_probability(1.0);
        let state = InfectionState::with_infected(4, &[0]);
        let (next, summary) = step_with_summary(&params, &state, &path4(), &mut FixedSample(0.5)).unwrap();
        assert_eq!(summary.after_spread, 1);
        assert_eq!(summary.reseeded, 3);
        assert_eq!(summary.infected, 4);
        assert_eq!(next.infected_count(), 4);
    }

    #[test]
    fn test_reseed_skipped_above_threshold() {
        let params = EpidemicParams::default().with_reseed_threshold(2);
        let state = InfectionState::with_infected(4, &[0, 1]);
        let (_, summary) = step_with_summary(&params, &state, &path4(), &mut FixedSample(0.5)).unwrap();
        assert_eq!(summary.after_spread, 2);
        assert!(!summary.reseed_triggered);
    }

    #[test]
    fn test_short_state_rejected() {
        let graph = Graph::from_adjacency(&[vec![1], vec![2], vec![3], vec![4], vec![]]).unwrap();
        let state = InfectionState::from_flags(vec![true; 3]);
        let mut seq = SampleSequence::new(vec![0.0]);
        let result = step(&EpidemicParams::default(), &state, &graph, &mut seq);
        assert!(matches!(result, Err(NetworkError::InvalidParameter { name: "state", .. })));
        assert_eq!(seq.drawn(), 0);
    }

    #[test]
    fn test_long_state_rejected() {
        let state = InfectionState::from_flags(vec![true; 6]);
        let result =
            step_with_summary(&EpidemicParams::default(), &state, &path4(), &mut FixedSample(0.0));
        assert!(matches!(result, Err(NetworkError::InvalidParameter { name: "state", .. })));
    }

    #[test]
    fn test_state_helpers() {
        let mut state = InfectionState::healthy(3);
        state.set(2, true);
        state.set(9, true);
        assert!(state.is_infected(2));
        assert!(!state.is_infected(9));
        assert_eq!(state.iter_infected().collect::<Vec<_>>(), vec![2]);
        assert_eq!(state.clone().into_flags(), vec![false, false, true]);
    }
}
