//! Network builder and tick driver.

use crate::epidemic::{self, EpidemicParams, InfectionState, TickSummary};
use crate::error::NetworkError;
use crate::graph::{Graph, Link, DEFAULT_K};
use crate::render::RenderSnapshot;
use crate::rng::UniformSource;
use crate::spawn::SpawnShape;
use crate::Vec3;
use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info};

/// A network builder.
///
/// Use method chaining to configure, then call `.build()`.
///
/// ```ignore
/// let mut network = NetworkBuilder::new()
///     .with_node_count(2000)
///     .with_spawn_shape(SpawnShape::Sphere { radius: 1.0 })
///     .with_seed(42)
///     .build()?;
///
/// network.tick();
/// let frame = network.snapshot();
/// ```
#[derive(Debug, Clone)]
pub struct NetworkBuilder {
    node_count: usize,
    k: usize,
    spawn: SpawnShape,
    positions: Option<Vec<Vec3>>,
    params: EpidemicParams,
    initial_infected: f32,
    seed: Option<u64>,
}

impl Default for NetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl NetworkBuilder {
    /// Create a builder with default settings.
    pub fn new() -> Self {
        Self {
            node_count: 1000,
            k: DEFAULT_K,
            spawn: SpawnShape::default(),
            positions: None,
            params: EpidemicParams::default(),
            initial_infected: 10.0,
            seed: None,
        }
    }

    /// Set the number of nodes to scatter.
    pub fn with_node_count(mut self, count: usize) -> Self {
        self.node_count = count;
        self
    }

    /// Set the number of nearest neighbors each node links to.
    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    /// Set the domain nodes are scattered over.
    pub fn with_spawn_shape(mut self, shape: SpawnShape) -> Self {
        self.spawn = shape;
        self
    }

    /// Use these positions instead of scattering. Overrides the node count.
    pub fn with_positions(mut self, positions: Vec<Vec3>) -> Self {
        self.positions = Some(positions);
        self
    }

    /// Set the epidemic parameters.
    pub fn with_params(mut self, params: EpidemicParams) -> Self {
        self.params = params;
        self
    }

    /// Expected number of nodes infected at start; each node is infected
    /// with probability `expected / N`.
    pub fn with_initial_infected(mut self, expected: f32) -> Self {
        self.initial_infected = expected;
        self
    }

    /// Seed the generator for a reproducible run.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Scatter nodes, build the graph and seed the first infections.
    pub fn build(self) -> Result<Network, NetworkError> {
        self.params.validate()?;
        if !(self.initial_infected.is_finite() && self.initial_infected >= 0.0) {
            return Err(NetworkError::InvalidParameter {
                name: "initial_infected",
                reason: format!("must be finite and non-negative, got {}", self.initial_infected),
            });
        }

        let mut rng = match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_entropy(),
        };

        let positions = match self.positions {
            Some(positions) => positions,
            None => {
                self.spawn.validate()?;
                self.spawn.scatter(self.node_count, &mut rng)
            }
        };

        let graph = Graph::build(&positions, self.k)?;
        let state = seed_infections(positions.len(), self.initial_infected, &mut rng);

        info!(
            nodes = graph.len(),
            links = graph.links().len(),
            k = graph.k(),
            infected = state.infected_count(),
            seed = ?self.seed,
            "Network built"
        );

        let snapshot = RenderSnapshot::capture(&positions, graph.links(), &state);

        Ok(Network {
            positions,
            graph,
            state,
            snapshot,
            params: self.params,
            rng,
            ticks: 0,
        })
    }
}

/// Infect each of `n` nodes with probability `expected / n`.
fn seed_infections<R: UniformSource + ?Sized>(n: usize, expected: f32, rng: &mut R) -> InfectionState {
    let p = if n == 0 { 0.0 } else { (expected / n as f32).min(1.0) };
    let flags = (0..n).map(|_| rng.uniform() < p).collect();
    InfectionState::from_flags(flags)
}

/// Aggregate over a run of ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunStats {
    pub ticks: u64,
    /// Ticks in which the reseed pass ran.
    pub reseed_ticks: u64,
    pub peak_infected: usize,
    pub min_infected: usize,
    pub final_infected: usize,
}

/// A built network: fixed positions and graph, evolving infection state.
#[derive(Debug, Clone)]
pub struct Network {
    positions: Vec<Vec3>,
    graph: Graph,
    state: InfectionState,
    snapshot: RenderSnapshot,
    params: EpidemicParams,
    rng: SmallRng,
    ticks: u64,
}

impl Network {
    /// Advance the simulation by one tick.
    pub fn tick(&mut self) -> TickSummary {
        // `state` always matches `graph`: built together, replaced only through `set_state`.
        let (next, summary) =
            epidemic::advance(&self.params, &self.state, &self.graph, &mut self.rng);
        self.state = next;
        self.snapshot.refresh(&self.state);
        self.ticks += 1;

        if summary.reseed_triggered {
            info!(
                tick = self.ticks,
                after_spread = summary.after_spread,
                reseeded = summary.reseeded,
                "Infection below threshold, reseeded"
            );
        } else {
            debug!(tick = self.ticks, infected = summary.infected, "Tick");
        }
        summary
    }

    /// Advance `ticks` ticks.
    pub fn run(&mut self, ticks: u64) -> RunStats {
        let start = self.infected_count();
        let mut stats = RunStats {
            peak_infected: start,
            min_infected: start,
            final_infected: start,
            ..RunStats::default()
        };

        for _ in 0..ticks {
            let summary = self.tick();
            stats.ticks += 1;
            if summary.reseed_triggered {
                stats.reseed_ticks += 1;
            }
            stats.peak_infected = stats.peak_infected.max(summary.infected);
            stats.min_infected = stats.min_infected.min(summary.infected);
            stats.final_infected = summary.infected;
        }
        stats
    }

    /// Replace the infection state, e.g. to start from a chosen outbreak.
    ///
    /// # Errors
    ///
    /// [`NetworkError::InvalidParameter`] if the state has the wrong length.
    pub fn set_state(&mut self, state: InfectionState) -> Result<(), NetworkError> {
        epidemic::check_state_len(&state, &self.graph)?;
        self.state = state;
        self.snapshot.refresh(&self.state);
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Node positions, indexed by id.
    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    #[inline]
    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    #[inline]
    pub fn links(&self) -> &[Link] {
        self.graph.links()
    }

    #[inline]
    pub fn state(&self) -> &InfectionState {
        &self.state
    }

    /// Infection flags, indexed by id.
    #[inline]
    pub fn infected(&self) -> &[bool] {
        self.state.as_slice()
    }

    pub fn infected_count(&self) -> usize {
        self.state.infected_count()
    }

    /// Ticks run since the network was built.
    #[inline]
    pub fn tick_count(&self) -> u64 {
        self.ticks
    }

    #[inline]
    pub fn params(&self) -> &EpidemicParams {
        &self.params
    }

    /// Render data for the current state, kept up to date by every tick.
    #[inline]
    pub fn snapshot(&self) -> &RenderSnapshot {
        &self.snapshot
    }
}
