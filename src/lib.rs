//! # netspread
//!
//! Nearest-neighbor networks over random 3D point clouds, with a stochastic
//! epidemic spreading along their links.
//!
//! netspread builds the network once and then advances the infection one
//! tick at a time, handing render-ready data to whatever draws it.
//!
//! ## Quick Start
//!
//! ```ignore
//! use netspread::prelude::*;
//!
//! fn main() -> Result<(), NetworkError> {
//!     let mut network = NetworkBuilder::new()
//!         .with_node_count(2000)
//!         .with_spawn_shape(SpawnShape::Sphere { radius: 1.0 })
//!         .with_seed(42)
//!         .build()?;
//!
//!     loop {
//!         network.tick();
//!         let frame = network.snapshot();
//!         // upload frame.node_vertices(&Palette::default()) ...
//!     }
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Graph
//!
//! Each node links to its 6 nearest neighbors by Euclidean distance. The
//! neighbor relation is symmetric; the link list keeps one entry per pick,
//! so mutual picks appear in both directions. See [`graph`].
//!
//! ### Epidemic
//!
//! Every tick an infected node recovers with probability 0.04 and infects
//! each neighbor with probability 0.01. When fewer than 10 nodes remain
//! infected, every node is reseeded with probability `10 / N`. The update
//! is synchronous: the next state is computed from the previous one only.
//! See [`epidemic`].
//!
//! ### Randomness
//!
//! All trials draw from one [`UniformSource`]. Any `rand` generator works;
//! [`rng::FixedSample`] and [`rng::SampleSequence`] make a tick
//! reproducible in tests.
//!
//! ## Module Overview
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`graph`] | [`Graph`], [`Link`], k-NN construction |
//! | [`epidemic`] | [`EpidemicParams`], [`InfectionState`], [`epidemic::step`] |
//! | [`network`] | [`NetworkBuilder`], [`Network`] |
//! | [`render`] | [`RenderSnapshot`], [`Palette`], vertex types |
//! | [`spawn`] | [`SpawnShape`] |
//! | [`config`] | [`NetworkConfig`] JSON configuration |

pub mod config;
pub mod epidemic;
mod error;
pub mod graph;
pub mod network;
pub mod render;
pub mod rng;
pub mod spawn;

pub use bytemuck;
pub use config::NetworkConfig;
pub use epidemic::{EpidemicParams, InfectionState, TickSummary};
pub use error::NetworkError;
pub use glam::Vec3;
pub use graph::{Graph, Link, NodeId, DEFAULT_K};
pub use network::{Network, NetworkBuilder, RunStats};
pub use render::{LinkVertex, NodeVertex, Palette, RenderSnapshot};
pub use rng::UniformSource;
pub use spawn::SpawnShape;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use netspread::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::NetworkConfig;
    pub use crate::epidemic::{EpidemicParams, InfectionState, TickSummary};
    pub use crate::error::NetworkError;
    pub use crate::graph::{Graph, Link, NodeId, DEFAULT_K};
    pub use crate::network::{Network, NetworkBuilder, RunStats};
    pub use crate::render::{LinkVertex, NodeVertex, Palette, RenderSnapshot};
    pub use crate::rng::UniformSource;
    pub use crate::spawn::SpawnShape;
    pub use crate::Vec3;
}
