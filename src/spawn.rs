//! Random node placement.
//!
//! Nodes are scattered once when a network is built and never move. The
//! domain they are scattered over is described by a [`SpawnShape`]:
//!
//! ```ignore
//! let positions = SpawnShape::Sphere { radius: 1.0 }.scatter(2000, &mut rng);
//! ```

use crate::error::NetworkError;
use crate::Vec3;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::f32::consts::TAU;

/// Bounded 3D domain that node positions are drawn from.
///
/// All shapes are centered at the origin and sampled uniformly by volume
/// (or, for [`SpawnShape::Shell`], uniformly in direction).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SpawnShape {
    /// Axis-aligned cube from `-half_size` to `+half_size` on every axis.
    Cube { half_size: f32 },
    /// Solid ball.
    Sphere { radius: f32 },
    /// Hollow ball between two radii.
    Shell { inner: f32, outer: f32 },
}

impl Default for SpawnShape {
    fn default() -> Self {
        SpawnShape::Cube { half_size: 1.0 }
    }
}

impl SpawnShape {
    /// Reject extents that cannot be sampled.
    pub fn validate(&self) -> Result<(), NetworkError> {
        let positive = |name: &'static str, v: f32| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(NetworkError::InvalidParameter {
                    name,
                    reason: format!("must be finite and positive, got {}", v),
                })
            }
        };

        match *self {
            SpawnShape::Cube { half_size } => positive("half_size", half_size),
            SpawnShape::Sphere { radius } => positive("radius", radius),
            SpawnShape::Shell { inner, outer } => {
                positive("outer", outer)?;
                if !(inner.is_finite() && inner >= 0.0 && inner <= outer) {
                    return Err(NetworkError::InvalidParameter {
                        name: "inner",
                        reason: format!("must lie in [0, outer = {}], got {}", outer, inner),
                    });
                }
                Ok(())
            }
        }
    }

    /// Draw one position.
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec3 {
        match *self {
            SpawnShape::Cube { half_size } => random_in_cube(rng, half_size),
            SpawnShape::Sphere { radius } => {
                // Cube root for uniform volume distribution
                let r = radius * rng.gen::<f32>().cbrt();
                random_direction(rng) * r
            }
            SpawnShape::Shell { inner, outer } => {
                let r = inner + rng.gen::<f32>() * (outer - inner);
                random_direction(rng) * r
            }
        }
    }

    /// Draw `count` positions, one per node id.
    pub fn scatter<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<Vec3> {
        (0..count).map(|_| self.sample(rng)).collect()
    }
}

fn random_in_cube<R: Rng + ?Sized>(rng: &mut R, half_size: f32) -> Vec3 {
    Vec3::new(
        rng.gen_range(-half_size..half_size),
        rng.gen_range(-half_size..half_size),
        rng.gen_range(-half_size..half_size),
    )
}

/// Uniform unit vector.
fn random_direction<R: Rng + ?Sized>(rng: &mut R) -> Vec3 {
    let theta = rng.gen_range(0.0..TAU);
    let z: f32 = rng.gen_range(-1.0..1.0);
    let ring = (1.0 - z * z).max(0.0).sqrt();

    Vec3::new(ring * theta.cos(), ring * theta.sin(), z)
}
