//! Render-facing view of a network.
//!
//! The renderer never touches the simulation directly. After each tick it
//! takes a [`RenderSnapshot`] and re-uploads it in full:
//!
//! - `positions` and `links` do not change after construction,
//! - `infected` and `link_infected` are replaced every tick.
//!
//! [`NodeVertex`] and [`LinkVertex`] are `#[repr(C)]` and `Pod`, so the
//! arrays from [`RenderSnapshot::node_vertices`] and
//! [`RenderSnapshot::link_vertices`] can go straight into a vertex buffer
//! with `bytemuck::cast_slice`.

use crate::epidemic::InfectionState;
use crate::graph::Link;
use crate::Vec3;
use bytemuck::{Pod, Zeroable};

/// Colors for the two node states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub healthy: Vec3,
    pub infected: Vec3,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            healthy: Vec3::new(0.1, 0.9, 0.2), // Green
            infected: Vec3::new(1.0, 0.1, 0.1), // Red
        }
    }
}

impl Palette {
    #[inline]
    pub fn color(&self, infected: bool) -> Vec3 {
        if infected {
            self.infected
        } else {
            self.healthy
        }
    }
}

/// One point sprite per node.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct NodeVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// One line endpoint; two per link, colored by that endpoint's node.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct LinkVertex {
    pub position: [f32; 3],
    pub color: [f32; 3],
}

/// Everything a renderer needs for one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSnapshot {
    pub positions: Vec<Vec3>,
    pub links: Vec<Link>,
    /// Aligned to node id.
    pub infected: Vec<bool>,
    /// `(infected[a], infected[b])` for every link, aligned to `links`.
    pub link_infected: Vec<(bool, bool)>,
}

impl RenderSnapshot {
    /// Copy out the render data for the current state.
    pub fn capture(positions: &[Vec3], links: &[Link], state: &InfectionState) -> Self {
        let link_infected = links
            .iter()
            .map(|l| (state.is_infected(l.a), state.is_infected(l.b)))
            .collect();

        Self {
            positions: positions.to_vec(),
            links: links.to_vec(),
            infected: state.as_slice().to_vec(),
            link_infected,
        }
    }

    /// Replace only the per-tick data, keeping positions and links.
    pub fn refresh(&mut self, state: &InfectionState) {
        self.infected.clear();
        self.infected.extend_from_slice(state.as_slice());
        for (flags, link) in self.link_infected.iter_mut().zip(&self.links) {
            *flags = (state.is_infected(link.a), state.is_infected(link.b));
        }
    }

    pub fn node_vertices(&self, palette: &Palette) -> Vec<NodeVertex> {
        self.positions
            .iter()
            .zip(&self.infected)
            .map(|(p, &infected)| NodeVertex {
                position: p.to_array(),
                color: palette.color(infected).to_array(),
            })
            .collect()
    }

    /// Two vertices per link, `a` then `b`.
    pub fn link_vertices(&self, palette: &Palette) -> Vec<LinkVertex> {
        let mut out = Vec::with_capacity(self.links.len() * 2);
        for (link, &(a_inf, b_inf)) in self.links.iter().zip(&self.link_infected) {
            out.push(LinkVertex {
                position: self.positions[link.a as usize].to_array(),
                color: palette.color(a_inf).to_array(),
            });
            out.push(LinkVertex {
                position: self.positions[link.b as usize].to_array(),
                color: palette.color(b_inf).to_array(),
            });
        }
        out
    }
}
