//! k-nearest-neighbor graph construction.
//!
//! Every node ranks all nodes by Euclidean distance and links itself to the
//! `k` closest ones. The neighbor relation is then made symmetric: when A
//! picks B, B is recorded as a neighbor of A *and* A as a neighbor of B.
//! A node therefore always has at least `k` neighbors, and more when other
//! nodes picked it without being picked back.
//!
//! The link list keeps one entry per pick, `(picker, picked)`. When two
//! nodes pick each other both `(A, B)` and `(B, A)` appear; the renderer
//! draws every entry.
//!
//! # Complexity
//!
//! Building is `O(N² log N)`: a full distance sort per node. That is fine
//! for the low thousands of nodes this crate is used with.

use crate::error::NetworkError;
use crate::Vec3;
use std::collections::BTreeSet;

/// Stable node identifier, an index into every per-node array.
pub type NodeId = u32;

/// Neighbors picked per node unless configured otherwise.
pub const DEFAULT_K: usize = 6;

/// A directed pick `(a, b)`: node `a` chose `b` as one of its nearest neighbors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Link {
    pub a: NodeId,
    pub b: NodeId,
}

impl Link {
    pub fn new(a: NodeId, b: NodeId) -> Self {
        Self { a, b }
    }

    /// The same pair with endpoints swapped.
    pub fn reversed(self) -> Self {
        Self { a: self.b, b: self.a }
    }

    /// The pair ordered so that `a <= b`.
    pub fn canonical(self) -> Self {
        if self.a <= self.b {
            self
        } else {
            self.reversed()
        }
    }
}

/// Symmetric adjacency plus the link list used for drawing.
///
/// Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Graph {
    neighbors: Vec<BTreeSet<NodeId>>,
    links: Vec<Link>,
    k: usize,
}

impl Graph {
    /// Build the `k`-nearest-neighbor graph over `positions`.
    ///
    /// Node `i` is the point at `positions[i]`. Distance ties are broken by
    /// node id, so the result depends only on the input.
    ///
    /// # Errors
    ///
    /// [`NetworkError::InsufficientNodes`] if there are not more than `k`
    /// points, and [`NetworkError::InvalidParameter`] if `k` is zero or a
    /// position is not finite.
    pub fn build(positions: &[Vec3], k: usize) -> Result<Self, NetworkError> {
        if k == 0 {
            return Err(NetworkError::InvalidParameter {
                name: "k",
                reason: "must be at least 1".into(),
            });
        }
        let n = positions.len();
        if n <= k {
            return Err(NetworkError::InsufficientNodes { nodes: n, k });
        }
        if let Some(i) = positions.iter().position(|p| !p.is_finite()) {
            return Err(NetworkError::InvalidParameter {
                name: "positions",
                reason: format!("node {} has non-finite position {}", i, positions[i]),
            });
        }

        let mut neighbors = vec![BTreeSet::new(); n];
        let mut links = Vec::with_capacity(n * k);
        let mut ranked: Vec<(f32, NodeId)> = Vec::with_capacity(n);

        for (a, &origin) in positions.iter().enumerate() {
            ranked.clear();
            ranked.extend(
                positions
                    .iter()
                    .enumerate()
                    .map(|(b, &p)| (origin.distance(p), b as NodeId)),
            );
            // Stable: equal distances keep id order.
            ranked.sort_by(|x, y| x.0.total_cmp(&y.0));

            let a = a as NodeId;
            for &(_, b) in ranked.iter().filter(|&&(_, b)| b != a).take(k) {
                neighbors[a as usize].insert(b);
                neighbors[b as usize].insert(a);
                links.push(Link::new(a, b));
            }
        }

        Ok(Self { neighbors, links, k })
    }

    /// Build a graph from explicit neighbor lists.
    ///
    /// The relation is symmetrized and one link is emitted per listed
    /// entry. `k` is reported as the smallest list length.
    ///
    /// # Errors
    ///
    /// [`NetworkError::InvalidNeighbor`] if an entry is out of range or
    /// names the node itself.
    pub fn from_adjacency(lists: &[Vec<NodeId>]) -> Result<Self, NetworkError> {
        let n = lists.len();
        let mut neighbors = vec![BTreeSet::new(); n];
        let mut links = Vec::new();

        for (a, list) in lists.iter().enumerate() {
            for &b in list {
                if b as usize >= n || b as usize == a {
                    return Err(NetworkError::InvalidNeighbor { node: a, neighbor: b, len: n });
                }
                neighbors[a].insert(b);
                neighbors[b as usize].insert(a as NodeId);
                links.push(Link::new(a as NodeId, b));
            }
        }

        let k = lists.iter().map(Vec::len).min().unwrap_or(0);
        Ok(Self { neighbors, links, k })
    }

    /// Number of nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Neighbors picked per node at construction.
    #[inline]
    pub fn k(&self) -> usize {
        self.k
    }

    /// Neighbors of `id`, in ascending id order.
    ///
    /// # Panics
    ///
    /// Panics if `id` is not a node of this graph.
    #[inline]
    pub fn neighbors(&self, id: NodeId) -> &BTreeSet<NodeId> {
        &self.neighbors[id as usize]
    }

    /// Number of neighbors of `id`.
    #[inline]
    pub fn degree(&self, id: NodeId) -> usize {
        self.neighbors[id as usize].len()
    }

    /// Whether `a` and `b` are neighbors.
    pub fn contains_edge(&self, a: NodeId, b: NodeId) -> bool {
        self.neighbors
            .get(a as usize)
            .is_some_and(|set| set.contains(&b))
    }

    /// One link per pick, in build order.
    #[inline]
    pub fn links(&self) -> &[Link] {
        &self.links
    }

    /// Iterate over `(id, neighbors)` for every node.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &BTreeSet<NodeId>)> {
        self.neighbors
            .iter()
            .enumerate()
            .map(|(id, set)| (id as NodeId, set))
    }

    /// Links with reverse duplicates removed, each ordered `a <= b`.
    ///
    /// Not used by the simulation; offered for consumers that want a simple
    /// undirected edge set.
    pub fn unique_links(&self) -> Vec<Link> {
        let set: BTreeSet<Link> = self.links.iter().map(|l| l.canonical()).collect();
        set.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube() -> Vec<Vec3> {
        (0..8)
            .map(|i| Vec3::new((i & 1) as f32, ((i >> 1) & 1) as f32, ((i >> 2) & 1) as f32))
            .collect()
    }

    #[test]
    fn test_insufficient_nodes() {
        let points = vec![Vec3::ZERO; 6];
        match Graph::build(&points, DEFAULT_K) {
            Err(NetworkError::InsufficientNodes { nodes, k }) => {
                assert_eq!(nodes, 6);
                assert_eq!(k, 6);
            }
            other => panic!("expected InsufficientNodes, got {:?}", other),
        }
    }

    #[test]
    fn test_minimum_node_count() {
        let points: Vec<Vec3> = (0..7).map(|i| Vec3::new(i as f32, 0.0, 0.0)).collect();
        let graph = Graph::build(&points, DEFAULT_K).unwrap();
        // With exactly k + 1 nodes everyone links to everyone else.
        for (id, set) in graph.iter() {
            assert_eq!(set.len(), 6);
            assert!(!set.contains(&id));
        }
    }

    #[test]
    fn test_zero_k_rejected() {
        assert!(matches!(
            Graph::build(&unit_cube(), 0),
            Err(NetworkError::InvalidParameter { name: "k", .. })
        ));
    }

    #[test]
    fn test_non_finite_position_rejected() {
        let mut points = unit_cube();
        points[3].y = f32::NAN;
        assert!(Graph::build(&points, DEFAULT_K).is_err());
    }

    #[test]
    fn test_cube_corners_skip_space_diagonal() {
        let graph = Graph::build(&unit_cube(), DEFAULT_K).unwrap();
        for id in 0..8u32 {
            let opposite = id ^ 0b111;
            let expected: BTreeSet<NodeId> =
                (0..8).filter(|&j| j != id && j != opposite).collect();
            assert_eq!(graph.neighbors(id), &expected, "corner {}", id);
        }
        assert_eq!(graph.links().len(), 8 * 6);
    }

    #[test]
    fn test_ties_broken_by_id() {
        // Node 0 at the origin, eight nodes equidistant on the axes.
        let mut points = vec![Vec3::ZERO];
        for axis in [Vec3::X, Vec3::Y, Vec3::Z, -Vec3::X, -Vec3::Y, -Vec3::Z, Vec3::X * 2.0] {
            points.push(axis);
        }
        let graph = Graph::build(&points, DEFAULT_K).unwrap();
        let picks: Vec<NodeId> = graph.links().iter().filter(|l| l.a == 0).map(|l| l.b).collect();
        assert_eq!(picks, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_link_helpers() {
        let link = Link::new(5, 2);
        assert_eq!(link.reversed(), Link::new(2, 5));
        assert_eq!(link.canonical(), Link::new(2, 5));
        assert_eq!(Link::new(1, 3).canonical(), Link::new(1, 3));
    }

    #[test]
    fn test_unique_links_on_cube() {
        let graph = Graph::build(&unit_cube(), DEFAULT_K).unwrap();
        // Every pick is mutual on a cube: 48 picks, 24 distinct edges.
        assert_eq!(graph.unique_links().len(), 24);
    }

    #[test]
    fn test_from_adjacency_symmetrizes() {
        let graph = Graph::from_adjacency(&[vec![1], vec![2], vec![]]).unwrap();
        assert!(graph.contains_edge(1, 0));
        assert!(graph.contains_edge(2, 1));
        assert!(!graph.contains_edge(0, 2));
        assert_eq!(graph.links(), &[Link::new(0, 1), Link::new(1, 2)]);
        assert_eq!(graph.k(), 0);
    }

    #[test]
    fn test_from_adjacency_rejects_bad_entries() {
        assert!(matches!(
            Graph::from_adjacency(&[vec![0], vec![]]),
            Err(NetworkError::InvalidNeighbor { node: 0, neighbor: 0, .. })
        ));
        assert!(matches!(
            Graph::from_adjacency(&[vec![4], vec![]]),
            Err(NetworkError::InvalidNeighbor { neighbor: 4, len: 2, .. })
        ));
    }
}
