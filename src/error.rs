//! Error types for netspread.
//!
//! Every failure is detected while a network is being constructed or its
//! configuration loaded. Once a [`Network`](crate::Network) exists, ticking
//! it cannot fail.

use std::fmt;

/// Errors that can occur while building a network or loading its config.
#[derive(Debug)]
pub enum NetworkError {
    /// Fewer nodes than needed to pick `k` distinct neighbors for each node.
    InsufficientNodes {
        /// Number of nodes supplied.
        nodes: usize,
        /// Neighbors requested per node.
        k: usize,
    },
    /// A probability parameter lies outside `[0, 1]` or is NaN.
    InvalidProbability {
        /// Name of the offending parameter.
        name: &'static str,
        /// The rejected value.
        value: f32,
    },
    /// A non-probability parameter has an unusable value.
    InvalidParameter {
        /// Name of the offending parameter.
        name: &'static str,
        /// What is wrong with it.
        reason: String,
    },
    /// A hand-built adjacency list references a missing node or itself.
    InvalidNeighbor {
        /// Node whose neighbor list is broken.
        node: usize,
        /// The offending neighbor id.
        neighbor: u32,
        /// Number of nodes in the graph.
        len: usize,
    },
    /// Failed to parse a configuration file.
    Config(serde_json::Error),
    /// Failed to read or write a configuration file.
    Io(std::io::Error),
}

impl fmt::Display for NetworkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NetworkError::InsufficientNodes { nodes, k } => write!(
                f,
                "Need more than {} nodes to pick {} nearest neighbors each, got {}",
                k, k, nodes
            ),
            NetworkError::InvalidProbability { name, value } => {
                write!(f, "Probability `{}` must lie in [0, 1], got {}", name, value)
            }
            NetworkError::InvalidParameter { name, reason } => {
                write!(f, "Invalid parameter `{}`: {}", name, reason)
            }
            NetworkError::InvalidNeighbor { node, neighbor, len } => write!(
                f,
                "Node {} lists neighbor {} which is not a valid link in a graph of {} nodes",
                node, neighbor, len
            ),
            NetworkError::Config(e) => write!(f, "Failed to parse config: {}", e),
            NetworkError::Io(e) => write!(f, "Failed to access config file: {}", e),
        }
    }
}

impl std::error::Error for NetworkError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            NetworkError::Config(e) => Some(e),
            NetworkError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for NetworkError {
    fn from(e: serde_json::Error) -> Self {
        NetworkError::Config(e)
    }
}

impl From<std::io::Error> for NetworkError {
    fn from(e: std::io::Error) -> Self {
        NetworkError::Io(e)
    }
}

/// Check that `value` is a usable probability.
pub(crate) fn check_probability(name: &'static str, value: f32) -> Result<(), NetworkError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(NetworkError::InvalidProbability { name, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_probability_bounds() {
        assert!(check_probability("p", 0.0).is_ok());
        assert!(check_probability("p", 1.0).is_ok());
        assert!(check_probability("p", 0.5).is_ok());
        assert!(check_probability("p", -0.01).is_err());
        assert!(check_probability("p", 1.01).is_err());
        assert!(check_probability("p", f32::NAN).is_err());
    }

    #[test]
    fn test_display_names_parameter() {
        let err = NetworkError::InvalidProbability {
            name: "transmission_probability",
            value: 2.0,
        };
        let msg = err.to_string();
        assert!(msg.contains("transmission_probability"));
        assert!(msg.contains('2'));
    }

    #[test]
    fn test_io_error_has_source() {
        let err: NetworkError = std::io::Error::new(std::io::ErrorKind::NotFound, "gone").into();
        assert!(std::error::Error::source(&err).is_some());
    }
}
