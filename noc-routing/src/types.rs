// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Shared types.

use std::error::Error;
use std::fmt;

use crate::direction::PortDirection;
use crate::net_dest::NetDest;

/// Linear index of a router within the mesh (`y * num_cols + x`).
pub type RouterId = usize;

/// Index of a virtual network.
pub type VnetId = usize;

/// Index of an output link of a router.
pub type LinkId = usize;

// Routing errors

#[macro_export]
/// Build an invariant [RoutingError] from a format string
macro_rules! routing_error {
    ($($arg:tt)+) => {
        Err($crate::types::RoutingError::Invariant(format!($($arg)+)))
    };
}

/// Everything that can go wrong while deciding an output port.
///
/// None of these are recoverable: they indicate a broken topology
/// description or configuration and the caller is expected to abort the run.
#[derive(Clone, Debug, PartialEq)]
pub enum RoutingError {
    /// No link of `router` reaches `destination` in `vnet`.
    NoRoute {
        router: RouterId,
        vnet: VnetId,
        destination: NetDest,
    },

    /// An internal consistency check failed.
    Invariant(String),

    /// The direction chosen has no output port registered at `router`.
    UnknownDirection {
        router: RouterId,
        direction: PortDirection,
    },

    /// A routing hook without an implementation was invoked.
    Unimplemented(String),

    /// The configuration could not be loaded or is inconsistent.
    Config(String),
}

impl fmt::Display for RoutingError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            RoutingError::NoRoute {
                router,
                vnet,
                destination,
            } => write!(
                f,
                "Error: no route exists from router {router} to {destination} on vnet {vnet}"
            ),
            RoutingError::Invariant(msg) => write!(f, "Error: {msg}"),
            RoutingError::UnknownDirection { router, direction } => write!(
                f,
                "Error: router {router} has no output port in direction {direction}"
            ),
            RoutingError::Unimplemented(hook) => write!(f, "Error: {hook} placeholder executed"),
            RoutingError::Config(msg) => write!(f, "Config error: {msg}"),
        }
    }
}

impl Error for RoutingError {}

impl From<figment::Error> for RoutingError {
    fn from(e: figment::Error) -> Self {
        RoutingError::Config(e.to_string())
    }
}

/// The return type of every fallible routing operation.
pub type RoutingResult<T> = Result<T, RoutingError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn invariant(value: usize) -> RoutingResult<usize> {
        if value == 0 {
            return routing_error!("value {} must be non-zero", value);
        }
        Ok(value)
    }

    #[test]
    fn macro_builds_invariant() {
        assert_eq!(
            invariant(0),
            Err(RoutingError::Invariant("value 0 must be non-zero".to_string()))
        );
        assert_eq!(invariant(2), Ok(2));
    }

    #[test]
    fn no_route_names_context() {
        let err = RoutingError::NoRoute {
            router: 3,
            vnet: 1,
            destination: [7usize].into_iter().collect(),
        };
        assert_eq!(
            err.to_string(),
            "Error: no route exists from router 3 to {7} on vnet 1"
        );
    }
}
