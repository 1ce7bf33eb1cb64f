// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

use std::fmt;

use crate::net_dest::NetDest;
use crate::types::{RouterId, VnetId};

/// Where a packet is going, as seen by every router along its path.
#[derive(Clone, Debug, PartialEq)]
pub struct RouteInfo {
    pub src_router: RouterId,
    pub dest_router: RouterId,
    pub vnet: VnetId,
    pub net_dest: NetDest,
}

impl RouteInfo {
    #[must_use]
    pub fn new(
        src_router: RouterId,
        dest_router: RouterId,
        vnet: VnetId,
        net_dest: NetDest,
    ) -> Self {
        Self {
            src_router,
            dest_router,
            vnet,
            net_dest,
        }
    }

    /// A route to the single end-point attached to `dest_router`.
    #[must_use]
    pub fn to_router(src_router: RouterId, dest_router: RouterId, vnet: VnetId) -> Self {
        Self::new(src_router, dest_router, vnet, NetDest::single(dest_router))
    }
}

impl fmt::Display for RouteInfo {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "{}->{} vnet{} {}",
            self.src_router, self.dest_router, self.vnet, self.net_dest
        )
    }
}
