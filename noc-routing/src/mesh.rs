// Copyright (c) 2025 Graphcore Ltd. All rights reserved.

//! Geometry of a rectangular 2D mesh.
//!
//! Routers are numbered row by row starting at the south-west corner:
//!
//! ```txt
//!          x=0  x=1  x=2  x=3
//!   y=3    12   13   14   15      North
//!   y=2     8    9   10   11        ^
//!   y=1     4    5    6    7   West < > East
//!   y=0     0    1    2    3        v
//!                                 South
//! ```

use crate::direction::PortDirection;
use crate::types::RouterId;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MeshConfig {
    num_rows: usize,
    num_cols: usize,
}

impl MeshConfig {
    #[must_use]
    pub fn new(num_rows: usize, num_cols: usize) -> Self {
        Self { num_rows, num_cols }
    }

    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    #[must_use]
    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    #[must_use]
    pub fn num_routers(&self) -> usize {
        self.num_rows * self.num_cols
    }

    #[must_use]
    pub fn contains(&self, router: RouterId) -> bool {
        router < self.num_routers()
    }

    /// The `(x, y)` position of `router`.
    #[must_use]
    pub fn coords(&self, router: RouterId) -> (usize, usize) {
        (router % self.num_cols, router / self.num_cols)
    }

    #[must_use]
    pub fn router_id(&self, x: usize, y: usize) -> RouterId {
        y * self.num_cols + x
    }

    /// Signed `(x_hops, y_hops)` needed to get from `from` to `to`.
    #[must_use]
    pub fn hops(&self, from: RouterId, to: RouterId) -> (i64, i64) {
        let (from_x, from_y) = self.coords(from);
        let (to_x, to_y) = self.coords(to);
        (
            to_x as i64 - from_x as i64,
            to_y as i64 - from_y as i64,
        )
    }

    /// The router reached by leaving `router` in `dirn`, or `None` when that
    /// would leave the mesh.
    #[must_use]
    pub fn neighbour(&self, router: RouterId, dirn: PortDirection) -> Option<RouterId> {
        if !self.contains(router) {
            return None;
        }
        let (x, y) = self.coords(router);
        match dirn {
            PortDirection::North if y + 1 < self.num_rows => Some(router + self.num_cols),
            PortDirection::South if y > 0 => Some(router - self.num_cols),
            PortDirection::East if x + 1 < self.num_cols => Some(router + 1),
            PortDirection::West if x > 0 => Some(router - 1),
            _ => None,
        }
    }
}
