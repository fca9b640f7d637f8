//! Onion-peel construction
//!
//! Convex layers are peeled from the outside in. The innermost layer is split into
//! triangles by diagonals, and each annulus between two consecutive layers is
//! stitched by connecting every outer vertex to the arc of the inner layer it sees.

use tracing::{debug, info};

use super::Network;
use crate::error::{Result, TriangulationError};
use crate::geometry::Orientation;
use crate::random::RandomSource;
use crate::report::Triangulation;

impl<R: RandomSource> Network<R> {
    /// Build the full triangulation of every point
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if the network already has segments
    /// - `InvariantViolation` if the input is not in general position enough for
    ///   the layer stitching to find its tangents
    pub fn build_triangulation(&mut self) -> Result<Triangulation> {
        self.ensure_unbuilt()?;
        if !self.points.is_empty() {
            self.build_from((0..self.points.len()).collect())?;
        }

        let triangulation = self.triangulation();
        info!(
            points = self.points.len(),
            boundary = triangulation.boundary.len(),
            internal = triangulation.internal.len(),
            internal_length = triangulation.internal_length,
            "built onion-peel triangulation"
        );
        Ok(triangulation)
    }

    fn ensure_unbuilt(&self) -> Result<()> {
        if !self.boundary.is_empty() || !self.internal.is_empty() {
            return Err(TriangulationError::InvalidArgument(
                "network is already triangulated".to_string(),
            ));
        }
        Ok(())
    }

    /// Triangulate the points `indices` and return their outer hull
    ///
    /// Peels hull layers until none remain inside, triangulates the innermost layer
    /// and stitches the layers pairwise from the inside out.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the network already has segments
    pub fn build_from(&mut self, indices: Vec<usize>) -> Result<Vec<usize>> {
        self.ensure_unbuilt()?;

        let mut layers = Vec::new();
        let mut remaining = indices;
        while !remaining.is_empty() {
            let (hull, rest) = self.compute_outer_hull(remaining)?;
            debug!(
                layer = layers.len(),
                vertices = hull.len(),
                inside = rest.len(),
                "peeled convex layer"
            );
            layers.push(hull);
            remaining = rest;
        }

        if let Some(innermost) = layers.last() {
            self.triangulate_convex_polygon(innermost)?;
        }
        for pair in layers.windows(2).rev() {
            self.connect_layers(&pair[0], &pair[1])?;
        }

        Ok(layers.into_iter().next().unwrap_or_default())
    }

    /// Split a convex polygon into triangles with internal diagonals
    ///
    /// The first diagonal `(i, k)` in scan order with no other vertex on its line
    /// splits the polygon; both halves are handled the same way, first half first.
    /// A polygon without such a diagonal (a collinear chain) is left as is.
    pub fn triangulate_convex_polygon(&mut self, cycle: &[usize]) -> Result<()> {
        let mut pending = vec![cycle.to_vec()];
        while let Some(polygon) = pending.pop() {
            if polygon.len() <= 3 {
                continue;
            }

            let Some((i, k)) = self.find_diagonal(&polygon) else {
                debug!(vertices = polygon.len(), "no diagonal in degenerate polygon");
                continue;
            };
            self.add_segment(polygon[i], polygon[k], false)?;

            let second: Vec<usize> = polygon[k..].iter().chain(&polygon[..=i]).copied().collect();
            let first = polygon[i..=k].to_vec();
            pending.push(second);
            pending.push(first);
        }
        Ok(())
    }

    fn find_diagonal(&self, polygon: &[usize]) -> Option<(usize, usize)> {
        let n = polygon.len();
        for i in 0..n - 2 {
            for separation in 0..n - 3 {
                let k = (separation + i + 2) % n;
                if i >= k {
                    continue;
                }
                let clear = polygon.iter().all(|&u| {
                    u == polygon[i]
                        || u == polygon[k]
                        || self.orientation(polygon[i], polygon[k], u) != Orientation::Collinear
                });
                if clear {
                    return Some((i, k));
                }
            }
        }
        None
    }

    /// Triangulate the annulus between two nested convex layers
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` if no outer vertex sees the first inner edge or
    /// if that vertex sees no inner arc.
    pub fn connect_layers(&mut self, outer: &[usize], inner: &[usize]) -> Result<()> {
        if let [center] = inner {
            for &vertex in outer {
                self.add_segment(vertex, *center, false)?;
            }
            return Ok(());
        }
        if inner.len() < 2 || outer.is_empty() {
            return Err(TriangulationError::InvariantViolation(format!(
                "cannot stitch a layer of {} vertices to one of {}",
                outer.len(),
                inner.len()
            )));
        }

        let Some(mut i) = outer
            .iter()
            .position(|&v| self.orientation(inner[0], inner[1], v) == Orientation::Clockwise)
        else {
            return Err(TriangulationError::InvariantViolation(
                "no outer vertex sees the first inner edge".to_string(),
            ));
        };

        let range = self.tangent_range(inner, outer[i], None);
        if range.0 == range.1 {
            return Err(TriangulationError::InvariantViolation(format!(
                "outer vertex {} sees no inner arc",
                outer[i]
            )));
        }
        self.connect_arc(outer[i], inner, range)?;

        let mut scope = (range.1, range.0);
        for _ in 1..outer.len() {
            i = (i + 1) % outer.len();
            let range = self.tangent_range(inner, outer[i], Some(scope));
            if range.0 == range.1 {
                self.add_segment(outer[i], inner[scope.0], false)?;
            } else {
                self.connect_arc(outer[i], inner, range)?;
                scope.0 = range.1;
            }
        }
        Ok(())
    }

    /// Connect `apex` to every vertex of `inner` from `first` to `last`, wrapping
    fn connect_arc(&mut self, apex: usize, inner: &[usize], (first, last): (usize, usize)) -> Result<()> {
        let len = inner.len();
        let stop = if first < last { last } else { last + len };
        for j in first..=stop {
            self.add_segment(apex, inner[j % len], false)?;
        }
        Ok(())
    }
}
