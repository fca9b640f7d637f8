//! Convex hull peeling
//!
//! The hull is grown incrementally: each new point replaces the arc of the current
//! hull that it can see. The same visibility scan (the tangent range) is reused by
//! the layer stitching in [`super::layers`], restricted to a window of the inner hull.

use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::trace;

use super::Network;
use crate::error::Result;
use crate::geometry::Orientation;
use crate::random::RandomSource;

impl<R: RandomSource> Network<R> {
    /// Contiguous arc of `cycle` visible from point `source`
    ///
    /// Scans edge `i` = `(cycle[i], cycle[i + 1])` for `i` in `scope` (the whole
    /// cycle when `None`; a scope whose start exceeds its end wraps around). An edge
    /// is visible when `source` lies strictly to its right, or on its line strictly
    /// between its endpoints. Returns the vertex positions `(first, last)` bounding
    /// the visible edges; equal positions mean nothing is visible.
    ///
    /// A visible run that starts at the scope start and a later run are treated as
    /// one arc wrapping past the end of the cycle.
    pub fn tangent_range(
        &self,
        cycle: &[usize],
        source: usize,
        scope: Option<(usize, usize)>,
    ) -> (usize, usize) {
        let len = cycle.len();
        if len == 0 {
            return (0, 0);
        }

        let (start, end) = scope.unwrap_or((0, len));
        let stop = if start > end { end + len } else { end };

        let mut range = (start, start);
        for i in start..stop {
            let from = cycle[i % len];
            let to = cycle[(i + 1) % len];
            let visible = match self.orientation(from, to, source) {
                Orientation::Clockwise => true,
                Orientation::Collinear => {
                    self.collinear_direction(source, from, to) == Ordering::Less
                }
                Orientation::CounterClockwise => false,
            };
            if !visible {
                continue;
            }

            if range.0 == range.1 {
                range = (i, i + 1);
            } else if range.1 == i {
                range.1 = i + 1;
            } else if range.0 == start {
                range = (i, range.1 + len);
            }
        }

        (range.0 % len, range.1 % len)
    }

    /// Outer convex hull of `indices` and the points left inside it
    ///
    /// Hull edges are linked as segments: boundary segments when `indices` covers
    /// every point of the network, internal ones for inner layers. The hull is
    /// counter-clockwise; the remainder keeps the input order.
    ///
    /// A fully collinear input yields a zero-area hull: the points sorted along
    /// their line followed by the interior ones in reverse (`[a, b, c, b]`), linked
    /// as a chain.
    pub fn compute_outer_hull(&mut self, indices: Vec<usize>) -> Result<(Vec<usize>, Vec<usize>)> {
        let outermost = indices.len() == self.points.len();

        if indices.len() <= 1 {
            return Ok((indices, Vec::new()));
        }

        let Some(j) = (2..indices.len())
            .find(|&j| self.orientation(indices[0], indices[1], indices[j]) != Orientation::Collinear)
        else {
            return self.collinear_hull(indices, outermost);
        };

        let mut hull = vec![indices[j], indices[0], indices[1]];
        if self.orientation(hull[0], hull[1], hull[2]) != Orientation::CounterClockwise {
            hull.swap(1, 2);
        }

        let pending = indices
            .iter()
            .enumerate()
            .filter(|&(position, _)| position != 0 && position != 1 && position != j)
            .map(|(_, &index)| index);

        for index in pending {
            let (first, last) = self.tangent_range(&hull, index, None);
            match first.cmp(&last) {
                Ordering::Less => {
                    let tail = hull.split_off(last);
                    hull.truncate(first + 1);
                    hull.push(index);
                    hull.extend(tail);
                }
                Ordering::Greater => {
                    let mut wrapped = Vec::with_capacity(first - last + 2);
                    wrapped.push(index);
                    wrapped.extend_from_slice(&hull[last..=first]);
                    hull = wrapped;
                }
                Ordering::Equal => trace!(point = index, "point inside current hull"),
            }
        }

        for i in 0..hull.len() {
            self.add_segment(hull[i], hull[(i + 1) % hull.len()], outermost)?;
        }

        let on_hull: HashSet<usize> = hull.iter().copied().collect();
        let remainder = indices.into_iter().filter(|i| !on_hull.contains(i)).collect();
        Ok((hull, remainder))
    }

    fn collinear_hull(&mut self, mut indices: Vec<usize>, outermost: bool) -> Result<(Vec<usize>, Vec<usize>)> {
        let vertical = self.points[indices[0]].x == self.points[indices[1]].x;
        let points = &self.points;
        if vertical {
            indices.sort_by(|&a, &b| points[a].y.total_cmp(&points[b].y));
        } else {
            indices.sort_by(|&a, &b| points[a].x.total_cmp(&points[b].x));
        }

        for pair in indices.windows(2) {
            self.add_segment(pair[0], pair[1], outermost)?;
        }

        let mut hull = indices.clone();
        hull.extend(indices[1..indices.len() - 1].iter().rev());
        Ok((hull, Vec::new()))
    }
}
