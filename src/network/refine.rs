//! Local edge-flip refinement
//!
//! Every internal segment borders two triangles. Together with the triangles one hop
//! further out they form small convex polygons (quadrilaterals and pentagons) whose
//! diagonals can be exchanged without touching anything outside the polygon.
//!
//! The fine-tune passes only accept strictly shorter diagonals, so total internal
//! length decreases with every flip and the worklist drains. The shuffle flips
//! unconditionally and exists to produce a different valid triangulation.

use tracing::{debug, info, trace, warn};

use super::Network;
use crate::band::AdjacencyBand;
use crate::error::Result;
use crate::geometry;
use crate::random::RandomSource;
use crate::report::{PassReport, Replacement};
use crate::segment::{SegmentId, SegmentSet};

/// Kind of local polygon gathered around a segment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolygonShape {
    /// The two triangles on either side of the segment
    Quadrilateral,
    /// The quadrilateral extended by one more triangle on one side
    Pentagon,
}

/// Convex polygon around a segment, with its current diagonals
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalPolygon {
    /// Whether this is a quadrilateral or a pentagon
    pub shape: PolygonShape,
    /// Point indices in counter-clockwise order
    pub vertices: Vec<usize>,
    /// Current diagonals as positions into `vertices`
    pub diagonals: Vec<(usize, usize)>,
}

impl LocalPolygon {
    fn new(shape: PolygonShape, vertices: Vec<usize>, diagonals: Vec<(usize, usize)>) -> Self {
        Self {
            shape,
            vertices,
            diagonals,
        }
    }

    /// Diagonal at `position`, as point indices
    fn diagonal(&self, position: usize) -> (usize, usize) {
        let (a, b) = self.diagonals[position];
        (self.vertices[a], self.vertices[b])
    }

    /// Diagonal at `position` with both ends moved `offset` vertices around the polygon
    fn shifted_diagonal(&self, position: usize, offset: isize) -> (usize, usize) {
        let n = self.vertices.len() as isize;
        let (a, b) = self.diagonals[position];
        let shift = |j: usize| (j as isize + offset).rem_euclid(n) as usize;
        (self.vertices[shift(a)], self.vertices[shift(b)])
    }

    /// Ids of the polygon sides
    fn sides(&self) -> impl Iterator<Item = SegmentId> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| SegmentId::new(self.vertices[i], self.vertices[(i + 1) % n]))
    }
}

/// Segments affected by one flip
#[derive(Debug, Default)]
struct Touched {
    /// Segments whose surroundings changed and should be revisited
    added: Vec<SegmentId>,
    /// Segments that no longer exist
    retired: Vec<SegmentId>,
}

impl<R: RandomSource> Network<R> {
    /// Convex polygons of the requested shapes around segment `(a, b)`
    ///
    /// With `A` the neighbors of `a` following `b` counter-clockwise and `B` the
    /// neighbors of `b` following `a`:
    /// - quadrilateral `[a, B0, b, A0]` with diagonal `a-b`
    /// - pentagon `[a, B0, b, A0, A1]` fanned from `a`
    /// - pentagon `[a, B0, B1, b, A0]` fanned from `b`
    ///
    /// Candidates that are not strictly convex are dropped.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `(a, b)` is not a live segment
    pub fn select_local_polygons(
        &self,
        a: usize,
        b: usize,
        shapes: &[PolygonShape],
    ) -> Result<Vec<LocalPolygon>> {
        let band_a = self.band_of(a)?;
        let band_b = self.band_of(b)?;

        let mut polygons = Vec::new();
        for &shape in shapes {
            match shape {
                PolygonShape::Quadrilateral => {
                    let ahead_a: Vec<usize> = band_a.neighbors_ahead(b, 1)?.collect();
                    let ahead_b: Vec<usize> = band_b.neighbors_ahead(a, 1)?.collect();
                    let (Some(&a0), Some(&b0)) = (ahead_a.first(), ahead_b.first()) else {
                        continue;
                    };

                    let vertices = vec![a, b0, b, a0];
                    if self.is_convex(&vertices) {
                        polygons.push(LocalPolygon::new(shape, vertices, vec![(0, 2)]));
                    }
                }
                PolygonShape::Pentagon => {
                    let ahead_a: Vec<usize> = band_a.neighbors_ahead(b, 2)?.collect();
                    let ahead_b: Vec<usize> = band_b.neighbors_ahead(a, 2)?.collect();
                    let (Some(&a0), Some(&b0)) = (ahead_a.first(), ahead_b.first()) else {
                        continue;
                    };

                    if let Some(&a1) = ahead_a.get(1) {
                        let vertices = vec![a, b0, b, a0, a1];
                        if self.is_convex(&vertices) {
                            polygons.push(LocalPolygon::new(shape, vertices, vec![(0, 2), (0, 3)]));
                        }
                    }
                    if let Some(&b1) = ahead_b.get(1) {
                        let vertices = vec![a, b0, b1, b, a0];
                        if self.is_convex(&vertices) {
                            polygons.push(LocalPolygon::new(shape, vertices, vec![(3, 0), (3, 1)]));
                        }
                    }
                }
            }
        }
        Ok(polygons)
    }

    fn band_of(&self, index: usize) -> Result<&AdjacencyBand> {
        self.point(index)?;
        Ok(&self.bands[index])
    }

    fn is_convex(&self, vertices: &[usize]) -> bool {
        let points: Vec<_> = vertices.iter().map(|&i| self.points[i]).collect();
        geometry::is_convex_cycle(&points)
    }

    fn total_length(&self, segments: &[(usize, usize)]) -> f64 {
        segments.iter().map(|&(a, b)| self.distance(a, b)).sum()
    }

    /// Remove `old`, add `new` as internal, and log the change
    fn replace_segment(
        &mut self,
        old: (usize, usize),
        new: (usize, usize),
        log: &mut Vec<Replacement>,
    ) -> Result<SegmentId> {
        let length_delta = self.distance(new.0, new.1) - self.distance(old.0, old.1);
        let old_id = self.remove_segment(old.0, old.1)?;
        let new_id = self.add_segment(new.0, new.1, false)?;
        trace!(old = %old_id, new = %new_id, length_delta, "flipped segment");
        log.push(Replacement {
            old: old_id,
            new: new_id,
            length_delta,
        });
        Ok(new_id)
    }

    /// Apply the improving flip for `polygon`, if any; returns whether it flipped
    fn improve_polygon(
        &mut self,
        polygon: &LocalPolygon,
        log: &mut Vec<Replacement>,
        touched: &mut Touched,
    ) -> Result<bool> {
        match polygon.shape {
            PolygonShape::Quadrilateral => {
                let current = polygon.diagonal(0);
                let alternative = polygon.shifted_diagonal(0, 1);
                if self.distance(current.0, current.1) <= self.distance(alternative.0, alternative.1) {
                    return Ok(false);
                }

                self.replace_segment(current, alternative, log)?;
                touched.added.extend(polygon.sides());
                Ok(true)
            }
            PolygonShape::Pentagon => {
                let originals = [polygon.diagonal(0), polygon.diagonal(1)];
                let mut best_sum = self.total_length(&originals);
                let mut best = None;
                for offset in [-1isize, 1] {
                    let shifted = [
                        polygon.shifted_diagonal(0, offset),
                        polygon.shifted_diagonal(1, offset),
                    ];
                    let sum = self.total_length(&shifted);
                    if sum < best_sum {
                        best_sum = sum;
                        best = Some((offset, shifted));
                    }
                }

                let Some((offset, shifted)) = best else {
                    return Ok(false);
                };

                // Each intermediate state stays a triangulation in this order
                let order = if offset == 1 { [0, 1] } else { [1, 0] };
                for k in order {
                    self.replace_segment(originals[k], shifted[k], log)?;
                }

                touched.retired.push(SegmentId::new(originals[1].0, originals[1].1));
                touched.added.extend(polygon.sides());
                touched.added.extend(shifted.iter().map(|&(a, b)| SegmentId::new(a, b)));
                Ok(true)
            }
        }
    }

    /// Flip the quadrilateral diagonal regardless of length; returns the new segment
    fn flip_quadrilateral(&mut self, polygon: &LocalPolygon, log: &mut Vec<Replacement>) -> Result<SegmentId> {
        let current = polygon.diagonal(0);
        let alternative = polygon.shifted_diagonal(0, 1);
        self.replace_segment(current, alternative, log)
    }

    /// Flip every internal segment whose quadrilateral has a strictly shorter
    /// other diagonal, until no such segment remains
    ///
    /// # Example
    ///
    /// ```
    /// use onion_mwt::*;
    ///
    /// // A rhombus whose construction picks the long diagonal
    /// let mut network = Network::new([[0.0, 1.0], [0.0, -1.0], [-2.0, 0.0], [2.0, 0.0]]);
    /// network.build_triangulation().unwrap();
    ///
    /// let report = network.fine_tune_quadrilaterals().unwrap();
    /// assert_eq!(report.replacements.len(), 1);
    /// assert!((report.internal_length - 2.0).abs() < 1e-12);
    ///
    /// // Already at the fixed point
    /// assert!(network.fine_tune_quadrilaterals().unwrap().is_empty());
    /// ```
    pub fn fine_tune_quadrilaterals(&mut self) -> Result<PassReport> {
        self.fine_tune(PolygonShape::Quadrilateral)
    }

    /// Re-fan convex pentagons whenever a shifted pair of diagonals is strictly
    /// shorter in total, until no such pentagon remains
    ///
    /// Of the two pentagons around a segment, the first one that flips wins.
    pub fn fine_tune_pentagons(&mut self) -> Result<PassReport> {
        self.fine_tune(PolygonShape::Pentagon)
    }

    fn fine_tune(&mut self, shape: PolygonShape) -> Result<PassReport> {
        let mut worklist: SegmentSet = self.internal.iter().collect();
        let mut log = Vec::new();
        debug!(?shape, segments = worklist.len(), "starting fine-tune pass");

        while let Some(id) = worklist.pop_first() {
            if let Some(limit) = self.config.flip_limit {
                if log.len() >= limit {
                    warn!(?shape, limit, pending = worklist.len() + 1, "fine-tune stopped at flip limit");
                    break;
                }
            }
            if !self.internal.contains(id) {
                continue;
            }
            let Some((a, b)) = self.segment_endpoints(id) else {
                continue;
            };

            let mut touched = Touched::default();
            for polygon in self.select_local_polygons(a, b, &[shape])? {
                if self.improve_polygon(&polygon, &mut log, &mut touched)? {
                    break;
                }
            }

            for retired in touched.retired {
                worklist.remove(retired);
            }
            for added in touched.added {
                if !self.boundary.contains(added) {
                    worklist.insert(added);
                }
            }
        }

        let report = self.pass_report(log);
        info!(
            ?shape,
            replacements = report.replacements.len(),
            internal_length = report.internal_length,
            "fine-tune pass finished"
        );
        Ok(report)
    }

    /// Flip randomly chosen internal segments unconditionally
    ///
    /// Each step picks a queue slot with the injected random source; if that
    /// segment sits in a convex quadrilateral it is flipped and the new segment
    /// takes its slot. The number of flips defaults to the number of internal
    /// segments. The pass stops early after `shuffle_miss_limit` consecutive picks
    /// without a flippable segment.
    pub fn shuffle(&mut self) -> Result<PassReport> {
        let mut queue = self.internal.to_vec();
        let target = self.config.shuffle_flips.unwrap_or(queue.len());
        let mut log = Vec::new();
        let mut flips = 0;
        let mut misses = 0;
        debug!(segments = queue.len(), target, "starting shuffle");

        while flips < target && !queue.is_empty() {
            let slot = self.random.next() as usize % queue.len();
            let Some((a, b)) = self.segment_endpoints(queue[slot]) else {
                break;
            };

            let polygons = self.select_local_polygons(a, b, &[PolygonShape::Quadrilateral])?;
            let Some(polygon) = polygons.first() else {
                misses += 1;
                if misses >= self.config.shuffle_miss_limit {
                    warn!(flips, misses, "shuffle found no flippable segment, stopping");
                    break;
                }
                continue;
            };

            misses = 0;
            queue[slot] = self.flip_quadrilateral(polygon, &mut log)?;
            flips += 1;
        }

        let report = self.pass_report(log);
        info!(
            flips,
            internal_length = report.internal_length,
            "shuffle finished"
        );
        Ok(report)
    }
}
