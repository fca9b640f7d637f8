//! Triangulation network
//!
//! Owns the points, the segment registry, the boundary and internal segment sets,
//! and one [`AdjacencyBand`] per point. Construction lives in [`hull`] and
//! [`layers`]; the edge-flip passes live in [`refine`].
//!
//! A segment `{a, b}` is live iff it is in one of the two sets, and then `b` is in
//! the band of `a` and `a` is in the band of `b`. All mutation goes through
//! [`Network::add_segment`] and [`Network::remove_segment`], which keep both sides in
//! step.

mod hull;
mod layers;
mod refine;

pub use refine::{LocalPolygon, PolygonShape};

use glam::DVec2;
use rand_chacha::ChaCha8Rng;
use std::cmp::Ordering;
use std::collections::HashMap;

use crate::band::AdjacencyBand;
use crate::config::NetworkConfig;
use crate::error::{Result, TriangulationError};
use crate::geometry::{self, Orientation};
use crate::random::{seeded_source, RandomSource};
use crate::report::{PassReport, Replacement, Triangulation};
use crate::segment::{SegmentId, SegmentSet};

/// A planar triangulation under construction or refinement
///
/// Generic over the random source `R` used by [`Network::shuffle`]; the default is
/// a ChaCha8 generator seeded from [`NetworkConfig::seed`].
///
/// # Example
///
/// ```
/// use onion_mwt::*;
///
/// let mut network = Network::new([[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]);
/// let triangulation = network.build_triangulation().unwrap();
///
/// assert_eq!(triangulation.boundary.len(), 4);
/// assert_eq!(triangulation.internal.len(), 1);
/// assert_eq!(triangulation.triangle_count(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct Network<R = ChaCha8Rng> {
    points: Vec<DVec2>,
    /// Endpoints of every segment ever added, in the orientation last added.
    /// Kept after removal so ids in replacement logs stay resolvable.
    segments: HashMap<SegmentId, (usize, usize)>,
    boundary: SegmentSet,
    internal: SegmentSet,
    bands: Vec<AdjacencyBand>,
    config: NetworkConfig,
    random: R,
}

impl Network<ChaCha8Rng> {
    /// Create a network with the default configuration
    pub fn new<P, I>(points: I) -> Self
    where
        P: Into<DVec2>,
        I: IntoIterator<Item = P>,
    {
        Self::with_config(points, NetworkConfig::default())
    }

    /// Create a network whose shuffle source is seeded from `config.seed`
    pub fn with_config<P, I>(points: I, config: NetworkConfig) -> Self
    where
        P: Into<DVec2>,
        I: IntoIterator<Item = P>,
    {
        let random = seeded_source(config.seed);
        Self::with_random_source(points, config, random)
    }
}

impl<R: RandomSource> Network<R> {
    /// Create a network with an injected random source
    pub fn with_random_source<P, I>(points: I, config: NetworkConfig, random: R) -> Self
    where
        P: Into<DVec2>,
        I: IntoIterator<Item = P>,
    {
        let points: Vec<DVec2> = points.into_iter().map(Into::into).collect();
        let bands = points.iter().map(|&p| AdjacencyBand::new(p)).collect();

        Self {
            points,
            segments: HashMap::new(),
            boundary: SegmentSet::new(),
            internal: SegmentSet::new(),
            bands,
            config,
            random,
        }
    }

    /// Configuration of this network
    #[inline]
    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    /// All points, indexed by point id
    #[inline]
    pub fn points(&self) -> &[DVec2] {
        &self.points
    }

    /// Number of points
    #[inline]
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// Adjacency band of point `index`
    pub fn band(&self, index: usize) -> Option<&AdjacencyBand> {
        self.bands.get(index)
    }

    /// Live boundary segments in insertion order
    pub fn boundary_segments(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.boundary.iter()
    }

    /// Live internal segments in insertion order
    pub fn internal_segments(&self) -> impl Iterator<Item = SegmentId> + '_ {
        self.internal.iter()
    }

    /// Whether `id` is a live segment
    pub fn contains_segment(&self, id: SegmentId) -> bool {
        self.boundary.contains(id) || self.internal.contains(id)
    }

    /// Whether `id` is a live boundary segment
    pub fn is_boundary(&self, id: SegmentId) -> bool {
        self.boundary.contains(id)
    }

    /// Endpoint indices of a segment, live or previously replaced
    pub fn segment_endpoints(&self, id: SegmentId) -> Option<(usize, usize)> {
        self.segments.get(&id).copied()
    }

    /// Endpoint coordinates of a segment, live or previously replaced
    ///
    /// Consumers replaying a [`PassReport`] use this to draw old and new segments.
    pub fn get_segment(&self, id: SegmentId) -> Option<(DVec2, DVec2)> {
        self.segments
            .get(&id)
            .map(|&(a, b)| (self.points[a], self.points[b]))
    }

    /// Length of a segment, live or previously replaced
    pub fn segment_length(&self, id: SegmentId) -> Option<f64> {
        self.get_segment(id).map(|(a, b)| geometry::distance(a, b))
    }

    /// Summed length of the live internal segments
    pub fn internal_length(&self) -> f64 {
        self.internal
            .iter()
            .filter_map(|id| self.segment_length(id))
            .sum()
    }

    /// Snapshot of the current boundary and internal sets
    pub fn triangulation(&self) -> Triangulation {
        Triangulation {
            boundary: self.boundary.to_vec(),
            internal: self.internal.to_vec(),
            internal_length: self.internal_length(),
        }
    }

    fn pass_report(&self, replacements: Vec<Replacement>) -> PassReport {
        PassReport {
            replacements,
            internal: self.internal.to_vec(),
            internal_length: self.internal_length(),
        }
    }

    fn point(&self, index: usize) -> Result<DVec2> {
        self.points.get(index).copied().ok_or_else(|| {
            TriangulationError::InvalidArgument(format!(
                "point {} out of range (network has {} points)",
                index,
                self.points.len()
            ))
        })
    }

    #[inline]
    fn orientation(&self, a: usize, b: usize, c: usize) -> Orientation {
        geometry::orientation(self.points[a], self.points[b], self.points[c])
    }

    #[inline]
    fn collinear_direction(&self, a: usize, b: usize, c: usize) -> Ordering {
        geometry::collinear_direction(self.points[a], self.points[b], self.points[c])
    }

    #[inline]
    fn distance(&self, a: usize, b: usize) -> f64 {
        geometry::distance(self.points[a], self.points[b])
    }

    /// Link points `a` and `b`
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if either index is out of range, `a == b`, or the segment
    ///   already exists; nothing is modified in that case
    /// - `InvariantViolation` if a band cannot place the new neighbor
    pub fn add_segment(&mut self, a: usize, b: usize, boundary: bool) -> Result<SegmentId> {
        let (pa, pb) = (self.point(a)?, self.point(b)?);
        if a == b {
            return Err(TriangulationError::InvalidArgument(format!(
                "segment endpoints must differ (got {} twice)",
                a
            )));
        }
        if self.bands[a].contains(b) || self.bands[b].contains(a) {
            return Err(TriangulationError::InvalidArgument(format!(
                "segment ({}, {}) already exists",
                a, b
            )));
        }

        let id = SegmentId::new(a, b);
        self.segments.insert(id, (a, b));
        if boundary {
            self.boundary.insert(id);
        } else {
            self.internal.insert(id);
        }
        self.bands[a].add_neighbor(b, pb)?;
        self.bands[b].add_neighbor(a, pa)?;
        Ok(id)
    }

    /// Unlink points `a` and `b`
    ///
    /// The registry keeps the endpoints so the id stays resolvable.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the segment does not exist
    pub fn remove_segment(&mut self, a: usize, b: usize) -> Result<SegmentId> {
        self.point(a)?;
        self.point(b)?;

        let id = SegmentId::new(a, b);
        self.bands[a].remove_neighbor(b)?;
        self.bands[b].remove_neighbor(a)?;
        self.internal.remove(id);
        self.boundary.remove(id);
        Ok(id)
    }

    /// Check the band/segment correspondence and planarity
    ///
    /// Planarity is checked pairwise, so this is quadratic in the segment count.
    ///
    /// # Errors
    ///
    /// Returns `InvariantViolation` describing the first inconsistency found
    pub fn validate(&self) -> Result<()> {
        let live: Vec<(SegmentId, usize, usize)> = self
            .boundary
            .iter()
            .chain(self.internal.iter())
            .map(|id| {
                self.segments
                    .get(&id)
                    .map(|&(a, b)| (id, a, b))
                    .ok_or_else(|| {
                        TriangulationError::InvariantViolation(format!(
                            "segment {} is live but unregistered",
                            id
                        ))
                    })
            })
            .collect::<Result<_>>()?;

        for &(id, a, b) in &live {
            if self.boundary.contains(id) && self.internal.contains(id) {
                return Err(TriangulationError::InvariantViolation(format!(
                    "segment {} is both boundary and internal",
                    id
                )));
            }
            if !self.bands[a].contains(b) || !self.bands[b].contains(a) {
                return Err(TriangulationError::InvariantViolation(format!(
                    "segment ({}, {}) is missing from a band",
                    a, b
                )));
            }
        }

        let band_entries: usize = self.bands.iter().map(AdjacencyBand::len).sum();
        if band_entries != 2 * live.len() {
            return Err(TriangulationError::InvariantViolation(format!(
                "bands hold {} entries for {} segments",
                band_entries,
                live.len()
            )));
        }

        for (i, &(first, a, b)) in live.iter().enumerate() {
            for &(second, c, d) in &live[i + 1..] {
                if a == c || a == d || b == c || b == d {
                    continue;
                }
                if geometry::segments_cross(self.points[a], self.points[b], self.points[c], self.points[d]) {
                    return Err(TriangulationError::InvariantViolation(format!(
                        "segments {} and {} cross",
                        first, second
                    )));
                }
            }
        }

        Ok(())
    }
}
