//! Adjacency band: the circular angular ordering of neighbors around one point
//!
//! Every band starts with three permanent datum sentinels at unit distance from the
//! origin, 120° apart. They split the full turn into three wedges narrower than a
//! half turn, so angular insertion always has a well-defined place to start and
//! orientation tests inside one wedge never wrap around.
//!
//! The ring is linked counter-clockwise: `next` of a neighbor is the one that follows
//! it when sweeping counter-clockwise around the origin.

use glam::DVec2;
use std::collections::HashMap;

use crate::error::{Result, TriangulationError};
use crate::geometry::{orientation, Orientation};

/// √3 / 2, the horizontal offset of the lower datum sentinels
const HALF_SQRT_3: f64 = 0.866_025_403_784_438_6;

/// One of the three sentinel directions seeded into every band
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Datum {
    /// Straight up (90°)
    North,
    /// Lower left (210°)
    SouthWest,
    /// Lower right (330°)
    SouthEast,
}

impl Datum {
    /// All sentinels in counter-clockwise order
    pub const ALL: [Datum; 3] = [Datum::North, Datum::SouthWest, Datum::SouthEast];

    /// Unit offset from the band origin
    pub fn offset(self) -> DVec2 {
        match self {
            Datum::North => DVec2::new(0.0, 1.0),
            Datum::SouthWest => DVec2::new(-HALF_SQRT_3, -0.5),
            Datum::SouthEast => DVec2::new(HALF_SQRT_3, -0.5),
        }
    }

    /// The sentinel following this one counter-clockwise
    pub fn next(self) -> Datum {
        match self {
            Datum::North => Datum::SouthWest,
            Datum::SouthWest => Datum::SouthEast,
            Datum::SouthEast => Datum::North,
        }
    }

    /// The sentinel preceding this one counter-clockwise
    pub fn prev(self) -> Datum {
        match self {
            Datum::North => Datum::SouthEast,
            Datum::SouthWest => Datum::North,
            Datum::SouthEast => Datum::SouthWest,
        }
    }
}

/// Entry of a band: a real point index or a datum sentinel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NeighborId {
    Point(usize),
    Datum(Datum),
}

impl From<usize> for NeighborId {
    fn from(index: usize) -> Self {
        NeighborId::Point(index)
    }
}

impl From<Datum> for NeighborId {
    fn from(datum: Datum) -> Self {
        NeighborId::Datum(datum)
    }
}

#[derive(Debug, Clone, Copy)]
struct Node {
    point: DVec2,
    prev: NeighborId,
    next: NeighborId,
}

/// Circular counter-clockwise list of the neighbors of one origin point
///
/// A neighbor is live exactly while it has a node in the band; removal drops the
/// node, so there is no stale slot to misread.
#[derive(Debug, Clone)]
pub struct AdjacencyBand {
    origin: DVec2,
    nodes: HashMap<NeighborId, Node>,
}

impl AdjacencyBand {
    /// Create a band around `origin` holding only the datum sentinels
    pub fn new(origin: DVec2) -> Self {
        let nodes = Datum::ALL
            .iter()
            .map(|&datum| {
                (
                    NeighborId::Datum(datum),
                    Node {
                        point: origin + datum.offset(),
                        prev: NeighborId::Datum(datum.prev()),
                        next: NeighborId::Datum(datum.next()),
                    },
                )
            })
            .collect();

        Self { origin, nodes }
    }

    /// The point this band is centered on
    #[inline]
    pub fn origin(&self) -> DVec2 {
        self.origin
    }

    /// Number of real neighbors
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len() - Datum::ALL.len()
    }

    /// Whether the band has no real neighbors
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether `index` is a neighbor
    #[inline]
    pub fn contains(&self, index: usize) -> bool {
        self.nodes.contains_key(&NeighborId::Point(index))
    }

    /// Entry following `id` counter-clockwise
    pub fn next_of(&self, id: NeighborId) -> Option<NeighborId> {
        self.nodes.get(&id).map(|node| node.next)
    }

    /// Entry preceding `id` counter-clockwise
    pub fn prev_of(&self, id: NeighborId) -> Option<NeighborId> {
        self.nodes.get(&id).map(|node| node.prev)
    }

    fn node(&self, id: NeighborId) -> Result<Node> {
        self.nodes.get(&id).copied().ok_or_else(|| {
            TriangulationError::InvariantViolation(format!("band ring broken at {:?}", id))
        })
    }

    /// Whether `point` lies in the wedge swept counter-clockwise from `from` to `to`
    ///
    /// The wedge includes the ray through `from` and excludes the ray through `to`.
    fn in_wedge(&self, from: DVec2, point: DVec2, to: DVec2) -> bool {
        orientation(self.origin, from, point) >= Orientation::Collinear
            && orientation(self.origin, point, to) == Orientation::CounterClockwise
    }

    /// Insert neighbor `index` located at `point` in angular order
    ///
    /// # Errors
    ///
    /// - `InvalidArgument` if `index` is already a neighbor
    /// - `InvariantViolation` if no wedge accepts the point (only possible if the
    ///   ring no longer matches the geometry)
    pub fn add_neighbor(&mut self, index: usize, point: DVec2) -> Result<()> {
        let id = NeighborId::Point(index);
        if self.nodes.contains_key(&id) {
            return Err(TriangulationError::InvalidArgument(format!(
                "point {} is already a neighbor",
                index
            )));
        }

        for datum in Datum::ALL {
            let start = NeighborId::Datum(datum);
            let stop = NeighborId::Datum(datum.next());
            if !self.in_wedge(self.node(start)?.point, point, self.node(stop)?.point) {
                continue;
            }

            let mut current = start;
            while current != stop {
                let node = self.node(current)?;
                let next = self.node(node.next)?;
                if self.in_wedge(node.point, point, next.point) {
                    return self.splice(id, point, current, node.next);
                }
                current = node.next;
            }
        }

        Err(TriangulationError::InvariantViolation(format!(
            "no angular wedge accepts point {} at ({}, {})",
            index, point.x, point.y
        )))
    }

    fn node_mut(&mut self, id: NeighborId) -> Result<&mut Node> {
        self.nodes.get_mut(&id).ok_or_else(|| {
            TriangulationError::InvariantViolation(format!("band ring broken at {:?}", id))
        })
    }

    /// Link `id` between `prev` and `next`; both must be in the ring
    fn splice(&mut self, id: NeighborId, point: DVec2, prev: NeighborId, next: NeighborId) -> Result<()> {
        self.node(prev)?;
        self.node(next)?;

        self.node_mut(prev)?.next = id;
        self.node_mut(next)?.prev = id;
        self.nodes.insert(id, Node { point, prev, next });
        Ok(())
    }

    /// Remove neighbor `index`, relinking its predecessor and successor
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `index` is not a neighbor
    pub fn remove_neighbor(&mut self, index: usize) -> Result<()> {
        let id = NeighborId::Point(index);
        let node = self.nodes.get(&id).copied().ok_or_else(|| {
            TriangulationError::InvalidArgument(format!("point {} is not a neighbor", index))
        })?;
        self.node(node.prev)?;
        self.node(node.next)?;

        self.node_mut(node.prev)?.next = node.next;
        self.node_mut(node.next)?.prev = node.prev;
        self.nodes.remove(&id);
        Ok(())
    }

    /// Up to `count` real neighbors following `start` counter-clockwise
    ///
    /// Datum sentinels are skipped. The walk stops early when it comes back to
    /// `start`, so the iterator never yields more than one full turn.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `start` is not in the band
    pub fn neighbors_ahead(
        &self,
        start: impl Into<NeighborId>,
        count: usize,
    ) -> Result<NeighborsAhead<'_>> {
        let start = start.into();
        if !self.nodes.contains_key(&start) {
            return Err(TriangulationError::InvalidArgument(format!(
                "{:?} is not in the band",
                start
            )));
        }

        Ok(NeighborsAhead {
            band: self,
            start,
            cursor: start,
            remaining: count,
        })
    }

    /// All real neighbors counter-clockwise, starting after the North sentinel
    pub fn neighbors(&self) -> NeighborsAhead<'_> {
        let start = NeighborId::Datum(Datum::North);
        NeighborsAhead {
            band: self,
            start,
            cursor: start,
            remaining: self.len(),
        }
    }
}

/// Iterator returned by [`AdjacencyBand::neighbors_ahead`]
#[derive(Debug, Clone)]
pub struct NeighborsAhead<'a> {
    band: &'a AdjacencyBand,
    start: NeighborId,
    cursor: NeighborId,
    remaining: usize,
}

impl Iterator for NeighborsAhead<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        while self.remaining > 0 {
            let Some(next) = self.band.next_of(self.cursor) else {
                self.remaining = 0;
                break;
            };
            self.cursor = next;

            if self.cursor == self.start {
                self.remaining = 0;
                break;
            }
            if let NeighborId::Point(index) = self.cursor {
                self.remaining -= 1;
                return Some(index);
            }
        }
        None
    }
}

impl std::iter::FusedIterator for NeighborsAhead<'_> {}

#[cfg(test)]
mod tests {
    use super::*;

    fn compass_band() -> AdjacencyBand {
        // 0: east, 1: north, 2: west, 3: south, inserted out of angular order
        let mut band = AdjacencyBand::new(DVec2::ZERO);
        band.add_neighbor(2, DVec2::new(-1.0, 0.0)).unwrap();
        band.add_neighbor(0, DVec2::new(1.0, 0.0)).unwrap();
        band.add_neighbor(3, DVec2::new(0.0, -1.0)).unwrap();
        band.add_neighbor(1, DVec2::new(0.0, 1.0)).unwrap();
        band
    }

    #[test]
    fn test_new_band_is_empty() {
        let band = AdjacencyBand::new(DVec2::new(3.0, -2.0));
        assert!(band.is_empty());
        assert_eq!(band.neighbors().count(), 0);
        assert_eq!(band.origin(), DVec2::new(3.0, -2.0));
    }

    #[test]
    fn test_datum_ring_is_counter_clockwise() {
        for datum in Datum::ALL {
            let turn = orientation(DVec2::ZERO, datum.offset(), datum.next().offset());
            assert_eq!(turn, Orientation::CounterClockwise);
            assert_eq!(datum.next().prev(), datum);
        }
    }

    #[test]
    fn test_neighbors_in_angular_order() {
        let band = compass_band();
        assert_eq!(band.len(), 4);

        let ahead: Vec<usize> = band.neighbors_ahead(0usize, 3).unwrap().collect();
        assert_eq!(ahead, vec![1, 2, 3]);

        let ahead: Vec<usize> = band.neighbors_ahead(2usize, 2).unwrap().collect();
        assert_eq!(ahead, vec![3, 0]);

        // Starting after North: north itself sits exactly on the sentinel ray
        let all: Vec<usize> = band.neighbors().collect();
        assert_eq!(all, vec![1, 2, 3, 0]);
    }

    #[test]
    fn test_neighbors_ahead_stops_after_one_turn() {
        let band = compass_band();
        let ahead: Vec<usize> = band.neighbors_ahead(0usize, 10).unwrap().collect();
        assert_eq!(ahead, vec![1, 2, 3]);
    }

    #[test]
    fn test_neighbors_ahead_from_datum() {
        let band = compass_band();
        let ahead: Vec<usize> = band.neighbors_ahead(Datum::SouthEast, 1).unwrap().collect();
        assert_eq!(ahead, vec![0]);
    }

    #[test]
    fn test_remove_neighbor_relinks() {
        let mut band = compass_band();
        band.remove_neighbor(2).unwrap();
        assert!(!band.contains(2));
        assert_eq!(band.len(), 3);

        let ahead: Vec<usize> = band.neighbors_ahead(1usize, 1).unwrap().collect();
        assert_eq!(ahead, vec![3]);

        // Re-adding lands in the same place
        band.add_neighbor(2, DVec2::new(-5.0, 0.0)).unwrap();
        let ahead: Vec<usize> = band.neighbors_ahead(1usize, 1).unwrap().collect();
        assert_eq!(ahead, vec![2]);
    }

    #[test]
    fn test_duplicate_add_is_rejected() {
        let mut band = compass_band();
        let result = band.add_neighbor(1, DVec2::new(0.0, 2.0));
        assert!(matches!(result, Err(TriangulationError::InvalidArgument(_))));
        assert_eq!(band.len(), 4);
    }

    #[test]
    fn test_absent_neighbor_is_rejected() {
        let mut band = compass_band();
        assert!(matches!(
            band.remove_neighbor(9),
            Err(TriangulationError::InvalidArgument(_))
        ));
        assert!(band.neighbors_ahead(9usize, 1).is_err());
    }

    #[test]
    fn test_broken_ring_is_reported() {
        let mut band = compass_band();
        if let Some(node) = band.nodes.get_mut(&NeighborId::Point(1)) {
            node.next = NeighborId::Point(42);
        }

        assert!(matches!(
            band.remove_neighbor(1),
            Err(TriangulationError::InvariantViolation(_))
        ));
        // Nothing was unlinked
        assert!(band.contains(1));
        assert_eq!(band.len(), 4);
        assert_eq!(band.prev_of(NeighborId::Point(1)), Some(NeighborId::Datum(Datum::North)));
    }

    #[test]
    fn test_neighbor_on_sentinel_ray() {
        // Exactly along the lower-left sentinel direction
        let mut band = AdjacencyBand::new(DVec2::ZERO);
        band.add_neighbor(0, Datum::SouthWest.offset() * 2.0).unwrap();
        band.add_neighbor(1, DVec2::new(1.0, 0.0)).unwrap();
        assert_eq!(band.prev_of(NeighborId::Point(0)), Some(NeighborId::Datum(Datum::SouthWest)));
        let ahead: Vec<usize> = band.neighbors_ahead(0usize, 5).unwrap().collect();
        assert_eq!(ahead, vec![1]);
    }
}
