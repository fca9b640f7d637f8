//! Triangulation outputs
//!
//! These are the values handed to consumers (renderers, animation replays): segment
//! id sets, the total internal length, and the ordered log of segment replacements.

use std::collections::HashSet;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::segment::SegmentId;

/// Result of building the initial triangulation
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Triangulation {
    /// Outer convex hull edges, in construction order
    pub boundary: Vec<SegmentId>,
    /// All other edges, in construction order
    pub internal: Vec<SegmentId>,
    /// Summed length of the internal edges
    pub internal_length: f64,
}

impl Triangulation {
    /// Total number of edges
    pub fn edge_count(&self) -> usize {
        self.boundary.len() + self.internal.len()
    }

    /// Number of triangular faces
    ///
    /// Each face has three edges; a boundary edge borders one face and an internal
    /// edge borders two, so `3 * faces = boundary + 2 * internal`.
    pub fn triangle_count(&self) -> usize {
        (self.boundary.len() + 2 * self.internal.len()) / 3
    }
}

/// One edge flip: `old` was removed and `new` added in its place
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Replacement {
    pub old: SegmentId,
    pub new: SegmentId,
    /// `length(new) - length(old)`
    pub length_delta: f64,
}

/// Result of one optimization pass
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PassReport {
    /// Replacements in the order they were applied
    pub replacements: Vec<Replacement>,
    /// Internal edges after the pass
    pub internal: Vec<SegmentId>,
    /// Summed internal length after the pass
    pub internal_length: f64,
}

impl PassReport {
    /// Whether the pass changed nothing
    pub fn is_empty(&self) -> bool {
        self.replacements.is_empty()
    }

    /// Sum of all recorded length deltas
    pub fn total_delta(&self) -> f64 {
        self.replacements.iter().map(|r| r.length_delta).sum()
    }

    /// Step through the replacements starting from the state before the pass
    pub fn replay<'a>(&'a self, internal: &[SegmentId], internal_length: f64) -> Replay<'a> {
        Replay {
            replacements: &self.replacements,
            position: 0,
            internal: internal.iter().copied().collect(),
            internal_length,
        }
    }
}

/// Cursor that applies a replacement log one flip at a time
///
/// Lets an interactive consumer animate a pass incrementally instead of jumping to
/// the final state.
#[derive(Debug, Clone)]
pub struct Replay<'a> {
    replacements: &'a [Replacement],
    position: usize,
    internal: HashSet<SegmentId>,
    internal_length: f64,
}

impl<'a> Replay<'a> {
    /// Apply the next replacement and return it, or `None` when the log is exhausted
    pub fn step(&mut self) -> Option<&'a Replacement> {
        let replacement = self.replacements.get(self.position)?;
        self.position += 1;
        self.internal.remove(&replacement.old);
        self.internal.insert(replacement.new);
        self.internal_length += replacement.length_delta;
        Some(replacement)
    }

    /// Number of replacements applied so far
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of replacements not yet applied
    pub fn remaining(&self) -> usize {
        self.replacements.len() - self.position
    }

    /// Internal edges at the current step
    pub fn internal(&self) -> &HashSet<SegmentId> {
        &self.internal
    }

    /// Internal length at the current step
    pub fn internal_length(&self) -> f64 {
        self.internal_length
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_triangle_count() {
        let single = Triangulation {
            boundary: vec![SegmentId::new(0, 1), SegmentId::new(1, 2), SegmentId::new(2, 0)],
            internal: vec![],
            internal_length: 0.0,
        };
        assert_eq!(single.triangle_count(), 1);
        assert_eq!(single.edge_count(), 3);

        let quad = Triangulation {
            boundary: vec![
                SegmentId::new(0, 1),
                SegmentId::new(1, 2),
                SegmentId::new(2, 3),
                SegmentId::new(3, 0),
            ],
            internal: vec![SegmentId::new(0, 2)],
            internal_length: 2f64.sqrt(),
        };
        assert_eq!(quad.triangle_count(), 2);
    }

    #[test]
    fn test_replay_applies_log() {
        let report = PassReport {
            replacements: vec![
                Replacement { old: SegmentId::new(0, 2), new: SegmentId::new(1, 3), length_delta: -1.0 },
                Replacement { old: SegmentId::new(1, 3), new: SegmentId::new(0, 2), length_delta: 0.5 },
            ],
            internal: vec![SegmentId::new(0, 2)],
            internal_length: 9.5,
        };
        assert!((report.total_delta() + 0.5).abs() < 1e-12);

        let mut replay = report.replay(&[SegmentId::new(0, 2)], 10.0);
        assert_eq!(replay.remaining(), 2);

        let first = replay.step().unwrap();
        assert_eq!(first.new, SegmentId::new(1, 3));
        assert!(replay.internal().contains(&SegmentId::new(1, 3)));
        assert!(!replay.internal().contains(&SegmentId::new(0, 2)));
        assert!((replay.internal_length() - 9.0).abs() < 1e-12);

        replay.step().unwrap();
        assert!(replay.step().is_none());
        assert_eq!(replay.position(), 2);
        assert!((replay.internal_length() - report.internal_length).abs() < 1e-12);
    }
}
