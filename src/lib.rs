//! Near-minimum-weight planar triangulation
//!
//! Builds a triangulation of a 2D point set by peeling convex layers (an "onion"),
//! then shortens it with local edge flips over quadrilaterals and pentagons.
//! Every flip is recorded so consumers can replay a pass step by step.
//!
//! # Quick Start
//!
//! ```rust
//! use onion_mwt::*;
//!
//! let config = NetworkConfigBuilder::new()
//!     .seed(42)
//!     .build().unwrap();
//!
//! let points = [[0.0, 0.0], [4.0, 0.0], [4.0, 3.0], [0.0, 3.0], [1.0, 1.0], [3.0, 2.0]];
//! let mut network = Network::with_config(points, config);
//!
//! let triangulation = network.build_triangulation().unwrap();
//! println!("{} triangles, internal length {:.3}", triangulation.triangle_count(), triangulation.internal_length);
//!
//! let quads = network.fine_tune_quadrilaterals().unwrap();
//! let pentagons = network.fine_tune_pentagons().unwrap();
//! assert!(pentagons.internal_length <= quads.internal_length + 1e-9);
//! ```
//!
//! # Features
//!
//! - `serde`: Enables serialization support for configuration and reports

// Modules
pub mod error;
pub mod config;
pub mod geometry;
pub mod segment;
pub mod band;
pub mod random;
pub mod report;
pub mod network;

// Re-export core types for convenience
pub use error::{TriangulationError, Result};
pub use config::{NetworkConfig, NetworkConfigBuilder};
pub use segment::{SegmentId, SegmentSet};
pub use band::{AdjacencyBand, Datum, NeighborId};
pub use random::RandomSource;
pub use report::{PassReport, Replacement, Replay, Triangulation};
pub use network::{LocalPolygon, Network, PolygonShape};

// Re-export glam::DVec2 for convenience
pub use glam::DVec2;
