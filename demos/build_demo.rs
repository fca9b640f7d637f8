//! Demonstration of onion-peel construction on a random point cloud

use onion_mwt::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::fmt::SubscriberBuilder;

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();

    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let points: Vec<DVec2> = (0..200)
        .map(|_| DVec2::new(rng.gen_range(0.0..100.0), rng.gen_range(0.0..100.0)))
        .collect();

    println!("Triangulating {} points...", points.len());
    let mut network = Network::new(points);
    let triangulation = network.build_triangulation()?;

    println!("Boundary edges: {}", triangulation.boundary.len());
    println!("Internal edges: {}", triangulation.internal.len());
    println!("Triangles: {}", triangulation.triangle_count());
    println!("Internal length: {:.3}", triangulation.internal_length);

    // Degree distribution from the adjacency bands
    let mut degrees = std::collections::BTreeMap::new();
    for index in 0..network.point_count() {
        if let Some(band) = network.band(index) {
            *degrees.entry(band.len()).or_insert(0) += 1;
        }
    }
    println!("\nDegree distribution:");
    for (degree, count) in &degrees {
        println!("  {:>2}: {}", degree, count);
    }

    network.validate()?;
    println!("\nTriangulation is planar");
    Ok(())
}
