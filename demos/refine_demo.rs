//! Demonstration of the refinement passes and the shuffle

use onion_mwt::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing_subscriber::fmt::SubscriberBuilder;

fn main() -> Result<()> {
    SubscriberBuilder::default().with_target(false).init();

    let mut rng = ChaCha8Rng::seed_from_u64(11);
    let points: Vec<[f64; 2]> = (0..150)
        .map(|_| [rng.gen::<f64>(), rng.gen::<f64>()])
        .collect();

    let config = NetworkConfigBuilder::new()
        .seed(42)
        .shuffle_miss_limit(256)?
        .build()?;
    let mut network = Network::with_config(points, config);

    let built = network.build_triangulation()?;
    println!("Built:       {:.4}", built.internal_length);

    let quads = network.fine_tune_quadrilaterals()?;
    println!("Quad pass:   {:.4} ({} flips)", quads.internal_length, quads.replacements.len());

    let pentagons = network.fine_tune_pentagons()?;
    println!("Pent pass:   {:.4} ({} flips)", pentagons.internal_length, pentagons.replacements.len());

    let quads = network.fine_tune_quadrilaterals()?;
    println!("Quad again:  {:.4} ({} flips)", quads.internal_length, quads.replacements.len());

    // Shuffle away from the local minimum, then descend again
    let shuffled = network.shuffle()?;
    println!("Shuffled:    {:.4} ({} flips)", shuffled.internal_length, shuffled.replacements.len());

    let quads = network.fine_tune_quadrilaterals()?;
    let pentagons = network.fine_tune_pentagons()?;
    println!(
        "Re-refined:  {:.4} ({} flips)",
        pentagons.internal_length,
        quads.replacements.len() + pentagons.replacements.len()
    );

    network.validate()?;
    Ok(())
}
