//! Step through a refinement pass one flip at a time, the way a renderer animates it

use onion_mwt::*;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn main() -> Result<()> {
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let points: Vec<[f64; 2]> = (0..40)
        .map(|_| [rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)])
        .collect();

    let mut network = Network::new(points);
    let before = network.build_triangulation()?;
    let report = network.fine_tune_quadrilaterals()?;

    let mut replay = report.replay(&before.internal, before.internal_length);
    while let Some(replacement) = replay.step() {
        let old = network.get_segment(replacement.old);
        let new = network.get_segment(replacement.new);
        if let (Some((a, b)), Some((c, d))) = (old, new) {
            println!(
                "step {:>3}: ({:.2}, {:.2})-({:.2}, {:.2}) -> ({:.2}, {:.2})-({:.2}, {:.2})  length {:.4}",
                replay.position(),
                a.x, a.y, b.x, b.y,
                c.x, c.y, d.x, d.y,
                replay.internal_length()
            );
        }
    }

    println!(
        "\n{} flips, {:.4} -> {:.4}",
        report.replacements.len(),
        before.internal_length,
        report.internal_length
    );
    Ok(())
}
