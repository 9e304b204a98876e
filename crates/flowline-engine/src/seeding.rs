//! Seed generation inside a rake box.

use flowline_core::{Particle, Vec3};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::config::Rake;

/// Seeds on an interior lattice of `rake`.
///
/// Along each axis with `n` seeds the coordinates are
/// `min + (k + 1) * (max - min) / (n + 1)` for `k in 0..n`, so no seed
/// lies on a face of the box. Seeds are ordered x fastest, then y, then z.
pub fn gridded(rake: &Rake, counts: [usize; 3], time: f32) -> Vec<Particle> {
    let extent = rake.max - rake.min;
    let spacing = Vec3::new(
        extent.x / (counts[0] + 1) as f32,
        extent.y / (counts[1] + 1) as f32,
        extent.z / (counts[2] + 1) as f32,
    );

    let mut seeds = Vec::with_capacity(counts.iter().product());
    for k in 0..counts[2] {
        for j in 0..counts[1] {
            for i in 0..counts[0] {
                let lattice = Vec3::new((i + 1) as f32, (j + 1) as f32, (k + 1) as f32);
                seeds.push(Particle::new(rake.min + lattice * spacing, time));
            }
        }
    }
    seeds
}

/// `count` seeds drawn uniformly from `rake`.
///
/// The same `rng_seed` always yields the same seeds.
pub fn random(rake: &Rake, count: usize, rng_seed: u64, time: f32) -> Vec<Particle> {
    let mut rng = ChaCha8Rng::seed_from_u64(rng_seed);
    let extent = rake.max - rake.min;
    (0..count)
        .map(|_| {
            let u = Vec3::new(rng.random(), rng.random(), rng.random());
            Particle::new(rake.min + u * extent, time)
        })
        .collect()
}
