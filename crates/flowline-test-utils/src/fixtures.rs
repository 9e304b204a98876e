//! Reusable seed and file fixtures.
//!
//! - [`line_seeds`]: seeds evenly spaced along the y axis.
//! - [`grid_seeds`]: seeds on a regular xy lattice.
//! - [`TempFile`]: a unique temporary path removed on drop.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use flowline_core::{Particle, Vec3};

/// `n` seeds at `(0, i * spacing, 0)` with the given start time.
pub fn line_seeds(n: usize, spacing: f32, time: f32) -> Vec<Particle> {
    (0..n)
        .map(|i| Particle::new(Vec3::new(0.0, i as f32 * spacing, 0.0), time))
        .collect()
}

/// `nx * ny` seeds on the z = 0 plane, row-major in y then x.
pub fn grid_seeds(nx: usize, ny: usize, spacing: f32) -> Vec<Particle> {
    let mut seeds = Vec::with_capacity(nx * ny);
    for y in 0..ny {
        for x in 0..nx {
            seeds.push(Particle::new(
                Vec3::new(x as f32 * spacing, y as f32 * spacing, 0.0),
                0.0,
            ));
        }
    }
    seeds
}

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

/// A unique path under the system temp directory.
///
/// The file is not created; whatever is written there is removed when the
/// guard drops.
pub struct TempFile {
    path: PathBuf,
}

impl TempFile {
    pub fn new(name: &str) -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        let path = std::env::temp_dir().join(format!(
            "flowline-{}-{}-{}.txt",
            std::process::id(),
            id,
            name
        ));
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `contents` to the path, replacing anything already there.
    pub fn write(&self, contents: &str) {
        std::fs::write(&self.path, contents).expect("write temp file");
    }

    pub fn read(&self) -> String {
        std::fs::read_to_string(&self.path).expect("read temp file")
    }
}

impl Drop for TempFile {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.path);
    }
}
