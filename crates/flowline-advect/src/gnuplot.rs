//! Gnuplot-style plain-text trajectory export and seed import.
//!
//! # Format
//!
//! ```text
//! # X-position      Y-position      Z-position     Time     Value
//! x, y, z, time, value        <- one row per non-separator particle
//! ...
//!                             <- two blank lines end each stream
//!
//! ```
//!
//! Import reads the same rows back, but only the first three (position)
//! or four (position + time) values of each row; every row becomes an
//! independent seed.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use flowline_core::{AdvectError, FileError, Particle};

use crate::advection::Advection;

/// Comment line written at the top of every export.
pub const HEADER: &str = "# X-position      Y-position      Z-position     Time     Value";

/// Write `streams` in gnuplot row format to `w`.
pub fn write_streams<'a, W, I>(mut w: W, streams: I) -> io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a [Particle]>,
{
    writeln!(w, "{HEADER}")?;
    for stream in streams {
        for p in stream.iter().filter(|p| !p.is_special()) {
            writeln!(
                w,
                "{:.6}, {:.6}, {:.6}, {:.6}, {:.6}",
                p.location.x, p.location.y, p.location.z, p.time, p.value
            )?;
        }
        write!(w, "\n\n")?;
    }
    w.flush()
}

/// Parse seed rows from `r`.
///
/// Leading whitespace is ignored; blank lines and lines starting with `#`
/// are skipped. Values are separated by commas, whitespace, or both. An
/// empty field between two commas is an error; one trailing comma is
/// allowed. A row needs at least three values; a fourth sets the seed
/// time (default `0.0`) and anything past that is ignored.
pub fn read_seeds<R: BufRead>(r: R) -> Result<Vec<Particle>, FileError> {
    let mut seeds = Vec::new();
    for (n, line) in r.lines().enumerate() {
        let line = line?;
        let line = line.trim_start();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let malformed = |detail: String| FileError::MalformedLine {
            line: n + 1,
            detail,
        };

        let line = line.trim_end();
        let line = line.strip_suffix(',').unwrap_or(line);
        let mut values = [0.0f32; 4];
        let mut count = 0;
        for (i, field) in line.split(',').enumerate() {
            if field.trim().is_empty() {
                return Err(malformed(format!("empty field {}", i + 1)));
            }
            for token in field.split_whitespace() {
                if count == values.len() {
                    break;
                }
                values[count] = token
                    .parse()
                    .map_err(|_| malformed(format!("unparsable token {token:?}")))?;
                count += 1;
            }
        }

        let seed = Particle::from_components(&values[..count])
            .ok_or_else(|| malformed(format!("expected at least 3 values, found {count}")))?;
        seeds.push(seed);
    }
    Ok(seeds)
}

impl Advection {
    /// Write every stream to `w` in gnuplot row format.
    pub fn write_gnuplot<W: Write>(&self, w: W) -> io::Result<()> {
        write_streams(w, self.streams())
    }

    /// Export every stream to the file at `path`.
    ///
    /// With `append` the rows are added to the end of an existing file;
    /// otherwise the file is truncated. Output is not transactional: a
    /// failure midway can leave a partial file behind.
    pub fn output_streams_gnuplot(
        &self,
        path: impl AsRef<Path>,
        append: bool,
    ) -> Result<(), AdvectError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(FileError::EmptyPath.into());
        }
        let mut opts = OpenOptions::new();
        if append {
            opts.append(true);
        } else {
            opts.write(true).truncate(true);
        }
        let file = opts.create(true).open(path).map_err(|e| {
            log::warn!("cannot open {} for writing: {e}", path.display());
            FileError::Io(e)
        })?;
        self.write_gnuplot(BufWriter::new(file))
            .map_err(FileError::Io)?;
        Ok(())
    }

    /// Import seeds from the file at `path` and reseed with them.
    ///
    /// Returns the number of seeds read. A file with no seed rows leaves
    /// the current streams untouched; a malformed row fails the whole
    /// import without touching them either.
    pub fn input_streams_gnuplot(&mut self, path: impl AsRef<Path>) -> Result<usize, AdvectError> {
        let path = path.as_ref();
        if path.as_os_str().is_empty() {
            return Err(FileError::EmptyPath.into());
        }
        let file = File::open(path).map_err(|e| {
            log::warn!("cannot open seed file {}: {e}", path.display());
            FileError::Io(e)
        })?;
        let seeds = read_seeds(BufReader::new(file))?;
        if !seeds.is_empty() {
            log::debug!("reseeding with {} seeds from {}", seeds.len(), path.display());
            self.use_seed_particles(&seeds);
        }
        Ok(seeds.len())
    }
}
