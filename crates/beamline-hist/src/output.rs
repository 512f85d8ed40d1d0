//! Self-describing detector text files.
//!
//! ```text
//! # Format: beamline detector text 1
//! # Instance: psd
//! # Title: PSD monitor
//! # Filename: psd.dat
//! # Type: array_2d(10, 10)
//! # Axis 0: x [m] -0.5 0.5 10
//! # Axis 1: y [m] -0.5 0.5 10
//! # Events: 1000   Intensity: 0.8
//! # Data [psd/psd.dat] N:
//! ...
//! # Data [psd/psd.dat] I:
//! ...
//! # Data [psd/psd.dat] I_err:
//! ...
//! ```
//!
//! Each block has the histogram's shape: one value per line in 1-D, one
//! row per axis-0 bin in 2-D. Rank 3 writes one row per (axis 0, axis 1)
//! pair.

use std::fmt::{self, Display, Write as _};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::snapshot::HistogramSnapshot;

/// Version line of the format.
pub const FORMAT: &str = "beamline detector text 1";

/// One detector output file.
#[derive(Clone, Debug)]
pub struct DetectorFile<'a> {
    instance: &'a str,
    filename: &'a str,
    snapshot: &'a HistogramSnapshot,
}

impl<'a> DetectorFile<'a> {
    /// Describe `snapshot` as file `filename` of node `instance`.
    pub fn new(instance: &'a str, filename: &'a str, snapshot: &'a HistogramSnapshot) -> Self {
        Self {
            instance,
            filename,
            snapshot,
        }
    }

    /// The file name.
    pub fn filename(&self) -> &str {
        self.filename
    }

    /// Render the whole file.
    pub fn render(&self) -> String {
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_into(&mut out);
        out
    }

    /// Render and write to `dir/filename`, returning the path written.
    pub fn write_in(&self, dir: &Path) -> io::Result<PathBuf> {
        let path = dir.join(self.filename);
        fs::write(&path, self.render())?;
        Ok(path)
    }

    fn write_into(&self, out: &mut String) -> fmt::Result {
        let s = self.snapshot;
        let shape = s.shape();
        writeln!(out, "# Format: {FORMAT}")?;
        writeln!(out, "# Instance: {}", self.instance)?;
        writeln!(out, "# Title: {}", s.title())?;
        writeln!(out, "# Filename: {}", self.filename)?;
        let dims = shape
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        writeln!(out, "# Type: array_{}d({dims})", shape.len())?;
        for (i, axis) in s.axes().iter().enumerate() {
            writeln!(
                out,
                "# Axis {i}: {} {} {} {}",
                axis.label, axis.min, axis.max, axis.bins
            )?;
        }
        writeln!(
            out,
            "# Events: {}   Intensity: {}",
            s.total_count(),
            s.total_intensity()
        )?;

        let row_len = if shape.len() == 1 {
            1
        } else {
            shape[shape.len() - 1]
        };
        self.block(out, "N", s.counts(), row_len)?;
        self.block(out, "I", s.intensity(), row_len)?;
        self.block(out, "I_err", &s.errors(), row_len)
    }

    fn block<T: Display>(
        &self,
        out: &mut String,
        tag: &str,
        values: &[T],
        row_len: usize,
    ) -> fmt::Result {
        writeln!(out, "# Data [{}/{}] {tag}:", self.instance, self.filename)?;
        for row in values.chunks(row_len) {
            let mut first = true;
            for v in row {
                if !first {
                    out.push(' ');
                }
                first = false;
                write!(out, "{v}")?;
            }
            out.push('\n');
        }
        Ok(())
    }
}
