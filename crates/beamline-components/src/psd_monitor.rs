//! Position-sensitive detector.
//!
//! Records `(x, y)` where events cross the local z = 0 plane into a 2-D
//! weighted histogram, optionally also into one histogram per energy slice.
//! Every event is restored afterwards, so the monitor does not disturb the
//! beam.

use beamline_core::{Event, TraceStatus};
use beamline_hist::{Axis, Histogram};
use beamline_node::{Component, ComponentError, InitContext, SaveContext, TraceContext};

#[derive(Clone, Copy, Debug, PartialEq)]
struct Slices {
    count: usize,
    min: f64,
    max: f64,
}

#[derive(Debug)]
struct Detector {
    integrated: Histogram,
    energy_axis: Option<Axis>,
    slices: Vec<Histogram>,
}

/// A 2-D position-sensitive monitor.
#[derive(Debug)]
pub struct PsdMonitor {
    name: String,
    width: f64,
    height: f64,
    nx: usize,
    ny: usize,
    filename: String,
    slices: Option<Slices>,
    detector: Option<Detector>,
}

/// Builder for [`PsdMonitor`].
///
/// Required: `size`, `bins`.
#[derive(Debug)]
pub struct PsdMonitorBuilder {
    name: String,
    size: Option<(f64, f64)>,
    bins: Option<(usize, usize)>,
    filename: Option<String>,
    slices: Option<Slices>,
}

impl PsdMonitor {
    /// Start configuring a monitor named `name`.
    pub fn builder(name: impl Into<String>) -> PsdMonitorBuilder {
        PsdMonitorBuilder {
            name: name.into(),
            size: None,
            bins: None,
            filename: None,
            slices: None,
        }
    }

    /// Name of the integrated output file.
    pub fn filename(&self) -> &str {
        &self.filename
    }

    /// File name of energy slice `i`: `<stem>_E<i>[.<ext>]`.
    pub fn slice_filename(&self, i: usize) -> String {
        match self.filename.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() => format!("{stem}_E{i}.{ext}"),
            _ => format!("{}_E{i}", self.filename),
        }
    }
}

impl PsdMonitorBuilder {
    /// Sensitive area in metres, centred on the local axis.
    pub fn size(mut self, width: f64, height: f64) -> Self {
        self.size = Some((width, height));
        self
    }

    /// Pixel counts along x and y.
    pub fn bins(mut self, nx: usize, ny: usize) -> Self {
        self.bins = Some((nx, ny));
        self
    }

    /// Output file name (default `<name>.psd`).
    pub fn filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = Some(filename.into());
        self
    }

    /// Also record `count` images, one per equal slice of `[min, max)`
    /// in energy.
    pub fn energy_slices(mut self, count: usize, min: f64, max: f64) -> Self {
        self.slices = Some(Slices { count, min, max });
        self
    }

    /// Build the monitor. Histograms are allocated at initialize.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::InvalidConfig`] if a required parameter is
    /// missing, the area is not finite and positive, a bin count is zero,
    /// or the energy slices are empty or inverted.
    pub fn build(self) -> Result<PsdMonitor, ComponentError> {
        let (width, height) = self
            .size
            .ok_or_else(|| ComponentError::invalid("size is required"))?;
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(ComponentError::invalid(format!(
                "size must be finite and > 0, got ({width}, {height})"
            )));
        }
        let (nx, ny) = self
            .bins
            .ok_or_else(|| ComponentError::invalid("bins are required"))?;
        if nx == 0 || ny == 0 {
            return Err(ComponentError::invalid("bin counts must be >= 1"));
        }
        if let Some(s) = self.slices {
            if s.count == 0 || !(s.min.is_finite() && s.max.is_finite() && s.max > s.min) {
                return Err(ComponentError::invalid(format!(
                    "energy slices need count >= 1 and min < max, got {} in [{}, {})",
                    s.count, s.min, s.max
                )));
            }
        }
        let filename = self
            .filename
            .unwrap_or_else(|| format!("{}.psd", self.name));
        Ok(PsdMonitor {
            name: self.name,
            width,
            height,
            nx,
            ny,
            filename,
            slices: self.slices,
            detector: None,
        })
    }
}

impl Component for PsdMonitor {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, _ctx: &InitContext<'_>) -> Result<(), ComponentError> {
        let image = |title: String| {
            Histogram::new_2d(
                title,
                Axis::new("x [m]", self.nx, -self.width / 2.0, self.width / 2.0),
                Axis::new("y [m]", self.ny, -self.height / 2.0, self.height / 2.0),
            )
        };
        let integrated = image(format!("PSD monitor {}", self.name))?;
        let (energy_axis, slices) = match self.slices {
            Some(s) => {
                let axis = Axis::new("E", s.count, s.min, s.max);
                let slices = (0..s.count)
                    .map(|i| {
                        let lo = s.min + axis.bin_width() * i as f64;
                        let hi = lo + axis.bin_width();
                        image(format!("PSD monitor {} [E {lo} .. {hi}]", self.name))
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                (Some(axis), slices)
            }
            None => (None, Vec::new()),
        };
        self.detector = Some(Detector {
            integrated,
            energy_axis,
            slices,
        });
        Ok(())
    }

    fn trace(&self, event: &mut Event, _ctx: &mut TraceContext<'_>) -> TraceStatus {
        let Some(det) = &self.detector else {
            return TraceStatus::Restored;
        };
        if !event.propagate_to_plane(0.0) {
            return TraceStatus::Restored;
        }
        let coords = [event.position.x, event.position.y];
        if det.integrated.add(event.weight, &coords) {
            if let Some(slice) = det.energy_axis.as_ref().and_then(|a| a.bin_of(event.energy())) {
                det.slices[slice].add(event.weight, &coords);
            }
        }
        TraceStatus::Restored
    }

    fn save(&self, ctx: &mut SaveContext<'_>) -> Result<(), ComponentError> {
        let Some(det) = &self.detector else {
            return Ok(());
        };
        ctx.emit(&self.filename, det.integrated.snapshot())?;
        for (i, slice) in det.slices.iter().enumerate() {
            ctx.emit(&self.slice_filename(i), slice.snapshot())?;
        }
        Ok(())
    }

    fn teardown(&mut self) {
        self.detector = None;
    }
}
