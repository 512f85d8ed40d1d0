//! Energy spectrum monitor.

use beamline_core::{Event, TraceStatus};
use beamline_hist::{Axis, Histogram};
use beamline_node::{Component, ComponentError, InitContext, SaveContext, TraceContext};

/// Records a 1-D energy spectrum (keV for photons, meV for neutrons).
///
/// With an area set, only events crossing that rectangle in the local
/// z = 0 plane are counted; without one every event is counted where it
/// stands. The event is always restored.
#[derive(Debug)]
pub struct EnergyMonitor {
    name: String,
    axis: Axis,
    area: Option<(f64, f64)>,
    filename: String,
    histogram: Option<Histogram>,
}

impl EnergyMonitor {
    /// A monitor with `bins` bins over `[min, max)`.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::InvalidConfig`] if `bins` is zero or the
    /// range is empty or not finite.
    pub fn new(
        name: impl Into<String>,
        bins: usize,
        min: f64,
        max: f64,
    ) -> Result<Self, ComponentError> {
        if bins == 0 || !(min.is_finite() && max.is_finite() && max > min) {
            return Err(ComponentError::invalid(format!(
                "energy monitor needs bins >= 1 and min < max, got {bins} in [{min}, {max})"
            )));
        }
        let name = name.into();
        Ok(Self {
            filename: format!("{name}.E"),
            name,
            axis: Axis::new("E", bins, min, max),
            area: None,
            histogram: None,
        })
    }

    /// Count only events crossing a `width` × `height` window at z = 0.
    pub fn with_area(mut self, width: f64, height: f64) -> Result<Self, ComponentError> {
        if !(width.is_finite() && width > 0.0 && height.is_finite() && height > 0.0) {
            return Err(ComponentError::invalid(format!(
                "area must be finite and > 0, got ({width}, {height})"
            )));
        }
        self.area = Some((width / 2.0, height / 2.0));
        Ok(self)
    }

    /// Output file name (default `<name>.E`).
    pub fn with_filename(mut self, filename: impl Into<String>) -> Self {
        self.filename = filename.into();
        self
    }
}

impl Component for EnergyMonitor {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, _ctx: &InitContext<'_>) -> Result<(), ComponentError> {
        self.histogram = Some(Histogram::new_1d(
            format!("Energy monitor {}", self.name),
            self.axis.clone(),
        )?);
        Ok(())
    }

    fn trace(&self, event: &mut Event, _ctx: &mut TraceContext<'_>) -> TraceStatus {
        let Some(hist) = &self.histogram else {
            return TraceStatus::Restored;
        };
        if let Some((hw, hh)) = self.area {
            if !event.propagate_to_plane(0.0)
                || event.position.x.abs() > hw
                || event.position.y.abs() > hh
            {
                return TraceStatus::Restored;
            }
        }
        hist.add(event.weight, &[event.energy()]);
        TraceStatus::Restored
    }

    fn save(&self, ctx: &mut SaveContext<'_>) -> Result<(), ComponentError> {
        if let Some(hist) = &self.histogram {
            ctx.emit(self.filename.as_str(), hist.snapshot())?;
        }
        Ok(())
    }

    fn teardown(&mut self) {
        self.histogram = None;
    }
}
