//! Aperture in the local z = 0 plane.

use beamline_core::{Event, TraceStatus};
use beamline_node::{Component, ComponentError, TraceContext};

/// Opening of a [`Slit`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum SlitShape {
    /// Rectangle centred on the axis, full extents in metres.
    Rect {
        /// Extent along x.
        width: f64,
        /// Extent along y.
        height: f64,
    },
    /// Disk centred on the axis.
    Circle {
        /// Radius in metres.
        radius: f64,
    },
}

impl SlitShape {
    fn contains(&self, x: f64, y: f64) -> bool {
        match *self {
            Self::Rect { width, height } => x.abs() <= width / 2.0 && y.abs() <= height / 2.0,
            Self::Circle { radius } => x * x + y * y <= radius * radius,
        }
    }
}

/// Absorbs every event that does not pass through the opening.
///
/// Events that get through are left at the slit plane and reported as
/// `PassThrough`: free flight to the plane is not a change of state.
#[derive(Debug)]
pub struct Slit {
    name: String,
    shape: SlitShape,
}

impl Slit {
    /// A rectangular slit.
    pub fn rect(name: impl Into<String>, width: f64, height: f64) -> Result<Self, ComponentError> {
        Self::new(name, SlitShape::Rect { width, height })
    }

    /// A circular pinhole.
    pub fn circle(name: impl Into<String>, radius: f64) -> Result<Self, ComponentError> {
        Self::new(name, SlitShape::Circle { radius })
    }

    /// A slit with the given opening.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::InvalidConfig`] if any extent is not
    /// finite and positive.
    pub fn new(name: impl Into<String>, shape: SlitShape) -> Result<Self, ComponentError> {
        let extents = match shape {
            SlitShape::Rect { width, height } => [width, height],
            SlitShape::Circle { radius } => [radius, radius],
        };
        if let Some(bad) = extents.iter().find(|v| !(v.is_finite() && **v > 0.0)) {
            return Err(ComponentError::invalid(format!(
                "slit extents must be finite and > 0, got {bad}"
            )));
        }
        Ok(Self {
            name: name.into(),
            shape,
        })
    }

    /// The opening.
    pub fn shape(&self) -> SlitShape {
        self.shape
    }
}

impl Component for Slit {
    fn name(&self) -> &str {
        &self.name
    }

    fn trace(&self, event: &mut Event, _ctx: &mut TraceContext<'_>) -> TraceStatus {
        if !event.propagate_to_plane(0.0) {
            return TraceStatus::Absorbed;
        }
        if self.shape.contains(event.position.x, event.position.y) {
            TraceStatus::PassThrough
        } else {
            TraceStatus::Absorbed
        }
    }
}
