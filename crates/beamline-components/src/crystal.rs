//! Flat Bragg crystal.
//!
//! The crystal surface is the local x–z plane (normal +y), bounded to
//! `width` along x and `length` along z. An event that reaches the
//! surface inside those bounds is reflected specularly: the wavevector is
//! rotated by twice the glancing angle α about `k̂ × n̂`, and the weight is
//! multiplied by the reflectivity at the deviation `α - θ_B` from the Bragg
//! angle `sin θ_B = λ / 2d`.
//!
//! The reflectivity table holds, per energy, the peak reflectivity and the
//! Darwin width (FWHM, radians). The rocking curve is a Gaussian of that
//! width scaled by the Debye-Waller factor `exp(-2B s²)` with
//! `s = sin θ_B / λ = 1 / 2d`, `B` read from the header field
//! `debye_waller` (Å², default 0). The π channel is scaled by
//! `|cos 2θ_B|`; unpolarized events average the σ and π channels, polarized
//! events are projected onto them and leave with the reflected
//! polarization.
//!
//! Events that miss the crystal are restored to their state on arrival.

use std::path::PathBuf;

use beamline_core::{Event, TraceStatus, Vec3};
use beamline_geom::{intersect_plane, Plane};
use beamline_node::{Component, ComponentError, InitContext, TraceContext};
use beamline_table::Table;
use nalgebra::{Rotation3, Unit};

const FWHM_TO_EXPONENT: f64 = 4.0 * std::f64::consts::LN_2;

#[derive(Debug)]
struct Reflectivity {
    table: Table,
    debye_waller: f64,
}

/// A bounded flat crystal reflector.
#[derive(Debug)]
pub struct CrystalReflector {
    name: String,
    d_spacing: f64,
    half_width: f64,
    half_length: f64,
    table_path: PathBuf,
    reflectivity: Option<Reflectivity>,
}

/// Builder for [`CrystalReflector`].
///
/// Required: `d_spacing`, `size`, `table`.
#[derive(Debug)]
pub struct CrystalReflectorBuilder {
    name: String,
    d_spacing: Option<f64>,
    size: Option<(f64, f64)>,
    table_path: Option<PathBuf>,
}

/// Reflectivity of one event, split into polarization channels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChannelReflectivity {
    /// σ channel (polarization perpendicular to the scattering plane).
    pub sigma: f64,
    /// π channel (polarization in the scattering plane).
    pub pi: f64,
}

impl CrystalReflector {
    /// Start configuring a crystal named `name`.
    pub fn builder(name: impl Into<String>) -> CrystalReflectorBuilder {
        CrystalReflectorBuilder {
            name: name.into(),
            d_spacing: None,
            size: None,
            table_path: None,
        }
    }

    /// Lattice plane spacing in Å.
    pub fn d_spacing(&self) -> f64 {
        self.d_spacing
    }

    /// Bragg angle in radians at wavelength `lambda` (Å), or `None` when
    /// `lambda > 2d`.
    pub fn bragg_angle(&self, lambda: f64) -> Option<f64> {
        let s = lambda / (2.0 * self.d_spacing);
        (s.is_finite() && (0.0..=1.0).contains(&s)).then(|| s.asin())
    }

    /// σ and π reflectivity at `energy` and glancing angle `alpha`, once
    /// initialized.
    pub fn reflectivity(&self, energy: f64, lambda: f64, alpha: f64) -> Option<ChannelReflectivity> {
        let refl = self.reflectivity.as_ref()?;
        let theta = self.bragg_angle(lambda)?;
        let peak = refl.table.value_at_column(energy, 1)?;
        let width = refl.table.value_at_column(energy, 2)?;
        if width <= 0.0 {
            return None;
        }
        let s = 1.0 / (2.0 * self.d_spacing);
        let dw = (-2.0 * refl.debye_waller * s * s).exp();
        let dev = alpha - theta;
        let sigma = (peak * dw * (-FWHM_TO_EXPONENT * dev * dev / (width * width)).exp())
            .clamp(0.0, 1.0);
        Some(ChannelReflectivity {
            sigma,
            pi: sigma * (2.0 * theta).cos().abs(),
        })
    }
}

impl CrystalReflectorBuilder {
    /// Lattice plane spacing in Å.
    pub fn d_spacing(mut self, d: f64) -> Self {
        self.d_spacing = Some(d);
        self
    }

    /// Surface extents in metres: `width` along x, `length` along z.
    pub fn size(mut self, width: f64, length: f64) -> Self {
        self.size = Some((width, length));
        self
    }

    /// Reflectivity table (energy, peak reflectivity, Darwin width).
    pub fn table(mut self, path: impl Into<PathBuf>) -> Self {
        self.table_path = Some(path.into());
        self
    }

    /// Build the crystal. The table is loaded at initialize.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::InvalidConfig`] if a required parameter is
    /// missing or a length is not finite and positive.
    pub fn build(self) -> Result<CrystalReflector, ComponentError> {
        let d = self
            .d_spacing
            .ok_or_else(|| ComponentError::invalid("d_spacing is required"))?;
        let (w, l) = self
            .size
            .ok_or_else(|| ComponentError::invalid("size is required"))?;
        if ![d, w, l].iter().all(|v| v.is_finite() && *v > 0.0) {
            return Err(ComponentError::invalid(format!(
                "d_spacing and size must be finite and > 0, got d={d}, size=({w}, {l})"
            )));
        }
        let table_path = self
            .table_path
            .ok_or_else(|| ComponentError::invalid("reflectivity table is required"))?;
        Ok(CrystalReflector {
            name: self.name,
            d_spacing: d,
            half_width: w / 2.0,
            half_length: l / 2.0,
            table_path,
            reflectivity: None,
        })
    }
}

impl Component for CrystalReflector {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, ctx: &InitContext<'_>) -> Result<(), ComponentError> {
        let table = ctx.load_table(&self.table_path)?;
        if table.column_count() < 3 {
            return Err(ComponentError::invalid(format!(
                "reflectivity table '{}' needs 3 columns (E, R, width), has {}",
                table.name(),
                table.column_count()
            )));
        }
        let debye_waller = table.header_field("debye_waller").unwrap_or(0.0);
        if debye_waller < 0.0 {
            return Err(ComponentError::invalid(format!(
                "debye_waller must be >= 0, got {debye_waller}"
            )));
        }
        tracing::debug!(
            instance = %self.name,
            d_spacing = self.d_spacing,
            debye_waller,
            "reflectivity table loaded"
        );
        self.reflectivity = Some(Reflectivity {
            table,
            debye_waller,
        });
        Ok(())
    }

    fn trace(&self, event: &mut Event, ctx: &mut TraceContext<'_>) -> TraceStatus {
        let Some(dir) = event.direction() else {
            return TraceStatus::Absorbed;
        };
        let Some(t) = intersect_plane(&event.position, &dir, &Plane::y(0.0)).first_positive()
        else {
            return TraceStatus::Restored;
        };
        let hit = event.position + dir * t;
        if hit.x.abs() > self.half_width || hit.z.abs() > self.half_length {
            return TraceStatus::Restored;
        }
        if !event.propagate_by_distance(t) {
            return TraceStatus::Absorbed;
        }
        // Surface normal facing the incoming event.
        let normal = if dir.y < 0.0 { Vec3::y() } else { -Vec3::y() };
        let alpha = dir.dot(&normal).abs().min(1.0).asin();

        let (Some(lambda), energy) = (event.wavelength(), event.energy()) else {
            return TraceStatus::Absorbed;
        };
        let Some(r) = self.reflectivity(energy, lambda, alpha) else {
            return TraceStatus::Absorbed;
        };

        let Some(axis) = Unit::try_new(dir.cross(&normal), 1e-12) else {
            // Normal incidence: straight back.
            event.motion = -event.motion;
            return if event.scale_weight(r.sigma) {
                ctx.mark_interaction();
                TraceStatus::Scattered
            } else {
                TraceStatus::Absorbed
            };
        };
        let rotation = Rotation3::from_axis_angle(&axis, 2.0 * alpha);

        let sigma_hat = axis.into_inner();
        let pol = event.polarization;
        let pol_norm2 = pol.norm_squared();
        let factor = if pol_norm2 > 0.0 {
            let sigma_amp = pol.dot(&sigma_hat);
            let pi_part = pol - sigma_hat * sigma_amp;
            let factor =
                (sigma_amp * sigma_amp * r.sigma + pi_part.norm_squared() * r.pi) / pol_norm2;
            if factor > 0.0 {
                let reflected = sigma_hat * (sigma_amp * r.sigma.sqrt()) + pi_part * r.pi.sqrt();
                event.polarization = rotation * reflected / factor.sqrt();
            }
            factor
        } else {
            0.5 * (r.sigma + r.pi)
        };
        if factor <= 0.0 || !event.scale_weight(factor) {
            return TraceStatus::Absorbed;
        }
        event.motion = rotation * event.motion;
        ctx.mark_interaction();
        TraceStatus::Scattered
    }

    fn teardown(&mut self) {
        self.reflectivity = None;
    }
}
