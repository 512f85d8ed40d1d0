//! Attenuating slab of material.
//!
//! The slab is an axis-aligned box centred on the local origin, its
//! thickness along z. An event crossing it is moved to the exit face and
//! its weight multiplied by `exp(-μ(E) · L)`, where `L` is the path length
//! inside the box. μ comes from a table whose first column is energy (keV
//! for photons, meV for neutrons) and whose second column is either the
//! linear attenuation coefficient in 1/cm or the mass attenuation
//! coefficient in cm²/g, multiplied by the density (g/cm³) found in the
//! table header field `density` or set on the builder.
//!
//! Events that miss the box pass through untouched.

use std::path::PathBuf;

use beamline_core::{Event, TraceStatus};
use beamline_geom::{intersect_box, Cuboid};
use beamline_node::{Component, ComponentError, InitContext, TraceContext};
use beamline_table::Table;

/// How the second table column is read.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AttenuationColumn {
    /// Linear attenuation coefficient in 1/cm.
    Linear,
    /// Mass attenuation coefficient in cm²/g, scaled by density.
    Mass,
}

#[derive(Debug)]
struct Attenuation {
    table: Table,
    /// Multiplies the tabulated value to give μ in 1/cm.
    scale: f64,
}

/// A slab filter.
#[derive(Debug)]
pub struct Filter {
    name: String,
    slab: Cuboid,
    table_path: PathBuf,
    column: AttenuationColumn,
    density: Option<f64>,
    attenuation: Option<Attenuation>,
}

/// Builder for [`Filter`].
///
/// Required: `table`, `size`.
#[derive(Debug)]
pub struct FilterBuilder {
    name: String,
    size: Option<(f64, f64, f64)>,
    table_path: Option<PathBuf>,
    column: AttenuationColumn,
    density: Option<f64>,
}

impl Filter {
    /// Start configuring a filter named `name`.
    pub fn builder(name: impl Into<String>) -> FilterBuilder {
        FilterBuilder {
            name: name.into(),
            size: None,
            table_path: None,
            column: AttenuationColumn::Linear,
            density: None,
        }
    }

    /// Linear attenuation coefficient in 1/cm at `energy`, once
    /// initialized.
    pub fn mu(&self, energy: f64) -> Option<f64> {
        self.attenuation
            .as_ref()
            .map(|a| a.table.value_at(energy) * a.scale)
    }
}

impl FilterBuilder {
    /// Slab extents in metres: `width` (x), `height` (y), `thickness` (z).
    pub fn size(mut self, width: f64, height: f64, thickness: f64) -> Self {
        self.size = Some((width, height, thickness));
        self
    }

    /// Attenuation table, resolved against the run's data directory.
    pub fn table(mut self, path: impl Into<PathBuf>) -> Self {
        self.table_path = Some(path.into());
        self
    }

    /// Read the table as mass attenuation coefficients.
    pub fn mass_attenuation(mut self) -> Self {
        self.column = AttenuationColumn::Mass;
        self
    }

    /// Density in g/cm³, overriding the table header.
    pub fn density(mut self, density: f64) -> Self {
        self.density = Some(density);
        self
    }

    /// Build the filter. The table is loaded at initialize.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::InvalidConfig`] if the size or table is
    /// missing, an extent is not finite and positive, or the density is
    /// not finite and positive.
    pub fn build(self) -> Result<Filter, ComponentError> {
        let (w, h, t) = self
            .size
            .ok_or_else(|| ComponentError::invalid("size is required"))?;
        if ![w, h, t].iter().all(|v| v.is_finite() && *v > 0.0) {
            return Err(ComponentError::invalid(format!(
                "slab extents must be finite and > 0, got ({w}, {h}, {t})"
            )));
        }
        let table_path = self
            .table_path
            .ok_or_else(|| ComponentError::invalid("attenuation table is required"))?;
        if let Some(rho) = self.density {
            if !rho.is_finite() || rho <= 0.0 {
                return Err(ComponentError::invalid(format!(
                    "density must be finite and > 0, got {rho}"
                )));
            }
        }
        Ok(Filter {
            name: self.name,
            slab: Cuboid::new(w, h, t),
            table_path,
            column: self.column,
            density: self.density,
            attenuation: None,
        })
    }
}

impl Component for Filter {
    fn name(&self) -> &str {
        &self.name
    }

    fn initialize(&mut self, ctx: &InitContext<'_>) -> Result<(), ComponentError> {
        let table = ctx.load_table(&self.table_path)?;
        if let Some(column) = table.column(1) {
            if let Some(bad) = column.iter().find(|mu| **mu < 0.0) {
                return Err(ComponentError::invalid(format!(
                    "table '{}' has a negative attenuation coefficient {bad}",
                    table.name()
                )));
            }
        }
        let scale = match self.column {
            AttenuationColumn::Linear => 1.0,
            AttenuationColumn::Mass => match self.density.or_else(|| table.header_field("density")) {
                Some(rho) if rho.is_finite() && rho > 0.0 => rho,
                Some(rho) => {
                    return Err(ComponentError::invalid(format!(
                        "table '{}' has a non-positive density {rho}",
                        table.name()
                    )))
                }
                None => {
                    return Err(ComponentError::invalid(format!(
                        "table '{}' has no density header field",
                        table.name()
                    )))
                }
            },
        };
        tracing::debug!(
            instance = %self.name,
            rows = table.row_count(),
            scale,
            "attenuation table loaded"
        );
        self.attenuation = Some(Attenuation { table, scale });
        Ok(())
    }

    fn trace(&self, event: &mut Event, ctx: &mut TraceContext<'_>) -> TraceStatus {
        let Some(attenuation) = &self.attenuation else {
            return TraceStatus::Absorbed;
        };
        let Some(dir) = event.direction() else {
            return TraceStatus::Absorbed;
        };
        let Some((t_in, t_out)) = intersect_box(&event.position, &dir, &self.slab).entry_exit()
        else {
            return TraceStatus::PassThrough;
        };
        if t_out <= 0.0 {
            return TraceStatus::PassThrough;
        }
        let path_cm = (t_out - t_in.max(0.0)) * 100.0;
        let mu = attenuation.table.value_at(event.energy()) * attenuation.scale;
        if !event.propagate_by_distance(t_out) || !event.scale_weight((-mu * path_cm).exp()) {
            return TraceStatus::Absorbed;
        }
        ctx.mark_interaction();
        TraceStatus::Scattered
    }

    fn teardown(&mut self) {
        self.attenuation = None;
    }
}
