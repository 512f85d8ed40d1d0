//! Point or rectangular source.
//!
//! Emits one particle per event from its local z = 0 plane. Directions are
//! either isotropic or focused onto a [`TargetRect`] by solid-angle
//! importance sampling, in which case the weight carries the sampled
//! solid angle:
//!
//! ```text
//! weight = flux · dΩ / 4π
//! ```
//!
//! Isotropic emission has `dΩ = 4π`, so its weight is `flux`.
//!
//! Constructed via the builder pattern: [`PointSource::builder`].

use std::f64::consts::PI;

use beamline_core::{Event, ParticleKind, TraceStatus, Vec3};
use beamline_node::{Component, ComponentError, TraceContext};
use beamline_random::{sample_target_solid_angle, EventRng, TargetRect};

/// Energy distribution of a [`PointSource`]: keV for photons, meV for
/// neutrons.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum EnergySpectrum {
    /// Uniform on `[min, max]`.
    Uniform {
        /// Lower bound.
        min: f64,
        /// Upper bound.
        max: f64,
    },
    /// Gaussian. Draws at or below zero are absorbed.
    Gaussian {
        /// Mean energy.
        mean: f64,
        /// Standard deviation.
        sigma: f64,
    },
}

impl EnergySpectrum {
    fn sample(&self, rng: &mut EventRng) -> f64 {
        match *self {
            Self::Uniform { min, max } => rng.uniform_range(min, max),
            Self::Gaussian { mean, sigma } => rng.gaussian(mean, sigma),
        }
    }

    fn validate(&self) -> Result<(), ComponentError> {
        match *self {
            Self::Uniform { min, max } => {
                if !(min.is_finite() && max.is_finite() && min > 0.0 && max >= min) {
                    return Err(ComponentError::invalid(format!(
                        "uniform energy range must satisfy 0 < min <= max, got [{min}, {max}]"
                    )));
                }
            }
            Self::Gaussian { mean, sigma } => {
                if !(mean.is_finite() && mean > 0.0 && sigma.is_finite() && sigma >= 0.0) {
                    return Err(ComponentError::invalid(format!(
                        "gaussian energy needs mean > 0 and sigma >= 0, got ({mean}, {sigma})"
                    )));
                }
            }
        }
        Ok(())
    }
}

/// A source of photons or neutrons.
#[derive(Debug)]
pub struct PointSource {
    name: String,
    kind: ParticleKind,
    spectrum: EnergySpectrum,
    half_width: f64,
    half_height: f64,
    target: Option<TargetRect>,
    flux: f64,
    unit_weight: bool,
}

/// Builder for [`PointSource`].
///
/// Required: `energy` (or `gaussian_energy`).
#[derive(Debug)]
pub struct PointSourceBuilder {
    name: String,
    kind: ParticleKind,
    spectrum: Option<EnergySpectrum>,
    width: f64,
    height: f64,
    target: Option<TargetRect>,
    flux: f64,
    unit_weight: bool,
}

impl PointSource {
    /// Start configuring a source named `name`.
    pub fn builder(name: impl Into<String>) -> PointSourceBuilder {
        PointSourceBuilder {
            name: name.into(),
            kind: ParticleKind::Photon,
            spectrum: None,
            width: 0.0,
            height: 0.0,
            target: None,
            flux: 1.0,
            unit_weight: false,
        }
    }

    /// The focusing target, if any.
    pub fn target(&self) -> Option<&TargetRect> {
        self.target.as_ref()
    }

    fn emission_point(&self, rng: &mut EventRng) -> Vec3 {
        let x = if self.half_width > 0.0 {
            self.half_width * rng.uniform_pm1()
        } else {
            0.0
        };
        let y = if self.half_height > 0.0 {
            self.half_height * rng.uniform_pm1()
        } else {
            0.0
        };
        Vec3::new(x, y, 0.0)
    }
}

impl PointSourceBuilder {
    /// Emit photons (the default).
    pub fn photons(mut self) -> Self {
        self.kind = ParticleKind::Photon;
        self
    }

    /// Emit neutrons.
    pub fn neutrons(mut self) -> Self {
        self.kind = ParticleKind::Neutron;
        self
    }

    /// Uniform energy on `[min, max]`.
    pub fn energy(mut self, min: f64, max: f64) -> Self {
        self.spectrum = Some(EnergySpectrum::Uniform { min, max });
        self
    }

    /// Gaussian energy.
    pub fn gaussian_energy(mut self, mean: f64, sigma: f64) -> Self {
        self.spectrum = Some(EnergySpectrum::Gaussian { mean, sigma });
        self
    }

    /// Emit from a `width` × `height` rectangle instead of a point.
    pub fn emitter_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    /// Focus every event onto `target` (local frame of the source).
    pub fn focus(mut self, target: TargetRect) -> Self {
        self.target = Some(target);
        self
    }

    /// Total emitted flux into 4π (default 1).
    pub fn flux(mut self, flux: f64) -> Self {
        self.flux = flux;
        self
    }

    /// Give every event weight 1 regardless of focusing.
    pub fn unit_weight(mut self) -> Self {
        self.unit_weight = true;
        self
    }

    /// Build the source.
    ///
    /// # Errors
    ///
    /// Returns [`ComponentError::InvalidConfig`] if the name is empty, the
    /// spectrum is missing or nonsensical, the emitter size is negative,
    /// or the flux is not finite and positive.
    pub fn build(self) -> Result<PointSource, ComponentError> {
        if self.name.is_empty() {
            return Err(ComponentError::invalid("name is required"));
        }
        let spectrum = self
            .spectrum
            .ok_or_else(|| ComponentError::invalid("energy spectrum is required"))?;
        spectrum.validate()?;
        for (what, v) in [("width", self.width), ("height", self.height)] {
            if !v.is_finite() || v < 0.0 {
                return Err(ComponentError::invalid(format!(
                    "emitter {what} must be finite and >= 0, got {v}"
                )));
            }
        }
        if !self.flux.is_finite() || self.flux <= 0.0 {
            return Err(ComponentError::invalid(format!(
                "flux must be finite and > 0, got {}",
                self.flux
            )));
        }
        Ok(PointSource {
            name: self.name,
            kind: self.kind,
            spectrum,
            half_width: self.width / 2.0,
            half_height: self.height / 2.0,
            target: self.target,
            flux: self.flux,
            unit_weight: self.unit_weight,
        })
    }
}

impl Component for PointSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn trace(&self, event: &mut Event, ctx: &mut TraceContext<'_>) -> TraceStatus {
        let rng = ctx.rng();
        let origin = self.emission_point(rng);
        let (direction, solid_angle) = match &self.target {
            Some(target) => match sample_target_solid_angle(rng, &origin, target) {
                Some(s) => (s.direction, s.solid_angle),
                None => return TraceStatus::Absorbed,
            },
            None => (rng.isotropic_direction(), 4.0 * PI),
        };
        let energy = self.spectrum.sample(rng);
        let Some(emitted) = Event::with_energy(self.kind, origin, direction, energy) else {
            return TraceStatus::Absorbed;
        };
        *event = emitted;
        if !self.unit_weight {
            event.weight = self.flux * solid_angle / (4.0 * PI);
        }
        TraceStatus::PassThrough
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use beamline_random::{EventStreams, RunSeed};

    fn emit(source: &PointSource, index: u64) -> (Event, TraceStatus) {
        let mut rng = EventStreams::new(RunSeed(9)).for_event(index);
        let mut ctx = TraceContext::new(&mut rng);
        let mut event = Event::blank(ParticleKind::Photon);
        let status = source.trace(&mut event, &mut ctx);
        (event, status)
    }

    #[test]
    fn builder_rejects_bad_config() {
        assert!(PointSource::builder("s").build().is_err());
        assert!(PointSource::builder("").energy(1.0, 2.0).build().is_err());
        assert!(PointSource::builder("s").energy(2.0, 1.0).build().is_err());
        assert!(PointSource::builder("s").energy(0.0, 1.0).build().is_err());
        assert!(PointSource::builder("s")
            .gaussian_energy(8.0, -1.0)
            .build()
            .is_err());
        assert!(PointSource::builder("s")
            .energy(1.0, 2.0)
            .flux(0.0)
            .build()
            .is_err());
        assert!(PointSource::builder("s")
            .energy(1.0, 2.0)
            .emitter_size(-1.0, 1.0)
            .build()
            .is_err());
    }

    #[test]
    fn isotropic_photons_in_energy_range() {
        let source = PointSource::builder("src").energy(8.0, 9.0).build().unwrap();
        for i in 0..200 {
            let (e, status) = emit(&source, i);
            assert_eq!(status, TraceStatus::PassThrough);
            assert_eq!(e.kind, ParticleKind::Photon);
            assert_eq!(e.position, Vec3::zeros());
            let energy = e.energy();
            assert!((8.0 - 1e-9..=9.0 + 1e-9).contains(&energy), "{energy}");
            assert!((e.weight - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn focused_neutrons_hit_target_with_solid_angle_weight() {
        let target = TargetRect::facing(2.0, 0.1, 0.1).unwrap();
        let source = PointSource::builder("src")
            .neutrons()
            .energy(5.0, 5.0)
            .focus(target)
            .flux(1e6)
            .build()
            .unwrap();
        for i in 0..200 {
            let (mut e, _) = emit(&source, i);
            assert_eq!(e.kind, ParticleKind::Neutron);
            assert!((e.energy() - 5.0).abs() < 1e-9);
            // Roughly A / r² / 4π · flux.
            let expected = 1e6 * 0.01 / 4.0 / (4.0 * PI);
            assert!((e.weight / expected - 1.0).abs() < 0.01, "{}", e.weight);
            assert!(e.propagate_to_plane(2.0));
            assert!(e.position.x.abs() <= 0.05 + 1e-12);
            assert!(e.position.y.abs() <= 0.05 + 1e-12);
        }
    }

    #[test]
    fn unit_weight_ignores_focusing() {
        let source = PointSource::builder("src")
            .energy(10.0, 12.0)
            .focus(TargetRect::facing(1.0, 0.01, 0.01).unwrap())
            .unit_weight()
            .build()
            .unwrap();
        let (e, _) = emit(&source, 3);
        assert_eq!(e.weight, 1.0);
    }

    #[test]
    fn gaussian_energy_below_zero_absorbs() {
        let source = PointSource::builder("src")
            .gaussian_energy(1e-6, 1.0)
            .build()
            .unwrap();
        let absorbed = (0..200)
            .filter(|&i| emit(&source, i).1 == TraceStatus::Absorbed)
            .count();
        assert!(absorbed > 50, "{absorbed}");
    }

    #[test]
    fn rectangular_emitter_spreads_origin() {
        let source = PointSource::builder("src")
            .energy(8.0, 8.0)
            .emitter_size(0.002, 0.001)
            .build()
            .unwrap();
        for i in 0..100 {
            let (e, _) = emit(&source, i);
            assert!(e.position.x.abs() <= 0.001);
            assert!(e.position.y.abs() <= 0.0005);
            assert_eq!(e.position.z, 0.0);
        }
    }
}
