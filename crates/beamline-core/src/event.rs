//! The per-particle [`Event`] record and its propagation directives.
//!
//! Propagation is exact up to floating-point rounding: in particular
//! [`Event::propagate_to_plane`] assigns the target z coordinate instead of
//! accumulating it, so downstream geometry sees the event lying on the
//! plane. Every directive refuses to produce a non-finite state; on a
//! degenerate input it leaves the event untouched and returns `false`, and
//! the caller drops the event.

use crate::constants::{
    neutron_energy_from_speed, neutron_speed_from_energy, photon_energy_from_k,
    photon_k_from_energy, SPEED_OF_LIGHT, V2K,
};
use crate::restore::{EventField, RestoreSet};

/// Three-vector used for positions, wavevectors, velocities and polarizations.
pub type Vec3 = nalgebra::Vector3<f64>;

/// Which particle an event carries. Decides the meaning of [`Event::motion`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParticleKind {
    /// X-ray photon. `motion` is the wavevector in Å⁻¹.
    Photon,
    /// Neutron. `motion` is the velocity in m/s.
    Neutron,
}

/// State of one simulated particle.
///
/// Owned by the pipeline for the duration of one event and never shared
/// across concurrently processed events. `Copy`, so snapshots are free.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Event {
    /// Particle kind.
    pub kind: ParticleKind,
    /// Position in metres.
    pub position: Vec3,
    /// Wavevector (photons, Å⁻¹) or velocity (neutrons, m/s).
    pub motion: Vec3,
    /// Time of flight in seconds.
    pub time: f64,
    /// Polarization vector. Zero means unpolarized.
    pub polarization: Vec3,
    /// Statistical weight. Non-negative and finite.
    pub weight: f64,
}

impl Event {
    /// A unit-weight photon at `position` with wavevector `k`.
    pub fn photon(position: Vec3, k: Vec3) -> Self {
        Self {
            kind: ParticleKind::Photon,
            position,
            motion: k,
            time: 0.0,
            polarization: Vec3::zeros(),
            weight: 1.0,
        }
    }

    /// A unit-weight neutron at `position` with velocity `v`.
    pub fn neutron(position: Vec3, v: Vec3) -> Self {
        Self {
            kind: ParticleKind::Neutron,
            position,
            motion: v,
            time: 0.0,
            polarization: Vec3::zeros(),
            weight: 1.0,
        }
    }

    /// A unit-weight event of `kind` travelling along `direction` with the
    /// given energy (keV for photons, meV for neutrons).
    ///
    /// Returns `None` if the direction has zero length or the energy is
    /// not finite and positive.
    pub fn with_energy(
        kind: ParticleKind,
        position: Vec3,
        direction: Vec3,
        energy: f64,
    ) -> Option<Self> {
        if !energy.is_finite() || energy <= 0.0 {
            return None;
        }
        let unit = direction.try_normalize(f64::EPSILON)?;
        let event = match kind {
            ParticleKind::Photon => Self::photon(position, unit * photon_k_from_energy(energy)),
            ParticleKind::Neutron => {
                Self::neutron(position, unit * neutron_speed_from_energy(energy))
            }
        };
        Some(event)
    }

    /// An event with every field zeroed except unit weight.
    ///
    /// Sources overwrite it; the run driver hands one to the first component.
    pub fn blank(kind: ParticleKind) -> Self {
        Self {
            kind,
            position: Vec3::zeros(),
            motion: Vec3::zeros(),
            time: 0.0,
            polarization: Vec3::zeros(),
            weight: 1.0,
        }
    }

    /// Travel speed in m/s.
    pub fn speed(&self) -> f64 {
        match self.kind {
            ParticleKind::Photon => SPEED_OF_LIGHT,
            ParticleKind::Neutron => self.motion.norm(),
        }
    }

    /// Unit direction of travel, or `None` if `motion` is zero or non-finite.
    pub fn direction(&self) -> Option<Vec3> {
        if !self.motion.iter().all(|c| c.is_finite()) {
            return None;
        }
        self.motion.try_normalize(0.0)
    }

    /// Wavenumber |k| in Å⁻¹, for either particle kind.
    pub fn wavenumber(&self) -> f64 {
        match self.kind {
            ParticleKind::Photon => self.motion.norm(),
            ParticleKind::Neutron => V2K * self.motion.norm(),
        }
    }

    /// Wavevector in Å⁻¹, for either particle kind.
    pub fn wavevector(&self) -> Vec3 {
        match self.kind {
            ParticleKind::Photon => self.motion,
            ParticleKind::Neutron => self.motion * V2K,
        }
    }

    /// Wavelength in Å, or `None` for a stationary event.
    pub fn wavelength(&self) -> Option<f64> {
        let k = self.wavenumber();
        if k > 0.0 && k.is_finite() {
            Some(2.0 * std::f64::consts::PI / k)
        } else {
            None
        }
    }

    /// Energy: keV for photons, meV for neutrons.
    pub fn energy(&self) -> f64 {
        match self.kind {
            ParticleKind::Photon => photon_energy_from_k(self.motion.norm()),
            ParticleKind::Neutron => neutron_energy_from_speed(self.motion.norm()),
        }
    }

    /// Whether every field is finite and the weight is non-negative.
    pub fn is_physical(&self) -> bool {
        let finite = |v: &Vec3| v.iter().all(|c| c.is_finite());
        finite(&self.position)
            && finite(&self.motion)
            && finite(&self.polarization)
            && self.time.is_finite()
            && self.weight.is_finite()
            && self.weight >= 0.0
    }

    /// Advance along the direction of travel until `position.z == z`.
    ///
    /// Returns `false` without touching the event if the z component of
    /// `motion` is zero, if reaching the plane would require travelling
    /// backwards, or if the result would be non-finite.
    pub fn propagate_to_plane(&mut self, z: f64) -> bool {
        let mz = self.motion.z;
        if mz == 0.0 || !mz.is_finite() || !z.is_finite() {
            return false;
        }
        // Fraction of the motion vector that reaches the plane.
        let scale = (z - self.position.z) / mz;
        if !scale.is_finite() || scale < 0.0 {
            return false;
        }
        let speed = self.speed();
        if speed <= 0.0 {
            return false;
        }
        let mut position = self.position + self.motion * scale;
        position.z = z;
        let dt = scale * self.motion.norm() / speed;
        let time = self.time + dt;
        if !position.iter().all(|c| c.is_finite()) || !time.is_finite() {
            return false;
        }
        self.position = position;
        self.time = time;
        true
    }

    /// Advance `distance` metres along the direction of travel.
    ///
    /// Negative distances move backwards. Returns `false` without touching
    /// the event if the direction or speed is degenerate.
    pub fn propagate_by_distance(&mut self, distance: f64) -> bool {
        let Some(dir) = self.direction() else {
            return false;
        };
        let speed = self.speed();
        if !distance.is_finite() || speed <= 0.0 || !speed.is_finite() {
            return false;
        }
        let position = self.position + dir * distance;
        let time = self.time + distance / speed;
        if !position.iter().all(|c| c.is_finite()) || !time.is_finite() {
            return false;
        }
        self.position = position;
        self.time = time;
        true
    }

    /// Advance by `dt` seconds of flight.
    ///
    /// Returns `false` without touching the event if the direction or
    /// speed is degenerate.
    pub fn propagate_by_time(&mut self, dt: f64) -> bool {
        let Some(dir) = self.direction() else {
            return false;
        };
        let speed = self.speed();
        if !dt.is_finite() || !speed.is_finite() {
            return false;
        }
        let position = self.position + dir * (speed * dt);
        let time = self.time + dt;
        if !position.iter().all(|c| c.is_finite()) || !time.is_finite() {
            return false;
        }
        self.position = position;
        self.time = time;
        true
    }

    /// Copy the fields named by `fields` from `snapshot` into `self`.
    ///
    /// With [`RestoreSet::ALL`] the result equals `snapshot` exactly.
    pub fn restore_from(&mut self, snapshot: &Event, fields: RestoreSet) {
        for field in fields.iter() {
            match field {
                EventField::Position => self.position = snapshot.position,
                EventField::Motion => {
                    self.kind = snapshot.kind;
                    self.motion = snapshot.motion;
                }
                EventField::Time => self.time = snapshot.time,
                EventField::Polarization => self.polarization = snapshot.polarization,
                EventField::Weight => self.weight = snapshot.weight,
            }
        }
    }

    /// Multiply the weight by `factor`.
    ///
    /// Returns `false` without touching the event if the product would be
    /// negative or non-finite.
    pub fn scale_weight(&mut self, factor: f64) -> bool {
        let weight = self.weight * factor;
        if !weight.is_finite() || weight < 0.0 {
            return false;
        }
        self.weight = weight;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn photon_along(k: Vec3) -> Event {
        Event::photon(Vec3::new(0.1, -0.2, 0.0), k)
    }

    #[test]
    fn propagate_to_plane_lands_exactly() {
        let mut e = photon_along(Vec3::new(0.3, 0.1, 2.0));
        assert!(e.propagate_to_plane(1.7));
        assert_eq!(e.position.z, 1.7);
        // x advanced by kx/kz * dz.
        assert!((e.position.x - (0.1 + 0.3 / 2.0 * 1.7)).abs() < 1e-15);
        let path = (0.3f64.powi(2) + 0.1f64.powi(2) + 4.0).sqrt() / 2.0 * 1.7;
        assert!((e.time - path / SPEED_OF_LIGHT).abs() < 1e-20);
    }

    #[test]
    fn propagate_to_plane_neutron_time_is_dz_over_vz() {
        let mut e = Event::neutron(Vec3::zeros(), Vec3::new(100.0, 0.0, 2000.0));
        assert!(e.propagate_to_plane(10.0));
        assert_eq!(e.position.z, 10.0);
        assert!((e.time - 10.0 / 2000.0).abs() < 1e-15);
        assert!((e.position.x - 0.5).abs() < 1e-12);
    }

    #[test]
    fn propagate_to_plane_rejects_parallel_motion() {
        let mut e = photon_along(Vec3::new(1.0, 0.0, 0.0));
        let before = e;
        assert!(!e.propagate_to_plane(1.0));
        assert_eq!(e, before);
    }

    #[test]
    fn propagate_to_plane_rejects_backwards() {
        let mut e = photon_along(Vec3::new(0.0, 0.0, 1.0));
        e.position.z = 2.0;
        let before = e;
        assert!(!e.propagate_to_plane(1.0));
        assert_eq!(e, before);
    }

    #[test]
    fn propagate_by_distance_and_time_agree() {
        let mut a = Event::neutron(Vec3::zeros(), Vec3::new(0.0, 300.0, 400.0));
        let mut b = a;
        assert!(a.propagate_by_distance(5.0));
        assert!(b.propagate_by_time(0.01));
        assert!((a.position - b.position).norm() < 1e-12);
        assert!((a.time - b.time).abs() < 1e-15);
        assert!((a.position - Vec3::new(0.0, 3.0, 4.0)).norm() < 1e-12);
    }

    #[test]
    fn stationary_event_cannot_move() {
        let mut e = Event::blank(ParticleKind::Neutron);
        assert!(!e.propagate_by_distance(1.0));
        assert!(!e.propagate_by_time(1.0));
        assert!(!e.propagate_to_plane(1.0));
        assert!(e.wavelength().is_none());
    }

    #[test]
    fn restore_all_is_field_complete() {
        let snapshot = Event {
            kind: ParticleKind::Photon,
            position: Vec3::new(1.0, 2.0, 3.0),
            motion: Vec3::new(0.0, 0.0, 4.0),
            time: 1e-9,
            polarization: Vec3::new(0.0, 1.0, 0.0),
            weight: 0.25,
        };
        let mut e = snapshot;
        e.position.x = -5.0;
        e.motion = Vec3::new(1.0, 1.0, 1.0);
        e.time = 7.0;
        e.polarization = Vec3::new(1.0, 0.0, 0.0);
        e.weight = 0.125;
        e.restore_from(&snapshot, RestoreSet::ALL);
        assert_eq!(e, snapshot);
    }

    #[test]
    fn partial_restore_keeps_omitted_field() {
        let snapshot = Event::photon(Vec3::zeros(), Vec3::new(0.0, 0.0, 1.0));
        let mut e = snapshot;
        e.polarization = Vec3::new(1.0, 0.0, 0.0);
        e.weight = 0.5;
        e.restore_from(&snapshot, RestoreSet::ALL.without(EventField::Polarization));
        assert_eq!(e.weight, 1.0);
        assert_eq!(e.polarization, Vec3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn with_energy_sets_wavenumber() {
        let e = Event::with_energy(
            ParticleKind::Photon,
            Vec3::zeros(),
            Vec3::new(0.0, 0.0, 3.0),
            12.0,
        )
        .unwrap();
        assert!((e.energy() - 12.0).abs() < 1e-12);
        assert!((e.direction().unwrap() - Vec3::z()).norm() < 1e-15);

        let n = Event::with_energy(ParticleKind::Neutron, Vec3::zeros(), Vec3::x(), 25.3).unwrap();
        assert!((n.energy() - 25.3).abs() < 1e-5);
        assert!((n.wavelength().unwrap() - 1.798).abs() < 1e-2);

        assert!(Event::with_energy(ParticleKind::Photon, Vec3::zeros(), Vec3::zeros(), 1.0)
            .is_none());
        assert!(Event::with_energy(ParticleKind::Photon, Vec3::zeros(), Vec3::z(), -1.0).is_none());
    }

    #[test]
    fn scale_weight_guards_non_finite() {
        let mut e = Event::blank(ParticleKind::Photon);
        assert!(e.scale_weight(0.5));
        assert_eq!(e.weight, 0.5);
        assert!(!e.scale_weight(f64::INFINITY));
        assert!(!e.scale_weight(f64::NAN));
        assert!(!e.scale_weight(-1.0));
        assert_eq!(e.weight, 0.5);
    }

    #[test]
    fn is_physical_rejects_nan() {
        let mut e = Event::blank(ParticleKind::Photon);
        assert!(e.is_physical());
        e.position.y = f64::NAN;
        assert!(!e.is_physical());
        let mut w = Event::blank(ParticleKind::Photon);
        w.weight = -0.1;
        assert!(!w.is_physical());
    }

    proptest! {
        #[test]
        fn plane_propagation_never_produces_non_finite(
            x in -10.0f64..10.0, y in -10.0f64..10.0,
            kx in -5.0f64..5.0, ky in -5.0f64..5.0, kz in -5.0f64..5.0,
            z in -100.0f64..100.0,
        ) {
            let mut e = Event::photon(Vec3::new(x, y, 0.0), Vec3::new(kx, ky, kz));
            if e.propagate_to_plane(z) {
                prop_assert_eq!(e.position.z, z);
                prop_assert!(e.is_physical());
                prop_assert!(e.time >= 0.0);
            } else {
                prop_assert_eq!(e.position, Vec3::new(x, y, 0.0));
            }
        }
    }
}
