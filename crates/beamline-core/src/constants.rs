//! Physical constants and unit conversions.
//!
//! Photon wavevectors are in Å⁻¹ and photon energies in keV. Neutron
//! velocities are in m/s and neutron energies in meV. Positions are in
//! metres and times in seconds for both particle kinds.

/// Speed of light in vacuum, m/s.
pub const SPEED_OF_LIGHT: f64 = 299_792_458.0;

/// ħc in keV·Å. Photon energy `E[keV] = HBAR_C * k[Å⁻¹]`.
pub const HBAR_C: f64 = 1.973_269_804;

/// Neutron velocity to wavenumber: `k[Å⁻¹] = V2K * v[m/s]`.
pub const V2K: f64 = 1.588_253_61e-3;

/// Neutron wavenumber to velocity: `v[m/s] = K2V * k[Å⁻¹]`.
pub const K2V: f64 = 629.622_368;

/// Neutron velocity squared to energy: `E[meV] = VS2E * v²`.
pub const VS2E: f64 = 5.227_037_25e-6;

/// Neutron energy to velocity: `v[m/s] = SE2V * sqrt(E[meV])`.
pub const SE2V: f64 = 437.393_377;

/// Photon wavenumber (Å⁻¹) for an energy in keV.
#[inline]
pub fn photon_k_from_energy(energy_kev: f64) -> f64 {
    energy_kev / HBAR_C
}

/// Photon energy (keV) for a wavenumber in Å⁻¹.
#[inline]
pub fn photon_energy_from_k(k: f64) -> f64 {
    k * HBAR_C
}

/// Neutron speed (m/s) for an energy in meV. Negative energies map to zero.
#[inline]
pub fn neutron_speed_from_energy(energy_mev: f64) -> f64 {
    SE2V * energy_mev.max(0.0).sqrt()
}

/// Neutron energy (meV) for a speed in m/s.
#[inline]
pub fn neutron_energy_from_speed(speed: f64) -> f64 {
    VS2E * speed * speed
}
