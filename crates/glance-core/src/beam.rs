//! Incident beam description.

use glance_sample::kvec::Kvec;

/// A monochromatic incident beam at grazing incidence.
#[derive(Debug, Clone, PartialEq)]
pub struct Beam {
    /// Wavelength λ (nm).
    wavelength: f64,
    /// Grazing angle of incidence α_i (rad), measured from the surface.
    alpha: f64,
    /// In-plane azimuth φ_i (rad).
    phi: f64,
    /// Source intensity scale applied to the whole map.
    intensity: f64,
}

impl Beam {
    pub fn new(wavelength: f64, alpha: f64, phi: f64) -> Self {
        Self {
            wavelength,
            alpha,
            phi,
            intensity: 1.0,
        }
    }

    pub fn with_intensity(mut self, intensity: f64) -> Self {
        self.intensity = intensity;
        self
    }

    pub fn wavelength(&self) -> f64 {
        self.wavelength
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    pub fn phi(&self) -> f64 {
        self.phi
    }

    pub fn intensity(&self) -> f64 {
        self.intensity
    }

    /// Vacuum wavenumber k = 2π/λ (nm⁻¹).
    pub fn wavenumber(&self) -> f64 {
        2.0 * std::f64::consts::PI / self.wavelength
    }

    /// The incident wavevector; the beam travels downward, so the
    /// z-component is negative.
    pub fn incident_wavevector(&self) -> Kvec {
        let k = self.wavenumber();
        [
            k * self.alpha.cos() * self.phi.cos(),
            k * self.alpha.cos() * self.phi.sin(),
            -k * self.alpha.sin(),
        ]
    }

    /// Magnitude of the vacuum z-component, k·sin(α_i).
    pub fn kz(&self) -> f64 {
        self.wavenumber() * self.alpha.sin()
    }
}
