//! Simulation elements: one detector sample point each.

use glance_sample::kvec::Kvec;

/// One detector sample point: the exit-angle pair of a bin center, the
/// derived exit wavevector, and a single intensity accumulator.
///
/// Elements are created at the start of a run, written exactly once by
/// exactly one worker, and reduced into the output grid at the end.
#[derive(Debug, Clone)]
pub struct SimulationElement {
    /// Exit grazing angle α_f (rad).
    pub alpha_f: f64,
    /// Exit azimuth φ_f (rad).
    pub phi_f: f64,
    /// Vacuum exit wavevector (points upward for α_f > 0).
    pub k_f: Kvec,
    /// Magnitude of the vacuum exit kz, k·sin(α_f); ≤ 0 below the horizon.
    pub kz_f: f64,
    /// The element's exclusive intensity accumulator.
    pub intensity: f64,
    /// Whether a worker finished this element (false after cancellation).
    pub completed: bool,
}

impl SimulationElement {
    pub fn new(alpha_f: f64, phi_f: f64, wavenumber: f64) -> Self {
        let k_f = [
            wavenumber * alpha_f.cos() * phi_f.cos(),
            wavenumber * alpha_f.cos() * phi_f.sin(),
            wavenumber * alpha_f.sin(),
        ];
        Self {
            alpha_f,
            phi_f,
            k_f,
            kz_f: wavenumber * alpha_f.sin(),
            intensity: 0.0,
            completed: false,
        }
    }
}
