//! Particle form factors.
//!
//! A form factor is the complex scattering amplitude of a single particle
//! shape at a given momentum transfer. All shapes implement the
//! [`FormFactor`] capability; hard particles are separable in q and only
//! implement [`FormFactor::evaluate_for_q`], while composite variants (the
//! meso-crystal) override the two-wavevector entry point because their
//! amplitude is a lattice convolution, not a function of a single q.
//!
//! Every shape defines the exact analytic limit at q → 0, equal to the
//! particle volume with zero imaginary part. This is a normalisation
//! requirement: downstream intensity weighting relies on it.

mod crystal;
mod shapes;

pub use crystal::CrystalFormFactor;
pub use shapes::{Cuboid, Cylinder, FullSphere, FullSpheroid};

use num_complex::Complex64;

use crate::kvec::{self, Cvec, Kvec};
use crate::parameters::{Parameter, ParameterNode};

/// The form-factor capability: a complex amplitude per momentum transfer.
///
/// Implementors hold only immutable geometry; evaluation is pure, so one
/// shape instance can be shared by all workers of a parallel run.
pub trait FormFactor: ParameterNode + Send + Sync {
    /// Scattering amplitude at momentum transfer `q` (nm³).
    fn evaluate_for_q(&self, q: &Cvec) -> Complex64;

    /// Amplitude for an incident/exit wavevector pair.
    ///
    /// The default forwards to [`evaluate_for_q`](Self::evaluate_for_q)
    /// with q = k_i − k_f; composite shapes override this.
    fn evaluate(&self, k_i: &Cvec, k_f: &Cvec) -> Complex64 {
        self.evaluate_for_q(&kvec::csub(k_i, k_f))
    }

    /// Geometric volume of the particle (nm³), the q → 0 amplitude.
    fn volume(&self) -> f64;

    /// Clone into a new boxed shape with the same geometry.
    fn clone_box(&self) -> Box<dyn FormFactor>;
}

impl Clone for Box<dyn FormFactor> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}

/// Decorator that shifts a shape to `position`, multiplying the amplitude
/// by the translation phase $e^{i q \cdot r}$.
///
/// The phase is applied per evaluation, so the four DWBA paths (which carry
/// different z-components of q) each pick up their own correct phase.
#[derive(Clone)]
pub struct Translated {
    inner: Box<dyn FormFactor>,
    position: Kvec,
}

impl Translated {
    pub fn new(inner: Box<dyn FormFactor>, position: Kvec) -> Self {
        Self { inner, position }
    }

    fn phase(&self, q: &Cvec) -> Complex64 {
        (Complex64::new(0.0, 1.0) * kvec::cdot_real(q, &self.position)).exp()
    }
}

impl ParameterNode for Translated {
    fn node_name(&self) -> &str {
        "translated"
    }

    // Position parameters stay registered on the owning particle; the
    // decorator is a per-run evaluation artifact.
    fn parameters(&mut self) -> Vec<Parameter<'_>> {
        Vec::new()
    }

    fn children(&mut self) -> Vec<&mut dyn ParameterNode> {
        vec![self.inner.as_mut()]
    }
}

impl FormFactor for Translated {
    fn evaluate_for_q(&self, q: &Cvec) -> Complex64 {
        self.phase(q) * self.inner.evaluate_for_q(q)
    }

    fn evaluate(&self, k_i: &Cvec, k_f: &Cvec) -> Complex64 {
        self.phase(&kvec::csub(k_i, k_f)) * self.inner.evaluate(k_i, k_f)
    }

    fn volume(&self) -> f64 {
        self.inner.volume()
    }

    fn clone_box(&self) -> Box<dyn FormFactor> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kvec::to_complex;
    use approx::assert_relative_eq;

    #[test]
    fn translation_phase_is_unity_at_origin_offset() {
        let sphere = FullSphere::new(5.0).unwrap();
        let plain = sphere.evaluate_for_q(&to_complex(&[0.1, 0.0, 0.2]));
        let translated = Translated::new(Box::new(sphere), [0.0, 0.0, 0.0]);
        let shifted = translated.evaluate_for_q(&to_complex(&[0.1, 0.0, 0.2]));
        assert_relative_eq!(plain.re, shifted.re, epsilon = 1e-12);
        assert_relative_eq!(plain.im, shifted.im, epsilon = 1e-12);
    }

    #[test]
    fn translation_preserves_magnitude() {
        let sphere = FullSphere::new(5.0).unwrap();
        let q = to_complex(&[0.1, 0.05, 0.2]);
        let plain = sphere.evaluate_for_q(&q).norm();
        let translated = Translated::new(Box::new(sphere), [12.0, -3.0, 4.5]);
        assert_relative_eq!(translated.evaluate_for_q(&q).norm(), plain, epsilon = 1e-10);
    }
}
