//! Meso-crystal composite form factor.
//!
//! A meso-crystal is a finite particle (the envelope) filled with a
//! periodic arrangement of basis particles. Its amplitude is the
//! convolution of the basis amplitude with the lattice delta-train,
//! windowed by the envelope: a sum over reciprocal-lattice vectors g near
//! the momentum transfer of
//! $F_\text{basis}(g)\, F_\text{envelope}(q - g)$, divided by the unit-cell
//! volume. The delta train carries a $(2\pi)^3/V$ weight whose $(2\pi)^3$
//! is cancelled by the Fourier convolution, leaving only the $1/V$.

use num_complex::Complex64;

use crate::kvec::{self, Cvec};
use crate::lattice::Lattice;
use crate::parameters::{Parameter, ParameterNode};

use super::FormFactor;

/// Cutoff radius multiplier for the reciprocal-vector search, in units of
/// the largest reciprocal spacing π/min|aᵢ|. Covers the Brillouin zones
/// adjacent to the query point.
const RADIUS_FACTOR: f64 = 2.1;

/// Form factor of a crystal of basis particles inside an envelope shape.
///
/// Owns its sub-form-factors exclusively; cloning deep-copies them.
#[derive(Clone)]
pub struct CrystalFormFactor {
    lattice: Lattice,
    basis: Box<dyn FormFactor>,
    envelope: Box<dyn FormFactor>,
    max_rec_length: f64,
}

impl CrystalFormFactor {
    pub fn new(lattice: Lattice, basis: Box<dyn FormFactor>, envelope: Box<dyn FormFactor>) -> Self {
        let (a1, a2, a3) = lattice.basis();
        let pi = std::f64::consts::PI;
        let max_rec_length = (pi / kvec::norm(a1))
            .max(pi / kvec::norm(a2))
            .max(pi / kvec::norm(a3));
        Self {
            lattice,
            basis,
            envelope,
            max_rec_length,
        }
    }

    pub fn lattice(&self) -> &Lattice {
        &self.lattice
    }
}

impl ParameterNode for CrystalFormFactor {
    fn node_name(&self) -> &str {
        "crystal"
    }

    fn parameters(&mut self) -> Vec<Parameter<'_>> {
        Vec::new()
    }

    fn children(&mut self) -> Vec<&mut dyn ParameterNode> {
        vec![self.basis.as_mut(), self.envelope.as_mut()]
    }
}

impl FormFactor for CrystalFormFactor {
    /// # Panics
    ///
    /// Always. Single-point evaluation bypasses the lattice convolution
    /// and would return a physically meaningless amplitude; calling this
    /// is a programming error in the caller.
    fn evaluate_for_q(&self, _q: &Cvec) -> Complex64 {
        panic!("CrystalFormFactor::evaluate_for_q bypasses the required lattice convolution; use evaluate()");
    }

    fn evaluate(&self, k_i: &Cvec, k_f: &Cvec) -> Complex64 {
        let q = kvec::csub(k_i, k_f);
        let q_real = kvec::real_part(&q);
        let radius = RADIUS_FACTOR * self.max_rec_length;

        let mut sum = Complex64::new(0.0, 0.0);
        for g in self.lattice.reciprocal_vectors_within_radius(&q_real, radius) {
            let basis_amplitude = self.basis.evaluate_for_q(&kvec::to_complex(&g));
            let envelope_argument = [q[0] - g[0], q[1] - g[1], q[2] - g[2]];
            let envelope_amplitude = self.envelope.evaluate_for_q(&envelope_argument);
            sum += basis_amplitude * envelope_amplitude;
        }
        sum / self.lattice.unit_cell_volume()
    }

    fn volume(&self) -> f64 {
        self.envelope.volume()
    }

    fn clone_box(&self) -> Box<dyn FormFactor> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formfactor::{Cuboid, FullSphere};
    use crate::kvec::to_complex;

    fn make_crystal() -> CrystalFormFactor {
        let lattice = Lattice::cubic(10.0).unwrap();
        let basis = Box::new(FullSphere::new(2.0).unwrap());
        let envelope = Box::new(Cuboid::new(50.0, 50.0, 30.0).unwrap());
        CrystalFormFactor::new(lattice, basis, envelope)
    }

    #[test]
    #[should_panic(expected = "lattice convolution")]
    fn single_point_entry_is_rejected() {
        let crystal = make_crystal();
        let _ = crystal.evaluate_for_q(&to_complex(&[0.1, 0.0, 0.0]));
    }

    #[test]
    fn amplitude_peaks_at_reciprocal_lattice_vector() {
        let crystal = make_crystal();
        let k = 1.0;
        // q at the (1 0 0) reciprocal vector of the a = 10 lattice
        let g100 = 2.0 * std::f64::consts::PI / 10.0;
        let ki_on = to_complex(&[g100, 0.0, k]);
        let ki_off = to_complex(&[g100 * 1.5, 0.0, k]);
        let kf = to_complex(&[0.0, 0.0, k]);

        let on_peak = crystal.evaluate(&ki_on, &kf).norm();
        let off_peak = crystal.evaluate(&ki_off, &kf).norm();
        assert!(
            on_peak > 3.0 * off_peak,
            "on-peak amplitude {on_peak:.3e} should dominate off-peak {off_peak:.3e}"
        );
    }

    #[test]
    fn volume_is_envelope_volume() {
        let crystal = make_crystal();
        assert_eq!(crystal.volume(), 50.0 * 50.0 * 30.0);
    }
}
