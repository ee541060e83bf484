//! Three-dimensional Bravais lattices and reciprocal-vector search.
//!
//! The reciprocal basis is computed from the real basis via the standard
//! volume-based inverse formula and kept alongside it; replacing the basis
//! recomputes the reciprocal vectors immediately, so the two can never be
//! observed out of sync. A degenerate basis (near-zero triple product) is
//! rejected at construction.

use crate::error::SampleError;
use crate::kvec::{self, Kvec};

const TWO_PI: f64 = 2.0 * std::f64::consts::PI;

/// A lattice with three real-space basis vectors (nm) and the derived
/// reciprocal basis (nm⁻¹).
#[derive(Debug, Clone, PartialEq)]
pub struct Lattice {
    a1: Kvec,
    a2: Kvec,
    a3: Kvec,
    b1: Kvec,
    b2: Kvec,
    b3: Kvec,
    volume: f64,
}

impl Lattice {
    /// Build a lattice from three basis vectors.
    ///
    /// Fails with [`SampleError::DegenerateBasis`] when the vectors are
    /// linearly dependent (zero or parallel), detected through a near-zero
    /// scalar triple product.
    pub fn new(a1: Kvec, a2: Kvec, a3: Kvec) -> Result<Self, SampleError> {
        let triple = kvec::triple_product(&a1, &a2, &a3);
        let scale = kvec::norm(&a1) * kvec::norm(&a2) * kvec::norm(&a3);
        if triple.abs() <= 1e-9 * scale.max(f64::MIN_POSITIVE) {
            return Err(SampleError::DegenerateBasis {
                triple_product: triple,
            });
        }
        let (b1, b2, b3) = reciprocal_basis(&a1, &a2, &a3, triple);
        Ok(Self {
            a1,
            a2,
            a3,
            b1,
            b2,
            b3,
            volume: triple.abs(),
        })
    }

    /// Simple cubic lattice with edge `a`.
    pub fn cubic(a: f64) -> Result<Self, SampleError> {
        Self::new([a, 0.0, 0.0], [0.0, a, 0.0], [0.0, 0.0, a])
    }

    /// Face-centered cubic lattice with conventional cell edge `a`.
    pub fn fcc(a: f64) -> Result<Self, SampleError> {
        let h = a / 2.0;
        Self::new([0.0, h, h], [h, 0.0, h], [h, h, 0.0])
    }

    /// Body-centered cubic lattice with conventional cell edge `a`.
    pub fn bcc(a: f64) -> Result<Self, SampleError> {
        let h = a / 2.0;
        Self::new([-h, h, h], [h, -h, h], [h, h, -h])
    }

    /// Hexagonal lattice with in-plane edge `a` and height `c`.
    pub fn hexagonal(a: f64, c: f64) -> Result<Self, SampleError> {
        let s = 3f64.sqrt() / 2.0;
        Self::new([a, 0.0, 0.0], [-a / 2.0, a * s, 0.0], [0.0, 0.0, c])
    }

    /// Replace the basis vectors, recomputing the reciprocal basis.
    pub fn set_basis(&mut self, a1: Kvec, a2: Kvec, a3: Kvec) -> Result<(), SampleError> {
        *self = Self::new(a1, a2, a3)?;
        Ok(())
    }

    pub fn basis(&self) -> (&Kvec, &Kvec, &Kvec) {
        (&self.a1, &self.a2, &self.a3)
    }

    pub fn reciprocal_basis(&self) -> (&Kvec, &Kvec, &Kvec) {
        (&self.b1, &self.b2, &self.b3)
    }

    /// Volume of the real-space unit cell (nm³).
    pub fn unit_cell_volume(&self) -> f64 {
        self.volume
    }

    /// Shortest real-space basis length (nm).
    pub fn min_spacing(&self) -> f64 {
        kvec::norm(&self.a1)
            .min(kvec::norm(&self.a2))
            .min(kvec::norm(&self.a3))
    }

    /// Integer coordinates of the reciprocal-lattice point nearest to `q`.
    ///
    /// Uses $a_i \cdot b_j = 2\pi \delta_{ij}$: the fractional coordinate
    /// of `q` along $b_i$ is $q \cdot a_i / 2\pi$.
    pub fn nearest_reciprocal_index(&self, q: &Kvec) -> [i64; 3] {
        [
            (kvec::dot(q, &self.a1) / TWO_PI).round() as i64,
            (kvec::dot(q, &self.a2) / TWO_PI).round() as i64,
            (kvec::dot(q, &self.a3) / TWO_PI).round() as i64,
        ]
    }

    /// All reciprocal-lattice vectors within `radius` of `center`.
    ///
    /// Expands a bounded integer box around the nearest reciprocal index
    /// and filters by distance. Returns a fresh vector: one `Lattice` may
    /// be shared by concurrent callers.
    pub fn reciprocal_vectors_within_radius(&self, center: &Kvec, radius: f64) -> Vec<Kvec> {
        let nearest = self.nearest_reciprocal_index(center);

        // |Δn_i| = |Δq · a_i| / 2π ≤ radius |a_i| / 2π bounds the index box.
        let bound = |a: &Kvec| (radius * kvec::norm(a) / TWO_PI).ceil() as i64 + 1;
        let (n1, n2, n3) = (bound(&self.a1), bound(&self.a2), bound(&self.a3));

        let mut vectors = Vec::new();
        let radius_sq = radius * radius;
        for i in (nearest[0] - n1)..=(nearest[0] + n1) {
            for j in (nearest[1] - n2)..=(nearest[1] + n2) {
                for k in (nearest[2] - n3)..=(nearest[2] + n3) {
                    let v = [
                        i as f64 * self.b1[0] + j as f64 * self.b2[0] + k as f64 * self.b3[0],
                        i as f64 * self.b1[1] + j as f64 * self.b2[1] + k as f64 * self.b3[1],
                        i as f64 * self.b1[2] + j as f64 * self.b2[2] + k as f64 * self.b3[2],
                    ];
                    let d = [v[0] - center[0], v[1] - center[1], v[2] - center[2]];
                    if kvec::dot(&d, &d) <= radius_sq {
                        vectors.push(v);
                    }
                }
            }
        }
        vectors
    }
}

fn reciprocal_basis(a1: &Kvec, a2: &Kvec, a3: &Kvec, triple: f64) -> (Kvec, Kvec, Kvec) {
    let factor = TWO_PI / triple;
    let scale = |v: Kvec| [v[0] * factor, v[1] * factor, v[2] * factor];
    (
        scale(kvec::cross(a2, a3)),
        scale(kvec::cross(a3, a1)),
        scale(kvec::cross(a1, a2)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn degenerate_basis_is_rejected() {
        let result = Lattice::new([1.0, 0.0, 0.0], [2.0, 0.0, 0.0], [0.0, 0.0, 1.0]);
        assert!(matches!(result, Err(SampleError::DegenerateBasis { .. })));
    }

    #[test]
    fn cubic_reciprocal_basis_is_diagonal() {
        let lattice = Lattice::cubic(2.0).unwrap();
        let (b1, _, _) = lattice.reciprocal_basis();
        assert_relative_eq!(b1[0], std::f64::consts::PI, epsilon = 1e-12);
        assert_relative_eq!(b1[1], 0.0, epsilon = 1e-12);
    }

    #[test]
    fn duality_relation_holds() {
        let lattice = Lattice::fcc(1.0).unwrap();
        let (a1, a2, _) = (lattice.a1, lattice.a2, lattice.a3);
        let (b1, b2, _) = lattice.reciprocal_basis();
        assert_relative_eq!(kvec::dot(&a1, b1), TWO_PI, epsilon = 1e-12);
        assert_relative_eq!(kvec::dot(&a2, b1), 0.0, epsilon = 1e-12);
        assert_relative_eq!(kvec::dot(&a1, b2), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn fcc_radius_query_contains_origin_and_respects_radius() {
        let lattice = Lattice::fcc(1.0).unwrap();
        let radius = 2.1 * std::f64::consts::PI / lattice.min_spacing();
        let vectors = lattice.reciprocal_vectors_within_radius(&[0.0, 0.0, 0.0], radius);

        assert!(!vectors.is_empty());
        assert!(vectors
            .iter()
            .any(|v| kvec::norm(v) < 1e-12), "origin must be included");
        for v in &vectors {
            assert!(kvec::norm(v) <= radius + 1e-12);
        }
    }

    #[test]
    fn off_center_query_includes_origin_when_covered() {
        let lattice = Lattice::cubic(1.0).unwrap();
        let center = [1.0, 0.0, 0.0];
        let vectors = lattice.reciprocal_vectors_within_radius(&center, 2.0);
        assert!(vectors.iter().any(|v| kvec::norm(v) < 1e-12));
    }

    #[test]
    fn unit_cell_volume_fcc() {
        // FCC primitive cell volume is a³/4.
        let lattice = Lattice::fcc(2.0).unwrap();
        assert_relative_eq!(lattice.unit_cell_volume(), 2.0, epsilon = 1e-12);
    }
}
