//! Real and complex 3-vector helpers.
//!
//! Wavevectors are plain `[f64; 3]` arrays; momentum transfers inside
//! absorbing media acquire complex z-components and are `[Complex64; 3]`.
//! Free functions keep the call sites explicit about which arithmetic is
//! complex and which is not.

use num_complex::Complex64;

/// A real wavevector (nm⁻¹).
pub type Kvec = [f64; 3];

/// A complex wavevector (nm⁻¹). Only the z-component is complex in
/// practice, but the full vector is typed complex so momentum transfers
/// compose without case analysis.
pub type Cvec = [Complex64; 3];

/// Euclidean dot product of two real vectors.
pub fn dot(a: &Kvec, b: &Kvec) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// Cross product of two real vectors.
pub fn cross(a: &Kvec, b: &Kvec) -> Kvec {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Euclidean norm of a real vector.
pub fn norm(a: &Kvec) -> f64 {
    dot(a, a).sqrt()
}

/// Scalar triple product a · (b × c). Zero for linearly dependent vectors.
pub fn triple_product(a: &Kvec, b: &Kvec, c: &Kvec) -> f64 {
    dot(a, &cross(b, c))
}

/// Promote a real vector to a complex one.
pub fn to_complex(a: &Kvec) -> Cvec {
    [a[0].into(), a[1].into(), a[2].into()]
}

/// Component-wise difference of two complex vectors.
pub fn csub(a: &Cvec, b: &Cvec) -> Cvec {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

/// Non-conjugating "magnitude" √(x² + y² + z²) of a complex vector.
///
/// This is the analytic continuation of the Euclidean norm, not the
/// Hermitian norm; scattering formulas expect the former.
pub fn cmag(a: &Cvec) -> Complex64 {
    (a[0] * a[0] + a[1] * a[1] + a[2] * a[2]).sqrt()
}

/// Non-conjugating in-plane magnitude √(x² + y²) of a complex vector.
pub fn cmag_xy(a: &Cvec) -> Complex64 {
    (a[0] * a[0] + a[1] * a[1]).sqrt()
}

/// The real part of a complex vector, dropping any imaginary components.
pub fn real_part(a: &Cvec) -> Kvec {
    [a[0].re, a[1].re, a[2].re]
}

/// Non-conjugating dot product of a complex vector with a real one.
pub fn cdot_real(a: &Cvec, b: &Kvec) -> Complex64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triple_product_of_unit_cell_is_one() {
        let a = [1.0, 0.0, 0.0];
        let b = [0.0, 1.0, 0.0];
        let c = [0.0, 0.0, 1.0];
        assert_eq!(triple_product(&a, &b, &c), 1.0);
    }

    #[test]
    fn cmag_continues_euclidean_norm() {
        let v = to_complex(&[3.0, 0.0, 4.0]);
        let m = cmag(&v);
        assert!((m.re - 5.0).abs() < 1e-12);
        assert_eq!(m.im, 0.0);
    }
}
