//! Small special-function toolbox used by the form factors.
//!
//! Polynomial approximations follow Abramowitz & Stegun, *Handbook of
//! Mathematical Functions* (1964), §9.4. Accuracy is ~1e-8 absolute, far
//! below the discretisation error of any detector grid.

use num_complex::Complex64;

/// sin(z)/z with the removable singularity filled in.
pub fn sinc(z: Complex64) -> Complex64 {
    if z.norm_sqr() < 1e-24 {
        Complex64::new(1.0, 0.0)
    } else {
        z.sin() / z
    }
}

/// Bessel function J₁(x) for real argument.
///
/// Rational approximation for |x| < 8, asymptotic form beyond
/// (Abramowitz & Stegun 9.4.4 and 9.4.6).
pub fn bessel_j1(x: f64) -> f64 {
    let ax = x.abs();
    if ax < 8.0 {
        let y = x * x;
        let num = x
            * (72362614232.0
                + y * (-7895059235.0
                    + y * (242396853.1 + y * (-2972611.439 + y * (15704.48260 + y * (-30.16036606))))));
        let den = 144725228442.0
            + y * (2300535178.0 + y * (18583304.74 + y * (99447.43394 + y * (376.9991397 + y))));
        num / den
    } else {
        let z = 8.0 / ax;
        let y = z * z;
        let xx = ax - 2.356194491;
        let p0 = 1.0
            + y * (0.183105e-2 + y * (-0.3516396496e-4 + y * (0.2457520174e-5 + y * (-0.240337019e-6))));
        let p1 = 0.04687499995
            + y * (-0.2002690873e-3 + y * (0.8449199096e-5 + y * (-0.88228987e-6 + y * 0.105787412e-6)));
        let ans = (0.636619772 / ax).sqrt() * (xx.cos() * p0 - z * xx.sin() * p1);
        if x < 0.0 {
            -ans
        } else {
            ans
        }
    }
}

/// J₁(x)/x with the x → 0 limit of 1/2 filled in.
pub fn bessel_j1_ratio(x: f64) -> f64 {
    if x.abs() < 1e-8 {
        0.5
    } else {
        bessel_j1(x) / x
    }
}

/// Nodes and weights of the 16-point Gauss–Legendre rule on [-1, 1].
///
/// Used for the z-profile integrals of rotationally symmetric shapes whose
/// form factor has no closed form (e.g. the full spheroid).
pub const GAUSS_LEGENDRE_16: [(f64, f64); 16] = [
    (-0.989400934991650, 0.027152459411754),
    (-0.944575023073233, 0.062253523938648),
    (-0.865631202387832, 0.095158511682493),
    (-0.755404408355003, 0.124628971255534),
    (-0.617876244402644, 0.149595988816577),
    (-0.458016777657227, 0.169156519395003),
    (-0.281603550779259, 0.182603415044924),
    (-0.095012509837637, 0.189450610455069),
    (0.095012509837637, 0.189450610455069),
    (0.281603550779259, 0.182603415044924),
    (0.458016777657227, 0.169156519395003),
    (0.617876244402644, 0.149595988816577),
    (0.755404408355003, 0.124628971255534),
    (0.865631202387832, 0.095158511682493),
    (0.944575023073233, 0.062253523938648),
    (0.989400934991650, 0.027152459411754),
];

/// Integrate a complex-valued function over [a, b] with the fixed 16-point
/// Gauss–Legendre rule.
pub fn integrate_complex<F>(a: f64, b: f64, f: F) -> Complex64
where
    F: Fn(f64) -> Complex64,
{
    let half = 0.5 * (b - a);
    let mid = 0.5 * (a + b);
    let mut sum = Complex64::new(0.0, 0.0);
    for &(node, weight) in GAUSS_LEGENDRE_16.iter() {
        sum += weight * f(mid + half * node);
    }
    sum * half
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn j1_small_argument_matches_series() {
        // J1(x) = x/2 - x^3/16 + ...
        let x = 1e-4;
        assert_relative_eq!(bessel_j1(x), x / 2.0, max_relative = 1e-6);
    }

    #[test]
    fn j1_known_values() {
        // Abramowitz & Stegun, Table 9.1
        assert_relative_eq!(bessel_j1(1.0), 0.4400505857, epsilon = 1e-7);
        assert_relative_eq!(bessel_j1(5.0), -0.3275791376, epsilon = 1e-7);
        assert_relative_eq!(bessel_j1(10.0), 0.0434727462, epsilon = 1e-6);
    }

    #[test]
    fn gauss_legendre_integrates_polynomials_exactly() {
        // x^2 over [0, 3] = 9
        let result = integrate_complex(0.0, 3.0, |x| Complex64::new(x * x, 0.0));
        assert_relative_eq!(result.re, 9.0, epsilon = 1e-12);
        assert_relative_eq!(result.im, 0.0, epsilon = 1e-15);
    }

    #[test]
    fn sinc_limit_is_one() {
        assert_eq!(sinc(Complex64::new(0.0, 0.0)), Complex64::new(1.0, 0.0));
    }
}
