//! Hard-particle shapes with closed-form or integrated amplitudes.
//!
//! Conventions shared by all shapes: lengths in nm, amplitudes in nm³,
//! and the particle rests on the z = 0 plane (the depth reference used by
//! the multilayer bookkeeping), which shows up as an $e^{i q_z z_0}$ phase
//! referencing the shape's vertical midpoint or apex.

use num_complex::Complex64;

use crate::error::SampleError;
use crate::kvec::{self, Cvec};
use crate::math;
use crate::parameters::{Parameter, ParameterNode};

use super::FormFactor;

const I: Complex64 = Complex64::new(0.0, 1.0);

fn require_positive(name: &'static str, value: f64) -> Result<f64, SampleError> {
    if value > 0.0 && value.is_finite() {
        Ok(value)
    } else {
        Err(SampleError::InvalidShapeParameter { name, value })
    }
}

/// In-plane momentum magnitude. In the scalar DWBA geometry only the
/// z-component of q is complex; the in-plane part is real by construction.
fn q_parallel(q: &Cvec) -> f64 {
    (q[0].re * q[0].re + q[1].re * q[1].re).sqrt()
}

/// A full sphere of radius R, resting on its south pole.
///
/// $F(q) = \frac{4\pi}{q^3}\left(\sin qR - qR\cos qR\right) e^{i q_z R}$
#[derive(Debug, Clone, PartialEq)]
pub struct FullSphere {
    radius: f64,
}

impl FullSphere {
    pub fn new(radius: f64) -> Result<Self, SampleError> {
        Ok(Self {
            radius: require_positive("radius", radius)?,
        })
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }
}

impl ParameterNode for FullSphere {
    fn node_name(&self) -> &str {
        "full_sphere"
    }
    fn parameters(&mut self) -> Vec<Parameter<'_>> {
        vec![Parameter::new("radius", &mut self.radius)]
    }
}

impl FormFactor for FullSphere {
    fn evaluate_for_q(&self, q: &Cvec) -> Complex64 {
        let r = self.radius;
        let q1 = kvec::cmag(q);
        let qr = q1 * r;
        let radial = if qr.norm() < 1e-2 {
            // Series around q = 0: the closed form cancels catastrophically.
            let x2 = qr * qr;
            self.volume() * (1.0 + x2 * (-0.1 + x2 / 280.0))
        } else {
            4.0 * std::f64::consts::PI * (qr.sin() - qr * qr.cos()) / (q1 * q1 * q1)
        };
        radial * (I * q[2] * r).exp()
    }

    fn volume(&self) -> f64 {
        4.0 / 3.0 * std::f64::consts::PI * self.radius.powi(3)
    }

    fn clone_box(&self) -> Box<dyn FormFactor> {
        Box::new(self.clone())
    }
}

/// A rectangular box with edges (L, W, H), resting on its base.
///
/// Separable product of three sinc factors.
#[derive(Debug, Clone, PartialEq)]
pub struct Cuboid {
    length: f64,
    width: f64,
    height: f64,
}

impl Cuboid {
    pub fn new(length: f64, width: f64, height: f64) -> Result<Self, SampleError> {
        Ok(Self {
            length: require_positive("length", length)?,
            width: require_positive("width", width)?,
            height: require_positive("height", height)?,
        })
    }
}

impl ParameterNode for Cuboid {
    fn node_name(&self) -> &str {
        "cuboid"
    }
    fn parameters(&mut self) -> Vec<Parameter<'_>> {
        vec![
            Parameter::new("length", &mut self.length),
            Parameter::new("width", &mut self.width),
            Parameter::new("height", &mut self.height),
        ]
    }
}

impl FormFactor for Cuboid {
    fn evaluate_for_q(&self, q: &Cvec) -> Complex64 {
        let qz_h_half = q[2] * (self.height / 2.0);
        self.volume()
            * math::sinc(q[0] * (self.length / 2.0))
            * math::sinc(q[1] * (self.width / 2.0))
            * math::sinc(qz_h_half)
            * (I * qz_h_half).exp()
    }

    fn volume(&self) -> f64 {
        self.length * self.width * self.height
    }

    fn clone_box(&self) -> Box<dyn FormFactor> {
        Box::new(self.clone())
    }
}

/// An upright circular cylinder (radius R, height H), resting on its base.
///
/// $F(q) = 2\pi R^2 H\, \mathrm{sinc}(q_z H/2)\, e^{i q_z H/2}\,
///         \frac{J_1(q_\parallel R)}{q_\parallel R}$
#[derive(Debug, Clone, PartialEq)]
pub struct Cylinder {
    radius: f64,
    height: f64,
}

impl Cylinder {
    pub fn new(radius: f64, height: f64) -> Result<Self, SampleError> {
        Ok(Self {
            radius: require_positive("radius", radius)?,
            height: require_positive("height", height)?,
        })
    }
}

impl ParameterNode for Cylinder {
    fn node_name(&self) -> &str {
        "cylinder"
    }
    fn parameters(&mut self) -> Vec<Parameter<'_>> {
        vec![
            Parameter::new("radius", &mut self.radius),
            Parameter::new("height", &mut self.height),
        ]
    }
}

impl FormFactor for Cylinder {
    fn evaluate_for_q(&self, q: &Cvec) -> Complex64 {
        let qz_h_half = q[2] * (self.height / 2.0);
        let radial = 2.0 * math::bessel_j1_ratio(q_parallel(q) * self.radius);
        self.volume() * radial * math::sinc(qz_h_half) * (I * qz_h_half).exp()
    }

    fn volume(&self) -> f64 {
        std::f64::consts::PI * self.radius * self.radius * self.height
    }

    fn clone_box(&self) -> Box<dyn FormFactor> {
        Box::new(self.clone())
    }
}

/// A full spheroid (equatorial radius R, full height H), resting on its
/// south pole. The z-profile integral has no closed form; it is evaluated
/// with a fixed Gauss–Legendre rule over half the height:
///
/// $F(q) = 4\pi\, e^{i q_z H/2} \int_0^{H/2}
///     R_z^2\, \frac{J_1(q_\parallel R_z)}{q_\parallel R_z}
///     \cos(q_z z)\, dz,
/// \quad R_z = R\sqrt{1 - 4z^2/H^2}$
#[derive(Debug, Clone, PartialEq)]
pub struct FullSpheroid {
    radius: f64,
    height: f64,
}

impl FullSpheroid {
    pub fn new(radius: f64, height: f64) -> Result<Self, SampleError> {
        Ok(Self {
            radius: require_positive("radius", radius)?,
            height: require_positive("height", height)?,
        })
    }
}

impl ParameterNode for FullSpheroid {
    fn node_name(&self) -> &str {
        "full_spheroid"
    }
    fn parameters(&mut self) -> Vec<Parameter<'_>> {
        vec![
            Parameter::new("radius", &mut self.radius),
            Parameter::new("height", &mut self.height),
        ]
    }
}

impl FormFactor for FullSpheroid {
    fn evaluate_for_q(&self, q: &Cvec) -> Complex64 {
        if kvec::cmag(q).norm() < 1e-10 {
            return self.volume().into();
        }
        let r = self.radius;
        let h = self.height;
        let q_par = q_parallel(q);
        let qz = q[2];

        let integral = math::integrate_complex(0.0, h / 2.0, |z| {
            let rz = r * (1.0 - 4.0 * z * z / (h * h)).max(0.0).sqrt();
            let radial = rz * rz * math::bessel_j1_ratio(q_par * rz);
            radial * (qz * z).cos()
        });
        4.0 * std::f64::consts::PI * (I * qz * (h / 2.0)).exp() * integral
    }

    fn volume(&self) -> f64 {
        2.0 / 3.0 * std::f64::consts::PI * self.radius * self.radius * self.height
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

    fn q_zero() -> Cvec {
        to_complex(&[0.0, 0.0, 0.0])
    }

    #[test]
    fn sphere_volume_limit() {
        // R = 5 nm: V = (4/3)π·125 ≈ 523.599 nm³
        let sphere = FullSphere::new(5.0).unwrap();
        let amplitude = sphere.evaluate_for_q(&q_zero());
        assert_relative_eq!(amplitude.re, 523.5987755982988, epsilon = 1e-9);
        assert_eq!(amplitude.im, 0.0);
    }

    #[test]
    fn sphere_series_matches_closed_form_at_crossover() {
        let sphere = FullSphere::new(5.0).unwrap();
        // |qR| just below and above the series/closed-form crossover.
        let below = sphere.evaluate_for_q(&to_complex(&[0.00199, 0.0, 0.0]));
        let above = sphere.evaluate_for_q(&to_complex(&[0.00201, 0.0, 0.0]));
        assert_relative_eq!(below.re, above.re, max_relative = 1e-9);
    }

    #[test]
    fn cuboid_volume_limit() {
        let cuboid = Cuboid::new(4.0, 3.0, 2.0).unwrap();
        let amplitude = cuboid.evaluate_for_q(&q_zero());
        assert_relative_eq!(amplitude.re, 24.0, epsilon = 1e-12);
        assert_eq!(amplitude.im, 0.0);
    }

    #[test]
    fn cylinder_volume_limit() {
        let cylinder = Cylinder::new(3.0, 5.0).unwrap();
        let amplitude = cylinder.evaluate_for_q(&q_zero());
        assert_relative_eq!(amplitude.re, cylinder.volume(), epsilon = 1e-10);
        assert_eq!(amplitude.im, 0.0);
    }

    #[test]
    fn spheroid_volume_limit() {
        let spheroid = FullSpheroid::new(3.0, 4.0).unwrap();
        let amplitude = spheroid.evaluate_for_q(&q_zero());
        assert_relative_eq!(amplitude.re, spheroid.volume(), epsilon = 1e-10);
        assert_eq!(amplitude.im, 0.0);
    }

    #[test]
    fn spheroid_with_equal_axes_matches_sphere() {
        // A spheroid with H = 2R is a sphere; the integrated amplitude
        // must agree with the closed form away from q = 0.
        let r = 4.0;
        let sphere = FullSphere::new(r).unwrap();
        let spheroid = FullSpheroid::new(r, 2.0 * r).unwrap();
        let q = to_complex(&[0.3, 0.1, 0.2]);
        let a = sphere.evaluate_for_q(&q);
        let b = spheroid.evaluate_for_q(&q);
        assert_relative_eq!(a.re, b.re, max_relative = 1e-4);
        assert_relative_eq!(a.im, b.im, max_relative = 1e-4);
    }

    #[test]
    fn negative_dimensions_are_rejected() {
        assert!(FullSphere::new(-1.0).is_err());
        assert!(FullSphere::new(0.0).is_err());
        assert!(Cuboid::new(1.0, -2.0, 3.0).is_err());
        assert!(Cylinder::new(1.0, f64::NAN).is_err());
    }

    #[test]
    fn cuboid_first_zero_along_x() {
        // sinc(qx L/2) vanishes at qx = 2π/L.
        let cuboid = Cuboid::new(10.0, 5.0, 5.0).unwrap();
        let q = to_complex(&[2.0 * std::f64::consts::PI / 10.0, 0.0, 0.0]);
        assert!(cuboid.evaluate_for_q(&q).norm() < 1e-10);
    }
}
