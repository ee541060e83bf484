//! Interference functions (structure factors) of particle arrangements.
//!
//! An interference function maps a momentum transfer to a real, non-negative
//! factor describing how the spatial arrangement of particles enhances or
//! suppresses the scattered intensity. The variants form a closed set
//! ([`InterferenceFunction`]); each owns only its arrangement parameters.
//!
//! Only the in-plane, real part of q enters: particle arrangements live in
//! the layer plane, where wavevector components stay real.

use num_complex::Complex64;

use crate::kvec::{self, Cvec, Kvec};
use crate::lattice::Lattice;
use crate::parameters::{Parameter, ParameterNode};

/// Cutoff multiplier for the reciprocal sum of [`LatticeInterference3D`],
/// in units of π over the smallest real-space spacing.
const RADIUS_FACTOR: f64 = 2.1;

/// Structure factor of a particle arrangement.
#[derive(Debug, Clone)]
pub enum InterferenceFunction {
    /// Uncorrelated particles: the factor is identically 1.
    None,
    /// One-dimensional short-range order, azimuthally averaged.
    RadialParacrystal(RadialParacrystal),
    /// Two independent paracrystalline sublattice directions.
    Paracrystal2D(Paracrystal2D),
    /// A finite, perfect two-dimensional lattice of N₁ × N₂ cells.
    FiniteLattice2D(FiniteLattice2D),
    /// A finite three-dimensional lattice summed over reciprocal vectors.
    Lattice3D(LatticeInterference3D),
}

impl InterferenceFunction {
    /// Structure factor at momentum transfer `q`. Always ≥ 0.
    pub fn evaluate(&self, q: &Cvec) -> f64 {
        let value = match self {
            InterferenceFunction::None => 1.0,
            InterferenceFunction::RadialParacrystal(p) => p.evaluate(q),
            InterferenceFunction::Paracrystal2D(p) => p.evaluate(q),
            InterferenceFunction::FiniteLattice2D(l) => l.evaluate(q),
            InterferenceFunction::Lattice3D(l) => l.evaluate(q),
        };
        debug_assert!(value >= 0.0, "interference function returned {value}");
        value
    }
}

impl ParameterNode for InterferenceFunction {
    fn node_name(&self) -> &str {
        match self {
            InterferenceFunction::None => "interference_none",
            InterferenceFunction::RadialParacrystal(_) => "radial_paracrystal",
            InterferenceFunction::Paracrystal2D(_) => "paracrystal2d",
            InterferenceFunction::FiniteLattice2D(_) => "finite_lattice2d",
            InterferenceFunction::Lattice3D(_) => "lattice3d",
        }
    }

    fn parameters(&mut self) -> Vec<Parameter<'_>> {
        match self {
            InterferenceFunction::None => Vec::new(),
            InterferenceFunction::RadialParacrystal(p) => p.parameters(),
            InterferenceFunction::Paracrystal2D(p) => p.parameters(),
            InterferenceFunction::FiniteLattice2D(_) => Vec::new(),
            InterferenceFunction::Lattice3D(_) => Vec::new(),
        }
    }
}

/// Shape of the nearest-neighbour distance distribution of a paracrystal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeakProfile {
    /// Gaussian distribution: FT amplitude exp(−q²w²/2).
    Gaussian,
    /// Lorentzian (Cauchy) distribution: FT amplitude exp(−|q|w).
    Lorentzian,
}

/// The characteristic 1D paracrystal factor.
///
/// With φ(q) the Fourier transform of the nearest-neighbour distance
/// distribution (width w around the peak distance d), the structure
/// factor of the infinite chain is
/// $S = \mathrm{Re}\frac{1+\varphi}{1-\varphi}
///    = \frac{1-|\varphi|^2}{|1-\varphi|^2}$.
///
/// A finite damping length λ multiplies φ by $e^{-d/\lambda}$; λ = 0
/// selects the undamped branch instead of dividing by zero.
fn paracrystal_factor(
    q_proj: f64,
    peak_distance: f64,
    width: f64,
    damping_length: f64,
    profile: PeakProfile,
) -> f64 {
    let amplitude = match profile {
        PeakProfile::Gaussian => (-0.5 * q_proj * q_proj * width * width).exp(),
        PeakProfile::Lorentzian => (-q_proj.abs() * width).exp(),
    };
    let damping = if damping_length > 0.0 {
        (-peak_distance / damping_length).exp()
    } else {
        1.0
    };
    let phi = Complex64::from_polar(amplitude * damping, q_proj * peak_distance);

    let denominator = (Complex64::new(1.0, 0.0) - phi).norm_sqr();
    if denominator < 1e-20 {
        // q → 0 limit of the undamped branch: S → (w/d)².
        let ratio = width / peak_distance;
        return ratio * ratio;
    }
    ((1.0 - phi.norm_sqr()) / denominator).max(0.0)
}

/// Azimuthally symmetric 1D paracrystal, evaluated on |q∥|.
#[derive(Debug, Clone, PartialEq)]
pub struct RadialParacrystal {
    /// Mean nearest-neighbour distance (nm).
    peak_distance: f64,
    /// Width of the distance distribution (nm).
    width: f64,
    /// Damping (coherence) length (nm); 0 disables damping.
    damping_length: f64,
    profile: PeakProfile,
}

impl RadialParacrystal {
    pub fn new(peak_distance: f64, width: f64, damping_length: f64) -> Self {
        Self {
            peak_distance,
            width,
            damping_length,
            profile: PeakProfile::Gaussian,
        }
    }

    pub fn with_profile(mut self, profile: PeakProfile) -> Self {
        self.profile = profile;
        self
    }

    fn evaluate(&self, q: &Cvec) -> f64 {
        let q_par = (q[0].re * q[0].re + q[1].re * q[1].re).sqrt();
        paracrystal_factor(
            q_par,
            self.peak_distance,
            self.width,
            self.damping_length,
            self.profile,
        )
    }

    fn parameters(&mut self) -> Vec<Parameter<'_>> {
        vec![
            Parameter::new("peak_distance", &mut self.peak_distance),
            Parameter::new("width", &mut self.width),
            Parameter::new("damping_length", &mut self.damping_length),
        ]
    }
}

/// Product of two 1D paracrystal factors along in-plane basis directions.
#[derive(Debug, Clone, PartialEq)]
pub struct Paracrystal2D {
    basis_1: Kvec,
    basis_2: Kvec,
    width: f64,
    damping_length: f64,
}

impl Paracrystal2D {
    /// `basis_1`/`basis_2` are the in-plane lattice vectors (z ignored).
    pub fn new(basis_1: Kvec, basis_2: Kvec, width: f64, damping_length: f64) -> Self {
        Self {
            basis_1,
            basis_2,
            width,
            damping_length,
        }
    }

    fn evaluate(&self, q: &Cvec) -> f64 {
        let q_plane = [q[0].re, q[1].re, 0.0];
        let mut result = 1.0;
        for basis in [&self.basis_1, &self.basis_2] {
            let length = kvec::norm(basis);
            let q_proj = kvec::dot(&q_plane, basis) / length;
            result *= paracrystal_factor(
                q_proj,
                length,
                self.width,
                self.damping_length,
                PeakProfile::Gaussian,
            );
        }
        result
    }

    fn parameters(&mut self) -> Vec<Parameter<'_>> {
        vec![
            Parameter::new("width", &mut self.width),
            Parameter::new("damping_length", &mut self.damping_length),
        ]
    }
}

/// Normalised Laue factor sin²(Nx/2) / (N sin²(x/2)).
///
/// Averages to 1 over a Brillouin zone and peaks at N; the removable
/// singularity at x = 2πm is filled with the exact limit N.
fn laue(x: f64, n: usize) -> f64 {
    let n_f = n as f64;
    let half = 0.5 * x;
    let s = half.sin();
    if s.abs() < 1e-9 {
        return n_f;
    }
    let num = (n_f * half).sin();
    (num * num) / (n_f * s * s)
}

/// A perfect finite 2D lattice of N₁ × N₂ cells.
#[derive(Debug, Clone, PartialEq)]
pub struct FiniteLattice2D {
    basis_1: Kvec,
    basis_2: Kvec,
    n_1: usize,
    n_2: usize,
}

impl FiniteLattice2D {
    pub fn new(basis_1: Kvec, basis_2: Kvec, n_1: usize, n_2: usize) -> Self {
        Self {
            basis_1,
            basis_2,
            n_1: n_1.max(1),
            n_2: n_2.max(1),
        }
    }

    fn evaluate(&self, q: &Cvec) -> f64 {
        let q_plane = [q[0].re, q[1].re, 0.0];
        laue(kvec::dot(&q_plane, &self.basis_1), self.n_1)
            * laue(kvec::dot(&q_plane, &self.basis_2), self.n_2)
    }
}

/// Squared single-peak structure amplitude N·sinc²(Nx/2).
///
/// The non-periodic small-x approximation of the Laue factor: height N at
/// x = 0, exactly zero at every other lattice peak (x = 2πm), so summing
/// it over reciprocal vectors does not double-count.
fn peak_shape(x: f64, n: usize) -> f64 {
    let n_f = n as f64;
    let arg = 0.5 * n_f * x;
    if arg.abs() < 1e-9 {
        return n_f;
    }
    let s = arg.sin() / arg;
    n_f * s * s
}

/// A finite 3D lattice, evaluated by summing squared structure amplitudes
/// at the reciprocal vectors near q.
///
/// The cutoff is proportional to π over the smallest real-space spacing,
/// which guarantees the nearest Bragg peak is always inside the search
/// sphere while the per-peak sinc tails have decayed at the sphere edge.
#[derive(Debug, Clone, PartialEq)]
pub struct LatticeInterference3D {
    lattice: Lattice,
    extents: [usize; 3],
}

impl LatticeInterference3D {
    pub fn new(lattice: Lattice, extents: [usize; 3]) -> Self {
        Self {
            lattice,
            extents: [extents[0].max(1), extents[1].max(1), extents[2].max(1)],
        }
    }

    fn evaluate(&self, q: &Cvec) -> f64 {
        let q_real = kvec::real_part(q);
        let radius = RADIUS_FACTOR * std::f64::consts::PI / self.lattice.min_spacing();
        let (a1, a2, a3) = self.lattice.basis();

        let mut sum = 0.0;
        for g in self.lattice.reciprocal_vectors_within_radius(&q_real, radius) {
            let dq = [q_real[0] - g[0], q_real[1] - g[1], q_real[2] - g[2]];
            sum += peak_shape(kvec::dot(&dq, a1), self.extents[0])
                * peak_shape(kvec::dot(&dq, a2), self.extents[1])
                * peak_shape(kvec::dot(&dq, a3), self.extents[2]);
        }
        sum
    }
}
