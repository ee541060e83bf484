//! Interface roughness descriptor.
//!
//! A rough interface is characterised by its rms height σ, Hurst exponent
//! H, and lateral correlation length ξ. The specular channel only needs σ
//! (through Névot–Croce damping of the Fresnel reflection); the diffuse
//! channel also probes the lateral statistics through the power spectral
//! density.
//!
//! # Reference
//! D. K. G. de Boer, *Phys. Rev. B* **51**, 5297 (1995),
//! "X-ray reflection and transmission by rough surfaces".

use crate::kvec::Kvec;
use crate::parameters::{Parameter, ParameterNode};

/// Self-affine roughness of one layer interface.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerRoughness {
    /// rms roughness σ (nm).
    sigma: f64,
    /// Hurst exponent H ∈ (0, 1]; smaller means more jagged.
    hurst: f64,
    /// Lateral correlation length ξ (nm).
    lateral_corr_length: f64,
}

impl LayerRoughness {
    pub fn new(sigma: f64, hurst: f64, lateral_corr_length: f64) -> Self {
        Self {
            sigma,
            hurst,
            lateral_corr_length,
        }
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }

    pub fn hurst(&self) -> f64 {
        self.hurst
    }

    pub fn lateral_corr_length(&self) -> f64 {
        self.lateral_corr_length
    }

    /// Power spectral density of the height profile at in-plane momentum
    /// `k`, the 2D Fourier transform of the height-height correlation
    /// function:
    ///
    /// $PSD(q_\parallel) = 4\pi H \sigma^2 \xi^2
    ///     (1 + q_\parallel^2 \xi^2)^{-1-H}$
    pub fn spectral_density(&self, k: &Kvec) -> f64 {
        let h = self.hurst;
        let xi2 = self.lateral_corr_length * self.lateral_corr_length;
        let q_par2 = k[0] * k[0] + k[1] * k[1];
        4.0 * std::f64::consts::PI * h * self.sigma * self.sigma * xi2
            * (1.0 + q_par2 * xi2).powf(-1.0 - h)
    }

    /// Height-height correlation function at lateral distance r:
    /// $\sigma^2 \exp(-(r/\xi)^{2H})$.
    pub fn correlation(&self, r: f64) -> f64 {
        let h = self.hurst;
        self.sigma * self.sigma * (-(r / self.lateral_corr_length).powf(2.0 * h)).exp()
    }
}

impl ParameterNode for LayerRoughness {
    fn node_name(&self) -> &str {
        "roughness"
    }

    fn parameters(&mut self) -> Vec<Parameter<'_>> {
        vec![
            Parameter::new("sigma", &mut self.sigma),
            Parameter::new("hurst", &mut self.hurst),
            Parameter::new("corr_length", &mut self.lateral_corr_length),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn psd_falls_off_with_q() {
        let roughness = LayerRoughness::new(1.0, 0.3, 5.0);
        let low = roughness.spectral_density(&[0.01, 0.0, 0.0]);
        let high = roughness.spectral_density(&[1.0, 0.0, 0.0]);
        assert!(low > high);
    }

    #[test]
    fn correlation_at_origin_is_sigma_squared() {
        let roughness = LayerRoughness::new(2.0, 0.5, 10.0);
        assert_relative_eq!(roughness.correlation(0.0), 4.0, epsilon = 1e-12);
    }
}
