//! Fresnel reflection/transmission coefficients of a multilayer.
//!
//! For one in-plane wavevector the recursion below produces, per layer,
//! the complex amplitude pair (R, T) of the upward- and downward-travelling
//! waves, referenced at the top of each layer. The recursion runs
//! bottom-up (substrate → ambient) on the amplitude ratios, then top-down
//! to recover the amplitudes themselves; rough interfaces damp the
//! interface reflection with the Névot–Croce factor.
//!
//! Because detector pixels sharing an exit angle share identical
//! coefficients, the [`FresnelMap`] caches one coefficient table per
//! distinct vacuum kz, keyed by bit pattern. The map is built once before
//! the parallel phase and is read-only afterwards.

use std::collections::HashMap;

use num_complex::Complex64;

use glance_sample::MultiLayer;

/// Scalar reflection/transmission amplitudes of one layer, together with
/// the complex z-component of the wavevector inside that layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScalarRt {
    /// Downward (transmitted) amplitude at the top of the layer.
    pub t: Complex64,
    /// Upward (reflected) amplitude at the top of the layer.
    pub r: Complex64,
    /// |z-component| of the wavevector inside the layer (nm⁻¹).
    pub kz: Complex64,
}

impl ScalarRt {
    /// Coefficients of an undisturbed wave: T = 1, R = 0.
    pub fn vacuum(kz: Complex64) -> Self {
        Self {
            t: Complex64::new(1.0, 0.0),
            r: Complex64::new(0.0, 0.0),
            kz,
        }
    }
}

/// Compute the per-layer coefficient table for a wave entering the stack
/// with vacuum z-component `kz_ambient` (> 0) at wavenumber `k`.
///
/// Index 0 is the ambient layer (T = 1 by normalisation), the last index
/// the substrate (R = 0 exactly). A zero-thickness interior layer
/// contributes a unit phase factor and drops out of the recursion without
/// special-casing.
pub fn compute_scalar_fresnel(stack: &MultiLayer, k: f64, kz_ambient: f64) -> Vec<ScalarRt> {
    let n = stack.n_layers();
    let n0_sq = stack.ambient().material().refractive_index_sq();
    // In-plane momentum conservation fixes kz in every layer.
    let k_par_sq = k * k * n0_sq - Complex64::from(kz_ambient * kz_ambient);

    let kz: Vec<Complex64> = stack
        .layers()
        .iter()
        .map(|layer| {
            // Principal sqrt keeps Im(kz) >= 0: decay into depth.
            (k * k * layer.material().refractive_index_sq() - k_par_sq).sqrt()
        })
        .collect();

    // Interface reflection coefficients, Névot–Croce damped.
    let mut r_interface = vec![Complex64::new(0.0, 0.0); n.saturating_sub(1)];
    for i in 0..n.saturating_sub(1) {
        let denominator = kz[i] + kz[i + 1];
        let mut r = if denominator.norm_sqr() > 0.0 {
            (kz[i] - kz[i + 1]) / denominator
        } else {
            Complex64::new(0.0, 0.0)
        };
        if let Some(roughness) = stack.layer(i + 1).roughness() {
            let sigma = roughness.sigma();
            if sigma > 0.0 {
                r *= (-2.0 * kz[i] * kz[i + 1] * sigma * sigma).exp();
            }
        }
        r_interface[i] = r;
    }

    // Bottom-up: amplitude ratios rho_i = R_i / T_i at the top of layer i.
    let mut rho = vec![Complex64::new(0.0, 0.0); n];
    for i in (0..n.saturating_sub(1)).rev() {
        let r = r_interface[i];
        let ratio = (r + rho[i + 1]) / (Complex64::new(1.0, 0.0) + r * rho[i + 1]);
        let delta = kz[i] * stack.layer(i).thickness();
        rho[i] = ratio * (Complex64::new(0.0, 2.0) * delta).exp();
    }

    // Top-down: recover the amplitudes, T normalised to 1 in the ambient.
    let mut coefficients = vec![ScalarRt::vacuum(kz[0]); n];
    coefficients[0] = ScalarRt {
        t: Complex64::new(1.0, 0.0),
        r: rho[0],
        kz: kz[0],
    };
    for i in 0..n.saturating_sub(1) {
        let delta = kz[i] * stack.layer(i).thickness();
        let at_interface = coefficients[i].t * (Complex64::new(0.0, 1.0) * delta).exp();
        let r = r_interface[i];
        let denominator = Complex64::new(1.0, 0.0) + r * rho[i + 1];
        let t_next = if denominator.norm_sqr() > 1e-300 {
            at_interface * (Complex64::new(1.0, 0.0) + r) / denominator
        } else {
            Complex64::new(0.0, 0.0)
        };
        coefficients[i + 1] = ScalarRt {
            t: t_next,
            r: t_next * rho[i + 1],
            kz: kz[i + 1],
        };
    }
    // The substrate hosts no upward wave.
    if let Some(last) = coefficients.last_mut() {
        last.r = Complex64::new(0.0, 0.0);
    }
    coefficients
}

/// Per-run cache of Fresnel coefficient tables, one per distinct vacuum
/// kz value, keyed by bit pattern so lookups are exact.
#[derive(Debug, Clone)]
pub struct FresnelMap {
    tables: HashMap<u64, Vec<ScalarRt>>,
}

impl FresnelMap {
    /// Build coefficient tables for every distinct kz in `kz_values`.
    pub fn build(stack: &MultiLayer, k: f64, kz_values: impl IntoIterator<Item = f64>) -> Self {
        let mut tables = HashMap::new();
        for kz in kz_values {
            tables
                .entry(kz.to_bits())
                .or_insert_with(|| compute_scalar_fresnel(stack, k, kz));
        }
        log::debug!("fresnel map built for {} distinct kz values", tables.len());
        Self { tables }
    }

    /// The coefficient table for a cached kz value.
    pub fn table(&self, kz: f64) -> Option<&[ScalarRt]> {
        self.tables.get(&kz.to_bits()).map(Vec::as_slice)
    }

    /// Coefficients of one layer for a cached kz value.
    pub fn layer(&self, kz: f64, layer_index: usize) -> Option<&ScalarRt> {
        self.tables.get(&kz.to_bits()).and_then(|t| t.get(layer_index))
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glance_sample::{Layer, LayerRoughness, Material, MultiLayer};

    fn vacuum_on_substrate(delta: f64, beta: f64) -> MultiLayer {
        MultiLayer::new(vec![
            Layer::semi_infinite(Material::vacuum()),
            Layer::semi_infinite(Material::from_delta_beta("substrate", delta, beta)),
        ])
        .unwrap()
    }

    const K: f64 = 2.0 * std::f64::consts::PI / 0.154; // Cu-Kα

    #[test]
    fn reflection_magnitude_bounded_by_one_without_absorption() {
        let stack = vacuum_on_substrate(7.6e-6, 0.0);
        for step in 1..200 {
            let alpha = step as f64 * 2e-4;
            let coeffs = compute_scalar_fresnel(&stack, K, K * alpha.sin());
            assert!(
                coeffs[0].r.norm() <= 1.0 + 1e-12,
                "|R| = {} exceeds 1 at alpha = {alpha}",
                coeffs[0].r.norm()
            );
        }
    }

    #[test]
    fn energy_is_conserved_at_a_single_lossless_interface() {
        let stack = vacuum_on_substrate(5.0e-6, 0.0);
        // well above the critical angle, where both waves propagate
        let alpha: f64 = 0.02;
        let kz = K * alpha.sin();
        let coeffs = compute_scalar_fresnel(&stack, K, kz);
        let r = coeffs[0].r;
        let t = coeffs[1].t;
        let flux_ratio = (coeffs[1].kz / coeffs[0].kz).re;
        assert_relative_eq!(
            r.norm_sqr() + t.norm_sqr() * flux_ratio,
            1.0,
            epsilon = 1e-10
        );
    }

    #[test]
    fn total_external_reflection_below_critical_angle() {
        let stack = vacuum_on_substrate(7.6e-6, 0.0);
        // critical angle ~ sqrt(2 delta) = 3.9 mrad; probe well below
        let alpha: f64 = 1e-3;
        let coeffs = compute_scalar_fresnel(&stack, K, K * alpha.sin());
        assert_relative_eq!(coeffs[0].r.norm(), 1.0, epsilon = 1e-9);
    }

    #[test]
    fn matched_layer_degenerates_to_unit_transmission() {
        // Interior layer with the ambient's own index: R = 0, |T| = 1.
        let stack = MultiLayer::new(vec![
            Layer::semi_infinite(Material::vacuum()),
            Layer::new(Material::vacuum(), 50.0).unwrap(),
            Layer::semi_infinite(Material::vacuum()),
        ])
        .unwrap();
        let coeffs = compute_scalar_fresnel(&stack, K, K * 0.01f64.sin());
        assert!(coeffs[0].r.norm() < 1e-14);
        for c in &coeffs {
            assert_relative_eq!(c.t.norm(), 1.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn zero_thickness_interior_layer_is_harmless() {
        let stack = MultiLayer::new(vec![
            Layer::semi_infinite(Material::vacuum()),
            Layer::new(Material::from_delta_beta("film", 5e-6, 0.0), 0.0).unwrap(),
            Layer::semi_infinite(Material::from_delta_beta("Si", 7.6e-6, 1.7e-7)),
        ])
        .unwrap();
        let coeffs = compute_scalar_fresnel(&stack, K, K * 0.01f64.sin());
        for c in &coeffs {
            assert!(c.t.is_finite() && c.r.is_finite());
        }

        // A zero-thickness interior layer must not change the reflectivity
        // of the bare interface.
        let bare = vacuum_on_substrate(7.6e-6, 1.7e-7);
        let bare_coeffs = compute_scalar_fresnel(&bare, K, K * 0.01f64.sin());
        assert_relative_eq!(
            coeffs[0].r.norm_sqr(),
            bare_coeffs[0].r.norm_sqr(),
            max_relative = 1e-9
        );
    }

    #[test]
    fn roughness_damps_the_reflection() {
        let smooth = vacuum_on_substrate(7.6e-6, 0.0);
        let rough = MultiLayer::new(vec![
            Layer::semi_infinite(Material::vacuum()),
            Layer::semi_infinite(Material::from_delta_beta("substrate", 7.6e-6, 0.0))
                .with_roughness(LayerRoughness::new(1.0, 0.5, 500.0)),
        ])
        .unwrap();

        let alpha: f64 = 0.02;
        let kz = K * alpha.sin();
        let r_smooth = compute_scalar_fresnel(&smooth, K, kz)[0].r.norm();
        let r_rough = compute_scalar_fresnel(&rough, K, kz)[0].r.norm();
        assert!(r_rough < r_smooth);
    }

    #[test]
    fn fresnel_map_deduplicates_kz_values() {
        let stack = vacuum_on_substrate(7.6e-6, 0.0);
        let kz = K * 0.01f64.sin();
        let map = FresnelMap::build(&stack, K, [kz, kz, kz, 2.0 * kz]);
        assert_eq!(map.len(), 2);
        assert!(map.table(kz).is_some());
        assert!(map.table(3.0 * kz).is_none());
    }
}
