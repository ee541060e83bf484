//! The computation orchestrator.
//!
//! [`Simulation::run`] executes the three phases described in the crate
//! docs: single-threaded precomputation, a parallel loop over simulation
//! elements, and a single-threaded reduction. The parallel loop shares
//! only immutable data (the sample tree, the Fresnel map, the prepared
//! particle contexts); each element owns its accumulator, so the result is
//! bit-reproducible regardless of scheduling — [`Simulation::run_sequential`]
//! produces the identical array.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use num_complex::Complex64;
use rayon::prelude::*;

use glance_sample::formfactor::Translated;
use glance_sample::kvec::{self, Kvec};
use glance_sample::{InterferenceFunction, MultiLayer, ParameterPool};

use crate::beam::Beam;
use crate::detector::{DetectorGrid, IntensityMap};
use crate::dwba::dwba_amplitude;
use crate::element::SimulationElement;
use crate::error::EngineError;
use crate::fresnel::{compute_scalar_fresnel, FresnelMap};

/// Shared cancellation flag, checked between elements.
///
/// Cancellation is a normal run outcome, not an error: completed elements
/// keep their intensities and the orchestrator reports a partial map.
#[derive(Debug, Clone, Default)]
pub struct CancellationFlag(Arc<AtomicBool>);

impl CancellationFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Result of a run: the intensity map plus a cancellation indicator.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    pub intensity: IntensityMap,
    pub cancelled: bool,
}

/// Pre-resolved evaluation context of one particle layout: translated
/// form factors with their abundance fractions, ready for the hot loop.
struct LayoutContext {
    layer_index: usize,
    particles: Vec<(Translated, f64)>,
    total_abundance: f64,
    interference: InterferenceFunction,
}

/// A grazing-incidence scattering simulation.
pub struct Simulation {
    sample: MultiLayer,
    beam: Beam,
    detector: DetectorGrid,
}

impl Simulation {
    pub fn new(sample: MultiLayer, beam: Beam, detector: DetectorGrid) -> Self {
        Self {
            sample,
            beam,
            detector,
        }
    }

    pub fn sample(&self) -> &MultiLayer {
        &self.sample
    }

    /// Snapshot the parameter pool of the sample tree.
    pub fn parameter_pool(&mut self) -> ParameterPool {
        ParameterPool::build(&mut self.sample)
    }

    /// Push a (possibly optimizer-modified) pool back into the tree.
    pub fn apply_parameters(&mut self, pool: &ParameterPool) -> Result<(), EngineError> {
        pool.apply(&mut self.sample)?;
        Ok(())
    }

    /// The fit-loop entry point: apply the parameter snapshot, run, and
    /// return the flattened intensity array in detector order. The engine
    /// retains no optimizer state between calls.
    pub fn evaluate(&mut self, pool: &ParameterPool) -> Result<Vec<f64>, EngineError> {
        self.apply_parameters(pool)?;
        let outcome = self.run()?;
        Ok(outcome.intensity.flatten())
    }

    /// Run with a worker pool.
    pub fn run(&self) -> Result<RunOutcome, EngineError> {
        self.run_with(&CancellationFlag::new(), true)
    }

    /// Run on the calling thread only. Exists for determinism checks and
    /// debugging; produces bit-identical output to [`Simulation::run`].
    pub fn run_sequential(&self) -> Result<RunOutcome, EngineError> {
        self.run_with(&CancellationFlag::new(), false)
    }

    /// Run with an external cancellation flag.
    pub fn run_cancellable(&self, cancel: &CancellationFlag) -> Result<RunOutcome, EngineError> {
        self.run_with(cancel, true)
    }

    fn run_with(&self, cancel: &CancellationFlag, parallel: bool) -> Result<RunOutcome, EngineError> {
        // Phase 1: single-threaded precomputation.
        let k = self.beam.wavenumber();
        let kz_i = self.beam.kz();
        let k_i = self.beam.incident_wavevector();

        let mut elements = self.make_elements(k);
        let fresnel_map = self.build_fresnel_map(k, kz_i, &elements);
        let layouts = self.prepare_layouts();
        log::info!(
            "dispatching {} elements over {} decorated layers",
            elements.len(),
            layouts.len()
        );

        // Phase 2: parallel evaluation; each worker writes only its own
        // elements.
        let evaluate = |element: &mut SimulationElement| -> Result<(), EngineError> {
            if cancel.is_cancelled() {
                return Ok(());
            }
            element.intensity = self.compute_element(element, &fresnel_map, &layouts, kz_i, &k_i)?;
            element.completed = true;
            Ok(())
        };

        if parallel {
            elements.par_iter_mut().try_for_each(evaluate)?;
        } else {
            elements.iter_mut().try_for_each(evaluate)?;
        }

        // Phase 3: single-threaded reduction in detector order.
        let mut map = IntensityMap::zeroed(self.detector.alpha().clone(), self.detector.phi().clone());
        for (index, element) in elements.iter().enumerate() {
            let row = index / self.detector.phi().bins;
            let col = index % self.detector.phi().bins;
            map.data[[row, col]] = element.intensity;
        }
        if let Some(resolution) = self.detector.resolution() {
            map.smear(resolution);
        }

        Ok(RunOutcome {
            intensity: map,
            cancelled: cancel.is_cancelled(),
        })
    }

    /// One element per detector bin, α_f outer, φ_f inner.
    fn make_elements(&self, k: f64) -> Vec<SimulationElement> {
        let alpha = self.detector.alpha();
        let phi = self.detector.phi();
        let mut elements = Vec::with_capacity(self.detector.size());
        for i_alpha in 0..alpha.bins {
            for i_phi in 0..phi.bins {
                elements.push(SimulationElement::new(
                    alpha.center(i_alpha),
                    phi.center(i_phi),
                    k,
                ));
            }
        }
        elements
    }

    /// Coefficient tables for the incident kz and every distinct exit kz.
    fn build_fresnel_map(&self, k: f64, kz_i: f64, elements: &[SimulationElement]) -> FresnelMap {
        let kz_values = std::iter::once(kz_i).chain(
            elements
                .iter()
                .filter(|e| e.kz_f > 0.0)
                .map(|e| e.kz_f),
        );
        FresnelMap::build(&self.sample, k, kz_values)
    }

    /// Resolve particle layouts into translated form factors and
    /// abundance fractions once, before the hot loop.
    fn prepare_layouts(&self) -> Vec<LayoutContext> {
        let mut contexts = Vec::new();
        for layer_index in self.sample.decorated_layers() {
            for layout in self.sample.layer(layer_index).layouts() {
                let total_abundance = layout.total_abundance();
                if layout.is_empty() || total_abundance <= 0.0 {
                    continue;
                }
                let particles = layout
                    .particles()
                    .iter()
                    .map(|particle| {
                        (
                            Translated::new(
                                particle.form_factor().clone_box(),
                                particle.position(),
                            ),
                            particle.abundance() / total_abundance,
                        )
                    })
                    .collect();
                contexts.push(LayoutContext {
                    layer_index,
                    particles,
                    total_abundance,
                    interference: layout.interference().clone(),
                });
            }
        }
        contexts
    }

    /// The per-element evaluation: decoupling approximation over all
    /// particle species of all layouts,
    /// I = Σ_layouts A·[Σᵢ fᵢ|Fᵢ|² + |Σᵢ fᵢFᵢ|²·(S(q) − 1)].
    fn compute_element(
        &self,
        element: &SimulationElement,
        fresnel_map: &FresnelMap,
        layouts: &[LayoutContext],
        kz_i: f64,
        k_i: &Kvec,
    ) -> Result<f64, EngineError> {
        // Bins below the horizon see no scattered wave.
        if element.kz_f <= 0.0 {
            return Ok(0.0);
        }

        let q_vacuum = [
            k_i[0] - element.k_f[0],
            k_i[1] - element.k_f[1],
            k_i[2] - element.k_f[2],
        ];
        let q_complex = kvec::to_complex(&q_vacuum);

        let mut intensity = 0.0;
        for context in layouts {
            let (in_coeffs, out_coeffs) = match (
                fresnel_map.layer(kz_i, context.layer_index),
                fresnel_map.layer(element.kz_f, context.layer_index),
            ) {
                (Some(in_c), Some(out_c)) => (in_c, out_c),
                _ => continue,
            };

            let mut mean_amplitude = Complex64::new(0.0, 0.0);
            let mut mean_intensity = 0.0;
            for (form_factor, fraction) in &context.particles {
                let amplitude =
                    dwba_amplitude(in_coeffs, out_coeffs, form_factor, k_i, &element.k_f);
                if !amplitude.re.is_finite() || !amplitude.im.is_finite() {
                    return Err(EngineError::NonFiniteAmplitude {
                        alpha_f: element.alpha_f,
                        phi_f: element.phi_f,
                    });
                }
                mean_amplitude += *fraction * amplitude;
                mean_intensity += *fraction * amplitude.norm_sqr();
            }

            let structure_factor = context.interference.evaluate(&q_complex);
            intensity += context.total_abundance
                * (mean_intensity + mean_amplitude.norm_sqr() * (structure_factor - 1.0));
        }

        Ok(self.beam.intensity() * intensity.max(0.0))
    }
}

/// Specular reflectivity |R(α)|² of the stack for a sweep of incidence
/// angles (rad). The specular channel needs no particles: it is the
/// coherent response of the layer interfaces alone.
pub fn specular_reflectivity(stack: &MultiLayer, wavelength: f64, alphas: &[f64]) -> Vec<f64> {
    let k = 2.0 * std::f64::consts::PI / wavelength;
    alphas
        .iter()
        .map(|alpha| {
            let kz = k * alpha.sin();
            if kz <= 0.0 {
                return 1.0;
            }
            compute_scalar_fresnel(stack, k, kz)[0].r.norm_sqr()
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::Axis;
    use crate::standard_samples;

    fn small_simulation() -> Simulation {
        let sample = standard_samples::spheres_on_substrate(5.0, 1.0);
        let beam = Beam::new(0.1, 0.2f64.to_radians(), 0.0);
        let detector = DetectorGrid::new(
            Axis::new("alpha_f", 0.0, 2.0f64.to_radians(), 8).unwrap(),
            Axis::new("phi_f", (-1.0f64).to_radians(), 1.0f64.to_radians(), 6).unwrap(),
        );
        Simulation::new(sample, beam, detector)
    }

    #[test]
    fn run_produces_finite_nonnegative_intensity() {
        let simulation = small_simulation();
        let outcome = simulation.run().unwrap();
        assert!(!outcome.cancelled);
        for value in outcome.intensity.data.iter() {
            assert!(value.is_finite() && *value >= 0.0);
        }
        assert!(outcome.intensity.max_intensity() > 0.0);
    }

    #[test]
    fn pre_cancelled_run_reports_partial_outcome() {
        let simulation = small_simulation();
        let flag = CancellationFlag::new();
        flag.cancel();
        let outcome = simulation.run_cancellable(&flag).unwrap();
        assert!(outcome.cancelled);
        // nothing was evaluated: the map is left at its initial state
        assert_eq!(outcome.intensity.max_intensity(), 0.0);
    }

    #[test]
    fn evaluate_round_trips_through_the_pool() {
        let mut simulation = small_simulation();
        let mut pool = simulation.parameter_pool();

        let radius_path = pool
            .paths()
            .find(|p| p.ends_with("/full_sphere/radius"))
            .unwrap()
            .to_owned();
        assert_eq!(pool.get(&radius_path).unwrap(), 5.0);

        pool.set(&radius_path, 4.0).unwrap();
        let flattened = simulation.evaluate(&pool).unwrap();
        assert_eq!(flattened.len(), 48);

        let pool_after = simulation.parameter_pool();
        assert_eq!(pool_after.get(&radius_path).unwrap(), 4.0);
    }
}
