//! # Glance Core
//!
//! The scattering engine: given a sample tree from `glance-sample`, a beam,
//! and a detector grid, computes the grazing-incidence scattered intensity
//! in the Distorted-Wave Born Approximation (DWBA).
//!
//! ## Pipeline
//!
//! 1. **Precompute** (single-threaded): snapshot the parameter pool, then
//!    build the Fresnel coefficient cache ([`fresnel::FresnelMap`]) for
//!    every distinct incidence/exit wavevector on the detector grid.
//! 2. **Evaluate** (parallel): each [`element::SimulationElement`] owns one
//!    intensity accumulator written by exactly one worker; per element the
//!    four DWBA paths ([`dwba`]) are summed coherently for every particle,
//!    weighted by abundance and the layout's interference function.
//! 3. **Reduce** (single-threaded): copy element intensities into the
//!    output grid in detector order and optionally convolve with the
//!    detector resolution.
//!
//! Because no state is shared mutably during phase 2, the output is
//! bit-reproducible regardless of worker scheduling.

pub mod beam;
pub mod detector;
pub mod dwba;
pub mod element;
pub mod error;
pub mod fresnel;
pub mod simulation;
pub mod standard_samples;

pub use beam::Beam;
pub use detector::{Axis, DetectorGrid, GaussianResolution, IntensityMap};
pub use error::EngineError;
pub use fresnel::{FresnelMap, ScalarRt};
pub use simulation::{CancellationFlag, RunOutcome, Simulation};
