//! # Glance Sample
//!
//! The sample description tree for grazing-incidence scattering simulations,
//! together with the mathematics that lives naturally on the tree nodes:
//! form-factor evaluation, interference functions, and reciprocal-lattice
//! enumeration.
//!
//! ## Architecture
//!
//! A sample is a [`layer::MultiLayer`]: an ordered stack of [`layer::Layer`]s,
//! each carrying a [`material::Material`], an optional
//! [`roughness::LayerRoughness`], and zero or more
//! [`particle::ParticleLayout`]s of embedded particles. Particle shapes
//! implement the [`formfactor::FormFactor`] capability; particle arrangements
//! are described by [`interference::InterferenceFunction`] variants.
//!
//! Every floating-point physical parameter on the tree is reachable through
//! the [`parameters::ParameterPool`], a path-indexed snapshot rebuilt before
//! each simulation run and consumed by external fit loops.
//!
//! ## Modules
//!
//! - [`kvec`] — Real and complex 3-vector helpers.
//! - [`material`] — Complex refractive indices and the material library.
//! - [`roughness`] — Interface roughness descriptor and spectral density.
//! - [`layer`] — Layers and the multilayer stack.
//! - [`lattice`] — Three-dimensional lattices and reciprocal-vector search.
//! - [`formfactor`] — Particle shape amplitudes.
//! - [`interference`] — Structure factors of particle arrangements.
//! - [`particle`] — Particles and particle layouts.
//! - [`parameters`] — Path-indexed parameter pool.

pub mod error;
pub mod formfactor;
pub mod interference;
pub mod kvec;
pub mod lattice;
pub mod layer;
pub mod material;
mod math;
pub mod parameters;
pub mod particle;
pub mod roughness;

pub use error::SampleError;
pub use formfactor::FormFactor;
pub use interference::InterferenceFunction;
pub use lattice::Lattice;
pub use layer::{Layer, MultiLayer};
pub use material::Material;
pub use parameters::{ParameterNode, ParameterPool};
pub use particle::{Particle, ParticleLayout};
pub use roughness::LayerRoughness;
