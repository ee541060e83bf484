//! Materials as complex refractive indices.
//!
//! At X-ray and neutron wavelengths the refractive index of matter is
//! conventionally written $\tilde{n} = 1 - \delta + i\beta$ with
//! $\delta, \beta \ll 1$; $\delta$ drives refraction, $\beta$ absorption.
//! The library keeps a handful of common substrates so tests and demo
//! configurations do not need to carry optical constants around.

use std::collections::BTreeMap;

use num_complex::Complex64;

use crate::error::SampleError;

/// A homogeneous material with a complex refractive index.
#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    name: String,
    refractive_index: Complex64,
}

impl Material {
    /// Material from the X-ray convention $\tilde{n} = 1 - \delta + i\beta$.
    pub fn from_delta_beta(name: &str, delta: f64, beta: f64) -> Self {
        Self {
            name: name.to_owned(),
            refractive_index: Complex64::new(1.0 - delta, beta),
        }
    }

    /// Material from an explicit complex refractive index.
    pub fn from_refractive_index(name: &str, refractive_index: Complex64) -> Self {
        Self {
            name: name.to_owned(),
            refractive_index,
        }
    }

    /// The ambient default: vacuum, $\tilde{n} = 1$.
    pub fn vacuum() -> Self {
        Self::from_delta_beta("vacuum", 0.0, 0.0)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn refractive_index(&self) -> Complex64 {
        self.refractive_index
    }

    /// $\tilde{n}^2$, the quantity that actually enters the wave equation.
    pub fn refractive_index_sq(&self) -> Complex64 {
        self.refractive_index * self.refractive_index
    }
}

/// An explicit registry of named materials.
///
/// Passed into builders by the caller; there is deliberately no global
/// registry, so two concurrent runs can use disjoint libraries.
#[derive(Debug, Clone)]
pub struct MaterialLibrary {
    materials: BTreeMap<String, Material>,
}

impl Default for MaterialLibrary {
    /// Library pre-populated with common GISAS substrates at Cu-Kα
    /// (λ = 0.154 nm). Values are 10⁻⁶-scale optical constants.
    fn default() -> Self {
        let mut library = MaterialLibrary {
            materials: BTreeMap::new(),
        };
        library.insert(Material::vacuum());
        library.insert(Material::from_delta_beta("Si", 7.6e-6, 1.7e-7));
        library.insert(Material::from_delta_beta("SiO2", 8.5e-6, 1.1e-7));
        library.insert(Material::from_delta_beta("Au", 4.7e-5, 4.9e-6));
        library
    }
}

impl MaterialLibrary {
    /// An empty library.
    pub fn new() -> Self {
        MaterialLibrary {
            materials: BTreeMap::new(),
        }
    }

    /// Add or replace a material under its own name.
    pub fn insert(&mut self, material: Material) {
        self.materials.insert(material.name().to_owned(), material);
    }

    /// Look up a material by name.
    pub fn get(&self, name: &str) -> Result<&Material, SampleError> {
        self.materials
            .get(name)
            .ok_or_else(|| SampleError::MaterialNotFound(name.to_owned()))
    }

    /// Names of all registered materials, sorted.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.materials.keys().map(String::as_str)
    }
}
