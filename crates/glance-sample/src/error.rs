//! Construction and validation errors for sample trees.

use thiserror::Error;

/// Errors raised while building or mutating a sample description.
///
/// All variants are construction/validation failures: they are reported
/// before any computation starts, and they name the offending parameter so
/// a fit loop or config loader can point at the exact input.
#[derive(Debug, Error)]
pub enum SampleError {
    #[error("Shape parameter '{name}' must be positive, got {value}")]
    InvalidShapeParameter { name: &'static str, value: f64 },

    #[error("Layer thickness must be non-negative, got {0}")]
    NegativeThickness(f64),

    #[error("A multilayer must contain at least one layer")]
    EmptyStack,

    #[error("Lattice basis is degenerate (triple product {triple_product:.3e} is too close to zero)")]
    DegenerateBasis { triple_product: f64 },

    #[error("Abundance must be non-negative, got {0}")]
    NegativeAbundance(f64),

    #[error("Parameter not found: '{0}'")]
    ParameterNotFound(String),

    #[error("Material not found: '{0}'")]
    MaterialNotFound(String),
}
