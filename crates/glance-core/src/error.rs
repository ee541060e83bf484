//! Engine-level errors.

use thiserror::Error;

/// Errors raised by the scattering engine.
///
/// Validation problems surface before the parallel phase; a
/// [`EngineError::NonFiniteAmplitude`] crossing the parallel seam aborts
/// the whole run, because a NaN amplitude indicates a contract violation
/// upstream, not a per-element fault worth dropping silently.
#[derive(Debug, Clone, Error)]
pub enum EngineError {
    #[error("Sample error: {0}")]
    Sample(String),

    #[error("Form factor amplitude is not finite at alpha_f={alpha_f:.5} rad, phi_f={phi_f:.5} rad")]
    NonFiniteAmplitude { alpha_f: f64, phi_f: f64 },

    #[error("Detector axis '{0}' must have at least one bin")]
    EmptyAxis(String),
}

impl From<glance_sample::SampleError> for EngineError {
    fn from(error: glance_sample::SampleError) -> Self {
        EngineError::Sample(error.to_string())
    }
}
