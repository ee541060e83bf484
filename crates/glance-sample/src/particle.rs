//! Particles and particle layouts.
//!
//! A [`Particle`] pairs a shape with an abundance weight and an in-layer
//! position offset. A [`ParticleLayout`] collects the particle population
//! of one layer together with the interference function describing its
//! lateral arrangement.

use crate::error::SampleError;
use crate::formfactor::FormFactor;
use crate::interference::InterferenceFunction;
use crate::kvec::Kvec;
use crate::parameters::{Parameter, ParameterNode};

/// One particle species: a shape, its relative abundance, and its
/// position offset within the layer (nm).
pub struct Particle {
    form_factor: Box<dyn FormFactor>,
    abundance: f64,
    position: Kvec,
}

impl Clone for Particle {
    fn clone(&self) -> Self {
        Self {
            form_factor: self.form_factor.clone(),
            abundance: self.abundance,
            position: self.position,
        }
    }
}

impl Particle {
    pub fn new(form_factor: Box<dyn FormFactor>, abundance: f64) -> Result<Self, SampleError> {
        Self::with_position(form_factor, abundance, [0.0, 0.0, 0.0])
    }

    pub fn with_position(
        form_factor: Box<dyn FormFactor>,
        abundance: f64,
        position: Kvec,
    ) -> Result<Self, SampleError> {
        if !(abundance >= 0.0) {
            return Err(SampleError::NegativeAbundance(abundance));
        }
        Ok(Self {
            form_factor,
            abundance,
            position,
        })
    }

    pub fn form_factor(&self) -> &dyn FormFactor {
        self.form_factor.as_ref()
    }

    pub fn abundance(&self) -> f64 {
        self.abundance
    }

    pub fn position(&self) -> Kvec {
        self.position
    }
}

impl ParameterNode for Particle {
    fn node_name(&self) -> &str {
        "particle"
    }

    fn parameters(&mut self) -> Vec<Parameter<'_>> {
        let [px, py, pz] = &mut self.position;
        vec![
            Parameter::new("abundance", &mut self.abundance),
            Parameter::new("position_x", px),
            Parameter::new("position_y", py),
            Parameter::new("position_z", pz),
        ]
    }

    fn children(&mut self) -> Vec<&mut dyn ParameterNode> {
        vec![self.form_factor.as_mut()]
    }
}

/// The particle population of one layer: an ordered particle collection
/// plus the interference function of their arrangement.
#[derive(Clone, Default)]
pub struct ParticleLayout {
    particles: Vec<Particle>,
    interference: Option<InterferenceFunction>,
}

impl ParticleLayout {
    pub fn new() -> Self {
        Self {
            particles: Vec::new(),
            interference: None,
        }
    }

    pub fn add_particle(&mut self, particle: Particle) -> &mut Self {
        self.particles.push(particle);
        self
    }

    pub fn set_interference(&mut self, interference: InterferenceFunction) -> &mut Self {
        self.interference = Some(interference);
        self
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// The interference function, defaulting to the uncorrelated case.
    pub fn interference(&self) -> &InterferenceFunction {
        static UNCORRELATED: InterferenceFunction = InterferenceFunction::None;
        self.interference.as_ref().unwrap_or(&UNCORRELATED)
    }

    /// Sum of the abundance weights of all particles in this layout.
    pub fn total_abundance(&self) -> f64 {
        self.particles.iter().map(Particle::abundance).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }
}

impl ParameterNode for ParticleLayout {
    fn node_name(&self) -> &str {
        "layout"
    }

    fn parameters(&mut self) -> Vec<Parameter<'_>> {
        Vec::new()
    }

    fn children(&mut self) -> Vec<&mut dyn ParameterNode> {
        let mut children: Vec<&mut dyn ParameterNode> = self
            .particles
            .iter_mut()
            .map(|p| p as &mut dyn ParameterNode)
            .collect();
        if let Some(interference) = self.interference.as_mut() {
            children.push(interference as &mut dyn ParameterNode);
        }
        children
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formfactor::FullSphere;

    #[test]
    fn negative_abundance_is_rejected() {
        let sphere = Box::new(FullSphere::new(1.0).unwrap());
        assert!(matches!(
            Particle::new(sphere, -0.5),
            Err(SampleError::NegativeAbundance(_))
        ));
    }

    #[test]
    fn total_abundance_sums_particles() {
        let mut layout = ParticleLayout::new();
        layout.add_particle(
            Particle::new(Box::new(FullSphere::new(1.0).unwrap()), 0.75).unwrap(),
        );
        layout.add_particle(
            Particle::new(Box::new(FullSphere::new(2.0).unwrap()), 0.25).unwrap(),
        );
        assert_eq!(layout.total_abundance(), 1.0);
    }

    #[test]
    fn missing_interference_defaults_to_none() {
        let layout = ParticleLayout::new();
        assert!(matches!(
            layout.interference(),
            InterferenceFunction::None
        ));
    }
}
