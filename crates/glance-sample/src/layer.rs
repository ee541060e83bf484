//! Layers and the multilayer stack.
//!
//! A [`MultiLayer`] is an ordered stack: the first layer is the
//! semi-infinite ambient, the last the semi-infinite substrate, and the
//! layers in between carry finite thicknesses. By convention the two
//! boundary layers carry thickness 0. Each layer may host particle
//! layouts and an optional roughness descriptor on its top interface.

use crate::error::SampleError;
use crate::material::Material;
use crate::parameters::{Parameter, ParameterNode};
use crate::particle::ParticleLayout;
use crate::roughness::LayerRoughness;

/// One layer of the stack.
pub struct Layer {
    material: Material,
    /// Thickness in nm; 0 for the semi-infinite boundary layers.
    thickness: f64,
    /// Roughness of the top interface of this layer.
    roughness: Option<LayerRoughness>,
    layouts: Vec<ParticleLayout>,
}

impl Clone for Layer {
    fn clone(&self) -> Self {
        Self {
            material: self.material.clone(),
            thickness: self.thickness,
            roughness: self.roughness.clone(),
            layouts: self.layouts.clone(),
        }
    }
}

impl Layer {
    /// A semi-infinite layer (ambient or substrate).
    pub fn semi_infinite(material: Material) -> Self {
        Self {
            material,
            thickness: 0.0,
            roughness: None,
            layouts: Vec::new(),
        }
    }

    /// A finite layer of the given thickness (nm).
    pub fn new(material: Material, thickness: f64) -> Result<Self, SampleError> {
        if !(thickness >= 0.0) || !thickness.is_finite() {
            return Err(SampleError::NegativeThickness(thickness));
        }
        Ok(Self {
            material,
            thickness,
            roughness: None,
            layouts: Vec::new(),
        })
    }

    pub fn with_roughness(mut self, roughness: LayerRoughness) -> Self {
        self.roughness = Some(roughness);
        self
    }

    pub fn add_layout(&mut self, layout: ParticleLayout) -> &mut Self {
        self.layouts.push(layout);
        self
    }

    pub fn material(&self) -> &Material {
        &self.material
    }

    pub fn thickness(&self) -> f64 {
        self.thickness
    }

    pub fn roughness(&self) -> Option<&LayerRoughness> {
        self.roughness.as_ref()
    }

    pub fn layouts(&self) -> &[ParticleLayout] {
        &self.layouts
    }
}

impl ParameterNode for Layer {
    fn node_name(&self) -> &str {
        "layer"
    }

    fn parameters(&mut self) -> Vec<Parameter<'_>> {
        vec![Parameter::new("thickness", &mut self.thickness)]
    }

    fn children(&mut self) -> Vec<&mut dyn ParameterNode> {
        let mut children: Vec<&mut dyn ParameterNode> = Vec::new();
        if let Some(roughness) = self.roughness.as_mut() {
            children.push(roughness as &mut dyn ParameterNode);
        }
        for layout in self.layouts.iter_mut() {
            children.push(layout as &mut dyn ParameterNode);
        }
        children
    }
}

/// An ordered stack of layers, ambient first, substrate last.
pub struct MultiLayer {
    layers: Vec<Layer>,
}

impl Clone for MultiLayer {
    fn clone(&self) -> Self {
        Self {
            layers: self.layers.clone(),
        }
    }
}

impl MultiLayer {
    /// Build a stack from an ordered layer sequence.
    ///
    /// Fails with [`SampleError::EmptyStack`] when no layer is given; a
    /// per-call check downstream would waste the parallel phase.
    pub fn new(layers: Vec<Layer>) -> Result<Self, SampleError> {
        if layers.is_empty() {
            return Err(SampleError::EmptyStack);
        }
        Ok(Self { layers })
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> &Layer {
        &self.layers[index]
    }

    pub fn n_layers(&self) -> usize {
        self.layers.len()
    }

    pub fn ambient(&self) -> &Layer {
        &self.layers[0]
    }

    pub fn substrate(&self) -> &Layer {
        &self.layers[self.layers.len() - 1]
    }

    /// Indices of layers that host at least one non-empty particle layout.
    pub fn decorated_layers(&self) -> Vec<usize> {
        self.layers
            .iter()
            .enumerate()
            .filter(|(_, layer)| layer.layouts().iter().any(|l| !l.is_empty()))
            .map(|(index, _)| index)
            .collect()
    }
}

impl ParameterNode for MultiLayer {
    fn node_name(&self) -> &str {
        "multilayer"
    }

    fn parameters(&mut self) -> Vec<Parameter<'_>> {
        Vec::new()
    }

    fn children(&mut self) -> Vec<&mut dyn ParameterNode> {
        self.layers
            .iter_mut()
            .map(|l| l as &mut dyn ParameterNode)
            .collect()
    }
}
