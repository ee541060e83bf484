//! Builds a simulation from a job configuration and writes its results.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context};

use glance_core::detector::{Axis, DetectorGrid, GaussianResolution, IntensityMap};
use glance_core::{Beam, Simulation};
use glance_sample::formfactor::{Cuboid, Cylinder, FormFactor, FullSphere, FullSpheroid};
use glance_sample::interference::{FiniteLattice2D, InterferenceFunction, RadialParacrystal};
use glance_sample::material::MaterialLibrary;
use glance_sample::{Layer, LayerRoughness, Material, MultiLayer, Particle, ParticleLayout};

use crate::config::{
    InterferenceConfig, JobConfig, LayoutConfig, ParticleConfig, ShapeConfig,
};

/// Assemble the sample tree, beam, and detector from a parsed job.
pub fn build_simulation(job: &JobConfig) -> anyhow::Result<Simulation> {
    let mut library = MaterialLibrary::default();
    for material in &job.sample.materials {
        library.insert(Material::from_delta_beta(
            &material.name,
            material.delta,
            material.beta,
        ));
    }

    let mut layers = Vec::with_capacity(job.sample.layers.len());
    for layer_config in &job.sample.layers {
        let material = library
            .get(&layer_config.material)
            .with_context(|| format!("layer material '{}'", layer_config.material))?
            .clone();
        let mut layer = match layer_config.thickness {
            Some(thickness) => Layer::new(material, thickness)?,
            None => Layer::semi_infinite(material),
        };
        if let Some(roughness) = &layer_config.roughness {
            layer = layer.with_roughness(LayerRoughness::new(
                roughness.sigma,
                roughness.hurst,
                roughness.corr_length,
            ));
        }
        layers.push(layer);
    }

    for layout_config in &job.layouts {
        if layout_config.layer >= layers.len() {
            bail!(
                "layout references layer {} but the stack has {} layers",
                layout_config.layer,
                layers.len()
            );
        }
        let layout = build_layout(layout_config)?;
        layers[layout_config.layer].add_layout(layout);
    }

    let sample = MultiLayer::new(layers)?;

    let beam = Beam::new(
        job.beam.wavelength,
        job.beam.alpha_deg.to_radians(),
        job.beam.phi_deg.to_radians(),
    )
    .with_intensity(job.beam.intensity);

    let mut detector = DetectorGrid::new(
        Axis::new(
            "alpha_f",
            job.detector.alpha.min_deg.to_radians(),
            job.detector.alpha.max_deg.to_radians(),
            job.detector.alpha.bins,
        )?,
        Axis::new(
            "phi_f",
            job.detector.phi.min_deg.to_radians(),
            job.detector.phi.max_deg.to_radians(),
            job.detector.phi.bins,
        )?,
    );
    if let Some(resolution) = &job.detector.resolution {
        detector = detector.with_resolution(GaussianResolution {
            sigma_alpha: resolution.sigma_alpha_deg.to_radians(),
            sigma_phi: resolution.sigma_phi_deg.to_radians(),
        });
    }

    Ok(Simulation::new(sample, beam, detector))
}

fn build_layout(config: &LayoutConfig) -> anyhow::Result<ParticleLayout> {
    let mut layout = ParticleLayout::new();
    for particle in &config.particles {
        layout.add_particle(build_particle(particle)?);
    }
    if let Some(interference) = &config.interference {
        layout.set_interference(build_interference(interference));
    }
    Ok(layout)
}

fn build_particle(config: &ParticleConfig) -> anyhow::Result<Particle> {
    let form_factor: Box<dyn FormFactor> = match config.shape {
        ShapeConfig::FullSphere { radius } => Box::new(FullSphere::new(radius)?),
        ShapeConfig::Cylinder { radius, height } => Box::new(Cylinder::new(radius, height)?),
        ShapeConfig::Cuboid {
            length,
            width,
            height,
        } => Box::new(Cuboid::new(length, width, height)?),
        ShapeConfig::FullSpheroid { radius, height } => {
            Box::new(FullSpheroid::new(radius, height)?)
        }
    };
    Ok(Particle::with_position(
        form_factor,
        config.abundance,
        config.position,
    )?)
}

fn build_interference(config: &InterferenceConfig) -> InterferenceFunction {
    match config {
        InterferenceConfig::None => InterferenceFunction::None,
        InterferenceConfig::RadialParacrystal {
            peak_distance,
            width,
            damping_length,
        } => InterferenceFunction::RadialParacrystal(RadialParacrystal::new(
            *peak_distance,
            *width,
            *damping_length,
        )),
        InterferenceConfig::FiniteLattice2d {
            basis_1,
            basis_2,
            n_1,
            n_2,
        } => InterferenceFunction::FiniteLattice2D(FiniteLattice2D::new(
            [basis_1[0], basis_1[1], 0.0],
            [basis_2[0], basis_2[1], 0.0],
            *n_1,
            *n_2,
        )),
    }
}

/// Write the intensity map as CSV: a header line with the axis metadata,
/// then one `alpha_deg,phi_deg,intensity` row per detector bin.
pub fn write_map_csv(map: &IntensityMap, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let mut content = String::new();
    content.push_str(&format!(
        "# {} [{} bins], {} [{} bins]\n",
        map.alpha.name, map.alpha.bins, map.phi.name, map.phi.bins
    ));
    content.push_str("alpha_deg,phi_deg,intensity\n");
    for row in 0..map.alpha.bins {
        for col in 0..map.phi.bins {
            content.push_str(&format!(
                "{:.6},{:.6},{:.9e}\n",
                map.alpha.center(row).to_degrees(),
                map.phi.center(col).to_degrees(),
                map.data[[row, col]]
            ));
        }
    }
    fs::write(path, content).with_context(|| format!("writing {}", path.display()))?;
    log::info!("wrote {}", path.display());
    Ok(())
}

/// Write the intensity map as JSON with full axis metadata.
pub fn write_map_json(map: &IntensityMap, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let document = serde_json::json!({
        "axes": [
            { "name": map.alpha.name, "min": map.alpha.min, "max": map.alpha.max, "bins": map.alpha.bins },
            { "name": map.phi.name, "min": map.phi.min, "max": map.phi.max, "bins": map.phi.bins },
        ],
        "intensity": map.flatten(),
    });
    fs::write(path, serde_json::to_string_pretty(&document)?)
        .with_context(|| format!("writing {}", path.display()))?;
    log::info!("wrote {}", path.display());
    Ok(())
}
