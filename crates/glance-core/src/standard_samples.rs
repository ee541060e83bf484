//! Ready-made sample trees for tests, benchmarks, and demo configs.

use glance_sample::formfactor::{CrystalFormFactor, Cuboid, FullSphere};
use glance_sample::interference::{InterferenceFunction, RadialParacrystal};
use glance_sample::{Lattice, Layer, Material, MultiLayer, Particle, ParticleLayout};

/// Monodisperse spheres sitting on a bare silicon substrate.
pub fn spheres_on_substrate(radius: f64, abundance: f64) -> MultiLayer {
    let mut ambient = Layer::semi_infinite(Material::vacuum());
    let mut layout = ParticleLayout::new();
    layout.add_particle(
        Particle::new(
            Box::new(FullSphere::new(radius).expect("positive radius")),
            abundance,
        )
        .expect("non-negative abundance"),
    );
    ambient.add_layout(layout);

    MultiLayer::new(vec![
        ambient,
        Layer::semi_infinite(Material::from_delta_beta("Si", 7.6e-6, 1.7e-7)),
    ])
    .expect("two layers")
}

/// Spheres with paracrystalline short-range order on silicon.
pub fn correlated_spheres_on_substrate(radius: f64, peak_distance: f64) -> MultiLayer {
    let mut ambient = Layer::semi_infinite(Material::vacuum());
    let mut layout = ParticleLayout::new();
    layout.add_particle(
        Particle::new(
            Box::new(FullSphere::new(radius).expect("positive radius")),
            1.0,
        )
        .expect("non-negative abundance"),
    );
    layout.set_interference(InterferenceFunction::RadialParacrystal(
        RadialParacrystal::new(peak_distance, 0.2 * peak_distance, 0.0),
    ));
    ambient.add_layout(layout);

    MultiLayer::new(vec![
        ambient,
        Layer::semi_infinite(Material::from_delta_beta("Si", 7.6e-6, 1.7e-7)),
    ])
    .expect("two layers")
}

/// A meso-crystal (cubic lattice of small spheres inside a box envelope)
/// buried in an oxide film on silicon.
pub fn mesocrystal_in_film() -> MultiLayer {
    let lattice = Lattice::cubic(12.0).expect("cubic lattice");
    let basis = Box::new(FullSphere::new(4.0).expect("positive radius"));
    let envelope = Box::new(Cuboid::new(60.0, 60.0, 36.0).expect("positive edges"));
    let crystal = CrystalFormFactor::new(lattice, basis, envelope);

    let mut film = Layer::new(Material::from_delta_beta("SiO2", 8.5e-6, 1.1e-7), 40.0)
        .expect("positive thickness");
    let mut layout = ParticleLayout::new();
    layout.add_particle(Particle::new(Box::new(crystal), 1.0).expect("non-negative abundance"));
    film.add_layout(layout);

    MultiLayer::new(vec![
        Layer::semi_infinite(Material::vacuum()),
        film,
        Layer::semi_infinite(Material::from_delta_beta("Si", 7.6e-6, 1.7e-7)),
    ])
    .expect("three layers")
}

/// A bare vacuum/substrate interface; the reflectivity reference sample.
pub fn bare_substrate(delta: f64, beta: f64) -> MultiLayer {
    MultiLayer::new(vec![
        Layer::semi_infinite(Material::vacuum()),
        Layer::semi_infinite(Material::from_delta_beta("substrate", delta, beta)),
    ])
    .expect("two layers")
}
