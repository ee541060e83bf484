//! TOML configuration deserialisation for simulation jobs.

use serde::Deserialize;

/// Top-level job configuration.
#[derive(Debug, Deserialize)]
pub struct JobConfig {
    pub beam: BeamConfig,
    pub detector: DetectorConfig,
    pub sample: SampleConfig,
    #[serde(default)]
    pub layouts: Vec<LayoutConfig>,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Incident beam parameters from TOML. Angles in degrees.
#[derive(Debug, Deserialize)]
pub struct BeamConfig {
    /// Wavelength in nm.
    pub wavelength: f64,
    pub alpha_deg: f64,
    #[serde(default)]
    pub phi_deg: f64,
    #[serde(default = "default_intensity")]
    pub intensity: f64,
}

fn default_intensity() -> f64 {
    1.0
}

/// One detector axis in degrees.
#[derive(Debug, Deserialize)]
pub struct AxisConfig {
    pub min_deg: f64,
    pub max_deg: f64,
    pub bins: usize,
}

/// Detector grid and optional Gaussian resolution.
#[derive(Debug, Deserialize)]
pub struct DetectorConfig {
    pub alpha: AxisConfig,
    pub phi: AxisConfig,
    #[serde(default)]
    pub resolution: Option<ResolutionConfig>,
}

#[derive(Debug, Deserialize)]
pub struct ResolutionConfig {
    pub sigma_alpha_deg: f64,
    pub sigma_phi_deg: f64,
}

/// The layer stack, ambient first, substrate last, plus optional custom
/// materials extending the built-in library.
#[derive(Debug, Deserialize)]
pub struct SampleConfig {
    pub layers: Vec<LayerConfig>,
    #[serde(default)]
    pub materials: Vec<MaterialConfig>,
}

/// A layer referencing a material by name. Omitted thickness means
/// semi-infinite (ambient/substrate convention).
#[derive(Debug, Deserialize)]
pub struct LayerConfig {
    pub material: String,
    #[serde(default)]
    pub thickness: Option<f64>,
    #[serde(default)]
    pub roughness: Option<RoughnessConfig>,
}

#[derive(Debug, Deserialize)]
pub struct RoughnessConfig {
    pub sigma: f64,
    #[serde(default = "default_hurst")]
    pub hurst: f64,
    #[serde(default = "default_corr_length")]
    pub corr_length: f64,
}

fn default_hurst() -> f64 {
    0.5
}

fn default_corr_length() -> f64 {
    100.0
}

/// A custom material in the 1 − δ + iβ convention.
#[derive(Debug, Deserialize)]
pub struct MaterialConfig {
    pub name: String,
    pub delta: f64,
    pub beta: f64,
}

/// A particle layout attached to one layer.
#[derive(Debug, Deserialize)]
pub struct LayoutConfig {
    /// Index of the hosting layer in the stack.
    pub layer: usize,
    pub particles: Vec<ParticleConfig>,
    #[serde(default)]
    pub interference: Option<InterferenceConfig>,
}

/// One particle species.
#[derive(Debug, Deserialize)]
pub struct ParticleConfig {
    #[serde(flatten)]
    pub shape: ShapeConfig,
    #[serde(default = "default_abundance")]
    pub abundance: f64,
    #[serde(default)]
    pub position: [f64; 3],
}

fn default_abundance() -> f64 {
    1.0
}

/// Shape specification, tagged by type.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ShapeConfig {
    FullSphere {
        radius: f64,
    },
    Cylinder {
        radius: f64,
        height: f64,
    },
    Cuboid {
        length: f64,
        width: f64,
        height: f64,
    },
    FullSpheroid {
        radius: f64,
        height: f64,
    },
}

/// Interference function specification, tagged by type. Lengths in nm.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InterferenceConfig {
    None,
    RadialParacrystal {
        peak_distance: f64,
        width: f64,
        #[serde(default)]
        damping_length: f64,
    },
    FiniteLattice2d {
        basis_1: [f64; 2],
        basis_2: [f64; 2],
        n_1: usize,
        n_2: usize,
    },
}

/// Output configuration.
#[derive(Debug, Deserialize)]
pub struct OutputConfig {
    /// Output directory (default: "./output").
    #[serde(default = "default_output_dir")]
    pub directory: String,
    /// Whether to save the intensity map as CSV (default: true).
    #[serde(default = "default_true")]
    pub save_csv: bool,
    /// Whether to also save the map as JSON (default: false).
    #[serde(default)]
    pub save_json: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_output_dir(),
            save_csv: true,
            save_json: false,
        }
    }
}

fn default_output_dir() -> String {
    "./output".into()
}

fn default_true() -> bool {
    true
}

/// Load and parse a TOML job configuration file.
pub fn load_config(path: &std::path::Path) -> anyhow::Result<JobConfig> {
    let content = std::fs::read_to_string(path)?;
    let config: JobConfig = toml::from_str(&content)?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_config_parses() {
        let config: JobConfig = toml::from_str(
            r#"
            [beam]
            wavelength = 0.1
            alpha_deg = 0.2

            [detector]
            alpha = { min_deg = 0.0, max_deg = 2.0, bins = 50 }
            phi = { min_deg = -1.0, max_deg = 1.0, bins = 50 }

            [sample]
            layers = [
                { material = "vacuum" },
                { material = "Si" },
            ]

            [[layouts]]
            layer = 0
            interference = { type = "radial_paracrystal", peak_distance = 25.0, width = 5.0 }

            [[layouts.particles]]
            type = "full_sphere"
            radius = 5.0
            "#,
        )
        .unwrap();

        assert_eq!(config.sample.layers.len(), 2);
        assert_eq!(config.layouts.len(), 1);
        let particle = &config.layouts[0].particles[0];
        assert!(matches!(
            particle.shape,
            ShapeConfig::FullSphere { radius } if radius == 5.0
        ));
        assert_eq!(particle.abundance, 1.0);
        assert!(config.output.save_csv);
    }
}
