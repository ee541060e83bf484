//! Detector grid, output intensity map, and resolution smearing.

use ndarray::Array2;

use crate::error::EngineError;

/// One detector axis: name, angular bounds (rad), and bin count.
/// Values are attached to bin centers.
#[derive(Debug, Clone, PartialEq)]
pub struct Axis {
    pub name: String,
    pub min: f64,
    pub max: f64,
    pub bins: usize,
}

impl Axis {
    pub fn new(name: &str, min: f64, max: f64, bins: usize) -> Result<Self, EngineError> {
        if bins == 0 {
            return Err(EngineError::EmptyAxis(name.to_owned()));
        }
        Ok(Self {
            name: name.to_owned(),
            min,
            max,
            bins,
        })
    }

    /// Center of bin `index`.
    pub fn center(&self, index: usize) -> f64 {
        let width = (self.max - self.min) / self.bins as f64;
        self.min + (index as f64 + 0.5) * width
    }

    /// Width of one bin.
    pub fn bin_width(&self) -> f64 {
        (self.max - self.min) / self.bins as f64
    }
}

/// Gaussian detector resolution, specified as rms widths in axis units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaussianResolution {
    pub sigma_alpha: f64,
    pub sigma_phi: f64,
}

/// The rectangular detector: an exit-angle axis α_f and an azimuth axis
/// φ_f, plus an optional resolution function applied after reduction.
#[derive(Debug, Clone)]
pub struct DetectorGrid {
    alpha: Axis,
    phi: Axis,
    resolution: Option<GaussianResolution>,
}

impl DetectorGrid {
    pub fn new(alpha: Axis, phi: Axis) -> Self {
        Self {
            alpha,
            phi,
            resolution: None,
        }
    }

    pub fn with_resolution(mut self, resolution: GaussianResolution) -> Self {
        self.resolution = Some(resolution);
        self
    }

    pub fn alpha(&self) -> &Axis {
        &self.alpha
    }

    pub fn phi(&self) -> &Axis {
        &self.phi
    }

    pub fn resolution(&self) -> Option<&GaussianResolution> {
        self.resolution.as_ref()
    }

    /// Total number of detector bins.
    pub fn size(&self) -> usize {
        self.alpha.bins * self.phi.bins
    }
}

/// The simulated intensity, one real value per detector bin, with axis
/// metadata. Rows index α_f, columns φ_f.
#[derive(Debug, Clone)]
pub struct IntensityMap {
    pub alpha: Axis,
    pub phi: Axis,
    pub data: Array2<f64>,
}

impl IntensityMap {
    pub fn zeroed(alpha: Axis, phi: Axis) -> Self {
        let data = Array2::zeros((alpha.bins, phi.bins));
        Self { alpha, phi, data }
    }

    /// Flatten in detector order (row-major: α_f outer, φ_f inner), the
    /// layout consumed by fit loops.
    pub fn flatten(&self) -> Vec<f64> {
        self.data.iter().copied().collect()
    }

    pub fn max_intensity(&self) -> f64 {
        self.data.iter().copied().fold(0.0, f64::max)
    }

    /// Convolve with a separable Gaussian kernel; σ is given in axis units
    /// and converted to bins. Kernels are truncated at 3σ and renormalised
    /// so the total intensity is preserved away from the map edges.
    pub fn smear(&mut self, resolution: &GaussianResolution) {
        let sigma_rows = resolution.sigma_alpha / self.alpha.bin_width();
        let sigma_cols = resolution.sigma_phi / self.phi.bin_width();
        if sigma_rows > 0.0 {
            self.data = convolve_along_rows(&self.data, sigma_rows);
        }
        if sigma_cols > 0.0 {
            let transposed = self.data.t().to_owned();
            self.data = convolve_along_rows(&transposed, sigma_cols).t().to_owned();
        }
    }
}

fn gaussian_kernel(sigma_bins: f64) -> Vec<f64> {
    let half_width = (3.0 * sigma_bins).ceil() as i64;
    let mut kernel: Vec<f64> = (-half_width..=half_width)
        .map(|offset| {
            let x = offset as f64 / sigma_bins;
            (-0.5 * x * x).exp()
        })
        .collect();
    let sum: f64 = kernel.iter().sum();
    for value in kernel.iter_mut() {
        *value /= sum;
    }
    kernel
}

/// Convolve each column (i.e. along the row index) with a Gaussian.
fn convolve_along_rows(data: &Array2<f64>, sigma_bins: f64) -> Array2<f64> {
    let kernel = gaussian_kernel(sigma_bins);
    let half = (kernel.len() / 2) as i64;
    let (rows, cols) = data.dim();
    let mut out = Array2::zeros((rows, cols));
    for row in 0..rows as i64 {
        for col in 0..cols {
            let mut acc = 0.0;
            for (k, weight) in kernel.iter().enumerate() {
                let source = row + k as i64 - half;
                if source >= 0 && source < rows as i64 {
                    acc += weight * data[[source as usize, col]];
                }
            }
            out[[row as usize, col]] = acc;
        }
    }
    out
}
