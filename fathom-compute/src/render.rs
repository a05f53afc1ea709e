//! Render orchestration: precision-mode selection, reference orbit setup,
//! and the row-parallel pixel loop.

use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Instant;

use fathom_core::{Complex, FixedComplex, FixedDecimal};
use log::{debug, info};
use rayon::prelude::*;

use crate::{Fractal, Palette, Perturbable, ReferenceOrbit, RenderError, Rgb};

/// Numeric strategy for one render pass, selected from the pixel spacing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    /// Direct f64 iteration per pixel.
    Default,
    /// Perturbation with f64 deltas against a fixed-point reference orbit.
    HighPrecision,
    /// Perturbation with extended-exponent deltas, for pixel spacings
    /// below the f64 subnormal floor.
    HighPrecisionWithFloatExp,
}

impl RenderMode {
    pub fn for_pixel_spacing(spacing: f64) -> Self {
        if spacing < 1e-300 {
            RenderMode::HighPrecisionWithFloatExp
        } else if spacing < 1e-15 {
            RenderMode::HighPrecision
        } else {
            RenderMode::Default
        }
    }

    pub fn needs_reference_orbit(&self) -> bool {
        !matches!(self, RenderMode::Default)
    }
}

/// Callback for row-completion progress during the parallel phase.
/// Invoked from worker threads.
pub trait ProgressObserver: Sync {
    fn rows_completed(&self, completed: u32, total: u32);
}

/// A rendered frame, rows stored top to bottom.
#[derive(Clone, Debug)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl ImageBuffer {
    fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; (width as usize) * (height as usize)],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Rgb {
        self.pixels[(y as usize) * (self.width as usize) + (x as usize)]
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }
}

/// Renders one frame of an escape-time fractal.
///
/// The view is held twice: at full fixed-point precision for deep zooms,
/// and as lossy f64 downcasts for mode selection and the direct path.
pub struct FractalRenderer<F: Fractal> {
    fractal: F,
    width: u32,
    height: u32,
    max_iterations: u32,
    center_deep: FixedComplex,
    zoom_deep: FixedDecimal,
    center: Complex,
    zoom: f64,
}

impl<F: Fractal> FractalRenderer<F> {
    pub fn new(
        fractal: F,
        width: u32,
        height: u32,
        max_iterations: u32,
        center_deep: FixedComplex,
        zoom_deep: FixedDecimal,
    ) -> Self {
        let center = center_deep.to_complex();
        let zoom = zoom_deep.to_f64();
        Self {
            fractal,
            width,
            height,
            max_iterations,
            center_deep,
            zoom_deep,
            center,
            zoom,
        }
    }

    /// Distance between adjacent pixel centers on the complex plane.
    /// Zero when the zoom overflows f64, which still selects the deepest
    /// mode.
    pub fn pixel_spacing(&self) -> f64 {
        1.0 / (self.width as f64 * self.zoom)
    }

    pub fn render_mode(&self) -> RenderMode {
        RenderMode::for_pixel_spacing(self.pixel_spacing())
    }

    pub fn render<P: Palette>(
        &self,
        palette: &P,
        progress: Option<&dyn ProgressObserver>,
    ) -> Result<ImageBuffer, RenderError> {
        let mode = self.render_mode();
        info!(
            "rendering {}x{} at {} iterations, mode {:?}",
            self.width, self.height, self.max_iterations, mode
        );

        let orbit = if mode.needs_reference_orbit() {
            let perturbable = self
                .fractal
                .perturbation()
                .ok_or(RenderError::UnsupportedOperation)?;
            let inv_zoom = FixedDecimal::one().div(&self.zoom_deep)?;
            let started = Instant::now();
            let orbit = perturbable.reference_orbit(&self.center_deep, self.max_iterations);
            debug!("reference orbit computed in {:?}", started.elapsed());
            Some((perturbable, orbit, inv_zoom))
        } else {
            None
        };

        let mut image = ImageBuffer::new(self.width, self.height);
        let rows_done = AtomicU32::new(0);
        let height = self.height;

        image
            .pixels
            .par_chunks_mut(self.width as usize)
            .enumerate()
            .for_each(|(y, row)| {
                for (x, out) in row.iter_mut().enumerate() {
                    let value = match &orbit {
                        Some((perturbable, orbit, inv_zoom)) => self.perturbed_value(
                            x as u32, y as u32, mode, *perturbable, orbit, inv_zoom,
                        ),
                        None => self.direct_value(x as u32, y as u32),
                    };
                    *out = palette.sample(value);
                }
                if let Some(observer) = progress {
                    let done = rows_done.fetch_add(1, Ordering::Relaxed) + 1;
                    observer.rows_completed(done, height);
                }
            });

        Ok(image)
    }

    /// Normalized device coordinates: x spans the aspect-corrected width,
    /// y spans [-0.5, 0.5] with screen-down mapping to imaginary-down.
    fn ndc(&self, x: u32, y: u32) -> (f64, f64) {
        let aspect = self.width as f64 / self.height as f64;
        let ndc_x = (x as f64 / self.width as f64 - 0.5) * aspect;
        let ndc_y = -(y as f64 / self.height as f64 - 0.5);
        (ndc_x, ndc_y)
    }

    fn direct_value(&self, x: u32, y: u32) -> f64 {
        let (ndc_x, ndc_y) = self.ndc(x, y);
        let c = self.center + Complex::new(ndc_x / self.zoom, ndc_y / self.zoom);
        let result = self.fractal.iterate(c, self.max_iterations);
        self.fractal.continuous_value(&result)
    }

    fn perturbed_value(
        &self,
        x: u32,
        y: u32,
        mode: RenderMode,
        perturbable: &dyn Perturbable,
        orbit: &ReferenceOrbit,
        inv_zoom: &FixedDecimal,
    ) -> f64 {
        // The center pixel's delta is ~0, where the delta recurrence can
        // degenerate; the orbit already is that pixel's iteration.
        if x == self.width / 2 && y == self.height / 2 {
            return orbit.escape_iteration as f64;
        }

        let (ndc_x, ndc_y) = self.ndc(x, y);
        // The pixel offset is exact at fixed-point precision; it only
        // narrows to the delta representation at the last step.
        let delta = FixedComplex::new(
            FixedDecimal::from_f64(ndc_x).mul(inv_zoom),
            FixedDecimal::from_f64(ndc_y).mul(inv_zoom),
        );

        let result = match mode {
            RenderMode::HighPrecisionWithFloatExp => perturbable.iterate_perturbed_floatexp(
                delta.to_floatexp_complex(),
                self.max_iterations,
                orbit,
            ),
            _ => perturbable.iterate_perturbed(delta.to_complex(), self.max_iterations, orbit),
        };
        self.fractal.continuous_value(&result)
    }
}
