//! Escape-time fractal computation: formula traits, perturbation-theory
//! rendering against fixed-point reference orbits, palettes, and the
//! row-parallel render orchestrator.

pub mod error;
pub mod fractal;
pub mod mandelbrot;
pub mod palette;
pub mod reference_orbit;
pub mod render;

pub use error::RenderError;
pub use fractal::{Fractal, IterationResult, Perturbable, BAILOUT_NORM_SQ};
pub use mandelbrot::Mandelbrot;
pub use palette::{ColorStop, GradientPalette, Palette, Rgb};
pub use reference_orbit::ReferenceOrbit;
pub use render::{FractalRenderer, ImageBuffer, ProgressObserver, RenderMode};
