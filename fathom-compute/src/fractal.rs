//! Escape-time fractal contract.
//!
//! A formula implements [`Fractal`]; formulas that additionally support
//! perturbation-theory evaluation expose it through
//! [`Fractal::perturbation`]. The split keeps both traits object-safe so
//! the renderer can probe the capability before the parallel phase.

use fathom_core::{Complex, FixedComplex, FloatExpComplex};

use crate::ReferenceOrbit;

/// Squared bailout radius shared by every escape-time formula (radius 10).
pub const BAILOUT_NORM_SQ: f64 = 100.0;

/// Outcome of one escape-time evaluation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IterationResult {
    pub escaped: bool,
    pub iteration: u32,
    /// |z| at bailout. NaN for interior points; only meaningful when escaped.
    pub magnitude: f64,
}

impl IterationResult {
    pub fn escaped(iteration: u32, magnitude: f64) -> Self {
        Self {
            escaped: true,
            iteration,
            magnitude,
        }
    }

    /// Iteration-cap exhaustion: the defined "did not escape" outcome,
    /// never an error.
    pub fn interior(max_iterations: u32) -> Self {
        Self {
            escaped: false,
            iteration: max_iterations,
            magnitude: f64::NAN,
        }
    }
}

/// An escape-time fractal formula.
pub trait Fractal: Sync {
    /// Direct native-precision escape-time iteration from z₀ = 0.
    fn iterate(&self, c: Complex, max_iterations: u32) -> IterationResult;

    /// Smooth fractional iteration value for coloring. Interior results
    /// map to their raw iteration count.
    fn continuous_value(&self, result: &IterationResult) -> f64;

    /// The formula's perturbation contract, if it has one.
    fn perturbation(&self) -> Option<&dyn Perturbable> {
        None
    }
}

/// Perturbation-theory evaluation against a precomputed reference orbit.
pub trait Perturbable: Sync {
    /// Iterate the recurrence at full fixed-point precision around
    /// `center`, recording the downcast orbit.
    fn reference_orbit(&self, center: &FixedComplex, max_iterations: u32) -> ReferenceOrbit;

    /// Delta iteration with a native-precision delta.
    fn iterate_perturbed(
        &self,
        delta: Complex,
        max_iterations: u32,
        orbit: &ReferenceOrbit,
    ) -> IterationResult;

    /// Delta iteration with an extended-exponent delta, for zooms where
    /// the delta magnitude underflows f64.
    fn iterate_perturbed_floatexp(
        &self,
        delta: FloatExpComplex,
        max_iterations: u32,
        orbit: &ReferenceOrbit,
    ) -> IterationResult;
}
