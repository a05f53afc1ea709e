//! The quadratic Mandelbrot formula z ← z² + c.

use fathom_core::{Complex, ComplexDelta, FixedComplex, FixedDecimal, FloatExpComplex};
use log::debug;

use crate::{Fractal, IterationResult, Perturbable, ReferenceOrbit, BAILOUT_NORM_SQ};

/// 1 / ln 2, for the smooth coloring correction.
const INV_LN_2: f64 = 1.4426950408889634;

pub struct Mandelbrot;

impl Fractal for Mandelbrot {
    fn iterate(&self, c: Complex, max_iterations: u32) -> IterationResult {
        let mut z = Complex::ZERO;
        for i in 0..max_iterations {
            z = z.square() + c;
            if z.norm_sq() > BAILOUT_NORM_SQ {
                return IterationResult::escaped(i, z.norm());
            }
        }
        IterationResult::interior(max_iterations)
    }

    fn continuous_value(&self, result: &IterationResult) -> f64 {
        if !result.escaped {
            return result.iteration as f64;
        }
        result.iteration as f64 + 1.0 - result.magnitude.ln().ln() * INV_LN_2
    }

    fn perturbation(&self) -> Option<&dyn Perturbable> {
        Some(self)
    }
}

impl Perturbable for Mandelbrot {
    fn reference_orbit(&self, center: &FixedComplex, max_iterations: u32) -> ReferenceOrbit {
        let bailout = FixedDecimal::from_f64(BAILOUT_NORM_SQ);
        let mut points = Vec::with_capacity(max_iterations as usize + 1);
        let mut z = FixedComplex::zero();
        let mut escape_iteration = max_iterations;

        for i in 0..max_iterations {
            points.push(z.to_complex());
            z = z.square().add(center);
            if z.norm_sq().gt(&bailout) {
                escape_iteration = i;
                break;
            }
        }
        // Record the final state too, escaped or not, so delta iteration
        // always has a point one past the rebase threshold.
        points.push(z.to_complex());

        debug!(
            "reference orbit: {} points, escape iteration {}",
            points.len(),
            escape_iteration
        );
        ReferenceOrbit {
            points,
            escape_iteration,
        }
    }

    fn iterate_perturbed(
        &self,
        delta: Complex,
        max_iterations: u32,
        orbit: &ReferenceOrbit,
    ) -> IterationResult {
        perturbed_loop(delta, max_iterations, orbit).0
    }

    fn iterate_perturbed_floatexp(
        &self,
        delta: FloatExpComplex,
        max_iterations: u32,
        orbit: &ReferenceOrbit,
    ) -> IterationResult {
        perturbed_loop(delta, max_iterations, orbit).0
    }
}

/// Delta iteration dzₙ₊₁ = (2·Zₙ + dzₙ)·dzₙ + δ against a reference orbit,
/// generic over the delta representation.
///
/// Convention for the reference index: it advances after the delta update
/// (post-increment), the actual value is read at the advanced index, and a
/// rebase fires when the actual orbit drops below the accumulated delta or
/// when the index reaches the orbit's escape iteration minus one. Under
/// this ordering the index never passes the recorded points.
///
/// Also returns the number of rebases, so tests can observe the
/// glitch-avoidance path firing.
pub(crate) fn perturbed_loop<D: ComplexDelta>(
    delta: D,
    max_iterations: u32,
    orbit: &ReferenceOrbit,
) -> (IterationResult, u32) {
    let rebase_threshold = (orbit.escape_iteration as usize).saturating_sub(1);
    let mut dz = D::zero();
    let mut ref_iteration = 0usize;
    let mut rebases = 0u32;

    for i in 0..max_iterations {
        let z_ref = orbit.points[ref_iteration];
        let two_z_ref = D::from_f64_pair(2.0 * z_ref.re, 2.0 * z_ref.im);
        dz = two_z_ref.add(&dz).mul(&dz).add(&delta);
        ref_iteration += 1;

        let z_next = orbit.points[ref_iteration];
        let z = D::from_f64_pair(z_next.re, z_next.im).add(&dz);
        let z_norm_sq = z.norm_sq();

        if z_norm_sq > BAILOUT_NORM_SQ {
            return (IterationResult::escaped(i, z_norm_sq.sqrt()), rebases);
        }

        // Rebase when the true orbit is closer to the origin than the
        // accumulated delta (drift would amplify), or when the reference
        // orbit is about to run out of points.
        if z_norm_sq < dz.norm_sq() || ref_iteration >= rebase_threshold {
            dz = z;
            ref_iteration = 0;
            rebases += 1;
        }
    }
    (IterationResult::interior(max_iterations), rebases)
}
