//! Reference orbit storage for perturbation rendering.

use fathom_core::Complex;

/// A reference orbit computed at full fixed-point precision and stored at
/// native precision for fast delta iteration.
///
/// `points` holds the pre-update z of every step plus the final (possibly
/// escaped) state, so it is `escape_iteration + 2` entries long when the
/// orbit escapes and `max_iterations + 1` when it does not. Owned by the
/// renderer for one render pass and read-only during the parallel phase.
#[derive(Clone, Debug)]
pub struct ReferenceOrbit {
    pub points: Vec<Complex>,
    /// Iteration at which the orbit escaped, or the iteration cap if it
    /// never did.
    pub escape_iteration: u32,
}

impl ReferenceOrbit {
    pub fn escaped(&self) -> bool {
        (self.escape_iteration as usize) + 2 == self.points.len()
    }
}
