//! Render error types.

use fathom_core::NumericError;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum RenderError {
    /// A deep-zoom mode was selected for a formula that does not implement
    /// the perturbable contract. Detected before the parallel phase starts.
    #[error("fractal formula does not support perturbation")]
    UnsupportedOperation,

    #[error(transparent)]
    Numeric(#[from] NumericError),
}
