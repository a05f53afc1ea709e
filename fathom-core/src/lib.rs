pub mod complex;
pub mod delta;
pub mod error;
pub mod fixed_complex;
pub mod fixed_decimal;
pub mod floatexp;
pub mod floatexp_complex;

pub use complex::Complex;
pub use delta::ComplexDelta;
pub use error::NumericError;
pub use fixed_complex::FixedComplex;
pub use fixed_decimal::{FixedDecimal, PRECISION};
pub use floatexp::FloatExp;
pub use floatexp_complex::FloatExpComplex;
