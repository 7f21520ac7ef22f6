use std::fmt;

use crate::element::NearElement;

/// sqrt(0.5), applied to the bound before complex values are compared component-wise.
pub const SQRT_HALF: f64 = 0.7071067811865475244;

const HALF_SUM_TOLERANCE: f64 = 1.0 / 900.0;
const COMPLEX64_SUM_TOLERANCE: f64 = 1.0 / 10_000.0;
const COMPLEX128_SUM_TOLERANCE: f64 = 1.0 / 1_000_000.0;

/// Numeric representation of the array entries under comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Real32,
    Real64,
    Half,
    Complex64,
    Complex128,
}

impl ElementKind {
    /// Per-term summation error growth. Multiply by the number of terms in a
    /// sum to get an absolute bound; real kinds expect an exact bound from the caller.
    #[must_use]
    pub fn sum_error_tolerance(self) -> f64 {
        match self {
            Self::Real32 | Self::Real64 => 0.0,
            Self::Half => HALF_SUM_TOLERANCE,
            Self::Complex64 => COMPLEX64_SUM_TOLERANCE,
            Self::Complex128 => COMPLEX128_SUM_TOLERANCE,
        }
    }

    /// Factor applied to the caller's bound before each component check.
    #[must_use]
    pub fn cutoff_scale(self) -> f64 {
        if self.is_complex() {
            SQRT_HALF
        } else {
            1.0
        }
    }

    #[must_use]
    pub fn is_complex(self) -> bool {
        matches!(self, Self::Complex64 | Self::Complex128)
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Real32 => "real32",
            Self::Real64 => "real64",
            Self::Half => "half",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summation tolerance keyed by element type.
#[must_use]
pub fn sum_error_tolerance<T: NearElement>() -> f64 {
    T::KIND.sum_error_tolerance()
}

/// Absolute bound for a sum of `terms` products, e.g. the K dimension of a GEMM.
#[must_use]
pub fn abs_error_for_sum(kind: ElementKind, terms: usize) -> f64 {
    kind.sum_error_tolerance() * terms as f64
}
