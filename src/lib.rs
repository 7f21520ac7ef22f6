//! Absolute-error near-checks between a reference result and an accelerated
//! one, for real, half-precision and complex column-major arrays in plain,
//! strided-batched and buffer-array layouts.

pub mod element;
pub mod error;
pub mod layout;
pub mod near;
pub mod tolerance;

pub use element::{abs_near, element_near, NearElement, Part};
pub use error::{NearError, Side};
pub use layout::Shape;
pub use near::{
    near_check_batched, near_check_batched_refs, near_check_general, near_check_strided_batched,
    Mismatch, NearReport,
};
pub use tolerance::{abs_error_for_sum, sum_error_tolerance, ElementKind, SQRT_HALF};
