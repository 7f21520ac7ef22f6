//! Per-element comparison for every supported element kind.

use half::f16;
use num_complex::{Complex32, Complex64};

use crate::tolerance::ElementKind;

/// Which part of an element a discrepancy was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Part {
    /// The value of a real element.
    Value,
    Real,
    Imag,
    /// Reference was NaN but the candidate was not.
    Nan,
}

/// Absolute-error check on two widened values.
///
/// NaN only matches NaN. Equal values always pass, so same-signed infinities
/// compare equal even though their difference is NaN. Otherwise the bound is
/// inclusive: `|a - b| <= err`.
#[must_use]
pub fn abs_near(a: f64, b: f64, err: f64) -> bool {
    if a.is_nan() || b.is_nan() {
        return a.is_nan() && b.is_nan();
    }
    a == b || (a - b).abs() <= err
}

/// An element type the near-check can compare.
pub trait NearElement: Copy {
    const KIND: ElementKind;

    fn is_nan(self) -> bool;

    /// Real part and, for complex kinds, imaginary part, widened to `f64`.
    fn components(self) -> (f64, Option<f64>);
}

impl NearElement for f32 {
    const KIND: ElementKind = ElementKind::Real32;

    fn is_nan(self) -> bool {
        f32::is_nan(self)
    }

    fn components(self) -> (f64, Option<f64>) {
        (f64::from(self), None)
    }
}

impl NearElement for f64 {
    const KIND: ElementKind = ElementKind::Real64;

    fn is_nan(self) -> bool {
        f64::is_nan(self)
    }

    fn components(self) -> (f64, Option<f64>) {
        (self, None)
    }
}

impl NearElement for f16 {
    const KIND: ElementKind = ElementKind::Half;

    fn is_nan(self) -> bool {
        f16::is_nan(self)
    }

    // Widened through f32 so no half-precision arithmetic is involved.
    fn components(self) -> (f64, Option<f64>) {
        (f64::from(self.to_f32()), None)
    }
}

impl NearElement for Complex32 {
    const KIND: ElementKind = ElementKind::Complex64;

    fn is_nan(self) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }

    fn components(self) -> (f64, Option<f64>) {
        (f64::from(self.re), Some(f64::from(self.im)))
    }
}

impl NearElement for Complex64 {
    const KIND: ElementKind = ElementKind::Complex128;

    fn is_nan(self) -> bool {
        self.re.is_nan() || self.im.is_nan()
    }

    fn components(self) -> (f64, Option<f64>) {
        (self.re, Some(self.im))
    }
}

/// A component pair that failed the absolute-error check.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ComponentMismatch {
    pub part: Part,
    pub expected: f64,
    pub actual: f64,
}

/// Every failing component of `candidate` against `reference` under bound `err`.
///
/// `err` is the effective bound; complex scaling must already be applied.
pub fn component_mismatches<T: NearElement>(
    reference: T,
    candidate: T,
    err: f64,
) -> impl Iterator<Item = ComponentMismatch> {
    let (ref_re, ref_im) = reference.components();
    let (cand_re, cand_im) = candidate.components();
    let first = if T::KIND.is_complex() { Part::Real } else { Part::Value };

    std::iter::once((first, ref_re, cand_re))
        .chain(ref_im.zip(cand_im).map(|(e, a)| (Part::Imag, e, a)))
        .filter(move |&(_, expected, actual)| !abs_near(expected, actual, err))
        .map(|(part, expected, actual)| ComponentMismatch {
            part,
            expected,
            actual,
        })
}

/// True when every component of the pair is within `err`.
#[must_use]
pub fn element_near<T: NearElement>(reference: T, candidate: T, err: f64) -> bool {
    component_mismatches(reference, candidate, err).next().is_none()
}

/// NaN-equivalence gate used by the buffer-array checks.
///
/// Returns `None` when the reference is not NaN and the ordinary comparator
/// should decide; otherwise whether the candidate is NaN as well.
#[must_use]
pub fn nan_gate<T: NearElement>(reference: T, candidate: T) -> Option<bool> {
    reference.is_nan().then(|| candidate.is_nan())
}
