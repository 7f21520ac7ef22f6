//! Batched near-checks over every supported layout.
//!
//! Each entry point resolves the element kind's cutoff scale once, validates
//! both sides against the shape, then visits batch, column and row in that
//! order and records every element that falls outside the bound.
//!
//! The buffer-array entry points additionally apply the NaN gate: a NaN in the
//! reference passes only when the candidate is NaN at the same position, and
//! the tolerance check is skipped for that element. The plain and strided
//! entry points do not.

use std::fmt;

use log::{debug, info, warn};

use crate::element::{component_mismatches, nan_gate, NearElement, Part};
use crate::error::{NearError, Side};
use crate::layout::{BatchedView, BufferArray, Shape, Strided};
use crate::tolerance::ElementKind;

/// One failing element position (one component for complex kinds).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mismatch {
    pub row: usize,
    pub col: usize,
    pub batch: usize,
    pub part: Part,
    pub expected: f64,
    pub actual: f64,
    /// Imaginary part of a complex candidate that failed the NaN gate.
    pub actual_imag: Option<f64>,
    /// Effective bound after cutoff scaling.
    pub bound: f64,
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, batch {}) {:?}: expected {}, got {}",
            self.row, self.col, self.batch, self.part, self.expected, self.actual
        )?;
        if let Some(imag) = self.actual_imag {
            write!(f, "{imag:+}i")?;
        }
        if self.part != Part::Nan {
            write!(
                f,
                ", |diff| {} > {}",
                (self.expected - self.actual).abs(),
                self.bound
            )?;
        }
        Ok(())
    }
}

/// Outcome of one near-check call.
#[derive(Debug, Clone)]
pub struct NearReport {
    kind: ElementKind,
    shape: Shape,
    bound: f64,
    checked: usize,
    mismatches: Vec<Mismatch>,
}

impl NearReport {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.mismatches.is_empty()
    }

    #[must_use]
    pub fn mismatches(&self) -> &[Mismatch] {
        &self.mismatches
    }

    #[must_use]
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    #[must_use]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    /// Bound actually applied to each component.
    #[must_use]
    pub fn bound(&self) -> f64 {
        self.bound
    }

    /// Number of element positions visited.
    #[must_use]
    pub fn checked(&self) -> usize {
        self.checked
    }

    pub fn into_result(self) -> Result<Self, NearError> {
        match self.mismatches.first() {
            None => Ok(self),
            Some(&first) => Err(NearError::Mismatch {
                kind: self.kind,
                count: self.mismatches.len(),
                first,
            }),
        }
    }

    /// Panics with every mismatch listed when the check failed.
    #[track_caller]
    pub fn assert_ok(&self) {
        if self.passed() {
            return;
        }
        let listing: Vec<String> = self.mismatches.iter().map(ToString::to_string).collect();
        panic!(
            "{} {} mismatches in {} elements (bound {}):\n  {}",
            self.mismatches.len(),
            self.kind,
            self.checked,
            self.bound,
            listing.join("\n  ")
        );
    }
}

fn run<T, V>(
    shape: Shape,
    reference: &V,
    candidate: &V,
    abs_error: f64,
    gate_nan: bool,
) -> Result<NearReport, NearError>
where
    T: NearElement,
    V: BatchedView<T>,
{
    reference.validate(&shape, Side::Reference)?;
    candidate.validate(&shape, Side::Candidate)?;

    let bound = abs_error * T::KIND.cutoff_scale();
    debug!(
        "near check {}: {}x{} x{} lda={} bound={} nan_gate={}",
        T::KIND,
        shape.m,
        shape.n,
        shape.batch_count,
        shape.lda,
        bound,
        gate_nan
    );

    let mut mismatches = Vec::new();
    for k in 0..shape.batch_count {
        for j in 0..shape.n {
            for i in 0..shape.m {
                let expected = reference.at(i, j, k, shape.lda);
                let actual = candidate.at(i, j, k, shape.lda);

                if gate_nan {
                    if let Some(matched) = nan_gate(expected, actual) {
                        if !matched {
                            let (re, im) = actual.components();
                            mismatches.push(Mismatch {
                                row: i,
                                col: j,
                                batch: k,
                                part: Part::Nan,
                                expected: f64::NAN,
                                actual: re,
                                actual_imag: im,
                                bound,
                            });
                        }
                        continue;
                    }
                }

                mismatches.extend(component_mismatches(expected, actual, bound).map(|c| {
                    Mismatch {
                        row: i,
                        col: j,
                        batch: k,
                        part: c.part,
                        expected: c.expected,
                        actual: c.actual,
                        actual_imag: None,
                        bound,
                    }
                }));
            }
        }
    }

    for mismatch in &mismatches {
        warn!("{} mismatch at {}", T::KIND, mismatch);
    }
    let report = NearReport {
        kind: T::KIND,
        shape,
        bound,
        checked: shape.elements(),
        mismatches,
    };
    if report.passed() {
        info!("near check {} passed: {} elements", report.kind, report.checked);
    } else {
        warn!(
            "near check {} failed: {} mismatches in {} elements",
            report.kind,
            report.mismatches.len(),
            report.checked
        );
    }
    Ok(report)
}

/// Compares one column-major `m` x `n` matrix.
pub fn near_check_general<T: NearElement>(
    m: usize,
    n: usize,
    lda: usize,
    reference: &[T],
    candidate: &[T],
    abs_error: f64,
) -> Result<NearReport, NearError> {
    near_check_strided_batched(m, n, 1, lda, 0, reference, candidate, abs_error)
}

/// Compares `batch_count` matrices laid out `stride` elements apart in one buffer.
#[allow(clippy::too_many_arguments)]
pub fn near_check_strided_batched<T: NearElement>(
    m: usize,
    n: usize,
    batch_count: usize,
    lda: usize,
    stride: usize,
    reference: &[T],
    candidate: &[T],
    abs_error: f64,
) -> Result<NearReport, NearError> {
    let shape = Shape { m, n, batch_count, lda };
    run::<T, _>(
        shape,
        &Strided::new(reference, stride),
        &Strided::new(candidate, stride),
        abs_error,
        false,
    )
}

/// Compares one owned buffer per batch, with the NaN gate.
pub fn near_check_batched<T: NearElement>(
    m: usize,
    n: usize,
    batch_count: usize,
    lda: usize,
    reference: &[Vec<T>],
    candidate: &[Vec<T>],
    abs_error: f64,
) -> Result<NearReport, NearError> {
    let shape = Shape { m, n, batch_count, lda };
    run::<T, _>(
        shape,
        &BufferArray::new(reference),
        &BufferArray::new(candidate),
        abs_error,
        true,
    )
}

/// Compares one borrowed buffer per batch, with the NaN gate.
pub fn near_check_batched_refs<T: NearElement>(
    m: usize,
    n: usize,
    batch_count: usize,
    lda: usize,
    reference: &[&[T]],
    candidate: &[&[T]],
    abs_error: f64,
) -> Result<NearReport, NearError> {
    let shape = Shape { m, n, batch_count, lda };
    run::<T, _>(
        shape,
        &BufferArray::new(reference),
        &BufferArray::new(candidate),
        abs_error,
        true,
    )
}
