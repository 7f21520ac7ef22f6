//! Index resolution for the supported batched layouts, plus views over raw
//! device readbacks.

use half::f16;
use num_complex::{Complex32, Complex64};

use crate::error::{NearError, Side};

/// Logical shape shared by the reference and candidate arrays.
///
/// Column-major: `m` rows, `n` columns, `lda` elements between columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub m: usize,
    pub n: usize,
    pub batch_count: usize,
    pub lda: usize,
}

impl Shape {
    #[must_use]
    pub fn elements(&self) -> usize {
        self.m * self.n * self.batch_count
    }

    /// Elements one column-major slice spans, or zero for an empty slice.
    /// `None` when the span does not fit in `usize`.
    #[must_use]
    pub fn slice_span(&self) -> Option<usize> {
        if self.m == 0 || self.n == 0 {
            return Some(0);
        }
        (self.n - 1)
            .checked_mul(self.lda)?
            .checked_add(self.m)
    }
}

#[inline]
#[must_use]
pub fn strided_offset(i: usize, j: usize, k: usize, lda: usize, stride: usize) -> usize {
    i + j * lda + k * stride
}

#[inline]
#[must_use]
pub fn column_offset(i: usize, j: usize, lda: usize) -> usize {
    i + j * lda
}

/// Resolves the (row, column, batch) element of one side of a comparison.
pub trait BatchedView<T> {
    fn at(&self, i: usize, j: usize, k: usize, lda: usize) -> T;

    /// Checks that every index the shape implies is in bounds.
    fn validate(&self, shape: &Shape, side: Side) -> Result<(), NearError>;
}

/// One contiguous buffer with `stride` elements between batches.
#[derive(Debug, Clone, Copy)]
pub struct Strided<'a, T> {
    data: &'a [T],
    stride: usize,
}

impl<'a, T> Strided<'a, T> {
    pub fn new(data: &'a [T], stride: usize) -> Self {
        Self { data, stride }
    }
}

impl<T: Copy> BatchedView<T> for Strided<'_, T> {
    #[inline]
    fn at(&self, i: usize, j: usize, k: usize, lda: usize) -> T {
        self.data[strided_offset(i, j, k, lda, self.stride)]
    }

    fn validate(&self, shape: &Shape, side: Side) -> Result<(), NearError> {
        let too_short = |needed| NearError::BufferTooShort {
            side,
            batch: None,
            needed,
            len: self.data.len(),
        };
        let Some(span) = shape.slice_span() else {
            return Err(too_short(usize::MAX));
        };
        if span == 0 || shape.batch_count == 0 {
            return Ok(());
        }
        let needed = (shape.batch_count - 1)
            .checked_mul(self.stride)
            .and_then(|offset| offset.checked_add(span))
            .ok_or_else(|| too_short(usize::MAX))?;
        if self.data.len() < needed {
            return Err(too_short(needed));
        }
        Ok(())
    }
}

/// One buffer per batch index. `B` is `Vec<T>` for owned buffers or `&[T]`
/// for borrowed ones.
#[derive(Debug, Clone, Copy)]
pub struct BufferArray<'a, B> {
    buffers: &'a [B],
}

impl<'a, B> BufferArray<'a, B> {
    pub fn new(buffers: &'a [B]) -> Self {
        Self { buffers }
    }
}

impl<T: Copy, B: AsRef<[T]>> BatchedView<T> for BufferArray<'_, B> {
    #[inline]
    fn at(&self, i: usize, j: usize, k: usize, lda: usize) -> T {
        self.buffers[k].as_ref()[column_offset(i, j, lda)]
    }

    fn validate(&self, shape: &Shape, side: Side) -> Result<(), NearError> {
        if self.buffers.len() < shape.batch_count {
            return Err(NearError::MissingBatch {
                side,
                batch_count: shape.batch_count,
                len: self.buffers.len(),
            });
        }
        let needed = shape.slice_span().ok_or(NearError::BufferTooShort {
            side,
            batch: None,
            needed: usize::MAX,
            len: 0,
        })?;
        for (k, buffer) in self.buffers[..shape.batch_count].iter().enumerate() {
            let len = buffer.as_ref().len();
            if len < needed {
                return Err(NearError::BufferTooShort {
                    side,
                    batch: Some(k),
                    needed,
                    len,
                });
            }
        }
        Ok(())
    }
}

fn pod_error(err: bytemuck::PodCastError) -> NearError {
    NearError::Interleaved {
        reason: format!("{err:?}"),
    }
}

/// Views an interleaved `[re, im, re, im, ..]` f32 readback as complex values.
pub fn complex32_from_interleaved(raw: &[f32]) -> Result<&[Complex32], NearError> {
    bytemuck::try_cast_slice(raw).map_err(pod_error)
}

/// Views an interleaved `[re, im, re, im, ..]` f64 readback as complex values.
pub fn complex64_from_interleaved(raw: &[f64]) -> Result<&[Complex64], NearError> {
    bytemuck::try_cast_slice(raw).map_err(pod_error)
}

/// Views raw binary16 words as half-precision values.
pub fn half_from_bits(raw: &[u16]) -> Result<&[f16], NearError> {
    bytemuck::try_cast_slice(raw).map_err(pod_error)
}
