use std::fmt;

use thiserror::Error;

use crate::near::Mismatch;
use crate::tolerance::ElementKind;

/// Which of the two compared arrays a shape fault refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Reference,
    Candidate,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reference => f.write_str("reference"),
            Self::Candidate => f.write_str("candidate"),
        }
    }
}

#[derive(Debug, Error)]
pub enum NearError {
    #[error("{side} buffer{} holds {len} elements, shape needs {needed}", batch_suffix(.batch))]
    BufferTooShort {
        side: Side,
        batch: Option<usize>,
        needed: usize,
        len: usize,
    },
    #[error("{side} holds {len} batch buffers, batch_count is {batch_count}")]
    MissingBatch {
        side: Side,
        batch_count: usize,
        len: usize,
    },
    #[error("cannot reinterpret host buffer: {reason}")]
    Interleaved { reason: String },
    #[error("{count} {kind} mismatches, first at {first}")]
    Mismatch {
        kind: ElementKind,
        count: usize,
        first: Mismatch,
    },
}

fn batch_suffix(batch: &Option<usize>) -> String {
    batch.map(|k| format!(" {k}")).unwrap_or_default()
}
