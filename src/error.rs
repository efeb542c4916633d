use thiserror::Error;

use crate::labels::LabelId;

/// Errors raised by the containers, the arrangement builder and the text
/// formats.
///
/// Every variant except [`Error::Io`] and [`Error::Parse`] reports a
/// violated precondition: the operation that returns it has no effect.
#[derive(Debug, Error)]
pub enum Error {
    #[error("label types already initialized")]
    LabelsAlreadyDeclared,

    #[error("segments not initialized")]
    NoSegments,

    #[error("the number of label data ({found}) does not match the number of segments ({expected})")]
    LabelCountMismatch { expected: usize, found: usize },

    #[error("unable to add elements after labels initialization")]
    AppendAfterLabels,

    #[error("label {0} is not declared")]
    UnknownLabel(LabelId),

    #[error("label {0} is required but missing")]
    MissingLabel(LabelId),

    #[error("segment {id} is out of range for a set of {len} segments")]
    SegmentOutOfRange { id: usize, len: usize },

    #[error("validation failed: segment set is not a chain (break after segment {index})")]
    NotAChain { index: usize },

    #[error("validation failed: segment set is not a circuit (break after segment {index})")]
    NotACircuit { index: usize },

    #[error("unsupported point/segment intersection configuration between segments {first} and {second}")]
    UnsupportedIntersection { first: usize, second: usize },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}

/// Convenience type alias for results using [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
