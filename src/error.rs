use ark_serialize::SerializationError;
use thiserror::Error;

use crate::parameters::Curve;

/// Errors raised by the ceremony core.
///
/// A contribution that fails verification is not an error: the verifier
/// reports it as `false`. Only inputs that cannot be decoded and requests
/// the ceremony cannot honour end up here.
#[derive(Debug, Error)]
pub enum CeremonyError {
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Usage(#[from] UsageError),
}

/// The bytes handed to a decoder do not describe a well formed artifact.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("{artifact} must be {expected} bytes long, found {found}")]
    Length {
        artifact: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("invalid {group} point at index {index}")]
    Point {
        group: &'static str,
        index: usize,
        #[source]
        source: SerializationError,
    },
    #[error("invalid scalar encoding")]
    Scalar(#[source] SerializationError),
    #[error("result header announces a domain of {0} elements, which this ceremony cannot hold")]
    DomainHeader(u64),
}

/// The caller asked for something the ceremony cannot provide.
#[derive(Debug, Error)]
pub enum UsageError {
    #[error("the number of powers must be a nonzero power of two no larger than 2^28, got {0}")]
    InvalidNumPowers(usize),
    #[error("the ceremony is configured for {configured} but {requested} was used")]
    CurveMismatch { configured: Curve, requested: Curve },
    #[error("the accumulator holds {found} powers but the ceremony expects {expected}")]
    SizeMismatch { expected: usize, found: usize },
    #[error("the evaluation domain must hold at least one element")]
    EmptyDomain,
    #[error("the scalar field has no evaluation domain of size {0}")]
    UnsupportedDomain(usize),
    #[error("a domain of {requested} elements rounds up past the ceremony capacity of {capacity}")]
    DomainTooLarge { requested: usize, capacity: usize },
    #[error("the zero scalar cannot be used as a contribution")]
    ZeroScalar,
    #[error("invalid ceremony profile")]
    Profile(#[from] serde_json::Error),
}

impl From<serde_json::Error> for CeremonyError {
    fn from(err: serde_json::Error) -> Self {
        CeremonyError::Usage(UsageError::Profile(err))
    }
}
