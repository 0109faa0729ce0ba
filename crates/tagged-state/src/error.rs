//! Error types for tag-codec dispatch.

use thiserror::Error;

/// Error type user-supplied marshal/unmarshal functions may raise.
///
/// The codec never inspects or translates these; they propagate to the
/// caller unchanged through [`CodecError::User`].
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Errors raised by [`ObjectCodec`](crate::ObjectCodec) dispatch.
///
/// The two lookup variants are configuration errors: the caller registered
/// the type in one process but not the other, or the wire carries a tag
/// from a newer peer. Neither is retryable within a single encode/decode
/// call.
#[derive(Debug, Error)]
pub enum CodecError {
    /// The encode path found no marshaller registered for the runtime type.
    /// Carries the fully qualified type name.
    #[error("no marshaller found for type \"{0}\"")]
    UnknownType(&'static str),

    /// The decode path unwrapped a tag naming a type with no registered
    /// unmarshaller. Carries the unresolved type name.
    #[error("no unmarshaller found for type \"{0}\"")]
    UnknownTag(String),

    /// An error raised by a user-supplied marshal/unmarshal function,
    /// propagated unchanged.
    #[error(transparent)]
    User(#[from] BoxError),
}
