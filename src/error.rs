//! Error types for registration, conversion and decoding.

use thiserror::Error;

/// Boxed error returned by injected marshal/unmarshal functions and by
/// the defaulting and validation hooks of a Kind.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// ConvertError covers every failure the engine can report.
#[derive(Debug, Error)]
pub enum ConvertError {
    /// The static registry is malformed. Detected once when the registry is
    /// built; nothing can be served until it is fixed.
    #[error("invalid registry: {message}")]
    Registration { message: String },

    /// A group, version, kind or conversion target is not registered.
    #[error("unknown {what}: {name}")]
    UnknownIdentity { what: &'static str, name: String },

    /// A traversal hop found no Kind accepting the current spec.
    #[error("no matching conversion for [{spec}] ({hop})")]
    NoMatchingConversion { spec: String, hop: String },

    /// A conversion function returned something other than a non-empty spec
    /// at the version the hop was heading to.
    #[error("conversion returned [{spec}], expected objects of {expected} ({hop})")]
    InvalidHopOutput {
        spec: String,
        expected: String,
        hop: String,
    },

    /// The input bytes or objects cannot be turned into a known Kind.
    #[error("malformed input: {message}")]
    MalformedInput { message: String },

    /// A persisted cache annotation does not describe the entry its key names.
    #[error("corrupted cache annotation {key:?}: {message}")]
    CacheCorruption { key: String, message: String },

    /// A Kind's own defaulting, validation or conversion code failed.
    #[error("{kind}: {message}")]
    Kind { kind: String, message: String },

    /// A Kind error raised while performing a traversal hop.
    #[error("cannot convert [{spec}] ({hop}): {source}")]
    Hop {
        spec: String,
        hop: String,
        #[source]
        source: Box<ConvertError>,
    },

    #[error("marshal: {0}")]
    Marshal(#[source] BoxError),

    #[error("unmarshal: {0}")]
    Unmarshal(#[source] BoxError),
}

impl ConvertError {
    /// Creates a registration error.
    pub fn registration(message: impl Into<String>) -> Self {
        ConvertError::Registration {
            message: message.into(),
        }
    }

    /// Creates an unknown identity error.
    pub fn unknown(what: &'static str, name: impl Into<String>) -> Self {
        ConvertError::UnknownIdentity {
            what,
            name: name.into(),
        }
    }

    /// Creates a no matching conversion error.
    pub fn no_match(spec: impl Into<String>, hop: impl Into<String>) -> Self {
        ConvertError::NoMatchingConversion {
            spec: spec.into(),
            hop: hop.into(),
        }
    }

    /// Creates an invalid hop output error.
    pub fn invalid_output(
        spec: impl Into<String>,
        expected: impl Into<String>,
        hop: impl Into<String>,
    ) -> Self {
        ConvertError::InvalidHopOutput {
            spec: spec.into(),
            expected: expected.into(),
            hop: hop.into(),
        }
    }

    /// Creates a malformed input error.
    pub fn malformed(message: impl Into<String>) -> Self {
        ConvertError::MalformedInput {
            message: message.into(),
        }
    }

    /// Creates a cache corruption error.
    pub fn corruption(key: impl Into<String>, message: impl Into<String>) -> Self {
        ConvertError::CacheCorruption {
            key: key.into(),
            message: message.into(),
        }
    }

    /// Creates an error raised by a Kind implementation.
    pub fn kind(kind: impl Into<String>, message: impl Into<String>) -> Self {
        ConvertError::Kind {
            kind: kind.into(),
            message: message.into(),
        }
    }

    /// Wraps an error with the hop it occurred on.
    pub fn hop(spec: impl Into<String>, hop: impl Into<String>, source: ConvertError) -> Self {
        ConvertError::Hop {
            spec: spec.into(),
            hop: hop.into(),
            source: Box::new(source),
        }
    }

    /// Returns true if the error was caused by caller input rather than by a
    /// defect in the registry or in a conversion function.
    pub fn is_recoverable(&self) -> bool {
        match self {
            ConvertError::UnknownIdentity { .. }
            | ConvertError::MalformedInput { .. }
            | ConvertError::CacheCorruption { .. }
            | ConvertError::Unmarshal(_) => true,
            ConvertError::Hop { source, .. } => source.is_recoverable(),
            _ => false,
        }
    }
}
