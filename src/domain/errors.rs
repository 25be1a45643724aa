// Domain-level errors surfaced by ports.

use thiserror::Error;

/// Failures reported by the rendering surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SurfaceError {
    #[error("rendering surface is no longer available")]
    Unavailable,
    #[error("id `{0}` is already registered on the surface")]
    DuplicateId(String),
    #[error("id `{0}` is not registered on the surface")]
    UnknownId(String),
    #[error("source `{0}` is still referenced by a layer")]
    SourceInUse(String),
}

/// Failures while materializing the fleet collections.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("failed to read fixture `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: serde_json::Error,
    },
    #[error("{0}")]
    Invalid(String),
}
