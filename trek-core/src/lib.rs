pub mod identity;
pub mod repository;

pub use identity::{AuthSession, CreateProfileRequest, Profile, Role};

/// Error taxonomy shared by every data-access operation. Callers do not
/// recover locally; errors propagate to the surface layer, which renders
/// a message and halts the affected flow.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    /// An operation that needs a session was called without one.
    #[error("not authenticated")]
    NotAuthenticated,

    /// The data service rejected a query or mutation. The message is the
    /// service's own, passed through verbatim.
    #[error("remote query failed: {0}")]
    RemoteQuery(String),

    /// A mutation targeted a row that does not exist. Lookups by id
    /// return `Option` instead of this.
    #[error("{0} not found")]
    NotFound(&'static str),
}

impl CoreError {
    /// Wrap a driver error, keeping its message intact.
    pub fn remote(err: impl std::fmt::Display) -> Self {
        CoreError::RemoteQuery(err.to_string())
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
