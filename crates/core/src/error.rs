use thiserror::Error;

/// Errors from identity-provider calls.
///
/// The split matters for what the end user sees: a `Rejected` message is
/// passed through to the landing page, while `Transport` failures surface
/// only a fixed generic string and the cause goes to the server log.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// The provider understood the request and refused it (invalid, expired,
    /// or replayed authorization code; revoked session).
    #[error("{message}")]
    Rejected { message: String },

    /// The call itself failed: provider unreachable, malformed response,
    /// unexpected status.
    #[error("provider transport error: {0}")]
    Transport(String),

    /// The provider answered success but returned no usable principal.
    #[error("provider returned no principal")]
    MissingPrincipal,
}

impl ProviderError {
    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    pub fn transport(cause: impl std::fmt::Display) -> Self {
        Self::Transport(cause.to_string())
    }
}
