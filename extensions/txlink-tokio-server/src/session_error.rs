use std::fmt;

/// Routing failures surfaced to the dispatcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The client id did not parse as `application_id:ip:port`.
    InvalidClientId(String),

    /// No live resource-manager connection could serve the lookup, after
    /// exhausting the exact, same-host and same-application fallbacks.
    NoSuitableSession {
        resource_id: String,
        client_id: String,
    },
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::InvalidClientId(client_id) => {
                write!(f, "invalid rpc client id: {}", client_id)
            }
            SessionError::NoSuitableSession {
                resource_id,
                client_id,
            } => {
                write!(
                    f,
                    "there is no suitable session for resource {} (client {})",
                    resource_id, client_id
                )
            }
        }
    }
}

impl std::error::Error for SessionError {}
