pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";
pub const SERVICE_UNAVAILABLE_MESSAGE: &str = "Service is unavailable. Please try again later.";

/// Every client-facing failure of an outbound call. `Display` always yields a
/// message that is safe to show to an operator; raw bodies and transport
/// diagnostics never reach it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RequestError {
    #[error("{}", SERVICE_UNAVAILABLE_MESSAGE)]
    Transport,
    #[error("{message}")]
    Application { status: u16, message: String },
    #[error("{}", GENERIC_ERROR_MESSAGE)]
    Decode { expected: &'static str },
}

impl RequestError {
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport)
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Application { status, .. } => Some(*status),
            Self::Transport | Self::Decode { .. } => None,
        }
    }
}
