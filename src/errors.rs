use thiserror::Error;

/// Central error catalogue for the add-in core.
///
/// Every fault that crosses a component boundary is one of these kinds; raw
/// transport or host-runtime errors never leak past the module that caught
/// them.
#[derive(Debug, Error)]
pub enum AssistError {
    #[error("API key required")]
    Unauthenticated,
    #[error("{0} is required")]
    InvalidRequest(String),
    #[error("AI service rejected the request ({status}): {message}")]
    RemoteRejected { status: u16, message: String },
    #[error("the AI request took too long to complete")]
    Timeout,
    #[error("failed to connect to the AI service")]
    Unreachable,
    #[error("host runtime unavailable: {0}")]
    HostUnavailable(String),
}

impl AssistError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "AUTH-1001",
            Self::InvalidRequest(_) => "REQ-1001",
            Self::RemoteRejected { .. } => "AI-1001",
            Self::Timeout => "AI-1002",
            Self::Unreachable => "AI-1003",
            Self::HostUnavailable(_) => "HOST-1001",
        }
    }

    /// Taxonomy kind name used in the `error` field of failure replies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "Unauthenticated",
            Self::InvalidRequest(_) => "InvalidRequest",
            Self::RemoteRejected { .. } => "RemoteRejected",
            Self::Timeout => "Timeout",
            Self::Unreachable => "Unreachable",
            Self::HostUnavailable(_) => "HostUnavailable",
        }
    }

    pub fn explain(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "The request did not carry an API key.",
            Self::InvalidRequest(_) => "A required field was missing from the request.",
            Self::RemoteRejected { .. } => "The remote AI service answered with an error status.",
            Self::Timeout => "The remote AI service did not answer within the deadline.",
            Self::Unreachable => "No response was received from the remote AI service.",
            Self::HostUnavailable(_) => "The document host could not be reached.",
        }
    }

    /// HTTP-style status for the reply surfaced to the caller. The health
    /// path maps [`Unreachable`](Self::Unreachable) to 503 instead; see
    /// [`crate::proxy::ProxyReply`].
    pub fn http_status(&self) -> u16 {
        match self {
            Self::Unauthenticated => 401,
            Self::InvalidRequest(_) => 400,
            Self::RemoteRejected { status, .. } => *status,
            Self::Timeout => 408,
            Self::Unreachable => 500,
            Self::HostUnavailable(_) => 500,
        }
    }

    /// Detail text for the `message` field of failure replies. For remote
    /// rejections this is the remote's own message rather than the full
    /// display string.
    pub fn detail(&self) -> String {
        match self {
            Self::RemoteRejected { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping_follows_taxonomy() {
        assert_eq!(AssistError::Unauthenticated.http_status(), 401);
        assert_eq!(AssistError::InvalidRequest("prompt".into()).http_status(), 400);
        assert_eq!(AssistError::Timeout.http_status(), 408);
        assert_eq!(AssistError::Unreachable.http_status(), 500);
        let rejected = AssistError::RemoteRejected {
            status: 502,
            message: "bad gateway".into(),
        };
        assert_eq!(rejected.http_status(), 502);
        assert_eq!(rejected.detail(), "bad gateway");
    }

    #[test]
    fn invalid_request_names_the_field() {
        let err = AssistError::InvalidRequest("prompt".into());
        assert_eq!(err.to_string(), "prompt is required");
        assert_eq!(err.kind(), "InvalidRequest");
    }
}
