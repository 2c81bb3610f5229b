use reqwest::StatusCode;
use validator::ValidationErrors;

#[derive(thiserror::Error)]
pub enum Error {
    #[error("Request failed")]
    Transport(#[from] reqwest::Error),

    #[error("HTTP {status}")]
    Http {
        status: StatusCode,
        message: Option<String>,
    },

    #[error("Unexpected response body")]
    Decode(#[from] serde_json::Error),

    #[error("Session storage error")]
    Storage(#[from] std::io::Error),

    #[error("Validation error")]
    Validation(#[from] ValidationErrors),
}

impl Error {
    /// Message suitable for showing to a user: the server-provided message for
    /// HTTP failures, the error itself otherwise.
    pub fn user_message(&self) -> String {
        match self {
            Error::Http {
                message: Some(message),
                ..
            } => message.clone(),
            Error::Transport(error) => error.to_string(),
            Error::Validation(errors) => errors.to_string(),
            other => other.to_string(),
        }
    }

    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        )
    }
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }

    Ok(())
}
