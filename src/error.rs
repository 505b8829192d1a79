use std::fmt;

use reqwest::StatusCode;

#[derive(Debug)]
pub enum Error {
    ConfigError(String),
    InvalidRequest(String),
    RequestError(reqwest::Error),
    /// The object store answered with a non-success status. `body` is passed
    /// through untouched; `code` is the S3 error code when the body carried one.
    UpstreamRejected {
        status: StatusCode,
        code: Option<String>,
        body: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            Self::ConfigError(msg) => format!("Config Error: {}", msg),
            Self::InvalidRequest(msg) => format!("Invalid Request: {}", msg),
            Self::RequestError(e) => format!("Execute Request Error: {}", e),
            Self::UpstreamRejected { status, body, .. } => {
                format!("Upload failed: {} - {}", status.as_u16(), body)
            }
        };
        write!(f, "{}", msg)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::RequestError(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Self::RequestError(e)
    }
}

impl From<reqwest::header::InvalidHeaderValue> for Error {
    fn from(e: reqwest::header::InvalidHeaderValue) -> Self {
        Self::InvalidRequest(e.to_string())
    }
}

impl Error {
    #[inline]
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::UpstreamRejected { status, .. } => Some(*status),
            Self::RequestError(e) => e.status(),
            _ => None,
        }
    }
}
