use reqwest::StatusCode;
use thiserror::Error;

/// User-facing send failures. Every transport failure maps to exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SendError {
    #[error("Network connection failed. Please check your internet connection.")]
    Network,
    #[error("API endpoint not found. Please contact support.")]
    EndpointNotFound,
    #[error("Server error. Please try again later.")]
    Server { status: u16 },
    #[error("Too many requests. Please wait and try again.")]
    RateLimit,
    #[error("Failed to send message. Please try again.")]
    Generic,
}

impl SendError {
    pub fn from_status(status: StatusCode) -> Self {
        if status == StatusCode::NOT_FOUND {
            Self::EndpointNotFound
        } else if status.is_server_error() {
            Self::Server {
                status: status.as_u16(),
            }
        } else if status == StatusCode::TOO_MANY_REQUESTS {
            Self::RateLimit
        } else {
            Self::Generic
        }
    }

    pub fn from_reqwest(err: &reqwest::Error) -> Self {
        if err.is_connect() {
            return Self::Network;
        }

        match err.status() {
            Some(status) => Self::from_status(status),
            None => Self::Generic,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Network => "network",
            Self::EndpointNotFound => "endpoint_not_found",
            Self::Server { .. } => "server",
            Self::RateLimit => "rate_limit",
            Self::Generic => "generic",
        }
    }
}
