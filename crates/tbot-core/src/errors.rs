use crate::methods::Method;

/// Error type shared by the core and client crates.
///
/// Transport failures (no response), remote server failures (HTTP >= 500) and
/// application failures (`ok: false` envelopes) are kept apart so callers can
/// tell "the network is down" from "the bot API said no".
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("config error: {0}")]
    Config(String),

    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The request never produced a response (connect, TLS, timeout...).
    #[error("transport error: {0}")]
    Transport(String),

    /// The remote answered with a 5xx status.
    #[error("server error: {method} returned HTTP {status}")]
    Server { method: Method, status: u16 },

    #[error("{method} returned HTTP {status} with non-JSON content type {content_type:?}")]
    UnexpectedContentType {
        method: Method,
        status: u16,
        content_type: String,
    },

    /// A well-formed envelope with `ok: false`.
    #[error("API error: {code} - {description}")]
    Api { code: i64, description: String },

    #[error("neither a file id nor a file name with data were specified")]
    NoFileSpecified,
}

impl Error {
    /// Whether the polling path should wait and retry instead of surfacing this error.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Server { .. })
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_server_errors_are_retryable() {
        let server = Error::Server {
            method: Method::GetUpdates,
            status: 503,
        };
        assert!(server.is_retryable());
        assert!(!Error::Transport("connection refused".to_string()).is_retryable());
        assert!(!Error::Api {
            code: 404,
            description: "Not Found".to_string()
        }
        .is_retryable());
        assert!(!Error::NoFileSpecified.is_retryable());
    }

    #[test]
    fn server_error_names_the_method_not_the_url() {
        let e = Error::Server {
            method: Method::GetUpdates,
            status: 502,
        };
        let text = e.to_string();
        assert!(text.contains("getUpdates"));
        assert!(text.contains("502"));
        assert!(!text.contains("/bot"));
    }
}
