use thiserror::Error;

/// The primary error type for all fallible operations in this crate.
#[derive(Debug, Error)]
pub enum CbpError {
    /// An error occurred during an HTTP request (connection, timeout, body read).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// A provided URL could not be parsed.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The server returned an unexpected or unsuccessful HTTP status code.
    #[error("Unexpected response status: {status} at {url}")]
    Status {
        /// The HTTP status code.
        status: u16,
        /// The URL that returned the error.
        url: String,
    },

    /// The interval name is not one of the supported candle granularities.
    #[error("unknown candle interval: {0}")]
    UnknownInterval(String),

    /// The API secret could not be used as signing material.
    #[error("invalid credentials: {0}")]
    InvalidCredentials(String),

    /// An authenticated endpoint was called on a client built without credentials.
    #[error("this endpoint requires credentials, but the client has none")]
    MissingCredentials,

    /// An invalid date range was provided (start must be before end).
    #[error("invalid date range: start must be before end")]
    InvalidDates,

    /// A request body could not be serialized or a response body could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The data received from the API was in an unexpected format or was missing a required field.
    #[error("Data format unexpected or missing field: {0}")]
    Data(String),
}
