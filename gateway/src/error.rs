use thiserror::Error;

/// Represents all error types that can occur while talking to the
/// visitor-log service.
///
/// The gateway never retries; callers decide what a failed call means for
/// their workflow. The "department log already closed" service response is
/// deliberately *not* an error; see
/// [`DepartmentCloseAck`](crate::types::DepartmentCloseAck).
#[derive(Debug, Error)]
pub enum GatewayError {
    /// The request never completed (connect failure, timeout, bad TLS, ...).
    #[error("request to visitor-log service failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a status the endpoint does not define.
    #[error("visitor-log service returned HTTP {status} from {endpoint}")]
    UnexpectedStatus { endpoint: &'static str, status: u16 },

    /// The response body could not be decoded into the expected shape.
    #[error("could not decode {endpoint} response: {detail}")]
    Decode { endpoint: &'static str, detail: String },

    /// The service reported a non-recoverable application error code.
    #[error("visitor-log service error {code}: {message}")]
    Service { code: i32, message: String },
}
