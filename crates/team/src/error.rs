use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("HTTP client error: {0}")]
    Http(slack_http::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The envelope came back with `ok: false`; `code` is the remote error
    /// string, e.g. `not_authed`.
    #[error("Slack API error on {endpoint}: {code}")]
    Api { endpoint: String, code: String },

    #[error("request cancelled")]
    Cancelled,
}
