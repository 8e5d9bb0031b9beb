use thiserror::Error;

#[non_exhaustive]
#[derive(Error, Debug)]
pub enum EndpointError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("api error {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("malformed stream payload: {0}")]
    Protocol(String),

    #[error("tool not found: {0}")]
    ToolNotFound(String),

    #[error("invalid arguments for tool {name}: {source}")]
    InvalidArguments {
        name: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("action {action} still {status} after {attempts} polls")]
    PollTimeout {
        action: String,
        status: String,
        attempts: u32,
    },
}

pub type EndpointResult<T> = Result<T, EndpointError>;
