//! Typed failures of the remote sports API. They travel inside
//! `anyhow::Error` and end up as the message a failed panel shows.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{endpoint} failed, code: {code}, msg: {msg}")]
    Status {
        endpoint: &'static str,
        code: i64,
        msg: String,
    },

    #[error("http {status} from {url}")]
    Http { url: String, status: u16 },

    #[error("invalid match id: {0}")]
    InvalidMatchId(String),

    #[error("unexpected {endpoint} response: {detail}")]
    Malformed {
        endpoint: &'static str,
        detail: String,
    },
}
