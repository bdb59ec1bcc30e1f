use thiserror::Error;

pub mod api;
pub mod env;
pub mod types;
pub mod utils;

/// Transport-level failures shared by every HTTP caller in the workspace.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected status {status} from {url}")]
    Status { status: u16, url: String },
    #[error("parse error: {0}")]
    Parse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_type_ok() {
        let h = types::Health { status: "ok" };
        assert_eq!(h.status, "ok");
    }

    #[test]
    fn status_error_mentions_url() {
        let e = CoreError::Status { status: 404, url: "http://localhost/stock/9".into() };
        assert_eq!(e.to_string(), "unexpected status 404 from http://localhost/stock/9");
    }
}
