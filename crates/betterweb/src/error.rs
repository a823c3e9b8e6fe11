use thiserror::Error;

use betterweb_core::ProtocolError;

/// Error type for the site facade and CLI.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("protocol error: {0}")]
    Protocol(#[from] ProtocolError),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type SiteResult<T> = Result<T, SiteError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protocol_error_wraps() {
        let e: SiteError = ProtocolError::MissingKey.into();
        assert!(e.to_string().contains("private key"));
    }

    #[test]
    fn test_config_error_display() {
        let e = SiteError::Config("bad site id".into());
        assert_eq!(e.to_string(), "configuration error: bad site id");
    }
}
