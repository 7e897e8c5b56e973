//! REST helpers: the status-code response factory and request body
//! content-type negotiation.

pub mod mime;
pub mod status;

pub use mime::{Loader, Mimer, TranslatedRequest};
pub use status::{Rc, RcContent, RcResponse};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RestError {
    /// No status code is registered under this name.
    #[error("unknown status code name: {0}")]
    UnknownStatus(String),

    /// No loader is registered for the request content type. HTTP 415.
    #[error("unsupported media type: {0}")]
    UnsupportedMediaType(String),

    /// A loader matched but could not deserialize the body. HTTP 400.
    #[error("cannot deserialize {content_type} body: {reason}")]
    MimerData { content_type: String, reason: String },

    /// A header-parsing pattern failed to compile. HTTP 500.
    #[error("invalid header pattern: {0}")]
    Pattern(String),
}

impl RestError {
    /// Canned response to send back for this error.
    pub fn rc(&self) -> Rc {
        match self {
            RestError::UnknownStatus(_) | RestError::Pattern(_) => Rc::InternalError,
            RestError::UnsupportedMediaType(_) => Rc::UnsupportedMediaType,
            RestError::MimerData { .. } => Rc::BadRequest,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.rc().status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn status_code_mapping() {
        assert_eq!(RestError::UnknownStatus("X".into()).status_code(), 500);
        assert_eq!(RestError::Pattern("unclosed group".into()).status_code(), 500);
        assert_eq!(RestError::UnsupportedMediaType("text/csv".into()).status_code(), 415);
        assert_eq!(
            RestError::MimerData {
                content_type: "application/json".into(),
                reason: "eof".into()
            }
            .status_code(),
            400
        );
    }
}
