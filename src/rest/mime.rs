//! Request body negotiation: read the `Content-Type` a client sent and
//! deserialize the body with the matching loader.
//!
//! Form-encoded and multipart bodies are left alone; browsers send those and
//! the form layer reads them directly.

use crate::rest::RestError;

use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

pub const FORM_ENCODED: &str = "application/x-www-form-urlencoded";

// type "/" subtype, optionally followed by ";" parameters.
const MEDIA_TYPE_RE: &str = r"^\s*([A-Za-z0-9!#$&^_.+-]+/[A-Za-z0-9!#$&^_.+-]+)\s*(?:;.*)?$";

/// Deserializes a request body into a JSON value.
pub type Loader = fn(&[u8]) -> Result<Value, String>;

fn load_json(body: &[u8]) -> Result<Value, String> {
    serde_json::from_slice(body).map_err(|e| e.to_string())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TranslatedRequest {
    /// `None` for form-encoded bodies or when no header was sent.
    pub content_type: Option<String>,
    /// Deserialized body, when a loader handled it.
    pub data: Option<Value>,
}

#[derive(Debug, Clone)]
pub struct Mimer {
    loaders: Vec<(Loader, Vec<String>)>,
}

impl Default for Mimer {
    fn default() -> Self {
        let mut mimer = Self::empty();
        mimer.register(load_json, ["application/json", "text/json"]);
        mimer
    }
}

impl Mimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// A translator with no loaders registered.
    pub fn empty() -> Self {
        Self {
            loaders: Vec::new(),
        }
    }

    /// Register `loader` for the given MIME prefixes. Earlier registrations
    /// win when several match.
    pub fn register<I, S>(&mut self, loader: Loader, mimes: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mimes = mimes
            .into_iter()
            .map(|m| m.into().to_ascii_lowercase())
            .collect();
        self.loaders.push((loader, mimes));
    }

    pub fn loader_for_type(&self, media_type: &str) -> Option<Loader> {
        self.loaders.iter().find_map(|(loader, mimes)| {
            mimes
                .iter()
                .any(|mime| media_type.starts_with(mime.as_str()))
                .then_some(*loader)
        })
    }

    /// Effective content type; form-encoded bodies count as none.
    pub fn content_type(header: Option<&str>) -> Option<String> {
        let header = header.map(str::trim).filter(|h| !h.is_empty())?;
        if header.to_ascii_lowercase().contains(FORM_ENCODED) {
            return None;
        }
        Some(header.to_string())
    }

    pub fn is_multipart(header: Option<&str>) -> bool {
        header
            .map(|h| h.trim_start().to_ascii_lowercase().starts_with("multipart"))
            .unwrap_or(false)
    }

    /// Deserialize `body` according to the `Content-Type` header.
    pub fn translate(&self, header: Option<&str>, body: &[u8]) -> Result<TranslatedRequest, RestError> {
        let content_type = Self::content_type(header);
        let Some(ctype) = content_type.as_deref() else {
            return Ok(TranslatedRequest::default());
        };
        if Self::is_multipart(header) {
            return Ok(TranslatedRequest {
                content_type,
                data: None,
            });
        }

        let re = Regex::new(MEDIA_TYPE_RE).map_err(|e| RestError::Pattern(e.to_string()))?;
        let media_type = re
            .captures(ctype)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().to_ascii_lowercase())
            .ok_or_else(|| RestError::UnsupportedMediaType(ctype.to_string()))?;

        let Some(loader) = self.loader_for_type(&media_type) else {
            return Err(RestError::UnsupportedMediaType(ctype.to_string()));
        };
        let data = loader(body).map_err(|reason| RestError::MimerData {
            content_type: media_type.clone(),
            reason,
        })?;

        debug!(content_type = %media_type, bytes = body.len(), "deserialized request body");
        Ok(TranslatedRequest {
            content_type,
            data: Some(data),
        })
    }
}
