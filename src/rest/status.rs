//! Canned REST responses keyed by status name (`ALL_OK`, `NOT_FOUND`, ...).
//!
//! Every lookup hands out a fresh response, so callers may set its content
//! without affecting later lookups.

use crate::rest::RestError;

use serde::Serialize;
use serde_json::{Map, Value, json};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rc {
    AllOk,
    Created,
    Deleted,
    BadRequest,
    Forbidden,
    NotFound,
    DuplicateEntry,
    NotHere,
    UnsupportedMediaType,
    InternalError,
    NotImplemented,
    Throttled,
}

impl Rc {
    pub const ALL: [Rc; 12] = [
        Rc::AllOk,
        Rc::Created,
        Rc::Deleted,
        Rc::BadRequest,
        Rc::Forbidden,
        Rc::NotFound,
        Rc::DuplicateEntry,
        Rc::NotHere,
        Rc::UnsupportedMediaType,
        Rc::InternalError,
        Rc::NotImplemented,
        Rc::Throttled,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Rc::AllOk => "ALL_OK",
            Rc::Created => "CREATED",
            Rc::Deleted => "DELETED",
            Rc::BadRequest => "BAD_REQUEST",
            Rc::Forbidden => "FORBIDDEN",
            Rc::NotFound => "NOT_FOUND",
            Rc::DuplicateEntry => "DUPLICATE_ENTRY",
            Rc::NotHere => "NOT_HERE",
            Rc::UnsupportedMediaType => "UNSUPPORTED_MEDIA_TYPE",
            Rc::InternalError => "INTERNAL_ERROR",
            Rc::NotImplemented => "NOT_IMPLEMENTED",
            Rc::Throttled => "THROTTLED",
        }
    }

    // FORBIDDEN is 401 here, not 403.
    pub fn status(self) -> u16 {
        match self {
            Rc::AllOk => 200,
            Rc::Created => 201,
            Rc::Deleted => 204,
            Rc::BadRequest => 400,
            Rc::Forbidden => 401,
            Rc::NotFound => 404,
            Rc::DuplicateEntry => 409,
            Rc::NotHere => 410,
            Rc::UnsupportedMediaType => 415,
            Rc::InternalError => 500,
            Rc::NotImplemented => 501,
            Rc::Throttled => 503,
        }
    }

    fn body(self) -> RcContent {
        let (key, message) = match self {
            // 204 must not carry a body.
            Rc::Deleted => return RcContent::Empty,
            Rc::AllOk => ("success", "OK"),
            Rc::Created => ("success", "The record was created"),
            Rc::BadRequest => ("error", "Bad Request"),
            Rc::Forbidden => ("error", "Forbidden"),
            Rc::NotFound => ("error", "Not Found"),
            Rc::DuplicateEntry => ("error", "Conflict/Duplicate"),
            Rc::NotHere => ("error", "Gone"),
            Rc::UnsupportedMediaType => ("error", "Unsupported Media Type"),
            Rc::InternalError => ("error", "Internal server error"),
            Rc::NotImplemented => ("error", "Not implemented"),
            Rc::Throttled => ("error", "The resource was throttled"),
        };
        let mut map = Map::new();
        map.insert(key.to_string(), Value::String(message.to_string()));
        RcContent::Json(Value::Object(map))
    }

    /// Fresh response carrying the default body for this status.
    pub fn response(self) -> RcResponse {
        RcResponse {
            status: self.status(),
            content_type: RcResponse::CONTENT_TYPE,
            content: self.body(),
        }
    }
}

impl fmt::Display for Rc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Rc {
    type Err = RestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Rc::ALL
            .into_iter()
            .find(|rc| rc.name() == s)
            .ok_or_else(|| RestError::UnknownStatus(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RcContent {
    Empty,
    Json(Value),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RcResponse {
    pub status: u16,
    pub content_type: &'static str,
    pub content: RcContent,
}

impl RcResponse {
    pub const CONTENT_TYPE: &'static str = "text/plain";

    /// Replace the body. A sequence is wrapped as `{"messages": [...]}`;
    /// anything else is stored as-is.
    pub fn set_content(&mut self, content: Value) {
        self.content = match content {
            Value::Array(items) => RcContent::Json(json!({ "messages": items })),
            other => RcContent::Json(other),
        };
    }

    pub fn with_content(mut self, content: Value) -> Self {
        self.set_content(content);
        self
    }

    /// Body bytes as they go on the wire.
    pub fn body(&self) -> String {
        match &self.content {
            RcContent::Empty => String::new(),
            RcContent::Json(Value::String(text)) => text.clone(),
            RcContent::Json(value) => value.to_string(),
        }
    }
}
