//! Request and response descriptors exchanged with the hosting engine.
//!
//! These model the subset of a CoAP message the plugtest resource reads and
//! writes. Encoding them on the wire is the engine's job.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::PlugtestError;
use crate::etag::ETag;

/// Request method, with CoAP method codes as discriminants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get = 1,
    Post = 2,
    Put = 3,
    Delete = 4,
}

impl Method {
    /// Numeric code (`0.01` .. `0.04`).
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = PlugtestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "GET" => Ok(Method::Get),
            "POST" => Ok(Method::Post),
            "PUT" => Ok(Method::Put),
            "DELETE" => Ok(Method::Delete),
            _ => Err(PlugtestError::UnknownMethod(s.to_string())),
        }
    }
}

/// Transport reliability mode of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum MessageType {
    #[default]
    Confirmable = 0,
    NonConfirmable = 1,
    Acknowledgement = 2,
    Reset = 3,
}

impl MessageType {
    pub fn value(self) -> u8 {
        self as u8
    }

    pub fn short_name(self) -> &'static str {
        match self {
            MessageType::Confirmable => "CON",
            MessageType::NonConfirmable => "NON",
            MessageType::Acknowledgement => "ACK",
            MessageType::Reset => "RST",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl FromStr for MessageType {
    type Err = PlugtestError;

    /// Accepts the short names (`CON`, `NON`, `ACK`, `RST`) or the numeric value.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CON" | "0" => Ok(MessageType::Confirmable),
            "NON" | "1" => Ok(MessageType::NonConfirmable),
            "ACK" | "2" => Ok(MessageType::Acknowledgement),
            "RST" | "3" => Ok(MessageType::Reset),
            _ => Err(PlugtestError::UnknownMessageType(s.to_string())),
        }
    }
}

/// Response codes the plugtest resource can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ResponseCode {
    /// 2.01
    Created,
    /// 2.02
    Deleted,
    /// 2.03
    Valid,
    /// 2.04
    Changed,
    /// 2.05
    Content,
    /// 4.12
    PreconditionFailed,
}

impl ResponseCode {
    pub const ALL: [ResponseCode; 6] = [
        ResponseCode::Created,
        ResponseCode::Deleted,
        ResponseCode::Valid,
        ResponseCode::Changed,
        ResponseCode::Content,
        ResponseCode::PreconditionFailed,
    ];

    /// `(class, detail)` pair, e.g. `(2, 5)` for Content.
    pub fn class_detail(self) -> (u8, u8) {
        match self {
            ResponseCode::Created => (2, 1),
            ResponseCode::Deleted => (2, 2),
            ResponseCode::Valid => (2, 3),
            ResponseCode::Changed => (2, 4),
            ResponseCode::Content => (2, 5),
            ResponseCode::PreconditionFailed => (4, 12),
        }
    }

    /// Single-byte code as carried in a CoAP header.
    pub fn code(self) -> u8 {
        let (class, detail) = self.class_detail();
        (class << 5) | detail
    }

    /// HTTP status for a cross-proxy, per the RFC 8075 mapping table.
    pub fn http_status(self) -> u16 {
        match self {
            ResponseCode::Created => 201,
            ResponseCode::Deleted => 200,
            ResponseCode::Valid => 304,
            ResponseCode::Changed => 204,
            ResponseCode::Content => 200,
            ResponseCode::PreconditionFailed => 412,
        }
    }

    /// Parse the dotted form (`"2.05"`).
    pub fn from_dotted(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.to_string() == s.trim())
    }

    pub fn is_success(self) -> bool {
        self.class_detail().0 == 2
    }
}

impl fmt::Display for ResponseCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (class, detail) = self.class_detail();
        write!(f, "{}.{:02}", class, detail)
    }
}

/// Content-Format option values used by the resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ContentFormat {
    #[serde(rename = "text/plain")]
    TextPlain,
}

impl ContentFormat {
    pub fn media_type(self) -> &'static str {
        match self {
            ContentFormat::TextPlain => "text/plain; charset=utf-8",
        }
    }
}

/// An inbound request as decoded by the engine.
///
/// Conditional options are kept as raw bytes: validating them is the
/// resource's decision, and invalid values must compare as non-matching
/// rather than be rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    pub message_type: MessageType,
    pub message_id: u16,
    /// ETag option supplied for validation.
    pub etag: Option<Vec<u8>>,
    /// If-Match option. `Some(vec![])` is an empty If-Match.
    pub if_match: Option<Vec<u8>>,
    pub if_none_match: bool,
}

impl Request {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            message_type: MessageType::Confirmable,
            message_id: 0,
            etag: None,
            if_match: None,
            if_none_match: false,
        }
    }

    pub fn get() -> Self {
        Self::new(Method::Get)
    }

    pub fn post() -> Self {
        Self::new(Method::Post)
    }

    pub fn put() -> Self {
        Self::new(Method::Put)
    }

    pub fn delete() -> Self {
        Self::new(Method::Delete)
    }

    pub fn with_type(mut self, message_type: MessageType) -> Self {
        self.message_type = message_type;
        self
    }

    pub fn with_message_id(mut self, message_id: u16) -> Self {
        self.message_id = message_id;
        self
    }

    pub fn with_etag(mut self, etag: impl AsRef<[u8]>) -> Self {
        self.etag = Some(etag.as_ref().to_vec());
        self
    }

    pub fn with_if_match(mut self, tag: impl AsRef<[u8]>) -> Self {
        self.if_match = Some(tag.as_ref().to_vec());
        self
    }

    pub fn with_if_none_match(mut self) -> Self {
        self.if_none_match = true;
        self
    }

    /// ETag option bytes, empty when absent.
    pub fn etag_bytes(&self) -> &[u8] {
        self.etag.as_deref().unwrap_or(&[])
    }

    /// If-Match option bytes, empty when absent.
    pub fn if_match_bytes(&self) -> &[u8] {
        self.if_match.as_deref().unwrap_or(&[])
    }
}

/// The response a handler fills in.
///
/// The payload buffer has a fixed capacity advertised by the engine; writes
/// beyond it are truncated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Response {
    pub code: ResponseCode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub etag: Option<ETag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_age: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_format: Option<ContentFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_path: Option<String>,
    #[serde(serialize_with = "ser_payload")]
    payload: Vec<u8>,
    #[serde(skip)]
    capacity: usize,
}

impl Response {
    /// A fresh response with the engine's default code (2.05 Content).
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            code: ResponseCode::Content,
            etag: None,
            max_age: None,
            content_format: None,
            location_path: None,
            payload: Vec::new(),
            capacity,
        }
    }

    pub fn set_code(&mut self, code: ResponseCode) {
        self.code = code;
    }

    pub fn set_etag(&mut self, etag: ETag) {
        self.etag = Some(etag);
    }

    pub fn set_max_age(&mut self, seconds: u32) {
        self.max_age = Some(seconds);
    }

    pub fn set_content_format(&mut self, format: ContentFormat) {
        self.content_format = Some(format);
    }

    pub fn set_location_path(&mut self, path: impl Into<String>) {
        self.location_path = Some(path.into());
    }

    /// Copy `bytes` into the payload buffer, truncating at capacity.
    /// Returns the number of bytes kept.
    pub fn set_payload(&mut self, bytes: &[u8]) -> usize {
        let kept = bytes.len().min(self.capacity);
        self.payload.clear();
        self.payload.extend_from_slice(&bytes[..kept]);
        kept
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    pub fn payload_str(&self) -> String {
        String::from_utf8_lossy(&self.payload).into_owned()
    }
}

fn ser_payload<S: serde::Serializer>(payload: &[u8], s: S) -> Result<S::Ok, S::Error> {
    s.serialize_str(&String::from_utf8_lossy(payload))
}
