//! Mapping between plugtest messages and HTTP.
//!
//! The server decodes HTTP requests into [`Request`]s and encodes
//! [`Response`]s back; the remote checker does the reverse. Both sides
//! share the header conventions below:
//!
//! | CoAP                | HTTP                                  |
//! |---------------------|---------------------------------------|
//! | ETag (request)      | `ETag: "<hex>"`                       |
//! | If-Match            | `If-Match: "<hex>"`, `*` = empty      |
//! | If-None-Match       | `If-None-Match` present               |
//! | message type        | `X-CoAP-Type: CON\|NON\|ACK\|RST`     |
//! | message ID          | `X-CoAP-MID: <u16>`                   |
//! | response code       | status + `X-CoAP-Code: 2.05`          |
//! | ETag (response)     | `ETag: "<hex>"`                       |
//! | Max-Age             | `Cache-Control: max-age=<n>`          |
//! | Content-Format      | `Content-Type`                        |
//! | Location-Path       | `Location`                            |

use axum::http::header::{
    CACHE_CONTROL, CONTENT_TYPE, ETAG, IF_MATCH, IF_NONE_MATCH, LOCATION,
};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::IntoResponse;

use plugtest_core::{
    ContentFormat, ETag, MessageType, Method, PlugtestError, Request, Response, ResponseCode,
    MAX_ETAG_LEN, MAX_PLUGTEST_PAYLOAD,
};

pub(crate) const X_COAP_TYPE: &str = "x-coap-type";
pub(crate) const X_COAP_MID: &str = "x-coap-mid";
pub(crate) const X_COAP_CODE: &str = "x-coap-code";

// ── Server side ──────────────────────────────────────────────────────

/// Option bytes that can never equal a stored tag. Used for header values
/// that do not decode, so a garbled precondition fails closed.
fn unmatchable() -> Vec<u8> {
    vec![0xff; MAX_ETAG_LEN + 1]
}

/// Decode a conditional header value into raw option bytes.
///
/// `*` and an empty value both map to an empty option.
fn decode_tag_header(value: &HeaderValue) -> Vec<u8> {
    let text = match value.to_str() {
        Ok(t) => t.trim(),
        Err(_) => return unmatchable(),
    };
    if text == "*" {
        return Vec::new();
    }
    let inner = text.trim_matches('"');
    match hex::decode(inner) {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::debug!(value = text, error = %e, "undecodable tag header");
            unmatchable()
        }
    }
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok()).map(str::trim)
}

/// Build a plugtest request from an HTTP request's method and headers.
///
/// `assign_mid` is called only when the client sends no `X-CoAP-MID`.
pub(crate) fn decode_request(
    method: Method,
    headers: &HeaderMap,
    assign_mid: impl FnOnce() -> u16,
) -> Result<Request, PlugtestError> {
    let message_type = match header_str(headers, X_COAP_TYPE) {
        Some(t) => t.parse::<MessageType>()?,
        None => MessageType::Confirmable,
    };
    let message_id = match header_str(headers, X_COAP_MID) {
        Some(m) => m
            .parse::<u16>()
            .map_err(|_| PlugtestError::InvalidMessageId(m.to_string()))?,
        None => assign_mid(),
    };

    let mut request = Request::new(method)
        .with_type(message_type)
        .with_message_id(message_id);
    request.etag = headers.get(ETAG).map(decode_tag_header);
    request.if_match = headers.get(IF_MATCH).map(decode_tag_header);
    request.if_none_match = headers.contains_key(IF_NONE_MATCH);
    Ok(request)
}

/// Render a plugtest response as an HTTP response.
pub(crate) fn encode_response(response: &Response) -> axum::response::Response {
    let status = StatusCode::from_u16(response.code.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

    let mut headers = HeaderMap::new();
    if let Ok(val) = response.code.to_string().parse() {
        headers.insert(X_COAP_CODE, val);
    }
    if let Some(tag) = &response.etag {
        if let Ok(val) = format!("\"{}\"", tag).parse() {
            headers.insert(ETAG, val);
        }
    }
    if let Some(max_age) = response.max_age {
        if let Ok(val) = format!("max-age={}", max_age).parse() {
            headers.insert(CACHE_CONTROL, val);
        }
    }
    if let Some(format) = response.content_format {
        headers.insert(CONTENT_TYPE, HeaderValue::from_static(format.media_type()));
    }
    if let Some(location) = &response.location_path {
        if let Ok(val) = location.parse() {
            headers.insert(LOCATION, val);
        }
    }

    let body = axum::body::Body::from(response.payload().to_vec());
    (status, headers, body).into_response()
}

// ── Client side ──────────────────────────────────────────────────────

/// Headers a client sends to carry `request` over HTTP.
pub(crate) fn request_headers(request: &Request) -> Vec<(&'static str, String)> {
    let mut headers = vec![
        (X_COAP_TYPE, request.message_type.to_string()),
        (X_COAP_MID, request.message_id.to_string()),
    ];
    if let Some(etag) = &request.etag {
        headers.push(("etag", format!("\"{}\"", hex::encode(etag))));
    }
    if let Some(if_match) = &request.if_match {
        if if_match.is_empty() {
            headers.push(("if-match", "*".to_string()));
        } else {
            headers.push(("if-match", format!("\"{}\"", hex::encode(if_match))));
        }
    }
    if request.if_none_match {
        headers.push(("if-none-match", "*".to_string()));
    }
    headers
}

/// Fallback when a server omits `X-CoAP-Code`: infer from method and status.
fn infer_code(method: Method, status: u16) -> Option<ResponseCode> {
    match (method, status) {
        (_, 412) => Some(ResponseCode::PreconditionFailed),
        (Method::Get, 200) => Some(ResponseCode::Content),
        (Method::Get, 304) => Some(ResponseCode::Valid),
        (Method::Post, 201) | (Method::Put, 201) => Some(ResponseCode::Created),
        (Method::Put, 204) | (Method::Put, 200) => Some(ResponseCode::Changed),
        (Method::Delete, 200) | (Method::Delete, 204) => Some(ResponseCode::Deleted),
        _ => None,
    }
}

/// Rebuild a plugtest response from an HTTP response's parts.
pub(crate) fn decode_response(
    method: Method,
    status: u16,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Response, String> {
    let code = match header_str(headers, X_COAP_CODE) {
        Some(dotted) => ResponseCode::from_dotted(dotted)
            .ok_or_else(|| format!("unknown X-CoAP-Code {:?}", dotted))?,
        None => infer_code(method, status)
            .ok_or_else(|| format!("HTTP status {} has no plugtest meaning for {}", status, method))?,
    };

    let mut response = Response::with_capacity(body.len().max(MAX_PLUGTEST_PAYLOAD));
    response.set_code(code);

    if let Some(raw) = header_str(headers, "etag") {
        let tag = raw
            .parse::<ETag>()
            .map_err(|e| format!("bad ETag header {:?}: {}", raw, e))?;
        response.set_etag(tag);
    }
    if let Some(cc) = header_str(headers, "cache-control") {
        if let Some(age) = cc
            .split(',')
            .filter_map(|d| d.trim().strip_prefix("max-age="))
            .find_map(|v| v.parse::<u32>().ok())
        {
            response.set_max_age(age);
        }
    }
    if let Some(ct) = header_str(headers, "content-type") {
        if ct.starts_with("text/plain") {
            response.set_content_format(ContentFormat::TextPlain);
        }
    }
    if let Some(location) = header_str(headers, "location") {
        response.set_location_path(location);
    }
    response.set_payload(body);
    Ok(response)
}
