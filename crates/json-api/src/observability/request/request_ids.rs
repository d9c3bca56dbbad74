//! Request ids.
//!
//! The upstream gateway usually assigns one; ids that are missing, oversized or not printable
//! ASCII are replaced so they can always be echoed back and logged verbatim.

use salvo::{
    http::{StatusCode, header::HeaderValue},
    prelude::Response,
};
use tracing::debug;
use uuid::Uuid;

pub(super) const REQUEST_ID_HEADER: &str = "x-request-id";

const MAX_REQUEST_ID_LEN: usize = 128;

pub(super) fn resolve_request_id(header_value: Option<String>) -> String {
    match header_value.map(|value| value.trim().to_owned()) {
        Some(value) if is_acceptable(&value) => value,
        Some(rejected) => {
            debug!(
                length = rejected.len(),
                "replacing unusable incoming request id"
            );

            Uuid::now_v7().to_string()
        }
        None => Uuid::now_v7().to_string(),
    }
}

fn is_acceptable(value: &str) -> bool {
    !value.is_empty()
        && value.len() <= MAX_REQUEST_ID_LEN
        && value.bytes().all(|byte| byte.is_ascii_graphic())
}

pub(super) fn set_request_id_header(res: &mut Response, request_id: &str) {
    if let Ok(value) = HeaderValue::from_str(request_id) {
        res.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
}

pub(super) fn response_status_or_ok(status_code: Option<StatusCode>) -> StatusCode {
    status_code.unwrap_or(StatusCode::OK)
}
