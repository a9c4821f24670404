//! Helpers shared by the reqwest-backed upstream adapters.

use reqwest::StatusCode;

const PREVIEW_CHAR_LIMIT: usize = 160;

/// Error constructors an upstream adapter supplies to the shared mappers.
pub(crate) struct UpstreamErrorKinds<E> {
    pub timeout: fn(String) -> E,
    pub transport: fn(String) -> E,
    pub status: fn(String) -> E,
}

/// Map a reqwest failure onto a timeout or transport error.
///
/// The URL is stripped first; it carries the API key in its query string.
pub(crate) fn map_transport_error<E>(error: reqwest::Error, kinds: &UpstreamErrorKinds<E>) -> E {
    let error = error.without_url();
    if error.is_timeout() {
        (kinds.timeout)(error.to_string())
    } else {
        (kinds.transport)(error.to_string())
    }
}

/// Map a non-success status onto a timeout or status error, quoting the body.
pub(crate) fn map_status_error<E>(
    status: StatusCode,
    body: &[u8],
    kinds: &UpstreamErrorKinds<E>,
) -> E {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {preview}", status.as_u16())
    };
    match status {
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => (kinds.timeout)(message),
        _ => (kinds.status)(message),
    }
}

/// Whitespace-collapsed, truncated rendering of a response body.
pub(crate) fn body_preview(body: &[u8]) -> String {
    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}
