//! Server-side HTML rendering.
//!
//! Every page is produced either as a full document wrapped in the base
//! layout or, for htmx requests, as the bare content fragment.

mod html;
mod pages;

pub use html::escape_html;
pub use pages::{NavItem, Renderer};

use axum::http::HeaderMap;

pub const HX_REQUEST_HEADER: &str = "hx-request";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RenderMode {
    Full,
    Partial,
}

impl RenderMode {
    /// `Partial` when the request was issued by htmx (`HX-Request: true`).
    pub fn from_headers(headers: &HeaderMap) -> Self {
        match headers.get(HX_REQUEST_HEADER).map(|v| v.to_str()) {
            Some(Ok(value)) if value.eq_ignore_ascii_case("true") => RenderMode::Partial,
            _ => RenderMode::Full,
        }
    }
}
