//! Page Views
//!
//! Server-rendered page shell. Real templates are an external collaborator
//! of this tier; the view emits a minimal HTML body plus an `X-Page` marker
//! header naming the template, which downstream rendering (and the tests)
//! key off. Flash and field errors are part of the view so the re-render
//! contract stays in one place.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Redirect, Response};
use kernel::flash::{Flash, FlashKind};

use crate::application::config::AuthConfig;
use crate::presentation::dto::FieldError;
use crate::presentation::flash::{clear_flash, queue_flash};

/// Marker header naming the rendered template
pub const PAGE_HEADER: &str = "x-page";

/// A renderable page
#[derive(Debug, Clone)]
pub struct Page {
    /// Template name, e.g. "auth/login"
    pub template: &'static str,
    pub title: String,
    pub status: StatusCode,
    pub flash: Vec<Flash>,
    pub field_errors: Vec<FieldError>,
    /// Echoed form values (never passwords)
    pub values: Vec<(&'static str, String)>,
}

impl Page {
    pub fn new(template: &'static str, title: impl Into<String>) -> Self {
        Self {
            template,
            title: title.into(),
            status: StatusCode::OK,
            flash: Vec::new(),
            field_errors: Vec::new(),
            values: Vec::new(),
        }
    }

    pub fn with_status(mut self, status: StatusCode) -> Self {
        self.status = status;
        self
    }

    pub fn with_flash(mut self, flash: Flash) -> Self {
        self.flash.push(flash);
        self
    }

    /// Field errors re-render with 422 so the outcome is observable
    /// without parsing HTML
    pub fn with_errors(mut self, errors: Vec<FieldError>) -> Self {
        if !errors.is_empty() {
            self.status = StatusCode::UNPROCESSABLE_ENTITY;
        }
        self.field_errors = errors;
        self
    }

    pub fn with_values(mut self, values: Vec<(&'static str, String)>) -> Self {
        self.values = values;
        self
    }

    fn body(&self) -> String {
        let mut html = String::with_capacity(256);
        html.push_str("<!doctype html><html><head><title>");
        html.push_str(&escape(&self.title));
        html.push_str("</title></head><body>");

        for flash in &self.flash {
            let class = match flash.kind {
                FlashKind::Success => "flash-success",
                FlashKind::Error => "flash-error",
                FlashKind::Info => "flash-info",
            };
            html.push_str(&format!(
                "<div class=\"{}\">{}</div>",
                class,
                escape(&flash.message)
            ));
        }

        for error in &self.field_errors {
            html.push_str(&format!(
                "<p class=\"field-error\" data-field=\"{}\">{}</p>",
                escape(error.field),
                escape(&error.message)
            ));
        }

        for (name, value) in &self.values {
            html.push_str(&format!(
                "<input name=\"{}\" value=\"{}\">",
                escape(name),
                escape(value)
            ));
        }

        html.push_str("</body></html>");
        html
    }
}

impl IntoResponse for Page {
    fn into_response(self) -> Response {
        let mut response = (
            self.status,
            [(header::CONTENT_TYPE, "text/html; charset=utf-8")],
            self.body(),
        )
            .into_response();

        if let Ok(value) = HeaderValue::from_str(self.template) {
            response.headers_mut().insert(PAGE_HEADER, value);
        }
        response
    }
}

/// Render a page, consuming any pending flash cookie from the request
pub fn render(mut page: Page, headers: &axum::http::HeaderMap, config: &AuthConfig) -> Response {
    let pending = crate::presentation::flash::read_flash(headers, config);
    let had_flash = pending.is_some();
    if let Some(flash) = pending {
        page.flash.insert(0, flash);
    }

    let mut response = page.into_response();
    if had_flash {
        response
            .headers_mut()
            .append(header::SET_COOKIE, clear_flash(config));
    }
    response
}

/// 303 redirect carrying a flash for the next page load
pub fn redirect_with_flash(location: &str, flash: Flash, config: &AuthConfig) -> Response {
    let mut response = Redirect::to(location).into_response();
    response
        .headers_mut()
        .append(header::SET_COOKIE, queue_flash(config, &flash));
    response
}

/// Minimal HTML escaping for text and attribute positions
fn escape(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape() {
        assert_eq!(escape("a<b>&\"c\""), "a&lt;b&gt;&amp;&quot;c&quot;");
        assert_eq!(escape("plain"), "plain");
    }

    #[test]
    fn test_page_body_includes_errors_and_values() {
        let page = Page::new("auth/login", "Sign In")
            .with_errors(vec![FieldError::new(
                "password",
                "Password must be at least 6 characters long",
            )])
            .with_values(vec![("email", "a@b.com".to_string())]);

        assert_eq!(page.status, StatusCode::UNPROCESSABLE_ENTITY);
        let body = page.body();
        assert!(body.contains("Password must be at least 6 characters long"));
        assert!(body.contains("value=\"a@b.com\""));
    }

    #[test]
    fn test_page_response_has_marker_header() {
        let response = Page::new("auth/login", "Sign In").into_response();
        assert_eq!(
            response.headers().get(PAGE_HEADER).unwrap().to_str().unwrap(),
            "auth/login"
        );
    }

    #[test]
    fn test_flash_message_escaped_into_body() {
        let page =
            Page::new("home", "Home").with_flash(Flash::error("<script>alert(1)</script>"));
        assert!(page.body().contains("&lt;script&gt;"));
    }
}
