//! Wiki page handlers
//!
//! Each handler receives a title that has already passed path validation and
//! maps `(request, title)` to a response with no state kept between requests.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use super::router::{PageHandler, PageRequest};
use crate::config::AppState;
use crate::http;
use crate::render::Template;
use crate::routing::Operation;
use crate::store::Page;

/// Form field holding the page body on save
const BODY_FIELD: &str = "body";

/// Handler for each wiki operation
pub fn handler_for(op: Operation) -> PageHandler {
    match op {
        Operation::View => view_handler,
        Operation::Edit => edit_handler,
        Operation::Save => save_handler,
    }
}

/// Render a page, or send the client to the editor when it cannot be loaded
///
/// Every load failure redirects, not only a missing file.
pub fn view_handler(req: &PageRequest, state: &AppState, title: &str) -> Response<Full<Bytes>> {
    match state.store.load(title) {
        Ok(page) => render_page(req, state, Template::View, &page),
        Err(e) => {
            tracing::debug!(title, error = %e, "page not loaded, redirecting to editor");
            http::build_redirect_response(&Operation::Edit.path_for(title))
        }
    }
}

/// Render the editor for a page; a page that cannot be loaded starts blank
pub fn edit_handler(req: &PageRequest, state: &AppState, title: &str) -> Response<Full<Bytes>> {
    let page = state.store.load(title).unwrap_or_else(|e| {
        tracing::debug!(title, error = %e, "page not loaded, editing blank page");
        Page::blank(title)
    });
    render_page(req, state, Template::Edit, &page)
}

/// Persist the submitted `body` field and redirect to the page view
///
/// A missing field saves an empty page.
pub fn save_handler(req: &PageRequest, state: &AppState, title: &str) -> Response<Full<Bytes>> {
    let body = req.form_value(BODY_FIELD).unwrap_or_default();
    let page = Page::new(title, body);

    match state.store.save(&page) {
        Ok(()) => {
            tracing::debug!(title, bytes = page.body.len(), "page saved");
            http::build_redirect_response(&Operation::View.path_for(title))
        }
        Err(e) => {
            crate::logger::log_error(&format!("Failed to save page '{title}': {e}"));
            http::build_500_response(&e.to_string())
        }
    }
}

fn render_page(
    req: &PageRequest,
    state: &AppState,
    template: Template,
    page: &Page,
) -> Response<Full<Bytes>> {
    match state.renderer.render(template, page) {
        Ok(html) => http::build_html_response(html, req.is_head()),
        Err(e) => {
            crate::logger::log_error(&format!(
                "Failed to render '{}' for page '{}': {e}",
                template.name(),
                page.title
            ));
            http::build_500_response(&e.to_string())
        }
    }
}
