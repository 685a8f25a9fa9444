//! A small file-backed wiki served over HTTP.
//!
//! Requests to `/view/<title>`, `/edit/<title>` and `/save/<title>` are
//! validated by [`routing::PathValidator`], dispatched through
//! [`handler::make_handler`] and served from a [`store::PageStore`] with a
//! [`render::Renderer`] producing the HTML.

pub mod config;
pub mod handler;
pub mod http;
pub mod logger;
pub mod render;
pub mod routing;
pub mod server;
pub mod store;
