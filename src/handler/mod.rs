//! Request handler module
//!
//! Routes wiki requests through the path guard to the view, edit and save
//! handlers.

pub mod pages;
pub mod router;

// Re-export main entry point
pub use router::{dispatch, handle_request, make_handler, PageHandler, PageRequest};
