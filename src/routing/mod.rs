//! Routing module
//!
//! Path validation and operation selection for wiki routes.

pub mod matcher;

pub use matcher::{Operation, PathValidator};
