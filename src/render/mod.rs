//! Page rendering module
//!
//! Turns a named template and a page into response bytes.

mod html;

pub use html::HtmlTemplates;

use std::path::PathBuf;

use crate::store::Page;

/// Templates known to the wiki
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Template {
    View,
    Edit,
}

impl Template {
    pub const fn name(self) -> &'static str {
        match self {
            Self::View => "view",
            Self::Edit => "edit",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.html", self.name())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("template {}: {source}", path.display())]
    Load {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("template {template}: {source}")]
    Template {
        template: String,
        source: minijinja::Error,
    },
}

pub trait Renderer: Send + Sync {
    fn render(&self, template: Template, page: &Page) -> Result<Vec<u8>, RenderError>;
}
