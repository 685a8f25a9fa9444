//! HTML template set
//!
//! `view.html` and `edit.html` are minijinja templates rendered with `title`
//! and `body` in scope. Both are compiled once at startup, so a syntax error
//! is a load error rather than a per-request failure. Output is HTML-escaped.

use std::fs;
use std::path::Path;

use minijinja::{context, default_auto_escape_callback, Environment, UndefinedBehavior};

use super::{RenderError, Renderer, Template};
use crate::store::Page;

/// Compiled `view` and `edit` templates
pub struct HtmlTemplates {
    env: Environment<'static>,
}

impl HtmlTemplates {
    /// Load `view.html` and `edit.html` from `dir`
    pub fn load(dir: impl AsRef<Path>) -> Result<Self, RenderError> {
        let dir = dir.as_ref();
        let read = |template: Template| {
            let path = dir.join(template.file_name());
            fs::read_to_string(&path).map_err(|source| RenderError::Load { path, source })
        };
        Self::from_sources(read(Template::View)?, read(Template::Edit)?)
    }

    pub fn from_sources(
        view: impl Into<String>,
        edit: impl Into<String>,
    ) -> Result<Self, RenderError> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(default_auto_escape_callback);
        // A misspelled variable fails the request instead of rendering empty
        env.set_undefined_behavior(UndefinedBehavior::Strict);

        for (template, text) in [(Template::View, view.into()), (Template::Edit, edit.into())] {
            env.add_template_owned(template.file_name(), text)
                .map_err(|source| RenderError::Template {
                    template: template.file_name(),
                    source,
                })?;
        }
        Ok(Self { env })
    }
}

impl Renderer for HtmlTemplates {
    fn render(&self, template: Template, page: &Page) -> Result<Vec<u8>, RenderError> {
        let name = template.file_name();
        let wrap = |source: minijinja::Error| RenderError::Template {
            template: name.clone(),
            source,
        };

        let tmpl = self.env.get_template(&name).map_err(wrap)?;
        let html = tmpl
            .render(context! {
                title => &page.title,
                body => String::from_utf8_lossy(&page.body),
            })
            .map_err(wrap)?;
        Ok(html.into_bytes())
    }
}
