use std::path::Path;

use minijinja::{context, path_loader, AutoEscape, Environment};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::render::RenderSettings;

/// The layout used when a site has no `templates/` directory. Pages get
/// their rendered markdown dropped into a bare HTML5 document.
const DEFAULT_LAYOUT: &str = "\
<!doctype html>
<html>
  <head>
    <meta charset=\"utf-8\">
    <title>{{ title or \"\" }}</title>
  </head>
  <body>
{{ content|safe }}
  </body>
</html>
";

/// Template format options: output escaping and block whitespace handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct TemplateOptions {
    pub autoescape: bool,
    pub trim_blocks: bool,
    pub lstrip_blocks: bool,
}

impl Default for TemplateOptions {
    fn default() -> Self {
        TemplateOptions { autoescape: true, trim_blocks: false, lstrip_blocks: false }
    }
}

/// The template engine: a minijinja environment loaded from the site's
/// `templates/` directory, or the built-in layout when there is none.
pub struct Engine {
    env: Environment<'static>,
}

/// The values a page template renders with.
pub struct PageContext<'a> {
    pub title: Option<&'a str>,
    pub path: &'a str,
    pub content: &'a str,
    pub meta: &'a toml::Table,
}

impl Engine {
    pub fn new(templates: Option<&Path>, settings: &RenderSettings) -> Result<Engine> {
        let mut env = Environment::new();
        match templates {
            Some(dir) => env.set_loader(path_loader(dir)),
            None => env.add_template(crate::render::DEFAULT_TEMPLATE, DEFAULT_LAYOUT)?,
        }

        let options = settings.templates;
        if !options.autoescape {
            env.set_auto_escape_callback(|_| AutoEscape::None);
        }

        env.set_trim_blocks(options.trim_blocks);
        env.set_lstrip_blocks(options.lstrip_blocks);

        for (name, predicate) in &settings.predicates {
            let predicate = *predicate;
            env.add_function(*name, move |path: String| predicate(&path));
        }

        Ok(Engine { env })
    }

    pub fn render_page(&self, template: &str, page: &PageContext<'_>) -> Result<String> {
        let template = self.env.get_template(template)?;
        let html = template.render(context! {
            title => page.title,
            path => page.path,
            content => page.content,
            meta => page.meta,
        })?;

        Ok(html)
    }
}
