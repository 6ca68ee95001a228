//! Configure-hook plugins: capabilities that adjust the render settings
//! rather than transform the output tree.

use crate::error::Result;
use crate::markdown::MarkdownEngine;
use crate::plugin::Plugin;
use crate::render::RenderSettings;
use crate::templating::TemplateOptions;

/// Syntax highlighting for fenced code blocks.
pub struct Syntax;

impl Plugin for Syntax {
    fn name(&self) -> &'static str {
        "syntax"
    }

    fn configure(&self, settings: &mut RenderSettings) -> Result<()> {
        settings.highlight = true;
        crate::markdown::warm_up();
        Ok(())
    }
}

/// Template format options.
pub struct TemplateFormat(pub TemplateOptions);

impl Plugin for TemplateFormat {
    fn name(&self) -> &'static str {
        "template_options"
    }

    fn configure(&self, settings: &mut RenderSettings) -> Result<()> {
        settings.templates = self.0;
        Ok(())
    }
}

/// Content-rendering engine selection.
pub struct ContentEngine(pub MarkdownEngine);

impl Plugin for ContentEngine {
    fn name(&self) -> &'static str {
        "markdown_engine"
    }

    fn configure(&self, settings: &mut RenderSettings) -> Result<()> {
        settings.markdown = self.0;
        Ok(())
    }
}

/// Static-asset directory aliases: the directories under the site source
/// whose contents are carried into the output tree.
pub struct AssetDirs {
    dirs: Vec<String>,
}

impl AssetDirs {
    pub fn new<I, S>(dirs: I) -> Self
        where I: IntoIterator<Item = S>, S: Into<String>
    {
        AssetDirs { dirs: dirs.into_iter().map(Into::into).collect() }
    }
}

impl Plugin for AssetDirs {
    fn name(&self) -> &'static str {
        "asset_dirs"
    }

    fn configure(&self, settings: &mut RenderSettings) -> Result<()> {
        settings.asset_dirs.extend(self.dirs.iter().cloned());
        Ok(())
    }
}

/// Site-defined helper predicates, exposed to templates as functions of
/// the current page's path.
#[derive(Default)]
pub struct Helpers {
    predicates: Vec<(&'static str, fn(&str) -> bool)>,
}

impl Helpers {
    pub fn new() -> Self {
        Helpers::default()
    }

    pub fn predicate(mut self, name: &'static str, f: fn(&str) -> bool) -> Self {
        self.predicates.push((name, f));
        self
    }
}

impl Plugin for Helpers {
    fn name(&self) -> &'static str {
        "helpers"
    }

    fn configure(&self, settings: &mut RenderSettings) -> Result<()> {
        settings.predicates.extend(self.predicates.iter().cloned());
        Ok(())
    }
}
