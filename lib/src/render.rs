use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use serde::Deserialize;

use crate::error::{Chainable, Result};
use crate::markdown::{self, MarkdownEngine};
use crate::output::{Output, OutputFile};
use crate::templating::{Engine, PageContext, TemplateOptions};
use crate::util;

pub const CONTENT_DIR: &str = "content";
pub const TEMPLATE_DIR: &str = "templates";
pub const DEFAULT_TEMPLATE: &str = "page.html";

/// What the renderer is told before any page is rendered. Starts from
/// defaults and is adjusted by the configure hook of every active plugin,
/// in activation order.
#[derive(Debug, Clone, Default)]
pub struct RenderSettings {
    pub markdown: MarkdownEngine,
    pub templates: TemplateOptions,
    /// Highlight fenced code blocks.
    pub highlight: bool,
    /// Directories under the site source whose files are copied into the
    /// output tree as-is, keyed by their directory name.
    pub asset_dirs: Vec<String>,
    /// Predicates exposed to templates as functions of the page path.
    pub predicates: Vec<(&'static str, fn(&str) -> bool)>,
}

/// Front matter a page may carry between `+++` fences.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PageMeta {
    title: Option<String>,
    template: Option<String>,
    #[serde(flatten)]
    extra: toml::Table,
}

/// Renders a site source tree to an [`Output`]: markdown under `content/`
/// becomes templated pages, everything else under `content/` is carried
/// through verbatim, and the configured asset directories are copied
/// (compiling sass when the `sass` feature is on).
///
/// Sites with a `templates/` directory must provide `page.html` in it;
/// sites without one get the built-in layout.
pub struct Renderer {
    source: PathBuf,
    settings: RenderSettings,
    engine: Engine,
}

impl Renderer {
    pub fn new<P: AsRef<Path>>(source: P, settings: RenderSettings) -> Result<Self> {
        let source = source.as_ref().to_path_buf();
        let templates = source.join(TEMPLATE_DIR);
        let templates = templates.is_dir().then(|| templates.as_path());
        let engine = Engine::new(templates, &settings)?;
        Ok(Renderer { source, settings, engine })
    }

    pub fn render(&self) -> Result<Output> {
        let mut output = Output::default();
        self.render_content(&mut output)?;
        self.copy_assets(&mut output)?;
        Ok(output)
    }

    fn render_content(&self, output: &mut Output) -> Result<()> {
        let root = self.source.join(CONTENT_DIR);
        if !root.is_dir() {
            return crate::err! {
                "site has no content directory",
                "expected" => root.display(),
            };
        }

        let is_markdown = |path: &PathBuf| {
            util::ext_is(path, "md") || util::ext_is(path, "markdown")
        };

        let (markdown, verbatim): (Vec<_>, Vec<_>) = walk_files(&root)
            .into_iter()
            .partition(is_markdown);

        let pages = markdown.par_iter()
            .map(|path| self.render_page(path, &root))
            .collect::<Result<Vec<_>>>()?;

        output.extend(pages);
        for path in verbatim {
            let rel = path.strip_prefix(&root)?.to_path_buf();
            output.push(OutputFile::binary(rel, fs::read(&path)?));
        }

        Ok(())
    }

    fn render_page(&self, path: &Path, root: &Path) -> Result<OutputFile> {
        let raw = fs::read_to_string(path)?;
        let (front, body) = markdown::split_front_matter(&raw);
        let meta: PageMeta = match front {
            Some(front) => toml::from_str(front).chain_with(|| crate::error! {
                "invalid front matter",
                "page" => path.display(),
            })?,
            None => PageMeta::default(),
        };

        let content = markdown::render(body, self.settings.markdown, self.settings.highlight);
        let rel = path.strip_prefix(root)?.with_extension("html");
        let page_path = util::url_path(&rel);
        let template = meta.template.as_deref().unwrap_or(DEFAULT_TEMPLATE);
        let context = PageContext {
            title: meta.title.as_deref(),
            path: &page_path,
            content: &content,
            meta: &meta.extra,
        };

        let html = self.engine.render_page(template, &context).chain_with(|| crate::error! {
            "failed to render page",
            "page" => path.display(),
            "template" => template,
        })?;

        Ok(OutputFile::text(rel, html))
    }

    fn copy_assets(&self, output: &mut Output) -> Result<()> {
        for dir in &self.settings.asset_dirs {
            let root = self.source.join(dir);
            if !root.is_dir() {
                continue;
            }

            for path in walk_files(&root) {
                let rel = path.strip_prefix(&self.source)?.to_path_buf();
                output.push(self.read_asset(&path, rel)?);
            }
        }

        Ok(())
    }

    #[cfg(feature = "sass")]
    fn read_asset(&self, path: &Path, rel: PathBuf) -> Result<OutputFile> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("scss") | Some("sass") => {
                let css = grass::from_path(path, &grass::Options::default())?;
                Ok(OutputFile::text(rel.with_extension("css"), css))
            }
            _ => Ok(OutputFile::binary(rel, fs::read(path)?)),
        }
    }

    #[cfg(not(feature = "sass"))]
    fn read_asset(&self, path: &Path, rel: PathBuf) -> Result<OutputFile> {
        Ok(OutputFile::binary(rel, fs::read(path)?))
    }
}

fn walk_files(root: &Path) -> Vec<PathBuf> {
    jwalk::WalkDir::new(root)
        .follow_links(true)
        .sort(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type.is_file())
        .filter(|entry| !entry.file_name.to_string_lossy().starts_with('.'))
        .map(|entry| entry.path())
        .collect()
}

#[cfg(test)]
mod render_tests {
    use std::fs;
    use std::path::PathBuf;

    use super::{Renderer, RenderSettings};

    fn scratch_site(name: &str, files: &[(&str, &str)]) -> PathBuf {
        let root = std::env::temp_dir()
            .join(format!("shelley-{}-{name}", std::process::id()));

        let _ = fs::remove_dir_all(&root);
        for (path, contents) in files {
            let path = root.join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, contents).unwrap();
        }

        root
    }

    #[test]
    fn markdown_becomes_templated_pages() {
        let site = scratch_site("pages", &[
            ("content/index.md", "+++\ntitle = \"Home\"\n+++\n# Welcome\n"),
            ("content/how-tos/foo.md", "plain *text*\n"),
            ("content/robots.txt", "User-agent: *\n"),
        ]);

        let output = Renderer::new(&site, RenderSettings::default())
            .unwrap()
            .render()
            .unwrap();

        let index = output.get("index.html").unwrap();
        let html = index.as_text().unwrap();
        assert!(html.contains("<title>Home</title>"));
        assert!(html.contains("<h1>Welcome</h1>"));

        assert!(output.get(PathBuf::from("how-tos").join("foo.html")).is_some());
        assert!(output.get("robots.txt").is_some());

        let _ = fs::remove_dir_all(&site);
    }

    #[test]
    fn asset_dirs_are_copied_with_their_prefix() {
        let site = scratch_site("assets", &[
            ("content/index.md", "hi\n"),
            ("images/logo.png", "not really a png"),
            ("stylesheets/site.css", "body { color: black; }\n"),
        ]);

        let mut settings = RenderSettings::default();
        settings.asset_dirs = vec!["images".into(), "stylesheets".into()];

        let output = Renderer::new(&site, settings).unwrap().render().unwrap();
        assert!(output.get(PathBuf::from("images").join("logo.png")).is_some());
        assert!(output.get(PathBuf::from("stylesheets").join("site.css")).is_some());

        let _ = fs::remove_dir_all(&site);
    }
}
