use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use shelley::error::Result;
use shelley::markdown::MarkdownEngine;
use shelley::plugins::{
    AssetDirs, AssetHash, ContentEngine, Deploy, DirectoryIndexes, Dotenv,
    Helpers, LiveReload, MinifyCss, MinifyJs, Sitemap, Syntax, TemplateFormat,
};
use shelley::templating::TemplateOptions;
use shelley::{DeploymentProfile, Pipeline};

use crate::helpers;

pub const CONFIG_FILE: &str = "config.toml";
pub const ENV_FILE: &str = ".env";

/// Where the sitemap says the site lives.
const HOSTNAME: &str = "http://www.neo4j-ruby.org";

/// Site settings, read from `config.toml` at the source root when present.
#[derive(Debug, Deserialize, Serialize)]
#[serde(default)]
pub struct Settings {
    pub hostname: String,
    pub images_dir: String,
    pub css_dir: String,
    pub js_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            hostname: HOSTNAME.into(),
            images_dir: "images".into(),
            css_dir: "stylesheets".into(),
            js_dir: "javascripts".into(),
        }
    }
}

impl Settings {
    fn discover(source: &Path) -> Result<Settings> {
        match fs::read_to_string(source.join(CONFIG_FILE)) {
            Ok(raw) => Ok(toml::from_str(&raw)?),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Settings::default()),
            Err(e) => Err(e.into()),
        }
    }
}

/// The configured site: settings, the resolved deployment profile, and
/// the plugin activation record.
pub struct Site {
    pub settings: Settings,
    pub profile: DeploymentProfile,
    pub pipeline: Pipeline,
}

impl Site {
    /// Reads the site settings and assembles the activation sequence. The
    /// order is fixed; phases decide what actually runs in a given mode.
    pub fn configure(source: &Path) -> Result<Site> {
        let settings = Settings::discover(source)?;

        let mut pipeline = Pipeline::new();
        pipeline
            .activate(Dotenv::load(source.join(ENV_FILE))?)
            .activate(DirectoryIndexes)
            .activate(Syntax)
            .activate(Sitemap::new(settings.hostname.as_str()))
            .activate(LiveReload::default())
            .activate(TemplateFormat(TemplateOptions {
                autoescape: true,
                trim_blocks: true,
                lstrip_blocks: true,
            }))
            .activate(ContentEngine(MarkdownEngine::Extended))
            .activate(AssetDirs::new([
                settings.images_dir.as_str(),
                settings.css_dir.as_str(),
                settings.js_dir.as_str(),
            ]))
            .activate(Helpers::new().predicate("show_comments", helpers::show_comments));

        // The deployment target is resolved exactly once, here, after the
        // environment file has been loaded.
        let profile = DeploymentProfile::resolve();
        pipeline.activate(Deploy::new(profile.clone()));

        pipeline
            .activate(MinifyCss)
            .activate(MinifyJs)
            .activate(AssetHash);

        Ok(Site { settings, profile, pipeline })
    }
}
