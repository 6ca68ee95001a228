//! The built-in build capabilities, one type per plugin.

mod asset_hash;
mod deploy;
mod dirindex;
mod dotenv;
mod livereload;
mod minify;
mod options;
mod sitemap;

pub use asset_hash::AssetHash;
pub use deploy::Deploy;
pub use dirindex::DirectoryIndexes;
pub use dotenv::Dotenv;
pub use livereload::LiveReload;
pub use minify::{MinifyCss, MinifyJs};
pub use options::{AssetDirs, ContentEngine, Helpers, Syntax, TemplateFormat};
pub use sitemap::Sitemap;
