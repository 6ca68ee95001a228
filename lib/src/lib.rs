#![doc = svgbobdoc::transform!(
//! A toolkit for configuring and running static site builds.
//!
//! # Overview
//!
//! Shelley turns a source tree of markdown content, templates, and static
//! assets into a finalized output tree, under the control of an ordered
//! list of activated plugins and a deployment profile resolved once from
//! the environment:
//!
//! ```svgbob
//!  environment                 site source
//!      |                           |
//!      v                           v
//! +----------+  configure  +--------------+  process   +-----------+
//! | pipeline |------------>|   renderer   |----------->|  output   |
//! | (plugin  |             | markdown +   |  (plugins, |  tree     |
//! |  record) |             | templates +  |   in       |           |
//! +----+-----+             | assets       |   order)   +-----+-----+
//!      |                   +--------------+                  |
//!      | publish                                             v
//!      +----------------------> rsync <---------------- build dir
//! ```
//!
//! In words:
//!
//!   * A **pipeline** is the ordered record of activated **plugins**. Each
//!     plugin belongs to a phase: every build, preview builds, packaging
//!     builds, or the publishing step.
//!
//!   * Plugins first adjust the **render settings** (markdown engine,
//!     template format options, syntax highlighting, asset directories,
//!     helper predicates), then transform the rendered **output tree** in
//!     activation order (directory indexes, sitemap, live reload,
//!     minification, asset hashing).
//!
//!   * A **deployment profile** is resolved from the environment exactly
//!     once, at startup, and registered with the deploy plugin. Publishing
//!     mirrors the written build directory to the profile's remote path
//!     over ssh.
)]

pub mod error;
pub mod util;
pub mod env;
pub mod profile;
pub mod output;
pub mod plugin;
pub mod markdown;
pub mod templating;
pub mod render;
pub mod plugins;

pub use error::{Chainable, Error, Result};
pub use output::{Contents, Output, OutputFile};
pub use plugin::{Mode, Phase, Pipeline, Plugin};
pub use profile::{DeploymentProfile, Method, Target};
pub use render::{RenderSettings, Renderer};

pub use rayon;
