use std::path::Path;

use crate::error::{Chainable, Result};
use crate::output::Output;
use crate::render::{Renderer, RenderSettings};

/// The build mode a pipeline runs in.
///
/// `Packaging` finalizes output for deployment; `Preview` is the local,
/// live-reloadable rendition of the same site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Preview,
    Packaging,
}

/// When a plugin's hooks run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Every build, in both modes.
    Content,
    /// Preview builds only.
    Preview,
    /// Packaging builds only. These plugins see the fully rendered output
    /// tree, so post-processing like minification happens after every page
    /// exists and before anything is deployed.
    Packaging,
    /// The deployment step. Not part of a build: runs only through
    /// [`Pipeline::publish`], after the output tree has been written.
    Publish,
}

impl Phase {
    fn runs_in(self, mode: Mode) -> bool {
        match self {
            Phase::Content => true,
            Phase::Preview => mode == Mode::Preview,
            Phase::Packaging => mode == Mode::Packaging,
            Phase::Publish => false,
        }
    }
}

/// A build capability. All hooks default to no-ops; a plugin overrides the
/// ones relevant to its phase of the build.
pub trait Plugin: Send + Sync {
    /// The name recorded in the activation sequence.
    fn name(&self) -> &'static str;

    fn phase(&self) -> Phase {
        Phase::Content
    }

    /// Adjusts the render settings before any page is rendered.
    fn configure(&self, _settings: &mut RenderSettings) -> Result<()> {
        Ok(())
    }

    /// Transforms the rendered output tree in place.
    fn process(&self, _output: &mut Output) -> Result<()> {
        Ok(())
    }

    /// Publishes the written build directory. Only [`Phase::Publish`]
    /// plugins are ever asked to.
    fn publish(&self, _build_dir: &Path) -> Result<()> {
        Ok(())
    }
}

/// The ordered plugin activation record and pipeline driver.
///
/// Plugins run strictly in activation order, filtered by phase against the
/// build mode. Activation itself carries no side effects beyond the record;
/// evaluation happens in [`Pipeline::run`].
#[derive(Default)]
pub struct Pipeline {
    plugins: Vec<Box<dyn Plugin>>,
}

impl Pipeline {
    pub fn new() -> Self {
        Pipeline::default()
    }

    pub fn activate<P: Plugin + 'static>(&mut self, plugin: P) -> &mut Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// The names of every activated plugin, in activation order.
    pub fn activated(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    /// The names of the plugins that run for `mode`, in activation order.
    /// [`Phase::Publish`] plugins are not part of any build plan.
    pub fn plan(&self, mode: Mode) -> Vec<&'static str> {
        self.active(mode).map(|p| p.name()).collect()
    }

    fn active(&self, mode: Mode) -> impl Iterator<Item = &dyn Plugin> {
        self.plugins.iter()
            .map(|p| &**p)
            .filter(move |p| p.phase().runs_in(mode))
    }

    /// Renders `source` and applies every active plugin, in activation
    /// order: configure hooks first, then the renderer, then the output
    /// transforms.
    pub fn run(&self, source: &Path, mode: Mode) -> Result<Output> {
        let mut settings = RenderSettings::default();
        for plugin in self.active(mode) {
            plugin.configure(&mut settings).chain_with(|| crate::error! {
                "plugin configuration failed",
                "plugin" => plugin.name(),
            })?;
        }

        let mut output = Renderer::new(source, settings)?.render()?;
        for plugin in self.active(mode) {
            plugin.process(&mut output).chain_with(|| crate::error! {
                "plugin processing failed",
                "plugin" => plugin.name(),
            })?;
        }

        Ok(output)
    }

    /// Runs every [`Phase::Publish`] plugin against the written build
    /// directory, in activation order.
    pub fn publish(&self, build_dir: &Path) -> Result<()> {
        for plugin in self.plugins.iter().filter(|p| p.phase() == Phase::Publish) {
            plugin.publish(build_dir).chain_with(|| crate::error! {
                "publishing failed",
                "plugin" => plugin.name(),
            })?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod sequencing_tests {
    use super::*;

    struct Named(&'static str, Phase);

    impl Plugin for Named {
        fn name(&self) -> &'static str { self.0 }
        fn phase(&self) -> Phase { self.1 }
    }

    fn pipeline() -> Pipeline {
        let mut pipeline = Pipeline::new();
        pipeline.activate(Named("dotenv", Phase::Content))
            .activate(Named("directory_indexes", Phase::Content))
            .activate(Named("livereload", Phase::Preview))
            .activate(Named("deploy", Phase::Publish))
            .activate(Named("minify_css", Phase::Packaging))
            .activate(Named("minify_javascript", Phase::Packaging))
            .activate(Named("asset_hash", Phase::Packaging));
        pipeline
    }

    #[test]
    fn packaging_plugins_run_iff_packaging() {
        let pipeline = pipeline();
        let packaging = pipeline.plan(Mode::Packaging);
        let preview = pipeline.plan(Mode::Preview);

        for name in ["minify_css", "minify_javascript", "asset_hash"] {
            assert!(packaging.contains(&name));
            assert!(!preview.contains(&name));
        }
    }

    #[test]
    fn preview_plugins_run_iff_preview() {
        let pipeline = pipeline();
        assert!(pipeline.plan(Mode::Preview).contains(&"livereload"));
        assert!(!pipeline.plan(Mode::Packaging).contains(&"livereload"));
    }

    #[test]
    fn plan_preserves_activation_order() {
        let pipeline = pipeline();
        assert_eq!(pipeline.plan(Mode::Packaging), vec![
            "dotenv", "directory_indexes",
            "minify_css", "minify_javascript", "asset_hash",
        ]);
    }

    #[test]
    fn publish_plugins_in_no_build_plan() {
        let pipeline = pipeline();
        assert!(!pipeline.plan(Mode::Packaging).contains(&"deploy"));
        assert!(!pipeline.plan(Mode::Preview).contains(&"deploy"));
        assert!(pipeline.activated().contains(&"deploy"));
    }
}
