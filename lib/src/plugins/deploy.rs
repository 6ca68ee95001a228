use std::path::Path;
use std::process::Command;

use crate::error::{Chainable, Result};
use crate::plugin::{Phase, Plugin};
use crate::profile::{DeploymentProfile, Method};

/// Deployment: mirrors the written build directory to the remote host
/// recorded in the profile it was activated with.
///
/// The profile is resolved once at startup and registered here; by the
/// time this runs, every packaging plugin has finished and the output
/// tree on disk is final.
pub struct Deploy {
    profile: DeploymentProfile,
}

impl Deploy {
    pub fn new(profile: DeploymentProfile) -> Self {
        Deploy { profile }
    }

    pub fn profile(&self) -> &DeploymentProfile {
        &self.profile
    }
}

impl Plugin for Deploy {
    fn name(&self) -> &'static str {
        "deploy"
    }

    fn phase(&self) -> Phase {
        Phase::Publish
    }

    fn publish(&self, build_dir: &Path) -> Result<()> {
        match self.profile.method {
            Method::Rsync => rsync(&self.profile, build_dir),
        }
    }
}

fn rsync(profile: &DeploymentProfile, build_dir: &Path) -> Result<()> {
    let args = profile.rsync_args(build_dir);
    let output = Command::new("rsync")
        .args(&args)
        .output()
        .chain_with(|| crate::error! {
            "failed to run rsync",
            "is rsync installed and on PATH?",
        })?;

    if !output.status.success() {
        return crate::err! {
            "file synchronization failed",
            "destination" => profile.remote_spec(),
            "status" => output.status,
            "stderr" => String::from_utf8_lossy(&output.stderr).trim(),
        };
    }

    Ok(())
}
