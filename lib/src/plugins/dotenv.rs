use std::path::Path;

use crate::env::EnvFile;
use crate::error::Result;
use crate::plugin::Plugin;

/// Environment-file loading.
///
/// Loading happens at activation, before anything else reads the process
/// environment, so a site's `.env` can carry the deployment variable
/// groups that the target resolver consumes.
pub struct Dotenv {
    file: EnvFile,
}

impl Dotenv {
    /// Reads `path` and applies it to the process environment. Variables
    /// the shell already set keep their values; a missing file loads
    /// nothing.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Dotenv> {
        let file = EnvFile::read(path)?;
        file.apply();
        Ok(Dotenv { file })
    }

    /// How many entries the file carried.
    pub fn loaded(&self) -> usize {
        self.file.entries().len()
    }
}

impl Plugin for Dotenv {
    fn name(&self) -> &'static str {
        "dotenv"
    }
}
