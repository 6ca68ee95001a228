use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Chainable, Result};
use crate::util;

/// File contents, kept as text when the renderer produced text so plugins
/// can transform pages and stylesheets without re-decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Contents {
    Text(String),
    Binary(Vec<u8>),
}

/// A single file of the finalized site, addressed relative to the build
/// directory root.
#[derive(Debug, Clone)]
pub struct OutputFile {
    pub path: PathBuf,
    pub contents: Contents,
}

impl OutputFile {
    pub fn text<P: Into<PathBuf>, S: Into<String>>(path: P, contents: S) -> Self {
        OutputFile { path: path.into(), contents: Contents::Text(contents.into()) }
    }

    pub fn binary<P: Into<PathBuf>>(path: P, contents: Vec<u8>) -> Self {
        OutputFile { path: path.into(), contents: Contents::Binary(contents) }
    }

    pub fn is_page(&self) -> bool {
        util::ext_is(&self.path, "html")
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.contents {
            Contents::Text(text) => Some(text),
            Contents::Binary(_) => None,
        }
    }

    pub fn as_text_mut(&mut self) -> Option<&mut String> {
        match &mut self.contents {
            Contents::Text(text) => Some(text),
            Contents::Binary(_) => None,
        }
    }

    pub fn bytes(&self) -> &[u8] {
        match &self.contents {
            Contents::Text(text) => text.as_bytes(),
            Contents::Binary(bytes) => bytes,
        }
    }
}

/// The rendered site: an ordered list of output files. Produced by the
/// renderer, transformed in place by the activated plugins, then written
/// out with [`Output::write_to`].
#[derive(Debug, Clone, Default)]
pub struct Output {
    files: Vec<OutputFile>,
}

impl Output {
    pub fn push(&mut self, file: OutputFile) {
        self.files.push(file);
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn files(&self) -> &[OutputFile] {
        &self.files
    }

    pub fn files_mut(&mut self) -> &mut Vec<OutputFile> {
        &mut self.files
    }

    pub fn get<P: AsRef<Path>>(&self, path: P) -> Option<&OutputFile> {
        self.files.iter().find(|f| f.path == path.as_ref())
    }

    /// Writes every file under `dir`, creating directories as needed.
    pub fn write_to(&self, dir: &Path) -> Result<()> {
        for file in &self.files {
            let path = dir.join(&file.path);
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }

            fs::write(&path, file.bytes()).chain_with(|| crate::error! {
                "failed to write output file",
                "path" => path.display(),
            })?;
        }

        Ok(())
    }
}

impl FromIterator<OutputFile> for Output {
    fn from_iter<I: IntoIterator<Item = OutputFile>>(iter: I) -> Self {
        Output { files: iter.into_iter().collect() }
    }
}

impl Extend<OutputFile> for Output {
    fn extend<I: IntoIterator<Item = OutputFile>>(&mut self, iter: I) {
        self.files.extend(iter);
    }
}
