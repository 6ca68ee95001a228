use std::hash::Hasher;
use std::path::{Path, PathBuf};

use rustc_hash::FxHasher;

use crate::error::Result;
use crate::output::Output;
use crate::plugin::{Phase, Plugin};
use crate::util;

/// Asset extensions with no references of their own. Hashed first.
const LEAF_EXTS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "svg", "webp", "ico",
    "woff", "woff2", "ttf", "eot",
];

/// Assets that reference other assets. Hashed after the leaves, once
/// their contents are final.
const LINKED_EXTS: &[&str] = &["css", "js"];

/// Content-hashed asset renaming: every asset becomes
/// `stem-<content hash>.ext` and every reference to it is rewritten, so
/// far-future cache headers can never serve a stale file.
///
/// Renaming happens in two waves. Images and fonts go first; stylesheets
/// and scripts are rewritten to point at the new names and only then
/// hashed themselves, so a stylesheet's name always reflects the
/// references it ships with.
pub struct AssetHash;

impl Plugin for AssetHash {
    fn name(&self) -> &'static str {
        "asset_hash"
    }

    fn phase(&self) -> Phase {
        Phase::Packaging
    }

    fn process(&self, output: &mut Output) -> Result<()> {
        let renames = rename_wave(output, LEAF_EXTS);
        rewrite_refs(output, &renames);

        let renames = rename_wave(output, LINKED_EXTS);
        rewrite_refs(output, &renames);
        Ok(())
    }
}

fn rename_wave(output: &mut Output, exts: &[&str]) -> Vec<(String, String)> {
    let mut renames = vec![];
    for file in output.files_mut() {
        let Some(ext) = file.path.extension().and_then(|e| e.to_str()) else {
            continue;
        };

        if !exts.iter().any(|e| e.eq_ignore_ascii_case(ext)) {
            continue;
        }

        let renamed = hashed_name(&file.path, &hash_of(file.bytes()));
        renames.push((util::url_path(&file.path), util::url_path(&renamed)));
        file.path = renamed;
    }

    renames
}

fn rewrite_refs(output: &mut Output, renames: &[(String, String)]) {
    if renames.is_empty() {
        return;
    }

    for file in output.files_mut() {
        let Some(text) = file.as_text_mut() else {
            continue;
        };

        for (old, new) in renames {
            if memchr::memmem::find(text.as_bytes(), old.as_bytes()).is_some() {
                *text = text.replace(old.as_str(), new);
            }
        }
    }
}

fn hash_of(bytes: &[u8]) -> String {
    let mut hasher = FxHasher::default();
    hasher.write(bytes);
    format!("{:016x}", hasher.finish())
}

fn hashed_name(path: &Path, hash: &str) -> PathBuf {
    let stem = path.file_stem().unwrap_or_default().to_string_lossy();
    let name = match path.extension() {
        Some(ext) => format!("{stem}-{hash}.{}", ext.to_string_lossy()),
        None => format!("{stem}-{hash}"),
    };

    path.with_file_name(name)
}

#[cfg(test)]
mod hash_tests {
    use std::path::PathBuf;

    use super::{hash_of, AssetHash};
    use crate::output::{Output, OutputFile};
    use crate::plugin::Plugin;

    #[test]
    fn assets_are_renamed_and_references_rewritten() {
        let logo = b"not really a png".to_vec();
        let logo_hash = hash_of(&logo);

        let mut output = Output::default();
        output.push(OutputFile::text(
            "index.html",
            "<img src=\"images/logo.png\"> <link href=\"stylesheets/site.css\">",
        ));
        output.push(OutputFile::binary(PathBuf::from("images").join("logo.png"), logo));
        output.push(OutputFile::text(
            PathBuf::from("stylesheets").join("site.css"),
            "body { background: url(../images/logo.png); }",
        ));

        AssetHash.process(&mut output).unwrap();

        let logo_name = format!("logo-{logo_hash}.png");
        let renamed = output.get(PathBuf::from("images").join(&logo_name));
        assert!(renamed.is_some());

        // The stylesheet was rewritten before it was hashed.
        let css = output.files().iter()
            .find(|f| crate::util::ext_is(&f.path, "css"))
            .unwrap();
        assert!(css.as_text().unwrap().contains(&logo_name));
        assert_ne!(css.path, PathBuf::from("stylesheets").join("site.css"));

        let html = output.get("index.html").unwrap().as_text().unwrap();
        assert!(html.contains(&format!("images/{logo_name}")));
        assert!(html.contains(&crate::util::url_path(&css.path)));
    }

    #[test]
    fn hashes_are_stable() {
        assert_eq!(hash_of(b"abc"), hash_of(b"abc"));
        assert_ne!(hash_of(b"abc"), hash_of(b"abd"));
    }

    #[test]
    fn pages_are_never_renamed() {
        let mut output = Output::default();
        output.push(OutputFile::text("index.html", "x"));
        AssetHash.process(&mut output).unwrap();
        assert!(output.get("index.html").is_some());
    }
}
