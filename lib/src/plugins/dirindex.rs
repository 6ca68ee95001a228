use crate::error::Result;
use crate::output::Output;
use crate::plugin::Plugin;

/// Directory-index rewriting: `foo.html` becomes `foo/index.html`, so the
/// page is reachable at the extensionless URL `foo/`. Files already named
/// `index.html` stay where they are.
pub struct DirectoryIndexes;

impl Plugin for DirectoryIndexes {
    fn name(&self) -> &'static str {
        "directory_indexes"
    }

    fn process(&self, output: &mut Output) -> Result<()> {
        for file in output.files_mut() {
            if !file.is_page() || file.path.file_name() == Some("index.html".as_ref()) {
                continue;
            }

            file.path = file.path.with_extension("").join("index.html");
        }

        Ok(())
    }
}

#[cfg(test)]
mod rewrite_tests {
    use std::path::PathBuf;

    use super::DirectoryIndexes;
    use crate::output::{Output, OutputFile};
    use crate::plugin::Plugin;

    #[test]
    fn pages_move_under_their_own_directory() {
        let mut output = Output::default();
        output.push(OutputFile::text("about.html", ""));
        output.push(OutputFile::text(PathBuf::from("how-tos").join("foo.html"), ""));
        output.push(OutputFile::text("index.html", ""));
        output.push(OutputFile::binary("style.css", vec![]));

        DirectoryIndexes.process(&mut output).unwrap();

        let paths: Vec<_> = output.files().iter().map(|f| f.path.clone()).collect();
        assert_eq!(paths, vec![
            PathBuf::from("about").join("index.html"),
            PathBuf::from("how-tos").join("foo").join("index.html"),
            PathBuf::from("index.html"),
            PathBuf::from("style.css"),
        ]);
    }
}
