use crate::error::Result;
use crate::output::Output;
use crate::plugin::{Phase, Plugin};

/// The port the live-reload protocol has used since its Rack days.
pub const DEFAULT_PORT: u16 = 35729;

/// Live reload: injects the client script into every page so a local
/// preview refreshes the browser on rebuild. Preview builds only; the
/// serving side of the protocol belongs to the preview server.
pub struct LiveReload {
    port: u16,
}

impl LiveReload {
    pub fn new(port: u16) -> Self {
        LiveReload { port }
    }
}

impl Default for LiveReload {
    fn default() -> Self {
        LiveReload::new(DEFAULT_PORT)
    }
}

impl Plugin for LiveReload {
    fn name(&self) -> &'static str {
        "livereload"
    }

    fn phase(&self) -> Phase {
        Phase::Preview
    }

    fn process(&self, output: &mut Output) -> Result<()> {
        let tag = format!(
            "<script src=\"http://localhost:{}/livereload.js?snipver=1\"></script>",
            self.port,
        );

        for file in output.files_mut() {
            if !file.is_page() {
                continue;
            }

            let Some(html) = file.as_text_mut() else {
                continue;
            };

            match memchr::memmem::rfind(html.as_bytes(), b"</body>") {
                Some(i) => html.insert_str(i, &tag),
                None => html.push_str(&tag),
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod inject_tests {
    use super::LiveReload;
    use crate::output::{Output, OutputFile};
    use crate::plugin::Plugin;

    #[test]
    fn script_lands_before_the_body_close() {
        let mut output = Output::default();
        output.push(OutputFile::text("index.html", "<html><body><p>hi</p></body></html>"));
        output.push(OutputFile::text("style.css", "body {}"));

        LiveReload::default().process(&mut output).unwrap();

        let html = output.get("index.html").unwrap().as_text().unwrap();
        assert!(html.contains("livereload.js"));
        assert!(html.ends_with("</script></body></html>"));

        let css = output.get("style.css").unwrap().as_text().unwrap();
        assert!(!css.contains("livereload"));
    }

    #[test]
    fn pages_without_a_body_get_the_script_appended() {
        let mut output = Output::default();
        output.push(OutputFile::text("bare.html", "<p>hi</p>"));

        LiveReload::default().process(&mut output).unwrap();
        let html = output.get("bare.html").unwrap().as_text().unwrap();
        assert!(html.ends_with("</script>"));
    }
}
